//! RLP decoding from a borrowed buffer.
//!
//! The decoder never copies: byte strings and list payloads come back as
//! sub-slices of the input. Each `decode_*` call consumes exactly one item,
//! and a failed call leaves the cursor where it was.
//!
//! Only the canonical encoding of an item is accepted. A prefixed single byte
//! below 0x80, a long form for a payload under 56 bytes, a length field or an
//! integer with a leading zero byte all fail with [`RlpError::NonCanonical`],
//! so every item has exactly one byte representation.

use primitive_types::U256;

use super::{
    Decodable, ItemKind, RlpError, OFFSET_LONG_ITEM, OFFSET_LONG_LIST, OFFSET_SHORT_ITEM,
    OFFSET_SHORT_LIST, SIZE_THRESHOLD,
};

/// Cursor over an RLP-encoded buffer.
///
/// # Example
///
/// ```
/// use vellum_protocol::rlp::RlpDecoder;
///
/// // ["cat", "dog"]
/// let data = [0xc8, 0x83, b'c', b'a', b't', 0x83, b'd', b'o', b'g'];
/// let mut outer = RlpDecoder::new(&data);
/// let mut items = RlpDecoder::new(outer.decode_list().unwrap());
/// assert_eq!(items.decode_bytes().unwrap(), b"cat");
/// assert_eq!(items.decode_bytes().unwrap(), b"dog");
/// assert!(items.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct RlpDecoder<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> RlpDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails if anything is left after the last decoded item.
    pub fn finish(&self) -> Result<(), RlpError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(RlpError::TrailingBytes(n)),
        }
    }

    /// Classifies the next item without consuming it.
    pub fn peek_kind(&self) -> Result<ItemKind, RlpError> {
        self.data
            .get(self.position)
            .map(|lead| ItemKind::classify(*lead))
            .ok_or(RlpError::UnexpectedEof {
                available: 0,
                requested: 1,
            })
    }

    /// Decodes a byte string.
    pub fn decode_bytes(&mut self) -> Result<&'a [u8], RlpError> {
        self.atomically(Self::string_payload)
    }

    /// Decodes a byte string that must be exactly `N` bytes long.
    pub fn decode_array<const N: usize>(&mut self) -> Result<[u8; N], RlpError> {
        self.atomically(|d| {
            let payload = d.string_payload()?;
            payload
                .try_into()
                .map_err(|_| RlpError::UnexpectedLength {
                    expected: N,
                    actual: payload.len(),
                })
        })
    }

    /// Decodes a UTF-8 string.
    pub fn decode_string(&mut self) -> Result<String, RlpError> {
        self.atomically(|d| {
            let payload = d.string_payload()?;
            String::from_utf8(payload.to_vec()).map_err(|_| RlpError::InvalidUtf8)
        })
    }

    pub fn decode_u8(&mut self) -> Result<u8, RlpError> {
        self.atomically(|d| d.unsigned(1)).map(|v| v as u8)
    }

    pub fn decode_u16(&mut self) -> Result<u16, RlpError> {
        self.atomically(|d| d.unsigned(2)).map(|v| v as u16)
    }

    pub fn decode_u32(&mut self) -> Result<u32, RlpError> {
        self.atomically(|d| d.unsigned(4)).map(|v| v as u32)
    }

    pub fn decode_u64(&mut self) -> Result<u64, RlpError> {
        self.atomically(|d| d.unsigned(8))
    }

    pub fn decode_u256(&mut self) -> Result<U256, RlpError> {
        self.atomically(|d| {
            let payload = d.string_payload()?;
            if payload.len() > 32 {
                return Err(RlpError::PayloadTooWide {
                    width: payload.len(),
                    capacity: 32,
                });
            }
            reject_leading_zero(payload)?;
            Ok(U256::from_big_endian(payload))
        })
    }

    /// Returns the raw payload of the next list, children still encoded.
    ///
    /// Walk the children with a fresh decoder over the returned slice.
    pub fn decode_list(&mut self) -> Result<&'a [u8], RlpError> {
        self.atomically(|d| {
            let lead = d.read_byte()?;
            let length = match ItemKind::classify(lead) {
                ItemKind::ShortList => (lead - OFFSET_SHORT_LIST) as usize,
                ItemKind::LongList => d.read_long_length((lead - OFFSET_LONG_LIST) as usize)?,
                _ => return Err(RlpError::UnexpectedString { lead }),
            };
            d.read(length)
        })
    }

    pub fn decode_object<T: Decodable>(&mut self) -> Result<T, RlpError> {
        self.atomically(T::rlp_decode)
    }

    /// Runs `f`, rewinding the cursor if it fails.
    fn atomically<T, F>(&mut self, f: F) -> Result<T, RlpError>
    where
        F: FnOnce(&mut Self) -> Result<T, RlpError>,
    {
        let start = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    fn string_payload(&mut self) -> Result<&'a [u8], RlpError> {
        let lead = self.read_byte()?;
        match ItemKind::classify(lead) {
            ItemKind::SingleByte => Ok(&self.data[self.position - 1..self.position]),
            ItemKind::Empty => Ok(&[]),
            ItemKind::ShortString => {
                let payload = self.read((lead - OFFSET_SHORT_ITEM) as usize)?;
                if let [byte] = payload {
                    if *byte < OFFSET_SHORT_ITEM {
                        return Err(RlpError::NonCanonical(
                            "single byte below 0x80 with a prefix",
                        ));
                    }
                }
                Ok(payload)
            }
            ItemKind::LongString => {
                let length = self.read_long_length((lead - OFFSET_LONG_ITEM) as usize)?;
                self.read(length)
            }
            ItemKind::ShortList | ItemKind::LongList => Err(RlpError::UnexpectedList { lead }),
        }
    }

    fn unsigned(&mut self, capacity: usize) -> Result<u64, RlpError> {
        let payload = self.string_payload()?;
        if payload.len() > capacity {
            return Err(RlpError::PayloadTooWide {
                width: payload.len(),
                capacity,
            });
        }
        reject_leading_zero(payload)?;
        Ok(payload
            .iter()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
    }

    fn read_byte(&mut self) -> Result<u8, RlpError> {
        let byte = *self.data.get(self.position).ok_or(RlpError::UnexpectedEof {
            available: 0,
            requested: 1,
        })?;
        self.position += 1;
        Ok(byte)
    }

    fn read(&mut self, count: usize) -> Result<&'a [u8], RlpError> {
        let available = self.remaining();
        if available < count {
            return Err(RlpError::UnexpectedEof {
                available,
                requested: count,
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    /// Reads the length field of a long string or long list.
    fn read_long_length(&mut self, length_of_length: usize) -> Result<usize, RlpError> {
        if length_of_length > std::mem::size_of::<usize>() {
            return Err(RlpError::LengthOverflow(length_of_length));
        }
        let bytes = self.read(length_of_length)?;
        if bytes.first() == Some(&0) {
            return Err(RlpError::NonCanonical("length field with a leading zero"));
        }
        let length = bytes
            .iter()
            .fold(0usize, |acc, byte| (acc << 8) | usize::from(*byte));
        if length < SIZE_THRESHOLD {
            return Err(RlpError::NonCanonical("long form for a payload under 56 bytes"));
        }
        Ok(length)
    }
}

fn reject_leading_zero(payload: &[u8]) -> Result<(), RlpError> {
    match payload.first() {
        Some(0) => Err(RlpError::NonCanonical("integer with a leading zero byte")),
        _ => Ok(()),
    }
}
