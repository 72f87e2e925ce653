//! RLP encoding into a growable buffer.
//!
//! Integers of every width funnel through the same path: big-endian bytes,
//! leading zeros stripped, then encoded as a byte string. That single rule is
//! what makes `decode(encode(x)) == x` hold at every boundary, and it is why
//! zero encodes as the empty string `0x80` rather than `0x00`.

use primitive_types::U256;

use super::{Encodable, OFFSET_LONG_ITEM, OFFSET_LONG_LIST, OFFSET_SHORT_ITEM, OFFSET_SHORT_LIST, SIZE_THRESHOLD};

/// Single-pass RLP encoder.
///
/// # Example
///
/// ```
/// use vellum_protocol::rlp::RlpEncoder;
///
/// let mut encoder = RlpEncoder::new();
/// encoder.encode_u64(1024);
/// assert_eq!(encoder.as_bytes(), &[0x82, 0x04, 0x00]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RlpEncoder {
    output: Vec<u8>,
}

impl RlpEncoder {
    /// Creates an empty encoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
        }
    }

    /// Everything encoded so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.output
    }

    /// Consumes the encoder and returns its buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }

    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn encode_u8(&mut self, value: u8) {
        self.encode_unsigned(&[value]);
    }

    pub fn encode_u16(&mut self, value: u16) {
        self.encode_unsigned(&value.to_be_bytes());
    }

    pub fn encode_u32(&mut self, value: u32) {
        self.encode_unsigned(&value.to_be_bytes());
    }

    pub fn encode_u64(&mut self, value: u64) {
        self.encode_unsigned(&value.to_be_bytes());
    }

    /// Encodes a 256-bit unsigned integer (amounts, gas, signature scalars).
    pub fn encode_u256(&mut self, value: U256) {
        let mut be = [0u8; 32];
        value.to_big_endian(&mut be);
        self.encode_unsigned(&be);
    }

    /// Encodes a byte string.
    ///
    /// A lone byte below `0x80` is written bare; anything else gets a prefix.
    pub fn encode_bytes(&mut self, bytes: &[u8]) {
        if bytes.len() == 1 && bytes[0] < OFFSET_SHORT_ITEM {
            self.output.push(bytes[0]);
            return;
        }
        self.write_prefix(bytes.len(), OFFSET_SHORT_ITEM, OFFSET_LONG_ITEM);
        self.output.extend_from_slice(bytes);
    }

    /// Encodes a UTF-8 string as its bytes.
    pub fn encode_str(&mut self, value: &str) {
        self.encode_bytes(value.as_bytes());
    }

    /// Wraps an already-encoded sequence of items in a list prefix.
    pub fn encode_list(&mut self, payload: &[u8]) {
        self.write_prefix(payload.len(), OFFSET_SHORT_LIST, OFFSET_LONG_LIST);
        self.output.extend_from_slice(payload);
    }

    /// Encodes a list whose items are written by `items` into a scratch encoder.
    pub fn encode_list_with<F>(&mut self, items: F)
    where
        F: FnOnce(&mut RlpEncoder),
    {
        let mut inner = RlpEncoder::new();
        items(&mut inner);
        self.encode_list(inner.as_bytes());
    }

    pub fn encode_object<T: Encodable + ?Sized>(&mut self, object: &T) {
        object.rlp_encode(self);
    }

    /// Appends bytes that are already valid RLP, verbatim.
    pub fn encode_raw(&mut self, encoded: &[u8]) {
        self.output.extend_from_slice(encoded);
    }

    fn encode_unsigned(&mut self, big_endian: &[u8]) {
        let start = big_endian
            .iter()
            .position(|b| *b != 0)
            .unwrap_or(big_endian.len());
        self.encode_bytes(&big_endian[start..]);
    }

    fn write_prefix(&mut self, length: usize, short_offset: u8, long_offset: u8) {
        if length < SIZE_THRESHOLD {
            self.output.push(short_offset + length as u8);
            return;
        }
        let be = (length as u64).to_be_bytes();
        let start = be.iter().position(|b| *b != 0).unwrap_or(be.len() - 1);
        let length_of_length = be.len() - start;
        self.output.push(long_offset + length_of_length as u8);
        self.output.extend_from_slice(&be[start..]);
    }
}
