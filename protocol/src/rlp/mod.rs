//! # Recursive Length Prefix
//!
//! The byte-exact codec every transaction goes through. RLP knows exactly two
//! things: byte strings and lists of items. Integers are byte strings with
//! the leading zeros stripped, and everything else is the caller's problem.
//!
//! ```text
//! encoder.rs — RlpEncoder: one growable buffer, one item at a time
//! decoder.rs — RlpDecoder: a borrowed buffer and a cursor
//! ```
//!
//! ## Wire format
//!
//! | Lead byte   | Meaning                                           |
//! |-------------|---------------------------------------------------|
//! | `0x00-0x7F` | the byte is its own encoding                      |
//! | `0x80`      | empty string (and the integer zero)               |
//! | `0x81-0xB7` | string of `lead - 0x80` bytes                     |
//! | `0xB8-0xBF` | string, `lead - 0xB7` bytes of big-endian length  |
//! | `0xC0-0xF7` | list payload of `lead - 0xC0` bytes               |
//! | `0xF8-0xFF` | list, `lead - 0xF7` bytes of big-endian length    |
//!
//! Lists are not decoded into a tree. [`RlpDecoder::decode_list`] hands back
//! the raw payload and the caller walks it field by field with a fresh
//! decoder, which is how [`crate::transaction`] reads its nine fields.
//!
//! Encoders and decoders carry a buffer/cursor and are meant for a single
//! pass. Create one per operation; don't share them between threads.

pub mod decoder;
pub mod encoder;

use thiserror::Error;

pub use decoder::RlpDecoder;
pub use encoder::RlpEncoder;

/// First lead byte of a string item. Also the encoding of the empty string.
pub const OFFSET_SHORT_ITEM: u8 = 0x80;

/// Lead byte base for strings whose length needs its own length field.
pub const OFFSET_LONG_ITEM: u8 = 0xB7;

/// First lead byte of a list item. Also the encoding of the empty list.
pub const OFFSET_SHORT_LIST: u8 = 0xC0;

/// Lead byte base for lists whose length needs its own length field.
pub const OFFSET_LONG_LIST: u8 = 0xF7;

/// Payloads shorter than this get their length folded into the lead byte.
pub const SIZE_THRESHOLD: usize = 56;

/// Errors raised while decoding RLP.
///
/// Every bounds failure carries what was asked for and what was left, so a
/// truncated transaction can be diagnosed from the error alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RlpError {
    #[error("end of input reached: {available} bytes available, {requested} requested")]
    UnexpectedEof { available: usize, requested: usize },

    #[error("expected a string item, found list prefix 0x{lead:02x}")]
    UnexpectedList { lead: u8 },

    #[error("expected a list item, found string prefix 0x{lead:02x}")]
    UnexpectedString { lead: u8 },

    #[error("payload of {width} bytes does not fit a {capacity}-byte integer")]
    PayloadTooWide { width: usize, capacity: usize },

    #[error("length field of {0} bytes exceeds the addressable range")]
    LengthOverflow(usize),

    #[error("expected a {expected}-byte string, found {actual} bytes")]
    UnexpectedLength { expected: usize, actual: usize },

    #[error("{0} trailing bytes after the last item")]
    TrailingBytes(usize),

    #[error("string item is not valid UTF-8")]
    InvalidUtf8,

    /// The item decodes, but not from its one canonical encoding.
    #[error("non-canonical encoding: {0}")]
    NonCanonical(&'static str),
}

/// The six classes a lead byte can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// `0x00-0x7F`: a single byte that encodes itself.
    SingleByte,
    /// `0x80`: the empty string.
    Empty,
    /// `0x81-0xB7`: a string of 1 to 55 bytes.
    ShortString,
    /// `0xB8-0xBF`: a string of 56 bytes or more.
    LongString,
    /// `0xC0-0xF7`: a list whose payload is at most 55 bytes.
    ShortList,
    /// `0xF8-0xFF`: a list whose payload is 56 bytes or more.
    LongList,
}

impl ItemKind {
    /// Classifies a lead byte.
    pub fn classify(lead: u8) -> Self {
        match lead {
            0x00..=0x7F => Self::SingleByte,
            0x80 => Self::Empty,
            0x81..=0xB7 => Self::ShortString,
            0xB8..=0xBF => Self::LongString,
            0xC0..=0xF7 => Self::ShortList,
            0xF8..=0xFF => Self::LongList,
        }
    }

    /// Returns `true` for the two list classes.
    pub fn is_list(self) -> bool {
        matches!(self, Self::ShortList | Self::LongList)
    }
}

/// A value with a fixed RLP representation.
pub trait Encodable {
    /// Appends this value's encoding to `encoder`.
    fn rlp_encode(&self, encoder: &mut RlpEncoder);

    /// Encodes this value on its own.
    fn rlp_bytes(&self) -> Vec<u8> {
        let mut encoder = RlpEncoder::new();
        self.rlp_encode(&mut encoder);
        encoder.into_bytes()
    }
}

/// A value that can be read back from the next item of a decoder.
pub trait Decodable: Sized {
    /// Consumes exactly one item from `decoder`.
    fn rlp_decode(decoder: &mut RlpDecoder<'_>) -> Result<Self, RlpError>;
}
