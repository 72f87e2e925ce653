//! Account addresses: the rightmost 20 bytes of the Keccak-256 hash of an
//! uncompressed public key (tag byte excluded).
//!
//! The textual form is lowercase hex with no `0x` prefix. Parsing accepts
//! either case and an optional prefix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;
use crate::crypto::hash::{DomainHash, Keccak};
use crate::crypto::keys::PublicKey;
use crate::rlp::{Decodable, Encodable, RlpDecoder, RlpEncoder, RlpError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid address length: expected {ADDRESS_LENGTH} bytes, got {0}")]
    InvalidLength(usize),

    #[error("invalid address hex: {0}")]
    InvalidHex(String),
}

/// A 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copies exactly 20 bytes out of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; ADDRESS_LENGTH] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn from_hex(value: &str) -> Result<Self, AddressError> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .unwrap_or(value);
        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// The Keccak-256 address of `public_key`, in either encoding.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_public_key_with(&Keccak, public_key)
    }

    /// Same as [`from_public_key`](Self::from_public_key) under another
    /// domain hash.
    pub fn from_public_key_with<H: DomainHash + ?Sized>(hasher: &H, public_key: &PublicKey) -> Self {
        let uncompressed = public_key.uncompressed_bytes();
        let digest = hasher.hash256(&uncompressed[1..]);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Encodable for Address {
    fn rlp_encode(&self, encoder: &mut RlpEncoder) {
        encoder.encode_bytes(&self.0);
    }
}

impl Decodable for Address {
    fn rlp_decode(decoder: &mut RlpDecoder<'_>) -> Result<Self, RlpError> {
        decoder.decode_array::<ADDRESS_LENGTH>().map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::{KeyPair, PrivateKey};

    #[test]
    fn display_is_lowercase_hex_without_prefix() {
        let address = Address::new([0xAB; 20]);
        assert_eq!(address.to_string(), "ab".repeat(20));
    }

    #[test]
    fn parse_accepts_prefix_and_mixed_case() {
        let expected = Address::new([0xAB; 20]);
        assert_eq!(Address::from_hex(&"AB".repeat(20)).unwrap(), expected);
        assert_eq!(
            format!("0x{}", "ab".repeat(20)).parse::<Address>().unwrap(),
            expected
        );
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert_eq!(
            Address::from_slice(&[0u8; 19]).unwrap_err(),
            AddressError::InvalidLength(19)
        );
        assert_eq!(
            Address::from_hex(&"00".repeat(21)).unwrap_err(),
            AddressError::InvalidLength(21)
        );
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn derived_from_known_key() {
        let key = PrivateKey::from_hex(
            "4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let pair = KeyPair::from_private_key(key);
        assert_eq!(
            Address::from_public_key(pair.public_key()).to_string(),
            "9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
    }

    #[test]
    fn rlp_form_is_a_20_byte_string() {
        let address = Address::new([0x35; 20]);
        let encoded = address.rlp_bytes();
        assert_eq!(encoded[0], 0x80 + 20);
        assert_eq!(&encoded[1..], &[0x35; 20]);

        let mut decoder = RlpDecoder::new(&encoded);
        assert_eq!(decoder.decode_object::<Address>().unwrap(), address);
        assert!(decoder.is_finished());
    }

    #[test]
    fn rlp_rejects_short_string() {
        let mut encoder = RlpEncoder::new();
        encoder.encode_bytes(&[0x35; 19]);
        let bytes = encoder.into_bytes();
        let mut decoder = RlpDecoder::new(&bytes);
        assert_eq!(
            decoder.decode_object::<Address>().unwrap_err(),
            RlpError::UnexpectedLength {
                expected: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn serde_as_hex_string() {
        let address = Address::new([0x01; 20]);
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(20)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
