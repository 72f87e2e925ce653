//! # Key Material
//!
//! secp256k1 private keys, public keys and the key pair that binds them.
//!
//! All three are validated at construction and immutable afterwards. If you
//! are holding one, it is well-formed: a private key is a scalar in
//! `[1, N-1]`, a public key is a point on the curve, and a key pair's halves
//! belong together.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, `k256::SecretKey`).
//! - `Debug` on anything holding a private key prints the public half only.
//! - Key bytes are never logged. Public keys and addresses may be.

use std::fmt;
use std::hash::{Hash, Hasher};

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{
    COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

/// Errors that can occur while constructing keys.
///
/// Deliberately vague about *why* a scalar was rejected. "Zero" versus
/// "above the order" is nobody's business.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid private key length: expected {PRIVATE_KEY_LENGTH} bytes, got {0}")]
    InvalidPrivateKeyLength(usize),

    #[error("invalid private key: not a scalar in [1, N-1]")]
    InvalidPrivateKey,

    #[error("invalid public key length: expected 33 or 65 bytes, got {0}")]
    InvalidPublicKeyLength(usize),

    #[error("invalid public key: not a point on secp256k1")]
    InvalidPublicKey,

    #[error("invalid key encoding: {0}")]
    InvalidEncoding(String),

    #[error("key pair validation failed: public key does not match private key")]
    KeypairMismatch,
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// A secp256k1 private scalar.
///
/// Never serialized by this crate. Exporting one is an explicit call to
/// [`to_bytes`](Self::to_bytes) or [`to_hex`](Self::to_hex).
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    inner: SecretKey,
}

impl PrivateKey {
    /// Creates a private key from exactly 32 big-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(KeyError::InvalidPrivateKeyLength(bytes.len()));
        }
        let inner = SecretKey::from_slice(bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self { inner })
    }

    /// Creates a private key from an integer.
    pub fn from_u256(value: U256) -> Result<Self, KeyError> {
        let mut be = [0u8; PRIVATE_KEY_LENGTH];
        value.to_big_endian(&mut be);
        Self::from_bytes(&be)
    }

    /// Parses a hex string, with or without `0x`. Short inputs are treated as
    /// big-endian integers and left-padded.
    pub fn from_hex(value: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(strip_hex_prefix(value))
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        if bytes.len() > PRIVATE_KEY_LENGTH {
            return Err(KeyError::InvalidPrivateKeyLength(bytes.len()));
        }
        Self::from_u256(U256::from_big_endian(&bytes))
    }

    /// Parses a decimal string.
    pub fn from_decimal(value: &str) -> Result<Self, KeyError> {
        let scalar =
            U256::from_dec_str(value).map_err(|e| KeyError::InvalidEncoding(format!("{:?}", e)))?;
        Self::from_u256(scalar)
    }

    /// Exports the raw 32-byte scalar.
    ///
    /// **Handle with care.** Anyone holding these bytes can sign as you.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        self.inner.to_bytes().into()
    }

    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.to_bytes())
    }

    /// Hex export of the scalar. Same warnings as [`to_bytes`](Self::to_bytes).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub(crate) fn from_secret_key(inner: SecretKey) -> Self {
        Self { inner }
    }

    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.inner
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// An encoded secp256k1 point, compressed (33 bytes) or uncompressed (65).
///
/// Equality and hashing are by the raw encoding: the compressed and the
/// uncompressed form of the same point are different `PublicKey`s. Use
/// [`to_uncompressed`](Self::to_uncompressed) to compare points.
#[derive(Clone)]
pub struct PublicKey {
    bytes: Vec<u8>,
    point: k256::PublicKey,
}

impl PublicKey {
    /// Parses a SEC1-encoded point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LENGTH
            && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH
        {
            return Err(KeyError::InvalidPublicKeyLength(bytes.len()));
        }
        let point =
            k256::PublicKey::from_sec1_bytes(bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self {
            bytes: bytes.to_vec(),
            point,
        })
    }

    /// Parses a hex-encoded SEC1 point, with or without `0x`.
    pub fn from_hex(value: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(strip_hex_prefix(value))
            .map_err(|e| KeyError::InvalidEncoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn from_point(point: k256::PublicKey, compress: bool) -> Self {
        Self {
            bytes: point.to_encoded_point(compress).as_bytes().to_vec(),
            point,
        }
    }

    /// The encoding this key was created with.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_compressed(&self) -> bool {
        self.bytes.len() == COMPRESSED_PUBLIC_KEY_LENGTH
    }

    /// The same point in 33-byte form.
    pub fn to_compressed(&self) -> Self {
        Self::from_point(self.point, true)
    }

    /// The same point in 65-byte form.
    pub fn to_uncompressed(&self) -> Self {
        Self::from_point(self.point, false)
    }

    /// `0x04 || x || y`.
    pub fn uncompressed_bytes(&self) -> [u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; UNCOMPRESSED_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(self.point.to_encoded_point(false).as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub(crate) fn point(&self) -> &k256::PublicKey {
        &self.point
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A private key and its public key. Both halves, always.
#[derive(Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Binds a private key to a public key, checking that they match.
    ///
    /// The public key may be in either encoding; it is kept as given.
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self, KeyError> {
        let derived = private_key.secret_key().public_key();
        if &derived != public_key.point() {
            return Err(KeyError::KeypairMismatch);
        }
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Derives the compressed public key from `private_key`.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = PublicKey::from_point(private_key.secret_key().public_key(), true);
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

impl PartialEq for KeyPair {
    /// Two key pairs are equal if their public keys match.
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public_key.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::SECP256K1;

    const SECRET_46: &str = "4646464646464646464646464646464646464646464646464646464646464646";

    #[test]
    fn private_key_from_hex_and_back() {
        let key = PrivateKey::from_hex(SECRET_46).unwrap();
        assert_eq!(key.to_hex(), SECRET_46);
        assert_eq!(PrivateKey::from_hex(&format!("0x{}", SECRET_46)).unwrap(), key);
    }

    #[test]
    fn private_key_from_decimal() {
        let key = PrivateKey::from_decimal("1").unwrap();
        assert_eq!(key.to_u256(), U256::one());
        assert!(PrivateKey::from_decimal("not a number").is_err());
    }

    #[test]
    fn short_hex_is_left_padded() {
        let key = PrivateKey::from_hex("01").unwrap();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(key.to_bytes(), expected);
    }

    #[test]
    fn private_key_range_is_enforced() {
        assert_eq!(
            PrivateKey::from_bytes(&[0u8; 32]).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
        let n = SECP256K1.group_order();
        assert_eq!(
            PrivateKey::from_u256(n).unwrap_err(),
            KeyError::InvalidPrivateKey
        );
        assert!(PrivateKey::from_u256(n - U256::one()).is_ok());
    }

    #[test]
    fn private_key_length_is_enforced() {
        assert_eq!(
            PrivateKey::from_bytes(&[1u8; 31]).unwrap_err(),
            KeyError::InvalidPrivateKeyLength(31)
        );
        assert_eq!(
            PrivateKey::from_hex(&"01".repeat(33)).unwrap_err(),
            KeyError::InvalidPrivateKeyLength(33)
        );
    }

    #[test]
    fn debug_never_prints_the_secret() {
        let key = PrivateKey::from_hex(SECRET_46).unwrap();
        let printed = format!("{:?}", key);
        assert!(!printed.contains("4646"));

        let pair = KeyPair::from_private_key(key);
        assert!(!format!("{:?}", pair).contains(SECRET_46));
    }

    #[test]
    fn public_key_encodings() {
        let pair = KeyPair::from_private_key(PrivateKey::from_hex(SECRET_46).unwrap());
        let compressed = pair.public_key().clone();
        assert!(compressed.is_compressed());
        assert_eq!(compressed.as_bytes().len(), 33);

        let uncompressed = compressed.to_uncompressed();
        assert!(!uncompressed.is_compressed());
        assert_eq!(uncompressed.as_bytes()[0], 0x04);
        assert_eq!(uncompressed.as_bytes(), &compressed.uncompressed_bytes()[..]);

        // Same point, different encodings, different keys.
        assert_ne!(compressed, uncompressed);
        assert_eq!(uncompressed.to_compressed(), compressed);
    }

    #[test]
    fn public_key_rejects_garbage() {
        assert_eq!(
            PublicKey::from_bytes(&[0x02; 10]).unwrap_err(),
            KeyError::InvalidPublicKeyLength(10)
        );
        // Right length, but 0x05 is not a SEC1 tag.
        let mut bogus = [0u8; 33];
        bogus[0] = 0x05;
        assert_eq!(
            PublicKey::from_bytes(&bogus).unwrap_err(),
            KeyError::InvalidPublicKey
        );
        assert!(matches!(
            PublicKey::from_hex("zz"),
            Err(KeyError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn public_key_generator_for_scalar_one() {
        let pair = KeyPair::from_private_key(PrivateKey::from_u256(U256::one()).unwrap());
        assert_eq!(pair.public_key().as_bytes(), &SECP256K1.generator_encoded(true)[..]);
    }

    #[test]
    fn keypair_validates_halves() {
        let a = PrivateKey::from_hex(SECRET_46).unwrap();
        let b = PrivateKey::from_u256(U256::from(7u8)).unwrap();
        let a_pub = KeyPair::from_private_key(a.clone()).public_key().clone();

        assert!(KeyPair::new(a.clone(), a_pub.clone()).is_ok());
        assert!(KeyPair::new(a, a_pub.to_uncompressed()).is_ok());
        assert_eq!(
            KeyPair::new(b, a_pub).unwrap_err(),
            KeyError::KeypairMismatch
        );
    }

    #[test]
    fn public_key_serde_roundtrip() {
        let pair = KeyPair::from_private_key(PrivateKey::from_hex(SECRET_46).unwrap());
        let json = serde_json::to_string(pair.public_key()).unwrap();
        assert_eq!(json, format!("\"{}\"", pair.public_key().to_hex()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, pair.public_key());

        assert!(serde_json::from_str::<PublicKey>("\"0000\"").is_err());
    }
}
