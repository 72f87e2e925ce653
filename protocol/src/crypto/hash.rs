//! # Hashing Utilities
//!
//! The hash functions the wallet core actually needs, and not one more:
//!
//! - **Keccak-256** — the domain hash. Signing digests, transaction hashes
//!   and addresses all go through it. Note: this is the original Keccak
//!   padding Ethereum froze in 2015, *not* FIPS-202 SHA3-256. The two
//!   produce different digests for the same input.
//! - **Keccak-512** — the 512-bit sibling, for callers that need a wider
//!   digest under the same construction.
//! - **SHA-256** — only inside ECIES, where the KDF and the MAC are
//!   specified over it.
//!
//! Components that hash take a [`DomainHash`] so the hash can be swapped in
//! tests or for a different protocol profile without touching the signer.

use sha2::Sha256;
use sha3::{Digest, Keccak256, Keccak512};

/// Keccak-256 of the input.
///
/// # Example
///
/// ```
/// use vellum_protocol::crypto::hash::keccak256;
///
/// assert_eq!(
///     hex::encode(keccak256(b"")),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Keccak-256 over the concatenation of several inputs, without allocating
/// the concatenation.
pub fn keccak256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Keccak-512 of the input.
pub fn keccak512(data: &[u8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Keccak512::digest(data));
    out
}

/// SHA-256 of the input.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// The protocol's 256-bit domain hash, as an injectable capability.
///
/// Implementations must be deterministic and thread-safe; the signer and
/// key generator call them from `&self`.
pub trait DomainHash: Send + Sync {
    fn hash256(&self, data: &[u8]) -> [u8; 32];
}

/// Keccak-256, the default domain hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak;

impl DomainHash for Keccak {
    fn hash256(&self, data: &[u8]) -> [u8; 32] {
        keccak256(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
    }

    #[test]
    fn keccak256_is_not_sha3() {
        // FIPS-202 SHA3-256("") starts with a7ffc6f8. Keccak-256("") does not.
        assert!(!hex::encode(keccak256(b"")).starts_with("a7ffc6f8"));
    }

    #[test]
    fn keccak512_known_vector() {
        assert_eq!(
            hex::encode(keccak512(b"")),
            "0eab42de4c3ceb9235fc91acffe746b29c29a8c366b7c60e4e67c466f36a4304\
             c00fa9caf9d87976ba469bcbe06713b435f091ef2769fb160cdab33d3670680e"
        );
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn multi_matches_concatenation() {
        let joined = keccak256(b"hello world");
        let parts = keccak256_multi(&[b"hello", b" ", b"world"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn domain_hash_default_is_keccak() {
        assert_eq!(Keccak.hash256(b"vellum"), keccak256(b"vellum"));
    }
}
