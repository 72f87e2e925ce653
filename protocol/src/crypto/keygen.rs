//! # Key Generation and Address Derivation
//!
//! Fresh key pairs from a cryptographically secure source, public keys from
//! private ones, and 20-byte addresses from public keys.
//!
//! The random source is injected. Production code uses [`KeyGenerator::new`],
//! which draws from the OS; tests hand in a seeded RNG through
//! [`KeyGenerator::with_rng`] to get reproducible keys. The RNG sits behind a
//! mutex so one generator can be shared across threads without two callers
//! ever observing the same stream position.

use k256::SecretKey;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use super::hash::{DomainHash, Keccak};
use super::keys::{KeyPair, PrivateKey, PublicKey};
use crate::address::Address;

/// Generates key pairs and derives public keys and addresses.
pub struct KeyGenerator<R = OsRng, H = Keccak> {
    rng: Mutex<R>,
    hasher: H,
}

impl KeyGenerator {
    /// A generator backed by the operating system's CSPRNG.
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeyGenerator<R> {
    /// A generator backed by `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            hasher: Keccak,
        }
    }
}

impl<R: RngCore + CryptoRng, H: DomainHash> KeyGenerator<R, H> {
    /// A generator with a custom address hash.
    pub fn with_hasher(rng: R, hasher: H) -> Self {
        Self {
            rng: Mutex::new(rng),
            hasher,
        }
    }

    /// Draws a uniformly random scalar in `[1, N-1]` and returns it with its
    /// compressed public key.
    pub fn generate_key_pair(&self) -> KeyPair {
        // SecretKey::random rejection-samples, so 0 and >= N never escape.
        let secret = {
            let mut rng = self.rng.lock();
            SecretKey::random(&mut *rng)
        };
        let pair = KeyPair::from_private_key(PrivateKey::from_secret_key(secret));
        debug!(public_key = %pair.public_key(), "generated key pair");
        pair
    }

    /// `priv · G`, compressed.
    pub fn derive_public_key(&self, private_key: &PrivateKey) -> PublicKey {
        KeyPair::from_private_key(private_key.clone())
            .public_key()
            .clone()
    }

    /// The rightmost 20 bytes of the domain hash of the uncompressed point,
    /// tag byte excluded.
    ///
    /// Both encodings of a point yield the same address.
    pub fn compute_address(&self, public_key: &PublicKey) -> Address {
        Address::from_public_key_with(&self.hasher, public_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curve::SECP256K1;
    use primitive_types::U256;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_keys_are_in_range_and_compressed() {
        let generator = KeyGenerator::new();
        for _ in 0..8 {
            let pair = generator.generate_key_pair();
            assert!(SECP256K1.is_valid_scalar(&pair.private_key().to_u256()));
            assert!(pair.public_key().is_compressed());
        }
    }

    #[test]
    fn generated_keys_differ() {
        let generator = KeyGenerator::new();
        let a = generator.generate_key_pair();
        let b = generator.generate_key_pair();
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_generator_is_reproducible() {
        let a = KeyGenerator::with_rng(StdRng::seed_from_u64(7)).generate_key_pair();
        let b = KeyGenerator::with_rng(StdRng::seed_from_u64(7)).generate_key_pair();
        assert_eq!(a, b);
        assert_eq!(a.private_key(), b.private_key());
    }

    #[test]
    fn derived_public_key_matches_pair() {
        let generator = KeyGenerator::new();
        let pair = generator.generate_key_pair();
        assert_eq!(
            &generator.derive_public_key(pair.private_key()),
            pair.public_key()
        );
    }

    #[test]
    fn address_of_known_key() {
        let generator = KeyGenerator::new();
        let key = PrivateKey::from_hex(
            "4646464646464646464646464646464646464646464646464646464646464646",
        )
        .unwrap();
        let public_key = generator.derive_public_key(&key);
        assert_eq!(
            generator.compute_address(&public_key).to_string(),
            "9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f"
        );
    }

    #[test]
    fn address_of_scalar_one() {
        let generator = KeyGenerator::new();
        let key = PrivateKey::from_u256(U256::one()).unwrap();
        let public_key = generator.derive_public_key(&key);
        assert_eq!(
            generator.compute_address(&public_key).to_string(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn address_ignores_point_encoding() {
        let generator = KeyGenerator::new();
        let pair = generator.generate_key_pair();
        let compressed = pair.public_key();
        let uncompressed = compressed.to_uncompressed();
        assert_eq!(
            generator.compute_address(compressed),
            generator.compute_address(&uncompressed)
        );
    }

    #[test]
    fn shared_generator_across_threads() {
        let generator = KeyGenerator::new();
        let keys: Vec<PublicKey> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..4)
                            .map(|_| generator.generate_key_pair().public_key().clone())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let distinct: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(keys.len(), 32);
        assert_eq!(distinct.len(), keys.len());
    }
}
