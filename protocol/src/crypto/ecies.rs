//! # ECIES Hybrid Encryption
//!
//! Authenticated public-key encryption between two secp256k1 key pairs.
//!
//! ## Construction
//!
//! - **Agreement:** ECDH, `Z = x(sender_priv · recipient_pub)`.
//! - **KDF:** NIST SP 800-56 concatenation KDF over SHA-256, one round:
//!   `km = SHA256(00000001 ‖ Z)`. The first 16 bytes are the AES key, the
//!   last 16 are hashed once more with SHA-256 to form the MAC key.
//! - **Cipher:** AES-128 in CTR mode under a fresh random 16-byte IV.
//! - **MAC:** HMAC-SHA256 over `IV ‖ ciphertext`.
//!
//! ## Wire format
//!
//! ```text
//! +-------------------+----------+----------------+-----------+
//! | sender pub (65 B) | IV (16B) | ciphertext (n) | tag (32B) |
//! +-------------------+----------+----------------+-----------+
//! ```
//!
//! The embedded point is the sender's uncompressed public key, which is all
//! the recipient needs to redo the agreement. With [`BlockCipher::encrypt_ephemeral`]
//! it is a throwaway key and the sender stays anonymous.
//!
//! ## Decryption fails closed
//!
//! The tag is checked, in constant time, before a single byte is decrypted.
//! Wrong key, flipped bit, truncated blob: all of them return an error and
//! no plaintext. There is no partial output.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use ctr::Ctr128BE;
use hmac::{Hmac, Mac};
use k256::ecdh::diffie_hellman;
use k256::SecretKey;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use super::hash::sha256;
use super::keys::{PrivateKey, PublicKey};
use crate::config::{
    ECIES_CIPHER_KEY_LENGTH, ECIES_IV_LENGTH, ECIES_MAC_KEY_LENGTH, ECIES_OVERHEAD,
    ECIES_TAG_LENGTH, UNCOMPRESSED_POINT_TAG, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

type Aes128Ctr = Ctr128BE<Aes128>;
type HmacSha256 = Hmac<Sha256>;

/// Errors from ECIES encryption and decryption.
///
/// `MacMismatch` covers both "wrong key" and "tampered ciphertext". Telling
/// them apart is not possible, and wouldn't be wise if it were.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EciesError {
    #[error("ciphertext too short: {available} bytes available, at least {required} required")]
    CiphertextTooShort { available: usize, required: usize },

    #[error("embedded public key is not a valid uncompressed secp256k1 point")]
    InvalidEmbeddedKey,

    #[error("authentication failed: wrong key or corrupted ciphertext")]
    MacMismatch,

    #[error("cipher initialization failed")]
    CipherInit,
}

struct DerivedKeys {
    cipher_key: Zeroizing<[u8; ECIES_CIPHER_KEY_LENGTH]>,
    mac_key: Zeroizing<[u8; 32]>,
}

/// ECIES encryptor/decryptor with an injected random source for IVs and
/// ephemeral keys.
pub struct BlockCipher<R = OsRng> {
    rng: Mutex<R>,
}

impl BlockCipher {
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for BlockCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> BlockCipher<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Encrypts `plaintext` from `sender` to `recipient`.
    ///
    /// Output is `sender_pub ‖ IV ‖ ciphertext ‖ tag`, exactly
    /// `plaintext.len() + ECIES_OVERHEAD` bytes.
    pub fn encrypt(
        &self,
        sender: &PrivateKey,
        recipient: &PublicKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EciesError> {
        let mut iv = [0u8; ECIES_IV_LENGTH];
        self.rng.lock().fill_bytes(&mut iv);
        seal(sender.secret_key(), recipient, &iv, plaintext)
    }

    /// Encrypts under a freshly generated key pair that is discarded
    /// afterwards.
    pub fn encrypt_ephemeral(
        &self,
        recipient: &PublicKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, EciesError> {
        let mut iv = [0u8; ECIES_IV_LENGTH];
        let ephemeral = {
            let mut rng = self.rng.lock();
            rng.fill_bytes(&mut iv);
            SecretKey::random(&mut *rng)
        };
        seal(&ephemeral, recipient, &iv, plaintext)
    }

    /// Authenticates and decrypts a blob produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, recipient: &PrivateKey, blob: &[u8]) -> Result<Vec<u8>, EciesError> {
        if blob.len() < ECIES_OVERHEAD {
            return Err(EciesError::CiphertextTooShort {
                available: blob.len(),
                required: ECIES_OVERHEAD,
            });
        }

        let (embedded, rest) = blob.split_at(UNCOMPRESSED_PUBLIC_KEY_LENGTH);
        let (iv, rest) = rest.split_at(ECIES_IV_LENGTH);
        let (ciphertext, tag) = rest.split_at(rest.len() - ECIES_TAG_LENGTH);

        if embedded[0] != UNCOMPRESSED_POINT_TAG {
            return Err(EciesError::InvalidEmbeddedKey);
        }
        let sender =
            PublicKey::from_bytes(embedded).map_err(|_| EciesError::InvalidEmbeddedKey)?;
        let keys = derive_keys(recipient.secret_key(), &sender);

        let mac = mac_over(&keys, iv, ciphertext)?;
        if mac.verify_slice(tag).is_err() {
            debug!(len = blob.len(), "ecies tag mismatch");
            return Err(EciesError::MacMismatch);
        }

        let mut plaintext = ciphertext.to_vec();
        apply_keystream(&keys, iv, &mut plaintext)?;
        Ok(plaintext)
    }
}

fn seal(
    sender: &SecretKey,
    recipient: &PublicKey,
    iv: &[u8; ECIES_IV_LENGTH],
    plaintext: &[u8],
) -> Result<Vec<u8>, EciesError> {
    let keys = derive_keys(sender, recipient);

    let mut ciphertext = plaintext.to_vec();
    apply_keystream(&keys, iv, &mut ciphertext)?;
    let tag = mac_over(&keys, iv, &ciphertext)?.finalize().into_bytes();

    let sender_public = PublicKey::from_point(sender.public_key(), false);
    let mut out = Vec::with_capacity(plaintext.len() + ECIES_OVERHEAD);
    out.extend_from_slice(sender_public.as_bytes());
    out.extend_from_slice(iv);
    out.extend_from_slice(&ciphertext);
    out.extend_from_slice(&tag);
    Ok(out)
}

fn derive_keys(own: &SecretKey, peer: &PublicKey) -> DerivedKeys {
    let shared = diffie_hellman(own.to_nonzero_scalar(), peer.point().as_affine());

    let mut kdf = Sha256::new();
    kdf.update(1u32.to_be_bytes());
    kdf.update(shared.raw_secret_bytes());
    let km: Zeroizing<[u8; 32]> = Zeroizing::new(kdf.finalize().into());

    let mut cipher_key = Zeroizing::new([0u8; ECIES_CIPHER_KEY_LENGTH]);
    cipher_key.copy_from_slice(&km[..ECIES_CIPHER_KEY_LENGTH]);
    let mac_key = Zeroizing::new(sha256(
        &km[ECIES_CIPHER_KEY_LENGTH..ECIES_CIPHER_KEY_LENGTH + ECIES_MAC_KEY_LENGTH],
    ));

    DerivedKeys {
        cipher_key,
        mac_key,
    }
}

fn apply_keystream(keys: &DerivedKeys, iv: &[u8], buffer: &mut [u8]) -> Result<(), EciesError> {
    let mut cipher = Aes128Ctr::new_from_slices(keys.cipher_key.as_slice(), iv)
        .map_err(|_| EciesError::CipherInit)?;
    cipher.apply_keystream(buffer);
    Ok(())
}

fn mac_over(keys: &DerivedKeys, iv: &[u8], ciphertext: &[u8]) -> Result<HmacSha256, EciesError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(keys.mac_key.as_slice())
        .map_err(|_| EciesError::CipherInit)?;
    mac.update(iv);
    mac.update(ciphertext);
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keygen::KeyGenerator;
    use crate::crypto::keys::KeyPair;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parties() -> (KeyPair, KeyPair) {
        let generator = KeyGenerator::new();
        (generator.generate_key_pair(), generator.generate_key_pair())
    }

    #[test]
    fn round_trip() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();
        let message = b"the eagle lands at dawn";

        let blob = cipher
            .encrypt(alice.private_key(), bob.public_key(), message)
            .unwrap();
        assert_eq!(blob.len(), message.len() + ECIES_OVERHEAD);
        assert_eq!(cipher.decrypt(bob.private_key(), &blob).unwrap(), message);
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();
        let blob = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"")
            .unwrap();
        assert_eq!(blob.len(), ECIES_OVERHEAD);
        assert!(cipher.decrypt(bob.private_key(), &blob).unwrap().is_empty());
    }

    #[test]
    fn embeds_sender_key_uncompressed() {
        let (alice, bob) = parties();
        let blob = BlockCipher::new()
            .encrypt(alice.private_key(), bob.public_key(), b"hi")
            .unwrap();
        assert_eq!(
            &blob[..UNCOMPRESSED_PUBLIC_KEY_LENGTH],
            alice.public_key().to_uncompressed().as_bytes()
        );
    }

    #[test]
    fn fresh_iv_every_call() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();
        let a = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"same")
            .unwrap();
        let b = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"same")
            .unwrap();
        assert_ne!(a, b);
        assert_ne!(&a[65..81], &b[65..81]);
    }

    #[test]
    fn ciphertext_is_not_plaintext() {
        let (alice, bob) = parties();
        let message = [0x41u8; 64];
        let blob = BlockCipher::new()
            .encrypt(alice.private_key(), bob.public_key(), &message)
            .unwrap();
        assert_ne!(&blob[81..81 + 64], &message[..]);
    }

    #[test]
    fn wrong_recipient_fails_closed() {
        let (alice, bob) = parties();
        let eve = KeyGenerator::new().generate_key_pair();
        let cipher = BlockCipher::new();
        let blob = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"secret")
            .unwrap();
        assert_eq!(
            cipher.decrypt(eve.private_key(), &blob).unwrap_err(),
            EciesError::MacMismatch
        );
    }

    #[test]
    fn any_flipped_bit_after_the_key_fails_closed() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();
        let blob = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"do not touch")
            .unwrap();

        for index in UNCOMPRESSED_PUBLIC_KEY_LENGTH..blob.len() {
            let mut corrupted = blob.clone();
            corrupted[index] ^= 0x80;
            assert_eq!(
                cipher.decrypt(bob.private_key(), &corrupted).unwrap_err(),
                EciesError::MacMismatch,
                "byte {} was not authenticated",
                index
            );
        }
    }

    #[test]
    fn corrupted_embedded_key_is_rejected() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();
        let mut blob = cipher
            .encrypt(alice.private_key(), bob.public_key(), b"x")
            .unwrap();
        blob[0] = 0x05;
        assert_eq!(
            cipher.decrypt(bob.private_key(), &blob).unwrap_err(),
            EciesError::InvalidEmbeddedKey
        );
    }

    #[test]
    fn truncated_blob_reports_sizes() {
        let (_, bob) = parties();
        let err = BlockCipher::new()
            .decrypt(bob.private_key(), &[0u8; 100])
            .unwrap_err();
        assert_eq!(
            err,
            EciesError::CiphertextTooShort {
                available: 100,
                required: ECIES_OVERHEAD
            }
        );
    }

    #[test]
    fn ephemeral_round_trip() {
        let (_, bob) = parties();
        let cipher = BlockCipher::new();
        let a = cipher.encrypt_ephemeral(bob.public_key(), b"anon").unwrap();
        let b = cipher.encrypt_ephemeral(bob.public_key(), b"anon").unwrap();
        assert_ne!(&a[..65], &b[..65]);
        assert_eq!(cipher.decrypt(bob.private_key(), &a).unwrap(), b"anon");
        assert_eq!(cipher.decrypt(bob.private_key(), &b).unwrap(), b"anon");
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let (alice, bob) = parties();
        let one = BlockCipher::with_rng(StdRng::seed_from_u64(42))
            .encrypt(alice.private_key(), bob.public_key(), b"det")
            .unwrap();
        let two = BlockCipher::with_rng(StdRng::seed_from_u64(42))
            .encrypt(alice.private_key(), bob.public_key(), b"det")
            .unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn agreement_is_symmetric() {
        let (alice, bob) = parties();
        let ab = derive_keys(alice.private_key().secret_key(), bob.public_key());
        let ba = derive_keys(bob.private_key().secret_key(), alice.public_key());
        assert_eq!(*ab.cipher_key, *ba.cipher_key);
        assert_eq!(*ab.mac_key, *ba.mac_key);
    }

    #[test]
    fn key_material_split() {
        let (alice, bob) = parties();
        let shared = diffie_hellman(
            alice.private_key().secret_key().to_nonzero_scalar(),
            bob.public_key().point().as_affine(),
        );
        let mut kdf_input = 1u32.to_be_bytes().to_vec();
        kdf_input.extend_from_slice(shared.raw_secret_bytes());
        let km = sha256(&kdf_input);

        let keys = derive_keys(alice.private_key().secret_key(), bob.public_key());
        assert_eq!(*keys.cipher_key, km[..ECIES_CIPHER_KEY_LENGTH]);
        assert_eq!(*keys.mac_key, sha256(&km[ECIES_CIPHER_KEY_LENGTH..]));
    }

    #[test]
    fn shared_cipher_across_threads() {
        let (alice, bob) = parties();
        let cipher = BlockCipher::new();

        let blobs: Vec<Vec<u8>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        (0..4)
                            .map(|_| {
                                cipher
                                    .encrypt(alice.private_key(), bob.public_key(), b"same")
                                    .unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let ivs: std::collections::HashSet<&[u8]> = blobs
            .iter()
            .map(|blob| &blob[UNCOMPRESSED_PUBLIC_KEY_LENGTH..][..ECIES_IV_LENGTH])
            .collect();
        assert_eq!(ivs.len(), blobs.len());
        for blob in &blobs {
            assert_eq!(cipher.decrypt(bob.private_key(), blob).unwrap(), b"same");
        }
    }
}
