//! # Signing and Verification
//!
//! Deterministic ECDSA over secp256k1 with low-s canonicalization and a
//! recoverable `v`.
//!
//! ## How a signature is made
//!
//! 1. `h = domain_hash(message)`. Callers pass the message, not the hash.
//! 2. `(r, s)` from ECDSA with an RFC 6979 nonce (HMAC-SHA256). Same key,
//!    same message, same signature. No RNG, no nonce reuse.
//! 3. If `s > N/2`, replace it with `N - s`.
//! 4. Try recovery ids `0..4` until one reproduces our own public key.
//!    `v = id + 27`.
//!
//! Step 4 is why a [`Signer`] is bound to a whole [`KeyPair`] and not just a
//! private key: the public key it compares against has to be on hand.
//!
//! ## Verification
//!
//! [`Signer::verify`] and [`Verifier::verify`] return `bool`. A non-canonical
//! signature is `false`, same as a wrong one. Neither ever returns an error.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use tracing::{debug, error};

use super::hash::{DomainHash, Keccak};
use super::keys::{KeyPair, PublicKey};
use super::signature::{Signature, SignatureError};
use crate::config::{HASH_OUTPUT_LENGTH, LOWER_REAL_V, RECOVERY_ID_CANDIDATES};

/// Signs on behalf of one key pair.
pub struct Signer<H = Keccak> {
    key_pair: KeyPair,
    hasher: H,
}

impl Signer {
    /// A signer that hashes with Keccak-256.
    pub fn new(key_pair: KeyPair) -> Self {
        Self::with_hasher(key_pair, Keccak)
    }
}

impl<H: DomainHash> Signer<H> {
    pub fn with_hasher(key_pair: KeyPair, hasher: H) -> Self {
        Self { key_pair, hasher }
    }

    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// Hashes `message` and signs the digest. See the module docs for the
    /// exact steps.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SignatureError> {
        let hash = self.hasher.hash256(message);
        self.sign_hash(&hash)
    }

    /// Signs a digest that has already been through the domain hash.
    pub fn sign_hash(
        &self,
        hash: &[u8; HASH_OUTPUT_LENGTH],
    ) -> Result<Signature, SignatureError> {
        let signing_key = SigningKey::from(self.key_pair.private_key().secret_key());
        let raw: EcdsaSignature = signing_key
            .sign_prehash(hash)
            .map_err(|_| SignatureError::SigningFailed)?;
        let canonical = Signature::from_ecdsa(&raw, 0)?.to_canonical();

        let ecdsa = canonical.to_ecdsa()?;
        let expected = self.key_pair.public_key().uncompressed_bytes();
        for id in 0..RECOVERY_ID_CANDIDATES {
            let Some(recovery_id) = RecoveryId::from_byte(id) else {
                continue;
            };
            let Ok(recovered) = VerifyingKey::recover_from_prehash(hash, &ecdsa, recovery_id)
            else {
                continue;
            };
            if recovered.to_encoded_point(false).as_bytes() == expected.as_slice() {
                debug!(recovery_id = id, "recovery id selected");
                // Ids 2 and 3 need r >= N - P, which has probability ~2^-128.
                // If it ever happens, v = 29/30 fails validation here.
                return Signature::new(canonical.r(), canonical.s(), id + LOWER_REAL_V);
            }
        }

        error!(
            public_key = %self.key_pair.public_key(),
            "no recovery id reproduced the signing key"
        );
        Err(SignatureError::RecoveryIdNotFound)
    }

    /// `true` iff `signature` is canonical and valid for `message` under this
    /// signer's public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        verify_message(
            &self.hasher,
            self.key_pair.public_key(),
            message,
            signature,
        )
    }

    /// The low-s form of `signature`. See [`Signature::to_canonical`].
    pub fn make_signature_canonical(&self, signature: &Signature) -> Signature {
        signature.to_canonical()
    }

    pub fn is_canonical(&self, signature: &Signature) -> bool {
        signature.is_canonical()
    }
}

/// Verifies signatures against one public key. No private key needed.
pub struct Verifier<H = Keccak> {
    public_key: PublicKey,
    hasher: H,
}

impl Verifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self::with_hasher(public_key, Keccak)
    }
}

impl<H: DomainHash> Verifier<H> {
    pub fn with_hasher(public_key: PublicKey, hasher: H) -> Self {
        Self { public_key, hasher }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        verify_message(&self.hasher, &self.public_key, message, signature)
    }
}

fn verify_message<H: DomainHash>(
    hasher: &H,
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> bool {
    if !signature.is_canonical() {
        debug!(s = %signature.s(), "rejecting non-canonical signature");
        return false;
    }
    let Ok(ecdsa) = signature.to_ecdsa() else {
        return false;
    };
    let hash = hasher.hash256(message);
    VerifyingKey::from(public_key.point())
        .verify_prehash(&hash, &ecdsa)
        .is_ok()
}

/// Recovers the uncompressed public key that produced `signature` over
/// `hash`.
///
/// Needs a known recovery id; a signature with `v = 0` is rejected.
pub fn recover_public_key(
    hash: &[u8; HASH_OUTPUT_LENGTH],
    signature: &Signature,
) -> Result<PublicKey, SignatureError> {
    let id = signature
        .recovery_id()
        .ok_or(SignatureError::InvalidV(signature.v()))?;
    let recovery_id = RecoveryId::from_byte(id).ok_or(SignatureError::InvalidV(signature.v()))?;
    let ecdsa = signature.to_ecdsa()?;
    let recovered = VerifyingKey::recover_from_prehash(hash, &ecdsa, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(PublicKey::from_bytes(
        recovered.to_encoded_point(false).as_bytes(),
    )?)
}
