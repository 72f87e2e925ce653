//! # Recoverable Signatures
//!
//! The `(r, s, v)` value type and its two wire forms.
//!
//! `r` and `s` are scalars in `[1, N-1]`. `v` is the recovery indicator:
//! `27` or `28` when the signature knows which candidate public key it
//! belongs to, `0` when it doesn't (parsed from a 64-byte blob, say).
//!
//! ## Wire forms
//!
//! | Form        | Layout                 | `v` on the wire          |
//! |-------------|------------------------|--------------------------|
//! | compact     | `r ‖ s` (64 bytes)     | absent, parsed as `0`    |
//! | recoverable | `r ‖ s ‖ v` (65 bytes) | `27`/`28`; `0`/`1` accepted on input |
//!
//! Transactions don't use either: they carry `v` as an RLP integer under the
//! EIP-155 rules in [`crate::transaction::signing`].

use k256::ecdsa::Signature as EcdsaSignature;
use primitive_types::U256;
use thiserror::Error;

use super::curve::SECP256K1;
use super::keys::KeyError;
use crate::config::{
    LOWER_REAL_V, RECOVERABLE_SIGNATURE_LENGTH, SIGNATURE_LENGTH, SIGNATURE_SCALAR_LENGTH,
};

/// Errors from signature construction, signing and recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("signature component {0} is outside [1, N-1]")]
    ComponentOutOfRange(&'static str),

    #[error("invalid recovery indicator v = {0}")]
    InvalidV(u8),

    #[error("invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("signing failed")]
    SigningFailed,

    /// No candidate recovery id reproduced the signer's own public key.
    ///
    /// This is an internal invariant violation, not bad input. Retrying
    /// with the same inputs will fail the same way.
    #[error("internal error: no recovery id matches the signing key")]
    RecoveryIdNotFound,

    #[error("public key recovery failed")]
    RecoveryFailed,

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// An ECDSA signature over secp256k1 with an optional recovery indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    r: U256,
    s: U256,
    v: u8,
}

impl Signature {
    /// Validates and builds a signature. `r` and `s` must be in `[1, N-1]`,
    /// `v` must be `0`, `27` or `28`.
    pub fn new(r: U256, s: U256, v: u8) -> Result<Self, SignatureError> {
        if !SECP256K1.is_valid_scalar(&r) {
            return Err(SignatureError::ComponentOutOfRange("r"));
        }
        if !SECP256K1.is_valid_scalar(&s) {
            return Err(SignatureError::ComponentOutOfRange("s"));
        }
        if v != 0 && v != LOWER_REAL_V && v != LOWER_REAL_V + 1 {
            return Err(SignatureError::InvalidV(v));
        }
        Ok(Self { r, s, v })
    }

    /// Parses the 64-byte `r ‖ s` form. The result has `v = 0`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }
        let (r, s) = bytes.split_at(SIGNATURE_SCALAR_LENGTH);
        Self::new(U256::from_big_endian(r), U256::from_big_endian(s), 0)
    }

    /// Parses the 65-byte `r ‖ s ‖ v` form.
    ///
    /// Accepts `v` as either a bare recovery id (`0`/`1`) or offset by 27;
    /// the result always holds `27`/`28`.
    pub fn from_recoverable_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() != RECOVERABLE_SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength {
                expected: RECOVERABLE_SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }
        let v = match bytes[SIGNATURE_LENGTH] {
            id @ (0 | 1) => id + LOWER_REAL_V,
            v @ (27 | 28) => v,
            other => return Err(SignatureError::InvalidV(other)),
        };
        let mut sig = Self::from_bytes(&bytes[..SIGNATURE_LENGTH])?;
        sig.v = v;
        Ok(sig)
    }

    pub fn r(&self) -> U256 {
        self.r
    }

    pub fn s(&self) -> U256 {
        self.s
    }

    /// `27`/`28`, or `0` when the recovery id is unknown.
    pub fn v(&self) -> u8 {
        self.v
    }

    /// The bare recovery id (`v - 27`), if known.
    pub fn recovery_id(&self) -> Option<u8> {
        self.v.checked_sub(LOWER_REAL_V)
    }

    /// `true` iff `s <= N/2`.
    pub fn is_canonical(&self) -> bool {
        self.s <= SECP256K1.half_group_order()
    }

    /// The low-s twin of this signature.
    ///
    /// Replacing `s` with `N - s` mirrors the nonce point `R` across the
    /// x-axis, so a known recovery id flips parity with it (27 ↔ 28). An
    /// unknown one stays unknown.
    pub fn to_canonical(&self) -> Self {
        if self.is_canonical() {
            return *self;
        }
        let v = match self.v {
            0 => 0,
            v if v == LOWER_REAL_V => LOWER_REAL_V + 1,
            _ => LOWER_REAL_V,
        };
        Self {
            r: self.r,
            s: SECP256K1.group_order() - self.s,
            v,
        }
    }

    /// `r ‖ s`, each 32 bytes big-endian, zero-padded.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        self.r.to_big_endian(&mut out[..SIGNATURE_SCALAR_LENGTH]);
        self.s.to_big_endian(&mut out[SIGNATURE_SCALAR_LENGTH..]);
        out
    }

    /// `r ‖ s ‖ v` with `v` in `{27, 28}`. `None` if the recovery id is unknown.
    pub fn to_recoverable_bytes(&self) -> Option<[u8; RECOVERABLE_SIGNATURE_LENGTH]> {
        if self.v == 0 {
            return None;
        }
        let mut out = [0u8; RECOVERABLE_SIGNATURE_LENGTH];
        out[..SIGNATURE_LENGTH].copy_from_slice(&self.to_bytes());
        out[SIGNATURE_LENGTH] = self.v;
        Some(out)
    }

    pub(crate) fn to_ecdsa(&self) -> Result<EcdsaSignature, SignatureError> {
        let bytes = self.to_bytes();
        EcdsaSignature::from_slice(&bytes).map_err(|_| SignatureError::ComponentOutOfRange("r/s"))
    }

    pub(crate) fn from_ecdsa(signature: &EcdsaSignature, v: u8) -> Result<Self, SignatureError> {
        let bytes = signature.to_bytes();
        let (r, s) = bytes.split_at(SIGNATURE_SCALAR_LENGTH);
        Self::new(U256::from_big_endian(r), U256::from_big_endian(s), v)
    }
}
