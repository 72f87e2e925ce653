//! Transaction errors, sender recovery and signature checks.
//!
//! A signed transaction carries no public key. The sender is whoever the
//! signature recovers to, and [`verify_transaction`] checks that this is who
//! the caller expected.

use primitive_types::U256;
use thiserror::Error;

use super::types::Transaction;
use crate::address::{Address, AddressError};
use crate::crypto::hash::keccak256;
use crate::crypto::keys::KeyError;
use crate::crypto::signature::SignatureError;
use crate::crypto::signer::recover_public_key;
use crate::rlp::RlpError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from building, decoding and checking transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("malformed transaction encoding: {0}")]
    Rlp(#[from] RlpError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Key(#[from] KeyError),

    /// A wire `v` that is neither 27/28 nor 35 and up.
    #[error("invalid v value: {0}")]
    InvalidV(U256),

    #[error("chain id encoded in v = {0} does not fit in 64 bits")]
    ChainIdOverflow(U256),

    #[error("transaction is unsigned")]
    MissingSignature,

    #[error("signature is not canonical (s > N/2)")]
    NonCanonicalSignature,

    #[error("sender mismatch: expected {expected}, recovered {recovered}")]
    SenderMismatch { expected: Address, recovered: Address },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Recovers the address that signed `tx`.
pub fn recover_sender(tx: &Transaction) -> Result<Address, TransactionError> {
    let signature = tx.signature().ok_or(TransactionError::MissingSignature)?;
    let hash = keccak256(&tx.signing_payload());
    let public_key = recover_public_key(&hash, signature)?;
    Ok(Address::from_public_key(&public_key))
}

/// Checks that `tx` is signed, canonical, and signed by `expected_sender`.
///
/// Cheap checks first: presence, then canonical form, then recovery.
pub fn verify_transaction(
    tx: &Transaction,
    expected_sender: &Address,
) -> Result<(), TransactionError> {
    let signature = tx.signature().ok_or(TransactionError::MissingSignature)?;
    if !signature.is_canonical() {
        return Err(TransactionError::NonCanonicalSignature);
    }
    let recovered = recover_sender(tx)?;
    if &recovered != expected_sender {
        return Err(TransactionError::SenderMismatch {
            expected: *expected_sender,
            recovered,
        });
    }
    Ok(())
}

impl Transaction {
    /// See [`recover_sender`].
    pub fn recover_sender(&self) -> Result<Address, TransactionError> {
        recover_sender(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
