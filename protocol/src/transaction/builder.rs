//! Staged transaction construction.
//!
//! The [`TransactionBuilder`] is a typestate: each stage is a distinct type
//! that only exposes the next legal calls.
//!
//! ```text
//! create(..) ─► Created ─to(addr)─► Addressed ─sign(kp)─► Signed ─build()─► Transaction
//!                                       │
//!                                       └─build()─► Transaction (unsigned)
//! ```
//!
//! Calling `sign` before `to` does not compile. Neither does building a
//! transaction that has no recipient.
//!
//! [`TransactionBuilder::decode`] enters at the `Signed` stage from raw
//! bytes, so a parsed transaction leaves through the same `build()` as a
//! freshly signed one.

use primitive_types::U256;

use super::signing::sign_transaction;
use super::types::Transaction;
use super::verification::TransactionError;
use crate::address::Address;
use crate::crypto::keys::KeyPair;

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Body fields set, no recipient yet.
#[derive(Debug)]
pub struct Created {
    nonce: U256,
    gas_price: U256,
    gas_limit: U256,
    value: U256,
    data: Vec<u8>,
    chain_id: Option<u64>,
}

/// Recipient set, not signed.
#[derive(Debug)]
pub struct Addressed(Transaction);

/// Signed and ready to build.
#[derive(Debug)]
pub struct Signed(Transaction);

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Builds a [`Transaction`] in strictly ordered stages.
///
/// # Usage
///
/// ```
/// use vellum_protocol::address::Address;
/// use vellum_protocol::crypto::KeyGenerator;
/// use vellum_protocol::transaction::TransactionBuilder;
///
/// let key_pair = KeyGenerator::new().generate_key_pair();
/// let tx = TransactionBuilder::create(0u8, 20_000_000_000u64, 21_000u32, 1u8, Vec::new(), Some(1))
///     .to(Address::new([0x35; 20]))
///     .sign(&key_pair)
///     .unwrap()
///     .build();
///
/// assert!(tx.is_signed());
/// assert_eq!(tx.chain_id(), Some(1));
/// ```
#[derive(Debug)]
pub struct TransactionBuilder<S> {
    stage: S,
}

impl TransactionBuilder<Created> {
    /// Starts a transaction. `chain_id = None` selects the legacy scheme.
    pub fn create(
        nonce: impl Into<U256>,
        gas_price: impl Into<U256>,
        gas_limit: impl Into<U256>,
        value: impl Into<U256>,
        data: Vec<u8>,
        chain_id: Option<u64>,
    ) -> Self {
        Self {
            stage: Created {
                nonce: nonce.into(),
                gas_price: gas_price.into(),
                gas_limit: gas_limit.into(),
                value: value.into(),
                data,
                chain_id,
            },
        }
    }

    /// Sets the recipient.
    pub fn to(self, to: Address) -> TransactionBuilder<Addressed> {
        let Created {
            nonce,
            gas_price,
            gas_limit,
            value,
            data,
            chain_id,
        } = self.stage;
        TransactionBuilder {
            stage: Addressed(Transaction {
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                data,
                chain_id,
                signature: None,
            }),
        }
    }
}

impl TransactionBuilder<Addressed> {
    /// Signs the signing payload with `key_pair`.
    pub fn sign(
        self,
        key_pair: &KeyPair,
    ) -> Result<TransactionBuilder<Signed>, TransactionError> {
        let mut tx = self.stage.0;
        tx.signature = Some(sign_transaction(&tx, key_pair)?);
        Ok(TransactionBuilder { stage: Signed(tx) })
    }

    /// Finishes without a signature.
    pub fn build(self) -> Transaction {
        self.stage.0
    }
}

impl TransactionBuilder<Signed> {
    /// Parses a signed transaction.
    ///
    /// A well-formed but unsigned encoding is
    /// [`TransactionError::MissingSignature`]; [`Transaction::decode`]
    /// accepts those too.
    pub fn decode(raw: &[u8]) -> Result<Self, TransactionError> {
        let tx = Transaction::decode(raw)?;
        if !tx.is_signed() {
            return Err(TransactionError::MissingSignature);
        }
        Ok(Self { stage: Signed(tx) })
    }

    pub fn build(self) -> Transaction {
        self.stage.0
    }
}
