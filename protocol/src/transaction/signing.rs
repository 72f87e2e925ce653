//! Transaction signing and the EIP-155 `v` arithmetic.
//!
//! The signer always produces a recovery byte of 27 or 28. On the wire that
//! byte is re-expressed depending on whether the transaction is replay
//! protected:
//!
//! | Scheme  | Wire `v`                          | Example (chain 1) |
//! |---------|-----------------------------------|-------------------|
//! | legacy  | `27 + id`                         | 27, 28            |
//! | EIP-155 | `id + chain_id * 2 + 35`          | 37, 38            |
//!
//! Wire `v` is a [`U256`], so arbitrarily large chain ids fold without
//! overflow. Unfolding checks that the recovered chain id fits in a `u64`.

use primitive_types::U256;
use tracing::debug;

use super::types::Transaction;
use super::verification::TransactionError;
use crate::config::{CHAIN_ID_INC, LOWER_REAL_V};
use crate::crypto::keys::KeyPair;
use crate::crypto::signature::Signature;
use crate::crypto::signer::Signer;

/// Folds a 27/28 recovery byte and an optional chain id into the wire `v`.
pub fn wire_v(recovery_v: u8, chain_id: Option<u64>) -> U256 {
    match chain_id {
        None => U256::from(recovery_v),
        Some(chain_id) => {
            let id = recovery_v.saturating_sub(LOWER_REAL_V);
            U256::from(chain_id) * U256::from(2u8) + U256::from(CHAIN_ID_INC) + U256::from(id)
        }
    }
}

/// Splits a wire `v` back into `(chain_id, recovery_v)`.
///
/// `27` and `28` are legacy. Anything from `35` up is EIP-155. The gap in
/// between, and everything below 27, is rejected.
pub fn split_wire_v(v: U256) -> Result<(Option<u64>, u8), TransactionError> {
    let legacy_low = U256::from(LOWER_REAL_V);
    let legacy_high = U256::from(LOWER_REAL_V + 1);
    if v == legacy_low || v == legacy_high {
        return Ok((None, v.low_u64() as u8));
    }

    let inc = U256::from(CHAIN_ID_INC);
    if v < inc {
        return Err(TransactionError::InvalidV(v));
    }
    let offset = v - inc;
    let chain_id = offset >> 1;
    if chain_id.bits() > 64 {
        return Err(TransactionError::ChainIdOverflow(v));
    }
    let parity = (offset.low_u64() & 1) as u8;
    Ok((Some(chain_id.low_u64()), LOWER_REAL_V + parity))
}

/// Signs `tx`'s [`signing_payload`](Transaction::signing_payload) with
/// `key_pair`.
///
/// The payload goes to the signer raw; the signer hashes it once.
pub fn sign_transaction(
    tx: &Transaction,
    key_pair: &KeyPair,
) -> Result<Signature, TransactionError> {
    let signer = Signer::new(key_pair.clone());
    let signature = signer.sign(&tx.signing_payload())?;
    debug!(
        nonce = %tx.nonce(),
        to = %tx.to(),
        chain_id = ?tx.chain_id(),
        v = signature.v(),
        "signed transaction"
    );
    Ok(signature)
}
