//! The [`Transaction`] record and its wire encoding.
//!
//! A transaction is nine RLP fields in a fixed order:
//!
//! ```text
//! [nonce, gas_price, gas_limit, to, value, data, v, r, s]
//! ```
//!
//! Before signing, the last three hold the replay-protection tail
//! `[chain_id, 0, 0]` (EIP-155), or are absent entirely for a legacy
//! transaction. After signing they hold the signature, with `v` folded
//! together with the chain id (see [`super::signing`]).
//!
//! Encoding and hashing are pure functions of the fields. Nothing is cached,
//! so there is no window in which a half-built transaction reports a stale
//! hash.

use primitive_types::U256;
use tracing::debug;

use super::signing::{split_wire_v, wire_v};
use super::verification::TransactionError;
use crate::address::Address;
use crate::config::HASH_OUTPUT_LENGTH;
use crate::crypto::hash::keccak256;
use crate::crypto::signature::Signature;
use crate::rlp::{RlpDecoder, RlpEncoder};

/// An account-model value transfer or contract call.
///
/// Built with [`super::TransactionBuilder`] or parsed with
/// [`Transaction::decode`]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(super) nonce: U256,
    pub(super) gas_price: U256,
    pub(super) gas_limit: U256,
    pub(super) to: Address,
    pub(super) value: U256,
    pub(super) data: Vec<u8>,
    pub(super) chain_id: Option<u64>,
    /// `v` is always 27/28 here. The wire `v` is derived on encode.
    pub(super) signature: Option<Signature>,
}

impl Transaction {
    pub fn nonce(&self) -> U256 {
        self.nonce
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> U256 {
        self.gas_limit
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// `None` for legacy (pre-EIP-155) transactions.
    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The `v` that goes on the wire, if signed.
    pub fn v(&self) -> Option<U256> {
        self.signature
            .as_ref()
            .map(|signature| wire_v(signature.v(), self.chain_id))
    }

    /// The bytes a signer signs: the six body fields, plus
    /// `[chain_id, 0, 0]` when a chain id is set.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut encoder = RlpEncoder::new();
        encoder.encode_list_with(|list| {
            self.encode_body(list);
            if let Some(chain_id) = self.chain_id {
                list.encode_u64(chain_id);
                list.encode_u8(0);
                list.encode_u8(0);
            }
        });
        encoder.into_bytes()
    }

    /// The full RLP encoding.
    ///
    /// Signed transactions end in `[v, r, s]`. Unsigned ones encode exactly
    /// as their [`signing_payload`](Self::signing_payload).
    pub fn encoded(&self) -> Vec<u8> {
        let Some(signature) = self.signature.as_ref() else {
            return self.signing_payload();
        };
        let mut encoder = RlpEncoder::new();
        encoder.encode_list_with(|list| {
            self.encode_body(list);
            list.encode_u256(wire_v(signature.v(), self.chain_id));
            list.encode_u256(signature.r());
            list.encode_u256(signature.s());
        });
        encoder.into_bytes()
    }

    /// Keccak-256 of [`encoded`](Self::encoded).
    pub fn hash(&self) -> [u8; HASH_OUTPUT_LENGTH] {
        keccak256(&self.encoded())
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash())
    }

    /// Parses a transaction in any of the three shapes [`encoded`](Self::encoded)
    /// produces: signed, unsigned with a chain id, or unsigned legacy.
    ///
    /// The signed shape is told apart from the unsigned EIP-155 one by
    /// `r = s = 0`, which no valid signature has.
    pub fn decode(raw: &[u8]) -> Result<Self, TransactionError> {
        let mut outer = RlpDecoder::new(raw);
        let payload = outer.decode_list()?;
        outer.finish()?;

        let mut fields = RlpDecoder::new(payload);
        let nonce = fields.decode_u256()?;
        let gas_price = fields.decode_u256()?;
        let gas_limit = fields.decode_u256()?;
        let to: Address = fields.decode_object()?;
        let value = fields.decode_u256()?;
        let data = fields.decode_bytes()?.to_vec();

        let mut tx = Self {
            nonce,
            gas_price,
            gas_limit,
            to,
            value,
            data,
            chain_id: None,
            signature: None,
        };

        if fields.is_finished() {
            return Ok(tx);
        }

        let v = fields.decode_u256()?;
        let r = fields.decode_u256()?;
        let s = fields.decode_u256()?;
        fields.finish()?;

        if r.is_zero() && s.is_zero() {
            if v.bits() > 64 {
                return Err(TransactionError::ChainIdOverflow(v));
            }
            tx.chain_id = Some(v.low_u64());
            return Ok(tx);
        }

        let (chain_id, recovery_v) = split_wire_v(v)?;
        tx.chain_id = chain_id;
        tx.signature = Some(Signature::new(r, s, recovery_v)?);
        debug!(hash = %tx.hash_hex(), chain_id = ?chain_id, "decoded signed transaction");
        Ok(tx)
    }

    fn encode_body(&self, list: &mut RlpEncoder) {
        list.encode_u256(self.nonce);
        list.encode_u256(self.gas_price);
        list.encode_u256(self.gas_limit);
        list.encode_object(&self.to);
        list.encode_u256(self.value);
        list.encode_bytes(&self.data);
    }
}
