//! # Transaction Module
//!
//! Building, signing, encoding, decoding and checking account-model
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — Transaction: fields, RLP encoding, hash, decode
//! builder.rs      — TransactionBuilder typestate: Created → Addressed → Signed
//! signing.rs      — Signing and the EIP-155 v arithmetic
//! verification.rs — TransactionError, sender recovery, signature checks
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Create** — [`TransactionBuilder::create`] with the body fields.
//! 2. **Address** — `.to(recipient)`.
//! 3. **Sign** — `.sign(&key_pair)` over the RLP signing payload.
//! 4. **Build** — `.build()` gives an immutable [`Transaction`].
//! 5. **Ship** — [`Transaction::encoded`] is the wire form,
//!    [`Transaction::hash`] its Keccak-256.
//!
//! ## Design Decisions
//!
//! - With a chain id, `v = recovery_id + chain_id * 2 + 35` (EIP-155) and the
//!   signed payload carries `[chain_id, 0, 0]`. Without one, `v` is 27/28.
//! - Encoding and hash are recomputed from the fields on every call.
//! - All quantities are [`primitive_types::U256`]. Chain ids are `u64`.

pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{Addressed, Created, Signed, TransactionBuilder};
pub use signing::{sign_transaction, split_wire_v, wire_v};
pub use types::Transaction;
pub use verification::{recover_sender, verify_transaction, TransactionError};
