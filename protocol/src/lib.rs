// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Vellum Protocol — Wallet Core
//!
//! The part of a wallet that has to be exactly right: secp256k1 keys,
//! canonical recoverable signatures, ECIES between two key pairs, the RLP
//! codec, and EIP-155 transactions built out of all of the above.
//!
//! No network, no storage, no key files. Bytes in, bytes out.
//!
//! ## Architecture
//!
//! - **config** — Protocol constants: lengths, offsets, chain ids.
//! - **crypto** — Curve parameters, keys, signing, ECIES. Built on `k256`.
//! - **rlp** — Recursive Length Prefix encoder and decoder.
//! - **address** — 20-byte account addresses derived from public keys.
//! - **transaction** — Typestate builder, encoding, signing, sender recovery.
//! - **logging** — `tracing` subscriber setup for binaries and tests.
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact or broken. Every encoding here has a test vector.
//! 2. Validate at construction. A `PrivateKey`, `PublicKey`, `Signature` or
//!    `Address` that exists is a valid one.
//! 3. Verification failures are `false`, not errors. Decode failures say how
//!    many bytes were wanted and how many there were.
//! 4. No globals. Random sources and hash functions are passed in.

pub mod address;
pub mod config;
pub mod crypto;
pub mod logging;
pub mod rlp;
pub mod transaction;
