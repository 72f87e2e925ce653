//! # Cryptographic Primitives
//!
//! Everything in the wallet core that touches a key goes through here.
//!
//! - **secp256k1** for keys, ECDSA and ECDH, via `k256`.
//! - **Keccak-256** as the domain hash (signing digests, addresses).
//! - **AES-128-CTR + HMAC-SHA256** inside ECIES.
//!
//! None of it is hand-rolled. The modules below are typed wrappers that pin
//! down encodings, ranges and failure modes; the arithmetic belongs to the
//! audited crates underneath.
//!
//! Random sources and hash functions are injected through constructors
//! ([`KeyGenerator::with_rng`], [`Signer::with_hasher`], ...). There is no
//! process-wide registry to install anything into.

pub mod curve;
pub mod ecies;
pub mod hash;
pub mod keygen;
pub mod keys;
pub mod signature;
pub mod signer;

pub use curve::{Secp256k1Curve, SECP256K1};
pub use ecies::{BlockCipher, EciesError};
pub use hash::{keccak256, keccak512, sha256, DomainHash, Keccak};
pub use keygen::KeyGenerator;
pub use keys::{KeyError, KeyPair, PrivateKey, PublicKey};
pub use signature::{Signature, SignatureError};
pub use signer::{recover_public_key, Signer, Verifier};
