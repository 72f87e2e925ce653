//! # Protocol Configuration & Constants
//!
//! Every magic number in the wallet core lives here. If you're hardcoding a
//! width or an offset somewhere else, move it here first.
//!
//! Most of these values are fixed by external standards (SEC 2, EIP-155,
//! the RLP wire format). Changing them does not make the code "configurable",
//! it makes it incompatible with every other wallet on the network.

// ---------------------------------------------------------------------------
// Curve & Key Material
// ---------------------------------------------------------------------------

/// The one curve this core speaks. Bitcoin picked it, Ethereum kept it.
pub const CURVE_NAME: &str = "secp256k1";

/// Private key length in bytes. A big-endian scalar in `[1, N-1]`.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// SEC1 compressed public key: `0x02/0x03 || x`.
pub const COMPRESSED_PUBLIC_KEY_LENGTH: usize = 33;

/// SEC1 uncompressed public key: `0x04 || x || y`.
pub const UNCOMPRESSED_PUBLIC_KEY_LENGTH: usize = 65;

/// Form marker of an uncompressed SEC1 point.
pub const UNCOMPRESSED_POINT_TAG: u8 = 0x04;

/// Address length in bytes: the rightmost 20 bytes of the Keccak-256 digest
/// of the 64-byte public key body.
pub const ADDRESS_LENGTH: usize = 20;

/// Output width of the 256-bit domain hash.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

/// Width of each of `r` and `s` on the wire (big-endian, zero-padded).
pub const SIGNATURE_SCALAR_LENGTH: usize = 32;

/// Non-recoverable wire form: `r || s`.
pub const SIGNATURE_LENGTH: usize = 64;

/// Recoverable wire form: `r || s || v`.
pub const RECOVERABLE_SIGNATURE_LENGTH: usize = 65;

/// Lowest "real" `v` value. Recovery id 0 maps to 27, recovery id 1 to 28.
pub const LOWER_REAL_V: u8 = 27;

/// EIP-155 offset: `v = recovery_id + chain_id * 2 + 35`.
pub const CHAIN_ID_INC: u64 = 35;

/// Number of recovery ids tried when searching for the signer's own key.
pub const RECOVERY_ID_CANDIDATES: u8 = 4;

// ---------------------------------------------------------------------------
// ECIES
// ---------------------------------------------------------------------------

/// AES-128 in CTR mode. 16-byte key.
pub const ECIES_CIPHER_KEY_LENGTH: usize = 16;

/// Raw MAC key material taken from the KDF output before hashing.
pub const ECIES_MAC_KEY_LENGTH: usize = 16;

/// IV length equals the AES block size.
pub const ECIES_IV_LENGTH: usize = 16;

/// HMAC-SHA256 tag length.
pub const ECIES_TAG_LENGTH: usize = 32;

/// Smallest possible ECIES blob: embedded point, IV and tag around an
/// empty ciphertext.
pub const ECIES_OVERHEAD: usize = UNCOMPRESSED_PUBLIC_KEY_LENGTH + ECIES_IV_LENGTH + ECIES_TAG_LENGTH;

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Ethereum mainnet.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Goerli testnet. Deprecated, but old fixtures still carry it.
pub const GOERLI_CHAIN_ID: u64 = 5;

/// Sepolia testnet.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns a friendly name for a chain id, mainly for logging.
/// Unknown chains get their number back.
pub fn network_name(chain_id: Option<u64>) -> String {
    match chain_id {
        None => "legacy".to_string(),
        Some(MAINNET_CHAIN_ID) => "mainnet".to_string(),
        Some(GOERLI_CHAIN_ID) => "goerli".to_string(),
        Some(SEPOLIA_CHAIN_ID) => "sepolia".to_string(),
        Some(other) => format!("unknown({})", other),
    }
}
