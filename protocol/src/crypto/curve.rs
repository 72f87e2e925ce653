//! # Curve Domain Parameters
//!
//! secp256k1 as a read-only value: the generator `G`, the group order `N`,
//! `N / 2` for the low-s rule, and the field prime `P`. The arithmetic lives
//! in `k256`; this module only exposes the numbers the rest of the core
//! compares against, as [`U256`]s.
//!
//! There is exactly one instance, [`SECP256K1`]. It is a `static`, so it is
//! shared freely across threads and never mutated.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::AffinePoint;
use primitive_types::U256;

use crate::config::CURVE_NAME;

/// secp256k1 domain parameters.
#[derive(Debug)]
pub struct Secp256k1Curve {
    group_order: U256,
    half_group_order: U256,
    field_prime: U256,
}

/// The process-wide secp256k1 parameters.
pub static SECP256K1: Secp256k1Curve = Secp256k1Curve {
    // N = FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE BAAEDCE6 AF48A03B BFD25E8C D0364141
    group_order: U256([
        0xBFD2_5E8C_D036_4141,
        0xBAAE_DCE6_AF48_A03B,
        0xFFFF_FFFF_FFFF_FFFE,
        0xFFFF_FFFF_FFFF_FFFF,
    ]),
    // N >> 1
    half_group_order: U256([
        0xDFE9_2F46_681B_20A0,
        0x5D57_6E73_57A4_501D,
        0xFFFF_FFFF_FFFF_FFFF,
        0x7FFF_FFFF_FFFF_FFFF,
    ]),
    // P = 2^256 - 2^32 - 977
    field_prime: U256([
        0xFFFF_FFFE_FFFF_FC2F,
        0xFFFF_FFFF_FFFF_FFFF,
        0xFFFF_FFFF_FFFF_FFFF,
        0xFFFF_FFFF_FFFF_FFFF,
    ]),
};

impl Secp256k1Curve {
    pub fn name(&self) -> &'static str {
        CURVE_NAME
    }

    /// The group order `N`.
    pub fn group_order(&self) -> U256 {
        self.group_order
    }

    /// `N / 2`, rounded down. Signatures with `s` above this are malleable.
    pub fn half_group_order(&self) -> U256 {
        self.half_group_order
    }

    /// The prime `P` of the underlying field.
    pub fn field_prime(&self) -> U256 {
        self.field_prime
    }

    /// Field size in bits.
    pub fn field_size(&self) -> usize {
        self.field_prime.bits()
    }

    /// Bytes needed for one field element: `(field_size + 7) / 8`.
    pub fn field_element_length(&self) -> usize {
        (self.field_size() + 7) / 8
    }

    /// The generator point `G`.
    pub fn generator(&self) -> AffinePoint {
        AffinePoint::GENERATOR
    }

    /// SEC1 encoding of `G`.
    pub fn generator_encoded(&self, compress: bool) -> Vec<u8> {
        self.generator()
            .to_encoded_point(compress)
            .as_bytes()
            .to_vec()
    }

    /// Returns `true` if `value` is a valid non-zero scalar, i.e. in `[1, N-1]`.
    pub fn is_valid_scalar(&self, value: &U256) -> bool {
        !value.is_zero() && *value < self.group_order
    }
}
