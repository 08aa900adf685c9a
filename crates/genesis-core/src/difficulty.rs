//! Compact difficulty decoding and target comparison.

use primitive_types::U256;

use crate::algorithm::SHA256D_DEFAULT_BITS;
use crate::error::{GenesisError, Result};

/// Convert compact "bits" representation to a 256-bit target.
///
/// The bits format is: [exponent (1 byte)][mantissa (3 bytes)]
/// Target = mantissa * 256^(exponent - 3)
///
/// Exponents below 3 shift the mantissa right instead. Bits that would
/// land above bit 255 are dropped; use [`target_from_bits`] to reject them.
pub fn decode_bits(bits: u32) -> U256 {
    let exponent = (bits >> 24) as usize;
    let mantissa = U256::from(bits & 0x00ff_ffff);

    if exponent <= 3 {
        mantissa >> (8 * (3 - exponent))
    } else {
        let shift = 8 * (exponent - 3);
        if shift >= 256 {
            U256::zero()
        } else {
            mantissa << shift
        }
    }
}

/// Decode compact bits, rejecting zero targets and mantissas that overflow 256 bits.
pub fn target_from_bits(bits: u32) -> Result<U256> {
    let exponent = (bits >> 24) as usize;
    let mantissa = bits & 0x00ff_ffff;

    if exponent > 3 && mantissa != 0 {
        let mantissa_bits = 32 - mantissa.leading_zeros() as usize;
        if mantissa_bits + 8 * (exponent - 3) > 256 {
            return Err(GenesisError::InvalidBits(bits));
        }
    }

    let target = decode_bits(bits);
    if target.is_zero() {
        return Err(GenesisError::InvalidBits(bits));
    }
    Ok(target)
}

/// Check whether a digest, read as a big-endian integer, is below the target.
#[inline]
pub fn hash_meets_target(digest: &[u8; 32], target: &U256) -> bool {
    U256::from_big_endian(digest) < *target
}

/// Render a target as 64 hex digits.
pub fn target_to_hex(target: &U256) -> String {
    let mut bytes = [0u8; 32];
    target.to_big_endian(&mut bytes);
    hex::encode(bytes)
}

/// Calculate approximate difficulty from bits.
///
/// Difficulty = max_target / current_target
/// Where max_target is the difficulty-1 target (bits = 0x1d00ffff)
pub fn bits_to_difficulty(bits: u32) -> f64 {
    let current = target_to_f64(&decode_bits(bits));
    if current == 0.0 {
        return f64::INFINITY;
    }
    target_to_f64(&decode_bits(SHA256D_DEFAULT_BITS)) / current
}

fn target_to_f64(target: &U256) -> f64 {
    target
        .0
        .iter()
        .enumerate()
        .map(|(i, word)| (*word as f64) * 2f64.powi(64 * i as i32))
        .sum()
}

const DIFFICULTY_SUFFIXES: &[(f64, &str)] =
    &[(1e15, "P"), (1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "K")];

/// Difficulty with an SI suffix, e.g. "1.50K". Values below 0.01 use
/// scientific notation.
pub fn format_difficulty(difficulty: f64) -> String {
    if let Some((scale, suffix)) = DIFFICULTY_SUFFIXES
        .iter()
        .find(|(scale, _)| difficulty >= *scale)
    {
        return format!("{:.2}{}", difficulty / scale, suffix);
    }
    if difficulty >= 0.01 {
        format!("{difficulty:.2}")
    } else {
        format!("{difficulty:.3e}")
    }
}
