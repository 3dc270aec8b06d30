use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Computes `base^exp mod modulus`.
///
/// The modulus is public group data; only the exponent may be secret.
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    if modulus.is_zero() {
        return Err(Error::InvalidParams("modulus cannot be zero".to_string()));
    }
    Ok(base.modpow(exp, modulus))
}

/// Computes `(a - b) mod modulus` for operands already reduced modulo `modulus`.
pub fn mod_sub(a: &BigUint, b: &BigUint, modulus: &BigUint) -> BigUint {
    if a >= b {
        (a - b) % modulus
    } else {
        modulus - ((b - a) % modulus)
    }
}

/// Computes `-a mod modulus`.
pub fn mod_neg(a: &BigUint, modulus: &BigUint) -> BigUint {
    let a = a % modulus;
    if a.is_zero() {
        a
    } else {
        modulus - a
    }
}

/// Multiplicative inverse modulo `modulus`, if `gcd(a, modulus) = 1`.
pub fn mod_inverse(a: &BigUint, modulus: &BigUint) -> Option<BigUint> {
    if modulus.is_zero() || modulus.is_one() {
        return None;
    }
    a.modinv(modulus)
}

/// Minimal big-endian width of `value` in bytes.
pub fn byte_len(value: &BigUint) -> usize {
    (value.bits() as usize).div_ceil(8).max(1)
}

/// Big-endian encoding left padded to exactly `width` bytes.
pub fn to_fixed_be(value: &BigUint, width: usize) -> Vec<u8> {
    let raw = value.to_bytes_be();
    let mut out = vec![0u8; width.saturating_sub(raw.len())];
    out.extend_from_slice(&raw[raw.len().saturating_sub(width)..]);
    out
}
