//! Multiplicative subgroup of a prime field `Z_p^*`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::crypto::field::{byte_len, mod_inverse, mod_neg, mod_pow, mod_sub, to_fixed_be};
use crate::{Error, Group, Result};

const RFC5114_P: &[u8] = b"87A8E61DB4B6663CFFBBD19C651959998CEEF608660DD0F25D2CEED4435E3B00E00DF8F1D61957D4FAF7DF4561B2AA3016C3D91134096FAA3BF4296D830E9A7C209E0C6497517ABD5A8A9D306BCF67ED91F9E6725B4758C022E0B1EF4275BF7B6C5BFC11D45F9088B941F54EB1E59BB8BC39A0BF12307F5C4FDB70C581B23F76B63ACAE1CAA6B7902D52526735488A0EF13C6D9A51BFA4AB3AD8347796524D8EF6A167B5A41825D967E144E5140564251CCACB83E6B486F6B3CA3F7971506026C0B857F689962856DED4010ABD0BE621C3A3960A54E710C375F26375D7014103A4B54330C198AF126116D2276E11715F693877FAD7EF09CADB094AE91E1A1597";

const RFC5114_Q: &[u8] = b"8CF83642A709A097B447997640129DA299B1A47D1EB3750BA308B0FE64F5FBD3";

const RFC5114_G: &[u8] = b"3FB32C9B73134D0B2E77506660EDBD484CA7B18F21EF205407F4793A1A0BA12510DBC15077BE463FFF4FED4AAC0BB555BE3A6C1B0C6B47B1BC3773BF7E8C6F62901228F8C28CBB18A55AE31341000A650196F931C77A57F2DDF463E5E9EC144B777DE62AAAB8A8628AC376D282D6ED3864E67982428EBC831D14348F6F2F9193B5045AF2767164E1DFC967C1FB3F2E55A4BD1BFFE83B9C80D052B985D182EA0ADB2A3B7313D3FE14C8484B1E052588B9B7D2BBD2DF016199ECD06E1557CD0915B3353BBB64E0EC377FD028370DF92B52C7891428CDC67EB6184B523D1DB246C32F63078490F00EF8D647D148D47954515E2327CFEF98C582664B4C0F6CC41659";

/// Group parameters `(p, g, n)`: a prime modulus, a generator and the generator's order.
///
/// Scalars live in `Z_n`. For the full group `Z_p^*` this is `n = p - 1`; for a prime-order
/// subgroup such as RFC 5114 it is the subgroup order `q`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModpGroup {
    name: &'static str,
    p: BigUint,
    g: BigUint,
    n: BigUint,
    element_len: usize,
    scalar_len: usize,
}

#[derive(Clone, Debug)]
pub struct Scalar(BigUint);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element(BigUint);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.set_zero();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.to_bytes_be().as_slice().ct_eq(other.0.to_bytes_be().as_slice())
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Scalar {
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl Element {
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

impl ModpGroup {
    /// Builds a group from explicit parameters.
    ///
    /// Requires `p` odd and greater than 3, `1 < g < p`, `1 < n < p` and `g^n ≡ 1 (mod p)`.
    /// Primality of `p` is the caller's responsibility.
    pub fn new(p: BigUint, g: BigUint, n: BigUint) -> Result<Self> {
        Self::with_name("modp", p, g, n)
    }

    /// The RFC 5114 §2.3 group: 2048-bit modulus, 256-bit prime-order subgroup.
    pub fn rfc5114() -> Self {
        let parse = |hex: &[u8]| {
            BigUint::parse_bytes(hex, 16)
                .unwrap_or_else(|| unreachable!("RFC 5114 constants are valid hex"))
        };
        Self::with_name(
            "RFC5114-2048-256",
            parse(RFC5114_P),
            parse(RFC5114_G),
            parse(RFC5114_Q),
        )
        .unwrap_or_else(|_| unreachable!("RFC 5114 parameters are consistent"))
    }

    /// The textbook group `Z_23^*` generated by 5 (order 22).
    ///
    /// Only useful for worked examples: every discrete log is trivially recoverable.
    pub fn toy() -> Self {
        Self::with_name(
            "toy-23",
            BigUint::from(23u32),
            BigUint::from(5u32),
            BigUint::from(22u32),
        )
        .unwrap_or_else(|_| unreachable!("toy parameters are consistent"))
    }

    fn with_name(name: &'static str, p: BigUint, g: BigUint, n: BigUint) -> Result<Self> {
        let three = BigUint::from(3u32);
        if p <= three || !p.bit(0) {
            return Err(Error::InvalidParams(
                "modulus must be an odd prime greater than 3".to_string(),
            ));
        }
        if g <= BigUint::one() || g >= p {
            return Err(Error::InvalidParams(
                "generator must lie in (1, p)".to_string(),
            ));
        }
        if n <= BigUint::one() || n >= p {
            return Err(Error::InvalidParams("order must lie in (1, p)".to_string()));
        }
        if !mod_pow(&g, &n, &p)?.is_one() {
            return Err(Error::InvalidParams(
                "generator order does not divide n".to_string(),
            ));
        }

        let element_len = byte_len(&p);
        let scalar_len = byte_len(&n);
        Ok(Self {
            name,
            p,
            g,
            n,
            element_len,
            scalar_len,
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    pub fn order(&self) -> &BigUint {
        &self.n
    }

    /// Wraps an integer as a scalar, reducing it modulo `n`.
    pub fn scalar(&self, value: impl Into<BigUint>) -> Scalar {
        Scalar(value.into() % &self.n)
    }

    /// Wraps an integer as an element after checking subgroup membership.
    pub fn element(&self, value: impl Into<BigUint>) -> Result<Element> {
        let value = value.into();
        self.check_element(&value)?;
        Ok(Element(value))
    }

    fn check_element(&self, value: &BigUint) -> Result<()> {
        if value.is_zero() || value >= &self.p {
            return Err(Error::MalformedEncoding(
                "element must lie in [1, p)".to_string(),
            ));
        }
        if value.is_one() {
            return Err(Error::MalformedEncoding(
                "identity element is not a valid encoding".to_string(),
            ));
        }
        if !value.modpow(&self.n, &self.p).is_one() {
            return Err(Error::MalformedEncoding(
                "element is outside the generator's subgroup".to_string(),
            ));
        }
        Ok(())
    }
}

impl Group for ModpGroup {
    type Scalar = Scalar;
    type Element = Element;

    fn name(&self) -> &'static str {
        self.name
    }

    fn generator(&self) -> Self::Element {
        Element(self.g.clone())
    }

    fn identity(&self) -> Self::Element {
        Element(BigUint::one())
    }

    fn is_identity(&self, element: &Self::Element) -> bool {
        element.0.is_one()
    }

    fn scalar_len(&self) -> usize {
        self.scalar_len
    }

    fn element_len(&self) -> usize {
        self.element_len
    }

    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != self.scalar_len {
            return Err(Error::MalformedEncoding(format!(
                "expected {} scalar bytes, got {}",
                self.scalar_len,
                bytes.len()
            )));
        }

        let value = BigUint::from_bytes_be(bytes);
        if value >= self.n {
            return Err(Error::MalformedEncoding(
                "scalar is not reduced modulo the group order".to_string(),
            ));
        }

        Ok(Scalar(value))
    }

    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8> {
        to_fixed_be(&scalar.0, self.scalar_len)
    }

    fn scalar_from_digest(&self, digest: &[u8]) -> Self::Scalar {
        Scalar(BigUint::from_bytes_be(digest) % &self.n)
    }

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar {
        self.scalar(value)
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != self.element_len {
            return Err(Error::MalformedEncoding(format!(
                "expected {} element bytes, got {}",
                self.element_len,
                bytes.len()
            )));
        }

        let value = BigUint::from_bytes_be(bytes);
        self.check_element(&value)?;
        Ok(Element(value))
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        to_fixed_be(&element.0, self.element_len)
    }

    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar {
        Scalar(rng.gen_biguint_range(&BigUint::one(), &self.n))
    }

    fn mul_generator(&self, scalar: &Self::Scalar) -> Self::Element {
        Element(self.g.modpow(&scalar.0, &self.p))
    }

    fn scalar_mul(&self, element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0.modpow(&scalar.0, &self.p))
    }

    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element((&a.0 * &b.0) % &self.p)
    }

    fn negate(&self, element: &Self::Element) -> Self::Element {
        // x^(n-1) is the inverse of any x in the order-n subgroup
        let exp = &self.n - BigUint::one();
        Element(element.0.modpow(&exp, &self.p))
    }

    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar((&a.0 + &b.0) % &self.n)
    }

    fn scalar_sub(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(mod_sub(&a.0, &b.0, &self.n))
    }

    fn scalar_mul_scalar(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar((&a.0 * &b.0) % &self.n)
    }

    fn scalar_negate(&self, scalar: &Self::Scalar) -> Self::Scalar {
        Scalar(mod_neg(&scalar.0, &self.n))
    }

    fn scalar_invert(&self, scalar: &Self::Scalar) -> Option<Self::Scalar> {
        mod_inverse(&scalar.0, &self.n).map(Scalar)
    }

    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero()
    }
}
