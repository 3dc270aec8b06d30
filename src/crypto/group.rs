use core::fmt::Debug;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::Result;

/// A finite cyclic group of order `n` together with its scalar field.
///
/// Every operation takes `&self`: the group value *is* the parameter set (modulus, generator,
/// order).
///
/// Encodings are canonical and fixed width. Decoding never reduces silently: a scalar `>= n`,
/// an element outside the group, or a byte string of the wrong length is an error.
pub trait Group: Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    /// Integers modulo the group order `n`.
    type Scalar: Clone + Debug + Eq + PartialEq + Zeroize + Send + Sync;

    /// Group elements. Equality is algebraic, independent of internal representation.
    type Element: Clone + Debug + Eq + PartialEq + Send + Sync;

    /// Human readable name, also bound into transcripts.
    fn name(&self) -> &'static str;

    /// The fixed generator of the group.
    fn generator(&self) -> Self::Element;

    fn identity(&self) -> Self::Element;

    fn is_identity(&self, element: &Self::Element) -> bool;

    /// Width in bytes of an encoded scalar.
    fn scalar_len(&self) -> usize;

    /// Width in bytes of an encoded element.
    fn element_len(&self) -> usize;

    /// Decodes a big-endian scalar, rejecting values `>= n`.
    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar>;

    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8>;

    /// Interprets a hash digest as a big-endian integer and reduces it modulo `n`.
    fn scalar_from_digest(&self, digest: &[u8]) -> Self::Scalar;

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar;

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element>;

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8>;

    /// Samples a uniform scalar in `[1, n - 1]`.
    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar;

    /// Fixed-base multiplication `scalar · G`.
    fn mul_generator(&self, scalar: &Self::Scalar) -> Self::Element;

    /// Variable-base multiplication `scalar · element`.
    fn scalar_mul(&self, element: &Self::Element, scalar: &Self::Scalar) -> Self::Element;

    /// The group law (point addition, or multiplication mod p).
    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Group inverse of an element.
    fn negate(&self, element: &Self::Element) -> Self::Element;

    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_sub(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_mul_scalar(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    fn scalar_negate(&self, scalar: &Self::Scalar) -> Self::Scalar;

    /// Multiplicative inverse modulo `n`, `None` when it does not exist.
    fn scalar_invert(&self, scalar: &Self::Scalar) -> Option<Self::Scalar>;

    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool;

    /// `a · G + b · element`, the shape of every verification equation.
    fn double_mul(
        &self,
        a: &Self::Scalar,
        element: &Self::Element,
        b: &Self::Scalar,
    ) -> Self::Element {
        self.combine(&self.mul_generator(a), &self.scalar_mul(element, b))
    }
}
