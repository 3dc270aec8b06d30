//! The secp256k1 elliptic curve group.
//!
//! Points are held in projective coordinates and travel SEC1-compressed (33 bytes);
//! scalars travel as 32-byte big-endian integers.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Field, PrimeField};
use k256::{AffinePoint, EncodedPoint, FieldBytes, ProjectivePoint, Scalar as K256Scalar, U256};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

const SCALAR_BYTES: usize = 32;

const COMPRESSED_BYTES: usize = 33;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Secp256k1;

/// Integer modulo the curve order.
#[derive(Clone, Debug)]
pub struct Scalar(K256Scalar);

/// Curve point. Equality compares the underlying point, not its projective representation.
#[derive(Clone, Copy, Debug)]
pub struct Element(ProjectivePoint);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0 = K256Scalar::ZERO;
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_affine() == other.0.to_affine()
    }
}

impl Eq for Element {}

impl Scalar {
    pub fn inner(&self) -> &K256Scalar {
        &self.0
    }
}

impl Element {
    pub fn inner(&self) -> &ProjectivePoint {
        &self.0
    }
}

impl Group for Secp256k1 {
    type Scalar = Scalar;
    type Element = Element;

    fn name(&self) -> &'static str {
        "secp256k1"
    }

    fn generator(&self) -> Self::Element {
        Element(ProjectivePoint::GENERATOR)
    }

    fn identity(&self) -> Self::Element {
        Element(ProjectivePoint::IDENTITY)
    }

    fn is_identity(&self, element: &Self::Element) -> bool {
        element.0.ct_eq(&ProjectivePoint::IDENTITY).into()
    }

    fn scalar_len(&self) -> usize {
        SCALAR_BYTES
    }

    fn element_len(&self) -> usize {
        COMPRESSED_BYTES
    }

    fn scalar_from_bytes(&self, bytes: &[u8]) -> Result<Self::Scalar> {
        let repr: [u8; SCALAR_BYTES] = bytes.try_into().map_err(|_| {
            Error::MalformedEncoding(format!(
                "expected {} scalar bytes, got {}",
                SCALAR_BYTES,
                bytes.len()
            ))
        })?;

        Option::<K256Scalar>::from(K256Scalar::from_repr(FieldBytes::from(repr)))
            .map(Scalar)
            .ok_or_else(|| {
                Error::MalformedEncoding(
                    "scalar is not reduced modulo the curve order".to_string(),
                )
            })
    }

    fn scalar_to_bytes(&self, scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_from_digest(&self, digest: &[u8]) -> Self::Scalar {
        debug_assert!(digest.len() <= SCALAR_BYTES);
        let mut wide = FieldBytes::default();
        let offset = SCALAR_BYTES.saturating_sub(digest.len());
        wide[offset..].copy_from_slice(&digest[digest.len().saturating_sub(SCALAR_BYTES)..]);
        Scalar(<K256Scalar as Reduce<U256>>::reduce_bytes(&wide))
    }

    fn scalar_from_u64(&self, value: u64) -> Self::Scalar {
        Scalar(K256Scalar::from(value))
    }

    fn element_from_bytes(&self, bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != COMPRESSED_BYTES {
            return Err(Error::MalformedEncoding(format!(
                "expected {} compressed point bytes, got {}",
                COMPRESSED_BYTES,
                bytes.len()
            )));
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(Error::MalformedEncoding(format!(
                "unexpected point tag {:#04x}",
                bytes[0]
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::MalformedEncoding("unparsable SEC1 point".to_string()))?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(Error::PointNotOnCurve)?;

        Ok(Element(ProjectivePoint::from(affine)))
    }

    fn element_to_bytes(&self, element: &Self::Element) -> Vec<u8> {
        element.0.to_affine().to_encoded_point(true).as_bytes().to_vec()
    }

    fn random_scalar<R: CryptoRngCore>(&self, rng: &mut R) -> Self::Scalar {
        loop {
            let candidate = K256Scalar::random(&mut *rng);
            if !bool::from(candidate.is_zero()) {
                return Scalar(candidate);
            }
        }
    }

    fn mul_generator(&self, scalar: &Self::Scalar) -> Self::Element {
        Element(ProjectivePoint::GENERATOR * scalar.0)
    }

    fn scalar_mul(&self, element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0 * scalar.0)
    }

    fn combine(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn negate(&self, element: &Self::Element) -> Self::Element {
        Element(-element.0)
    }

    fn scalar_add(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_sub(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 - b.0)
    }

    fn scalar_mul_scalar(&self, a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_negate(&self, scalar: &Self::Scalar) -> Self::Scalar {
        Scalar(-scalar.0)
    }

    fn scalar_invert(&self, scalar: &Self::Scalar) -> Option<Self::Scalar> {
        Option::<K256Scalar>::from(scalar.0.invert()).map(Scalar)
    }

    fn scalar_is_zero(&self, scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    const ORDER_HEX: &str = "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

    #[test]
    fn scalar_equal_to_order_is_rejected() {
        let order = hex::decode(ORDER_HEX).unwrap();
        assert!(matches!(
            Secp256k1.scalar_from_bytes(&order),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn digest_reduction_wraps_order() {
        let order = hex::decode(ORDER_HEX).unwrap();
        let reduced = Secp256k1.scalar_from_digest(&order);
        assert!(Secp256k1.scalar_is_zero(&reduced));
    }

    #[test]
    fn scalar_inversion() {
        let mut rng = SecureRng::new();
        let a = Secp256k1.random_scalar(&mut rng);
        let a_inv = Secp256k1.scalar_invert(&a).unwrap();
        assert_eq!(
            Secp256k1.scalar_mul_scalar(&a, &a_inv),
            Secp256k1.scalar_from_u64(1)
        );
    }

    #[test]
    fn element_serialization() {
        let mut rng = SecureRng::new();
        let x = Secp256k1.random_scalar(&mut rng);
        let y = Secp256k1.mul_generator(&x);

        let bytes = Secp256k1.element_to_bytes(&y);
        assert_eq!(bytes.len(), COMPRESSED_BYTES);
        assert_eq!(Secp256k1.element_from_bytes(&bytes).unwrap(), y);
    }

    #[test]
    fn off_curve_x_is_rejected() {
        // x equal to the field modulus is not a canonical coordinate
        const FIELD_MODULUS: &str =
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f";
        let field_modulus = hex::decode(FIELD_MODULUS).unwrap();
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&field_modulus);
        assert_eq!(
            Secp256k1.element_from_bytes(&bytes),
            Err(Error::PointNotOnCurve)
        );
    }

    #[test]
    fn bad_tag_and_length_are_malformed() {
        let g = Secp256k1.element_to_bytes(&Secp256k1.generator());
        let mut uncompressed_tag = g.clone();
        uncompressed_tag[0] = 0x04;
        assert!(matches!(
            Secp256k1.element_from_bytes(&uncompressed_tag),
            Err(Error::MalformedEncoding(_))
        ));
        assert!(matches!(
            Secp256k1.element_from_bytes(&g[..32]),
            Err(Error::MalformedEncoding(_))
        ));
        assert!(matches!(
            Secp256k1.element_from_bytes(&[0u8]),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn identity_detection() {
        let g = Secp256k1.generator();
        assert!(Secp256k1.is_identity(&Secp256k1.identity()));
        assert!(Secp256k1.is_identity(&Secp256k1.combine(&g, &Secp256k1.negate(&g))));
        assert!(!Secp256k1.is_identity(&g));
    }

    #[test]
    fn scalar_of_wrong_length_is_malformed() {
        assert!(matches!(
            Secp256k1.scalar_from_bytes(&[1u8; 31]),
            Err(Error::MalformedEncoding(_))
        ));
        assert!(Secp256k1.scalar_from_bytes(&[1u8; 32]).is_ok());
    }

    #[test]
    fn addition_matches_scalar_addition() {
        let mut rng = SecureRng::new();
        let a = Secp256k1.random_scalar(&mut rng);
        let b = Secp256k1.random_scalar(&mut rng);

        let (ga, gb) = (Secp256k1.mul_generator(&a), Secp256k1.mul_generator(&b));
        let sum_points = Secp256k1.combine(&ga, &gb);
        let sum_scalars = Secp256k1.mul_generator(&Secp256k1.scalar_add(&a, &b));
        assert_eq!(sum_points, sum_scalars);

        let back = Secp256k1.combine(&sum_points, &Secp256k1.negate(&gb));
        assert_eq!(back, ga);
    }
}
