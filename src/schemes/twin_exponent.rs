//! Twin-exponent identification (TNC). The master key is `a` with `y1 = a·G` and
//! `y2 = a²·G`. A user key is a Schnorr-like signature `(s, x)` on the identity whose
//! commitments `U = r·G` and `V = r·y1` are recoverable from the public key alone:
//!
//! ```text
//! U = s·G  − x·y1
//! V = s·y1 − x·y2
//! x = H(identity, U, V)
//! ```
//!
//! The prover then shows knowledge of `s` simultaneously in base `G` and base `y1`:
//!
//! ```text
//! P → V : U, V, T1 = t·G, T2 = t·y1
//! V → P : c
//! P → V : e = t + c·s
//! V     : e·G == T1 + c·(U + x·y1)  and  e·y1 == T2 + c·(V + x·y2)
//! ```

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::extraction::derive_nonce;
use super::{require_identity, IdentificationScheme, SchemeKind};
use crate::codec::{put_element, put_scalar, Reader, Wire};
use crate::transcript::Transcript;
use crate::{Error, Group, Result, Secp256k1};

pub const DOMAIN: &[u8] = b"twin-exponent";
const EXTRACT_DOMAIN: &[u8] = b"twin-exponent/extract";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwinExponent<G: Group = Secp256k1> {
    group: G,
}

impl Default for TwinExponent<Secp256k1> {
    fn default() -> Self {
        Self::new(Secp256k1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPublicKey<G: Group> {
    pub y1: G::Element,
    pub y2: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecretKey<G: Group> {
    a: G::Scalar,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserSecretKey<G: Group> {
    s: G::Scalar,
    #[zeroize(skip)]
    x: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment<G: Group> {
    pub u: G::Element,
    pub v: G::Element,
    pub t1: G::Element,
    pub t2: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProvingState<G: Group> {
    t: G::Scalar,
    s: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge<G: Group> {
    pub c: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<G: Group> {
    pub e: G::Scalar,
}

impl<G: Group> TwinExponent<G> {
    pub fn new(group: G) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &G {
        &self.group
    }

    fn identity_hash(&self, identity: &str, u: &G::Element, v: &G::Element) -> G::Scalar {
        let mut transcript = Transcript::new(EXTRACT_DOMAIN);
        transcript.append_group(&self.group);
        transcript.append_identity(identity);
        transcript.append_element(&self.group, b"u", u);
        transcript.append_element(&self.group, b"v", v);
        transcript.challenge_scalar(&self.group)
    }

    /// Recovers `(U, V)` from a user key.
    fn recover(
        &self,
        mpk: &MasterPublicKey<G>,
        usk: &UserSecretKey<G>,
    ) -> (G::Element, G::Element) {
        let minus_x = self.group.scalar_negate(&usk.x);
        let u = self.group.double_mul(&usk.s, &mpk.y1, &minus_x);
        let v = self.group.combine(
            &self.group.scalar_mul(&mpk.y1, &usk.s),
            &self.group.scalar_mul(&mpk.y2, &minus_x),
        );
        (u, v)
    }
}

impl<G: Group> IdentificationScheme for TwinExponent<G> {
    const KIND: SchemeKind = SchemeKind::TwinExponent;

    type MasterPublicKey = MasterPublicKey<G>;
    type MasterSecretKey = MasterSecretKey<G>;
    type UserSecretKey = UserSecretKey<G>;
    type Commitment = Commitment<G>;
    type ProvingState = ProvingState<G>;
    type Challenge = Challenge<G>;
    type Response = Response<G>;

    fn setup<R: CryptoRngCore>(
        &self,
        rng: &mut R,
    ) -> Result<(MasterPublicKey<G>, MasterSecretKey<G>)> {
        let msk = MasterSecretKey {
            a: self.group.random_scalar(rng),
        };
        Ok((self.master_public_key(&msk), msk))
    }

    fn master_public_key(&self, msk: &MasterSecretKey<G>) -> MasterPublicKey<G> {
        let y1 = self.group.mul_generator(&msk.a);
        let y2 = self.group.scalar_mul(&y1, &msk.a);
        MasterPublicKey { y1, y2 }
    }

    fn extract(&self, msk: &MasterSecretKey<G>, identity: &str) -> Result<UserSecretKey<G>> {
        require_identity(identity)?;
        let r = derive_nonce(&self.group, EXTRACT_DOMAIN, &[&msk.a], identity, 0);
        let u = self.group.mul_generator(&r);
        let v = self.group.scalar_mul(&u, &msk.a);
        let x = self.identity_hash(identity, &u, &v);
        let s = self
            .group
            .scalar_add(&r, &self.group.scalar_mul_scalar(&x, &msk.a));
        Ok(UserSecretKey { s, x })
    }

    fn commit<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &MasterPublicKey<G>,
        usk: &UserSecretKey<G>,
        identity: &str,
    ) -> Result<(Commitment<G>, ProvingState<G>)> {
        require_identity(identity)?;
        let (u, v) = self.recover(mpk, usk);
        if self.group.is_identity(&u)
            || self.group.is_identity(&v)
            || self.identity_hash(identity, &u, &v) != usk.x
        {
            return Err(Error::IdentityMismatch(identity.to_string()));
        }
        let t = self.group.random_scalar(rng);
        let commitment = Commitment {
            u,
            v,
            t1: self.group.mul_generator(&t),
            t2: self.group.scalar_mul(&mpk.y1, &t),
        };
        Ok((
            commitment,
            ProvingState {
                t,
                s: usk.s.clone(),
            },
        ))
    }

    fn sample_challenge<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        _identity: &str,
        _commitment: &Commitment<G>,
    ) -> Challenge<G> {
        Challenge {
            c: self.group.random_scalar(rng),
        }
    }

    fn derive_challenge(
        &self,
        mpk: &MasterPublicKey<G>,
        identity: &str,
        commitment: &Commitment<G>,
    ) -> Challenge<G> {
        let mut transcript = Transcript::new(DOMAIN);
        transcript.append_group(&self.group);
        transcript.append_identity(identity);
        transcript.append_element(&self.group, b"y1", &mpk.y1);
        transcript.append_element(&self.group, b"y2", &mpk.y2);
        transcript.append_element(&self.group, b"u", &commitment.u);
        transcript.append_element(&self.group, b"v", &commitment.v);
        transcript.append_element(&self.group, b"t1", &commitment.t1);
        transcript.append_element(&self.group, b"t2", &commitment.t2);
        Challenge {
            c: transcript.challenge_scalar(&self.group),
        }
    }

    fn respond(&self, state: ProvingState<G>, challenge: &Challenge<G>) -> Result<Response<G>> {
        let e = self
            .group
            .scalar_add(&state.t, &self.group.scalar_mul_scalar(&challenge.c, &state.s));
        Ok(Response { e })
    }

    fn verify(
        &self,
        mpk: &MasterPublicKey<G>,
        identity: &str,
        commitment: &Commitment<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
    ) -> bool {
        if identity.is_empty() {
            return false;
        }
        let group = &self.group;
        let x = self.identity_hash(identity, &commitment.u, &commitment.v);
        // s·G and s·y1, rebuilt from the public identity commitments.
        let s_g = group.combine(&commitment.u, &group.scalar_mul(&mpk.y1, &x));
        let s_y1 = group.combine(&commitment.v, &group.scalar_mul(&mpk.y2, &x));

        let lhs_g = group.mul_generator(&response.e);
        let rhs_g = group.combine(&commitment.t1, &group.scalar_mul(&s_g, &challenge.c));
        let lhs_y1 = group.scalar_mul(&mpk.y1, &response.e);
        let rhs_y1 = group.combine(&commitment.t2, &group.scalar_mul(&s_y1, &challenge.c));
        lhs_g == rhs_g && lhs_y1 == rhs_y1
    }
}

impl<G: Group> Wire<TwinExponent<G>> for MasterPublicKey<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.y1, out);
        put_element(&scheme.group, &self.y2, out);
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            y1: reader.element(&scheme.group)?,
            y2: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinExponent<G>> for MasterSecretKey<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.a, out);
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let a = reader.scalar(&scheme.group)?;
        if scheme.group.scalar_is_zero(&a) {
            return Err(Error::MalformedEncoding("zero master secret".into()));
        }
        Ok(Self { a })
    }
}

impl<G: Group> Wire<TwinExponent<G>> for UserSecretKey<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.s, out);
        put_scalar(&scheme.group, &self.x, out);
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            s: reader.scalar(&scheme.group)?,
            x: reader.scalar(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinExponent<G>> for Commitment<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        for element in [&self.u, &self.v, &self.t1, &self.t2] {
            put_element(&scheme.group, element, out);
        }
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            u: reader.element(&scheme.group)?,
            v: reader.element(&scheme.group)?,
            t1: reader.element(&scheme.group)?,
            t2: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinExponent<G>> for Challenge<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.c, out);
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            c: reader.scalar(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinExponent<G>> for Response<G> {
    fn write(&self, scheme: &TwinExponent<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.e, out);
    }

    fn read(scheme: &TwinExponent<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            e: reader.scalar(&scheme.group)?,
        })
    }
}
