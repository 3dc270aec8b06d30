//! Two-base Schnorr identification. The master key is a pair `(sk1, sk2)` with
//! `vk_i = sk_i·G` and `X = -(sk1·vk1 + sk2·vk2)`. A user key `(s1, s2, R)` satisfies
//!
//! ```text
//! vk1·s1 + vk2·s2 == R − α·X,   α = H(identity, R, X)
//! ```
//!
//! and the prover shows knowledge of a representation of `R − α·X` in bases `(vk1, vk2)`:
//!
//! ```text
//! P → V : Y = y1·vk1 + y2·vk2, R
//! V → P : c
//! P → V : z1 = y1 + c·s1, z2 = y2 + c·s2
//! V     : z1·vk1 + z2·vk2 == Y + c·(R − α·X)
//! ```

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::extraction::derive_nonce;
use super::{require_identity, IdentificationScheme, SchemeKind};
use crate::codec::{put_element, put_scalar, Reader, Wire};
use crate::transcript::Transcript;
use crate::{Error, Group, Result, Secp256k1};

pub const DOMAIN: &[u8] = b"twin-schnorr";
const EXTRACT_DOMAIN: &[u8] = b"twin-schnorr/extract";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwinSchnorr<G: Group = Secp256k1> {
    group: G,
}

impl Default for TwinSchnorr<Secp256k1> {
    fn default() -> Self {
        Self::new(Secp256k1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPublicKey<G: Group> {
    pub vk1: G::Element,
    pub vk2: G::Element,
    pub x: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecretKey<G: Group> {
    sk1: G::Scalar,
    sk2: G::Scalar,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserSecretKey<G: Group> {
    s1: G::Scalar,
    s2: G::Scalar,
    #[zeroize(skip)]
    r: G::Element,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment<G: Group> {
    pub y: G::Element,
    pub r: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProvingState<G: Group> {
    y1: G::Scalar,
    y2: G::Scalar,
    s1: G::Scalar,
    s2: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge<G: Group> {
    pub c: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<G: Group> {
    pub z1: G::Scalar,
    pub z2: G::Scalar,
}

impl<G: Group> TwinSchnorr<G> {
    pub fn new(group: G) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &G {
        &self.group
    }

    fn alpha(&self, identity: &str, r: &G::Element, x: &G::Element) -> G::Scalar {
        let mut transcript = Transcript::new(EXTRACT_DOMAIN);
        transcript.append_group(&self.group);
        transcript.append_identity(identity);
        transcript.append_element(&self.group, b"r", r);
        transcript.append_element(&self.group, b"x", x);
        transcript.challenge_scalar(&self.group)
    }

    /// `a·vk1 + b·vk2`.
    fn represent(&self, mpk: &MasterPublicKey<G>, a: &G::Scalar, b: &G::Scalar) -> G::Element {
        self.group.combine(
            &self.group.scalar_mul(&mpk.vk1, a),
            &self.group.scalar_mul(&mpk.vk2, b),
        )
    }

    /// `R − α·X`, the element the user key represents.
    fn target(&self, mpk: &MasterPublicKey<G>, identity: &str, r: &G::Element) -> G::Element {
        let alpha = self.alpha(identity, r, &mpk.x);
        self.group.combine(
            r,
            &self.group.scalar_mul(&mpk.x, &self.group.scalar_negate(&alpha)),
        )
    }
}

impl<G: Group> IdentificationScheme for TwinSchnorr<G> {
    const KIND: SchemeKind = SchemeKind::TwinSchnorr;

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
        loop {
            let msk = MasterSecretKey {
                sk1: self.group.random_scalar(rng),
                sk2: self.group.random_scalar(rng),
            };
            let mpk = self.master_public_key(&msk);
            // X is the identity only when sk1² + sk2² ≡ 0 (mod n).
            if !self.group.is_identity(&mpk.x) {
                return Ok((mpk, msk));
            }
        }
    }

    fn master_public_key(&self, msk: &MasterSecretKey<G>) -> MasterPublicKey<G> {
        let vk1 = self.group.mul_generator(&msk.sk1);
        let vk2 = self.group.mul_generator(&msk.sk2);
        let sum = self.group.combine(
            &self.group.scalar_mul(&vk1, &msk.sk1),
            &self.group.scalar_mul(&vk2, &msk.sk2),
        );
        MasterPublicKey {
            vk1,
            vk2,
            x: self.group.negate(&sum),
        }
    }

    fn extract(&self, msk: &MasterSecretKey<G>, identity: &str) -> Result<UserSecretKey<G>> {
        require_identity(identity)?;
        let mpk = self.master_public_key(msk);
        let secrets = [&msk.sk1, &msk.sk2];
        let r1 = derive_nonce(&self.group, EXTRACT_DOMAIN, &secrets, identity, 0);
        let r2 = derive_nonce(&self.group, EXTRACT_DOMAIN, &secrets, identity, 1);
        let r = self.represent(&mpk, &r1, &r2);
        let alpha = self.alpha(identity, &r, &mpk.x);
        let s1 = self
            .group
            .scalar_add(&r1, &self.group.scalar_mul_scalar(&msk.sk1, &alpha));
        let s2 = self
            .group
            .scalar_add(&r2, &self.group.scalar_mul_scalar(&msk.sk2, &alpha));
        Ok(UserSecretKey { s1, s2, r })
    }

    fn commit<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &MasterPublicKey<G>,
        usk: &UserSecretKey<G>,
        identity: &str,
    ) -> Result<(Commitment<G>, ProvingState<G>)> {
        require_identity(identity)?;
        if self.represent(mpk, &usk.s1, &usk.s2) != self.target(mpk, identity, &usk.r) {
            return Err(Error::IdentityMismatch(identity.to_string()));
        }
        let y1 = self.group.random_scalar(rng);
        let y2 = self.group.random_scalar(rng);
        let commitment = Commitment {
            y: self.represent(mpk, &y1, &y2),
            r: usk.r.clone(),
        };
        Ok((
            commitment,
            ProvingState {
                y1,
                y2,
                s1: usk.s1.clone(),
                s2: usk.s2.clone(),
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
        transcript.append_element(&self.group, b"vk1", &mpk.vk1);
        transcript.append_element(&self.group, b"vk2", &mpk.vk2);
        transcript.append_element(&self.group, b"x", &mpk.x);
        transcript.append_element(&self.group, b"r", &commitment.r);
        transcript.append_element(&self.group, b"y", &commitment.y);
        Challenge {
            c: transcript.challenge_scalar(&self.group),
        }
    }

    fn respond(&self, state: ProvingState<G>, challenge: &Challenge<G>) -> Result<Response<G>> {
        let group = &self.group;
        Ok(Response {
            z1: group.scalar_add(&state.y1, &group.scalar_mul_scalar(&challenge.c, &state.s1)),
            z2: group.scalar_add(&state.y2, &group.scalar_mul_scalar(&challenge.c, &state.s2)),
        })
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
        let target = self.target(mpk, identity, &commitment.r);
        let lhs = self.represent(mpk, &response.z1, &response.z2);
        let rhs = self.group.combine(
            &commitment.y,
            &self.group.scalar_mul(&target, &challenge.c),
        );
        lhs == rhs
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for MasterPublicKey<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        for element in [&self.vk1, &self.vk2, &self.x] {
            put_element(&scheme.group, element, out);
        }
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            vk1: reader.element(&scheme.group)?,
            vk2: reader.element(&scheme.group)?,
            x: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for MasterSecretKey<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.sk1, out);
        put_scalar(&scheme.group, &self.sk2, out);
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let sk1 = reader.scalar(&scheme.group)?;
        let sk2 = reader.scalar(&scheme.group)?;
        if scheme.group.scalar_is_zero(&sk1) || scheme.group.scalar_is_zero(&sk2) {
            return Err(Error::MalformedEncoding("zero master secret".into()));
        }
        Ok(Self { sk1, sk2 })
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for UserSecretKey<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.s1, out);
        put_scalar(&scheme.group, &self.s2, out);
        put_element(&scheme.group, &self.r, out);
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            s1: reader.scalar(&scheme.group)?,
            s2: reader.scalar(&scheme.group)?,
            r: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for Commitment<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.y, out);
        put_element(&scheme.group, &self.r, out);
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            y: reader.element(&scheme.group)?,
            r: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for Challenge<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.c, out);
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            c: reader.scalar(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<TwinSchnorr<G>> for Response<G> {
    fn write(&self, scheme: &TwinSchnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.z1, out);
        put_scalar(&scheme.group, &self.z2, out);
    }

    fn read(scheme: &TwinSchnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            z1: reader.scalar(&scheme.group)?,
            z2: reader.scalar(&scheme.group)?,
        })
    }
}
