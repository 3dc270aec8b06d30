//! Master key `u` with `y = a^u` over a prime field group. A user key is `(k, R)` with
//! `a^k = P = R·y^h`; the prover shows knowledge of `k`:
//!
//! ```text
//! P → V : R, z = a^r
//! V → P : q
//! P → V : resp = r + q·k
//! V     : a^resp · P^(-q) == z
//! ```
//!
//! An interactive verifier derives `q` by hashing a fresh random message; the
//! non-interactive challenge hashes the commitment instead.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::extraction::{bind_identity, identity_public_key};
use super::{require_identity, IdentificationScheme, SchemeKind};
use crate::codec::{put_element, put_scalar, Reader, Wire};
use crate::transcript::Transcript;
use crate::{Error, Group, ModpGroup, Result};

pub const DOMAIN: &[u8] = b"ezkp";
const EXTRACT_DOMAIN: &[u8] = b"ezkp/extract";

/// Length of the random message an interactive verifier hashes into a challenge.
pub const CHALLENGE_MESSAGE_BYTES: usize = 16;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ezkp<G: Group = ModpGroup> {
    group: G,
}

impl Default for Ezkp<ModpGroup> {
    fn default() -> Self {
        Self::new(ModpGroup::rfc5114())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPublicKey<G: Group> {
    pub y: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecretKey<G: Group> {
    u: G::Scalar,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserSecretKey<G: Group> {
    k: G::Scalar,
    #[zeroize(skip)]
    anchor: G::Element,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment<G: Group> {
    pub anchor: G::Element,
    pub z: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProvingState<G: Group> {
    r: G::Scalar,
    k: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge<G: Group> {
    pub q: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<G: Group> {
    pub resp: G::Scalar,
}

impl<G: Group> UserSecretKey<G> {
    pub fn anchor(&self) -> &G::Element {
        &self.anchor
    }
}

impl<G: Group> Ezkp<G> {
    pub fn new(group: G) -> Self {
        Self { group }
    }

    pub fn group(&self) -> &G {
        &self.group
    }

    /// `P = R·y^h` for `identity`.
    pub fn user_public_key(
        &self,
        mpk: &MasterPublicKey<G>,
        identity: &str,
        anchor: &G::Element,
    ) -> G::Element {
        identity_public_key(&self.group, EXTRACT_DOMAIN, identity, anchor, &mpk.y)
    }

    /// `q = H(domain, identity, message) mod n`.
    pub fn challenge_from_message(&self, identity: &str, message: &[u8]) -> Challenge<G> {
        let mut transcript = Transcript::new(DOMAIN);
        transcript.append_group(&self.group);
        transcript.append_identity(identity);
        transcript.append_message(b"challenge-message", message);
        Challenge {
            q: transcript.challenge_scalar(&self.group),
        }
    }
}

/// `resp = r + q·k`.
pub fn response<G: Group>(group: &G, r: &G::Scalar, q: &G::Scalar, k: &G::Scalar) -> G::Scalar {
    group.scalar_add(r, &group.scalar_mul_scalar(q, k))
}

/// `a^resp · P^(-q) == z`.
pub fn check<G: Group>(
    group: &G,
    user_public: &G::Element,
    z: &G::Element,
    q: &G::Scalar,
    resp: &G::Scalar,
) -> bool {
    let expected = group.double_mul(resp, user_public, &group.scalar_negate(q));
    &expected == z
}

impl<G: Group> IdentificationScheme for Ezkp<G> {
    const KIND: SchemeKind = SchemeKind::Ezkp;

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
            u: self.group.random_scalar(rng),
        };
        Ok((self.master_public_key(&msk), msk))
    }

    fn master_public_key(&self, msk: &MasterSecretKey<G>) -> MasterPublicKey<G> {
        MasterPublicKey {
            y: self.group.mul_generator(&msk.u),
        }
    }

    fn extract(&self, msk: &MasterSecretKey<G>, identity: &str) -> Result<UserSecretKey<G>> {
        require_identity(identity)?;
        let (k, anchor) = bind_identity(&self.group, EXTRACT_DOMAIN, &msk.u, identity);
        Ok(UserSecretKey { k, anchor })
    }

    fn commit<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &MasterPublicKey<G>,
        usk: &UserSecretKey<G>,
        identity: &str,
    ) -> Result<(Commitment<G>, ProvingState<G>)> {
        require_identity(identity)?;
        if self.group.mul_generator(&usk.k) != self.user_public_key(mpk, identity, &usk.anchor) {
            return Err(Error::IdentityMismatch(identity.to_string()));
        }
        let r = self.group.random_scalar(rng);
        let commitment = Commitment {
            anchor: usk.anchor.clone(),
            z: self.group.mul_generator(&r),
        };
        Ok((
            commitment,
            ProvingState {
                r,
                k: usk.k.clone(),
            },
        ))
    }

    fn sample_challenge<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        identity: &str,
        _commitment: &Commitment<G>,
    ) -> Challenge<G> {
        let mut message = [0u8; CHALLENGE_MESSAGE_BYTES];
        rng.fill_bytes(&mut message);
        self.challenge_from_message(identity, &message)
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
        transcript.append_element(&self.group, b"master-public", &mpk.y);
        transcript.append_element(&self.group, b"anchor", &commitment.anchor);
        transcript.append_element(&self.group, b"z", &commitment.z);
        Challenge {
            q: transcript.challenge_scalar(&self.group),
        }
    }

    fn respond(&self, state: ProvingState<G>, challenge: &Challenge<G>) -> Result<Response<G>> {
        Ok(Response {
            resp: response(&self.group, &state.r, &challenge.q, &state.k),
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
        let user_public = self.user_public_key(mpk, identity, &commitment.anchor);
        check(
            &self.group,
            &user_public,
            &commitment.z,
            &challenge.q,
            &response.resp,
        )
    }
}

impl<G: Group> Wire<Ezkp<G>> for MasterPublicKey<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.y, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            y: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Ezkp<G>> for MasterSecretKey<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.u, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let u = reader.scalar(&scheme.group)?;
        if scheme.group.scalar_is_zero(&u) {
            return Err(Error::MalformedEncoding("zero master secret".into()));
        }
        Ok(Self { u })
    }
}

impl<G: Group> Wire<Ezkp<G>> for UserSecretKey<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.k, out);
        put_element(&scheme.group, &self.anchor, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            k: reader.scalar(&scheme.group)?,
            anchor: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Ezkp<G>> for Commitment<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.anchor, out);
        put_element(&scheme.group, &self.z, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            anchor: reader.element(&scheme.group)?,
            z: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Ezkp<G>> for Challenge<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.q, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            q: reader.scalar(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Ezkp<G>> for Response<G> {
    fn write(&self, scheme: &Ezkp<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.resp, out);
    }

    fn read(scheme: &Ezkp<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            resp: reader.scalar(&scheme.group)?,
        })
    }
}
