//! The master key `x`, `Y = x·G`, binds each identity Schnorr-style to a user key `(s, R)`
//! with `V = s·G = R + h·Y`. One round of the protocol:
//!
//! ```text
//! P → V : X = r·G
//! V → P : c
//! P → V : y = r + c·s
//! V     : y·G == X + c·V
//! ```
//!
//! With [`ChallengeMode::Bits`] each challenge is a single bit and the protocol runs that many
//! rounds in parallel, one nonce per round; soundness error is `2^-rounds`.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::extraction::{bind_identity, identity_public_key};
use super::{require_identity, IdentificationScheme, SchemeKind};
use crate::codec::{put_element, put_scalar, Reader, Wire};
use crate::transcript::{Transcript, MAX_CHALLENGE_BITS};
use crate::{Error, Group, Result, Secp256k1};

pub const DOMAIN: &[u8] = b"fiat-shamir";
const EXTRACT_DOMAIN: &[u8] = b"fiat-shamir/extract";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChallengeMode {
    /// One round with a challenge uniform in `Z_n`.
    #[default]
    Scalar,
    /// `rounds` parallel rounds with challenges in `{0, 1}`.
    Bits { rounds: usize },
}

impl ChallengeMode {
    pub fn rounds(&self) -> usize {
        match self {
            ChallengeMode::Scalar => 1,
            ChallengeMode::Bits { rounds } => *rounds,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schnorr<G: Group = Secp256k1> {
    group: G,
    mode: ChallengeMode,
}

impl Default for Schnorr<Secp256k1> {
    fn default() -> Self {
        Self {
            group: Secp256k1,
            mode: ChallengeMode::Scalar,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPublicKey<G: Group> {
    pub y: G::Element,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecretKey<G: Group> {
    x: G::Scalar,
}

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct UserSecretKey<G: Group> {
    s: G::Scalar,
    #[zeroize(skip)]
    anchor: G::Element,
}

/// The identity anchor `R` followed by one `X_i` per round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commitment<G: Group> {
    pub anchor: G::Element,
    pub rounds: Vec<G::Element>,
}

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ProvingState<G: Group> {
    nonces: Vec<G::Scalar>,
    s: G::Scalar,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge<G: Group> {
    pub values: Vec<G::Scalar>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response<G: Group> {
    pub values: Vec<G::Scalar>,
}

impl<G: Group> UserSecretKey<G> {
    pub fn anchor(&self) -> &G::Element {
        &self.anchor
    }
}

impl<G: Group> Schnorr<G> {
    pub fn new(group: G, mode: ChallengeMode) -> Result<Self> {
        if let ChallengeMode::Bits { rounds } = mode {
            if rounds == 0 || rounds > MAX_CHALLENGE_BITS {
                return Err(Error::InvalidParams(format!(
                    "bit challenges need 1..={MAX_CHALLENGE_BITS} rounds, got {rounds}"
                )));
            }
        }
        Ok(Self { group, mode })
    }

    pub fn group(&self) -> &G {
        &self.group
    }

    pub fn mode(&self) -> ChallengeMode {
        self.mode
    }

    /// `V = R + h·Y`.
    pub fn user_public_key(
        &self,
        mpk: &MasterPublicKey<G>,
        identity: &str,
        anchor: &G::Element,
    ) -> G::Element {
        identity_public_key(&self.group, EXTRACT_DOMAIN, identity, anchor, &mpk.y)
    }

    fn is_bit(&self, value: &G::Scalar) -> bool {
        self.group.scalar_is_zero(value) || *value == self.group.scalar_from_u64(1)
    }

    fn accepts_challenge(&self, challenge: &Challenge<G>) -> bool {
        challenge.values.len() == self.mode.rounds()
            && match self.mode {
                ChallengeMode::Scalar => true,
                ChallengeMode::Bits { .. } => challenge.values.iter().all(|c| self.is_bit(c)),
            }
    }
}

/// `y·G == X + c·V`.
pub fn check<G: Group>(
    group: &G,
    user_public: &G::Element,
    x: &G::Element,
    c: &G::Scalar,
    y: &G::Scalar,
) -> bool {
    group.mul_generator(y) == group.combine(x, &group.scalar_mul(user_public, c))
}

impl<G: Group> IdentificationScheme for Schnorr<G> {
    const KIND: SchemeKind = SchemeKind::FiatShamir;

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
            x: self.group.random_scalar(rng),
        };
        Ok((self.master_public_key(&msk), msk))
    }

    fn master_public_key(&self, msk: &MasterSecretKey<G>) -> MasterPublicKey<G> {
        MasterPublicKey {
            y: self.group.mul_generator(&msk.x),
        }
    }

    fn extract(&self, msk: &MasterSecretKey<G>, identity: &str) -> Result<UserSecretKey<G>> {
        require_identity(identity)?;
        let (s, anchor) = bind_identity(&self.group, EXTRACT_DOMAIN, &msk.x, identity);
        Ok(UserSecretKey { s, anchor })
    }

    fn commit<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &MasterPublicKey<G>,
        usk: &UserSecretKey<G>,
        identity: &str,
    ) -> Result<(Commitment<G>, ProvingState<G>)> {
        require_identity(identity)?;
        if self.group.mul_generator(&usk.s) != self.user_public_key(mpk, identity, &usk.anchor) {
            return Err(Error::IdentityMismatch(identity.to_string()));
        }
        let nonces: Vec<G::Scalar> = (0..self.mode.rounds())
            .map(|_| self.group.random_scalar(rng))
            .collect();
        let commitment = Commitment {
            anchor: usk.anchor.clone(),
            rounds: nonces.iter().map(|r| self.group.mul_generator(r)).collect(),
        };
        Ok((
            commitment,
            ProvingState {
                nonces,
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
        let values = match self.mode {
            ChallengeMode::Scalar => vec![self.group.random_scalar(rng)],
            ChallengeMode::Bits { rounds } => (0..rounds)
                .map(|_| self.group.scalar_from_u64(u64::from(rng.next_u32() & 1)))
                .collect(),
        };
        Challenge { values }
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
        for x in &commitment.rounds {
            transcript.append_element(&self.group, b"round-commitment", x);
        }
        let values = match self.mode {
            ChallengeMode::Scalar => vec![transcript.challenge_scalar(&self.group)],
            ChallengeMode::Bits { rounds } => transcript
                .challenge_bits(rounds)
                .into_iter()
                .map(|bit| self.group.scalar_from_u64(u64::from(bit)))
                .collect(),
        };
        Challenge { values }
    }

    fn respond(&self, state: ProvingState<G>, challenge: &Challenge<G>) -> Result<Response<G>> {
        if challenge.values.len() != state.nonces.len() {
            return Err(Error::MalformedEncoding(format!(
                "challenge covers {} rounds, commitment has {}",
                challenge.values.len(),
                state.nonces.len()
            )));
        }
        let values = state
            .nonces
            .iter()
            .zip(&challenge.values)
            .map(|(r, c)| {
                self.group
                    .scalar_add(r, &self.group.scalar_mul_scalar(c, &state.s))
            })
            .collect();
        Ok(Response { values })
    }

    fn verify(
        &self,
        mpk: &MasterPublicKey<G>,
        identity: &str,
        commitment: &Commitment<G>,
        challenge: &Challenge<G>,
        response: &Response<G>,
    ) -> bool {
        if identity.is_empty()
            || !self.accepts_challenge(challenge)
            || commitment.rounds.len() != challenge.values.len()
            || response.values.len() != challenge.values.len()
        {
            return false;
        }
        let user_public = self.user_public_key(mpk, identity, &commitment.anchor);
        commitment
            .rounds
            .iter()
            .zip(&challenge.values)
            .zip(&response.values)
            .all(|((x, c), y)| check(&self.group, &user_public, x, c, y))
    }
}

impl<G: Group> Wire<Schnorr<G>> for MasterPublicKey<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.y, out);
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            y: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Schnorr<G>> for MasterSecretKey<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.x, out);
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let x = reader.scalar(&scheme.group)?;
        if scheme.group.scalar_is_zero(&x) {
            return Err(Error::MalformedEncoding("zero master secret".into()));
        }
        Ok(Self { x })
    }
}

impl<G: Group> Wire<Schnorr<G>> for UserSecretKey<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        put_scalar(&scheme.group, &self.s, out);
        put_element(&scheme.group, &self.anchor, out);
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            s: reader.scalar(&scheme.group)?,
            anchor: reader.element(&scheme.group)?,
        })
    }
}

impl<G: Group> Wire<Schnorr<G>> for Commitment<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        put_element(&scheme.group, &self.anchor, out);
        for x in &self.rounds {
            put_element(&scheme.group, x, out);
        }
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let anchor = reader.element(&scheme.group)?;
        let rounds = (0..scheme.mode.rounds())
            .map(|_| reader.element(&scheme.group))
            .collect::<Result<_>>()?;
        Ok(Self { anchor, rounds })
    }
}

impl<G: Group> Wire<Schnorr<G>> for Challenge<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        for c in &self.values {
            put_scalar(&scheme.group, c, out);
        }
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let values = (0..scheme.mode.rounds())
            .map(|_| reader.scalar(&scheme.group))
            .collect::<Result<Vec<_>>>()?;
        let challenge = Self { values };
        if !scheme.accepts_challenge(&challenge) {
            return Err(Error::MalformedEncoding("challenge bit out of range".into()));
        }
        Ok(challenge)
    }
}

impl<G: Group> Wire<Schnorr<G>> for Response<G> {
    fn write(&self, scheme: &Schnorr<G>, out: &mut Vec<u8>) {
        for y in &self.values {
            put_scalar(&scheme.group, y, out);
        }
    }

    fn read(scheme: &Schnorr<G>, reader: &mut Reader<'_>) -> Result<Self> {
        let values = (0..scheme.mode.rounds())
            .map(|_| reader.scalar(&scheme.group))
            .collect::<Result<_>>()?;
        Ok(Self { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    fn round_trip(scheme: &Schnorr) {
        let mut rng = SecureRng::default();
        let (mpk, msk) = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&msk, "alice@example.com").unwrap();

        let (commitment, state) = scheme
            .commit(&mut rng, &mpk, &usk, "alice@example.com")
            .unwrap();
        let challenge = scheme.sample_challenge(&mut rng, "alice@example.com", &commitment);
        let response = scheme.respond(state, &challenge).unwrap();
        assert!(scheme.verify(&mpk, "alice@example.com", &commitment, &challenge, &response));

        let proof = scheme
            .prove(&mut rng, &mpk, &usk, "alice@example.com")
            .unwrap();
        assert!(scheme.verify_proof(&mpk, "alice@example.com", &proof));
        assert!(!scheme.verify_proof(&mpk, "mallory@example.com", &proof));
    }

    #[test]
    fn toy_sigma_equation() {
        let group = Secp256k1;
        let s = group.scalar_from_u64(7);
        let r = group.scalar_from_u64(3);
        let c = group.scalar_from_u64(1);
        let y = group.scalar_add(&r, &group.scalar_mul_scalar(&c, &s));
        assert_eq!(y, group.scalar_from_u64(10));

        let v = group.mul_generator(&s);
        let x = group.mul_generator(&r);
        assert_eq!(group.mul_generator(&y), group.combine(&x, &v));
        assert!(check(&group, &v, &x, &c, &y));
        assert!(!check(&group, &v, &x, &c, &group.scalar_from_u64(11)));
    }

    // With Y at the identity, V = R + h·Y is the anchor itself.
    #[test]
    fn toy_values_pass_full_verification() {
        let scheme: Schnorr = Schnorr::default();
        let group = Secp256k1;
        let mpk = MasterPublicKey {
            y: group.identity(),
        };
        let commitment = Commitment {
            anchor: group.mul_generator(&group.scalar_from_u64(7)),
            rounds: vec![group.mul_generator(&group.scalar_from_u64(3))],
        };
        let challenge = Challenge {
            values: vec![group.scalar_from_u64(1)],
        };
        let response = Response {
            values: vec![group.scalar_from_u64(10)],
        };
        assert!(scheme.verify(&mpk, "alice", &commitment, &challenge, &response));

        let wrong = Response {
            values: vec![group.scalar_from_u64(9)],
        };
        assert!(!scheme.verify(&mpk, "alice", &commitment, &challenge, &wrong));
    }

    #[test]
    fn scalar_challenge_round() {
        round_trip(&Schnorr::default());
    }

    #[test]
    fn bit_challenge_rounds() {
        round_trip(&Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 40 }).unwrap());
    }

    #[test]
    fn round_count_is_bounded() {
        assert!(Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 0 }).is_err());
        assert!(Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 257 }).is_err());
        assert!(Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 256 }).is_ok());
    }

    #[test]
    fn non_bit_challenge_rejected() {
        let scheme = Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 2 }).unwrap();
        let mut bytes = vec![0u8; 64];
        bytes[31] = 1;
        bytes[63] = 2;
        assert!(matches!(
            Challenge::from_bytes(&scheme, &bytes),
            Err(Error::MalformedEncoding(_))
        ));
        bytes[63] = 1;
        assert!(Challenge::from_bytes(&scheme, &bytes).is_ok());
    }

    #[test]
    fn mismatched_challenge_length_fails_respond() {
        let scheme = Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 4 }).unwrap();
        let mut rng = SecureRng::default();
        let (mpk, msk) = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&msk, "alice").unwrap();
        let (_, state) = scheme.commit(&mut rng, &mpk, &usk, "alice").unwrap();
        let short = Challenge {
            values: vec![Secp256k1.scalar_from_u64(1)],
        };
        assert!(scheme.respond(state, &short).is_err());
    }
}
