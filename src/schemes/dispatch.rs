use core::fmt;

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ezkp::Ezkp;
use super::schnorr::{ChallengeMode, Schnorr};
use super::signature::SignatureIbi;
use super::twin_exponent::TwinExponent;
use super::twin_schnorr::TwinSchnorr;
use super::{IdentificationScheme, Proof, SchemeKind};
use crate::codec::Wire;
use crate::{ModpGroup, Result, Secp256k1};

/// One of the five variants, with its parameters, behind a byte-oriented interface.
///
/// Keys and proofs cross this boundary in their canonical wire encoding, so callers never
/// touch group types. Decoding failures are errors; a proof that decodes but does not
/// verify is `Ok(false)`.
///
/// # Examples
///
/// ```rust
/// use sigma_ibi::{Scheme, SchemeKind, SecureRng};
///
/// let scheme = Scheme::new(SchemeKind::TwinSchnorr);
/// let mut rng = SecureRng::new();
///
/// let keys = scheme.setup(&mut rng)?;
/// let usk = scheme.extract(&keys.secret, "alice@example.com")?;
/// let proof = scheme.prove(&mut rng, &keys.public, &usk, "alice@example.com")?;
///
/// assert!(scheme.verify(&keys.public, "alice@example.com", &proof)?);
/// assert!(!scheme.verify(&keys.public, "bob@example.com", &proof)?);
/// # Ok::<(), sigma_ibi::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scheme {
    Ezkp(Ezkp<ModpGroup>),
    FiatShamir(Schnorr<Secp256k1>),
    SignatureDelegated(SignatureIbi),
    TwinExponent(TwinExponent<Secp256k1>),
    TwinSchnorr(TwinSchnorr<Secp256k1>),
}

/// Encoded master key pair. The secret half is wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKeyBytes {
    pub public: Vec<u8>,
    pub secret: Vec<u8>,
}

impl fmt::Debug for MasterKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKeyBytes")
            .field("public", &hex::encode(&self.public))
            .field("secret", &"<redacted>")
            .finish()
    }
}

macro_rules! with_scheme {
    ($scheme:expr, $inner:ident => $body:expr) => {
        match $scheme {
            Scheme::Ezkp($inner) => $body,
            Scheme::FiatShamir($inner) => $body,
            Scheme::SignatureDelegated($inner) => $body,
            Scheme::TwinExponent($inner) => $body,
            Scheme::TwinSchnorr($inner) => $body,
        }
    };
}

impl Scheme {
    /// The variant with its default parameters: RFC 5114 for EZKP, scalar challenges for
    /// Fiat-Shamir.
    pub fn new(kind: SchemeKind) -> Self {
        match kind {
            SchemeKind::Ezkp => Scheme::Ezkp(Ezkp::default()),
            SchemeKind::FiatShamir => Scheme::FiatShamir(Schnorr::default()),
            SchemeKind::SignatureDelegated => Scheme::SignatureDelegated(SignatureIbi),
            SchemeKind::TwinExponent => Scheme::TwinExponent(TwinExponent::default()),
            SchemeKind::TwinSchnorr => Scheme::TwinSchnorr(TwinSchnorr::default()),
        }
    }

    /// Fiat-Shamir Schnorr with `rounds` parallel bit challenges.
    pub fn fiat_shamir_bits(rounds: usize) -> Result<Self> {
        Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds }).map(Scheme::FiatShamir)
    }

    pub fn kind(&self) -> SchemeKind {
        with_scheme!(self, inner => kind_of(inner))
    }

    /// Generates an encoded master key pair.
    ///
    /// # Security
    ///
    /// `MasterKeyBytes::secret` can extract a key for any identity. It is wiped on drop, but
    /// copies taken from it are the caller's to protect.
    pub fn setup<R: CryptoRngCore>(&self, rng: &mut R) -> Result<MasterKeyBytes> {
        with_scheme!(self, inner => setup(inner, rng))
    }

    pub fn master_public_key(&self, msk: &[u8]) -> Result<Vec<u8>> {
        with_scheme!(self, inner => master_public_key(inner, msk))
    }

    /// Encoded user key for `identity`. The same master key and identity always give the same
    /// user key.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyIdentity`](crate::Error::EmptyIdentity) or a decoding error on `msk`.
    pub fn extract(&self, msk: &[u8], identity: &str) -> Result<Vec<u8>> {
        with_scheme!(self, inner => extract(inner, msk, identity))
    }

    /// Produces an encoded non-interactive proof.
    ///
    /// # Security
    ///
    /// Each call draws a fresh nonce from `rng`; pass a CSPRNG such as
    /// [`SecureRng`](crate::SecureRng). For the signature-delegated variant the proof is the
    /// user key itself.
    pub fn prove<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &[u8],
        usk: &[u8],
        identity: &str,
    ) -> Result<Vec<u8>> {
        with_scheme!(self, inner => prove(inner, rng, mpk, usk, identity))
    }

    /// `Ok(false)` for a well-formed proof that does not verify, `Err` when `mpk` or `proof`
    /// fails to decode.
    pub fn verify(&self, mpk: &[u8], identity: &str, proof: &[u8]) -> Result<bool> {
        with_scheme!(self, inner => verify(inner, mpk, identity, proof))
    }
}

fn kind_of<S: IdentificationScheme>(_: &S) -> SchemeKind {
    S::KIND
}

fn setup<S: IdentificationScheme, R: CryptoRngCore>(
    scheme: &S,
    rng: &mut R,
) -> Result<MasterKeyBytes> {
    let (mpk, msk) = scheme.setup(rng)?;
    Ok(MasterKeyBytes {
        public: mpk.to_bytes(scheme),
        secret: msk.to_bytes(scheme),
    })
}

fn master_public_key<S: IdentificationScheme>(scheme: &S, msk: &[u8]) -> Result<Vec<u8>> {
    let msk = S::MasterSecretKey::from_bytes(scheme, msk)?;
    Ok(scheme.master_public_key(&msk).to_bytes(scheme))
}

fn extract<S: IdentificationScheme>(scheme: &S, msk: &[u8], identity: &str) -> Result<Vec<u8>> {
    let msk = S::MasterSecretKey::from_bytes(scheme, msk)?;
    Ok(scheme.extract(&msk, identity)?.to_bytes(scheme))
}

fn prove<S: IdentificationScheme, R: CryptoRngCore>(
    scheme: &S,
    rng: &mut R,
    mpk: &[u8],
    usk: &[u8],
    identity: &str,
) -> Result<Vec<u8>> {
    let mpk = S::MasterPublicKey::from_bytes(scheme, mpk)?;
    let usk = S::UserSecretKey::from_bytes(scheme, usk)?;
    Ok(scheme.prove(rng, &mpk, &usk, identity)?.to_bytes(scheme))
}

fn verify<S: IdentificationScheme>(
    scheme: &S,
    mpk: &[u8],
    identity: &str,
    proof: &[u8],
) -> Result<bool> {
    let mpk = S::MasterPublicKey::from_bytes(scheme, mpk)?;
    let proof = Proof::<S>::from_bytes(scheme, proof)?;
    Ok(scheme.verify_proof(&mpk, identity, &proof))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, SecureRng};

    #[test]
    fn byte_api_round_trip_for_every_kind() {
        let mut rng = SecureRng::default();
        for kind in SchemeKind::ALL {
            let scheme = Scheme::new(kind);
            assert_eq!(scheme.kind(), kind);
            let keys = scheme.setup(&mut rng).unwrap();
            assert_eq!(scheme.master_public_key(&keys.secret).unwrap(), keys.public);

            let usk = scheme.extract(&keys.secret, "alice@example.com").unwrap();
            let proof = scheme
                .prove(&mut rng, &keys.public, &usk, "alice@example.com")
                .unwrap();
            assert!(scheme.verify(&keys.public, "alice@example.com", &proof).unwrap());
            assert!(!scheme.verify(&keys.public, "bob@example.com", &proof).unwrap());
        }
    }

    #[test]
    fn truncated_proof_is_a_decoding_error() {
        let mut rng = SecureRng::default();
        let scheme = Scheme::new(SchemeKind::TwinSchnorr);
        let keys = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&keys.secret, "alice").unwrap();
        let proof = scheme.prove(&mut rng, &keys.public, &usk, "alice").unwrap();
        assert!(matches!(
            scheme.verify(&keys.public, "alice", &proof[..proof.len() - 1]),
            Err(Error::MalformedEncoding(_))
        ));
    }

    #[test]
    fn debug_redacts_secret() {
        let keys = MasterKeyBytes {
            public: vec![0xab],
            secret: vec![0xcd],
        };
        let rendered = format!("{keys:?}");
        assert!(rendered.contains("ab"));
        assert!(!rendered.contains("cd"));
    }
}
