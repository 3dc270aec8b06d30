//! Identity-based identification schemes.
//!
//! Each variant implements [`IdentificationScheme`]: a master key pair from `setup`, a user key
//! bound to one identity by `extract`, and a three-move sigma protocol (`commit`, challenge,
//! `respond`) checked by `verify`. The challenge is either sampled by an interactive verifier
//! ([`IdentificationScheme::sample_challenge`]) or derived from the transcript
//! ([`IdentificationScheme::derive_challenge`]); [`IdentificationScheme::prove`] and
//! [`IdentificationScheme::verify_proof`] package the latter as a non-interactive [`Proof`].
//!
//! [`Scheme`] wraps the five concrete variants behind one byte-oriented interface.

use core::fmt::{self, Debug};

use clap::ValueEnum;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::codec::{Reader, Wire};
use crate::{Error, Result};

mod dispatch;
pub(crate) mod extraction;

/// Single discrete-log master key over a prime field.
pub mod ezkp;
/// Schnorr identification with scalar or bit challenges.
pub mod schnorr;
/// Extraction delegated to an ECDSA signature on the identity.
pub mod signature;
/// Twin-exponent (TNC) identification.
pub mod twin_exponent;
/// Two-base Schnorr identification.
pub mod twin_schnorr;

pub use dispatch::{MasterKeyBytes, Scheme};

/// The five supported variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeKind {
    Ezkp,
    FiatShamir,
    SignatureDelegated,
    TwinExponent,
    TwinSchnorr,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 5] = [
        SchemeKind::Ezkp,
        SchemeKind::FiatShamir,
        SchemeKind::SignatureDelegated,
        SchemeKind::TwinExponent,
        SchemeKind::TwinSchnorr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKind::Ezkp => "ezkp",
            SchemeKind::FiatShamir => "fiat-shamir",
            SchemeKind::SignatureDelegated => "signature-delegated",
            SchemeKind::TwinExponent => "twin-exponent",
            SchemeKind::TwinSchnorr => "twin-schnorr",
        }
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common shape of every identification scheme.
///
/// Implementations hold only public parameters, so one value can serve any number of
/// concurrent sessions. All per-session secrets live in [`Self::ProvingState`], which
/// [`respond`](Self::respond) consumes: a nonce can answer exactly one challenge.
pub trait IdentificationScheme: Clone + Debug + Send + Sync + Sized + 'static {
    const KIND: SchemeKind;

    /// Whether each commitment carries fresh randomness. Schemes without one have nothing for
    /// a [`NonceLedger`](crate::NonceLedger) to track.
    const FRESH_COMMITMENTS: bool = true;

    type MasterPublicKey: Clone + Debug + Send + Sync + Wire<Self>;
    type MasterSecretKey: Send + Sync + Wire<Self>;
    type UserSecretKey: Clone + Send + Sync + Wire<Self>;
    type Commitment: Clone + Debug + Send + Sync + Wire<Self>;
    type ProvingState: Send;
    type Challenge: Clone + Debug + PartialEq + Send + Sync + Wire<Self>;
    type Response: Clone + Debug + Send + Sync + Wire<Self>;

    /// Generates a fresh master key pair.
    fn setup<R: CryptoRngCore>(
        &self,
        rng: &mut R,
    ) -> Result<(Self::MasterPublicKey, Self::MasterSecretKey)>;

    /// Recomputes the public half of a master key pair.
    fn master_public_key(&self, msk: &Self::MasterSecretKey) -> Self::MasterPublicKey;

    /// Derives the user key for `identity`. Deterministic in `(msk, identity)`.
    fn extract(&self, msk: &Self::MasterSecretKey, identity: &str) -> Result<Self::UserSecretKey>;

    /// First move. Fails with [`Error::IdentityMismatch`] if `usk` was not extracted for
    /// `identity` under `mpk`.
    fn commit<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &Self::MasterPublicKey,
        usk: &Self::UserSecretKey,
        identity: &str,
    ) -> Result<(Self::Commitment, Self::ProvingState)>;

    /// Second move for an interactive verifier.
    fn sample_challenge<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        identity: &str,
        commitment: &Self::Commitment,
    ) -> Self::Challenge;

    /// Fiat-Shamir challenge over the scheme's transcript.
    fn derive_challenge(
        &self,
        mpk: &Self::MasterPublicKey,
        identity: &str,
        commitment: &Self::Commitment,
    ) -> Self::Challenge;

    /// Third move.
    fn respond(
        &self,
        state: Self::ProvingState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response>;

    /// Checks the verification equation. Never fails on a well-formed but false proof.
    fn verify(
        &self,
        mpk: &Self::MasterPublicKey,
        identity: &str,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> bool;

    /// Non-interactive proof: commit, derive the challenge, respond.
    fn prove<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        mpk: &Self::MasterPublicKey,
        usk: &Self::UserSecretKey,
        identity: &str,
    ) -> Result<Proof<Self>> {
        let (commitment, state) = self.commit(rng, mpk, usk, identity)?;
        let challenge = self.derive_challenge(mpk, identity, &commitment);
        let response = self.respond(state, &challenge)?;
        Ok(Proof {
            commitment,
            challenge,
            response,
        })
    }

    /// Recomputes the challenge from the transcript, then checks the equation.
    fn verify_proof(
        &self,
        mpk: &Self::MasterPublicKey,
        identity: &str,
        proof: &Proof<Self>,
    ) -> bool {
        if identity.is_empty() {
            return false;
        }
        let expected = self.derive_challenge(mpk, identity, &proof.commitment);
        expected == proof.challenge
            && self.verify(
                mpk,
                identity,
                &proof.commitment,
                &proof.challenge,
                &proof.response,
            )
    }
}

/// Transcript of one identification: `commitment ‖ challenge ‖ response` on the wire.
pub struct Proof<S: IdentificationScheme> {
    pub commitment: S::Commitment,
    pub challenge: S::Challenge,
    pub response: S::Response,
}

impl<S: IdentificationScheme> Clone for Proof<S> {
    fn clone(&self) -> Self {
        Self {
            commitment: self.commitment.clone(),
            challenge: self.challenge.clone(),
            response: self.response.clone(),
        }
    }
}

impl<S: IdentificationScheme> Debug for Proof<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proof")
            .field("scheme", &S::KIND)
            .field("commitment", &self.commitment)
            .field("challenge", &self.challenge)
            .field("response", &self.response)
            .finish()
    }
}

impl<S: IdentificationScheme> Wire<S> for Proof<S> {
    fn write(&self, scheme: &S, out: &mut Vec<u8>) {
        self.commitment.write(scheme, out);
        self.challenge.write(scheme, out);
        self.response.write(scheme, out);
    }

    fn read(scheme: &S, reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            commitment: S::Commitment::read(scheme, reader)?,
            challenge: S::Challenge::read(scheme, reader)?,
            response: S::Response::read(scheme, reader)?,
        })
    }
}

pub(crate) fn require_identity(identity: &str) -> Result<()> {
    if identity.is_empty() {
        return Err(Error::EmptyIdentity);
    }
    Ok(())
}
