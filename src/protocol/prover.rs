use rand_core::CryptoRngCore;
use tracing::{debug, warn};

use super::ledger::NonceLedger;
use crate::schemes::{IdentificationScheme, Proof};
use crate::{Error, Result};

/// Attempts at drawing a commitment the ledger has not seen before giving up.
pub const MAX_COMMIT_ATTEMPTS: usize = 8;

/// Holder of a user key for one identity.
///
/// # Security
///
/// - Each session draws a fresh nonce; [`ProverSession::respond`] consumes the session so the
///   nonce answers exactly one challenge
/// - Attach a [`NonceLedger`] to have repeated commitments detected and resampled
pub struct Prover<S: IdentificationScheme> {
    scheme: S,
    mpk: S::MasterPublicKey,
    usk: S::UserSecretKey,
    identity: String,
    ledger: Option<NonceLedger>,
}

/// Prover side of one identification, after the commitment was sent.
pub struct ProverSession<S: IdentificationScheme> {
    scheme: S,
    identity: String,
    commitment: S::Commitment,
    state: S::ProvingState,
}

impl<S: IdentificationScheme> Prover<S> {
    /// Creates a prover for `identity`. Usually obtained through
    /// [`Issuer::enroll`](super::Issuer::enroll) instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_ibi::protocol::Prover;
    /// use sigma_ibi::schemes::twin_schnorr::TwinSchnorr;
    /// use sigma_ibi::{IdentificationScheme, Secp256k1, SecureRng};
    ///
    /// let scheme = TwinSchnorr::new(Secp256k1);
    /// let mut rng = SecureRng::new();
    /// let (mpk, msk) = scheme.setup(&mut rng)?;
    /// let usk = scheme.extract(&msk, "alice")?;
    ///
    /// let prover = Prover::new(scheme.clone(), mpk.clone(), usk, "alice");
    /// let proof = prover.prove(&mut rng)?;
    /// assert!(scheme.verify_proof(&mpk, "alice", &proof));
    /// # Ok::<(), sigma_ibi::Error>(())
    /// ```
    ///
    /// # Security
    ///
    /// `usk` is not checked here; a key extracted for another identity fails at
    /// [`start`](Self::start) or [`prove`](Self::prove) with
    /// [`Error::IdentityMismatch`].
    pub fn new(
        scheme: S,
        mpk: S::MasterPublicKey,
        usk: S::UserSecretKey,
        identity: impl Into<String>,
    ) -> Self {
        Self {
            scheme,
            mpk,
            usk,
            identity: identity.into(),
            ledger: None,
        }
    }

    /// Checks every commitment against `ledger` and resamples on a repeat.
    ///
    /// # Security
    ///
    /// Two responses to one commitment reveal the user key. Share one ledger between every
    /// prover that can hold the same key. Schemes without a fresh commitment are not tracked.
    pub fn with_ledger(mut self, ledger: NonceLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn master_public_key(&self) -> &S::MasterPublicKey {
        &self.mpk
    }

    /// Interactive protocol: first message.
    pub fn start<R: CryptoRngCore>(&self, rng: &mut R) -> Result<ProverSession<S>> {
        let (commitment, state) = self.fresh_commitment(rng)?;
        debug!(scheme = %S::KIND, identity = %self.identity, "commitment created");
        Ok(ProverSession {
            scheme: self.scheme.clone(),
            identity: self.identity.clone(),
            commitment,
            state,
        })
    }

    /// Non-interactive proof with the Fiat-Shamir challenge.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> Result<Proof<S>> {
        let (commitment, state) = self.fresh_commitment(rng)?;
        let challenge = self
            .scheme
            .derive_challenge(&self.mpk, &self.identity, &commitment);
        let response = self.scheme.respond(state, &challenge)?;
        debug!(scheme = %S::KIND, identity = %self.identity, "proof created");
        Ok(Proof {
            commitment,
            challenge,
            response,
        })
    }

    fn fresh_commitment<R: CryptoRngCore>(
        &self,
        rng: &mut R,
    ) -> Result<(S::Commitment, S::ProvingState)> {
        let Some(ledger) = &self.ledger else {
            return self.scheme.commit(rng, &self.mpk, &self.usk, &self.identity);
        };
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            let (commitment, state) =
                self.scheme
                    .commit(rng, &self.mpk, &self.usk, &self.identity)?;
            let Some(fingerprint) = NonceLedger::fingerprint(&self.scheme, &commitment) else {
                return Ok((commitment, state));
            };
            if ledger.record(fingerprint) {
                return Ok((commitment, state));
            }
            warn!(
                scheme = %S::KIND,
                identity = %self.identity,
                attempt,
                "commitment repeated, resampling nonce"
            );
        }
        Err(Error::NonceReuse(MAX_COMMIT_ATTEMPTS))
    }
}

impl<S: IdentificationScheme> ProverSession<S> {
    pub fn commitment(&self) -> &S::Commitment {
        &self.commitment
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Interactive protocol: third message. Consumes the session.
    pub fn respond(self, challenge: &S::Challenge) -> Result<S::Response> {
        let response = self.scheme.respond(self.state, challenge)?;
        debug!(scheme = %S::KIND, identity = %self.identity, "response created");
        Ok(response)
    }
}
