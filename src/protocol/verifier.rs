use rand_core::CryptoRngCore;
use tracing::{debug, info, warn};

use super::ledger::NonceLedger;
use super::Outcome;
use crate::schemes::{IdentificationScheme, Proof};
use crate::{Error, Result};

/// Checks identifications against one master public key.
///
/// Holds no secrets. One verifier can run any number of sessions, from any number of threads.
pub struct Verifier<S: IdentificationScheme> {
    scheme: S,
    mpk: S::MasterPublicKey,
    replay_guard: Option<NonceLedger>,
}

/// Verifier side of one identification.
///
/// The challenge is sampled once, after the commitment is fixed; [`VerifierSession::finish`]
/// consumes the session, so a response is judged exactly once.
pub struct VerifierSession<S: IdentificationScheme> {
    scheme: S,
    mpk: S::MasterPublicKey,
    identity: String,
    commitment: S::Commitment,
    challenge: Option<S::Challenge>,
}

impl<S: IdentificationScheme> Verifier<S> {
    pub fn new(scheme: S, mpk: S::MasterPublicKey) -> Self {
        Self {
            scheme,
            mpk,
            replay_guard: None,
        }
    }

    /// Refuse sessions whose commitment is already in `ledger`. Schemes without a fresh
    /// commitment are not tracked.
    pub fn with_replay_guard(mut self, ledger: NonceLedger) -> Self {
        self.replay_guard = Some(ledger);
        self
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    /// Interactive protocol: accepts the first message. With a replay guard, the commitment is
    /// recorded here and a second `open` on it fails with [`Error::VerificationFailed`].
    pub fn open(&self, identity: &str, commitment: S::Commitment) -> Result<VerifierSession<S>> {
        if identity.is_empty() {
            return Err(Error::EmptyIdentity);
        }
        self.check_replay(identity, &commitment)?;
        debug!(scheme = %S::KIND, identity, "session opened");
        Ok(VerifierSession {
            scheme: self.scheme.clone(),
            mpk: self.mpk.clone(),
            identity: identity.to_string(),
            commitment,
            challenge: None,
        })
    }

    /// Checks a non-interactive proof.
    ///
    /// With a replay guard attached, the commitment is recorded only once the proof is
    /// accepted, so a rejected proof cannot burn a commitment an honest prover will use.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyIdentity`] for an empty identity
    /// - [`Error::VerificationFailed`] when an accepted proof's commitment was already seen
    pub fn verify_proof(&self, identity: &str, proof: &Proof<S>) -> Result<Outcome> {
        if identity.is_empty() {
            return Err(Error::EmptyIdentity);
        }
        let outcome = Outcome::from(self.scheme.verify_proof(&self.mpk, identity, proof));
        if outcome.is_accepted() {
            self.check_replay(identity, &proof.commitment)?;
        }
        info!(scheme = %S::KIND, identity, %outcome, "proof checked");
        Ok(outcome)
    }

    fn check_replay(&self, identity: &str, commitment: &S::Commitment) -> Result<()> {
        let Some(ledger) = &self.replay_guard else {
            return Ok(());
        };
        let Some(fingerprint) = NonceLedger::fingerprint(&self.scheme, commitment) else {
            return Ok(());
        };
        if ledger.record(fingerprint) {
            return Ok(());
        }
        warn!(scheme = %S::KIND, identity, "replayed commitment refused");
        Err(Error::VerificationFailed(identity.to_string()))
    }
}

impl<S: IdentificationScheme> VerifierSession<S> {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn commitment(&self) -> &S::Commitment {
        &self.commitment
    }

    /// Interactive protocol: second message. Repeated calls return the same challenge.
    pub fn challenge<R: CryptoRngCore>(&mut self, rng: &mut R) -> S::Challenge {
        if let Some(challenge) = &self.challenge {
            return challenge.clone();
        }
        let challenge = self
            .scheme
            .sample_challenge(rng, &self.identity, &self.commitment);
        self.challenge = Some(challenge.clone());
        debug!(scheme = %S::KIND, identity = %self.identity, "challenge issued");
        challenge
    }

    /// Interactive protocol: judges the third message. Without an issued challenge the
    /// session is rejected.
    pub fn finish(self, response: &S::Response) -> Outcome {
        let outcome = match &self.challenge {
            Some(challenge) => Outcome::from(self.scheme.verify(
                &self.mpk,
                &self.identity,
                &self.commitment,
                challenge,
                response,
            )),
            None => {
                warn!(scheme = %S::KIND, identity = %self.identity, "response before challenge");
                Outcome::Rejected
            }
        };
        info!(scheme = %S::KIND, identity = %self.identity, %outcome, "session finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Issuer;
    use crate::schemes::twin_exponent::TwinExponent;
    use crate::SecureRng;

    fn fixture() -> (Issuer<TwinExponent>, Verifier<TwinExponent>) {
        let issuer = Issuer::setup(TwinExponent::default(), &mut SecureRng::default()).unwrap();
        let verifier = Verifier::new(
            issuer.scheme().clone(),
            issuer.master_public_key().clone(),
        );
        (issuer, verifier)
    }

    #[test]
    fn challenge_is_fixed_per_session() {
        let (issuer, verifier) = fixture();
        let mut rng = SecureRng::default();
        let prover = issuer.enroll("alice").unwrap();
        let session = prover.start(&mut rng).unwrap();
        let mut open = verifier
            .open("alice", session.commitment().clone())
            .unwrap();
        let first = open.challenge(&mut rng);
        assert_eq!(open.challenge(&mut rng), first);
        let response = session.respond(&first).unwrap();
        assert_eq!(open.finish(&response), Outcome::Accepted);
    }

    #[test]
    fn response_without_challenge_rejected() {
        let (issuer, verifier) = fixture();
        let mut rng = SecureRng::default();
        let prover = issuer.enroll("alice").unwrap();
        let session = prover.start(&mut rng).unwrap();
        let open = verifier
            .open("alice", session.commitment().clone())
            .unwrap();
        let challenge = verifier.scheme().sample_challenge(&mut rng, "alice", session.commitment());
        let response = session.respond(&challenge).unwrap();
        assert_eq!(open.finish(&response), Outcome::Rejected);
    }

    #[test]
    fn replay_guard_refuses_second_open() {
        let (issuer, verifier) = fixture();
        let verifier = verifier.with_replay_guard(NonceLedger::new(8));
        let mut rng = SecureRng::default();
        let proof = issuer.enroll("alice").unwrap().prove(&mut rng).unwrap();
        assert_eq!(verifier.verify_proof("alice", &proof), Ok(Outcome::Accepted));
        assert_eq!(
            verifier.verify_proof("alice", &proof),
            Err(Error::VerificationFailed("alice".into()))
        );
    }

    #[test]
    fn rejected_proof_does_not_burn_commitment() {
        let (issuer, verifier) = fixture();
        let verifier = verifier.with_replay_guard(NonceLedger::new(8));
        let mut rng = SecureRng::default();
        let prover = issuer.enroll("alice").unwrap();
        let proof = prover.prove(&mut rng).unwrap();
        let other = prover.prove(&mut rng).unwrap();

        let mut forged = proof.clone();
        forged.response = other.response;
        assert_eq!(verifier.verify_proof("alice", &forged), Ok(Outcome::Rejected));
        assert_eq!(verifier.verify_proof("alice", &proof), Ok(Outcome::Accepted));
    }
}
