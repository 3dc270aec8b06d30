//! Session orchestration: who holds which key, and the four messages of an identification.
//!
//! ```text
//! Prover                      Verifier
//!   start()      ── commitment ──▶  open()
//!                ◀── challenge ──   challenge()
//!   respond()    ── response ───▶   finish() → Outcome
//! ```

use core::fmt;

use rand_core::CryptoRngCore;
use tracing::{debug, info};

use crate::schemes::IdentificationScheme;
use crate::{Error, Result};

/// Key-generation center.
pub mod issuer;
/// Commitment fingerprints shared across sessions.
pub mod ledger;
/// User-key holder and its per-session state.
pub mod prover;
/// Verifier and its per-session state.
pub mod verifier;

pub use issuer::Issuer;
pub use ledger::NonceLedger;
pub use prover::{Prover, ProverSession};
pub use verifier::{Verifier, VerifierSession};

/// Final message of an identification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Maps rejection to [`Error::VerificationFailed`].
    pub fn into_result(self, identity: &str) -> Result<()> {
        match self {
            Outcome::Accepted => Ok(()),
            Outcome::Rejected => Err(Error::VerificationFailed(identity.to_string())),
        }
    }
}

impl From<bool> for Outcome {
    fn from(accepted: bool) -> Self {
        if accepted {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => f.write_str("accepted"),
            Outcome::Rejected => f.write_str("rejected"),
        }
    }
}

/// Runs one interactive identification between `prover` and `verifier` in process.
pub fn identify<S, R>(rng: &mut R, prover: &Prover<S>, verifier: &Verifier<S>) -> Result<Outcome>
where
    S: IdentificationScheme,
    R: CryptoRngCore,
{
    let identity = prover.identity();
    debug!(scheme = %S::KIND, identity, "identification started");

    let session = prover.start(rng)?;
    let mut open = verifier.open(identity, session.commitment().clone())?;
    let challenge = open.challenge(rng);
    let response = session.respond(&challenge)?;
    let outcome = open.finish(&response);

    info!(scheme = %S::KIND, identity, %outcome, "identification complete");
    Ok(outcome)
}
