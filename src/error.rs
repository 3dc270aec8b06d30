//! Error types for the identification engine.

/// Errors reported by the engine.
///
/// A proof that decodes correctly but does not verify is *not* an error: verification returns
/// `false`. [`Error::VerificationFailed`] only appears when a caller asks the orchestrator to
/// turn a rejected session into an error.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A scalar, element, key or proof could not be decoded from bytes.
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Bytes describe an x-coordinate with no point on the curve.
    #[error("Point is not on the curve")]
    PointNotOnCurve,

    /// The user key does not satisfy the extraction relation for this identity.
    #[error("User key is not bound to identity '{0}'")]
    IdentityMismatch(String),

    /// The verifier rejected the proof.
    #[error("Identification failed for '{0}'")]
    VerificationFailed(String),

    /// Extraction was requested from an issuer that holds no master secret key.
    #[error("Master secret key is not available")]
    KeyMissing,

    /// Identities must be non-empty.
    #[error("Identity must not be empty")]
    EmptyIdentity,

    /// Group or scheme parameters are inconsistent.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The nonce ledger kept seeing repeated commitments.
    #[error("Could not sample a fresh nonce after {0} attempts")]
    NonceReuse(usize),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
