//! Identity-based identification from sigma protocols.
//!
//! A trusted issuer holds a master key pair and extracts, for any identity string, a user key
//! bound to that identity. The user later convinces a verifier that they hold the key for an
//! identity, interactively (commit, challenge, respond) or with a non-interactive
//! Fiat-Shamir proof. Verifiers need only the master public key.
//!
//! - **crypto**: group trait, modular arithmetic and secure randomness
//! - **groups**: RFC 5114 prime-field group and secp256k1
//! - **transcript**: SHA-256 transcript for challenges and key binding
//! - **schemes**: the five identification variants and the byte-level [`Scheme`] interface
//! - **protocol**: issuer, prover and verifier sessions, nonce ledger
//!
//! ```rust
//! use sigma_ibi::protocol::{identify, Issuer, Outcome, Verifier};
//! use sigma_ibi::schemes::twin_schnorr::TwinSchnorr;
//! use sigma_ibi::{Secp256k1, SecureRng};
//!
//! let mut rng = SecureRng::default();
//! let issuer = Issuer::setup(TwinSchnorr::new(Secp256k1), &mut rng)?;
//! let prover = issuer.enroll("alice@example.com")?;
//! let verifier = Verifier::new(issuer.scheme().clone(), issuer.master_public_key().clone());
//! assert_eq!(identify(&mut rng, &prover, &verifier)?, Outcome::Accepted);
//! # Ok::<(), sigma_ibi::Error>(())
//! ```

/// Fixed-width wire encoding.
pub mod codec;
/// Engine configuration loaded from files and environment.
pub mod config;
/// Cryptographic primitives and traits.
pub mod crypto;
mod error;
/// Concrete groups.
pub mod groups;
/// Sessions between issuer, prover and verifier.
pub mod protocol;
/// The identification schemes.
pub mod schemes;
/// Fiat-Shamir transcript.
pub mod transcript;

pub use codec::Wire;
pub use config::{EngineConfig, ModpPreset};
pub use crypto::{Group, SecureRng};
pub use error::{Error, Result};
pub use groups::{ModpGroup, Secp256k1};
pub use protocol::{NonceLedger, Outcome};
pub use schemes::{IdentificationScheme, MasterKeyBytes, Proof, Scheme, SchemeKind};
pub use transcript::Transcript;
