use rand_core::CryptoRngCore;
use tracing::{debug, info};

use super::prover::Prover;
use crate::schemes::IdentificationScheme;
use crate::{Error, Result};

/// Key-generation center: owns the master key pair and extracts user keys.
///
/// An issuer built with [`Issuer::public_only`] can hand out the master public key but
/// refuses extraction with [`Error::KeyMissing`].
pub struct Issuer<S: IdentificationScheme> {
    scheme: S,
    mpk: S::MasterPublicKey,
    msk: Option<S::MasterSecretKey>,
}

impl<S: IdentificationScheme> Issuer<S> {
    /// Runs `setup` and keeps both halves of the master key.
    pub fn setup<R: CryptoRngCore>(scheme: S, rng: &mut R) -> Result<Self> {
        let (mpk, msk) = scheme.setup(rng)?;
        info!(scheme = %S::KIND, "master key generated");
        Ok(Self {
            scheme,
            mpk,
            msk: Some(msk),
        })
    }

    pub fn new(scheme: S, msk: S::MasterSecretKey) -> Self {
        let mpk = scheme.master_public_key(&msk);
        Self {
            scheme,
            mpk,
            msk: Some(msk),
        }
    }

    pub fn public_only(scheme: S, mpk: S::MasterPublicKey) -> Self {
        Self {
            scheme,
            mpk,
            msk: None,
        }
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn master_public_key(&self) -> &S::MasterPublicKey {
        &self.mpk
    }

    pub fn can_extract(&self) -> bool {
        self.msk.is_some()
    }

    pub fn extract(&self, identity: &str) -> Result<S::UserSecretKey> {
        let msk = self.msk.as_ref().ok_or(Error::KeyMissing)?;
        let usk = self.scheme.extract(msk, identity)?;
        debug!(scheme = %S::KIND, identity, "user key extracted");
        Ok(usk)
    }

    /// Extracts a key for `identity` and wraps it in a [`Prover`].
    pub fn enroll(&self, identity: &str) -> Result<Prover<S>> {
        let usk = self.extract(identity)?;
        Ok(Prover::new(
            self.scheme.clone(),
            self.mpk.clone(),
            usk,
            identity,
        ))
    }
}
