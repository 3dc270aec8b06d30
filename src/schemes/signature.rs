//! The master key is an ECDSA key pair on secp256k1 and a user key is the issuer's
//! deterministic (RFC 6979) signature on the identity. Proving is showing that signature;
//! commitment and challenge are empty.
//!
//! This variant discloses the user key to every verifier. It exists for comparison and for
//! settings where the verifier is trusted with the credential.

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;

use super::{require_identity, IdentificationScheme, SchemeKind};
use crate::codec::{Reader, Wire};
use crate::{Error, Result, Secp256k1};

const SIGNED_PREFIX: &[u8] = b"sigma-ibi/v1/signature:";

const SECRET_BYTES: usize = 32;
const SIGNATURE_BYTES: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureIbi;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MasterPublicKey(pub VerifyingKey);

pub struct MasterSecretKey(SigningKey);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSecretKey(Signature);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response(pub Signature);

fn signed_message(identity: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(SIGNED_PREFIX.len() + identity.len());
    message.extend_from_slice(SIGNED_PREFIX);
    message.extend_from_slice(identity.as_bytes());
    message
}

impl IdentificationScheme for SignatureIbi {
    const KIND: SchemeKind = SchemeKind::SignatureDelegated;
    const FRESH_COMMITMENTS: bool = false;

    type MasterPublicKey = MasterPublicKey;
    type MasterSecretKey = MasterSecretKey;
    type UserSecretKey = UserSecretKey;
    type Commitment = ();
    type ProvingState = Signature;
    type Challenge = ();
    type Response = Response;

    fn setup<R: CryptoRngCore>(&self, rng: &mut R) -> Result<(MasterPublicKey, MasterSecretKey)> {
        let msk = MasterSecretKey(SigningKey::random(rng));
        Ok((self.master_public_key(&msk), msk))
    }

    fn master_public_key(&self, msk: &MasterSecretKey) -> MasterPublicKey {
        MasterPublicKey(*msk.0.verifying_key())
    }

    fn extract(&self, msk: &MasterSecretKey, identity: &str) -> Result<UserSecretKey> {
        require_identity(identity)?;
        Ok(UserSecretKey(msk.0.sign(&signed_message(identity))))
    }

    fn commit<R: CryptoRngCore>(
        &self,
        _rng: &mut R,
        mpk: &MasterPublicKey,
        usk: &UserSecretKey,
        identity: &str,
    ) -> Result<((), Signature)> {
        require_identity(identity)?;
        mpk.0
            .verify(&signed_message(identity), &usk.0)
            .map_err(|_| Error::IdentityMismatch(identity.to_string()))?;
        Ok(((), usk.0.clone()))
    }

    fn sample_challenge<R: CryptoRngCore>(&self, _rng: &mut R, _identity: &str, _: &()) {}

    fn derive_challenge(&self, _mpk: &MasterPublicKey, _identity: &str, _: &()) {}

    fn respond(&self, state: Signature, _: &()) -> Result<Response> {
        Ok(Response(state))
    }

    fn verify(
        &self,
        mpk: &MasterPublicKey,
        identity: &str,
        _commitment: &(),
        _challenge: &(),
        response: &Response,
    ) -> bool {
        !identity.is_empty() && mpk.0.verify(&signed_message(identity), &response.0).is_ok()
    }
}

impl Wire<SignatureIbi> for MasterPublicKey {
    fn write(&self, _: &SignatureIbi, out: &mut Vec<u8>) {
        out.extend_from_slice(self.0.to_encoded_point(true).as_bytes());
    }

    fn read(_: &SignatureIbi, reader: &mut Reader<'_>) -> Result<Self> {
        let point = reader.element(&Secp256k1)?;
        VerifyingKey::from_affine(point.inner().to_affine())
            .map(Self)
            .map_err(|_| Error::PointNotOnCurve)
    }
}

impl Wire<SignatureIbi> for MasterSecretKey {
    fn write(&self, _: &SignatureIbi, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.to_bytes());
    }

    fn read(_: &SignatureIbi, reader: &mut Reader<'_>) -> Result<Self> {
        SigningKey::from_slice(reader.take(SECRET_BYTES)?)
            .map(Self)
            .map_err(|_| Error::MalformedEncoding("signing key out of range".into()))
    }
}

fn read_signature(reader: &mut Reader<'_>) -> Result<Signature> {
    Signature::from_slice(reader.take(SIGNATURE_BYTES)?)
        .map_err(|_| Error::MalformedEncoding("signature scalar out of range".into()))
}

impl Wire<SignatureIbi> for UserSecretKey {
    fn write(&self, _: &SignatureIbi, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.to_bytes());
    }

    fn read(_: &SignatureIbi, reader: &mut Reader<'_>) -> Result<Self> {
        read_signature(reader).map(Self)
    }
}

impl Wire<SignatureIbi> for Response {
    fn write(&self, _: &SignatureIbi, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0.to_bytes());
    }

    fn read(_: &SignatureIbi, reader: &mut Reader<'_>) -> Result<Self> {
        read_signature(reader).map(Self)
    }
}
