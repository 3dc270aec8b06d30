//! Key-extraction helpers shared by the discrete-log schemes.
//!
//! Extraction must be a function of `(msk, identity)` alone, so the per-identity nonce is
//! derived from the master secret rather than sampled. The Schnorr-style binding used by
//! EZKP and Fiat-Shamir is:
//!
//! ```text
//! t = H(extract-domain, msk, identity, index, counter) mod n   (first non-zero)
//! R = t·G
//! h = H(extract-domain, identity, R, mpk) mod n
//! k = t + h·msk          user secret
//! P = R + h·mpk = k·G    user public key, recomputable from (mpk, identity, R)
//! ```

use crate::transcript::Transcript;
use crate::Group;

/// Deterministic non-zero scalar for `identity`, keyed by the given master secrets.
///
/// `index` separates several nonces drawn for the same identity.
pub(crate) fn derive_nonce<G: Group>(
    group: &G,
    domain: &[u8],
    secrets: &[&G::Scalar],
    identity: &str,
    index: u8,
) -> G::Scalar {
    let mut counter: u32 = 0;
    loop {
        let mut transcript = Transcript::new(domain);
        transcript.append_message(b"purpose", b"nonce");
        for secret in secrets {
            transcript.append_scalar(group, b"master-secret", secret);
        }
        transcript.append_identity(identity);
        transcript.append_message(b"index", &[index]);
        transcript.append_message(b"counter", &counter.to_be_bytes());
        let nonce = transcript.challenge_scalar(group);
        if !group.scalar_is_zero(&nonce) {
            return nonce;
        }
        counter = counter.wrapping_add(1);
    }
}

/// `h = H(domain, identity, R, mpk)`.
pub(crate) fn binding_hash<G: Group>(
    group: &G,
    domain: &[u8],
    identity: &str,
    anchor: &G::Element,
    master_public: &G::Element,
) -> G::Scalar {
    let mut transcript = Transcript::new(domain);
    transcript.append_message(b"purpose", b"binding");
    transcript.append_group(group);
    transcript.append_identity(identity);
    transcript.append_element(group, b"anchor", anchor);
    transcript.append_element(group, b"master-public", master_public);
    transcript.challenge_scalar(group)
}

/// Returns `(k, R)` binding `identity` to the master key.
pub(crate) fn bind_identity<G: Group>(
    group: &G,
    domain: &[u8],
    master_secret: &G::Scalar,
    identity: &str,
) -> (G::Scalar, G::Element) {
    let master_public = group.mul_generator(master_secret);
    let nonce = derive_nonce(group, domain, &[master_secret], identity, 0);
    let anchor = group.mul_generator(&nonce);
    let h = binding_hash(group, domain, identity, &anchor, &master_public);
    let secret = group.scalar_add(&nonce, &group.scalar_mul_scalar(&h, master_secret));
    (secret, anchor)
}

/// `P = R + h·mpk`, the public key matching [`bind_identity`]'s secret.
pub(crate) fn identity_public_key<G: Group>(
    group: &G,
    domain: &[u8],
    identity: &str,
    anchor: &G::Element,
    master_public: &G::Element,
) -> G::Element {
    let h = binding_hash(group, domain, identity, anchor, master_public);
    group.combine(anchor, &group.scalar_mul(master_public, &h))
}
