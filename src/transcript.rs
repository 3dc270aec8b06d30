//! Fiat-Shamir transcript.
//!
//! A transcript is SHA-256 over a framed sequence of labelled items:
//!
//! ```text
//! u32_be(len(label)) ‖ label ‖ u32_be(len(item)) ‖ item   (repeated)
//! ```
//!
//! The first item is always the protocol label, the second the scheme's domain tag, so a
//! transcript from one scheme can never collide with another's. Items are the canonical
//! fixed-width encodings of group elements and scalars, plus the UTF-8 identity string.
//! Prover and verifier rebuild the same bytes independently; the ordering of `append_*` calls
//! is part of each scheme's wire contract.

use sha2::{Digest, Sha256};

use crate::Group;

/// Protocol label bound into every transcript.
const PROTOCOL_LABEL: &[u8] = b"sigma-ibi/v1";

/// Maximum number of challenge bits one digest can supply.
pub const MAX_CHALLENGE_BITS: usize = 256;

#[derive(Clone, Debug)]
pub struct Transcript {
    hasher: Sha256,
}

impl Transcript {
    /// Starts a transcript for the scheme identified by `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut transcript = Self {
            hasher: Sha256::new(),
        };
        transcript.append_message(b"protocol", PROTOCOL_LABEL);
        transcript.append_message(b"domain", domain);
        transcript
    }

    pub fn append_message(&mut self, label: &[u8], message: &[u8]) {
        self.hasher.update((label.len() as u32).to_be_bytes());
        self.hasher.update(label);
        self.hasher.update((message.len() as u32).to_be_bytes());
        self.hasher.update(message);
    }

    pub fn append_identity(&mut self, identity: &str) {
        self.append_message(b"identity", identity.as_bytes());
    }

    pub fn append_element<G: Group>(&mut self, group: &G, label: &[u8], element: &G::Element) {
        self.append_message(label, &group.element_to_bytes(element));
    }

    pub fn append_scalar<G: Group>(&mut self, group: &G, label: &[u8], scalar: &G::Scalar) {
        self.append_message(label, &group.scalar_to_bytes(scalar));
    }

    /// Binds the group itself, so transcripts over different parameters never coincide.
    pub fn append_group<G: Group>(&mut self, group: &G) {
        self.append_message(b"group", group.name().as_bytes());
        self.append_element(group, b"generator", &group.generator());
    }

    pub fn digest(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }

    /// Challenge = SHA-256(transcript) mod n.
    pub fn challenge_scalar<G: Group>(self, group: &G) -> G::Scalar {
        group.scalar_from_digest(&self.digest())
    }

    /// The first `count` bits of the digest, most significant bit first.
    ///
    /// `count` is clamped to [`MAX_CHALLENGE_BITS`].
    pub fn challenge_bits(self, count: usize) -> Vec<bool> {
        let digest = self.digest();
        (0..count.min(MAX_CHALLENGE_BITS))
            .map(|i| (digest[i / 8] >> (7 - i % 8)) & 1 == 1)
            .collect()
    }
}
