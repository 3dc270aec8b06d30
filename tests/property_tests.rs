use proptest::prelude::*;
use sigma_ibi::schemes::schnorr::{ChallengeMode, Schnorr};
use sigma_ibi::{
    Group, IdentificationScheme, ModpGroup, Scheme, SchemeKind, Secp256k1, SecureRng, Transcript,
};

fn scheme_kind() -> impl Strategy<Value = SchemeKind> {
    prop::sample::select(SchemeKind::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn proof_verifies_for_any_identity(kind in scheme_kind(), identity in "\\PC{1,48}") {
        let scheme = Scheme::new(kind);
        let mut rng = SecureRng::default();
        let keys = scheme.setup(&mut rng).expect("Setup should succeed");
        let usk = scheme.extract(&keys.secret, &identity).expect("Extraction should succeed");
        let proof = scheme
            .prove(&mut rng, &keys.public, &usk, &identity)
            .expect("Proof generation should succeed");

        prop_assert_eq!(scheme.verify(&keys.public, &identity, &proof), Ok(true));
    }

    #[test]
    fn proof_fails_for_other_identity(
        kind in scheme_kind(),
        identity in "[a-z]{1,16}@example\\.com",
        claimed in "[a-z]{1,16}@example\\.com",
    ) {
        prop_assume!(identity != claimed);
        let scheme = Scheme::new(kind);
        let mut rng = SecureRng::default();
        let keys = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&keys.secret, &identity).unwrap();
        let proof = scheme.prove(&mut rng, &keys.public, &usk, &identity).unwrap();

        prop_assert_eq!(scheme.verify(&keys.public, &claimed, &proof), Ok(false));
    }

    #[test]
    fn arbitrary_bytes_never_verify(
        kind in scheme_kind(),
        garbage in prop::collection::vec(any::<u8>(), 0..700),
    ) {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut SecureRng::default()).unwrap();
        prop_assert_ne!(scheme.verify(&keys.public, "alice", &garbage), Ok(true));
    }

    #[test]
    fn bit_challenges_complete_for_any_round_count(rounds in 1usize..=64) {
        let scheme = Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds }).unwrap();
        let mut rng = SecureRng::default();
        let (mpk, msk) = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&msk, "alice").unwrap();
        let proof = scheme.prove(&mut rng, &mpk, &usk, "alice").unwrap();

        prop_assert_eq!(proof.challenge.values.len(), rounds);
        prop_assert!(scheme.verify_proof(&mpk, "alice", &proof));
    }
}

proptest! {
    #[test]
    fn challenge_reduced_below_order(message in prop::collection::vec(any::<u8>(), 0..128)) {
        let group = ModpGroup::toy();
        let mut transcript = Transcript::new(b"property");
        transcript.append_message(b"m", &message);
        let challenge = transcript.challenge_scalar(&group);
        prop_assert!(challenge.value() < group.order());
    }

    #[test]
    fn transcript_is_deterministic(
        identity in "\\PC{1,32}",
        message in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let build = || {
            let mut transcript = Transcript::new(b"property");
            transcript.append_identity(&identity);
            transcript.append_message(b"m", &message);
            transcript.digest()
        };
        prop_assert_eq!(build(), build());
    }

    #[test]
    fn toy_group_exponent_arithmetic(a in 0u32..22, b in 0u32..22) {
        let group = ModpGroup::toy();
        let (a, b) = (group.scalar(a), group.scalar(b));
        prop_assert_eq!(
            group.combine(&group.mul_generator(&a), &group.mul_generator(&b)),
            group.mul_generator(&group.scalar_add(&a, &b))
        );
    }
}
