mod common;

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use sigma_ibi::protocol::{identify, Issuer, Outcome, Verifier};
use sigma_ibi::schemes::ezkp::{self, Ezkp};
use sigma_ibi::schemes::schnorr::{self, ChallengeMode, Schnorr};
use sigma_ibi::schemes::signature::SignatureIbi;
use sigma_ibi::schemes::twin_exponent::TwinExponent;
use sigma_ibi::schemes::twin_schnorr::TwinSchnorr;
use sigma_ibi::{
    EngineConfig, Group, IdentificationScheme, ModpGroup, ModpPreset, Proof, Scheme, SchemeKind,
    Secp256k1, SecureRng, Wire,
};

/// Interactive run through the orchestrator, then a non-interactive proof that goes through
/// its wire encoding before verification.
fn complete<S: IdentificationScheme>(scheme: S) {
    common::init_tracing();
    let mut rng = SecureRng::default();

    let issuer = Issuer::setup(scheme.clone(), &mut rng).expect("Setup should succeed");
    let mpk = issuer.master_public_key().clone();
    let verifier = Verifier::new(scheme.clone(), mpk.clone());
    let prover = issuer
        .enroll("alice@example.com")
        .expect("Extraction should succeed");

    let outcome = identify(&mut rng, &prover, &verifier).expect("Identification should run");
    assert_eq!(outcome, Outcome::Accepted);

    let proof = prover.prove(&mut rng).expect("Proof generation should succeed");
    let bytes = proof.to_bytes(&scheme);
    let decoded = Proof::<S>::from_bytes(&scheme, &bytes).expect("Proof should decode");
    assert!(scheme.verify_proof(&mpk, "alice@example.com", &decoded));
}

#[test]
fn ezkp_completeness() {
    complete(Ezkp::new(ModpGroup::rfc5114()));
}

#[test]
fn ezkp_completeness_in_toy_group() {
    complete(Ezkp::new(ModpGroup::toy()));
}

#[test]
fn fiat_shamir_completeness() {
    complete(Schnorr::new(Secp256k1, ChallengeMode::Scalar).unwrap());
}

#[test]
fn fiat_shamir_bit_challenge_completeness() {
    complete(Schnorr::new(Secp256k1, ChallengeMode::Bits { rounds: 80 }).unwrap());
}

#[test]
fn signature_delegated_completeness() {
    complete(SignatureIbi);
}

#[test]
fn twin_exponent_completeness() {
    complete(TwinExponent::new(Secp256k1));
}

#[test]
fn twin_schnorr_completeness() {
    complete(TwinSchnorr::new(Secp256k1));
}

#[test]
fn byte_api_completeness_for_every_kind() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let enrolled = common::enroll(&scheme, "alice@example.com");
        assert!(
            scheme
                .verify(&enrolled.keys.public, "alice@example.com", &enrolled.proof)
                .unwrap(),
            "{kind} proof should verify"
        );
    }
}

#[test]
fn extraction_is_a_function_of_key_and_identity() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut SecureRng::default()).unwrap();
        let first = scheme.extract(&keys.secret, "alice").unwrap();
        let second = scheme.extract(&keys.secret, "alice").unwrap();
        let other = scheme.extract(&keys.secret, "alice ").unwrap();
        assert_eq!(first, second, "{kind} extraction should be deterministic");
        assert_ne!(first, other, "{kind} keys should differ per identity");
    }
}

#[test]
fn master_public_key_recomputed_from_secret() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut SecureRng::default()).unwrap();
        assert_eq!(scheme.master_public_key(&keys.secret).unwrap(), keys.public);
    }
}

#[test]
fn configured_scheme_round_trip() {
    let config = EngineConfig {
        scheme: SchemeKind::Ezkp,
        modp_group: ModpPreset::Toy23,
        ..EngineConfig::default()
    };
    let scheme = Scheme::from_config(&config).unwrap();
    let enrolled = common::enroll(&scheme, "carol");
    // Toy group: 1-byte elements and scalars.
    assert_eq!(enrolled.keys.public.len(), 1);
    assert!(scheme
        .verify(&enrolled.keys.public, "carol", &enrolled.proof)
        .unwrap());
}

#[test]
fn ezkp_toy_values() {
    let group = ModpGroup::toy();
    let u = group.scalar(6u32);
    assert_eq!(group.mul_generator(&u).value(), &BigUint::from(8u32));

    let k = group.scalar(3u32);
    let user_public = group.mul_generator(&k);
    assert_eq!(user_public.value(), &BigUint::from(10u32));

    let q = group.scalar_from_digest(&Sha256::digest(b"ping"));
    let r = group.scalar(5u32);
    let z = group.mul_generator(&r);
    let resp = ezkp::response(&group, &r, &q, &k);
    assert!(ezkp::check(&group, &user_public, &z, &q, &resp));
}

#[test]
fn schnorr_toy_values() {
    let group = Secp256k1;
    let s = group.scalar_from_u64(7);
    let r = group.scalar_from_u64(3);
    let c = group.scalar_from_u64(1);
    let y = group.scalar_from_u64(10);
    let v = group.mul_generator(&s);
    let x = group.mul_generator(&r);

    assert_eq!(
        group.mul_generator(&y),
        group.combine(&x, &group.scalar_mul(&v, &c))
    );
    assert!(schnorr::check(&group, &v, &x, &c, &y));
    assert!(!schnorr::check(
        &group,
        &v,
        &x,
        &c,
        &group.scalar_from_u64(11)
    ));
}

#[test]
fn signature_proof_is_the_user_key() {
    let scheme = Scheme::new(SchemeKind::SignatureDelegated);
    let enrolled = common::enroll(&scheme, "alice");
    assert_eq!(enrolled.proof, enrolled.usk);
    assert_eq!(enrolled.proof.len(), 64);
}

#[test]
fn encoded_sizes() {
    let fs = common::enroll(&Scheme::new(SchemeKind::FiatShamir), "alice");
    // R ‖ X ‖ c ‖ y
    assert_eq!(fs.proof.len(), 33 + 33 + 32 + 32);

    let te = common::enroll(&Scheme::new(SchemeKind::TwinExponent), "alice");
    assert_eq!(te.keys.public.len(), 66);
    assert_eq!(te.proof.len(), 4 * 33 + 32 + 32);

    let ts = common::enroll(&Scheme::new(SchemeKind::TwinSchnorr), "alice");
    assert_eq!(ts.keys.public.len(), 99);
    assert_eq!(ts.proof.len(), 2 * 33 + 32 + 2 * 32);

    let ez = common::enroll(&Scheme::new(SchemeKind::Ezkp), "alice");
    assert_eq!(ez.keys.public.len(), 256);
    assert_eq!(ez.proof.len(), 2 * 256 + 32 + 32);
}
