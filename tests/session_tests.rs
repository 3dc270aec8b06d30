mod common;

use std::sync::Arc;
use std::thread;

use sigma_ibi::protocol::{identify, Issuer, Outcome, Verifier};
use sigma_ibi::schemes::signature::SignatureIbi;
use sigma_ibi::schemes::twin_exponent::TwinExponent;
use sigma_ibi::schemes::twin_schnorr::TwinSchnorr;
use sigma_ibi::{Error, IdentificationScheme, NonceLedger, Secp256k1, SecureRng};

#[test]
fn concurrent_sessions_share_one_verifier() {
    common::init_tracing();
    let mut rng = SecureRng::default();
    let issuer = Issuer::setup(TwinSchnorr::new(Secp256k1), &mut rng).unwrap();
    let ledger = NonceLedger::new(1024);
    let verifier = Arc::new(
        Verifier::new(issuer.scheme().clone(), issuer.master_public_key().clone())
            .with_replay_guard(ledger.clone()),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let prover = issuer
                .enroll(&format!("user-{i}@example.com"))
                .unwrap()
                .with_ledger(NonceLedger::new(64));
            let verifier = Arc::clone(&verifier);
            thread::spawn(move || {
                let mut rng = SecureRng::default();
                (0..5)
                    .map(|_| identify(&mut rng, &prover, verifier.as_ref()).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let outcomes = handle.join().unwrap();
        assert!(outcomes.iter().all(|o| *o == Outcome::Accepted));
    }
    assert_eq!(ledger.len(), 40);
}

#[test]
fn interleaved_sessions_for_one_prover() {
    let mut rng = SecureRng::default();
    let issuer = Issuer::setup(TwinExponent::new(Secp256k1), &mut rng).unwrap();
    let verifier = Verifier::new(issuer.scheme().clone(), issuer.master_public_key().clone());
    let prover = issuer.enroll("alice").unwrap();

    let first = prover.start(&mut rng).unwrap();
    let second = prover.start(&mut rng).unwrap();
    let mut first_open = verifier.open("alice", first.commitment().clone()).unwrap();
    let mut second_open = verifier.open("alice", second.commitment().clone()).unwrap();

    second_open.challenge(&mut rng);
    let c1 = first_open.challenge(&mut rng);

    // Answering with the other session's challenge must fail.
    let r2 = second.respond(&c1).unwrap();
    assert_eq!(second_open.finish(&r2), Outcome::Rejected);
    let r1 = first.respond(&c1).unwrap();
    assert_eq!(first_open.finish(&r1), Outcome::Accepted);
}

#[test]
fn verifier_without_master_secret_still_verifies() {
    let mut rng = SecureRng::default();
    let scheme = SignatureIbi;
    let issuer = Issuer::setup(scheme, &mut rng).unwrap();
    let public = Issuer::public_only(scheme, issuer.master_public_key().clone());

    assert!(matches!(public.extract("alice"), Err(Error::KeyMissing)));
    assert!(matches!(public.enroll("alice"), Err(Error::KeyMissing)));

    let prover = issuer.enroll("alice").unwrap();
    let verifier = Verifier::new(scheme, public.master_public_key().clone());
    let outcome = identify(&mut rng, &prover, &verifier).unwrap();
    assert!(outcome.into_result("alice").is_ok());
}

#[test]
fn rejected_session_maps_to_error() {
    let mut rng = SecureRng::default();
    let scheme = TwinSchnorr::new(Secp256k1);
    let issuer = Issuer::setup(scheme.clone(), &mut rng).unwrap();
    let impostor = Issuer::setup(scheme.clone(), &mut rng).unwrap();
    let verifier = Verifier::new(scheme, issuer.master_public_key().clone());

    let prover = impostor.enroll("alice").unwrap();
    let outcome = identify(&mut rng, &prover, &verifier).unwrap();
    assert_eq!(
        outcome.into_result(prover.identity()),
        Err(Error::VerificationFailed("alice".into()))
    );
}

#[test]
fn non_interactive_proofs_checked_by_verifier() {
    let mut rng = SecureRng::default();
    let issuer = Issuer::setup(TwinExponent::new(Secp256k1), &mut rng).unwrap();
    let verifier = Verifier::new(issuer.scheme().clone(), issuer.master_public_key().clone());
    let proof = issuer.enroll("alice").unwrap().prove(&mut rng).unwrap();

    assert_eq!(verifier.verify_proof("alice", &proof), Ok(Outcome::Accepted));
    assert_eq!(verifier.verify_proof("bob", &proof), Ok(Outcome::Rejected));
    assert_eq!(verifier.verify_proof("", &proof), Err(Error::EmptyIdentity));
    assert!(verifier
        .scheme()
        .verify_proof(issuer.master_public_key(), "alice", &proof));
}

#[test]
fn signature_sessions_share_a_ledger() {
    common::init_tracing();
    let mut rng = SecureRng::default();
    let issuer = Issuer::setup(SignatureIbi, &mut rng).unwrap();
    let ledger = NonceLedger::new(64);
    let verifier = Verifier::new(SignatureIbi, issuer.master_public_key().clone())
        .with_replay_guard(ledger.clone());

    let alice = issuer.enroll("alice").unwrap().with_ledger(ledger.clone());
    let bob = issuer.enroll("bob").unwrap().with_ledger(ledger.clone());
    for prover in [&alice, &bob, &alice] {
        assert_eq!(identify(&mut rng, prover, &verifier), Ok(Outcome::Accepted));
    }

    for prover in [&alice, &bob] {
        let proof = prover.prove(&mut rng).unwrap();
        assert_eq!(
            verifier.verify_proof(prover.identity(), &proof),
            Ok(Outcome::Accepted)
        );
    }
    assert!(ledger.is_empty());
}
