//! Identity-based identification walkthrough.
//!
//! An issuer extracts keys for two users. Each user identifies interactively to a verifier
//! that only knows the master public key, then sends a non-interactive proof. A proof
//! presented under someone else's identity is rejected.

use sigma_ibi::protocol::{identify, Issuer, Verifier};
use sigma_ibi::schemes::twin_exponent::TwinExponent;
use sigma_ibi::{IdentificationScheme, NonceLedger, Secp256k1, SecureRng};

fn main() -> Result<(), sigma_ibi::Error> {
    println!("Identity-Based Identification: Twin-Exponent Example");
    println!("====================================================\n");

    let mut rng = SecureRng::default();

    println!("Step 1: Issuer generates the master key");
    let issuer = Issuer::setup(TwinExponent::new(Secp256k1), &mut rng)?;
    let scheme = issuer.scheme().clone();
    let mpk = issuer.master_public_key().clone();

    println!("Step 2: Issuer extracts user keys");
    let ledger = NonceLedger::default();
    let alice = issuer.enroll("alice@example.com")?.with_ledger(ledger.clone());
    let bob = issuer.enroll("bob@example.com")?.with_ledger(ledger);

    println!("Step 3: Interactive identification");
    let verifier = Verifier::new(scheme.clone(), mpk.clone());
    for prover in [&alice, &bob] {
        let outcome = identify(&mut rng, prover, &verifier)?;
        println!("  {}: {outcome}", prover.identity());
    }

    println!("\nStep 4: Non-interactive proof");
    let proof = alice.prove(&mut rng)?;
    println!(
        "  Proof for alice@example.com: {}",
        if scheme.verify_proof(&mpk, "alice@example.com", &proof) {
            "accepted"
        } else {
            "rejected"
        }
    );
    println!(
        "  Same proof claimed by bob@example.com: {}",
        if scheme.verify_proof(&mpk, "bob@example.com", &proof) {
            "accepted"
        } else {
            "rejected"
        }
    );

    Ok(())
}
