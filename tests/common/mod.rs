//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use sigma_ibi::{MasterKeyBytes, Scheme, SecureRng};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Only logs from the crate under test are shown. Subsequent calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("sigma_ibi=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Master keys plus an encoded user key and proof for `identity`.
pub struct Enrolled {
    pub keys: MasterKeyBytes,
    pub usk: Vec<u8>,
    pub proof: Vec<u8>,
}

pub fn enroll(scheme: &Scheme, identity: &str) -> Enrolled {
    let mut rng = SecureRng::default();
    let keys = scheme.setup(&mut rng).expect("Setup should succeed");
    let usk = scheme
        .extract(&keys.secret, identity)
        .expect("Extraction should succeed");
    let proof = scheme
        .prove(&mut rng, &keys.public, &usk, identity)
        .expect("Proof generation should succeed");
    Enrolled { keys, usk, proof }
}
