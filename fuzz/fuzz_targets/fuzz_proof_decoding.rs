#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use sigma_ibi::{MasterKeyBytes, Scheme, SchemeKind, SecureRng};

fn fixtures() -> &'static [(Scheme, MasterKeyBytes)] {
    static FIXTURES: OnceLock<Vec<(Scheme, MasterKeyBytes)>> = OnceLock::new();
    FIXTURES.get_or_init(|| {
        let mut rng = SecureRng::default();
        SchemeKind::ALL
            .into_iter()
            .map(|kind| {
                let scheme = Scheme::new(kind);
                let keys = scheme.setup(&mut rng).unwrap();
                (scheme, keys)
            })
            .collect()
    })
}

fuzz_target!(|data: &[u8]| {
    let Some((&selector, proof)) = data.split_first() else {
        return;
    };
    let (scheme, keys) = &fixtures()[usize::from(selector) % SchemeKind::ALL.len()];
    if let Ok(accepted) = scheme.verify(&keys.public, "fuzz@example.com", proof) {
        assert!(!accepted, "random bytes verified as a proof");
    }
});
