#![no_main]

use libfuzzer_sys::fuzz_target;
use sigma_ibi::{Scheme, SchemeKind};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, key)) = data.split_first() else {
        return;
    };
    let scheme = Scheme::new(SchemeKind::ALL[usize::from(selector) % SchemeKind::ALL.len()]);

    // Any master secret that decodes must extract and re-derive its public key.
    if let Ok(mpk) = scheme.master_public_key(key) {
        let usk = scheme.extract(key, "fuzz").unwrap();
        assert!(!usk.is_empty());
        assert!(!mpk.is_empty());
    }
    let _ = scheme.verify(key, "fuzz", &[]);
});
