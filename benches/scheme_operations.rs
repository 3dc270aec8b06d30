use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sigma_ibi::{Scheme, SchemeKind, SecureRng};

fn bench_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("setup");
    let mut rng = SecureRng::default();
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| scheme.setup(black_box(&mut rng)).unwrap())
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let mut rng = SecureRng::default();
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut rng).unwrap();
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                scheme
                    .extract(black_box(&keys.secret), black_box("alice@example.com"))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_prove(c: &mut Criterion) {
    let mut group = c.benchmark_group("prove");
    let mut rng = SecureRng::default();
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&keys.secret, "alice@example.com").unwrap();
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                scheme
                    .prove(
                        black_box(&mut rng),
                        black_box(&keys.public),
                        black_box(&usk),
                        "alice@example.com",
                    )
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let mut rng = SecureRng::default();
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(kind);
        let keys = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&keys.secret, "alice@example.com").unwrap();
        let proof = scheme
            .prove(&mut rng, &keys.public, &usk, "alice@example.com")
            .unwrap();
        group.bench_function(BenchmarkId::from_parameter(kind), |b| {
            b.iter(|| {
                scheme
                    .verify(
                        black_box(&keys.public),
                        "alice@example.com",
                        black_box(&proof),
                    )
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_bit_challenge_rounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("fiat_shamir_bits_prove");
    let mut rng = SecureRng::default();
    for rounds in [16usize, 64, 128] {
        let scheme = Scheme::fiat_shamir_bits(rounds).unwrap();
        let keys = scheme.setup(&mut rng).unwrap();
        let usk = scheme.extract(&keys.secret, "alice@example.com").unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, _| {
            b.iter(|| {
                scheme
                    .prove(&mut rng, &keys.public, &usk, "alice@example.com")
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_setup,
    bench_extract,
    bench_prove,
    bench_verify,
    bench_bit_challenge_rounds
);
criterion_main!(benches);
