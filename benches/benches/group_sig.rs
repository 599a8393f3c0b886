use ark_bls12_381::Bls12_381;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use benches::setup_group;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use group_sig::{DigestAlgorithm, GroupKey, Signature};

const MEMBER_COUNT: usize = 4;

fn setup_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);

    c.bench_function("Group key generation", |b| {
        b.iter(|| GroupKey::<Bls12_381>::generate_default(&mut rng).unwrap())
    });

    let group = GroupKey::<Bls12_381>::generate_default(&mut rng).unwrap();
    let prepared = group.public.prepare().unwrap();
    c.bench_function("Prepare group public key", |b| {
        b.iter(|| black_box(&group.public).prepare().unwrap())
    });
    c.bench_function("Issue member credential", |b| {
        b.iter(|| {
            group
                .issuing_key
                .issue(&mut rng, black_box(&prepared))
                .unwrap()
        })
    });
}

fn sig_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0u64);

    setup_group!(rng, MEMBER_COUNT, group, prepared, members, digests, sigs);

    let mut sign_group = c.benchmark_group("Group signing");
    for i in 0..MEMBER_COUNT {
        sign_group.bench_with_input(BenchmarkId::from_parameter(i), &i, |b, &i| {
            b.iter(|| {
                members[i]
                    .sign(&mut rng, black_box(&digests[i]), black_box(&prepared))
                    .unwrap()
            });
        });
    }
    sign_group.finish();

    let mut verify_group = c.benchmark_group("Group signature verification");
    for i in 0..MEMBER_COUNT {
        verify_group.bench_with_input(BenchmarkId::from_parameter(i), &i, |b, &i| {
            b.iter(|| assert!(sigs[i].verify(black_box(&digests[i]), black_box(&prepared))));
        });
    }
    verify_group.finish();

    let sig_bytes = sigs
        .iter()
        .map(|s| s.to_bytes().unwrap())
        .collect::<Vec<_>>();
    let mut decode_group = c.benchmark_group("Group signature decoding");
    for i in 0..MEMBER_COUNT {
        decode_group.bench_with_input(BenchmarkId::from_parameter(i), &i, |b, &i| {
            b.iter(|| Signature::<Bls12_381>::from_bytes(black_box(&sig_bytes[i])).unwrap());
        });
    }
    decode_group.finish();

    let mut open_group = c.benchmark_group("Group signature opening");
    for i in 0..MEMBER_COUNT {
        open_group.bench_with_input(BenchmarkId::from_parameter(i), &i, |b, &i| {
            b.iter(|| {
                group
                    .opening_key
                    .open(black_box(&digests[i]), black_box(&sigs[i]), &prepared)
                    .unwrap()
            });
        });
    }
    open_group.finish();
}

criterion_group!(benches, setup_benchmark, sig_benchmark);
criterion_main!(benches);
