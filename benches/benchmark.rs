use criterion::{criterion_group, criterion_main, Criterion};
use mldsa::ml_dsa_65;
use mldsa::traits::{KeyGen, Signer, Verifier};


pub fn criterion_benchmark(c: &mut Criterion) {
    let message = [0u8, 1, 2, 3, 4, 5, 6, 7];

    let (pk65, sk65) = ml_dsa_65::try_keygen().unwrap();
    let sig65 = sk65.try_sign(&message, &[]).unwrap();

    c.bench_function("ml_dsa_65 keygen", |b| b.iter(|| ml_dsa_65::try_keygen()));
    c.bench_function("ml_dsa_65 keygen from seed", |b| {
        b.iter(|| ml_dsa_65::KG::keygen_from_seed(&[0x11u8; 32]))
    });

    c.bench_function("ml_dsa_65 sign", |b| b.iter(|| sk65.try_sign(&message, &[])));
    c.bench_function("ml_dsa_65 sign deterministic", |b| {
        b.iter(|| sk65.try_sign_deterministic(&message, &[]))
    });

    c.bench_function("ml_dsa_65 verify", |b| b.iter(|| pk65.verify(&message, &sig65, &[])));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
