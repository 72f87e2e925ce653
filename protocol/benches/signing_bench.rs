// Signing & verification benchmarks for the wallet core.
//
// Covers secp256k1 key generation, message signing (including the
// recovery-id search), verification, public key recovery, and signing a
// full EIP-155 transaction.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use vellum_protocol::address::Address;
use vellum_protocol::crypto::{keccak256, recover_public_key, KeyGenerator, Signer, Verifier};
use vellum_protocol::transaction::TransactionBuilder;

fn bench_keypair_generation(c: &mut Criterion) {
    let generator = KeyGenerator::new();
    c.bench_function("secp256k1/keypair_generate", |b| {
        b.iter(|| generator.generate_key_pair());
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let signer = Signer::new(KeyGenerator::new().generate_key_pair());
    let message = b"transfer 1 ether from alice to bob; nonce=42";

    c.bench_function("secp256k1/sign_message", |b| {
        b.iter(|| signer.sign(message).unwrap());
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let pair = KeyGenerator::new().generate_key_pair();
    let message = b"transfer 1 ether from alice to bob; nonce=42";
    let signature = Signer::new(pair.clone()).sign(message).unwrap();
    let verifier = Verifier::new(pair.public_key().clone());

    c.bench_function("secp256k1/verify_signature", |b| {
        b.iter(|| verifier.verify(message, &signature));
    });
}

fn bench_recover_public_key(c: &mut Criterion) {
    let message = b"who signed this";
    let signature = Signer::new(KeyGenerator::new().generate_key_pair())
        .sign(message)
        .unwrap();
    let hash = keccak256(message);

    c.bench_function("secp256k1/recover_public_key", |b| {
        b.iter(|| recover_public_key(&hash, &signature).unwrap());
    });
}

fn bench_sign_transaction(c: &mut Criterion) {
    let pair = KeyGenerator::new().generate_key_pair();
    let mut group = c.benchmark_group("secp256k1/sign_transaction");

    for data_len in [0usize, 256, 4096] {
        let data = vec![0xAB; data_len];
        group.throughput(Throughput::Bytes(data_len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(data_len), &data, |b, data| {
            b.iter(|| {
                TransactionBuilder::create(42u8, 20_000_000_000u64, 21_000u32, 1u8, data.clone(), Some(1))
                    .to(Address::new([0x35; 20]))
                    .sign(&pair)
                    .unwrap()
                    .build()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_message,
    bench_verify_signature,
    bench_recover_public_key,
    bench_sign_transaction,
);
criterion_main!(benches);
