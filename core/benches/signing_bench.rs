// Signing, recovery and codec benchmarks for keybridge-core.
//
// Covers key generation, RFC 6979 signing (plain and EOS-canonical),
// public key recovery, and the base58check encode/decode paths that every
// EOS-side conversion goes through.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use keybridge_core::bridge::cross_validate;
use keybridge_core::config::{CurveTag, RecoveryConvention};
use keybridge_core::crypto::{
    recover_public_key, sign, sign_canonical, verify, HashAlgorithm, KeyMaterial, Signature,
};

const MESSAGE: &[u8] = b"EOS can handle ETH signatures";

fn bench_key_generation(c: &mut Criterion) {
    c.bench_function("secp256k1/key_generate", |b| {
        b.iter(|| KeyMaterial::generate().unwrap());
    });
}

fn bench_sign(c: &mut Criterion) {
    let key = KeyMaterial::generate().unwrap();
    let digest = HashAlgorithm::Keccak256.digest(MESSAGE);

    c.bench_function("secp256k1/sign", |b| {
        b.iter(|| sign(&key, &digest).unwrap());
    });
    c.bench_function("secp256k1/sign_canonical", |b| {
        b.iter(|| sign_canonical(&key, &digest).unwrap());
    });
}

fn bench_recover_and_verify(c: &mut Criterion) {
    let key = KeyMaterial::generate().unwrap();
    let digest = HashAlgorithm::Keccak256.digest(MESSAGE);
    let signature = sign(&key, &digest).unwrap();

    c.bench_function("secp256k1/recover", |b| {
        b.iter(|| recover_public_key(&signature, &digest).unwrap());
    });
    c.bench_function("secp256k1/verify", |b| {
        b.iter(|| verify(key.public_key(), &signature, &digest));
    });
}

fn bench_codecs(c: &mut Criterion) {
    let key = KeyMaterial::generate().unwrap();
    let digest = HashAlgorithm::Keccak256.digest(MESSAGE);
    let signature = sign_canonical(&key, &digest).unwrap();
    let wif = key.to_wif();
    let eos_pub = key.public_key().to_eos();
    let eos_sig = signature.to_checked(CurveTag::K1).unwrap();
    let eth_sig = signature.to_hex_triple(RecoveryConvention::Ethereum).unwrap();

    let mut group = c.benchmark_group("codec");
    group.bench_function("wif_decode", |b| {
        b.iter(|| KeyMaterial::from_wif(&wif).unwrap());
    });
    group.bench_function("eos_public_key_decode", |b| {
        b.iter(|| keybridge_core::PublicKey::from_eos(&eos_pub).unwrap());
    });
    group.bench_function("sig_k1_decode", |b| {
        b.iter(|| Signature::from_checked(&eos_sig).unwrap());
    });
    group.bench_function("hex_triple_decode", |b| {
        b.iter(|| Signature::from_hex_triple(&eth_sig).unwrap());
    });
    group.finish();
}

fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash");

    for size in [32usize, 256, 4096] {
        let data = vec![0xa5u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("keccak256", size), &data, |b, data| {
            b.iter(|| HashAlgorithm::Keccak256.digest(data));
        });
        group.bench_with_input(BenchmarkId::new("sha256", size), &data, |b, data| {
            b.iter(|| HashAlgorithm::Sha256.digest(data));
        });
    }

    group.finish();
}

fn bench_cross_validate(c: &mut Criterion) {
    let key = KeyMaterial::generate().unwrap();

    c.bench_function("bridge/cross_validate", |b| {
        b.iter(|| cross_validate(&key, MESSAGE).unwrap());
    });
}

criterion_group!(
    benches,
    bench_key_generation,
    bench_sign,
    bench_recover_and_verify,
    bench_codecs,
    bench_hash,
    bench_cross_validate,
);
criterion_main!(benches);
