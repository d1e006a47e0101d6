// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

#![allow(missing_docs)]

#[macro_use]
extern crate criterion;

use criterion::{BatchSize, Criterion};
use rand_chacha::ChaCha12Rng;
use rand_core::{CryptoRngCore, SeedableRng};
use ringsig::{LinkableRingSignature, PrivateKey, PublicKey, Ring, RingSignature, WithinRingSignature};

// Ring sizes
const RING_SIZES: [usize; 4] = [2, 8, 32, 128];

// Message
const MESSAGE: &[u8] = b"Benchmark message";

// Generate a random ring, with the signer in the middle
fn generate_data<R: CryptoRngCore>(size: usize, rng: &mut R) -> (PrivateKey, usize, Ring) {
    let private_key = PrivateKey::random(rng);
    let index = size / 2;

    let mut keys = (0..size)
        .map(|_| PrivateKey::random(rng).public_key())
        .collect::<Vec<PublicKey>>();
    keys[index] = private_key.public_key();

    (private_key, index, Ring::new(&keys).unwrap())
}

fn sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");
    let mut rng = ChaCha12Rng::seed_from_u64(8675309);

    for size in RING_SIZES {
        let (private_key, index, ring) = generate_data(size, &mut rng);

        let label = format!("Sign: n = {}", size);
        group.bench_function(&label, |b| {
            b.iter(|| RingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap())
        });

        let label = format!("Sign linkable: n = {}", size);
        group.bench_function(&label, |b| {
            b.iter(|| LinkableRingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap())
        });

        let label = format!("Sign within ring: n = {}", size);
        group.bench_function(&label, |b| {
            b.iter(|| WithinRingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap())
        });
    }
    group.finish();
}

fn verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");
    let mut rng = ChaCha12Rng::seed_from_u64(8675309);

    for size in RING_SIZES {
        let (private_key, index, ring) = generate_data(size, &mut rng);

        let label = format!("Verify: n = {}", size);
        group.bench_function(&label, |b| {
            let signature = RingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap();
            b.iter(|| assert!(signature.verify(MESSAGE, &ring).is_ok()))
        });

        let label = format!("Verify linkable: n = {}", size);
        group.bench_function(&label, |b| {
            let signature =
                LinkableRingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap();
            b.iter(|| assert!(signature.verify(MESSAGE, &ring).is_ok()))
        });

        let label = format!("Verify within ring: n = {}", size);
        group.bench_function(&label, |b| {
            let signature = WithinRingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng).unwrap();
            b.iter(|| assert!(signature.verify_as_member(MESSAGE, &ring, &private_key, index).is_ok()))
        });
    }
    group.finish();
}

fn decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let mut rng = ChaCha12Rng::seed_from_u64(8675309);

    for size in RING_SIZES {
        let (private_key, index, ring) = generate_data(size, &mut rng);

        let label = format!("Decode linkable: n = {}", size);
        group.bench_function(&label, |b| {
            let bytes = LinkableRingSignature::sign_with_rng(MESSAGE, &ring, &private_key, index, &mut rng)
                .unwrap()
                .to_bytes();
            b.iter_batched_ref(
                || bytes.clone(),
                |bytes| LinkableRingSignature::from_bytes(bytes).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group! {
    name = signing;
    config = Criterion::default();
    targets = sign
}

criterion_group! {
    name = verification;
    config = Criterion::default();
    targets = verify, decode
}

criterion_main!(signing, verification);
