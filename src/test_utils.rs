// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use alloc::vec::Vec;

use rand_core::CryptoRngCore;

use crate::{
    key::{PrivateKey, PublicKey},
    ring::Ring,
};

/// Generate a random ring of `size` keys, where the returned private key is at position `index`.
pub(crate) fn generate_data<R: CryptoRngCore>(size: usize, index: usize, rng: &mut R) -> (PrivateKey, Ring) {
    let private_key = PrivateKey::random(rng);
    let keys = (0..size)
        .map(|i| {
            if i == index {
                private_key.public_key()
            } else {
                PrivateKey::random(rng).public_key()
            }
        })
        .collect::<Vec<PublicKey>>();

    (private_key, Ring::new(&keys).unwrap())
}

/// Three keys derived from fixed material, with the returned private key at position 1.
pub(crate) fn known_answer_data() -> (PrivateKey, Vec<PublicKey>) {
    let material = [
        "0100000000000000000000000000000000000000000000000000000000000000",
        "2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a2a0a",
        "0807060504030201000000000000000000000000000000000000000000000000",
    ]
    .iter()
    .map(|encoded| PrivateKey::from_bytes(&hex::decode(encoded).unwrap()).unwrap())
    .collect::<Vec<PrivateKey>>();

    let keys = material.iter().map(PrivateKey::public_key).collect::<Vec<PublicKey>>();

    (material[1].clone(), keys)
}
