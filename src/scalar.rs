// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Scalars are elements of the field of integers modulo the Ed25519 prime subgroup order `L`.
//!
//! Arithmetic is provided by [`Scalar`] itself and runs in constant time. This module adds the encodings the protocol
//! needs: strict canonical decoding for signature material, modular reduction for externally supplied private key
//! material, and wide reduction for uniformly distributed hash output.

use curve25519_dalek::Scalar;
use rand_core::CryptoRngCore;

use crate::encoding::{to_array, EncodingError, SCALAR_BYTES};

/// Decode a canonical scalar.
///
/// The input must be exactly [`SCALAR_BYTES`] long and encode an integer less than `L`.
/// This ensures that every scalar has exactly one accepted encoding.
pub fn decode(bytes: &[u8]) -> Result<Scalar, EncodingError> {
    Option::<Scalar>::from(Scalar::from_canonical_bytes(to_array(bytes)?)).ok_or(EncodingError::NonCanonicalScalar)
}

/// Decode a scalar by reducing it modulo `L`.
///
/// The input must be exactly [`SCALAR_BYTES`] long.
pub fn reduce(bytes: &[u8]) -> Result<Scalar, EncodingError> {
    Ok(Scalar::from_bytes_mod_order(to_array(bytes)?))
}

/// Encode a scalar canonically.
pub fn encode(scalar: &Scalar) -> [u8; SCALAR_BYTES] {
    scalar.to_bytes()
}

/// Produce a scalar from uniformly-distributed bytes using wide reduction.
pub(crate) fn from_uniform(bytes: &[u8; 64]) -> Scalar {
    Scalar::from_bytes_mod_order_wide(bytes)
}

/// Sample a scalar uniformly at random using a [`CryptoRngCore`] random number generator `rng`.
pub fn random<R: CryptoRngCore>(rng: &mut R) -> Scalar {
    Scalar::random(rng)
}

/// Sample a nonzero scalar uniformly at random using a [`CryptoRngCore`] random number generator `rng`.
pub fn random_nonzero<R: CryptoRngCore>(rng: &mut R) -> Scalar {
    loop {
        let scalar = Scalar::random(rng);
        if scalar != Scalar::ZERO {
            return scalar;
        }
    }
}
