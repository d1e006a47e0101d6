// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Group elements are points on the Ed25519 curve.
//!
//! The curve group has order `8*L`, and only its prime-order subgroup is safe to use. Every point decoded by this
//! module is checked to be a canonical encoding of a nonidentity element of that subgroup; this rules out small-order
//! points and points with a torsion component, which would otherwise allow key images and signatures to be malleated.

use blake3::Hasher;
use curve25519_dalek::{edwards::CompressedEdwardsY, traits::IsIdentity, EdwardsPoint};

use crate::{
    domains,
    encoding::{to_array, EncodingError, POINT_BYTES},
};

/// Decode a group element, ensuring it is a canonically-encoded nonidentity element of the prime-order subgroup.
pub fn decode(bytes: &[u8]) -> Result<EdwardsPoint, EncodingError> {
    let compressed = CompressedEdwardsY(to_array(bytes)?);
    let point = compressed.decompress().ok_or(EncodingError::InvalidPoint {
        reason: "not the encoding of a curve point",
    })?;

    // Decompression tolerates unreduced coordinates and a sign bit on zero
    if point.compress() != compressed {
        return Err(EncodingError::InvalidPoint {
            reason: "non-canonical encoding",
        });
    }

    validate(&point)?;

    Ok(point)
}

/// Encode a group element canonically.
pub fn encode(point: &EdwardsPoint) -> [u8; POINT_BYTES] {
    point.compress().to_bytes()
}

/// Check that a group element is a nonidentity element of the prime-order subgroup.
pub fn validate(point: &EdwardsPoint) -> Result<(), EncodingError> {
    // This includes the identity
    if point.is_small_order() {
        return Err(EncodingError::InvalidPoint {
            reason: "small-order point",
        });
    }
    if !point.is_torsion_free() {
        return Err(EncodingError::InvalidPoint {
            reason: "point has a torsion component",
        });
    }

    Ok(())
}

/// Deterministically hash arbitrary data to a nonidentity element of the prime-order subgroup.
///
/// This uses `BLAKE3` in extendable-output mode under a fixed domain separator. Successive 32-byte blocks of output
/// are interpreted as compressed point encodings until one decompresses; the result is multiplied by the cofactor to
/// clear any torsion component. If that produces the identity, the next block is tried instead. Roughly half of all
/// blocks decompress, so the expected number of attempts is two.
///
/// The discrete logarithm of the output with respect to any other generator is unknown.
pub fn hash_to_point(data: &[u8]) -> EdwardsPoint {
    hash_to_point_with_domain(domains::HASH_TO_POINT, data)
}

/// Hash data to a point as in [`hash_to_point`], but under another domain separator.
///
/// Outputs under different domains are unrelated.
pub(crate) fn hash_to_point_with_domain(domain: &'static str, data: &[u8]) -> EdwardsPoint {
    let mut hasher = Hasher::new();
    hasher.update(domain.as_bytes());
    hasher.update(&(data.len() as u64).to_le_bytes());
    hasher.update(data);
    let mut hasher_xof = hasher.finalize_xof();

    let mut candidate = [0u8; POINT_BYTES];
    loop {
        hasher_xof.fill(&mut candidate);
        if let Some(point) = CompressedEdwardsY(candidate).decompress() {
            let point = point.mul_by_cofactor();
            if !point.is_identity() {
                return point;
            }
        }
    }
}
