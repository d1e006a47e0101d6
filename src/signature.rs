// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{vec, vec::Vec};

use curve25519_dalek::{constants::ED25519_BASEPOINT_POINT, EdwardsPoint, Scalar};
#[cfg(feature = "rand")]
use rand_core::OsRng;
use rand_core::CryptoRngCore;
use snafu::prelude::*;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::{
    domains,
    encoding::{impl_canonical_serialization, EncodingError, SCALAR_BYTES},
    key::PrivateKey,
    ring::Ring,
    scalar,
    transcript::ChallengeTranscript,
    util::{double_mul, OperationTiming},
};

/// A ring signature.
///
/// The signature consists of the initial challenge `c0` and one response per ring member. It does not contain the
/// signer's index, and it is only meaningful together with the message and the exact [`Ring`] it was produced with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RingSignature {
    c0: Scalar,
    r: Vec<Scalar>,
}

/// Errors that can arise relating to signing, verification, and signature encoding.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SignatureError {
    /// An invalid parameter was provided.
    #[snafu(display("An invalid parameter was provided: {reason}"))]
    InvalidParameter {
        /// The reason for the parameter error.
        reason: &'static str,
    },
    /// The signer index was out of range for the ring.
    #[snafu(display("Index {index} is out of range for a ring of size {size}"))]
    InvalidIndex {
        /// The provided index.
        index: usize,
        /// The ring size.
        size: usize,
    },
    /// A signature failed to decode.
    #[snafu(display("A signature failed to decode"))]
    InvalidEncoding {
        /// The underlying encoding error.
        source: EncodingError,
    },
    /// A signature does not have the shape required by the ring.
    #[snafu(display("The signature does not match the ring: {reason}"))]
    InvalidStructure {
        /// The reason for the mismatch.
        reason: &'static str,
    },
    /// A signature failed to verify.
    #[snafu(display("A signature failed to verify"))]
    InvalidSignature,
}

/// Check that `index` is a valid position in `ring` holding the public key of `private_key`.
///
/// The key comparison runs in constant time.
pub(crate) fn check_signer(ring: &Ring, private_key: &PrivateKey, index: usize) -> Result<(), SignatureError> {
    let key = ring.get_keys().get(index).ok_or(SignatureError::InvalidIndex {
        index,
        size: ring.len(),
    })?;

    if !bool::from(key.ct_eq(&private_key.public_key())) {
        return Err(SignatureError::InvalidParameter {
            reason: "ring member at the given index does not match the private key",
        });
    }

    Ok(())
}

impl RingSignature {
    /// Generate a [`RingSignature`] on `message`.
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`; if the index is out of
    /// range or the key does not match, returns a [`SignatureError`]. The ring is not searched for the key: if the
    /// signer's position in the ring is predictable, [shuffle](`Ring::shuffle`) the ring first.
    ///
    /// This function provides a cryptographically-secure random number generator for you.
    /// If you want to provide your own, use [`RingSignature::sign_with_rng`] instead.
    #[cfg(feature = "rand")]
    pub fn sign(message: &[u8], ring: &Ring, private_key: &PrivateKey, index: usize) -> Result<Self, SignatureError> {
        Self::sign_with_rng(message, ring, private_key, index, &mut OsRng)
    }

    /// Generate a [`RingSignature`] on `message` using a supplied [`CryptoRngCore`] random number generator `rng`.
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`; if the index is out of
    /// range or the key does not match, returns a [`SignatureError`].
    ///
    /// If you'd like a cryptographically-secure random number generator provided for you, use [`RingSignature::sign`]
    /// instead.
    pub fn sign_with_rng<R: CryptoRngCore>(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
        rng: &mut R,
    ) -> Result<Self, SignatureError> {
        Self::sign_internal(message, ring, private_key, index, rng, OperationTiming::Constant)
    }

    /// Generate a [`RingSignature`] on `message` in variable time.
    ///
    /// This function specifically avoids constant-time operations for efficiency, and leaks timing information about
    /// the private key and the signer's index. Only use it if you absolutely know what you're doing.
    #[cfg(all(feature = "rand", feature = "hazmat"))]
    pub fn sign_vartime(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
    ) -> Result<Self, SignatureError> {
        Self::sign_internal(message, ring, private_key, index, &mut OsRng, OperationTiming::Variable)
    }

    /// Generate a [`RingSignature`] on `message` in variable time using a supplied [`CryptoRngCore`] random number
    /// generator `rng`.
    ///
    /// This function specifically avoids constant-time operations for efficiency, and leaks timing information about
    /// the private key and the signer's index. Only use it if you absolutely know what you're doing.
    #[cfg(feature = "hazmat")]
    pub fn sign_with_rng_vartime<R: CryptoRngCore>(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
        rng: &mut R,
    ) -> Result<Self, SignatureError> {
        Self::sign_internal(message, ring, private_key, index, rng, OperationTiming::Variable)
    }

    #[allow(non_snake_case)]
    fn sign_internal<R: CryptoRngCore>(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
        rng: &mut R,
        timing: OperationTiming,
    ) -> Result<Self, SignatureError> {
        check_signer(ring, private_key, index)?;

        let n = ring.len();
        let keys = ring.get_keys();
        let G = ED25519_BASEPOINT_POINT;
        trace!(ring_size = n, "generating ring signature");

        let transcript = ChallengeTranscript::new(domains::TRANSCRIPT_SIGNATURE, ring, message);
        let mut transcript_rng = transcript.build_rng(private_key, index, rng);

        // Commit to the nonce at the signer's position, which fixes the challenge for the next position
        let k = Zeroizing::new(scalar::random(&mut transcript_rng));
        let mut c = transcript.challenge(&[EdwardsPoint::mul_base(&k)]);

        // Walk the rest of the ring with random responses, keeping the challenge for index zero when we pass it
        let mut c0 = Scalar::ZERO;
        let mut r = vec![Scalar::ZERO; n];
        let mut i = (index + 1) % n;
        for _ in 1..n {
            c0.conditional_assign(&c, i.ct_eq(&0));

            r[i] = scalar::random(&mut transcript_rng);
            let R = double_mul(&r[i], &G, &c, keys[i].as_point(), timing);
            c = transcript.challenge(&[R]);

            i = (i + 1) % n;
        }

        // We are back at the signer's position, so close the ring
        c0.conditional_assign(&c, index.ct_eq(&0));
        r[index] = *k - c * private_key.get_x();

        Ok(Self { c0, r })
    }

    /// Verify a [`RingSignature`] on `message` against a `ring`.
    ///
    /// The ring must be identical, including its order, to the one used for signing. If the signature does not have one
    /// response per ring member, or does not verify, returns a [`SignatureError`].
    ///
    /// Verification never panics, and runs in variable time since all of its inputs are public.
    #[allow(non_snake_case)]
    pub fn verify(&self, message: &[u8], ring: &Ring) -> Result<(), SignatureError> {
        if self.r.len() != ring.len() {
            debug!(
                ring_size = ring.len(),
                responses = self.r.len(),
                "rejected ring signature with mismatched size"
            );
            return Err(SignatureError::InvalidStructure {
                reason: "response count did not match the ring size",
            });
        }

        let G = ED25519_BASEPOINT_POINT;
        let transcript = ChallengeTranscript::new(domains::TRANSCRIPT_SIGNATURE, ring, message);

        // Recompute the challenge chain all the way around
        let mut c = self.c0;
        for (key, r) in ring.get_keys().iter().zip(self.r.iter()) {
            let R = double_mul(r, &G, &c, key.as_point(), OperationTiming::Variable);
            c = transcript.challenge(&[R]);
        }

        // The chain must close
        if !bool::from(c.ct_eq(&self.c0)) {
            debug!(ring_size = ring.len(), "rejected ring signature that did not close");
            return Err(SignatureError::InvalidSignature);
        }

        Ok(())
    }

    /// Get the initial challenge of this [`RingSignature`].
    pub fn get_c0(&self) -> &Scalar {
        &self.c0
    }

    /// Get the responses of this [`RingSignature`], one per ring member.
    pub fn get_responses(&self) -> &[Scalar] {
        &self.r
    }

    /// Serialize a [`RingSignature`] to a canonical byte vector.
    ///
    /// The layout is the initial challenge followed by each response, all as 32-byte canonical scalars.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(SCALAR_BYTES * (self.r.len() + 1));
        result.extend_from_slice(self.c0.as_bytes());
        for r in &self.r {
            result.extend_from_slice(r.as_bytes());
        }

        result
    }

    /// Deserialize a [`RingSignature`] from a canonical byte slice.
    ///
    /// The ring size is inferred from the length. If `bytes` does not represent a canonical signature for some nonempty
    /// ring, returns a [`SignatureError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() < 2 * SCALAR_BYTES || bytes.len() % SCALAR_BYTES != 0 {
            return Err(SignatureError::InvalidEncoding {
                source: EncodingError::InvalidSignatureLength { length: bytes.len() },
            });
        }

        let (c0_bytes, r_bytes) = bytes.split_at(SCALAR_BYTES);
        let c0 = scalar::decode(c0_bytes).context(InvalidEncodingSnafu)?;
        let r = r_bytes
            .chunks_exact(SCALAR_BYTES)
            .map(scalar::decode)
            .collect::<Result<Vec<Scalar>, EncodingError>>()
            .context(InvalidEncodingSnafu)?;

        Ok(Self { c0, r })
    }
}

impl_canonical_serialization!(RingSignature);
