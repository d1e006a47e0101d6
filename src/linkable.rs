// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{vec, vec::Vec};

use curve25519_dalek::{constants::ED25519_BASEPOINT_POINT, EdwardsPoint, Scalar};
use itertools::izip;
#[cfg(feature = "rand")]
use rand_core::OsRng;
use rand_core::CryptoRngCore;
use snafu::prelude::*;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::{
    domains,
    encoding::{impl_canonical_serialization, EncodingError, POINT_BYTES, SCALAR_BYTES},
    key::{KeyImage, PrivateKey, PublicKey},
    ring::Ring,
    scalar,
    signature::{check_signer, InvalidEncodingSnafu, SignatureError},
    transcript::ChallengeTranscript,
    util::{double_mul, OperationTiming},
};

/// A linkable ring signature.
///
/// In addition to the initial challenge and one response per ring member, the signature carries the signer's
/// [`KeyImage`]. Verification returns the key image, and any two verified signatures with equal key images were produced
/// by the same [`PrivateKey`], regardless of the message or ring.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkableRingSignature {
    key_image: KeyImage,
    c0: Scalar,
    r: Vec<Scalar>,
}

/// Run the dual hash chain for a key image, producing the initial challenge and the responses.
///
/// Each step commits to `r[i]*G + c[i]*P[i]` and `r[i]*Hp(P[i]) + c[i]*I`, where `Hp` is `hash_key` and must be the
/// hash the key image was derived with. The signer must already be checked against the ring, and `rng` must be a
/// transcript generator bound to the signer's witness.
#[allow(non_snake_case)]
#[allow(clippy::too_many_arguments)]
pub(crate) fn prove_chain<R: CryptoRngCore>(
    transcript: &ChallengeTranscript,
    ring: &Ring,
    private_key: &PrivateKey,
    key_image: &KeyImage,
    hash_key: fn(&PublicKey) -> EdwardsPoint,
    index: usize,
    rng: &mut R,
    timing: OperationTiming,
) -> (Scalar, Vec<Scalar>) {
    let n = ring.len();
    let keys = ring.get_keys();
    let G = ED25519_BASEPOINT_POINT;
    let I = key_image.as_point();

    // The secondary generators are public, so they can be computed up front
    let H = keys.iter().map(hash_key).collect::<Vec<EdwardsPoint>>();

    let k = Zeroizing::new(scalar::random(rng));
    let mut c = transcript.challenge(&[EdwardsPoint::mul_base(&k), *k * H[index]]);

    let mut c0 = Scalar::ZERO;
    let mut r = vec![Scalar::ZERO; n];
    let mut i = (index + 1) % n;
    for _ in 1..n {
        c0.conditional_assign(&c, i.ct_eq(&0));

        r[i] = scalar::random(rng);
        let R1 = double_mul(&r[i], &G, &c, keys[i].as_point(), timing);
        let R2 = double_mul(&r[i], &H[i], &c, I, timing);
        c = transcript.challenge(&[R1, R2]);

        i = (i + 1) % n;
    }

    c0.conditional_assign(&c, index.ct_eq(&0));
    r[index] = *k - c * private_key.get_x();

    (c0, r)
}

/// Check a dual hash chain for a key image.
#[allow(non_snake_case)]
pub(crate) fn verify_chain(
    transcript: &ChallengeTranscript,
    ring: &Ring,
    key_image: &KeyImage,
    hash_key: fn(&PublicKey) -> EdwardsPoint,
    c0: &Scalar,
    r: &[Scalar],
) -> Result<(), SignatureError> {
    if r.len() != ring.len() {
        debug!(
            ring_size = ring.len(),
            responses = r.len(),
            "rejected linkable signature with mismatched size"
        );
        return Err(SignatureError::InvalidStructure {
            reason: "response count did not match the ring size",
        });
    }

    let G = ED25519_BASEPOINT_POINT;
    let I = key_image.as_point();
    let H = ring
        .get_keys()
        .iter()
        .map(hash_key)
        .collect::<Vec<EdwardsPoint>>();

    let mut c = *c0;
    for (key, H, r) in izip!(ring.get_keys().iter(), H.iter(), r.iter()) {
        let R1 = double_mul(r, &G, &c, key.as_point(), OperationTiming::Variable);
        let R2 = double_mul(r, H, &c, I, OperationTiming::Variable);
        c = transcript.challenge(&[R1, R2]);
    }

    if !bool::from(c.ct_eq(c0)) {
        debug!(ring_size = ring.len(), "rejected linkable signature that did not close");
        return Err(SignatureError::InvalidSignature);
    }

    Ok(())
}

impl LinkableRingSignature {
    /// Generate a [`LinkableRingSignature`] on `message`.
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`; if the index is out of
    /// range or the key does not match, returns a [`SignatureError`].
    ///
    /// This function provides a cryptographically-secure random number generator for you.
    /// If you want to provide your own, use [`LinkableRingSignature::sign_with_rng`] instead.
    #[cfg(feature = "rand")]
    pub fn sign(message: &[u8], ring: &Ring, private_key: &PrivateKey, index: usize) -> Result<Self, SignatureError> {
        Self::sign_with_rng(message, ring, private_key, index, &mut OsRng)
    }

    /// Generate a [`LinkableRingSignature`] on `message` using a supplied [`CryptoRngCore`] random number generator
    /// `rng`.
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`; if the index is out of
    /// range or the key does not match, returns a [`SignatureError`].
    pub fn sign_with_rng<R: CryptoRngCore>(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
        rng: &mut R,
    ) -> Result<Self, SignatureError> {
        Self::sign_internal(message, ring, private_key, index, rng, OperationTiming::Constant)
    }

    /// Generate a [`LinkableRingSignature`] on `message` in variable time.
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

    /// Generate a [`LinkableRingSignature`] on `message` in variable time using a supplied [`CryptoRngCore`] random
    /// number generator `rng`.
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

    fn sign_internal<R: CryptoRngCore>(
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
        rng: &mut R,
        timing: OperationTiming,
    ) -> Result<Self, SignatureError> {
        check_signer(ring, private_key, index)?;
        trace!(ring_size = ring.len(), "generating linkable ring signature");

        let key_image = private_key.key_image();

        let mut transcript = ChallengeTranscript::new(domains::TRANSCRIPT_LINKABLE_SIGNATURE, ring, message);
        transcript.bind_key_image(&key_image);
        let mut transcript_rng = transcript.build_rng(private_key, index, rng);

        let (c0, r) = prove_chain(
            &transcript,
            ring,
            private_key,
            &key_image,
            PublicKey::hash_to_point,
            index,
            &mut transcript_rng,
            timing,
        );

        Ok(Self { key_image, c0, r })
    }

    /// Verify a [`LinkableRingSignature`] on `message` against a `ring`, returning its [`KeyImage`].
    ///
    /// The ring must be identical, including its order, to the one used for signing. If the signature does not have one
    /// response per ring member, or does not verify, returns a [`SignatureError`].
    ///
    /// Checking the returned key image against previously seen ones is the caller's responsibility.
    pub fn verify(&self, message: &[u8], ring: &Ring) -> Result<KeyImage, SignatureError> {
        let mut transcript = ChallengeTranscript::new(domains::TRANSCRIPT_LINKABLE_SIGNATURE, ring, message);
        transcript.bind_key_image(&self.key_image);

        verify_chain(
            &transcript,
            ring,
            &self.key_image,
            PublicKey::hash_to_point,
            &self.c0,
            &self.r,
        )?;

        Ok(self.key_image)
    }

    /// Get the [`KeyImage`] of this [`LinkableRingSignature`].
    ///
    /// The key image is only meaningful once the signature has been verified.
    pub fn get_key_image(&self) -> &KeyImage {
        &self.key_image
    }

    /// Get the initial challenge of this [`LinkableRingSignature`].
    pub fn get_c0(&self) -> &Scalar {
        &self.c0
    }

    /// Get the responses of this [`LinkableRingSignature`], one per ring member.
    pub fn get_responses(&self) -> &[Scalar] {
        &self.r
    }

    /// Serialize a [`LinkableRingSignature`] to a canonical byte vector.
    ///
    /// The layout is the key image, then the initial challenge, then each response.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(POINT_BYTES + SCALAR_BYTES * (self.r.len() + 1));
        result.extend_from_slice(&self.key_image.to_bytes());
        result.extend_from_slice(self.c0.as_bytes());
        for r in &self.r {
            result.extend_from_slice(r.as_bytes());
        }

        result
    }

    /// Deserialize a [`LinkableRingSignature`] from a canonical byte slice.
    ///
    /// The ring size is inferred from the length. If `bytes` does not represent a canonical signature for some nonempty
    /// ring, returns a [`SignatureError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        if bytes.len() < POINT_BYTES + 2 * SCALAR_BYTES || (bytes.len() - POINT_BYTES) % SCALAR_BYTES != 0 {
            return Err(SignatureError::InvalidEncoding {
                source: EncodingError::InvalidSignatureLength { length: bytes.len() },
            });
        }

        let (key_image_bytes, bytes) = bytes.split_at(POINT_BYTES);
        let key_image = KeyImage::from_bytes(key_image_bytes).context(InvalidEncodingSnafu)?;

        let (c0_bytes, r_bytes) = bytes.split_at(SCALAR_BYTES);
        let c0 = scalar::decode(c0_bytes).context(InvalidEncodingSnafu)?;
        let r = r_bytes
            .chunks_exact(SCALAR_BYTES)
            .map(scalar::decode)
            .collect::<Result<Vec<Scalar>, EncodingError>>()
            .context(InvalidEncodingSnafu)?;

        Ok(Self { key_image, c0, r })
    }
}

impl_canonical_serialization!(LinkableRingSignature);
