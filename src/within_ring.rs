// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use alloc::vec::Vec;

use curve25519_dalek::{EdwardsPoint, Scalar};
#[cfg(feature = "rand")]
use rand_core::OsRng;
use rand_core::CryptoRngCore;
use snafu::prelude::*;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::{
    domains,
    encoding::{impl_canonical_serialization, EncodingError, POINT_BYTES, SCALAR_BYTES},
    key::{KeyImage, PrivateKey, PublicKey},
    linkable::{prove_chain, verify_chain},
    point,
    ring::Ring,
    scalar,
    signature::{check_signer, InvalidEncodingSnafu, SignatureError},
    transcript::ChallengeTranscript,
    util::OperationTiming,
};

// The encoded size of an envelope
const ENVELOPE_BYTES: usize = 2 * POINT_BYTES;

/// An encryption of the signer's key image to a single ring member.
///
/// For member `j` with public key `P[j]`, this is `(T, E) = (t*G, t*P[j] + I)` for a random nonzero `t`. The member
/// recovers the key image as `E - x[j]*T`.
#[allow(non_snake_case)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct KeyImageEnvelope {
    T: EdwardsPoint,
    E: EdwardsPoint,
}

impl KeyImageEnvelope {
    fn open(&self, private_key: &PrivateKey) -> EdwardsPoint {
        self.E - private_key.get_x() * self.T
    }
}

/// A ring signature whose key image is readable only by ring members.
///
/// The key image is [`PrivateKey::within_ring_key_image`], which is unrelated to the image published by
/// [`LinkableRingSignature`](`crate::LinkableRingSignature`). It is not published. Instead, it is encrypted to every
/// member of the ring, and only a member can recover it and verify the signature with
/// [`WithinRingSignature::verify_as_member`]. Two signatures from the same [`PrivateKey`] yield the same recovered
/// [`KeyImage`], so members can link them.
///
/// Anyone who already knows a within-ring key image, such as a ring member who recovered it earlier, can confirm
/// whether a signature was produced with the same key, since the signature is bound to the image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithinRingSignature {
    c0: Scalar,
    r: Vec<Scalar>,
    envelopes: Vec<KeyImageEnvelope>,
}

impl WithinRingSignature {
    /// Generate a [`WithinRingSignature`] on `message`.
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`; if the index is out of
    /// range or the key does not match, returns a [`SignatureError`].
    ///
    /// This function provides a cryptographically-secure random number generator for you.
    /// If you want to provide your own, use [`WithinRingSignature::sign_with_rng`] instead.
    #[cfg(feature = "rand")]
    pub fn sign(message: &[u8], ring: &Ring, private_key: &PrivateKey, index: usize) -> Result<Self, SignatureError> {
        Self::sign_with_rng(message, ring, private_key, index, &mut OsRng)
    }

    /// Generate a [`WithinRingSignature`] on `message` using a supplied [`CryptoRngCore`] random number generator `rng`.
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

    /// Generate a [`WithinRingSignature`] on `message` in variable time using a supplied [`CryptoRngCore`] random number
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
        trace!(ring_size = ring.len(), "generating within-ring signature");

        let key_image = private_key.within_ring_key_image();
        let mut transcript = ChallengeTranscript::new(domains::TRANSCRIPT_WITHIN_RING_SIGNATURE, ring, message);

        // Encrypt the key image to each member
        let mut envelope_rng = transcript.build_rng(private_key, index, rng);
        let envelopes = ring
            .get_keys()
            .iter()
            .map(|key| {
                let t = Zeroizing::new(scalar::random_nonzero(&mut envelope_rng));
                KeyImageEnvelope {
                    T: EdwardsPoint::mul_base(&t),
                    E: *t * key.as_point() + key_image.as_point(),
                }
            })
            .collect::<Vec<KeyImageEnvelope>>();

        Self::bind(&mut transcript, &key_image, &envelopes);
        let mut transcript_rng = transcript.build_rng(private_key, index, rng);

        let (c0, r) = prove_chain(
            &transcript,
            ring,
            private_key,
            &key_image,
            PublicKey::hash_to_point_within_ring,
            index,
            &mut transcript_rng,
            timing,
        );

        Ok(Self { c0, r, envelopes })
    }

    // Bind the key image and its envelopes to the transcript
    fn bind(transcript: &mut ChallengeTranscript, key_image: &KeyImage, envelopes: &[KeyImageEnvelope]) {
        transcript.bind_key_image(key_image);
        for envelope in envelopes {
            transcript.bind_point(b"T", &envelope.T);
            transcript.bind_point(b"E", &envelope.E);
        }
    }

    /// Verify a [`WithinRingSignature`] on `message` as the ring member at position `index`, returning the recovered
    /// [`KeyImage`].
    ///
    /// The `private_key` must correspond to the public key at position `index` of the `ring`, which must be identical,
    /// including its order, to the one used for signing. If the signature does not match the ring, the key image cannot
    /// be recovered, or the signature does not verify, returns a [`SignatureError`].
    ///
    /// Each member opens only its own envelope. A dishonest signer can put a junk envelope in for some members, in which
    /// case verification fails for those members and succeeds for the others, so members can disagree about whether the
    /// same signature is valid.
    pub fn verify_as_member(
        &self,
        message: &[u8],
        ring: &Ring,
        private_key: &PrivateKey,
        index: usize,
    ) -> Result<KeyImage, SignatureError> {
        if self.r.len() != ring.len() || self.envelopes.len() != ring.len() {
            debug!(
                ring_size = ring.len(),
                responses = self.r.len(),
                envelopes = self.envelopes.len(),
                "rejected within-ring signature with mismatched size"
            );
            return Err(SignatureError::InvalidStructure {
                reason: "signature size did not match the ring size",
            });
        }
        check_signer(ring, private_key, index)?;

        let key_image = KeyImage::from_point(&self.envelopes[index].open(private_key)).map_err(|_| {
            debug!(ring_size = ring.len(), "rejected within-ring signature with invalid key image");
            SignatureError::InvalidSignature
        })?;

        let mut transcript = ChallengeTranscript::new(domains::TRANSCRIPT_WITHIN_RING_SIGNATURE, ring, message);
        Self::bind(&mut transcript, &key_image, &self.envelopes);
        verify_chain(
            &transcript,
            ring,
            &key_image,
            PublicKey::hash_to_point_within_ring,
            &self.c0,
            &self.r,
        )?;

        Ok(key_image)
    }

    /// Get the initial challenge of this [`WithinRingSignature`].
    pub fn get_c0(&self) -> &Scalar {
        &self.c0
    }

    /// Get the responses of this [`WithinRingSignature`], one per ring member.
    pub fn get_responses(&self) -> &[Scalar] {
        &self.r
    }

    /// Serialize a [`WithinRingSignature`] to a canonical byte vector.
    ///
    /// The layout is the initial challenge, then each response, then each member's envelope as two group elements.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(SCALAR_BYTES + (SCALAR_BYTES + ENVELOPE_BYTES) * self.r.len());
        result.extend_from_slice(self.c0.as_bytes());
        for r in &self.r {
            result.extend_from_slice(r.as_bytes());
        }
        for envelope in &self.envelopes {
            result.extend_from_slice(&point::encode(&envelope.T));
            result.extend_from_slice(&point::encode(&envelope.E));
        }

        result
    }

    /// Deserialize a [`WithinRingSignature`] from a canonical byte slice.
    ///
    /// The ring size is inferred from the length. If `bytes` does not represent a canonical signature for some nonempty
    /// ring, returns a [`SignatureError`].
    #[allow(non_snake_case)]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let step = SCALAR_BYTES + ENVELOPE_BYTES;
        if bytes.len() < SCALAR_BYTES + step || (bytes.len() - SCALAR_BYTES) % step != 0 {
            return Err(SignatureError::InvalidEncoding {
                source: EncodingError::InvalidSignatureLength { length: bytes.len() },
            });
        }
        let n = (bytes.len() - SCALAR_BYTES) / step;

        let (c0_bytes, bytes) = bytes.split_at(SCALAR_BYTES);
        let (r_bytes, envelope_bytes) = bytes.split_at(SCALAR_BYTES * n);

        let c0 = scalar::decode(c0_bytes).context(InvalidEncodingSnafu)?;
        let r = r_bytes
            .chunks_exact(SCALAR_BYTES)
            .map(scalar::decode)
            .collect::<Result<Vec<Scalar>, EncodingError>>()
            .context(InvalidEncodingSnafu)?;
        let envelopes = envelope_bytes
            .chunks_exact(ENVELOPE_BYTES)
            .map(|chunk| -> Result<KeyImageEnvelope, EncodingError> {
                let (T, E) = chunk.split_at(POINT_BYTES);
                Ok(KeyImageEnvelope {
                    T: point::decode(T)?,
                    E: point::decode(E)?,
                })
            })
            .collect::<Result<Vec<KeyImageEnvelope>, EncodingError>>()
            .context(InvalidEncodingSnafu)?;

        Ok(Self { c0, r, envelopes })
    }
}

impl_canonical_serialization!(WithinRingSignature);
