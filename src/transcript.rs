// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use curve25519_dalek::{EdwardsPoint, Scalar};
use merlin::{Transcript, TranscriptRng};
use rand_core::CryptoRngCore;

use crate::{
    domains,
    key::{KeyImage, PrivateKey},
    point,
    ring::Ring,
    scalar,
};

/// A ring signature challenge transcript.
///
/// The transcript binds the signature variant, protocol version, ring, and message, along with any variant-specific
/// public data. Each step of the ring then derives its challenge from a copy of this state and the step commitments,
/// so challenges depend only on the bound statement and the commitments of the preceding step.
#[derive(Clone)]
pub(crate) struct ChallengeTranscript {
    transcript: Transcript,
}

impl ChallengeTranscript {
    /// Initialize a transcript.
    pub(crate) fn new(domain: &'static str, ring: &Ring, message: &[u8]) -> Self {
        let mut transcript = Transcript::new(domain.as_bytes());
        transcript.append_u64(b"version", domains::VERSION);
        transcript.append_message(b"ring", ring.get_hash());
        transcript.append_message(b"message", message);

        Self { transcript }
    }

    /// Bind a key image into the transcript.
    pub(crate) fn bind_key_image(&mut self, key_image: &KeyImage) {
        self.transcript.append_message(b"I", &key_image.to_bytes());
    }

    /// Bind an arbitrary labeled group element into the transcript.
    pub(crate) fn bind_point(&mut self, label: &'static [u8], value: &EdwardsPoint) {
        self.transcript.append_message(label, &point::encode(value));
    }

    /// Derive the challenge that follows a step with the given commitments.
    pub(crate) fn challenge(&self, commitments: &[EdwardsPoint]) -> Scalar {
        let mut transcript = self.transcript.clone();
        for commitment in commitments {
            transcript.append_message(b"R", &point::encode(commitment));
        }

        // Get the challenge using wide reduction
        let mut c_bytes = [0u8; 64];
        transcript.challenge_bytes(b"c", &mut c_bytes);

        scalar::from_uniform(&c_bytes)
    }

    /// Build a random number generator from the transcript, binding in the signer's witness data.
    ///
    /// The generator depends on the transcript state, the private key and index, and fresh randomness from
    /// `external_rng`, so a weak external generator alone cannot cause nonce reuse across statements.
    pub(crate) fn build_rng<R: CryptoRngCore>(
        &self,
        private_key: &PrivateKey,
        index: usize,
        external_rng: &mut R,
    ) -> TranscriptRng {
        self.transcript
            .build_rng()
            .rekey_with_witness_bytes(b"l", &(index as u64).to_le_bytes())
            .rekey_with_witness_bytes(b"x", private_key.get_x().as_bytes())
            .finalize(external_rng)
    }
}
