// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use alloc::{sync::Arc, vec, vec::Vec};

use merlin::Transcript;
use rand_core::CryptoRngCore;
use snafu::prelude::*;

use crate::{
    domains,
    encoding::{EncodingError, POINT_BYTES},
    key::PublicKey,
};

/// An ordered ring of public keys.
///
/// The order of the keys is part of every signed statement: a signature only verifies against the ring it was produced
/// with, in the same order. Internally, the ring also contains cryptographic hash data to make signing and verification
/// more efficient.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ring {
    keys: Arc<Vec<PublicKey>>,
    hash: Vec<u8>,
}

/// Errors that can arise relating to [`Ring`].
#[derive(Debug, Snafu)]
pub enum RingError {
    /// An invalid parameter was provided.
    #[snafu(display("An invalid parameter was provided: {reason}"))]
    InvalidParameter {
        /// The reason for the parameter error.
        reason: &'static str,
    },
    /// A public key failed to decode.
    #[snafu(display("A ring member failed to decode"))]
    InvalidEncoding {
        /// The underlying encoding error.
        source: EncodingError,
    },
}

impl Ring {
    /// Generate a new [`Ring`] from a slice `keys` of public keys.
    ///
    /// The ring must be nonempty, and its size must fit in a [`prim@u32`]; otherwise, returns a [`RingError`].
    /// A ring of one key is valid, in which case signatures degenerate to Schnorr signatures.
    ///
    /// Duplicate keys are allowed, but shrink the set of possible signers; use [`Ring::has_duplicates`] to detect them.
    pub fn new(keys: &[PublicKey]) -> Result<Self, RingError> {
        if keys.is_empty() {
            return Err(RingError::InvalidParameter {
                reason: "ring was empty",
            });
        }
        if u32::try_from(keys.len()).is_err() {
            return Err(RingError::InvalidParameter {
                reason: "ring size overflowed `u32`",
            });
        }

        Ok(Self::new_internal(keys.to_vec()))
    }

    // Helper function to do the actual generation
    fn new_internal(keys: Vec<PublicKey>) -> Self {
        // Use Merlin for the transcript hash
        let mut transcript = Transcript::new(domains::TRANSCRIPT_RING.as_bytes());
        transcript.append_u64(b"version", domains::VERSION);
        transcript.append_u64(b"size", keys.len() as u64);
        for key in &keys {
            transcript.append_message(b"P", &key.to_bytes());
        }
        let mut hash = vec![0u8; domains::TRANSCRIPT_HASH_BYTES];
        transcript.challenge_bytes(b"hash", &mut hash);

        Self {
            keys: Arc::new(keys),
            hash,
        }
    }

    /// Decode a [`Ring`] from the concatenated canonical encodings of its public keys.
    ///
    /// Every key must decode to a valid [`PublicKey`]; otherwise, returns a [`RingError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RingError> {
        if bytes.len() % POINT_BYTES != 0 {
            return Err(RingError::InvalidParameter {
                reason: "ring encoding was not a multiple of the key size",
            });
        }

        let keys = bytes
            .chunks_exact(POINT_BYTES)
            .map(PublicKey::from_bytes)
            .collect::<Result<Vec<PublicKey>, EncodingError>>()
            .context(InvalidEncodingSnafu)?;

        Self::new(&keys)
    }

    /// Get the concatenated canonical encodings of the public keys in this [`Ring`].
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.keys.len() * POINT_BYTES);
        for key in self.keys.iter() {
            bytes.extend_from_slice(&key.to_bytes());
        }

        bytes
    }

    /// Get the public keys in this [`Ring`].
    pub fn get_keys(&self) -> &[PublicKey] {
        &self.keys
    }

    /// Get the number of public keys in this [`Ring`].
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if this [`Ring`] is empty, which is never the case.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get the index of the first occurrence of `key` in this [`Ring`], if any.
    ///
    /// This runs in variable time, and is meant for a signer locating its own key before signing.
    pub fn position(&self, key: &PublicKey) -> Option<usize> {
        self.keys.iter().position(|item| item == key)
    }

    /// Check if this [`Ring`] contains any public key more than once.
    pub fn has_duplicates(&self) -> bool {
        let mut encodings = self.keys.iter().map(PublicKey::to_bytes).collect::<Vec<[u8; POINT_BYTES]>>();
        encodings.sort_unstable();

        encodings.windows(2).any(|pair| pair[0] == pair[1])
    }

    /// Produce a uniformly shuffled copy of this [`Ring`] using a [`CryptoRngCore`] random number generator `rng`.
    ///
    /// A signer that assembles a ring by appending its own key should shuffle it before signing, so the position of its
    /// key carries no information. Use [`Ring::position`] on the result to find the signing index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn shuffle<R: CryptoRngCore>(&self, rng: &mut R) -> Self {
        let mut keys = self.keys.to_vec();

        // Fisher-Yates; indexes are bounded by `u32`, so reduction from `u64` has negligible bias
        for i in (1..keys.len()).rev() {
            let j = (rng.as_rngcore().next_u64() % (i as u64 + 1)) as usize;
            keys.swap(i, j);
        }

        Self::new_internal(keys)
    }

    /// Get a cryptographic hash representation of this [`Ring`], suitable for transcripting.
    pub(crate) fn get_hash(&self) -> &[u8] {
        &self.hash
    }
}
