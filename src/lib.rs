// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

//! One-time ring signatures and linkable ring signatures over the Ed25519 group.
//!
//! # Overview
//!
//! A ring signature lets a signer sign a message against an ordered set (the _ring_) of public keys. Successful
//! verification means the signer knew the private key corresponding to one of the ring's public keys, but does not
//! reveal which one.
//!
//! This library implements the hash-chain construction of Abe, Ohkubo, and Suzuki. Let `G` be the Ed25519 base point
//! and `P[0..n]` the ring. The signer holding `x` with `P[s] = x*G` commits to a nonce, then walks the ring from
//! `s + 1` around to `s`, deriving each challenge `c[i + 1]` from the commitment `r[i]*G + c[i]*P[i]` of the previous
//! step. Closing the ring at `s` requires knowledge of `x`. The signature is the single challenge `c[0]` and one
//! response per ring member.
//!
//! A [linkable](`crate::linkable`) variant additionally publishes a key image `I = x*Hp(P[s])`, where `Hp` is a
//! [hash to the curve](`crate::point::hash_to_point`). Any two verified linkable signatures with the same key image
//! were produced by the same private key, regardless of the message or ring. A [within-ring](`crate::within_ring`)
//! variant uses a separate key image derived under its own domain, and encrypts it to every ring member instead of
//! publishing it.
//!
//! # Implementation notes
//!
//! This implementation makes several opinionated choices:
//! - It uses the Ed25519 group, and validates that every decoded point lies in the prime-order subgroup.
//! - It uses [Merlin](https://merlin.cool/) for challenge derivation and hedged nonce generation.
//! - It uses [BLAKE3](https://github.com/BLAKE3-team/BLAKE3) for hashing to the curve.
//!
//! Private keys are plain scalars; they are not clamped or hashed as in RFC 8032, since the construction relies on
//! their linear structure.
//!
//! The implementation is `no_std` friendly. There are several features available.
//!
//! | Feature | Default? | Description |
//! | :--- | :---: | :--- |
//! | `borsh` | | Adds signature and key serialization and deserialization via [`borsh`](https://crates.io/crates/borsh) |
//! | `hazmat` | | Adds variable-time signing functionality that should only be used if you absolutely know what you're doing |
//! | `rand` | ✓ | Adds additional signing functionality that supplies a cryptographically-secure random number generator |
//! | `serde` | | Adds signature and key serialization and deserialization via [`serde`](https://crates.io/crates/serde) |
//! | `std` | ✓ | Adds corresponding dependency features |
//!
//! Signatures support a fixed-width canonical byte format, available through `to_bytes` and `from_bytes`. This is used
//! for `borsh` and `serde` serialization and deserialization. This functionality has an associated fuzzer that can be
//! run using a nightly compiler: `cargo +nightly fuzz run signatures`.
//!
//! # Warning
//!
//! While this implementation is written with security in mind, it is currently **experimental** and not suitable for
//! production use.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "rand")]
//! # {
//! use rand_core::OsRng;
//! use ringsig::*;
//!
//! let mut rng = OsRng;
//!
//! // Generate our private key and a few others to hide among
//! let private_key = PrivateKey::random(&mut rng);
//! let mut keys = (0..4)
//!     .map(|_| PrivateKey::random(&mut rng).public_key())
//!     .collect::<Vec<PublicKey>>();
//! keys.push(private_key.public_key());
//!
//! // Shuffle the ring so our position carries no information, then find ourselves
//! let ring = Ring::new(&keys).unwrap().shuffle(&mut rng);
//! let index = ring.position(&private_key.public_key()).unwrap();
//!
//! // Sign and verify
//! let message = b"Some message";
//! let signature = LinkableRingSignature::sign(message, &ring, &private_key, index).unwrap();
//! let key_image = signature.verify(message, &ring).unwrap();
//!
//! // The verified key image identifies reuse of our private key, but not our position
//! assert_eq!(key_image, private_key.key_image());
//! # }
//! ```

#![no_std]

extern crate alloc;

/// Canonical encoding errors and sizes.
pub mod encoding;
pub use encoding::EncodingError;
/// Public keys, private keys, and key images.
pub mod key;
pub use key::{KeyImage, PrivateKey, PublicKey};
/// Linkable ring signatures.
pub mod linkable;
pub use linkable::LinkableRingSignature;
/// Validated group element encoding and hashing to the curve.
pub mod point;
/// Ordered rings of public keys.
pub mod ring;
pub use ring::{Ring, RingError};
/// Scalar encoding and sampling.
pub mod scalar;
/// Ring signatures.
pub mod signature;
pub use signature::{RingSignature, SignatureError};
/// Challenge transcripts.
pub(crate) mod transcript;
/// Various utility functionality.
pub(crate) mod util;
/// Ring signatures with a key image readable only by ring members.
pub mod within_ring;
pub use within_ring::WithinRingSignature;

#[cfg(test)]
pub(crate) mod test_utils;

/// Domain separators used for hashing operations
pub(crate) mod domains {
    // Version
    pub(crate) const VERSION: u64 = 0;

    // Number of bytes in a transcript hash
    pub(crate) const TRANSCRIPT_HASH_BYTES: usize = 32;

    // Hashing to the curve
    pub(crate) const HASH_TO_POINT: &str = "Ring signature hash to point";
    pub(crate) const HASH_TO_POINT_WITHIN_RING: &str = "Within-ring signature hash to point";

    // Ring
    pub(crate) const TRANSCRIPT_RING: &str = "Ring signature ring";

    // Signatures
    pub(crate) const TRANSCRIPT_SIGNATURE: &str = "Ring signature";
    pub(crate) const TRANSCRIPT_LINKABLE_SIGNATURE: &str = "Linkable ring signature";
    pub(crate) const TRANSCRIPT_WITHIN_RING_SIGNATURE: &str = "Within-ring signature";
}
