// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use core::{
    fmt,
    hash::{Hash, Hasher},
};

use curve25519_dalek::{EdwardsPoint, Scalar};
#[cfg(feature = "rand")]
use rand_core::OsRng;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    domains,
    encoding::{impl_canonical_serialization, EncodingError, POINT_BYTES, SCALAR_BYTES},
    point,
    scalar,
};

/// A private key.
///
/// The private key is a nonzero scalar `x`. It is used to produce signatures on behalf of the [`PublicKey`] `x*G`,
/// where `G` is the Ed25519 base point. The key is zeroized when dropped, and its [`Debug`](`core::fmt::Debug`)
/// representation does not include the scalar.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    x: Scalar,
}

impl PrivateKey {
    /// Generate a new [`PrivateKey`] from a scalar `x`.
    ///
    /// The scalar must be nonzero; otherwise, returns an [`EncodingError`].
    ///
    /// If you'd like a [`PrivateKey`] generated securely for you, use [`PrivateKey::random`] instead.
    pub fn new(x: &Scalar) -> Result<Self, EncodingError> {
        if x == &Scalar::ZERO {
            return Err(EncodingError::ZeroScalar);
        }

        Ok(Self { x: *x })
    }

    /// Generate a new [`PrivateKey`] from raw key material.
    ///
    /// The input must be exactly 32 bytes, and is interpreted as a little-endian integer reduced modulo the group order.
    /// The material is used as-is; no hashing or clamping is applied. If the result is zero, returns an
    /// [`EncodingError`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let x = Zeroizing::new(scalar::reduce(bytes)?);

        Self::new(&x)
    }

    /// Get the canonical encoding of this [`PrivateKey`].
    ///
    /// The returned bytes are zeroized when dropped. Storing them safely is the caller's responsibility.
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_BYTES]> {
        Zeroizing::new(scalar::encode(&self.x))
    }

    /// Generate a new random [`PrivateKey`].
    ///
    /// You must provide a [`CryptoRngCore`] random number generator `rng`.
    pub fn random<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self {
            x: scalar::random_nonzero(rng),
        }
    }

    /// Generate a new random [`PrivateKey`] using the operating system's random number generator.
    #[cfg(feature = "rand")]
    pub fn generate() -> Self {
        Self::random(&mut OsRng)
    }

    /// Get the signing scalar from this [`PrivateKey`].
    pub(crate) fn get_x(&self) -> &Scalar {
        &self.x
    }

    /// Compute the [`PublicKey`] for this [`PrivateKey`].
    pub fn public_key(&self) -> PublicKey {
        PublicKey(EdwardsPoint::mul_base(&self.x))
    }

    /// Compute the [`KeyImage`] for this [`PrivateKey`].
    ///
    /// This is `x*Hp(P)`, where `P` is the encoded [`PublicKey`] and `Hp` is
    /// [`hash_to_point`](`crate::point::hash_to_point`). It is the same for every signature produced with this key.
    pub fn key_image(&self) -> KeyImage {
        KeyImage(self.x * self.public_key().hash_to_point())
    }

    /// Compute the [`KeyImage`] used by within-ring signatures for this [`PrivateKey`].
    ///
    /// This is `x*Hw(P)`, where `Hw` hashes to the curve under a domain separate from the one used by
    /// [`PrivateKey::key_image`]. The two images are unrelated, so a key image published by a linkable signature cannot
    /// be tested against a within-ring signature.
    pub fn within_ring_key_image(&self) -> KeyImage {
        KeyImage(self.x * self.public_key().hash_to_point_within_ring())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").finish_non_exhaustive()
    }
}

/// A public key.
///
/// This is always a nonidentity element of the prime-order subgroup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PublicKey(EdwardsPoint);

impl PublicKey {
    /// Generate a new [`PublicKey`] from a group element.
    ///
    /// The element must be a nonidentity element of the prime-order subgroup; otherwise, returns an [`EncodingError`].
    pub fn from_point(point: &EdwardsPoint) -> Result<Self, EncodingError> {
        point::validate(point)?;

        Ok(Self(*point))
    }

    /// Decode a [`PublicKey`] from its canonical 32-byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        point::decode(bytes).map(Self)
    }

    /// Get the canonical 32-byte encoding of this [`PublicKey`].
    pub fn to_bytes(&self) -> [u8; POINT_BYTES] {
        point::encode(&self.0)
    }

    /// Get the group element for this [`PublicKey`].
    pub fn as_point(&self) -> &EdwardsPoint {
        &self.0
    }

    /// Hash this [`PublicKey`] to the secondary generator used for its key image.
    pub(crate) fn hash_to_point(&self) -> EdwardsPoint {
        point::hash_to_point(&self.to_bytes())
    }

    /// Hash this [`PublicKey`] to the secondary generator used for its within-ring key image.
    pub(crate) fn hash_to_point_within_ring(&self) -> EdwardsPoint {
        point::hash_to_point_with_domain(domains::HASH_TO_POINT_WITHIN_RING, &self.to_bytes())
    }
}

impl ConstantTimeEq for PublicKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl_canonical_serialization!(PublicKey);

/// A key image.
///
/// Key images are produced by linkable signatures. Two signatures whose verified key images are equal were produced
/// with the same [`PrivateKey`]; tracking the key images already seen is the caller's responsibility.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyImage(EdwardsPoint);

impl KeyImage {
    /// Generate a new [`KeyImage`] from a group element.
    ///
    /// The element must be a nonidentity element of the prime-order subgroup; otherwise, returns an [`EncodingError`].
    pub fn from_point(point: &EdwardsPoint) -> Result<Self, EncodingError> {
        point::validate(point)?;

        Ok(Self(*point))
    }

    /// Decode a [`KeyImage`] from its canonical 32-byte encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        point::decode(bytes).map(Self)
    }

    /// Get the canonical 32-byte encoding of this [`KeyImage`].
    pub fn to_bytes(&self) -> [u8; POINT_BYTES] {
        point::encode(&self.0)
    }

    /// Get the group element for this [`KeyImage`].
    pub fn as_point(&self) -> &EdwardsPoint {
        &self.0
    }
}

impl ConstantTimeEq for KeyImage {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Hash for KeyImage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl_canonical_serialization!(KeyImage);

#[cfg(test)]
mod test {
    use curve25519_dalek::{EdwardsPoint, Scalar};
    use rand_chacha::ChaCha12Rng;
    use rand_core::SeedableRng;

    use super::*;

    #[test]
    fn test_zero_key() {
        assert!(matches!(PrivateKey::new(&Scalar::ZERO), Err(EncodingError::ZeroScalar)));
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_private_key_bytes() {
        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let private_key = PrivateKey::random(&mut rng);

        let bytes = private_key.to_bytes();
        let decoded = PrivateKey::from_bytes(bytes.as_slice()).unwrap();
        assert_eq!(decoded.public_key(), private_key.public_key());

        // Raw material is reduced rather than rejected
        assert!(PrivateKey::from_bytes(&[0xff; 32]).is_ok());
        assert!(PrivateKey::from_bytes(&[1u8; 31]).is_err());
    }

    #[test]
    fn test_debug_redacts() {
        let private_key = PrivateKey::new(&Scalar::from(5u32)).unwrap();
        assert_eq!(alloc::format!("{:?}", private_key), "PrivateKey { .. }");
    }

    #[test]
    fn test_public_key() {
        let private_key = PrivateKey::new(&Scalar::from(2u32)).unwrap();
        let public_key = private_key.public_key();

        // Derivation is deterministic and linear
        assert_eq!(public_key, private_key.public_key());
        assert_eq!(
            public_key.as_point(),
            &(EdwardsPoint::mul_base(&Scalar::ONE) + EdwardsPoint::mul_base(&Scalar::ONE))
        );

        // Encoding round-trips
        let bytes = public_key.to_bytes();
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), public_key);
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap().to_bytes(), bytes);

        // The identity is not a valid public key
        assert!(PublicKey::from_point(&EdwardsPoint::default()).is_err());
    }

    #[test]
    fn test_key_image() {
        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let private_key = PrivateKey::random(&mut rng);
        let other_key = PrivateKey::random(&mut rng);

        // Key images are deterministic per key and differ between keys
        assert_eq!(private_key.key_image(), private_key.key_image());
        assert_ne!(private_key.key_image(), other_key.key_image());

        // They are not the public key
        assert_ne!(private_key.key_image().as_point(), private_key.public_key().as_point());

        // Within-ring images are deterministic and separate from linkable ones
        assert_eq!(private_key.within_ring_key_image(), private_key.within_ring_key_image());
        assert_ne!(private_key.within_ring_key_image(), private_key.key_image());
        assert_ne!(private_key.within_ring_key_image(), other_key.within_ring_key_image());

        let bytes = private_key.key_image().to_bytes();
        assert_eq!(KeyImage::from_bytes(&bytes).unwrap(), private_key.key_image());
        assert!(KeyImage::from_point(&EdwardsPoint::default()).is_err());
    }

    #[test]
    fn test_constant_time_equality() {
        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let private_key = PrivateKey::random(&mut rng);
        let other_key = PrivateKey::random(&mut rng);

        assert!(bool::from(private_key.public_key().ct_eq(&private_key.public_key())));
        assert!(!bool::from(private_key.public_key().ct_eq(&other_key.public_key())));
        assert!(bool::from(private_key.key_image().ct_eq(&private_key.key_image())));
        assert!(!bool::from(private_key.key_image().ct_eq(&other_key.key_image())));
    }

    #[cfg(feature = "borsh")]
    #[test]
    fn test_borsh() {
        use borsh::{from_slice, to_vec};

        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let public_key = PrivateKey::random(&mut rng).public_key();

        let bytes = to_vec(&public_key).unwrap();
        assert_eq!(from_slice::<PublicKey>(&bytes).unwrap(), public_key);

        let key_image = PrivateKey::random(&mut rng).key_image();
        let bytes = to_vec(&key_image).unwrap();
        assert_eq!(from_slice::<KeyImage>(&bytes).unwrap(), key_image);

        // A payload that is not a canonical key image
        let bytes = to_vec(&[0u8; POINT_BYTES].to_vec()).unwrap();
        assert!(from_slice::<KeyImage>(&bytes).is_err());
        assert!(from_slice::<PublicKey>(&bytes).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let mut rng = ChaCha12Rng::seed_from_u64(8675309);
        let private_key = PrivateKey::random(&mut rng);

        let public_key = private_key.public_key();
        let json = serde_json::to_string(&public_key).unwrap();
        assert_eq!(serde_json::from_str::<PublicKey>(&json).unwrap(), public_key);

        let key_image = private_key.key_image();
        let json = serde_json::to_string(&key_image).unwrap();
        assert_eq!(serde_json::from_str::<KeyImage>(&json).unwrap(), key_image);

        // Truncated and non-canonical payloads
        let mut bytes = key_image.to_bytes().to_vec();
        bytes.pop();
        assert!(serde_json::from_str::<KeyImage>(&serde_json::to_string(&bytes).unwrap()).is_err());
        let json = serde_json::to_string(&[0xffu8; POINT_BYTES].to_vec()).unwrap();
        assert!(serde_json::from_str::<PublicKey>(&json).is_err());
    }
}
