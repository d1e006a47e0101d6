// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use snafu::prelude::*;

/// The number of bytes in an encoded scalar.
pub const SCALAR_BYTES: usize = 32;

/// The number of bytes in an encoded group element.
pub const POINT_BYTES: usize = 32;

/// Errors that can arise when decoding scalars, group elements, keys, and signatures.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Snafu)]
pub enum EncodingError {
    /// The input had the wrong length for a fixed-size value.
    #[snafu(display("Expected {expected} bytes but got {actual}"))]
    InvalidLength {
        /// The required length.
        expected: usize,
        /// The provided length.
        actual: usize,
    },
    /// The input length cannot hold a signature for any ring size.
    #[snafu(display("Signature encoding had invalid length {length}"))]
    InvalidSignatureLength {
        /// The provided length.
        length: usize,
    },
    /// A scalar encoding was not reduced.
    #[snafu(display("Scalar encoding was not canonical"))]
    NonCanonicalScalar,
    /// A scalar that must be nonzero was zero.
    #[snafu(display("Scalar was zero"))]
    ZeroScalar,
    /// A group element encoding was rejected.
    #[snafu(display("Invalid point encoding: {reason}"))]
    InvalidPoint {
        /// The reason for the rejection.
        reason: &'static str,
    },
}

// Interpret a slice as a fixed-size encoding
pub(crate) fn to_array(bytes: &[u8]) -> Result<[u8; 32], EncodingError> {
    <[u8; 32]>::try_from(bytes).map_err(|_| EncodingError::InvalidLength {
        expected: 32,
        actual: bytes.len(),
    })
}

/// Implements `borsh` and `serde` serialization for a type in terms of its canonical `to_bytes` and `from_bytes`.
macro_rules! impl_canonical_serialization {
    ($type:ty) => {
        #[cfg(feature = "borsh")]
        impl borsh::BorshSerialize for $type {
            fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
                let bytes = self.to_bytes();
                let bytes: &[u8] = bytes.as_ref();
                borsh::BorshSerialize::serialize(bytes, writer)
            }
        }

        #[cfg(feature = "borsh")]
        impl borsh::BorshDeserialize for $type {
            fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
                let bytes: alloc::vec::Vec<u8> = borsh::BorshDeserialize::deserialize_reader(reader)?;
                Self::from_bytes(&bytes).map_err(|_| borsh::io::Error::from(borsh::io::ErrorKind::InvalidData))
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $type {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let bytes = self.to_bytes();
                serializer.serialize_bytes(bytes.as_ref())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $type {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bytes = <alloc::vec::Vec<u8> as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use impl_canonical_serialization;

#[cfg(test)]
mod test {
    use super::{to_array, EncodingError};

    #[test]
    fn test_to_array() {
        assert_eq!(to_array(&[7u8; 32]).unwrap(), [7u8; 32]);
        assert_eq!(
            to_array(&[7u8; 31]),
            Err(EncodingError::InvalidLength {
                expected: 32,
                actual: 31
            })
        );
        assert!(to_array(&[7u8; 33]).is_err());
        assert!(to_array(&[]).is_err());
    }
}
