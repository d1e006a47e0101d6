// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringsig::{LinkableRingSignature, RingSignature, WithinRingSignature};

// Test basic deserialization and canonical serialization
fuzz_target!(|data: &[u8]| {
	// If deserialization succeeds, serialization should be canonical
	if let Ok(signature) = RingSignature::from_bytes(data) {
		assert_eq!(&signature.to_bytes(), data);
	}
	if let Ok(signature) = LinkableRingSignature::from_bytes(data) {
		assert_eq!(&signature.to_bytes(), data);
	}
	if let Ok(signature) = WithinRingSignature::from_bytes(data) {
		assert_eq!(&signature.to_bytes(), data);
	}
});
