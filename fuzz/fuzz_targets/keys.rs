// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

#![no_main]

use libfuzzer_sys::fuzz_target;
use ringsig::{KeyImage, PublicKey, Ring};

// Test group element decoding and canonical encoding
fuzz_target!(|data: &[u8]| {
	// Accepted keys must encode back to the same bytes
	if let Ok(key) = PublicKey::from_bytes(data) {
		assert_eq!(&key.to_bytes(), data);
	}
	if let Ok(key_image) = KeyImage::from_bytes(data) {
		assert_eq!(&key_image.to_bytes(), data);
	}
	if let Ok(ring) = Ring::from_bytes(data) {
		assert_eq!(&ring.to_bytes(), data);
	}
});
