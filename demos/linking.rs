// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

//! In an anonymous vote, each eligible voter publishes a public key, and the set of all of them forms the ring.
//! A ballot is a message signed with a linkable ring signature against that ring.
//!
//! The tally accepts a ballot only if its signature verifies and its key image has not been seen before. This keeps
//! every voter anonymous within the ring, while preventing anyone from voting twice.
//!
//! This example shows how to use linkable ring signatures for this.
