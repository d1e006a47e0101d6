// Copyright (c) 2024, The Ringsig Developers
// SPDX-License-Identifier: BSD-3-Clause

use curve25519_dalek::{
    traits::{MultiscalarMul, VartimeMultiscalarMul},
    EdwardsPoint,
    Scalar,
};

/// Options for constant- or variable-time operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum OperationTiming {
    /// The operation should attempt to run in constant time
    Constant,
    /// The operation may run in variable time
    Variable,
}

/// Compute the ring step commitment `a*A + b*B`.
///
/// Only use [`OperationTiming::Variable`] if every input is public.
#[allow(non_snake_case)]
pub(crate) fn double_mul(
    a: &Scalar,
    A: &EdwardsPoint,
    b: &Scalar,
    B: &EdwardsPoint,
    timing: OperationTiming,
) -> EdwardsPoint {
    match timing {
        OperationTiming::Constant => EdwardsPoint::multiscalar_mul([a, b], [A, B]),
        OperationTiming::Variable => EdwardsPoint::vartime_multiscalar_mul([a, b], [A, B]),
    }
}
