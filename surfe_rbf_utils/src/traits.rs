/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares traits for shared kernel parameter sets and radial profile derivatives.
//
// Created on: 15 Nov 2025     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::kernel_helpers::KernelParams;

/// Converts a shared [`KernelParams`] configuration into a concrete kernel type.
pub trait KernelFromParams: Sized {
    /// Constructs `Self` from a set of uniform kernel parameters.
    fn from_params(p: &KernelParams) -> Self;
}

/// A radial profile `phi(r)` together with the two derivative terms needed to
/// differentiate `phi(|a - b|)` with respect to either location.
///
/// With `phi'` and `phi''` the derivatives of the profile in `r`:
/// - `d1(r) = phi'(r) / r`
/// - `d2(r) = (phi''(r) - phi'(r) / r) / r^2`
///
/// Both terms must stay finite as `r -> 0`. Where the true limit is singular
/// the kernel returns `0.0` at coincident locations.
pub trait RadialProfile {
    fn phi(&self, r: f64) -> f64;
    fn d1(&self, r: f64) -> f64;
    fn d2(&self, r: f64) -> f64;
}
