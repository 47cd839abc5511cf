/////////////////////////////////////////////////////////////////////////////////////////////
//
// Re-exports kernel utilities, constants, and helper functions used across the surfe_rbf crates.
//
// Created on: 15 Nov 2025     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Utilities for the [`surfe_rbf`] crate
mod anisotropy;
mod constants;
mod rbf_kernels;
mod traits;
mod utils;
mod kernel_helpers;

/// Implemented kernels for use in the [`surfe_rbf`] crate.
pub mod kernels {
    pub use super::rbf_kernels::*;
}

pub use {
    anisotropy::AnisotropyTensor,
    constants::{ANISOTROPY_RATIO_FLOOR, COINCIDENT_RADIUS, DEG_TO_RAD, RAD_TO_DEG},
    kernel_helpers::{KernelParams, KernelParamsBuilder},
    utils::{
        KernelType, RadialKernel, angle_between, argsort, dot, get_distance,
        get_pointarray_extents, norm, normalize,
    },
    traits::{KernelFromParams, RadialProfile},
};
