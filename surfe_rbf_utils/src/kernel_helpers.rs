/////////////////////////////////////////////////////////////////////////////////////////////
//
// Provides parameter and builder types for configuring RBF kernels.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use serde::{Deserialize, Serialize};
use crate::utils::KernelType;

/// Defines the [`KernelType`] to use, along with the shape parameter
/// for the shape-dependent kernels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// KernelType enum variant to use.
    pub kernel_type: KernelType,

    /// Length scale `c` of the Gaussian, multiquadric and inverse multiquadric
    /// kernels. Larger values give broader, smoother basis functions.
    ///
    /// Ignored by the polyharmonic kernels (cubic, thin plate spline, linear).
    pub shape_parameter: f64,
}

impl KernelParams {
    /// Begins building a [`KernelParams`] instance for the given kernel type.
    pub fn builder(kernel_type: KernelType) -> KernelParamsBuilder {
        KernelParamsBuilder {
            kernel_type,
            shape_parameter: 1.0,
        }
    }

    /// Returns `true` when the parameters can construct a well defined kernel.
    pub fn is_valid(&self) -> bool {
        match self.kernel_type.uses_shape_parameter() {
            true => self.shape_parameter.is_finite() && self.shape_parameter > 0.0,
            false => true,
        }
    }
}

/// Builder for [`KernelParams`] that provides sensible defaults.
#[derive(Debug, Clone, Copy)]
pub struct KernelParamsBuilder {
    kernel_type: KernelType,
    shape_parameter: f64,
}

impl KernelParamsBuilder {
    /// Sets the `shape_parameter` on the builder.
    pub fn shape_parameter(mut self, v: f64) -> Self {
        self.shape_parameter = v;
        self
    }

    /// Finalises the builder into a [`KernelParams`] value.
    ///
    /// The result is not validated here; see [`KernelParams::is_valid`].
    pub fn build(self) -> KernelParams {
        KernelParams {
            kernel_type: self.kernel_type,
            shape_parameter: self.shape_parameter,
        }
    }
}
