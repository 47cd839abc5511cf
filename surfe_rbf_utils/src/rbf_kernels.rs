/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the concrete RBF kernel profiles and their radial derivative terms.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialProfile, constants::COINCIDENT_RADIUS};

/// Cubic RBF kernel with `phi(r) = r^3`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct CubicRbfKernel;

impl RadialProfile for CubicRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        r.powi(3)
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        3.0 * r
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        // 3 / r multiplies a term of order r^2, so the product vanishes at r = 0.
        match r < COINCIDENT_RADIUS {
            true => 0.0,
            false => 3.0 / r,
        }
    }
}

impl KernelFromParams for CubicRbfKernel {
    #[inline(always)]
    fn from_params(_: &KernelParams) -> Self {
        CubicRbfKernel
    }
}

/// Gaussian RBF kernel with `phi(r) = exp(-r^2 / c^2)`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct GaussianRbfKernel {
    pub shape_parameter: f64,
    inv_c2: f64,
}

impl GaussianRbfKernel {
    #[inline(always)]
    pub fn new(shape_parameter: f64) -> Self {
        Self {
            shape_parameter,
            inv_c2: 1.0 / (shape_parameter * shape_parameter),
        }
    }
}

impl RadialProfile for GaussianRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        (-r * r * self.inv_c2).exp()
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        -2.0 * self.inv_c2 * self.phi(r)
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        4.0 * self.inv_c2 * self.inv_c2 * self.phi(r)
    }
}

impl KernelFromParams for GaussianRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape_parameter)
    }
}

/// Multiquadric RBF kernel with `phi(r) = sqrt(r^2 + c^2)`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct MultiquadricRbfKernel {
    pub shape_parameter: f64,
    c2: f64,
}

impl MultiquadricRbfKernel {
    #[inline(always)]
    pub fn new(shape_parameter: f64) -> Self {
        Self {
            shape_parameter,
            c2: shape_parameter * shape_parameter,
        }
    }
}

impl RadialProfile for MultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        (r * r + self.c2).sqrt()
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        1.0 / self.phi(r)
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        -self.phi(r).powi(-3)
    }
}

impl KernelFromParams for MultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape_parameter)
    }
}

/// Inverse multiquadric RBF kernel with `phi(r) = 1 / sqrt(r^2 + c^2)`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct InverseMultiquadricRbfKernel {
    pub shape_parameter: f64,
    c2: f64,
}

impl InverseMultiquadricRbfKernel {
    #[inline(always)]
    pub fn new(shape_parameter: f64) -> Self {
        Self {
            shape_parameter,
            c2: shape_parameter * shape_parameter,
        }
    }
}

impl RadialProfile for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        1.0 / (r * r + self.c2).sqrt()
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        -self.phi(r).powi(3)
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        3.0 * self.phi(r).powi(5)
    }
}

impl KernelFromParams for InverseMultiquadricRbfKernel {
    #[inline(always)]
    fn from_params(p: &KernelParams) -> Self {
        Self::new(p.shape_parameter)
    }
}

/// Thin plate spline RBF kernel with `phi(r) = r^2 log r`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct ThinPlateSplineRbfKernel;

impl RadialProfile for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        match r.abs() < f64::EPSILON {
            true => 0.0,
            false => r.powi(2) * r.ln(),
        }
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        match r < COINCIDENT_RADIUS {
            true => 0.0,
            false => 2.0 * r.ln() + 1.0,
        }
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        match r < COINCIDENT_RADIUS {
            true => 0.0,
            false => 2.0 / (r * r),
        }
    }
}

impl KernelFromParams for ThinPlateSplineRbfKernel {
    #[inline(always)]
    fn from_params(_: &KernelParams) -> Self {
        ThinPlateSplineRbfKernel
    }
}

/// Linear RBF kernel with `phi(r) = r`.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LinearRbfKernel;

impl RadialProfile for LinearRbfKernel {
    #[inline(always)]
    fn phi(&self, r: f64) -> f64 {
        r
    }

    #[inline(always)]
    fn d1(&self, r: f64) -> f64 {
        match r < COINCIDENT_RADIUS {
            true => 0.0,
            false => 1.0 / r,
        }
    }

    #[inline(always)]
    fn d2(&self, r: f64) -> f64 {
        match r < COINCIDENT_RADIUS {
            true => 0.0,
            false => -1.0 / (r * r * r),
        }
    }
}

impl KernelFromParams for LinearRbfKernel {
    #[inline(always)]
    fn from_params(_: &KernelParams) -> Self {
        LinearRbfKernel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    // phi'(r) and phi''(r) recovered from the d1/d2 terms.
    fn first_derivative<K: RadialProfile>(k: &K, r: f64) -> f64 {
        k.d1(r) * r
    }

    fn second_derivative<K: RadialProfile>(k: &K, r: f64) -> f64 {
        k.d2(r) * r * r + k.d1(r)
    }

    fn check_against_finite_differences<K: RadialProfile>(k: &K) {
        let h = 1e-5;
        for r in [0.3, 0.9, 1.7, 4.2] {
            let fd1 = (k.phi(r + h) - k.phi(r - h)) / (2.0 * h);
            let fd2 = (k.phi(r + h) - 2.0 * k.phi(r) + k.phi(r - h)) / (h * h);
            let scale = 1.0 + k.phi(r).abs();
            assert!((fd1 - first_derivative(k, r)).abs() < 1e-6 * scale);
            assert!((fd2 - second_derivative(k, r)).abs() < 1e-3 * scale);
        }
    }

    #[test]
    fn derivative_terms_match_finite_differences() {
        check_against_finite_differences(&CubicRbfKernel);
        check_against_finite_differences(&GaussianRbfKernel::new(2.0));
        check_against_finite_differences(&MultiquadricRbfKernel::new(1.5));
        check_against_finite_differences(&InverseMultiquadricRbfKernel::new(0.7));
        check_against_finite_differences(&ThinPlateSplineRbfKernel);
        check_against_finite_differences(&LinearRbfKernel);
    }

    #[test]
    fn coincident_locations_stay_finite() {
        assert!(ThinPlateSplineRbfKernel.phi(0.0) == 0.0);
        assert!(ThinPlateSplineRbfKernel.d1(0.0) == 0.0);
        assert!(LinearRbfKernel.d2(0.0) == 0.0);
        assert!(CubicRbfKernel.d2(0.0) == 0.0);
        assert!(GaussianRbfKernel::new(3.0).phi(0.0) == 1.0);
        assert!(MultiquadricRbfKernel::new(3.0).phi(0.0) == 3.0);
        assert!((InverseMultiquadricRbfKernel::new(4.0).phi(0.0) - 0.25).abs() < 1e-15);
    }
}
