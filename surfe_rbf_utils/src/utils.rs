/////////////////////////////////////////////////////////////////////////////////////////////
//
// Supplies the kernel registry along with small vector, distance and extent helpers.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{KernelFromParams, KernelParams, RadialProfile};
use serde::{Deserialize, Serialize};

/// Returns the indices that would sort the input slice.
///
/// # Examples
///
/// ```
/// use surfe_rbf_utils::argsort;
///
/// let data = [30, 10, 20];
///
/// let sorted_indices = argsort(&data);
///
/// assert_eq!(sorted_indices, vec![1, 2, 0]);
/// ```
#[inline(always)]
pub fn argsort<T: PartialOrd>(data: &[T]) -> Vec<usize> {
    let mut indices = (0..data.len()).collect::<Vec<_>>();
    indices.sort_by(|&i, &j| {
        data[i]
            .partial_cmp(&data[j])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Computes the axis aligned bounding box (AABB) extents of a set of 3D points.
///
/// The result is arranged as `[min_x, min_y, min_z, max_x, max_y, max_z]`.
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use surfe_rbf_utils::get_pointarray_extents;
///
/// let points = [[1.0, 2.0, 0.0], [3.0, -1.0, 5.0], [0.5, 4.0, 1.0]];
/// let extents = get_pointarray_extents(&points).unwrap();
/// assert_eq!(extents, [0.5, -1.0, 0.0, 3.0, 4.0, 5.0]);
/// ```
#[inline(always)]
pub fn get_pointarray_extents(points: &[[f64; 3]]) -> Option<[f64; 6]> {
    let first = points.first()?;
    let mut extents = [first[0], first[1], first[2], first[0], first[1], first[2]];

    for p in points.iter().skip(1) {
        for d in 0..3 {
            if p[d] < extents[d] {
                extents[d] = p[d];
            }
            if p[d] > extents[d + 3] {
                extents[d + 3] = p[d];
            }
        }
    }

    Some(extents)
}

/// Calculates the euclidean distance between two points.
///
/// # Examples
///
/// ```
/// use surfe_rbf_utils::get_distance;
///
/// let dist = get_distance(&[1.0, 2.0, 0.0], &[4.0, 6.0, 0.0]);
///
/// assert_eq!(dist, 5.0);
/// ```
#[inline(always)]
pub fn get_distance(target: &[f64; 3], source: &[f64; 3]) -> f64 {
    let mut dist = 0.0;
    for (t, s) in target.iter().zip(source.iter()) {
        let diff = t - s;
        dist += diff * diff;
    }
    dist.sqrt()
}

/// Dot product of two 3-vectors.
#[inline(always)]
pub fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Euclidean length of a 3-vector.
#[inline(always)]
pub fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

/// Returns the unit vector along `a`, or `None` for a zero or non-finite vector.
#[inline(always)]
pub fn normalize(a: &[f64; 3]) -> Option<[f64; 3]> {
    let length = norm(a);
    match length.is_finite() && length > 0.0 {
        true => Some([a[0] / length, a[1] / length, a[2] / length]),
        false => None,
    }
}

/// Angle in degrees between two non-zero vectors, in `[0, 180]`.
#[inline(always)]
pub fn angle_between(a: &[f64; 3], b: &[f64; 3]) -> Option<f64> {
    let a = normalize(a)?;
    let b = normalize(b)?;
    Some(dot(&a, &b).clamp(-1.0, 1.0).acos() * crate::RAD_TO_DEG)
}

// K-free dispatcher generated from the kernel registry below.
// Assumes each kernel type implements `KernelFromParams::from_params(&KernelParams) -> K`.
macro_rules! for_each_kernel {
    ( registry = [ $( ($V:ident, $Kty:path) ),* $(,)? ] ) => {

        /// Runtime kernel selector built from the kernel registry
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KernelType {
            $( $V, )*
        }

        impl KernelType {
            /// All registered kernel types, in registry order.
            pub const ALL: &'static [KernelType] = &[ $( KernelType::$V, )* ];
        }

        /// Runtime-erased radial profile so callers don't need to be generic over [`KernelType`].
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum RadialKernel {
            $( $V($Kty), )*
        }

        impl RadialKernel {
            /// Instantiates the concrete profile selected by `params.kernel_type`.
            #[inline]
            pub fn new(params: &KernelParams) -> Self {
                match params.kernel_type {
                    $(
                        KernelType::$V => {
                            RadialKernel::$V(<$Kty as KernelFromParams>::from_params(params))
                        }
                    ),*
                }
            }

            /// Returns the registry entry this profile was built from.
            #[inline]
            pub fn kernel_type(&self) -> KernelType {
                match self {
                    $( Self::$V(_) => KernelType::$V, )*
                }
            }
        }

        impl RadialProfile for RadialKernel {
            #[inline(always)]
            fn phi(&self, r: f64) -> f64 {
                match self {
                    $( Self::$V(k) => k.phi(r), )*
                }
            }

            #[inline(always)]
            fn d1(&self, r: f64) -> f64 {
                match self {
                    $( Self::$V(k) => k.d1(r), )*
                }
            }

            #[inline(always)]
            fn d2(&self, r: f64) -> f64 {
                match self {
                    $( Self::$V(k) => k.d2(r), )*
                }
            }
        }
    };
}

for_each_kernel! {
    registry = [
        (CubicRbf,               crate::kernels::CubicRbfKernel),
        (GaussianRbf,            crate::kernels::GaussianRbfKernel),
        (MultiquadricRbf,        crate::kernels::MultiquadricRbfKernel),
        (InverseMultiquadricRbf, crate::kernels::InverseMultiquadricRbfKernel),
        (ThinPlateSplineRbf,     crate::kernels::ThinPlateSplineRbfKernel),
        (LinearRbf,              crate::kernels::LinearRbfKernel),
    ]
}

impl KernelType {
    /// Whether the kernel reads [`KernelParams::shape_parameter`].
    pub fn uses_shape_parameter(&self) -> bool {
        matches!(
            self,
            KernelType::GaussianRbf | KernelType::MultiquadricRbf | KernelType::InverseMultiquadricRbf
        )
    }
}
