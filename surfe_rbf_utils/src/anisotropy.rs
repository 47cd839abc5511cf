/////////////////////////////////////////////////////////////////////////////////////////////
//
// Builds a global anisotropy metric from the orientation tensor of planar normals.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Global anisotropy derived from orientation measurements.
//!
//! The orientation tensor `T = (1/N) Σ n nᵀ` of the unit planar normals has its
//! largest eigenvector along the mean layering normal. Distances are measured in a
//! stretched space where the dominant axis keeps unit scale and each remaining axis
//! `k` is scaled by `max(sqrt(λ_k / λ_max), ANISOTROPY_RATIO_FLOOR)`, so separations
//! within the layering count for less than separations across it.

use crate::{constants::ANISOTROPY_RATIO_FLOOR, normalize};
use faer::{Mat, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnisotropyTensor {
    /// Principal axes as rows, the dominant (normal) axis first.
    pub axes: [[f64; 3]; 3],

    /// Scale applied along each principal axis.
    pub scales: [f64; 3],

    /// Symmetric metric `G = Σ s_k² a_k a_kᵀ`.
    pub metric: [[f64; 3]; 3],
}

impl AnisotropyTensor {
    /// Builds the tensor from a set of orientation normals.
    ///
    /// Returns `None` when no normal is usable (zero or non-finite) or the
    /// eigen-decomposition fails.
    pub fn from_normals(normals: &[[f64; 3]]) -> Option<Self> {
        let unit_normals: Vec<[f64; 3]> = normals.iter().filter_map(normalize).collect();
        if unit_normals.is_empty() {
            return None;
        }

        let n = unit_normals.len() as f64;
        let orientation = Mat::<f64>::from_fn(3, 3, |i, j| {
            unit_normals.iter().map(|u| u[i] * u[j]).sum::<f64>() / n
        });

        let evd = orientation.self_adjoint_eigen(Side::Lower).ok()?;
        let eigenvalues: Vec<f64> = evd.S().column_vector().iter().copied().collect();
        let eigenvectors = evd.U();

        let mut order = crate::argsort(&eigenvalues);
        order.reverse();

        let lambda_max = eigenvalues[order[0]];
        if !(lambda_max.is_finite() && lambda_max > 0.0) {
            return None;
        }

        let mut axes = [[0.0; 3]; 3];
        let mut scales = [1.0; 3];
        for (k, &idx) in order.iter().enumerate() {
            axes[k] = [
                eigenvectors[(0, idx)],
                eigenvectors[(1, idx)],
                eigenvectors[(2, idx)],
            ];
            let ratio = (eigenvalues[idx].max(0.0) / lambda_max).sqrt();
            scales[k] = match k {
                0 => 1.0,
                _ => ratio.max(ANISOTROPY_RATIO_FLOOR),
            };
        }

        Some(Self::from_axes(axes, scales))
    }

    fn from_axes(axes: [[f64; 3]; 3], scales: [f64; 3]) -> Self {
        let mut metric = [[0.0; 3]; 3];
        for k in 0..3 {
            let s2 = scales[k] * scales[k];
            for i in 0..3 {
                for j in 0..3 {
                    metric[i][j] += s2 * axes[k][i] * axes[k][j];
                }
            }
        }
        Self {
            axes,
            scales,
            metric,
        }
    }

    /// Returns `G Δ`.
    #[inline(always)]
    pub fn apply(&self, delta: &[f64; 3]) -> [f64; 3] {
        let g = &self.metric;
        [
            g[0][0] * delta[0] + g[0][1] * delta[1] + g[0][2] * delta[2],
            g[1][0] * delta[0] + g[1][1] * delta[1] + g[1][2] * delta[2],
            g[2][0] * delta[0] + g[2][1] * delta[1] + g[2][2] * delta[2],
        ]
    }

    /// Stretched distance `sqrt(Δᵀ G Δ)`.
    #[inline(always)]
    pub fn distance(&self, delta: &[f64; 3]) -> f64 {
        crate::dot(delta, &self.apply(delta)).max(0.0).sqrt()
    }
}
