/////////////////////////////////////////////////////////////////////////////////////////////
//
// Evaluates the monomial drift basis and its derivatives for constraint functionals.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{basis::Functional, common};
use faer::Mat;
use serde::{Deserialize, Serialize};

/// Monomials up to degree two in coordinates scaled to the `[-1, 1]` cube.
///
/// Term order is `[1, x, y, z, x², xy, xz, y², yz, z²]`, truncated to the degree,
/// with the constant dropped when `include_constant` is `false`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolynomialBasis {
    pub degree: i32,
    pub include_constant: bool,
    translation_factor: [f64; 3],
    scale_factor: [f64; 3],
}

/// Number of monomials of degree at most `degree` in three dimensions.
pub fn full_basis_size(degree: i32) -> usize {
    match degree {
        d if d < 0 => 0,
        0 => 1,
        1 => 4,
        _ => 10,
    }
}

impl PolynomialBasis {
    /// Builds the basis with scaling fitted to `locations`.
    pub fn new(degree: i32, include_constant: bool, locations: &[[f64; 3]]) -> Self {
        let (translation_factor, scale_factor) = common::get_cheb_cube_scaling_factors(locations);
        Self {
            degree: degree.min(2),
            include_constant,
            translation_factor,
            scale_factor,
        }
    }

    /// An empty basis.
    pub fn none() -> Self {
        Self {
            degree: -1,
            include_constant: false,
            translation_factor: [0.0; 3],
            scale_factor: [1.0; 3],
        }
    }

    pub fn n_terms(&self) -> usize {
        let full = full_basis_size(self.degree);
        match full > 0 && !self.include_constant {
            true => full - 1,
            false => full,
        }
    }

    fn first_term(&self) -> usize {
        match self.include_constant {
            true => 0,
            false => 1,
        }
    }

    /// Values of every term at `x`.
    pub fn values(&self, x: &[f64; 3]) -> Vec<f64> {
        let u = common::scale_point(x, &self.translation_factor, &self.scale_factor);
        let mut all = Vec::with_capacity(10);
        all.push(1.0);
        if self.degree >= 1 {
            all.extend_from_slice(&u);
        }
        if self.degree >= 2 {
            for i in 0..3 {
                for j in i..3 {
                    all.push(u[i] * u[j]);
                }
            }
        }
        all.split_off(self.first_term().min(all.len()))
    }

    /// Gradients of every term at `x`, in unscaled coordinates.
    pub fn gradients(&self, x: &[f64; 3]) -> Vec<[f64; 3]> {
        let u = common::scale_point(x, &self.translation_factor, &self.scale_factor);
        let inv_s = [
            1.0 / self.scale_factor[0],
            1.0 / self.scale_factor[1],
            1.0 / self.scale_factor[2],
        ];

        let mut all = Vec::with_capacity(10);
        all.push([0.0; 3]);
        if self.degree >= 1 {
            for a in 0..3 {
                let mut g = [0.0; 3];
                g[a] = inv_s[a];
                all.push(g);
            }
        }
        if self.degree >= 2 {
            for i in 0..3 {
                for j in i..3 {
                    // d(u_i u_j)/dx_a = (δ_ia u_j + δ_ja u_i) / s_a
                    let mut g = [0.0; 3];
                    g[i] += u[j] * inv_s[i];
                    g[j] += u[i] * inv_s[j];
                    all.push(g);
                }
            }
        }
        all.split_off(self.first_term().min(all.len()))
    }

    /// Applies a constraint functional to every term.
    pub fn apply(&self, functional: &Functional) -> Vec<f64> {
        match functional {
            Functional::Value(p) => self.values(p),
            Functional::Increment { at, reference } => self
                .values(at)
                .iter()
                .zip(self.values(reference))
                .map(|(a, r)| a - r)
                .collect(),
            Functional::Directional { at, direction } => self
                .gradients(at)
                .iter()
                .map(|g| surfe_rbf_utils::dot(g, direction))
                .collect(),
        }
    }

    /// The `n_functionals × n_terms` block of the interpolation matrix.
    pub fn matrix(&self, functionals: &[Functional]) -> Mat<f64> {
        let rows: Vec<Vec<f64>> = functionals.iter().map(|f| self.apply(f)).collect();
        Mat::from_fn(functionals.len(), self.n_terms(), |i, j| rows[i][j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use faer::{mat, utils::approx::*};

    // Unit scaling so expected values can be written down directly.
    fn unscaled(degree: i32, include_constant: bool) -> PolynomialBasis {
        PolynomialBasis::new(degree, include_constant, &[[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]])
    }

    #[test]
    fn quadratic_values_3d() {
        let basis = unscaled(2, true);
        let v = basis.values(&[1.0, 2.0, 3.0]);
        assert!(v == vec![1.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 4.0, 6.0, 9.0]);
    }

    #[test]
    fn constant_can_be_dropped() {
        let basis = unscaled(1, false);
        assert!(basis.n_terms() == 3);
        assert!(basis.values(&[4.0, 5.0, 6.0]) == vec![4.0, 5.0, 6.0]);
        assert!(unscaled(0, false).n_terms() == 0);
        assert!(PolynomialBasis::none().n_terms() == 0);
    }

    #[test]
    fn functional_rows() {
        let basis = unscaled(2, true);
        let functionals = [
            Functional::Directional {
                at: [1.0, 2.0, 3.0],
                direction: [0.0, 0.0, 1.0],
            },
            Functional::Increment {
                at: [1.0, 2.0, 3.0],
                reference: [1.0, 2.0, 0.0],
            },
        ];
        let m = basis.matrix(&functionals);
        let expected = mat![
            [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 2.0, 6.0],
            [0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 3.0, 0.0, 6.0, 9.0],
        ];
        let approx_eq = CwiseMat(ApproxEq::eps() * 128.0 * 2.0);
        assert!(&m ~ &expected);
    }

    #[test]
    fn gradients_follow_coordinate_scaling() {
        let basis = PolynomialBasis::new(1, true, &[[0.0, 0.0, 0.0], [4.0, 2.0, 10.0]]);
        let g = basis.gradients(&[1.0, 1.0, 1.0]);
        assert!(g[1] == [0.5, 0.0, 0.0]);
        assert!(g[2] == [0.0, 1.0, 0.0]);
        assert!(g[3] == [0.0, 0.0, 0.2]);
    }
}
