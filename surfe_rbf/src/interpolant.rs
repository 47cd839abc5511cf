/////////////////////////////////////////////////////////////////////////////////////////////
//
// Holds a solved interpolant and evaluates the scalar field and its gradient.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    basis::{BasisFunction, Functional},
    polynomials::PolynomialBasis,
};

/// The solved field: one weight per constraint functional plus the drift weights.
///
/// `s(x) = Σ wᵢ Lᵢφ(x, ·) + Σ vⱼ pⱼ(x)`
#[derive(Debug, Clone)]
pub struct Interpolant {
    pub basis: BasisFunction,
    pub functionals: Vec<Functional>,

    /// `functionals.len() + poly.n_terms()` weights, drift weights last.
    pub weights: Vec<f64>,

    pub poly: PolynomialBasis,
}

impl Interpolant {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    fn drift_weights(&self) -> &[f64] {
        &self.weights[self.functionals.len().min(self.weights.len())..]
    }

    /// Field value at `x`.
    pub fn evaluate(&self, x: &[f64; 3]) -> f64 {
        let rbf: f64 = self
            .functionals
            .iter()
            .zip(&self.weights)
            .filter(|(_, w)| **w != 0.0)
            .map(|(f, w)| w * self.basis.apply(x, f))
            .sum();

        let drift: f64 = self
            .poly
            .values(x)
            .iter()
            .zip(self.drift_weights())
            .map(|(p, v)| p * v)
            .sum();

        rbf + drift
    }

    /// Field gradient at `x`.
    pub fn gradient(&self, x: &[f64; 3]) -> [f64; 3] {
        let mut g = [0.0; 3];
        for (f, w) in self.functionals.iter().zip(&self.weights) {
            if *w == 0.0 {
                continue;
            }
            let bg = self.basis.apply_gradient(x, f);
            for k in 0..3 {
                g[k] += w * bg[k];
            }
        }
        for (pg, v) in self.poly.gradients(x).iter().zip(self.drift_weights()) {
            for k in 0..3 {
                g[k] += v * pg[k];
            }
        }
        g
    }

    /// Field value and gradient at `x`.
    pub fn evaluate_with_gradient(&self, x: &[f64; 3]) -> (f64, [f64; 3]) {
        (self.evaluate(x), self.gradient(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{basis::create_rbf_kernel, model_config::RbfKernelType};
    use equator::assert;

    #[test]
    fn drift_alone_gives_a_linear_field() {
        let kernel = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        // Extents of [-1, 1]³ leave coordinates unscaled.
        let poly = PolynomialBasis::new(1, true, &[[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]]);
        let interpolant = Interpolant {
            basis: BasisFunction::Standard(kernel),
            functionals: vec![Functional::Value([0.0, 0.0, 0.0])],
            weights: vec![0.0, 2.0, 1.0, 0.0, -3.0],
            poly,
        };

        let (value, gradient) = interpolant.evaluate_with_gradient(&[0.5, 0.25, 0.1]);
        assert!((value - 2.2).abs() < 1e-12);
        assert!((gradient[0] - 1.0).abs() < 1e-12);
        assert!(gradient[1].abs() < 1e-12);
        assert!((gradient[2] + 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_weight_adds_the_kernel() {
        let kernel = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        let interpolant = Interpolant {
            basis: BasisFunction::Standard(kernel),
            functionals: vec![Functional::Value([0.0, 0.0, 0.0])],
            weights: vec![0.5],
            poly: PolynomialBasis::none(),
        };
        // 0.5 × r³ at r = 2.
        assert!((interpolant.evaluate(&[2.0, 0.0, 0.0]) - 4.0).abs() < 1e-12);
    }
}
