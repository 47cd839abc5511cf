/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the system solver seam and the default active-set solver for bounded rows.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # solver
//!
//! Solves the partitioned interpolation system.
//!
//! The system has `R` constraint rows and `m` drift terms. Rows `0..n_ie` are
//! bounded and rows `n_ie..R` are equalities. Every solver returns the full
//! weight vector of length `R + m`, with zero weights for bounded rows left
//! inactive.

use crate::{
    config::SolverParams,
    error::SolverError,
    progress::{ProgressMsg, ProgressSink, report},
};
use faer::{
    Mat,
    linalg::solvers::Solve,
};
use std::{fmt::Debug, sync::Arc};

/// Everything a solver needs to produce the weights.
#[derive(Debug, Clone)]
pub struct SystemProblem {
    /// `R × (R + m)` matrix `[A | P]`.
    pub interpolation_matrix: Mat<f64>,

    /// The trailing equality rows of `interpolation_matrix`.
    pub equality_matrix: Mat<f64>,

    /// Targets of the equality rows.
    pub equality_values: Vec<f64>,

    /// `[lower, upper]` bounds of the leading bounded rows.
    pub inequality_bounds: Vec<[f64; 2]>,

    /// Number of drift terms `m`.
    pub n_poly: usize,

    pub progress: Option<Arc<dyn ProgressSink>>,
}

impl SystemProblem {
    pub fn n_rows(&self) -> usize {
        self.interpolation_matrix.nrows()
    }

    pub fn n_inequality(&self) -> usize {
        self.inequality_bounds.len()
    }

    fn check_shapes(&self) -> Result<(), SolverError> {
        let n = self.n_rows();
        let n_ie = self.n_inequality();

        let mismatch = |what, expected, found| match expected == found {
            true => Ok(()),
            false => Err(SolverError::ShapeMismatch {
                what,
                expected,
                found,
            }),
        };

        if n_ie > n {
            return Err(SolverError::ShapeMismatch {
                what: "bounded rows",
                expected: n,
                found: n_ie,
            });
        }
        mismatch("interpolation matrix columns", n + self.n_poly, self.interpolation_matrix.ncols())?;
        mismatch("equality matrix rows", n - n_ie, self.equality_matrix.nrows())?;
        mismatch("equality matrix columns", n + self.n_poly, self.equality_matrix.ncols())?;
        mismatch("equality values", n - n_ie, self.equality_values.len())
    }
}

/// Produces interpolation weights from a partitioned system.
pub trait SystemSolver: Send + Sync + Debug {
    fn solve(&self, problem: &SystemProblem) -> Result<Vec<f64>, SolverError>;
}

/// Solves the equality rows exactly, then activates violated bounded rows at
/// the bound they violate and re-solves until every bounded row is satisfied.
///
/// When the equality rows alone leave the drift undetermined, every bounded
/// row with a finite band is first pinned at the centre of its band. Pinned
/// rows are then released one at a time for as long as the solution stays
/// inside every band.
///
/// Activated rows are never released, so at most `n_ie + 1` passes are made.
/// This is a heuristic and does not guarantee the least-norm feasible solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveSetSolver {
    pub params: SolverParams,
}

impl ActiveSetSolver {
    pub fn new(params: SolverParams) -> Self {
        Self { params }
    }

    // Solves the saddle system [[A_SS, P_S], [P_Sᵀ, 0]] for the active rows.
    fn solve_active(
        problem: &SystemProblem,
        active: &[usize],
        targets: &[f64],
    ) -> Result<Vec<f64>, SolverError> {
        let n = problem.n_rows();
        let n_ie = problem.n_inequality();
        let m = problem.n_poly;
        let k = active.len();

        let mut weights = vec![0.0; n + m];
        if k + m == 0 {
            return Ok(weights);
        }

        // Equality rows are read from the partitioned block.
        let entry = |row: usize, col: usize| match row >= n_ie {
            true => problem.equality_matrix[(row - n_ie, col)],
            false => problem.interpolation_matrix[(row, col)],
        };

        let lhs = Mat::from_fn(k + m, k + m, |i, j| match (i < k, j < k) {
            (true, true) => entry(active[i], active[j]),
            (true, false) => entry(active[i], n + (j - k)),
            (false, true) => entry(active[j], n + (i - k)),
            (false, false) => 0.0,
        });
        let rhs = Mat::from_fn(k + m, 1, |i, _| match i < k {
            true => targets[i],
            false => 0.0,
        });

        let lu = lhs.partial_piv_lu();
        let solution = lu.solve(rhs);

        if (0..k + m).any(|i| !solution[(i, 0)].is_finite()) {
            return Err(SolverError::Singular);
        }

        for (a, row) in active.iter().enumerate() {
            weights[*row] = solution[(a, 0)];
        }
        for j in 0..m {
            weights[n + j] = solution[(k + j, 0)];
        }
        Ok(weights)
    }

    // Pins the finite-band rows at their centres, then releases them in row
    // order while the solution stays inside every band.
    fn seed_banded_rows(
        &self,
        problem: &SystemProblem,
        active: &mut Vec<usize>,
        targets: &mut Vec<f64>,
        is_active: &mut [bool],
    ) -> Result<Vec<f64>, SolverError> {
        let tolerance = self.params.feasibility_tolerance;

        let banded: Vec<usize> = (0..problem.n_inequality())
            .filter(|row| {
                let [lower, upper] = problem.inequality_bounds[*row];
                lower.is_finite() && upper.is_finite()
            })
            .collect();

        if banded.is_empty() {
            return Err(SolverError::Singular);
        }

        for row in &banded {
            let [lower, upper] = problem.inequality_bounds[*row];
            active.push(*row);
            targets.push(0.5 * (lower + upper));
            is_active[*row] = true;
        }

        let mut weights = Self::solve_active(problem, active, targets)?;

        let inside_bands = |w: &[f64]| {
            banded.iter().all(|row| {
                let [lower, upper] = problem.inequality_bounds[*row];
                let value = row_value(&problem.interpolation_matrix, *row, w);
                value >= lower - tolerance && value <= upper + tolerance
            })
        };

        let mut released = 0;
        for row in &banded {
            let Some(slot) = active.iter().position(|a| a == row) else {
                continue;
            };

            let mut trial_active = active.clone();
            let mut trial_targets = targets.clone();
            trial_active.remove(slot);
            trial_targets.remove(slot);

            if let Ok(trial) = Self::solve_active(problem, &trial_active, &trial_targets) {
                if inside_bands(&trial) {
                    *active = trial_active;
                    *targets = trial_targets;
                    is_active[*row] = false;
                    weights = trial;
                    released += 1;
                }
            }
        }

        report(
            &problem.progress,
            ProgressMsg::Message {
                message: format!(
                    "Pinned {} banded rows to determine the drift, released {}",
                    banded.len(),
                    released
                ),
            },
        );

        Ok(weights)
    }
}

/// `[A | P]` row `row` applied to `weights`.
pub fn row_value(matrix: &Mat<f64>, row: usize, weights: &[f64]) -> f64 {
    (0..matrix.ncols())
        .map(|c| matrix[(row, c)] * weights[c])
        .sum()
}

impl SystemSolver for ActiveSetSolver {
    fn solve(&self, problem: &SystemProblem) -> Result<Vec<f64>, SolverError> {
        problem.check_shapes()?;

        let n = problem.n_rows();
        let n_ie = problem.n_inequality();
        let tolerance = self.params.feasibility_tolerance;

        let mut active: Vec<usize> = (n_ie..n).collect();
        let mut targets: Vec<f64> = problem.equality_values.clone();
        let mut is_active = vec![false; n_ie];

        let mut weights = match Self::solve_active(problem, &active, &targets) {
            Err(SolverError::Singular) => {
                self.seed_banded_rows(problem, &mut active, &mut targets, &mut is_active)?
            }
            solved => solved?,
        };

        for pass in 1..=n_ie + 1 {
            let mut promoted = 0;
            for row in 0..n_ie {
                if is_active[row] {
                    continue;
                }
                let [lower, upper] = problem.inequality_bounds[row];
                let value = row_value(&problem.interpolation_matrix, row, &weights);
                let target = match (value < lower - tolerance, value > upper + tolerance) {
                    (true, _) => lower,
                    (_, true) => upper,
                    _ => continue,
                };
                is_active[row] = true;
                active.push(row);
                targets.push(target);
                promoted += 1;
            }

            report(&problem.progress, ProgressMsg::ActiveSetPass { pass, promoted });

            if promoted == 0 {
                return Ok(weights);
            }

            weights = Self::solve_active(problem, &active, &targets)?;
        }

        Err(SolverError::Infeasible {
            violated: is_active.iter().filter(|a| !**a).count(),
        })
    }
}

impl From<SolverParams> for ActiveSetSolver {
    fn from(params: SolverParams) -> Self {
        ActiveSetSolver::new(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    // One-dimensional toy system: two rows, no drift.
    fn toy_problem(bounds: Vec<[f64; 2]>, equality_values: Vec<f64>) -> SystemProblem {
        let full = faer::mat![[2.0, 1.0], [1.0, 2.0]];
        let n_ie = bounds.len();
        SystemProblem {
            equality_matrix: full.subrows(n_ie, 2 - n_ie).to_owned(),
            interpolation_matrix: full,
            equality_values,
            inequality_bounds: bounds,
            n_poly: 0,
            progress: None,
        }
    }

    #[test]
    fn equality_only_system_is_solved_exactly() {
        let problem = toy_problem(vec![], vec![3.0, 3.0]);
        let w = ActiveSetSolver::default().solve(&problem).unwrap();
        assert!((w[0] - 1.0).abs() < 1e-12);
        assert!((w[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn satisfied_bound_stays_inactive() {
        // Row 1 alone gives w = [0, 1.5]; row 0 then evaluates to 1.5.
        let problem = toy_problem(vec![[0.0, f64::INFINITY]], vec![3.0]);
        let w = ActiveSetSolver::default().solve(&problem).unwrap();
        assert!(w[0] == 0.0);
        assert!((w[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn violated_bound_is_activated_at_the_bound() {
        let problem = toy_problem(vec![[4.0, f64::INFINITY]], vec![3.0]);
        let w = ActiveSetSolver::default().solve(&problem).unwrap();
        let value = row_value(&problem.interpolation_matrix, 0, &w);
        assert!((value - 4.0).abs() < 1e-12);
        assert!((row_value(&problem.interpolation_matrix, 1, &w) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let mut problem = toy_problem(vec![], vec![3.0, 3.0]);
        problem.equality_values.pop();
        assert!(matches!(
            ActiveSetSolver::default().solve(&problem),
            Err(SolverError::ShapeMismatch { .. })
        ));
    }

    // Row 0 is a value row with a band, row 1 a derivative row, plus a constant drift.
    fn drift_problem(bounds: [f64; 2]) -> SystemProblem {
        let full = faer::mat![[2.0, 1.0, 1.0], [1.0, 2.0, 0.0]];
        SystemProblem {
            equality_matrix: full.subrows(1, 1).to_owned(),
            interpolation_matrix: full,
            equality_values: vec![3.0],
            inequality_bounds: vec![bounds],
            n_poly: 1,
            progress: None,
        }
    }

    #[test]
    fn undetermined_drift_is_fixed_by_banded_rows() {
        // The equality row alone has a zero drift column.
        let problem = drift_problem([0.9, 1.1]);
        let w = ActiveSetSolver::default().solve(&problem).unwrap();
        assert!(w.iter().all(|v| v.is_finite()));
        assert!((row_value(&problem.interpolation_matrix, 0, &w) - 1.0).abs() < 1e-12);
        assert!((row_value(&problem.interpolation_matrix, 1, &w) - 3.0).abs() < 1e-12);
        assert!((w[2] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn one_sided_bound_cannot_fix_the_drift() {
        let problem = drift_problem([0.9, f64::INFINITY]);
        assert!(ActiveSetSolver::default().solve(&problem) == Err(SolverError::Singular));
    }

    #[test]
    fn releasable_banded_rows_are_released() {
        // Rows 0 and 1 share the constant drift, so either one determines it.
        let full = faer::mat![
            [2.0, 1.0, 0.0, 1.0],
            [1.0, 2.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        let problem = SystemProblem {
            equality_matrix: full.subrows(2, 1).to_owned(),
            interpolation_matrix: full,
            equality_values: vec![0.0],
            inequality_bounds: vec![[0.5, 2.5], [1.5, 2.5]],
            n_poly: 1,
            progress: None,
        };
        let w = ActiveSetSolver::default().solve(&problem).unwrap();
        // Pinning both gives w0 = -0.25. Row 0 is released and row 1 stays
        // pinned at 2, leaving a flat field.
        assert!(w[0] == 0.0);
        assert!(w[1].abs() < 1e-12);
        assert!((w[3] - 2.0).abs() < 1e-12);
        for (row, [lower, upper]) in problem.inequality_bounds.iter().enumerate() {
            let value = row_value(&problem.interpolation_matrix, row, &w);
            assert!(value >= *lower && value <= *upper + 1e-12);
        }
    }

    #[test]
    fn singular_system_is_reported() {
        let full = faer::mat![[1.0, 1.0], [1.0, 1.0]];
        let problem = SystemProblem {
            equality_matrix: full.clone(),
            interpolation_matrix: full,
            equality_values: vec![1.0, 2.0],
            inequality_bounds: vec![],
            n_poly: 0,
            progress: None,
        };
        assert!(ActiveSetSolver::default().solve(&problem) == Err(SolverError::Singular));
    }
}
