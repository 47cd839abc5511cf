/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements greedy refinement, growing a model from a minimal constraint subset.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # greedy
//!
//! Greedy refinement solves a model on a small subset of the constraints, then
//! repeatedly adds excluded constraints whose residuals exceed the slacks until
//! none are left to add.
//!
//! The refinement runs on an independent model built by
//! [`GrbfModel::clone_configuration`]. Only the evaluation points, the iso
//! values and the solved interpolant are handed back to the original model.

use crate::{
    basic_input::{BasicInput, ConstraintKind},
    error::{ErrorKind, ModelingError, ModelingResult, Stage},
    modeling::GrbfModel,
    progress::{ProgressMsg, report},
    selection, spatial,
};
use surfe_rbf_utils::angle_between;

/// Summary of a greedy run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GreedyReport {
    pub iterations: usize,

    /// Constraint points in the refined model at each iteration.
    pub active_counts: Vec<usize>,
}

/// Indices into the original collections that the refined model does not use yet.
#[derive(Debug, Default)]
struct Excluded {
    interface: Vec<usize>,
    planar: Vec<usize>,
    tangent: Vec<usize>,
    inequality: Vec<usize>,
}

impl Excluded {
    fn is_empty(&self) -> bool {
        self.interface.is_empty()
            && self.planar.is_empty()
            && self.tangent.is_empty()
            && self.inequality.is_empty()
    }
}

fn split<T: Copy>(points: &[T], keep: &[usize]) -> (Vec<T>, Vec<usize>) {
    let kept = keep.iter().map(|i| points[*i]).collect();
    let excluded = (0..points.len()).filter(|i| keep.binary_search(i).is_err()).collect();
    (kept, excluded)
}

fn moved<T: Copy>(points: &[T], excluded: &mut Vec<usize>, picked: &[usize]) -> Vec<T> {
    let chosen: Vec<usize> = picked.iter().map(|p| excluded[*p]).collect();
    excluded.retain(|i| !chosen.contains(i));
    chosen.iter().map(|i| points[*i]).collect()
}

// Extremal points plus the two points furthest apart, sorted.
fn seed_indices(locations: &[[f64; 3]]) -> Vec<usize> {
    let mut keep = spatial::extremal_indices(locations);
    if let Some((a, b)) = spatial::furthest_pair(locations) {
        keep.extend([a, b]);
    }
    keep.sort_unstable();
    keep.dedup();
    keep
}

/// Starting subset: the seed points of every interface group, the seed planar
/// and tangent points, and no inequalities. Seed points are the extremal points
/// along each axis together with the furthest pair. Collections the model does
/// not use are carried over whole.
fn minimal_subset(model: &GrbfModel) -> (BasicInput, Excluded) {
    let input = &model.input;
    let p = &model.parameters;
    let mut subset = BasicInput::new();
    let mut excluded = Excluded::default();

    match p.use_interface_data {
        true => {
            let mut keep = Vec::new();
            for g in 0..input.interface_point_lists.len() {
                let members: Vec<usize> = (0..input.interface.len())
                    .filter(|i| input.interface_group_of(input.interface[*i].level) == Some(g))
                    .collect();
                let locations: Vec<[f64; 3]> = members
                    .iter()
                    .map(|i| input.interface[*i].point.coords())
                    .collect();
                keep.extend(seed_indices(&locations).into_iter().map(|k| members[k]));
            }
            keep.sort_unstable();
            (subset.interface, excluded.interface) = split(&input.interface, &keep);
        }
        false => subset.interface = input.interface.clone(),
    }

    match p.use_planar_data {
        true => {
            let keep = seed_indices(&input.locations_of(ConstraintKind::Planar));
            (subset.planar, excluded.planar) = split(&input.planar, &keep);
        }
        false => subset.planar = input.planar.clone(),
    }

    match p.use_tangent_data {
        true => {
            let keep = seed_indices(&input.locations_of(ConstraintKind::Tangent));
            (subset.tangent, excluded.tangent) = split(&input.tangent, &keep);
        }
        false => subset.tangent = input.tangent.clone(),
    }

    match p.use_inequality_data {
        true => excluded.inequality = (0..input.inequality.len()).collect(),
        false => subset.inequality = input.inequality.clone(),
    }

    subset.evaluation_pts = input.evaluation_pts.clone();
    (subset, excluded)
}

impl GrbfModel {
    /// Field value the interface `level` is expected to take in the refined model.
    fn interface_target(&self, level: f64) -> ModelingResult<Option<f64>> {
        match self.parameters.model_type.uses_increments() {
            true => {
                let Some(g) = self.input.interface_group_of(level) else {
                    return Ok(None);
                };
                let anchor = self.input.interface_test_points[g].point.coords();
                Ok(Some(self.evaluate_at(&anchor)?.0))
            }
            false => Ok(Some(level)),
        }
    }

    /// Measures `source`'s excluded constraints against this solved model.
    fn measure_residuals(&self, source: &mut BasicInput, excluded: &Excluded) -> ModelingResult<()> {
        let tolerance = self.params.solver_params.feasibility_tolerance;

        for i in &excluded.interface {
            let p = &mut source.interface[*i];
            let (value, _) = self.evaluate_at(&p.point.coords())?;
            // A level missing from the refined model counts as fully misfit.
            p.residual = match self.interface_target(p.level)? {
                Some(target) => (value - target).abs(),
                None => f64::INFINITY,
            };
        }

        for i in &excluded.planar {
            let p = &mut source.planar[*i];
            let (_, gradient) = self.evaluate_at(&p.point.coords())?;
            p.residual = angle_between(&gradient, &p.normal).unwrap_or(180.0);
        }

        for i in &excluded.tangent {
            let t = &mut source.tangent[*i];
            let (_, gradient) = self.evaluate_at(&t.point.coords())?;
            t.residual = match (angle_between(&t.tangent, &gradient), t.target_angle(&gradient)) {
                (Some(angle), Some(target)) => (angle - target).abs(),
                _ => 90.0,
            };
        }

        let restricted = self.parameters.use_restricted_range && !self.parameters.model_type.uses_increments();
        for i in &excluded.inequality {
            let (location, level) = (source.inequality[*i].point.coords(), source.inequality[*i].level);
            let (value, _) = self.evaluate_at(&location)?;
            let violated = match self.interface_target(level)? {
                Some(lower) => {
                    let upper = match restricted {
                        true => source.next_level_above(level).unwrap_or(f64::INFINITY),
                        false => f64::INFINITY,
                    };
                    value < lower - tolerance || value > upper + tolerance
                }
                None => false,
            };
            source.inequality[*i].residual = violated;
        }

        Ok(())
    }

    /// Runs greedy refinement and evaluates the refined model.
    ///
    /// Fails straight away when both the interface and gradient slack are zero.
    pub fn run_greedy_algorithm(&mut self) -> ModelingResult<GreedyReport> {
        let stage = Stage::GreedyRefinement;
        if self.parameters.interface_slack == 0.0 && self.parameters.gradient_slack == 0.0 {
            return Err(ModelingError::new(stage, ErrorKind::ZeroSlack));
        }

        self.process_input_data()?;

        let mut refined = self.clone_configuration();
        let (subset, mut excluded) = minimal_subset(self);
        refined.input = subset;

        let interface_slack = self.parameters.interface_slack;
        let gradient_slack = self.parameters.gradient_slack;
        let greedy_params = self.params.greedy_params;
        let mut report_out = GreedyReport::default();

        loop {
            refined.process_input_data()?;
            refined.get_method_parameters()?;
            refined.setup_basis_functions()?;
            refined.setup_system_solver()?;

            report_out.iterations += 1;
            let active_constraints = refined.input.n_constraint_points();
            report_out.active_counts.push(active_constraints);

            if excluded.is_empty() {
                report(
                    &self.progress_callback,
                    ProgressMsg::GreedyIteration {
                        iteration: report_out.iterations,
                        active_constraints,
                        added: 0,
                    },
                );
                break;
            }

            refined.measure_residuals(&mut self.input, &excluded)?;

            let source = &self.input;
            let pick_interface: Vec<_> = excluded.interface.iter().map(|i| source.interface[*i]).collect();
            let pick_planar: Vec<_> = excluded.planar.iter().map(|i| source.planar[*i]).collect();
            let pick_tangent: Vec<_> = excluded.tangent.iter().map(|i| source.tangent[*i]).collect();
            let pick_inequality: Vec<_> = excluded.inequality.iter().map(|i| source.inequality[*i]).collect();

            let interface = selection::select_interface(
                &pick_interface,
                interface_slack,
                source.avg_nn_distance(ConstraintKind::Interface),
                &greedy_params,
            );
            let planar = selection::select_planar(
                &pick_planar,
                gradient_slack,
                source.avg_nn_distance(ConstraintKind::Planar),
                &greedy_params,
            );
            let tangent = selection::select_tangent(
                &pick_tangent,
                gradient_slack,
                source.avg_nn_distance(ConstraintKind::Tangent),
                &greedy_params,
            );
            let inequality = selection::select_inequality(
                &pick_inequality,
                source.avg_nn_distance(ConstraintKind::Inequality),
                &greedy_params,
            );

            let added = interface.len() + planar.len() + tangent.len() + inequality.len();
            report(
                &self.progress_callback,
                ProgressMsg::GreedyIteration {
                    iteration: report_out.iterations,
                    active_constraints,
                    added,
                },
            );
            if added == 0 {
                break;
            }

            let target = &mut refined.input;
            target
                .interface
                .extend(moved(&source.interface, &mut excluded.interface, &interface));
            target
                .planar
                .extend(moved(&source.planar, &mut excluded.planar, &planar));
            target
                .tangent
                .extend(moved(&source.tangent, &mut excluded.tangent, &tangent));
            target
                .inequality
                .extend(moved(&source.inequality, &mut excluded.inequality, &inequality));
        }

        refined.evaluate_scalar_interpolant()?;
        if refined.parameters.model_type.uses_increments() {
            refined.update_interface_iso_values()?;
            self.input.interface_iso_values = refined.input.interface_iso_values.clone();
        }

        self.input.evaluation_pts = std::mem::take(&mut refined.input.evaluation_pts);
        self.adopt_solution(refined);

        Ok(report_out)
    }
}
