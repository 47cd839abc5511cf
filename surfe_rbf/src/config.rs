/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares tuning parameters for greedy refinement and the bounded system solver.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares tuning parameters for greedy refinement and the bounded system solver.
use serde::{Deserialize, Serialize};

/// Thresholds for the large-residual selection used by greedy refinement.
///
/// A constraint is *flagged* when its residual magnitude exceeds
/// `max(bound, residual_floor)`. Flagged constraints are visited in order of
/// decreasing magnitude; a flagged constraint is promoted when no already
/// promoted constraint lies within `isolation_factor × average nearest-neighbour
/// distance`, or when its magnitude is at least `variability_factor` times the
/// mean magnitude of the other flagged constraints inside that radius.
///
/// ### Default Values
/// - `isolation_factor`: `2.0`
/// - `variability_factor`: `2.0`
/// - `residual_floor`: `1e-6`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct GreedyParams {
    /// Neighbourhood radius as a multiple of the average nearest-neighbour distance.
    pub isolation_factor: f64,

    /// Ratio to the local mean magnitude above which a clustered constraint is still promoted.
    pub variability_factor: f64,

    /// Residuals at or below this value never flag a constraint.
    pub residual_floor: f64,
}

impl Default for GreedyParams {
    fn default() -> Self {
        GreedyParams {
            isolation_factor: 2.0,
            variability_factor: 2.0,
            residual_floor: 1e-6,
        }
    }
}

/// Parameters for the default active-set solver.
///
/// ### Default Values
/// - `feasibility_tolerance`: `1e-9`
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct SolverParams {
    /// Amount a bounded row may exceed its bound before it is activated.
    pub feasibility_tolerance: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            feasibility_tolerance: 1e-9,
        }
    }
}

/// Algorithm tuning parameters that sit alongside [`crate::ModelParameters`].
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Params {
    /// Large-residual selection thresholds.
    pub greedy_params: GreedyParams,

    /// Active-set solver parameters.
    pub solver_params: SolverParams,
}

impl Params {
    /// Returns a new [`ParamsBuilder`] populated with defaults.
    pub fn builder() -> ParamsBuilder {
        ParamsBuilder::new()
    }
}

/// A convenience builder for constructing a [`Params`] instance.
///
/// The builder should be called via the [`Params::builder`] method.
///
/// See [`Params`] for details on each field.
#[derive(Debug, Clone)]
pub struct ParamsBuilder {
    pub greedy_params: GreedyParams,
    pub solver_params: SolverParams,
}

impl ParamsBuilder {
    fn new() -> Self {
        Self {
            greedy_params: GreedyParams::default(),
            solver_params: SolverParams::default(),
        }
    }

    /// Sets the greedy selection thresholds.
    pub fn greedy_params(mut self, greedy_params: GreedyParams) -> Self {
        self.greedy_params = greedy_params;
        self
    }

    /// Sets the solver parameters.
    pub fn solver_params(mut self, solver_params: SolverParams) -> Self {
        self.solver_params = solver_params;
        self
    }

    /// Builds and returns a [`Params`] instance.
    pub fn build(self) -> Params {
        Params {
            greedy_params: self.greedy_params,
            solver_params: self.solver_params,
        }
    }
}
