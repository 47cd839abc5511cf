/////////////////////////////////////////////////////////////////////////////////////////////
//
// Derives constraint row counts, polynomial settings and the problem type from the input.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    basic_input::BasicInput,
    error::ErrorKind,
    model_config::{ModelParameters, ModelType, SolverType, get_min_polynomial_order},
    polynomials::full_basis_size,
};
use serde::{Deserialize, Serialize};

/// Settings derived from the input and [`ModelParameters`].
///
/// Recomputed from scratch every time the method parameters are requested, so it
/// never carries state from an earlier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BasicParameters {
    /// Interface rows, equality or bounded.
    pub n_interface: usize,

    /// Planar rows, three per planar point.
    pub n_planar: usize,

    pub n_tangent: usize,

    /// Rows coming from inequality points.
    pub n_inequality_points: usize,

    /// Horizon ordering rows of a stratigraphic model.
    pub n_ordering: usize,

    /// Every bounded row, whatever its origin.
    pub n_inequality: usize,

    pub n_equality: usize,
    pub n_constraints: usize,

    /// Interface rows are increments relative to a group reference.
    pub modified_basis: bool,

    pub poly_term: bool,
    pub n_poly_terms: usize,

    /// Drift degree after clamping to what the polynomial basis supports.
    pub polynomial_degree: i32,

    /// Whether the constant monomial is part of the drift.
    pub include_constant: bool,

    pub problem_type: SolverType,
    pub restricted_range: bool,
}

impl BasicParameters {
    /// Derives the row counts for `input` under `params`.
    ///
    /// Expects the interface groups of `input` to be populated.
    pub fn derive(input: &BasicInput, params: &ModelParameters) -> Result<Self, ErrorKind> {
        let model_type = params.model_type;

        let minimum = get_min_polynomial_order(params.basis_type);
        if params.polynomial_order < minimum {
            return Err(ErrorKind::PolynomialOrderTooLow {
                minimum,
                requested: params.polynomial_order,
            });
        }

        let n_interface = match (params.use_interface_data, model_type) {
            (false, _) | (true, ModelType::VectorField) => 0,
            (true, ModelType::LajaunieIncrement | ModelType::StratigraphicHorizons) => input
                .interface_point_lists
                .iter()
                .map(|g| g.len().saturating_sub(1))
                .sum(),
            (true, _) => input.interface.len(),
        };

        let n_planar = match params.use_planar_data {
            true => 3 * input.planar.len(),
            false => 0,
        };

        let n_tangent = match params.use_tangent_data {
            true => input.tangent.len(),
            false => 0,
        };

        let n_inequality_points = match (params.use_inequality_data, model_type) {
            (false, _) | (true, ModelType::VectorField) => 0,
            (true, m) if m.uses_increments() => input
                .inequality
                .iter()
                .filter(|i| input.interface_group_of(i.level).is_some())
                .count(),
            (true, _) => input.inequality.len(),
        };

        let n_ordering = match (model_type, params.use_interface_data) {
            (ModelType::StratigraphicHorizons, true) => {
                input.interface_point_lists.len().saturating_sub(1)
            }
            _ => 0,
        };

        let interface_bounded = params.interface_uncertainty > 0.0;
        let angular_bounded = params.angular_uncertainty > 0.0;

        let mut n_inequality = n_inequality_points + n_ordering;
        if interface_bounded {
            n_inequality += n_interface;
        }
        if angular_bounded {
            n_inequality += n_planar + n_tangent;
        }

        let n_constraints = n_interface + n_planar + n_tangent + n_inequality_points + n_ordering;
        let n_equality = n_constraints - n_inequality;

        let polynomial_degree = params.polynomial_order.min(2);
        let include_constant = model_type.uses_point_values();
        let full = full_basis_size(polynomial_degree);
        let n_poly_terms = match full > 0 && !include_constant {
            true => full - 1,
            false => full,
        };

        let problem_type = match n_inequality > 0 {
            true => SolverType::Quadratic,
            false => SolverType::Linear,
        };

        Ok(Self {
            n_interface,
            n_planar,
            n_tangent,
            n_inequality_points,
            n_ordering,
            n_inequality,
            n_equality,
            n_constraints,
            modified_basis: model_type.uses_increments(),
            poly_term: n_poly_terms > 0,
            n_poly_terms,
            polynomial_degree,
            include_constant,
            problem_type,
            restricted_range: params.use_restricted_range && n_inequality_points > 0,
        })
    }
}
