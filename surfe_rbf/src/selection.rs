/////////////////////////////////////////////////////////////////////////////////////////////
//
// Selects large-residual constraints to promote during greedy refinement.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # selection
//!
//! Picks which excluded constraints to add to a greedy model.
//!
//! A constraint is flagged when its residual magnitude exceeds
//! `max(bound, residual_floor)`, or when it is a violated inequality. Flagged
//! constraints are visited from the largest magnitude down, ties by index. A
//! constraint is kept when no previously isolated keeper lies within
//! `isolation_factor × avg_nn_distance` of it, so clusters contribute their
//! worst point first. A constraint that is not isolated is still kept when its
//! magnitude is at least `variability_factor` times the mean magnitude of the
//! other flagged constraints within that radius.
//!
//! Raising a constraint's magnitude never drops it from the selection.

use crate::{
    config::GreedyParams,
    points::{Inequality, Interface, Located, Planar, Tangent},
    spatial::PointIndex,
};

struct Candidate {
    index: usize,
    location: [f64; 3],
    magnitude: f64,
}

fn select(candidates: Vec<Candidate>, avg_nn_distance: Option<f64>, params: &GreedyParams) -> Vec<usize> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let radius = avg_nn_distance.map_or(0.0, |d| params.isolation_factor * d);
    let locations: Vec<[f64; 3]> = candidates.iter().map(|c| c.location).collect();
    let index = PointIndex::new(&locations);

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| {
        let (ca, cb) = (&candidates[*a], &candidates[*b]);
        cb.magnitude
            .total_cmp(&ca.magnitude)
            .then(ca.index.cmp(&cb.index))
    });

    let mut isolated_keeper = vec![false; candidates.len()];
    let mut selected = Vec::new();

    for local in order {
        let candidate = &candidates[local];
        let neighbours: Vec<usize> = index
            .within_radius(&candidate.location, radius)
            .into_iter()
            .filter(|n| *n != local)
            .collect();

        let isolated = !neighbours.iter().any(|n| isolated_keeper[*n]);
        if isolated {
            isolated_keeper[local] = true;
            selected.push(candidate.index);
            continue;
        }

        let local_mean =
            neighbours.iter().map(|n| candidates[*n].magnitude).sum::<f64>() / neighbours.len() as f64;
        if candidate.magnitude >= params.variability_factor * local_mean {
            selected.push(candidate.index);
        }
    }

    selected.sort_unstable();
    selected
}

fn flagged_by_magnitude<P: Located>(
    points: &[P],
    magnitude: impl Fn(&P) -> f64,
    bound: f64,
    params: &GreedyParams,
) -> Vec<Candidate> {
    let threshold = bound.max(params.residual_floor);
    points
        .iter()
        .enumerate()
        .filter_map(|(index, p)| {
            let m = magnitude(p);
            (m > threshold).then(|| Candidate {
                index,
                location: p.coords(),
                magnitude: m,
            })
        })
        .collect()
}

/// Violated inequalities to promote. Violations carry no magnitude, so ordering
/// is by index alone.
pub fn select_inequality(
    points: &[Inequality],
    avg_nn_distance: Option<f64>,
    params: &GreedyParams,
) -> Vec<usize> {
    let candidates = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.residual)
        .map(|(index, p)| Candidate {
            index,
            location: p.coords(),
            magnitude: 1.0,
        })
        .collect();
    select(candidates, avg_nn_distance, params)
}

/// Interfaces whose value misfit exceeds `interface_slack`.
pub fn select_interface(
    points: &[Interface],
    interface_slack: f64,
    avg_nn_distance: Option<f64>,
    params: &GreedyParams,
) -> Vec<usize> {
    let candidates = flagged_by_magnitude(points, |p| p.residual.abs(), interface_slack, params);
    select(candidates, avg_nn_distance, params)
}

/// Planar points whose gradient deviates from the normal by more than `gradient_slack` degrees.
pub fn select_planar(
    points: &[Planar],
    gradient_slack: f64,
    avg_nn_distance: Option<f64>,
    params: &GreedyParams,
) -> Vec<usize> {
    let candidates = flagged_by_magnitude(points, |p| p.residual.abs(), gradient_slack, params);
    select(candidates, avg_nn_distance, params)
}

/// Tangents deviating from their target angle by more than `gradient_slack` degrees.
pub fn select_tangent(
    points: &[Tangent],
    gradient_slack: f64,
    avg_nn_distance: Option<f64>,
    params: &GreedyParams,
) -> Vec<usize> {
    let candidates = flagged_by_magnitude(points, |p| p.residual.abs(), gradient_slack, params);
    select(candidates, avg_nn_distance, params)
}
