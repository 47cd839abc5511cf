/////////////////////////////////////////////////////////////////////////////////////////////
//
// Holds the constraint collections, derived interface groupings and nearest-neighbour statistics.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::{
    error::ErrorKind,
    points::{EvaluationPoint, Inequality, Interface, Located, Planar, Tangent},
    spatial,
};
use serde::{Deserialize, Serialize};
use surfe_rbf_utils::normalize;

/// Interface levels closer than this are treated as the same surface.
const LEVEL_TOLERANCE: f64 = 1e-10;

/// The four kinds of constraint collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    Inequality,
    Interface,
    Planar,
    Tangent,
}

/// Average nearest-neighbour distance per constraint kind. `None` until computed,
/// and stays `None` for collections of fewer than two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NearestNeighbourDistances {
    pub inequality: Option<f64>,
    pub interface: Option<f64>,
    pub planar: Option<f64>,
    pub tangent: Option<f64>,
}

/// Constraint data for one model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInput {
    pub inequality: Vec<Inequality>,
    pub interface: Vec<Interface>,
    pub planar: Vec<Planar>,
    pub tangent: Vec<Tangent>,
    pub evaluation_pts: Vec<EvaluationPoint>,

    /// One value per distinct interface level, ascending. Replaced by the solved
    /// field values for increment formulations.
    pub interface_iso_values: Vec<f64>,

    /// Interfaces grouped by distinct level, in the order of `interface_iso_values`.
    pub interface_point_lists: Vec<Vec<Interface>>,

    /// The first point of each group, used as the group reference.
    pub interface_test_points: Vec<Interface>,

    nn_distances: NearestNeighbourDistances,
}

fn locations<P: Located>(points: &[P]) -> Vec<[f64; 3]> {
    points.iter().map(|p| p.coords()).collect()
}

impl BasicInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups the interfaces by distinct level and fills the three derived vectors.
    ///
    /// Returns `false`, leaving the vectors empty, when there are no interfaces.
    pub fn get_interface_data(&mut self) -> bool {
        self.interface_iso_values.clear();
        self.interface_point_lists.clear();
        self.interface_test_points.clear();

        if self.interface.is_empty() {
            return false;
        }

        let mut levels: Vec<f64> = self.interface.iter().map(|i| i.level).collect();
        levels.sort_by(|a, b| a.total_cmp(b));
        levels.dedup_by(|a, b| (*a - *b).abs() <= LEVEL_TOLERANCE);

        for level in levels {
            let group: Vec<Interface> = self
                .interface
                .iter()
                .filter(|i| (i.level - level).abs() <= LEVEL_TOLERANCE)
                .copied()
                .collect();
            self.interface_test_points.push(group[0]);
            self.interface_point_lists.push(group);
            self.interface_iso_values.push(level);
        }

        true
    }

    /// Index of the interface group with the given level.
    pub fn interface_group_of(&self, level: f64) -> Option<usize> {
        self.interface_point_lists
            .iter()
            .position(|g| (g[0].level - level).abs() <= LEVEL_TOLERANCE)
    }

    /// Checks coordinates, levels and orientation vectors for usable values.
    pub fn check_input_data(&self) -> Result<(), ErrorKind> {
        fn invalid(reason: String) -> ErrorKind {
            ErrorKind::InvalidInput { reason }
        }

        fn check_coords<P: Located>(points: &[P], what: &str) -> Result<(), ErrorKind> {
            match points
                .iter()
                .position(|p| p.coords().iter().any(|v| !v.is_finite()))
            {
                Some(i) => Err(invalid(format!("{} point {} has non-finite coordinates", what, i))),
                None => Ok(()),
            }
        }

        check_coords(&self.interface, "interface")?;
        check_coords(&self.planar, "planar")?;
        check_coords(&self.tangent, "tangent")?;
        check_coords(&self.inequality, "inequality")?;
        check_coords(&self.evaluation_pts, "evaluation")?;

        if let Some(i) = self.interface.iter().position(|p| !p.level.is_finite()) {
            return Err(invalid(format!("interface point {} has a non-finite level", i)));
        }
        if let Some(i) = self.inequality.iter().position(|p| !p.level.is_finite()) {
            return Err(invalid(format!("inequality point {} has a non-finite level", i)));
        }
        if let Some(i) = self.planar.iter().position(|p| normalize(&p.normal).is_none()) {
            return Err(invalid(format!("planar point {} has a degenerate normal", i)));
        }
        if let Some(i) = self.tangent.iter().position(|p| normalize(&p.tangent).is_none()) {
            return Err(invalid(format!("tangent point {} has a degenerate direction", i)));
        }

        Ok(())
    }

    /// Sets interface level bounds, planar normal bounds and tangent angle bounds.
    pub fn set_uncertainty_bounds(&mut self, interface_uncertainty: f64, angular_uncertainty: f64) {
        self.interface
            .iter_mut()
            .for_each(|i| i.set_level_bounds(interface_uncertainty));
        self.planar
            .iter_mut()
            .for_each(|p| p.set_normal_bounds(angular_uncertainty));
        self.tangent
            .iter_mut()
            .for_each(|t| t.set_angle_bounds(angular_uncertainty));
    }

    pub fn compute_inequality_avg_nn_distance(&mut self) {
        self.nn_distances.inequality =
            spatial::average_nearest_neighbour_distance(&locations(&self.inequality));
    }

    pub fn compute_interface_avg_nn_distance(&mut self) {
        self.nn_distances.interface =
            spatial::average_nearest_neighbour_distance(&locations(&self.interface));
    }

    pub fn compute_planar_avg_nn_distance(&mut self) {
        self.nn_distances.planar =
            spatial::average_nearest_neighbour_distance(&locations(&self.planar));
    }

    pub fn compute_tangent_avg_nn_distance(&mut self) {
        self.nn_distances.tangent =
            spatial::average_nearest_neighbour_distance(&locations(&self.tangent));
    }

    pub fn compute_avg_nn_distances(&mut self) {
        self.compute_inequality_avg_nn_distance();
        self.compute_interface_avg_nn_distance();
        self.compute_planar_avg_nn_distance();
        self.compute_tangent_avg_nn_distance();
    }

    pub fn avg_nn_distance(&self, kind: ConstraintKind) -> Option<f64> {
        match kind {
            ConstraintKind::Inequality => self.nn_distances.inequality,
            ConstraintKind::Interface => self.nn_distances.interface,
            ConstraintKind::Planar => self.nn_distances.planar,
            ConstraintKind::Tangent => self.nn_distances.tangent,
        }
    }

    pub fn set_avg_nn_distance(&mut self, kind: ConstraintKind, distance: Option<f64>) {
        match kind {
            ConstraintKind::Inequality => self.nn_distances.inequality = distance,
            ConstraintKind::Interface => self.nn_distances.interface = distance,
            ConstraintKind::Planar => self.nn_distances.planar = distance,
            ConstraintKind::Tangent => self.nn_distances.tangent = distance,
        }
    }

    pub fn nn_distances(&self) -> NearestNeighbourDistances {
        self.nn_distances
    }

    /// Total number of constraint points across the four collections.
    pub fn n_constraint_points(&self) -> usize {
        self.inequality.len() + self.interface.len() + self.planar.len() + self.tangent.len()
    }

    /// Locations of one constraint collection.
    pub fn locations_of(&self, kind: ConstraintKind) -> Vec<[f64; 3]> {
        match kind {
            ConstraintKind::Inequality => locations(&self.inequality),
            ConstraintKind::Interface => locations(&self.interface),
            ConstraintKind::Planar => locations(&self.planar),
            ConstraintKind::Tangent => locations(&self.tangent),
        }
    }

    /// Distinct levels of interfaces and inequalities, ascending.
    pub fn distinct_levels(&self) -> Vec<f64> {
        let mut levels: Vec<f64> = self
            .interface
            .iter()
            .map(|i| i.level)
            .chain(self.inequality.iter().map(|i| i.level))
            .collect();
        levels.sort_by(|a, b| a.total_cmp(b));
        levels.dedup_by(|a, b| (*a - *b).abs() <= LEVEL_TOLERANCE);
        levels
    }

    /// Smallest distinct level strictly above `level`.
    pub fn next_level_above(&self, level: f64) -> Option<f64> {
        self.distinct_levels()
            .into_iter()
            .find(|l| *l > level + LEVEL_TOLERANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    fn two_horizons() -> BasicInput {
        let mut input = BasicInput::new();
        input.interface = vec![
            Interface::new(0.0, 0.0, 1.0, 1.0),
            Interface::new(1.0, 0.0, 0.0, 0.0),
            Interface::new(0.0, 1.0, 1.0, 1.0),
            Interface::new(1.0, 1.0, 0.0, 0.0),
            Interface::new(2.0, 1.0, 0.0, 0.0),
        ];
        input
    }

    #[test]
    fn interfaces_group_by_ascending_level() {
        let mut input = two_horizons();
        assert!(input.get_interface_data());
        assert!(input.interface_iso_values == vec![0.0, 1.0]);
        assert!(input.interface_point_lists.len() == 2);
        assert!(input.interface_test_points.len() == 2);
        assert!(input.interface_point_lists[0].len() == 3);
        assert!(input.interface_point_lists[1].len() == 2);
        assert!(input.interface_test_points[0].point.x == 1.0);
        assert!(input.interface_group_of(1.0) == Some(1));
        assert!(input.interface_group_of(7.0).is_none());
    }

    #[test]
    fn no_interfaces_gives_no_groups() {
        let mut input = BasicInput::new();
        assert!(!input.get_interface_data());
        assert!(input.interface_test_points.is_empty());
    }

    #[test]
    fn nn_distances_start_uncomputed() {
        let mut input = two_horizons();
        assert!(input.avg_nn_distance(ConstraintKind::Interface).is_none());
        input.compute_avg_nn_distances();
        assert!(input.avg_nn_distance(ConstraintKind::Interface).is_some());
        assert!(input.avg_nn_distance(ConstraintKind::Planar).is_none());
    }

    #[test]
    fn degenerate_normals_are_rejected() {
        let mut input = two_horizons();
        input.planar.push(Planar::new(0.0, 0.0, 0.0, [0.0, 0.0, 0.0]));
        assert!(input.check_input_data().is_err());
        input.planar[0] = Planar::new(0.0, 0.0, 0.0, [0.0, 0.0, 2.0]);
        assert!(input.check_input_data().is_ok());
    }

    #[test]
    fn next_level_spans_interfaces_and_inequalities() {
        let mut input = two_horizons();
        input.inequality.push(Inequality::new(0.0, 0.0, 0.0, 0.5));
        assert!(input.next_level_above(0.0) == Some(0.5));
        assert!(input.next_level_above(0.5) == Some(1.0));
        assert!(input.next_level_above(1.0).is_none());
    }
}
