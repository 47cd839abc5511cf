/////////////////////////////////////////////////////////////////////////////////////////////
//
// Wraps the `rstar` crate to answer nearest-neighbour and radius queries over constraint points.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # spatial
//!
//! Wrapper module for the rstar crate.
//!
//! Builds an R-tree over indexed 3D points and exposes the queries the data
//! model and the greedy selection need: nearest other point, points within a
//! radius, and the average nearest-neighbour distance of a point set.

use rstar::RTree;
use rstar::primitives::GeomWithData;
use surfe_rbf_utils::get_distance;

/// A point tagged with its index in the source collection.
type IndexedPoint = GeomWithData<[f64; 3], usize>;

pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    pub fn new(points: &[[f64; 3]]) -> Self {
        let items = points
            .iter()
            .enumerate()
            .map(|(idx, p)| GeomWithData::new(*p, idx))
            .collect::<Vec<_>>();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Nearest point to `query` whose index differs from `exclude`.
    pub fn nearest_other(&self, query: &[f64; 3], exclude: usize) -> Option<(usize, f64)> {
        self.tree
            .nearest_neighbor_iter(query)
            .find(|item| item.data != exclude)
            .map(|item| (item.data, get_distance(query, item.geom())))
    }

    /// Indices of every point within `radius` of `query`, including `query` itself if indexed.
    pub fn within_radius(&self, query: &[f64; 3], radius: f64) -> Vec<usize> {
        let mut found: Vec<usize> = self
            .tree
            .locate_within_distance(*query, radius * radius)
            .map(|item| item.data)
            .collect();
        found.sort_unstable();
        found
    }
}

/// Mean distance from each point to its nearest neighbour.
///
/// Returns `None` for fewer than two points.
pub fn average_nearest_neighbour_distance(points: &[[f64; 3]]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let index = PointIndex::new(points);
    let total: f64 = points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| index.nearest_other(p, i).map(|(_, d)| d))
        .sum();
    Some(total / points.len() as f64)
}

/// Indices of the points holding the minimum and maximum of each coordinate,
/// sorted and without repeats.
pub fn extremal_indices(points: &[[f64; 3]]) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut picked = Vec::with_capacity(6);
    for axis in 0..3 {
        let mut lo = 0;
        let mut hi = 0;
        for (i, p) in points.iter().enumerate() {
            if p[axis] < points[lo][axis] {
                lo = i;
            }
            if p[axis] > points[hi][axis] {
                hi = i;
            }
        }
        picked.push(lo);
        picked.push(hi);
    }
    picked.sort_unstable();
    picked.dedup();
    picked
}

/// The pair of points furthest apart, by brute force.
pub fn furthest_pair(points: &[[f64; 3]]) -> Option<(usize, usize)> {
    if points.len() < 2 {
        return None;
    }
    let mut best = (0, 1);
    let mut best_dist = -1.0;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let d = get_distance(&points[i], &points[j]);
            if d > best_dist {
                best_dist = d;
                best = (i, j);
            }
        }
    }
    Some(best)
}
