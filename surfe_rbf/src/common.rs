/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines shared helpers for random point generation, evaluation grids, and scaling utilities.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::points::EvaluationPoint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate random 3D points in the unit cube.
///
/// # Parameters
/// - `n`: Number of points to generate.
/// - `seed`: Optional random seed.
///   - If `Some(seed)` is provided, the same sequence of points will be generated
///     deterministically across runs and platforms (useful for reproducible tests).
///   - If `None`, the generator is seeded from the operating system's randomness source.
///
/// # Example
/// ```
/// use surfe_rbf::generate_random_points;
///
/// let pts = generate_random_points(100, Some(42));
/// assert_eq!(pts.len(), 100);
/// ```
pub fn generate_random_points(n: usize, seed: Option<u64>) -> Vec<[f64; 3]> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    (0..n)
        .map(|_| {
            [
                rng.random_range(0.0..1.0),
                rng.random_range(0.0..1.0),
                rng.random_range(0.0..1.0),
            ]
        })
        .collect()
}

/// Create a regular evaluation grid from per-axis ranges and sample counts.
///
/// # Arguments
/// * `ranges` - Inclusive `(min, max)` range for x, y and z.
/// * `counts` - Number of grid samples along each axis.
///
/// Points are ordered with x varying fastest. An axis with a single sample sits at
/// its range minimum.
pub fn create_evaluation_grid(ranges: [(f64, f64); 3], counts: [usize; 3]) -> Vec<EvaluationPoint> {
    let total_points: usize = counts.iter().product();

    (0..total_points)
        .map(|row_idx| {
            let mut coords = [0.0; 3];
            let mut stride = 1;
            for axis in 0..3 {
                let (start, end) = ranges[axis];
                let step = match counts[axis] > 1 {
                    true => (end - start) / (counts[axis] as f64 - 1.0),
                    false => 0.0,
                };
                let index_in_axis = (row_idx / stride) % counts[axis];
                coords[axis] = start + step * index_in_axis as f64;
                stride *= counts[axis];
            }
            EvaluationPoint::new(coords[0], coords[1], coords[2])
        })
        .collect()
}

/// Compute translation and scale factors to map points into a Chebyshev cube.
///
/// The translation is the midpoint of each coordinate range and the scale
/// is half the range, with zeros replaced by `1.0` to avoid division by zero.
///
/// # Returns
/// A tuple `(translation, scale)`. An empty point set maps to the identity.
pub fn get_cheb_cube_scaling_factors(point_locations: &[[f64; 3]]) -> ([f64; 3], [f64; 3]) {
    let Some(extents) = surfe_rbf_utils::get_pointarray_extents(point_locations) else {
        return ([0.0; 3], [1.0; 3]);
    };

    let mut translation_factor = [0.0; 3];
    let mut scale_factor = [1.0; 3];

    (0..3).for_each(|d| {
        let max_coord = extents[d + 3];
        let min_coord = extents[d];
        translation_factor[d] = (max_coord + min_coord) / 2.0;
        scale_factor[d] = (max_coord - min_coord) / 2.0;
    });

    scale_factor.iter_mut().for_each(|element| {
        if *element == 0.0 {
            *element = 1.0;
        }
    });

    (translation_factor, scale_factor)
}

/// Apply translation and scaling to map a point into the normalized cube.
#[inline(always)]
pub fn scale_point(point: &[f64; 3], translation_factor: &[f64; 3], scale_factor: &[f64; 3]) -> [f64; 3] {
    [
        (point[0] - translation_factor[0]) / scale_factor[0],
        (point[1] - translation_factor[1]) / scale_factor[1],
        (point[2] - translation_factor[2]) / scale_factor[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn grid_orders_x_fastest() {
        let grid = create_evaluation_grid([(0.0, 1.0), (0.0, 2.0), (5.0, 5.0)], [2, 3, 1]);
        assert!(grid.len() == 6);
        assert!(grid[1].coords() == [1.0, 0.0, 5.0]);
        assert!(grid[2].coords() == [0.0, 1.0, 5.0]);
        assert!(grid[5].coords() == [1.0, 2.0, 5.0]);
        assert!(grid.iter().all(|p| p.scalar_field.is_none()));
    }

    #[test]
    fn scaling_maps_extents_to_unit_cube() {
        let pts = [[0.0, 10.0, 3.0], [4.0, 20.0, 3.0]];
        let (t, s) = get_cheb_cube_scaling_factors(&pts);
        assert!(s == [2.0, 5.0, 1.0]);
        assert!(scale_point(&pts[0], &t, &s) == [-1.0, -1.0, 0.0]);
        assert!(scale_point(&pts[1], &t, &s) == [1.0, 1.0, 0.0]);
    }

    #[test]
    fn seeded_points_are_reproducible() {
        assert!(generate_random_points(10, Some(3)) == generate_random_points(10, Some(3)));
    }
}
