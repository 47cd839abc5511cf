/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the typed constraint records: interface, planar, tangent and inequality points.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Constraint records.
//!
//! Orientation conventions follow the right-hand rule: strike is an azimuth in
//! degrees measured clockwise from north (`+y`), the dip direction is
//! `strike + 90°`, and dip is measured down from horizontal. An upright bed has
//! a normal with a non-negative `z` component, an overturned bed the opposite.

use serde::{Deserialize, Serialize};
use surfe_rbf_utils::{DEG_TO_RAD, RAD_TO_DEG, norm, normalize};

/// A location with room for the evaluated field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Auxiliary coordinate for time-enabled formulations. Not read by the 3D kernels.
    pub c: f64,

    /// Field value, `None` until the interpolant has been evaluated here.
    pub scalar_field: Option<f64>,

    /// Field gradient, `None` until the interpolant has been evaluated here.
    pub vector_field: Option<[f64; 3]>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    #[inline(always)]
    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline(always)]
    pub fn set_field(&mut self, value: f64, gradient: [f64; 3]) {
        self.scalar_field = Some(value);
        self.vector_field = Some(gradient);
    }
}

/// Evaluation points carry no attributes beyond their coordinates.
pub type EvaluationPoint = Point;

/// Uniform access to the location of a constraint record.
pub trait Located {
    fn point(&self) -> &Point;
    fn point_mut(&mut self) -> &mut Point;

    #[inline(always)]
    fn coords(&self) -> [f64; 3] {
        self.point().coords()
    }
}

impl Located for Point {
    fn point(&self) -> &Point {
        self
    }

    fn point_mut(&mut self) -> &mut Point {
        self
    }
}

macro_rules! impl_located {
    ( $( $T:ty ),* ) => {
        $(
            impl Located for $T {
                #[inline(always)]
                fn point(&self) -> &Point {
                    &self.point
                }

                #[inline(always)]
                fn point_mut(&mut self) -> &mut Point {
                    &mut self.point
                }
            }
        )*
    };
}

impl_located!(Interface, Planar, Tangent, Inequality);

/// A point lying on the surface with the given level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub point: Point,
    pub level: f64,

    /// Absolute misfit of the field at this point after the last measurement.
    pub residual: f64,

    /// Allowed deviation `[-u, +u]` around `level`.
    pub level_bounds: [f64; 2],
}

impl Interface {
    pub fn new(x: f64, y: f64, z: f64, level: f64) -> Self {
        Self {
            point: Point::new(x, y, z),
            level,
            residual: 0.0,
            level_bounds: [0.0, 0.0],
        }
    }

    /// Sets the symmetric band `[-u, +u]`.
    pub fn set_level_bounds(&mut self, uncertainty: f64) {
        let u = uncertainty.abs();
        self.level_bounds = [-u, u];
    }
}

/// Facing of a bedding plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Upright,
    Overturned,
}

impl From<i32> for Polarity {
    /// `0` marks an overturned bed, any other code an upright one.
    fn from(code: i32) -> Self {
        match code {
            0 => Polarity::Overturned,
            _ => Polarity::Upright,
        }
    }
}

/// Returns the unit normal of a plane with the given dip, strike and polarity (degrees).
pub fn normal_from_dip_strike(dip: f64, strike: f64, polarity: Polarity) -> [f64; 3] {
    let (sin_d, cos_d) = (dip * DEG_TO_RAD).sin_cos();
    let (sin_s, cos_s) = (strike * DEG_TO_RAD).sin_cos();
    let n = [sin_d * cos_s, -sin_d * sin_s, cos_d];
    match polarity {
        Polarity::Upright => n,
        Polarity::Overturned => [-n[0], -n[1], -n[2]],
    }
}

/// Recovers `(dip, strike, polarity)` in degrees from a normal vector.
///
/// Returns `None` for a zero or non-finite normal. Horizontal planes report a
/// strike of `0`.
pub fn dip_strike_from_normal(normal: &[f64; 3]) -> Option<(f64, f64, Polarity)> {
    let mut u = normalize(normal)?;
    let polarity = match u[2] < 0.0 {
        true => {
            u = [-u[0], -u[1], -u[2]];
            Polarity::Overturned
        }
        false => Polarity::Upright,
    };

    let dip = u[2].clamp(-1.0, 1.0).acos() * RAD_TO_DEG;
    let horizontal = (u[0] * u[0] + u[1] * u[1]).sqrt();
    let strike = match horizontal < 1e-12 {
        true => 0.0,
        false => (-u[1]).atan2(u[0]) * RAD_TO_DEG,
    };

    Some((dip, strike.rem_euclid(360.0), polarity))
}

/// An orientation measurement of the layering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planar {
    pub point: Point,
    pub normal: [f64; 3],
    pub dip: f64,
    pub strike: f64,
    pub polarity: Polarity,

    /// Angle in degrees between the field gradient and `normal` after the last measurement.
    pub residual: f64,

    /// Per-axis `[lower, upper]` range of the normal under the angular uncertainty.
    pub normal_bounds: [[f64; 2]; 3],
}

impl Planar {
    /// Builds a planar constraint from a normal vector.
    ///
    /// A zero normal keeps dip and strike at zero; input validation rejects it later.
    pub fn new(x: f64, y: f64, z: f64, normal: [f64; 3]) -> Self {
        let (dip, strike, polarity) =
            dip_strike_from_normal(&normal).unwrap_or((0.0, 0.0, Polarity::Upright));
        let unit = normalize(&normal).unwrap_or(normal);
        Self {
            point: Point::new(x, y, z),
            normal: unit,
            dip,
            strike,
            polarity,
            residual: 0.0,
            normal_bounds: collapsed_bounds(&unit),
        }
    }

    /// Builds a planar constraint from dip, strike (degrees) and polarity.
    pub fn from_dip_strike(x: f64, y: f64, z: f64, dip: f64, strike: f64, polarity: Polarity) -> Self {
        let normal = normal_from_dip_strike(dip, strike, polarity);
        Self {
            point: Point::new(x, y, z),
            normal,
            dip,
            strike,
            polarity,
            residual: 0.0,
            normal_bounds: collapsed_bounds(&normal),
        }
    }

    /// Horizontal unit vector along strike.
    pub fn strike_vector(&self) -> [f64; 3] {
        let (sin_s, cos_s) = (self.strike * DEG_TO_RAD).sin_cos();
        [sin_s, cos_s, 0.0]
    }

    /// Unit vector pointing down the dip.
    pub fn dip_vector(&self) -> [f64; 3] {
        let (sin_d, cos_d) = (self.dip * DEG_TO_RAD).sin_cos();
        let (sin_s, cos_s) = (self.strike * DEG_TO_RAD).sin_cos();
        [cos_d * cos_s, -cos_d * sin_s, -sin_d]
    }

    /// Sets per-axis normal bounds from the extreme normals reached by perturbing
    /// dip and strike by `{-angle, 0, +angle}` degrees.
    pub fn set_normal_bounds(&mut self, angle: f64) {
        let mut bounds = collapsed_bounds(&self.normal);
        for d_dip in [-angle, 0.0, angle] {
            for d_strike in [-angle, 0.0, angle] {
                let n = normal_from_dip_strike(self.dip + d_dip, self.strike + d_strike, self.polarity);
                for axis in 0..3 {
                    bounds[axis][0] = bounds[axis][0].min(n[axis]);
                    bounds[axis][1] = bounds[axis][1].max(n[axis]);
                }
            }
        }
        self.normal_bounds = bounds;
    }
}

fn collapsed_bounds(normal: &[f64; 3]) -> [[f64; 2]; 3] {
    [
        [normal[0], normal[0]],
        [normal[1], normal[1]],
        [normal[2], normal[2]],
    ]
}

/// A direction lying in the surface, perpendicular to the field gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tangent {
    pub point: Point,
    pub tangent: [f64; 3],

    /// Deviation in degrees from the target angle after the last measurement.
    pub residual: f64,

    /// Target value of `tangent · gradient`, taken on the unnormalised gradient.
    pub inner_product_constraint: f64,

    /// Signed `[lower, upper]` pair derived from the angular uncertainty.
    pub angle_bounds: [f64; 2],
}

impl Tangent {
    pub fn new(x: f64, y: f64, z: f64, tangent: [f64; 3]) -> Self {
        Self {
            point: Point::new(x, y, z),
            tangent: normalize(&tangent).unwrap_or(tangent),
            residual: 0.0,
            inner_product_constraint: 0.0,
            angle_bounds: [0.0, 0.0],
        }
    }

    /// Sets the bounds from an uncertainty angle in degrees.
    ///
    /// `a = cos((90 - angle) * DEG_TO_RAD) * 2`; negative `a` gives `[a, 0]`,
    /// otherwise `[0, a]`.
    pub fn set_angle_bounds(&mut self, angle: f64) {
        let a = ((90.0 - angle) * DEG_TO_RAD).cos() * 2.0;
        self.angle_bounds = match a < 0.0 {
            true => [a, 0.0],
            false => [0.0, a],
        };
    }

    /// Largest allowed deviation of `tangent · gradient` from its target.
    pub fn angle_tolerance(&self) -> f64 {
        self.angle_bounds[0].abs().max(self.angle_bounds[1].abs())
    }

    /// Angle in degrees between the tangent and `gradient` at which
    /// `tangent · gradient` meets the inner product constraint.
    ///
    /// The target cosine is the constraint divided by `|gradient|`, so the angle
    /// depends on the gradient magnitude unless the constraint is zero. `None`
    /// for a zero gradient.
    pub fn target_angle(&self, gradient: &[f64; 3]) -> Option<f64> {
        let magnitude = norm(gradient);
        match magnitude > 0.0 {
            true => Some((self.inner_product_constraint / magnitude).clamp(-1.0, 1.0).acos() * RAD_TO_DEG),
            false => None,
        }
    }
}

/// A point where the field must not fall below `level`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inequality {
    pub point: Point,
    pub level: f64,

    /// `true` while the bound is violated, or has not been checked.
    pub residual: bool,
}

impl Inequality {
    pub fn new(x: f64, y: f64, z: f64, level: f64) -> Self {
        Self {
            point: Point::new(x, y, z),
            level,
            residual: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;
    use surfe_rbf_utils::dot;

    #[test]
    fn tangent_angle_bounds_at_reference_angles() {
        let mut t = Tangent::new(0.0, 0.0, 0.0, [1.0, 0.0, 0.0]);

        t.set_angle_bounds(0.0);
        assert!(t.angle_bounds[0] == 0.0);
        assert!(t.angle_bounds[1].abs() < 1e-15);

        t.set_angle_bounds(30.0);
        assert!(t.angle_bounds[0] == 0.0);
        assert!((t.angle_bounds[1] - 1.0).abs() < 1e-15);

        t.set_angle_bounds(90.0);
        assert!(t.angle_bounds == [0.0, 2.0]);

        t.set_angle_bounds(270.0);
        assert!((t.angle_bounds[0] + 2.0).abs() < 1e-15);
        assert!(t.angle_bounds[1] == 0.0);
    }

    #[test]
    fn tangent_target_angle_scales_with_gradient_magnitude() {
        let mut t = Tangent::new(0.0, 0.0, 0.0, [1.0, 0.0, 0.0]);
        assert!((t.target_angle(&[0.0, 0.0, 3.0]).unwrap() - 90.0).abs() < 1e-12);

        // 0.5 on a unit gradient is 60 degrees. Gradients shorter than 0.5 clamp to 0 degrees.
        t.inner_product_constraint = 0.5;
        assert!((t.target_angle(&[0.0, 0.0, 1.0]).unwrap() - 60.0).abs() < 1e-9);
        assert!((t.target_angle(&[0.0, 2.0, 0.0]).unwrap() - 75.5224878140701).abs() < 1e-9);
        assert!(t.target_angle(&[0.0, 0.0, 0.25]).unwrap().abs() < 1e-9);
        assert!(t.target_angle(&[0.0; 3]).is_none());

        // A gradient meeting the row exactly has zero angular residual.
        let gradient = [1.0, 3f64.sqrt(), 0.0];
        assert!((dot(&t.tangent, &gradient) - 1.0).abs() < 1e-12);
        t.inner_product_constraint = 1.0;
        let angle = surfe_rbf_utils::angle_between(&t.tangent, &gradient).unwrap();
        assert!((angle - t.target_angle(&gradient).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn dip_strike_conversion_is_consistent() {
        let planar = Planar::from_dip_strike(0.0, 0.0, 0.0, 30.0, 0.0, Polarity::Upright);
        // Striking north, dipping east.
        assert!((planar.normal[0] - 0.5).abs() < 1e-12);
        assert!(planar.normal[1].abs() < 1e-12);
        assert!((planar.normal[2] - 3f64.sqrt() / 2.0).abs() < 1e-12);

        let (dip, strike, polarity) = dip_strike_from_normal(&planar.normal).unwrap();
        assert!((dip - 30.0).abs() < 1e-9);
        assert!(strike.abs() < 1e-9);
        assert!(polarity == Polarity::Upright);

        assert!(dot(&planar.normal, &planar.strike_vector()).abs() < 1e-12);
        assert!(dot(&planar.normal, &planar.dip_vector()).abs() < 1e-12);
        assert!(planar.dip_vector()[2] < 0.0);
    }

    #[test]
    fn downward_normal_is_overturned() {
        let planar = Planar::new(0.0, 0.0, 0.0, [0.0, -1.0, -1.0]);
        assert!(planar.polarity == Polarity::Overturned);
        assert!((planar.dip - 45.0).abs() < 1e-9);
        let rebuilt = normal_from_dip_strike(planar.dip, planar.strike, planar.polarity);
        for axis in 0..3 {
            assert!((rebuilt[axis] - planar.normal[axis]).abs() < 1e-12);
        }
    }

    #[test]
    fn normal_bounds_contain_nominal_normal() {
        let mut planar = Planar::from_dip_strike(1.0, 2.0, 3.0, 40.0, 120.0, Polarity::Upright);
        planar.set_normal_bounds(10.0);
        for axis in 0..3 {
            let [lo, hi] = planar.normal_bounds[axis];
            assert!(lo <= planar.normal[axis]);
            assert!(planar.normal[axis] <= hi);
            assert!(hi - lo > 0.0);
        }
    }

    #[test]
    fn interface_bounds_are_symmetric() {
        let mut i = Interface::new(0.0, 0.0, 0.0, 5.0);
        i.set_level_bounds(-0.25);
        assert!(i.level_bounds == [-0.25, 0.25]);
    }

    #[test]
    fn inequality_starts_violated() {
        assert!(Inequality::new(0.0, 0.0, 0.0, 1.0).residual);
    }
}
