/////////////////////////////////////////////////////////////////////////////////////////////
//
// Specifies model type, kernel, polynomial and uncertainty options for configuring a model.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Specifies model type, kernel, polynomial and uncertainty options for configuring a model.
use serde::{Deserialize, Serialize};
use surfe_rbf_utils::{KernelParams, KernelType};

/// The modeling formulation.
///
/// Point formulations ([`ModelType::SingleSurface`], [`ModelType::ContinuousProperty`])
/// interpolate interface levels directly. Increment formulations
/// ([`ModelType::LajaunieIncrement`], [`ModelType::StratigraphicHorizons`]) only
/// constrain field differences within each interface group, so the true level of
/// each group is recovered after the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    SingleSurface,
    LajaunieIncrement,
    StratigraphicHorizons,
    ContinuousProperty,
    VectorField,
}

impl ModelType {
    /// Whether interface constraints are expressed as within-group increments.
    pub fn uses_increments(&self) -> bool {
        matches!(
            self,
            ModelType::LajaunieIncrement | ModelType::StratigraphicHorizons
        )
    }

    /// Whether interface constraints fix field values directly.
    pub fn uses_point_values(&self) -> bool {
        matches!(
            self,
            ModelType::SingleSurface | ModelType::ContinuousProperty
        )
    }
}

impl From<i32> for ModelType {
    /// Maps host integer codes to model types. Unknown codes select a single surface.
    fn from(code: i32) -> Self {
        match code {
            1 => ModelType::LajaunieIncrement,
            2 => ModelType::StratigraphicHorizons,
            3 => ModelType::ContinuousProperty,
            4 => ModelType::VectorField,
            _ => ModelType::SingleSurface,
        }
    }
}

/// The available RBF families.
#[derive(Clone, Debug, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RbfKernelType {
    Cubic,
    Gaussian,
    Multiquadric,
    InverseMultiquadric,
    ThinPlateSpline,
    Linear,
}

impl From<i32> for RbfKernelType {
    /// Maps host integer codes `0..=5` to kernel families.
    ///
    /// Any other code falls back to [`RbfKernelType::ThinPlateSpline`].
    fn from(code: i32) -> Self {
        match code {
            0 => RbfKernelType::Cubic,
            1 => RbfKernelType::Gaussian,
            2 => RbfKernelType::Multiquadric,
            3 => RbfKernelType::InverseMultiquadric,
            5 => RbfKernelType::Linear,
            _ => RbfKernelType::ThinPlateSpline,
        }
    }
}

impl From<RbfKernelType> for KernelType {
    fn from(v: RbfKernelType) -> Self {
        match v {
            RbfKernelType::Cubic => KernelType::CubicRbf,
            RbfKernelType::Gaussian => KernelType::GaussianRbf,
            RbfKernelType::Multiquadric => KernelType::MultiquadricRbf,
            RbfKernelType::InverseMultiquadric => KernelType::InverseMultiquadricRbf,
            RbfKernelType::ThinPlateSpline => KernelType::ThinPlateSplineRbf,
            RbfKernelType::Linear => KernelType::LinearRbf,
        }
    }
}

/// Returns the minimum polynomial degree for the provided [`RbfKernelType`],
/// or `-1` when the kernel is positive definite and needs none.
pub fn get_min_polynomial_order(kernel: RbfKernelType) -> i32 {
    match kernel {
        RbfKernelType::Cubic => 1,
        RbfKernelType::ThinPlateSpline => 1,
        RbfKernelType::Linear => 0,
        RbfKernelType::Multiquadric => 0,
        RbfKernelType::Gaussian => -1,
        RbfKernelType::InverseMultiquadric => -1,
    }
}

/// Whether the interpolation system carries bounded rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverType {
    #[default]
    Linear,
    Quadratic,
}

/// User-facing model configuration.
///
/// ### Default Values
/// - `model_type`: [`ModelType::SingleSurface`]
/// - `basis_type`: [`RbfKernelType::Cubic`], `shape_parameter`: `100.0`
/// - `polynomial_order`: `1`
/// - interface and planar data enabled, tangent and inequality data disabled
/// - anisotropy, greedy refinement and restricted range disabled
/// - all uncertainties, slacks and the minimum stratigraphic thickness `0.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub model_type: ModelType,

    /// Smallest field increase between consecutive horizons of a
    /// [`ModelType::StratigraphicHorizons`] model.
    pub min_stratigraphic_thickness: f64,

    pub use_interface_data: bool,
    pub use_planar_data: bool,
    pub use_tangent_data: bool,
    pub use_inequality_data: bool,

    pub basis_type: RbfKernelType,

    /// Length scale of the Gaussian, multiquadric and inverse multiquadric kernels.
    pub shape_parameter: f64,

    /// Degree of the polynomial drift: `-1` (none), `0`, `1` or `2`.
    pub polynomial_order: i32,

    /// Measure kernel distances in a metric derived from the planar orientations.
    pub model_global_anisotropy: bool,

    pub use_greedy: bool,

    /// Bound each inequality from above by the next distinct level.
    pub use_restricted_range: bool,

    /// Half-width of the band interface constraints may deviate within.
    pub interface_uncertainty: f64,

    /// Angle in degrees orientation constraints may deviate by.
    pub angular_uncertainty: f64,

    /// Largest interface residual greedy refinement accepts without adding the point.
    pub interface_slack: f64,

    /// Largest orientation residual (degrees) greedy refinement accepts.
    pub gradient_slack: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters::builder(ModelType::SingleSurface).build()
    }
}

impl ModelParameters {
    /// Returns a new [`ModelParametersBuilder`] for the given model type.
    pub fn builder(model_type: ModelType) -> ModelParametersBuilder {
        ModelParametersBuilder::new(model_type)
    }
}

/// A convenience builder for constructing a [`ModelParameters`] instance.
///
/// The builder should be called via the [`ModelParameters::builder`] method.
///
/// See [`ModelParameters`] for details on each field.
#[derive(Debug, Clone, Copy)]
pub struct ModelParametersBuilder {
    params: ModelParameters,
}

impl ModelParametersBuilder {
    fn new(model_type: ModelType) -> Self {
        Self {
            params: ModelParameters {
                model_type,
                min_stratigraphic_thickness: 0.0,
                use_interface_data: true,
                use_planar_data: true,
                use_tangent_data: false,
                use_inequality_data: false,
                basis_type: RbfKernelType::Cubic,
                shape_parameter: 100.0,
                polynomial_order: 1,
                model_global_anisotropy: false,
                use_greedy: false,
                use_restricted_range: false,
                interface_uncertainty: 0.0,
                angular_uncertainty: 0.0,
                interface_slack: 0.0,
                gradient_slack: 0.0,
            },
        }
    }

    /// Sets the kernel family.
    pub fn basis_type(mut self, basis_type: RbfKernelType) -> Self {
        self.params.basis_type = basis_type;
        self
    }

    /// Sets the shape parameter used by shape-dependent kernels.
    pub fn shape_parameter(mut self, shape_parameter: f64) -> Self {
        self.params.shape_parameter = shape_parameter;
        self
    }

    /// Sets the polynomial drift order.
    pub fn polynomial_order(mut self, polynomial_order: i32) -> Self {
        self.params.polynomial_order = polynomial_order;
        self
    }

    /// Sets the minimum stratigraphic thickness.
    pub fn min_stratigraphic_thickness(mut self, thickness: f64) -> Self {
        self.params.min_stratigraphic_thickness = thickness;
        self
    }

    /// Selects which constraint collections take part in the model.
    pub fn use_data(mut self, interface: bool, planar: bool, tangent: bool, inequality: bool) -> Self {
        self.params.use_interface_data = interface;
        self.params.use_planar_data = planar;
        self.params.use_tangent_data = tangent;
        self.params.use_inequality_data = inequality;
        self
    }

    /// Enables global anisotropy.
    pub fn model_global_anisotropy(mut self, enabled: bool) -> Self {
        self.params.model_global_anisotropy = enabled;
        self
    }

    /// Enables greedy refinement with the given slacks.
    pub fn greedy(mut self, interface_slack: f64, gradient_slack: f64) -> Self {
        self.params.use_greedy = true;
        self.params.interface_slack = interface_slack;
        self.params.gradient_slack = gradient_slack;
        self
    }

    /// Enables range-restricted inequalities.
    pub fn use_restricted_range(mut self, enabled: bool) -> Self {
        self.params.use_restricted_range = enabled;
        self
    }

    /// Sets the interface and angular uncertainties.
    pub fn uncertainty(mut self, interface: f64, angular: f64) -> Self {
        self.params.interface_uncertainty = interface;
        self.params.angular_uncertainty = angular;
        self
    }

    /// Builds and returns an instance of [`ModelParameters`].
    pub fn build(self) -> ModelParameters {
        self.params
    }
}

impl From<ModelParameters> for KernelParams {
    /// Converts a [`ModelParameters`] instance into a
    /// [`surfe_rbf_utils::KernelParams`].
    fn from(v: ModelParameters) -> Self {
        KernelParams::builder(v.basis_type.into())
            .shape_parameter(v.shape_parameter)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn defaults_follow_single_surface_setup() {
        let p = ModelParameters::default();
        assert!(p.model_type == ModelType::SingleSurface);
        assert!(p.basis_type == RbfKernelType::Cubic);
        assert!(p.shape_parameter == 100.0);
        assert!(p.polynomial_order == 1);
        assert!(p.use_interface_data && p.use_planar_data);
        assert!(!p.use_tangent_data && !p.use_inequality_data);
        assert!(!p.use_greedy);
    }

    #[test]
    fn unknown_kernel_codes_fall_back_to_thin_plate_spline() {
        assert!(RbfKernelType::from(0) == RbfKernelType::Cubic);
        assert!(RbfKernelType::from(4) == RbfKernelType::ThinPlateSpline);
        assert!(RbfKernelType::from(42) == RbfKernelType::ThinPlateSpline);
        assert!(RbfKernelType::from(-1) == RbfKernelType::ThinPlateSpline);
    }

    #[test]
    fn parameters_round_trip_through_json() {
        let p = ModelParameters::builder(ModelType::StratigraphicHorizons)
            .basis_type(RbfKernelType::Gaussian)
            .shape_parameter(12.5)
            .greedy(0.1, 5.0)
            .build();
        let json = serde_json::to_string(&p).unwrap();
        let back: ModelParameters = serde_json::from_str(&json).unwrap();
        assert!(back == p);
    }

    #[test]
    fn kernel_params_carry_shape_parameter() {
        let p = ModelParameters::builder(ModelType::SingleSurface)
            .basis_type(RbfKernelType::InverseMultiquadric)
            .shape_parameter(3.0)
            .build();
        let k: KernelParams = p.into();
        assert!(k.kernel_type == KernelType::InverseMultiquadricRbf);
        assert!(k.shape_parameter == 3.0);
    }
}
