/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for generalized RBF implicit modelling.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Generalized Radial Basis Function (GRBF) implicit surface modelling.
//!
//! Geological surfaces are rarely observed directly. What is available is a mix
//! of points lying on a contact, orientation measurements, lineations and
//! "above/below" observations. This crate builds a single scalar field whose
//! level sets honour all of them at once, following the Hermite-Birkhoff
//! generalized interpolation approach of `1` and `2`.
//!
//! Each observation becomes a linear functional applied to a radial kernel:
//!
//! - **Interfaces** fix the field value, or for increment formulations the field
//!   difference to a reference point of the same horizon.
//! - **Planar** measurements fix the field gradient to the surface normal.
//! - **Tangents** force the gradient to be orthogonal to a lineation.
//! - **Inequalities** bound the field from below (and optionally above).
//!
//! Equality rows are solved together with a low-degree polynomial drift. Bounded
//! rows are enforced by an active-set pass over the saddle-point system, and the
//! optional greedy refinement grows the active constraint set from a minimal
//! subset until every observation is honoured to within its slack.
//!
//! # Features
//! - Five model formulations: single surface, Lajaunie increments, stratigraphic
//!   horizons, continuous property and vector field
//! - Cubic, linear, thin plate spline, Gaussian, multiquadric and inverse
//!   multiquadric kernels, with optional global anisotropy from planar data
//! - Interface and angular uncertainty handled as bounded rows
//! - Greedy constraint selection for large or noisy data sets
//! - Built on [`faer`](https://docs.rs/faer/latest/faer/) for linear algebra, avoiding complex build dependencies
//!
//! # Examples
//!
//! ```
//! use surfe_rbf::{
//!     BasicInput, GrbfModel, Interface, ModelParameters, ModelType, Planar,
//! };
//!
//! // A flat horizon at z = 0 with a single upward orientation.
//! let mut input = BasicInput::new();
//! for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.5, 0.5)] {
//!     input.interface.push(Interface::new(x, y, 0.0, 0.0));
//! }
//! input.planar.push(Planar::new(0.5, 0.5, 0.0, [0.0, 0.0, 1.0]));
//!
//! let parameters = ModelParameters::builder(ModelType::SingleSurface).build();
//! let mut model = GrbfModel::new(input, parameters);
//! model.run().unwrap();
//!
//! // The field is the height above the horizon.
//! let (value, gradient) = model.evaluate_at(&[0.3, 0.2, 0.5]).unwrap();
//! assert!((value - 0.5).abs() < 1e-6);
//! assert!((gradient[2] - 1.0).abs() < 1e-6);
//! ```
//!
//! # References
//! 1.  M. Hillier, E. de Kemp, E. Schetselaar. A New 3D Modeling Method for
//!     Geological Surfaces Using Generalized Interpolation with Radial Basis
//!     Functions. Mathematical Geosciences, 46(8):931–953, 2014.
//! 2.  C. Lajaunie, G. Courrioux, L. Manuel. Foliation fields and 3D cartography
//!     in geology. Mathematical Geology, 29(4):571–584, 1997.
//! 3.  Fasshauer, G., 2007. Meshfree Approximation Methods with Matlab. World Scientific Publishing Co.
pub mod model_config;

pub mod config;

pub mod error;

pub mod points;

pub mod basic_input;

pub mod basic_parameters;

pub mod basis;

pub mod assembly;

pub mod solver;

pub mod interpolant;

pub mod modeling;

pub mod greedy;

pub mod progress;

pub mod transfer;

mod common;

pub mod polynomials;

mod selection;

mod spatial;

pub use {
    basic_input::{BasicInput, ConstraintKind, NearestNeighbourDistances},
    basic_parameters::BasicParameters,
    basis::{BasisFunction, Functional, ModifiedKernel, RbfKernel, create_rbf_kernel},
    common::{create_evaluation_grid, generate_random_points},
    config::{GreedyParams, Params, SolverParams},
    error::{ErrorCategory, ErrorKind, ModelingError, ModelingResult, SolverError, Stage, TransferError},
    greedy::GreedyReport,
    interpolant::Interpolant,
    model_config::{ModelParameters, ModelType, RbfKernelType, SolverType},
    modeling::{GrbfModel, GrbfModelBuilder, IsoValueUpdate},
    points::{EvaluationPoint, Inequality, Interface, Planar, Point, Polarity, Tangent},
    solver::{ActiveSetSolver, SystemProblem, SystemSolver},
    transfer::{
        EvaluationPoints, InequalityPoints, InterfacePoints, PlanarOrientation, PlanarPoints,
        TangentPoints, TransferInput,
    },
};
