/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the error types reported by the modeling pipeline, the solver and the marshaling layer.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Error types for the modeling pipeline.
//!
//! Every pipeline stage returns a [`ModelingResult`]. A failure records the
//! [`Stage`] that failed together with an [`ErrorKind`] describing why, so a
//! caller can tell "stage N failed" apart from an opaque boolean.

use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// The ordered stages of the modeling pipeline, plus the companion operations
/// that run on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    ProcessInputData,
    GetMethodParameters,
    SetupBasisFunctions,
    SetupSystemSolver,
    EvaluateScalarInterpolant,
    UpdateInterfaceIsoValues,
    GreedyRefinement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ProcessInputData => "process_input_data",
            Stage::GetMethodParameters => "get_method_parameters",
            Stage::SetupBasisFunctions => "setup_basis_functions",
            Stage::SetupSystemSolver => "setup_system_solver",
            Stage::EvaluateScalarInterpolant => "evaluate_scalar_interpolant",
            Stage::UpdateInterfaceIsoValues => "update_interface_iso_values",
            Stage::GreedyRefinement => "greedy_refinement",
        };
        f.write_str(name)
    }
}

/// Broad classes of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing prerequisite state or size mismatches between related collections.
    Structural,
    /// A feature was requested without the data it depends on.
    Configuration,
    /// The input cannot produce a meaningful model.
    DegenerateInput,
}

/// Failures when splitting the interpolation matrix into its equality block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The equality buffer has no rows.
    EmptyEqualityBuffer,
    /// The equality buffer has more rows than the interpolation matrix.
    EqualityLargerThanSystem { equality_rows: usize, system_rows: usize },
    /// The equality buffer and interpolation matrix have different widths.
    ColumnMismatch { equality_cols: usize, system_cols: usize },
    /// `rows(full) - rows(equality)` disagrees with the tracked inequality count.
    InequalityCountMismatch { implied: usize, tracked: usize },
}

impl fmt::Display for PartitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionError::EmptyEqualityBuffer => write!(f, "equality matrix has no rows"),
            PartitionError::EqualityLargerThanSystem {
                equality_rows,
                system_rows,
            } => write!(
                f,
                "equality matrix has {} rows but the interpolation matrix only has {}",
                equality_rows, system_rows
            ),
            PartitionError::ColumnMismatch {
                equality_cols,
                system_cols,
            } => write!(
                f,
                "equality matrix has {} columns, interpolation matrix has {}",
                equality_cols, system_cols
            ),
            PartitionError::InequalityCountMismatch { implied, tracked } => write!(
                f,
                "matrix shapes imply {} inequality rows but {} inequality constraints are tracked",
                implied, tracked
            ),
        }
    }
}

impl Error for PartitionError {}

/// Failures reported by a [`crate::SystemSolver`].
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The problem arrays disagree in size.
    ShapeMismatch { what: &'static str, expected: usize, found: usize },
    /// The factorised system produced non-finite weights.
    Singular,
    /// Bounded rows could not all be satisfied after every row was activated.
    Infeasible { violated: usize },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", what, expected, found),
            SolverError::Singular => write!(f, "interpolation system is singular"),
            SolverError::Infeasible { violated } => {
                write!(f, "{} bounded constraints remain violated", violated)
            }
        }
    }
}

impl Error for SolverError {}

/// The reason a stage failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// No constraint data is available for the requested model.
    NoInputData,
    /// A constraint record is malformed.
    InvalidInput { reason: String },
    /// The model type needs constraint data that was not supplied.
    MissingData { what: &'static str },
    /// A previous stage has not produced its output yet.
    MissingPrerequisite { what: &'static str },
    /// The solved weight vector is empty.
    EmptyWeights,
    /// Two related collections disagree in size.
    CountMismatch { what: &'static str, expected: usize, found: usize },
    /// A modified basis was requested without grouped interface data.
    ModifiedBasisWithoutInterfaces,
    /// Kernel construction parameters are structurally invalid.
    InvalidKernel { reason: &'static str },
    /// The polynomial order is below what the kernel needs.
    PolynomialOrderTooLow { minimum: i32, requested: i32 },
    /// The assembled system has no constraint rows.
    NoConstraints,
    /// Greedy refinement requested with zero interface and gradient slack.
    ZeroSlack,
    Partition(PartitionError),
    Solver(SolverError),
}

impl ErrorKind {
    /// Classifies the failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::MissingPrerequisite { .. }
            | ErrorKind::EmptyWeights
            | ErrorKind::CountMismatch { .. }
            | ErrorKind::Partition(_) => ErrorCategory::Structural,
            ErrorKind::MissingData { .. }
            | ErrorKind::ModifiedBasisWithoutInterfaces
            | ErrorKind::InvalidKernel { .. }
            | ErrorKind::PolynomialOrderTooLow { .. }
            | ErrorKind::NoConstraints => ErrorCategory::Configuration,
            ErrorKind::NoInputData
            | ErrorKind::InvalidInput { .. }
            | ErrorKind::ZeroSlack
            | ErrorKind::Solver(_) => ErrorCategory::DegenerateInput,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NoInputData => write!(f, "no constraint data"),
            ErrorKind::InvalidInput { reason } => write!(f, "invalid input: {}", reason),
            ErrorKind::MissingData { what } => write!(f, "missing {}", what),
            ErrorKind::MissingPrerequisite { what } => write!(f, "{} has not been set up", what),
            ErrorKind::EmptyWeights => write!(f, "interpolant has no weights"),
            ErrorKind::CountMismatch {
                what,
                expected,
                found,
            } => write!(f, "{}: expected {}, found {}", what, expected, found),
            ErrorKind::ModifiedBasisWithoutInterfaces => {
                write!(f, "modified basis requires grouped interface points")
            }
            ErrorKind::InvalidKernel { reason } => write!(f, "invalid kernel: {}", reason),
            ErrorKind::PolynomialOrderTooLow { minimum, requested } => write!(
                f,
                "polynomial order {} is below the kernel minimum of {}",
                requested, minimum
            ),
            ErrorKind::NoConstraints => write!(f, "system has no constraint rows"),
            ErrorKind::ZeroSlack => {
                write!(f, "greedy refinement needs non-zero interface or gradient slack")
            }
            ErrorKind::Partition(e) => write!(f, "partitioning interpolation matrix: {}", e),
            ErrorKind::Solver(e) => write!(f, "solving interpolation system: {}", e),
        }
    }
}

/// A pipeline failure, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelingError {
    pub stage: Stage,
    pub kind: ErrorKind,
}

impl ModelingError {
    pub fn new(stage: Stage, kind: ErrorKind) -> Self {
        Self { stage, kind }
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for ModelingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.kind)
    }
}

impl Error for ModelingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::Partition(e) => Some(e),
            ErrorKind::Solver(e) => Some(e),
            _ => None,
        }
    }
}

/// Convenience alias for results returned by the pipeline.
pub type ModelingResult<T> = Result<T, ModelingError>;

/// Failures while marshaling flat transfer arrays into the data model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// A parallel array is shorter or longer than the declared count.
    LengthMismatch {
        structure: &'static str,
        field: &'static str,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::LengthMismatch {
                structure,
                field,
                expected,
                found,
            } => write!(
                f,
                "{}.{} has {} entries, expected {}",
                structure, field, found, expected
            ),
        }
    }
}

impl Error for TransferError {}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn error_reports_failing_stage() {
        let err = ModelingError::new(Stage::SetupSystemSolver, ErrorKind::EmptyWeights);
        assert!(err.to_string().starts_with("setup_system_solver failed"));
        assert!(err.category() == ErrorCategory::Structural);
    }

    #[test]
    fn solver_errors_expose_source() {
        let err = ModelingError::new(
            Stage::SetupSystemSolver,
            ErrorKind::Solver(SolverError::Singular),
        );
        assert!(err.source().is_some());
        assert!(err.category() == ErrorCategory::DegenerateInput);
    }
}
