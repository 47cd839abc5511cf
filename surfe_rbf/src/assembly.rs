/////////////////////////////////////////////////////////////////////////////////////////////
//
// Assembles constraint rows and the interpolation matrix, and partitions out the equality block.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # assembly
//!
//! Turns the constraint collections into rows of the interpolation system.
//!
//! Bounded rows come first and equality rows trail, so the equality block of
//! the interpolation matrix is always its last `n_equality` rows. Each row
//! carries the functional it applies, its target and where it came from.

use crate::{
    basic_input::BasicInput,
    basic_parameters::BasicParameters,
    basis::{BasisFunction, Functional},
    error::{ErrorKind, PartitionError},
    model_config::{ModelParameters, ModelType},
    polynomials::PolynomialBasis,
};
use faer::{Mat, MatRef};
use rayon::prelude::*;

/// What a row must satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowTarget {
    Equality(f64),
    /// `lower <= L s <= upper`, with infinite sides left open.
    Bounded { lower: f64, upper: f64 },
}

/// Which constraint produced a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    Interface { group: usize, member: usize },
    Planar { index: usize, axis: usize },
    Tangent(usize),
    Inequality(usize),
    /// Ordering between horizon `lower` and the one above it.
    Ordering { lower: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintRow {
    pub functional: Functional,
    pub target: RowTarget,
    pub origin: RowOrigin,
}

impl ConstraintRow {
    fn new(functional: Functional, target: RowTarget, origin: RowOrigin) -> Self {
        Self {
            functional,
            target,
            origin,
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self.target, RowTarget::Bounded { .. })
    }
}

const AXES: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Builds every constraint row, bounded rows first.
///
/// Fails with [`ErrorKind::CountMismatch`] if the rows produced disagree with
/// the counts in `basic_parameters`.
pub fn assemble_constraints(
    input: &BasicInput,
    params: &ModelParameters,
    basic_parameters: &BasicParameters,
    basis: &BasisFunction,
) -> Result<Vec<ConstraintRow>, ErrorKind> {
    let mut bounded = Vec::new();
    let mut equality = Vec::new();

    let interface_bounded = params.interface_uncertainty > 0.0;
    let angular_bounded = params.angular_uncertainty > 0.0;
    let increments = params.model_type.uses_increments();

    let mut push = |row: ConstraintRow| match row.is_bounded() {
        true => bounded.push(row),
        false => equality.push(row),
    };

    if params.use_interface_data && params.model_type != ModelType::VectorField {
        for (g, group) in input.interface_point_lists.iter().enumerate() {
            for (m, point) in group.iter().enumerate() {
                let Some(functional) = basis.interface_functional(point.point.coords(), g, m) else {
                    continue;
                };
                // Increments are measured from the group reference, so their target is zero.
                let centre = match increments {
                    true => 0.0,
                    false => point.level,
                };
                let target = match interface_bounded {
                    true => RowTarget::Bounded {
                        lower: centre + point.level_bounds[0],
                        upper: centre + point.level_bounds[1],
                    },
                    false => RowTarget::Equality(centre),
                };
                push(ConstraintRow::new(
                    functional,
                    target,
                    RowOrigin::Interface { group: g, member: m },
                ));
            }
        }
    }

    if params.use_planar_data {
        for (i, planar) in input.planar.iter().enumerate() {
            for (axis, direction) in AXES.iter().enumerate() {
                let target = match angular_bounded {
                    true => RowTarget::Bounded {
                        lower: planar.normal_bounds[axis][0],
                        upper: planar.normal_bounds[axis][1],
                    },
                    false => RowTarget::Equality(planar.normal[axis]),
                };
                push(ConstraintRow::new(
                    Functional::Directional {
                        at: planar.point.coords(),
                        direction: *direction,
                    },
                    target,
                    RowOrigin::Planar { index: i, axis },
                ));
            }
        }
    }

    if params.use_tangent_data {
        for (i, tangent) in input.tangent.iter().enumerate() {
            let target = match angular_bounded {
                true => {
                    let tolerance = tangent.angle_tolerance();
                    RowTarget::Bounded {
                        lower: tangent.inner_product_constraint - tolerance,
                        upper: tangent.inner_product_constraint + tolerance,
                    }
                }
                false => RowTarget::Equality(tangent.inner_product_constraint),
            };
            push(ConstraintRow::new(
                Functional::Directional {
                    at: tangent.point.coords(),
                    direction: tangent.tangent,
                },
                target,
                RowOrigin::Tangent(i),
            ));
        }
    }

    if params.use_inequality_data && params.model_type != ModelType::VectorField {
        for (i, inequality) in input.inequality.iter().enumerate() {
            let at = inequality.point.coords();
            let row = match increments {
                true => {
                    let Some(reference) = input
                        .interface_group_of(inequality.level)
                        .and_then(|g| basis.group_reference(g))
                    else {
                        continue;
                    };
                    ConstraintRow::new(
                        Functional::Increment { at, reference },
                        RowTarget::Bounded {
                            lower: 0.0,
                            upper: f64::INFINITY,
                        },
                        RowOrigin::Inequality(i),
                    )
                }
                false => {
                    let upper = match basic_parameters.restricted_range {
                        true => input.next_level_above(inequality.level).unwrap_or(f64::INFINITY),
                        false => f64::INFINITY,
                    };
                    ConstraintRow::new(
                        Functional::Value(at),
                        RowTarget::Bounded {
                            lower: inequality.level,
                            upper,
                        },
                        RowOrigin::Inequality(i),
                    )
                }
            };
            push(row);
        }
    }

    if params.model_type == ModelType::StratigraphicHorizons && params.use_interface_data {
        for lower in 0..input.interface_point_lists.len().saturating_sub(1) {
            let (Some(reference), Some(at)) =
                (basis.group_reference(lower), basis.group_reference(lower + 1))
            else {
                continue;
            };
            push(ConstraintRow::new(
                Functional::Increment { at, reference },
                RowTarget::Bounded {
                    lower: params.min_stratigraphic_thickness,
                    upper: f64::INFINITY,
                },
                RowOrigin::Ordering { lower },
            ));
        }
    }

    if bounded.len() != basic_parameters.n_inequality {
        return Err(ErrorKind::CountMismatch {
            what: "bounded constraint rows",
            expected: basic_parameters.n_inequality,
            found: bounded.len(),
        });
    }
    if equality.len() != basic_parameters.n_equality {
        return Err(ErrorKind::CountMismatch {
            what: "equality constraint rows",
            expected: basic_parameters.n_equality,
            found: equality.len(),
        });
    }

    bounded.append(&mut equality);
    Ok(bounded)
}

/// Builds the `R × (R + m)` matrix `[A | P]` for `R` rows and `m` drift terms.
pub fn build_interpolation_matrix(
    rows: &[ConstraintRow],
    basis: &BasisFunction,
    poly: &PolynomialBasis,
) -> Mat<f64> {
    let n = rows.len();
    let m = poly.n_terms();

    let entries: Vec<Vec<f64>> = rows
        .par_iter()
        .map(|lhs| {
            let mut row: Vec<f64> = rows
                .iter()
                .map(|rhs| basis.cross(&lhs.functional, &rhs.functional))
                .collect();
            row.extend(poly.apply(&lhs.functional));
            row
        })
        .collect();

    Mat::from_fn(n, n + m, |i, j| entries[i][j])
}

/// Copies the trailing equality rows of `full` into `equality_buffer`.
///
/// The buffer must already have the equality block's shape, and the rows it
/// leaves uncovered must match `n_inequality`.
pub fn get_equality_matrix(
    full: MatRef<'_, f64>,
    equality_buffer: &mut Mat<f64>,
    n_inequality: usize,
) -> Result<(), PartitionError> {
    let eq_rows = equality_buffer.nrows();
    if eq_rows == 0 {
        return Err(PartitionError::EmptyEqualityBuffer);
    }
    if eq_rows > full.nrows() {
        return Err(PartitionError::EqualityLargerThanSystem {
            equality_rows: eq_rows,
            system_rows: full.nrows(),
        });
    }
    if equality_buffer.ncols() != full.ncols() {
        return Err(PartitionError::ColumnMismatch {
            equality_cols: equality_buffer.ncols(),
            system_cols: full.ncols(),
        });
    }
    let implied = full.nrows() - eq_rows;
    if implied != n_inequality {
        return Err(PartitionError::InequalityCountMismatch {
            implied,
            tracked: n_inequality,
        });
    }

    equality_buffer
        .as_mut()
        .copy_from(full.subrows(n_inequality, eq_rows));
    Ok(())
}

/// Equality targets of the trailing rows.
pub fn equality_values(rows: &[ConstraintRow]) -> Vec<f64> {
    rows.iter()
        .filter_map(|r| match r.target {
            RowTarget::Equality(v) => Some(v),
            RowTarget::Bounded { .. } => None,
        })
        .collect()
}

/// `[lower, upper]` bounds of the leading rows.
pub fn inequality_bounds(rows: &[ConstraintRow]) -> Vec<[f64; 2]> {
    rows.iter()
        .filter_map(|r| match r.target {
            RowTarget::Bounded { lower, upper } => Some([lower, upper]),
            RowTarget::Equality(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        basis::{ModifiedKernel, create_rbf_kernel},
        model_config::RbfKernelType,
        points::{Inequality, Interface, Planar},
    };
    use equator::assert;
    use faer::utils::approx::*;

    fn sample_system(rows: usize, cols: usize) -> Mat<f64> {
        Mat::from_fn(rows, cols, |i, j| (i * cols + j) as f64)
    }

    #[test]
    fn partition_copies_trailing_rows() {
        let full = sample_system(5, 7);
        let mut eq = Mat::<f64>::zeros(3, 7);
        get_equality_matrix(full.as_ref(), &mut eq, 2).unwrap();

        let approx_eq = CwiseMat(ApproxEq::eps());
        assert!(&eq ~ &full.subrows(2, 3).to_owned());
    }

    #[test]
    fn partition_accepts_whole_system_as_equality() {
        let full = sample_system(4, 4);
        let mut eq = Mat::<f64>::zeros(4, 4);
        assert!(get_equality_matrix(full.as_ref(), &mut eq, 0).is_ok());
    }

    #[test]
    fn partition_rejects_bad_shapes() {
        let full = sample_system(4, 6);

        let mut empty = Mat::<f64>::zeros(0, 6);
        assert!(
            get_equality_matrix(full.as_ref(), &mut empty, 4)
                == Err(PartitionError::EmptyEqualityBuffer)
        );

        let mut too_tall = Mat::<f64>::zeros(5, 6);
        assert!(
            get_equality_matrix(full.as_ref(), &mut too_tall, 0)
                == Err(PartitionError::EqualityLargerThanSystem {
                    equality_rows: 5,
                    system_rows: 4
                })
        );

        let mut narrow = Mat::<f64>::zeros(2, 5);
        assert!(
            get_equality_matrix(full.as_ref(), &mut narrow, 2)
                == Err(PartitionError::ColumnMismatch {
                    equality_cols: 5,
                    system_cols: 6
                })
        );

        let mut eq = Mat::<f64>::zeros(2, 6);
        assert!(
            get_equality_matrix(full.as_ref(), &mut eq, 1)
                == Err(PartitionError::InequalityCountMismatch {
                    implied: 2,
                    tracked: 1
                })
        );
    }

    fn horizon_input() -> BasicInput {
        let mut input = BasicInput::new();
        input.interface = vec![
            Interface::new(0.0, 0.0, 0.0, 0.0),
            Interface::new(1.0, 0.0, 0.0, 0.0),
            Interface::new(0.0, 0.0, 1.0, 1.0),
            Interface::new(1.0, 0.0, 1.0, 1.0),
        ];
        input.planar = vec![Planar::new(0.5, 0.0, 0.5, [0.0, 0.0, 1.0])];
        input.inequality = vec![Inequality::new(0.5, 0.0, 2.0, 1.0)];
        input.get_interface_data();
        input
    }

    #[test]
    fn bounded_rows_lead_and_equality_rows_trail() {
        let input = horizon_input();
        let params = ModelParameters::builder(ModelType::SingleSurface)
            .use_data(true, true, false, true)
            .use_restricted_range(true)
            .build();
        let bp = BasicParameters::derive(&input, &params).unwrap();
        let kernel = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        let basis = BasisFunction::Standard(kernel);

        let rows = assemble_constraints(&input, &params, &bp, &basis).unwrap();
        assert!(rows.len() == bp.n_constraints);
        assert!(rows[0].is_bounded());
        assert!(rows[1..].iter().all(|r| !r.is_bounded()));
        // Level 1 is the highest level, so the inequality stays open above.
        assert!(
            rows[0].target
                == RowTarget::Bounded {
                    lower: 1.0,
                    upper: f64::INFINITY
                }
        );

        let poly = PolynomialBasis::new(bp.polynomial_degree, bp.include_constant, &[[0.0; 3], [1.0; 3]]);
        let matrix = build_interpolation_matrix(&rows, &basis, &poly);
        assert!(matrix.nrows() == rows.len());
        assert!(matrix.ncols() == rows.len() + poly.n_terms());
        assert!(equality_values(&rows).len() == bp.n_equality);
        assert!(inequality_bounds(&rows).len() == bp.n_inequality);
    }

    #[test]
    fn stratigraphic_rows_use_group_references() {
        let input = horizon_input();
        let params = ModelParameters::builder(ModelType::StratigraphicHorizons)
            .use_data(true, true, false, true)
            .min_stratigraphic_thickness(0.5)
            .build();
        let bp = BasicParameters::derive(&input, &params).unwrap();
        let kernel = create_rbf_kernel(RbfKernelType::Cubic, false, 1.0, &[]).unwrap();
        let basis =
            BasisFunction::Modified(ModifiedKernel::new(kernel, &input.interface_point_lists).unwrap());

        let rows = assemble_constraints(&input, &params, &bp, &basis).unwrap();
        assert!(rows.len() == 7);
        let ordering = rows
            .iter()
            .find(|r| matches!(r.origin, RowOrigin::Ordering { .. }))
            .unwrap();
        assert!(
            ordering.functional
                == Functional::Increment {
                    at: [0.0, 0.0, 1.0],
                    reference: [0.0, 0.0, 0.0]
                }
        );
        assert!(
            ordering.target
                == RowTarget::Bounded {
                    lower: 0.5,
                    upper: f64::INFINITY
                }
        );
    }
}
