/////////////////////////////////////////////////////////////////////////////////////////////
//
// Converts flat parallel-array constraint records into the constraint data model.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Flat transfer records.
//!
//! Host applications usually hold constraints as columns. Each record here
//! borrows one slice per column together with the declared point count, and
//! [`BasicInput::from_transfer`] checks every column against that count before
//! copying anything.

use crate::{
    basic_input::BasicInput,
    error::TransferError,
    points::{EvaluationPoint, Inequality, Interface, Planar, Polarity, Tangent},
};

fn check_len(structure: &'static str, field: &'static str, expected: usize, slice: &[impl Copy]) -> Result<(), TransferError> {
    match slice.len() == expected {
        true => Ok(()),
        false => Err(TransferError::LengthMismatch {
            structure,
            field,
            expected,
            found: slice.len(),
        }),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InterfacePoints<'a> {
    pub count: usize,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub level: &'a [f64],
}

#[derive(Debug, Clone, Copy)]
pub struct InequalityPoints<'a> {
    pub count: usize,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub level: &'a [f64],
}

/// How planar orientations are encoded.
#[derive(Debug, Clone, Copy)]
pub enum PlanarOrientation<'a> {
    Normals {
        nx: &'a [f64],
        ny: &'a [f64],
        nz: &'a [f64],
    },
    /// Dip and strike in degrees, polarity codes as in [`Polarity::from`].
    DipStrike {
        dip: &'a [f64],
        strike: &'a [f64],
        polarity: &'a [i32],
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PlanarPoints<'a> {
    pub count: usize,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub orientation: PlanarOrientation<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TangentPoints<'a> {
    pub count: usize,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
    pub tx: &'a [f64],
    pub ty: &'a [f64],
    pub tz: &'a [f64],
}

#[derive(Debug, Clone, Copy)]
pub struct EvaluationPoints<'a> {
    pub count: usize,
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub z: &'a [f64],
}

/// The records making up one model. Missing records leave the collection empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferInput<'a> {
    pub interface: Option<InterfacePoints<'a>>,
    pub inequality: Option<InequalityPoints<'a>>,
    pub planar: Option<PlanarPoints<'a>>,
    pub tangent: Option<TangentPoints<'a>>,
    pub evaluation: Option<EvaluationPoints<'a>>,
}

macro_rules! check_columns {
    ($name:literal, $rec:expr, $($field:ident),+) => {
        $( check_len($name, stringify!($field), $rec.count, $rec.$field)?; )+
    };
}

impl BasicInput {
    /// Builds the constraint collections from flat records.
    ///
    /// Every column must hold exactly `count` entries; nothing is built otherwise.
    pub fn from_transfer(transfer: &TransferInput<'_>) -> Result<Self, TransferError> {
        if let Some(r) = &transfer.interface {
            check_columns!("InterfacePoints", r, x, y, z, level);
        }
        if let Some(r) = &transfer.inequality {
            check_columns!("InequalityPoints", r, x, y, z, level);
        }
        if let Some(r) = &transfer.planar {
            check_columns!("PlanarPoints", r, x, y, z);
            match r.orientation {
                PlanarOrientation::Normals { nx, ny, nz } => {
                    check_len("PlanarPoints", "nx", r.count, nx)?;
                    check_len("PlanarPoints", "ny", r.count, ny)?;
                    check_len("PlanarPoints", "nz", r.count, nz)?;
                }
                PlanarOrientation::DipStrike {
                    dip,
                    strike,
                    polarity,
                } => {
                    check_len("PlanarPoints", "dip", r.count, dip)?;
                    check_len("PlanarPoints", "strike", r.count, strike)?;
                    check_len("PlanarPoints", "polarity", r.count, polarity)?;
                }
            }
        }
        if let Some(r) = &transfer.tangent {
            check_columns!("TangentPoints", r, x, y, z, tx, ty, tz);
        }
        if let Some(r) = &transfer.evaluation {
            check_columns!("EvaluationPoints", r, x, y, z);
        }

        let mut input = BasicInput::new();

        if let Some(r) = &transfer.interface {
            input.interface = (0..r.count)
                .map(|i| Interface::new(r.x[i], r.y[i], r.z[i], r.level[i]))
                .collect();
        }
        if let Some(r) = &transfer.inequality {
            input.inequality = (0..r.count)
                .map(|i| Inequality::new(r.x[i], r.y[i], r.z[i], r.level[i]))
                .collect();
        }
        if let Some(r) = &transfer.planar {
            input.planar = (0..r.count)
                .map(|i| match r.orientation {
                    PlanarOrientation::Normals { nx, ny, nz } => {
                        Planar::new(r.x[i], r.y[i], r.z[i], [nx[i], ny[i], nz[i]])
                    }
                    PlanarOrientation::DipStrike {
                        dip,
                        strike,
                        polarity,
                    } => Planar::from_dip_strike(
                        r.x[i],
                        r.y[i],
                        r.z[i],
                        dip[i],
                        strike[i],
                        Polarity::from(polarity[i]),
                    ),
                })
                .collect();
        }
        if let Some(r) = &transfer.tangent {
            input.tangent = (0..r.count)
                .map(|i| Tangent::new(r.x[i], r.y[i], r.z[i], [r.tx[i], r.ty[i], r.tz[i]]))
                .collect();
        }
        if let Some(r) = &transfer.evaluation {
            input.evaluation_pts = (0..r.count)
                .map(|i| EvaluationPoint::new(r.x[i], r.y[i], r.z[i]))
                .collect();
        }

        Ok(input)
    }

    /// Field values at the evaluation points, `NaN` where not yet evaluated.
    pub fn evaluation_values(&self) -> Vec<f64> {
        self.evaluation_pts
            .iter()
            .map(|p| p.scalar_field.unwrap_or(f64::NAN))
            .collect()
    }

    /// Field gradients at the evaluation points, `NaN` where not yet evaluated.
    pub fn evaluation_gradients(&self) -> Vec<[f64; 3]> {
        self.evaluation_pts
            .iter()
            .map(|p| p.vector_field.unwrap_or([f64::NAN; 3]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    #[test]
    fn records_fill_collections() {
        let xs = [0.0, 1.0];
        let transfer = TransferInput {
            interface: Some(InterfacePoints {
                count: 2,
                x: &xs,
                y: &[0.0, 0.0],
                z: &[0.0, 0.0],
                level: &[3.0, 3.0],
            }),
            planar: Some(PlanarPoints {
                count: 1,
                x: &[0.5],
                y: &[0.0],
                z: &[0.0],
                orientation: PlanarOrientation::DipStrike {
                    dip: &[0.0],
                    strike: &[0.0],
                    polarity: &[1],
                },
            }),
            ..Default::default()
        };
        let input = BasicInput::from_transfer(&transfer).unwrap();
        assert!(input.interface.len() == 2);
        assert!(input.interface[1].level == 3.0);
        assert!(input.planar[0].normal == [0.0, 0.0, 1.0]);
        assert!(input.tangent.is_empty());
        assert!(input.evaluation_pts.is_empty());
    }

    #[test]
    fn short_column_is_reported() {
        let transfer = TransferInput {
            tangent: Some(TangentPoints {
                count: 2,
                x: &[0.0, 1.0],
                y: &[0.0, 1.0],
                z: &[0.0, 1.0],
                tx: &[1.0, 1.0],
                ty: &[0.0],
                tz: &[0.0, 0.0],
            }),
            ..Default::default()
        };
        assert!(
            BasicInput::from_transfer(&transfer).unwrap_err()
                == TransferError::LengthMismatch {
                    structure: "TangentPoints",
                    field: "ty",
                    expected: 2,
                    found: 1,
                }
        );
    }

    #[test]
    fn unevaluated_points_report_nan() {
        let transfer = TransferInput {
            evaluation: Some(EvaluationPoints {
                count: 1,
                x: &[1.0],
                y: &[2.0],
                z: &[3.0],
            }),
            ..Default::default()
        };
        let input = BasicInput::from_transfer(&transfer).unwrap();
        assert!(input.evaluation_values()[0].is_nan());
        assert!(input.evaluation_gradients()[0][2].is_nan());
    }
}
