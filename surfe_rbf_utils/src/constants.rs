/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines angle conversion factors and numeric thresholds shared by the kernel families.
//
// Created on: 15 Nov 2025     Author: Daniel Owen 
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License. 
//
/////////////////////////////////////////////////////////////////////////////////////////////

/// Multiplier converting degrees to radians.
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Multiplier converting radians to degrees.
pub const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Separation below which two locations are treated as coincident when
/// evaluating kernel derivatives that are singular at `r = 0`.
pub const COINCIDENT_RADIUS: f64 = 1e-12;

/// Smallest relative axis scale used when building a global anisotropy tensor.
///
/// Orientation data with a single dominant normal would otherwise collapse
/// the in-plane axes to zero length.
pub const ANISOTROPY_RATIO_FLOOR: f64 = 0.1;
