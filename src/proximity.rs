// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geometric proximity metric.
//!
//! Reduces two position vectors to a scalar closeness measure: normalize
//! both, sum the unit vectors, and take the magnitude of the sum's
//! projection onto the x/y plane.  The metric is monotonic in the angular
//! separation of the two directions restricted to that plane — 2 when they
//! coincide, 0 when they oppose — and is agnostic about which bodies or
//! vector conventions the caller supplies.
//!
//! Only the first two components enter the magnitude and angle.  The
//! detection thresholds downstream are tuned against this projected
//! quantity; switching to the full 3-D magnitude changes event timing.

use super::error::DomainError;

/// Scalar closeness of two directions at one instant.
///
/// Transient: feeds the scanner's running comparison and is not retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityReading {
    /// Projected magnitude of the unit-vector sum, in `[0, 2]`.
    pub magnitude: f64,
    /// Quotient arctangent of the sum's y/x components, radians.
    pub angle: f64,
}

/// Normalize a vector to unit length.
///
/// A zero-length input has no direction; that is a [`DomainError`], not a
/// value to default.
pub fn unit(v: [f64; 3]) -> Result<[f64; 3], DomainError> {
    let mag = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if mag == 0.0 {
        return Err(DomainError::ZeroVector);
    }
    Ok([v[0] / mag, v[1] / mag, v[2] / mag])
}

/// Closeness of the directions of two position vectors.
///
/// Normalization makes the result invariant under positive scaling of
/// either input, so the metric reads direction only, never distance.
pub fn closeness(pos_a: [f64; 3], pos_b: [f64; 3]) -> Result<ProximityReading, DomainError> {
    let a = unit(pos_a)?;
    let b = unit(pos_b)?;
    let sum = [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
    Ok(ProximityReading {
        magnitude: (sum[0] * sum[0] + sum[1] * sum[1]).sqrt(),
        angle: (sum[1] / sum[0]).atan(),
    })
}
