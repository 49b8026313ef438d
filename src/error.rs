// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error types for syzygy detection.
//!
//! The crate never swallows errors and carries no retry logic: ephemeris
//! and geometry failures abort the current detection cycle and propagate
//! to the caller, which owns any retry/backoff policy.

use thiserror::Error;

use super::ephemeris::EphemerisError;

/// Result type for syzygy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the detection pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed scanner or source configuration.  Fatal at startup; never
    /// produced mid-cycle.
    #[error("configuration: {0}")]
    Config(String),

    /// An ephemeris query failed.  Aborts the current detection cycle;
    /// recoverable by the caller choosing a different time window.
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    /// A geometric precondition was violated.  Indicates malformed
    /// ephemeris output; never silently defaulted.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Geometric domain violations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainError {
    /// A zero-length position vector has no direction to normalize.
    #[error("cannot normalize a zero-length position vector")]
    ZeroVector,
}
