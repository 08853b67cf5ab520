//! Core error type.
//!
//! Downstream crates wrap `CoreError` as one variant of their own enum via
//! `#[from]`, so a coordinate rejected here surfaces unchanged at the
//! registry boundary.

use thiserror::Error;

/// Errors produced by `gt-core` validation helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Shorthand result type for `gt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
