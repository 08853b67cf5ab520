use gt_core::{CoreError, EntityId, Timestamp};
use thiserror::Error;

/// Errors reported by the registry.  All of them are local and recoverable:
/// the registry state is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("update for {id} at {timestamp} is not newer than last update {last}")]
    RejectedStaleUpdate {
        id:        EntityId,
        timestamp: Timestamp,
        last:      Timestamp,
    },

    #[error("entity {0} is not tracked")]
    UnknownEntity(EntityId),

    #[error(transparent)]
    InvalidCoordinate(#[from] CoreError),

    #[error("invalid tracking configuration: {0}")]
    ConfigurationInvalid(#[from] ConfigError),
}

/// A single violated constraint in a [`TrackingConfig`][crate::TrackingConfig].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("{lower} ({lower_ms} ms) must not exceed {upper} ({upper_ms} ms)")]
    ThresholdOrder {
        lower:    &'static str,
        lower_ms: u64,
        upper:    &'static str,
        upper_ms: u64,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

pub type TrackResult<T> = Result<T, TrackError>;
