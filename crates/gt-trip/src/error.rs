use gt_core::{CoreError, WaypointId};
use thiserror::Error;

/// Errors reported by the trip tracker.  The tracker is unchanged when one
/// is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripError {
    #[error("waypoint {0} is not part of the current trip")]
    UnknownWaypoint(WaypointId),

    #[error("waypoint {index}: {source}")]
    InvalidWaypoint {
        index:  usize,
        #[source]
        source: CoreError,
    },
}

pub type TripResult<T> = Result<T, TripError>;
