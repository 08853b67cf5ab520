//! `gt-trip` — waypoint progress for a navigation session.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`waypoint`] | `TripWaypointInfo`                                          |
//! | [`tracker`]  | `TripProgressTracker` — leg clamping, skip/restore by id    |
//! | [`snapshot`] | `TripProgressSnapshot` — published progress value           |
//! | [`listener`] | `TripProgressListener` — zero or more progress subscribers  |
//! | [`error`]    | `TripError`, `TripResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on waypoints and snapshots. |

pub mod error;
pub mod listener;
pub mod snapshot;
pub mod tracker;
pub mod waypoint;


pub use error::{TripError, TripResult};
pub use listener::TripProgressListener;
pub use snapshot::TripProgressSnapshot;
pub use tracker::TripProgressTracker;
pub use waypoint::TripWaypointInfo;
