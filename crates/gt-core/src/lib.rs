//! `gt-core` — foundational types for the `geotrack` live-position engine.
//!
//! This crate is a dependency of every other `gt-*` crate.  It has no `gt-*`
//! dependencies and performs no I/O; everything here is a pure value type or
//! a pure function.
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, haversine distance, bearing, interpolation     |
//! | [`projection`]  | `Viewport`, `ScreenOffset`, geo → screen projection        |
//! | [`format`]      | Human-readable distance and duration strings               |
//! | [`ids`]         | `EntityId`, `WaypointId`, `SubscriptionId`                 |
//! | [`time`]        | `Timestamp` (milliseconds on the caller's clock)           |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod format;
pub mod geo;
pub mod ids;
pub mod projection;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use format::{format_distance, format_duration};
pub use geo::{
    EARTH_RADIUS_M, GeoPoint, bearing_deg, distance_m, interpolate, interpolate_heading,
    normalize_heading,
};
pub use ids::{EntityId, SubscriptionId, WaypointId};
pub use projection::{
    EdgeIndicator, ScreenOffset, Viewport, coordinate_to_screen, edge_indicator,
    estimate_screen_position, meters_per_pixel,
};
pub use time::Timestamp;
