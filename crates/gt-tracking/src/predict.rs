//! Dead-reckoning between real updates.
//!
//! Given the last two real samples `(previous, t₀)` and `(current, t₁)` and
//! an evaluation instant `now`:
//!
//! ```text
//! dt      = t₁ - t₀
//! elapsed = now - t₁
//! t       = elapsed / dt
//! point   = interpolate(previous, current, t)
//! ```
//!
//! `t` runs from 0 to 1 over one sampling interval after the update and
//! keeps growing past 1 (extrapolating along the last leg) until `elapsed`
//! exceeds the prediction window, at which point the last real position is
//! returned.  There is no map matching; this is straight-line motion in
//! lat/lon space.

use gt_core::{GeoPoint, Timestamp, interpolate, interpolate_heading};

use crate::{DynamicEntity, TrackingConfig};

/// A predicted render position.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prediction {
    pub point:       GeoPoint,
    pub heading_deg: Option<f64>,
    /// Interpolation parameter used; `1.0` means "the current point".
    pub t:           f64,
    /// The instant the prediction was made for.
    pub at:          Timestamp,
}

/// Predict where `entity` is at `now`.
///
/// Returns `None` when prediction is disabled or the entity has only one
/// sample.  Degenerate timing (two samples with the same timestamp, or
/// `now` past the prediction window) yields the current point unchanged.
pub fn predict(entity: &DynamicEntity, now: Timestamp, config: &TrackingConfig) -> Option<Prediction> {
    if !config.enable_prediction {
        return None;
    }
    let previous      = entity.previous_point?;
    let previous_time = entity.previous_updated?;

    let dt      = entity.last_updated.since(previous_time);
    let elapsed = now.since(entity.last_updated);

    if dt == 0 || elapsed > config.prediction_window_ms {
        return Some(Prediction {
            point:       entity.current_point,
            heading_deg: entity.heading_deg,
            t:           1.0,
            at:          now,
        });
    }

    let t = elapsed as f64 / dt as f64;
    let heading_deg = match (entity.previous_heading_deg, entity.heading_deg) {
        (Some(from), Some(to)) => Some(interpolate_heading(from, to, t.min(1.0))),
        (_, current) => current,
    };

    Some(Prediction {
        point: interpolate(previous, entity.current_point, t),
        heading_deg,
        t,
        at: now,
    })
}
