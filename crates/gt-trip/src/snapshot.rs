//! Published progress value.

use gt_core::WaypointId;

use crate::TripWaypointInfo;

/// Everything a "next stop" panel needs, as of one `update_progress` call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripProgressSnapshot {
    /// Clamped leg index into the active (non-skipped) waypoints.
    pub leg_index: usize,
    /// 1-based stop number in the original plan, plus the manual offset.
    pub stop_number: u32,
    /// Stops in the original plan, plus the manual offset.
    pub total_stops: u32,

    pub waypoint:    TripWaypointInfo,
    pub waypoint_id: WaypointId,

    pub distance_to_next_m: f64,
    pub duration_to_next_s: f64,
    pub total_distance_m:   f64,
    pub total_duration_s:   f64,

    /// `distance_to_next_m` formatted for display ("850 m", "1.2 km").
    pub distance_text: String,
    /// `duration_to_next_s` formatted for display ("12 min").
    pub duration_text: String,

    /// Skipped by id plus the manual offset.
    pub skipped_count: u32,
    /// `true` when heading to the last active waypoint.
    pub is_final_leg: bool,
}
