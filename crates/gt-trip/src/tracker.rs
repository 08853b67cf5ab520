//! The `TripProgressTracker`.

use gt_core::{SubscriptionId, WaypointId, format_distance, format_duration};
use tracing::{debug, trace, warn};

use crate::{TripError, TripProgressListener, TripProgressSnapshot, TripResult, TripWaypointInfo};

#[derive(Clone, Debug)]
struct Stop {
    id:      WaypointId,
    info:    TripWaypointInfo,
    skipped: bool,
}

/// Tracks progress along an ordered list of waypoints for one navigation
/// session and publishes a [`TripProgressSnapshot`] on every progress
/// report.
///
/// Waypoints get a [`WaypointId`] when the list is set; skip and restore
/// work on those ids.  Skipped waypoints are left out of leg indexing, and
/// a restored waypoint returns to its original place in the sequence.  Ids
/// are never reused, so an id from a replaced list reports
/// [`TripError::UnknownWaypoint`].
///
/// # Stop numbering
///
/// ```text
/// stop_number = original_index + 1 + manual_offset
/// total_stops = waypoint_count     + manual_offset
/// ```
///
/// `manual_offset` is adjusted with
/// [`increment_skipped_count`][Self::increment_skipped_count] /
/// [`decrement_skipped_count`][Self::decrement_skipped_count] by hosts that
/// drop stops from the route themselves before calling
/// [`set_waypoints`][Self::set_waypoints].
pub struct TripProgressTracker {
    stops:             Vec<Stop>,
    next_waypoint:     WaypointId,
    manual_offset:     u32,
    listeners:         Vec<(SubscriptionId, Box<dyn TripProgressListener>)>,
    next_subscription: SubscriptionId,
    last:              Option<TripProgressSnapshot>,
}

impl Default for TripProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TripProgressTracker {
    pub fn new() -> Self {
        Self {
            stops:             Vec::new(),
            next_waypoint:     WaypointId(0),
            manual_offset:     0,
            listeners:         Vec::new(),
            next_subscription: SubscriptionId(0),
            last:              None,
        }
    }

    // ── Waypoints ─────────────────────────────────────────────────────────

    /// Replace the trip.  Skips, the manual offset and the last snapshot
    /// are reset.  An empty list ends the trip.
    ///
    /// # Errors
    ///
    /// [`TripError::InvalidWaypoint`] if any point is out of range; the
    /// previous trip is kept.
    pub fn set_waypoints<I>(&mut self, waypoints: I) -> TripResult<Vec<WaypointId>>
    where
        I: IntoIterator<Item = TripWaypointInfo>,
    {
        let waypoints: Vec<TripWaypointInfo> = waypoints.into_iter().collect();
        for (index, wp) in waypoints.iter().enumerate() {
            if let Err(source) = wp.point.validate() {
                warn!(index, error = %source, "rejected waypoint list");
                return Err(TripError::InvalidWaypoint { index, source });
            }
        }

        let mut ids = Vec::with_capacity(waypoints.len());
        self.stops = waypoints
            .into_iter()
            .map(|info| {
                let id = self.next_waypoint;
                self.next_waypoint = id.next();
                ids.push(id);
                Stop { id, info, skipped: false }
            })
            .collect();
        self.manual_offset = 0;
        self.last = None;

        debug!(waypoints = self.stops.len(), "trip waypoints set");
        let active = self.active_len();
        self.notify(|l| l.on_waypoints_changed(active));
        Ok(ids)
    }

    /// End the trip.
    pub fn clear(&mut self) {
        let _ = self.set_waypoints(Vec::new());
    }

    /// Leave `id` out of leg indexing.  Returns `false` if it was already
    /// skipped.
    pub fn skip_waypoint(&mut self, id: WaypointId) -> TripResult<bool> {
        self.set_skipped(id, true)
    }

    /// Put a skipped waypoint back at its original position.  Returns
    /// `false` if it was not skipped.
    pub fn restore_waypoint(&mut self, id: WaypointId) -> TripResult<bool> {
        self.set_skipped(id, false)
    }

    pub fn is_skipped(&self, id: WaypointId) -> TripResult<bool> {
        self.stop(id).map(|s| s.skipped)
    }

    pub fn waypoint(&self, id: WaypointId) -> Option<&TripWaypointInfo> {
        self.stop(id).ok().map(|s| &s.info)
    }

    /// Non-skipped waypoints in trip order.
    pub fn active_waypoints(&self) -> impl Iterator<Item = (WaypointId, &TripWaypointInfo)> + '_ {
        self.stops.iter().filter(|s| !s.skipped).map(|s| (s.id, &s.info))
    }

    /// Every waypoint in trip order, skipped or not.
    pub fn all_waypoints(&self) -> impl Iterator<Item = (WaypointId, &TripWaypointInfo)> + '_ {
        self.stops.iter().map(|s| (s.id, &s.info))
    }

    pub fn active_len(&self) -> usize {
        self.stops.iter().filter(|s| !s.skipped).count()
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    // ── Manual offset ─────────────────────────────────────────────────────

    pub fn increment_skipped_count(&mut self) {
        self.manual_offset = self.manual_offset.saturating_add(1);
    }

    /// Never goes below zero.
    pub fn decrement_skipped_count(&mut self) {
        self.manual_offset = self.manual_offset.saturating_sub(1);
    }

    #[inline]
    pub fn manual_offset(&self) -> u32 {
        self.manual_offset
    }

    // ── Progress ──────────────────────────────────────────────────────────

    /// Record progress towards the waypoint at `leg_index` among the active
    /// waypoints and publish the resulting snapshot to every listener.
    ///
    /// `leg_index` is clamped into range.  Non-finite or negative distances
    /// and durations are treated as zero.  Returns `None`, publishing
    /// nothing, when there are no active waypoints.
    pub fn update_progress(
        &mut self,
        leg_index: i64,
        distance_to_next_m: f64,
        duration_to_next_s: f64,
        total_distance_m: f64,
        total_duration_s: f64,
    ) -> Option<TripProgressSnapshot> {
        let active: Vec<(usize, &Stop)> =
            self.stops.iter().enumerate().filter(|(_, s)| !s.skipped).collect();
        let Some(last) = active.len().checked_sub(1) else {
            debug!(leg_index, "progress ignored: no active waypoints");
            return None;
        };

        let leg = usize::try_from(leg_index.max(0)).map_or(last, |l| l.min(last));
        if i64::try_from(leg).ok() != Some(leg_index) {
            debug!(requested = leg_index, clamped = leg, "leg index clamped");
        }
        let (original_index, stop) = active[leg];

        let distance_to_next_m = non_negative(distance_to_next_m);
        let duration_to_next_s = non_negative(duration_to_next_s);
        let skipped_by_id = to_u32(self.stops.len() - active.len());

        let snapshot = TripProgressSnapshot {
            leg_index:     leg,
            stop_number:   to_u32(original_index + 1).saturating_add(self.manual_offset),
            total_stops:   to_u32(self.stops.len()).saturating_add(self.manual_offset),
            waypoint:      stop.info.clone(),
            waypoint_id:   stop.id,
            distance_to_next_m,
            duration_to_next_s,
            total_distance_m: non_negative(total_distance_m),
            total_duration_s: non_negative(total_duration_s),
            distance_text: format_distance(distance_to_next_m),
            duration_text: format_duration(duration_to_next_s),
            skipped_count: skipped_by_id.saturating_add(self.manual_offset),
            is_final_leg:  leg == last,
        };

        trace!(
            leg = snapshot.leg_index,
            stop = snapshot.stop_number,
            waypoint = %snapshot.waypoint_id,
            "trip progress"
        );
        self.notify(|l| l.on_progress(&snapshot));
        self.last = Some(snapshot.clone());
        Some(snapshot)
    }

    /// The most recently published snapshot, cleared when the waypoints
    /// are replaced.
    pub fn last_snapshot(&self) -> Option<&TripProgressSnapshot> {
        self.last.as_ref()
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    pub fn subscribe<L: TripProgressListener + 'static>(&mut self, listener: L) -> SubscriptionId {
        self.subscribe_boxed(Box::new(listener))
    }

    pub fn subscribe_boxed(&mut self, listener: Box<dyn TripProgressListener>) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription = id.next();
        self.listeners.push((id, listener));
        id
    }

    /// Returns `false` if the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn stop(&self, id: WaypointId) -> TripResult<&Stop> {
        self.stops
            .iter()
            .find(|s| s.id == id)
            .ok_or(TripError::UnknownWaypoint(id))
    }

    fn set_skipped(&mut self, id: WaypointId, skipped: bool) -> TripResult<bool> {
        let stop = self
            .stops
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TripError::UnknownWaypoint(id))?;
        if stop.skipped == skipped {
            return Ok(false);
        }
        stop.skipped = skipped;
        debug!(waypoint = %id, skipped, "waypoint skip state changed");

        let active = self.active_len();
        self.notify(|l| l.on_waypoints_changed(active));
        Ok(true)
    }

    fn notify<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Box<dyn TripProgressListener>),
    {
        for (_, listener) in &mut self.listeners {
            f(listener);
        }
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
