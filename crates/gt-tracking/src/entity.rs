//! The per-entity record owned by the registry.

use gt_core::{EntityId, GeoPoint, Timestamp, bearing_deg, distance_m};

use crate::predict::{self, Prediction};
use crate::state::{self, EntityState, StateInputs};
use crate::{Metadata, PositionUpdate, Trail, TrackingConfig};

/// Movement shorter than this does not produce a derived heading; at GPS
/// noise levels the bearing between two nearly identical fixes is random.
const MIN_HEADING_MOVE_M: f64 = 1.0;

/// A state transition observed during an update or a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange {
    pub id:   EntityId,
    pub from: EntityState,
    pub to:   EntityState,
}

/// The tracked record for one entity.
///
/// Only the registry mutates it.  `current_point` always holds the last
/// real observation; predicted positions live in `predicted` and are
/// replaced on every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicEntity {
    pub id: EntityId,

    pub current_point:  GeoPoint,
    pub previous_point: Option<GeoPoint>,

    pub heading_deg:          Option<f64>,
    pub previous_heading_deg: Option<f64>,

    pub speed_mps:  Option<f64>,
    pub altitude_m: Option<f64>,
    pub accuracy_m: Option<f64>,

    pub last_updated:     Timestamp,
    pub previous_updated: Option<Timestamp>,

    /// Start of the current run of updates at or below the stationary
    /// speed threshold.
    pub slow_since: Option<Timestamp>,

    pub state: EntityState,
    pub trail: Trail,

    /// Cached dead-reckoned position from the latest tick.
    pub predicted: Option<Prediction>,

    pub metadata: Metadata,
}

impl DynamicEntity {
    /// Start tracking from a first report.  New entities begin in
    /// `Tracking`.
    pub(crate) fn new(update: PositionUpdate, config: &TrackingConfig) -> Self {
        let slow_since = match update.speed_mps {
            Some(s) if s <= config.stationary_speed_threshold_mps => Some(update.timestamp),
            _ => None,
        };
        let mut trail = Trail::new();
        trail.record(update.point, config);

        Self {
            id:                   update.entity_id,
            current_point:        update.point,
            previous_point:       None,
            heading_deg:          update.heading_deg,
            previous_heading_deg: None,
            speed_mps:            update.speed_mps,
            altitude_m:           update.altitude_m,
            accuracy_m:           update.accuracy_m,
            last_updated:         update.timestamp,
            previous_updated:     None,
            slow_since,
            state:                EntityState::Tracking,
            trail,
            predicted:            None,
            metadata:             update.extra,
        }
    }

    /// Fold a newer report into the record and reclassify at the report's
    /// own timestamp.
    ///
    /// The caller has already checked that `update.timestamp` is newer than
    /// `last_updated`.
    pub(crate) fn apply(&mut self, update: PositionUpdate, config: &TrackingConfig) -> Option<StateChange> {
        let prev_point = self.current_point;
        let prev_time  = self.last_updated;
        let dt_ms      = update.timestamp.since(prev_time);
        let moved_m    = distance_m(prev_point, update.point);

        let speed = update.speed_mps.or_else(|| {
            (dt_ms > 0).then(|| moved_m / (dt_ms as f64 / 1_000.0))
        });
        let heading = update
            .heading_deg
            .or_else(|| (moved_m >= MIN_HEADING_MOVE_M).then(|| bearing_deg(prev_point, update.point)))
            .or(self.heading_deg);

        self.previous_point       = Some(prev_point);
        self.previous_updated     = Some(prev_time);
        self.previous_heading_deg = self.heading_deg;

        self.current_point = update.point;
        self.heading_deg   = heading;
        self.speed_mps     = speed;
        self.altitude_m    = update.altitude_m.or(self.altitude_m);
        self.accuracy_m    = update.accuracy_m;
        self.last_updated  = update.timestamp;

        self.slow_since = match speed {
            Some(s) if s <= config.stationary_speed_threshold_mps => {
                Some(self.slow_since.unwrap_or(update.timestamp))
            }
            _ => None,
        };

        self.metadata.extend(update.extra);
        self.trail.record(update.point, config);
        self.predicted = None;

        self.reclassify(update.timestamp, config)
    }

    /// Milliseconds since the last real update, as seen at `now`.
    #[inline]
    pub fn elapsed_ms(&self, now: Timestamp) -> u64 {
        now.since(self.last_updated)
    }

    /// Inputs for the classifier at `now`.
    pub fn state_inputs(&self, now: Timestamp) -> StateInputs {
        StateInputs {
            elapsed_ms:  self.elapsed_ms(now),
            slow_for_ms: self.slow_since.map(|since| now.since(since)),
            has_motion:  self.previous_point.is_some(),
            current:     self.state,
        }
    }

    /// Re-run the classifier at `now`, returning the transition if the state
    /// changed.
    pub(crate) fn reclassify(&mut self, now: Timestamp, config: &TrackingConfig) -> Option<StateChange> {
        let next = state::classify(&self.state_inputs(now), config);
        if next == self.state {
            return None;
        }
        let change = StateChange { id: self.id.clone(), from: self.state, to: next };
        self.state = next;
        Some(change)
    }

    /// Recompute the cached prediction for `now`.  Entities that are no
    /// longer live carry no prediction.  Returns whether one was cached.
    pub(crate) fn refresh_prediction(&mut self, now: Timestamp, config: &TrackingConfig) -> bool {
        self.predicted = if self.state.is_live() {
            predict::predict(self, now, config)
        } else {
            None
        };
        self.predicted.is_some()
    }

    /// The position a renderer should draw: the cached prediction if any,
    /// otherwise the last real observation.
    #[inline]
    pub fn display_point(&self) -> GeoPoint {
        self.predicted.map_or(self.current_point, |p| p.point)
    }

    #[inline]
    pub fn display_heading_deg(&self) -> Option<f64> {
        self.predicted.map_or(self.heading_deg, |p| p.heading_deg)
    }
}
