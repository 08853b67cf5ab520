//! Per-entity lifecycle states and the pure classifier that assigns them.
//!
//! # Rule table (first match wins)
//!
//! | Condition                                                      | State        |
//! |----------------------------------------------------------------|--------------|
//! | already `Expired`                                              | `Expired`    |
//! | `elapsed >= expired_threshold_ms` (when configured)            | `Expired`    |
//! | `elapsed >= offline_threshold_ms`                              | `Offline`    |
//! | `elapsed >= stale_threshold_ms`                                | `Stale`      |
//! | slow for `>= stationary_duration_ms`                           | `Stationary` |
//! | animation on, has a previous sample, `elapsed < animation_ms`  | `Animating`  |
//! | otherwise                                                      | `Tracking`   |
//!
//! `elapsed` is measured from the last real update to the evaluation
//! instant, so the result depends only on the inputs, never on how many
//! ticks were missed in between.  `Expired` is sticky; only a fresh update
//! through the registry leaves it.

use crate::TrackingConfig;

/// Lifecycle state of a tracked entity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityState {
    /// Receiving updates, marker at its last real position.
    #[default]
    Tracking,
    /// A real update just arrived; the marker is moving towards it.
    Animating,
    /// Receiving updates but not moving.
    Stationary,
    /// No update for a while; position is getting unreliable.
    Stale,
    /// No update for long enough that the entity is presumed gone.
    Offline,
    /// Terminal: eligible for eviction.
    Expired,
}

impl EntityState {
    /// `false` for `Offline` and `Expired`, the states in which no
    /// prediction is made.
    #[inline]
    pub fn is_live(self) -> bool {
        !matches!(self, EntityState::Offline | EntityState::Expired)
    }

    /// Decay rank: 0 while fresh, then 1 `Stale`, 2 `Offline`, 3 `Expired`.
    /// Never decreases as time passes without updates.
    #[inline]
    pub fn severity(self) -> u8 {
        match self {
            EntityState::Tracking | EntityState::Animating | EntityState::Stationary => 0,
            EntityState::Stale   => 1,
            EntityState::Offline => 2,
            EntityState::Expired => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityState::Tracking   => "tracking",
            EntityState::Animating  => "animating",
            EntityState::Stationary => "stationary",
            EntityState::Stale      => "stale",
            EntityState::Offline    => "offline",
            EntityState::Expired    => "expired",
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the classifier looks at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StateInputs {
    /// Milliseconds since the last real update.
    pub elapsed_ms: u64,
    /// How long speed has stayed at or below the stationary threshold, or
    /// `None` if the latest update was above it (or had no speed).
    pub slow_for_ms: Option<u64>,
    /// `true` once the entity has a previous sample to animate from.
    pub has_motion: bool,
    /// The state currently assigned.
    pub current: EntityState,
}

/// Classify an entity according to the rule table above.
pub fn classify(inputs: &StateInputs, config: &TrackingConfig) -> EntityState {
    if inputs.current == EntityState::Expired {
        return EntityState::Expired;
    }

    let elapsed = inputs.elapsed_ms;
    if config.expired_threshold_ms.is_some_and(|t| elapsed >= t) {
        return EntityState::Expired;
    }
    if elapsed >= config.offline_threshold_ms {
        return EntityState::Offline;
    }
    if elapsed >= config.stale_threshold_ms {
        return EntityState::Stale;
    }
    if inputs.slow_for_ms.is_some_and(|slow| slow >= config.stationary_duration_ms) {
        return EntityState::Stationary;
    }
    if config.enable_animation && inputs.has_motion && elapsed < config.animation_duration_ms {
        return EntityState::Animating;
    }
    EntityState::Tracking
}
