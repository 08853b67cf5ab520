//! Tracking configuration.

use crate::ConfigError;

/// Immutable tuning for a [`DynamicEntityRegistry`][crate::DynamicEntityRegistry].
///
/// Replaceable at runtime through
/// [`update_config`][crate::DynamicEntityRegistry::update_config]; a new
/// config only affects later updates and ticks.  Existing trails are not
/// trimmed when `max_trail_points` shrinks; the next recorded point does it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackingConfig {
    /// How long after a real update the marker is considered to be
    /// animating towards it.  Default: 1 000 ms.
    pub animation_duration_ms: u64,

    /// Age at which an entity turns `Stale`.  Default: 10 000 ms.
    pub stale_threshold_ms: u64,

    /// Age at which an entity turns `Offline`.  Default: 30 000 ms.
    pub offline_threshold_ms: u64,

    /// Age at which an entity turns `Expired`.  `None` disables expiry.
    pub expired_threshold_ms: Option<u64>,

    /// Speeds at or below this count as "not moving".  Default: 0.5 m/s.
    pub stationary_speed_threshold_mps: f64,

    /// How long speed must stay at or below the threshold before the entity
    /// is `Stationary`.  Default: 5 000 ms.
    pub stationary_duration_ms: u64,

    /// Trail capacity; oldest points are evicted first.  Default: 100.
    pub max_trail_points: usize,

    /// Minimum spacing between consecutive trail points.  Default: 5 m.
    pub min_trail_point_distance_m: f64,

    /// Dead-reckoning horizon after the last update.  Default: 2 000 ms.
    pub prediction_window_ms: u64,

    pub enable_animation:  bool,
    pub enable_trail:      bool,
    pub enable_prediction: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms:          1_000,
            stale_threshold_ms:             10_000,
            offline_threshold_ms:           30_000,
            expired_threshold_ms:           None,
            stationary_speed_threshold_mps: 0.5,
            stationary_duration_ms:         5_000,
            max_trail_points:               100,
            min_trail_point_distance_m:     5.0,
            prediction_window_ms:           2_000,
            enable_animation:               true,
            enable_trail:                   true,
            enable_prediction:              true,
        }
    }
}

impl TrackingConfig {
    /// Check every constraint, returning the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("stationary_speed_threshold_mps", self.stationary_speed_threshold_mps)?;
        check_non_negative("min_trail_point_distance_m", self.min_trail_point_distance_m)?;

        if self.stale_threshold_ms == 0 {
            return Err(ConfigError::Zero("stale_threshold_ms"));
        }
        if self.enable_trail && self.max_trail_points == 0 {
            return Err(ConfigError::Zero("max_trail_points"));
        }
        if self.stale_threshold_ms > self.offline_threshold_ms {
            return Err(ConfigError::ThresholdOrder {
                lower:    "stale_threshold_ms",
                lower_ms: self.stale_threshold_ms,
                upper:    "offline_threshold_ms",
                upper_ms: self.offline_threshold_ms,
            });
        }
        match self.expired_threshold_ms {
            Some(expired) if self.offline_threshold_ms > expired => {
                return Err(ConfigError::ThresholdOrder {
                    lower:    "offline_threshold_ms",
                    lower_ms: self.offline_threshold_ms,
                    upper:    "expired_threshold_ms",
                    upper_ms: expired,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Builder-style setter for the optional expiry threshold.
    pub fn with_expiry(mut self, expired_threshold_ms: u64) -> Self {
        self.expired_threshold_ms = Some(expired_threshold_ms);
        self
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}
