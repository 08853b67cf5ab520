//! Ingress type: one decoded position report for one entity.

use std::collections::BTreeMap;

use gt_core::{EntityId, GeoPoint, Timestamp, normalize_heading};

/// A loosely typed value carried alongside a position report.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetadataValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        MetadataValue::Bool(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        MetadataValue::Int(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        MetadataValue::Float(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        MetadataValue::Text(v.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        MetadataValue::Text(v)
    }
}

/// Free-form per-entity attributes (call sign, colour, battery level, …).
pub type Metadata = BTreeMap<String, MetadataValue>;

/// One position report, produced upstream and consumed once by
/// [`DynamicEntityRegistry::apply_update`][crate::DynamicEntityRegistry::apply_update].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionUpdate {
    pub entity_id:   EntityId,
    pub point:       GeoPoint,
    pub heading_deg: Option<f64>,
    pub speed_mps:   Option<f64>,
    pub altitude_m:  Option<f64>,
    pub accuracy_m:  Option<f64>,
    pub timestamp:   Timestamp,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra:       Metadata,
}

impl PositionUpdate {
    /// A bare report with only the required fields.
    pub fn new(entity_id: impl Into<EntityId>, point: GeoPoint, timestamp: Timestamp) -> Self {
        Self {
            entity_id: entity_id.into(),
            point,
            heading_deg: None,
            speed_mps:   None,
            altitude_m:  None,
            accuracy_m:  None,
            timestamp,
            extra:       Metadata::new(),
        }
    }

    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    pub fn with_altitude(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Drop optional readings that cannot be real (non-finite values,
    /// negative speed or accuracy) and bring the heading into `[0, 360)`.
    pub(crate) fn sanitized(mut self) -> Self {
        self.heading_deg = self.heading_deg.filter(|h| h.is_finite()).map(normalize_heading);
        self.speed_mps = self.speed_mps.filter(|s| s.is_finite() && *s >= 0.0);
        self.altitude_m = self.altitude_m.filter(|a| a.is_finite());
        self.accuracy_m = self.accuracy_m.filter(|a| a.is_finite() && *a >= 0.0);
        self
    }
}
