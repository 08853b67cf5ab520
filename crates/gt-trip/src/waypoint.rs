//! Trip waypoints.

use gt_core::GeoPoint;

/// One stop on a planned trip, as shown to the driver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripWaypointInfo {
    pub name:          String,
    pub category:      String,
    pub description:   Option<String>,
    pub icon_id:       Option<String>,
    /// Checkpoints are mandatory stops (e.g. a delivery) rather than
    /// via-points.
    pub is_checkpoint: bool,
    pub point:         GeoPoint,
}

impl TripWaypointInfo {
    pub fn new(name: impl Into<String>, category: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: None,
            icon_id: None,
            is_checkpoint: false,
            point,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon_id: impl Into<String>) -> Self {
        self.icon_id = Some(icon_id.into());
        self
    }

    pub fn checkpoint(mut self) -> Self {
        self.is_checkpoint = true;
        self
    }
}
