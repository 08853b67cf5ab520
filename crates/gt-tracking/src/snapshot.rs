//! Read-only, render-ready copies of entity state.

use gt_core::{
    EdgeIndicator, EntityId, GeoPoint, ScreenOffset, Timestamp, Viewport, coordinate_to_screen,
    edge_indicator, estimate_screen_position,
};

use crate::{DynamicEntity, EntityState, Metadata};

/// A deep copy of one entity as of the last update or tick.
///
/// Holding a snapshot never blocks or aliases the registry; it can be
/// moved to a render thread freely.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerSnapshot {
    pub id: EntityId,

    /// Last real observation.
    pub point: GeoPoint,
    /// Dead-reckoned position from the latest tick, if any.
    pub predicted_point: Option<GeoPoint>,
    /// `predicted_point` if present, else `point`.
    pub display_point: GeoPoint,

    pub heading_deg:         Option<f64>,
    pub display_heading_deg: Option<f64>,

    pub speed_mps:  Option<f64>,
    pub altitude_m: Option<f64>,
    pub accuracy_m: Option<f64>,

    pub state:        EntityState,
    pub last_updated: Timestamp,

    /// Oldest first.
    pub trail:    Vec<GeoPoint>,
    pub metadata: Metadata,
}

impl MarkerSnapshot {
    pub fn from_entity(entity: &DynamicEntity) -> Self {
        Self {
            id:                  entity.id.clone(),
            point:               entity.current_point,
            predicted_point:     entity.predicted.map(|p| p.point),
            display_point:       entity.display_point(),
            heading_deg:         entity.heading_deg,
            display_heading_deg: entity.display_heading_deg(),
            speed_mps:           entity.speed_mps,
            altitude_m:          entity.altitude_m,
            accuracy_m:          entity.accuracy_m,
            state:               entity.state,
            last_updated:        entity.last_updated,
            trail:               entity.trail.to_vec(),
            metadata:            entity.metadata.clone(),
        }
    }

    /// Screen position of the display point, `None` when off-screen.
    pub fn screen_position(&self, viewport: &Viewport) -> Option<ScreenOffset> {
        coordinate_to_screen(self.display_point, viewport)
    }

    /// Unclipped screen position of the display point.
    pub fn estimated_screen_position(&self, viewport: &Viewport) -> ScreenOffset {
        estimate_screen_position(self.display_point, viewport)
    }

    /// Border indicator for an off-screen marker.
    pub fn edge_indicator(&self, viewport: &Viewport, margin: f64) -> Option<EdgeIndicator> {
        edge_indicator(self.display_point, viewport, margin)
    }

    /// Trail projected to screen space, oldest first.  Unclipped so that
    /// polylines leaving the viewport are still drawn to its edge.
    pub fn screen_trail(&self, viewport: &Viewport) -> Vec<ScreenOffset> {
        self.trail
            .iter()
            .map(|&p| estimate_screen_position(p, viewport))
            .collect()
    }
}
