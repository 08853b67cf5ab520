//! Bounded, distance-decimated movement trail.
//!
//! A point is kept only if it is at least `min_trail_point_distance_m` away
//! from the previously kept point, which collapses GPS jitter around a
//! parked entity into a single point.  Capacity is enforced FIFO.  Spacing
//! is checked at insertion only; evicting from the front never brings two
//! retained points closer together.

use std::collections::VecDeque;

use gt_core::{GeoPoint, distance_m};

use crate::TrackingConfig;

/// Trail recorder for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trail {
    points: VecDeque<GeoPoint>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer `point` to the trail.  Returns `true` if it was kept.
    ///
    /// No-op when `config.enable_trail` is off.
    pub fn record(&mut self, point: GeoPoint, config: &TrackingConfig) -> bool {
        if !config.enable_trail {
            return false;
        }
        if let Some(&last) = self.points.back() {
            if distance_m(last, point) < config.min_trail_point_distance_m {
                return false;
            }
        }
        self.points.push_back(point);
        while self.points.len() > config.max_trail_points {
            self.points.pop_front();
        }
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<GeoPoint> {
        self.points.back().copied()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.points.iter().copied()
    }

    /// Copy the points out, oldest first.
    pub fn to_vec(&self) -> Vec<GeoPoint> {
        self.points.iter().copied().collect()
    }
}
