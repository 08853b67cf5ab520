//! R-tree over cluster representatives.
//!
//! Representatives are stored as unit vectors on the sphere, so the
//! Euclidean (chord) distance the R-tree orders by is a monotonic function
//! of great-circle distance: `chord = 2·sin(θ/2)`.  A nearest-neighbour walk
//! therefore visits candidates in haversine order with no special cases at
//! the antimeridian or the poles.  The walk stops once the chord exceeds the
//! one for `radius_m`; the exact haversine check is done by the caller.

use std::f64::consts::PI;

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use gt_core::{EARTH_RADIUS_M, GeoPoint};

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct RepEntry {
    xyz:     [f64; 3],
    cluster: usize,
}

impl RTreeObject for RepEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.xyz)
    }
}

impl PointDistance for RepEntry {
    /// Squared chord length between two points on the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.xyz[0] - point[0];
        let dy = self.xyz[1] - point[1];
        let dz = self.xyz[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Unit-sphere conversion ────────────────────────────────────────────────────

pub(crate) fn to_unit(p: GeoPoint) -> [f64; 3] {
    let (lat, lon) = (p.lat.to_radians(), p.lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Back to lat/lon.  `None` when the vector is too short to have a
/// direction (e.g. the sum of two antipodal points).
pub(crate) fn from_unit(v: [f64; 3]) -> Option<GeoPoint> {
    let norm = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if !norm.is_finite() || norm < 1e-12 {
        return None;
    }
    let z = (v[2] / norm).clamp(-1.0, 1.0);
    Some(GeoPoint::new(z.asin().to_degrees(), v[1].atan2(v[0]).to_degrees()))
}

// ── RepresentativeIndex ───────────────────────────────────────────────────────

pub(crate) struct RepresentativeIndex {
    tree:        RTree<RepEntry>,
    /// Squared chord for `radius_m`, padded for rounding.
    max_chord_2: f64,
}

impl RepresentativeIndex {
    pub(crate) fn new(radius_m: f64) -> Self {
        let theta = radius_m / EARTH_RADIUS_M;
        let max_chord_2 = if theta >= PI {
            f64::INFINITY
        } else {
            let chord = 2.0 * (theta / 2.0).sin();
            chord * chord * (1.0 + 1e-9) + 1e-15
        };
        Self { tree: RTree::new(), max_chord_2 }
    }

    pub(crate) fn insert(&mut self, point: GeoPoint, cluster: usize) {
        self.tree.insert(RepEntry { xyz: to_unit(point), cluster });
    }

    /// Cluster indices whose representative may lie within the radius of
    /// `point`, nearest first.  A superset of the true answer.
    pub(crate) fn candidates(&self, point: GeoPoint) -> impl Iterator<Item = usize> + '_ {
        let q = to_unit(point);
        let limit = self.max_chord_2;
        self.tree
            .nearest_neighbor_iter(&q)
            .take_while(move |e| e.distance_2(&q) <= limit)
            .map(|e| e.cluster)
    }
}
