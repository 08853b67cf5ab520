//! Greedy single-pass radius clustering.

use gt_core::{GeoPoint, distance_m};

use crate::index::{RepresentativeIndex, from_unit, to_unit};

// ── ClusterPoint ──────────────────────────────────────────────────────────────

/// Anything with a map position can be clustered.
///
/// Implement this for your POI type to cluster it directly; clusters refer
/// back to inputs by index.
pub trait ClusterPoint {
    fn location(&self) -> GeoPoint;
}

impl ClusterPoint for GeoPoint {
    #[inline]
    fn location(&self) -> GeoPoint {
        *self
    }
}

impl<T: ClusterPoint + ?Sized> ClusterPoint for &T {
    #[inline]
    fn location(&self) -> GeoPoint {
        (**self).location()
    }
}

// ── Cluster ───────────────────────────────────────────────────────────────────

/// One group of nearby input points.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    /// Location of the first member; membership is decided against it.
    pub representative: GeoPoint,
    /// Indices into the input slice, ascending.
    pub members: Vec<usize>,
    /// Spherical mean of the members' locations.
    pub centroid: GeoPoint,
}

impl Cluster {
    /// Number of members (always at least one).
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// `true` if this cluster is a lone point and should be drawn as a
    /// plain marker.
    #[inline]
    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

// ── Clustering ────────────────────────────────────────────────────────────────

/// Group `points` greedily in input order.
///
/// Each point joins the earliest-created cluster whose representative is
/// within `radius_m` (haversine, inclusive); otherwise it starts a new
/// cluster and becomes its representative.  The result is deterministic for
/// a given input order but not optimal: a point is never reassigned once
/// placed, and a point may be closer to a later cluster than to the one it
/// joined.
///
/// Degenerate input:
///
/// - empty `points` → empty result;
/// - negative or non-finite `radius_m` → every point is its own cluster;
/// - points with invalid coordinates each form a singleton cluster and
///   never absorb others.
pub fn cluster<P: ClusterPoint>(points: &[P], radius_m: f64) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut sums: Vec<[f64; 3]> = Vec::new();

    let usable_radius = radius_m.is_finite() && radius_m >= 0.0;
    let mut index = RepresentativeIndex::new(if usable_radius { radius_m } else { 0.0 });

    for (i, item) in points.iter().enumerate() {
        let point = item.location();
        let valid = point.is_valid();

        let target = if usable_radius && valid {
            index
                .candidates(point)
                .filter(|&c| distance_m(clusters[c].representative, point) <= radius_m)
                .min()
        } else {
            None
        };

        match target {
            Some(c) => {
                clusters[c].members.push(i);
                let v = to_unit(point);
                for (s, x) in sums[c].iter_mut().zip(v) {
                    *s += x;
                }
            }
            None => {
                let c = clusters.len();
                if usable_radius && valid {
                    index.insert(point, c);
                }
                clusters.push(Cluster { representative: point, members: vec![i], centroid: point });
                sums.push(if valid { to_unit(point) } else { [0.0; 3] });
            }
        }
    }

    for (cluster, sum) in clusters.iter_mut().zip(sums) {
        if cluster.members.len() > 1 {
            cluster.centroid = from_unit(sum).unwrap_or(cluster.representative);
        }
    }
    clusters
}

// ── StaticMarkerClusterer ─────────────────────────────────────────────────────

/// A reusable clustering radius.
///
/// ```rust,ignore
/// let clusterer = StaticMarkerClusterer::for_viewport(&viewport, 40.0);
/// for c in clusterer.cluster(&pois) {
///     if c.is_single() { draw_poi(&pois[c.members[0]]) } else { draw_badge(c.centroid, c.len()) }
/// }
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticMarkerClusterer {
    radius_m: f64,
}

impl StaticMarkerClusterer {
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    /// Radius equivalent to `radius_px` screen pixels at the viewport's
    /// centre latitude and zoom.
    pub fn for_viewport(viewport: &gt_core::Viewport, radius_px: f64) -> Self {
        Self::new(viewport.meters_per_pixel() * radius_px)
    }

    #[inline]
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn cluster<P: ClusterPoint>(&self, points: &[P]) -> Vec<Cluster> {
        cluster(points, self.radius_m)
    }
}
