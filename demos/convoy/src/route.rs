//! Fixed convoy route and points of interest around Mobile, Alabama.

use gt_core::{GeoPoint, bearing_deg, distance_m, interpolate};
use gt_trip::TripWaypointInfo;

/// A polyline with precomputed cumulative distances.
pub struct Route {
    pub points:       Vec<GeoPoint>,
    pub cumulative_m: Vec<f64>,
}

impl Route {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let mut cumulative_m = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += distance_m(points[i - 1], *p);
            }
            cumulative_m.push(total);
        }
        Self { points, cumulative_m }
    }

    pub fn length_m(&self) -> f64 {
        self.cumulative_m.last().copied().unwrap_or(0.0)
    }

    /// Index of the first vertex strictly ahead of `along_m`, or the last
    /// vertex once the route is finished.
    pub fn next_vertex(&self, along_m: f64) -> usize {
        self.cumulative_m
            .iter()
            .position(|&c| c > along_m)
            .unwrap_or(self.points.len().saturating_sub(1))
    }

    /// Position and travel direction `along_m` metres from the start.
    pub fn position_at(&self, along_m: f64) -> (GeoPoint, f64) {
        let d = along_m.clamp(0.0, self.length_m());
        let next = self.next_vertex(d).max(1);
        let (a, b) = (self.points[next - 1], self.points[next]);
        let seg = self.cumulative_m[next] - self.cumulative_m[next - 1];
        let t = if seg > 0.0 { ((d - self.cumulative_m[next - 1]) / seg).min(1.0) } else { 1.0 };
        (interpolate(a, b, t), bearing_deg(a, b))
    }
}

/// Depot → downtown → port → industrial park → back north.
pub fn convoy_route() -> Route {
    Route::new(vec![
        GeoPoint::new(30.7100, -88.0700), // north depot
        GeoPoint::new(30.7030, -88.0610),
        GeoPoint::new(30.6950, -88.0500), // downtown
        GeoPoint::new(30.6880, -88.0400), // port gate
        GeoPoint::new(30.6790, -88.0350),
        GeoPoint::new(30.6700, -88.0300), // industrial park
        GeoPoint::new(30.6800, -88.0600), // connector
        GeoPoint::new(30.7000, -88.0300), // commerce park
    ])
}

/// Named stops for the trip panel, one per route vertex after the depot.
pub fn trip_stops(route: &Route) -> Vec<TripWaypointInfo> {
    const NAMES: [(&str, &str, bool); 7] = [
        ("Spring Hill Ave",     "via",      false),
        ("Bienville Square",    "delivery", true),
        ("Port Gate 4",         "delivery", true),
        ("Broad St",            "via",      false),
        ("Theodore Industrial", "pickup",   true),
        ("Connector Rd",        "via",      false),
        ("Commerce Park",       "delivery", true),
    ];
    NAMES
        .iter()
        .zip(route.points.iter().skip(1))
        .map(|(&(name, category, checkpoint), &point)| {
            let wp = TripWaypointInfo::new(name, category, point).with_icon(category);
            if checkpoint { wp.checkpoint() } else { wp }
        })
        .collect()
}

/// Static POIs drawn under the live markers.
pub fn points_of_interest() -> Vec<(&'static str, GeoPoint)> {
    vec![
        ("fuel: Government St",  GeoPoint::new(30.6905, -88.0455)),
        ("fuel: Dauphin St",     GeoPoint::new(30.6912, -88.0461)),
        ("fuel: Airport Blvd",   GeoPoint::new(30.6855, -88.1010)),
        ("rest: Cathedral",      GeoPoint::new(30.6906, -88.0448)),
        ("rest: Bienville",      GeoPoint::new(30.6920, -88.0430)),
        ("depot: North",         GeoPoint::new(30.7101, -88.0702)),
        ("depot: Port",          GeoPoint::new(30.6878, -88.0398)),
        ("scale: Port",          GeoPoint::new(30.6874, -88.0392)),
        ("scale: Theodore",      GeoPoint::new(30.6702, -88.0305)),
        ("repair: Theodore",     GeoPoint::new(30.6708, -88.0311)),
        ("repair: Commerce",     GeoPoint::new(30.7003, -88.0298)),
    ]
}
