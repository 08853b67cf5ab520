//! Geographic coordinate type and great-circle utilities.
//!
//! `GeoPoint` stores `f64` latitude/longitude.  Position updates arrive at
//! sub-metre resolution and trail decimation compares distances of a few
//! metres, so single precision is not enough here.
//!
//! Interpolation is linear in lat/lon space.  At navigation zoom levels the
//! segments involved are a few hundred metres long and the error against a
//! true geodesic is far below one screen pixel; it is not geodesic-exact
//! over long spans.

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Unchecked constructor.  Use [`GeoPoint::try_new`] at ingress
    /// boundaries.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct a point, rejecting non-finite values and anything outside
    /// `[-90, 90]` × `[-180, 180]`.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let p = Self { lat, lon };
        if p.is_valid() {
            Ok(p)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    /// `true` when both components are finite and inside the WGS-84 range.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Re-check a point that may have been built with [`GeoPoint::new`].
    pub fn validate(self) -> CoreResult<Self> {
        Self::try_new(self.lat, self.lon)
    }

    /// Haversine great-circle distance in metres.  See [`distance_m`].
    #[inline]
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        distance_m(self, other)
    }

    /// Initial bearing towards `other`.  See [`bearing_deg`].
    #[inline]
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        bearing_deg(self, other)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Distance and bearing ──────────────────────────────────────────────────────

/// Haversine great-circle distance in metres.
///
/// Symmetric, and zero when `a == b`.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

    // Rounding can push `h` a hair above 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `from` to `to`, in `[0, 360)`.
///
/// Identical points have no defined bearing; `0.0` is returned.
pub fn bearing_deg(from: GeoPoint, to: GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    normalize_heading(y.atan2(x).to_degrees())
}

// ── Interpolation ─────────────────────────────────────────────────────────────

/// Linear interpolation between `a` (`t = 0`) and `b` (`t = 1`).
///
/// `t` outside `[0, 1]` extrapolates along the same line.  The longitude
/// delta is taken the short way round, so a segment crossing the
/// antimeridian does not sweep across the whole globe.  The result is
/// kept inside the valid coordinate range.
pub fn interpolate(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    if t == 0.0 {
        return a;
    }
    if t == 1.0 {
        return b;
    }

    let d_lat = b.lat - a.lat;
    let mut d_lon = b.lon - a.lon;
    if d_lon > 180.0 {
        d_lon -= 360.0;
    } else if d_lon < -180.0 {
        d_lon += 360.0;
    }

    GeoPoint {
        lat: (a.lat + d_lat * t).clamp(-90.0, 90.0),
        lon: wrap_longitude(a.lon + d_lon * t),
    }
}

/// Shortest-arc interpolation between two headings in degrees.
///
/// `interpolate_heading(350.0, 10.0, 0.5)` is `0.0`, not `180.0`.
pub fn interpolate_heading(a: f64, b: f64, t: f64) -> f64 {
    let a = normalize_heading(a);
    let b = normalize_heading(b);
    let delta = (b - a + 540.0).rem_euclid(360.0) - 180.0;
    normalize_heading(a + delta * t)
}

/// Map any finite angle in degrees onto `[0, 360)`.
///
/// Non-finite input is returned unchanged.
pub fn normalize_heading(deg: f64) -> f64 {
    if !deg.is_finite() {
        return deg;
    }
    let r = deg.rem_euclid(360.0);
    // `rem_euclid` of a tiny negative number rounds up to exactly 360.0.
    if r >= 360.0 { 0.0 } else { r }
}

/// Bring a longitude back into `[-180, 180]`.
#[inline]
pub(crate) fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
