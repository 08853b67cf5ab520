//! Geographic → screen projection for overlay rendering.
//!
//! # Model
//!
//! Points are placed in Web-Mercator "world pixel" space for 256-px tiles at
//! the viewport's (possibly fractional) zoom, offset from the viewport
//! centre, rotated by the map bearing and foreshortened by the camera tilt:
//!
//! ```text
//! world  = mercator(point, zoom) - mercator(center, zoom)   (x wrapped short way)
//! rotate = R(-bearing) · world
//! screen = (width/2 + rotate.x, height/2 + rotate.y · cos(tilt))
//! ```
//!
//! `(0, 0)` is the top-left corner and offsets are in the same units as the
//! viewport size.  The tilt term is a flat approximation of a perspective
//! camera, good enough to place markers at moderate pitch.
//!
//! [`coordinate_to_screen`] and [`estimate_screen_position`] share one
//! projection routine, so they agree bit-for-bit whenever the former
//! returns `Some`.

use std::f64::consts::PI;

use crate::GeoPoint;

/// Pixel edge length of one Web-Mercator tile at integer zoom.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web-Mercator projection.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Maximum camera tilt honoured by the projection.
pub const MAX_TILT_DEG: f64 = 60.0;

/// Ground resolution at the equator for zoom 0 (metres per pixel).
const EQUATOR_M_PER_PX_Z0: f64 = 156_543.033_928_040_97;

// ── Value types ───────────────────────────────────────────────────────────────

/// A position on screen, `(0, 0)` at top-left.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenOffset {
    pub x: f64,
    pub y: f64,
}

impl ScreenOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in screen units.
    #[inline]
    pub fn distance_to(self, other: ScreenOffset) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// The visible map region a renderer is currently drawing.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    /// Geographic point under the centre of the viewport.
    pub center: GeoPoint,
    /// Width in screen units (logical pixels, points, …).
    pub width: f64,
    /// Height in the same units as `width`.
    pub height: f64,
    /// Web-Mercator zoom level; fractional values are allowed.
    pub zoom: f64,
    /// Map rotation: the compass direction pointing up the screen.
    pub bearing_deg: f64,
    /// Camera pitch away from straight down, clamped to `[0, MAX_TILT_DEG]`.
    pub tilt_deg: f64,
}

impl Viewport {
    /// A north-up, untilted viewport.
    pub fn new(center: GeoPoint, width: f64, height: f64, zoom: f64) -> Self {
        Self {
            center,
            width,
            height,
            zoom,
            bearing_deg: 0.0,
            tilt_deg: 0.0,
        }
    }

    pub fn with_bearing(mut self, bearing_deg: f64) -> Self {
        self.bearing_deg = bearing_deg;
        self
    }

    pub fn with_tilt(mut self, tilt_deg: f64) -> Self {
        self.tilt_deg = tilt_deg;
        self
    }

    /// Ground resolution at the viewport centre.
    #[inline]
    pub fn meters_per_pixel(&self) -> f64 {
        meters_per_pixel(self.center.lat, self.zoom)
    }

    /// `true` when `offset` lies inside the viewport rectangle (edges
    /// inclusive).
    #[inline]
    pub fn contains(&self, offset: ScreenOffset) -> bool {
        (0.0..=self.width).contains(&offset.x) && (0.0..=self.height).contains(&offset.y)
    }

    #[inline]
    fn half_extents(&self) -> (f64, f64) {
        (self.width * 0.5, self.height * 0.5)
    }
}

/// Where to draw a direction indicator for an off-screen point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeIndicator {
    /// Point on the (inset) viewport border.
    pub position: ScreenOffset,
    /// Screen-space direction from the viewport centre, degrees clockwise
    /// from screen-up, in `[0, 360)`.
    pub angle_deg: f64,
}

// ── Projection ────────────────────────────────────────────────────────────────

/// Web-Mercator ground resolution in metres per pixel at `lat` and `zoom`.
pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    EQUATOR_M_PER_PX_Z0 * lat.to_radians().cos() / 2f64.powf(zoom)
}

/// Project `point` into the viewport.
///
/// Returns `None` when the point falls outside the visible rectangle.
pub fn coordinate_to_screen(point: GeoPoint, viewport: &Viewport) -> Option<ScreenOffset> {
    let offset = project(point, viewport);
    viewport.contains(offset).then_some(offset)
}

/// Project `point` into the viewport without clipping.
///
/// Used for off-screen entities whose direction indicator is still drawn.
pub fn estimate_screen_position(point: GeoPoint, viewport: &Viewport) -> ScreenOffset {
    project(point, viewport)
}

/// Clamp an off-screen point onto the viewport border inset by `margin`.
///
/// Returns `None` when the point is visible.
pub fn edge_indicator(point: GeoPoint, viewport: &Viewport, margin: f64) -> Option<EdgeIndicator> {
    let offset = project(point, viewport);
    if viewport.contains(offset) {
        return None;
    }

    let (cx, cy) = viewport.half_extents();
    let vx = offset.x - cx;
    let vy = offset.y - cy;

    let hx = (cx - margin).max(0.0);
    let hy = (cy - margin).max(0.0);

    // Largest scale that keeps the direction vector inside the inset box.
    let sx = if vx != 0.0 { hx / vx.abs() } else { f64::INFINITY };
    let sy = if vy != 0.0 { hy / vy.abs() } else { f64::INFINITY };
    let mut s = sx.min(sy);
    if !s.is_finite() {
        s = 0.0;
    }

    Some(EdgeIndicator {
        position: ScreenOffset::new(cx + vx * s, cy + vy * s),
        angle_deg: crate::normalize_heading(vx.atan2(-vy).to_degrees()),
    })
}

fn project(point: GeoPoint, viewport: &Viewport) -> ScreenOffset {
    let world = TILE_SIZE * 2f64.powf(viewport.zoom);

    let (px, py) = mercator(point, world);
    let (cx, cy) = mercator(viewport.center, world);

    let mut dx = px - cx;
    let half_world = world * 0.5;
    if dx > half_world {
        dx -= world;
    } else if dx < -half_world {
        dx += world;
    }
    let dy = py - cy;

    let (sin_b, cos_b) = viewport.bearing_deg.to_radians().sin_cos();
    let rx = dx * cos_b + dy * sin_b;
    let ry = -dx * sin_b + dy * cos_b;

    let tilt = viewport.tilt_deg.clamp(0.0, MAX_TILT_DEG).to_radians();
    let (hx, hy) = viewport.half_extents();

    ScreenOffset::new(hx + rx, hy + ry * tilt.cos())
}

/// World-pixel coordinates of `point` for a world `world_px` pixels wide.
fn mercator(point: GeoPoint, world_px: f64) -> (f64, f64) {
    let lat = point.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let x = (point.lon + 180.0) / 360.0 * world_px;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * world_px;
    (x, y)
}
