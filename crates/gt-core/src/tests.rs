//! Unit tests for gt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EntityId, SubscriptionId, WaypointId};

    #[test]
    fn entity_id_from_str_and_display() {
        let id = EntityId::from("v1");
        assert_eq!(id.as_str(), "v1");
        assert_eq!(id.to_string(), "v1");
        assert_eq!(id, EntityId::new(String::from("v1")));
    }

    #[test]
    fn typed_ids_order_and_display() {
        assert!(WaypointId(0) < WaypointId(1));
        assert_eq!(SubscriptionId(3).next(), SubscriptionId(4));
        assert_eq!(WaypointId(7).to_string(), "WaypointId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::Timestamp;

    #[test]
    fn arithmetic() {
        let t = Timestamp(500);
        assert_eq!(t + 250, Timestamp(750));
        assert_eq!(Timestamp(750) - t, 250);
        assert_eq!(t + std::time::Duration::from_secs(2), Timestamp(2_500));
    }

    #[test]
    fn since_saturates() {
        assert_eq!(Timestamp(100).since(Timestamp(400)), 0);
        assert_eq!(Timestamp(400).since(Timestamp(100)), 300);
    }
}

#[cfg(test)]
mod geo {
    use crate::{CoreError, GeoPoint, bearing_deg, distance_m, interpolate, interpolate_heading};
    use crate::normalize_heading;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(37.7749, -122.4194);
        assert_eq!(distance_m(p, p), 0.0);
    }

    #[test]
    fn one_degree_latitude() {
        // ~1 degree of latitude ≈ 111 km
        let a = GeoPoint::new(30.0, -88.0);
        let b = GeoPoint::new(31.0, -88.0);
        let d = distance_m(a, b);
        assert!((d - 111_195.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(37.7749, -122.4194);
        let b = GeoPoint::new(37.7750, -122.4195);
        assert_eq!(distance_m(a, b), distance_m(b, a));
        assert!(distance_m(a, b) > 10.0 && distance_m(a, b) < 20.0);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(GeoPoint::try_new(45.0, 90.0).is_ok());
        assert_eq!(
            GeoPoint::try_new(91.0, 0.0),
            Err(CoreError::InvalidCoordinate { lat: 91.0, lon: 0.0 })
        );
        assert!(GeoPoint::try_new(0.0, -180.5).is_err());
        assert!(GeoPoint::try_new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn bearing_cardinal_directions() {
        let o = GeoPoint::new(0.0, 0.0);
        assert!((bearing_deg(o, GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_deg(o, GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_deg(o, GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_deg(o, GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
        assert_eq!(bearing_deg(o, o), 0.0);
    }

    #[test]
    fn interpolate_endpoints_and_midpoint() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(12.0, 24.0);
        assert_eq!(interpolate(a, b, 0.0), a);
        assert_eq!(interpolate(a, b, 1.0), b);
        let m = interpolate(a, b, 0.5);
        assert!((m.lat - 11.0).abs() < 1e-12);
        assert!((m.lon - 22.0).abs() < 1e-12);
    }

    #[test]
    fn interpolate_crosses_antimeridian_short_way() {
        let a = GeoPoint::new(0.0, 179.0);
        let b = GeoPoint::new(0.0, -179.0);
        let m = interpolate(a, b, 0.5);
        assert!((m.lon.abs() - 180.0).abs() < 1e-9, "got {}", m.lon);
        let q = interpolate(a, b, 0.75);
        assert!((q.lon - -179.5).abs() < 1e-9, "got {}", q.lon);
    }

    #[test]
    fn extrapolation_stays_in_range() {
        let a = GeoPoint::new(89.0, 0.0);
        let b = GeoPoint::new(89.9, 0.0);
        let p = interpolate(a, b, 3.0);
        assert_eq!(p.lat, 90.0);
    }

    #[test]
    fn heading_wraps_shortest_arc() {
        assert!((interpolate_heading(350.0, 10.0, 0.5) - 0.0).abs() < 1e-9);
        assert!((interpolate_heading(10.0, 350.0, 0.25) - 5.0).abs() < 1e-9);
        assert!((interpolate_heading(90.0, 180.0, 0.5) - 135.0).abs() < 1e-9);
        assert_eq!(interpolate_heading(45.0, 45.0, 0.7), 45.0);
    }

    #[test]
    fn normalize_heading_range() {
        assert_eq!(normalize_heading(-90.0), 270.0);
        assert_eq!(normalize_heading(720.0), 0.0);
        assert_eq!(normalize_heading(-1e-18), 0.0);
    }
}

#[cfg(test)]
mod projection {
    use crate::{
        GeoPoint, ScreenOffset, Viewport, coordinate_to_screen, edge_indicator,
        estimate_screen_position, meters_per_pixel,
    };

    fn viewport() -> Viewport {
        Viewport::new(GeoPoint::new(0.0, 0.0), 800.0, 600.0, 10.0)
    }

    /// Longitude span of `px` pixels at zoom 10.
    fn lon_for_px(px: f64) -> f64 {
        px / (256.0 * 1024.0) * 360.0
    }

    #[test]
    fn center_maps_to_middle() {
        let vp = viewport();
        let s = coordinate_to_screen(vp.center, &vp).unwrap();
        assert!(s.distance_to(ScreenOffset::new(400.0, 300.0)) < 1e-9);
    }

    #[test]
    fn east_offset_moves_right() {
        let vp = viewport();
        let s = coordinate_to_screen(GeoPoint::new(0.0, lon_for_px(100.0)), &vp).unwrap();
        assert!((s.x - 500.0).abs() < 1e-6, "got {s:?}");
        assert!((s.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn north_offset_moves_up() {
        let vp = viewport();
        let s = coordinate_to_screen(GeoPoint::new(0.05, 0.0), &vp).unwrap();
        assert!(s.y < 300.0);
        assert!((s.x - 400.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_rotates_east_to_up() {
        let vp = viewport().with_bearing(90.0);
        let s = coordinate_to_screen(GeoPoint::new(0.0, lon_for_px(100.0)), &vp).unwrap();
        assert!((s.x - 400.0).abs() < 1e-6, "got {s:?}");
        assert!((s.y - 200.0).abs() < 1e-6, "got {s:?}");
    }

    #[test]
    fn tilt_foreshortens_vertical_axis() {
        let flat = viewport();
        let tilted = viewport().with_tilt(60.0);
        let p = GeoPoint::new(0.05, 0.0);
        let dy_flat = 300.0 - coordinate_to_screen(p, &flat).unwrap().y;
        let dy_tilt = 300.0 - coordinate_to_screen(p, &tilted).unwrap().y;
        assert!((dy_tilt - dy_flat * 0.5).abs() < 1e-6);
    }

    #[test]
    fn outside_is_none_but_estimate_is_some() {
        let vp = viewport();
        let far = GeoPoint::new(0.0, lon_for_px(1_000.0));
        assert!(coordinate_to_screen(far, &vp).is_none());
        let est = estimate_screen_position(far, &vp);
        assert!((est.x - 1_400.0).abs() < 1e-6);
    }

    #[test]
    fn edge_indicator_clamps_to_inset_border() {
        let vp = viewport();
        let north = GeoPoint::new(5.0, 0.0);
        let ind = edge_indicator(north, &vp, 20.0).unwrap();
        assert!((ind.position.y - 20.0).abs() < 1e-6, "got {ind:?}");
        assert!((ind.position.x - 400.0).abs() < 1e-6);
        assert!(ind.angle_deg.abs() < 1e-9);

        let east = GeoPoint::new(0.0, lon_for_px(2_000.0));
        let ind = edge_indicator(east, &vp, 0.0).unwrap();
        assert!((ind.position.x - 800.0).abs() < 1e-6);
        assert!((ind.angle_deg - 90.0).abs() < 1e-9);

        assert!(edge_indicator(vp.center, &vp, 10.0).is_none());
    }

    #[test]
    fn ground_resolution_halves_per_zoom_level() {
        let z10 = meters_per_pixel(0.0, 10.0);
        let z11 = meters_per_pixel(0.0, 11.0);
        assert!((z10 / z11 - 2.0).abs() < 1e-12);
        assert!((z10 - 152.874).abs() < 0.01);
        assert!(meters_per_pixel(60.0, 10.0) < z10);
    }
}

#[cfg(test)]
mod format {
    use crate::{format_distance, format_duration};

    #[test]
    fn distances() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(-3.0), "0 m");
        assert_eq!(format_distance(847.0), "850 m");
        assert_eq!(format_distance(998.0), "1.0 km");
        assert_eq!(format_distance(1_240.0), "1.2 km");
        assert_eq!(format_distance(153_600.0), "154 km");
        assert_eq!(format_distance(f64::NAN), "0 m");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(45.2), "45 s");
        assert_eq!(format_duration(720.0), "12 min");
        assert_eq!(format_duration(3_900.0), "1 h 05 min");
        assert_eq!(format_duration(f64::INFINITY), "0 s");
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use crate::{
        GeoPoint, Viewport, coordinate_to_screen, distance_m, estimate_screen_position,
        interpolate,
    };

    proptest! {
        #[test]
        fn projection_agrees_inside_viewport(
            dlat in -0.05f64..0.05,
            dlon in -0.05f64..0.05,
            zoom in 10.0f64..16.0,
            bearing in 0.0f64..360.0,
            tilt in 0.0f64..60.0,
        ) {
            let center = GeoPoint::new(37.7749, -122.4194);
            let vp = Viewport::new(center, 1080.0, 1920.0, zoom)
                .with_bearing(bearing)
                .with_tilt(tilt);
            let p = GeoPoint::new(center.lat + dlat, center.lon + dlon);
            if let Some(s) = coordinate_to_screen(p, &vp) {
                let e = estimate_screen_position(p, &vp);
                prop_assert!(s.distance_to(e) <= 1.0);
                prop_assert_eq!(s, e);
            }
        }

        #[test]
        fn distance_symmetric_and_non_negative(
            a_lat in -89.0f64..89.0, a_lon in -179.0f64..179.0,
            b_lat in -89.0f64..89.0, b_lon in -179.0f64..179.0,
        ) {
            let a = GeoPoint::new(a_lat, a_lon);
            let b = GeoPoint::new(b_lat, b_lon);
            let d = distance_m(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!((d - distance_m(b, a)).abs() < 1e-6);
        }

        #[test]
        fn interpolation_stays_on_segment(
            a_lat in -60.0f64..60.0, a_lon in -170.0f64..170.0,
            d_lat in -0.01f64..0.01, d_lon in -0.01f64..0.01,
            t in 0.0f64..=1.0,
        ) {
            let a = GeoPoint::new(a_lat, a_lon);
            let b = GeoPoint::new(a_lat + d_lat, a_lon + d_lon);
            let p = interpolate(a, b, t);
            let along = distance_m(a, p) + distance_m(p, b);
            prop_assert!((along - distance_m(a, b)).abs() < 0.01);
        }
    }
}
