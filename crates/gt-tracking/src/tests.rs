//! Unit tests for gt-tracking.

use std::sync::{Arc, Mutex};

use gt_core::{GeoPoint, Timestamp, distance_m};

use crate::{
    DynamicEntityRegistry, EntityState, PositionUpdate, RegistryObserver, StateChange, TrackError,
    TrackingConfig, UpdateOutcome,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const SF_A: GeoPoint = GeoPoint::new(37.7749, -122.4194);
const SF_B: GeoPoint = GeoPoint::new(37.7750, -122.4195);

fn at(ms: u64) -> Timestamp {
    Timestamp(ms)
}

fn update(id: &str, point: GeoPoint, ms: u64) -> PositionUpdate {
    PositionUpdate::new(id, point, at(ms))
}

fn registry() -> DynamicEntityRegistry {
    DynamicEntityRegistry::new(TrackingConfig::default()).unwrap()
}

/// Registry holding the two-sample `v1` track used throughout.
fn v1_registry() -> DynamicEntityRegistry {
    let mut reg = registry();
    reg.apply_update(update("v1", SF_A, 0).with_speed(5.0)).unwrap();
    reg.apply_update(update("v1", SF_B, 500).with_speed(5.0)).unwrap();
    reg
}

/// Observer that appends a line per callback to a shared log.
#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl RegistryObserver for Recorder {
    fn on_entity_added(&mut self, id: &gt_core::EntityId, at: Timestamp) {
        self.0.lock().unwrap().push(format!("added {id} {at}"));
    }

    fn on_state_changed(&mut self, change: &StateChange) {
        self.0
            .lock()
            .unwrap()
            .push(format!("{} {}->{}", change.id, change.from, change.to));
    }

    fn on_update_rejected(&mut self, error: &TrackError) {
        let kind = match error {
            TrackError::RejectedStaleUpdate { .. } => "stale",
            TrackError::InvalidCoordinate(_)       => "invalid",
            _                                      => "other",
        };
        self.0.lock().unwrap().push(format!("rejected {kind}"));
    }

    fn on_entity_removed(&mut self, id: &gt_core::EntityId) {
        self.0.lock().unwrap().push(format!("removed {id}"));
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use crate::ConfigError;

    #[test]
    fn default_is_valid() {
        assert!(TrackingConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_order_enforced() {
        let cfg = TrackingConfig { stale_threshold_ms: 40_000, ..TrackingConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::ThresholdOrder { .. })));

        let cfg = TrackingConfig::default().with_expiry(1_000);
        assert!(matches!(cfg.validate(), Err(ConfigError::ThresholdOrder { .. })));
    }

    #[test]
    fn negative_or_nan_values_rejected() {
        let cfg = TrackingConfig { min_trail_point_distance_m: -1.0, ..TrackingConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue { .. })));

        let cfg = TrackingConfig {
            stationary_speed_threshold_mps: f64::NAN,
            ..TrackingConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_trail_capacity_only_matters_when_enabled() {
        let cfg = TrackingConfig { max_trail_points: 0, ..TrackingConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::Zero("max_trail_points")));
        let cfg = TrackingConfig { max_trail_points: 0, enable_trail: false, ..TrackingConfig::default() };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn new_registry_rejects_invalid_config() {
        let cfg = TrackingConfig { stale_threshold_ms: 0, ..TrackingConfig::default() };
        assert!(matches!(
            DynamicEntityRegistry::new(cfg),
            Err(TrackError::ConfigurationInvalid(_))
        ));
    }

    #[test]
    fn update_config_keeps_previous_on_error() {
        let mut reg = registry();
        let bad = TrackingConfig { offline_threshold_ms: 5, ..TrackingConfig::default() };
        assert!(reg.update_config(bad).is_err());
        assert_eq!(reg.config(), &TrackingConfig::default());

        let good = TrackingConfig { stale_threshold_ms: 2_000, ..TrackingConfig::default() };
        reg.update_config(good.clone()).unwrap();
        assert_eq!(reg.config(), &good);
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod classifier {
    use super::*;
    use crate::{StateInputs, classify};

    fn inputs(elapsed_ms: u64) -> StateInputs {
        StateInputs {
            elapsed_ms,
            slow_for_ms: None,
            has_motion:  true,
            current:     EntityState::Tracking,
        }
    }

    #[test]
    fn rule_table_in_order() {
        let cfg = TrackingConfig::default().with_expiry(60_000);
        assert_eq!(classify(&inputs(0), &cfg), EntityState::Animating);
        assert_eq!(classify(&inputs(999), &cfg), EntityState::Animating);
        assert_eq!(classify(&inputs(1_000), &cfg), EntityState::Tracking);
        assert_eq!(classify(&inputs(10_000), &cfg), EntityState::Stale);
        assert_eq!(classify(&inputs(30_000), &cfg), EntityState::Offline);
        assert_eq!(classify(&inputs(60_000), &cfg), EntityState::Expired);
    }

    #[test]
    fn stationary_needs_duration() {
        let cfg = TrackingConfig::default();
        let mut i = inputs(0);
        i.slow_for_ms = Some(4_999);
        assert_eq!(classify(&i, &cfg), EntityState::Animating);
        i.slow_for_ms = Some(5_000);
        assert_eq!(classify(&i, &cfg), EntityState::Stationary);
    }

    #[test]
    fn staleness_beats_stationary() {
        let cfg = TrackingConfig::default();
        let mut i = inputs(12_000);
        i.slow_for_ms = Some(60_000);
        assert_eq!(classify(&i, &cfg), EntityState::Stale);
    }

    #[test]
    fn no_animation_without_previous_sample_or_when_disabled() {
        let mut cfg = TrackingConfig::default();
        let mut i = inputs(0);
        i.has_motion = false;
        assert_eq!(classify(&i, &cfg), EntityState::Tracking);

        cfg.enable_animation = false;
        assert_eq!(classify(&inputs(0), &cfg), EntityState::Tracking);
    }

    #[test]
    fn expired_is_sticky() {
        let cfg = TrackingConfig::default();
        let mut i = inputs(0);
        i.current = EntityState::Expired;
        assert_eq!(classify(&i, &cfg), EntityState::Expired);
    }

    #[test]
    fn no_expiry_when_unconfigured() {
        let cfg = TrackingConfig::default();
        assert_eq!(classify(&inputs(u64::MAX), &cfg), EntityState::Offline);
    }
}

// ── Trail ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trail {
    use super::*;
    use crate::Trail;

    #[test]
    fn decimates_close_points() {
        let cfg = TrackingConfig::default(); // 5 m spacing
        let mut trail = Trail::new();
        assert!(trail.record(SF_A, &cfg));
        // ~1 m away: dropped.
        assert!(!trail.record(GeoPoint::new(SF_A.lat + 0.00001, SF_A.lon), &cfg));
        // ~11 m away: kept.
        assert!(trail.record(GeoPoint::new(SF_A.lat + 0.0001, SF_A.lon), &cfg));
        assert_eq!(trail.len(), 2);
    }

    #[test]
    fn evicts_oldest_first() {
        let cfg = TrackingConfig { max_trail_points: 3, ..TrackingConfig::default() };
        let mut trail = Trail::new();
        for i in 0..5 {
            trail.record(GeoPoint::new(0.001 * i as f64, 0.0), &cfg);
        }
        let pts = trail.to_vec();
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], GeoPoint::new(0.002, 0.0));
        assert_eq!(trail.last(), Some(GeoPoint::new(0.004, 0.0)));
    }

    #[test]
    fn disabled_trail_records_nothing() {
        let cfg = TrackingConfig { enable_trail: false, ..TrackingConfig::default() };
        let mut trail = Trail::new();
        assert!(!trail.record(SF_A, &cfg));
        assert!(trail.is_empty());
    }

    #[test]
    fn registry_records_trail_and_clears() {
        let mut reg = v1_registry();
        assert_eq!(reg.snapshot("v1").unwrap().trail, vec![SF_A, SF_B]);

        reg.apply_update(update("w", SF_A, 0)).unwrap();
        reg.clear_trail("v1").unwrap();
        assert!(reg.snapshot("v1").unwrap().trail.is_empty());
        assert_eq!(reg.snapshot("w").unwrap().trail.len(), 1);

        reg.clear_all_trails();
        assert!(reg.snapshot("w").unwrap().trail.is_empty());

        assert!(matches!(reg.clear_trail("nope"), Err(TrackError::UnknownEntity(_))));
    }
}

// ── Prediction ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod prediction {
    use super::*;
    use crate::predict;

    #[test]
    fn predicted_point_between_samples() {
        let mut reg = v1_registry();
        reg.tick(at(750));
        let snap = reg.snapshot("v1").unwrap();
        let p = snap.predicted_point.expect("prediction cached");

        assert!(p.lat > SF_A.lat && p.lat < SF_B.lat, "lat {}", p.lat);
        assert!(p.lon < SF_A.lon && p.lon > SF_B.lon, "lon {}", p.lon);
        assert_eq!(snap.display_point, p);
        // The real observation is untouched.
        assert_eq!(snap.point, SF_B);
    }

    #[test]
    fn beyond_window_returns_current_point() {
        let mut reg = v1_registry();
        reg.tick(at(500 + 2_001));
        let snap = reg.snapshot("v1").unwrap();
        assert_eq!(snap.predicted_point, Some(SF_B));
    }

    #[test]
    fn single_sample_has_no_prediction() {
        let mut reg = registry();
        reg.apply_update(update("solo", SF_A, 0)).unwrap();
        let summary = reg.tick(at(100));
        assert_eq!(summary.predicted, 0);
        let snap = reg.snapshot("solo").unwrap();
        assert_eq!(snap.predicted_point, None);
        assert_eq!(snap.display_point, SF_A);
    }

    #[test]
    fn disabled_prediction_caches_nothing() {
        let cfg = TrackingConfig { enable_prediction: false, ..TrackingConfig::default() };
        let mut reg = DynamicEntityRegistry::new(cfg).unwrap();
        reg.apply_update(update("v1", SF_A, 0)).unwrap();
        reg.apply_update(update("v1", SF_B, 500)).unwrap();
        reg.tick(at(750));
        assert_eq!(reg.snapshot("v1").unwrap().predicted_point, None);
    }

    #[test]
    fn offline_entities_are_not_predicted() {
        let mut reg = v1_registry();
        reg.tick(at(750));
        assert!(reg.snapshot("v1").unwrap().predicted_point.is_some());
        reg.tick(at(40_000));
        let snap = reg.snapshot("v1").unwrap();
        assert_eq!(snap.state, EntityState::Offline);
        assert_eq!(snap.predicted_point, None);
    }

    #[test]
    fn zero_interval_is_identity() {
        let reg = v1_registry();
        let mut entity = reg.entity("v1").unwrap().clone();
        entity.previous_updated = Some(entity.last_updated);
        let p = predict(&entity, at(700), reg.config()).unwrap();
        assert_eq!(p.point, SF_B);
        assert_eq!(p.t, 1.0);
    }

    #[test]
    fn heading_interpolates_shortest_arc() {
        let mut reg = registry();
        reg.apply_update(update("h", SF_A, 0).with_heading(350.0)).unwrap();
        reg.apply_update(update("h", SF_B, 1_000).with_heading(10.0)).unwrap();
        reg.tick(at(1_500));
        let h = reg.snapshot("h").unwrap().display_heading_deg.unwrap();
        assert!(h.abs() < 1e-9 || (h - 360.0).abs() < 1e-9, "got {h}");
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn new_entity_starts_tracking() {
        let mut reg = registry();
        assert_eq!(reg.apply_update(update("v1", SF_A, 0)), Ok(UpdateOutcome::Created));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Tracking);
        assert_eq!(reg.len(), 1);
        assert!(reg.contains("v1"));
    }

    #[test]
    fn v1_lifecycle_scenario() {
        let mut reg = v1_registry();

        reg.tick(at(600));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Animating);

        reg.tick(at(10_500));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Stale);

        reg.tick(at(30_500));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Offline);
    }

    #[test]
    fn missed_ticks_do_not_drift_state() {
        // Jumping straight to 30.5 s gives the same answer as ticking every frame.
        let mut reg = v1_registry();
        reg.tick(at(30_500));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Offline);
    }

    #[test]
    fn stale_timestamp_rejected_and_state_unchanged() {
        let mut reg = registry();
        reg.apply_update(update("v1", SF_A, 1_000)).unwrap();
        let before = reg.snapshot("v1").unwrap();

        let err = reg.apply_update(update("v1", SF_B, 500)).unwrap_err();
        assert!(matches!(err, TrackError::RejectedStaleUpdate { .. }));
        // Equal timestamps are also rejected.
        assert!(reg.apply_update(update("v1", SF_B, 1_000)).is_err());

        assert_eq!(reg.snapshot("v1").unwrap(), before);
        assert_eq!(reg.diagnostics().rejected_stale, 2);
    }

    #[test]
    fn invalid_coordinate_rejected_before_state() {
        let mut reg = registry();
        let err = reg.apply_update(update("bad", GeoPoint::new(95.0, 0.0), 0)).unwrap_err();
        assert!(matches!(err, TrackError::InvalidCoordinate(_)));
        assert!(reg.is_empty());
        assert_eq!(reg.diagnostics().rejected_invalid, 1);
    }

    #[test]
    fn offline_entity_recovers_on_fresh_update() {
        let mut reg = v1_registry();
        reg.tick(at(40_000));
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Offline);

        reg.apply_update(update("v1", SF_A, 40_100).with_speed(5.0)).unwrap();
        assert_eq!(reg.snapshot("v1").unwrap().state, EntityState::Animating);
    }

    #[test]
    fn stationary_after_sustained_low_speed() {
        let mut reg = registry();
        for s in 0..=6 {
            reg.apply_update(update("p", SF_A, s * 1_000).with_speed(0.1)).unwrap();
        }
        assert_eq!(reg.snapshot("p").unwrap().state, EntityState::Stationary);

        reg.tick(at(8_000));
        assert_eq!(reg.snapshot("p").unwrap().state, EntityState::Stationary);

        reg.apply_update(update("p", SF_B, 9_000).with_speed(3.0)).unwrap();
        assert_eq!(reg.snapshot("p").unwrap().state, EntityState::Animating);
    }

    #[test]
    fn speed_and_heading_derived_when_missing() {
        let mut reg = registry();
        reg.apply_update(update("d", GeoPoint::new(0.0, 0.0), 0)).unwrap();
        reg.apply_update(update("d", GeoPoint::new(0.0009, 0.0), 10_000)).unwrap();
        let snap = reg.snapshot("d").unwrap();
        let speed = snap.speed_mps.unwrap();
        assert!((speed - 10.0).abs() < 0.05, "got {speed}");
        assert_eq!(snap.heading_deg, Some(0.0));
    }

    #[test]
    fn reported_heading_is_normalised_and_garbage_dropped() {
        let mut reg = registry();
        let u = update("n", SF_A, 0)
            .with_heading(-90.0)
            .with_speed(f64::NAN)
            .with_accuracy(-3.0);
        reg.apply_update(u).unwrap();
        let snap = reg.snapshot("n").unwrap();
        assert_eq!(snap.heading_deg, Some(270.0));
        assert_eq!(snap.speed_mps, None);
        assert_eq!(snap.accuracy_m, None);
    }

    #[test]
    fn metadata_merges_across_updates() {
        let mut reg = registry();
        reg.apply_update(update("m", SF_A, 0).with_extra("callsign", "Alpha").with_extra("battery", 80_i64))
            .unwrap();
        reg.apply_update(update("m", SF_B, 100).with_extra("battery", 79_i64)).unwrap();
        let meta = reg.snapshot("m").unwrap().metadata;
        assert_eq!(meta.get("callsign"), Some(&"Alpha".into()));
        assert_eq!(meta.get("battery"), Some(&79_i64.into()));
    }

    #[test]
    fn expired_is_sticky_until_fresh_update() {
        let cfg = TrackingConfig::default().with_expiry(60_000);
        let mut reg = DynamicEntityRegistry::new(cfg).unwrap();
        reg.apply_update(update("x", SF_A, 0)).unwrap();
        reg.apply_update(update("x", SF_B, 1_000)).unwrap();

        reg.tick(at(61_000));
        assert_eq!(reg.snapshot("x").unwrap().state, EntityState::Expired);

        // A looser config does not revive it by time alone.
        reg.update_config(TrackingConfig::default().with_expiry(600_000)).unwrap();
        reg.tick(at(62_000));
        assert_eq!(reg.snapshot("x").unwrap().state, EntityState::Expired);

        let outcome = reg.apply_update(update("x", SF_A, 63_000)).unwrap();
        assert_eq!(outcome, UpdateOutcome::Resurrected);
        let snap = reg.snapshot("x").unwrap();
        assert_eq!(snap.state, EntityState::Tracking);
        assert_eq!(snap.trail, vec![SF_A]);
        assert!(reg.entity("x").unwrap().previous_point.is_none());
    }

    #[test]
    fn evict_expired_removes_only_expired() {
        let cfg = TrackingConfig::default().with_expiry(60_000);
        let mut reg = DynamicEntityRegistry::new(cfg).unwrap();
        reg.apply_update(update("old", SF_A, 0)).unwrap();
        reg.apply_update(update("new", SF_A, 50_000)).unwrap();
        reg.tick(at(70_000));

        let evicted = reg.evict_expired();
        assert_eq!(evicted, vec![gt_core::EntityId::from("old")]);
        assert_eq!(reg.ids(), vec![gt_core::EntityId::from("new")]);
    }

    #[test]
    fn batch_applies_each_item_independently() {
        let mut reg = registry();
        let results = reg.apply_batch(vec![
            update("a", SF_A, 0),
            update("a", SF_B, 100),
            update("a", SF_A, 50),
            update("b", GeoPoint::new(0.0, 200.0), 0),
            update("b", SF_A, 0),
        ]);
        assert_eq!(results.len(), 5);
        assert_eq!(results[0], Ok(UpdateOutcome::Created));
        assert_eq!(results[1], Ok(UpdateOutcome::Updated));
        assert!(matches!(results[2], Err(TrackError::RejectedStaleUpdate { .. })));
        assert!(matches!(results[3], Err(TrackError::InvalidCoordinate(_))));
        assert_eq!(results[4], Ok(UpdateOutcome::Created));

        let d = reg.diagnostics();
        assert_eq!((d.accepted, d.created, d.rejected_stale, d.rejected_invalid), (3, 2, 1, 1));
    }

    #[test]
    fn removal_is_idempotent() {
        let mut reg = registry();
        for id in ["a", "b", "c", "d"] {
            reg.apply_update(update(id, SF_A, 0)).unwrap();
        }
        assert!(reg.remove("a"));
        assert!(!reg.remove("a"));
        assert_eq!(reg.remove_many(["b", "zzz", "c"]), 2);
        assert_eq!(reg.remove_many(vec![String::from("b")]), 0);
        assert_eq!(reg.len(), 1);
        reg.clear();
        assert!(reg.is_empty());
        reg.clear();
        assert!(reg.snapshot("d").is_none());
    }

    #[test]
    fn snapshots_are_detached_copies() {
        let mut reg = v1_registry();
        let snap = reg.snapshot("v1").unwrap();
        reg.apply_update(update("v1", GeoPoint::new(37.78, -122.42), 1_000)).unwrap();
        assert_eq!(snap.point, SF_B);
        assert_ne!(reg.snapshot("v1").unwrap().point, SF_B);
    }

    #[test]
    fn snapshot_all_sorted_by_id() {
        let mut reg = registry();
        for id in ["charlie", "alpha", "bravo"] {
            reg.apply_update(update(id, SF_A, 0)).unwrap();
        }
        let ids: Vec<String> = reg.snapshot_all().into_iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, ["alpha", "bravo", "charlie"]);
    }

    #[test]
    fn tick_reports_changes_in_id_order() {
        let mut reg = registry();
        reg.apply_update(update("b", SF_A, 0)).unwrap();
        reg.apply_update(update("a", SF_A, 0)).unwrap();
        let summary = reg.tick(at(10_000));
        assert_eq!(summary.evaluated, 2);
        let ids: Vec<&str> = summary.changes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert!(summary.changes.iter().all(|c| c.to == EntityState::Stale));
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observers {
    use super::*;
    use crate::RegistryBuilder;

    #[test]
    fn observers_see_lifecycle_events() {
        let rec = Recorder::default();
        let mut reg = RegistryBuilder::new().observer(rec.clone()).build().unwrap();

        reg.apply_update(update("v1", SF_A, 0)).unwrap();
        reg.apply_update(update("v1", SF_B, 500)).unwrap();
        let _ = reg.apply_update(update("v1", SF_A, 100));
        let _ = reg.apply_update(update("v1", GeoPoint::new(0.0, 999.0), 900));
        reg.tick(at(10_500));
        reg.remove("v1");

        assert_eq!(
            rec.lines(),
            vec![
                "added v1 @0ms",
                "v1 tracking->animating",
                "rejected stale",
                "rejected invalid",
                "v1 animating->stale",
                "removed v1",
            ]
        );
    }

    #[test]
    fn multiple_observers_and_unsubscribe() {
        let first = Recorder::default();
        let second = Recorder::default();
        let mut reg = registry();
        let sub = reg.subscribe(first.clone());
        reg.subscribe(second.clone());

        reg.apply_update(update("a", SF_A, 0)).unwrap();
        assert!(reg.unsubscribe(sub));
        assert!(!reg.unsubscribe(sub));
        reg.apply_update(update("b", SF_A, 0)).unwrap();

        assert_eq!(first.lines().len(), 1);
        assert_eq!(second.lines().len(), 2);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::*;
    use crate::{StateInputs, Trail, classify};

    proptest! {
        #[test]
        fn trail_bounded_and_spaced(
            steps in prop::collection::vec((-0.0003f64..0.0003, -0.0003f64..0.0003), 1..200),
            max_points in 1usize..20,
            min_dist in 0.0f64..30.0,
        ) {
            let cfg = TrackingConfig {
                max_trail_points: max_points,
                min_trail_point_distance_m: min_dist,
                ..TrackingConfig::default()
            };
            let mut trail = Trail::new();
            let mut p = GeoPoint::new(45.0, 7.0);
            for (dlat, dlon) in steps {
                p = GeoPoint::new(p.lat + dlat, p.lon + dlon);
                trail.record(p, &cfg);
                prop_assert!(trail.len() <= max_points);
            }
            let pts = trail.to_vec();
            for pair in pts.windows(2) {
                prop_assert!(distance_m(pair[0], pair[1]) >= min_dist);
            }
        }

        #[test]
        fn state_never_recovers_with_time_alone(
            mut ages in prop::collection::vec(0u64..200_000, 1..50),
            slow_offset in prop::option::of(0u64..20_000),
        ) {
            ages.sort_unstable();
            let cfg = TrackingConfig::default().with_expiry(90_000);
            let mut current = EntityState::Tracking;
            let mut last_severity = 0;
            for elapsed_ms in ages {
                current = classify(
                    &StateInputs {
                        elapsed_ms,
                        slow_for_ms: slow_offset.map(|o| elapsed_ms + o),
                        has_motion:  true,
                        current,
                    },
                    &cfg,
                );
                prop_assert!(current.severity() >= last_severity);
                last_severity = current.severity();
            }
        }

        #[test]
        fn older_update_never_rewinds(t2 in 0u64..1_000, gap in 1u64..1_000) {
            let t1 = t2 + gap;
            let mut reg = registry();
            reg.apply_update(update("v", SF_A, t2)).unwrap();
            reg.apply_update(update("v", SF_B, t1)).unwrap();
            prop_assert!(reg.apply_update(update("v", SF_A, t2)).is_err());
            let e = reg.entity("v").unwrap();
            prop_assert_eq!(e.current_point, SF_B);
            prop_assert_eq!(e.last_updated, Timestamp(t1));
        }

        #[test]
        fn prediction_on_segment_then_current(
            dlat in -0.001f64..0.001,
            dlon in -0.001f64..0.001,
            dt in 1u64..5_000,
            frac in 0.0f64..=1.0,
        ) {
            let cfg = TrackingConfig { prediction_window_ms: 10_000, ..TrackingConfig::default() };
            let mut reg = DynamicEntityRegistry::new(cfg).unwrap();
            let a = SF_A;
            let b = GeoPoint::new(a.lat + dlat, a.lon + dlon);
            reg.apply_update(update("p", a, 1_000)).unwrap();
            reg.apply_update(update("p", b, 1_000 + dt)).unwrap();

            let elapsed = (dt as f64 * frac).floor() as u64;
            reg.tick(at(1_000 + dt + elapsed));
            let p = reg.snapshot("p").unwrap().predicted_point.unwrap();
            let along = distance_m(a, p) + distance_m(p, b);
            prop_assert!((along - distance_m(a, b)).abs() < 0.01);

            reg.tick(at(1_000 + dt + 10_001));
            prop_assert_eq!(reg.snapshot("p").unwrap().predicted_point, Some(b));
        }
    }
}
