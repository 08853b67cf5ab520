//! convoy — end-to-end replay for the geotrack live-position engine.
//!
//! Four trucks drive a fixed route around Mobile, Alabama, reporting noisy
//! GPS fixes roughly once a second.  The replay feeds them through the
//! registry, renders a frame every 250 ms of simulated time, clusters the
//! static POIs for the current viewport and drives the trip panel for the
//! lead truck.  Truck 3 loses its modem after 20 s so the
//! stale → offline → expired path is visible, and an occasional delayed
//! packet shows stale-update rejection.
//!
//! ```text
//! cargo run -p convoy                       # default tracking config
//! cargo run -p convoy -- tracking.json      # TrackingConfig as JSON
//! RUST_LOG=debug cargo run -p convoy        # every state change
//! ```

mod route;

use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use gt_cluster::StaticMarkerClusterer;
use gt_core::{EntityId, GeoPoint, Timestamp, Viewport};
use gt_tracking::{
    DynamicEntityRegistry, PositionUpdate, RegistryBuilder, RegistryObserver, StateChange,
    TrackError, TrackingConfig,
};
use gt_trip::{TripProgressSnapshot, TripProgressTracker};

use route::{Route, convoy_route, points_of_interest, trip_stops};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:              u64 = 42;
const SIM_MS:            u64 = 90_000;
const FRAME_MS:          u64 = 250;
const REPORT_MS:         u64 = 1_000;
const TABLE_EVERY_MS:    u64 = 15_000;
const PROGRESS_EVERY_MS: u64 = 5_000;
const DELAYED_EVERY_MS:  u64 = 17_000;

/// Std-dev-ish GPS noise in degrees (≈ 3 m).
const GPS_NOISE_DEG: f64 = 0.000_03;

// ── Fleet ─────────────────────────────────────────────────────────────────────

struct Truck {
    id:           &'static str,
    speed_mps:    f64,
    start_m:      f64,
    /// Probability that a given one-second report actually arrives.
    delivery:     f64,
    /// Stops reporting after this instant.
    silent_after: Option<u64>,
}

const FLEET: [Truck; 4] = [
    Truck { id: "truck-1", speed_mps: 14.0, start_m: 600.0, delivery: 0.95, silent_after: None },
    Truck { id: "truck-2", speed_mps: 12.5, start_m: 300.0, delivery: 0.85, silent_after: None },
    Truck { id: "truck-3", speed_mps: 11.0, start_m: 0.0,   delivery: 0.90, silent_after: Some(20_000) },
    Truck { id: "truck-4", speed_mps: 0.2,  start_m: 0.0,   delivery: 0.90, silent_after: None },
];

fn fix(truck: &Truck, route: &Route, now_ms: u64, rng: &mut SmallRng) -> PositionUpdate {
    let along = truck.start_m + truck.speed_mps * now_ms as f64 / 1_000.0;
    let (p, heading) = route.position_at(along);
    let noisy = GeoPoint::new(
        p.lat + rng.gen_range(-GPS_NOISE_DEG..GPS_NOISE_DEG),
        p.lon + rng.gen_range(-GPS_NOISE_DEG..GPS_NOISE_DEG),
    );
    PositionUpdate::new(truck.id, noisy, Timestamp(now_ms))
        .with_heading(heading)
        .with_speed(truck.speed_mps)
        .with_accuracy(rng.gen_range(3.0..12.0))
        .with_extra("fleet", "gulf-coast")
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Forwards registry events to the log.
struct EventLog;

impl RegistryObserver for EventLog {
    fn on_entity_added(&mut self, id: &EntityId, at: Timestamp) {
        info!(entity = %id, %at, "vehicle joined");
    }

    fn on_state_changed(&mut self, change: &StateChange) {
        if change.to.severity() > change.from.severity() {
            warn!(entity = %change.id, from = %change.from, to = %change.to, "vehicle degraded");
        } else {
            debug!(entity = %change.id, from = %change.from, to = %change.to, "state");
        }
    }

    fn on_update_rejected(&mut self, error: &TrackError) {
        info!(%error, "update dropped");
    }

    fn on_entity_removed(&mut self, id: &EntityId) {
        info!(entity = %id, "vehicle removed");
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// First CLI argument, if any, is a JSON `TrackingConfig`; missing fields
/// take their defaults.
fn load_config() -> Result<TrackingConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let config = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
            info!(%path, "loaded tracking config");
            Ok(config)
        }
        None => Ok(TrackingConfig::default().with_expiry(60_000)),
    }
}

fn print_clusters(viewport: &Viewport) {
    let pois = points_of_interest();
    let locations: Vec<GeoPoint> = pois.iter().map(|(_, p)| *p).collect();
    let clusterer = StaticMarkerClusterer::for_viewport(viewport, 48.0);
    let clusters = clusterer.cluster(&locations);

    println!(
        "POIs: {} → {} markers at zoom {:.1} (radius {:.0} m)",
        pois.len(),
        clusters.len(),
        viewport.zoom,
        clusterer.radius_m()
    );
    for c in &clusters {
        let names: Vec<&str> = c.members.iter().map(|&i| pois[i].0).collect();
        println!("  {:>2} × {}  [{}]", c.len(), c.centroid, names.join(", "));
    }
    println!();
}

fn print_table(registry: &DynamicEntityRegistry, viewport: &Viewport, now: Timestamp) {
    println!("── {now} ─────────────────────────────────────────────────────────────");
    println!("{:<9} {:<11} {:>7} {:>6} {:>20}  {}", "Vehicle", "State", "Speed", "Trail", "Position", "Screen");
    for snap in registry.snapshot_all() {
        let screen = match snap.screen_position(viewport) {
            Some(s) => format!("({:>6.1}, {:>6.1})", s.x, s.y),
            None => match snap.edge_indicator(viewport, 24.0) {
                Some(edge) => format!("edge {:>4.0}°", edge.angle_deg),
                None => String::from("-"),
            },
        };
        println!(
            "{:<9} {:<11} {:>7} {:>6} {:>20}  {}",
            snap.id.as_str(),
            snap.state.as_str(),
            snap.speed_mps.map_or(String::from("-"), |s| format!("{s:.1}")),
            snap.trail.len(),
            snap.display_point.to_string(),
            screen,
        );
    }
    println!();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    let mut registry = RegistryBuilder::new().config(config).observer(EventLog).build()?;

    let route = convoy_route();
    let viewport = Viewport::new(GeoPoint::new(30.692, -88.050), 1_280.0, 720.0, 13.5).with_bearing(15.0);

    println!("=== convoy — geotrack live-position replay ===");
    println!(
        "Trucks: {}  |  Route: {:.1} km  |  Sim: {} s  |  Seed: {SEED}",
        FLEET.len(),
        route.length_m() / 1_000.0,
        SIM_MS / 1_000
    );
    println!();
    print_clusters(&viewport);

    let mut trip = TripProgressTracker::new();
    trip.set_waypoints(trip_stops(&route))?;
    trip.subscribe(|s: &TripProgressSnapshot| {
        println!(
            "  trip: stop {}/{} {:<20} in {:>7} ({}){}",
            s.stop_number,
            s.total_stops,
            s.waypoint.name,
            s.distance_text,
            s.duration_text,
            if s.is_final_leg { "  [final]" } else { "" },
        );
    });

    let mut rng = SmallRng::seed_from_u64(SEED);
    let mut held_back: Option<PositionUpdate> = None;
    let t0 = Instant::now();

    for now_ms in (0..=SIM_MS).step_by(FRAME_MS as usize) {
        let now = Timestamp(now_ms);

        if now_ms % REPORT_MS == 0 {
            let mut batch = Vec::with_capacity(FLEET.len());
            for truck in &FLEET {
                let online = truck.silent_after.is_none_or(|s| now_ms <= s);
                if online && rng.gen_bool(truck.delivery) {
                    batch.push(fix(truck, &route, now_ms, &mut rng));
                }
            }

            // Keep one of truck-1's fixes back and deliver it late.
            if now_ms % DELAYED_EVERY_MS == 0 {
                held_back = batch.iter().find(|u| u.entity_id.as_str() == "truck-1").cloned();
            }
            registry.apply_batch(batch);
            if now_ms % DELAYED_EVERY_MS == 2_000 {
                if let Some(late) = held_back.take() {
                    let _ = registry.apply_update(late);
                }
            }
        }

        registry.tick(now);

        if now_ms % PROGRESS_EVERY_MS == 0 {
            let lead = &FLEET[0];
            let along = lead.start_m + lead.speed_mps * now_ms as f64 / 1_000.0;
            let next = route.next_vertex(along);
            let to_next = (route.cumulative_m[next] - along).max(0.0);
            let remaining = (route.length_m() - along).max(0.0);
            trip.update_progress(
                next as i64 - 1,
                to_next,
                to_next / lead.speed_mps,
                remaining,
                remaining / lead.speed_mps,
            );
        }

        if now_ms % TABLE_EVERY_MS == 0 {
            print_table(&registry, &viewport, now);
        }
    }

    let evicted = registry.evict_expired();
    let d = registry.diagnostics();
    println!("Replay complete in {:.3} s", t0.elapsed().as_secs_f64());
    println!(
        "  accepted {}  created {}  rejected (stale {} / invalid {})  ticks {}",
        d.accepted, d.created, d.rejected_stale, d.rejected_invalid, d.ticks
    );
    let evicted: Vec<&str> = evicted.iter().map(EntityId::as_str).collect();
    println!("  evicted: [{}]", evicted.join(", "));

    Ok(())
}
