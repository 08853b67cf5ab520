//! `gt-tracking` — live entity registry, lifecycle states, trails and
//! dead-reckoning for the geotrack engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`config`]    | `TrackingConfig` — thresholds, trail limits, feature switches   |
//! | [`update`]    | `PositionUpdate`, `Metadata` — ingress type                     |
//! | [`state`]     | `EntityState`, `classify` — pure lifecycle classifier           |
//! | [`trail`]     | `Trail` — bounded, distance-decimated trail recorder            |
//! | [`predict`]   | `predict`, `Prediction` — dead-reckoning between updates        |
//! | [`entity`]    | `DynamicEntity`, `StateChange` — per-entity record              |
//! | [`registry`]  | `DynamicEntityRegistry` — owner of all entities                 |
//! | [`builder`]   | `RegistryBuilder` — fluent construction                         |
//! | [`snapshot`]  | `MarkerSnapshot` — render-ready deep copies                     |
//! | [`observer`]  | `RegistryObserver` — zero or more change subscribers            |
//! | [`error`]     | `TrackError`, `ConfigError`, `TrackResult<T>`                   |
//!
//! # Update / tick model
//!
//! ```text
//! apply_update(u) ─▶ reject stale/invalid ─▶ shift current→previous
//!                                          ─▶ trail.record ─▶ classify(now = u.timestamp)
//! tick(now)       ─▶ for every entity: classify(now), predict(now) if live
//! snapshot(id)    ─▶ owned MarkerSnapshot
//! ```
//!
//! States are a pure function of elapsed time since the last real update,
//! the recent speed history and the config, so a late or skipped tick never
//! leaves an entity in the wrong state.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Runs the per-entity pass of `tick` on Rayon's thread pool. |
//! | `fx-hash`  | FxHash instead of SipHash for the entity map.              |
//! | `serde`    | Serialize/deserialize config, updates and snapshots.       |

pub mod builder;
pub mod config;
pub mod entity;
pub mod error;
pub mod observer;
pub mod predict;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod trail;
pub mod update;

#[cfg(test)]
mod tests;

pub use builder::RegistryBuilder;
pub use config::TrackingConfig;
pub use entity::{DynamicEntity, StateChange};
pub use error::{ConfigError, TrackError, TrackResult};
pub use observer::{NoopObserver, RegistryObserver};
pub use predict::{Prediction, predict};
pub use registry::{Diagnostics, DynamicEntityRegistry, TickSummary, UpdateOutcome};
pub use snapshot::MarkerSnapshot;
pub use state::{EntityState, StateInputs, classify};
pub use trail::Trail;
pub use update::{Metadata, MetadataValue, PositionUpdate};
