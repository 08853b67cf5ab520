//! `gt-cluster` — display-density clustering of static map markers.
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`cluster`] | `cluster`, `Cluster`, `ClusterPoint`, `StaticMarkerClusterer` |
//!
//! Clustering is a greedy heuristic for decluttering a map, not a spatial
//! analysis tool.  Candidate lookups go through an R-tree (via `rstar`) of
//! cluster representatives so large POI sets stay fast; results are
//! identical to a naive scan of every earlier cluster.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Cluster`.       |

pub mod cluster;
mod index;


pub use cluster::{Cluster, ClusterPoint, StaticMarkerClusterer, cluster};
