//! Registry observer trait for UI bridges and diagnostics.

use gt_core::{EntityId, Timestamp};

use crate::{StateChange, TrackError};

/// Callbacks invoked by the registry as entities come, change and go.
///
/// Any number of observers may be subscribed; each is called in
/// subscription order.  All methods have default no-op implementations so
/// implementors only override what they care about.
///
/// # Example: state-change logger
///
/// ```rust,ignore
/// struct Printer;
///
/// impl RegistryObserver for Printer {
///     fn on_state_changed(&mut self, change: &StateChange) {
///         println!("{}: {} -> {}", change.id, change.from, change.to);
///     }
/// }
/// ```
pub trait RegistryObserver: Send {
    /// A previously unseen id received its first update.
    fn on_entity_added(&mut self, _id: &EntityId, _at: Timestamp) {}

    /// An entity moved between lifecycle states, during an update or a
    /// tick.  Tick-driven changes are reported in ascending id order.
    fn on_state_changed(&mut self, _change: &StateChange) {}

    /// An update was dropped (stale timestamp or invalid coordinate).
    fn on_update_rejected(&mut self, _error: &TrackError) {}

    /// An entity was removed, explicitly or by expiry eviction.
    fn on_entity_removed(&mut self, _id: &EntityId) {}
}

/// A [`RegistryObserver`] that does nothing.
pub struct NoopObserver;

impl RegistryObserver for NoopObserver {}
