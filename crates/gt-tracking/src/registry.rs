//! The `DynamicEntityRegistry` — owner of every tracked entity.

use gt_core::{EntityId, SubscriptionId, Timestamp};
use tracing::{debug, info, trace, warn};

use crate::entity::StateChange;
use crate::{
    DynamicEntity, EntityState, MarkerSnapshot, PositionUpdate, RegistryObserver, TrackError,
    TrackResult, TrackingConfig,
};

#[cfg(feature = "fx-hash")]
type EntityMap = rustc_hash::FxHashMap<EntityId, DynamicEntity>;
#[cfg(not(feature = "fx-hash"))]
type EntityMap = std::collections::HashMap<EntityId, DynamicEntity>;

// ── Result types ──────────────────────────────────────────────────────────────

/// What an accepted update did.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum UpdateOutcome {
    /// First update for this id; a new entity now exists.
    Created,
    /// An existing entity moved forward.
    Updated,
    /// An `Expired` entity was brought back with a fresh history.
    Resurrected,
}

/// Result of one [`DynamicEntityRegistry::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    /// Entities reclassified.
    pub evaluated: usize,
    /// Entities that carry a fresh prediction after the tick.
    pub predicted: usize,
    /// Transitions in ascending id order.
    pub changes: Vec<StateChange>,
}

/// Running counters for diagnostics overlays and logs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub accepted:         u64,
    pub created:          u64,
    pub resurrected:      u64,
    pub rejected_stale:   u64,
    pub rejected_invalid: u64,
    pub removed:          u64,
    pub ticks:            u64,
}

// ── DynamicEntityRegistry ─────────────────────────────────────────────────────

/// Owns all tracked entities and drives their lifecycle.
///
/// Create one per tracking session (see
/// [`RegistryBuilder`][crate::RegistryBuilder]) and drop it when the
/// session ends.  Mutation goes through `&mut self`, so a registry shared
/// between threads must sit behind the caller's lock; reads hand out owned
/// [`MarkerSnapshot`]s that never alias internal state.
///
/// # Flow
///
/// 1. [`apply_update`][Self::apply_update] folds a real observation into its
///    entity, records the trail and reclassifies at the update's timestamp.
/// 2. [`tick`][Self::tick] reclassifies every entity at `now` and caches a
///    predicted render position for live ones.
/// 3. [`snapshot`][Self::snapshot] / [`snapshot_all`][Self::snapshot_all]
///    copy the result out for rendering.
pub struct DynamicEntityRegistry {
    config:            TrackingConfig,
    entities:          EntityMap,
    observers:         Vec<(SubscriptionId, Box<dyn RegistryObserver>)>,
    next_subscription: SubscriptionId,
    diagnostics:       Diagnostics,
}

impl DynamicEntityRegistry {
    /// Create an empty registry.  Fails if `config` is invalid.
    pub fn new(config: TrackingConfig) -> TrackResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            entities:          EntityMap::default(),
            observers:         Vec::new(),
            next_subscription: SubscriptionId(0),
            diagnostics:       Diagnostics::default(),
        })
    }

    // ── Configuration ─────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Replace the configuration.  On error the previous config is kept.
    ///
    /// The new values apply from the next update or tick; existing trails
    /// and states are not rewritten.
    pub fn update_config(&mut self, config: TrackingConfig) -> TrackResult<()> {
        if let Err(e) = config.validate() {
            warn!(error = %e, "rejected tracking configuration; keeping previous");
            return Err(e.into());
        }
        info!(
            stale_ms   = config.stale_threshold_ms,
            offline_ms = config.offline_threshold_ms,
            expired_ms = ?config.expired_threshold_ms,
            "tracking configuration updated"
        );
        self.config = config;
        Ok(())
    }

    // ── Observers ─────────────────────────────────────────────────────────

    /// Register an observer; returns the handle needed to unsubscribe.
    pub fn subscribe<O: RegistryObserver + 'static>(&mut self, observer: O) -> SubscriptionId {
        self.subscribe_boxed(Box::new(observer))
    }

    /// [`subscribe`][Self::subscribe] for an already boxed observer.
    pub fn subscribe_boxed(&mut self, observer: Box<dyn RegistryObserver>) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription = id.next();
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer.  Returns `false` if the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // ── Ingress ───────────────────────────────────────────────────────────

    /// Apply one position update.
    ///
    /// # Errors
    ///
    /// - [`TrackError::InvalidCoordinate`] if the point is outside the valid
    ///   range; nothing is touched.
    /// - [`TrackError::RejectedStaleUpdate`] if the timestamp is not newer
    ///   than the entity's `last_updated`; the update is dropped.
    pub fn apply_update(&mut self, update: PositionUpdate) -> TrackResult<UpdateOutcome> {
        if let Err(e) = update.point.validate() {
            self.diagnostics.rejected_invalid += 1;
            debug!(entity = %update.entity_id, error = %e, "rejected update");
            let err = TrackError::from(e);
            self.notify(|o| o.on_update_rejected(&err));
            return Err(err);
        }
        let update = update.sanitized();
        let at = update.timestamp;

        let (outcome, change) = match self.entities.get_mut(update.entity_id.as_str()) {
            Some(entity) if at <= entity.last_updated => {
                let err = TrackError::RejectedStaleUpdate {
                    id:        update.entity_id,
                    timestamp: at,
                    last:      entity.last_updated,
                };
                self.diagnostics.rejected_stale += 1;
                debug!(error = %err, "rejected update");
                self.notify(|o| o.on_update_rejected(&err));
                return Err(err);
            }
            Some(entity) if entity.state == EntityState::Expired => {
                *entity = DynamicEntity::new(update, &self.config);
                debug!(entity = %entity.id, %at, "expired entity resurrected");
                let change = StateChange {
                    id:   entity.id.clone(),
                    from: EntityState::Expired,
                    to:   entity.state,
                };
                (UpdateOutcome::Resurrected, Some(change))
            }
            Some(entity) => {
                let change = entity.apply(update, &self.config);
                (UpdateOutcome::Updated, change)
            }
            None => {
                let entity = DynamicEntity::new(update, &self.config);
                debug!(entity = %entity.id, %at, "tracking new entity");
                let id = entity.id.clone();
                self.entities.insert(id.clone(), entity);
                self.notify(|o| o.on_entity_added(&id, at));
                (UpdateOutcome::Created, None)
            }
        };

        self.diagnostics.accepted += 1;
        match outcome {
            UpdateOutcome::Created     => self.diagnostics.created += 1,
            UpdateOutcome::Resurrected => self.diagnostics.resurrected += 1,
            UpdateOutcome::Updated     => {}
        }
        if let Some(change) = change {
            trace!(entity = %change.id, from = %change.from, to = %change.to, "state changed");
            self.notify(|o| o.on_state_changed(&change));
        }
        Ok(outcome)
    }

    /// Apply each update independently; one failure never stops the rest.
    pub fn apply_batch<I>(&mut self, updates: I) -> Vec<TrackResult<UpdateOutcome>>
    where
        I: IntoIterator<Item = PositionUpdate>,
    {
        updates.into_iter().map(|u| self.apply_update(u)).collect()
    }

    /// Re-evaluate every entity at `now` and refresh cached predictions.
    ///
    /// `current_point` is never modified here.  With the `parallel` feature
    /// the per-entity pass runs on Rayon; observers are still notified
    /// sequentially in ascending id order.
    pub fn tick(&mut self, now: Timestamp) -> TickSummary {
        let config = &self.config;
        let step = |(_, entity): (&EntityId, &mut DynamicEntity)| {
            let change = entity.reclassify(now, config);
            let predicted = entity.refresh_prediction(now, config);
            (change, predicted)
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<(Option<StateChange>, bool)> = self.entities.iter_mut().map(step).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<(Option<StateChange>, bool)> = {
            use rayon::prelude::*;
            self.entities.par_iter_mut().map(step).collect()
        };

        let evaluated = results.len();
        let predicted = results.iter().filter(|(_, p)| *p).count();
        let mut changes: Vec<StateChange> = results.into_iter().filter_map(|(c, _)| c).collect();
        changes.sort_by(|a, b| a.id.cmp(&b.id));

        for change in &changes {
            trace!(entity = %change.id, from = %change.from, to = %change.to, "state changed");
            self.notify(|o| o.on_state_changed(change));
        }
        self.diagnostics.ticks += 1;

        TickSummary { evaluated, predicted, changes }
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Stop tracking `id`.  Returns `false` if it was not tracked.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entities.remove(id) {
            Some(entity) => {
                self.after_remove(&entity.id);
                true
            }
            None => false,
        }
    }

    /// Remove several ids; missing ones are ignored.  Returns how many were
    /// removed.
    pub fn remove_many<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter().filter(|id| self.remove(id.as_ref())).count()
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        let mut ids: Vec<EntityId> = self.entities.drain().map(|(id, _)| id).collect();
        ids.sort();
        for id in &ids {
            self.after_remove(id);
        }
    }

    /// Remove every entity in `Expired`; returns their ids, sorted.
    pub fn evict_expired(&mut self) -> Vec<EntityId> {
        let mut expired: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.state == EntityState::Expired)
            .map(|e| e.id.clone())
            .collect();
        expired.sort();
        for id in &expired {
            self.entities.remove(id);
            self.after_remove(id);
        }
        expired
    }

    // ── Trails ────────────────────────────────────────────────────────────

    /// Empty one entity's trail.
    ///
    /// # Errors
    ///
    /// [`TrackError::UnknownEntity`] if `id` is not tracked.
    pub fn clear_trail(&mut self, id: &str) -> TrackResult<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or_else(|| TrackError::UnknownEntity(EntityId::from(id)))?;
        entity.trail.clear();
        Ok(())
    }

    /// Empty every trail.
    pub fn clear_all_trails(&mut self) {
        for entity in self.entities.values_mut() {
            entity.trail.clear();
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Render-ready copy of one entity, `None` if unknown.
    pub fn snapshot(&self, id: &str) -> Option<MarkerSnapshot> {
        self.entities.get(id).map(MarkerSnapshot::from_entity)
    }

    /// Copies of every entity, sorted by id.
    pub fn snapshot_all(&self) -> Vec<MarkerSnapshot> {
        let mut all: Vec<MarkerSnapshot> = self.entities.values().map(MarkerSnapshot::from_entity).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    /// Read-only access to the live record, for inspection and tests.
    pub fn entity(&self, id: &str) -> Option<&DynamicEntity> {
        self.entities.get(id)
    }

    /// Tracked ids, sorted.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[inline]
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn after_remove(&mut self, id: &EntityId) {
        self.diagnostics.removed += 1;
        debug!(entity = %id, "entity removed");
        self.notify(|o| o.on_entity_removed(id));
    }

    fn notify<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Box<dyn RegistryObserver>),
    {
        for (_, observer) in &mut self.observers {
            f(observer);
        }
    }
}
