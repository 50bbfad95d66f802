//! Identity map and change tracking for one entity type.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;

use domain::Identifiable;
use uuid::Uuid;

/// Relationship between an entity instance and its persistence context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Tracked and in sync with the store
    Unchanged,
    /// Staged for insert
    Added,
    /// Staged for a full overwrite
    Modified,
    /// Staged for delete
    Removed,
    /// Not tracked by the context
    Detached,
}

impl EntityState {
    /// Whether the next commit has work to do for this state
    pub fn is_pending(&self) -> bool {
        matches!(self, EntityState::Added | EntityState::Modified | EntityState::Removed)
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    state: EntityState,
    entity: T,
}

/// Tracked set of entities of one type, keyed by identifier.
///
/// Holds at most one instance per identifier. Detached entities are simply
/// absent from the map. Entries read from the store stay tracked as
/// `Unchanged` until the set is cleared, so memory grows with the number of
/// distinct identifiers read, not with the number of reads.
#[derive(Debug, Clone)]
pub struct EntitySet<T> {
    entries: HashMap<Uuid, Entry<T>>,
}

impl<T> Default for EntitySet<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Identifiable> EntitySet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the entity with this identifier.
    pub fn state_of(&self, id: Uuid) -> EntityState {
        self.entries
            .get(&id)
            .map(|entry| entry.state)
            .unwrap_or(EntityState::Detached)
    }

    /// Tracked instance for this identifier, if any.
    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.entries.get(&id).map(|entry| &entry.entity)
    }

    /// Stage an entity for insert.
    ///
    /// Replaces whatever was tracked under the same identifier; a collision
    /// with an existing row is reported by the store on commit.
    pub fn add(&mut self, entity: T) {
        self.put(EntityState::Added, entity);
    }

    /// Start tracking an entity as unchanged if it is not tracked yet.
    pub fn attach(&mut self, entity: T) {
        if let MapEntry::Vacant(slot) = self.entries.entry(entity.id()) {
            slot.insert(Entry {
                state: EntityState::Unchanged,
                entity,
            });
        }
    }

    /// Record a value read from the store.
    ///
    /// Entries with pending changes keep their staged value.
    pub fn track_unchanged(&mut self, entity: T) {
        match self.entries.entry(entity.id()) {
            MapEntry::Occupied(mut slot) => {
                if !slot.get().state.is_pending() {
                    slot.get_mut().entity = entity;
                }
            }
            MapEntry::Vacant(slot) => {
                slot.insert(Entry {
                    state: EntityState::Unchanged,
                    entity,
                });
            }
        }
    }

    /// Stage a full overwrite, whatever the entity's previous state.
    pub fn mark_modified(&mut self, entity: T) {
        self.put(EntityState::Modified, entity);
    }

    /// Stage a delete.
    ///
    /// An entity that was only staged for insert is detached instead, since
    /// the store never saw it.
    pub fn remove(&mut self, entity: T) {
        if self.state_of(entity.id()) == EntityState::Added {
            self.entries.remove(&entity.id());
            return;
        }
        self.put(EntityState::Removed, entity);
    }

    /// Whether any entry awaits a commit.
    pub fn has_changes(&self) -> bool {
        self.entries.values().any(|entry| entry.state.is_pending())
    }

    /// Entries awaiting a commit, with their staged state.
    pub fn pending(&self) -> impl Iterator<Item = (EntityState, &T)> {
        self.entries
            .values()
            .filter(|entry| entry.state.is_pending())
            .map(|entry| (entry.state, &entry.entity))
    }

    /// Mark the staged changes as written: inserts and overwrites become
    /// unchanged, deletes become detached.
    pub fn accept_changes(&mut self) {
        self.entries.retain(|_, entry| entry.state != EntityState::Removed);
        for entry in self.entries.values_mut() {
            entry.state = EntityState::Unchanged;
        }
    }

    /// Detach every entry with pending changes.
    pub fn discard_changes(&mut self) {
        self.entries.retain(|_, entry| !entry.state.is_pending());
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detach everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn put(&mut self, state: EntityState, entity: T) {
        self.entries.insert(entity.id(), Entry { state, entity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ExchangeRate;

    fn rate(name: &str, value: f64) -> ExchangeRate {
        ExchangeRate::new(name, value)
    }

    #[test]
    fn test_untracked_is_detached() {
        let set = EntitySet::<ExchangeRate>::new();
        assert_eq!(set.state_of(Uuid::new_v4()), EntityState::Detached);
        assert!(!set.has_changes());
    }

    #[test]
    fn test_add_then_accept() {
        let mut set = EntitySet::new();
        let usd = rate("USD-EUR", 1.0);
        let id = usd.id;

        set.add(usd);
        assert_eq!(set.state_of(id), EntityState::Added);
        assert!(set.has_changes());

        set.accept_changes();
        assert_eq!(set.state_of(id), EntityState::Unchanged);
        assert!(!set.has_changes());
    }

    #[test]
    fn test_attach_keeps_existing_entry() {
        let mut set = EntitySet::new();
        let usd = rate("USD-EUR", 1.0);
        let id = usd.id;
        set.mark_modified(usd.clone());

        set.attach(usd);
        assert_eq!(set.state_of(id), EntityState::Modified);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_then_accept_detaches() {
        let mut set = EntitySet::new();
        let usd = rate("USD-EUR", 1.0);
        let id = usd.id;
        set.attach(usd.clone());

        set.remove(usd);
        assert_eq!(set.state_of(id), EntityState::Removed);

        set.accept_changes();
        assert_eq!(set.state_of(id), EntityState::Detached);
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_added_entity_detaches_without_staging() {
        let mut set = EntitySet::new();
        let usd = rate("USD-EUR", 1.0);
        let id = usd.id;
        set.add(usd.clone());

        set.remove(usd);
        assert_eq!(set.state_of(id), EntityState::Detached);
        assert!(!set.has_changes());
    }

    #[test]
    fn test_mark_modified_overrides_unchanged() {
        let mut set = EntitySet::new();
        let mut usd = rate("USD-EUR", 1.0);
        let id = usd.id;
        set.track_unchanged(usd.clone());

        usd.set_rate(1.05);
        set.mark_modified(usd);
        assert_eq!(set.state_of(id), EntityState::Modified);
        assert_eq!(set.get(id).map(|r| r.rate), Some(1.05));
    }

    #[test]
    fn test_track_unchanged_does_not_clobber_pending() {
        let mut set = EntitySet::new();
        let mut usd = rate("USD-EUR", 1.0);
        let id = usd.id;
        let stored = usd.clone();

        usd.set_rate(2.0);
        set.mark_modified(usd);
        set.track_unchanged(stored);

        assert_eq!(set.state_of(id), EntityState::Modified);
        assert_eq!(set.get(id).map(|r| r.rate), Some(2.0));
    }

    #[test]
    fn test_discard_changes_keeps_unchanged() {
        let mut set = EntitySet::new();
        let kept = rate("USD-EUR", 1.0);
        let dropped = rate("GBP-EUR", 1.2);
        let (kept_id, dropped_id) = (kept.id, dropped.id);

        set.track_unchanged(kept);
        set.add(dropped);
        set.discard_changes();

        assert_eq!(set.state_of(kept_id), EntityState::Unchanged);
        assert_eq!(set.state_of(dropped_id), EntityState::Detached);
    }

    #[test]
    fn test_one_instance_per_id() {
        let mut set = EntitySet::new();
        let usd = rate("USD-EUR", 1.0);

        set.track_unchanged(usd.clone());
        set.add(usd.clone());
        set.mark_modified(usd);

        assert_eq!(set.len(), 1);
        assert_eq!(set.pending().count(), 1);
    }
}
