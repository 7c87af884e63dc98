use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};

use crate::entities::ManagedEvent;
use crate::value_objects::RemoteId;

/// A working copy of the persisted events that an import mutates before the
/// store commits it.
///
/// Entities are keyed by [`RemoteId`]; at most one entity exists per id.
#[derive(Debug, Clone)]
pub struct EventContext {
    entities: HashMap<RemoteId, ManagedEvent>,
    inserted: BTreeSet<RemoteId>,
    updated: BTreeSet<RemoteId>,
    opened_at: DateTime<Utc>,
}

/// Entities a context created or changed, ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub inserted: Vec<ManagedEvent>,
    pub updated: Vec<ManagedEvent>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty()
    }
}

impl EventContext {
    pub fn new(existing: Vec<ManagedEvent>, opened_at: DateTime<Utc>) -> Self {
        let entities = existing
            .into_iter()
            .map(|entity| (entity.remote_id.clone(), entity))
            .collect();
        Self {
            entities,
            inserted: BTreeSet::new(),
            updated: BTreeSet::new(),
            opened_at,
        }
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, remote_id: &RemoteId) -> Option<&ManagedEvent> {
        self.entities.get(remote_id)
    }

    /// Returns the entity for `remote_id`, creating and registering a new one
    /// when none exists. The flag is `true` when the entity was created.
    pub fn find_or_create(&mut self, remote_id: &RemoteId) -> (&mut ManagedEvent, bool) {
        let created = !self.entities.contains_key(remote_id);
        if created {
            self.inserted.insert(remote_id.clone());
        }
        let opened_at = self.opened_at;
        let entity = self
            .entities
            .entry(remote_id.clone())
            .or_insert_with(|| ManagedEvent::new(remote_id.clone(), opened_at));
        (entity, created)
    }

    /// Records that an existing entity changed. Entities created in this
    /// context are already tracked as inserts.
    pub fn mark_updated(&mut self, remote_id: &RemoteId) {
        if self.entities.contains_key(remote_id) && !self.inserted.contains(remote_id) {
            self.updated.insert(remote_id.clone());
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.inserted.is_empty() || !self.updated.is_empty()
    }

    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn into_changes(mut self) -> ChangeSet {
        let inserted = self
            .inserted
            .iter()
            .filter_map(|id| self.entities.remove(id))
            .collect();
        let updated = self
            .updated
            .iter()
            .filter_map(|id| self.entities.remove(id))
            .collect();
        ChangeSet { inserted, updated }
    }
}
