use chrono::Utc;
use serde_json::Value;

use crate::error::SyncError;
use crate::model::{self, merge, Disposition, Entity, Record};
use crate::pool::IdPool;
use crate::store::EntityStore;

/// Decides create vs update for one record and issues the write.
///
/// Stateless across records apart from the id pool it owns. Hard
/// errors (lookup, write, allocation) are never caught here; soft
/// conditions surface through [`Disposition`].
pub struct Reconciler<'a> {
    store: &'a dyn EntityStore,
    pool: IdPool<'a>,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn EntityStore, pool: IdPool<'a>) -> Self {
        Self { store, pool }
    }

    /// Reconcile one record into the store.
    pub fn upsert(
        &mut self,
        entity_type: &str,
        record: &Record,
    ) -> Result<Disposition, SyncError> {
        let existing = self
            .store
            .find(model::EXTERNAL_ID, record.external_id(), entity_type)?;

        match existing {
            None => self.create(entity_type, record),
            Some(existing) => self.update(entity_type, record, existing),
        }
    }

    /// Resolve an external parent reference to an internal id.
    fn resolve_parent(
        &self,
        entity_type: &str,
        parent_external_id: &str,
    ) -> Result<Option<String>, SyncError> {
        Ok(self
            .store
            .find(model::EXTERNAL_ID, parent_external_id, entity_type)?
            .map(|parent| parent.id().to_string()))
    }

    /// Create path: the parent link may be deferred to the second
    /// pass, but creation itself never blocks on it.
    fn create(
        &mut self,
        entity_type: &str,
        record: &Record,
    ) -> Result<Disposition, SyncError> {
        let mut entity = Entity::from_fields(record.fields().clone());

        let mut deferred = false;
        match record.parent_ref() {
            None => entity.set_parent_id("0"),
            Some(parent_ref) => match self.resolve_parent(entity_type, &parent_ref)? {
                Some(parent_id) => entity.set_parent_id(&parent_id),
                None => {
                    // temporary root link until the parent is committed
                    entity.set_parent_id("0");
                    deferred = true;
                }
            },
        }

        entity.mark_external();
        entity.set_disabled(
            record
                .is_disabled()
                .then(|| model::disabled_stamp(Utc::now())),
        );
        entity.insert("name", Value::String(record.display_name().to_string()));

        let id = self.pool.next_id()?;
        entity.set_id(&id);
        self.store.write(entity_type, &id, &entity)?;

        Ok(if deferred {
            Disposition::NeedsRetry
        } else {
            Disposition::Committed
        })
    }

    /// Update path: merge, resolve the parent (or abandon the write),
    /// apply disabled edges, skip the write when nothing changed.
    fn update(
        &self,
        entity_type: &str,
        record: &Record,
        existing: Entity,
    ) -> Result<Disposition, SyncError> {
        let mut candidate = merge(&existing, record);
        candidate.mark_external();

        if let Some(parent_ref) = record.parent_ref() {
            match self.resolve_parent(entity_type, &parent_ref)? {
                Some(parent_id) => candidate.set_parent_id(&parent_id),
                // No partial write: the whole update is abandoned for
                // this pass. Updates are never rescheduled.
                None => {
                    return Ok(Disposition::Rejected {
                        missing_parent: parent_ref,
                    })
                }
            }
        }

        // disabled transitions only on edges; an already-set stamp is
        // never refreshed
        if record.is_disabled() && !candidate.disabled_is_set() {
            candidate.set_disabled(Some(model::disabled_stamp(Utc::now())));
        } else if !record.is_disabled() && candidate.disabled_is_set() {
            candidate.set_disabled(None);
        }

        if candidate == existing {
            return Ok(Disposition::Committed);
        }

        self.store.write(entity_type, existing.id(), &candidate)?;
        Ok(Disposition::Committed)
    }
}
