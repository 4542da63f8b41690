use crate::error::SyncError;
use crate::model::Entity;

/// Read/write access to the remote entity store.
///
/// Implemented by the HTTP client; tests substitute an in-memory
/// double. Lookups include disabled entities and are constrained to a
/// single result.
pub trait EntityStore {
    /// Find one entity where `field == value` within `entity_type`.
    /// No match is `Ok(None)`, not an error.
    fn find(
        &self,
        field: &str,
        value: &str,
        entity_type: &str,
    ) -> Result<Option<Entity>, SyncError>;

    /// Full-document replace of the entity at `id`.
    fn write(&self, entity_type: &str, id: &str, entity: &Entity) -> Result<(), SyncError>;
}

/// Remote identifier allocator: one batch per call, order preserved.
pub trait IdAllocator {
    fn allocate(&self, count: usize) -> Result<Vec<String>, SyncError>;
}
