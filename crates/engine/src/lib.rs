//! `entsync-engine` — Entity reconciliation engine.
//!
//! Pure engine crate: receives normalized records, decides create vs
//! update against the remote store, resolves parent links, and drives
//! the two-pass retry for forward parent references. No CLI or HTTP
//! dependencies — the store is reached through the traits in [`store`].

pub mod error;
pub mod model;
pub mod pool;
pub mod reconcile;
pub mod scheduler;
pub mod store;

pub use error::SyncError;
pub use model::{merge, Disposition, Entity, Record};
pub use pool::IdPool;
pub use reconcile::Reconciler;
pub use scheduler::{run, RunReport};
pub use store::{EntityStore, IdAllocator};
