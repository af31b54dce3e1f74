//! Append-only event store boundary.
//!
//! Tenant-scoped event streams, one per aggregate instance, with no storage
//! assumptions baked into the trait.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventStore;
pub use r#trait::{EventStore, EventStoreError, StoredEvent, UncommittedEvent};
