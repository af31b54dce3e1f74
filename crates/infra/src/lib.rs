//! Infrastructure layer: event storage and the command pipeline.

pub mod command_dispatcher;
pub mod event_store;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore, StoredEvent, UncommittedEvent};
