//! Domain events.
//!
//! Aggregates in this workspace are event-sourced: every state change is an
//! immutable, versioned fact implementing [`Event`].

pub mod event;

pub use event::Event;
