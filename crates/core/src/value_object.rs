//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity of its own: two instances holding the same
/// values are interchangeable. `Price` is the canonical example in this
/// workspace; a `PriceList` is not (it is identified by its id).
///
/// Implementors are expected to be immutable. "Changing" a value object means
/// building a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
