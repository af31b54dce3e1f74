//! `pricebook-core`: domain foundation building blocks.
//!
//! Ids, the domain error model, aggregate traits and the `Price` value object.
//! Nothing in here performs IO.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, TenantId};
pub use money::{round_currency, Price, CURRENCY_SCALE};
pub use value_object::ValueObject;
