//! Monetary amounts.
//!
//! Prices are `rust_decimal::Decimal` so that bulk repricing over many items
//! never accumulates binary floating point error.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits kept for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Round to currency precision, half-up.
///
/// `MidpointAwayFromZero` is half-up for the non-negative amounts this is used on:
/// `200.405 -> 200.41`, `200.404 -> 200.40`.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A non-negative monetary amount.
///
/// The amount is kept at the precision it was given; rounding only happens
/// where a price is computed (see `round_currency`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl ValueObject for Price {}

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Build a price, rejecting negative amounts.
    pub fn new(amount: Decimal) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "price cannot be negative (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    /// Clamp an arbitrary amount at zero, then round to currency precision.
    pub fn clamped_rounded(amount: Decimal) -> Self {
        Self(round_currency(amount.max(Decimal::ZERO)))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// This price rounded to currency precision.
    pub fn rounded(&self) -> Self {
        Self(round_currency(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("invalid price '{s}': {e}")))?;
        Self::new(amount)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
