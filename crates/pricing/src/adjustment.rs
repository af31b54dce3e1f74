//! Bulk percentage repricing.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricebook_core::Price;

use crate::error::PricingError;
use crate::resolution::{ListPrice, ProductPrice};

/// Direction of a percentage adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

impl AdjustmentDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentDirection::Increase => "increase",
            AdjustmentDirection::Decrease => "decrease",
        }
    }
}

impl core::fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentDirection {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "increase" => Ok(AdjustmentDirection::Increase),
            "decrease" => Ok(AdjustmentDirection::Decrease),
            other => Err(PricingError::invalid_argument(format!(
                "direction must be 'increase' or 'decrease' (got '{other}')"
            ))),
        }
    }
}

/// A validated direction + percentage pair.
///
/// The percentage is non-negative and unbounded above; a decrease of more
/// than 100% drives prices to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDirective")]
pub struct AdjustmentDirective {
    direction: AdjustmentDirection,
    percentage: Decimal,
}

#[derive(Deserialize)]
struct RawDirective {
    direction: AdjustmentDirection,
    percentage: Decimal,
}

impl TryFrom<RawDirective> for AdjustmentDirective {
    type Error = PricingError;

    fn try_from(raw: RawDirective) -> Result<Self, Self::Error> {
        Self::new(raw.direction, raw.percentage)
    }
}

impl AdjustmentDirective {
    pub fn new(direction: AdjustmentDirection, percentage: Decimal) -> Result<Self, PricingError> {
        if percentage < Decimal::ZERO {
            return Err(PricingError::invalid_argument(format!(
                "percentage must be >= 0 (got {percentage})"
            )));
        }
        Ok(Self {
            direction,
            percentage,
        })
    }

    pub fn direction(&self) -> AdjustmentDirection {
        self.direction
    }

    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Multiplier applied to base prices: `1 ± percentage / 100`.
    ///
    /// May be negative for large decreases; the result is clamped in [`apply`](Self::apply).
    pub fn factor(&self) -> Result<Decimal, PricingError> {
        let ratio = self
            .percentage
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(|| PricingError::invalid_argument("percentage out of range"))?;
        let factor = match self.direction {
            AdjustmentDirection::Increase => Decimal::ONE.checked_add(ratio),
            AdjustmentDirection::Decrease => Decimal::ONE.checked_sub(ratio),
        };
        factor.ok_or_else(|| PricingError::invalid_argument("percentage out of range"))
    }

    /// New price for one base price: `round(max(0, base * factor), 2)`.
    pub fn apply(&self, base_price: Price) -> Result<Price, PricingError> {
        let raw = base_price
            .amount()
            .checked_mul(self.factor()?)
            .ok_or_else(|| {
                PricingError::invalid_argument(format!(
                    "adjusting {base_price} by {}% overflows",
                    self.percentage
                ))
            })?;
        Ok(Price::clamped_rounded(raw))
    }

    /// Reprice every item, preserving input order.
    ///
    /// All-or-nothing: the first failing item aborts the whole batch.
    pub fn apply_all(&self, items: &[ProductPrice]) -> Result<Vec<ListPrice>, PricingError> {
        if items.is_empty() {
            return Err(PricingError::EmptyInput);
        }

        items
            .iter()
            .map(|item| Ok(ListPrice::new(item.product_id, self.apply(item.base_price)?)))
            .collect()
    }
}

/// Compute new list prices for `items` by one directional percentage.
///
/// Fails with `InvalidArgument` on a negative percentage and with `EmptyInput`
/// when there is nothing to adjust.
pub fn apply_bulk_percentage(
    items: &[ProductPrice],
    direction: AdjustmentDirection,
    percentage: Decimal,
) -> Result<Vec<ListPrice>, PricingError> {
    AdjustmentDirective::new(direction, percentage)?.apply_all(items)
}
