//! Price resolution: list-specific price if the list has one, else the base price.

use serde::{Deserialize, Serialize};

use pricebook_core::Price;
use pricebook_products::{Product, ProductId};

use crate::error::PricingError;

/// A product as seen by the pricing core: its id and catalog base price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub product_id: ProductId,
    pub base_price: Price,
}

impl ProductPrice {
    pub fn new(product_id: ProductId, base_price: Price) -> Self {
        Self {
            product_id,
            base_price,
        }
    }
}

impl From<&Product> for ProductPrice {
    fn from(product: &Product) -> Self {
        Self::new(product.id_typed(), product.base_price())
    }
}

/// A list-specific price for one product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPrice {
    pub product_id: ProductId,
    pub price: Price,
}

impl ListPrice {
    pub fn new(product_id: ProductId, price: Price) -> Self {
        Self { product_id, price }
    }
}

/// Resolve the price to present or charge for `product`.
///
/// An entry for a different product is a caller bug and is rejected rather
/// than silently ignored.
pub fn resolve_price(
    product: &ProductPrice,
    entry: Option<&ListPrice>,
) -> Result<Price, PricingError> {
    match entry {
        None => Ok(product.base_price),
        Some(entry) if entry.product_id == product.product_id => Ok(entry.price),
        Some(entry) => Err(PricingError::invalid_argument(format!(
            "list entry is for product {} but product {} was given",
            entry.product_id, product.product_id
        ))),
    }
}
