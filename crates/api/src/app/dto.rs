use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use pricebook_core::AggregateRoot;
use pricebook_pricing::{ListPrice, PriceList, PriceListEntry};
use pricebook_products::Product;

// -------------------------
// Request DTOs
// -------------------------
//
// Money and percentages arrive as raw decimals and are validated when the
// domain values are built, so a negative price is a 400 like any other
// validation failure instead of a body rejection.

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub base_price: Decimal,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeBasePriceRequest {
    pub base_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePriceListRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub product_id: String,
    /// Overrides the product's base price when present.
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SetEntryPriceRequest {
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BulkAdjustmentRequest {
    pub product_ids: Vec<String>,
    pub direction: String,
    pub percentage: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PreviewItem {
    pub product_id: String,
    pub base_price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PreviewAdjustmentRequest {
    pub items: Vec<PreviewItem>,
    pub direction: String,
    pub percentage: Decimal,
}

// -------------------------
// JSON mapping
// -------------------------

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id_typed().to_string(),
        "sku": product.sku(),
        "name": product.name(),
        "status": product.status(),
        "base_price": product.base_price(),
        "currency": product.currency(),
        "version": product.version(),
    })
}

pub fn entry_to_json(entry: &PriceListEntry) -> Value {
    json!({
        "product_id": entry.product_id.to_string(),
        "price": entry.price,
        "source": entry.source,
    })
}

pub fn price_list_to_json(list: &PriceList) -> Value {
    json!({
        "id": list.id_typed().to_string(),
        "name": list.name(),
        "description": list.description(),
        "status": list.status(),
        "version": list.version(),
        "entries": list.entries().iter().map(entry_to_json).collect::<Vec<_>>(),
    })
}

pub fn list_prices_to_json(prices: &[ListPrice]) -> Value {
    json!({
        "items": prices
            .iter()
            .map(|p| json!({
                "product_id": p.product_id.to_string(),
                "new_price": p.price,
            }))
            .collect::<Vec<_>>(),
    })
}
