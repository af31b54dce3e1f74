//! Price list domain module.
//!
//! Two pure pricing units and the aggregate that uses them:
//!
//! - [`resolve_price`]: picks the list-specific price over the base price.
//! - [`apply_bulk_percentage`]: reprices a batch of products by one directional
//!   percentage, clamped at zero and rounded half-up to cents.
//! - [`PriceList`]: event-sourced price list owning its entries.

pub mod adjustment;
pub mod error;
pub mod price_list;
pub mod resolution;

pub use adjustment::{apply_bulk_percentage, AdjustmentDirection, AdjustmentDirective};
pub use error::PricingError;
pub use price_list::{
    AddProduct, ApplyBulkAdjustment, BulkAdjustmentApplied, CreatePriceList, DeletePriceList,
    EntryPriceSet, PriceList, PriceListCommand, PriceListCreated, PriceListDeleted,
    PriceListEntry, PriceListEvent, PriceListId, PriceListStatus, PriceSource, ProductAdded,
    ProductRemoved, RemoveProduct, ResetEntryToBase, SetEntryPrice,
};
pub use resolution::{resolve_price, ListPrice, ProductPrice};
