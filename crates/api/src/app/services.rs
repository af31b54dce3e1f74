//! Infrastructure wiring for the HTTP layer.
//!
//! All writes go through the `CommandDispatcher`; reads rehydrate aggregates
//! from their streams. Base prices for price-list commands are always read
//! from the product catalog here, never taken from the request body.

use std::sync::Arc;

use pricebook_core::TenantId;
use pricebook_infra::{
    CommandDispatcher, DispatchError, EventStoreError, InMemoryEventStore, StoredEvent,
};
use pricebook_pricing::{
    ApplyBulkAdjustment, ListPrice, PriceList, PriceListCommand, PriceListEvent, PriceListId,
    ProductPrice,
};
use pricebook_products::{Product, ProductCommand, ProductId};

pub const PRODUCT_AGGREGATE: &str = "products.product";
pub const PRICE_LIST_AGGREGATE: &str = "pricing.price_list";

pub struct AppServices {
    dispatcher: CommandDispatcher<Arc<InMemoryEventStore>>,
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self {
            dispatcher: CommandDispatcher::new(Arc::new(InMemoryEventStore::new())),
        }
    }

    pub fn dispatch_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        command: ProductCommand,
    ) -> Result<Vec<StoredEvent>, DispatchError> {
        self.dispatcher.dispatch::<Product>(
            tenant_id,
            product_id.aggregate_id(),
            PRODUCT_AGGREGATE,
            command,
            |_t, id| Product::empty(ProductId::new(id)),
        )
    }

    pub fn dispatch_price_list(
        &self,
        tenant_id: TenantId,
        price_list_id: PriceListId,
        command: PriceListCommand,
    ) -> Result<Vec<StoredEvent>, DispatchError> {
        self.dispatcher.dispatch::<PriceList>(
            tenant_id,
            price_list_id.0,
            PRICE_LIST_AGGREGATE,
            command,
            |_t, id| PriceList::empty(PriceListId::new(id)),
        )
    }

    /// Apply a bulk adjustment and return the prices it committed, in request order.
    pub fn adjust_price_list(
        &self,
        tenant_id: TenantId,
        price_list_id: PriceListId,
        command: ApplyBulkAdjustment,
    ) -> Result<Vec<ListPrice>, DispatchError> {
        let committed = self.dispatch_price_list(
            tenant_id,
            price_list_id,
            PriceListCommand::ApplyBulkAdjustment(command),
        )?;

        for stored in committed {
            let event: PriceListEvent = serde_json::from_value(stored.payload)
                .map_err(|e| DispatchError::Deserialize(e.to_string()))?;
            if let PriceListEvent::BulkAdjustmentApplied(applied) = event {
                return Ok(applied.prices);
            }
        }
        Err(DispatchError::Store(EventStoreError::InvalidAppend(
            "bulk adjustment committed no BulkAdjustmentApplied event".to_string(),
        )))
    }

    /// Load a created product, or `NotFound`.
    pub fn product(&self, tenant_id: TenantId, product_id: ProductId) -> Result<Product, DispatchError> {
        let product: Product = self
            .dispatcher
            .load(tenant_id, product_id.aggregate_id(), PRODUCT_AGGREGATE, |_t, id| {
                Product::empty(ProductId::new(id))
            })?;
        if !product.is_created() {
            return Err(DispatchError::NotFound);
        }
        Ok(product)
    }

    /// Load a created price list, or `NotFound`. Deleted lists are returned as-is.
    pub fn price_list(
        &self,
        tenant_id: TenantId,
        price_list_id: PriceListId,
    ) -> Result<PriceList, DispatchError> {
        let list: PriceList = self.dispatcher.load(
            tenant_id,
            price_list_id.0,
            PRICE_LIST_AGGREGATE,
            |_t, id| PriceList::empty(PriceListId::new(id)),
        )?;
        if !list.is_created() {
            return Err(DispatchError::NotFound);
        }
        Ok(list)
    }

    /// Current `(product_id, base_price)` for one product about to be priced.
    pub fn priceable_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<ProductPrice, DispatchError> {
        let product = self.product(tenant_id, product_id)?;
        if product.is_archived() {
            tracing::warn!(%tenant_id, %product_id, "refusing to price archived product");
            return Err(DispatchError::InvariantViolation(format!(
                "product {product_id} is archived and cannot be priced"
            )));
        }
        Ok(ProductPrice::from(&product))
    }

    /// Current `(product_id, base_price)` pairs for products about to be priced,
    /// in the order requested. Archived products cannot be priced.
    pub fn priceable_products(
        &self,
        tenant_id: TenantId,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductPrice>, DispatchError> {
        product_ids
            .iter()
            .map(|id| self.priceable_product(tenant_id, *id))
            .collect()
    }
}
