use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pricebook_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Price, TenantId};
use pricebook_events::Event;
use pricebook_products::ProductId;

use crate::adjustment::{AdjustmentDirection, AdjustmentDirective};
use crate::error::PricingError;
use crate::resolution::{resolve_price, ListPrice, ProductPrice};

/// Price list identifier (tenant-scoped via `tenant_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceListId(pub AggregateId);

impl PriceListId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PriceListId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceListStatus {
    Active,
    Deleted,
}

/// How an entry's current price was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    /// Copied from the product's base price.
    Base,
    /// Typed in by a user.
    Manual,
    /// Derived by a bulk percentage adjustment.
    Adjustment,
}

/// One product's price within a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListEntry {
    pub product_id: ProductId,
    pub price: Price,
    pub source: PriceSource,
}

impl PriceListEntry {
    pub fn list_price(&self) -> ListPrice {
        ListPrice::new(self.product_id, self.price)
    }
}

/// Aggregate root: PriceList.
///
/// Entries keep insertion order. Deleting the list drops every entry and
/// turns all further commands into invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceList {
    id: PriceListId,
    tenant_id: Option<TenantId>,
    name: String,
    description: Option<String>,
    status: PriceListStatus,
    entries: Vec<PriceListEntry>,
    /// Position of each product in `entries`.
    index: HashMap<ProductId, usize>,
    version: u64,
    created: bool,
}

impl PriceList {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: PriceListId) -> Self {
        Self {
            id,
            tenant_id: None,
            name: String::new(),
            description: None,
            status: PriceListStatus::Active,
            entries: Vec::new(),
            index: HashMap::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> PriceListId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> PriceListStatus {
        self.status
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn entries(&self) -> &[PriceListEntry] {
        &self.entries
    }

    pub fn entry(&self, product_id: ProductId) -> Option<&PriceListEntry> {
        self.index.get(&product_id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.entry(product_id).is_some()
    }

    /// Effective price of `product` within this list.
    pub fn resolve(&self, product: &ProductPrice) -> Result<Price, PricingError> {
        let entry = self.entry(product.product_id).map(PriceListEntry::list_price);
        resolve_price(product, entry.as_ref())
    }

    fn upsert(&mut self, product_id: ProductId, price: Price, source: PriceSource) {
        match self.index.get(&product_id).copied() {
            Some(pos) => {
                let entry = &mut self.entries[pos];
                entry.price = price;
                entry.source = source;
            }
            None => {
                self.index.insert(product_id, self.entries.len());
                self.entries.push(PriceListEntry {
                    product_id,
                    price,
                    source,
                });
            }
        }
    }

    fn remove(&mut self, product_id: ProductId) {
        if let Some(pos) = self.index.remove(&product_id) {
            self.entries.remove(pos);
            for entry in &self.entries[pos..] {
                if let Some(p) = self.index.get_mut(&entry.product_id) {
                    *p -= 1;
                }
            }
        }
    }
}

impl AggregateRoot for PriceList {
    type Id = PriceListId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreatePriceList.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePriceList {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub name: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddProduct. `price: None` copies the product's base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product: ProductPrice,
    pub price: Option<Price>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetEntryPrice (manual edit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEntryPrice {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product_id: ProductId,
    pub price: Price,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ResetEntryToBase ("use base price").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetEntryToBase {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product: ProductPrice,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ApplyBulkAdjustment. Products not yet listed are added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyBulkAdjustment {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub items: Vec<ProductPrice>,
    pub directive: AdjustmentDirective,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProduct {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeletePriceList.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePriceList {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceListCommand {
    CreatePriceList(CreatePriceList),
    AddProduct(AddProduct),
    SetEntryPrice(SetEntryPrice),
    ResetEntryToBase(ResetEntryToBase),
    ApplyBulkAdjustment(ApplyBulkAdjustment),
    RemoveProduct(RemoveProduct),
    DeletePriceList(DeletePriceList),
}

/// Event: PriceListCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListCreated {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub name: String,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product_id: ProductId,
    pub price: Price,
    pub source: PriceSource,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EntryPriceSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPriceSet {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product_id: ProductId,
    pub price: Price,
    pub source: PriceSource,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BulkAdjustmentApplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAdjustmentApplied {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub direction: AdjustmentDirection,
    pub percentage: Decimal,
    pub prices: Vec<ListPrice>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRemoved {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PriceListDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceListDeleted {
    pub tenant_id: TenantId,
    pub price_list_id: PriceListId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceListEvent {
    PriceListCreated(PriceListCreated),
    ProductAdded(ProductAdded),
    EntryPriceSet(EntryPriceSet),
    BulkAdjustmentApplied(BulkAdjustmentApplied),
    ProductRemoved(ProductRemoved),
    PriceListDeleted(PriceListDeleted),
}

impl Event for PriceListEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PriceListEvent::PriceListCreated(_) => "pricing.price_list.created",
            PriceListEvent::ProductAdded(_) => "pricing.price_list.product_added",
            PriceListEvent::EntryPriceSet(_) => "pricing.price_list.entry_price_set",
            PriceListEvent::BulkAdjustmentApplied(_) => {
                "pricing.price_list.bulk_adjustment_applied"
            }
            PriceListEvent::ProductRemoved(_) => "pricing.price_list.product_removed",
            PriceListEvent::PriceListDeleted(_) => "pricing.price_list.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PriceListEvent::PriceListCreated(e) => e.occurred_at,
            PriceListEvent::ProductAdded(e) => e.occurred_at,
            PriceListEvent::EntryPriceSet(e) => e.occurred_at,
            PriceListEvent::BulkAdjustmentApplied(e) => e.occurred_at,
            PriceListEvent::ProductRemoved(e) => e.occurred_at,
            PriceListEvent::PriceListDeleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for PriceList {
    type Command = PriceListCommand;
    type Event = PriceListEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PriceListEvent::PriceListCreated(e) => {
                self.id = e.price_list_id;
                self.tenant_id = Some(e.tenant_id);
                self.name = e.name.clone();
                self.description = e.description.clone();
                self.status = PriceListStatus::Active;
                self.created = true;
            }
            PriceListEvent::ProductAdded(e) => {
                self.upsert(e.product_id, e.price, e.source);
            }
            PriceListEvent::EntryPriceSet(e) => {
                self.upsert(e.product_id, e.price, e.source);
            }
            PriceListEvent::BulkAdjustmentApplied(e) => {
                for p in &e.prices {
                    self.upsert(p.product_id, p.price, PriceSource::Adjustment);
                }
            }
            PriceListEvent::ProductRemoved(e) => {
                self.remove(e.product_id);
            }
            PriceListEvent::PriceListDeleted(_) => {
                self.status = PriceListStatus::Deleted;
                self.entries.clear();
                self.index.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PriceListCommand::CreatePriceList(cmd) => self.handle_create(cmd),
            PriceListCommand::AddProduct(cmd) => self.handle_add_product(cmd),
            PriceListCommand::SetEntryPrice(cmd) => self.handle_set_entry_price(cmd),
            PriceListCommand::ResetEntryToBase(cmd) => self.handle_reset_entry(cmd),
            PriceListCommand::ApplyBulkAdjustment(cmd) => self.handle_bulk_adjustment(cmd),
            PriceListCommand::RemoveProduct(cmd) => self.handle_remove_product(cmd),
            PriceListCommand::DeletePriceList(cmd) => self.handle_delete(cmd),
        }
    }
}

impl PriceList {
    fn ensure_active(
        &self,
        tenant_id: TenantId,
        price_list_id: PriceListId,
    ) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        if self.id != price_list_id {
            return Err(DomainError::invariant("price_list_id mismatch"));
        }
        if self.status == PriceListStatus::Deleted {
            return Err(DomainError::invariant("price list is deleted"));
        }
        Ok(())
    }

    fn ensure_listed(&self, product_id: ProductId) -> Result<(), DomainError> {
        if !self.contains(product_id) {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreatePriceList) -> Result<Vec<PriceListEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("price list already exists"));
        }
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        let description = cmd
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(vec![PriceListEvent::PriceListCreated(PriceListCreated {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            name: name.to_string(),
            description,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_product(&self, cmd: &AddProduct) -> Result<Vec<PriceListEvent>, DomainError> {
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;

        if self.contains(cmd.product.product_id) {
            return Err(DomainError::conflict(format!(
                "product {} is already in the price list",
                cmd.product.product_id
            )));
        }

        let (price, source) = match cmd.price {
            Some(price) => (price, PriceSource::Manual),
            None => (cmd.product.base_price, PriceSource::Base),
        };

        Ok(vec![PriceListEvent::ProductAdded(ProductAdded {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            product_id: cmd.product.product_id,
            price,
            source,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_entry_price(
        &self,
        cmd: &SetEntryPrice,
    ) -> Result<Vec<PriceListEvent>, DomainError> {
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;
        self.ensure_listed(cmd.product_id)?;

        Ok(vec![PriceListEvent::EntryPriceSet(EntryPriceSet {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            product_id: cmd.product_id,
            price: cmd.price,
            source: PriceSource::Manual,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_reset_entry(
        &self,
        cmd: &ResetEntryToBase,
    ) -> Result<Vec<PriceListEvent>, DomainError> {
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;
        self.ensure_listed(cmd.product.product_id)?;

        Ok(vec![PriceListEvent::EntryPriceSet(EntryPriceSet {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            product_id: cmd.product.product_id,
            price: cmd.product.base_price,
            source: PriceSource::Base,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_bulk_adjustment(
        &self,
        cmd: &ApplyBulkAdjustment,
    ) -> Result<Vec<PriceListEvent>, DomainError> {
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;

        let mut seen = HashSet::with_capacity(cmd.items.len());
        for item in &cmd.items {
            if !seen.insert(item.product_id) {
                return Err(DomainError::validation(format!(
                    "product {} appears more than once in the adjustment",
                    item.product_id
                )));
            }
        }

        let prices = cmd.directive.apply_all(&cmd.items)?;

        Ok(vec![PriceListEvent::BulkAdjustmentApplied(
            BulkAdjustmentApplied {
                tenant_id: cmd.tenant_id,
                price_list_id: cmd.price_list_id,
                direction: cmd.directive.direction(),
                percentage: cmd.directive.percentage(),
                prices,
                occurred_at: cmd.occurred_at,
            },
        )])
    }

    fn handle_remove_product(
        &self,
        cmd: &RemoveProduct,
    ) -> Result<Vec<PriceListEvent>, DomainError> {
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;
        self.ensure_listed(cmd.product_id)?;

        Ok(vec![PriceListEvent::ProductRemoved(ProductRemoved {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeletePriceList) -> Result<Vec<PriceListEvent>, DomainError> {
        if self.created && self.status == PriceListStatus::Deleted {
            return Err(DomainError::conflict("price list is already deleted"));
        }
        self.ensure_active(cmd.tenant_id, cmd.price_list_id)?;

        Ok(vec![PriceListEvent::PriceListDeleted(PriceListDeleted {
            tenant_id: cmd.tenant_id,
            price_list_id: cmd.price_list_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}
