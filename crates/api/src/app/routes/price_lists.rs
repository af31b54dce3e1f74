use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::json;

use pricebook_core::{AggregateId, Price};
use pricebook_pricing::{
    AddProduct, AdjustmentDirection, AdjustmentDirective, ApplyBulkAdjustment, CreatePriceList,
    DeletePriceList, PriceListCommand, PriceListId, ProductPrice, RemoveProduct,
    ResetEntryToBase, SetEntryPrice,
};
use pricebook_products::ProductId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_price_list))
        .route("/:id", get(get_price_list).delete(delete_price_list))
        .route("/:id/entries", post(add_entry))
        .route(
            "/:id/entries/:product_id",
            delete(remove_entry).put(set_entry_price),
        )
        .route("/:id/entries/:product_id/reset", post(reset_entry))
        .route("/:id/entries/:product_id/price", get(resolve_entry_price))
        .route("/:id/adjustments", post(apply_adjustment))
}

fn price_list_id(raw: &str) -> Result<PriceListId, axum::response::Response> {
    errors::parse_id(raw, "price list").map(PriceListId::new)
}

fn product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    errors::parse_id(raw, "product").map(ProductId::new)
}

pub async fn create_price_list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreatePriceListRequest>,
) -> axum::response::Response {
    let price_list_id = PriceListId::new(AggregateId::new());

    let cmd = PriceListCommand::CreatePriceList(CreatePriceList {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        name: body.name,
        description: body.description,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::CREATED, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_price_list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.price_list(tenant.tenant_id(), price_list_id) {
        Ok(list) => (StatusCode::OK, Json(dto::price_list_to_json(&list))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn delete_price_list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = PriceListCommand::DeletePriceList(DeletePriceList {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn add_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AddEntryRequest>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let price = match body.price.map(Price::new).transpose() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product = match services.priceable_product(tenant.tenant_id(), product_id) {
        Ok(p) => p,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let cmd = PriceListCommand::AddProduct(AddProduct {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        product,
        price,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::CREATED, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn set_entry_price(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((id, product)): Path<(String, String)>,
    Json(body): Json<dto::SetEntryPriceRequest>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match product_id(&product) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let price = match Price::new(body.price) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let cmd = PriceListCommand::SetEntryPrice(SetEntryPrice {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        product_id,
        price,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn reset_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((id, product)): Path<(String, String)>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match product_id(&product) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product = match services.priceable_product(tenant.tenant_id(), product_id) {
        Ok(p) => p,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let cmd = PriceListCommand::ResetEntryToBase(ResetEntryToBase {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        product,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn remove_entry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((id, product)): Path<(String, String)>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match product_id(&product) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = PriceListCommand::RemoveProduct(RemoveProduct {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        product_id,
        occurred_at: Utc::now(),
    });

    match services.dispatch_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, price_list_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

/// Effective price of a product within a list: the list entry when there is
/// one, the product's current base price otherwise.
pub async fn resolve_entry_price(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path((id, product)): Path<(String, String)>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match product_id(&product) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let list = match services.price_list(tenant.tenant_id(), price_list_id) {
        Ok(l) => l,
        Err(e) => return errors::dispatch_error_to_response(e),
    };
    let product = match services.product(tenant.tenant_id(), product_id) {
        Ok(p) => ProductPrice::from(&p),
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let source = if list.contains(product_id) { "list" } else { "base" };
    match list.resolve(&product) {
        Ok(price) => (
            StatusCode::OK,
            Json(json!({
                "product_id": product_id.to_string(),
                "price": price,
                "source": source,
            })),
        )
            .into_response(),
        Err(e) => errors::pricing_error_to_response(e),
    }
}

pub async fn apply_adjustment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::BulkAdjustmentRequest>,
) -> axum::response::Response {
    let price_list_id = match price_list_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let directive = match body
        .direction
        .parse::<AdjustmentDirection>()
        .and_then(|direction| AdjustmentDirective::new(direction, body.percentage))
    {
        Ok(d) => d,
        Err(e) => return errors::pricing_error_to_response(e),
    };
    let product_ids = match body
        .product_ids
        .iter()
        .map(|raw| product_id(raw))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let items = match services.priceable_products(tenant.tenant_id(), &product_ids) {
        Ok(items) => items,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    let cmd = ApplyBulkAdjustment {
        tenant_id: tenant.tenant_id(),
        price_list_id,
        items,
        directive,
        occurred_at: Utc::now(),
    };

    match services.adjust_price_list(tenant.tenant_id(), price_list_id, cmd) {
        Ok(prices) => (StatusCode::OK, Json(dto::list_prices_to_json(&prices))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
