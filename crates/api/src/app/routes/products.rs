use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use pricebook_core::{AggregateId, Price};
use pricebook_products::{
    ActivateProduct, ArchiveProduct, ChangeBasePrice, CreateProduct, ProductCommand, ProductId,
};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route("/:id", get(get_product))
        .route("/:id/activate", post(activate_product))
        .route("/:id/archive", post(archive_product))
        .route("/:id/base-price", post(change_base_price))
}

fn product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    errors::parse_id(raw, "product").map(ProductId::new)
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let base_price = match Price::new(body.base_price) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let product_id = ProductId::new(AggregateId::new());

    let cmd = ProductCommand::CreateProduct(CreateProduct {
        tenant_id: tenant.tenant_id(),
        product_id,
        sku: body.sku,
        name: body.name,
        base_price,
        currency: body.currency,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(tenant.tenant_id(), product_id, cmd) {
        Ok(c) => common::committed(StatusCode::CREATED, product_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.product(tenant.tenant_id(), product_id) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn activate_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = ProductCommand::ActivateProduct(ActivateProduct {
        tenant_id: tenant.tenant_id(),
        product_id,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(tenant.tenant_id(), product_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, product_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn archive_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let product_id = match product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let cmd = ProductCommand::ArchiveProduct(ArchiveProduct {
        tenant_id: tenant.tenant_id(),
        product_id,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(tenant.tenant_id(), product_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, product_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}

pub async fn change_base_price(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ChangeBasePriceRequest>,
) -> axum::response::Response {
    let product_id = match product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let base_price = match Price::new(body.base_price) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let cmd = ProductCommand::ChangeBasePrice(ChangeBasePrice {
        tenant_id: tenant.tenant_id(),
        product_id,
        base_price,
        occurred_at: Utc::now(),
    });

    match services.dispatch_product(tenant.tenant_id(), product_id, cmd) {
        Ok(c) => common::committed(StatusCode::OK, product_id, &c),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
