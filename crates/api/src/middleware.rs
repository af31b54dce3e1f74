use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use pricebook_core::TenantId;

use crate::app::errors::json_error;
use crate::context::TenantContext;

/// Header carrying the tenant id.
pub const TENANT_HEADER: &str = "x-tenant-id";

pub async fn tenant_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let tenant_id = match extract_tenant(req.headers()) {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    req.extensions_mut().insert(TenantContext::new(tenant_id));
    next.run(req).await
}

fn extract_tenant(headers: &HeaderMap) -> Result<TenantId, Response> {
    let value = headers
        .get(TENANT_HEADER)
        .ok_or_else(|| json_error(StatusCode::BAD_REQUEST, "missing_tenant", "x-tenant-id header is required"))?;

    let value = value
        .to_str()
        .map_err(|_| json_error(StatusCode::BAD_REQUEST, "invalid_tenant", "x-tenant-id is not valid ASCII"))?;

    value
        .trim()
        .parse::<TenantId>()
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, "invalid_tenant", e.to_string()))
}
