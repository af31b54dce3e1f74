use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use pricebook_core::Price;
use pricebook_pricing::{apply_bulk_percentage, AdjustmentDirection, ProductPrice};
use pricebook_products::ProductId;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/preview", post(preview_adjustment))
}

/// Compute adjusted prices for the given items without touching any price list.
pub async fn preview_adjustment(
    Json(body): Json<dto::PreviewAdjustmentRequest>,
) -> axum::response::Response {
    let direction = match body.direction.parse::<AdjustmentDirection>() {
        Ok(d) => d,
        Err(e) => return errors::pricing_error_to_response(e),
    };

    let mut items = Vec::with_capacity(body.items.len());
    for item in &body.items {
        let product_id = match errors::parse_id(&item.product_id, "product") {
            Ok(id) => ProductId::new(id),
            Err(resp) => return resp,
        };
        let base_price = match Price::new(item.base_price) {
            Ok(p) => p,
            Err(e) => return errors::domain_error_to_response(e),
        };
        items.push(ProductPrice::new(product_id, base_price));
    }

    match apply_bulk_percentage(&items, direction, body.percentage) {
        Ok(prices) => (StatusCode::OK, Json(dto::list_prices_to_json(&prices))).into_response(),
        Err(e) => errors::pricing_error_to_response(e),
    }
}
