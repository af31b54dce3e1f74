use axum::{routing::get, Router};

pub mod common;
pub mod price_lists;
pub mod pricing;
pub mod products;
pub mod system;

/// Router for all tenant-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/products", products::router())
        .nest("/price-lists", price_lists::router())
        .nest("/pricing", pricing::router())
}
