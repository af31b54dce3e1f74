use std::sync::Arc;

use anyhow::Context;

use pricebook_api::app::{build_app, services::AppServices};
use pricebook_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pricebook_observability::init();

    let config = ApiConfig::from_env();
    let services = Arc::new(AppServices::in_memory());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
