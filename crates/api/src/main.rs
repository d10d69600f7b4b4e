use std::sync::Arc;

use anyhow::Context;

use bookstore_api::app::{build_app, services};
use bookstore_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookstore_observability::init();

    let config = ApiConfig::from_env()?;
    let services = services::build_services(&config.store).await?;
    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
