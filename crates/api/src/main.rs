use std::sync::Arc;

use podesk_api::app::{self, services};
use podesk_api::config::Config;
use podesk_infra::OrderService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    podesk_api::telemetry::init();

    let config = Config::from_env()?;
    let store = services::build_store(&config).await?;
    let service = Arc::new(OrderService::new(store, services::ACTING_USER));

    let app = app::build_app(service);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
