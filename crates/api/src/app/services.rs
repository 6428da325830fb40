//! Store construction: turn the process config into the one store handle
//! the service runs against.

use std::sync::Arc;

use anyhow::Context;

use podesk_infra::{JsonFileStore, OrderStore, PostgresOrderStore};

use crate::config::{BackendKind, Config};

/// Acting identity stamped into audit entries. A placeholder until a real
/// actor model exists; it is injected here, at the boundary, not hardcoded
/// in the core.
pub const ACTING_USER: &str = "System";

/// Construct the configured storage backend.
///
/// Postgres runs its table migration here; the file backend initializes an
/// empty snapshot so first-run deployments start from a well-formed file.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn OrderStore>> {
    match config.backend {
        BackendKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL missing for postgres backend")?;
            let store = PostgresOrderStore::connect(url)
                .await
                .context("failed to connect to postgres")?;
            store.migrate().await.context("migration failed")?;
            tracing::info!("using postgres order store");
            Ok(Arc::new(store))
        }
        BackendKind::File => {
            let store = JsonFileStore::new(&config.orders_file);
            store
                .ensure_exists()
                .await
                .context("failed to initialize orders file")?;
            tracing::info!(path = %config.orders_file.display(), "using json file order store");
            Ok(Arc::new(store))
        }
    }
}
