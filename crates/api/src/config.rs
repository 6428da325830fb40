//! Process configuration, read once from the environment at startup.
//!
//! The chosen storage backend is constructed from this and handed to the
//! service as an explicit handle; nothing downstream reads the environment.

use std::path::PathBuf;

use anyhow::bail;

/// Which `OrderStore` implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    File,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    /// Required when `backend` is `Postgres`.
    pub database_url: Option<String>,
    /// Snapshot path for the file backend.
    pub orders_file: PathBuf,
    pub bind_addr: String,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `ORDERS_BACKEND` selects the store (`file` by default, `postgres`
    /// when a relational deployment is wanted); `DATABASE_URL`,
    /// `ORDERS_FILE` and `BIND_ADDR` fill in the rest.
    pub fn from_env() -> anyhow::Result<Self> {
        let backend = match std::env::var("ORDERS_BACKEND") {
            Ok(v) => match v.to_lowercase().as_str() {
                "postgres" => BackendKind::Postgres,
                "file" => BackendKind::File,
                other => bail!("ORDERS_BACKEND must be 'postgres' or 'file', got '{other}'"),
            },
            Err(_) => BackendKind::File,
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if backend == BackendKind::Postgres && database_url.is_none() {
            bail!("ORDERS_BACKEND=postgres requires DATABASE_URL");
        }

        let orders_file = std::env::var("ORDERS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("orders.json"));

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Ok(Self {
            backend,
            database_url,
            orders_file,
            bind_addr,
        })
    }
}
