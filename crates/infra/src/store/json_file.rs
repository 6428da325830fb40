//! Flat-file JSON order store.
//!
//! The whole collection lives in one pretty-printed JSON array of full
//! order objects. Every mutation reads the file, rewrites the array to a
//! sibling temp file, and publishes it with an atomic rename, so a crash
//! mid-write never corrupts the last committed snapshot. An absent file is
//! not an error; it reads as an empty collection.
//!
//! A process-local mutex serializes writers. Multiple processes writing the
//! same file are not serialized; that is an accepted limitation of this
//! backend, not a correctness target.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::instrument;

use async_trait::async_trait;
use podesk_core::{OrderError, OrderResult};
use podesk_purchasing::PurchaseOrder;

use super::OrderStore;

pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty snapshot if the file does not exist yet.
    pub async fn ensure_exists(&self) -> OrderResult<()> {
        let _guard = self.write_lock.lock().await;
        match fs::metadata(&self.path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => self.persist(&[]).await,
            Err(e) => Err(OrderError::storage(format!(
                "failed to stat orders file: {e}"
            ))),
        }
    }

    async fn load(&self) -> OrderResult<Vec<PurchaseOrder>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(OrderError::storage(format!(
                    "failed to read orders file: {e}"
                )));
            }
        };

        serde_json::from_slice(&bytes)
            .map_err(|e| OrderError::storage(format!("orders file is not a valid snapshot: {e}")))
    }

    /// Serialize the full collection and publish it atomically: write to a
    /// sibling `.tmp` file, then rename over the live path.
    async fn persist(&self, orders: &[PurchaseOrder]) -> OrderResult<()> {
        let bytes = serde_json::to_vec_pretty(orders)
            .map_err(|e| OrderError::storage(format!("snapshot serialization failed: {e}")))?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| OrderError::storage(format!("failed to write snapshot: {e}")))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| OrderError::storage(format!("failed to publish snapshot: {e}")))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    #[instrument(skip(self), fields(po_no = %po_no), err)]
    async fn find_by_key(&self, po_no: &str) -> OrderResult<Option<PurchaseOrder>> {
        let orders = self.load().await?;
        Ok(orders.into_iter().find(|o| o.po_no == po_no))
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> OrderResult<Vec<PurchaseOrder>> {
        self.load().await
    }

    #[instrument(skip(self, record), fields(po_no = %record.po_no), err)]
    async fn insert(&self, record: &PurchaseOrder) -> OrderResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.load().await?;

        if orders.iter().any(|o| o.po_no == record.po_no) {
            return Err(OrderError::key_conflict(record.po_no.as_str()));
        }

        orders.push(record.clone());
        self.persist(&orders).await
    }

    #[instrument(skip(self, record), fields(po_no = %po_no), err)]
    async fn replace(&self, po_no: &str, record: &PurchaseOrder) -> OrderResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.load().await?;

        // Replace in place so the record keeps its insertion-order slot.
        let slot = orders
            .iter_mut()
            .find(|o| o.po_no == po_no)
            .ok_or_else(|| OrderError::not_found(po_no))?;
        *slot = record.clone();

        self.persist(&orders).await
    }

    #[instrument(skip(self, mutate), fields(po_no = %po_no), err)]
    async fn update_with(
        &self,
        po_no: &str,
        mutate: &(dyn Fn(PurchaseOrder) -> PurchaseOrder + Send + Sync),
    ) -> OrderResult<PurchaseOrder> {
        // The lock spans load, mutate, and persist, so same-key writers
        // never read the same prior snapshot.
        let _guard = self.write_lock.lock().await;
        let mut orders = self.load().await?;

        let slot = orders
            .iter_mut()
            .find(|o| o.po_no == po_no)
            .ok_or_else(|| OrderError::not_found(po_no))?;
        let next = mutate(slot.clone());
        *slot = next.clone();

        self.persist(&orders).await?;
        Ok(next)
    }

    #[instrument(skip(self), fields(po_no = %po_no), err)]
    async fn delete(&self, po_no: &str) -> OrderResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut orders = self.load().await?;

        let before = orders.len();
        orders.retain(|o| o.po_no != po_no);
        if orders.len() == before {
            return Err(OrderError::not_found(po_no));
        }

        self.persist(&orders).await
    }
}
