//! Durable, uniquely-keyed collection of purchase orders.
//!
//! Two backing strategies implement the same contract: a transactional
//! Postgres table and a whole-file JSON snapshot. The service layer depends
//! only on [`OrderStore`] and is wired to one of them at process start.

use async_trait::async_trait;

use podesk_core::OrderResult;
use podesk_purchasing::PurchaseOrder;

mod json_file;
mod postgres;

pub use json_file::JsonFileStore;
pub use postgres::PostgresOrderStore;

/// Storage contract for the live order collection.
///
/// Implementations must keep `po_no` unique among live records and make each
/// mutating operation atomic: a failure leaves the collection exactly as it
/// was before the call. History merging happens inside [`Self::update_with`],
/// under the store's same-key exclusion; `replace` is a blind overwrite.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Look up a live record by business key. No side effects.
    async fn find_by_key(&self, po_no: &str) -> OrderResult<Option<PurchaseOrder>>;

    /// All live records: no duplicates, no omissions. The file backend
    /// returns insertion order; the Postgres backend orders by row id,
    /// which matches insertion order for rows inserted through this store.
    async fn list_all(&self) -> OrderResult<Vec<PurchaseOrder>>;

    /// Store a new record. Fails with `KeyConflict` if the key is already
    /// live; durable before returning `Ok`.
    async fn insert(&self, record: &PurchaseOrder) -> OrderResult<()>;

    /// Atomically overwrite every field of the record stored under `po_no`.
    /// Fails with `NotFound` if the key has no live record.
    async fn replace(&self, po_no: &str, record: &PurchaseOrder) -> OrderResult<()>;

    /// Serialized read-modify-write: load the live record under `po_no`,
    /// apply `mutate`, and store the result, excluding every other mutation
    /// of the same key for the whole sequence. Two racing callers therefore
    /// each see the other's committed result, never a shared stale read.
    /// Fails with `NotFound` (and applies nothing) if the key is absent.
    /// Returns the record as stored.
    async fn update_with(
        &self,
        po_no: &str,
        mutate: &(dyn Fn(PurchaseOrder) -> PurchaseOrder + Send + Sync),
    ) -> OrderResult<PurchaseOrder>;

    /// Permanently remove the record under `po_no`. Fails with `NotFound`
    /// if absent. No tombstone is kept.
    async fn delete(&self, po_no: &str) -> OrderResult<()>;
}
