//! Order service: composes the store and the audit builder into the four
//! invariant-preserving operations.

use std::sync::Arc;

use tracing::info;

use podesk_core::OrderResult;
use podesk_purchasing::{AuditEntry, PurchaseOrder};

use crate::store::OrderStore;

/// Orchestrates create / list / update / delete over an [`OrderStore`].
///
/// The acting user is injected at construction by the boundary layer; the
/// core never hardcodes an identity. No operation retries internally —
/// retry policy, if any, belongs to the caller.
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    acting_user: String,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, acting_user: impl Into<String>) -> Self {
        Self {
            store,
            acting_user: acting_user.into(),
        }
    }

    /// Create a new order under its business key.
    ///
    /// The stored record's history is seeded here: exactly one `created`
    /// audit entry and an empty GRN list, regardless of what the caller
    /// supplied. On `KeyConflict` nothing is mutated.
    pub async fn create(&self, mut record: PurchaseOrder) -> OrderResult<String> {
        record.validate()?;
        record.updates = vec![AuditEntry::created(self.acting_user.as_str())];
        record.grn_records = Vec::new();

        self.store.insert(&record).await?;
        info!(po_no = %record.po_no, "order created");
        Ok(record.po_no)
    }

    /// All live orders, histories included, straight from the store.
    pub async fn list(&self) -> OrderResult<Vec<PurchaseOrder>> {
        self.store.list_all().await
    }

    /// Update an existing order.
    ///
    /// The new record's `updates` is the existing history plus exactly one
    /// `updated` entry (appended, never replaced wholesale), and its
    /// `grn_records` is carried over from the existing record — a
    /// caller-supplied GRN list is ignored. The whole read-diff-write runs
    /// under the store's same-key exclusion, so concurrent updates to one
    /// key each append their own entry and none is lost. Fails `NotFound`
    /// without mutating anything if the key has no live record.
    pub async fn update(&self, record: PurchaseOrder) -> OrderResult<String> {
        record.validate()?;
        let user = self.acting_user.as_str();

        let stored = self
            .store
            .update_with(&record.po_no, &|existing| {
                let entry = AuditEntry::diff(&existing, &record, user);
                let mut next = record.clone();
                next.updates = existing.updates;
                next.updates.push(entry);
                next.grn_records = existing.grn_records;
                next
            })
            .await?;

        info!(po_no = %stored.po_no, "order updated");
        Ok(stored.po_no)
    }

    /// Permanently remove an order. Its audit history goes with it.
    pub async fn delete(&self, po_no: &str) -> OrderResult<()> {
        self.store.delete(po_no).await?;
        info!(po_no = %po_no, "order deleted");
        Ok(())
    }
}
