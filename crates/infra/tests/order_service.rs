//! Order service behavior over the file backend: history seeding, audit
//! appends, GRN preservation, and the full create/update/delete lifecycle.

use std::sync::Arc;

use async_trait::async_trait;
use podesk_core::{OrderError, OrderResult};
use podesk_infra::{JsonFileStore, OrderService, OrderStore};
use podesk_purchasing::{AuditAction, PurchaseOrder};
use tempfile::TempDir;
use tokio::sync::Barrier;

fn order_json(po_no: &str, party: &str, discount: f64) -> PurchaseOrder {
    serde_json::from_value(serde_json::json!({
        "po_no": po_no,
        "date": "2024-04-01",
        "party_name": party,
        "discount": discount,
        "items": []
    }))
    .unwrap()
}

fn service_in(dir: &TempDir) -> (OrderService, Arc<JsonFileStore>) {
    let store = Arc::new(JsonFileStore::new(dir.path().join("orders.json")));
    let service = OrderService::new(store.clone(), "System");
    (service, store)
}

#[tokio::test]
async fn create_seeds_exactly_one_created_entry() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_in(&dir);

    let confirmed = service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();
    assert_eq!(confirmed, "PO/1");

    let all = service.list().await.unwrap();
    assert_eq!(all.len(), 1);
    let stored = &all[0];
    assert_eq!(stored.updates.len(), 1);
    assert_eq!(stored.updates[0].action, AuditAction::Created);
    assert_eq!(stored.updates[0].user, "System");
    assert!(stored.updates[0].changes.is_empty());
    assert!(stored.grn_records.is_empty());
}

#[tokio::test]
async fn create_discards_caller_supplied_history() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service_in(&dir);

    let mut input = order_json("PO/1", "Acme", 0.0);
    input.grn_records = vec![serde_json::json!({"grn_no": "FORGED"})];
    service.create(input).await.unwrap();

    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert!(stored.grn_records.is_empty());
    assert_eq!(stored.updates.len(), 1);
}

#[tokio::test]
async fn update_appends_one_entry_with_tracked_changes() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service_in(&dir);
    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();

    service.update(order_json("PO/1", "Acme", 50.0)).await.unwrap();

    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.updates.len(), 2);
    let entry = &stored.updates[1];
    assert_eq!(entry.action, AuditAction::Updated);
    assert_eq!(entry.changes.len(), 1);
    assert_eq!(entry.changes["discount"].old, serde_json::json!(0.0));
    assert_eq!(entry.changes["discount"].new, serde_json::json!(50.0));
    assert!(entry.timestamp >= stored.updates[0].timestamp);
}

#[tokio::test]
async fn update_without_tracked_changes_still_appends() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service_in(&dir);
    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();

    let mut unchanged = order_json("PO/1", "Acme", 0.0);
    unchanged.remarks = "untracked field".to_string();
    service.update(unchanged).await.unwrap();

    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.updates.len(), 2);
    assert!(stored.updates[1].changes.is_empty());
}

#[tokio::test]
async fn update_preserves_grn_records_and_ignores_caller_value() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service_in(&dir);
    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();

    // A collaborator outside this core attaches GRN entries directly.
    let mut with_grn = store.find_by_key("PO/1").await.unwrap().unwrap();
    with_grn.grn_records = vec![serde_json::json!({"grn_no": "GRN/7", "qty": 25.0})];
    store.replace("PO/1", &with_grn).await.unwrap();

    let mut input = order_json("PO/1", "Acme", 10.0);
    input.grn_records = vec![serde_json::json!({"grn_no": "SHOULD-BE-IGNORED"})];
    service.update(input).await.unwrap();

    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.grn_records, with_grn.grn_records);
    assert_eq!(stored.updates.len(), 2);
}

#[tokio::test]
async fn update_missing_key_fails_without_mutating() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_in(&dir);
    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();

    let err = service
        .update(order_json("PO/404", "Nobody", 0.0))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::not_found("PO/404"));
    assert_eq!(service.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn create_rejects_blank_po_no_before_touching_the_store() {
    let dir = TempDir::new().unwrap();
    let (service, _) = service_in(&dir);

    let err = service
        .create(order_json("   ", "Acme", 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Validation(_)));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn full_lifecycle_create_update_conflict_delete() {
    let dir = TempDir::new().unwrap();
    let (service, store) = service_in(&dir);

    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();
    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.updates.len(), 1);
    assert_eq!(stored.updates[0].action, AuditAction::Created);

    service.update(order_json("PO/1", "Acme", 50.0)).await.unwrap();
    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.updates.len(), 2);
    assert_eq!(stored.updates[1].changes.len(), 1);
    assert!(stored.updates[1].changes.contains_key("discount"));

    let err = service
        .create(order_json("PO/1", "Acme", 0.0))
        .await
        .unwrap_err();
    assert_eq!(err, OrderError::key_conflict("PO/1"));
    assert_eq!(service.list().await.unwrap().len(), 1);

    service.delete("PO/1").await.unwrap();
    assert!(service.list().await.unwrap().is_empty());

    let err = service.delete("PO/1").await.unwrap_err();
    assert_eq!(err, OrderError::not_found("PO/1"));
}

/// File store wrapper that holds every updater at a barrier, so both racing
/// calls are guaranteed to be in flight before either one writes.
struct GatedStore {
    inner: JsonFileStore,
    gate: Barrier,
}

#[async_trait]
impl OrderStore for GatedStore {
    async fn find_by_key(&self, po_no: &str) -> OrderResult<Option<PurchaseOrder>> {
        self.inner.find_by_key(po_no).await
    }

    async fn list_all(&self) -> OrderResult<Vec<PurchaseOrder>> {
        self.inner.list_all().await
    }

    async fn insert(&self, record: &PurchaseOrder) -> OrderResult<()> {
        self.inner.insert(record).await
    }

    async fn replace(&self, po_no: &str, record: &PurchaseOrder) -> OrderResult<()> {
        self.inner.replace(po_no, record).await
    }

    async fn update_with(
        &self,
        po_no: &str,
        mutate: &(dyn Fn(PurchaseOrder) -> PurchaseOrder + Send + Sync),
    ) -> OrderResult<PurchaseOrder> {
        let _ = self.gate.wait().await;
        self.inner.update_with(po_no, mutate).await
    }

    async fn delete(&self, po_no: &str) -> OrderResult<()> {
        self.inner.delete(po_no).await
    }
}

#[tokio::test]
async fn racing_updates_to_one_key_each_append_their_entry() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(GatedStore {
        inner: JsonFileStore::new(dir.path().join("orders.json")),
        gate: Barrier::new(2),
    });
    let service = Arc::new(OrderService::new(store.clone(), "System"));
    service.create(order_json("PO/1", "Acme", 0.0)).await.unwrap();

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.update(order_json("PO/1", "Acme", 10.0)).await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.update(order_json("PO/1", "Acme", 20.0)).await })
    };
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    // Both successful updates must survive in the history: one created
    // entry plus one updated entry per writer, whichever order they landed.
    let stored = store.find_by_key("PO/1").await.unwrap().unwrap();
    assert_eq!(stored.updates.len(), 3);
    assert_eq!(stored.updates[0].action, AuditAction::Created);

    let discounts: Vec<_> = stored.updates[1..]
        .iter()
        .map(|e| e.changes["discount"].new.clone())
        .collect();
    assert!(discounts.contains(&serde_json::json!(10.0)));
    assert!(discounts.contains(&serde_json::json!(20.0)));
}
