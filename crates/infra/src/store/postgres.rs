//! Postgres-backed order store.
//!
//! One row per live order: the business key in its own UNIQUE column, the
//! full record as JSONB. Uniqueness is enforced by the index, so concurrent
//! creates against the same key cannot both succeed regardless of
//! interleaving; update and delete are single statements and therefore
//! atomic.
//!
//! `update_with` is the one multi-statement path: it runs a transaction
//! that locks the row (`SELECT ... FOR UPDATE`) before applying the
//! mutation, so same-key read-modify-writes are serialized by the database
//! and a racing writer can never overwrite another's committed history.
//!
//! SQLSTATE `23505` (unique violation) maps to `KeyConflict`; an UPDATE or
//! DELETE touching zero rows maps to `NotFound`; everything else surfaces as
//! `Storage` tagged with the failing operation.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::instrument;

use async_trait::async_trait;
use podesk_core::{OrderError, OrderResult};
use podesk_purchasing::PurchaseOrder;

use super::OrderStore;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS purchase_orders (
    id          BIGSERIAL PRIMARY KEY,
    po_no       TEXT NOT NULL UNIQUE,
    record      JSONB NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Transactional order store on a SQLx connection pool.
///
/// `Clone` is cheap; the pool is internally reference-counted and safe to
/// share across tasks.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with a small pool.
    pub async fn connect(database_url: &str) -> OrderResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the backing table if it does not exist. Run once at startup.
    pub async fn migrate(&self) -> OrderResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self), fields(po_no = %po_no), err)]
    async fn find_by_key(&self, po_no: &str) -> OrderResult<Option<PurchaseOrder>> {
        let row = sqlx::query("SELECT record FROM purchase_orders WHERE po_no = $1")
            .bind(po_no)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_key", e))?;

        match row {
            Some(row) => Ok(Some(decode_record(&row)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list_all(&self) -> OrderResult<Vec<PurchaseOrder>> {
        let rows = sqlx::query("SELECT record FROM purchase_orders ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_all", e))?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            orders.push(decode_record(row)?);
        }
        Ok(orders)
    }

    #[instrument(skip(self, record), fields(po_no = %record.po_no), err)]
    async fn insert(&self, record: &PurchaseOrder) -> OrderResult<()> {
        let payload = encode_record(record)?;

        sqlx::query("INSERT INTO purchase_orders (po_no, record) VALUES ($1, $2)")
            .bind(&record.po_no)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    OrderError::key_conflict(record.po_no.as_str())
                } else {
                    map_sqlx_error("insert", e)
                }
            })?;
        Ok(())
    }

    #[instrument(skip(self, record), fields(po_no = %po_no), err)]
    async fn replace(&self, po_no: &str, record: &PurchaseOrder) -> OrderResult<()> {
        let payload = encode_record(record)?;

        let result = sqlx::query(
            "UPDATE purchase_orders SET record = $2, updated_at = NOW() WHERE po_no = $1",
        )
        .bind(po_no)
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("replace", e))?;

        if result.rows_affected() == 0 {
            return Err(OrderError::not_found(po_no));
        }
        Ok(())
    }

    #[instrument(skip(self, mutate), fields(po_no = %po_no), err)]
    async fn update_with(
        &self,
        po_no: &str,
        mutate: &(dyn Fn(PurchaseOrder) -> PurchaseOrder + Send + Sync),
    ) -> OrderResult<PurchaseOrder> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("update_with", e))?;

        // Row lock held until commit; a concurrent writer on the same key
        // blocks here and then reads this transaction's committed record.
        let row = sqlx::query("SELECT record FROM purchase_orders WHERE po_no = $1 FOR UPDATE")
            .bind(po_no)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_with", e))?;
        let existing = match row {
            Some(row) => decode_record(&row)?,
            None => return Err(OrderError::not_found(po_no)),
        };

        let next = mutate(existing);
        let payload = encode_record(&next)?;
        sqlx::query("UPDATE purchase_orders SET record = $2, updated_at = NOW() WHERE po_no = $1")
            .bind(po_no)
            .bind(payload)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_with", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("update_with", e))?;
        Ok(next)
    }

    #[instrument(skip(self), fields(po_no = %po_no), err)]
    async fn delete(&self, po_no: &str) -> OrderResult<()> {
        let result = sqlx::query("DELETE FROM purchase_orders WHERE po_no = $1")
            .bind(po_no)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(OrderError::not_found(po_no));
        }
        Ok(())
    }
}

fn encode_record(record: &PurchaseOrder) -> OrderResult<serde_json::Value> {
    serde_json::to_value(record)
        .map_err(|e| OrderError::storage(format!("record serialization failed: {e}")))
}

fn decode_record(row: &sqlx::postgres::PgRow) -> OrderResult<PurchaseOrder> {
    let payload: serde_json::Value = row
        .try_get("record")
        .map_err(|e| OrderError::storage(format!("failed to read record column: {e}")))?;
    serde_json::from_value(payload)
        .map_err(|e| OrderError::storage(format!("stored record failed to deserialize: {e}")))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> OrderError {
    match err {
        sqlx::Error::Database(db_err) => OrderError::storage(format!(
            "database error in {operation}: {}",
            db_err.message()
        )),
        sqlx::Error::PoolClosed => {
            OrderError::storage(format!("connection pool closed in {operation}"))
        }
        other => OrderError::storage(format!("sqlx error in {operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
