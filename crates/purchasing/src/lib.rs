//! `podesk-purchasing` — purchase-order domain records and audit trail.
//!
//! Pure domain: record shapes, field defaults, and the audit diff builder.
//! Persistence lives in `podesk-infra`.

pub mod audit;
pub mod order;

pub use audit::{AuditAction, AuditEntry, FieldChange, TRACKED_FIELDS};
pub use order::{OrderItem, PurchaseOrder};
