//! Append-only audit trail for order mutations.
//!
//! Every successful create or update produces exactly one [`AuditEntry`].
//! Update entries capture before/after values for the tracked-field
//! allowlist only; everything else changes silently.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::order::PurchaseOrder;

/// Header fields whose before/after values are captured on update.
pub const TRACKED_FIELDS: [&str; 5] = [
    "party_name",
    "discount",
    "add_less",
    "freight_amt",
    "net_amount",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Created,
    Updated,
}

/// Before/after pair for one tracked field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// One immutable record of a mutation.
///
/// Timestamps are assigned at entry construction and are monotonically
/// non-decreasing within one order's history, since entries are only ever
/// appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    /// Acting identity. Injected by the boundary layer; currently a fixed
    /// placeholder pending a real actor model.
    pub user: String,
    /// Tracked-field changes. Empty for `created` entries, and for updates
    /// that touched no tracked field (such an entry is still appended —
    /// "nothing tracked changed" is not "no update happened").
    pub changes: BTreeMap<String, FieldChange>,
}

impl AuditEntry {
    /// Entry seeded into a freshly created order's history.
    pub fn created(user: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action: AuditAction::Created,
            user: user.into(),
            changes: BTreeMap::new(),
        }
    }

    /// Diff `previous` against `next` over the tracked allowlist.
    ///
    /// Pure apart from the wall-clock timestamp: a field appears in the
    /// changes map exactly when its value differs between the two records.
    pub fn diff(previous: &PurchaseOrder, next: &PurchaseOrder, user: impl Into<String>) -> Self {
        let mut changes = BTreeMap::new();
        for field in TRACKED_FIELDS {
            let old = tracked_value(previous, field);
            let new = tracked_value(next, field);
            if old != new {
                changes.insert(field.to_string(), FieldChange { old, new });
            }
        }

        Self {
            timestamp: Utc::now(),
            action: AuditAction::Updated,
            user: user.into(),
            changes,
        }
    }
}

fn tracked_value(order: &PurchaseOrder, field: &str) -> Value {
    match field {
        "party_name" => json!(order.party_name),
        "discount" => json!(order.discount),
        "add_less" => json!(order.add_less),
        "freight_amt" => json!(order.freight_amt),
        "net_amount" => json!(order.net_amount),
        other => unreachable!("field {other} is not in TRACKED_FIELDS"),
    }
}
