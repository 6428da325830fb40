use serde::{Deserialize, Serialize};

use podesk_core::{OrderError, OrderResult};

use crate::audit::AuditEntry;

fn default_department() -> String {
    "REGULAR".to_string()
}

fn default_uqc() -> String {
    "KGS".to_string()
}

/// One procurement line.
///
/// Items have no identity beyond their position in the parent order's item
/// sequence; they are owned by exactly one [`PurchaseOrder`] and copied by
/// value on every order mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub item_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub merge_style: String,
    #[serde(default)]
    pub shade: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default)]
    pub cost_center: String,
    /// Unit of measure (unit quantity code).
    #[serde(default = "default_uqc")]
    pub uqc: String,
    #[serde(default)]
    pub pending_qty: f64,
    #[serde(default)]
    pub grn_qty: f64,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub amount: f64,
}

fn default_ord_mode() -> String {
    "CONSUMABLE".to_string()
}

fn default_mode() -> String {
    "Direct".to_string()
}

fn default_store() -> String {
    "SURAT".to_string()
}

fn default_agent() -> String {
    "DIRECT".to_string()
}

fn default_cr_days() -> i32 {
    60
}

fn default_freight_type() -> String {
    "EXTRA".to_string()
}

fn default_status() -> String {
    "Open".to_string()
}

fn default_del_terms() -> String {
    "IMMEDIATELY".to_string()
}

fn default_pay_terms() -> String {
    "60 DAYS".to_string()
}

fn default_gst_type() -> String {
    "intra-state".to_string()
}

fn default_cgst_percent() -> f64 {
    9.0
}

fn default_sgst_percent() -> f64 {
    9.0
}

fn default_igst_percent() -> f64 {
    18.0
}

/// Aggregate root: a purchase order.
///
/// Identity is the caller-supplied business key `po_no`, unique among live
/// records. `date`, `party_name` and `items` are required input; every other
/// field resolves to its documented default when absent, so a record that
/// deserializes never has an undefined field.
///
/// Totals are caller-supplied aggregates; this system stores them verbatim
/// and never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub po_no: String,
    /// Order date as an ISO `YYYY-MM-DD` string, kept opaque for the
    /// boundary's date pickers.
    pub date: String,
    #[serde(default = "default_ord_mode")]
    pub ord_mode: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_store")]
    pub store: String,
    pub party_name: String,
    #[serde(default = "default_agent")]
    pub agent: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub ref_date: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default = "default_cr_days")]
    pub cr_days: i32,
    #[serde(default)]
    pub del_days: i32,
    #[serde(default = "default_freight_type")]
    pub freight_type: String,
    #[serde(default)]
    pub is_import: bool,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub address: String,

    // Footer / terms.
    #[serde(default)]
    pub delivery_party: String,
    #[serde(default = "default_del_terms")]
    pub del_terms: String,
    #[serde(default = "default_pay_terms")]
    pub pay_terms: String,
    #[serde(default)]
    pub despatch_ins: String,
    #[serde(default)]
    pub special_note: String,
    #[serde(default)]
    pub remarks: String,

    // Caller-supplied totals.
    #[serde(default)]
    pub total_item: i32,
    #[serde(default)]
    pub total_qty: f64,
    #[serde(default)]
    pub gross_amount: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub add_less: f64,
    #[serde(default)]
    pub freight_amt: f64,
    #[serde(default)]
    pub net_amount: f64,

    pub items: Vec<OrderItem>,

    /// Append-only audit trail. Seeded by the service on create; existing
    /// entries are never mutated or removed.
    #[serde(default)]
    pub updates: Vec<AuditEntry>,
    /// Goods-received entries, produced by a collaborator outside this core.
    /// Opaque here beyond preservation: updates carry the existing value
    /// forward and never honor a caller-supplied one.
    #[serde(default)]
    pub grn_records: Vec<serde_json::Value>,

    // GST fields. Percentages are stored, not applied.
    #[serde(default = "default_gst_type")]
    pub gst_type: String,
    #[serde(default = "default_cgst_percent")]
    pub cgst_percent: f64,
    #[serde(default = "default_sgst_percent")]
    pub sgst_percent: f64,
    #[serde(default = "default_igst_percent")]
    pub igst_percent: f64,
    #[serde(default)]
    pub other_charges: f64,
    #[serde(default)]
    pub terms_conditions_text: String,
}

impl PurchaseOrder {
    /// Boundary validation: the business key must be non-empty.
    ///
    /// Items may legitimately be empty; no item-level arithmetic is checked
    /// here.
    pub fn validate(&self) -> OrderResult<()> {
        if self.po_no.trim().is_empty() {
            return Err(OrderError::validation("po_no must be a non-empty string"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse_order_json() -> serde_json::Value {
        serde_json::json!({
            "po_no": "PO/2024/001",
            "date": "2024-04-01",
            "party_name": "Acme Textiles",
            "items": [{ "item_code": "YRN-40s", "qty": 100.0 }]
        })
    }

    #[test]
    fn sparse_input_resolves_every_default() {
        let order: PurchaseOrder = serde_json::from_value(sparse_order_json()).unwrap();

        assert_eq!(order.ord_mode, "CONSUMABLE");
        assert_eq!(order.mode, "Direct");
        assert_eq!(order.store, "SURAT");
        assert_eq!(order.agent, "DIRECT");
        assert_eq!(order.cr_days, 60);
        assert_eq!(order.del_days, 0);
        assert_eq!(order.freight_type, "EXTRA");
        assert!(!order.is_import);
        assert_eq!(order.status, "Open");
        assert_eq!(order.del_terms, "IMMEDIATELY");
        assert_eq!(order.pay_terms, "60 DAYS");
        assert_eq!(order.discount, 0.0);
        assert_eq!(order.net_amount, 0.0);
        assert_eq!(order.gst_type, "intra-state");
        assert_eq!(order.cgst_percent, 9.0);
        assert_eq!(order.sgst_percent, 9.0);
        assert_eq!(order.igst_percent, 18.0);
        assert!(order.updates.is_empty());
        assert!(order.grn_records.is_empty());
    }

    #[test]
    fn item_defaults_resolve() {
        let order: PurchaseOrder = serde_json::from_value(sparse_order_json()).unwrap();
        let item = &order.items[0];

        assert_eq!(item.item_code, "YRN-40s");
        assert_eq!(item.department, "REGULAR");
        assert_eq!(item.uqc, "KGS");
        assert_eq!(item.qty, 100.0);
        assert_eq!(item.pending_qty, 0.0);
        assert_eq!(item.rate, 0.0);
    }

    #[test]
    fn missing_required_fields_fail_deserialization() {
        let missing_party = serde_json::json!({
            "po_no": "PO/1",
            "date": "2024-04-01",
            "items": []
        });
        assert!(serde_json::from_value::<PurchaseOrder>(missing_party).is_err());
    }

    #[test]
    fn blank_po_no_fails_validation() {
        let mut order: PurchaseOrder = serde_json::from_value(sparse_order_json()).unwrap();
        order.po_no = "   ".to_string();
        assert!(matches!(
            order.validate(),
            Err(OrderError::Validation(_))
        ));
    }

    #[test]
    fn empty_item_list_is_valid() {
        let mut order: PurchaseOrder = serde_json::from_value(sparse_order_json()).unwrap();
        order.items.clear();
        assert!(order.validate().is_ok());
    }
}
