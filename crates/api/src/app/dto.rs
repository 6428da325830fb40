use serde::Deserialize;

/// `DELETE /api/orders?po_no=...` — the key travels as a query parameter,
/// matching the form client.
#[derive(Debug, Deserialize)]
pub struct DeleteOrderParams {
    pub po_no: String,
}

pub fn confirmed(po_no: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "confirmed_po": po_no,
        "message": message,
    })
}
