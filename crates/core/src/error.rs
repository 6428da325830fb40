//! Order-domain error model.

use thiserror::Error;

/// Result type used across the order domain and storage layers.
pub type OrderResult<T> = Result<T, OrderError>;

/// The full error taxonomy for order operations.
///
/// `KeyConflict` and `NotFound` are expected, user-facing outcomes and carry
/// the offending business key. `Storage` is unexpected; its detail string is
/// for logs, never for API responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// A create targeted a business key that is already live.
    #[error("PO {po_no} already exists")]
    KeyConflict { po_no: String },

    /// An update or delete targeted a business key with no live record.
    #[error("PO {po_no} not found")]
    NotFound { po_no: String },

    /// A record failed boundary validation before reaching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backing store could not durably commit.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl OrderError {
    pub fn key_conflict(po_no: impl Into<String>) -> Self {
        Self::KeyConflict { po_no: po_no.into() }
    }

    pub fn not_found(po_no: impl Into<String>) -> Self {
        Self::NotFound { po_no: po_no.into() }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
