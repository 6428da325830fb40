use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use podesk_core::OrderError;

/// Map a domain error onto the HTTP boundary.
///
/// Conflict and not-found carry the offending key in their message; storage
/// failures are logged with full detail and rendered generically.
pub fn order_error_to_response(err: OrderError) -> axum::response::Response {
    match err {
        OrderError::KeyConflict { .. } => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        OrderError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        OrderError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        OrderError::Storage(detail) => {
            tracing::error!(%detail, "storage backend failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage backend failed",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
