use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use podesk_infra::OrderService;
use podesk_purchasing::PurchaseOrder;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route(
        "/orders",
        post(create_order)
            .get(list_orders)
            .put(update_order)
            .delete(delete_order),
    )
}

pub async fn create_order(
    Extension(service): Extension<Arc<OrderService>>,
    Json(body): Json<PurchaseOrder>,
) -> axum::response::Response {
    match service.create(body).await {
        Ok(po_no) => (
            StatusCode::CREATED,
            Json(dto::confirmed(&po_no, "Order created successfully")),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

/// Full records, histories included, in the store's listing order.
pub async fn list_orders(
    Extension(service): Extension<Arc<OrderService>>,
) -> axum::response::Response {
    match service.list().await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn update_order(
    Extension(service): Extension<Arc<OrderService>>,
    Json(body): Json<PurchaseOrder>,
) -> axum::response::Response {
    match service.update(body).await {
        Ok(po_no) => (
            StatusCode::OK,
            Json(dto::confirmed(&po_no, "Order updated successfully")),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}

pub async fn delete_order(
    Extension(service): Extension<Arc<OrderService>>,
    Query(params): Query<dto::DeleteOrderParams>,
) -> axum::response::Response {
    match service.delete(&params.po_no).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": format!("Order {} deleted successfully", params.po_no),
            })),
        )
            .into_response(),
        Err(e) => errors::order_error_to_response(e),
    }
}
