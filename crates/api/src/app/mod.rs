//! HTTP application wiring (axum router + store/service construction).
//!
//! Layout:
//! - `services.rs`: backend selection and store construction from config
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower_http::cors::CorsLayer;

use podesk_infra::OrderService;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around an already-wired service.
///
/// CORS is wide open: the original deployment fronts a browser SPA served
/// from a different origin.
pub fn build_app(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api", routes::router())
        .layer(Extension(service))
        .layer(CorsLayer::permissive())
}
