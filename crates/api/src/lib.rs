//! `podesk-api` — HTTP boundary for the purchase-order service.

pub mod app;
pub mod config;
pub mod telemetry;
