//! `podesk-infra` — storage backends and the order service.
//!
//! The [`store::OrderStore`] trait is the only seam the service knows about;
//! the Postgres and JSON-file implementations behind it must be behaviorally
//! indistinguishable.

pub mod service;
pub mod store;

pub use service::OrderService;
pub use store::{JsonFileStore, OrderStore, PostgresOrderStore};
