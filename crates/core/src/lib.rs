//! `podesk-core` — domain foundation building blocks.
//!
//! This crate contains the shared error taxonomy and nothing else; keep it
//! free of infrastructure concerns.

pub mod error;

pub use error::{OrderError, OrderResult};
