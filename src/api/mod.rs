//! HTTP API layer for Account Hub.
//!
//! Provides REST endpoints for accounts and devices.

mod extract;
pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
