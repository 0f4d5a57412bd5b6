//! HTTP API layer for dishcovery.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: one router per resource under `/api`
//! - **Extractors**: authentication and role guards
//! - **Middleware**: bearer-token authentication
//! - **Response**: the `{success, data, ...}` envelope
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
