//! HTTP API.
//!
//! All routes live under `/api/`. The router is composable: `api_router()`
//! returns a `Router` that any axum server can mount.

pub mod endpoints;
pub mod error;
pub mod router;

pub use error::ApiError;
pub use router::api_router;
