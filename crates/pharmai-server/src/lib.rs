//! PharmAI HTTP service.
//!
//! Wires the interaction resolver, the ledger and the inference client into
//! an axum router. See [`api::api_router`] for the route table.

pub mod api;
pub mod config;
pub mod state;

pub use api::api_router;
pub use config::{Config, ConfigError};
pub use state::AppState;
