//! PharmAI Core Library
//!
//! Drug-drug interaction checking over a curated table, with a generative
//! model as a clearly labelled fallback, plus the in-memory pharmacy ledger.
//!
//! # Architecture
//!
//! ```text
//! drug1, drug2 → Normalization (aliases) → Canonical-key lookup
//!                                                 │ miss
//!                                          Matcher scan (load order)
//!                                                 │ miss
//!                                  ┌──────────────▼──────────────┐
//!                                  │   Inferencer (pharmai-llm)  │
//!                                  │   prompt → JSON reply       │
//!                                  └──────────────┬──────────────┘
//!                                                 │ failure / no interaction
//!                                                 ▼
//!                               "No known interaction; verify manually"
//! ```
//!
//! # Core Principle
//!
//! **Absence of a record is never reported as safety.** Every path that cannot
//! establish an interaction ends in the hedged [`InteractionQueryResult::unverified`].
//!
//! # Modules
//!
//! - [`store`]: Immutable interaction table, duplicate audit, suggestions
//! - [`resolver`]: Normalizer, pair matcher and the resolver pipeline
//! - [`ledger`]: Inventory, sales and patient history
//! - [`models`]: Domain types

pub mod ledger;
pub mod models;
pub mod resolver;
pub mod store;

// Re-export commonly used types
pub use ledger::{Ledger, LedgerError};
pub use models::{InteractionQueryResult, InteractionRecord, RiskLevel, Severity, Source};
pub use resolver::{InteractionResolver, NormalizedName, Normalizer, ResolverError};
pub use store::{InteractionStore, StoreError};

/// Top-level error for callers that drive several components.
#[derive(Debug, thiserror::Error)]
pub enum PharmaiError {
    #[error("Dataset error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<ResolverError> for PharmaiError {
    fn from(e: ResolverError) -> Self {
        match e {
            ResolverError::InvalidInput(msg) => PharmaiError::InvalidInput(msg),
        }
    }
}

impl From<serde_json::Error> for PharmaiError {
    fn from(e: serde_json::Error) -> Self {
        PharmaiError::Serialization(e.to_string())
    }
}
