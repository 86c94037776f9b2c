//! Domain models for the PharmAI system.

mod interaction;
mod ledger;

pub use interaction::*;
pub use ledger::*;
