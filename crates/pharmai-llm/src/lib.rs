//! Inference collaborator for PharmAI.
//!
//! The interaction resolver only consults a generative model when the curated
//! table has no entry for a pair. This crate owns everything on that side of
//! the boundary: the [`Inferencer`] capability, the prompt templates, parsing
//! of the structured reply, and a Gemini REST client.

pub mod extraction;
pub mod gemini;
pub mod inference;
pub mod prompts;

pub use extraction::*;
pub use gemini::GeminiClient;
pub use inference::*;
pub use prompts::*;
