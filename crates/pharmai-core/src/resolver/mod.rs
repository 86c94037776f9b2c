//! Drug-pair interaction resolver.
//!
//! Pipeline: Normalization → Canonical-key lookup → Matcher scan → Inference fallback

pub mod matcher;
mod normalizer;

pub use matcher::{name_matches, pair_matches};
pub use normalizer::*;

pub use crate::store::canonical_key;

use std::sync::Arc;

use pharmai_llm::{
    make_interaction_prompt, parse_interaction_reply, Inferencer, INTERACTION_SYSTEM_PROMPT,
};
use thiserror::Error;

use crate::models::{InteractionQueryResult, InteractionRecord};
use crate::store::InteractionStore;

/// Resolver errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Answers "do these two drugs interact?".
///
/// Curated records always win over the inference collaborator, and any
/// failure on the inference side degrades to
/// [`InteractionQueryResult::unverified`], never to a claim of safety.
///
/// Inputs are normalized with the store's own [`Normalizer`], so queries and
/// record names always share one alias table.
pub struct InteractionResolver {
    store: Arc<InteractionStore>,
    inferencer: Arc<dyn Inferencer>,
}

impl InteractionResolver {
    pub fn new(store: Arc<InteractionStore>, inferencer: Arc<dyn Inferencer>) -> Self {
        Self { store, inferencer }
    }

    /// Check a pair of free-text drug names.
    pub fn check(&self, drug1: &str, drug2: &str) -> ResolverResult<InteractionQueryResult> {
        let normalizer = self.store.normalizer();
        let a = normalizer.normalize(drug1);
        let b = normalizer.normalize(drug2);
        if a.is_empty() || b.is_empty() {
            return Err(ResolverError::InvalidInput(
                "both drug names are required".into(),
            ));
        }

        if let Some(record) = self.find_record(&a, &b) {
            return Ok(InteractionQueryResult::from_record(record));
        }

        Ok(self.infer(&a, &b))
    }

    /// Curated lookup only: canonical key first, then the matcher scan.
    pub fn find_record(&self, a: &NormalizedName, b: &NormalizedName) -> Option<&InteractionRecord> {
        let key = canonical_key(a, b);
        if let Some(record) = self.store.get(&key) {
            tracing::debug!(%key, "Interaction store hit");
            return Some(record);
        }

        let hit = self.store.records().find(|r| pair_matches(a, b, r));
        if let Some(record) = hit {
            tracing::debug!(
                input = %key,
                matched = %record.drug_pair.key(),
                "Interaction matcher hit"
            );
        }
        hit
    }

    fn infer(&self, a: &NormalizedName, b: &NormalizedName) -> InteractionQueryResult {
        let (first, second) = if (a.key_form(), a.as_str()) <= (b.key_form(), b.as_str()) {
            (a, b)
        } else {
            (b, a)
        };
        let prompt = make_interaction_prompt(first.as_str(), second.as_str());

        let reply = self
            .inferencer
            .infer(&prompt, INTERACTION_SYSTEM_PROMPT)
            .and_then(|text| parse_interaction_reply(&text));

        match reply {
            Ok(reply) if reply.interaction => {
                tracing::debug!(first = %first, second = %second, "Interaction inferred");
                InteractionQueryResult::inferred(reply)
            }
            Ok(_) => InteractionQueryResult::unverified(),
            Err(e) => {
                tracing::warn!(error = %e, first = %first, second = %second, "Inference fallback failed");
                InteractionQueryResult::unverified()
            }
        }
    }
}
