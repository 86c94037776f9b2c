//! Fuzzy drug-name suggestions for typeahead.

use serde::Serialize;
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::resolver::NormalizedName;

use super::InteractionStore;

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Minimum similarity to be offered.
const MIN_SCORE: f64 = 0.70;

/// A candidate drug name and how well it matches the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub name: String,
    pub score: f64,
}

impl InteractionStore {
    /// Known drug names closest to `query`, best first.
    ///
    /// Prefix matches score 1.0; everything else is ranked by fuzzy
    /// similarity and dropped below the cut-off.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let query = NormalizedName::new(query).key_form();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<Suggestion> = self
            .drug_names()
            .into_iter()
            .map(|name| {
                let score = if name.starts_with(&query) {
                    1.0
                } else {
                    fuzzy_match(&query, &name)
                };
                Suggestion { name, score }
            })
            .filter(|s| s.score >= MIN_SCORE)
            .collect();

        // Stable on name for equal scores
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        scored.truncate(limit);
        scored
    }
}

/// Jaro-Winkler blended with normalized Levenshtein.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InteractionStore {
        InteractionStore::builtin().unwrap()
    }

    #[test]
    fn test_prefix_ranks_first() {
        let suggestions = store().suggest("warf", 3);
        assert_eq!(suggestions[0].name, "warfarin");
        assert_eq!(suggestions[0].score, 1.0);
    }

    #[test]
    fn test_typo_tolerated() {
        let suggestions = store().suggest("wafarin", 5);
        assert!(suggestions.iter().any(|s| s.name == "warfarin"));
    }

    #[test]
    fn test_limit_respected() {
        assert!(store().suggest("a", 2).len() <= 2);
        assert!(store().suggest("aspirin", 0).is_empty());
    }

    #[test]
    fn test_nonsense_query_yields_nothing() {
        assert!(store().suggest("zzzzqqqq", 5).is_empty());
        assert!(store().suggest("   ", 5).is_empty());
    }

    #[test]
    fn test_fuzzy_identical_is_one() {
        assert!((fuzzy_match("digoxin", "digoxin") - 1.0).abs() < f64::EPSILON);
    }
}
