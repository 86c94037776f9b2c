//! Whole-word pair matching.
//!
//! A target name matches an input when some contiguous run of the input's
//! words, read hyphen-insensitively, equals the whole target. Substring
//! containment is never used: `aspirin-free-formula` is one word and does not
//! equal `aspirin`, and `chloride` alone never matches `potassium chloride`.

use crate::models::InteractionRecord;

use super::NormalizedName;

/// Does `target` occur in `input` as a run of whole words?
pub fn name_matches(input: &NormalizedName, target: &NormalizedName) -> bool {
    let target_tokens: Vec<&str> = target.tokens().collect();
    if target_tokens.is_empty() {
        return false;
    }

    let words: Vec<&str> = input.words().collect();
    for start in 0..words.len() {
        let mut run: Vec<&str> = Vec::with_capacity(target_tokens.len());
        for word in &words[start..] {
            run.extend(word.split('-').filter(|t| !t.is_empty()));
            if run.len() > target_tokens.len() {
                break;
            }
            if run == target_tokens {
                return true;
            }
        }
    }

    false
}

/// Order-insensitive pair match against a record.
pub fn pair_matches(a: &NormalizedName, b: &NormalizedName, record: &InteractionRecord) -> bool {
    let first = record.drug_pair.first();
    let second = record.drug_pair.second();

    (name_matches(a, first) && name_matches(b, second))
        || (name_matches(a, second) && name_matches(b, first))
}
