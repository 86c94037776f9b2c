//! Drug name normalizer.
//!
//! Handles:
//! - Case and whitespace folding ("  ASPIRIN " → "aspirin")
//! - Separator folding (`oral_contraceptives` → "oral contraceptives")
//! - Punctuation ("St. John's Wort" → "st johns wort")
//! - Brand/alias expansion (tylenol → paracetamol, coumadin → warfarin)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A canonicalized drug name.
///
/// Words are separated by a single space. Hyphens inside a word are kept, so
/// `aspirin-free` stays one word; [`tokens`](Self::tokens) splits them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedName {
    full: String,
}

impl NormalizedName {
    /// Normalize without alias expansion. Never fails.
    pub fn new(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| !matches!(c, '\'' | '\u{2019}' | '\u{02BC}' | '`'))
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '+' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let words: Vec<&str> = folded
            .split_whitespace()
            .map(|w| w.trim_matches('-'))
            .filter(|w| !w.is_empty())
            .collect();

        Self {
            full: words.join(" "),
        }
    }

    /// The normalized string, hyphens preserved.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty()
    }

    /// Whitespace-delimited words; hyphenated compounds stay whole.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.full.split(' ').filter(|w| !w.is_empty())
    }

    /// Tokens split on whitespace and hyphens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.full
            .split(|c: char| c == ' ' || c == '-')
            .filter(|t| !t.is_empty())
    }

    /// Hyphen-insensitive form used for keys and equality.
    pub fn key_form(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }
}

impl From<String> for NormalizedName {
    fn from(raw: String) -> Self {
        NormalizedName::new(&raw)
    }
}

impl From<NormalizedName> for String {
    fn from(name: NormalizedName) -> Self {
        name.full
    }
}

impl std::fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

/// Normalizer for user-supplied drug names.
#[derive(Debug, Clone)]
pub struct Normalizer {
    /// Alias map: brand or common name → canonical name (both normalized)
    aliases: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a new normalizer with default mappings.
    pub fn new() -> Self {
        Self {
            aliases: Self::default_aliases(),
        }
    }

    /// Normalizer without any alias expansion.
    pub fn without_aliases() -> Self {
        Self {
            aliases: HashMap::new(),
        }
    }

    /// Normalize a raw name and expand aliases.
    ///
    /// The whole name is looked up first; otherwise each word is expanded on
    /// its own, so "Tylenol 500mg" becomes "paracetamol 500mg".
    pub fn normalize(&self, raw: &str) -> NormalizedName {
        let name = NormalizedName::new(raw);
        if name.is_empty() || self.aliases.is_empty() {
            return name;
        }

        if let Some(canonical) = self.aliases.get(&name.key_form()) {
            return NormalizedName::new(canonical);
        }

        let expanded: Vec<&str> = name
            .words()
            .map(|w| self.aliases.get(w).map(String::as_str).unwrap_or(w))
            .collect();
        NormalizedName::new(&expanded.join(" "))
    }

    /// Expand a single alias to its canonical name.
    pub fn expand_alias(&self, name: &str) -> String {
        let key = NormalizedName::new(name).key_form();
        self.aliases.get(&key).cloned().unwrap_or(key)
    }

    /// Add a custom alias mapping.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(
            NormalizedName::new(alias).key_form(),
            NormalizedName::new(canonical).key_form(),
        );
    }

    /// Default brand and common-name mappings.
    fn default_aliases() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Analgesics
        map.insert("tylenol".into(), "paracetamol".into());
        map.insert("acetaminophen".into(), "paracetamol".into());
        map.insert("crocin".into(), "paracetamol".into());
        map.insert("advil".into(), "ibuprofen".into());
        map.insert("motrin".into(), "ibuprofen".into());
        map.insert("brufen".into(), "ibuprofen".into());
        map.insert("aleve".into(), "naproxen".into());
        map.insert("asa".into(), "aspirin".into());
        map.insert("ecosprin".into(), "aspirin".into());

        // Anticoagulants / antiplatelets
        map.insert("coumadin".into(), "warfarin".into());
        map.insert("plavix".into(), "clopidogrel".into());
        map.insert("xarelto".into(), "rivaroxaban".into());
        map.insert("eliquis".into(), "apixaban".into());

        // Cardiac
        map.insert("lanoxin".into(), "digoxin".into());
        map.insert("cordarone".into(), "amiodarone".into());
        map.insert("lasix".into(), "furosemide".into());
        map.insert("aldactone".into(), "spironolactone".into());
        map.insert("zestril".into(), "lisinopril".into());
        map.insert("lipitor".into(), "atorvastatin".into());
        map.insert("zocor".into(), "simvastatin".into());
        map.insert("norvasc".into(), "amlodipine".into());

        // CNS
        map.insert("prozac".into(), "fluoxetine".into());
        map.insert("zoloft".into(), "sertraline".into());
        map.insert("valium".into(), "diazepam".into());
        map.insert("ultram".into(), "tramadol".into());
        map.insert("tegretol".into(), "carbamazepine".into());
        map.insert("dilantin".into(), "phenytoin".into());
        map.insert("depakote".into(), "valproic acid".into());
        map.insert("valproate".into(), "valproic acid".into());

        // Anti-infectives
        map.insert("cipro".into(), "ciprofloxacin".into());
        map.insert("flagyl".into(), "metronidazole".into());
        map.insert("biaxin".into(), "clarithromycin".into());
        map.insert("diflucan".into(), "fluconazole".into());
        map.insert("rifampicin".into(), "rifampin".into());

        // Other
        map.insert("viagra".into(), "sildenafil".into());
        map.insert("cialis".into(), "tadalafil".into());
        map.insert("glucophage".into(), "metformin".into());
        map.insert("synthroid".into(), "levothyroxine".into());
        map.insert("prilosec".into(), "omeprazole".into());
        map.insert("ethanol".into(), "alcohol".into());
        map.insert("licorice".into(), "glycyrrhiza".into());
        map.insert("kcl".into(), "potassium chloride".into());
        map.insert("the pill".into(), "oral contraceptives".into());
        map.insert("birth control".into(), "oral contraceptives".into());

        map
    }
}
