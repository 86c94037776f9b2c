//! Immutable interaction record store.
//!
//! Built once from the seed dataset and shared read-only (`Arc`) for the
//! process lifetime. Records are keyed by the canonical pair key: both
//! normalized names sorted and joined with `|`, so `(a, b)` and `(b, a)` land
//! on the same entry.

mod suggest;

pub use suggest::*;

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{DrugPair, InteractionRecord, RawInteraction, RiskLevel, Severity};
use crate::resolver::{NormalizedName, Normalizer};

/// Seed dataset compiled into the binary.
pub const BUILTIN_DATASET: &str = include_str!("../../data/interactions.json");

/// Store errors. All of them mean the dataset cannot be trusted.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Malformed dataset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed dataset entry {index}: {reason}")]
    MalformedDataset { index: usize, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A dataset entry dropped because its pair was already loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateEntry {
    /// Position in the raw dataset
    pub index: usize,
    /// Canonical key shared with the kept entry
    pub key: String,
    /// Whether the dropped entry differs from the kept one
    pub conflicting: bool,
}

/// Canonical pair key for two already-normalized names.
pub fn canonical_key(a: &NormalizedName, b: &NormalizedName) -> String {
    let (a, b) = (a.key_form(), b.key_form());
    if a <= b {
        format!("{}|{}", a, b)
    } else {
        format!("{}|{}", b, a)
    }
}

/// Read-only interaction table.
///
/// Record names go through the same [`Normalizer`] as queries, so a record
/// spelled with a brand name or alias is keyed under its canonical name.
#[derive(Debug, Clone)]
pub struct InteractionStore {
    /// Records in load order
    records: Vec<InteractionRecord>,
    normalizer: Normalizer,
    /// Canonical key → position in `records`
    index: HashMap<String, usize>,
    duplicates: Vec<DuplicateEntry>,
    fingerprint: String,
}

impl InteractionStore {
    /// Build the store from raw entries with the default alias table.
    pub fn load(raw: Vec<RawInteraction>) -> StoreResult<Self> {
        Self::load_with(raw, Normalizer::new())
    }

    /// Build the store from raw entries, normalizing names with `normalizer`.
    ///
    /// Duplicate pairs are resolved first-wins; each dropped entry is logged
    /// and kept in [`duplicates`](Self::duplicates).
    pub fn load_with(raw: Vec<RawInteraction>, normalizer: Normalizer) -> StoreResult<Self> {
        let mut records: Vec<InteractionRecord> = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());
        let mut duplicates = Vec::new();

        for (i, entry) in raw.into_iter().enumerate() {
            let record = validate(i, entry, &normalizer)?;
            let key = record.drug_pair.key();

            if let Some(&kept) = index.get(&key) {
                let conflicting = !same_content(&records[kept], &record);
                tracing::warn!(
                    index = i,
                    key = %key,
                    conflicting,
                    "Duplicate interaction pair ignored, keeping first entry"
                );
                duplicates.push(DuplicateEntry {
                    index: i,
                    key,
                    conflicting,
                });
                continue;
            }

            index.insert(key, records.len());
            records.push(record);
        }

        let fingerprint = fingerprint(&records);
        tracing::debug!(records = records.len(), %fingerprint, "Interaction store built");

        Ok(Self {
            records,
            normalizer,
            index,
            duplicates,
            fingerprint,
        })
    }

    /// Parse and load a JSON array of seed entries.
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let raw: Vec<RawInteraction> = serde_json::from_str(json)?;
        Self::load(raw)
    }

    /// Load a seed file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The compiled-in clinical interaction table.
    pub fn builtin() -> StoreResult<Self> {
        Self::from_json(BUILTIN_DATASET)
    }

    /// Lookup by canonical key.
    pub fn get(&self, key: &str) -> Option<&InteractionRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Exact lookup for two raw names (aliases expanded, no word matching).
    pub fn lookup(&self, a: &str, b: &str) -> Option<&InteractionRecord> {
        let a = self.normalizer.normalize(a);
        let b = self.normalizer.normalize(b);
        self.get(&canonical_key(&a, &b))
    }

    /// The normalizer record names were loaded with.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Records in load order.
    pub fn records(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Entries dropped at load time.
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }

    /// SHA-256 of the loaded records, hex encoded.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Every drug named in the table, sorted and de-duplicated.
    pub fn drug_names(&self) -> Vec<String> {
        let names: BTreeSet<String> = self
            .records
            .iter()
            .flat_map(|r| [r.drug_pair.first().key_form(), r.drug_pair.second().key_form()])
            .collect();
        names.into_iter().collect()
    }
}

/// Check one raw entry and turn it into a record.
fn validate(
    index: usize,
    entry: RawInteraction,
    normalizer: &Normalizer,
) -> StoreResult<InteractionRecord> {
    let malformed = |reason: String| StoreError::MalformedDataset { index, reason };

    let [a, b]: [String; 2] = entry
        .drugs
        .try_into()
        .map_err(|d: Vec<String>| malformed(format!("expected 2 drugs, found {}", d.len())))?;

    let a = normalizer.normalize(&a);
    let b = normalizer.normalize(&b);
    if a.is_empty() || b.is_empty() {
        return Err(malformed("empty drug name".into()));
    }
    if a.key_form() == b.key_form() {
        return Err(malformed(format!("drug '{}' paired with itself", a)));
    }

    let severity: Severity = entry.severity.parse().map_err(malformed)?;
    let risk: RiskLevel = entry.risk.parse().map_err(malformed)?;

    for (field, value) in [
        ("effects", &entry.effects),
        ("mechanism", &entry.mechanism),
        ("recommendation", &entry.recommendation),
    ] {
        if value.trim().is_empty() {
            return Err(malformed(format!("empty {}", field)));
        }
    }

    Ok(InteractionRecord {
        drug_pair: DrugPair::new(a, b),
        severity,
        risk,
        effects: entry.effects.trim().to_string(),
        mechanism: entry.mechanism.trim().to_string(),
        recommendation: entry.recommendation.trim().to_string(),
    })
}

fn same_content(a: &InteractionRecord, b: &InteractionRecord) -> bool {
    a.severity == b.severity
        && a.risk == b.risk
        && a.effects == b.effects
        && a.mechanism == b.mechanism
        && a.recommendation == b.recommendation
}

fn fingerprint(records: &[InteractionRecord]) -> String {
    let mut hasher = Sha256::new();
    for r in records {
        hasher.update(r.drug_pair.key().as_bytes());
        for field in [
            r.severity.to_string(),
            r.risk.to_string(),
            r.effects.clone(),
            r.mechanism.clone(),
            r.recommendation.clone(),
        ] {
            hasher.update([0x1f]);
            hasher.update(field.as_bytes());
        }
        hasher.update([0x1e]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(a: &str, b: &str, severity: &str, rec: &str) -> RawInteraction {
        RawInteraction {
            drugs: vec![a.into(), b.into()],
            severity: severity.into(),
            risk: "High".into(),
            effects: "Bleeding.".into(),
            mechanism: "Additive.".into(),
            recommendation: rec.into(),
        }
    }

    #[test]
    fn test_builtin_dataset_loads() {
        let store = InteractionStore::builtin().unwrap();
        assert!(store.len() > 100);
        assert_eq!(store.fingerprint().len(), 64);
    }

    #[test]
    fn test_builtin_duplicate_is_reported() {
        let store = InteractionStore::builtin().unwrap();
        let dup = store
            .duplicates()
            .iter()
            .find(|d| d.key == "amiodarone|digoxin")
            .expect("amiodarone/digoxin is listed twice in the seed");
        assert!(dup.conflicting);

        // First entry wins
        let record = store.lookup("amiodarone", "digoxin").unwrap();
        assert_eq!(record.recommendation, "Reduce Digoxin 50%.");
    }

    #[test]
    fn test_canonical_key_symmetry() {
        let a = NormalizedName::new("Warfarin");
        let b = NormalizedName::new("aspirin");
        assert_eq!(canonical_key(&a, &b), canonical_key(&b, &a));
        assert_eq!(canonical_key(&a, &b), "aspirin|warfarin");
    }

    #[test]
    fn test_lookup_either_order() {
        let store = InteractionStore::builtin().unwrap();
        let ab = store.lookup("Aspirin", "Warfarin").unwrap();
        let ba = store.lookup("warfarin", "ASPIRIN").unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.severity, Severity::Major);
    }

    #[test]
    fn test_multi_word_names_are_keyed_by_words() {
        let store = InteractionStore::builtin().unwrap();
        assert!(store.lookup("Oral Contraceptives", "rifampin").is_some());
        assert!(store.lookup("potassium-chloride", "spironolactone").is_some());
    }

    #[test]
    fn test_first_wins_on_duplicates() {
        let store = InteractionStore::load(vec![
            raw("a", "b", "Major", "first"),
            raw("b", "a", "Minor", "second"),
        ])
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("a", "b").unwrap().recommendation, "first");
        assert_eq!(store.duplicates()[0].index, 1);
    }

    #[test]
    fn test_identical_duplicate_not_conflicting() {
        let store = InteractionStore::load(vec![
            raw("a", "b", "Major", "same"),
            raw("a", "b", "Major", "same"),
        ])
        .unwrap();
        assert!(!store.duplicates()[0].conflicting);
    }

    #[test]
    fn test_rejects_wrong_drug_count() {
        let mut entry = raw("a", "b", "Major", "r");
        entry.drugs.push("c".into());
        let err = InteractionStore::load(vec![entry]).unwrap_err();
        assert!(matches!(err, StoreError::MalformedDataset { index: 0, .. }));
    }

    #[test]
    fn test_rejects_empty_fields() {
        let err = InteractionStore::load(vec![
            raw("a", "b", "Major", "ok"),
            raw("c", " ", "Major", "ok"),
        ])
        .unwrap_err();
        assert!(matches!(err, StoreError::MalformedDataset { index: 1, .. }));

        let err = InteractionStore::load(vec![raw("a", "b", "Major", "  ")]).unwrap_err();
        assert!(err.to_string().contains("recommendation"));
    }

    #[test]
    fn test_rejects_unknown_severity() {
        let err = InteractionStore::load(vec![raw("a", "b", "Severe", "r")]).unwrap_err();
        assert!(err.to_string().contains("unknown severity"));
    }

    #[test]
    fn test_rejects_missing_json_field() {
        let json = r#"[{"drugs":["a","b"],"severity":"Major","risk":"High","effects":"e"}]"#;
        assert!(matches!(
            InteractionStore::from_json(json),
            Err(StoreError::Json(_))
        ));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let one = InteractionStore::load(vec![raw("a", "b", "Major", "r")]).unwrap();
        let same = InteractionStore::load(vec![raw("b", "a", "Major", "r")]).unwrap();
        let other = InteractionStore::load(vec![raw("a", "b", "Major", "changed")]).unwrap();
        assert_eq!(one.fingerprint(), same.fingerprint());
        assert_ne!(one.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_drug_names_sorted_unique() {
        let store = InteractionStore::load(vec![
            raw("warfarin", "aspirin", "Major", "r"),
            raw("aspirin", "vitamin_k", "Major", "r"),
        ])
        .unwrap();
        assert_eq!(store.drug_names(), vec!["aspirin", "vitamin k", "warfarin"]);
    }

    #[test]
    fn test_alias_named_records_are_keyed_canonically() {
        let store = InteractionStore::load(vec![
            raw("Acetaminophen", "Coumadin", "Moderate", "Monitor INR."),
            raw("ethanol", "metronidazole", "Major", "Avoid."),
        ])
        .unwrap();

        assert_eq!(store.get("paracetamol|warfarin").unwrap().recommendation, "Monitor INR.");
        assert!(store.lookup("Tylenol", "warfarin").is_some());
        assert!(store.lookup("alcohol", "Flagyl").is_some());
        assert_eq!(store.drug_names(), vec!["alcohol", "metronidazole", "paracetamol", "warfarin"]);
    }

    #[test]
    fn test_alias_and_canonical_spellings_are_duplicates() {
        let store = InteractionStore::load(vec![
            raw("paracetamol", "warfarin", "Moderate", "first"),
            raw("acetaminophen", "warfarin", "Moderate", "second"),
        ])
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.duplicates()[0].key, "paracetamol|warfarin");
    }

    #[test]
    fn test_alias_of_same_drug_paired_with_itself_rejected() {
        let err = InteractionStore::load(vec![raw("tylenol", "paracetamol", "Minor", "r")])
            .unwrap_err();
        assert!(err.to_string().contains("paired with itself"));
    }

    #[test]
    fn test_load_without_aliases_keeps_spelling() {
        let store = InteractionStore::load_with(
            vec![raw("acetaminophen", "warfarin", "Moderate", "r")],
            Normalizer::without_aliases(),
        )
        .unwrap();
        assert!(store.get("acetaminophen|warfarin").is_some());
        assert!(store.lookup("tylenol", "warfarin").is_none());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.json");
        std::fs::write(
            &path,
            r#"[{"drugs":["a","b"],"severity":"Minor","risk":"Low","effects":"e","mechanism":"m","rec":"r"}]"#,
        )
        .unwrap();

        let store = InteractionStore::from_path(&path).unwrap();
        assert_eq!(store.lookup("A", "B").unwrap().severity, Severity::Minor);

        assert!(matches!(
            InteractionStore::from_path(dir.path().join("missing.json")),
            Err(StoreError::Io(_))
        ));
    }
}
