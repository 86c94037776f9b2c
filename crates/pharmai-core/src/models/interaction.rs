//! Drug-drug interaction models.

use std::fmt;
use std::str::FromStr;

use pharmai_llm::InteractionReply;
use serde::{Deserialize, Serialize};

use crate::resolver::NormalizedName;

/// Clinical weight of an interaction class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "major" => Ok(Severity::Major),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Minor => "Minor",
            Severity::Moderate => "Moderate",
            Severity::Major => "Major",
        };
        f.write_str(label)
    }
}

/// Informal escalation label, set independently of [`Severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
    Fatal,
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            "fatal" => Ok(RiskLevel::Fatal),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
            RiskLevel::Fatal => "Fatal",
        };
        f.write_str(label)
    }
}

/// Unordered pair of canonical drug names, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrugPair {
    first: NormalizedName,
    second: NormalizedName,
}

impl DrugPair {
    /// Build a pair; argument order does not matter.
    pub fn new(a: NormalizedName, b: NormalizedName) -> Self {
        if a.key_form() <= b.key_form() {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &NormalizedName {
        &self.first
    }

    pub fn second(&self) -> &NormalizedName {
        &self.second
    }

    /// Canonical pair key: sorted key forms joined by `|`.
    pub fn key(&self) -> String {
        format!("{}|{}", self.first.key_form(), self.second.key_form())
    }
}

/// A curated interaction between two drugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub drug_pair: DrugPair,
    pub severity: Severity,
    pub risk: RiskLevel,
    /// Adverse clinical outcome
    pub effects: String,
    /// Pharmacological cause
    pub mechanism: String,
    /// Advised action
    pub recommendation: String,
}

/// One entry of the seed dataset, before validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawInteraction {
    pub drugs: Vec<String>,
    pub severity: String,
    pub risk: String,
    pub effects: String,
    pub mechanism: String,
    #[serde(alias = "rec")]
    pub recommendation: String,
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Verified entry of the curated table
    Database,
    /// Generated by the inference collaborator, not verified
    Inference,
    /// No answer could be established
    None,
}

/// Hedge used whenever no interaction could be established.
pub const UNVERIFIED_MESSAGE: &str = "No known interaction found; manual verification advised.";

/// Recommendation attached to the fail-safe answer.
pub const UNVERIFIED_RECOMMENDATION: &str =
    "Verify with a pharmacist or a clinical reference before dispensing.";

/// Label attached to model-generated answers.
pub const INFERRED_MESSAGE: &str =
    "AI-generated assessment, not a verified clinical record; confirm before acting.";

/// Resolver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionQueryResult {
    pub found: bool,
    pub severity: Option<Severity>,
    pub risk: Option<RiskLevel>,
    pub effects: Option<String>,
    pub mechanism: Option<String>,
    pub recommendation: Option<String>,
    pub message: Option<String>,
    pub source: Source,
}

impl InteractionQueryResult {
    /// Verified hit from the curated table.
    pub fn from_record(record: &InteractionRecord) -> Self {
        Self {
            found: true,
            severity: Some(record.severity),
            risk: Some(record.risk),
            effects: Some(record.effects.clone()),
            mechanism: Some(record.mechanism.clone()),
            recommendation: Some(record.recommendation.clone()),
            message: None,
            source: Source::Database,
        }
    }

    /// Interaction reported by the inference collaborator.
    ///
    /// Labels outside the known enumerations are dropped rather than guessed.
    pub fn inferred(reply: InteractionReply) -> Self {
        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Self {
            found: true,
            severity: reply.severity.as_deref().and_then(|s| s.parse().ok()),
            risk: reply.risk.as_deref().and_then(|s| s.parse().ok()),
            effects: non_empty(reply.effects),
            mechanism: non_empty(reply.mechanism),
            recommendation: non_empty(reply.recommendation)
                .or_else(|| Some(UNVERIFIED_RECOMMENDATION.to_string())),
            message: Some(INFERRED_MESSAGE.to_string()),
            source: Source::Inference,
        }
    }

    /// Fail-safe answer: never asserts safety.
    pub fn unverified() -> Self {
        Self {
            found: false,
            severity: None,
            risk: None,
            effects: None,
            mechanism: None,
            recommendation: Some(UNVERIFIED_RECOMMENDATION.to_string()),
            message: Some(UNVERIFIED_MESSAGE.to_string()),
            source: Source::None,
        }
    }
}
