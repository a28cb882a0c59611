//! Shared record types for the simplification pipeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk score used when the model omits one or returns something non-numeric.
pub const DEFAULT_RISK: u8 = 5;

/// How much a clause matters to the reader.
///
/// Parsed case-insensitively from model output; anything unrecognised
/// becomes [`Importance::Medium`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    /// Parse a model-supplied importance label, defaulting to `Medium`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Lower-case form used in CSS class names.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// One model-extracted clause: a plain-language summary of a provision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    pub title: String,
    pub explanation: String,
    pub importance: Importance,
    pub original_excerpt: Option<String>,
}

/// Overall risk score (1–10) plus itemised risk factors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: u8,
    pub risk_factors: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            overall_risk: DEFAULT_RISK,
            risk_factors: Vec::new(),
        }
    }
}

/// The five-section simplification result parsed from a model response.
///
/// Always constructible: the parser substitutes a fallback value rather
/// than failing on malformed model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredResult {
    pub summary: String,
    pub key_clauses: Vec<Clause>,
    pub risk_assessment: RiskAssessment,
    pub important_terms: BTreeMap<String, String>,
    pub action_items: Vec<String>,
}

/// Source sentences matched to one clause by similarity search.
///
/// Identifiers are positional (`clause_1`, `clause_2`, …), derived from
/// the clause's place in the model response, never from its content.
/// Re-ordering clauses therefore changes identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseReference {
    pub id: String,
    /// Up to two matched sentences, best first.
    pub matches: Vec<String>,
}

impl ClauseReference {
    /// Identifier for the clause at a zero-based position.
    pub fn positional_id(index: usize) -> String {
        format!("clause_{}", index + 1)
    }
}

/// Render-ready output of one processing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRecord {
    pub summary_html: String,
    pub clauses_html: Vec<String>,
    pub risk_html: String,
    pub terms_html: String,
    pub actions_html: String,
    pub highlighted_document: String,
    pub clause_references: Vec<ClauseReference>,
    pub structured: StructuredResult,
    /// True when the model response could not be parsed and the fallback
    /// result was substituted.
    pub degraded: bool,
}

/// The persisted unit: one processed document and its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: u64,
    pub filename: String,
    pub document_type: String,
    pub original_text: String,
    pub result: FinalRecord,
    pub processed_at: DateTime<Utc>,
}
