//! Tolerant parsing of semi-structured model responses.
//!
//! Models drift on formatting: code fences around the JSON, a stray
//! leading `json` token, missing or mistyped fields. The strategy is a
//! small explicit normalisation step (strip known wrapper tokens)
//! followed by strict JSON parsing with a typed fallback value — total,
//! never an error, so a request is never aborted for malformed output.

use std::collections::BTreeMap;

use lexplain_core::record::{
    Clause, DEFAULT_RISK, Importance, RiskAssessment, StructuredResult,
};
use serde_json::Value;
use tracing::warn;

/// Whether the response parsed cleanly or the fallback was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    Parsed,
    Fallback,
}

/// Parse a raw model response into a [`StructuredResult`].
///
/// Total: malformed input yields the fixed fallback result with
/// [`ParseStatus::Fallback`], never an error.
pub fn parse_response(raw: &str) -> (StructuredResult, ParseStatus) {
    let cleaned = strip_wrappers(raw);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(fields)) => (normalize(fields), ParseStatus::Parsed),
        Ok(other) => {
            warn!(kind = json_kind(&other), "model response is not a JSON object");
            (fallback(raw), ParseStatus::Fallback)
        }
        Err(err) => {
            warn!(%err, "model response is not valid JSON");
            (fallback(raw), ParseStatus::Fallback)
        }
    }
}

/// Remove a stray leading `json` token and surrounding code fences.
fn strip_wrappers(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("json") {
        text = rest.trim();
    }
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.strip_prefix("json").unwrap_or(rest);
        text = text.strip_suffix("```").unwrap_or(text);
        text = text.trim();
    }
    text
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Field normalisation ──

fn normalize(mut fields: serde_json::Map<String, Value>) -> StructuredResult {
    StructuredResult {
        summary: take_text(fields.remove("SIMPLIFIED_SUMMARY")),
        key_clauses: take_clauses(fields.remove("KEY_CLAUSES")),
        risk_assessment: take_risk(fields.remove("RISK_ASSESSMENT")),
        important_terms: take_terms(fields.remove("IMPORTANT_TERMS")),
        action_items: take_strings(fields.remove("ACTION_ITEMS")),
    }
}

/// A string as-is, nothing for null/absent, compact JSON for anything else.
fn take_text(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

fn take_clauses(value: Option<Value>) -> Vec<Clause> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items.into_iter().map(clause_from_value).collect()
}

fn clause_from_value(value: Value) -> Clause {
    match value {
        Value::Object(mut obj) => Clause {
            title: take_text(obj.remove("title")),
            explanation: take_text(obj.remove("explanation")),
            importance: match obj.remove("importance") {
                Some(Value::String(s)) => Importance::parse(&s),
                _ => Importance::Medium,
            },
            original_excerpt: match obj.remove("original_excerpt") {
                Some(Value::String(s)) if !s.is_empty() => Some(s),
                _ => None,
            },
        },
        // A bare-string clause is all explanation.
        other => Clause {
            title: String::new(),
            explanation: take_text(Some(other)),
            importance: Importance::Medium,
            original_excerpt: None,
        },
    }
}

/// Accepts an aggregate object, a bare factor list, or a bare score.
fn take_risk(value: Option<Value>) -> RiskAssessment {
    match value {
        Some(Value::Object(mut obj)) => RiskAssessment {
            overall_risk: risk_score(obj.remove("overall_risk")),
            risk_factors: take_strings(obj.remove("risk_factors")),
        },
        Some(factors @ Value::Array(_)) => RiskAssessment {
            overall_risk: DEFAULT_RISK,
            risk_factors: take_strings(Some(factors)),
        },
        Some(score @ Value::Number(_)) => RiskAssessment {
            overall_risk: risk_score(Some(score)),
            risk_factors: Vec::new(),
        },
        _ => RiskAssessment::default(),
    }
}

/// Any numeric form, rounded and clamped into 1–10; otherwise the default.
fn risk_score(value: Option<Value>) -> u8 {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .map(|v| (v.round() as i64).clamp(1, 10) as u8)
            .unwrap_or(DEFAULT_RISK),
        _ => DEFAULT_RISK,
    }
}

fn take_terms(value: Option<Value>) -> BTreeMap<String, String> {
    let Some(Value::Object(obj)) = value else {
        return BTreeMap::new();
    };
    obj.into_iter()
        .map(|(term, definition)| (term, take_text(Some(definition))))
        .collect()
}

fn take_strings(value: Option<Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .map(|item| take_text(Some(item)))
        .collect()
}

/// The fixed always-valid result used when the response cannot be parsed.
fn fallback(raw: &str) -> StructuredResult {
    StructuredResult {
        summary: raw.to_string(),
        key_clauses: vec![Clause {
            title: "Unable to parse".into(),
            explanation: "Please review manually".into(),
            importance: Importance::Medium,
            original_excerpt: None,
        }],
        risk_assessment: RiskAssessment::default(),
        important_terms: BTreeMap::new(),
        action_items: vec!["Review document carefully".into()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "SIMPLIFIED_SUMMARY": "A one-year residential lease.",
        "KEY_CLAUSES": [
            {
                "title": "Term",
                "explanation": "The lease runs for one year.",
                "importance": "High",
                "original_excerpt": "valid for one year"
            },
            {
                "title": "Rent",
                "explanation": "Rent is due monthly.",
                "importance": "medium"
            }
        ],
        "RISK_ASSESSMENT": {
            "overall_risk": 4,
            "risk_factors": ["Automatic renewal", "Daily late fees"]
        },
        "IMPORTANT_TERMS": {"Lessee": "The person renting"},
        "ACTION_ITEMS": ["Diarise the renewal deadline"]
    }"#;

    #[test]
    fn well_formed_response_parses_exactly() {
        let (result, status) = parse_response(FULL_RESPONSE);
        assert_eq!(status, ParseStatus::Parsed);
        assert_eq!(result.summary, "A one-year residential lease.");
        assert_eq!(result.key_clauses.len(), 2);
        assert_eq!(result.key_clauses[0].title, "Term");
        assert_eq!(result.key_clauses[0].importance, Importance::High);
        assert_eq!(
            result.key_clauses[0].original_excerpt.as_deref(),
            Some("valid for one year")
        );
        assert_eq!(result.key_clauses[1].importance, Importance::Medium);
        assert!(result.key_clauses[1].original_excerpt.is_none());
        assert_eq!(result.risk_assessment.overall_risk, 4);
        assert_eq!(result.risk_assessment.risk_factors.len(), 2);
        assert_eq!(result.important_terms["Lessee"], "The person renting");
        assert_eq!(result.action_items, vec!["Diarise the renewal deadline"]);
    }

    #[test]
    fn fenced_response_parses_identically() {
        let fenced = format!("```json\n{FULL_RESPONSE}\n```");
        let bare_fence = format!("```\n{FULL_RESPONSE}\n```");

        let (from_fenced, status) = parse_response(&fenced);
        assert_eq!(status, ParseStatus::Parsed);
        let (from_bare, _) = parse_response(&bare_fence);
        let (from_plain, _) = parse_response(FULL_RESPONSE);

        assert_eq!(from_fenced.summary, from_plain.summary);
        assert_eq!(from_bare.summary, from_plain.summary);
        assert_eq!(from_fenced.key_clauses.len(), from_plain.key_clauses.len());
    }

    #[test]
    fn leading_json_token_is_stripped() {
        let (result, status) = parse_response("json {\"SIMPLIFIED_SUMMARY\": \"ok\"}");
        assert_eq!(status, ParseStatus::Parsed);
        assert_eq!(result.summary, "ok");
    }

    #[test]
    fn omitted_fields_take_defaults() {
        let (result, status) = parse_response("```json\n{\"SIMPLIFIED_SUMMARY\": \"ok\"}\n```");
        assert_eq!(status, ParseStatus::Parsed);
        assert_eq!(result.summary, "ok");
        assert!(result.key_clauses.is_empty());
        assert_eq!(result.risk_assessment.overall_risk, DEFAULT_RISK);
        assert!(result.risk_assessment.risk_factors.is_empty());
        assert!(result.important_terms.is_empty());
        assert!(result.action_items.is_empty());
    }

    #[test]
    fn garbage_yields_the_fallback() {
        let raw = "I'm sorry, I cannot analyse this document.";
        let (result, status) = parse_response(raw);
        assert_eq!(status, ParseStatus::Fallback);
        assert_eq!(result.summary, raw);
        assert_eq!(result.key_clauses.len(), 1);
        assert_eq!(result.key_clauses[0].title, "Unable to parse");
        assert_eq!(result.risk_assessment.overall_risk, DEFAULT_RISK);
        assert_eq!(result.action_items, vec!["Review document carefully"]);
    }

    #[test]
    fn truncated_json_yields_the_fallback() {
        let (_, status) = parse_response("{\"SIMPLIFIED_SUMMARY\": \"cut off");
        assert_eq!(status, ParseStatus::Fallback);
    }

    #[test]
    fn non_object_json_yields_the_fallback() {
        let (_, status) = parse_response("[1, 2, 3]");
        assert_eq!(status, ParseStatus::Fallback);
    }

    #[test]
    fn bare_string_clause_becomes_explanation() {
        let raw = r#"{"KEY_CLAUSES": ["Pay rent on the first of each month"]}"#;
        let (result, _) = parse_response(raw);
        assert_eq!(result.key_clauses.len(), 1);
        assert_eq!(result.key_clauses[0].title, "");
        assert_eq!(
            result.key_clauses[0].explanation,
            "Pay rent on the first of each month"
        );
        assert_eq!(result.key_clauses[0].importance, Importance::Medium);
    }

    #[test]
    fn risk_as_bare_list_takes_default_score() {
        let raw = r#"{"RISK_ASSESSMENT": ["Unlimited liability", "No exit clause"]}"#;
        let (result, _) = parse_response(raw);
        assert_eq!(result.risk_assessment.overall_risk, DEFAULT_RISK);
        assert_eq!(result.risk_assessment.risk_factors.len(), 2);
    }

    #[test]
    fn non_numeric_risk_takes_default_score() {
        let raw = r#"{"RISK_ASSESSMENT": {"overall_risk": "high", "risk_factors": []}}"#;
        let (result, _) = parse_response(raw);
        assert_eq!(result.risk_assessment.overall_risk, DEFAULT_RISK);
    }

    #[test]
    fn out_of_range_risk_is_clamped() {
        let (high, _) = parse_response(r#"{"RISK_ASSESSMENT": {"overall_risk": 37}}"#);
        assert_eq!(high.risk_assessment.overall_risk, 10);
        let (low, _) = parse_response(r#"{"RISK_ASSESSMENT": {"overall_risk": 0}}"#);
        assert_eq!(low.risk_assessment.overall_risk, 1);
    }

    #[test]
    fn non_string_values_are_stringified() {
        let raw = r#"{
            "IMPORTANT_TERMS": {"Deposit": 1200},
            "ACTION_ITEMS": [42, "Call the landlord"]
        }"#;
        let (result, _) = parse_response(raw);
        assert_eq!(result.important_terms["Deposit"], "1200");
        assert_eq!(result.action_items, vec!["42", "Call the landlord"]);
    }
}
