//! HTML rendering of the structured result.
//!
//! Templates are fixed per field type; the CSS class names are the
//! contract with the presentation layer and must not drift.

use lexplain_core::record::{
    Clause, ClauseReference, FinalRecord, RiskAssessment, StructuredResult,
};

/// Assemble the render-ready record from pipeline outputs.
pub fn final_record(
    structured: StructuredResult,
    clause_references: Vec<ClauseReference>,
    highlighted_document: String,
    degraded: bool,
) -> FinalRecord {
    let summary_html = render_summary(&structured.summary);
    let clauses_html = structured
        .key_clauses
        .iter()
        .enumerate()
        .map(|(i, clause)| render_clause(i, clause))
        .collect();
    let risk_html = render_risk(&structured.risk_assessment);
    let terms_html = render_terms(&structured.important_terms);
    let actions_html = render_actions(&structured.action_items);

    FinalRecord {
        summary_html,
        clauses_html,
        risk_html,
        terms_html,
        actions_html,
        highlighted_document,
        clause_references,
        structured,
        degraded,
    }
}

pub fn render_summary(summary: &str) -> String {
    format!("<div class='summary-section'><p>{summary}</p></div>")
}

/// One block per clause: title, importance badge, explanation, and the
/// original excerpt when present.
pub fn render_clause(index: usize, clause: &Clause) -> String {
    let id = ClauseReference::positional_id(index);
    let title = if clause.title.is_empty() {
        format!("Clause {}", index + 1)
    } else {
        clause.title.clone()
    };

    let mut html = format!(
        "<div class='clause-item' data-clause-id='{id}'>\
         <h4 class='clause-title'>{title}</h4>\
         <div class='clause-importance importance-{}'>Importance: {}</div>\
         <p class='clause-explanation'>{}</p>",
        clause.importance.css_class(),
        clause.importance.as_str(),
        clause.explanation,
    );
    if let Some(excerpt) = &clause.original_excerpt {
        html.push_str(&format!(
            "<blockquote class='original-text'>{excerpt}</blockquote>"
        ));
    }
    html.push_str("</div>");
    html
}

pub fn render_risk(risk: &RiskAssessment) -> String {
    let factors: String = risk
        .risk_factors
        .iter()
        .map(|factor| format!("<li class='risk-item'>{factor}</li>"))
        .collect();
    format!(
        "<div class='risk-assessment'>\
         <div class='overall-risk risk-level-{score}'>\
         <strong>Overall Risk Score: {score}/10</strong></div>\
         <ul class='risk-factors'>{factors}</ul></div>",
        score = risk.overall_risk,
    )
}

pub fn render_terms(terms: &std::collections::BTreeMap<String, String>) -> String {
    let items: String = terms
        .iter()
        .map(|(term, definition)| {
            format!(
                "<div class='term-item'><strong class='term-name'>{term}</strong>: \
                 <span class='term-definition'>{definition}</span></div>"
            )
        })
        .collect();
    format!("<div class='terms-section'>{items}</div>")
}

pub fn render_actions(actions: &[String]) -> String {
    let items: String = actions
        .iter()
        .map(|action| format!("<li class='action-item'>{action}</li>"))
        .collect();
    format!("<ul class='action-items'>{items}</ul>")
}
