//! The orchestrator: one processing run per document.

use lexplain_ai::{SentenceEncoder, ground_clauses};
use lexplain_core::annotate::annotate_document;
use lexplain_core::record::FinalRecord;
use lexplain_model::parse::{ParseStatus, parse_response};
use lexplain_model::{GenerativeModel, ModelError, prompt};
use thiserror::Error;
use tracing::{info, warn};

use crate::render;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("document processing failed: model call: {0}")]
    Model(#[from] ModelError),

    #[error("document processing failed: clause grounding: {0}")]
    Grounding(#[source] anyhow::Error),
}

/// Sequences model call → parse → ground → annotate → render.
///
/// Steps within one run are sequential and dependent; independent
/// documents share nothing, so separate `Pipeline` values can run
/// concurrently. The model call is the suspension point.
pub struct Pipeline<M, E> {
    model: M,
    encoder: E,
}

impl<M, E> Pipeline<M, E> {
    pub fn new(model: M, encoder: E) -> Self {
        Self { model, encoder }
    }
}

impl<M: GenerativeModel, E> Pipeline<M, E> {
    /// Answer a follow-up question against a stored document.
    ///
    /// One model call over the document's leading slice; no parsing,
    /// grounding, or annotation.
    pub async fn answer(
        &self,
        document_text: &str,
        question: &str,
    ) -> Result<String, ProcessError> {
        let prompt = prompt::question_prompt(document_text, question);
        let raw = self.model.generate(&prompt).await?;
        Ok(format!("<div class='qa-response'>{raw}</div>"))
    }
}

impl<M: GenerativeModel, E: SentenceEncoder> Pipeline<M, E> {
    /// Process one document end to end.
    ///
    /// A malformed model response degrades to the fallback result (no
    /// grounding attempted, original text unhighlighted); only model-call
    /// and grounding failures propagate.
    pub async fn process(
        &mut self,
        document_text: &str,
        document_type: &str,
    ) -> Result<FinalRecord, ProcessError> {
        let prompt = prompt::simplify_prompt(document_type, document_text);
        let raw = self.model.generate(&prompt).await?;

        let (structured, status) = parse_response(&raw);
        let degraded = status == ParseStatus::Fallback;

        let (references, highlighted) = if degraded {
            warn!("model response unparseable; emitting fallback record without grounding");
            (Vec::new(), annotate_document(document_text, &[]))
        } else {
            let explanations: Vec<String> = structured
                .key_clauses
                .iter()
                .map(|clause| clause.explanation.clone())
                .collect();
            let references = ground_clauses(&mut self.encoder, document_text, &explanations)
                .map_err(ProcessError::Grounding)?;
            let highlighted = annotate_document(document_text, &references);
            (references, highlighted)
        };

        info!(
            clauses = structured.key_clauses.len(),
            references = references.len(),
            degraded,
            "document processed"
        );
        Ok(render::final_record(structured, references, highlighted, degraded))
    }
}
