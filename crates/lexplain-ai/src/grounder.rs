//! Semantic grounding: link clause explanations back to source sentences.
//!
//! Sentences are segmented and encoded once per document; each clause
//! explanation is then encoded and matched against the full sentence set.

use lexplain_core::record::ClauseReference;
use lexplain_core::segment::sentences;
use tracing::debug;

use crate::SentenceEncoder;
use crate::index::top_k;

/// How many source sentences to record per clause.
pub const MATCHES_PER_CLAUSE: usize = 2;

/// Map each clause explanation to its best-matching source sentences.
///
/// Returns one [`ClauseReference`] per explanation, in input order, keyed
/// `clause_<i+1>` by position. A document with zero usable sentences
/// produces empty match lists, not an error.
pub fn ground_clauses(
    encoder: &mut dyn SentenceEncoder,
    document_text: &str,
    explanations: &[String],
) -> anyhow::Result<Vec<ClauseReference>> {
    let sentence_list: Vec<&str> = sentences(document_text).collect();

    if sentence_list.is_empty() {
        debug!(clauses = explanations.len(), "no usable sentences to ground against");
        return Ok(explanations
            .iter()
            .enumerate()
            .map(|(i, _)| ClauseReference {
                id: ClauseReference::positional_id(i),
                matches: Vec::new(),
            })
            .collect());
    }

    // Encode the sentence set once; reuse it for every clause query.
    let sentence_vectors = encoder.encode_batch(&sentence_list)?;

    let mut references = Vec::with_capacity(explanations.len());
    for (i, explanation) in explanations.iter().enumerate() {
        let query = encoder.encode(explanation)?;
        let matches = top_k(&query, &sentence_vectors, MATCHES_PER_CLAUSE)
            .into_iter()
            .map(|(idx, _)| sentence_list[idx].to_string())
            .collect();
        references.push(ClauseReference {
            id: ClauseReference::positional_id(i),
            matches,
        });
    }

    debug!(
        sentences = sentence_list.len(),
        clauses = references.len(),
        "grounded clauses"
    );
    Ok(references)
}
