//! Non-destructive highlighting of matched sentences in a document.
//!
//! Matched spans are located as byte ranges against an immutable snapshot
//! of the original text, so repeated or overlapping sentence text never
//! corrupts the output. Conflicts are resolved in two phases: candidates
//! claim ranges in match-rank order (a clause's best match beats another
//! clause's runner-up; clause order breaks remaining ties), then the
//! surviving non-overlapping ranges are emitted in a single pass sorted
//! by start offset.
//!
//! All characters outside applied ranges are preserved exactly.

use crate::record::ClauseReference;
use crate::segment::MIN_SENTENCE_LEN;

/// Tooltip label carried by every highlight wrapper.
const HIGHLIGHT_LABEL: &str = "Key Clause";

struct Candidate<'a> {
    start: usize,
    end: usize,
    /// Position of the sentence within its clause's match list (0 = best).
    rank: usize,
    clause_id: &'a str,
}

/// Wrap every referenced sentence in the document with clause-tagged markup.
///
/// Every literal occurrence of each referenced sentence is a candidate;
/// sentences under [`MIN_SENTENCE_LEN`] characters are ignored. The whole
/// result is wrapped in a `document-text` block; with no usable
/// references the original text is returned unchanged inside that block.
pub fn annotate_document(text: &str, references: &[ClauseReference]) -> String {
    let mut candidates: Vec<Candidate> = Vec::new();
    for reference in references {
        for (rank, sentence) in reference.matches.iter().enumerate() {
            if sentence.chars().count() < MIN_SENTENCE_LEN {
                continue;
            }
            for (start, found) in text.match_indices(sentence.as_str()) {
                candidates.push(Candidate {
                    start,
                    end: start + found.len(),
                    rank,
                    clause_id: reference.id.as_str(),
                });
            }
        }
    }

    // Claim ranges best-match-first; the stable sort over clause-ordered
    // candidates leaves clause order as the tie-break.
    candidates.sort_by_key(|c| c.rank);

    let mut applied: Vec<Candidate> = Vec::new();
    let mut skipped = 0usize;
    for candidate in candidates {
        let overlaps = applied
            .iter()
            .any(|a| candidate.start < a.end && a.start < candidate.end);
        if overlaps {
            skipped += 1;
        } else {
            applied.push(candidate);
        }
    }
    applied.sort_by_key(|c| c.start);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for candidate in &applied {
        out.push_str(&text[cursor..candidate.start]);
        out.push_str(&format!(
            "<span class=\"highlighted-clause\" data-clause-id=\"{}\" \
             title=\"{HIGHLIGHT_LABEL}\">{}</span>",
            candidate.clause_id,
            &text[candidate.start..candidate.end]
        ));
        cursor = candidate.end;
    }
    out.push_str(&text[cursor..]);

    tracing::debug!(applied = applied.len(), skipped, "annotated document");
    format!("<div class='document-text'>{out}</div>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str, matches: &[&str]) -> ClauseReference {
        ClauseReference {
            id: id.to_string(),
            matches: matches.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn unwrap_outer(annotated: &str) -> &str {
        annotated
            .strip_prefix("<div class='document-text'>")
            .and_then(|s| s.strip_suffix("</div>"))
            .expect("outer wrapper missing")
    }

    #[test]
    fn no_references_returns_text_unchanged() {
        let text = "This agreement is valid for one year.";
        let annotated = annotate_document(text, &[]);
        assert_eq!(unwrap_outer(&annotated), text);
    }

    #[test]
    fn single_span_wrapped_exactly() {
        let text = "Preamble text here. The tenant must pay rent monthly. Closing text.";
        let refs = [reference("clause_1", &["The tenant must pay rent monthly"])];
        let annotated = annotate_document(text, &refs);
        assert_eq!(
            unwrap_outer(&annotated),
            "Preamble text here. <span class=\"highlighted-clause\" \
             data-clause-id=\"clause_1\" title=\"Key Clause\">The tenant must pay rent \
             monthly</span>. Closing text."
        );
    }

    #[test]
    fn every_occurrence_of_repeated_text_is_wrapped() {
        let text = "The tenant must pay rent monthly. Again: The tenant must pay rent monthly.";
        let refs = [reference("clause_1", &["The tenant must pay rent monthly"])];
        let annotated = annotate_document(text, &refs);
        assert_eq!(annotated.matches("data-clause-id=\"clause_1\"").count(), 2);
    }

    #[test]
    fn identical_spans_from_two_clauses_keep_first_clause() {
        let text = "The deposit is refundable within thirty days of move-out.";
        let sentence = "The deposit is refundable within thirty days of move-out";
        let refs = [
            reference("clause_1", &[sentence]),
            reference("clause_2", &[sentence]),
        ];
        let annotated = annotate_document(text, &refs);
        assert_eq!(annotated.matches("data-clause-id=\"clause_1\"").count(), 1);
        assert!(!annotated.contains("clause_2"));
        // The sentence itself appears exactly once, uncorrupted.
        assert_eq!(annotated.matches(sentence).count(), 1);
    }

    #[test]
    fn overlapping_spans_skip_the_conflicting_range() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let refs = [
            reference("clause_1", &["abcdefghijklmnopqrstuvwxyz"]),
            reference("clause_2", &["mnopqrstuvwxyz0123456789"]),
        ];
        let annotated = annotate_document(text, &refs);
        assert_eq!(annotated.matches("clause_1").count(), 1);
        assert!(!annotated.contains("clause_2"));
        // Non-overlapping tail characters survive outside the wrapper.
        assert!(unwrap_outer(&annotated).ends_with("</span>0123456789"));
    }

    #[test]
    fn best_match_beats_another_clauses_runner_up() {
        let text = "This agreement is valid for one year. The tenant must pay rent monthly.";
        let term = "This agreement is valid for one year";
        let rent = "The tenant must pay rent monthly";
        // clause_1's runner-up covers the sentence that is clause_2's best match.
        let refs = [
            reference("clause_1", &[term, rent]),
            reference("clause_2", &[rent, term]),
        ];
        let annotated = annotate_document(text, &refs);
        assert_eq!(annotated.matches("data-clause-id=\"clause_1\"").count(), 1);
        assert_eq!(annotated.matches("data-clause-id=\"clause_2\"").count(), 1);
        assert!(annotated.contains(&format!("data-clause-id=\"clause_2\" title=\"Key Clause\">{rent}")));
    }

    #[test]
    fn short_spans_are_ignored() {
        let text = "Short span here and more text to follow it.";
        let refs = [reference("clause_1", &["Short span"])];
        let annotated = annotate_document(text, &refs);
        assert_eq!(unwrap_outer(&annotated), text);
    }

    #[test]
    fn unmatched_span_leaves_text_unchanged() {
        let text = "Nothing in here matches the reference sentence.";
        let refs = [reference("clause_1", &["An entirely different sentence altogether"])];
        let annotated = annotate_document(text, &refs);
        assert_eq!(unwrap_outer(&annotated), text);
    }

    #[test]
    fn characters_outside_spans_preserved_in_order() {
        let text = "AAA. This thirty-char span sits here. ZZZ.";
        let span = "This thirty-char span sits here";
        let refs = [reference("clause_1", &[span])];
        let annotated = annotate_document(text, &refs);
        let body = unwrap_outer(&annotated);
        assert!(body.starts_with("AAA. <span"));
        assert!(body.ends_with("</span>. ZZZ."));
        assert!(body.contains(&format!(">{span}</span>")));
    }
}
