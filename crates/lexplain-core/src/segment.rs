//! Heuristic sentence segmentation for clause matching.
//!
//! Splits on the period only. Abbreviations, decimal numbers, and embedded
//! punctuation are not handled; false splits are an accepted limitation.
//! Spans too short to be meaningfully unique are dropped as noise.

/// Minimum character count for a span to count as a usable sentence.
pub const MIN_SENTENCE_LEN: usize = 20;

/// Split document text into candidate sentences.
///
/// Lazy and restartable: call again for a fresh pass. Each span is
/// whitespace-trimmed; spans under [`MIN_SENTENCE_LEN`] characters are
/// dropped. Empty input yields an empty iterator.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.split('.')
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_LEN)
}
