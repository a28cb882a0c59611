//! AI inference layer: ONNX Runtime embeddings and semantic clause grounding.

#[cfg(feature = "onnx")]
mod embedder;
#[cfg(feature = "onnx")]
pub use embedder::Embedder;

mod grounder;
mod index;

pub use grounder::{MATCHES_PER_CLAUSE, ground_clauses};
pub use index::{cosine_similarity, top_k};

/// Seam between grounding logic and the embedding runtime.
///
/// Implementations must be deterministic for identical input and must
/// return one vector per input text, in input order.
pub trait SentenceEncoder {
    /// Encode a batch of texts, one vector per text, in input order.
    fn encode_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Encode a single text.
    fn encode(&mut self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut vectors = self.encode_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("encoder returned no vector"))
    }
}
