//! ONNX Runtime sentence embeddings for similarity search.
//!
//! Runs a sentence-transformers model (all-MiniLM-L6-v2 by default) and
//! produces mean-pooled, L2-normalised vectors. The model directory must
//! contain `model.onnx` and `tokenizer.json`.

use std::path::Path;

use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::info;

use crate::SentenceEncoder;

/// Token truncation limit (MiniLM's maximum input length).
const MAX_TOKENS: usize = 256;
/// Fallback dimensionality when the model output shape is dynamic.
const FALLBACK_DIM: usize = 384;

/// Sentence embedding generator backed by ONNX Runtime.
///
/// Vectors are unit-length, so cosine similarity reduces to a dot product
/// (see [`crate::cosine_similarity`]). Encoding is deterministic for a
/// given model version and input text.
pub struct Embedder {
    session: Session,
    tokenizer: Tokenizer,
    dim: usize,
}

impl Embedder {
    /// Load a model directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");
        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");
        anyhow::ensure!(
            tokenizer_path.exists(),
            "tokenizer.json not found in {model_dir:?}"
        );

        let session = Session::builder()?.commit_from_file(&model_path)?;
        let dim = output_dim(&session).unwrap_or(FALLBACK_DIM);

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
        tokenizer.with_padding(Some(tokenizers::PaddingParams::default()));

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session,
            tokenizer,
            dim,
        })
    }

    /// Embedding dimensionality (384 for all-MiniLM-L6-v2).
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn run_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let batch_size = texts.len();
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Flatten per-text token ids and masks into [batch_size, seq_len].
        let mut input_ids = vec![0i64; batch_size * seq_len];
        let mut attention_mask = vec![0i64; batch_size * seq_len];
        let mut token_type_ids = vec![0i64; batch_size * seq_len];
        for (row, encoding) in encodings.iter().enumerate() {
            let offset = row * seq_len;
            for (col, &id) in encoding.get_ids().iter().enumerate() {
                input_ids[offset + col] = id as i64;
            }
            for (col, &mask) in encoding.get_attention_mask().iter().enumerate() {
                attention_mask[offset + col] = mask as i64;
            }
            for (col, &tid) in encoding.get_type_ids().iter().enumerate() {
                token_type_ids[offset + col] = tid as i64;
            }
        }

        let shape = [batch_size as i64, seq_len as i64];
        let outputs = self.session.run(ort::inputs![
            "input_ids" => Tensor::from_array((shape, input_ids.into_boxed_slice()))?,
            "attention_mask" => Tensor::from_array((shape, attention_mask.clone().into_boxed_slice()))?,
            "token_type_ids" => Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?,
        ])?;

        // Token embeddings come back as [batch_size, seq_len, dim].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims.len() == 3 && dims[0] as usize == batch_size && dims[2] as usize == self.dim,
            "unexpected output shape {dims:?}, expected [{batch_size}, _, {}]",
            self.dim
        );
        let actual_seq_len = dims[1] as usize;

        let pooled = (0..batch_size)
            .map(|row| {
                mean_pool(
                    output_data,
                    &attention_mask[row * seq_len..row * seq_len + actual_seq_len.min(seq_len)],
                    row,
                    actual_seq_len,
                    self.dim,
                )
            })
            .collect();
        Ok(pooled)
    }
}

impl SentenceEncoder for Embedder {
    fn encode_batch(&mut self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        self.run_batch(texts)
    }
}

/// Attention-masked mean over token embeddings, normalised to unit length.
fn mean_pool(
    token_embeddings: &[f32],
    mask: &[i64],
    row: usize,
    seq_len: usize,
    dim: usize,
) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut token_count = 0.0f32;

    for (col, &mask_val) in mask.iter().enumerate().take(seq_len) {
        if mask_val == 0 {
            continue;
        }
        let offset = (row * seq_len + col) * dim;
        for (d, p) in pooled.iter_mut().enumerate() {
            *p += token_embeddings[offset + d];
        }
        token_count += 1.0;
    }

    if token_count > 0.0 {
        for p in &mut pooled {
            *p /= token_count;
        }
    }
    normalize(&mut pooled);
    pooled
}

/// L2-normalise a vector in place.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Infer the embedding dimension from the model's first output tensor.
fn output_dim(session: &Session) -> Option<usize> {
    match session.outputs()[0].dtype() {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}
