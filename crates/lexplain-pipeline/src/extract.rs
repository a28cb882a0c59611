//! Text-extraction seam for upstream document sources.
//!
//! OCR for scanned PDFs is an external service implementing the same
//! trait; the in-crate implementation only handles plain text.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported mime type: {0}")]
    UnsupportedMime(String),

    #[error("text extraction failed: {0}")]
    Failed(String),
}

/// Turns raw document bytes into text.
///
/// Any non-empty success is usable input; an empty string is a valid,
/// if degenerate, document. Failure is fatal to the request.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String, ExtractError>;
}

/// Pass-through extractor for plain-text payloads.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8], mime_type: &str) -> Result<String, ExtractError> {
        match mime_type {
            "text/plain" => Ok(String::from_utf8_lossy(bytes).into_owned()),
            other => Err(ExtractError::UnsupportedMime(other.to_string())),
        }
    }
}
