//! Generative-model layer: the collaborator trait, an HTTP transport,
//! prompt templates, and tolerant parsing of model responses.

mod error;
pub mod parse;
pub mod prompt;

#[cfg(feature = "http")]
mod client;
#[cfg(feature = "http")]
pub use client::HttpModelClient;

pub use error::ModelError;

use async_trait::async_trait;

/// External generative model: produces a text completion for a prompt.
///
/// No guarantee the completion is well-formed structured text; the
/// [`parse`] module exists specifically to tolerate that. Failures are
/// fatal to the request — no retries.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
