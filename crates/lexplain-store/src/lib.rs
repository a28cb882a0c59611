//! Storage layer: by-identifier persistence of processed document records.

mod error;
pub use error::StoreError;

mod json_file;
pub use json_file::{DocumentStore, JsonFileStore};
