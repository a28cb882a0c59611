pub mod annotate;
pub mod record;
pub mod segment;

pub use annotate::annotate_document;
pub use record::{
    Clause, ClauseReference, DEFAULT_RISK, DocumentRecord, FinalRecord, Importance,
    RiskAssessment, StructuredResult,
};
pub use segment::{MIN_SENTENCE_LEN, sentences};
