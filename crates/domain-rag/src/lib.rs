//! domain-rag: single-domain RAG service with structured answers
//!
//! Documents (PDF, DOCX, email, plain text) from one knowledge-base domain are
//! chunked, embedded and indexed at startup. Each request retrieves the most
//! similar segments and asks a hosted generative model for a structured
//! `{decision, amount, justification}` verdict grounded in those segments.

pub mod config;
pub mod domain;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{RagConfig, Secrets};
pub use domain::Domain;
pub use error::{Error, Result};
pub use types::{
    document::{Document, FileType, Segment, SegmentSource},
    query::PredictRequest,
    response::Answer,
};
