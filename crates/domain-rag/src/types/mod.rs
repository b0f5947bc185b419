//! Core types for the RAG service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Document, FileType, Segment, SegmentSource};
pub use query::{EvaluateRequest, PredictRequest, ValidatedQuery};
pub use response::{Answer, ServiceInfo, NOT_APPLICABLE};
