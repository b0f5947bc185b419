//! Document ingestion pipeline with multi-format parsing

mod chunker;
mod loader;
pub(crate) mod parser;
mod processor;

pub use chunker::TextChunker;
pub use loader::{DocumentLoader, LoadReport};
pub use parser::{FileParser, ParsedDocument};
pub use processor::{IngestPipeline, IngestSummary};
