//! Vector index and query-time retrieval

mod index;
mod retriever;

pub use index::{SearchResult, VectorIndex};
pub use retriever::Retriever;
