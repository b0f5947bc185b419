//! Google Gemini provider implementations
//!
//! - `embedding-001` (or any Gemini embedding model) for segment and query embeddings
//! - `gemini-1.5-flash` (or any Gemini text model) for answer generation
//!
//! Both authenticate with an API key against the Generative Language API.

mod api;
mod client;
mod embedder;

pub use api::GeminiApi;
pub use client::GeminiClient;
pub use embedder::GeminiEmbedder;
