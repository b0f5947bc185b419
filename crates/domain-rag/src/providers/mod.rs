//! Provider abstractions for embeddings and generation
//!
//! The retrieval and answer pipeline only sees these traits, so hosted
//! models can be swapped for deterministic ones.

pub mod embedding;
pub mod gemini;
pub mod hashing;
pub mod llm;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, RagConfig, Secrets};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use hashing::HashingEmbedder;
pub use llm::LlmProvider;

/// Build the embedding and generation providers selected by configuration
pub fn from_config(
    config: &RagConfig,
    secrets: &Secrets,
) -> Result<(Arc<dyn EmbeddingProvider>, Arc<dyn LlmProvider>)> {
    let api = gemini::GeminiApi::new(&config.llm, secrets.api_key.clone())?;

    let embedder: Arc<dyn EmbeddingProvider> = match config.embeddings.backend {
        EmbeddingBackend::Gemini => {
            Arc::new(gemini::GeminiEmbedder::new(api.clone(), &config.embeddings))
        }
        EmbeddingBackend::Hashing => Arc::new(HashingEmbedder::new(config.embeddings.dimensions)?),
    };

    let llm: Arc<dyn LlmProvider> = Arc::new(gemini::GeminiClient::new(api, &config.llm));

    tracing::info!(
        "Providers initialized (embedding: {}/{}, llm: {}/{})",
        embedder.name(),
        embedder.model(),
        llm.name(),
        llm.model()
    );

    Ok((embedder, llm))
}
