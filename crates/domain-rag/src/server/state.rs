//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::RagConfig;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::generation::AnswerSynthesizer;
use crate::ingestion::{DocumentLoader, FileParser, IngestPipeline, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::{Retriever, VectorIndex};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// The single domain this process serves
    domain: Domain,
    /// Read-only index built at startup
    index: Arc<VectorIndex>,
    /// Query embedding and search
    retriever: Retriever,
    /// Prompting and answer parsing
    synthesizer: AnswerSynthesizer,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Ingest the domain and assemble the state
    ///
    /// Fails if the domain cannot be indexed; the server must not start
    /// without an index.
    pub async fn initialize(
        config: RagConfig,
        domain: Domain,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        tracing::info!("Initializing RAG application state for domain '{}'...", domain.name());

        let parser = FileParser::new(Duration::from_secs(config.knowledge_base.pdf_timeout_secs));
        let pipeline = IngestPipeline::new(
            DocumentLoader::new(parser),
            TextChunker::from_config(&config.chunking)?,
            Arc::clone(&embedder),
        );

        let (index, summary) = pipeline.run(&domain).await?;
        if summary.report.failed > 0 {
            tracing::warn!(
                "{} file(s) in domain '{}' could not be read and were skipped",
                summary.report.failed,
                domain.name()
            );
        }

        let state = Self::from_parts(config, domain, index, embedder, llm);
        tracing::info!("RAG application state initialized");
        Ok(state)
    }

    /// Assemble state around an already built index
    pub fn from_parts(
        config: RagConfig,
        domain: Domain,
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let retriever = Retriever::new(embedder, config.retrieval.top_k);
        let synthesizer = AnswerSynthesizer::new(llm, &config.prompt, &domain);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                domain,
                index: Arc::new(index),
                retriever,
                synthesizer,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// The active domain
    pub fn domain(&self) -> &Domain {
        &self.inner.domain
    }

    /// Get the retriever
    pub fn retriever(&self) -> &Retriever {
        &self.inner.retriever
    }

    /// Get the answer synthesizer
    pub fn synthesizer(&self) -> &AnswerSynthesizer {
        &self.inner.synthesizer
    }

    /// The index for a validated domain name
    pub fn index_for(&self, domain: &str) -> Result<Arc<VectorIndex>> {
        if !self.is_ready() {
            return Err(Error::retrieval("Service is not ready"));
        }
        if !self.inner.domain.matches(domain) {
            return Err(Error::retrieval(format!("No index loaded for domain '{}'", domain)));
        }
        Ok(Arc::clone(&self.inner.index))
    }

    /// The loaded index, regardless of readiness
    pub fn index(&self) -> &VectorIndex {
        &self.inner.index
    }

    /// Check if ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
