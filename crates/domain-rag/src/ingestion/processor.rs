//! Startup ingestion: load, chunk, embed and index one domain

use std::sync::Arc;
use std::time::Instant;

use super::{DocumentLoader, LoadReport, TextChunker};
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::VectorIndex;

/// Summary of a completed ingestion run
#[derive(Debug, Clone)]
pub struct IngestSummary {
    /// Loader counters
    pub report: LoadReport,
    /// Segments placed in the index
    pub segments: usize,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

/// Builds the read-only index for a domain
pub struct IngestPipeline {
    loader: DocumentLoader,
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl IngestPipeline {
    /// Create a pipeline
    pub fn new(
        loader: DocumentLoader,
        chunker: TextChunker,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            loader,
            chunker,
            embedder,
        }
    }

    /// Run the full pipeline
    ///
    /// Any failure here is fatal for startup: a service without an index
    /// cannot answer anything.
    pub async fn run(&self, domain: &Domain) -> Result<(VectorIndex, IngestSummary)> {
        let start = Instant::now();
        tracing::info!(
            "Ingesting domain '{}' from {}",
            domain.name(),
            domain.folder().display()
        );

        let loader = self.loader.clone();
        let folder = domain.folder().to_path_buf();
        let name = domain.name().to_string();
        let (documents, report) =
            tokio::task::spawn_blocking(move || loader.load_folder(&folder, &name))
                .await
                .map_err(|e| Error::internal(format!("Document loading task failed: {}", e)))??;

        let mut segments: Vec<_> = documents
            .iter()
            .flat_map(|doc| self.chunker.chunk_document(doc))
            .collect();

        if segments.is_empty() {
            return Err(Error::ingestion(format!(
                "Documents for domain '{}' produced no segments",
                domain.name()
            )));
        }

        tracing::info!(
            "Split {} document(s) into {} segment(s); embedding with {}/{}",
            documents.len(),
            segments.len(),
            self.embedder.name(),
            self.embedder.model()
        );

        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| Error::ingestion(format!("Failed to embed segments: {}", e)))?;

        if embeddings.len() != segments.len() {
            return Err(Error::ingestion(format!(
                "Embedder returned {} vectors for {} segments",
                embeddings.len(),
                segments.len()
            )));
        }

        for (segment, embedding) in segments.iter_mut().zip(embeddings) {
            segment.embedding = embedding;
        }

        let index = VectorIndex::build(segments)?;
        let summary = IngestSummary {
            report,
            segments: index.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Index for '{}' ready: {} segment(s), {} dimensions ({}ms)",
            domain.name(),
            summary.segments,
            index.dimensions(),
            summary.elapsed_ms
        );

        Ok((index, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::HashingEmbedder;
    use crate::testing::CountingEmbedder;
    use std::fs;
    use tempfile::TempDir;

    fn pipeline(embedder: Arc<dyn EmbeddingProvider>) -> IngestPipeline {
        IngestPipeline::new(
            DocumentLoader::default(),
            TextChunker::new(200, 40).unwrap(),
            embedder,
        )
    }

    #[tokio::test]
    async fn test_builds_index() {
        let kb = TempDir::new().unwrap();
        let folder = kb.path().join("insurance");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("policy.txt"), "Maternity cover starts after six years. ".repeat(20)).unwrap();
        fs::write(folder.join("faq.md"), "# FAQ\nClaims are settled within 30 days.").unwrap();

        let domain = Domain::resolve(kb.path(), "insurance").unwrap();
        let embedder = Arc::new(CountingEmbedder::new(HashingEmbedder::new(64).unwrap()));
        let (index, summary) = pipeline(embedder.clone()).run(&domain).await.unwrap();

        assert_eq!(summary.report.loaded, 2);
        assert_eq!(index.document_count(), 2);
        assert_eq!(index.dimensions(), 64);
        assert_eq!(summary.segments, index.len());
        assert_eq!(embedder.batch_texts(), index.len());
    }

    #[tokio::test]
    async fn test_missing_folder_fails() {
        let kb = TempDir::new().unwrap();
        let domain = Domain::resolve(kb.path(), "legal").unwrap();
        let result = pipeline(Arc::new(HashingEmbedder::new(8).unwrap())).run(&domain).await;
        assert!(matches!(result, Err(Error::Ingestion(_))));
    }
}
