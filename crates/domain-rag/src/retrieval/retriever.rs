//! Query-time retrieval: embed the query and search the domain index

use std::sync::Arc;

use super::index::{SearchResult, VectorIndex};
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

/// Finds the segments most relevant to a query
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a retriever returning at most `top_k` segments
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            embedder,
            top_k: top_k.max(1),
        }
    }

    /// The embedder used for queries
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Retrieve the top segments for `query`, best first
    pub async fn retrieve(&self, query: &str, index: &VectorIndex) -> Result<Vec<SearchResult>> {
        if index.is_empty() {
            return Err(Error::retrieval("Vector index is empty"));
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = index.search(&query_embedding, self.top_k)?;

        tracing::debug!(
            "Retrieved {} segment(s), best similarity {:.3}",
            results.len(),
            results.first().map(|r| r.similarity).unwrap_or(0.0)
        );

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::TextChunker;
    use crate::providers::HashingEmbedder;
    use crate::types::{Document, FileType};
    use std::path::PathBuf;

    async fn index_of(texts: &[&str], embedder: &HashingEmbedder) -> VectorIndex {
        let chunker = TextChunker::new(1000, 150).unwrap();
        let mut segments = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let doc = Document::new(
                PathBuf::from(format!("doc{i}.txt")),
                FileType::Txt,
                text.to_string(),
                format!("hash{i}"),
                text.len() as u64,
            );
            segments.extend(chunker.chunk_document(&doc));
        }
        for segment in &mut segments {
            segment.embedding = embedder.embed(&segment.text).await.unwrap();
        }
        VectorIndex::build(segments).unwrap()
    }

    #[tokio::test]
    async fn test_retrieves_relevant_segment_first() {
        let embedder = HashingEmbedder::new(512).unwrap();
        let index = index_of(
            &[
                "Ambulance charges are reimbursed up to a fixed limit per hospitalization.",
                "A 6-year waiting period applies to maternity benefits under the Exclusive plan.",
                "Room rent is capped at one percent of the sum insured per day.",
            ],
            &embedder,
        )
        .await;

        let retriever = Retriever::new(Arc::new(embedder), 2);
        let results = retriever
            .retrieve("What is the waiting period for maternity expenses?", &index)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].segment.source.filename, "doc1.txt");
    }

    #[tokio::test]
    async fn test_repeated_queries_return_same_order() {
        let embedder = HashingEmbedder::new(256).unwrap();
        let index = index_of(
            &[
                "Maternity benefits have a waiting period.",
                "Maternity benefits have a waiting period.",
                "Cataract surgery has a waiting period of two years.",
                "Ambulance charges are reimbursed.",
            ],
            &embedder,
        )
        .await;

        let retriever = Retriever::new(Arc::new(embedder), 3);
        let ids = |results: Vec<SearchResult>| -> Vec<uuid::Uuid> {
            results.into_iter().map(|r| r.segment.id).collect()
        };

        let results = retriever.retrieve("maternity waiting period", &index).await.unwrap();
        let files: Vec<&str> = results.iter().map(|r| r.segment.source.filename.as_str()).collect();
        assert_eq!(files, vec!["doc0.txt", "doc1.txt", "doc2.txt"]);

        let first = ids(results);
        let second = ids(retriever.retrieve("maternity waiting period", &index).await.unwrap());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_is_retrieval_error() {
        let index = index_of(&["some policy text"], &HashingEmbedder::new(64).unwrap()).await;
        let retriever = Retriever::new(Arc::new(HashingEmbedder::new(32).unwrap()), 4);

        let result = retriever.retrieve("policy", &index).await;
        assert!(matches!(result, Err(Error::Retrieval(_))));
    }
}
