//! In-memory vector index over embedded segments

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::types::Segment;

/// Search result with segment and similarity
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The retrieved segment
    pub segment: Segment,
    /// Cosine similarity to the query (higher is better)
    pub similarity: f32,
}

/// Read-only flat index, built once at startup
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimensions: usize,
    segments: Vec<Segment>,
    norms: Vec<f32>,
}

impl VectorIndex {
    /// Build an index from segments that already carry embeddings
    ///
    /// Every embedding must share the dimension of the first one.
    pub fn build(segments: Vec<Segment>) -> Result<Self> {
        let dimensions = match segments.first() {
            Some(first) => first.embedding.len(),
            None => return Err(Error::ingestion("Cannot build an index without segments")),
        };

        if dimensions == 0 {
            return Err(Error::ingestion("Segment has no embedding"));
        }

        if let Some(bad) = segments.iter().find(|s| s.embedding.len() != dimensions) {
            return Err(Error::ingestion(format!(
                "Segment {} of {} has {} dimensions, expected {}",
                bad.index,
                bad.source.filename,
                bad.embedding.len(),
                dimensions
            )));
        }

        let norms = segments.iter().map(|s| l2_norm(&s.embedding)).collect();

        Ok(Self {
            dimensions,
            segments,
            norms,
        })
    }

    /// Embedding dimensions of the indexed segments
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of distinct documents represented in the index
    pub fn document_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.document_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// The `k` segments most similar to `query`, best first
    ///
    /// Ties keep insertion order so results are deterministic.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimensions {
            return Err(Error::retrieval(format!(
                "Query embedding has {} dimensions, index expects {}",
                query.len(),
                self.dimensions
            )));
        }

        let query_norm = l2_norm(query);
        let mut scored: Vec<(usize, f32)> = self
            .segments
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (segment, &norm))| (i, cosine(query, query_norm, &segment.embedding, norm)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, similarity)| SearchResult {
                segment: self.segments[i].clone(),
                similarity,
            })
            .collect())
    }
}

fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], a_norm: f32, b: &[f32], b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (a_norm * b_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileType, SegmentSource};
    use uuid::Uuid;

    fn segment(doc: Uuid, index: u32, embedding: Vec<f32>) -> Segment {
        let source = SegmentSource {
            filename: "policy.txt".to_string(),
            file_type: FileType::Txt,
        };
        let mut segment = Segment::new(doc, source, format!("segment {index}"), 0, 9, index);
        segment.embedding = embedding;
        segment
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let doc = Uuid::new_v4();
        let index = VectorIndex::build(vec![
            segment(doc, 0, vec![0.0, 1.0]),
            segment(doc, 1, vec![1.0, 0.0]),
            segment(doc, 2, vec![0.7, 0.7]),
        ])
        .unwrap();

        let results = index.search(&[1.0, 0.1], 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].segment.index, 1);
        assert_eq!(results[1].segment.index, 2);
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let doc = Uuid::new_v4();
        let index = VectorIndex::build(vec![
            segment(doc, 0, vec![1.0, 0.0]),
            segment(doc, 1, vec![2.0, 0.0]),
            segment(doc, 2, vec![3.0, 0.0]),
        ])
        .unwrap();

        let order: Vec<u32> = index
            .search(&[1.0, 0.0], 3)
            .unwrap()
            .iter()
            .map(|r| r.segment.index)
            .collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_index() {
        let index = VectorIndex::build(vec![segment(Uuid::new_v4(), 0, vec![1.0])]).unwrap();
        assert_eq!(index.search(&[1.0], 10).unwrap().len(), 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = VectorIndex::build(vec![segment(Uuid::new_v4(), 0, vec![1.0, 0.0])]).unwrap();
        assert!(matches!(index.search(&[1.0], 1), Err(Error::Retrieval(_))));

        let mixed = VectorIndex::build(vec![
            segment(Uuid::new_v4(), 0, vec![1.0, 0.0]),
            segment(Uuid::new_v4(), 1, vec![1.0]),
        ]);
        assert!(matches!(mixed, Err(Error::Ingestion(_))));
    }

    #[test]
    fn test_empty_build_fails() {
        assert!(VectorIndex::build(Vec::new()).is_err());
    }

    #[test]
    fn test_document_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let index = VectorIndex::build(vec![
            segment(a, 0, vec![1.0]),
            segment(a, 1, vec![1.0]),
            segment(b, 0, vec![1.0]),
        ])
        .unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.document_count(), 2);
    }
}
