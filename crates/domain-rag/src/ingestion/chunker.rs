//! Fixed-size text chunking with overlap

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::{Document, Segment, SegmentSource};

/// Splits text into windows of at most `chunk_size` characters where each
/// window starts `chunk_size - overlap` characters after the previous one.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum segment length in characters
    chunk_size: usize,
    /// Characters shared by consecutive segments
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        ChunkingConfig {
            chunk_size,
            chunk_overlap: overlap,
        }
        .validate()?;

        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Character ranges `[start, end)` of the segments covering `len` characters
    pub fn spans(&self, len: usize) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        if len == 0 {
            return spans;
        }

        let step = self.chunk_size - self.overlap;
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(len);
            spans.push((start, end));
            if end == len {
                break;
            }
            start += step;
        }

        spans
    }

    /// Split raw text into segment strings
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        let boundaries = char_boundaries(text);
        let len = boundaries.len() - 1;

        self.spans(len)
            .into_iter()
            .map(|(start, end)| text[boundaries[start]..boundaries[end]].to_string())
            .collect()
    }

    /// Chunk a document into segments that reference it
    pub fn chunk_document(&self, doc: &Document) -> Vec<Segment> {
        let text = &doc.content;
        let boundaries = char_boundaries(text);
        let len = boundaries.len() - 1;
        let source = SegmentSource::of(doc);

        self.spans(len)
            .into_iter()
            .enumerate()
            .map(|(index, (start, end))| {
                Segment::new(
                    doc.id,
                    source.clone(),
                    text[boundaries[start]..boundaries[end]].to_string(),
                    start,
                    end,
                    index as u32,
                )
            })
            .collect()
    }
}

/// Byte offset of every char, plus the end of the string
fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileType;
    use std::path::PathBuf;

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= size {
            1
        } else {
            (len - overlap).div_ceil(size - overlap)
        }
    }

    fn tail(s: &str, n: usize) -> String {
        let chars: Vec<char> = s.chars().collect();
        chars[chars.len() - n..].iter().collect()
    }

    fn head(s: &str, n: usize) -> String {
        s.chars().take(n).collect()
    }

    #[test]
    fn test_short_text_is_one_segment() {
        let chunker = TextChunker::new(1000, 150).unwrap();
        let chunks = chunker.chunk_text("A short clause.");
        assert_eq!(chunks, vec!["A short clause.".to_string()]);

        let exact = "x".repeat(1000);
        assert_eq!(chunker.chunk_text(&exact).len(), 1);
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(10, 2).unwrap();
        assert!(chunker.chunk_text("").is_empty());
    }

    #[test]
    fn test_segment_count_and_overlap() {
        let text: String = (0..2_500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();

        for (size, overlap) in [(1000, 150), (100, 0), (64, 63), (7, 3)] {
            let chunker = TextChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk_text(&text);

            assert_eq!(chunks.len(), expected_count(2_500, size, overlap), "size {size} overlap {overlap}");
            assert!(chunks.iter().all(|c| c.chars().count() <= size));

            for pair in chunks.windows(2) {
                assert_eq!(tail(&pair[0], overlap), head(&pair[1], overlap));
            }

            // The windows cover the whole text
            let mut rebuilt = chunks[0].clone();
            for chunk in &chunks[1..] {
                rebuilt.extend(chunk.chars().skip(overlap));
            }
            assert_eq!(rebuilt, text);
        }
    }

    #[test]
    fn test_multibyte_text() {
        let text = "ß€😀".repeat(40);
        let chunker = TextChunker::new(25, 5).unwrap();
        let chunks = chunker.chunk_text(&text);

        assert_eq!(chunks.len(), expected_count(120, 25, 5));
        for pair in chunks.windows(2) {
            assert_eq!(tail(&pair[0], 5), head(&pair[1], 5));
        }
    }

    #[test]
    fn test_chunk_document_offsets() {
        let doc = Document::new(
            PathBuf::from("policy.txt"),
            FileType::Txt,
            "0123456789abcdefghij".to_string(),
            "hash".to_string(),
            20,
        );
        let chunker = TextChunker::new(8, 3).unwrap();
        let segments = chunker.chunk_document(&doc);

        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].text, "01234567");
        assert_eq!(segments[1].char_start, 5);
        assert_eq!(segments[1].text, "56789abc");
        assert_eq!(segments[3].char_end, 20);
        assert!(segments.iter().all(|s| s.document_id == doc.id));
        assert!(segments.iter().enumerate().all(|(i, s)| s.index as usize == i));
        assert_eq!(segments[2].source.filename, "policy.txt");
    }

    #[test]
    fn test_invalid_settings() {
        assert!(TextChunker::new(0, 0).is_err());
        assert!(TextChunker::new(10, 10).is_err());
        assert!(TextChunker::new(10, 11).is_err());
    }
}
