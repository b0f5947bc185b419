//! Document and segment types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Supported file types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx)
    Docx,
    /// RFC 822 email message (.eml)
    Email,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Anything else; skipped during ingestion
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "eml" => Self::Email,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document (.docx)",
            Self::Email => "Email",
            Self::Txt => "Text File",
            Self::Markdown => "Markdown",
            Self::Unknown => "Unknown",
        }
    }
}

/// A document ingested from the domain folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Path the document was read from
    pub path: PathBuf,
    /// File name, used when citing the document to the model
    pub filename: String,
    /// File type
    pub file_type: FileType,
    /// Raw extracted text
    pub content: String,
    /// SHA-256 of the extracted text
    pub content_hash: String,
    /// Total number of pages (if applicable)
    pub total_pages: Option<u32>,
    /// File size in bytes
    pub file_size: u64,
    /// Load timestamp
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document from extracted text
    pub fn new(
        path: PathBuf,
        file_type: FileType,
        content: String,
        content_hash: String,
        file_size: u64,
    ) -> Self {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Self {
            id: Uuid::new_v4(),
            path,
            filename,
            file_type,
            content,
            content_hash,
            total_pages: None,
            file_size,
            loaded_at: chrono::Utc::now(),
        }
    }

    /// Number of characters in the extracted text
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Where a segment came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentSource {
    /// File name of the owning document
    pub filename: String,
    /// File type of the owning document
    pub file_type: FileType,
}

impl SegmentSource {
    /// Source descriptor for a document
    pub fn of(doc: &Document) -> Self {
        Self {
            filename: doc.filename.clone(),
            file_type: doc.file_type,
        }
    }
}

/// A bounded span of a document's text, the unit of retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Unique segment ID
    pub id: Uuid,
    /// Owning document ID
    pub document_id: Uuid,
    /// Source information for the prompt context
    pub source: SegmentSource,
    /// Text content
    pub text: String,
    /// Character offsets in the document text, end exclusive
    pub char_start: usize,
    pub char_end: usize,
    /// Position within the document
    pub index: u32,
    /// Embedding vector, filled in during ingestion
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Segment {
    /// Create a new segment without an embedding
    pub fn new(
        document_id: Uuid,
        source: SegmentSource,
        text: String,
        char_start: usize,
        char_end: usize,
        index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            source,
            text,
            char_start,
            char_end,
            index,
            embedding: Vec::new(),
        }
    }
}
