//! Recursive document loading for a domain folder

use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

use super::parser::FileParser;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// Outcome counters of one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files that produced a document
    pub loaded: usize,
    /// Files skipped for an unsupported extension
    pub unsupported: usize,
    /// Files whose extraction failed or yielded no text
    pub failed: usize,
    /// Files whose text duplicated an earlier document
    pub duplicates: usize,
}

/// Loads every supported file under a domain folder
#[derive(Debug, Clone, Default)]
pub struct DocumentLoader {
    parser: FileParser,
}

impl DocumentLoader {
    /// Create a loader around a parser
    pub fn new(parser: FileParser) -> Self {
        Self { parser }
    }

    /// Load all documents of a domain
    ///
    /// A bad file is logged and skipped. The whole load fails only when the
    /// folder is missing or nothing usable was found.
    pub fn load(&self, domain: &Domain) -> Result<Vec<Document>> {
        self.load_folder(domain.folder(), domain.name())
            .map(|(documents, _)| documents)
    }

    /// Load all documents under `folder`, returning them with a report
    pub fn load_folder(&self, folder: &Path, domain: &str) -> Result<(Vec<Document>, LoadReport)> {
        if !folder.is_dir() {
            return Err(Error::ingestion(format!(
                "Document folder for domain '{}' not found: {}",
                domain,
                folder.display()
            )));
        }

        let mut documents = Vec::new();
        let mut report = LoadReport::default();
        let mut seen_hashes = HashSet::new();

        for entry in WalkDir::new(folder).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry under {}: {}", folder.display(), e);
                    report.failed += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let file_type = FileType::from_path(path);
            if !file_type.is_supported() {
                tracing::debug!("Skipping unsupported file {}", path.display());
                report.unsupported += 1;
                continue;
            }

            let document = match self.load_file(path) {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    report.failed += 1;
                    continue;
                }
            };

            if !seen_hashes.insert(document.content_hash.clone()) {
                tracing::info!("Skipping {}: same text as an earlier document", path.display());
                report.duplicates += 1;
                continue;
            }

            tracing::debug!(
                "Loaded {} ({}, {} chars)",
                document.filename,
                document.file_type.display_name(),
                document.char_len()
            );
            documents.push(document);
            report.loaded += 1;
        }

        tracing::info!(
            "Domain '{}': {} document(s) loaded, {} unsupported, {} failed, {} duplicate(s)",
            domain,
            report.loaded,
            report.unsupported,
            report.failed,
            report.duplicates
        );

        if documents.is_empty() {
            return Err(Error::ingestion(format!(
                "No usable documents found for domain '{}' in {}",
                domain,
                folder.display()
            )));
        }

        Ok((documents, report))
    }

    /// Read and parse a single file
    fn load_file(&self, path: &Path) -> Result<Document> {
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let parsed = self.parser.parse(&filename, &data)?;

        let mut document = Document::new(
            path.to_path_buf(),
            parsed.file_type,
            parsed.content,
            parsed.content_hash,
            data.len() as u64,
        );
        document.total_pages = parsed.total_pages;

        Ok(document)
    }
}
