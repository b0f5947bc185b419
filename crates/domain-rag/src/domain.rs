//! The active knowledge domain

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A named knowledge area backed by one folder of the knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    name: String,
    folder: PathBuf,
}

impl Domain {
    /// Resolve a domain by name under the knowledge-base root
    ///
    /// Names are limited to ASCII letters, digits, `-` and `_` so the
    /// resulting folder always stays inside `root`.
    pub fn resolve(root: &Path, name: &str) -> Result<Self> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::config("Domain name must not be empty"));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "Invalid domain name '{}': use letters, digits, '-' or '_'",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            folder: root.join(name),
        })
    }

    /// Domain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Folder holding this domain's documents
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Whether a request's domain selector refers to this domain
    pub fn matches(&self, requested: &str) -> bool {
        self.name.eq_ignore_ascii_case(requested.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let domain = Domain::resolve(Path::new("kb"), "insurance").unwrap();
        assert_eq!(domain.name(), "insurance");
        assert_eq!(domain.folder(), Path::new("kb/insurance"));
    }

    #[test]
    fn test_rejects_path_escape() {
        assert!(Domain::resolve(Path::new("kb"), "../etc").is_err());
        assert!(Domain::resolve(Path::new("kb"), "a/b").is_err());
        assert!(Domain::resolve(Path::new("kb"), "  ").is_err());
    }

    #[test]
    fn test_matches() {
        let domain = Domain::resolve(Path::new("kb"), "legal").unwrap();
        assert!(domain.matches("legal"));
        assert!(domain.matches(" Legal "));
        assert!(!domain.matches("insurance"));
    }
}
