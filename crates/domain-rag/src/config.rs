//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Upper bound for `llm.max_retries`
pub const MAX_LLM_RETRIES: u32 = 10;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Knowledge base layout
    pub knowledge_base: KnowledgeBaseConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Generative model configuration
    pub llm: LlmConfig,
    /// Prompt configuration
    pub prompt: PromptConfig,
    /// Names of the environment variables holding secrets
    pub secrets: SecretsConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text; missing sections keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RagConfig =
            toml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.retrieval.top_k == 0 {
            return Err(Error::config("retrieval.top_k must be at least 1"));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::config("embeddings.dimensions must be at least 1"));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::config("embeddings.batch_size must be at least 1"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::config("llm.timeout_secs must be at least 1"));
        }
        if self.llm.max_retries > MAX_LLM_RETRIES {
            return Err(Error::config(format!(
                "llm.max_retries ({}) must not exceed {}",
                self.llm.max_retries, MAX_LLM_RETRIES
            )));
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable permissive CORS (the frontend is served from another origin)
    pub enable_cors: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_body_size: 64 * 1024,
        }
    }
}

/// Knowledge base layout: one subfolder per domain under `root`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Root directory holding the domain folders
    pub root: PathBuf,
    /// Timeout for extracting text from a single PDF, in seconds
    pub pdf_timeout_secs: u64,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("knowledge_base"),
            pdf_timeout_secs: 60,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum segment length in characters
    pub chunk_size: usize,
    /// Characters shared between consecutive segments
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 150,
        }
    }
}

impl ChunkingConfig {
    /// Overlap must leave room for the window to advance
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::config("chunking.chunk_size must be at least 1"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of segments handed to the synthesizer
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Embedding backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Hosted Gemini embedding model
    #[default]
    Gemini,
    /// Deterministic feature-hashing embedder, no network
    Hashing,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which embedder to use
    pub backend: EmbeddingBackend,
    /// Model name
    pub model: String,
    /// Embedding dimensions
    pub dimensions: usize,
    /// Texts per batch request
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Gemini,
            model: "models/embedding-001".to_string(),
            dimensions: 768,
            batch_size: 100,
        }
    }
}

/// Generative model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for transient failures
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            generate_model: "gemini-1.5-flash-latest".to_string(),
            temperature: 0.0,
            max_output_tokens: 1024,
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Role the model is asked to play; defaults to an expert evaluator for the active domain
    pub evaluator_role: Option<String>,
    /// Verdicts the model should choose between
    pub decisions: Vec<String>,
}

impl PromptConfig {
    /// Decisions offered to the model, falling back to an approve/reject verdict
    pub fn decision_options(&self) -> Vec<String> {
        if self.decisions.is_empty() {
            vec!["Approved".to_string(), "Rejected".to_string()]
        } else {
            self.decisions.clone()
        }
    }
}

/// Environment variable names for the required secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// API key for the embedding/generation provider
    pub api_key_env: String,
    /// Token for the public tunneling relay
    pub tunnel_token_env: String,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GOOGLE_API_KEY".to_string(),
            tunnel_token_env: "NGROK_AUTHTOKEN".to_string(),
        }
    }
}

/// Secrets read from the environment at startup
#[derive(Clone)]
pub struct Secrets {
    /// Provider API key
    pub api_key: String,
    /// Tunnel relay token
    pub tunnel_token: String,
}

impl Secrets {
    /// Read both secrets; missing or blank values are a startup error
    pub fn from_env(config: &SecretsConfig) -> Result<Self> {
        Ok(Self {
            api_key: read_secret(&config.api_key_env)?,
            tunnel_token: read_secret(&config.tunnel_token_env)?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"<redacted>")
            .field("tunnel_token", &"<redacted>")
            .finish()
    }
}

fn read_secret(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::config(format!(
            "{} not found. Please set {} in your environment variables.",
            var, var
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 150);
        assert_eq!(config.retrieval.top_k, 4);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml_str(
            r#"
            [chunking]
            chunk_size = 500

            [embeddings]
            backend = "hashing"
            dimensions = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 150);
        assert_eq!(config.embeddings.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.embeddings.dimensions, 256);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let result = RagConfig::from_toml_str(
            r#"
            [chunking]
            chunk_size = 100
            chunk_overlap = 100
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = RagConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_llm_retry_and_timeout_bounds() {
        let mut config = RagConfig::default();
        config.llm.max_retries = MAX_LLM_RETRIES;
        assert!(config.validate().is_ok());

        config.llm.max_retries = 64;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let result = RagConfig::from_toml_str(
            r#"
            [llm]
            timeout_secs = 0
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_default_decisions() {
        let prompt = PromptConfig::default();
        assert_eq!(prompt.decision_options(), vec!["Approved", "Rejected"]);
    }

    #[test]
    fn test_secrets_from_env() {
        let config = SecretsConfig {
            api_key_env: "DOMAIN_RAG_TEST_API_KEY".to_string(),
            tunnel_token_env: "DOMAIN_RAG_TEST_TUNNEL_TOKEN".to_string(),
        };

        std::env::remove_var(&config.api_key_env);
        std::env::set_var(&config.tunnel_token_env, "relay-token");
        assert!(matches!(Secrets::from_env(&config), Err(Error::Config(_))));

        std::env::set_var(&config.api_key_env, "   ");
        assert!(Secrets::from_env(&config).is_err());

        std::env::set_var(&config.api_key_env, "key-123");
        let secrets = Secrets::from_env(&config).unwrap();
        assert_eq!(secrets.api_key, "key-123");
        assert_eq!(secrets.tunnel_token, "relay-token");
        assert!(!format!("{:?}", secrets).contains("key-123"));
    }
}
