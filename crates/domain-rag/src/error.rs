//! Error types for the RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Longest slice of raw model output echoed back in a format error
const RAW_RESPONSE_LIMIT: usize = 500;

/// RAG service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Request is malformed, incomplete, or targets another domain
    #[error("Validation error: {0}")]
    Validation(String),

    /// The domain index cannot serve the query
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Embedding provider call failed
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Generative model call failed
    #[error("Generation error: {0}")]
    Generation(String),

    /// Model output did not match the expected answer structure
    #[error("Format error: {message}")]
    Format { message: String, raw: Option<String> },

    /// Request body exceeds the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// No route for the requested path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Route exists but not for this method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Startup ingestion could not produce a usable index
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a format error, keeping the raw model output for diagnostics
    pub fn format(message: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw: String = raw.into();
        let raw = if raw.chars().count() > RAW_RESPONSE_LIMIT {
            let mut truncated: String = raw.chars().take(RAW_RESPONSE_LIMIT).collect();
            truncated.push_str("...");
            truncated
        } else {
            raw
        };

        Self::Format {
            message: message.into(),
            raw: Some(raw),
        }
    }

    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an ingestion error
    pub fn ingestion(message: impl Into<String>) -> Self {
        Self::Ingestion(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable type for this error
    pub fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            Error::Retrieval(_) => (StatusCode::SERVICE_UNAVAILABLE, "retrieval_error"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            Error::Format { .. } => (StatusCode::BAD_GATEWAY, "format_error"),
            Error::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Error::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
            Error::Ingestion(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ingestion_error"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::FileParse { .. } => (StatusCode::BAD_REQUEST, "parse_error"),
            Error::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", error_type, self);
        } else {
            tracing::warn!("Request rejected ({}): {}", error_type, self);
        }

        let mut error = json!({
            "type": error_type,
            "message": self.to_string(),
        });

        if let Error::Format { raw: Some(raw), .. } = &self {
            error["raw_response"] = json!(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
