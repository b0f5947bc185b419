//! Gemini embedding provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::api::GeminiApi;
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Gemini embedding model (`embedContent` / `batchEmbedContents`)
pub struct GeminiEmbedder {
    api: GeminiApi,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl GeminiEmbedder {
    /// Create a new Gemini embedder
    pub fn new(api: GeminiApi, config: &EmbeddingConfig) -> Self {
        let model = if config.model.starts_with("models/") {
            config.model.clone()
        } else {
            format!("models/{}", config.model)
        };

        Self {
            api,
            model,
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        }
    }

    fn request(&self, text: &str, task_type: &'static str) -> EmbedRequest {
        EmbedRequest {
            model: self.model.clone(),
            content: EmbedContent {
                parts: vec![EmbedPart {
                    text: text.to_string(),
                }],
            },
            task_type,
        }
    }

    fn check_dimensions(&self, values: &[f32]) -> Result<()> {
        if values.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "Expected {} dimensions from {}, got {}",
                self.dimensions,
                self.model,
                values.len()
            )));
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<EmbedPart>,
}

#[derive(Serialize)]
struct EmbedPart {
    text: String,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.api.model_url(&self.model, "embedContent");
        let response: EmbedResponse = self
            .api
            .post_json(&url, &self.request(text, "RETRIEVAL_QUERY"))
            .await
            .map_err(Error::Embedding)?;

        self.check_dimensions(&response.embedding.values)?;
        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.api.model_url(&self.model, "batchEmbedContents");
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|t| self.request(t, "RETRIEVAL_DOCUMENT"))
                    .collect(),
            };

            let response: BatchEmbedResponse = self
                .api
                .post_json(&url, &request)
                .await
                .map_err(Error::Embedding)?;

            if response.embeddings.len() != batch.len() {
                return Err(Error::embedding(format!(
                    "Requested {} embeddings, received {}",
                    batch.len(),
                    response.embeddings.len()
                )));
            }

            for embedding in response.embeddings {
                self.check_dimensions(&embedding.values)?;
                all_embeddings.push(embedding.values);
            }

            tracing::debug!("Embedded {}/{} segments", all_embeddings.len(), texts.len());
        }

        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
