//! Shared HTTP plumbing for the Gemini REST API

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Base delay before the first retry; doubles on each attempt
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Backoff stops growing after this many doublings
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Authenticated Gemini API endpoint with retry on transient failures
#[derive(Clone)]
pub struct GeminiApi {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

impl GeminiApi {
    /// Create an API handle from the LLM configuration and the provider key
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_retries: config.max_retries,
        })
    }

    /// URL of a model method, e.g. `models/gemini-1.5-flash:generateContent`
    pub fn model_url(&self, model: &str, method: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// Connection errors, 429 and 5xx responses are retried with exponential
    /// backoff; any other failure is returned as `Err(message)` for the caller
    /// to wrap in its own error kind.
    pub async fn post_json<B, R>(&self, url: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut attempt = 0;
        loop {
            let outcome = self
                .http
                .post(url)
                .header("x-goog-api-key", &self.api_key)
                .json(body)
                .send()
                .await;

            let retryable_failure = match outcome {
                Ok(response) if response.status().is_success() => {
                    return response
                        .json::<R>()
                        .await
                        .map_err(|e| format!("Failed to parse Gemini response: {}", e));
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let message = format!("Gemini request failed ({}): {}", status, body);
                    if !is_retryable(status) {
                        return Err(message);
                    }
                    message
                }
                Err(e) => {
                    let message = format!("Gemini request failed: {}", e);
                    if !(e.is_timeout() || e.is_connect() || e.is_request()) {
                        return Err(message);
                    }
                    message
                }
            };

            if attempt >= self.max_retries {
                return Err(retryable_failure);
            }

            let delay = backoff_delay(attempt);
            tracing::warn!(
                "{} - retrying in {:?} (attempt {}/{})",
                retryable_failure,
                delay,
                attempt + 1,
                self.max_retries
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.saturating_pow(attempt.min(MAX_BACKOFF_EXPONENT))
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_url() {
        let api = GeminiApi::new(&LlmConfig::default(), "key").unwrap();
        assert_eq!(
            api.model_url("models/embedding-001", "embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:embedContent"
        );
        assert_eq!(
            api.model_url("gemini-1.5-flash-latest", "generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent"
        );
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(0), Duration::from_millis(500));
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(6), Duration::from_secs(32));
        assert_eq!(backoff_delay(40), backoff_delay(6));
        assert_eq!(backoff_delay(u32::MAX), backoff_delay(6));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::FORBIDDEN));
    }
}
