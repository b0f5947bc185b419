//! Answer synthesis from retrieved segments

use std::sync::Arc;

use super::answer::parse_answer;
use super::prompt::PromptBuilder;
use crate::config::PromptConfig;
use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::retrieval::SearchResult;
use crate::types::Answer;

/// Turns a query plus supporting segments into a structured answer
#[derive(Clone)]
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
    role: String,
    decisions: Vec<String>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer for a domain
    pub fn new(llm: Arc<dyn LlmProvider>, prompt: &PromptConfig, domain: &Domain) -> Self {
        let role = prompt
            .evaluator_role
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| PromptBuilder::default_role(domain.name()));

        Self {
            llm,
            role,
            decisions: prompt.decision_options(),
        }
    }

    /// The generation provider
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Build the prompt for a query and its supporting segments
    pub fn prompt(&self, query: &str, results: &[SearchResult]) -> String {
        let context = PromptBuilder::build_context(results);
        PromptBuilder::build_answer_prompt(query, &context, &self.role, &self.decisions)
    }

    /// Ask the model for a verdict and parse it
    ///
    /// Unparseable output is not retried; the caller gets a format error
    /// carrying the raw text.
    pub async fn synthesize(&self, query: &str, results: &[SearchResult]) -> Result<Answer> {
        if results.is_empty() {
            return Err(Error::retrieval("No supporting segments retrieved"));
        }

        let prompt = self.prompt(query, results);
        let raw = self.llm.generate(&prompt).await?;

        let answer = parse_answer(&raw)?;
        tracing::debug!("Model decision: {} (amount: {})", answer.decision, answer.amount);

        Ok(answer)
    }
}
