//! Prompt templates for structured answers

use crate::retrieval::SearchResult;

/// Prompt builder for decision queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the clause context from search results
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n{}\n\n",
                i + 1,
                result.segment.source.filename,
                result.segment.text.trim()
            ));
        }

        context.trim_end().to_string()
    }

    /// Default evaluator role for a domain
    pub fn default_role(domain: &str) -> String {
        format!("an expert {} evaluator", domain.replace(['_', '-'], " "))
    }

    /// Build the full prompt asking for a JSON verdict
    pub fn build_answer_prompt(
        query: &str,
        context: &str,
        role: &str,
        decisions: &[String],
    ) -> String {
        let choices = decisions
            .iter()
            .map(|d| format!("\"{}\"", d))
            .collect::<Vec<_>>()
            .join(" or ");

        format!(
            r#"You are {role}. Your task is to analyze a user's query against a set of relevant document clauses and reach a decision.

Here are the relevant clauses:
---
{context}
---

Here is the user's query:
---
{query}
---

Based *only* on the provided clauses and the user's query, perform the following steps:
1. Evaluate the query against the clauses.
2. Determine a final decision: {choices}.
3. State the amount, coverage percentage or value if the clauses specify one. If none is specified, use "Not Applicable".
4. Provide a clear justification for your decision by referencing the specific clause(s) used.

Return your final answer as a single, clean JSON object with no other text before or after it. The JSON object must have these exact keys: "decision", "amount", "justification".

Final JSON Response:"#,
            role = role,
            context = context,
            query = query,
            choices = choices,
        )
    }
}
