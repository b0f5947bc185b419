//! Response types

use serde::{Deserialize, Serialize};

/// Placeholder amount when the clauses state no value
pub const NOT_APPLICABLE: &str = "Not Applicable";

/// Structured answer returned by `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    /// Verdict, e.g. "Approved" or "Rejected"
    pub decision: String,
    /// Applicable amount or value, or "Not Applicable"
    pub amount: String,
    /// Explanation grounded in the retrieved segments
    pub justification: String,
}

impl Answer {
    /// Create an answer
    pub fn new(
        decision: impl Into<String>,
        amount: impl Into<String>,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            decision: decision.into(),
            amount: amount.into(),
            justification: justification.into(),
        }
    }
}

/// Body of `GET /info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub domain: String,
    pub documents: usize,
    pub segments: usize,
    pub embedding_model: String,
    pub generation_model: String,
    pub endpoints: Vec<String>,
}
