//! Request types

use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::error::{Error, Result};

/// Body of `POST /predict`
///
/// Fields are optional at the serde level so that a missing field produces
/// a validation error with a useful message instead of a rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    /// The user's question
    #[serde(default)]
    pub query: Option<String>,
    /// Domain selector, must name the active domain
    #[serde(default)]
    pub domain: Option<String>,
}

impl PredictRequest {
    /// Create a request
    pub fn new(query: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            domain: Some(domain.into()),
        }
    }

    /// Check both fields against the active domain
    pub fn validate(self, active: &Domain) -> Result<ValidatedQuery> {
        let query = validate_query(self.query)?;

        let domain = self
            .domain
            .ok_or_else(|| Error::validation("Missing 'domain' in request body."))?;

        if !active.matches(&domain) {
            return Err(Error::validation(format!(
                "Unknown domain '{}'. This service answers questions for '{}'.",
                domain,
                active.name()
            )));
        }

        Ok(ValidatedQuery {
            query,
            domain: active.name().to_string(),
        })
    }
}

/// Body of `POST /evaluate`; the active domain is implied
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateRequest {
    /// The user's question
    #[serde(default)]
    pub query: Option<String>,
}

impl EvaluateRequest {
    /// Check the query and bind it to the active domain
    pub fn validate(self, active: &Domain) -> Result<ValidatedQuery> {
        Ok(ValidatedQuery {
            query: validate_query(self.query)?,
            domain: active.name().to_string(),
        })
    }
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    /// Trimmed, non-empty question
    pub query: String,
    /// Canonical name of the active domain
    pub domain: String,
}

fn validate_query(query: Option<String>) -> Result<String> {
    let query = query.ok_or_else(|| Error::validation("Missing 'query' in request body."))?;
    let query = query.trim();

    if query.is_empty() {
        return Err(Error::validation("'query' must not be empty."));
    }

    Ok(query.to_string())
}
