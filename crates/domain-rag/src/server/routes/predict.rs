//! Question answering endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{Answer, EvaluateRequest, PredictRequest, ValidatedQuery};

/// POST /predict - answer a query against the named domain
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<Answer>> {
    let Json(request) = payload.map_err(invalid_body)?;
    let query = request.validate(state.domain())?;
    answer(&state, query).await.map(Json)
}

/// POST /evaluate - answer a query against the active domain
pub async fn evaluate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<Answer>> {
    let Json(request) = payload.map_err(invalid_body)?;
    let query = request.validate(state.domain())?;
    answer(&state, query).await.map(Json)
}

fn invalid_body(rejection: JsonRejection) -> Error {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Error::PayloadTooLarge(rejection.body_text());
    }
    Error::validation(format!("Invalid request body: {}", rejection.body_text()))
}

/// Retrieve, prompt, parse
async fn answer(state: &AppState, query: ValidatedQuery) -> Result<Answer> {
    let start = Instant::now();
    tracing::info!("Query [{}]: \"{}\"", query.domain, query.query);

    let index = state.index_for(&query.domain)?;
    let results = state.retriever().retrieve(&query.query, &index).await?;
    let answer = state.synthesizer().synthesize(&query.query, &results).await?;

    tracing::info!(
        "Answered in {}ms: {} ({} segment(s))",
        start.elapsed().as_millis(),
        answer.decision,
        results.len()
    );

    Ok(answer)
}
