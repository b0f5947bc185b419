//! API routes for the RAG server

pub mod predict;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::ServiceInfo;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict::predict))
        // Domain-implicit variant kept for older clients
        .route("/evaluate", post(predict::evaluate))
        .route("/info", get(info))
}

/// GET /info - service and index summary
async fn info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let index = state.index();

    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        domain: state.domain().name().to_string(),
        documents: index.document_count(),
        segments: index.len(),
        embedding_model: state.retriever().embedder().model().to_string(),
        generation_model: state.synthesizer().llm().model().to_string(),
        endpoints: vec![
            "POST /predict".to_string(),
            "POST /evaluate".to_string(),
            "GET /info".to_string(),
            "GET /health".to_string(),
            "GET /ready".to_string(),
        ],
    })
}
