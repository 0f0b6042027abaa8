//! Router and request handlers

use crate::config::ServerConfig;
use crate::error::ApiError;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use insight_core::{AnalysisOrchestrator, AnalyzeRequest, AnalyzeResult, PipelineStage, API_KEY_HEADER};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub orchestrator: Arc<AnalysisOrchestrator>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, orchestrator: AnalysisOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub api_key_required: bool,
}

/// Build the gateway router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = state.config.cors.layer();

    Router::new()
        .route("/health", get(health))
        .route("/auth-status", get(auth_status))
        .route("/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn auth_status(State(state): State<AppState>) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        api_key_required: state.config.auth.is_required(),
    })
}

async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("gateway.analyze", request_id = %request_id);

    async move {
        tracing::debug!(stage = %PipelineStage::Received, "pipeline stage");

        let supplied = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if let Err(error) = state.config.auth.authorize(supplied) {
            tracing::warn!("rejected request without a valid API key");
            return Err(ApiError(error));
        }
        tracing::debug!(stage = %PipelineStage::Authenticated, "pipeline stage");

        tracing::info!(update_memory = request.update_memory, "analysis accepted");
        let result = state.orchestrator.analyze(request).await?;

        tracing::debug!(stage = %PipelineStage::Responded, "pipeline stage");
        Ok(Json(result))
    }
    .instrument(span)
    .await
}
