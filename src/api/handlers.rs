//! API Handlers
//!
//! HTTP request handlers for each endpoint, plus the shared application
//! state assembled at startup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::{verifier_from_config, TokenVerifier};
use crate::cache::{FileCache, MemoryCache, SystemClock};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::SuggestRequest;
use crate::provider::ProviderClient;
use crate::recommend::RecommendationPipeline;

/// Application state shared across all handlers.
///
/// This is the composition root: the clock, both cache tiers, the provider
/// client, the pipeline, and the credential verifier are all constructed
/// here and nowhere else.
#[derive(Clone)]
pub struct AppState {
    /// Provider client, used directly by the information proxy route
    pub provider: Arc<ProviderClient>,
    /// Recommendation pipeline behind the suggest route
    pub pipeline: Arc<RecommendationPipeline>,
    /// Credential verifier selected at startup
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Wires up the full object graph from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock = Arc::new(SystemClock);
        let memory_cache = MemoryCache::new(config.memory_cache_ttl, clock);
        let provider = Arc::new(ProviderClient::new(config, memory_cache)?);
        let file_cache = FileCache::new(config.file_cache_dir.as_str(), config.file_cache_ttl);
        let pipeline = Arc::new(RecommendationPipeline::new(provider.clone(), file_cache));
        let verifier = verifier_from_config(config);

        Ok(Self {
            provider,
            pipeline,
            verifier,
        })
    }
}

/// Handler for POST /recipes/suggest
///
/// Returns the enriched recommendation list, or forwards a search-stage
/// provider error with its original status.
pub async fn suggest_handler(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<Value>> {
    let payload = state.pipeline.suggest(&request).await?;
    Ok(Json(payload))
}

/// Handler for GET /recipes/:id/information
///
/// Accepts string ids to match front-end routing, but only numeric ids are
/// proxied upstream. Nutrition inclusion is forced on regardless of query
/// parameters.
pub async fn information_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let numeric_id: i64 = id.trim().parse().map_err(|_| {
        ApiError::MissingInput("Invalid recipe id for external lookup".to_string())
    })?;

    let payload = state.provider.fetch_information(numeric_id, true).await?;
    Ok(Json(payload))
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
