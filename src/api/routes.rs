//! API Routes
//!
//! Configures the Axum router with all backend endpoints.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::authenticate;
use crate::error::Result;

use super::handlers::{health_handler, information_handler, suggest_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /recipes/suggest` - Enriched recommendations for an ingredient list
/// - `GET /recipes/:id/information` - Proxy for full recipe detail
/// - `GET /health` - Health check endpoint (never guarded)
///
/// # Middleware
/// - Credential check on the recipe routes (pass-through unless a token is configured)
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/recipes/suggest", post(suggest_handler))
        .route("/recipes/:id/information", get(information_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Middleware running the configured credential verifier before a guarded
/// route. Failures turn into 401 responses via the error taxonomy.
async fn require_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response> {
    authenticate(state.verifier.as_ref(), request.headers()).await?;
    Ok(next.run(request).await)
}
