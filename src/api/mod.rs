//! API Module
//!
//! HTTP handlers and routing for the recommendation backend.
//!
//! # Endpoints
//! - `POST /recipes/suggest` - Enriched recipe recommendations for an ingredient list
//! - `GET /recipes/:id/information` - Proxy for full recipe detail (nutrition forced on)
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
