//! Mealmatch - recipe recommendation backend
//!
//! Proxies and enriches an external recipe-search API behind a two-tier
//! cache: a process-wide memory cache for raw provider responses and a
//! file-backed cache for fully enriched recommendation lists.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod recommend;

pub use api::AppState;
pub use config::Config;
