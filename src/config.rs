//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The outbound request timeout is a fixed constant in the provider module and is
/// intentionally not configurable here.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the external recipe provider
    pub provider_api_key: String,
    /// Base URL of the external recipe provider
    pub provider_base_url: String,
    /// Upper bound on the number of search results requested upstream
    pub max_results: u32,
    /// Memory cache TTL in seconds for provider responses
    pub memory_cache_ttl: u64,
    /// Directory holding the file-backed recommendation cache
    pub file_cache_dir: String,
    /// File cache TTL in seconds, independent of the memory cache TTL
    pub file_cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Optional bearer token; when set, guarded routes require it
    pub auth_token: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SPOONACULAR_API_KEY` - Provider API key (default: empty)
    /// - `SPOONACULAR_URL_BASE` - Provider base URL (default: https://api.spoonacular.com)
    /// - `SPOONACULAR_MAX_RESULTS` - Max upstream search results (default: 50)
    /// - `RECIPE_CACHE_TTL` - Memory cache TTL in seconds (default: 86400)
    /// - `RECIPE_CACHE_DIR` - File cache directory (default: cache)
    /// - `RECIPE_FILE_CACHE_TTL` - File cache TTL in seconds (default: 86400)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_AUTH_TOKEN` - Bearer token for guarded routes (default: unset)
    pub fn from_env() -> Self {
        Self {
            provider_api_key: env::var("SPOONACULAR_API_KEY").unwrap_or_default(),
            provider_base_url: env::var("SPOONACULAR_URL_BASE")
                .unwrap_or_else(|_| "https://api.spoonacular.com".to_string()),
            max_results: env::var("SPOONACULAR_MAX_RESULTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            memory_cache_ttl: env::var("RECIPE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 60 * 24),
            file_cache_dir: env::var("RECIPE_CACHE_DIR").unwrap_or_else(|_| "cache".to_string()),
            file_cache_ttl: env::var("RECIPE_FILE_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 60 * 24),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            auth_token: env::var("API_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider_api_key: String::new(),
            provider_base_url: "https://api.spoonacular.com".to_string(),
            max_results: 50,
            memory_cache_ttl: 60 * 60 * 24,
            file_cache_dir: "cache".to_string(),
            file_cache_ttl: 60 * 60 * 24,
            server_port: 3000,
            auth_token: None,
        }
    }
}
