//! Recipe provider client
//!
//! Issues bounded, parameterized requests to the external recipe service and
//! normalizes transport and non-success failures into [`ApiError`] values.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{information_fingerprint, search_fingerprint, MemoryCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::CandidateRecipe;

/// Fixed timeout for every outbound provider request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// == Provider Client ==
/// Client for the external recipe search and information endpoints.
///
/// Owns the shared memory cache: both operations consult it before touching
/// the network and overwrite it on every successful response.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_results: i64,
    cache: MemoryCache,
}

impl ProviderClient {
    /// Creates a new ProviderClient from configuration.
    pub fn new(config: &Config, cache: MemoryCache) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Internal(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            api_key: config.provider_api_key.clone(),
            max_results: i64::from(config.max_results),
            cache,
        })
    }

    /// Searches recipes by ingredient list.
    ///
    /// `count` is clamped to `[1, max_results]`. An empty ingredient list is
    /// rejected before any network activity.
    pub async fn search_by_ingredients(
        &self,
        ingredients: &[String],
        count: i64,
    ) -> Result<Vec<CandidateRecipe>> {
        if ingredients.is_empty() {
            return Err(ApiError::MissingInput("No ingredients provided".to_string()));
        }

        let count = count.clamp(1, self.max_results);
        let fingerprint = search_fingerprint(ingredients, count as u32);
        if let Some(cached) = self.cache.get(&fingerprint).await {
            if let Ok(candidates) = serde_json::from_value(cached) {
                return Ok(candidates);
            }
            // Cached shape no longer parses; fall through and refetch
        }

        let url = format!("{}/recipes/findByIngredients", self.base_url);
        let payload = self
            .request(
                &url,
                &[
                    ("ingredients", ingredients.join(",")),
                    ("number", count.to_string()),
                    ("apiKey", self.api_key.clone()),
                ],
                "Failed to fetch recipes",
            )
            .await?;

        let candidates: Vec<CandidateRecipe> = serde_json::from_value(payload.clone())
            .map_err(|e| ApiError::GatewayFailure(format!("invalid search payload: {e}")))?;

        self.cache.put(&fingerprint, payload).await;
        Ok(candidates)
    }

    /// Fetches full recipe information by id.
    ///
    /// Returns the raw provider payload so proxy callers can forward it
    /// untouched; the pipeline deserializes it leniently on its side.
    pub async fn fetch_information(&self, id: i64, include_nutrition: bool) -> Result<Value> {
        if id <= 0 {
            return Err(ApiError::MissingInput("No recipe id provided".to_string()));
        }

        let fingerprint = information_fingerprint(id, include_nutrition);
        if let Some(cached) = self.cache.get(&fingerprint).await {
            return Ok(cached);
        }

        let url = format!("{}/recipes/{}/information", self.base_url, id);
        let payload = self
            .request(
                &url,
                &[
                    ("includeNutrition", include_nutrition.to_string()),
                    ("apiKey", self.api_key.clone()),
                ],
                "Failed to fetch recipe information",
            )
            .await?;

        self.cache.put(&fingerprint, payload.clone()).await;
        Ok(payload)
    }

    /// Performs one GET request and maps failures into the error taxonomy:
    /// transport errors become `GatewayFailure` (502), non-2xx statuses are
    /// forwarded verbatim as `UpstreamFailure`.
    async fn request(&self, url: &str, query: &[(&str, String)], failure_message: &str) -> Result<Value> {
        debug!(url, "provider request");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::GatewayFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UpstreamFailure {
                status: status.as_u16(),
                message: failure_message.to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::GatewayFailure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SystemClock;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ProviderClient {
        let config = Config {
            provider_api_key: "test-key".to_string(),
            provider_base_url: base_url.to_string(),
            ..Config::default()
        };
        let cache = MemoryCache::new(3600, Arc::new(SystemClock));
        ProviderClient::new(&config, cache).unwrap()
    }

    fn ings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_search_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/findByIngredients"))
            .and(query_param("ingredients", "chicken,rice"))
            .and(query_param("number", "5"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Fried Rice", "usedIngredientCount": 2, "missedIngredientCount": 0}
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let candidates = client
            .search_by_ingredients(&ings(&["chicken", "rice"]), 5)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, Some(1));
    }

    #[tokio::test]
    async fn test_search_empty_ingredients_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.search_by_ingredients(&[], 5).await;

        assert!(matches!(result, Err(ApiError::MissingInput(_))));
    }

    #[tokio::test]
    async fn test_search_count_clamped_high_and_low() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/findByIngredients"))
            .and(query_param("number", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/recipes/findByIngredients"))
            .and(query_param("number", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.search_by_ingredients(&ings(&["egg"]), 1000).await.unwrap();
        client.search_by_ingredients(&ings(&["egg"]), -5).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_upstream_failure_forwards_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.search_by_ingredients(&ings(&["egg"]), 5).await;

        match result {
            Err(ApiError::UpstreamFailure { status, .. }) => assert_eq!(status, 403),
            other => panic!("expected UpstreamFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_transport_failure_is_gateway_error() {
        // Nothing listens on this port
        let client = test_client("http://127.0.0.1:1");
        let result = client.search_by_ingredients(&ings(&["egg"]), 5).await;

        assert!(matches!(result, Err(ApiError::GatewayFailure(_))));
    }

    #[tokio::test]
    async fn test_search_second_identical_call_hits_memory_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/findByIngredients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "usedIngredientCount": 1, "missedIngredientCount": 0}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        // Permuted, differently-cased ingredients share one fingerprint
        let first = client.search_by_ingredients(&ings(&["Rice", "chicken"]), 5).await.unwrap();
        let second = client.search_by_ingredients(&ings(&["chicken", "rice"]), 5).await.unwrap();

        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_information_success_and_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/recipes/42/information"))
            .and(query_param("includeNutrition", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "title": "Stew"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let first = client.fetch_information(42, true).await.unwrap();
        let second = client.fetch_information(42, true).await.unwrap();

        assert_eq!(first["title"], "Stew");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_information_rejects_non_positive_id() {
        let client = test_client("http://127.0.0.1:1");
        assert!(matches!(
            client.fetch_information(0, true).await,
            Err(ApiError::MissingInput(_))
        ));
    }

    #[tokio::test]
    async fn test_information_upstream_failure_forwards_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        match client.fetch_information(9999, true).await {
            Err(ApiError::UpstreamFailure { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Failed to fetch recipe information");
            }
            other => panic!("expected UpstreamFailure, got {other:?}"),
        }
    }
}
