//! Request DTOs for the recommendation API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Request body for POST /recipes/suggest
///
/// # Fields
/// - `ingredients`: names of the ingredients on hand
/// - `number`: optional requested result count (clamped server-side)
/// - `prefetch`: optional number of top candidates to fully enrich (default 5)
///
/// The integer fields tolerate numeric strings and silently drop anything
/// else, so a malformed `number` degrades to the default instead of a 422.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestRequest {
    /// Ingredient names, case-insensitive
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Requested result count
    #[serde(default, deserialize_with = "lenient_int")]
    pub number: Option<i64>,
    /// Number of candidates to fetch full details for
    #[serde(default, deserialize_with = "lenient_int")]
    pub prefetch: Option<i64>,
}

/// Accepts an integer, a numeric string, or anything else as absent.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}
