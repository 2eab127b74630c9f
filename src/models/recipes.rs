//! Recipe shapes exchanged with the provider and returned to callers
//!
//! The provider's payloads are loosely structured, so every inbound field is
//! optional or defaulted; normalization into [`EnrichedRecipe`] happens in
//! the recommendation pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Search Stage ==

/// A recipe candidate returned by the ingredient-search endpoint.
///
/// Ephemeral: candidates exist only between the search and enrichment stages
/// and are never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateRecipe {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub used_ingredient_count: i64,
    pub missed_ingredient_count: i64,
    pub used_ingredients: Vec<SearchIngredient>,
    pub missed_ingredients: Vec<SearchIngredient>,
}

impl CandidateRecipe {
    /// Ranking score: matched-ingredient count first, match ratio as the
    /// tie-break. The ratio denominator is floored at 1 to avoid dividing
    /// by zero on degenerate candidates.
    pub fn score(&self) -> (i64, f64) {
        let used = self.used_ingredient_count;
        let total = (used + self.missed_ingredient_count).max(1);
        (used, used as f64 / total as f64)
    }
}

/// An ingredient reference as it appears in search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIngredient {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

// == Detail Stage ==

/// Full recipe detail payload from the information endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeInformation {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<i64>,
    pub servings: Option<i64>,
    pub summary: Option<String>,
    pub dish_types: Vec<String>,
    pub extended_ingredients: Vec<ExtendedIngredient>,
    pub analyzed_instructions: Vec<InstructionBlock>,
    pub nutrition: Option<Value>,
    pub source_url: Option<String>,
    pub spoonacular_source_url: Option<String>,
}

/// An ingredient from the detail payload's extended-ingredient list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendedIngredient {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
}

/// One block of analyzed instructions; only the steps are used.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstructionBlock {
    pub steps: Vec<RecipeStep>,
}

/// A single numbered preparation step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeStep {
    pub number: i64,
    pub step: String,
}

// == Output ==

/// An ingredient in the final response, flagged with availability against
/// the requested ingredient set.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeIngredient {
    pub id: Option<i64>,
    pub name: String,
    pub original: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub available: bool,
}

/// The unit returned to the caller: a candidate merged with detail-stage
/// fields, or a lightweight record synthesized from search data alone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecipe {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: i64,
    pub servings: i64,
    pub summary: String,
    pub dish_types: Vec<String>,
    pub used_ingredient_count: i64,
    pub missed_ingredient_count: i64,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<RecipeStep>,
    pub nutrition: Option<Value>,
    pub source_url: Option<String>,
    /// Set when full details were not fetched for this candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lightweight: Option<bool>,
    /// Detail-stage error payload when enrichment failed for this candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}
