//! Recommendation pipeline
//!
//! Combines the two-stage provider call pattern (cheap search, selective
//! detail enrichment) with the two cache tiers and a deterministic ranking
//! function. The final list preserves rank order; per-candidate enrichment
//! failures degrade to lightweight records instead of aborting the request.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::FileCache;
use crate::error::{ApiError, Result};
use crate::models::{
    CandidateRecipe, EnrichedRecipe, RecipeIngredient, RecipeInformation, RecipeStep,
    SearchIngredient, SuggestRequest,
};
use crate::provider::ProviderClient;

/// Result count used when the caller supplies none.
pub const DEFAULT_RESULT_COUNT: i64 = 5;

/// Number of top-ranked candidates enriched with full details by default.
pub const DEFAULT_PREFETCH: i64 = 5;

const DEFAULT_READY_IN_MINUTES: i64 = 30;
const DEFAULT_SERVINGS: i64 = 1;
const PLACEHOLDER_SUMMARY: &str = "No detailed description available.";
const SEARCH_ONLY_SUMMARY: &str =
    "No detailed description available. This recipe was returned from a search result.";
const PLACEHOLDER_STEP: &str = "Follow the source recipe steps.";

// == Recommendation Pipeline ==
/// Composition of the provider client and the file cache tier.
///
/// The memory cache tier lives inside the provider client; this type only
/// sees it indirectly through short-circuited provider calls.
pub struct RecommendationPipeline {
    provider: Arc<ProviderClient>,
    file_cache: FileCache,
}

impl RecommendationPipeline {
    /// Creates a new pipeline over the given provider and file cache.
    pub fn new(provider: Arc<ProviderClient>, file_cache: FileCache) -> Self {
        Self {
            provider,
            file_cache,
        }
    }

    /// Produces the enriched recommendation list for a suggest request.
    ///
    /// Search-stage errors abort the pipeline and are forwarded verbatim;
    /// detail-stage errors only degrade the affected candidate. The returned
    /// value is the JSON payload served to the caller, either replayed from
    /// the file cache or freshly computed and written back to it.
    pub async fn suggest(&self, request: &SuggestRequest) -> Result<Value> {
        if request.ingredients.is_empty() {
            return Err(ApiError::MissingInput("No ingredients provided".to_string()));
        }

        let mut normalized: Vec<String> =
            request.ingredients.iter().map(|i| i.to_lowercase()).collect();
        normalized.sort();

        let prefetch = request.prefetch.unwrap_or(DEFAULT_PREFETCH);
        let fingerprint = FileCache::fingerprint(&normalized, request.number, prefetch);
        if let Some(cached) = self.file_cache.read(&fingerprint) {
            return Ok(cached);
        }

        let count = request.number.unwrap_or(DEFAULT_RESULT_COUNT);
        let mut candidates = self
            .provider
            .search_by_ingredients(&request.ingredients, count)
            .await?;
        rank_candidates(&mut candidates);
        debug!(candidates = candidates.len(), prefetch, "ranked search candidates");

        let requested: HashSet<String> = normalized.into_iter().collect();
        let mut enriched: Vec<EnrichedRecipe> = Vec::with_capacity(candidates.len());
        for (rank, candidate) in candidates.iter().enumerate() {
            // Candidates without a usable identifier are dropped outright
            let Some(id) = candidate.id.filter(|&v| v != 0) else {
                continue;
            };

            if (rank as i64) < prefetch {
                match self.provider.fetch_information(id, true).await {
                    Ok(detail) => enriched.push(merge_detail(candidate, detail, &requested)),
                    Err(err) => {
                        info!(id, %err, "detail fetch failed; degrading to search-stage record");
                        enriched.push(search_only_record(candidate, Some(err.to_payload())));
                    }
                }
            } else {
                enriched.push(search_only_record(candidate, None));
            }
        }

        let payload = serde_json::to_value(&enriched)
            .map_err(|e| ApiError::Internal(format!("cannot serialize recommendations: {e}")))?;
        self.file_cache.write(&fingerprint, &payload);
        Ok(payload)
    }
}

// == Ranking ==
/// Sorts candidates descending by `(usedIngredientCount, match ratio)`.
///
/// The primary key is the raw count of matched ingredients; the ratio of
/// matched to total ingredients breaks ties. No ordering is guaranteed
/// between candidates with identical score tuples.
pub fn rank_candidates(candidates: &mut [CandidateRecipe]) {
    candidates.sort_by(|a, b| {
        let (a_used, a_ratio) = a.score();
        let (b_used, b_ratio) = b.score();
        b_used
            .cmp(&a_used)
            .then_with(|| b_ratio.partial_cmp(&a_ratio).unwrap_or(Ordering::Equal))
    });
}

// == Merging ==

/// Merges a detail payload over its search candidate, falling back to
/// search-stage values and finally to fixed defaults for anything the
/// provider left absent, zero, or empty.
fn merge_detail(candidate: &CandidateRecipe, detail: Value, requested: &HashSet<String>) -> EnrichedRecipe {
    // The detail payload is best-effort; a shape we cannot read at all is
    // treated the same as an empty one.
    let info: RecipeInformation = serde_json::from_value(detail).unwrap_or_default();

    let ingredients: Vec<RecipeIngredient> = info
        .extended_ingredients
        .iter()
        .map(|el| {
            let name = non_empty(el.name.as_deref())
                .or_else(|| non_empty(el.original_name.as_deref()))
                .unwrap_or_default();
            let available = requested.contains(&name.to_lowercase());
            RecipeIngredient {
                id: el.id,
                name,
                original: el.original.clone(),
                amount: el.amount,
                unit: el.unit.clone(),
                available,
            }
        })
        .collect();

    let mut steps: Vec<RecipeStep> = info
        .analyzed_instructions
        .first()
        .map(|block| block.steps.clone())
        .unwrap_or_default();
    if steps.is_empty() {
        steps = placeholder_steps();
    }

    EnrichedRecipe {
        id: info.id.or(candidate.id),
        name: info.title.clone().or_else(|| candidate.title.clone()),
        image: info.image.clone().or_else(|| candidate.image.clone()),
        ready_in_minutes: info
            .ready_in_minutes
            .filter(|&v| v != 0)
            .unwrap_or(DEFAULT_READY_IN_MINUTES),
        servings: info.servings.filter(|&v| v != 0).unwrap_or(DEFAULT_SERVINGS),
        summary: non_empty(info.summary.as_deref())
            .unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string()),
        dish_types: info.dish_types.clone(),
        used_ingredient_count: candidate.used_ingredient_count,
        missed_ingredient_count: candidate.missed_ingredient_count,
        ingredients,
        steps,
        nutrition: info.nutrition.clone().filter(|v| !v.is_null()),
        source_url: non_empty(info.source_url.as_deref())
            .or_else(|| non_empty(info.spoonacular_source_url.as_deref())),
        lightweight: None,
        error: None,
    }
}

/// Builds a lightweight record straight from search-stage data: used
/// ingredients are flagged available, missed ones unavailable, and all
/// detail fields take their fixed defaults. `error` carries the detail-stage
/// failure payload when enrichment was attempted and failed.
fn search_only_record(candidate: &CandidateRecipe, error: Option<Value>) -> EnrichedRecipe {
    let mut ingredients =
        Vec::with_capacity(candidate.used_ingredients.len() + candidate.missed_ingredients.len());
    ingredients.extend(candidate.used_ingredients.iter().map(|el| search_ingredient(el, true)));
    ingredients.extend(candidate.missed_ingredients.iter().map(|el| search_ingredient(el, false)));

    EnrichedRecipe {
        id: candidate.id,
        name: candidate.title.clone(),
        image: candidate.image.clone(),
        ready_in_minutes: DEFAULT_READY_IN_MINUTES,
        servings: DEFAULT_SERVINGS,
        summary: SEARCH_ONLY_SUMMARY.to_string(),
        dish_types: Vec::new(),
        used_ingredient_count: candidate.used_ingredient_count,
        missed_ingredient_count: candidate.missed_ingredient_count,
        ingredients,
        steps: placeholder_steps(),
        nutrition: None,
        source_url: None,
        lightweight: Some(true),
        error,
    }
}

fn search_ingredient(el: &SearchIngredient, available: bool) -> RecipeIngredient {
    let name = non_empty(el.name.as_deref())
        .or_else(|| non_empty(el.original.as_deref()))
        .unwrap_or_default();
    RecipeIngredient {
        id: el.id,
        name,
        original: el.original.clone(),
        amount: el.amount,
        unit: el.unit.clone(),
        available,
    }
}

fn placeholder_steps() -> Vec<RecipeStep> {
    vec![RecipeStep {
        number: 1,
        step: PLACEHOLDER_STEP.to_string(),
    }]
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(id: i64, used: i64, missed: i64) -> CandidateRecipe {
        CandidateRecipe {
            id: Some(id),
            title: Some(format!("recipe-{id}")),
            used_ingredient_count: used,
            missed_ingredient_count: missed,
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_orders_by_used_count_desc() {
        let mut candidates = vec![candidate(1, 1, 0), candidate(2, 5, 2), candidate(3, 3, 0)];
        rank_candidates(&mut candidates);

        let order: Vec<i64> = candidates.iter().filter_map(|c| c.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_breaks_ties_by_match_ratio() {
        // Same used count; fewer missed ingredients wins
        let mut candidates = vec![candidate(1, 3, 5), candidate(2, 3, 1)];
        rank_candidates(&mut candidates);

        assert_eq!(candidates[0].id, Some(2));
        assert_eq!(candidates[1].id, Some(1));
    }

    #[test]
    fn test_merge_prefers_detail_fields() {
        let c = candidate(10, 2, 1);
        let detail = json!({
            "id": 10,
            "title": "Detailed Title",
            "readyInMinutes": 45,
            "servings": 4,
            "summary": "Rich summary.",
            "sourceUrl": "https://example.com/10",
            "extendedIngredients": [],
            "analyzedInstructions": [{"steps": [{"number": 1, "step": "Chop."}]}]
        });
        let merged = merge_detail(&c, detail, &HashSet::new());

        assert_eq!(merged.name.as_deref(), Some("Detailed Title"));
        assert_eq!(merged.ready_in_minutes, 45);
        assert_eq!(merged.servings, 4);
        assert_eq!(merged.summary, "Rich summary.");
        assert_eq!(merged.source_url.as_deref(), Some("https://example.com/10"));
        assert_eq!(merged.steps[0].step, "Chop.");
        assert!(merged.lightweight.is_none());
    }

    #[test]
    fn test_merge_falls_back_to_defaults_on_empty_detail() {
        let c = candidate(10, 2, 1);
        let merged = merge_detail(&c, json!({}), &HashSet::new());

        assert_eq!(merged.id, Some(10));
        assert_eq!(merged.name.as_deref(), Some("recipe-10"));
        assert_eq!(merged.ready_in_minutes, 30);
        assert_eq!(merged.servings, 1);
        assert_eq!(merged.summary, "No detailed description available.");
        assert_eq!(merged.steps.len(), 1);
        assert_eq!(merged.steps[0].step, "Follow the source recipe steps.");
    }

    #[test]
    fn test_merge_treats_zero_timing_as_absent() {
        let c = candidate(10, 1, 0);
        let detail = json!({"readyInMinutes": 0, "servings": 0, "summary": ""});
        let merged = merge_detail(&c, detail, &HashSet::new());

        assert_eq!(merged.ready_in_minutes, 30);
        assert_eq!(merged.servings, 1);
        assert_eq!(merged.summary, "No detailed description available.");
    }

    #[test]
    fn test_merge_tolerates_unreadable_detail_shape() {
        let c = candidate(10, 1, 0);
        let merged = merge_detail(&c, json!(["not", "an", "object"]), &HashSet::new());
        assert_eq!(merged.id, Some(10));
        assert_eq!(merged.ready_in_minutes, 30);
    }

    #[test]
    fn test_merge_computes_availability_from_requested_set() {
        let c = candidate(10, 1, 1);
        let detail = json!({
            "extendedIngredients": [
                {"name": "Chicken"},
                {"name": "saffron"},
                {"originalName": "rice"}
            ]
        });
        let requested: HashSet<String> =
            ["chicken".to_string(), "rice".to_string()].into_iter().collect();
        let merged = merge_detail(&c, detail, &requested);

        assert!(merged.ingredients[0].available, "case-insensitive match");
        assert!(!merged.ingredients[1].available);
        assert!(merged.ingredients[2].available, "originalName fallback");
    }

    #[test]
    fn test_search_only_record_flags_availability() {
        let c = CandidateRecipe {
            id: Some(5),
            title: Some("Omelette".to_string()),
            used_ingredient_count: 1,
            missed_ingredient_count: 1,
            used_ingredients: vec![SearchIngredient {
                name: Some("egg".to_string()),
                ..Default::default()
            }],
            missed_ingredients: vec![SearchIngredient {
                name: Some("chives".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let record = search_only_record(&c, None);

        assert_eq!(record.lightweight, Some(true));
        assert_eq!(record.ingredients.len(), 2);
        assert!(record.ingredients[0].available);
        assert!(!record.ingredients[1].available);
        assert_eq!(record.ready_in_minutes, 30);
        assert!(record.error.is_none());
    }

    #[test]
    fn test_search_only_record_carries_error_payload() {
        let c = candidate(5, 1, 0);
        let record = search_only_record(&c, Some(json!({"error": "boom", "status": 500})));
        assert_eq!(record.error, Some(json!({"error": "boom", "status": 500})));
        assert_eq!(record.lightweight, Some(true));
    }
}
