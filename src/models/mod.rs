//! Request and domain models for the recommendation backend
//!
//! This module defines the DTOs used for deserializing HTTP request bodies
//! and the recipe shapes flowing between the provider client, the pipeline,
//! and the caller.

pub mod recipes;
pub mod requests;

// Re-export commonly used types
pub use recipes::{
    CandidateRecipe, EnrichedRecipe, RecipeIngredient, RecipeInformation, RecipeStep,
    SearchIngredient,
};
pub use requests::SuggestRequest;
