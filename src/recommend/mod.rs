//! Recommendation Module
//!
//! Orchestrates the suggest flow: file-cache probe → ingredient search →
//! ranking → selective detail enrichment → merge → cache write.

mod pipeline;


pub use pipeline::{rank_candidates, RecommendationPipeline, DEFAULT_PREFETCH, DEFAULT_RESULT_COUNT};
