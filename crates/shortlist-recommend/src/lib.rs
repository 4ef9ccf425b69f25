//! Recommendation facade: an immutable context (catalog, vector index,
//! historical index, scoring tables) plus an embedder, answering
//! `recommend(query, top_k)` with Stage-1 retrieval followed by Stage-2
//! reranking.

pub mod context;
pub mod eval;
pub mod recommender;
pub mod request;

pub use context::RecommenderContext;
pub use recommender::{Health, Recommender};
pub use request::{validate_request, AssessmentView, RecommendationRequest, RecommendationResponse};
