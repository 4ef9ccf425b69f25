//! Caller-facing request checks and response shape.

use serde::{Deserialize, Serialize};
use tracing::warn;

use shortlist_core::error::{Error, Result};
use shortlist_core::types::{yes_no, AssessmentRecord, Recommendation};
use shortlist_core::CatalogStore;

pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 10;
pub const DEFAULT_TOP_K: usize = 10;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Rejects a blank query or a `top_k` outside `[1, 10]`.
pub fn validate_request(query: &str, top_k: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(Error::InvalidRequest("Query cannot be empty".into()));
    }
    if !(MIN_TOP_K..=MAX_TOP_K).contains(&top_k) {
        return Err(Error::InvalidRequest(format!("top_k must be between {MIN_TOP_K} and {MAX_TOP_K}")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentView {
    pub url: String,
    pub name: String,
    pub adaptive_support: String,
    pub description: String,
    /// Minutes; 0 when the catalog has no number.
    pub duration: u32,
    pub remote_support: String,
    pub test_type: Vec<String>,
}

impl AssessmentView {
    pub fn from_record(record: &AssessmentRecord) -> Self {
        Self {
            url: record.id.clone(),
            name: record.name.clone(),
            adaptive_support: yes_no::label(record.adaptive_support).to_string(),
            description: record.description.clone(),
            duration: record.duration_minutes().unwrap_or(0),
            remote_support: yes_no::label(record.remote_support).to_string(),
            test_type: record.test_types.iter().map(|t| t.label().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub recommendations: Vec<AssessmentView>,
    pub count: usize,
}

impl RecommendationResponse {
    /// Renders ranked results; ids with no catalog record are skipped.
    pub fn build(query: &str, ranked: &[Recommendation], catalog: &CatalogStore) -> Self {
        let recommendations: Vec<AssessmentView> = ranked
            .iter()
            .filter_map(|r| match catalog.get(&r.id) {
                Some(record) => Some(AssessmentView::from_record(record)),
                None => {
                    warn!(id = %r.id, "recommended id missing from catalog");
                    None
                }
            })
            .collect();
        Self { query: query.to_string(), count: recommendations.len(), recommendations }
    }
}
