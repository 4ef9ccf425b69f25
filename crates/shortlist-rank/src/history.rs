//! Historical association index built from labelled training pairs.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use tracing::{info, warn};

use shortlist_core::tables::HistoryPoints;
use shortlist_core::training::{load_training_pairs, TrainingPair};
use shortlist_core::types::AssessmentId;

/// Lowercased, trimmed query text. Training queries are keyed by this form.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Read-only many-to-many map between normalised training queries and the
/// assessments they were labelled with.
#[derive(Debug, Clone, Default)]
pub struct HistoricalIndex {
    query_to_ids: HashMap<String, BTreeSet<AssessmentId>>,
    id_to_queries: HashMap<AssessmentId, BTreeSet<String>>,
    all_ids: HashSet<AssessmentId>,
}

/// Query prepared once per request and reused for every candidate.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    normalized: String,
    tokens: HashSet<String>,
}

impl PreparedQuery {
    pub fn new(query: &str) -> Self {
        let normalized = normalize_query(query);
        let tokens = normalized.split_whitespace().map(str::to_string).collect();
        Self { normalized, tokens }
    }
}

impl HistoricalIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn build(pairs: &[TrainingPair]) -> Self {
        let mut index = Self::default();
        for pair in pairs {
            let query = normalize_query(&pair.query);
            index.query_to_ids.entry(query.clone()).or_default().insert(pair.id.clone());
            index.id_to_queries.entry(pair.id.clone()).or_default().insert(query);
            index.all_ids.insert(pair.id.clone());
        }
        index
    }

    /// Builds from the training CSV at `path`. An unreadable or malformed
    /// file degrades to an empty index with a warning.
    pub fn load_or_empty(path: &Path) -> Self {
        match load_training_pairs(path) {
            Ok(pairs) => {
                let index = Self::build(&pairs);
                info!(queries = index.query_count(), ids = index.all_ids.len(), "historical index built");
                index
            }
            Err(e) => {
                warn!(error = %e, "continuing with empty historical index");
                Self::empty()
            }
        }
    }

    pub fn query_count(&self) -> usize {
        self.query_to_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.all_ids.contains(id)
    }

    pub fn ids_for_query(&self, query: &str) -> Option<&BTreeSet<AssessmentId>> {
        self.query_to_ids.get(&normalize_query(query))
    }

    pub fn queries_for_id(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.id_to_queries.get(id)
    }

    /// Historical-association score of `id` for `query`. Uncapped.
    pub fn training_score(&self, query: &str, id: &str, points: &HistoryPoints) -> f64 {
        self.score_prepared(&PreparedQuery::new(query), id, points)
    }

    pub fn score_prepared(&self, query: &PreparedQuery, id: &str, points: &HistoryPoints) -> f64 {
        if self.query_to_ids.get(&query.normalized).is_some_and(|ids| ids.contains(id)) {
            return points.exact_match;
        }

        let mut best = 0.0_f64;
        for training in self.id_to_queries.get(id).into_iter().flatten() {
            // An empty query is a substring of everything and lands here.
            if training.contains(query.normalized.as_str()) || query.normalized.contains(training.as_str()) {
                best = best.max(points.substring_match);
                continue;
            }
            let training_tokens: HashSet<&str> = training.split_whitespace().collect();
            if query.tokens.is_empty() || training_tokens.is_empty() {
                continue;
            }
            let shared = query.tokens.iter().filter(|t| training_tokens.contains(t.as_str())).count();
            let union = query.tokens.len() + training_tokens.len() - shared;
            let overlap = shared as f64 / union as f64;
            let coverage = shared as f64 / query.tokens.len() as f64;
            let contribution =
                (points.overlap_weight * overlap + points.coverage_weight * coverage) * points.token_overlap_scale;
            best = best.max(contribution);
        }

        if self.all_ids.contains(id) {
            best += points.known_id_bonus;
        }
        best
    }
}
