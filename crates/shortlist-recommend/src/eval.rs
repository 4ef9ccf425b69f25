//! Offline evaluation against labelled queries and test-prediction export.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use shortlist_core::error::Result;
use shortlist_core::training::TrainingPair;
use shortlist_core::types::AssessmentId;

use crate::recommender::Recommender;

/// Trimmed, lowercased, without trailing slashes.
pub fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase().trim_end_matches('/').to_string()
}

/// Share of `relevant` found in the first `k` of `predicted`, after URL
/// normalisation. 0.0 when nothing is relevant.
pub fn recall_at_k<P: AsRef<str>, R: AsRef<str>>(predicted: &[P], relevant: &[R], k: usize) -> f64 {
    let relevant: HashSet<String> = relevant.iter().map(|u| normalize_url(u.as_ref())).collect();
    if relevant.is_empty() {
        return 0.0;
    }
    let predicted: HashSet<String> = predicted.iter().take(k).map(|u| normalize_url(u.as_ref())).collect();
    predicted.intersection(&relevant).count() as f64 / relevant.len() as f64
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryEvaluation {
    pub query: String,
    pub relevant: usize,
    pub hits: usize,
    pub recall: f64,
    pub predicted: Vec<AssessmentId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub generated_at: DateTime<Utc>,
    pub k: usize,
    pub queries: usize,
    pub mean_recall: f64,
    pub per_query: Vec<QueryEvaluation>,
}

impl EvaluationReport {
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("failed to write report {}", path.display()))
    }
}

/// Runs every labelled query through `recommender` with `top_k = k` and
/// scores Recall@k. `on_query` sees each result as it is produced.
pub fn evaluate(
    recommender: &Recommender,
    labelled: &BTreeMap<String, Vec<AssessmentId>>,
    k: usize,
    mut on_query: impl FnMut(&QueryEvaluation),
) -> Result<EvaluationReport> {
    let mut per_query = Vec::with_capacity(labelled.len());
    for (query, relevant) in labelled {
        let predicted: Vec<AssessmentId> = recommender.recommend(query, k)?.into_iter().map(|r| r.id).collect();
        let recall = recall_at_k(&predicted, relevant, k);
        let relevant_set: HashSet<String> = relevant.iter().map(|u| normalize_url(u)).collect();
        let hits = predicted.iter().take(k).filter(|u| relevant_set.contains(&normalize_url(u))).count();
        let outcome = QueryEvaluation { query: query.clone(), relevant: relevant_set.len(), hits, recall, predicted };
        on_query(&outcome);
        per_query.push(outcome);
    }
    let mean_recall = if per_query.is_empty() {
        0.0
    } else {
        per_query.iter().map(|q| q.recall).sum::<f64>() / per_query.len() as f64
    };
    info!(queries = per_query.len(), k, mean_recall, "evaluation finished");
    Ok(EvaluationReport { generated_at: Utc::now(), k, queries: per_query.len(), mean_recall, per_query })
}

/// One `(query, url)` row per recommendation, in ranked order.
pub fn predict(
    recommender: &Recommender,
    queries: &[String],
    top_k: usize,
    mut on_query: impl FnMut(&str, usize),
) -> Result<Vec<TrainingPair>> {
    let mut rows = Vec::new();
    for query in queries {
        let ranked = recommender.recommend(query, top_k)?;
        on_query(query, ranked.len());
        rows.extend(ranked.into_iter().map(|r| TrainingPair::new(query.clone(), r.id)));
    }
    Ok(rows)
}

/// Writes `Query,Assessment_url` rows.
pub fn write_predictions(path: &Path, rows: &[TrainingPair]) -> anyhow::Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(rows = rows.len(), path = %path.display(), "predictions written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_normalisation() {
        assert_eq!(normalize_url("  HTTPS://X/Java/ "), "https://x/java");
        assert_eq!(normalize_url("https://x/a//"), "https://x/a");
    }

    #[test]
    fn recall_counts_distinct_relevant_hits_within_k() {
        let predicted = ["https://x/a/", "https://x/b", "https://x/c"];
        let relevant = ["https://x/A", "https://x/c", "https://x/d", "https://x/e"];
        assert_eq!(recall_at_k(&predicted, &relevant, 3), 0.5);
        assert_eq!(recall_at_k(&predicted, &relevant, 1), 0.25);
        assert_eq!(recall_at_k(&predicted, &[] as &[&str], 3), 0.0);
    }
}
