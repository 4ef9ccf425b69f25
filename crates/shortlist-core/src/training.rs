//! Labelled (query, assessment) pairs read from the training CSV.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::AssessmentId;

pub const QUERY_COLUMN: &str = "Query";
pub const ID_COLUMN: &str = "Assessment_url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPair {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Assessment_url")]
    pub id: AssessmentId,
}

impl TrainingPair {
    pub fn new(query: impl Into<String>, id: impl Into<AssessmentId>) -> Self {
        Self { query: query.into(), id: id.into() }
    }
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Query", default)]
    query: Option<String>,
    #[serde(rename = "Assessment_url", default)]
    id: Option<String>,
}

fn unavailable(path: &Path, what: impl std::fmt::Display) -> Error {
    Error::TrainingDataUnavailable(format!("{}: {what}", path.display()))
}

fn open(path: &Path, required: &[&str]) -> Result<csv::Reader<std::fs::File>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| unavailable(path, e))?;
    let headers = reader.headers().map_err(|e| unavailable(path, e))?.clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(unavailable(path, format!("missing column '{column}'")));
        }
    }
    Ok(reader)
}

/// Reads every row with both a query and an assessment URL. Rows missing
/// either value are skipped; a missing file or header is an error.
pub fn load_training_pairs(path: &Path) -> Result<Vec<TrainingPair>> {
    let mut reader = open(path, &[QUERY_COLUMN, ID_COLUMN])?;
    let mut pairs = Vec::new();
    for row in reader.deserialize::<Row>() {
        let row = row.map_err(|e| unavailable(path, e))?;
        match (row.query, row.id) {
            (Some(q), Some(id)) if !q.is_empty() && !id.is_empty() => pairs.push(TrainingPair { query: q, id }),
            _ => continue,
        }
    }
    info!(pairs = pairs.len(), path = %path.display(), "training pairs loaded");
    Ok(pairs)
}

/// Reads the `Query` column of an unlabelled query file.
pub fn load_queries(path: &Path) -> Result<Vec<String>> {
    let mut reader = open(path, &[QUERY_COLUMN])?;
    let mut queries = Vec::new();
    for row in reader.deserialize::<Row>() {
        if let Some(q) = row.map_err(|e| unavailable(path, e))?.query.filter(|q| !q.is_empty()) {
            queries.push(q);
        }
    }
    Ok(queries)
}

/// Groups pairs by their raw query text, ordered by query.
pub fn group_by_query(pairs: &[TrainingPair]) -> BTreeMap<String, Vec<AssessmentId>> {
    let mut grouped: BTreeMap<String, Vec<AssessmentId>> = BTreeMap::new();
    for pair in pairs {
        grouped.entry(pair.query.clone()).or_default().push(pair.id.clone());
    }
    grouped
}
