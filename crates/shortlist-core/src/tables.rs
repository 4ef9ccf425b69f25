//! Keyword sets, point values and weights used by the reranker.
//!
//! Kept as data so they can be tuned from configuration and tested apart
//! from the scoring code. `Default` reproduces the production values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    /// Dropped before lexical overlap is computed.
    pub stop_words: Vec<String>,
    /// Tokens shorter than this are not key terms.
    pub min_term_len: usize,
    pub technical_keywords: Vec<String>,
    pub behavioral_keywords: Vec<String>,
    pub business_keywords: Vec<String>,
    pub entry_keywords: Vec<String>,
    /// Case-sensitive fragments that mark a job-level label as entry level.
    pub entry_level_markers: Vec<String>,
    pub history: HistoryPoints,
    pub category: CategoryPoints,
    pub weights: SignalWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPoints {
    pub exact_match: f64,
    pub substring_match: f64,
    pub token_overlap_scale: f64,
    pub overlap_weight: f64,
    pub coverage_weight: f64,
    pub known_id_bonus: f64,
    /// Raw scores are divided by this and capped at 1.0 before weighting.
    pub normalizer: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryPoints {
    pub category_match: f64,
    pub entry_level_match: f64,
    pub entry_aptitude_match: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub history: f64,
    pub name_overlap: f64,
    pub category: f64,
    pub embedding: f64,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            stop_words: words(&[
                "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it", "its",
                "of", "on", "that", "the", "to", "was", "will", "with", "i", "am", "my", "can", "who", "also", "want",
                "need", "looking", "hire", "hiring", "test", "assessment",
            ]),
            min_term_len: 3,
            technical_keywords: words(&[
                "java", "python", "sql", "javascript", "developer", "programming", "technical", "code", "coding",
                "software", "engineer", "data",
            ]),
            behavioral_keywords: words(&[
                "collaborate", "communication", "leadership", "team", "interpersonal", "personality", "behavior",
                "cultural", "culture", "fit",
            ]),
            business_keywords: words(&["sales", "business", "customer", "client", "marketing"]),
            entry_keywords: words(&["graduate", "entry", "junior", "new hire", "fresh"]),
            entry_level_markers: words(&["Entry", "Graduate"]),
            history: HistoryPoints::default(),
            category: CategoryPoints::default(),
            weights: SignalWeights::default(),
        }
    }
}

impl Default for HistoryPoints {
    fn default() -> Self {
        Self {
            exact_match: 10.0,
            substring_match: 8.0,
            token_overlap_scale: 6.0,
            overlap_weight: 0.5,
            coverage_weight: 0.5,
            known_id_bonus: 0.5,
            normalizer: 10.0,
        }
    }
}

impl Default for CategoryPoints {
    fn default() -> Self {
        Self { category_match: 1.0, entry_level_match: 0.5, entry_aptitude_match: 0.5 }
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self { history: 0.60, name_overlap: 0.20, category: 0.15, embedding: 0.05 }
    }
}

impl ScoringTables {
    pub fn validate(&self) -> Result<()> {
        let w = &self.weights;
        for (name, value) in [
            ("weights.history", w.history),
            ("weights.name_overlap", w.name_overlap),
            ("weights.category", w.category),
            ("weights.embedding", w.embedding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be a finite non-negative number, got {value}")));
            }
        }
        if !(self.history.normalizer.is_finite() && self.history.normalizer > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "history.normalizer must be positive, got {}",
                self.history.normalizer
            )));
        }
        Ok(())
    }
}
