use std::collections::HashSet;

use shortlist_core::tables::ScoringTables;
use shortlist_core::types::AssessmentRecord;

/// Extracts key terms: lowercase whitespace tokens that are long enough and
/// not stop words.
#[derive(Debug, Clone)]
pub struct KeyTerms {
    stop_words: HashSet<String>,
    min_len: usize,
}

impl KeyTerms {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            stop_words: tables.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            min_len: tables.min_term_len,
        }
    }

    pub fn extract(&self, text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter(|t| t.chars().count() >= self.min_len && !self.stop_words.contains(*t))
            .map(str::to_string)
            .collect()
    }

    /// Lexical overlap of `query` with the record's name and description,
    /// in `[0, 1]`. Name hits count double.
    pub fn name_overlap(&self, query: &str, record: &AssessmentRecord) -> f64 {
        self.overlap_with_terms(&self.extract(query), record)
    }

    pub fn overlap_with_terms(&self, query_terms: &HashSet<String>, record: &AssessmentRecord) -> f64 {
        if query_terms.is_empty() {
            return 0.0;
        }
        let name_hits = self.extract(&record.name).intersection(query_terms).count();
        let desc_hits = self.extract(&record.description).intersection(query_terms).count();
        let score = (2 * name_hits + desc_hits) as f64 / (2 * query_terms.len()) as f64;
        score.min(1.0)
    }
}
