use tracing::debug;

use shortlist_core::error::Result;
use shortlist_core::tables::ScoringTables;
use shortlist_core::types::{Candidate, Recommendation, ScoreBreakdown};

use crate::category::{alignment, QueryIntent, RecordTraits};
use crate::history::{HistoricalIndex, PreparedQuery};
use crate::lexical::KeyTerms;

/// Stage 2: scores Stage-1 candidates on four signals and keeps the best.
#[derive(Debug, Clone)]
pub struct Reranker {
    history: HistoricalIndex,
    tables: ScoringTables,
    terms: KeyTerms,
}

impl Reranker {
    pub fn new(history: HistoricalIndex, tables: ScoringTables) -> Result<Self> {
        tables.validate()?;
        let terms = KeyTerms::new(&tables);
        Ok(Self { history, tables, terms })
    }

    pub fn history(&self) -> &HistoricalIndex {
        &self.history
    }

    /// Weighted sum of the sub-scores. The historical score is normalised and
    /// capped at 1.0; category alignment enters unnormalised.
    pub fn combine(&self, scores: &ScoreBreakdown) -> f64 {
        let w = &self.tables.weights;
        let history_norm = (scores.historical / self.tables.history.normalizer).min(1.0);
        w.history * history_norm
            + w.name_overlap * scores.name_overlap
            + w.category * scores.category_alignment
            + w.embedding * scores.embedding_similarity
    }

    /// Scores every candidate and returns the best `top_k`, highest first.
    /// Equal scores keep their input order.
    pub fn rerank(&self, query: &str, candidates: &[Candidate<'_>], top_k: usize) -> Vec<Recommendation> {
        let prepared = PreparedQuery::new(query);
        let query_terms = self.terms.extract(query);
        let intent = QueryIntent::detect(query, &self.tables);

        let mut scored: Vec<Recommendation> = candidates
            .iter()
            .map(|cand| {
                let scores = ScoreBreakdown {
                    historical: self.history.score_prepared(&prepared, cand.id, &self.tables.history),
                    name_overlap: self.terms.overlap_with_terms(&query_terms, cand.record),
                    category_alignment: alignment(
                        intent,
                        RecordTraits::of(cand.record, &self.tables),
                        &self.tables.category,
                    ),
                    embedding_similarity: cand.embedding_similarity,
                };
                Recommendation {
                    id: cand.id.to_string(),
                    name: cand.record.name.clone(),
                    final_score: self.combine(&scores),
                    scores,
                }
            })
            .collect();

        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        scored.truncate(top_k);
        debug!(
            candidates = candidates.len(),
            returned = scored.len(),
            top_score = scored.first().map(|r| r.final_score),
            "rerank done"
        );
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlist_core::training::TrainingPair;
    use shortlist_core::types::{AssessmentRecord, JobLevel, TestType};

    fn record(id: &str, name: &str) -> AssessmentRecord {
        AssessmentRecord {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            test_types: vec![TestType::Competencies],
            job_levels: vec![JobLevel::AllLevels],
            duration: String::new(),
            remote_support: false,
            adaptive_support: false,
        }
    }

    fn candidates<'a>(records: &'a [AssessmentRecord], sims: &[f64]) -> Vec<Candidate<'a>> {
        records
            .iter()
            .zip(sims)
            .map(|(r, &s)| Candidate { id: r.id.as_str(), embedding_similarity: s, record: r })
            .collect()
    }

    #[test]
    fn combine_uses_production_weights() {
        let rr = Reranker::new(HistoricalIndex::empty(), ScoringTables::default()).unwrap();
        let s = ScoreBreakdown { historical: 8.5, name_overlap: 0.5, category_alignment: 2.0, embedding_similarity: 0.4 };
        let expected = 0.6 * 0.85 + 0.2 * 0.5 + 0.15 * 2.0 + 0.05 * 0.4;
        assert!((rr.combine(&s) - expected).abs() < 1e-12);
        let capped = ScoreBreakdown { historical: 10.5, ..ScoreBreakdown::default() };
        assert!((rr.combine(&capped) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn exact_training_match_outranks_closer_embeddings() {
        let history = HistoricalIndex::build(&[TrainingPair::new("java developer role", "https://x/b")]);
        let rr = Reranker::new(history, ScoringTables::default()).unwrap();
        let records = vec![record("https://x/a", "Alpha"), record("https://x/b", "Beta")];
        let out = rr.rerank("java developer role", &candidates(&records, &[0.99, -0.5]), 1);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "https://x/b");
        assert_eq!(out[0].scores.historical, 10.0);
    }

    #[test]
    fn ties_keep_candidate_order() {
        let rr = Reranker::new(HistoricalIndex::empty(), ScoringTables::default()).unwrap();
        let records = vec![record("https://x/3", "Gamma"), record("https://x/1", "Alpha"), record("https://x/2", "Beta")];
        let out = rr.rerank("unrelated words here", &candidates(&records, &[0.3, 0.3, 0.3]), 10);
        let ids: Vec<_> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["https://x/3", "https://x/1", "https://x/2"]);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let mut tables = ScoringTables::default();
        tables.history.normalizer = 0.0;
        assert!(Reranker::new(HistoricalIndex::empty(), tables).is_err());
    }
}
