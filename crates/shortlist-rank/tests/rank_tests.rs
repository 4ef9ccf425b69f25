use std::io::Write;

use proptest::prelude::*;
use tempfile::NamedTempFile;

use shortlist_core::tables::{HistoryPoints, ScoringTables};
use shortlist_core::training::TrainingPair;
use shortlist_core::types::{AssessmentRecord, Candidate, JobLevel, TestType};
use shortlist_rank::{category_alignment, HistoricalIndex, KeyTerms, Reranker};

const VOCAB: &[&str] = &[
    "java", "python", "sales", "team", "graduate", "entry", "leadership", "the", "a", "developer", "customer", "sql",
    "analyst", "hiring", "junior", "culture", "manager", "banking", "data", "test",
];

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCAB), 0..8).prop_map(|w| w.join(" "))
}

fn test_type_strategy() -> impl Strategy<Value = TestType> {
    prop::sample::select(TestType::KNOWN.to_vec())
}

fn record_strategy() -> impl Strategy<Value = AssessmentRecord> {
    (
        0u32..1000,
        query_strategy(),
        query_strategy(),
        prop::collection::vec(test_type_strategy(), 0..3),
        prop::sample::select(vec!["Entry Level", "Graduate", "Mid Level", "Executive"]),
    )
        .prop_map(|(n, name, description, test_types, level)| AssessmentRecord {
            id: format!("https://x/{n}"),
            name,
            description,
            test_types,
            job_levels: vec![JobLevel::parse(level)],
            duration: "15 minutes".into(),
            remote_support: true,
            adaptive_support: false,
        })
}

fn history() -> HistoricalIndex {
    HistoricalIndex::build(&[
        TrainingPair::new("java developer", "https://x/1"),
        TrainingPair::new("graduate sales analyst", "https://x/2"),
        TrainingPair::new("team leadership culture", "https://x/3"),
    ])
}

proptest! {
    #[test]
    fn rerank_is_bounded_and_sorted(
        query in query_strategy(),
        records in prop::collection::vec(record_strategy(), 0..30),
        sims in prop::collection::vec(-1.0f64..1.0, 30),
        top_k in 0usize..15,
    ) {
        let rr = Reranker::new(history(), ScoringTables::default()).unwrap();
        let cands: Vec<Candidate<'_>> = records
            .iter()
            .zip(&sims)
            .map(|(r, &s)| Candidate { id: r.id.as_str(), embedding_similarity: s, record: r })
            .collect();
        let out = rr.rerank(&query, &cands, top_k);
        prop_assert!(out.len() <= top_k);
        prop_assert!(out.len() <= cands.len());
        prop_assert_eq!(out.len(), top_k.min(cands.len()));
        for pair in out.windows(2) {
            prop_assert!(pair[0].final_score >= pair[1].final_score);
        }
    }

    #[test]
    fn name_overlap_stays_in_unit_range(query in query_strategy(), record in record_strategy()) {
        let terms = KeyTerms::new(&ScoringTables::default());
        let score = terms.name_overlap(&query, &record);
        prop_assert!((0.0..=1.0).contains(&score));
        if terms.extract(&query).is_empty() {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn adding_a_technical_keyword_never_lowers_alignment(query in query_strategy(), record in record_strategy()) {
        let tables = ScoringTables::default();
        let before = category_alignment(&query, &record, &tables);
        let after = category_alignment(&format!("{query} python"), &record, &tables);
        prop_assert!(after >= before);
    }

    #[test]
    fn exact_training_query_always_scores_ten(padding in "[ \t]{0,3}", upper in any::<bool>()) {
        let base = "graduate sales analyst";
        let query = if upper { base.to_uppercase() } else { base.to_string() };
        let query = format!("{padding}{query}{padding}");
        prop_assert_eq!(history().training_score(&query, "https://x/2", &HistoryPoints::default()), 10.0);
    }
}

#[test]
fn training_csv_builds_index_and_empty_rows_are_skipped() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Query,Assessment_url").unwrap();
    writeln!(file, "Java developer,https://x/java").unwrap();
    writeln!(file, "java developer,https://x/sql").unwrap();
    writeln!(file, ",https://x/orphan").unwrap();
    writeln!(file, "\"Sales, entry level\",https://x/sales").unwrap();
    file.flush().unwrap();

    let idx = HistoricalIndex::load_or_empty(file.path());
    assert_eq!(idx.query_count(), 2);
    assert!(!idx.contains_id("https://x/orphan"));
    assert_eq!(idx.ids_for_query("JAVA DEVELOPER").map(|s| s.len()), Some(2));
    assert_eq!(idx.training_score("sales, entry level", "https://x/sales", &HistoryPoints::default()), 10.0);
}

#[test]
fn training_csv_without_required_columns_degrades_to_empty() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "question,link").unwrap();
    writeln!(file, "java,https://x/java").unwrap();
    file.flush().unwrap();
    assert!(HistoricalIndex::load_or_empty(file.path()).is_empty());
}
