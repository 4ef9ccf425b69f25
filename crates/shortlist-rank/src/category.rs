//! Additive category-alignment points between query intents and record tags.

use shortlist_core::tables::{CategoryPoints, ScoringTables};
use shortlist_core::types::{AssessmentRecord, TestType};

/// Intents detected by case-insensitive substring match on the raw query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryIntent {
    pub technical: bool,
    pub behavioral: bool,
    pub business: bool,
    pub entry: bool,
}

fn mentions_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| !kw.is_empty() && haystack.contains(kw.to_lowercase().as_str()))
}

impl QueryIntent {
    pub fn detect(query: &str, tables: &ScoringTables) -> Self {
        let lower = query.to_lowercase();
        Self {
            technical: mentions_any(&lower, &tables.technical_keywords),
            behavioral: mentions_any(&lower, &tables.behavioral_keywords),
            business: mentions_any(&lower, &tables.business_keywords),
            entry: mentions_any(&lower, &tables.entry_keywords),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordTraits {
    pub knowledge: bool,
    pub personality: bool,
    pub situational: bool,
    pub aptitude: bool,
    pub entry_level: bool,
}

impl RecordTraits {
    pub fn of(record: &AssessmentRecord, tables: &ScoringTables) -> Self {
        Self {
            knowledge: record.has_test_type(TestType::KnowledgeSkills),
            personality: record.has_test_type(TestType::PersonalityBehavior),
            situational: record.has_test_type(TestType::BiodataSituationalJudgement),
            aptitude: record.has_test_type(TestType::AbilityAptitude),
            entry_level: record
                .job_levels
                .iter()
                .any(|level| tables.entry_level_markers.iter().any(|m| level.label().contains(m.as_str()))),
        }
    }
}

pub fn alignment(intent: QueryIntent, traits: RecordTraits, points: &CategoryPoints) -> f64 {
    let mut score = 0.0;
    if intent.technical && traits.knowledge {
        score += points.category_match;
    }
    if intent.behavioral && traits.personality {
        score += points.category_match;
    }
    if intent.business && traits.situational {
        score += points.category_match;
    }
    if intent.entry && traits.entry_level {
        score += points.entry_level_match;
    }
    if intent.entry && traits.aptitude {
        score += points.entry_aptitude_match;
    }
    score
}

pub fn category_alignment(query: &str, record: &AssessmentRecord, tables: &ScoringTables) -> f64 {
    alignment(QueryIntent::detect(query, tables), RecordTraits::of(record, tables), &tables.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shortlist_core::types::JobLevel;

    fn record(tags: &[TestType], levels: &[&str]) -> AssessmentRecord {
        AssessmentRecord {
            id: "https://x/r".into(),
            name: "R".into(),
            description: String::new(),
            test_types: tags.to_vec(),
            job_levels: levels.iter().map(|l| JobLevel::parse(l)).collect(),
            duration: String::new(),
            remote_support: false,
            adaptive_support: false,
        }
    }

    #[test]
    fn intents_use_substring_match() {
        let t = ScoringTables::default();
        let i = QueryIntent::detect("Need a JavaScript dev who can collaborate with Clients", &t);
        assert_eq!(i, QueryIntent { technical: true, behavioral: true, business: true, entry: false });
        // "fit" matches inside "profitable".
        assert!(QueryIntent::detect("profitable", &t).behavioral);
        assert!(QueryIntent::detect("new hire onboarding", &t).entry);
    }

    #[test]
    fn points_add_up() {
        let t = ScoringTables::default();
        let r = record(
            &[TestType::KnowledgeSkills, TestType::PersonalityBehavior, TestType::AbilityAptitude],
            &["Graduate"],
        );
        assert_eq!(category_alignment("graduate java developer for team work", &r, &t), 3.0);
        assert_eq!(category_alignment("chef", &r, &t), 0.0);
    }

    #[test]
    fn near_miss_tag_labels_do_not_align() {
        let t = ScoringTables::default();
        for raw in ["K", "knowledge & skills", "Knowledge and Skills"] {
            let r = record(&[TestType::parse(raw)], &["Mid Level"]);
            assert_eq!(category_alignment("java developer", &r, &t), 0.0, "{raw}");
        }
        let exact = record(&[TestType::parse("Knowledge & Skills")], &["Mid Level"]);
        assert_eq!(category_alignment("java developer", &exact, &t), 1.0);
    }

    #[test]
    fn entry_level_comes_from_job_level_labels() {
        let t = ScoringTables::default();
        assert!(RecordTraits::of(&record(&[], &["Entry Level"]), &t).entry_level);
        assert!(RecordTraits::of(&record(&[], &["Graduate"]), &t).entry_level);
        assert!(!RecordTraits::of(&record(&[], &["Mid Level", "All Levels"]), &t).entry_level);
    }
}
