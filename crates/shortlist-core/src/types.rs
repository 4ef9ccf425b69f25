//! Domain types shared by the retrieval and ranking stages.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical catalog URL. Unique per assessment and used as the primary key.
pub type AssessmentId = String;

/// One of the fixed category tags attached to an assessment.
///
/// Only exact catalog labels map to a known tag. Anything else is kept
/// verbatim in `Other` and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TestType {
    AbilityAptitude,
    BiodataSituationalJudgement,
    Competencies,
    Development360,
    AssessmentExercises,
    KnowledgeSkills,
    PersonalityBehavior,
    Simulations,
    Other(String),
}

impl TestType {
    pub const KNOWN: [TestType; 8] = [
        TestType::AbilityAptitude,
        TestType::BiodataSituationalJudgement,
        TestType::Competencies,
        TestType::Development360,
        TestType::AssessmentExercises,
        TestType::KnowledgeSkills,
        TestType::PersonalityBehavior,
        TestType::Simulations,
    ];

    /// Catalog label, e.g. `"Knowledge & Skills"`.
    pub fn label(&self) -> &str {
        match self {
            TestType::AbilityAptitude => "Ability & Aptitude",
            TestType::BiodataSituationalJudgement => "Biodata & Situational Judgement",
            TestType::Competencies => "Competencies",
            TestType::Development360 => "Development & 360",
            TestType::AssessmentExercises => "Assessment Exercises",
            TestType::KnowledgeSkills => "Knowledge & Skills",
            TestType::PersonalityBehavior => "Personality & Behavior",
            TestType::Simulations => "Simulations",
            TestType::Other(raw) => raw,
        }
    }

    /// Case-sensitive match against the catalog labels.
    pub fn parse(raw: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|t| t.label() == raw)
            .unwrap_or_else(|| TestType::Other(raw.to_string()))
    }
}

impl From<String> for TestType {
    fn from(raw: String) -> Self {
        TestType::parse(&raw)
    }
}

impl From<TestType> for String {
    fn from(t: TestType) -> Self {
        match t {
            TestType::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seniority a given assessment targets.
///
/// Labels outside the known set are kept verbatim in `Other` so that
/// substring checks against the raw label keep working.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobLevel {
    EntryLevel,
    MidLevel,
    SeniorLevel,
    Executive,
    Management,
    Professional,
    AllLevels,
    Other(String),
}

impl JobLevel {
    pub fn label(&self) -> &str {
        match self {
            JobLevel::EntryLevel => "Entry Level",
            JobLevel::MidLevel => "Mid Level",
            JobLevel::SeniorLevel => "Senior Level",
            JobLevel::Executive => "Executive",
            JobLevel::Management => "Management",
            JobLevel::Professional => "Professional",
            JobLevel::AllLevels => "All Levels",
            JobLevel::Other(raw) => raw,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Entry Level" => JobLevel::EntryLevel,
            "Mid Level" => JobLevel::MidLevel,
            "Senior Level" => JobLevel::SeniorLevel,
            "Executive" => JobLevel::Executive,
            "Management" => JobLevel::Management,
            "Professional" => JobLevel::Professional,
            "All Levels" => JobLevel::AllLevels,
            other => JobLevel::Other(other.to_string()),
        }
    }
}

impl From<String> for JobLevel {
    fn from(raw: String) -> Self {
        JobLevel::parse(&raw)
    }
}

impl From<JobLevel> for String {
    fn from(level: JobLevel) -> Self {
        match level {
            JobLevel::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

/// Immutable catalog entry, loaded once at startup.
///
/// Field names follow the catalog JSON produced by the scraper: the id is
/// stored under `url` and the category tags under `test_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    #[serde(rename = "url")]
    pub id: AssessmentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "test_type", default)]
    pub test_types: Vec<TestType>,
    #[serde(default)]
    pub job_levels: Vec<JobLevel>,
    #[serde(default)]
    pub duration: String,
    #[serde(default, with = "yes_no")]
    pub remote_support: bool,
    #[serde(default, with = "yes_no")]
    pub adaptive_support: bool,
}

impl AssessmentRecord {
    pub fn has_test_type(&self, test_type: TestType) -> bool {
        self.test_types.contains(&test_type)
    }

    /// First integer embedded in the duration text, read as minutes.
    /// `"30-40 minutes"` gives `Some(30)`.
    pub fn duration_minutes(&self) -> Option<u32> {
        digit_runs(&self.duration).first().and_then(|n| n.parse().ok())
    }

    /// Text the offline index builder embeds for this record: name,
    /// description, tags, levels and a few spellings of the duration.
    pub fn embedding_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.name.clone(), self.description.clone()];
        parts.push(self.test_types.iter().map(|t| t.label()).collect::<Vec<_>>().join(" "));
        parts.push(self.job_levels.iter().map(JobLevel::label).collect::<Vec<_>>().join(" "));
        let numbers = digit_runs(&self.duration);
        let value = if self.duration.contains('-') { numbers.last() } else { numbers.first() };
        if let Some(v) = value {
            parts.push(format!("{v} minutes"));
            parts.push(format!("Duration {v} minutes"));
            parts.push(format!("Assessment length {v} minutes"));
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

fn digit_runs(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_digit()).filter(|s| !s.is_empty()).collect()
}

/// `"Yes"`/`"No"` on the wire, `bool` in memory. Plain JSON booleans are accepted too.
pub mod yes_no {
    use super::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(label(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => b,
            Flag::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "y" | "1"),
        })
    }

    pub fn label(value: bool) -> &'static str {
        if value { "Yes" } else { "No" }
    }
}

/// Raw nearest-neighbour hit: catalog id plus squared L2 distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: AssessmentId,
    pub distance: f32,
}

/// Stage-1 output, borrowing its record from the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: &'a str,
    /// `1 - squared_l2_distance`; a monotone proxy for cosine similarity.
    pub embedding_similarity: f64,
    pub record: &'a AssessmentRecord,
}

/// Sub-scores kept on every recommendation for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Raw historical-association score, before normalisation.
    pub historical: f64,
    pub name_overlap: f64,
    pub category_alignment: f64,
    pub embedding_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: AssessmentId,
    pub name: String,
    pub final_score: f64,
    pub scores: ScoreBreakdown,
}
