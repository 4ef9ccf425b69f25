//! Shared domain model for the assessment shortlist recommender: catalog
//! records, the error taxonomy, collaborator traits, configuration and the
//! scoring tables consumed by the reranker.

pub mod catalog;
pub mod config;
pub mod error;
pub mod tables;
pub mod traits;
pub mod training;
pub mod types;

pub use catalog::CatalogStore;
pub use error::{Error, Result};
pub use tables::ScoringTables;
pub use types::{AssessmentId, AssessmentRecord, Candidate, JobLevel, Recommendation, ScoreBreakdown, SearchHit, TestType};
