//! On-disk shape of the vector index artifacts.
//!
//! The offline build job writes two files side by side: `index.json` holds
//! the vectors in catalog order, `metadata.json` holds the parallel id list.
//! Position `i` in one always refers to position `i` in the other.

use serde::{Deserialize, Serialize};

pub const INDEX_FILE: &str = "index.json";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

/// Position → id map, plus optional parallel columns kept for inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMetadata {
    pub assessment_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assessment_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_types: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_levels: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub durations: Vec<String>,
}
