use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use shortlist_core::error::{Error, Result};
use shortlist_core::traits::VectorSearch;
use shortlist_core::types::SearchHit;

use crate::distance::{l2_normalize, squared_l2};
use crate::schema::{IndexArtifact, IndexMetadata, INDEX_FILE, METADATA_FILE};

/// Exhaustive squared-L2 index over unit-normalised catalog vectors.
///
/// Rows are stored contiguously; row `i` belongs to `ids[i]`.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
    ids: Vec<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::IndexUnavailable(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| Error::IndexUnavailable(format!("malformed {}: {e}", path.display())))
}

impl VectorIndex {
    /// Builds an index from aligned ids and vectors, normalising every row.
    pub fn from_parts(dim: usize, ids: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Self> {
        if dim == 0 {
            return Err(Error::IndexUnavailable("index dimension is 0".into()));
        }
        if ids.len() != vectors.len() {
            return Err(Error::IndexUnavailable(format!(
                "index holds {} vectors but metadata lists {} ids",
                vectors.len(),
                ids.len()
            )));
        }
        let mut data = Vec::with_capacity(dim * vectors.len());
        for (pos, mut row) in vectors.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::IndexUnavailable(format!(
                    "vector {pos} has dimension {} (expected {dim})",
                    row.len()
                )));
            }
            if row.iter().any(|x| !x.is_finite()) {
                return Err(Error::IndexUnavailable(format!("vector {pos} contains non-finite values")));
            }
            if l2_normalize(&mut row) == 0.0 {
                warn!(position = pos, id = %ids[pos], "zero vector in index");
            }
            data.extend_from_slice(&row);
        }
        Ok(Self { dim, data, ids })
    }

    /// Loads `index.json` + `metadata.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let artifact: IndexArtifact = read_json(&dir.join(INDEX_FILE))?;
        let metadata: IndexMetadata = read_json(&dir.join(METADATA_FILE))?;
        let index = Self::from_parts(artifact.dimension, metadata.assessment_urls, artifact.vectors)?;
        info!(vectors = index.len(), dim = index.dim, dir = %dir.display(), "vector index loaded");
        Ok(index)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    fn row(&self, pos: usize) -> &[f32] {
        &self.data[pos * self.dim..(pos + 1) * self.dim]
    }
}

impl VectorSearch for VectorIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        self.ids.len()
    }

    fn search_vec(&self, query: &[f32], k: usize) -> Vec<SearchHit> {
        if query.len() != self.dim {
            warn!(got = query.len(), expected = self.dim, "query dimension mismatch");
            return Vec::new();
        }
        let mut scored: Vec<(usize, f32)> = (0..self.ids.len()).map(|pos| (pos, squared_l2(query, self.row(pos)))).collect();
        // Stable: equal distances keep index order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        scored
            .into_iter()
            .map(|(pos, distance)| SearchHit { id: self.ids[pos].clone(), distance })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://x/{i}")).collect()
    }

    #[test]
    fn nearest_first_and_k_caps_output() {
        let idx = VectorIndex::from_parts(2, ids(3), vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]]).unwrap();
        let hits = idx.search_vec(&[1.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "https://x/0");
        assert!(hits[0].distance.abs() < 1e-6);
        assert_eq!(hits[1].id, "https://x/2");
        assert_eq!(idx.search_vec(&[1.0, 0.0], 10).len(), 3);
    }

    #[test]
    fn ties_keep_index_order() {
        let idx = VectorIndex::from_parts(2, ids(3), vec![vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 1.0]]).unwrap();
        let order: Vec<_> = idx.search_vec(&[1.0, 0.0], 3).into_iter().map(|h| h.id).collect();
        assert_eq!(order, ids(3));
    }

    #[test]
    fn rows_are_normalised_on_build() {
        let idx = VectorIndex::from_parts(2, ids(1), vec![vec![3.0, 4.0]]).unwrap();
        let hit = &idx.search_vec(&[0.6, 0.8], 1)[0];
        assert!(hit.distance.abs() < 1e-6);
    }

    #[test]
    fn misaligned_artifacts_are_rejected() {
        assert!(matches!(
            VectorIndex::from_parts(2, ids(2), vec![vec![1.0, 0.0]]),
            Err(Error::IndexUnavailable(_))
        ));
        assert!(matches!(
            VectorIndex::from_parts(2, ids(1), vec![vec![1.0, 0.0, 0.0]]),
            Err(Error::IndexUnavailable(_))
        ));
        assert!(matches!(VectorIndex::from_parts(0, vec![], vec![]), Err(Error::IndexUnavailable(_))));
        assert!(matches!(
            VectorIndex::from_parts(1, ids(1), vec![vec![f32::NAN]]),
            Err(Error::IndexUnavailable(_))
        ));
    }

    #[test]
    fn wrong_query_dimension_yields_nothing() {
        let idx = VectorIndex::from_parts(2, ids(1), vec![vec![1.0, 0.0]]).unwrap();
        assert!(idx.search_vec(&[1.0, 0.0, 0.0], 5).is_empty());
    }
}
