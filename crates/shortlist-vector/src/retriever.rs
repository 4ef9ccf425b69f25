//! Stage 1: embed the query and pull the nearest catalog items.

use tracing::{debug, warn};

use shortlist_core::catalog::CatalogStore;
use shortlist_core::error::{Error, Result};
use shortlist_core::traits::{Embedder, VectorSearch};
use shortlist_core::types::Candidate;

use crate::distance::{l2_normalize, similarity_from_distance};

pub struct Retriever<'a> {
    index: &'a dyn VectorSearch,
    catalog: &'a CatalogStore,
    embedder: &'a dyn Embedder,
}

impl<'a> Retriever<'a> {
    pub fn new(index: &'a dyn VectorSearch, catalog: &'a CatalogStore, embedder: &'a dyn Embedder) -> Self {
        Self { index, catalog, embedder }
    }

    /// Embeds `query` and returns it unit-normalised.
    ///
    /// Provider failures and unusable output (wrong length, non-finite
    /// values, zero norm) all surface as `EmbeddingUnavailable`.
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut v = self
            .embedder
            .embed(query)
            .map_err(|e| Error::EmbeddingUnavailable(format!("{}: {e:#}", self.embedder.embedder_id())))?;
        if v.len() != self.index.dim() {
            return Err(Error::EmbeddingUnavailable(format!(
                "embedding has dimension {} but the index expects {}",
                v.len(),
                self.index.dim()
            )));
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(Error::EmbeddingUnavailable("embedding contains non-finite values".into()));
        }
        if l2_normalize(&mut v) == 0.0 {
            return Err(Error::EmbeddingUnavailable("embedding has zero norm".into()));
        }
        Ok(v)
    }

    /// Up to `k` candidates by ascending distance. Hits whose id has no
    /// catalog record are dropped with a warning.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Candidate<'a>>> {
        let q = self.embed_query(query)?;
        let hits = self.index.search_vec(&q, k);
        let mut candidates = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.catalog.resolve(&hit.id) {
                Ok(record) => candidates.push(Candidate {
                    id: record.id.as_str(),
                    embedding_similarity: similarity_from_distance(hit.distance),
                    record,
                }),
                Err(e) => warn!(error = %e, "dropping candidate without catalog record"),
            }
        }
        debug!(requested = k, returned = candidates.len(), "stage-1 retrieval done");
        Ok(candidates)
    }
}
