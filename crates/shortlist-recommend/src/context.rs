use std::collections::HashSet;

use tracing::{info, warn};

use shortlist_core::config::Settings;
use shortlist_core::error::Result;
use shortlist_core::traits::VectorSearch;
use shortlist_core::CatalogStore;
use shortlist_rank::{HistoricalIndex, Reranker};
use shortlist_vector::VectorIndex;

/// Everything a request reads: built once, never mutated afterwards.
///
/// Independent contexts can coexist in one process, e.g. one per test
/// fixture.
#[derive(Debug)]
pub struct RecommenderContext {
    catalog: CatalogStore,
    index: VectorIndex,
    reranker: Reranker,
    candidate_depth: usize,
    dangling_ids: usize,
}

impl RecommenderContext {
    pub fn new(catalog: CatalogStore, index: VectorIndex, reranker: Reranker, candidate_depth: usize) -> Self {
        let dangling_ids = index.ids().iter().filter(|id| !catalog.contains(id)).count();
        if dangling_ids > 0 {
            warn!(dangling = dangling_ids, "index ids without catalog record; rebuild the index");
        }
        let indexed: HashSet<&str> = index.ids().iter().map(String::as_str).collect();
        let unindexed = catalog.iter().filter(|r| !indexed.contains(r.id.as_str())).count();
        if unindexed > 0 {
            warn!(unindexed, "catalog records missing from the vector index");
        }
        Self { catalog, index, reranker, candidate_depth, dangling_ids }
    }

    /// Loads the catalog, vector index and training data named in `settings`.
    ///
    /// Catalog and index failures are fatal; unusable training data only
    /// empties the historical index.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let catalog = CatalogStore::load(&settings.data.catalog_path())?;
        let index = VectorIndex::load(&settings.data.index_dir())?;
        let history = HistoricalIndex::load_or_empty(&settings.data.training_path());
        let reranker = Reranker::new(history, settings.scoring.clone())?;
        let ctx = Self::new(catalog, index, reranker, settings.retrieval.candidate_depth);
        info!(
            records = ctx.catalog.len(),
            vectors = ctx.index.len(),
            training_queries = ctx.reranker.history().query_count(),
            "recommender context ready"
        );
        Ok(ctx)
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn reranker(&self) -> &Reranker {
        &self.reranker
    }

    pub fn candidate_depth(&self) -> usize {
        self.candidate_depth
    }

    /// Index ids with no catalog record.
    pub fn dangling_ids(&self) -> usize {
        self.dangling_ids
    }
}
