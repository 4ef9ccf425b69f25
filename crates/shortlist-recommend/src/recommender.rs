use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::info;

use shortlist_core::config::Settings;
use shortlist_core::error::{Error, Result};
use shortlist_core::traits::{Embedder, VectorSearch};
use shortlist_core::types::Recommendation;
use shortlist_embed::get_default_embedder;
use shortlist_vector::Retriever;

use crate::context::RecommenderContext;
use crate::request::{validate_request, RecommendationRequest, RecommendationResponse};

/// Two-stage recommendation facade. Cheap to clone; clones share the same
/// context and embedder.
#[derive(Clone)]
pub struct Recommender {
    ctx: Arc<RecommenderContext>,
    embedder: Arc<dyn Embedder>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub embedder: String,
    pub catalog_records: usize,
    pub index_vectors: usize,
    pub index_dim: usize,
    pub training_queries: usize,
    pub dangling_ids: usize,
}

impl Recommender {
    /// Fails with `InvalidConfig` when the embedder and index disagree on
    /// dimension.
    pub fn new(ctx: Arc<RecommenderContext>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if embedder.dim() != ctx.index().dim() {
            return Err(Error::InvalidConfig(format!(
                "embedder {} produces {}-d vectors but the index holds {}-d vectors",
                embedder.embedder_id(),
                embedder.dim(),
                ctx.index().dim()
            )));
        }
        Ok(Self { ctx, embedder })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let ctx = RecommenderContext::from_settings(settings)?;
        let embedder = get_default_embedder(settings).map_err(|e| Error::InvalidConfig(format!("{e:#}")))?;
        Self::new(Arc::new(ctx), Arc::from(embedder))
    }

    pub fn context(&self) -> &RecommenderContext {
        &self.ctx
    }

    /// Up to `top_k` recommendations for `query`, best first.
    ///
    /// Range checks on `top_k` belong to the caller; asking for more items
    /// than there are candidates returns what is available.
    pub fn recommend(&self, query: &str, top_k: usize) -> Result<Vec<Recommendation>> {
        let started = Instant::now();
        let retriever = Retriever::new(self.ctx.index(), self.ctx.catalog(), self.embedder.as_ref());
        let candidates = retriever.retrieve(query, self.ctx.candidate_depth())?;
        let ranked = self.ctx.reranker().rerank(query, &candidates, top_k);
        info!(
            query_chars = query.chars().count(),
            top_k,
            candidates = candidates.len(),
            returned = ranked.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recommend"
        );
        Ok(ranked)
    }

    /// Validates `request`, runs it and renders the caller-facing response.
    pub fn respond(&self, request: &RecommendationRequest) -> Result<RecommendationResponse> {
        validate_request(&request.query, request.top_k)?;
        let ranked = self.recommend(&request.query, request.top_k)?;
        Ok(RecommendationResponse::build(&request.query, &ranked, self.ctx.catalog()))
    }

    pub fn health(&self) -> Health {
        Health {
            status: if self.ctx.index().is_empty() { "degraded" } else { "healthy" },
            embedder: self.embedder.embedder_id().to_string(),
            catalog_records: self.ctx.catalog().len(),
            index_vectors: self.ctx.index().len(),
            index_dim: self.ctx.index().dim(),
            training_queries: self.ctx.reranker().history().query_count(),
            dangling_ids: self.ctx.dangling_ids(),
        }
    }
}
