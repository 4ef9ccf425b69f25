//! Embedding collaborators: an OpenAI-compatible HTTP client, a deterministic
//! hash embedder for tests and offline work, and an optional memo layer.

use anyhow::Result;
use tracing::info;

use shortlist_core::config::{EmbeddingProvider, Settings};
use shortlist_core::traits::Embedder;

pub mod hash;
pub mod memo;
pub mod openai;

pub use hash::HashEmbedder;
pub use memo::MemoEmbedder;
pub use openai::OpenAiEmbedder;

const MEMO_CAPACITY: usize = 10_000;

/// True when `SHORTLIST_USE_FAKE_EMBEDDINGS` asks for the hash embedder.
pub fn fake_embeddings_requested() -> bool {
    std::env::var("SHORTLIST_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Builds the configured embedder, wrapped in a memo when
/// `retrieval.memoize_embeddings` is set.
pub fn get_default_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    let provider = if fake_embeddings_requested() { EmbeddingProvider::Hash } else { settings.embedding.provider };
    let base: Box<dyn Embedder> = match provider {
        EmbeddingProvider::Hash => Box::new(HashEmbedder::new(settings.embedding.hash_dim)),
        EmbeddingProvider::OpenAi => Box::new(OpenAiEmbedder::from_settings(&settings.embedding)?),
    };
    info!(embedder = base.embedder_id(), dim = base.dim(), "embedder ready");
    if settings.retrieval.memoize_embeddings {
        return Ok(Box::new(MemoEmbedder::new(base, MEMO_CAPACITY)));
    }
    Ok(base)
}
