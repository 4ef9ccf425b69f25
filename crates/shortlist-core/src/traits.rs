use crate::types::SearchHit;

/// Text-to-vector collaborator. Implementations may call a remote service;
/// callers treat every failure as "embedding unavailable".
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model, e.g. `openai:text-embedding-3-small`.
    fn embedder_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder {} returned no vector", self.embedder_id()))
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embedder_id(&self) -> &str { (**self).embedder_id() }
    fn dim(&self) -> usize { (**self).dim() }
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).embed_batch(texts) }
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> { (**self).embed(text) }
}

/// Read-only nearest-neighbour search over catalog vectors.
pub trait VectorSearch: Send + Sync {
    fn dim(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool { self.len() == 0 }
    /// Up to `k` hits ordered by ascending distance; `query` is already normalised.
    fn search_vec(&self, query: &[f32], k: usize) -> Vec<SearchHit>;
}
