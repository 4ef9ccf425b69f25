//! Process-local embedding memo keyed by `blake3(text)`.
//!
//! The key is the exact query text, so a hit returns the same vector the
//! provider would have produced and ranking is unchanged.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use anyhow::{anyhow, Result};

use shortlist_core::traits::Embedder;

pub struct MemoEmbedder<E> {
    inner: E,
    cache: RwLock<HashMap<blake3::Hash, Vec<f32>>>,
    max_entries: usize,
}

impl<E: Embedder> MemoEmbedder<E> {
    pub fn new(inner: E, max_entries: usize) -> Self {
        Self { inner, cache: RwLock::new(HashMap::new()), max_entries }
    }

    pub fn cached(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<E: Embedder> Embedder for MemoEmbedder<E> {
    fn embedder_id(&self) -> &str {
        self.inner.embedder_id()
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let keys: Vec<blake3::Hash> = texts.iter().map(|t| blake3::hash(t.as_bytes())).collect();
        let mut out: Vec<Option<Vec<f32>>> = {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            keys.iter().map(|k| cache.get(k).cloned()).collect()
        };
        let misses: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let fresh = self.inner.embed_batch(&miss_texts)?;
            if fresh.len() != miss_texts.len() {
                return Err(anyhow!("embedder returned {} vectors for {} inputs", fresh.len(), miss_texts.len()));
            }
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            for (&i, v) in misses.iter().zip(fresh) {
                if cache.len() < self.max_entries {
                    cache.insert(keys[i], v.clone());
                }
                out[i] = Some(v);
            }
        }
        out.into_iter()
            .map(|v| v.ok_or_else(|| anyhow!("missing embedding after cache fill")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl Embedder for Counting {
        fn embedder_id(&self) -> &str { "counting" }
        fn dim(&self) -> usize { 2 }
        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    #[test]
    fn repeated_text_hits_cache() {
        let memo = MemoEmbedder::new(Counting { calls: AtomicUsize::new(0) }, 16);
        let first = memo.embed("java developer").unwrap();
        let second = memo.embed("java developer").unwrap();
        assert_eq!(first, second);
        assert_eq!(memo.inner.calls.load(Ordering::SeqCst), 1);
        // Case differs, so this is a different key.
        memo.embed("Java developer").unwrap();
        assert_eq!(memo.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(memo.cached(), 2);
    }

    #[test]
    fn capacity_limits_growth_but_not_results() {
        let memo = MemoEmbedder::new(Counting { calls: AtomicUsize::new(0) }, 1);
        let texts = vec!["a".to_string(), "bb".to_string()];
        let out = memo.embed_batch(&texts).unwrap();
        assert_eq!(out[1], vec![2.0, 1.0]);
        assert_eq!(memo.cached(), 1);
    }
}
