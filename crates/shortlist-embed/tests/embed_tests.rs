use shortlist_core::config::{EmbeddingProvider, Settings};
use shortlist_core::traits::Embedder;
use shortlist_embed::get_default_embedder;

#[test]
fn hash_provider_shapes_and_determinism() {
    let mut settings = Settings::default();
    settings.embedding.provider = EmbeddingProvider::Hash;
    settings.embedding.hash_dim = 128;
    settings.retrieval.memoize_embeddings = true;

    let embedder = get_default_embedder(&settings).expect("embedder");
    let texts = vec!["graduate aptitude".to_string(), "graduate aptitude".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let (v1, v2) = (&embs[0], &embs[1]);

    assert_eq!(v1.len(), 128, "embedding dim follows hash_dim");
    assert_eq!(embedder.dim(), 128);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn openai_provider_without_key_fails_to_build() {
    let mut settings = Settings::default();
    settings.embedding.provider = EmbeddingProvider::OpenAi;
    settings.embedding.api_key_env = "SHORTLIST_TEST_KEY_THAT_IS_NEVER_SET".to_string();
    if shortlist_embed::fake_embeddings_requested() {
        return;
    }
    assert!(get_default_embedder(&settings).is_err());
}
