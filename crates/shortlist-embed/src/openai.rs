//! OpenAI-compatible embeddings client.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shortlist_core::config::EmbeddingSettings;
use shortlist_core::traits::Embedder;

/// Blocking client for `POST {base_url}/embeddings`.
///
/// Each call is a single attempt: a transport error or non-success status is
/// returned to the caller straight away.
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
    dim: usize,
    id: String,
}

/// Output size of the hosted models when no explicit `dimensions` is requested.
pub fn native_dim(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

impl OpenAiEmbedder {
    pub fn new(api_key: &str, base_url: &str, model: &str, dimensions: Option<usize>, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing embeddings API key");
        anyhow::ensure!(!model.trim().is_empty(), "missing embeddings model name");
        let dim = dimensions
            .or_else(|| native_dim(model))
            .with_context(|| format!("unknown output size for model '{model}'; set embedding.dimensions"))?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim())).context("invalid API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build embeddings HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimensions,
            dim,
            id: format!("openai:{model}:d{dim}"),
        })
    }

    /// Reads the API key from the environment variable named in `settings`.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .with_context(|| format!("environment variable {} is not set", settings.api_key_env))?;
        Self::new(
            &api_key,
            &settings.base_url,
            &settings.model,
            settings.dimensions,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let started = Instant::now();
        let request = EmbeddingRequest { model: &self.model, input: texts, dimensions: self.dimensions };
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .with_context(|| format!("embeddings request to {} failed", self.endpoint))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            anyhow::bail!("embeddings request failed ({status}): {body}");
        }
        let mut parsed: EmbeddingResponse = resp.json().context("failed to parse embeddings response")?;
        parsed.data.sort_by_key(|entry| entry.index);
        anyhow::ensure!(
            parsed.data.len() == texts.len(),
            "provider returned {} embeddings for {} inputs",
            parsed.data.len(),
            texts.len()
        );
        debug!(inputs = texts.len(), elapsed_ms = started.elapsed().as_millis() as u64, "embeddings fetched");
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingEntry>,
}

#[derive(Deserialize)]
struct EmbeddingEntry {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_key_and_unknown_model_size() {
        let t = Duration::from_secs(1);
        assert!(OpenAiEmbedder::new("  ", "http://localhost", "text-embedding-3-small", None, t).is_err());
        assert!(OpenAiEmbedder::new("k", "http://localhost", "custom-model", None, t).is_err());
        let e = OpenAiEmbedder::new("k", "http://localhost/v1/", "custom-model", Some(8), t).unwrap();
        assert_eq!(e.dim(), 8);
        assert_eq!(e.endpoint(), "http://localhost/v1/embeddings");
    }

    #[test]
    fn unreachable_endpoint_is_an_error() {
        // Port 9 (discard) on loopback is not expected to serve HTTP.
        let e = OpenAiEmbedder::new("k", "http://127.0.0.1:9", "text-embedding-3-small", None, Duration::from_secs(2))
            .unwrap();
        assert!(e.embed("java developer").is_err());
    }
}
