use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::tables::ScoringTables;

/// Layered configuration: defaults, `shortlist.toml`, `shortlist.<env>.toml`,
/// then `SHORTLIST_*` environment variables (`__` separates nested keys).
pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    /// Loads `base` plus its sibling `<stem>.<env>.toml` overlay.
    pub fn load_from(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("SHORTLIST_ENV").unwrap_or_else(|_| "dev".to_string());
        Ok(Self::layered(base, &env_name))
    }

    fn layered(base: &Path, env_name: &str) -> Self {
        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(base));
        let overlay = match env_name {
            "dev" | "development" => Some("dev"),
            "prod" | "production" => Some("prod"),
            "test" | "testing" => Some("test"),
            _ => None,
        };
        if let Some(suffix) = overlay {
            let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("shortlist");
            figment = figment.merge(Toml::file(base.with_file_name(format!("{stem}.{suffix}.toml"))));
        }
        figment = figment.merge(Env::prefixed("SHORTLIST_").split("__"));
        Self { figment, env_name: env_name.to_string() }
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    /// Extracts and validates the typed settings tree.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub scoring: ScoringTables,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Relative data paths are resolved against this directory.
    pub base_dir: Option<String>,
    pub catalog_path: String,
    pub index_dir: String,
    pub training_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// How many nearest neighbours Stage-1 hands to the reranker.
    pub candidate_depth: usize,
    pub memoize_embeddings: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    OpenAi,
    Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub dimensions: Option<usize>,
    pub timeout_secs: u64,
    /// Output size of the hash embedder.
    pub hash_dim: usize,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            base_dir: None,
            catalog_path: "data/assessments.json".to_string(),
            index_dir: "data/vector_index".to_string(),
            training_path: "data/training.csv".to_string(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { candidate_depth: 500, memoize_embeddings: false }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::OpenAi,
            model: "text-embedding-3-small".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            dimensions: None,
            timeout_secs: 30,
            hash_dim: 256,
        }
    }
}

impl DataSettings {
    fn resolve(&self, p: &str) -> PathBuf {
        let base = self.base_dir.as_deref().map_or_else(|| PathBuf::from("."), expand_path);
        resolve_with_base(&base, p)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.catalog_path)
    }

    pub fn index_dir(&self) -> PathBuf {
        self.resolve(&self.index_dir)
    }

    pub fn training_path(&self) -> PathBuf {
        self.resolve(&self.training_path)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.candidate_depth == 0 {
            return Err(Error::InvalidConfig("retrieval.candidate_depth must be at least 1".into()));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(Error::InvalidConfig("embedding.timeout_secs must be at least 1".into()));
        }
        if self.embedding.hash_dim == 0 {
            return Err(Error::InvalidConfig("embedding.hash_dim must be at least 1".into()));
        }
        if self.embedding.dimensions == Some(0) {
            return Err(Error::InvalidConfig("embedding.dimensions must be at least 1 when set".into()));
        }
        self.scoring.validate()
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
