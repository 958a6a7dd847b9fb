use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::index::embedder::DEFAULT_DIMENSION;
use crate::llm_client::transport::OPENROUTER_API_URL;
use crate::llm_client::{DEFAULT_MAX_RETRIES, DEFAULT_MODEL};
use crate::ranking::ranker::DEFAULT_CONCURRENCY;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub model_id: String,
    pub llm_api_url: String,
    pub llm_max_retries: u32,
    pub index_dir: PathBuf,
    pub embedding_dimension: usize,
    /// Base for resume links in rendered results, e.g. `http://localhost:8000`.
    pub public_base_url: Url,
    pub max_similar_resumes: usize,
    pub ranker_concurrency: usize,
    pub legacy_index_file: PathBuf,
    pub legacy_corpus_file: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let port: u16 = parse_env("PORT", "8000")?;
        let public_base_url = optional_env("PUBLIC_BASE_URL", &format!("http://localhost:{port}"));

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            model_id: optional_env("MODEL_ID", DEFAULT_MODEL),
            llm_api_url: optional_env("LLM_API_URL", OPENROUTER_API_URL),
            llm_max_retries: parse_env("LLM_MAX_RETRIES", &DEFAULT_MAX_RETRIES.to_string())?,
            index_dir: PathBuf::from(optional_env("INDEX_DIR", "data")),
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", &DEFAULT_DIMENSION.to_string())?,
            public_base_url: Url::parse(&public_base_url)
                .with_context(|| format!("PUBLIC_BASE_URL '{public_base_url}' is not a valid URL"))?,
            max_similar_resumes: parse_env("MAX_SIMILAR_RESUMES", "3")?,
            ranker_concurrency: parse_env("RANKER_CONCURRENCY", &DEFAULT_CONCURRENCY.to_string())?,
            legacy_index_file: PathBuf::from(optional_env("LEGACY_INDEX_FILE", "data/faiss_index.bin")),
            legacy_corpus_file: PathBuf::from(optional_env("LEGACY_CORPUS_FILE", "data/resume_corpus.json")),
            port,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    optional_env(key, default)
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>()))
}
