//! Runtime configuration
//!
//! Read once from the process environment (after `.env` is loaded by the binary).

use crate::error::AnalystError;
use crate::gemini::DEFAULT_BASE_URL;
use crate::Result;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const API_KEY_PLACEHOLDER: &str = "your_google_api_key_here";

#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// Gemini key. `None` selects the deterministic fallback reasoner.
    pub api_key: Option<String>,
    pub model: String,
    /// Gemini REST root, overridable for proxies.
    pub gemini_base_url: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_top_k: usize,
    pub reasoning_timeout: Duration,
    pub retrieval_timeout: Duration,
    pub port: u16,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: 500,
            chunk_overlap: 50,
            retrieval_top_k: 5,
            reasoning_timeout: Duration::from_secs(30),
            retrieval_timeout: Duration::from_secs(10),
            port: 8000,
        }
    }
}

impl AnalystConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Used by `from_env` and tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let usable_key = |name: &str| {
            lookup(name)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER)
        };
        let api_key = usable_key("GOOGLE_API_KEY").or_else(|| usable_key("GEMINI_API_KEY"));

        let model = lookup("ANALYST_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);

        let gemini_base_url = lookup("ANALYST_GEMINI_BASE_URL")
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or(defaults.gemini_base_url);

        let chunk_size = parse_var(&lookup, "ANALYST_CHUNK_SIZE", defaults.chunk_size)?;
        let chunk_overlap = parse_var(&lookup, "ANALYST_CHUNK_OVERLAP", defaults.chunk_overlap)?;
        let retrieval_top_k = parse_var(&lookup, "ANALYST_TOP_K", defaults.retrieval_top_k)?;

        let reasoning_timeout = Duration::from_secs(parse_var(
            &lookup,
            "ANALYST_REASONING_TIMEOUT_SECS",
            defaults.reasoning_timeout.as_secs(),
        )?);
        let retrieval_timeout = Duration::from_secs(parse_var(
            &lookup,
            "ANALYST_RETRIEVAL_TIMEOUT_SECS",
            defaults.retrieval_timeout.as_secs(),
        )?);

        let port = match lookup("PORT").or_else(|| lookup("API_PORT")) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AnalystError::ConfigError(format!("PORT is not a valid port: {}", raw))
            })?,
            None => defaults.port,
        };

        let config = Self {
            api_key,
            model,
            gemini_base_url,
            chunk_size,
            chunk_overlap,
            retrieval_top_k,
            reasoning_timeout,
            retrieval_timeout,
            port,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AnalystError::ConfigError(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AnalystError::ConfigError(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.retrieval_top_k == 0 {
            return Err(AnalystError::ConfigError(
                "retrieval top-k must be at least 1".to_string(),
            ));
        }

        if self.reasoning_timeout.is_zero() || self.retrieval_timeout.is_zero() {
            return Err(AnalystError::ConfigError(
                "timeouts must be at least one second".to_string(),
            ));
        }

        Ok(())
    }

    pub fn llm_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            AnalystError::ConfigError(format!("{} has an invalid value: {}", key, raw))
        }),
        None => Ok(default),
    }
}
