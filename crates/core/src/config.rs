//! Configuration for a cutover run: two store connections plus tuning knobs.
//!
//! Loaded either from a TOML file or from `CUTOVER_*` environment variables,
//! then validated once and passed by reference into every stage.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CutoverError, Result};

pub const ENV_SOURCE_URL: &str = "CUTOVER_SOURCE_URL";
pub const ENV_SOURCE_SERVICE_KEY: &str = "CUTOVER_SOURCE_SERVICE_KEY";
pub const ENV_TARGET_URL: &str = "CUTOVER_TARGET_URL";
pub const ENV_TARGET_SERVICE_KEY: &str = "CUTOVER_TARGET_SERVICE_KEY";

/// Top-level configuration, deserialized from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoverConfig {
    #[serde(default)]
    pub source: StoreConfig,
    #[serde(default)]
    pub target: StoreConfig,
    #[serde(default)]
    pub cutover: TuningConfig,
}

/// Connection parameters for one store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub url: String,
    /// Privileged key that bypasses row-level security on the store.
    #[serde(default)]
    pub service_key: String,
}

/// Paging, batching and promotion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_purge_rounds")]
    pub max_purge_rounds: u32,
    #[serde(default = "default_page_size")]
    pub purge_page_size: usize,
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default = "default_promote_from_grade")]
    pub promote_from_grade: i64,
    #[serde(default = "default_graduating_grade")]
    pub graduating_grade: i64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            batch_size: default_batch_size(),
            max_purge_rounds: default_max_purge_rounds(),
            purge_page_size: default_page_size(),
            export_dir: default_export_dir(),
            promote_from_grade: default_promote_from_grade(),
            graduating_grade: default_graduating_grade(),
        }
    }
}

fn default_page_size() -> usize {
    1000
}

fn default_batch_size() -> usize {
    500
}

fn default_max_purge_rounds() -> u32 {
    50
}

fn default_export_dir() -> String {
    "export".into()
}

fn default_promote_from_grade() -> i64 {
    5
}

fn default_graduating_grade() -> i64 {
    6
}

impl CutoverConfig {
    /// Load configuration from a TOML file at the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CutoverError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Missing keys become
    /// empty strings and are reported by [`CutoverConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default().trim().to_string();
        Self {
            source: StoreConfig {
                url: get(ENV_SOURCE_URL),
                service_key: get(ENV_SOURCE_SERVICE_KEY),
            },
            target: StoreConfig {
                url: get(ENV_TARGET_URL),
                service_key: get(ENV_TARGET_SERVICE_KEY),
            },
            cutover: TuningConfig::default(),
        }
    }

    /// Names of the connection parameters that are missing or empty.
    pub fn missing_parameters(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.source.url.is_empty() {
            missing.push(ENV_SOURCE_URL);
        }
        if self.source.service_key.is_empty() {
            missing.push(ENV_SOURCE_SERVICE_KEY);
        }
        missing.extend(self.missing_target_parameters());
        missing
    }

    /// Names of the target connection parameters that are missing or empty.
    pub fn missing_target_parameters(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.target.url.is_empty() {
            missing.push(ENV_TARGET_URL);
        }
        if self.target.service_key.is_empty() {
            missing.push(ENV_TARGET_SERVICE_KEY);
        }
        missing
    }

    /// Validate only the target connection. Used by commands that never
    /// touch the source store.
    pub fn validate_target(&self) -> Result<()> {
        require(self.missing_target_parameters())?;
        check_url("target.url", &self.target.url)
    }

    /// Validate the configuration, returning an error for invalid combinations.
    pub fn validate(&self) -> Result<()> {
        require(self.missing_parameters())?;
        check_url("source.url", &self.source.url)?;
        check_url("target.url", &self.target.url)?;

        if normalize_url(&self.source.url) == normalize_url(&self.target.url) {
            return Err(CutoverError::Config(
                "source.url and target.url point at the same store".into(),
            ));
        }

        let tuning = &self.cutover;
        if tuning.page_size == 0 || tuning.purge_page_size == 0 {
            return Err(CutoverError::Config(
                "cutover.page_size and cutover.purge_page_size must be positive".into(),
            ));
        }
        if tuning.batch_size == 0 {
            return Err(CutoverError::Config(
                "cutover.batch_size must be positive".into(),
            ));
        }
        if tuning.max_purge_rounds == 0 {
            return Err(CutoverError::Config(
                "cutover.max_purge_rounds must be positive".into(),
            ));
        }
        if tuning.promote_from_grade == tuning.graduating_grade {
            return Err(CutoverError::Config(
                "cutover.promote_from_grade must differ from cutover.graduating_grade".into(),
            ));
        }

        Ok(())
    }
}

fn require(missing: Vec<&'static str>) -> Result<()> {
    if missing.is_empty() {
        return Ok(());
    }
    Err(CutoverError::Config(format!(
        "missing required connection parameters: {}",
        missing.join(", ")
    )))
}

fn check_url(label: &str, url: &str) -> Result<()> {
    if url.starts_with("https://") || url.starts_with("http://") {
        return Ok(());
    }
    Err(CutoverError::Config(format!(
        "{label} must be an http(s) URL, got {url:?}"
    )))
}

fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_ascii_lowercase()
}
