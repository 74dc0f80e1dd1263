//! Run configuration: TOML file, validated into engine inputs.

use crate::dictionary::{DictionaryError, VariantDictionary};
use crate::execute::{DEFAULT_SETTLE_SECONDS, MAX_SETTLE_SECONDS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration path, with a dotdir fallback.
pub const DEFAULT_CONFIG_PATH: &str = "tagmend.toml";
pub const FALLBACK_CONFIG_PATH: &str = ".tagmend/config.toml";

/// Default append-only run log path.
pub const DEFAULT_LOG_PATH: &str = ".tagmend/run-log.jsonl";

/// Raw file shape. Every field has a default so a partial file works.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    canonical_key: String,
    variants: Vec<String>,
    settle_seconds: u64,
    log_path: String,
    overwrite_conflicts: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            canonical_key: "DeptCode".to_string(),
            variants: default_variants(),
            settle_seconds: DEFAULT_SETTLE_SECONDS,
            log_path: DEFAULT_LOG_PATH.to_string(),
            overwrite_conflicts: true,
        }
    }
}

fn default_variants() -> Vec<String> {
    ["Dept", "Department", "DeptId", "DeptCd", "Dept_Code"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Validated run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dictionary: VariantDictionary,
    pub settle_delay: Duration,
    pub overwrite_conflicts: bool,
    pub log_path: PathBuf,
}

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("invalid toml at {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(
        "settle_seconds must be at most {max} (got {actual})",
        max = MAX_SETTLE_SECONDS
    )]
    InvalidSettleSeconds { actual: u64 },
}

impl RunConfig {
    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let raw: RawConfig = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        if raw.settle_seconds > MAX_SETTLE_SECONDS {
            return Err(ConfigError::InvalidSettleSeconds {
                actual: raw.settle_seconds,
            });
        }
        let dictionary = VariantDictionary::new(raw.canonical_key, raw.variants)?;
        Ok(Self {
            dictionary,
            settle_delay: Duration::from_secs(raw.settle_seconds),
            overwrite_conflicts: raw.overwrite_conflicts,
            log_path: PathBuf::from(raw.log_path),
        })
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default()).expect("built-in defaults are valid")
    }
}
