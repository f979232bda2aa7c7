//! Runtime configuration for the notes core.
//!
//! # Responsibility
//! - Hold tunables for storage key, load retries and host theming.
//! - Parse and validate JSON configuration files.
//!
//! # Invariants
//! - Every field has a default, so `{}` is a valid configuration.
//! - A validated config always has a non-empty storage key and a
//!   `#RRGGBB` theme color.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Key under which the whole note collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "brutal_notes";
pub const DEFAULT_LOAD_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
/// Dark grey used for both header and background.
pub const DEFAULT_THEME_COLOR: &str = "#161616";

const MAX_RETRY_BASE_DELAY_MS: u64 = 60_000;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("valid hex color regex"));

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotesConfig {
    pub storage_key: String,
    /// Attempts made by a default `load`/`sync`.
    pub load_retries: u32,
    /// Backoff unit; attempt `n` waits `n * retry_base_delay_ms`.
    pub retry_base_delay_ms: u64,
    pub theme_color: String,
    /// Fallback host mirror database. `None` keeps fallback data in memory.
    pub fallback_db_path: Option<PathBuf>,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            load_retries: DEFAULT_LOAD_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            fallback_db_path: None,
        }
    }
}

impl NotesConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be empty".to_string(),
            ));
        }
        if !HEX_COLOR_RE.is_match(&self.theme_color) {
            return Err(ConfigError::Invalid(format!(
                "theme_color must look like #RRGGBB, got `{}`",
                self.theme_color
            )));
        }
        if self.retry_base_delay_ms > MAX_RETRY_BASE_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "retry_base_delay_ms must be <= {MAX_RETRY_BASE_DELAY_MS}, got {}",
                self.retry_base_delay_ms
            )));
        }
        Ok(())
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
