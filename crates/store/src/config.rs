//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `MALL_STATE_DIR` - Directory holding the file-backed snapshot slot (default: .mall-state)
//! - `MALL_STATE_KEY` - Name of the snapshot slot (default: `mall_state`)
//! - `MALL_HISTORY_LIMIT` - Maximum browse history entries kept (default: 50)
//! - `MALL_LOG_FORMAT` - `pretty` or `json` (default: pretty)

use std::path::PathBuf;

use thiserror::Error;

/// Default name of the snapshot slot.
pub const DEFAULT_STORAGE_KEY: &str = "mall_state";

/// Default bound on the browse history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

const DEFAULT_STATE_DIR: &str = ".mall-state";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format for binaries embedding the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory for the file-backed slot
    pub state_dir: PathBuf,
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// Maximum number of browse history entries
    pub history_limit: usize,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            log_format: LogFormat::default(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let state_dir = PathBuf::from(get_env_or_default("MALL_STATE_DIR", DEFAULT_STATE_DIR));
        let storage_key = get_env_or_default("MALL_STATE_KEY", DEFAULT_STORAGE_KEY);
        validate_storage_key(&storage_key, "MALL_STATE_KEY")?;

        let history_limit = match get_optional_env("MALL_HISTORY_LIMIT") {
            Some(raw) => parse_history_limit(&raw, "MALL_HISTORY_LIMIT")?,
            None => DEFAULT_HISTORY_LIMIT,
        };

        let log_format = match get_optional_env("MALL_LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar("MALL_LOG_FORMAT".to_string(), e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            state_dir,
            storage_key,
            history_limit,
            log_format,
        })
    }

    /// Override the snapshot directory.
    #[must_use]
    pub fn with_state_dir(mut self, state_dir: impl Into<PathBuf>) -> Self {
        self.state_dir = state_dir.into();
        self
    }

    /// Override the history bound. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit.max(1);
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a history bound, which must be a positive integer.
fn parse_history_limit(raw: &str, var_name: &str) -> Result<usize, ConfigError> {
    let limit = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if limit == 0 {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be at least 1".to_string(),
        ));
    }
    Ok(limit)
}

/// Validate a slot key against the alphabet every backend accepts.
fn validate_storage_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::MissingEnvVar(var_name.to_string()));
    }
    if !crate::storage::is_valid_key(key) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("`{key}` may only contain ASCII letters, digits, `_` and `-`"),
        ));
    }
    Ok(())
}
