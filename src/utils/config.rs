//! TOML-based configuration for the PAPI client.
//!
//! Configuration is layered: built-in defaults, then an optional
//! `papi.toml`, then environment variables. A `.env` file is honored via
//! dotenvy before the environment is read.
//!
//! Only one setting is required for normal use — the API base URL — and it
//! defaults to the local development server.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{AppError, Result};

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "PAPI_API_URL";
/// Environment variable overriding the log level filter.
pub const ENV_LOG_LEVEL: &str = "PAPI_LOG_LEVEL";

/// Root configuration structure loaded from `papi.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PapiConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where the session token file lives. Defaults to the platform
    /// config directory.
    pub token_file: Option<PathBuf>,
}

impl Default for PapiConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_level: default_log_level(),
            token_file: None,
        }
    }
}

// ============= API Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl PapiConfig {
    /// Loads configuration from the given TOML file, falling back to
    /// defaults if the file does not exist, then applies environment
    /// overrides.
    pub fn load(path: &Path) -> Result<Self> {
        // .env is optional; a missing file is not an error
        dotenvy::dotenv().ok();

        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("failed to read {}: {}", path.display(), e))
            })?;
            toml::from_str(&contents).map_err(|e| {
                AppError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies `PAPI_*` environment variables over the loaded values.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }
        if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
            if !level.is_empty() {
                self.log_level = level;
            }
        }
    }

    /// The file the session token is persisted to.
    ///
    /// Explicit `token_file` wins; otherwise `<config dir>/papi/session.json`,
    /// degrading to a dotfile in the current directory when no platform
    /// config dir can be resolved.
    pub fn token_file_path(&self) -> PathBuf {
        if let Some(path) = &self.token_file {
            return path.clone();
        }
        match dirs::config_dir() {
            Some(dir) => dir.join("papi").join("session.json"),
            None => PathBuf::from(".papi-session.json"),
        }
    }
}
