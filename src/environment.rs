// src/environment.rs
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const CONFIG_FILE_NAME: &str = "jobmatch.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: Option<EnvironmentConfig>,
    production: Option<EnvironmentConfig>,
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            timeout_seconds: default_timeout_secs(),
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration for the current environment from `jobmatch.yaml`
    /// in the working directory, then apply environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config = if config_path.exists() {
            let content =
                std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                    path: config_path.to_path_buf(),
                    source,
                })?;
            Self::from_yaml_str(&content, &environment)?
        } else {
            info!(
                "{} not found, using built-in defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())
    }

    fn get_environment() -> String {
        std::env::var("JOBMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Pick the section for `environment`; unknown names fall back to `local`
    pub fn from_yaml_str(content: &str, environment: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        let section = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(section.unwrap_or_default())
    }

    /// `JOBMATCH_API_URL` and `JOBMATCH_TIMEOUT_SECS` win over the file
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("JOBMATCH_API_URL") {
            self.backend_url = url;
        }

        if let Some(raw) = lookup("JOBMATCH_TIMEOUT_SECS") {
            self.timeout_seconds = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "JOBMATCH_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
        }

        Ok(self)
    }

    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.backend_url = url;
        }
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Port named in the "backend not running" message
    pub fn backend_port(&self) -> u16 {
        reqwest::Url::parse(&self.backend_url)
            .ok()
            .and_then(|url| url.port_or_known_default())
            .unwrap_or(8001)
    }
}
