//! Configuration management for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use bidscope_extractor::{ExtractorConfig, FailurePolicy};
use bidscope_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pipeline settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Chat-completions endpoint settings
    #[serde(default)]
    pub backend: BackendSettings,
}

/// Chat-completions endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// HTTP timeout per request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Attempts per request; 1 disables retry
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl BackendSettings {
    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".bidscope").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default path.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!("No config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply command-line overrides on top of file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(chunk_size) = cli.chunk_size {
            self.extractor.chunk_size = chunk_size;
        }
        if let Some(schema) = cli.schema {
            self.extractor.schema = schema.into();
        }
        if let Some(model) = &cli.model {
            self.extractor.model_id = model.clone();
        }
        if cli.halt_on_error {
            self.extractor.failure_policy = FailurePolicy::HaltOnError;
        }
        if let Some(endpoint) = &cli.endpoint {
            self.backend.endpoint = endpoint.clone();
        }
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        if self.backend.endpoint.trim().is_empty() {
            return Err(CliError::Config("backend endpoint must not be empty".into()));
        }
        if self.backend.request_timeout_secs == 0 {
            return Err(CliError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
