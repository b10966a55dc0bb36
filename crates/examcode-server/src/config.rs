//! Server configuration
//!
//! Values come from an optional YAML file, then CLI flags and environment
//! variables override them. The Azure OpenAI endpoint and key are required
//! and only ever come from the CLI or environment.

use examcode_core::adapters::{DEFAULT_API_VERSION, DEFAULT_DEPLOYMENT, DEFAULT_TIMEOUT};
use examcode_core::AzureOpenAiConfig;
use examcode_pipeline::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;

/// Configuration errors detected at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid {name} URL '{value}': {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must not be empty")]
    Missing(&'static str),

    #[error("{0} timeout must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional rule set file
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Catalog gateway settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Azure OpenAI credentials, never read from the file
    #[serde(skip)]
    pub azure: AzureCredentials,
}

/// Language model deployment settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Deployment (model) name
    #[serde(default = "default_deployment")]
    pub deployment: String,

    /// Azure OpenAI API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Completion timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            deployment: default_deployment(),
            api_version: default_api_version(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Endpoint and key for Azure OpenAI
#[derive(Clone, Default)]
pub struct AzureCredentials {
    pub endpoint: String,
    pub api_key: String,
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides, then validate it
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file_or_default(&cli.config)?;

        if let Some(listen) = &cli.listen {
            config.listen = listen.clone();
        }
        if let Some(port) = cli.port {
            config.port = port;
        }
        if let Some(rules) = &cli.rules {
            config.rules_path = Some(rules.clone());
        }
        if let Some(url) = &cli.catalog_url {
            config.catalog.url = url.clone();
        }

        config.azure = AzureCredentials {
            endpoint: cli.azure_endpoint.clone(),
            api_key: cli.azure_api_key.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Read the YAML file if it exists, otherwise use defaults
    pub fn from_file_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fail fast on values that would only break at the first request
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.azure.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("AZURE_OPENAI_ENDPOINT"));
        }
        if self.azure.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("AZURE_OPENAI_API_KEY"));
        }
        validate_http_url("Azure OpenAI endpoint", &self.azure.endpoint)?;
        validate_http_url("catalog", &self.catalog.url)?;

        if self.llm.deployment.trim().is_empty() {
            return Err(ConfigError::Missing("llm.deployment"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("catalog"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("llm"));
        }
        Ok(())
    }

    /// Chat client settings
    pub fn azure_openai(&self) -> AzureOpenAiConfig {
        AzureOpenAiConfig {
            endpoint: self.azure.endpoint.clone(),
            api_key: self.azure.api_key.clone(),
            deployment: self.llm.deployment.clone(),
            api_version: self.llm.api_version.clone(),
            timeout: Duration::from_secs(self.llm.timeout_secs),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            rules_path: None,
            catalog: CatalogConfig::default(),
            llm: LlmConfig::default(),
            azure: AzureCredentials::default(),
        }
    }
}

fn validate_http_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(invalid(format!("unsupported scheme '{}'", scheme))),
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_deployment() -> String {
    DEFAULT_DEPLOYMENT.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_llm_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
