//! Azure OpenAI Chat Backend
//!
//! Calls the Azure flavour of the OpenAI chat completions API:
//! ```text
//! POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}
//! api-key: <key>
//!
//! {"messages":[{"role":"system","content":"..."},{"role":"user","content":"..."}]}
//! ```
//! and extracts `choices[0].message.content` from the reply.

use crate::chat::ChatBackend;
use crate::error::{Error, Result};
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// API version pinned for the deployment
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Model deployment used for exam selection
pub const DEFAULT_DEPLOYMENT: &str = "gpt-35-turbo";

/// Default bound on a single completion call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for an Azure OpenAI deployment
#[derive(Debug, Clone)]
pub struct AzureOpenAiConfig {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,

    /// API key sent in the `api-key` header
    pub api_key: String,

    /// Deployment (model) name
    pub deployment: String,

    /// `api-version` query parameter
    pub api_version: String,

    /// Request timeout
    pub timeout: Duration,
}

impl AzureOpenAiConfig {
    /// Create a config with the default deployment, API version and timeout
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Full chat completions URL for this deployment
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Chat backend talking to Azure OpenAI over HTTPS
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    config: AzureOpenAiConfig,
    http: reqwest::Client,
}

impl AzureOpenAiClient {
    /// Build a client; fails if the API key cannot be used as a header value
    pub fn new(config: AzureOpenAiConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let key = reqwest::header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| Error::config(format!("invalid Azure OpenAI API key: {}", e)))?;
        headers.insert("api-key", key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl ChatBackend for AzureOpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.deployment,
            messages,
        };

        let response = self
            .http
            .post(self.config.completions_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::Http(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::llm(format!(
                "completion request failed with status {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        debug!("Completion response received ({} bytes)", body.len());
        parse_completion(&body)
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

/// Extract the first choice's message content from a completion body
pub fn parse_completion(body: &str) -> Result<String> {
    let completion: CompletionResponse = serde_json::from_str(body)?;

    completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::llm("completion response contained no choices"))?
        .message
        .content
        .ok_or_else(|| Error::llm("completion choice has no content"))
}

// =============================================================================
// Azure OpenAI Request/Response Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}
