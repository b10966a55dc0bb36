//! Chat Backend Adapters
//!
//! Concrete `ChatBackend` implementations for hosted language models.

mod azure_openai;

pub use azure_openai::{
    parse_completion, AzureOpenAiClient, AzureOpenAiConfig, DEFAULT_API_VERSION,
    DEFAULT_DEPLOYMENT, DEFAULT_TIMEOUT,
};
