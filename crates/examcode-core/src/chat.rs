//! Chat Backend
//!
//! The seam between the exam selector and whatever language model answers
//! chat completions. The pipeline only ever holds an `Arc<dyn ChatBackend>`,
//! so tests substitute scripted backends for the real client.

use crate::error::Result;
use crate::types::ChatMessage;
use async_trait::async_trait;

/// Trait for chat completion backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send the conversation and return the assistant's text reply
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Backend name used in logs
    fn name(&self) -> &str;
}
