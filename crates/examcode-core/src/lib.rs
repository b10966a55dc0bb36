//! examcode Core
//!
//! Core types, traits, and utilities shared across examcode components.
//!
//! This crate provides:
//! - Exam catalog and classification result types
//! - Error types and result handling
//! - The `ChatBackend` trait the exam selector talks to
//! - An Azure OpenAI implementation of that trait

pub mod adapters;
pub mod chat;
pub mod error;
pub mod types;

pub use adapters::{AzureOpenAiClient, AzureOpenAiConfig};
pub use chat::ChatBackend;
pub use error::{Error, Result};
pub use types::{ChatMessage, ClassificationResult, ExamCatalog, ExamEntry};
