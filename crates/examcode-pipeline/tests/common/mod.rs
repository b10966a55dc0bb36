//! Mock backends for pipeline tests
//!
//! Scripted implementations of `ChatBackend` and `CatalogSource` that count
//! their calls and record what they were asked.

#![allow(dead_code)]

use async_trait::async_trait;
use examcode_core::{ChatBackend, ChatMessage, Error, ExamCatalog, Result};
use examcode_pipeline::CatalogSource;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Chat backend answering every request with the same text
pub struct MockChatBackend {
    answer: String,
    call_count: AtomicU32,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl MockChatBackend {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            call_count: AtomicU32::new(0),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_messages.lock().unwrap() = messages.to_vec();
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Chat backend that always fails
pub struct FailingChatBackend {
    call_count: AtomicU32,
}

impl FailingChatBackend {
    pub fn new() -> Self {
        Self {
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ChatBackend for FailingChatBackend {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Err(Error::llm("simulated backend outage"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Catalog source returning a fixed catalog
pub struct MockCatalogSource {
    catalog: ExamCatalog,
    call_count: AtomicU32,
    requested: Mutex<Vec<Option<Vec<String>>>>,
}

impl MockCatalogSource {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            catalog: entries.iter().copied().collect(),
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn requested(&self) -> Vec<Option<Vec<String>>> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for MockCatalogSource {
    async fn fetch(&self, identifiers: Option<&[String]>) -> ExamCatalog {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requested
            .lock()
            .unwrap()
            .push(identifiers.map(|ids| ids.to_vec()));
        self.catalog.clone()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Knee and thorax CT exams
pub fn ct_catalog() -> MockCatalogSource {
    MockCatalogSource::new(&[
        ("CT01", "Scanner du genou"),
        ("CT02", "Scanner du thorax"),
        ("CT03", "Scanner cérébral"),
    ])
}
