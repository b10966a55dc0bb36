//! Core types for examcode

use serde::{Deserialize, Serialize};

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system or user)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// One exam offered by the imaging center, as listed by the catalog gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamEntry {
    /// Exam code
    pub code: String,

    /// Human-readable exam label
    #[serde(rename = "libelle")]
    pub label: String,
}

/// Exam code to exam label mapping for one identifier.
///
/// Codes are unique. Entries keep the order in which the gateway listed
/// them, so the label list and the reverse lookup are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamCatalog {
    entries: Vec<ExamEntry>,
}

impl ExamCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an exam, replacing the label of an existing code in place
    pub fn insert(&mut self, code: impl Into<String>, label: impl Into<String>) {
        let code = code.into();
        let label = label.into();
        match self.entries.iter_mut().find(|e| e.code == code) {
            Some(existing) => existing.label = label,
            None => self.entries.push(ExamEntry { code, label }),
        }
    }

    /// Merge another catalog into this one
    pub fn extend(&mut self, other: ExamCatalog) {
        for entry in other.entries {
            self.insert(entry.code, entry.label);
        }
    }

    /// Label for a code
    pub fn label(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.label.as_str())
    }

    /// First code whose label is exactly `label` (case-sensitive, untrimmed)
    pub fn code_for_label(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.code.as_str())
    }

    /// All labels in catalog order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ExamEntry> for ExamCatalog {
    fn from_iter<I: IntoIterator<Item = ExamEntry>>(iter: I) -> Self {
        let mut catalog = ExamCatalog::new();
        for entry in iter {
            catalog.insert(entry.code, entry.label);
        }
        catalog
    }
}

impl<C: Into<String>, L: Into<String>> FromIterator<(C, L)> for ExamCatalog {
    fn from_iter<I: IntoIterator<Item = (C, L)>>(iter: I) -> Self {
        let mut catalog = ExamCatalog::new();
        for (code, label) in iter {
            catalog.insert(code, label);
        }
        catalog
    }
}

/// Outcome of classifying a single patient query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Exam category (RADIO, SCANNER, ...)
    pub category: Option<String>,

    /// Catalog identifier tied to the category (RX, CT, ...)
    pub identifier: Option<String>,

    /// Exam label chosen by the selector
    pub selected_label: Option<String>,

    /// Exam code resolved from the chosen label
    pub selected_code: Option<String>,
}

impl ClassificationResult {
    /// Result with every field absent
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when no field is populated
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.identifier.is_none()
            && self.selected_label.is_none()
            && self.selected_code.is_none()
    }
}
