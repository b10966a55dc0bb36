//! Exam type classification: normalization followed by category lookup

use crate::category::CategoryClassifier;
use crate::config::RuleSet;
use crate::normalizer::Normalizer;
use examcode_core::Result;
use tracing::{debug, info, warn};

/// Result of classifying a query into an exam category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    /// Matched category, or the default category
    pub category: String,

    /// Catalog identifier for the category
    pub identifier: Option<String>,

    /// Normalized text; absent when the input was blank
    pub normalized: Option<String>,
}

/// Deterministic first stage of the pipeline
#[derive(Debug, Clone)]
pub struct ExamTypeClassifier {
    normalizer: Normalizer,
    categories: CategoryClassifier,
}

impl ExamTypeClassifier {
    /// Compile a classifier from a rule set
    pub fn new(rules: &RuleSet) -> Result<Self> {
        rules.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(&rules.normalization)?,
            categories: CategoryClassifier::new(&rules.categories, rules.default_category.clone())?,
        })
    }

    /// Classify a raw patient query. Never fails: blank input yields the
    /// default category without normalization.
    pub fn classify(&self, text: &str) -> CategoryMatch {
        if text.trim().is_empty() {
            warn!("Empty or blank query text, using default category");
            return CategoryMatch {
                category: self.categories.default_category().to_string(),
                identifier: None,
                normalized: None,
            };
        }

        let normalized = self.normalizer.normalize(text);
        debug!("Normalized query: {}", normalized);

        let (category, identifier) = self.categories.classify_with_identifier(&normalized);
        if category == self.categories.default_category() {
            info!("No exam type found, using default category {}", category);
        } else {
            info!("Exam type identified: {}", category);
        }

        CategoryMatch {
            category: category.to_string(),
            identifier: identifier.map(str::to_string),
            normalized: Some(normalized),
        }
    }
}
