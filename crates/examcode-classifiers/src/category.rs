//! Keyword-based category classifier

use crate::config::CategoryRule;
use aho_corasick::AhoCorasick;
use examcode_core::{Error, Result};

/// One category with its compiled keyword matcher
#[derive(Debug, Clone)]
struct CompiledCategory {
    name: String,
    identifier: Option<String>,
    keywords: AhoCorasick,
}

/// Substring classifier over an ordered category table.
///
/// Matching is case-insensitive: keywords and the haystack are both
/// lower-cased before search, which also covers accented capitals that
/// ASCII case folding would miss.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    categories: Vec<CompiledCategory>,
    default_category: String,
}

impl CategoryClassifier {
    /// Compile the category table
    pub fn new(rules: &[CategoryRule], default_category: impl Into<String>) -> Result<Self> {
        let categories = rules
            .iter()
            .map(|rule| {
                let keywords: Vec<String> =
                    rule.keywords.iter().map(|k| k.to_lowercase()).collect();
                let matcher = AhoCorasick::new(&keywords).map_err(|e| {
                    Error::rules(format!(
                        "failed to build keyword matcher for {}: {}",
                        rule.name, e
                    ))
                })?;
                Ok(CompiledCategory {
                    name: rule.name.clone(),
                    identifier: rule.identifier.clone(),
                    keywords: matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            categories,
            default_category: default_category.into(),
        })
    }

    /// First category (in table order) with a keyword contained in `text`,
    /// or the default category
    pub fn classify(&self, text: &str) -> &str {
        self.find(text)
            .map(|c| c.name.as_str())
            .unwrap_or(&self.default_category)
    }

    /// Category and identifier for `text`
    pub fn classify_with_identifier(&self, text: &str) -> (&str, Option<&str>) {
        match self.find(text) {
            Some(category) => (category.name.as_str(), category.identifier.as_deref()),
            None => (self.default_category.as_str(), None),
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    fn find(&self, text: &str) -> Option<&CompiledCategory> {
        let haystack = text.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.keywords.is_match(&haystack))
    }
}
