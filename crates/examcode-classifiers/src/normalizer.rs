//! Query text normalizer
//!
//! Lower-cases the patient's text and rewrites abbreviations and clinical
//! shorthand into canonical labelled phrases. Rules run in table order over
//! the current string, so a replacement may itself be rewritten by a later
//! rule.

use crate::config::NormalizationRule;
use examcode_core::{Error, Result};
use regex::{NoExpand, Regex, RegexBuilder};
use std::borrow::Cow;

/// Compiled, ordered rewrite table
#[derive(Debug, Clone)]
pub struct Normalizer {
    rules: Vec<(Regex, String)>,
}

impl Normalizer {
    /// Compile the rewrite rules; an invalid pattern is a rules error
    pub fn new(rules: &[NormalizationRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                let regex = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        Error::rules(format!(
                            "failed to compile normalization pattern '{}': {}",
                            rule.pattern, e
                        ))
                    })?;
                Ok((regex, rule.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Lower-case `text` then apply every rule in order
    pub fn normalize(&self, text: &str) -> String {
        self.apply_rules(&text.to_lowercase())
    }

    /// Apply every rule in order without lower-casing first
    pub fn apply_rules(&self, text: &str) -> String {
        let mut current = text.to_string();
        for (regex, replacement) in &self.rules {
            if let Cow::Owned(rewritten) = regex.replace_all(&current, NoExpand(replacement)) {
                current = rewritten;
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
