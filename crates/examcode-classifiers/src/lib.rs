//! examcode Classifiers
//!
//! Deterministic first stage of exam code resolution.
//!
//! A patient query is lower-cased, rewritten through an ordered table of
//! regex rules that expand clinical shorthand, then matched against keyword
//! sets to pick an imaging category (RADIO, SCANNER, IRM, ...). The
//! category's identifier selects which catalog the gateway is asked for.

pub mod category;
pub mod classifier;
pub mod config;
pub mod normalizer;

pub use category::CategoryClassifier;
pub use classifier::{CategoryMatch, ExamTypeClassifier};
pub use config::{load_rules, CategoryRule, NormalizationRule, RuleSet, DEFAULT_CATEGORY};
pub use normalizer::Normalizer;
