//! examcode Pipeline
//!
//! Turns a patient's free-text request into an exam code:
//! - the query is classified into an imaging category (`examcode-classifiers`)
//! - the catalog of exams for that category is fetched from the gateway
//! - a language model picks the best exam label from the catalog
//! - the label is resolved back to its exam code

pub mod catalog;
pub mod pipeline;
pub mod selector;

pub use catalog::{
    parse_listing, CatalogConfig, CatalogSource, FetchMode, GatewayCatalogFetcher,
    DEFAULT_CATALOG_TIMEOUT, DEFAULT_CATALOG_URL,
};
pub use pipeline::ExamPipeline;
pub use selector::{ExamSelector, Selection, NO_MATCH_TOKEN};
