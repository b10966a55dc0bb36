//! Application state shared across requests

use anyhow::{Context, Result};
use examcode_classifiers::{load_rules, ExamTypeClassifier};
use examcode_core::AzureOpenAiClient;
use examcode_pipeline::{ExamPipeline, GatewayCatalogFetcher};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// Application state cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Exam resolution pipeline
    pub pipeline: Arc<ExamPipeline>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(pipeline: ExamPipeline, metrics_handle: PrometheusHandle) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            metrics_handle,
        }
    }

    /// Build the pipeline and its clients from configuration
    pub fn from_config(config: &ServerConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        let rules = load_rules(config.rules_path.as_deref())?;
        info!(
            "Loaded {} normalization rules and {} categories",
            rules.normalization.len(),
            rules.categories.len()
        );

        let classifier =
            ExamTypeClassifier::new(&rules).context("failed to compile classification rules")?;

        let catalog = GatewayCatalogFetcher::new(config.catalog.clone(), rules.identifiers.clone());
        info!("Catalog gateway: {}", config.catalog.url);

        let backend = AzureOpenAiClient::new(config.azure_openai())
            .context("failed to create Azure OpenAI client")?;
        info!(
            "Language model: deployment {} (api-version {})",
            config.llm.deployment, config.llm.api_version
        );

        let pipeline = ExamPipeline::new(classifier, Arc::new(catalog), Arc::new(backend));
        Ok(Self::new(pipeline, metrics_handle))
    }
}
