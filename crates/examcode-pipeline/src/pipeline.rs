//! End-to-end exam code resolution
//!
//! classify -> fetch catalog -> select exam -> resolve code

use crate::catalog::CatalogSource;
use crate::selector::{ExamSelector, Selection};
use examcode_classifiers::ExamTypeClassifier;
use examcode_core::{ChatBackend, ClassificationResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Full exam resolution pipeline for one patient query at a time
#[derive(Clone)]
pub struct ExamPipeline {
    classifier: Arc<ExamTypeClassifier>,
    catalog: Arc<dyn CatalogSource>,
    selector: ExamSelector,
}

impl ExamPipeline {
    pub fn new(
        classifier: ExamTypeClassifier,
        catalog: Arc<dyn CatalogSource>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            classifier: Arc::new(classifier),
            catalog,
            selector: ExamSelector::new(backend),
        }
    }

    /// Resolve a query to {category, identifier, label, code}.
    ///
    /// Queries whose category has no catalog identifier return an empty
    /// result without any network call.
    pub async fn run(&self, text: &str) -> ClassificationResult {
        let start = Instant::now();

        let category = self.classifier.classify(text);
        metrics::counter!("examcode_classifications_total", "category" => category.category.clone())
            .increment(1);

        let Some(identifier) = category.identifier else {
            warn!("No catalog identifier for category {}", category.category);
            record_latency(start);
            return ClassificationResult::empty();
        };

        let catalog = self
            .catalog
            .fetch(Some(std::slice::from_ref(&identifier)))
            .await;
        info!(
            "Catalog for {} from {}: {} exams",
            identifier,
            self.catalog.name(),
            catalog.len()
        );

        let selection = self.selector.select(text, &catalog).await;
        metrics::counter!("examcode_selections_total", "outcome" => selection.outcome())
            .increment(1);

        let (selected_label, selected_code) = match selection {
            Selection::Matched(label) => {
                let code = catalog.code_for_label(&label).map(str::to_string);
                (Some(label), code)
            }
            Selection::NoMatch => (None, None),
            Selection::Failed(reason) => {
                warn!("No exam selected for identifier {}: {}", identifier, reason);
                (None, None)
            }
        };

        let result = ClassificationResult {
            category: Some(category.category),
            identifier: Some(identifier),
            selected_label,
            selected_code,
        };

        info!(
            "Final result: category {:?}, identifier {:?}, exam {:?}, exam code {:?}",
            result.category, result.identifier, result.selected_label, result.selected_code
        );
        record_latency(start);
        result
    }
}

fn record_latency(start: Instant) {
    metrics::histogram!("examcode_pipeline_latency_us").record(start.elapsed().as_micros() as f64);
}
