//! Logging, metrics registration and shutdown signals for the server binary

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tokio::signal;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log directives used when `--verbose` is set; `RUST_LOG` is ignored then
pub const VERBOSE_DIRECTIVES: &str = "examcode=debug,tower_http=debug";

/// Log directives used when neither `--verbose` nor `RUST_LOG` is set
pub const DEFAULT_DIRECTIVES: &str = "examcode=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Histogram,
}

/// Every metric the service records, with its help text
pub const METRICS: &[(&str, MetricKind, &str)] = &[
    (
        "examcode_requests_total",
        MetricKind::Counter,
        "Exam code requests received",
    ),
    (
        "examcode_errors_total",
        MetricKind::Counter,
        "Rejected or failed requests by kind",
    ),
    (
        "examcode_classifications_total",
        MetricKind::Counter,
        "Classifications by resulting category",
    ),
    (
        "examcode_selections_total",
        MetricKind::Counter,
        "Language model selections by outcome",
    ),
    (
        "examcode_pipeline_latency_us",
        MetricKind::Histogram,
        "End-to-end pipeline latency in microseconds",
    ),
];

/// Filter for the fmt subscriber
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_DIRECTIVES);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_tracing(verbose: bool) {
    tracing_subscriber::registry()
        .with(log_filter(verbose))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Install the global Prometheus recorder and describe the service metrics
pub fn install_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    for &(name, kind, help) in METRICS {
        match kind {
            MetricKind::Counter => metrics::describe_counter!(name, help),
            MetricKind::Histogram => {
                metrics::describe_histogram!(name, metrics::Unit::Microseconds, help)
            }
        }
    }

    Ok(handle)
}

/// Resolve on Ctrl-C or SIGTERM, returning the signal's name.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() -> &'static str {
    tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = terminate() => "SIGTERM",
    }
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            warn!("SIGTERM handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
