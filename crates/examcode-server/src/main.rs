//! Examcode Server
//!
//! Resolves a patient's free-text imaging request to an exam code: keyword
//! classification picks the modality, the catalog gateway lists its exams and
//! a language model chooses among them.

use anyhow::{Context, Result};
use clap::Parser;
use examcode_server::telemetry::{init_tracing, install_metrics, shutdown_signal};
use examcode_server::{create_router, AppState, Cli, ServerConfig};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ServerConfig::load(&cli).context("invalid configuration")?;
    info!(
        "Catalog gateway {} ({:?} mode, {}s timeout)",
        config.catalog.url, config.catalog.fetch_mode, config.catalog.timeout_secs
    );
    if let Some(rules) = &config.rules_path {
        info!("Rules: {}", rules.display());
    }

    let state = AppState::from_config(&config, install_metrics()?)?;
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.listen, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("examcode-server {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            warn!("{} received, draining connections", signal);
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
