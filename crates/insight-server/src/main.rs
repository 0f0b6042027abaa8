//! `insight-gateway` binary

use anyhow::Context;
use clap::Parser;
use insight_core::{AnalysisOrchestrator, DigestEngine, RunLogCurator};
use insight_server::{router, AppState, Cli, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_cli(Cli::parse()).context("failed to resolve project root")?;
    let orchestrator = AnalysisOrchestrator::new(
        config.project_root.clone(),
        Arc::new(DigestEngine::new()),
        Arc::new(RunLogCurator::default()),
    );

    let bind_addr = config.bind_addr;
    tracing::info!(
        %bind_addr,
        root = %config.project_root.path().display(),
        api_key_required = config.auth.is_required(),
        version = insight_server::VERSION,
        "starting insight gateway"
    );

    let app = router(AppState::new(config, orchestrator));
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("insight gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
