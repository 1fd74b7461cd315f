use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use coinlens_core::{Aggregator, ReqwestHttpClient};
use coinlens_server::{router, ServerConfig, ServerError};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "coinlens server stopped");
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

async fn run() -> Result<(), ServerError> {
    let config = ServerConfig::parse();
    let addr = config.socket_addr();

    let aggregator = Aggregator::from_config(
        config.into_aggregator_config()?,
        Arc::new(ReqwestHttpClient::new()),
    )?;
    info!(price_provider = %aggregator.price_provider(), "aggregator ready");

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "coinlens server listening");

    axum::serve(listener, router(aggregator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
