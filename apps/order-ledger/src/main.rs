//! Order Ledger Binary
//!
//! Starts the order-execution and portfolio-ledger engine with in-memory
//! adapters, seeds it from configuration and keeps instrument prices fresh
//! until shut down.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-ledger
//! ```
//!
//! # Environment Variables
//!
//! - `ORDER_LEDGER_CONFIG`: Path to the YAML config (default: `config.yaml`)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::time::Duration;

use anyhow::Context;
use order_ledger::config::{CONFIG_PATH_ENV, Config, DEFAULT_CONFIG_PATH, load_config_or_default};
use order_ledger::infrastructure::InMemoryContainer;
use order_ledger::observability::{MetricsConfig, init_metrics, init_tracing};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_config_or_default(Some(&config_path))
        .with_context(|| format!("loading configuration from {config_path}"))?;

    init_tracing(&config.observability.logging).context("initializing tracing")?;
    tracing::info!(config_path = %config_path, "Starting order ledger");
    log_config(&config);

    if config.observability.metrics.enabled {
        init_metrics(&MetricsConfig::with_addr(
            config.observability.metrics.listen_addr,
        ))
        .context("starting metrics exporter")?;
    }

    let container = InMemoryContainer::from_config(&config)
        .await
        .context("seeding the engine")?;

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let refresh_handle = start_quote_refresh(&container, &config, shutdown_tx.subscribe());

    tracing::info!("Order ledger ready");
    shutdown_signal().await;

    let _ = shutdown_tx.send(());
    if let Some(handle) = refresh_handle
        && let Err(e) = handle.await
    {
        tracing::warn!(error = %e, "Quote refresh task ended abnormally");
    }

    tracing::info!("Order ledger stopped");
    Ok(())
}

fn log_config(config: &Config) {
    tracing::info!(
        opening_balance = %config.engine.opening_balance,
        max_order_quantity = config.engine.max_order_quantity,
        commit_attempts = config.engine.commit_retry.max_attempts,
        instruments = config.instruments.len(),
        accounts = config.accounts.len(),
        quote_refresh_secs = config.quotes.refresh_interval_secs,
        metrics_enabled = config.observability.metrics.enabled,
        "Configuration loaded"
    );
}

/// Spawn the periodic quote refresh. Returns `None` when disabled.
fn start_quote_refresh(
    container: &InMemoryContainer,
    config: &Config,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<JoinHandle<()>> {
    let secs = config.quotes.refresh_interval_secs;
    if secs == 0 {
        tracing::info!("Quote refresh disabled");
        return None;
    }

    let refresh = container.refresh_quotes_use_case();
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(secs));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = refresh.refresh_active().await {
                        tracing::error!(error = %e, "Quote refresh failed");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Quote refresh stopping");
                    break;
                }
            }
        }
    }))
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// A handler that cannot be installed is logged and treated as never firing.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
