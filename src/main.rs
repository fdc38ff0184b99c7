#![forbid(unsafe_code)]

//! `scrim-coordinator` binary.
//!
//! Bootstraps configuration and credentials, builds the platform and
//! backend adapters, starts the background sweeps and serves the HTTP
//! ingestion endpoints until shutdown.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use scrim_coordinator::backend::rest::RestBackend;
use scrim_coordinator::config::GlobalConfig;
use scrim_coordinator::ingest::server;
use scrim_coordinator::orchestrator::{ban_tracker, expiry};
use scrim_coordinator::platform::rest::RestPlatform;
use scrim_coordinator::state::AppState;
use scrim_coordinator::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "scrim-coordinator",
    about = "Match session orchestrator",
    version,
    long_about = None
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the HTTP port from the configuration file.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("scrim-coordinator bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    config.load_credentials().await?;
    if config.ingest_secret.is_none() {
        info!("no ingestion secret configured; result signatures are not checked");
    }
    let config = Arc::new(config);
    info!(modes = config.modes.len(), "configuration loaded");

    // ── Build adapters and shared state ─────────────────
    let platform = Arc::new(RestPlatform::new(&config.platform)?);
    let backend = Arc::new(RestBackend::new(&config.backend)?);
    let state = Arc::new(AppState::new(Arc::clone(&config), platform, backend));
    let ct = state.shutdown.clone();

    // ── Background sweeps ───────────────────────────────
    let reset_handle = ban_tracker::spawn_reset_sweep(Arc::clone(&state), ct.child_token());
    let expiry_handle = expiry::spawn_expiry_sweep(Arc::clone(&state), ct.child_token());
    info!("background sweeps started");

    // ── HTTP ────────────────────────────────────────────
    let http_ct = ct.clone();
    let http_state = Arc::clone(&state);
    let http_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(http_state, http_ct).await {
            error!(%err, "http server failed");
        }
    });

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    let live = state.registry.len().await;
    if live > 0 {
        info!(sessions = live, "dropping in-flight sessions");
    }
    ct.cancel();

    let _ = tokio::join!(http_handle, reset_handle, expiry_handle);
    info!("scrim-coordinator shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
