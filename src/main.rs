//! odio-sacd: extract SACD ISO, DSF and DFF audio to PCM WAVE files.
//!
//! Termination signals request a cooperative stop: the decode engine winds
//! down, the tool prints "Cancelled." and exits successfully.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::warn;

use odio_sacd::app;
use odio_sacd::cancel::CancellationToken;
use odio_sacd::config::AppConfig;
use odio_sacd::signals::spawn_signal_watcher;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config = AppConfig::from_env();
    init_logging(&config)?;
    if let Some(problem) = config.validate() {
        warn!("{}, using {}", problem, odio_sacd::config::DEFAULT_LOG_FILTER);
    }

    let token = CancellationToken::new();

    // Signals are observed on a small runtime; conversion stays on this thread
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("odio-sacd-signals")
        .enable_all()
        .build()
        .context("failed to start the signal runtime")?;
    let _watcher = spawn_signal_watcher(&runtime, token.clone())
        .context("failed to install termination signal handlers")?;

    let mut stdout = io::stdout().lock();
    let status = app::run(std::env::args_os(), &config, engine(), &token, &mut stdout);

    runtime.shutdown_background();
    Ok(ExitCode::from(status))
}

/// Sends diagnostics to stderr so stdout carries only user output.
fn init_logging(config: &AppConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(anyhow::Error::msg)
        .context("failed to initialise logging")
}

#[cfg(feature = "libodiosacd")]
fn engine() -> odio_sacd::engine::ffi::LibOdioSacd {
    odio_sacd::engine::ffi::LibOdioSacd::new()
}

#[cfg(not(feature = "libodiosacd"))]
fn engine() -> odio_sacd::engine::UnavailableEngine {
    odio_sacd::engine::UnavailableEngine
}
