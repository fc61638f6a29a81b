//! Termination signal capture.
//!
//! Translates SIGTERM, SIGINT and SIGQUIT (Ctrl-C elsewhere) into a
//! cancellation request on a [`CancellationToken`]. The OS-level handler is
//! tokio's, which only records the delivery; the token is flipped by an
//! async task on the runtime, so logging here is safe.

use std::io;

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cancel::CancellationToken;

/// Which termination signal arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Terminate,
    Interrupt,
    Quit,
}

impl TerminationSignal {
    /// Returns the conventional signal name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationSignal::Terminate => "SIGTERM",
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Quit => "SIGQUIT",
        }
    }
}

/// Registered listeners for the termination signals.
///
/// Must be created inside a tokio runtime context.
#[cfg(unix)]
pub struct TerminationSignals {
    terminate: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    /// Installs handlers for all three signals.
    pub fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Waits for the next signal. Returns `None` once the runtime stops
    /// delivering signals.
    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::select! {
            r = self.terminate.recv() => r.map(|_| TerminationSignal::Terminate),
            r = self.interrupt.recv() => r.map(|_| TerminationSignal::Interrupt),
            r = self.quit.recv() => r.map(|_| TerminationSignal::Quit),
        }
    }
}

/// Registered listener for Ctrl-C on platforms without POSIX signals.
#[cfg(not(unix))]
pub struct TerminationSignals;

#[cfg(not(unix))]
impl TerminationSignals {
    pub fn install() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) -> Option<TerminationSignal> {
        tokio::signal::ctrl_c()
            .await
            .ok()
            .map(|_| TerminationSignal::Interrupt)
    }
}

/// Installs the signal handlers and spawns the task that forwards every
/// delivery to `token`.
///
/// Handlers are registered before this returns, so a signal arriving right
/// after the call is never lost.
pub fn spawn_signal_watcher(
    runtime: &Runtime,
    token: CancellationToken,
) -> io::Result<JoinHandle<()>> {
    let mut signals = {
        let _guard = runtime.enter();
        TerminationSignals::install()?
    };

    Ok(runtime.spawn(async move {
        while let Some(signal) = signals.recv().await {
            if token.cancel() {
                info!(signal = signal.as_str(), "Cancellation requested");
            } else {
                debug!(signal = signal.as_str(), "Cancellation already requested");
            }
        }
    }))
}
