//! Conversion orchestration.
//!
//! Sequences open, details-or-convert and close against a [`DecodeEngine`]
//! and renders the user-visible outcome. The orchestrator is synchronous:
//! the only concurrency is the cancellation token being flipped from the
//! signal watcher while `convert` blocks.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::cancel::CancellationToken;
use crate::details::print_details;
use crate::engine::{DecodeEngine, ProgressEvent};
use crate::error::Result;
use crate::progress::ProgressReporter;
use crate::types::ConversionRequest;

/// Lifecycle of one orchestrated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Created,
    Opened,
    Detailing,
    Converting,
    Closed,
    Failed,
}

impl SessionState {
    /// Returns true if the state ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }

    fn can_advance_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Created, Opened)
                | (Created, Failed)
                | (Opened, Detailing)
                | (Opened, Converting)
                | (Detailing, Closed)
                | (Converting, Closed)
                | (Converting, Failed)
        )
    }
}

/// How a successful session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Details were printed; nothing was converted.
    Details,
    /// Conversion ran to completion.
    Finished { elapsed: Duration },
    /// Conversion stopped early at the user's request.
    Cancelled,
}

/// Drives one request through a decode engine.
pub struct Orchestrator<E: DecodeEngine, W: Write> {
    engine: E,
    token: CancellationToken,
    out: W,
    state: SessionState,
}

impl<E: DecodeEngine, W: Write> Orchestrator<E, W> {
    pub fn new(engine: E, token: CancellationToken, out: W) -> Self {
        Self {
            engine,
            token,
            out,
            state: SessionState::Created,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid session transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "Session state");
        self.state = next;
    }

    /// Runs the request to a terminal state.
    ///
    /// Open and convert failures are rendered to the output before the error
    /// is returned. Close is called on every path after a successful open.
    pub fn run(&mut self, request: &ConversionRequest) -> Result<Outcome> {
        if let Err(e) = self.engine.open(request.input(), request.area) {
            error!(input = %request.input().display(), error = %e, "Open failed");
            self.advance(SessionState::Failed);
            writeln!(self.out).ok();
            writeln!(self.out, "{}", e).ok();
            self.out.flush().ok();
            return Err(e);
        }
        self.advance(SessionState::Opened);
        info!(input = %request.input().display(), area = %request.area, "Source opened");

        if request.details_only {
            self.advance(SessionState::Detailing);
            self.print_details();
            self.close();
            return Ok(Outcome::Details);
        }

        self.advance(SessionState::Converting);
        let result = self.convert(request);
        self.render(&result);
        self.close_after_convert(&result);
        result
    }

    fn print_details(&mut self) {
        match self.engine.disc_details() {
            Some(details) => {
                if let Err(e) = print_details(&mut self.out, details) {
                    error!(error = %e, "Failed to write disc details");
                }
            }
            None => info!("Source has no disc details"),
        }
    }

    fn convert(&mut self, request: &ConversionRequest) -> Result<Outcome> {
        let output_dir = request.effective_output_dir();
        info!(
            output = %output_dir.display(),
            rate = request.sample_rate.hz(),
            "Converting"
        );

        let started = Instant::now();
        let engine = &mut self.engine;
        let mut reporter = ProgressReporter::new(&mut self.out, &self.token);
        let converted = engine.convert(
            &output_dir,
            request.sample_rate,
            &mut |event: &ProgressEvent<'_>| reporter.report(event),
        );
        let events = reporter.events();
        let elapsed = started.elapsed();
        debug!(events, elapsed_ms = elapsed.as_millis() as u64, "Convert returned");

        // An engine may surface its own abort as an error
        if self.token.is_cancelled() {
            if let Err(e) = converted {
                debug!(error = %e, "Engine error after cancellation");
            }
            return Ok(Outcome::Cancelled);
        }

        converted.map(|()| Outcome::Finished { elapsed })
    }

    fn render(&mut self, result: &Result<Outcome>) {
        match result {
            Ok(Outcome::Finished { elapsed }) => {
                info!(seconds = elapsed.as_secs(), "Conversion finished");
                write!(self.out, "\rFinished in {} seconds.\n\n", elapsed.as_secs()).ok();
            }
            Ok(Outcome::Cancelled) => {
                info!("Conversion cancelled");
                write!(self.out, "\rCancelled.\n\n").ok();
            }
            Ok(Outcome::Details) => {}
            Err(e) => {
                error!(error = %e, "Conversion failed");
                write!(self.out, "\rConversion failed\n\n").ok();
            }
        }
        self.out.flush().ok();
    }

    fn close_after_convert(&mut self, result: &Result<Outcome>) {
        self.engine.close();
        let next = if result.is_ok() {
            SessionState::Closed
        } else {
            SessionState::Failed
        };
        self.advance(next);
    }

    fn close(&mut self) {
        self.engine.close();
        self.advance(SessionState::Closed);
    }

    /// Gives back the engine and output.
    pub fn into_parts(self) -> (E, W) {
        (self.engine, self.out)
    }
}
