//! Conversion progress rendering.
//!
//! The reporter is the decode engine's progress callback. It redraws a
//! single status line in place and hands the current cancellation decision
//! back to the engine.

use std::io::Write;

use tracing::debug;

use crate::cancel::CancellationToken;
use crate::engine::ProgressEvent;

/// Status text shown once cancellation has been requested.
pub const CLOSING_TEXT: &str = "Closing...";

/// Renders progress events to `out`.
///
/// Write errors are ignored: a broken terminal must not abort a conversion.
pub struct ProgressReporter<'a, W: Write> {
    out: &'a mut W,
    token: &'a CancellationToken,
    current_track: Option<i32>,
    events: u64,
}

impl<'a, W: Write> ProgressReporter<'a, W> {
    pub fn new(out: &'a mut W, token: &'a CancellationToken) -> Self {
        Self {
            out,
            token,
            current_track: None,
            events: 0,
        }
    }

    /// Handles one progress event.
    ///
    /// Writes `\r<percent>%` with two decimals while running, `\rClosing...`
    /// once cancelled, and returns whether the engine should keep going.
    pub fn report(&mut self, event: &ProgressEvent<'_>) -> bool {
        self.events += 1;
        let keep_going = self.token.should_continue();

        if self.current_track != Some(event.track) {
            self.current_track = Some(event.track);
            debug!(track = event.track, file = event.source_path, "Converting track");
        }

        if keep_going {
            write!(self.out, "\r{:.2}%", event.percent).ok();
        } else {
            write!(self.out, "\r{}", CLOSING_TEXT).ok();
        }
        self.out.flush().ok();

        keep_going
    }

    /// Number of events handled so far.
    pub fn events(&self) -> u64 {
        self.events
    }
}
