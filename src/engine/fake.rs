//! Scripted decode engine for tests.

use std::path::{Path, PathBuf};

use super::{DecodeEngine, ProgressCallback, ProgressEvent};
use crate::cancel::CancellationToken;
use crate::error::{Result, SacdError};
use crate::types::{AreaSelector, DiscDetails, SampleRate};

/// An engine call, as recorded by [`FakeEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Open(PathBuf, AreaSelector),
    Convert(PathBuf, SampleRate),
    Close,
}

/// Replays a fixed progress script and records every call.
#[derive(Debug, Default)]
pub struct FakeEngine {
    pub calls: Vec<Call>,
    pub details: Option<DiscDetails>,
    pub fail_open: bool,
    pub fail_convert: bool,
    /// Percentages reported during convert, in order.
    pub progress: Vec<f32>,
    /// Cancels this token after the given number of progress events,
    /// standing in for a signal arriving mid-conversion.
    pub cancel_after: Option<(usize, CancellationToken)>,
    /// Report an error instead of success when the callback asks to stop.
    pub error_on_abort: bool,
    /// Number of progress events that were delivered.
    pub delivered: usize,
    pub detail_queries: std::cell::Cell<usize>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_details(details: DiscDetails) -> Self {
        Self {
            details: Some(details),
            ..Self::default()
        }
    }

    pub fn details_queries(&self) -> usize {
        self.detail_queries.get()
    }

    pub fn converted(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, Call::Convert(..)))
    }

    pub fn closed(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, Call::Close))
    }

    pub fn opened(&self) -> bool {
        self.calls.iter().any(|c| matches!(c, Call::Open(..)))
    }
}

impl DecodeEngine for FakeEngine {
    fn open(&mut self, path: &Path, area: AreaSelector) -> Result<()> {
        self.calls.push(Call::Open(path.to_path_buf(), area));
        if self.fail_open {
            return Err(SacdError::open_failed(path.display().to_string()));
        }
        Ok(())
    }

    fn disc_details(&self) -> Option<&DiscDetails> {
        self.detail_queries.set(self.detail_queries.get() + 1);
        self.details.as_ref()
    }

    fn convert(
        &mut self,
        output_dir: &Path,
        sample_rate: SampleRate,
        on_progress: &mut ProgressCallback<'_>,
    ) -> Result<()> {
        self.calls
            .push(Call::Convert(output_dir.to_path_buf(), sample_rate));

        let source = output_dir.join("01 - Track.wav");
        let source = source.to_string_lossy();

        for (i, percent) in self.progress.iter().copied().enumerate() {
            if let Some((after, ref token)) = self.cancel_after {
                if i == after {
                    token.cancel();
                }
            }

            let event = ProgressEvent {
                percent,
                source_path: &source,
                track: 1,
            };
            self.delivered += 1;

            if !on_progress(&event) {
                if self.error_on_abort {
                    return Err(SacdError::convert_failed("aborted"));
                }
                return Ok(());
            }
        }

        if self.fail_convert {
            return Err(SacdError::convert_failed("disk full"));
        }
        Ok(())
    }

    fn close(&mut self) {
        self.calls.push(Call::Close);
    }
}
