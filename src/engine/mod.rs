//! Decode engine seam.
//!
//! The disc parser, DSD-to-PCM pipeline and WAV writer live behind
//! [`DecodeEngine`]. The orchestrator only ever calls open, details,
//! convert and close, in that order.

#[cfg(test)]
pub(crate) mod fake;
#[cfg(feature = "libodiosacd")]
pub mod ffi;

use std::path::Path;

use crate::error::Result;
use crate::types::{AreaSelector, DiscDetails, SampleRate};

/// A progress notification from a running conversion.
///
/// Borrowed from the engine for the duration of one callback. Events are not
/// guaranteed to be monotonic or evenly spaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent<'a> {
    /// Completion of the current run, 0.0 to 100.0.
    pub percent: f32,
    /// File currently being written.
    pub source_path: &'a str,
    /// Track currently being decoded.
    pub track: i32,
}

/// Progress callback handed to [`DecodeEngine::convert`].
///
/// Returning `false` asks the engine to abort and unwind.
pub type ProgressCallback<'a> = dyn for<'e> FnMut(&ProgressEvent<'e>) -> bool + 'a;

/// Operations of an SACD decode engine.
pub trait DecodeEngine {
    /// Opens the source and selects the area to extract.
    ///
    /// On failure the engine holds no resources and `close` need not be
    /// called.
    fn open(&mut self, path: &Path, area: AreaSelector) -> Result<()>;

    /// Returns the disc metadata read by `open`, if the source has any.
    fn disc_details(&self) -> Option<&DiscDetails>;

    /// Converts the selected area into PCM files under `output_dir`.
    ///
    /// Blocks until finished. `on_progress` is invoked synchronously, zero or
    /// more times; once it returns `false` the engine must stop early.
    fn convert(
        &mut self,
        output_dir: &Path,
        sample_rate: SampleRate,
        on_progress: &mut ProgressCallback<'_>,
    ) -> Result<()>;

    /// Releases everything acquired by `open`. Safe to call more than once.
    fn close(&mut self);
}

impl<E: DecodeEngine + ?Sized> DecodeEngine for &mut E {
    fn open(&mut self, path: &Path, area: AreaSelector) -> Result<()> {
        (**self).open(path, area)
    }

    fn disc_details(&self) -> Option<&DiscDetails> {
        (**self).disc_details()
    }

    fn convert(
        &mut self,
        output_dir: &Path,
        sample_rate: SampleRate,
        on_progress: &mut ProgressCallback<'_>,
    ) -> Result<()> {
        (**self).convert(output_dir, sample_rate, on_progress)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Engine used when the binary is built without one.
///
/// Every `open` fails with ENGINE_UNAVAILABLE.
#[derive(Debug, Default)]
pub struct UnavailableEngine;

impl DecodeEngine for UnavailableEngine {
    fn open(&mut self, _path: &Path, _area: AreaSelector) -> Result<()> {
        Err(crate::error::SacdError::engine_unavailable())
    }

    fn disc_details(&self) -> Option<&DiscDetails> {
        None
    }

    fn convert(
        &mut self,
        _output_dir: &Path,
        _sample_rate: SampleRate,
        _on_progress: &mut ProgressCallback<'_>,
    ) -> Result<()> {
        Err(crate::error::SacdError::engine_unavailable())
    }

    fn close(&mut self) {}
}
