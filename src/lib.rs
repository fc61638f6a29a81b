//! odio-sacd: command-line control layer for SACD-to-PCM extraction.
//!
//! The disc parser and DSD decoder sit behind the [`engine::DecodeEngine`]
//! trait. This crate turns command-line intent into a
//! [`types::ConversionRequest`], drives the engine through open, details or
//! convert, and close, and lets termination signals cancel a running
//! conversion cooperatively.
//!
//! # Modules
//!
//! - [`cli`]: argument parsing (`-i`, `-o`, `-r`, `-s`, `-d`)
//! - [`cancel`] / [`signals`]: cancellation token and signal capture
//! - [`progress`] / [`details`]: user-facing rendering
//! - [`orchestrator`]: the session state machine
//! - [`app`]: one invocation, arguments to exit status
//!
//! # Example
//!
//! ```rust,ignore
//! use odio_sacd::{app, AppConfig, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let status = app::run(
//!     ["odio-sacd", "-i", "disc.iso", "-d"],
//!     &AppConfig::default(),
//!     my_engine,
//!     &token,
//!     &mut std::io::stdout(),
//! );
//! ```

pub mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod details;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod signals;
pub mod types;

// Re-export commonly used types at crate root for convenience
pub use cancel::CancellationToken;
pub use config::AppConfig;
pub use engine::{DecodeEngine, ProgressEvent};
pub use error::{ErrorCode, Result, SacdError};
pub use orchestrator::{Orchestrator, Outcome, SessionState};
pub use types::{AreaSelector, ConversionRequest, DiscDetails, SampleRate, TrackDetails};
