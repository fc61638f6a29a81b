//! Core types for odio-sacd.
//!
//! - [`ConversionRequest`]: validated command-line intent for one invocation
//! - [`DiscDetails`]: album and track metadata reported by the decode engine

mod disc;
mod request;

pub use disc::{AreaKind, DiscDetails, TrackDetails};
pub use request::{AreaSelector, ConversionRequest, SampleRate};
