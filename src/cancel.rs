//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a one-way latch: once cancellation has been
//! requested it stays requested for the rest of the process. The write side
//! is a single atomic store, so it is safe from a signal-delivery context
//! and from any thread. The read side is what the progress callback hands
//! back to the decode engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cloneable cancellation flag.
///
/// Clones observe the same latch.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token in the "continue" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    ///
    /// Returns true only for the call that flipped the latch; later calls
    /// are no-ops and return false. No allocation, no locking, no I/O.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Returns true once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns true while no cancellation has been requested.
    ///
    /// This is the value returned to the decode engine from every progress
    /// callback.
    pub fn should_continue(&self) -> bool {
        !self.is_cancelled()
    }
}
