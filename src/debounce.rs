//! Quiet-period debouncing for text inputs.
//!
//! The host passes the current instant in; nothing here sleeps or spawns, so
//! a frame-driven UI can poll it every repaint.

use std::time::{Duration, Instant};

/// Default quiet period before a typed query is sent
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Holds the latest input until it has been stable for the quiet period
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// Record new input. Any pending value is replaced and its timer restarts.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.quiet, value));
    }

    /// Drop any pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the pending value if its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now >= *at => self.pending.take().map(|(_, v)| v),
            _ => None,
        }
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
