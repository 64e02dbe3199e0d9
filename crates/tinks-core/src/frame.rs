#![forbid(unsafe_code)]

//! Frame coalescing for high-frequency scroll notifications.
//!
//! Browsers can deliver many `scroll` events between two paints. Recomputing
//! the active card for each of them wastes work and can flicker the `dimmed`
//! modifier. [`FrameCoalescer`] collapses a burst into a single recomputation
//! on the next rendering frame.
//!
//! # Design
//!
//! A single pending flag guards one scheduled recomputation:
//! - the first notification of a frame sets the flag and asks the caller to
//!   request a frame callback,
//! - later notifications see the flag and are absorbed,
//! - the flag is cleared only when the frame callback actually runs.
//!
//! Nothing about the scroll position is stored here. The recomputation reads
//! geometry when it runs, so it always observes the latest position.
//!
//! # Usage
//!
//! ```
//! use tinks_core::frame::FrameCoalescer;
//!
//! let mut frames = FrameCoalescer::new();
//!
//! // First notification schedules, the rest are absorbed.
//! assert!(frames.notify());
//! assert!(!frames.notify());
//! assert!(!frames.notify());
//!
//! // The frame callback runs the recomputation exactly once.
//! assert!(frames.take_pending());
//! assert!(!frames.take_pending());
//! ```

/// Debounces notifications to one run per rendering frame.
///
/// Not thread-safe; lives on the single event-handling thread.
#[derive(Debug, Clone, Default)]
pub struct FrameCoalescer {
    pending: bool,
    stats: FrameStats,
}

/// Counters for host instrumentation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Notifications received.
    pub notified: u64,
    /// Notifications absorbed because a run was already pending.
    pub absorbed: u64,
    /// Frame callbacks requested from the host.
    pub requested: u64,
    /// Recomputations actually run.
    pub ran: u64,
}

impl FrameCoalescer {
    /// Create an idle coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a notification.
    ///
    /// Returns `true` if the caller must request a frame callback, `false`
    /// if one is already pending.
    pub fn notify(&mut self) -> bool {
        self.stats.notified = self.stats.notified.saturating_add(1);
        if self.pending {
            self.stats.absorbed = self.stats.absorbed.saturating_add(1);
            return false;
        }
        self.pending = true;
        self.stats.requested = self.stats.requested.saturating_add(1);
        true
    }

    /// Called from the frame callback.
    ///
    /// Returns `true` (and clears the flag) if a recomputation should run now.
    /// A spurious frame with nothing pending returns `false`.
    pub fn take_pending(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.stats.ran = self.stats.ran.saturating_add(1);
        true
    }

    /// Whether a recomputation is scheduled but has not run yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Counters since creation.
    #[must_use]
    pub const fn stats(&self) -> FrameStats {
        self.stats
    }
}
