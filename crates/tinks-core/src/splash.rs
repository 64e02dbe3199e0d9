#![forbid(unsafe_code)]

//! Splash overlay dismissal.
//!
//! [`SplashSequencer`] is a one-shot, forward-only timer chain:
//!
//! ```text
//! Visible --display--> Fading --fade--> Removed/Entered --settle--> Settled
//! ```
//!
//! - `Fading`: the overlay gets the fade-out class.
//! - `Removed`: the overlay is detached once the fade transition is over.
//! - `Entered`: the body gets the page-loaded class, enabling entrance
//!   animations. With a zero entrance delay this happens in the same step as
//!   the removal.
//! - `Settled`: initial dimming is due. The sequencer does not dim anything
//!   itself; the runner hands that to the tracker.
//!
//! # Invariants
//!
//! 1. Phases only move forward; each step fires only from its predecessor.
//! 2. At most one timer is outstanding at any time.
//! 3. There is no cancellation path.
//!
//! # Failure Modes
//!
//! - Duplicate or stale timer callbacks are ignored.
//! - A missing overlay element makes the fade and removal mutations no-ops;
//!   the entrance and settle steps still happen.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::{ClassNames, SplashTimings};
use crate::tree::{Node, VisualTree};

/// Timer steps of the sequence, delivered back by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplashStep {
    /// Display time is over; start fading.
    Fade,
    /// Fade transition is over; detach the overlay.
    Detach,
    /// Trigger page entrance effects.
    Enter,
    /// Entrance animations are over; apply initial dimming.
    Settle,
}

/// Sequencer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SplashPhase {
    Visible,
    Fading,
    Removed,
    Entered,
    Settled,
}

impl SplashPhase {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Fading => "fading",
            Self::Removed => "removed",
            Self::Entered => "entered",
            Self::Settled => "settled",
        }
    }
}

/// A timer the host must start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashTimer {
    pub delay: Duration,
    pub step: SplashStep,
}

/// Result of firing one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashTransition {
    /// Phase after the step.
    pub phase: SplashPhase,
    /// Next timer to start, if the chain continues.
    pub next: Option<SplashTimer>,
}

/// One-shot splash timer chain.
#[derive(Debug, Clone)]
pub struct SplashSequencer {
    timings: SplashTimings,
    phase: SplashPhase,
    started: bool,
}

impl SplashSequencer {
    #[must_use]
    pub const fn new(timings: SplashTimings) -> Self {
        Self {
            timings,
            phase: SplashPhase::Visible,
            started: false,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> SplashPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub const fn timings(&self) -> &SplashTimings {
        &self.timings
    }

    /// Start the chain. Returns the first timer, or `None` if already started.
    pub fn start(&mut self) -> Option<SplashTimer> {
        if self.started {
            return None;
        }
        self.started = true;
        debug!(
            target: "tinks::splash",
            display_ms = self.timings.display.as_millis() as u64,
            "splash sequence started"
        );
        Some(SplashTimer {
            delay: self.timings.display,
            step: SplashStep::Fade,
        })
    }

    /// Fire a timer step.
    ///
    /// Returns `None` if the step is not expected in the current phase.
    pub fn fire<T: VisualTree + ?Sized>(
        &mut self,
        step: SplashStep,
        tree: &mut T,
        classes: &ClassNames,
    ) -> Option<SplashTransition> {
        let next = match (self.phase, step) {
            (SplashPhase::Visible, SplashStep::Fade) if self.started => {
                tree.set_class(Node::Splash, &classes.fade_out, true);
                self.phase = SplashPhase::Fading;
                Some(SplashTimer {
                    delay: self.timings.fade,
                    step: SplashStep::Detach,
                })
            }
            (SplashPhase::Fading, SplashStep::Detach) => {
                tree.detach(Node::Splash);
                self.phase = SplashPhase::Removed;
                if self.timings.entrance_delay.is_zero() {
                    self.enter(tree, classes)
                } else {
                    Some(SplashTimer {
                        delay: self.timings.entrance_delay,
                        step: SplashStep::Enter,
                    })
                }
            }
            (SplashPhase::Removed, SplashStep::Enter) => self.enter(tree, classes),
            (SplashPhase::Entered, SplashStep::Settle) => {
                self.phase = SplashPhase::Settled;
                None
            }
            (phase, step) => {
                trace!(
                    target: "tinks::splash",
                    phase = phase.label(),
                    ?step,
                    "ignoring out-of-order splash step"
                );
                return None;
            }
        };
        debug!(target: "tinks::splash", phase = self.phase.label(), "splash phase changed");
        Some(SplashTransition {
            phase: self.phase,
            next,
        })
    }

    fn enter<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        classes: &ClassNames,
    ) -> Option<SplashTimer> {
        tree.set_class(Node::Body, &classes.loaded, true);
        self.phase = SplashPhase::Entered;
        Some(SplashTimer {
            delay: self.timings.settle,
            step: SplashStep::Settle,
        })
    }
}
