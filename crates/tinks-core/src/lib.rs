#![forbid(unsafe_code)]

//! Core: host-independent controllers for the TINKS card carousel page.
//!
//! # Role in TINKS
//! `tinks-core` owns every piece of page behavior that does not need a
//! browser: active-card detection, arrow navigation, the card flip state
//! machine and the splash dismissal sequence. The WASM frontend
//! (`tinks-web`) binds these controllers to the DOM.
//!
//! # Primary responsibilities
//! - **ActiveCardTracker**: nearest-to-center detection and the `dimmed` modifier.
//! - **FrameCoalescer**: at most one tracker recomputation per rendering frame.
//! - **Navigation**: previous/next as a centered scroll, clamped to range.
//! - **FlipController**: hover/tap/explicit-control flip state per card.
//! - **SplashSequencer**: one-shot fade, removal, entrance and initial dim.
//! - **PageRunner**: owns the controllers and the visual tree, dispatches
//!   [`runner::PageEvent`] values and queues [`runner::HostCommand`] values.
//!
//! # How it fits in the system
//! The host pushes events into [`PageRunner`] and drains host commands after
//! each dispatch. The core never schedules anything itself: frame callbacks
//! and timers are requested through the outbox and delivered back as events,
//! which keeps every behavior here deterministic under test.

pub mod config;
pub mod error;
pub mod flip;
pub mod frame;
pub mod geometry;
pub mod navigation;
pub mod runner;
pub mod splash;
pub mod tracker;
pub mod tree;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::PageConfig;
pub use error::ConfigError;
pub use runner::{HostCommand, PageEvent, PageRunner};
pub use tree::{CardControl, CardIndex, Node, VisualTree};
