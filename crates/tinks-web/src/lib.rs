#![forbid(unsafe_code)]

//! WASM frontend for the TINKS card carousel page.
//!
//! This crate binds [`tinks_core::PageRunner`] to the browser:
//! - locates the carousel, its cards, their controls, the arrow buttons and
//!   the splash overlay,
//! - forwards DOM events (`scroll`, `mouseenter`, `mouseleave`, `click`) as
//!   [`tinks_core::PageEvent`]s,
//! - fulfils the runner's host commands with `requestAnimationFrame` and
//!   `setTimeout`,
//! - routes `tracing` output to the browser console.
//!
//! The host page calls `mount()` (or `mountWithConfig(json)`) once the markup
//! is in place. Everything stays wired for the page lifetime.

mod error;
pub mod selectors;

pub use error::MountError;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{TinksPage, mount, mount_with_config};
