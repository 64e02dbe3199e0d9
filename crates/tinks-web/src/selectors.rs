#![forbid(unsafe_code)]

//! CSS selector strings built from configuration.

use tinks_core::CardControl;
use tinks_core::config::Selectors;

/// Selector for elements carrying `class`.
#[must_use]
pub fn class_selector(class: &str) -> String {
    format!(".{class}")
}

/// Selector for the element with `id`.
#[must_use]
pub fn id_selector(id: &str) -> String {
    format!("#{id}")
}

/// Class selector for one card control.
#[must_use]
pub fn control_selector(selectors: &Selectors, control: CardControl) -> String {
    let class = match control {
        CardControl::Expand => &selectors.expand_class,
        CardControl::Collapse => &selectors.collapse_class,
        CardControl::Visit => &selectors.visit_class,
    };
    class_selector(class)
}
