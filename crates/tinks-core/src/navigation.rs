#![forbid(unsafe_code)]

//! Arrow-button navigation.
//!
//! Navigation only ever issues a scroll command. The resulting scroll
//! notifications flow back through the tracker, which stays the single
//! writer of the active index.

use tracing::{debug, trace};

use crate::tree::{CardIndex, VisualTree};

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Parse a host-provided label (`"prev"`, `"previous"`, `"next"`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "prev" | "previous" => Some(Self::Previous),
            "next" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Card to scroll to when moving from `active` in `direction`.
///
/// Clamped to `[0, card_count - 1]` with no wraparound. Returns `None` when
/// the clamped target equals the current card (boundary) or there are no
/// cards. An out-of-range `active` is first clamped to the last card.
#[must_use]
pub fn target_index(
    active: CardIndex,
    card_count: usize,
    direction: Direction,
) -> Option<CardIndex> {
    let last = card_count.checked_sub(1)?;
    let current = active.min(last);
    let target = match direction {
        Direction::Previous => current.saturating_sub(1),
        Direction::Next => current.saturating_add(1).min(last),
    };
    (target != current).then_some(target)
}

/// Scroll the carousel one card in `direction`.
///
/// Returns the card that was scrolled to, or `None` at a boundary.
pub fn navigate<T: VisualTree + ?Sized>(
    tree: &mut T,
    active: CardIndex,
    direction: Direction,
) -> Option<CardIndex> {
    let Some(target) = target_index(active, tree.card_count(), direction) else {
        trace!(target: "tinks::nav", active, ?direction, "navigation at boundary");
        return None;
    };
    debug!(target: "tinks::nav", active, target, ?direction, "scrolling to card");
    tree.scroll_card_into_view(target);
    Some(target)
}
