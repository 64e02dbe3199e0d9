#![forbid(unsafe_code)]

//! Active-card detection.
//!
//! The active card is the one whose horizontal center is nearest the
//! carousel's visual center. [`ActiveCardTracker`] is the only writer of the
//! active index and of the `dimmed` modifier.
//!
//! # Invariants
//!
//! 1. `active() < card_count` whenever `card_count > 0`; it starts at 0.
//! 2. Ties resolve to the lowest index (first minimum encountered).
//! 3. A recomputation that lands on the current index performs no writes.
//! 4. After a change, exactly the non-active cards carry `dimmed`.
//!
//! # Failure Modes
//!
//! - Carousel geometry unavailable: recomputation is a no-op.
//! - Individual card geometry unavailable: that card is skipped.

use tracing::{debug, trace};

use crate::geometry::nearest_to_center;
use crate::tree::{CardIndex, Node, VisualTree};

/// Owns the active index and the `dimmed` modifier.
#[derive(Debug, Clone)]
pub struct ActiveCardTracker {
    active: CardIndex,
    card_count: usize,
}

impl ActiveCardTracker {
    /// Create a tracker for `card_count` cards, with card 0 active.
    #[must_use]
    pub const fn new(card_count: usize) -> Self {
        Self {
            active: 0,
            card_count,
        }
    }

    /// Currently active card.
    #[must_use]
    pub const fn active(&self) -> CardIndex {
        self.active
    }

    /// Number of cards tracked.
    #[must_use]
    pub const fn card_count(&self) -> usize {
        self.card_count
    }

    /// Index of the card nearest the carousel center, read from live geometry.
    pub fn nearest<T: VisualTree + ?Sized>(&self, tree: &T) -> Option<CardIndex> {
        let container = tree.bounds(Node::Carousel)?;
        nearest_to_center(
            &container,
            (0..self.card_count).map(|index| tree.bounds(Node::Card(index))),
        )
    }

    /// Recompute the active card and re-dim if it changed.
    ///
    /// Returns the new index when it changed, `None` otherwise.
    pub fn recompute<T: VisualTree + ?Sized>(
        &mut self,
        tree: &mut T,
        dimmed: &str,
    ) -> Option<CardIndex> {
        let Some(nearest) = self.nearest(tree) else {
            trace!(target: "tinks::tracker", "no measurable cards; skipping recompute");
            return None;
        };
        if nearest == self.active {
            trace!(target: "tinks::tracker", active = self.active, "active card unchanged");
            return None;
        }
        debug!(
            target: "tinks::tracker",
            from = self.active,
            to = nearest,
            "active card changed"
        );
        self.active = nearest;
        self.dim_all_except(tree, dimmed, nearest);
        Some(nearest)
    }

    /// Initial dimming once the page has settled: every card but the first.
    ///
    /// Does not move the active index.
    pub fn apply_initial_dim<T: VisualTree + ?Sized>(&self, tree: &mut T, dimmed: &str) {
        debug!(target: "tinks::tracker", cards = self.card_count, "applying initial dim");
        self.dim_all_except(tree, dimmed, 0);
    }

    fn dim_all_except<T: VisualTree + ?Sized>(&self, tree: &mut T, dimmed: &str, keep: CardIndex) {
        for index in 0..self.card_count {
            tree.set_class(Node::Card(index), dimmed, index != keep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTree, TreeOp};

    use pretty_assertions::assert_eq;

    const DIMMED: &str = "dimmed";

    fn dimmed_cards(tree: &MockTree) -> Vec<CardIndex> {
        (0..tree.card_count())
            .filter(|&i| tree.has_class(Node::Card(i), DIMMED))
            .collect()
    }

    #[test]
    fn starts_on_first_card() {
        let tracker = ActiveCardTracker::new(4);
        assert_eq!(tracker.active(), 0);
        assert_eq!(tracker.card_count(), 4);
    }

    #[test]
    fn recompute_moves_active_and_dims_others() {
        let mut tree = MockTree::strip(5);
        let mut tracker = ActiveCardTracker::new(5);

        tree.center_on(3);
        assert_eq!(tracker.recompute(&mut tree, DIMMED), Some(3));
        assert_eq!(tracker.active(), 3);
        assert_eq!(dimmed_cards(&tree), vec![0, 1, 2, 4]);
    }

    #[test]
    fn recompute_unchanged_writes_nothing() {
        let mut tree = MockTree::strip(5);
        let mut tracker = ActiveCardTracker::new(5);
        tree.center_on(2);
        tracker.recompute(&mut tree, DIMMED);
        tree.clear_ops();

        assert_eq!(tracker.recompute(&mut tree, DIMMED), None);
        assert_eq!(tracker.recompute(&mut tree, DIMMED), None);
        assert!(tree.ops().is_empty(), "unexpected writes: {:?}", tree.ops());
    }

    #[test]
    fn recompute_without_carousel_geometry_is_noop() {
        let mut tree = MockTree::strip(3);
        tree.center_on(2);
        tree.hide(Node::Carousel);
        let mut tracker = ActiveCardTracker::new(3);
        assert_eq!(tracker.recompute(&mut tree, DIMMED), None);
        assert_eq!(tracker.active(), 0);
        assert!(tree.ops().is_empty());
    }

    #[test]
    fn unmeasurable_card_is_skipped() {
        let mut tree = MockTree::strip(3);
        tree.center_on(1);
        tree.hide(Node::Card(1));
        let mut tracker = ActiveCardTracker::new(3);
        // Card 1 is centered but unmeasurable; 0 and 2 tie, lowest wins.
        assert_eq!(tracker.nearest(&tree), Some(0));
        assert_eq!(tracker.recompute(&mut tree, DIMMED), None);
    }

    #[test]
    fn initial_dim_keeps_first_card_lit() {
        let mut tree = MockTree::strip(4);
        let tracker = ActiveCardTracker::new(4);
        tracker.apply_initial_dim(&mut tree, DIMMED);
        assert_eq!(dimmed_cards(&tree), vec![1, 2, 3]);
        assert_eq!(
            tree.ops()[0],
            TreeOp::SetClass(Node::Card(0), DIMMED.to_owned(), false)
        );
    }

    #[test]
    fn empty_carousel_never_changes() {
        let mut tree = MockTree::strip(0);
        let mut tracker = ActiveCardTracker::new(0);
        assert_eq!(tracker.recompute(&mut tree, DIMMED), None);
        assert_eq!(tracker.active(), 0);
    }
}
