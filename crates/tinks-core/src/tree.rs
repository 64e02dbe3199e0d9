#![forbid(unsafe_code)]

//! The visual tree collaborator.
//!
//! Controllers never touch the DOM directly. They address a fixed set of
//! [`Node`]s through the [`VisualTree`] trait, which the WASM frontend
//! implements on top of `web-sys` and tests implement in memory.
//!
//! Every operation is best-effort: a node that does not exist yields `None`
//! for geometry and silently ignores mutation. A missing element is a
//! cosmetic omission, never a failure.

use crate::geometry::Bounds;

/// Position of a card in the carousel sequence.
pub type CardIndex = usize;

/// Addressable element of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// The horizontally scrolling card container.
    Carousel,
    /// One card, by sequence position.
    Card(CardIndex),
    /// The splash overlay.
    Splash,
    /// The page body, target of page-wide modifiers.
    Body,
}

/// Explicit controls a card may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardControl {
    /// "See more": force the card to its flipped side.
    Expand,
    /// "See less": force the card back to its plain side.
    Collapse,
    /// Outbound link; never affects flip state.
    Visit,
}

impl CardControl {
    /// All controls, in the order their handlers are consulted.
    pub const ALL: [CardControl; 3] = [Self::Expand, Self::Collapse, Self::Visit];

    /// Stable lowercase label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expand => "expand",
            Self::Collapse => "collapse",
            Self::Visit => "visit",
        }
    }
}

/// Queries and mutations consumed from the page.
pub trait VisualTree {
    /// Number of cards in the carousel. Fixed for the page lifetime.
    fn card_count(&self) -> usize;

    /// Current bounding box of `node`, if it exists and can be measured.
    fn bounds(&self, node: Node) -> Option<Bounds>;

    /// Add (`present = true`) or remove a class modifier on `node`.
    fn set_class(&mut self, node: Node, class: &str, present: bool);

    /// Smoothly scroll the carousel so `card` ends up horizontally centered.
    fn scroll_card_into_view(&mut self, card: CardIndex);

    /// Detach `node` from the tree.
    fn detach(&mut self, node: Node);

    /// Whether `card` carries the given explicit control.
    fn has_control(&self, card: CardIndex, control: CardControl) -> bool;
}

impl<T: VisualTree + ?Sized> VisualTree for &mut T {
    fn card_count(&self) -> usize {
        (**self).card_count()
    }

    fn bounds(&self, node: Node) -> Option<Bounds> {
        (**self).bounds(node)
    }

    fn set_class(&mut self, node: Node, class: &str, present: bool) {
        (**self).set_class(node, class, present);
    }

    fn scroll_card_into_view(&mut self, card: CardIndex) {
        (**self).scroll_card_into_view(card);
    }

    fn detach(&mut self, node: Node) {
        (**self).detach(node);
    }

    fn has_control(&self, card: CardIndex, control: CardControl) -> bool {
        (**self).has_control(card, control)
    }
}
