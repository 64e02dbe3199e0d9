#![forbid(unsafe_code)]

//! Card flip interaction.
//!
//! Each card has two sides. [`FlipController`] decides which one is showing
//! from hover (pointer devices), taps (touch devices) and three explicit
//! controls, and is the only writer of the `flipped` modifier.
//!
//! # State Machine
//!
//! Per card: `{ flipped, manually_collapsed }`. The second flag is only ever
//! set in [`InputMode::Pointer`].
//!
//! | Input | Pointer mode | Touch mode |
//! |-------|--------------|------------|
//! | hover enter | flip, unless manually collapsed | ignored |
//! | hover leave | unflip, clear manual collapse | ignored |
//! | body tap | ignored | toggle |
//! | expand | flip, clear manual collapse | flip |
//! | collapse | unflip, set manual collapse | unflip |
//! | visit | nothing | nothing |
//!
//! # Propagation
//!
//! A click is dispatched with its [`ClickTarget`]. The control handler runs
//! first and returns [`Propagation`]; the card's own handler runs only when
//! the control let the click [`Propagation::Continue`]. All three controls
//! consume their clicks.
//!
//! # Invariants
//!
//! 1. The `flipped` class is written only when the flipped value changes.
//! 2. Flipping never touches the active index or the `dimmed` modifier.
//! 3. `manually_collapsed` is always `false` in touch mode.

use serde::Deserialize;
use tracing::{debug, trace};

use crate::tree::{CardControl, CardIndex, Node, VisualTree};

/// How the page is being driven. Chosen once at mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Mouse or trackpad: hover flips.
    Pointer,
    /// Touch screen: taps toggle.
    Touch,
}

impl InputMode {
    /// Pick a mode from touch-capability detection.
    #[must_use]
    pub const fn detect(touch_capable: bool) -> Self {
        if touch_capable {
            Self::Touch
        } else {
            Self::Pointer
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Touch => "touch",
        }
    }
}

/// Whether a click should continue to the card's own handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Consumed,
}

impl Propagation {
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Where inside a card a click originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    /// Anywhere on the card outside its controls.
    Body,
    /// One of the card's explicit controls.
    Control(CardControl),
}

/// Flip state of one card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardFlipState {
    pub flipped: bool,
    /// Set by "collapse" while hovering, so hover does not re-flip until the
    /// pointer leaves.
    pub manually_collapsed: bool,
}

/// Owns per-card flip state and the `flipped` modifier.
#[derive(Debug, Clone)]
pub struct FlipController {
    mode: InputMode,
    cards: Vec<CardFlipState>,
}

impl FlipController {
    /// Create a controller for `card_count` cards, all showing their plain side.
    #[must_use]
    pub fn new(mode: InputMode, card_count: usize) -> Self {
        Self {
            mode,
            cards: vec![CardFlipState::default(); card_count],
        }
    }

    #[must_use]
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// State of `card`, if it exists.
    #[must_use]
    pub fn state(&self, card: CardIndex) -> Option<CardFlipState> {
        self.cards.get(card).copied()
    }

    /// Whether `card` is showing its flipped side.
    #[must_use]
    pub fn is_flipped(&self, card: CardIndex) -> bool {
        self.state(card).is_some_and(|s| s.flipped)
    }

    /// Pointer entered the card's hover region.
    pub fn pointer_enter<T: VisualTree + ?Sized>(
        &mut self,
        card: CardIndex,
        tree: &mut T,
        flipped: &str,
    ) {
        if self.mode != InputMode::Pointer {
            return;
        }
        let Some(state) = self.cards.get(card) else {
            return;
        };
        if state.manually_collapsed {
            trace!(target: "tinks::flip", card, "hover re-flip suppressed after collapse");
            return;
        }
        self.set_flipped(card, true, tree, flipped);
    }

    /// Pointer left the card's hover region.
    pub fn pointer_leave<T: VisualTree + ?Sized>(
        &mut self,
        card: CardIndex,
        tree: &mut T,
        flipped: &str,
    ) {
        if self.mode != InputMode::Pointer {
            return;
        }
        let Some(state) = self.cards.get_mut(card) else {
            return;
        };
        state.manually_collapsed = false;
        self.set_flipped(card, false, tree, flipped);
    }

    /// A click inside the card. Controls are consulted before the card body.
    pub fn click<T: VisualTree + ?Sized>(
        &mut self,
        card: CardIndex,
        target: ClickTarget,
        tree: &mut T,
        flipped: &str,
    ) -> Propagation {
        if card >= self.cards.len() {
            return Propagation::Continue;
        }
        if let ClickTarget::Control(control) = target {
            let propagation = self.control(card, control, tree, flipped);
            if propagation.is_consumed() {
                return propagation;
            }
        }
        self.body_tap(card, tree, flipped);
        Propagation::Continue
    }

    /// Activation of one of the card's explicit controls.
    pub fn control<T: VisualTree + ?Sized>(
        &mut self,
        card: CardIndex,
        control: CardControl,
        tree: &mut T,
        flipped: &str,
    ) -> Propagation {
        let pointer = self.mode == InputMode::Pointer;
        let Some(state) = self.cards.get_mut(card) else {
            return Propagation::Continue;
        };
        trace!(target: "tinks::flip", card, control = control.label(), "control activated");
        match control {
            CardControl::Expand => {
                state.manually_collapsed = false;
                self.set_flipped(card, true, tree, flipped);
            }
            CardControl::Collapse => {
                if pointer {
                    state.manually_collapsed = true;
                }
                self.set_flipped(card, false, tree, flipped);
            }
            CardControl::Visit => {}
        }
        Propagation::Consumed
    }

    /// The card's own click handler: toggles in touch mode.
    fn body_tap<T: VisualTree + ?Sized>(&mut self, card: CardIndex, tree: &mut T, flipped: &str) {
        if self.mode != InputMode::Touch {
            return;
        }
        let next = !self.is_flipped(card);
        self.set_flipped(card, next, tree, flipped);
    }

    fn set_flipped<T: VisualTree + ?Sized>(
        &mut self,
        card: CardIndex,
        value: bool,
        tree: &mut T,
        flipped: &str,
    ) {
        let Some(state) = self.cards.get_mut(card) else {
            return;
        };
        if state.flipped == value {
            return;
        }
        state.flipped = value;
        debug!(target: "tinks::flip", card, flipped = value, "card flip changed");
        tree.set_class(Node::Card(card), flipped, value);
    }
}
