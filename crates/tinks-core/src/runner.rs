#![forbid(unsafe_code)]

//! Host-driven page runner.
//!
//! [`PageRunner`] owns the visual tree and one controller per concern. The
//! embedding host:
//! - pushes [`PageEvent`]s through [`PageRunner::dispatch`],
//! - drains [`HostCommand`]s with [`PageRunner::take_commands`] after every
//!   dispatch and fulfils them (animation frame, timeout),
//! - delivers fulfilled commands back as [`PageEvent::Frame`] and
//!   [`PageEvent::Timer`].
//!
//! # Single writer per modifier
//!
//! | Modifier | Writer |
//! |----------|--------|
//! | `dimmed` | [`ActiveCardTracker`] (including the splash's initial dim) |
//! | `flipped` | [`FlipController`] |
//! | `fade-out`, `loaded`, overlay removal | [`SplashSequencer`] |
//! | scroll position | navigation |

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::PageConfig;
use crate::flip::{ClickTarget, FlipController, InputMode, Propagation};
use crate::frame::{FrameCoalescer, FrameStats};
use crate::navigation::{self, Direction};
use crate::splash::{SplashPhase, SplashSequencer, SplashStep, SplashTimer};
use crate::tracker::ActiveCardTracker;
use crate::tree::{CardControl, CardIndex, VisualTree};

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The carousel scroll position changed.
    Scroll,
    /// A requested rendering frame is due.
    Frame,
    /// Pointer entered a card's hover region.
    PointerEnter(CardIndex),
    /// Pointer left a card's hover region.
    PointerLeave(CardIndex),
    /// Click or tap inside a card.
    Click {
        card: CardIndex,
        target: ClickTarget,
    },
    /// Arrow button or programmatic navigation.
    Navigate(Direction),
    /// A requested timer elapsed.
    Timer(SplashStep),
}

/// Work the host must schedule on the core's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Deliver [`PageEvent::Frame`] on the next rendering frame.
    RequestFrame,
    /// Deliver [`PageEvent::Timer`] with `step` after `delay`.
    StartTimer { delay: Duration, step: SplashStep },
}

impl From<SplashTimer> for HostCommand {
    fn from(timer: SplashTimer) -> Self {
        Self::StartTimer {
            delay: timer.delay,
            step: timer.step,
        }
    }
}

/// Owns page state and dispatches events to the controllers.
#[derive(Debug)]
pub struct PageRunner<T: VisualTree> {
    tree: T,
    config: PageConfig,
    tracker: ActiveCardTracker,
    frames: FrameCoalescer,
    flip: FlipController,
    splash: SplashSequencer,
    outbox: Vec<HostCommand>,
}

impl<T: VisualTree> PageRunner<T> {
    /// Create a runner over `tree`.
    ///
    /// `touch_capable` is the host's touch detection result; a configured
    /// `input_mode` takes precedence.
    pub fn new(tree: T, config: PageConfig, touch_capable: bool) -> Self {
        let card_count = tree.card_count();
        let mode = config
            .input_mode
            .unwrap_or_else(|| InputMode::detect(touch_capable));
        debug!(
            target: "tinks::runner",
            cards = card_count,
            mode = mode.label(),
            "page runner created"
        );
        Self {
            tracker: ActiveCardTracker::new(card_count),
            frames: FrameCoalescer::new(),
            flip: FlipController::new(mode, card_count),
            splash: SplashSequencer::new(config.splash),
            outbox: Vec::new(),
            tree,
            config,
        }
    }

    /// Start the splash sequence. Calling it again has no effect.
    pub fn start(&mut self) {
        if let Some(timer) = self.splash.start() {
            self.outbox.push(timer.into());
        }
    }

    /// Process one host event.
    pub fn dispatch(&mut self, event: PageEvent) {
        trace!(target: "tinks::runner", ?event, "dispatch");
        match event {
            PageEvent::Scroll => self.on_scroll(),
            PageEvent::Frame => self.on_frame(),
            PageEvent::PointerEnter(card) => {
                let flipped = &self.config.classes.flipped;
                self.flip.pointer_enter(card, &mut self.tree, flipped);
            }
            PageEvent::PointerLeave(card) => {
                let flipped = &self.config.classes.flipped;
                self.flip.pointer_leave(card, &mut self.tree, flipped);
            }
            PageEvent::Click { card, target } => self.on_click(card, target),
            PageEvent::Navigate(direction) => {
                navigation::navigate(&mut self.tree, self.tracker.active(), direction);
            }
            PageEvent::Timer(step) => self.on_timer(step),
        }
    }

    /// Drain commands queued since the last call.
    pub fn take_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn on_scroll(&mut self) {
        if self.frames.notify() {
            self.outbox.push(HostCommand::RequestFrame);
        }
    }

    fn on_frame(&mut self) {
        if self.frames.take_pending() {
            self.tracker
                .recompute(&mut self.tree, &self.config.classes.dimmed);
        }
    }

    fn on_click(&mut self, card: CardIndex, target: ClickTarget) {
        let target = match target {
            ClickTarget::Control(control) if !self.tree.has_control(card, control) => {
                trace!(
                    target: "tinks::runner",
                    card,
                    control = control.label(),
                    "click on unwired control treated as body click"
                );
                ClickTarget::Body
            }
            other => other,
        };
        let flipped = &self.config.classes.flipped;
        let propagation = self.flip.click(card, target, &mut self.tree, flipped);
        if propagation == Propagation::Consumed {
            trace!(target: "tinks::runner", card, ?target, "click consumed by control");
        }
    }

    fn on_timer(&mut self, step: SplashStep) {
        let Some(transition) = self
            .splash
            .fire(step, &mut self.tree, &self.config.classes)
        else {
            return;
        };
        if transition.phase == SplashPhase::Settled {
            self.tracker
                .apply_initial_dim(&mut self.tree, &self.config.classes.dimmed);
        }
        if let Some(next) = transition.next {
            self.outbox.push(next.into());
        }
    }

    /// Currently active card.
    #[must_use]
    pub fn active_index(&self) -> CardIndex {
        self.tracker.active()
    }

    /// Number of cards on the page.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.tracker.card_count()
    }

    /// Whether `card` shows its flipped side.
    #[must_use]
    pub fn is_flipped(&self, card: CardIndex) -> bool {
        self.flip.is_flipped(card)
    }

    /// The flip controller, for state inspection.
    #[must_use]
    pub fn flip(&self) -> &FlipController {
        &self.flip
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.flip.mode()
    }

    #[must_use]
    pub fn splash_phase(&self) -> SplashPhase {
        self.splash.phase()
    }

    #[must_use]
    pub fn frame_stats(&self) -> FrameStats {
        self.frames.stats()
    }

    /// Whether `card` carries `control` in the underlying tree.
    #[must_use]
    pub fn has_control(&self, card: CardIndex, control: CardControl) -> bool {
        self.tree.has_control(card, control)
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Mutable access to the tree, for hosts that move geometry under test.
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTree, TreeOp};
    use crate::tree::Node;

    use pretty_assertions::assert_eq;

    fn runner(cards: usize, touch: bool) -> PageRunner<MockTree> {
        PageRunner::new(MockTree::strip(cards), PageConfig::default(), touch)
    }

    #[test]
    fn configured_mode_overrides_detection() {
        let config = PageConfig {
            input_mode: Some(InputMode::Pointer),
            ..PageConfig::default()
        };
        let r = PageRunner::new(MockTree::strip(2), config, true);
        assert_eq!(r.input_mode(), InputMode::Pointer);
        assert_eq!(runner(2, true).input_mode(), InputMode::Touch);
        assert_eq!(runner(2, false).input_mode(), InputMode::Pointer);
    }

    #[test]
    fn start_queues_display_timer_once() {
        let mut r = runner(3, false);
        r.start();
        r.start();
        assert_eq!(
            r.take_commands(),
            vec![HostCommand::StartTimer {
                delay: Duration::from_millis(3500),
                step: SplashStep::Fade,
            }]
        );
        assert!(r.take_commands().is_empty());
    }

    #[test]
    fn scroll_burst_requests_one_frame() {
        let mut r = runner(5, false);
        r.tree_mut().center_on(1);
        for _ in 0..10 {
            r.dispatch(PageEvent::Scroll);
        }
        assert_eq!(r.take_commands(), vec![HostCommand::RequestFrame]);
        assert_eq!(r.active_index(), 0, "no recompute before the frame");

        r.tree_mut().center_on(2);
        r.dispatch(PageEvent::Frame);
        assert_eq!(r.active_index(), 2, "frame observes the latest position");
        assert_eq!(r.frame_stats().ran, 1);
    }

    #[test]
    fn navigation_scrolls_but_never_sets_active() {
        let mut r = runner(5, false);
        r.dispatch(PageEvent::Navigate(Direction::Next));
        assert_eq!(r.active_index(), 0);
        assert_eq!(r.tree().scroll_requests(), vec![1]);
    }

    #[test]
    fn click_on_unwired_control_falls_through_to_body() {
        let mut tree = MockTree::strip(1);
        tree.remove_control(0, CardControl::Visit);
        let mut r = PageRunner::new(tree, PageConfig::default(), true);
        r.dispatch(PageEvent::Click {
            card: 0,
            target: ClickTarget::Control(CardControl::Visit),
        });
        assert!(r.is_flipped(0));
    }

    #[test]
    fn settle_dims_all_but_first() {
        let mut r = runner(3, false);
        r.start();
        r.dispatch(PageEvent::Timer(SplashStep::Fade));
        r.dispatch(PageEvent::Timer(SplashStep::Detach));
        r.tree_mut().clear_ops();
        r.dispatch(PageEvent::Timer(SplashStep::Settle));
        assert_eq!(r.splash_phase(), SplashPhase::Settled);
        assert_eq!(
            r.tree().ops(),
            &[
                TreeOp::SetClass(Node::Card(0), "dimmed".to_owned(), false),
                TreeOp::SetClass(Node::Card(1), "dimmed".to_owned(), true),
                TreeOp::SetClass(Node::Card(2), "dimmed".to_owned(), true),
            ]
        );
    }

    #[test]
    fn stale_timer_queues_nothing() {
        let mut r = runner(3, false);
        r.dispatch(PageEvent::Timer(SplashStep::Settle));
        assert!(r.take_commands().is_empty());
        assert_eq!(r.splash_phase(), SplashPhase::Visible);
    }
}
