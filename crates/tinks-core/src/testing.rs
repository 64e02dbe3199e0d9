#![forbid(unsafe_code)]

//! Deterministic in-memory host for tests.
//!
//! - [`MockTree`] lays cards out in a horizontal strip and records every
//!   mutation as a [`TreeOp`].
//! - [`ManualHost`] fulfils [`HostCommand`]s against a clock the test
//!   advances explicitly.
//!
//! Available under `cfg(test)` and with the `test-helpers` feature.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::geometry::Bounds;
use crate::runner::{HostCommand, PageEvent, PageRunner};
use crate::splash::SplashStep;
use crate::tree::{CardControl, CardIndex, Node, VisualTree};

/// One recorded tree mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    SetClass(Node, String, bool),
    ScrollIntoView(CardIndex),
    Detach(Node),
}

/// In-memory visual tree: a viewport over a strip of equal-width cards.
///
/// Card `i` sits at `padding + i * (card_width + gap)` in content
/// coordinates; the viewport shows content starting at `scroll`. Integer
/// layout values keep center distances exact.
#[derive(Debug, Clone)]
pub struct MockTree {
    viewport: Bounds,
    card_width: f64,
    gap: f64,
    padding: f64,
    scroll: f64,
    card_count: usize,
    classes: BTreeSet<(Node, String)>,
    hidden: BTreeSet<Node>,
    detached: BTreeSet<Node>,
    missing_controls: BTreeSet<(CardIndex, CardControl)>,
    ops: Vec<TreeOp>,
}

impl MockTree {
    /// `card_count` cards 200px wide with 20px gaps in a 400px viewport.
    #[must_use]
    pub fn strip(card_count: usize) -> Self {
        Self {
            viewport: Bounds::new(0.0, 0.0, 400.0, 300.0),
            card_width: 200.0,
            gap: 20.0,
            padding: 100.0,
            scroll: 0.0,
            card_count,
            classes: BTreeSet::new(),
            hidden: BTreeSet::new(),
            detached: BTreeSet::new(),
            missing_controls: BTreeSet::new(),
            ops: Vec::new(),
        }
    }

    /// Distance between the left edges of two neighbouring cards.
    #[must_use]
    pub fn pitch(&self) -> f64 {
        self.card_width + self.gap
    }

    #[must_use]
    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    /// Jump the scroll position (no notification is sent).
    pub fn set_scroll(&mut self, scroll: f64) {
        self.scroll = scroll;
    }

    /// Scroll position that centers `card` in the viewport.
    #[must_use]
    pub fn scroll_for(&self, card: CardIndex) -> f64 {
        self.padding + card as f64 * self.pitch() + self.card_width / 2.0 - self.viewport.width / 2.0
    }

    /// Jump so `card` is exactly centered.
    pub fn center_on(&mut self, card: CardIndex) {
        self.scroll = self.scroll_for(card);
    }

    /// Make `node` unmeasurable without detaching it.
    pub fn hide(&mut self, node: Node) {
        self.hidden.insert(node);
    }

    /// Drop one control from one card's markup.
    pub fn remove_control(&mut self, card: CardIndex, control: CardControl) {
        self.missing_controls.insert((card, control));
    }

    #[must_use]
    pub fn has_class(&self, node: Node, class: &str) -> bool {
        self.classes.contains(&(node, class.to_owned()))
    }

    #[must_use]
    pub fn is_detached(&self, node: Node) -> bool {
        self.detached.contains(&node)
    }

    /// Mutations recorded since creation or the last [`Self::clear_ops`].
    #[must_use]
    pub fn ops(&self) -> &[TreeOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Cards passed to `scroll_card_into_view`, in order.
    #[must_use]
    pub fn scroll_requests(&self) -> Vec<CardIndex> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TreeOp::ScrollIntoView(card) => Some(*card),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded writes of `class` on `node`.
    #[must_use]
    pub fn class_writes(&self, node: Node, class: &str) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, TreeOp::SetClass(n, c, _) if *n == node && c == class))
            .count()
    }

    fn exists(&self, node: Node) -> bool {
        match node {
            Node::Card(index) => index < self.card_count,
            _ => true,
        }
    }
}

impl VisualTree for MockTree {
    fn card_count(&self) -> usize {
        self.card_count
    }

    fn bounds(&self, node: Node) -> Option<Bounds> {
        if !self.exists(node) || self.hidden.contains(&node) || self.detached.contains(&node) {
            return None;
        }
        match node {
            Node::Carousel | Node::Splash | Node::Body => Some(self.viewport),
            Node::Card(index) => {
                let content_left = self.padding + index as f64 * self.pitch();
                Some(
                    Bounds::new(
                        self.viewport.left + content_left,
                        self.viewport.top,
                        self.card_width,
                        self.viewport.height,
                    )
                    .shifted_x(-self.scroll),
                )
            }
        }
    }

    fn set_class(&mut self, node: Node, class: &str, present: bool) {
        self.ops
            .push(TreeOp::SetClass(node, class.to_owned(), present));
        if !self.exists(node) || self.detached.contains(&node) {
            return;
        }
        if present {
            self.classes.insert((node, class.to_owned()));
        } else {
            self.classes.remove(&(node, class.to_owned()));
        }
    }

    fn scroll_card_into_view(&mut self, card: CardIndex) {
        self.ops.push(TreeOp::ScrollIntoView(card));
        if card < self.card_count {
            self.center_on(card);
        }
    }

    fn detach(&mut self, node: Node) {
        self.ops.push(TreeOp::Detach(node));
        self.detached.insert(node);
        self.classes.retain(|(n, _)| *n != node);
    }

    fn has_control(&self, card: CardIndex, control: CardControl) -> bool {
        card < self.card_count && !self.missing_controls.contains(&(card, control))
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    due: Duration,
    seq: u64,
    step: SplashStep,
}

/// Deterministic host: a manual clock, pending timers and a frame flag.
#[derive(Debug, Default, Clone)]
pub struct ManualHost {
    now: Duration,
    next_seq: u64,
    timers: Vec<PendingTimer>,
    frame_requested: bool,
    frames_run: u64,
}

impl ManualHost {
    /// Create a host with the clock at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Queue commands drained from a runner.
    pub fn absorb(&mut self, commands: impl IntoIterator<Item = HostCommand>) {
        for command in commands {
            match command {
                HostCommand::RequestFrame => self.frame_requested = true,
                HostCommand::StartTimer { delay, step } => {
                    let seq = self.next_seq;
                    self.next_seq += 1;
                    self.timers.push(PendingTimer {
                        due: self.now.saturating_add(delay),
                        seq,
                        step,
                    });
                }
            }
        }
    }

    /// Drain and queue the runner's pending commands.
    pub fn pump<T: VisualTree>(&mut self, runner: &mut PageRunner<T>) {
        self.absorb(runner.take_commands());
    }

    /// Dispatch `event` and queue whatever it requested.
    pub fn send<T: VisualTree>(&mut self, runner: &mut PageRunner<T>, event: PageEvent) {
        runner.dispatch(event);
        self.pump(runner);
    }

    #[must_use]
    pub const fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Frames delivered so far.
    #[must_use]
    pub const fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deliver the requested frame, if any. Returns whether one ran.
    pub fn run_frame<T: VisualTree>(&mut self, runner: &mut PageRunner<T>) -> bool {
        if !std::mem::take(&mut self.frame_requested) {
            return false;
        }
        self.frames_run += 1;
        self.send(runner, PageEvent::Frame);
        true
    }

    /// Advance the clock by `dt`, firing due timers in deadline order.
    ///
    /// Timers started by a fired timer are fired too if they fall due
    /// within the same window.
    pub fn advance<T: VisualTree>(&mut self, runner: &mut PageRunner<T>, dt: Duration) {
        let target = self.now.saturating_add(dt);
        while let Some(pos) = self.next_due(target) {
            let timer = self.timers.remove(pos);
            self.now = timer.due;
            self.send(runner, PageEvent::Timer(timer.step));
        }
        self.now = target;
    }

    fn next_due(&self, limit: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(pos, _)| pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;

    use pretty_assertions::assert_eq;

    #[test]
    fn centered_card_shares_viewport_center() {
        let mut tree = MockTree::strip(5);
        tree.center_on(3);
        let viewport = tree.bounds(Node::Carousel).unwrap();
        let card = tree.bounds(Node::Card(3)).unwrap();
        assert_eq!(card.center_x(), viewport.center_x());
    }

    #[test]
    fn detached_node_has_no_bounds_or_classes() {
        let mut tree = MockTree::strip(1);
        tree.set_class(Node::Splash, "fade-out", true);
        tree.detach(Node::Splash);
        assert_eq!(tree.bounds(Node::Splash), None);
        assert!(!tree.has_class(Node::Splash, "fade-out"));
    }

    #[test]
    fn manual_host_fires_timers_in_deadline_order() {
        let mut runner = PageRunner::new(MockTree::strip(2), PageConfig::default(), false);
        let mut host = ManualHost::new();
        runner.start();
        host.pump(&mut runner);
        assert_eq!(host.pending_timers(), 1);

        // One large step runs the whole chain.
        host.advance(&mut runner, Duration::from_secs(10));
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(host.now(), Duration::from_secs(10));
        assert_eq!(runner.splash_phase(), crate::splash::SplashPhase::Settled);
    }

    #[test]
    fn frame_runs_only_when_requested() {
        let mut runner = PageRunner::new(MockTree::strip(2), PageConfig::default(), false);
        let mut host = ManualHost::new();
        assert!(!host.run_frame(&mut runner));
        host.send(&mut runner, PageEvent::Scroll);
        assert!(host.frame_requested());
        assert!(host.run_frame(&mut runner));
        assert_eq!(host.frames_run(), 1);
        assert!(!host.frame_requested());
    }
}
