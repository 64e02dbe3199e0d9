#![forbid(unsafe_code)]

//! [`VisualTree`] over the live document.

use tinks_core::config::Selectors;
use tinks_core::flip::ClickTarget;
use tinks_core::geometry::Bounds;
use tinks_core::{CardControl, CardIndex, Node, VisualTree};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use crate::MountError;
use crate::selectors::{class_selector, control_selector, id_selector};

/// One card element and whichever of its controls exist.
#[derive(Debug, Clone)]
pub(crate) struct CardElements {
    pub(crate) root: Element,
    expand: Option<Element>,
    collapse: Option<Element>,
    visit: Option<Element>,
}

impl CardElements {
    fn locate(index: CardIndex, root: Element, selectors: &Selectors) -> Self {
        let find = |control: CardControl| {
            let found = root
                .query_selector(&control_selector(selectors, control))
                .ok()
                .flatten();
            if found.is_none() {
                warn!(
                    target: "tinks::dom",
                    card = index,
                    control = control.label(),
                    "card control missing; not wired"
                );
            }
            found
        };
        let expand = find(CardControl::Expand);
        let collapse = find(CardControl::Collapse);
        let visit = find(CardControl::Visit);
        Self {
            root,
            expand,
            collapse,
            visit,
        }
    }

    fn control(&self, control: CardControl) -> Option<&Element> {
        match control {
            CardControl::Expand => self.expand.as_ref(),
            CardControl::Collapse => self.collapse.as_ref(),
            CardControl::Visit => self.visit.as_ref(),
        }
    }

    /// Classify a click by the control (if any) containing its target.
    pub(crate) fn click_target(&self, target: Option<EventTarget>) -> ClickTarget {
        let Some(node) = target.as_ref().and_then(|t| t.dyn_ref::<web_sys::Node>()) else {
            return ClickTarget::Body;
        };
        CardControl::ALL
            .into_iter()
            .find(|&control| {
                self.control(control)
                    .is_some_and(|el| el.contains(Some(node)))
            })
            .map_or(ClickTarget::Body, ClickTarget::Control)
    }
}

/// The page's carousel, cards, splash overlay and body.
#[derive(Debug)]
pub(crate) struct DomTree {
    carousel: Element,
    cards: Vec<CardElements>,
    splash: Option<Element>,
    body: Option<HtmlElement>,
}

impl DomTree {
    /// Find every element the page controllers touch.
    ///
    /// Only the carousel is required. A page without cards, controls or a
    /// splash overlay still mounts with those parts inert.
    pub(crate) fn locate(document: &Document, selectors: &Selectors) -> Result<Self, MountError> {
        let carousel = document
            .get_element_by_id(&selectors.carousel_id)
            .ok_or_else(|| MountError::MissingElement(id_selector(&selectors.carousel_id)))?;

        let mut cards = Vec::new();
        if let Ok(list) = carousel.query_selector_all(&class_selector(&selectors.card_class)) {
            for i in 0..list.length() {
                let Some(element) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let index = cards.len();
                cards.push(CardElements::locate(index, element, selectors));
            }
        }
        if cards.is_empty() {
            warn!(target: "tinks::dom", "carousel has no cards");
        }

        let splash = document.get_element_by_id(&selectors.splash_id);
        if splash.is_none() {
            debug!(target: "tinks::dom", id = %selectors.splash_id, "no splash overlay");
        }

        debug!(target: "tinks::dom", cards = cards.len(), "page located");
        Ok(Self {
            carousel,
            cards,
            splash,
            body: document.body(),
        })
    }

    pub(crate) fn carousel(&self) -> &Element {
        &self.carousel
    }

    pub(crate) fn cards(&self) -> &[CardElements] {
        &self.cards
    }

    fn element(&self, node: Node) -> Option<&Element> {
        match node {
            Node::Carousel => Some(&self.carousel),
            Node::Card(i) => self.cards.get(i).map(|c| &c.root),
            Node::Splash => self.splash.as_ref(),
            Node::Body => self.body.as_deref(),
        }
    }
}

impl VisualTree for DomTree {
    fn card_count(&self) -> usize {
        self.cards.len()
    }

    fn bounds(&self, node: Node) -> Option<Bounds> {
        let rect = self.element(node)?.get_bounding_client_rect();
        Some(Bounds::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn set_class(&mut self, node: Node, class: &str, present: bool) {
        let Some(element) = self.element(node) else {
            return;
        };
        let list = element.class_list();
        let _ = if present {
            list.add_1(class)
        } else {
            list.remove_1(class)
        };
    }

    fn scroll_card_into_view(&mut self, card: CardIndex) {
        let Some(element) = self.element(Node::Card(card)) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_inline(ScrollLogicalPosition::Center);
        options.set_block(ScrollLogicalPosition::Nearest);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn detach(&mut self, node: Node) {
        // Only the splash overlay is ever removed.
        if node == Node::Splash {
            if let Some(splash) = self.splash.take() {
                splash.remove();
            }
        } else if let Some(element) = self.element(node) {
            element.remove();
        }
    }

    fn has_control(&self, card: CardIndex, control: CardControl) -> bool {
        self.cards
            .get(card)
            .is_some_and(|c| c.control(control).is_some())
    }
}
