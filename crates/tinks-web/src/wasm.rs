#![forbid(unsafe_code)]

//! JS-facing exports and browser event wiring.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use tinks_core::flip::InputMode;
use tinks_core::navigation::Direction;
use tinks_core::{HostCommand, PageConfig, PageEvent, PageRunner};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, Window};

use crate::MountError;
use crate::console;
use crate::dom::DomTree;

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// State shared between the exported handle and every DOM callback.
///
/// Listeners hold an `Rc` to this, so it lives as long as the page.
struct Shared {
    runner: RefCell<PageRunner<DomTree>>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Shared {
    /// Run `f` against the runner, then fulfil whatever it asked for.
    fn drive(self: &Rc<Self>, f: impl FnOnce(&mut PageRunner<DomTree>)) {
        let commands = {
            let Ok(mut runner) = self.runner.try_borrow_mut() else {
                warn!(target: "tinks::runner", "re-entrant dispatch dropped");
                return;
            };
            f(&mut runner);
            runner.take_commands()
        };
        for command in commands {
            self.schedule(command);
        }
    }

    fn dispatch(self: &Rc<Self>, event: PageEvent) {
        self.drive(|runner| runner.dispatch(event));
    }

    fn schedule(self: &Rc<Self>, command: HostCommand) {
        match command {
            HostCommand::RequestFrame => {
                let shared = Rc::clone(self);
                let handle = request_animation_frame(move |_| {
                    shared.frame.borrow_mut().take();
                    shared.dispatch(PageEvent::Frame);
                });
                *self.frame.borrow_mut() = Some(handle);
            }
            HostCommand::StartTimer { delay, step } => {
                let shared = Rc::clone(self);
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                // One-shot and never cancelled.
                let _ = Timeout::new(millis, move || shared.dispatch(PageEvent::Timer(step)))
                    .forget();
            }
        }
    }

    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        event_type: &'static str,
        mut to_event: impl FnMut(&web_sys::Event) -> Option<PageEvent> + 'static,
    ) -> EventListener {
        let shared = Rc::clone(self);
        EventListener::new(target, event_type, move |event| {
            if let Some(page_event) = to_event(event) {
                shared.dispatch(page_event);
            }
        })
    }
}

fn detect_touch(window: &Window) -> bool {
    let has_handler = Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    has_handler || window.navigator().max_touch_points() > 0
}

fn mount_page(config: PageConfig) -> Result<TinksPage, MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let document = window.document().ok_or(MountError::NoDocument)?;
    let tree = DomTree::locate(&document, &config.selectors)?;

    let carousel: Element = tree.carousel().clone();
    let cards = tree.cards().to_vec();
    let arrows = [
        (config.selectors.prev_id.clone(), Direction::Previous),
        (config.selectors.next_id.clone(), Direction::Next),
    ];

    let runner = PageRunner::new(tree, config, detect_touch(&window));
    let mode = runner.input_mode();
    let shared = Rc::new(Shared {
        runner: RefCell::new(runner),
        frame: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
    });

    // gloo listeners are passive by default.
    let mut listeners = vec![shared.listen(&carousel, "scroll", |_| Some(PageEvent::Scroll))];

    for (id, direction) in arrows {
        match document.get_element_by_id(&id) {
            Some(button) => listeners.push(shared.listen(&button, "click", move |_| {
                Some(PageEvent::Navigate(direction))
            })),
            None => warn!(target: "tinks::nav", id = %id, "navigation button missing; not wired"),
        }
    }

    for (index, card) in cards.into_iter().enumerate() {
        if mode == InputMode::Pointer {
            listeners.push(shared.listen(&card.root, "mouseenter", move |_| {
                Some(PageEvent::PointerEnter(index))
            }));
            listeners.push(shared.listen(&card.root, "mouseleave", move |_| {
                Some(PageEvent::PointerLeave(index))
            }));
        }
        let root = card.root.clone();
        listeners.push(shared.listen(&root, "click", move |event| {
            Some(PageEvent::Click {
                card: index,
                target: card.click_target(event.target()),
            })
        }));
    }

    debug!(target: "tinks::runner", listeners = listeners.len(), "listeners attached");
    *shared.listeners.borrow_mut() = listeners;
    shared.drive(PageRunner::start);

    Ok(TinksPage { shared })
}

/// Handle to a mounted page.
#[wasm_bindgen]
pub struct TinksPage {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl TinksPage {
    /// Index of the card nearest the carousel's horizontal center.
    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> u32 {
        self.shared
            .runner
            .try_borrow()
            .map_or(0, |r| u32::try_from(r.active_index()).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen(js_name = cardCount)]
    pub fn card_count(&self) -> u32 {
        self.shared
            .runner
            .try_borrow()
            .map_or(0, |r| u32::try_from(r.card_count()).unwrap_or(u32::MAX))
    }

    #[wasm_bindgen(js_name = isFlipped)]
    pub fn is_flipped(&self, card: u32) -> bool {
        self.shared
            .runner
            .try_borrow()
            .is_ok_and(|r| r.is_flipped(card as usize))
    }

    /// `"visible"`, `"fading"`, `"removed"`, `"entered"` or `"settled"`.
    #[wasm_bindgen(js_name = splashPhase)]
    pub fn splash_phase(&self) -> String {
        self.shared
            .runner
            .try_borrow()
            .map_or_else(|_| String::new(), |r| r.splash_phase().label().to_owned())
    }

    /// `"pointer"` or `"touch"`.
    #[wasm_bindgen(js_name = inputMode)]
    pub fn input_mode(&self) -> String {
        self.shared
            .runner
            .try_borrow()
            .map_or_else(|_| String::new(), |r| r.input_mode().label().to_owned())
    }

    /// Same as pressing an arrow button. `direction` is `"prev"` or `"next"`.
    ///
    /// Returns `false` for an unrecognised direction.
    pub fn navigate(&self, direction: &str) -> bool {
        let Some(direction) = Direction::from_label(direction) else {
            warn!(target: "tinks::nav", direction, "unknown direction");
            return false;
        };
        self.shared.dispatch(PageEvent::Navigate(direction));
        true
    }
}

/// Wire the page with default selectors, classes and timings.
#[wasm_bindgen]
pub fn mount() -> Result<TinksPage, JsValue> {
    mount_with_config("{}")
}

/// Wire the page with a JSON configuration; absent keys take defaults.
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(json: &str) -> Result<TinksPage, JsValue> {
    console::install_panic_hook();
    let config = PageConfig::from_json(json).map_err(MountError::from)?;
    console::init(config.log_level);
    let page = mount_page(config)?;
    info!(
        target: "tinks::runner",
        cards = page.card_count(),
        mode = %page.input_mode(),
        "page mounted"
    );
    Ok(page)
}
