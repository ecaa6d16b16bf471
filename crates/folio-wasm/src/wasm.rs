#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PortfolioRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] over a [`DomSurface`]
//! and wires browser events into it. Only compiled on `wasm32` targets.
//!
//! Two ways to drive it:
//!
//! - `attach()` installs DOM listeners, an `IntersectionObserver` and a timer
//!   pump that follows the wall clock;
//! - without `attach()`, the host pushes encoded inputs and advances time
//!   itself (replay and tests).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_core::element::ElementHandle;
use folio_core::event::{ClickEvent, Event, KeyEvent, Modifiers, VisibilityEntry};
use folio_core::geometry::Point;
use folio_runtime::log_sink::LogSink;
use folio_web::{FolioError, PageIndex};
use folio_web::synchronizer::Dispatch;
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use web_time::Instant;

use super::dom_surface::DomSurface;
use super::runner_core::{LOG_CAPACITY, RunnerCore};

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn console_log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn modifiers_of(event: &web_sys::KeyboardEvent) -> Modifiers {
    let mut mods = Modifiers::NONE;
    mods.set(Modifiers::SHIFT, event.shift_key());
    mods.set(Modifiers::ALT, event.alt_key());
    mods.set(Modifiers::CTRL, event.ctrl_key());
    mods.set(Modifiers::SUPER, event.meta_key());
    mods
}

/// State shared between the runner and its DOM callbacks.
struct Shared {
    core: RefCell<RunnerCore<DomSurface>>,
    started: Instant,
    live: Cell<bool>,
    poll_visibility: Cell<bool>,
    pump: RefCell<Option<Timeout>>,
}

impl Shared {
    fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Dispatch one event. Dropped if a dispatch is already running.
    fn dispatch(self: &Rc<Self>, event: Event) -> Dispatch {
        let Ok(mut core) = self.core.try_borrow_mut() else {
            return Dispatch::default();
        };
        if self.live.get() {
            core.set_time_ms(self.elapsed_ms());
        }
        let scrolled = matches!(event, Event::Scroll);
        let mut dispatch = core.handle(event);
        if scrolled && self.poll_visibility.get() {
            let polled = core.poll_visibility();
            dispatch.listeners_run += polled.listeners_run;
        }
        drop(core);
        self.schedule_pump();
        dispatch
    }

    fn resolve_target(&self, target: Option<web_sys::EventTarget>) -> Option<ElementHandle> {
        let core = self.core.try_borrow().ok()?;
        core.synchronizer().surface().resolve_target(target)
    }

    /// Re-arm the wall-clock timeout for the earliest pending timer.
    fn schedule_pump(self: &Rc<Self>) {
        if !self.live.get() {
            return;
        }
        let delay = self.core.try_borrow().ok().and_then(|c| c.next_timer_delay_ms());
        let Some(delay) = delay else {
            self.pump.replace(None);
            return;
        };
        let millis = delay.ceil().clamp(0.0, f64::from(u32::MAX)) as u32;
        let weak = Rc::downgrade(self);
        let timeout = Timeout::new(millis, move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            if let Ok(mut core) = shared.core.try_borrow_mut() {
                core.set_time_ms(shared.elapsed_ms());
            }
            shared.schedule_pump();
        });
        self.pump.replace(Some(timeout));
    }
}

/// Portfolio page runner.
///
/// Owns the page synchronizer for the current document. Listeners and the
/// observer live as long as the runner; dropping it detaches everything.
#[wasm_bindgen]
pub struct PortfolioRunner {
    shared: Rc<Shared>,
    listeners: Vec<EventListener>,
    observer: Option<IntersectionObserver>,
    observer_callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioRunner {
    /// Create a runner over the current document.
    ///
    /// `config_json` overrides the defaults; omit it or pass an empty string
    /// to keep them. Fails on invalid configuration or outside a browser page.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        let logs = LogSink::new(LOG_CAPACITY).with_echo(console_log);
        // A second runner keeps the subscriber the first one installed.
        let _ = logs.install_global("info");
        let core = DomSurface::from_window()
            .ok_or_else(|| FolioError::Host("no window or document available".into()))
            .and_then(|surface| RunnerCore::new(surface, config_json.as_deref(), logs))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            shared: Rc::new(Shared {
                core: RefCell::new(core),
                started: Instant::now(),
                live: Cell::new(false),
                poll_visibility: Cell::new(false),
                pump: RefCell::new(None),
            }),
            listeners: Vec::new(),
            observer: None,
            observer_callback: None,
        })
    }

    /// Run the first scroll pass. Later calls do nothing.
    pub fn init(&mut self) {
        self.shared.core.borrow_mut().init();
    }

    /// Install DOM listeners and start following the wall clock.
    pub fn attach(&mut self) {
        if self.shared.live.get() {
            return;
        }
        self.shared.live.set(true);
        self.init();
        self.install_listeners();
        if !self.observe_sections() {
            tracing::warn!("IntersectionObserver unavailable; polling visibility on scroll");
            self.shared.poll_visibility.set(true);
            self.shared.core.borrow_mut().poll_visibility();
        }
        self.shared.schedule_pump();
    }

    /// Remove listeners and the observer and stop the timer pump.
    pub fn detach(&mut self) {
        self.listeners.clear();
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.observer_callback = None;
        self.shared.live.set(false);
        self.shared.poll_visibility.set(false);
        self.shared.pump.replace(None);
    }

    /// Advance the clock by `dt_ms` milliseconds. Returns timers fired.
    #[wasm_bindgen(js_name = advanceTimeMs)]
    pub fn advance_time_ms(&mut self, dt_ms: f64) -> u32 {
        let fired = self.shared.core.borrow_mut().advance_time_ms(dt_ms);
        u32::try_from(fired).unwrap_or(u32::MAX)
    }

    /// Set the clock to `ts_ms` milliseconds since start (replay mode).
    #[wasm_bindgen(js_name = setTimeMs)]
    pub fn set_time_ms(&mut self, ts_ms: f64) -> u32 {
        let fired = self.shared.core.borrow_mut().set_time_ms(ts_ms);
        u32::try_from(fired).unwrap_or(u32::MAX)
    }

    /// Milliseconds until the next timer, or `undefined` when idle.
    #[wasm_bindgen(js_name = nextTimerDelayMs)]
    pub fn next_timer_delay_ms(&self) -> Option<f64> {
        self.shared.core.borrow().next_timer_delay_ms()
    }

    /// Parse a JSON-encoded input and dispatch it.
    /// Returns `true` if accepted, `false` if unsupported or malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        let accepted = self.shared.core.borrow_mut().push_encoded_input(json);
        self.shared.schedule_pump();
        accepted
    }

    /// Re-evaluate section visibility without an observer.
    #[wasm_bindgen(js_name = pollVisibility)]
    pub fn poll_visibility(&mut self) -> u32 {
        let dispatch = self.shared.core.borrow_mut().poll_visibility();
        self.shared.schedule_pump();
        u32::try_from(dispatch.listeners_run).unwrap_or(u32::MAX)
    }

    #[wasm_bindgen(js_name = showToast)]
    pub fn show_toast(&mut self, title: &str, message: &str, success: bool) -> bool {
        let shown = self.shared.core.borrow_mut().show_toast(title, message, success);
        self.shared.schedule_pump();
        shown
    }

    /// Type `text` into the element with id `element_id`.
    #[wasm_bindgen(js_name = typeText)]
    pub fn type_text(&mut self, element_id: &str, text: &str) -> bool {
        let mut core = self.shared.core.borrow_mut();
        let Some(target) = core
            .synchronizer_mut()
            .surface_mut()
            .element_by_id(element_id)
        else {
            return false;
        };
        core.type_text(target, text);
        drop(core);
        self.shared.schedule_pump();
        true
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.shared
            .core
            .borrow()
            .active_section()
            .map(str::to_string)
    }

    #[wasm_bindgen(js_name = isSending)]
    pub fn is_sending(&self) -> bool {
        self.shared.core.borrow().synchronizer().is_sending()
    }

    /// Drain buffered log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let arr = Array::new();
        for line in self.shared.core.borrow_mut().take_logs() {
            arr.push(&JsValue::from_str(&line));
        }
        arr
    }
}

impl PortfolioRunner {
    fn install_listeners(&mut self) {
        let (window, document, form) = {
            let core = self.shared.core.borrow();
            let sync = core.synchronizer();
            let surface = sync.surface();
            let form = sync
                .page()
                .form
                .and_then(|f| surface.element(f.form).cloned());
            (surface.window().clone(), surface.document().clone(), form)
        };

        let shared = Rc::clone(&self.shared);
        self.listeners
            .push(EventListener::new(&window, "scroll", move |_event| {
                shared.dispatch(Event::Scroll);
            }));

        let shared = Rc::clone(&self.shared);
        self.listeners
            .push(EventListener::new(&document, "mousemove", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::MouseEvent>() else {
                    return;
                };
                let point = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
                shared.dispatch(Event::PointerMove(point));
            }));

        let shared = Rc::clone(&self.shared);
        self.listeners.push(EventListener::new_with_options(
            &document,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let target = shared.resolve_target(event.target());
                if shared.dispatch(Event::Click(ClickEvent { target })).prevented_default {
                    event.prevent_default();
                }
            },
        ));

        let shared = Rc::clone(&self.shared);
        self.listeners
            .push(EventListener::new(&document, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                let key = KeyEvent::from_dom_key(&event.key())
                    .with_modifiers(modifiers_of(event))
                    .with_repeat(event.repeat());
                shared.dispatch(Event::Key(key));
            }));

        if let Some(form) = form {
            let shared = Rc::clone(&self.shared);
            self.listeners.push(EventListener::new_with_options(
                &form,
                "submit",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    if shared.dispatch(Event::Submit).prevented_default {
                        event.prevent_default();
                    }
                },
            ));
        }

        if document.ready_state() == "loading" {
            let shared = Rc::clone(&self.shared);
            self.listeners.push(EventListener::once(
                &document,
                "DOMContentLoaded",
                move |_event| {
                    shared.dispatch(Event::ContentLoaded);
                },
            ));
        } else {
            self.shared.dispatch(Event::ContentLoaded);
        }
    }

    /// Observe every section with a native `IntersectionObserver`.
    ///
    /// Returns `false` when the browser cannot construct one.
    fn observe_sections(&mut self) -> bool {
        let shared = Rc::clone(&self.shared);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let records: Vec<VisibilityEntry> = {
                    let Ok(core) = shared.core.try_borrow() else {
                        return;
                    };
                    let surface = core.synchronizer().surface();
                    entries
                        .iter()
                        .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                        .filter_map(|entry| {
                            let target = surface.handle_of(&entry.target())?;
                            Some(VisibilityEntry::new(
                                target,
                                entry.is_intersecting(),
                                entry.intersection_ratio(),
                            ))
                        })
                        .collect()
                };
                if !records.is_empty() {
                    shared.dispatch(Event::Visibility(records));
                }
            },
        );

        let core = self.shared.core.borrow();
        let sync = core.synchronizer();
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(sync.config().observer.threshold));
        init.set_root_margin(&sync.config().observer.root_margin.to_css());
        let Ok(observer) =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        else {
            return false;
        };
        for section in &sync.page().observed_sections {
            if let Some(el) = sync.surface().element(section.element) {
                observer.observe(el);
            }
        }
        drop(core);
        self.observer = Some(observer);
        self.observer_callback = Some(callback);
        true
    }
}

impl Drop for PortfolioRunner {
    fn drop(&mut self) {
        self.detach();
    }
}
