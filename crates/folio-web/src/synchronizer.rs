#![forbid(unsafe_code)]

//! The page synchronizer.
//!
//! [`Synchronizer`] owns a surface, the page model, every behavior, and the
//! timer queue. Hosts push [`Event`]s with [`handle`](Synchronizer::handle)
//! and move time forward with [`advance_time`](Synchronizer::advance_time);
//! nothing happens on its own.
//!
//! # Dispatch order
//!
//! Behaviors are registered per [`Signal`] at construction, and run in
//! registration order for every event of that signal:
//!
//! | signal | behaviors |
//! |---|---|
//! | scroll | active nav, navbar, reveal, parallax |
//! | click | mobile menu, smooth scroll, menu dismissal |
//! | visibility | progress fill |
//! | key | konami |
//! | submit | contact form |
//! | pointer move | follower |
//! | content loaded | page loaded |
//!
//! Timers fire in deadline order. [`advance_time`](Synchronizer::advance_time)
//! steps the clock to each deadline in turn, so a timer armed by another
//! timer's action is measured from the moment that action ran.

use folio_core::element::ElementHandle;
use folio_core::event::Event;
use folio_runtime::listeners::ListenerRegistry;
use tracing::{debug, debug_span, info, trace, trace_span};
use web_time::Duration;

use crate::active_nav::ActiveNavTracker;
use crate::config::FolioConfig;
use crate::contact_form::{ContactForm, SimulatedTransport, SubmitTransport};
use crate::easter_egg::KonamiEasterEgg;
use crate::effects;
use crate::error::FolioError;
use crate::input_parser::parse_encoded_input;
use crate::mobile_menu;
use crate::page::PageModel;
use crate::progress_fill::ProgressFill;
use crate::reveal::RevealAnimator;
use crate::smooth_scroll;
use crate::surface::{PageIndex, ViewSurface};
use crate::timers::{TimerAction, Timers};
use crate::toast::{Toast, ToastKind};
use crate::typewriter::Typewriter;
use crate::visibility::VisibilityTracker;

/// Event family a behavior listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Scroll,
    PointerMove,
    Click,
    Key,
    Submit,
    ContentLoaded,
    Visibility,
}

impl Signal {
    #[must_use]
    pub const fn of(event: &Event) -> Self {
        match event {
            Event::Scroll => Self::Scroll,
            Event::PointerMove(_) => Self::PointerMove,
            Event::Click(_) => Self::Click,
            Event::Key(_) => Self::Key,
            Event::Submit => Self::Submit,
            Event::ContentLoaded => Self::ContentLoaded,
            Event::Visibility(_) => Self::Visibility,
        }
    }
}

/// A registered event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    ActiveNav,
    Navbar,
    Reveal,
    Parallax,
    Follower,
    MobileMenu,
    SmoothScroll,
    MenuDismiss,
    ProgressFill,
    Konami,
    ContactForm,
    PageLoaded,
}

/// Registration order, per signal.
const REGISTRATIONS: &[(Signal, Behavior)] = &[
    (Signal::PointerMove, Behavior::Follower),
    (Signal::Click, Behavior::MobileMenu),
    (Signal::Click, Behavior::SmoothScroll),
    (Signal::Click, Behavior::MenuDismiss),
    (Signal::Scroll, Behavior::ActiveNav),
    (Signal::Scroll, Behavior::Navbar),
    (Signal::Scroll, Behavior::Reveal),
    (Signal::Submit, Behavior::ContactForm),
    (Signal::Visibility, Behavior::ProgressFill),
    (Signal::Scroll, Behavior::Parallax),
    (Signal::Key, Behavior::Konami),
    (Signal::ContentLoaded, Behavior::PageLoaded),
];

/// What handling one event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dispatch {
    /// Behaviors that ran.
    pub listeners_run: usize,
    /// The host must cancel the browser's default action.
    pub prevented_default: bool,
}

/// Event-driven page state machine over a [`ViewSurface`].
#[derive(Debug)]
pub struct Synchronizer<S, T = SimulatedTransport> {
    surface: S,
    transport: T,
    config: FolioConfig,
    page: PageModel,
    timers: Timers,
    listeners: ListenerRegistry<Signal, Behavior>,
    active_nav: ActiveNavTracker,
    reveal: RevealAnimator,
    progress: ProgressFill,
    visibility: VisibilityTracker,
    toast: Toast,
    form: ContactForm,
    konami: KonamiEasterEgg,
    typewriter: Typewriter,
    active_section: Option<String>,
}

impl<S: ViewSurface + PageIndex> Synchronizer<S, SimulatedTransport> {
    /// Scan `surface` and build a synchronizer with the simulated transport.
    pub fn new(surface: S, config: FolioConfig) -> Result<Self, FolioError> {
        Self::with_transport(surface, config, SimulatedTransport)
    }
}

impl<S: ViewSurface + PageIndex, T: SubmitTransport> Synchronizer<S, T> {
    /// Scan `surface` and build a synchronizer delivering form submissions
    /// through `transport`.
    pub fn with_transport(mut surface: S, config: FolioConfig, transport: T) -> Result<Self, FolioError> {
        let config = config.validated()?;
        let page = PageModel::scan(&mut surface, &config.names);
        Ok(Self::from_parts(surface, config, page, transport))
    }
}

impl<S: ViewSurface, T: SubmitTransport> Synchronizer<S, T> {
    /// Build from an already scanned page. `config` is assumed valid.
    pub fn from_parts(surface: S, config: FolioConfig, page: PageModel, transport: T) -> Self {
        let mut listeners = ListenerRegistry::new();
        for &(signal, behavior) in REGISTRATIONS {
            listeners.register(signal, behavior);
        }
        let mut visibility =
            VisibilityTracker::new(config.observer.threshold, config.observer.root_margin);
        for section in &page.observed_sections {
            visibility.observe(section.element);
        }
        debug!(page = %page.summary(), "page scanned");
        Self {
            active_nav: ActiveNavTracker::new(config.nav.probe_offset_px),
            reveal: RevealAnimator::new(config.reveal.offset_px),
            progress: ProgressFill::new(
                config.observer.stagger(),
                config.names.progress_width_property.clone(),
            ),
            konami: KonamiEasterEgg::new(&config.konami),
            typewriter: Typewriter::new(Duration::from_millis(config.typewriter.speed_ms)),
            toast: Toast::new(),
            form: ContactForm::new(),
            timers: Timers::new(),
            active_section: None,
            surface,
            transport,
            config,
            page,
            listeners,
            visibility,
        }
    }

    /// First pass of the scroll-driven behaviors, before any event arrives.
    pub fn init(&mut self) -> Dispatch {
        let _span = debug_span!("init").entered();
        self.run_behavior(Behavior::ActiveNav, &Event::Scroll);
        self.run_behavior(Behavior::Reveal, &Event::Scroll);
        info!(
            listeners = self.listeners.len(),
            active = self.active_section.as_deref().unwrap_or("-"),
            "synchronizer initialized"
        );
        Dispatch {
            listeners_run: 2,
            prevented_default: false,
        }
    }

    /// Run every behavior registered for the event's signal.
    pub fn handle(&mut self, event: Event) -> Dispatch {
        let signal = Signal::of(&event);
        let _span = match signal {
            Signal::Scroll => debug_span!("scroll", y = self.surface.scroll_y()).entered(),
            _ => trace_span!("event", kind = event.kind()).entered(),
        };
        let mut dispatch = Dispatch::default();
        for behavior in self.listeners.listeners(signal) {
            dispatch.prevented_default |= self.run_behavior(behavior, &event);
            dispatch.listeners_run += 1;
        }
        dispatch
    }

    /// Parse and handle one JSON-encoded input.
    pub fn handle_encoded(&mut self, json: &str) -> Result<Dispatch, FolioError> {
        Ok(match parse_encoded_input(json)? {
            Some(event) => self.handle(event),
            None => Dispatch::default(),
        })
    }

    /// Re-evaluate section visibility with the built-in tracker and dispatch
    /// any resulting records. For hosts without a native observer.
    pub fn poll_visibility(&mut self) -> Dispatch {
        let entries = self.visibility.evaluate(&self.surface);
        if entries.is_empty() {
            return Dispatch::default();
        }
        self.handle(Event::Visibility(entries))
    }

    /// Returns `true` when default navigation must be prevented.
    fn run_behavior(&mut self, behavior: Behavior, event: &Event) -> bool {
        trace!(?behavior, event = event.kind(), "run");
        match (behavior, event) {
            (Behavior::ActiveNav, _) => {
                let matched =
                    self.active_nav
                        .update(&mut self.surface, &self.page.sections, &self.page.nav_links);
                if matched != self.active_section.as_deref() {
                    debug!(section = matched.unwrap_or("-"), "active section changed");
                    self.active_section = matched.map(str::to_string);
                }
            }
            (Behavior::Navbar, _) => {
                if let Some(navbar) = self.page.navbar {
                    effects::update_navbar(&mut self.surface, navbar, &self.config.navbar);
                }
            }
            (Behavior::Reveal, _) => {
                self.reveal.update(&mut self.surface, &self.page.reveal_cards);
            }
            (Behavior::Parallax, _) => {
                if let Some(blobs) = self.page.parallax {
                    effects::apply_parallax(&mut self.surface, blobs, &self.config.parallax);
                }
            }
            (Behavior::Follower, Event::PointerMove(point)) => {
                if let Some(follower) = self.page.mouse_follower {
                    effects::move_follower(&mut self.surface, follower, *point, &self.config.follower);
                }
            }
            (Behavior::MobileMenu, Event::Click(click)) => {
                if let Some(target) = click.target {
                    mobile_menu::on_element_click(
                        &mut self.surface,
                        &self.page.menu,
                        &self.page.menu_links,
                        target,
                    );
                }
            }
            (Behavior::SmoothScroll, Event::Click(click)) => {
                if let Some(target) = click.target {
                    return smooth_scroll::on_click(&mut self.surface, &self.page.anchors, target);
                }
            }
            (Behavior::MenuDismiss, Event::Click(click)) => {
                mobile_menu::dismiss_on_outside_click(&mut self.surface, &self.page.menu, click.target);
            }
            (Behavior::ProgressFill, Event::Visibility(entries)) => {
                self.progress.on_visibility(
                    &mut self.surface,
                    &self.page.observed_sections,
                    entries,
                    &mut self.timers,
                );
            }
            (Behavior::Konami, Event::Key(key)) => {
                self.konami.on_key(
                    &mut self.surface,
                    self.page.body,
                    &self.config.konami,
                    &mut self.timers,
                    key,
                );
            }
            (Behavior::ContactForm, Event::Submit) => {
                self.form.submit(
                    &mut self.surface,
                    self.page.form.as_ref(),
                    &self.config.form,
                    &mut self.timers,
                );
                return self.page.form.is_some();
            }
            (Behavior::PageLoaded, Event::ContentLoaded) => {
                effects::mark_loaded(&mut self.surface, self.page.body);
            }
            (behavior, event) => {
                trace!(?behavior, event = event.kind(), "event shape not handled");
            }
        }
        false
    }

    /// Move the clock forward by `dt`, firing due timers along the way.
    ///
    /// Returns the number of timers fired.
    pub fn advance_time(&mut self, dt: Duration) -> usize {
        let target = self.timers.now().saturating_add(dt);
        self.run_until(target)
    }

    /// Jump the clock to `now`. Going backwards is ignored.
    pub fn set_time(&mut self, now: Duration) -> usize {
        if now < self.timers.now() {
            return 0;
        }
        self.run_until(now)
    }

    fn run_until(&mut self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some(delay) = self.timers.next_delay() {
            let deadline = self.timers.now().saturating_add(delay);
            if deadline > target {
                break;
            }
            self.timers.set_time(deadline);
            while let Some((_, action)) = self.timers.pop_due() {
                self.fire(action);
                fired += 1;
            }
        }
        self.timers.set_time(target);
        fired
    }

    fn fire(&mut self, action: TimerAction) {
        trace!(action = action.name(), "timer fired");
        match action {
            TimerAction::HideToast => self.toast.hide(&mut self.surface, self.page.toast.as_ref()),
            TimerAction::FillProgress { bar } => {
                self.progress.fill(&mut self.surface, bar);
            }
            TimerAction::CompleteSubmit => {
                let outcome = self.form.complete(
                    &mut self.surface,
                    self.page.form.as_ref(),
                    &mut self.transport,
                );
                let form = &self.config.form;
                let (title, message, kind) = match &outcome {
                    Some(Ok(())) => (
                        form.success_title.as_str(),
                        form.success_message.as_str(),
                        ToastKind::Success,
                    ),
                    Some(Err(e)) => (form.failure_title.as_str(), e.message(), ToastKind::Failure),
                    None => return,
                };
                self.toast.show(
                    &mut self.surface,
                    self.page.toast.as_ref(),
                    &self.config.toast,
                    &mut self.timers,
                    title,
                    message,
                    kind,
                );
            }
            TimerAction::ClearRainbow => self.konami.clear(&mut self.surface, self.page.body),
            TimerAction::TypeNext { target } => {
                self.typewriter.step(&mut self.surface, &mut self.timers, target);
            }
        }
    }

    /// Show the toast directly.
    pub fn show_toast(&mut self, title: &str, message: &str, kind: ToastKind) -> bool {
        self.toast.show(
            &mut self.surface,
            self.page.toast.as_ref(),
            &self.config.toast,
            &mut self.timers,
            title,
            message,
            kind,
        )
    }

    /// Start a typewriter run on `target`.
    pub fn type_text(&mut self, target: ElementHandle, text: &str) {
        self.typewriter
            .start(&mut self.surface, &mut self.timers, target, text);
    }

    /// Time until the next timer is due.
    #[must_use]
    pub fn next_timer_delay(&self) -> Option<Duration> {
        self.timers.next_delay()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Id of the section last matched by the active-nav tracker.
    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        self.form.is_sending()
    }

    #[must_use]
    pub fn konami_triggered(&self) -> u64 {
        self.konami.triggered()
    }

    /// Behaviors registered for `signal`, in dispatch order.
    #[must_use]
    pub fn behaviors(&self, signal: Signal) -> Vec<Behavior> {
        self.listeners.listeners(signal)
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn page(&self) -> &PageModel {
        &self.page
    }

    #[must_use]
    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Tear down into the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::ViewQuery;

    fn empty() -> Synchronizer<MemorySurface> {
        Synchronizer::new(MemorySurface::new(800.0, 600.0), FolioConfig::default()).unwrap()
    }

    #[test]
    fn scroll_listeners_keep_registration_order() {
        let sync = empty();
        assert_eq!(
            sync.behaviors(Signal::Scroll),
            vec![Behavior::ActiveNav, Behavior::Navbar, Behavior::Reveal, Behavior::Parallax]
        );
        assert_eq!(
            sync.behaviors(Signal::Click),
            vec![Behavior::MobileMenu, Behavior::SmoothScroll, Behavior::MenuDismiss]
        );
    }

    #[test]
    fn empty_page_handles_everything_quietly() {
        let mut sync = empty();
        sync.init();
        for event in [
            Event::Scroll,
            Event::Submit,
            Event::ContentLoaded,
            Event::Click(folio_core::ClickEvent::background()),
        ] {
            let dispatch = sync.handle(event);
            assert!(!dispatch.prevented_default);
        }
        assert_eq!(sync.pending_timers(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = FolioConfig::default();
        config.toast.duration_ms = 0;
        let err = Synchronizer::new(MemorySurface::new(800.0, 600.0), config).unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn time_steps_through_deadlines() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let h1 = s.append_to_body(ElementSpec::new("h1"));
        let mut sync = Synchronizer::new(s, FolioConfig::default()).unwrap();
        sync.type_text(h1, "abcd");
        assert_eq!(sync.advance_time(Duration::from_millis(1000)), 3);
        assert_eq!(sync.surface().text(h1).as_deref(), Some("abcd"));
        assert_eq!(sync.now(), Duration::from_millis(1000));
    }

    #[test]
    fn set_time_ignores_the_past() {
        let mut sync = empty();
        sync.set_time(Duration::from_secs(2));
        assert_eq!(sync.set_time(Duration::from_secs(1)), 0);
        assert_eq!(sync.now(), Duration::from_secs(2));
    }
}
