#![forbid(unsafe_code)]

//! Toast notification.
//!
//! One toast per page. Showing it writes title, message and icon, adds
//! `show`, and arms a hide timer. The timer handle is kept here so that a
//! second toast cancels the first one's hide and gets its own full window.

use folio_runtime::timer::TimerId;
use tracing::{debug, warn};

use crate::config::ToastConfig;
use crate::page::ToastElements;
use crate::surface::ViewSurface;
use crate::timers::{TimerAction, Timers};

pub const SHOW_CLASS: &str = "show";

/// Outcome shown by the toast icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Success,
    Failure,
}

impl ToastKind {
    #[must_use]
    pub fn glyph(self, config: &ToastConfig) -> &str {
        match self {
            Self::Success => &config.success_glyph,
            Self::Failure => &config.failure_glyph,
        }
    }

    #[must_use]
    pub fn color(self, config: &ToastConfig) -> &str {
        match self {
            Self::Success => &config.success_color,
            Self::Failure => &config.failure_color,
        }
    }
}

/// Toast controller.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    hide_timer: Option<TimerId>,
}

impl Toast {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the toast and (re)arm its hide timer.
    ///
    /// Returns `false` when the page has no toast.
    #[allow(clippy::too_many_arguments)]
    pub fn show<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        elements: Option<&ToastElements>,
        config: &ToastConfig,
        timers: &mut Timers,
        title: &str,
        message: &str,
        kind: ToastKind,
    ) -> bool {
        let Some(elements) = elements else {
            warn!(title, "no toast element on the page");
            return false;
        };
        if let Some(el) = elements.title {
            surface.set_text(el, title);
        }
        if let Some(el) = elements.message {
            surface.set_text(el, message);
        }
        if let Some(icon) = elements.icon {
            surface.set_text(icon, kind.glyph(config));
            surface.set_style(icon, "background", kind.color(config));
        }
        surface.add_class(elements.root, SHOW_CLASS);
        self.hide_timer = Some(timers.reschedule(
            self.hide_timer.take(),
            config.duration(),
            TimerAction::HideToast,
        ));
        debug!(title, ?kind, "toast shown");
        true
    }

    /// Hide the toast; called when the hide timer fires.
    pub fn hide<S: ViewSurface + ?Sized>(&mut self, surface: &mut S, elements: Option<&ToastElements>) {
        self.hide_timer = None;
        if let Some(elements) = elements {
            surface.remove_class(elements.root, SHOW_CLASS);
        }
    }

    /// Whether a hide is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.hide_timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::ViewQuery;
    use web_time::Duration;

    fn toast_page() -> (MemorySurface, ToastElements) {
        let mut s = MemorySurface::new(800.0, 600.0);
        let root = s.append_to_body(ElementSpec::new("div").id("toast"));
        let icon = s.append(root, ElementSpec::new("div").class("toast-icon"));
        let title = s.append(root, ElementSpec::new("h4").id("toastTitle"));
        let message = s.append(root, ElementSpec::new("p").id("toastMessage"));
        (
            s,
            ToastElements {
                root,
                title: Some(title),
                message: Some(message),
                icon: Some(icon),
            },
        )
    }

    fn fire_due(toast: &mut Toast, s: &mut MemorySurface, els: &ToastElements, timers: &mut Timers) {
        while let Some((_, action)) = timers.pop_due() {
            if action == TimerAction::HideToast {
                toast.hide(s, Some(els));
            }
        }
    }

    #[test]
    fn success_and_failure_styling() {
        let (mut s, els) = toast_page();
        let cfg = ToastConfig::default();
        let mut timers = Timers::new();
        let mut toast = Toast::new();

        toast.show(&mut s, Some(&els), &cfg, &mut timers, "Done", "ok", ToastKind::Success);
        assert_eq!(s.text(els.icon.unwrap()).as_deref(), Some("✓"));
        assert_eq!(s.style(els.icon.unwrap(), "background").as_deref(), Some("#4ade80"));
        assert_eq!(s.text(els.title.unwrap()).as_deref(), Some("Done"));
        assert_eq!(s.text(els.message.unwrap()).as_deref(), Some("ok"));
        assert!(s.has_class(els.root, SHOW_CLASS));

        toast.show(&mut s, Some(&els), &cfg, &mut timers, "Err", "bad", ToastKind::Failure);
        assert_eq!(s.text(els.icon.unwrap()).as_deref(), Some("✗"));
        assert_eq!(s.style(els.icon.unwrap(), "background").as_deref(), Some("#ef4444"));
    }

    #[test]
    fn hides_after_duration() {
        let (mut s, els) = toast_page();
        let cfg = ToastConfig::default();
        let mut timers = Timers::new();
        let mut toast = Toast::new();
        toast.show(&mut s, Some(&els), &cfg, &mut timers, "t", "m", ToastKind::Success);
        timers.advance(Duration::from_millis(3999));
        fire_due(&mut toast, &mut s, &els, &mut timers);
        assert!(s.has_class(els.root, SHOW_CLASS));
        timers.advance(Duration::from_millis(1));
        fire_due(&mut toast, &mut s, &els, &mut timers);
        assert!(!s.has_class(els.root, SHOW_CLASS));
        assert!(!toast.is_armed());
    }

    #[test]
    fn second_show_gets_full_window() {
        let (mut s, els) = toast_page();
        let cfg = ToastConfig::default();
        let mut timers = Timers::new();
        let mut toast = Toast::new();
        toast.show(&mut s, Some(&els), &cfg, &mut timers, "a", "", ToastKind::Success);
        timers.advance(Duration::from_millis(3000));
        toast.show(&mut s, Some(&els), &cfg, &mut timers, "b", "", ToastKind::Success);
        timers.advance(Duration::from_millis(1500));
        fire_due(&mut toast, &mut s, &els, &mut timers);
        assert!(s.has_class(els.root, SHOW_CLASS), "first hide must not fire");
        timers.advance(Duration::from_millis(2500));
        fire_due(&mut toast, &mut s, &els, &mut timers);
        assert!(!s.has_class(els.root, SHOW_CLASS));
    }

    #[test]
    fn missing_toast_is_a_no_op() {
        let mut s = MemorySurface::new(800.0, 600.0);
        let mut timers = Timers::new();
        let shown = Toast::new().show(
            &mut s,
            None,
            &ToastConfig::default(),
            &mut timers,
            "t",
            "m",
            ToastKind::Failure,
        );
        assert!(!shown);
        assert_eq!(timers.pending(), 0);
    }
}
