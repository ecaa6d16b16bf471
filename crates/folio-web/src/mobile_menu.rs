#![forbid(unsafe_code)]

//! Mobile navigation drawer.
//!
//! The drawer is open while its panel carries `open`. Clicks are handled in
//! two passes that mirror event bubbling: first the element handlers
//! (trigger, close button, drawer links), then the document handler that
//! closes the drawer on any click outside both the panel and the trigger.

use folio_core::element::ElementHandle;
use tracing::trace;

use crate::page::MenuElements;
use crate::surface::ViewSurface;

pub const OPEN_CLASS: &str = "open";

/// What the element-level pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Opened,
    Closed,
}

/// Element-level click handling.
pub fn on_element_click<S: ViewSurface + ?Sized>(
    surface: &mut S,
    menu: &MenuElements,
    links: &[ElementHandle],
    target: ElementHandle,
) -> Option<MenuAction> {
    let panel = menu.panel?;
    let within = |el: Option<ElementHandle>| el.is_some_and(|el| surface.contains(el, target));
    let action = if within(menu.trigger) {
        MenuAction::Opened
    } else if within(menu.close) || links.iter().any(|&link| surface.contains(link, target)) {
        MenuAction::Closed
    } else {
        return None;
    };
    match action {
        MenuAction::Opened => surface.add_class(panel, OPEN_CLASS),
        MenuAction::Closed => surface.remove_class(panel, OPEN_CLASS),
    }
    trace!(?action, "mobile menu");
    Some(action)
}

/// Document-level pass: close on a click outside the panel and the trigger.
///
/// `target` is `None` for clicks the host could not resolve to an element.
pub fn dismiss_on_outside_click<S: ViewSurface + ?Sized>(
    surface: &mut S,
    menu: &MenuElements,
    target: Option<ElementHandle>,
) -> bool {
    let Some(panel) = menu.panel else {
        return false;
    };
    if let Some(target) = target {
        let inside_panel = surface.contains(panel, target);
        let inside_trigger = menu.trigger.is_some_and(|t| surface.contains(t, target));
        if inside_panel || inside_trigger {
            return false;
        }
    }
    let was_open = surface.has_class(panel, OPEN_CLASS);
    surface.remove_class(panel, OPEN_CLASS);
    was_open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};
    use crate::surface::{ViewMutator, ViewQuery};

    struct Menu {
        s: MemorySurface,
        menu: MenuElements,
        link: ElementHandle,
        icon: ElementHandle,
        outside: ElementHandle,
    }

    fn menu() -> Menu {
        let mut s = MemorySurface::new(400.0, 800.0);
        let trigger = s.append_to_body(ElementSpec::new("button").id("mobileMenuBtn"));
        let icon = s.append(trigger, ElementSpec::new("span"));
        let panel = s.append_to_body(ElementSpec::new("div").id("mobileMenu"));
        let close = s.append(panel, ElementSpec::new("button").id("mobileCloseBtn"));
        let link = s.append(panel, ElementSpec::new("a").class("mobile-nav-link"));
        let outside = s.append_to_body(ElementSpec::new("p"));
        Menu {
            s,
            menu: MenuElements {
                trigger: Some(trigger),
                close: Some(close),
                panel: Some(panel),
            },
            link,
            icon,
            outside,
        }
    }

    fn is_open(m: &Menu) -> bool {
        m.s.has_class(m.menu.panel.unwrap(), OPEN_CLASS)
    }

    #[test]
    fn trigger_opens_even_from_child() {
        let mut m = menu();
        let action = on_element_click(&mut m.s, &m.menu, &[m.link], m.icon);
        assert_eq!(action, Some(MenuAction::Opened));
        assert!(!dismiss_on_outside_click(&mut m.s, &m.menu, Some(m.icon)));
        assert!(is_open(&m));
    }

    #[test]
    fn close_button_and_links_close() {
        let mut m = menu();
        for target in [m.menu.close.unwrap(), m.link] {
            m.s.add_class(m.menu.panel.unwrap(), OPEN_CLASS);
            assert_eq!(
                on_element_click(&mut m.s, &m.menu, &[m.link], target),
                Some(MenuAction::Closed)
            );
            assert!(!is_open(&m));
        }
    }

    #[test]
    fn outside_click_dismisses() {
        let mut m = menu();
        m.s.add_class(m.menu.panel.unwrap(), OPEN_CLASS);
        assert_eq!(on_element_click(&mut m.s, &m.menu, &[m.link], m.outside), None);
        assert!(dismiss_on_outside_click(&mut m.s, &m.menu, Some(m.outside)));
        assert!(!is_open(&m));
    }

    #[test]
    fn background_click_dismisses() {
        let mut m = menu();
        m.s.add_class(m.menu.panel.unwrap(), OPEN_CLASS);
        assert!(dismiss_on_outside_click(&mut m.s, &m.menu, None));
    }

    #[test]
    fn click_inside_panel_keeps_it_open() {
        let mut m = menu();
        let panel = m.menu.panel.unwrap();
        m.s.add_class(panel, OPEN_CLASS);
        assert!(!dismiss_on_outside_click(&mut m.s, &m.menu, Some(panel)));
        assert!(is_open(&m));
    }

    #[test]
    fn missing_panel_is_a_no_op() {
        let mut m = menu();
        let icon = m.icon;
        m.menu.panel = None;
        assert_eq!(on_element_click(&mut m.s, &m.menu, &[], icon), None);
    }
}
