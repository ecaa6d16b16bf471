#![forbid(unsafe_code)]

//! Page model: the handles every behavior works with.
//!
//! The page is scanned once, when the synchronizer is built, the same way the
//! page script resolves its selectors at load time. Geometry is never cached
//! here; behaviors read it from the surface on every event.

use folio_core::element::ElementHandle;

use crate::config::ElementNames;
use crate::surface::PageIndex;

/// A section with an id, candidate for the active navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSection {
    pub id: String,
    pub element: ElementHandle,
}

/// A navigation link and the section id it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub element: ElementHandle,
    pub target: Option<String>,
}

/// A card revealed on scroll, with its first progress bar if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCard {
    pub element: ElementHandle,
    pub progress_bar: Option<ElementHandle>,
}

/// A section watched for visibility, with its progress bars in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedSection {
    pub element: ElementHandle,
    pub progress_bars: Vec<ElementHandle>,
}

/// An in-page anchor (`href` starting with `#`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub element: ElementHandle,
    pub href: String,
    /// Element the fragment refers to; `None` for a bare `#` or a dangling id.
    pub target: Option<ElementHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuElements {
    pub trigger: Option<ElementHandle>,
    pub close: Option<ElementHandle>,
    pub panel: Option<ElementHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastElements {
    pub root: ElementHandle,
    pub title: Option<ElementHandle>,
    pub message: Option<ElementHandle>,
    pub icon: Option<ElementHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormElements {
    pub form: ElementHandle,
    pub submit: Option<ElementHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallaxBlobs {
    pub first: ElementHandle,
    pub second: ElementHandle,
}

/// Everything the behaviors look up, resolved once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageModel {
    pub body: Option<ElementHandle>,
    pub mouse_follower: Option<ElementHandle>,
    pub navbar: Option<ElementHandle>,
    pub menu: MenuElements,
    pub menu_links: Vec<ElementHandle>,
    pub sections: Vec<TrackedSection>,
    pub nav_links: Vec<NavLink>,
    pub reveal_cards: Vec<RevealCard>,
    pub observed_sections: Vec<ObservedSection>,
    pub anchors: Vec<Anchor>,
    pub toast: Option<ToastElements>,
    pub form: Option<FormElements>,
    pub parallax: Option<ParallaxBlobs>,
}

impl PageModel {
    /// Resolve every element named in `names`.
    pub fn scan<I: PageIndex + ?Sized>(index: &mut I, names: &ElementNames) -> Self {
        let sections = index
            .elements_by_tag(&names.section_tag)
            .into_iter()
            .filter_map(|element| {
                let id = index.attribute(element, "id")?;
                Some(TrackedSection { id, element })
            })
            .collect();

        let nav_links = index
            .elements_with_class(&names.nav_link_class)
            .into_iter()
            .map(|element| NavLink {
                element,
                target: index.attribute(element, &names.nav_target_attribute),
            })
            .collect();

        let reveal_classes: Vec<&str> = names.reveal_classes.iter().map(String::as_str).collect();
        let reveal_cards = index
            .elements_with_any_class(&reveal_classes)
            .into_iter()
            .map(|element| RevealCard {
                element,
                progress_bar: index
                    .descendants_with_class(element, &names.progress_class)
                    .first()
                    .copied(),
            })
            .collect();

        let observed_sections = index
            .elements_by_tag(&names.section_tag)
            .into_iter()
            .map(|element| ObservedSection {
                element,
                progress_bars: index.descendants_with_class(element, &names.progress_class),
            })
            .collect();

        let anchors = index
            .elements_by_tag("a")
            .into_iter()
            .filter_map(|element| {
                let href = index.attribute(element, "href")?;
                let fragment = href.strip_prefix('#')?;
                let target = if fragment.is_empty() {
                    None
                } else {
                    index.element_by_id(fragment)
                };
                Some(Anchor {
                    element,
                    href,
                    target,
                })
            })
            .collect();

        let toast = index.element_by_id(&names.toast).map(|root| ToastElements {
            root,
            title: index.element_by_id(&names.toast_title),
            message: index.element_by_id(&names.toast_message),
            icon: index
                .descendants_with_class(root, &names.toast_icon_class)
                .first()
                .copied(),
        });

        let form = index
            .element_by_id(&names.contact_form)
            .map(|form| FormElements {
                form,
                submit: index.element_by_id(&names.submit_button),
            });

        let parallax = match (
            index.elements_with_class(&names.blob_first_class).first(),
            index.elements_with_class(&names.blob_second_class).first(),
        ) {
            (Some(&first), Some(&second)) => Some(ParallaxBlobs { first, second }),
            _ => None,
        };

        Self {
            body: index.body(),
            mouse_follower: index.element_by_id(&names.mouse_follower),
            navbar: index.element_by_id(&names.navbar),
            menu: MenuElements {
                trigger: index.element_by_id(&names.menu_button),
                close: index.element_by_id(&names.menu_close),
                panel: index.element_by_id(&names.menu_panel),
            },
            menu_links: index.elements_with_class(&names.menu_link_class),
            sections,
            nav_links,
            reveal_cards,
            observed_sections,
            anchors,
            toast,
            form,
            parallax,
        }
    }

    /// Anchor whose element is `el`.
    #[must_use]
    pub fn anchor(&self, el: ElementHandle) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.element == el)
    }

    /// Observed section whose element is `el`.
    #[must_use]
    pub fn observed_section(&self, el: ElementHandle) -> Option<&ObservedSection> {
        self.observed_sections.iter().find(|s| s.element == el)
    }

    /// One-line description for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} sections, {} nav links, {} cards, {} observed, {} anchors, toast={}, form={}",
            self.sections.len(),
            self.nav_links.len(),
            self.reveal_cards.len(),
            self.observed_sections.len(),
            self.anchors.len(),
            self.toast.is_some(),
            self.form.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ElementSpec, MemorySurface};

    #[test]
    fn scan_resolves_selectors() {
        let mut s = MemorySurface::new(1024.0, 768.0);
        let names = ElementNames::default();
        let nav = s.append_to_body(ElementSpec::new("nav").id("navbar"));
        let home_link = s.append(
            nav,
            ElementSpec::new("a")
                .class("nav-link")
                .attr("data-section", "home")
                .attr("href", "#home"),
        );
        let plain_link = s.append(nav, ElementSpec::new("a").class("nav-link").attr("href", "#"));
        let home = s.append_to_body(ElementSpec::new("section").id("home"));
        let anon = s.append_to_body(ElementSpec::new("section"));
        let card = s.append(anon, ElementSpec::new("div").class("expertise-card"));
        let bar = s.append(card, ElementSpec::new("div").class("progress-fill"));
        let bar2 = s.append(card, ElementSpec::new("div").class("progress-fill"));

        let page = PageModel::scan(&mut s, &names);

        assert_eq!(page.navbar, Some(nav));
        assert_eq!(
            page.sections,
            vec![TrackedSection {
                id: "home".into(),
                element: home
            }]
        );
        assert_eq!(page.nav_links.len(), 2);
        assert_eq!(page.nav_links[0].target.as_deref(), Some("home"));
        assert_eq!(page.nav_links[1].target, None);
        assert_eq!(
            page.reveal_cards,
            vec![RevealCard {
                element: card,
                progress_bar: Some(bar)
            }]
        );
        assert_eq!(page.observed_sections.len(), 2);
        assert_eq!(page.observed_section(anon).unwrap().progress_bars, vec![bar, bar2]);
        assert_eq!(page.anchor(home_link).unwrap().target, Some(home));
        assert_eq!(page.anchor(plain_link).unwrap().target, None);
        assert!(page.toast.is_none());
        assert!(page.parallax.is_none());
    }

    #[test]
    fn empty_page_scans_to_nothing() {
        let mut s = MemorySurface::new(1024.0, 768.0);
        let page = PageModel::scan(&mut s, &ElementNames::default());
        assert_eq!(page.body, Some(s.body_handle()));
        assert!(page.sections.is_empty());
        assert!(page.form.is_none());
        assert_eq!(page.menu, MenuElements::default());
    }
}
