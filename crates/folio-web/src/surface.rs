#![forbid(unsafe_code)]

//! Capability traits between the behaviors and the host render tree.
//!
//! Behaviors never reach into ambient globals. They receive:
//!
//! - [`ViewQuery`]: read-only geometry and state (scroll offset, viewport,
//!   element boxes, classes, styles, text);
//! - [`ViewMutator`]: the class/style/text writes they are allowed to make;
//! - [`PageIndex`]: element lookup, used once when the page model is built.
//!
//! The browser runner implements all three over `web-sys`; the in-memory
//! [`MemorySurface`](crate::memory::MemorySurface) implements them for tests.
//! Every method is total: an unknown handle reads as "absent" and writes to
//! it are ignored.

use folio_core::element::ElementHandle;
use folio_core::geometry::Rect;

/// How [`ViewMutator::scroll_into_view`] animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// Where the target lands after [`ViewMutator::scroll_into_view`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    #[default]
    Start,
    Center,
    End,
}

/// Read capability: the viewport geometry provider plus element state.
pub trait ViewQuery {
    /// Vertical document scroll offset (`window.scrollY`).
    fn scroll_y(&self) -> f64;

    /// Viewport height (`window.innerHeight`).
    fn viewport_height(&self) -> f64;

    /// Viewport width (`window.innerWidth`).
    fn viewport_width(&self) -> f64;

    /// Document-relative box (`offsetTop`, `offsetHeight`, ...).
    fn offset_rect(&self, el: ElementHandle) -> Option<Rect>;

    /// Viewport-relative box (`getBoundingClientRect()`).
    fn client_rect(&self, el: ElementHandle) -> Option<Rect>;

    fn has_class(&self, el: ElementHandle, class: &str) -> bool;

    /// Inline style property; `None` when unset or empty.
    fn style(&self, el: ElementHandle, property: &str) -> Option<String>;

    fn text(&self, el: ElementHandle) -> Option<String>;

    fn inner_html(&self, el: ElementHandle) -> Option<String>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementHandle, node: ElementHandle) -> bool;

    /// Named field values of a form, in document order.
    fn form_fields(&self, form: ElementHandle) -> Vec<(String, String)>;
}

/// Write capability.
pub trait ViewMutator {
    fn add_class(&mut self, el: ElementHandle, class: &str);

    fn remove_class(&mut self, el: ElementHandle, class: &str);

    /// Set an inline style property; an empty value clears it.
    fn set_style(&mut self, el: ElementHandle, property: &str, value: &str);

    fn set_text(&mut self, el: ElementHandle, text: &str);

    fn set_inner_html(&mut self, el: ElementHandle, html: &str);

    fn set_disabled(&mut self, el: ElementHandle, disabled: bool);

    /// Restore a form's fields to their defaults.
    fn reset_form(&mut self, form: ElementHandle);

    fn scroll_into_view(&mut self, el: ElementHandle, behavior: ScrollBehavior, align: ScrollAlign);

    /// Add a document-level style sheet once per `key`; later calls with the
    /// same key are ignored.
    fn inject_style_sheet(&mut self, key: &str, css: &str);
}

/// Both capabilities; what the synchronizer is generic over.
pub trait ViewSurface: ViewQuery + ViewMutator {}

impl<T: ViewQuery + ViewMutator> ViewSurface for T {}

/// Element lookup used to build the page model.
///
/// Results are in document order.
pub trait PageIndex {
    fn element_by_id(&mut self, id: &str) -> Option<ElementHandle>;

    fn elements_by_tag(&mut self, tag: &str) -> Vec<ElementHandle>;

    /// Elements carrying at least one of `classes`, each listed once.
    fn elements_with_any_class(&mut self, classes: &[&str]) -> Vec<ElementHandle>;

    fn descendants_with_class(&mut self, root: ElementHandle, class: &str) -> Vec<ElementHandle>;

    fn attribute(&self, el: ElementHandle, name: &str) -> Option<String>;

    /// The document body.
    fn body(&mut self) -> Option<ElementHandle>;

    fn elements_with_class(&mut self, class: &str) -> Vec<ElementHandle> {
        self.elements_with_any_class(&[class])
    }
}
