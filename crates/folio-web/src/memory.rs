#![forbid(unsafe_code)]

//! In-memory render surface.
//!
//! [`MemorySurface`] is a small element tree with just enough state for the
//! page behaviors: classes, attributes, inline styles, text, form values and a
//! document-relative box per element. It implements [`ViewQuery`],
//! [`ViewMutator`] and [`PageIndex`], which makes it the surface used by the
//! tests and by native hosts replaying recorded input.
//!
//! Client rects are derived from document boxes and the current scroll
//! offset, so moving `scroll_y` is all a test needs to do to simulate
//! scrolling.
//!
//! ```
//! use folio_core::geometry::Rect;
//! use folio_web::memory::{ElementSpec, MemorySurface};
//! use folio_web::surface::ViewQuery;
//!
//! let mut page = MemorySurface::new(1280.0, 720.0);
//! let about = page.append_to_body(
//!     ElementSpec::new("section").id("about").rect(Rect::new(0.0, 800.0, 1280.0, 600.0)),
//! );
//! page.set_scroll_y(500.0);
//! assert_eq!(page.client_rect(about).map(|r| r.top()), Some(300.0));
//! ```

use std::collections::BTreeMap;

use folio_core::element::ElementHandle;
use folio_core::geometry::Rect;

use crate::surface::{PageIndex, ScrollAlign, ScrollBehavior, ViewMutator, ViewQuery};

/// Description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    content: String,
    value: Option<String>,
    rect: Option<Rect>,
}

impl ElementSpec {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.content = text.to_string();
        self
    }

    /// Form control value; also becomes the value restored by a form reset.
    #[must_use]
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// Document-relative box.
    #[must_use]
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    content: String,
    value: Option<String>,
    default_value: Option<String>,
    disabled: bool,
    rect: Option<Rect>,
    parent: Option<ElementHandle>,
    children: Vec<ElementHandle>,
}

impl Node {
    fn from_spec(spec: ElementSpec, parent: Option<ElementHandle>) -> Self {
        Self {
            tag: spec.tag,
            id: spec.id,
            classes: spec.classes,
            attributes: spec.attributes,
            styles: spec.styles,
            content: spec.content,
            default_value: spec.value.clone(),
            value: spec.value,
            disabled: false,
            rect: spec.rect,
            parent,
            children: Vec::new(),
        }
    }
}

/// A recorded `scroll_into_view` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ElementHandle,
    pub behavior: ScrollBehavior,
    pub align: ScrollAlign,
}

/// In-memory element tree implementing every surface capability.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<Node>,
    body: ElementHandle,
    scroll_y: f64,
    viewport_width: f64,
    viewport_height: f64,
    style_sheets: Vec<(String, String)>,
    scroll_requests: Vec<ScrollRequest>,
    mutations: u64,
}

impl MemorySurface {
    /// Empty document (just a `body`) with the given viewport size.
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            nodes: vec![Node::from_spec(ElementSpec::new("body"), None)],
            body: ElementHandle::new(0),
            scroll_y: 0.0,
            viewport_width,
            viewport_height,
            style_sheets: Vec::new(),
            scroll_requests: Vec::new(),
            mutations: 0,
        }
    }

    /// The body element.
    #[must_use]
    pub const fn body_handle(&self) -> ElementHandle {
        self.body
    }

    /// Append `spec` as the last child of `parent`.
    ///
    /// An unknown parent falls back to the body.
    pub fn append(&mut self, parent: ElementHandle, spec: ElementSpec) -> ElementHandle {
        let parent = if self.node(parent).is_some() {
            parent
        } else {
            self.body
        };
        let handle = ElementHandle::new(self.nodes.len() as u32);
        self.nodes.push(Node::from_spec(spec, Some(parent)));
        self.nodes[parent.index()].children.push(handle);
        handle
    }

    pub fn append_to_body(&mut self, spec: ElementSpec) -> ElementHandle {
        self.append(self.body, spec)
    }

    /// Set the document scroll offset (clamped at zero).
    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Replace an element's document box.
    pub fn set_rect(&mut self, el: ElementHandle, rect: Option<Rect>) {
        if let Some(node) = self.node_mut(el) {
            node.rect = rect;
        }
    }

    /// Type into a form control.
    pub fn set_value(&mut self, el: ElementHandle, value: &str) {
        if let Some(node) = self.node_mut(el) {
            node.value = Some(value.to_string());
        }
    }

    #[must_use]
    pub fn value(&self, el: ElementHandle) -> Option<&str> {
        self.node(el).and_then(|n| n.value.as_deref())
    }

    /// Classes in insertion order.
    #[must_use]
    pub fn classes(&self, el: ElementHandle) -> Vec<&str> {
        self.node(el)
            .map(|n| n.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_disabled(&self, el: ElementHandle) -> bool {
        self.node(el).is_some_and(|n| n.disabled)
    }

    /// Injected style sheets as `(key, css)`, in injection order.
    #[must_use]
    pub fn style_sheets(&self) -> &[(String, String)] {
        &self.style_sheets
    }

    #[must_use]
    pub fn has_style_sheet(&self, key: &str) -> bool {
        self.style_sheets.iter().any(|(k, _)| k == key)
    }

    #[must_use]
    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Number of writes that changed state.
    #[must_use]
    pub const fn mutation_count(&self) -> u64 {
        self.mutations
    }

    /// Number of elements, body included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn node(&self, el: ElementHandle) -> Option<&Node> {
        self.nodes.get(el.index())
    }

    fn node_mut(&mut self, el: ElementHandle) -> Option<&mut Node> {
        self.nodes.get_mut(el.index())
    }

    /// Pre-order walk of the subtree under `root`, `root` excluded.
    fn descendants(&self, root: ElementHandle) -> Vec<ElementHandle> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementHandle> = match self.node(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(el) = stack.pop() {
            out.push(el);
            if let Some(node) = self.node(el) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn document_order(&self) -> Vec<ElementHandle> {
        let mut all = vec![self.body];
        all.extend(self.descendants(self.body));
        all
    }
}

impl ViewQuery for MemorySurface {
    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn offset_rect(&self, el: ElementHandle) -> Option<Rect> {
        self.node(el)?.rect
    }

    fn client_rect(&self, el: ElementHandle) -> Option<Rect> {
        self.offset_rect(el).map(|r| r.translate(0.0, -self.scroll_y))
    }

    fn has_class(&self, el: ElementHandle, class: &str) -> bool {
        self.node(el).is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn style(&self, el: ElementHandle, property: &str) -> Option<String> {
        self.node(el)?
            .styles
            .get(property)
            .filter(|v| !v.is_empty())
            .cloned()
    }

    fn text(&self, el: ElementHandle) -> Option<String> {
        self.node(el).map(|n| n.content.clone())
    }

    fn inner_html(&self, el: ElementHandle) -> Option<String> {
        self.text(el)
    }

    fn contains(&self, ancestor: ElementHandle, node: ElementHandle) -> bool {
        let mut cursor = Some(node);
        while let Some(el) = cursor {
            if el == ancestor {
                return true;
            }
            cursor = self.node(el).and_then(|n| n.parent);
        }
        false
    }

    fn form_fields(&self, form: ElementHandle) -> Vec<(String, String)> {
        self.descendants(form)
            .into_iter()
            .filter_map(|el| {
                let node = self.node(el)?;
                let name = node.attributes.get("name")?;
                Some((name.clone(), node.value.clone()?))
            })
            .collect()
    }
}

impl ViewMutator for MemorySurface {
    fn add_class(&mut self, el: ElementHandle, class: &str) {
        let Some(node) = self.node_mut(el) else { return };
        if node.classes.iter().any(|c| c == class) {
            return;
        }
        node.classes.push(class.to_string());
        self.mutations += 1;
    }

    fn remove_class(&mut self, el: ElementHandle, class: &str) {
        let Some(node) = self.node_mut(el) else { return };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() != before {
            self.mutations += 1;
        }
    }

    fn set_style(&mut self, el: ElementHandle, property: &str, value: &str) {
        let Some(node) = self.node_mut(el) else { return };
        let changed = if value.is_empty() {
            node.styles.remove(property).is_some()
        } else {
            node.styles.insert(property.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.mutations += 1;
        }
    }

    fn set_text(&mut self, el: ElementHandle, text: &str) {
        let Some(node) = self.node_mut(el) else { return };
        if node.content != text {
            node.content = text.to_string();
            self.mutations += 1;
        }
    }

    fn set_inner_html(&mut self, el: ElementHandle, html: &str) {
        self.set_text(el, html);
    }

    fn set_disabled(&mut self, el: ElementHandle, disabled: bool) {
        let Some(node) = self.node_mut(el) else { return };
        if node.disabled != disabled {
            node.disabled = disabled;
            self.mutations += 1;
        }
    }

    fn reset_form(&mut self, form: ElementHandle) {
        for el in self.descendants(form) {
            if let Some(node) = self.node_mut(el)
                && node.value.is_some()
            {
                node.value = Some(node.default_value.clone().unwrap_or_default());
            }
        }
        self.mutations += 1;
    }

    fn scroll_into_view(&mut self, el: ElementHandle, behavior: ScrollBehavior, align: ScrollAlign) {
        let Some(rect) = self.offset_rect(el) else { return };
        let y = match align {
            ScrollAlign::Start => rect.top(),
            ScrollAlign::Center => rect.top() - (self.viewport_height - rect.height) / 2.0,
            ScrollAlign::End => rect.bottom() - self.viewport_height,
        };
        self.scroll_requests.push(ScrollRequest {
            target: el,
            behavior,
            align,
        });
        self.set_scroll_y(y);
    }

    fn inject_style_sheet(&mut self, key: &str, css: &str) {
        if self.has_style_sheet(key) {
            return;
        }
        self.style_sheets.push((key.to_string(), css.to_string()));
        self.mutations += 1;
    }
}

impl PageIndex for MemorySurface {
    fn element_by_id(&mut self, id: &str) -> Option<ElementHandle> {
        self.document_order()
            .into_iter()
            .find(|&el| self.node(el).and_then(|n| n.id.as_deref()) == Some(id))
    }

    fn elements_by_tag(&mut self, tag: &str) -> Vec<ElementHandle> {
        let tag = tag.to_ascii_lowercase();
        self.document_order()
            .into_iter()
            .filter(|&el| self.node(el).is_some_and(|n| n.tag == tag))
            .collect()
    }

    fn elements_with_any_class(&mut self, classes: &[&str]) -> Vec<ElementHandle> {
        self.document_order()
            .into_iter()
            .filter(|&el| classes.iter().any(|c| self.has_class(el, c)))
            .collect()
    }

    fn descendants_with_class(&mut self, root: ElementHandle, class: &str) -> Vec<ElementHandle> {
        self.descendants(root)
            .into_iter()
            .filter(|&el| self.has_class(el, class))
            .collect()
    }

    fn attribute(&self, el: ElementHandle, name: &str) -> Option<String> {
        let node = self.node(el)?;
        match name {
            "id" => node.id.clone(),
            "class" => Some(node.classes.join(" ")),
            _ => node.attributes.get(name).cloned(),
        }
    }

    fn body(&mut self) -> Option<ElementHandle> {
        Some(self.body)
    }
}
