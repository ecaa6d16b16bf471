#![forbid(unsafe_code)]

//! Browser surface over `web-sys`.
//!
//! Elements get a handle the first time a lookup returns them; the registry
//! only grows. Click targets are resolved to the nearest registered ancestor.

use std::collections::HashSet;

use folio_core::element::ElementHandle;
use folio_core::geometry::Rect;
use folio_web::{PageIndex, ScrollAlign, ScrollBehavior, ViewMutator, ViewQuery};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, HtmlFormElement, NodeList, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

#[derive(Debug)]
pub struct DomSurface {
    window: Window,
    document: Document,
    elements: Vec<Element>,
    injected: HashSet<String>,
}

impl DomSurface {
    /// Surface over the global window, or `None` outside a browser page.
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            elements: Vec::new(),
            injected: HashSet::new(),
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// DOM element behind `handle`.
    pub fn element(&self, handle: ElementHandle) -> Option<&Element> {
        self.elements.get(handle.index())
    }

    /// Handle for `el` if it is registered.
    pub fn handle_of(&self, el: &Element) -> Option<ElementHandle> {
        self.elements
            .iter()
            .position(|known| known == el)
            .and_then(|i| u32::try_from(i).ok())
            .map(ElementHandle::new)
    }

    /// Nearest registered element at or above an event target.
    pub fn resolve_target(&self, target: Option<EventTarget>) -> Option<ElementHandle> {
        let mut node = target?.dyn_into::<Element>().ok();
        while let Some(el) = node {
            if let Some(handle) = self.handle_of(&el) {
                return Some(handle);
            }
            node = el.parent_element();
        }
        None
    }

    fn register(&mut self, el: Element) -> ElementHandle {
        if let Some(handle) = self.handle_of(&el) {
            return handle;
        }
        let raw = u32::try_from(self.elements.len()).unwrap_or(u32::MAX);
        self.elements.push(el);
        ElementHandle::new(raw)
    }

    fn register_list(&mut self, list: Option<NodeList>) -> Vec<ElementHandle> {
        let Some(list) = list else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.register(el))
            .collect()
    }

    fn html(&self, handle: ElementHandle) -> Option<&HtmlElement> {
        self.element(handle)?.dyn_ref::<HtmlElement>()
    }

    fn window_f64(value: Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

fn class_selector(classes: &[&str]) -> String {
    classes
        .iter()
        .map(|c| format!(".{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ViewQuery for DomSurface {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        Self::window_f64(self.window.inner_height())
    }

    fn viewport_width(&self) -> f64 {
        Self::window_f64(self.window.inner_width())
    }

    fn offset_rect(&self, el: ElementHandle) -> Option<Rect> {
        if let Some(html) = self.html(el) {
            return Some(Rect::new(
                f64::from(html.offset_left()),
                f64::from(html.offset_top()),
                f64::from(html.offset_width()),
                f64::from(html.offset_height()),
            ));
        }
        // Non-HTML elements (SVG) have no offset box; derive it from the client box.
        let client = self.client_rect(el)?;
        Some(Rect::new(
            client.x,
            client.y + self.scroll_y(),
            client.width,
            client.height,
        ))
    }

    fn client_rect(&self, el: ElementHandle) -> Option<Rect> {
        let r = self.element(el)?.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn has_class(&self, el: ElementHandle, class: &str) -> bool {
        self.element(el)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn style(&self, el: ElementHandle, property: &str) -> Option<String> {
        let value = self.html(el)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn text(&self, el: ElementHandle) -> Option<String> {
        self.element(el)?.text_content()
    }

    fn inner_html(&self, el: ElementHandle) -> Option<String> {
        Some(self.element(el)?.inner_html())
    }

    fn contains(&self, ancestor: ElementHandle, node: ElementHandle) -> bool {
        match (self.element(ancestor), self.element(node)) {
            (Some(a), Some(n)) => a.contains(Some(&**n)),
            _ => false,
        }
    }

    fn form_fields(&self, form: ElementHandle) -> Vec<(String, String)> {
        let Some(form) = self.element(form) else {
            return Vec::new();
        };
        let Ok(list) = form.query_selector_all("input[name], textarea[name], select[name]") else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|el| {
                let name = el.get_attribute("name")?;
                let value = Reflect::get(&el, &JsValue::from_str("value"))
                    .ok()
                    .and_then(|v| v.as_string())
                    .unwrap_or_default();
                Some((name, value))
            })
            .collect()
    }
}

impl ViewMutator for DomSurface {
    fn add_class(&mut self, el: ElementHandle, class: &str) {
        if let Some(e) = self.element(el) {
            let _ = e.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, el: ElementHandle, class: &str) {
        if let Some(e) = self.element(el) {
            let _ = e.class_list().remove_1(class);
        }
    }

    fn set_style(&mut self, el: ElementHandle, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        if value.is_empty() {
            let _ = style.remove_property(property);
        } else {
            let _ = style.set_property(property, value);
        }
    }

    fn set_text(&mut self, el: ElementHandle, text: &str) {
        if let Some(e) = self.element(el) {
            e.set_text_content(Some(text));
        }
    }

    fn set_inner_html(&mut self, el: ElementHandle, html: &str) {
        if let Some(e) = self.element(el) {
            e.set_inner_html(html);
        }
    }

    fn set_disabled(&mut self, el: ElementHandle, disabled: bool) {
        let Some(e) = self.element(el) else {
            return;
        };
        let _ = if disabled {
            e.set_attribute("disabled", "")
        } else {
            e.remove_attribute("disabled")
        };
    }

    fn reset_form(&mut self, form: ElementHandle) {
        if let Some(form) = self.element(form).and_then(|e| e.dyn_ref::<HtmlFormElement>()) {
            form.reset();
        }
    }

    fn scroll_into_view(&mut self, el: ElementHandle, behavior: ScrollBehavior, align: ScrollAlign) {
        let Some(e) = self.element(el) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        options.set_block(match align {
            ScrollAlign::Start => ScrollLogicalPosition::Start,
            ScrollAlign::Center => ScrollLogicalPosition::Center,
            ScrollAlign::End => ScrollLogicalPosition::End,
        });
        e.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn inject_style_sheet(&mut self, key: &str, css: &str) {
        if !self.injected.insert(key.to_string()) {
            return;
        }
        if self.document.get_element_by_id(key).is_some() {
            return;
        }
        let Ok(style) = self.document.create_element("style") else {
            return;
        };
        style.set_id(key);
        style.set_text_content(Some(css));
        if let Some(head) = self.document.head() {
            let _ = head.append_child(&style);
        }
    }
}

impl PageIndex for DomSurface {
    fn element_by_id(&mut self, id: &str) -> Option<ElementHandle> {
        let el = self.document.get_element_by_id(id)?;
        Some(self.register(el))
    }

    fn elements_by_tag(&mut self, tag: &str) -> Vec<ElementHandle> {
        let list = self.document.query_selector_all(tag).ok();
        self.register_list(list)
    }

    fn elements_with_any_class(&mut self, classes: &[&str]) -> Vec<ElementHandle> {
        if classes.is_empty() {
            return Vec::new();
        }
        let list = self.document.query_selector_all(&class_selector(classes)).ok();
        self.register_list(list)
    }

    fn descendants_with_class(&mut self, root: ElementHandle, class: &str) -> Vec<ElementHandle> {
        let list = self
            .element(root)
            .and_then(|e| e.query_selector_all(&class_selector(&[class])).ok());
        self.register_list(list)
    }

    fn attribute(&self, el: ElementHandle, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn body(&mut self) -> Option<ElementHandle> {
        let body: Element = self.document.body()?.into();
        Some(self.register(body))
    }
}
