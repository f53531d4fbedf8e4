#![forbid(unsafe_code)]

//! [`Page`] over the live browser document.
//!
//! Listener requests are turned into DOM event listeners whose closures
//! forward a [`HostEvent`] to the dispatcher given at construction. The
//! closures live as long as the page.

use std::rc::Rc;

use adminkit_core::{Listen, Page};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlAnchorElement, HtmlElement, HtmlInputElement,
    HtmlTextAreaElement, KeyboardEvent, Window,
};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// DOM event routed back to the host.
#[derive(Debug, Clone)]
pub enum HostEvent {
    KeyDown(KeyboardEvent),
    Resize,
    Submit(Element),
    ToggleClick,
}

/// Receives every [`HostEvent`].
pub type Dispatch = Rc<dyn Fn(HostEvent)>;

struct Registration {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        let callback = self.closure.as_ref().unchecked_ref();
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, callback);
    }
}

pub struct WebPage {
    window: Window,
    document: Document,
    dispatch: Dispatch,
    registrations: Vec<Registration>,
}

impl core::fmt::Debug for WebPage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebPage")
            .field("listeners", &self.registrations.len())
            .finish_non_exhaustive()
    }
}

impl WebPage {
    /// Bind to the global window and document.
    pub fn new(dispatch: Dispatch) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self {
            window,
            document,
            dispatch,
            registrations: Vec::new(),
        })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of DOM listeners currently attached.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registrations.len()
    }

    fn register<F>(&mut self, target: EventTarget, event: &'static str, map: F)
    where
        F: Fn(Event) -> Option<HostEvent> + 'static,
    {
        let dispatch = Rc::clone(&self.dispatch);
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(host_event) = map(event) {
                dispatch(host_event);
            }
        });
        if let Err(err) =
            target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            tracing::warn!(event, ?err, "addEventListener failed");
            return;
        }
        self.registrations.push(Registration {
            target,
            event,
            closure,
        });
    }
}

fn report(result: Result<(), JsValue>, action: &str) {
    if let Err(err) = result {
        tracing::debug!(action, ?err, "DOM call failed");
    }
}

impl Page for WebPage {
    type Node = Element;

    fn query(&self, css: &str) -> Option<Element> {
        self.document.query_selector(css).ok().flatten()
    }

    fn query_all(&self, css: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(css) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn closest(&self, node: &Element, css: &str) -> Option<Element> {
        node.closest(css).ok().flatten()
    }

    fn child_matching(&self, node: &Element, css: &str) -> Option<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .find(|child| child.matches(css).unwrap_or(false))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        report(node.set_attribute(name, value), "setAttribute");
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        report(node.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        report(node.class_list().remove_1(class), "classList.remove");
    }

    fn style(&self, node: &Element, property: &str) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value(property).ok())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        if value.is_empty() {
            report(style.remove_property(property).map(drop), "style.removeProperty");
        } else {
            report(style.set_property(property, value), "style.setProperty");
        }
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        report(parent.append_child(child).map(drop), "appendChild");
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn focus_and_select(&mut self, node: &Element) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            report(input.focus(), "focus");
            input.select();
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            report(area.focus(), "focus");
            area.select();
        } else if let Some(el) = node.dyn_ref::<HtmlElement>() {
            report(el.focus(), "focus");
        }
    }

    fn active_tag(&self) -> Option<String> {
        self.document.active_element().map(|el| el.tag_name())
    }

    fn link_target(&self, node: &Element) -> Option<String> {
        node.dyn_ref::<HtmlAnchorElement>()
            .map(HtmlAnchorElement::href)
            .or_else(|| node.get_attribute("href"))
            .filter(|href| !href.is_empty())
    }

    fn navigate(&mut self, url: &str) {
        report(self.window.location().set_href(url), "location.href");
    }

    fn listen(&mut self, target: Listen<Element>) {
        match target {
            Listen::KeyDown => {
                let target: EventTarget = self.document.clone().into();
                self.register(target, "keydown", |event| {
                    event.dyn_into::<KeyboardEvent>().ok().map(HostEvent::KeyDown)
                });
            }
            Listen::Resize => {
                let target: EventTarget = self.window.clone().into();
                self.register(target, "resize", |_| Some(HostEvent::Resize));
            }
            Listen::Submit(form) => {
                let target: EventTarget = form.clone().into();
                self.register(target, "submit", move |_| Some(HostEvent::Submit(form.clone())));
            }
            Listen::ToggleClick(button) => {
                self.register(button.into(), "click", |_| Some(HostEvent::ToggleClick));
            }
        }
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(f64::NAN)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }
}
