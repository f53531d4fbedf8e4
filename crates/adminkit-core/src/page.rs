#![forbid(unsafe_code)]

//! The page abstraction every behavior is written against.
//!
//! A [`Page`] is a host document plus the handful of window facts the
//! behaviors read (viewport width, motion preference, current path). Query
//! methods never fail: an element that is not there is `None`, and mutators
//! applied to a detached or foreign node are silently ignored.
//!
//! Selectors are plain CSS strings. Hosts backed by a real DOM hand them to
//! `querySelector`; [`crate::MemoryPage`] understands the subset used by
//! [`crate::selectors::Landmark`].

use core::fmt;

/// Event subscriptions a behavior asks the host to wire up.
///
/// The host owns the actual listener and routes the event back into the
/// matching [`crate::Enhancer`] entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listen<N> {
    /// Global key-down, routed to [`crate::Enhancer::on_keydown`].
    KeyDown,
    /// Window resize, routed to [`crate::Enhancer::on_resize`].
    Resize,
    /// Form submission, routed to [`crate::Enhancer::on_submit`].
    Submit(N),
    /// Click on the synthesized filter toggle, routed to
    /// [`crate::Enhancer::on_toggle_click`].
    ToggleClick(N),
}

/// Host document seen by the behavior layer.
pub trait Page {
    /// Element handle. Equality must be node identity.
    type Node: Clone + PartialEq + fmt::Debug;

    /// First element matching `css`, in document order.
    fn query(&self, css: &str) -> Option<Self::Node>;

    /// All elements matching `css`, in document order.
    fn query_all(&self, css: &str) -> Vec<Self::Node>;

    /// Element with the given `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Closest inclusive ancestor of `node` matching `css`.
    fn closest(&self, node: &Self::Node, css: &str) -> Option<Self::Node>;

    /// First direct child of `node` matching `css`.
    fn child_matching(&self, node: &Self::Node, css: &str) -> Option<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    /// Adds `class` unless already present.
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    /// Inline style value, empty when unset.
    fn style(&self, node: &Self::Node, property: &str) -> String;
    /// Sets an inline style; an empty `value` clears the property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    /// Creates a detached element.
    fn create_element(&mut self, tag: &str) -> Option<Self::Node>;
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);
    /// Detaches `node` from the document.
    fn remove(&mut self, node: &Self::Node);

    /// Focuses `node` and selects its text when it is a text control.
    fn focus_and_select(&mut self, node: &Self::Node);

    /// Tag name of the focused element, if any.
    fn active_tag(&self) -> Option<String>;

    /// Resolved navigation target of a link.
    fn link_target(&self, node: &Self::Node) -> Option<String>;

    /// Assigns the document location.
    fn navigate(&mut self, url: &str);

    /// Asks the host to route an event back into the enhancer.
    fn listen(&mut self, target: Listen<Self::Node>);

    /// Layout viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// `prefers-reduced-motion: reduce`.
    fn prefers_reduced_motion(&self) -> bool;

    /// Path component of the current location.
    fn location_path(&self) -> String;
}
