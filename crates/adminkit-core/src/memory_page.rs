#![forbid(unsafe_code)]

//! In-memory [`Page`] for native tests and headless hosts.
//!
//! `MemoryPage` is an arena of element nodes rooted at `<html><body>`, plus
//! the window facts a browser would supply (viewport width, motion
//! preference, path, focus). It records navigations, listener requests and
//! a mutation counter so tests can assert on side effects.
//!
//! The selector matcher covers the subset the markup contract uses: type,
//! `#id`, `.class`, `[attr]` and `[attr="value"]` compounds joined by
//! descendant or `>` combinators, in comma-separated groups.

use std::iter::Peekable;
use std::str::Chars;

use crate::page::{Listen, Page};

const DEFAULT_ORIGIN: &str = "http://localhost";

/// Handle to an element of a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

#[derive(Debug, Clone, Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    style: Vec<(String, String)>,
    inner_html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Arena-backed page model.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<NodeData>,
    focused: Option<NodeId>,
    selected: Option<NodeId>,
    viewport_width: f64,
    reduced_motion: bool,
    path: String,
    origin: String,
    navigations: Vec<String>,
    listeners: Vec<Listen<NodeId>>,
    mutations: usize,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// Empty document, 1280px wide, at `/`.
    #[must_use]
    pub fn new() -> Self {
        let mut root = NodeData::new("html");
        root.children.push(BODY);
        let mut body = NodeData::new("body");
        body.parent = Some(ROOT);
        Self {
            nodes: vec![root, body],
            focused: None,
            selected: None,
            viewport_width: 1280.0,
            reduced_motion: false,
            path: "/".to_owned(),
            origin: DEFAULT_ORIGIN.to_owned(),
            navigations: Vec::new(),
            listeners: Vec::new(),
            mutations: 0,
        }
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        BODY
    }

    /// Appends an element described by `tag#id.class.class` under `parent`.
    ///
    /// Building the fixture does not count as a mutation.
    pub fn add_element(&mut self, parent: &NodeId, shorthand: &str) -> NodeId {
        let (tag, rest) = shorthand
            .find(['#', '.'])
            .map_or((shorthand, ""), |split| shorthand.split_at(split));
        let mut data = NodeData::new(tag);
        for (marker, name) in split_markers(rest) {
            match marker {
                '#' => data.attributes.push(("id".to_owned(), name.to_owned())),
                _ => data.classes.push(name.to_owned()),
            }
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        self.attach(*parent, id);
        id
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn set_reduced_motion(&mut self, reduce: bool) {
        self.reduced_motion = reduce;
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_owned();
    }

    /// Origin used to resolve relative link targets.
    pub fn set_origin(&mut self, origin: &str) {
        self.origin = origin.trim_end_matches('/').to_owned();
    }

    /// Moves focus without selecting anything.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        self.focused = node;
        self.selected = None;
    }

    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Node whose full text was last selected.
    #[must_use]
    pub const fn selection(&self) -> Option<NodeId> {
        self.selected
    }

    #[must_use]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    #[must_use]
    pub fn listeners(&self) -> &[Listen<NodeId>] {
        &self.listeners
    }

    /// Number of DOM mutations applied through the [`Page`] interface.
    #[must_use]
    pub const fn mutation_count(&self) -> usize {
        self.mutations
    }

    #[must_use]
    pub fn tag(&self, node: &NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.tag.as_str())
    }

    #[must_use]
    pub fn inner_html(&self, node: &NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|data| data.inner_html.as_str())
    }

    #[must_use]
    pub fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|data| data.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn classes(&self, node: &NodeId) -> Vec<String> {
        self.nodes
            .get(node.0)
            .map(|data| data.classes.clone())
            .unwrap_or_default()
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == ROOT {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|data| data.parent);
        }
        false
    }

    /// Move `child` under `parent`. Refuses, like the DOM's
    /// `HierarchyRequestError`, when `child` is `parent` or one of its
    /// ancestors.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() || child == ROOT {
            return false;
        }
        if self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|data| data.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != child);
        }
    }

    fn data_mut(&mut self, node: &NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(node.0)
    }

    fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        order
    }

    fn matches(&self, node: NodeId, selectors: &[ComplexSelector]) -> bool {
        selectors
            .iter()
            .any(|selector| self.match_from(node, &selector.parts, selector.parts.len() - 1))
    }

    fn match_from(&self, node: NodeId, parts: &[(Combinator, Compound)], idx: usize) -> bool {
        let (combinator, compound) = &parts[idx];
        if !self.matches_compound(node, compound) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        let mut ancestor = self.nodes[node.0].parent;
        match combinator {
            Combinator::Child => ancestor.is_some_and(|parent| self.match_from(parent, parts, idx - 1)),
            Combinator::Descendant => {
                while let Some(id) = ancestor {
                    if self.match_from(id, parts, idx - 1) {
                        return true;
                    }
                    ancestor = self.nodes[id.0].parent;
                }
                false
            }
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let data = &self.nodes[node.0];
        if compound.tag.as_ref().is_some_and(|tag| *tag != data.tag) {
            return false;
        }
        if compound.id.as_ref().is_some_and(|id| data.attr("id") != Some(id.as_str())) {
            return false;
        }
        if !compound
            .classes
            .iter()
            .all(|class| data.classes.contains(class))
        {
            return false;
        }
        compound.attributes.iter().all(|(name, expected)| {
            let actual = if name == "class" {
                (!data.classes.is_empty()).then(|| data.classes.join(" "))
            } else {
                data.attr(name).map(str::to_owned)
            };
            match (actual, expected) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
            }
        })
    }
}

fn split_markers(rest: &str) -> Vec<(char, &str)> {
    let mut markers = Vec::new();
    let mut start = None;
    for (index, ch) in rest.char_indices() {
        if ch == '#' || ch == '.' {
            if let Some((marker, from)) = start {
                markers.push((marker, &rest[from..index]));
            }
            start = Some((ch, index + 1));
        }
    }
    if let Some((marker, from)) = start {
        markers.push((marker, &rest[from..]));
    }
    markers
}

// ---------------------------------------------------------------------------
// Selector subset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    parts: Vec<(Combinator, Compound)>,
}

/// Parses a selector list. `None` when any group is outside the subset.
fn parse_selector_list(css: &str) -> Option<Vec<ComplexSelector>> {
    css.split(',').map(parse_complex).collect()
}

fn parse_complex(src: &str) -> Option<ComplexSelector> {
    let mut chars = src.trim().chars().peekable();
    let mut parts = Vec::new();
    loop {
        let mut combinator = Combinator::Descendant;
        while let Some(&ch) = chars.peek() {
            if ch == '>' {
                combinator = Combinator::Child;
            } else if !ch.is_whitespace() {
                break;
            }
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }
        if parts.is_empty() && combinator == Combinator::Child {
            return None;
        }
        parts.push((combinator, parse_compound(&mut chars)?));
    }
    (!parts.is_empty()).then_some(ComplexSelector { parts })
}

fn parse_compound(chars: &mut Peekable<Chars<'_>>) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut universal = false;
    if chars.peek() == Some(&'*') {
        chars.next();
        universal = true;
    } else {
        let tag = take_ident(chars);
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }
    loop {
        match chars.peek() {
            Some('#') => {
                chars.next();
                compound.id = Some(non_empty(take_ident(chars))?);
            }
            Some('.') => {
                chars.next();
                compound.classes.push(non_empty(take_ident(chars))?);
            }
            Some('[') => {
                chars.next();
                compound.attributes.push(parse_attribute(chars)?);
            }
            Some(ch) if ch.is_whitespace() || *ch == '>' => break,
            None => break,
            Some(_) => return None,
        }
    }
    let empty = compound == Compound::default();
    (!empty || universal).then_some(compound)
}

fn parse_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<(String, Option<String>)> {
    let mut body = String::new();
    loop {
        match chars.next()? {
            ']' => break,
            ch => body.push(ch),
        }
    }
    match body.split_once('=') {
        None => Some((non_empty(body.trim().to_owned())?, None)),
        Some((name, value)) => {
            let value = value.trim().trim_matches(|c: char| c == '"' || c == '\'');
            Some((non_empty(name.trim().to_owned())?, Some(value.to_owned())))
        }
    }
}

fn take_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            ident.push(ch);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

impl Page for MemoryPage {
    type Node = NodeId;

    fn query(&self, css: &str) -> Option<NodeId> {
        let selectors = parse_selector_list(css)?;
        self.document_order()
            .into_iter()
            .find(|&id| self.matches(id, &selectors))
    }

    fn query_all(&self, css: &str) -> Vec<NodeId> {
        let Some(selectors) = parse_selector_list(css) else {
            return Vec::new();
        };
        self.document_order()
            .into_iter()
            .filter(|&id| self.matches(id, &selectors))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document_order()
            .into_iter()
            .find(|node| self.nodes[node.0].attr("id") == Some(id))
    }

    fn closest(&self, node: &NodeId, css: &str) -> Option<NodeId> {
        let selectors = parse_selector_list(css)?;
        let mut current = self.nodes.get(node.0).map(|_| *node);
        while let Some(id) = current {
            if self.matches(id, &selectors) {
                return Some(id);
            }
            current = self.nodes[id.0].parent;
        }
        None
    }

    fn child_matching(&self, node: &NodeId, css: &str) -> Option<NodeId> {
        let selectors = parse_selector_list(css)?;
        self.nodes
            .get(node.0)?
            .children
            .iter()
            .copied()
            .find(|&child| self.matches(child, &selectors))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let data = self.nodes.get(node.0)?;
        if name == "class" {
            return (!data.classes.is_empty()).then(|| data.classes.join(" "));
        }
        data.attr(name).map(str::to_owned)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let Some(data) = self.data_mut(node) else {
            return;
        };
        if name == "class" {
            data.classes = value.split_whitespace().map(str::to_owned).collect();
        } else if let Some(slot) = data.attributes.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_owned();
        } else {
            data.attributes.push((name.to_owned(), value.to_owned()));
        }
        self.mutations += 1;
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes
            .get(node.0)
            .is_some_and(|data| data.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        let Some(data) = self.data_mut(node) else {
            return;
        };
        if !data.classes.iter().any(|c| c == class) {
            data.classes.push(class.to_owned());
            self.mutations += 1;
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        let Some(data) = self.data_mut(node) else {
            return;
        };
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        if data.classes.len() != before {
            self.mutations += 1;
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> String {
        self.nodes
            .get(node.0)
            .and_then(|data| data.style.iter().find(|(key, _)| key == property))
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let Some(data) = self.data_mut(node) else {
            return;
        };
        data.style.retain(|(key, _)| key != property);
        if !value.is_empty() {
            data.style.push((property.to_owned(), value.to_owned()));
        }
        self.mutations += 1;
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        if tag.is_empty() {
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(tag));
        Some(id)
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        if let Some(data) = self.data_mut(node) {
            data.inner_html = html.to_owned();
            self.mutations += 1;
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        if self.attach(*parent, *child) {
            self.mutations += 1;
        }
    }

    fn remove(&mut self, node: &NodeId) {
        if node.0 >= self.nodes.len() || *node == ROOT {
            return;
        }
        self.detach(*node);
        if self.focused.is_some_and(|focused| !self.is_attached(&focused)) {
            self.focused = None;
        }
        self.mutations += 1;
    }

    fn focus_and_select(&mut self, node: &NodeId) {
        if self.is_attached(node) {
            self.focused = Some(*node);
            self.selected = Some(*node);
        }
    }

    fn active_tag(&self) -> Option<String> {
        self.focused
            .and_then(|node| self.tag(&node))
            .map(str::to_ascii_uppercase)
    }

    fn link_target(&self, node: &NodeId) -> Option<String> {
        let href = self.attribute(node, "href")?;
        if href.contains("://") {
            Some(href)
        } else if href.starts_with('/') {
            Some(format!("{}{href}", self.origin))
        } else {
            let base = self.path.rsplit_once('/').map_or("", |(dir, _)| dir);
            Some(format!("{}{base}/{href}", self.origin))
        }
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_owned());
    }

    fn listen(&mut self, target: Listen<NodeId>) {
        self.listeners.push(target);
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn location_path(&self) -> String {
        self.path.clone()
    }
}
