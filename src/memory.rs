//! In-memory document.
//!
//! `MemoryDom` implements [`Dom`] without a browser so controllers can run
//! natively, in tests or in tooling that prerenders enhanced markup. It models
//! just enough of a document: a tree of elements with classes, attributes,
//! text and inline styles, a focused element, the URL fragment and query, the
//! reduced-motion preference, and scroll geometry.
//!
//! Selector queries go through `scraper`: the tree is serialized to markup,
//! tagged with node ids, and parsed by the HTML5 parser before matching. Trees
//! should therefore be valid HTML nesting (no `<div>` inside `<p>`, no nested
//! `<a>`), or the parser will restructure them the way a browser would.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use crate::dom::{Dom, ScrollMetrics};
use crate::error::{EnhanceError, Result};

/// Handle to an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const FOCUSABLE_TAGS: &[&str] = &["a", "button", "input", "select", "textarea"];

/// Elements the HTML parser never gives children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Attribute carrying the arena index through serialization.
const NODE_ATTR: &str = "data-memory-node";

const ROOT: NodeId = NodeId(0);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    styles: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Tree {
    elements: Vec<Element>,
    focused: Option<NodeId>,
}

/// A document held entirely in memory.
#[derive(Debug)]
pub struct MemoryDom {
    tree: RefCell<Tree>,
    hash: RefCell<String>,
    search: RefCell<String>,
    reduced_motion: Cell<bool>,
    metrics: Cell<ScrollMetrics>,
    mutations: Cell<usize>,
    hash_replacements: Cell<usize>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty document: `<html>` with a single `<body>`.
    #[must_use]
    pub fn new() -> Self {
        let html = Element::new("html", None);
        let body = Element::new("body", Some(ROOT));
        let mut tree = Tree { elements: vec![html, body], focused: None };
        tree.elements[0].children.push(NodeId(1));
        Self {
            tree: RefCell::new(tree),
            hash: RefCell::new(String::new()),
            search: RefCell::new(String::new()),
            reduced_motion: Cell::new(false),
            metrics: Cell::new(ScrollMetrics::default()),
            mutations: Cell::new(0),
            hash_replacements: Cell::new(0),
        }
    }

    /// The `<html>` element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body_id(&self) -> NodeId {
        NodeId(1)
    }

    // --- Building ---

    /// Append a new element under `parent`.
    ///
    /// A `class` entry in `attributes` is split into the element's class list.
    pub fn append(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId(tree.elements.len());
        let mut element = Element::new(tag, Some(parent));
        for (name, value) in attributes {
            element.write_attribute(name, value);
        }
        tree.elements.push(element);
        if let Some(parent) = tree.elements.get_mut(parent.0) {
            parent.children.push(id);
        }
        id
    }

    /// Set an attribute while building, without counting it as a mutation.
    pub fn put_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.tree.borrow_mut().elements.get_mut(node.0) {
            element.write_attribute(name, value);
        }
    }

    /// Detach `node` (and its subtree) from the document.
    pub fn remove(&self, node: NodeId) {
        let mut tree = self.tree.borrow_mut();
        let Some(parent) = tree.elements.get_mut(node.0).and_then(|el| el.parent.take()) else {
            return;
        };
        if let Some(parent) = tree.elements.get_mut(parent.0) {
            parent.children.retain(|child| *child != node);
        }
    }

    /// Set the URL fragment, e.g. `"#contact"`.
    pub fn set_hash(&self, hash: &str) {
        *self.hash.borrow_mut() = hash.to_string();
    }

    /// Set the URL query string, e.g. `"?service=seo"`.
    pub fn set_search(&self, search: &str) {
        *self.search.borrow_mut() = search.to_string();
    }

    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
    }

    pub fn set_scroll_metrics(&self, metrics: ScrollMetrics) {
        self.metrics.set(metrics);
    }

    /// Give focus to `node` as if the user had tabbed to it.
    pub fn set_focus(&self, node: Option<NodeId>) {
        self.tree.borrow_mut().focused = node;
    }

    // --- Inspection ---

    #[must_use]
    pub fn text(&self, node: NodeId) -> String {
        self.tree
            .borrow()
            .elements
            .get(node.0)
            .map(|el| el.text.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree
            .borrow()
            .elements
            .get(node.0)
            .and_then(|el| el.styles.get(property).cloned())
    }

    #[must_use]
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree
            .borrow()
            .elements
            .get(node.0)
            .map(|el| el.classes.clone())
            .unwrap_or_default()
    }

    /// Current URL fragment.
    #[must_use]
    pub fn hash(&self) -> String {
        self.hash.borrow().clone()
    }

    /// Number of element mutations made through the [`Dom`] trait.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.mutations.get()
    }

    /// Number of `replace_hash` calls; none of them adds history entries.
    #[must_use]
    pub fn hash_replacements(&self) -> usize {
        self.hash_replacements.get()
    }

    fn mutate(&self, node: NodeId, apply: impl FnOnce(&mut Element)) {
        if let Some(element) = self.tree.borrow_mut().elements.get_mut(node.0) {
            apply(element);
            self.mutations.set(self.mutations.get() + 1);
        }
    }
}

impl Element {
    fn new(tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            styles: BTreeMap::new(),
            parent,
            children: Vec::new(),
        }
    }

    fn write_attribute(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            self.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn read_attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }
}

impl Tree {
    /// Attached elements in document (pre-)order, starting at `from`.
    fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(element) = self.elements.get(id.0) {
                stack.extend(element.children.iter().rev().copied());
            }
        }
        order
    }

    /// Topmost ancestor of `node`: the root when attached, otherwise the
    /// root of the detached subtree.
    fn top(&self, node: NodeId) -> NodeId {
        let mut current = node;
        while let Some(parent) = self.elements.get(current.0).and_then(|el| el.parent) {
            current = parent;
        }
        current
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.top(node) == ROOT
    }

    /// Parse the tree holding `node`. Attached nodes are parsed as a full
    /// document, detached subtrees as a fragment.
    fn snapshot(&self, node: NodeId) -> Html {
        let top = self.top(node);
        let mut markup = String::new();
        if top == ROOT {
            markup.push_str("<!DOCTYPE html>");
            self.render(top, &mut markup);
            Html::parse_document(&markup)
        } else {
            self.render(top, &mut markup);
            Html::parse_fragment(&markup)
        }
    }

    /// Serialize `node` and its subtree. Text and styles are left out; only
    /// what selectors can see is written.
    fn render(&self, node: NodeId, out: &mut String) {
        let Some(element) = self.elements.get(node.0) else {
            return;
        };
        out.push('<');
        out.push_str(&element.tag);
        push_attribute(out, NODE_ATTR, &node.0.to_string());
        if !element.classes.is_empty() {
            push_attribute(out, "class", &element.classes.join(" "));
        }
        for (name, value) in &element.attributes {
            push_attribute(out, name, value);
        }
        out.push('>');
        if VOID_TAGS.contains(&element.tag.as_str()) {
            return;
        }
        for child in &element.children {
            self.render(*child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
    out.push('"');
}

fn parse_selector(raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| EnhanceError::Selector(format!("{raw:?}: {e}")))
}

/// Arena index of a parsed element; `None` for elements the parser invented.
fn node_id(element: &ElementRef<'_>) -> Option<NodeId> {
    match element.value().attr(NODE_ATTR)?.parse::<usize>() {
        Ok(index) => Some(NodeId(index)),
        Err(_) => None,
    }
}

/// The parsed counterpart of `node`.
fn locate(html: &Html, node: NodeId) -> Option<ElementRef<'_>> {
    let root = html.root_element();
    root.descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| node_id(element) == Some(node))
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = parse_selector(selector)?;
        let html = self.tree.borrow().snapshot(ROOT);
        let root = html.root_element();
        let mut found = Vec::new();
        if selector.matches(&root) {
            found.extend(node_id(&root));
        }
        found.extend(root.select(&selector).filter_map(|element| node_id(&element)));
        Ok(found)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = parse_selector(selector)?;
        let html = self.tree.borrow().snapshot(*root);
        let Some(scope) = locate(&html, *root) else {
            return Ok(None);
        };
        Ok(scope.select(&selector).find_map(|element| node_id(&element)))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.preorder(ROOT).into_iter().find(|node| {
            tree.elements
                .get(node.0)
                .is_some_and(|el| el.attributes.get("id").is_some_and(|value| value == id))
        })
    }

    fn closest(&self, node: &NodeId, selector: &str) -> Result<Option<NodeId>> {
        let selector = parse_selector(selector)?;
        let html = self.tree.borrow().snapshot(*node);
        let mut current = locate(&html, *node);
        while let Some(element) = current {
            if let Some(id) = node_id(&element) {
                if selector.matches(&element) {
                    return Ok(Some(id));
                }
            }
            current = element.parent().and_then(ElementRef::wrap);
        }
        Ok(None)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body_id())
    }

    fn document_element(&self) -> Option<NodeId> {
        Some(self.root())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.tree
            .borrow()
            .elements
            .get(node.0)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<()> {
        if !self.has_class(node, class) {
            self.mutate(*node, |el| el.classes.push(class.to_string()));
        }
        Ok(())
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<()> {
        if self.has_class(node, class) {
            self.mutate(*node, |el| el.classes.retain(|c| c != class));
        }
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .elements
            .get(node.0)
            .and_then(|el| el.read_attribute(name))
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<()> {
        self.mutate(*node, |el| el.write_attribute(name, value));
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.mutate(*node, |el| el.text = text.to_string());
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<()> {
        self.mutate(*node, |el| {
            el.styles.insert(property.to_string(), value.to_string());
        });
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        self.tree.borrow().focused
    }

    fn focus(&self, node: &NodeId) -> Result<bool> {
        let mut tree = self.tree.borrow_mut();
        let focusable = tree.elements.get(node.0).is_some_and(|el| {
            FOCUSABLE_TAGS.contains(&el.tag.as_str()) || el.attributes.contains_key("tabindex")
        });
        if !focusable || !tree.is_connected(*node) {
            return Ok(false);
        }
        tree.focused = Some(*node);
        Ok(true)
    }

    fn location_hash(&self) -> Result<String> {
        Ok(self.hash.borrow().clone())
    }

    fn location_search(&self) -> Result<String> {
        Ok(self.search.borrow().clone())
    }

    fn replace_hash(&self, fragment: Option<&str>) -> Result<()> {
        *self.hash.borrow_mut() = fragment.map(|id| format!("#{id}")).unwrap_or_default();
        self.hash_replacements.set(self.hash_replacements.get() + 1);
        Ok(())
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion.get()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics.get()
    }
}
