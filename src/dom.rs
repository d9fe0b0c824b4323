//! Document abstraction shared by every controller.
//!
//! Controllers never reach for global browser state. They receive a `Dom`
//! and talk to the page exclusively through it, which keeps them testable
//! against `memory::MemoryDom` and lets `web` bind the same
//! logic to `web-sys`.

use crate::error::Result;

/// Vertical scroll geometry of the document, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub scroll_top: f64,
    /// Full height of the scrollable content.
    pub scroll_height: f64,
    /// Height of the visible viewport.
    pub client_height: f64,
}

/// The document operations the enhancements rely on.
///
/// Query methods return nodes in document order. Mutations report platform
/// failures as errors; a missing target is never an error and is expressed
/// with `Option` instead.
pub trait Dom {
    /// Handle to an element in this document.
    type Node: Clone + PartialEq + std::fmt::Debug;

    // --- Queries ---

    /// Every element matching `selector`.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Node>>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: &Self::Node, selector: &str) -> Result<Option<Self::Node>>;

    /// Element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// `node` itself or its nearest ancestor matching `selector`.
    fn closest(&self, node: &Self::Node, selector: &str) -> Result<Option<Self::Node>>;

    /// The `<body>` element.
    fn body(&self) -> Option<Self::Node>;

    /// The root `<html>` element.
    fn document_element(&self) -> Option<Self::Node>;

    // --- Element state ---

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<()>;

    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<()>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<()>;

    /// Replace the element's text content.
    fn set_text(&self, node: &Self::Node, text: &str);

    /// Set an inline style property.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<()>;

    // --- Focus ---

    /// The element that currently has keyboard focus.
    fn active_element(&self) -> Option<Self::Node>;

    /// Move focus to `node`.
    ///
    /// Returns `Ok(false)` when the node can no longer take focus (detached,
    /// or not a focusable kind of element).
    fn focus(&self, node: &Self::Node) -> Result<bool>;

    // --- Location ---

    /// Current URL fragment including the leading `#`, or empty.
    fn location_hash(&self) -> Result<String>;

    /// Current URL query string including the leading `?`, or empty.
    fn location_search(&self) -> Result<String>;

    /// Replace the URL fragment without adding a history entry.
    ///
    /// `None` removes the fragment entirely.
    fn replace_hash(&self, fragment: Option<&str>) -> Result<()>;

    // --- Environment ---

    /// Whether the user asked the platform to reduce motion.
    fn prefers_reduced_motion(&self) -> bool;

    fn scroll_metrics(&self) -> ScrollMetrics;
}
