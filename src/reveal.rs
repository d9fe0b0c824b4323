//! Reveal-on-scroll: tag eligible elements, then activate each one the first
//! time it becomes visible.
//!
//! Activation is one-way. An element is observed at most once per page load;
//! after its first visible report it is marked active and the host is told to
//! stop observing it. Under the reduced-motion preference nothing is observed
//! and everything is activated up front.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

use crate::consts::{ACTIVE_CLASS, REVEAL_CLASS, REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD};
use crate::dom::Dom;
use crate::error::Result;

/// Intersection settings for the visibility observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction that triggers a report.
    pub threshold: f64,
    /// CSS margin applied to the viewport before intersecting.
    pub root_margin: &'static str,
}

impl ObserverOptions {
    pub const REVEAL: Self = Self { threshold: REVEAL_THRESHOLD, root_margin: REVEAL_ROOT_MARGIN };
}

/// What the host has to do after [`RevealController::activate_visible`].
#[derive(Debug, Clone, PartialEq)]
pub enum Activation<N> {
    /// Nothing is pending; no observer is needed.
    Idle,
    /// Reduced motion: this many elements were activated immediately.
    Immediate(usize),
    /// Observe these elements with the given options and report each
    /// intersection back through [`RevealController::on_visible`].
    Observe { targets: Vec<N>, options: ObserverOptions },
}

/// Tracks which tagged elements are still waiting to be revealed.
#[derive(Debug, Clone)]
pub struct RevealController<N> {
    selectors: Vec<String>,
    observed: Vec<N>,
}

impl<N: Clone + PartialEq> RevealController<N> {
    #[must_use]
    pub fn new(selectors: Vec<String>) -> Self {
        Self { selectors, observed: Vec::new() }
    }

    /// Add the reveal marker to every matching element that lacks it.
    ///
    /// Idempotent: returns the number of elements tagged by this pass.
    ///
    /// # Errors
    ///
    /// Propagates selector and class-list failures from the document.
    pub fn tag_elements<D: Dom<Node = N>>(&self, dom: &D) -> Result<usize> {
        let mut tagged = 0;
        for selector in &self.selectors {
            for node in dom.query_all(selector)? {
                if !dom.has_class(&node, REVEAL_CLASS) {
                    dom.add_class(&node, REVEAL_CLASS)?;
                    tagged += 1;
                }
            }
        }
        tracing::debug!(tagged, "reveal elements tagged");
        Ok(tagged)
    }

    /// Activate or start watching every tagged element.
    ///
    /// Elements already active are skipped, and elements handed out by an
    /// earlier pass are not returned again: the host is already observing
    /// them. A pass with nothing new to watch is [`Activation::Idle`].
    ///
    /// # Errors
    ///
    /// Propagates selector and class-list failures from the document.
    pub fn activate_visible<D: Dom<Node = N>>(&mut self, dom: &D, reduced_motion: bool) -> Result<Activation<N>> {
        let pending: Vec<N> = dom
            .query_all(&format!(".{REVEAL_CLASS}"))?
            .into_iter()
            .filter(|node| !dom.has_class(node, ACTIVE_CLASS))
            .collect();

        if reduced_motion {
            for node in &pending {
                dom.add_class(node, ACTIVE_CLASS)?;
            }
            self.observed.retain(|node| !pending.contains(node));
            tracing::debug!(count = pending.len(), "reduced motion: reveal elements activated");
            return Ok(Activation::Immediate(pending.len()));
        }

        let targets: Vec<N> = pending.into_iter().filter(|node| !self.observed.contains(node)).collect();
        if targets.is_empty() {
            return Ok(Activation::Idle);
        }

        self.observed.extend(targets.iter().cloned());
        tracing::debug!(count = targets.len(), "reveal elements observed");
        Ok(Activation::Observe { targets, options: ObserverOptions::REVEAL })
    }

    /// Handle a visibility report for `node`.
    ///
    /// Returns `true` when the element was just activated and the host should
    /// stop observing it. Reports for elements that are not intersecting, or
    /// that were already activated, change nothing.
    ///
    /// # Errors
    ///
    /// Propagates class-list failures from the document.
    pub fn on_visible<D: Dom<Node = N>>(&mut self, dom: &D, node: &N, intersecting: bool) -> Result<bool> {
        if !intersecting {
            return Ok(false);
        }
        let Some(index) = self.observed.iter().position(|n| n == node) else {
            return Ok(false);
        };
        dom.add_class(node, ACTIVE_CLASS)?;
        self.observed.swap_remove(index);
        Ok(true)
    }

    /// Elements still waiting for their first visible report.
    #[must_use]
    pub fn observed(&self) -> &[N] {
        &self.observed
    }
}
