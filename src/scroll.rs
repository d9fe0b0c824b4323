//! Reading-progress bar.
//!
//! The bar's width tracks how far the document has been scrolled, as a
//! percentage of the scrollable range. It is left alone entirely when the
//! page has no bar element, the feature is disabled, or the user prefers
//! reduced motion.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use crate::dom::{Dom, ScrollMetrics};
use crate::error::Result;

/// Scrolled fraction of the document as a percentage in `[0, 100]`.
///
/// A document that does not overflow the viewport reports `0`.
#[must_use]
pub fn progress_percent(metrics: ScrollMetrics) -> f64 {
    let range = metrics.scroll_height - metrics.client_height;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    let percent = metrics.scroll_top / range * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Vertical scroll offset of the page, in CSS pixels.
///
/// `window_y` is the viewport's fractional `scrollY` and wins when the host
/// could read it. Otherwise the element offsets are used: the root's, or the
/// body's when the root reports `0` (quirks-mode documents scroll the body).
#[must_use]
pub fn scroll_offset(window_y: Option<f64>, root_top: f64, body_top: f64) -> f64 {
    match window_y {
        Some(y) if y.is_finite() => y,
        _ if root_top > 0.0 => root_top,
        _ => body_top,
    }
}

/// CSS width value for `percent`, with two decimals.
#[must_use]
pub fn format_width(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Keeps one bar element in sync with the scroll position.
#[derive(Debug, Clone)]
pub struct ScrollProgress<N> {
    bar: N,
}

impl<N: Clone + PartialEq> ScrollProgress<N> {
    /// Bind to the element with `bar_id`.
    ///
    /// Returns `None` when the feature should stay inactive for this page.
    #[must_use]
    pub fn attach<D: Dom<Node = N>>(dom: &D, bar_id: &str, enabled: bool, reduced_motion: bool) -> Option<Self> {
        if !enabled {
            return None;
        }
        if reduced_motion {
            tracing::debug!("reduced motion: scroll progress disabled");
            return None;
        }
        let bar = dom.element_by_id(bar_id)?;
        Some(Self { bar })
    }

    /// Recompute the bar width from the current scroll position.
    ///
    /// Returns the percentage that was written.
    ///
    /// # Errors
    ///
    /// Propagates style failures from the document.
    pub fn update<D: Dom<Node = N>>(&self, dom: &D) -> Result<f64> {
        let percent = progress_percent(dom.scroll_metrics());
        dom.set_style(&self.bar, "width", &format_width(percent))?;
        Ok(percent)
    }

    #[must_use]
    pub fn bar(&self) -> &N {
        &self.bar
    }
}
