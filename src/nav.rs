//! Current-page highlighting in the navigation.
//!
//! The page names itself with `data-page` on `<body>`; every nav link whose
//! `data-nav` carries the same key gets the `active` class.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use crate::consts::{ACTIVE_CLASS, NAV_ATTR, PAGE_ATTR};
use crate::dom::Dom;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNavMarker {
    link_selector: String,
}

impl ActiveNavMarker {
    #[must_use]
    pub fn new(link_selector: impl Into<String>) -> Self {
        Self { link_selector: link_selector.into() }
    }

    /// Mark the links for the current page.
    ///
    /// Returns how many links were marked. A body without a page key marks
    /// nothing.
    ///
    /// # Errors
    ///
    /// Propagates selector and class-list failures from the document.
    pub fn mark<D: Dom>(&self, dom: &D) -> Result<usize> {
        let Some(page) = dom.body().and_then(|body| dom.attribute(&body, PAGE_ATTR)) else {
            return Ok(0);
        };
        if page.is_empty() {
            return Ok(0);
        }

        let mut marked = 0;
        for link in dom.query_all(&self.link_selector)? {
            if dom.attribute(&link, NAV_ATTR).as_deref() == Some(page.as_str()) {
                dom.add_class(&link, ACTIVE_CLASS)?;
                marked += 1;
            }
        }
        tracing::debug!(page, marked, "nav links marked");
        Ok(marked)
    }
}
