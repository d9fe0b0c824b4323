//! Page composition.
//!
//! `Page` owns one instance of every controller plus the document they act
//! on. The host (the `web` binding in the browser, tests natively) calls
//! [`Page::init`] once the markup is parsed and then forwards DOM events to
//! the matching method. Nothing here returns an error: a failing step is
//! logged and the page carries on without that enhancement.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use crate::config::PageConfig;
use crate::contact::{ContactPrefill, PrefillReport};
use crate::dom::Dom;
use crate::error::Result;
use crate::modal::{ClickOutcome, ModalManager};
use crate::nav::ActiveNavMarker;
use crate::reveal::{Activation, RevealController};
use crate::scroll::ScrollProgress;

/// What [`Page::init`] did, and what the host still has to set up.
#[derive(Debug, Clone, PartialEq)]
pub struct Startup<N> {
    /// Elements newly tagged for reveal.
    pub tagged: usize,
    /// Whether the host must create a visibility observer.
    pub reveal: Activation<N>,
    /// Nav links marked active.
    pub nav_marked: usize,
    /// Whether the progress bar is live and needs scroll/resize events.
    pub scroll_bar: bool,
    pub prefill: PrefillReport,
}

/// Every enhancement for one document.
pub struct Page<D: Dom> {
    dom: D,
    config: PageConfig,
    reduced_motion: bool,
    reveal: RevealController<D::Node>,
    modals: ModalManager<D::Node>,
    scroll: Option<ScrollProgress<D::Node>>,
    nav: ActiveNavMarker,
    contact: Option<ContactPrefill>,
}

impl<D: Dom> Page<D> {
    /// Build the controllers. The reduced-motion preference is read here,
    /// once, and shared by every controller for the page lifetime.
    #[must_use]
    pub fn new(dom: D, config: PageConfig) -> Self {
        let reduced_motion = dom.prefers_reduced_motion();
        let contact = config.enable_contact_prefill.then(|| ContactPrefill::new(config.contact.clone()));
        Self {
            reveal: RevealController::new(config.reveal_selectors.clone()),
            modals: ModalManager::new(config.enable_hash_sync),
            scroll: None,
            nav: ActiveNavMarker::new(config.nav_link_selector.clone()),
            contact,
            dom,
            config,
            reduced_motion,
        }
    }

    /// Run the startup sequence: reveal tagging, reveal activation, active
    /// navigation, modals, scroll bar, contact prefill.
    pub fn init(&mut self) -> Startup<D::Node> {
        let tagged = logged("reveal tagging", self.reveal.tag_elements(&self.dom)).unwrap_or_default();
        let reveal = logged("reveal activation", self.reveal.activate_visible(&self.dom, self.reduced_motion))
            .unwrap_or(Activation::Idle);
        let nav_marked = logged("active nav", self.nav.mark(&self.dom)).unwrap_or_default();

        // Modals are event-driven; the deep link is handled by `loaded`.
        self.scroll = ScrollProgress::attach(
            &self.dom,
            &self.config.scroll_bar_id,
            self.config.enable_scroll_bar,
            self.reduced_motion,
        );
        self.update_scroll();

        let prefill = match &self.contact {
            Some(contact) => logged("contact prefill", contact.apply(&self.dom)).unwrap_or_default(),
            None => PrefillReport::default(),
        };

        let startup = Startup { tagged, reveal, nav_marked, scroll_bar: self.scroll.is_some(), prefill };
        tracing::info!(
            tagged = startup.tagged,
            nav_marked = startup.nav_marked,
            scroll_bar = startup.scroll_bar,
            reduced_motion = self.reduced_motion,
            "page enhanced"
        );
        startup
    }

    // --- Events ---

    /// Document click. The host cancels the default action when
    /// [`ClickOutcome::prevents_default`] says so.
    pub fn click(&mut self, target: &D::Node) -> ClickOutcome {
        logged("modal click", self.modals.on_click(&self.dom, target)).unwrap_or(ClickOutcome::Ignored)
    }

    /// Document keydown. Returns `true` when an overlay was closed.
    pub fn key_down(&mut self, key: &str) -> bool {
        logged("modal keydown", self.modals.on_key_down(&self.dom, key)).is_some_and(|closed| closed.is_some())
    }

    /// Window load. Returns `true` when a deep-linked overlay was opened.
    pub fn loaded(&mut self) -> bool {
        logged("modal deep link", self.modals.on_load(&self.dom)).unwrap_or_default()
    }

    /// Window scroll. Returns the new progress, if the bar is live.
    pub fn scrolled(&self) -> Option<f64> {
        self.update_scroll()
    }

    /// Window resize. Same as a scroll: the scrollable range may have changed.
    pub fn resized(&self) -> Option<f64> {
        self.update_scroll()
    }

    /// Visibility report from the observer. Returns `true` when the host
    /// should stop observing `node`.
    pub fn visible(&mut self, node: &D::Node, intersecting: bool) -> bool {
        logged("reveal visibility", self.reveal.on_visible(&self.dom, node, intersecting)).unwrap_or_default()
    }

    // --- Accessors ---

    #[must_use]
    pub fn dom(&self) -> &D {
        &self.dom
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn modals(&self) -> &ModalManager<D::Node> {
        &self.modals
    }

    #[must_use]
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn update_scroll(&self) -> Option<f64> {
        let scroll = self.scroll.as_ref()?;
        logged("scroll progress", scroll.update(&self.dom))
    }
}

/// Log a failed step and turn it into `None`.
fn logged<T>(step: &'static str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, step, "enhancement step failed");
            None
        }
    }
}
