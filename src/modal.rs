//! Accessible modal overlays.
//!
//! `ModalManager` owns a stack of open overlays. Each entry remembers the
//! element that had focus before it opened, so focus return is well-defined
//! even when overlays are opened on top of each other:
//!
//! - Escape and backdrop clicks close the most recently opened overlay.
//! - Closing an overlay that is not on top hands its saved focus to the
//!   overlay opened right after it, so the chain still ends where the user
//!   started.
//! - Opening an overlay that is already open is a no-op.
//!
//! Overlays are recognised by the `modal-overlay` class and addressed by id.
//! The `aria-hidden` attribute always mirrors the `open` class.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

use crate::consts::{
    ESCAPE_KEY, FOCUSABLE_SELECTOR, MODAL_CLOSE_ATTR, MODAL_OPEN_ATTR, MODAL_OPEN_CLASS, MODAL_OVERLAY_CLASS,
};
use crate::dom::Dom;
use crate::error::Result;

/// State kept for one open overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOverlay<N> {
    pub id: String,
    pub node: N,
    /// Element focused right before this overlay opened.
    pub return_focus: Option<N>,
}

/// How a document click was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An open control was clicked; carries the requested overlay id.
    OpenControl(String),
    /// A close control was clicked.
    CloseControl,
    /// The backdrop of an open overlay was clicked and it closed.
    Backdrop,
    /// The click has nothing to do with overlays.
    Ignored,
}

impl ClickOutcome {
    /// Whether the host should cancel the click's default action.
    #[must_use]
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::OpenControl(_) | Self::CloseControl)
    }
}

/// Opens, closes and tracks overlays for one document.
#[derive(Debug, Clone)]
pub struct ModalManager<N> {
    stack: Vec<OpenOverlay<N>>,
    hash_sync: bool,
}

impl<N: Clone + PartialEq> ModalManager<N> {
    #[must_use]
    pub fn new(hash_sync: bool) -> Self {
        Self { stack: Vec::new(), hash_sync }
    }

    // --- Transitions ---

    /// Open the overlay with the given id.
    ///
    /// Returns `false` without touching the document when no overlay has that
    /// id or it is already open.
    ///
    /// The element must carry the `modal-overlay` class. A bare id lookup would
    /// let a deep link like `#about` "open" a plain section, so click controls
    /// and `on_load` share this check and an element without the class is
    /// never opened from either path.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn open<D: Dom<Node = N>>(&mut self, dom: &D, id: &str) -> Result<bool> {
        let Some(node) = dom.element_by_id(id) else {
            tracing::debug!(id, "modal open skipped: no such element");
            return Ok(false);
        };
        if !dom.has_class(&node, MODAL_OVERLAY_CLASS) {
            tracing::debug!(id, "modal open skipped: element is not an overlay");
            return Ok(false);
        }
        if self.is_open(id) {
            return Ok(false);
        }

        let return_focus = dom.active_element();
        dom.add_class(&node, MODAL_OPEN_CLASS)?;
        dom.set_attribute(&node, "aria-hidden", "false")?;
        self.stack.push(OpenOverlay { id: id.to_string(), node: node.clone(), return_focus });

        if let Some(target) = dom.query_within(&node, FOCUSABLE_SELECTOR)? {
            dom.focus(&target)?;
        }
        if self.hash_sync {
            dom.replace_hash(Some(id))?;
        }
        tracing::debug!(id, depth = self.stack.len(), "modal opened");
        Ok(true)
    }

    /// Close `overlay`.
    ///
    /// Overlays the manager did not open (for instance rendered open by the
    /// server) are still closed, there is just no focus to restore.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn close<D: Dom<Node = N>>(&mut self, dom: &D, overlay: &N) -> Result<()> {
        dom.remove_class(overlay, MODAL_OPEN_CLASS)?;
        dom.set_attribute(overlay, "aria-hidden", "true")?;

        let (closed_id, restore) = match self.stack.iter().position(|entry| entry.node == *overlay) {
            Some(index) => {
                let (id, restore) = self.remove_entry(index);
                (Some(id), restore)
            }
            None => (dom.attribute(overlay, "id"), None),
        };

        if let Some(id) = &closed_id {
            self.sync_hash_after_close(dom, id)?;
        }
        if let Some(target) = restore {
            if !dom.focus(&target)? {
                tracing::debug!("focus return skipped: element no longer focusable");
            }
        }
        tracing::debug!(id = closed_id.as_deref(), depth = self.stack.len(), "modal closed");
        Ok(())
    }

    /// Close the most recently opened overlay, if any.
    ///
    /// Falls back to the first overlay carrying the open class when the stack
    /// is empty, so markup-opened overlays still respond to Escape.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn close_top<D: Dom<Node = N>>(&mut self, dom: &D) -> Result<Option<N>> {
        let top = match self.stack.last() {
            Some(entry) => Some(entry.node.clone()),
            None => dom
                .query_all(&format!(".{MODAL_OVERLAY_CLASS}.{MODAL_OPEN_CLASS}"))?
                .into_iter()
                .next(),
        };
        if let Some(node) = &top {
            self.close(dom, node)?;
        }
        Ok(top)
    }

    // --- Event entry points ---

    /// Route a document click on `target`.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn on_click<D: Dom<Node = N>>(&mut self, dom: &D, target: &N) -> Result<ClickOutcome> {
        if let Some(control) = dom.closest(target, &format!("[{MODAL_OPEN_ATTR}]"))? {
            let id = dom.attribute(&control, MODAL_OPEN_ATTR).unwrap_or_default();
            self.open(dom, &id)?;
            return Ok(ClickOutcome::OpenControl(id));
        }

        if let Some(control) = dom.closest(target, &format!("[{MODAL_CLOSE_ATTR}]"))? {
            if let Some(overlay) = dom.closest(&control, &format!(".{MODAL_OVERLAY_CLASS}"))? {
                self.close(dom, &overlay)?;
            }
            return Ok(ClickOutcome::CloseControl);
        }

        if dom.has_class(target, MODAL_OVERLAY_CLASS) && dom.has_class(target, MODAL_OPEN_CLASS) {
            self.close(dom, target)?;
            return Ok(ClickOutcome::Backdrop);
        }
        Ok(ClickOutcome::Ignored)
    }

    /// Route a document keydown. Only Escape is handled.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn on_key_down<D: Dom<Node = N>>(&mut self, dom: &D, key: &str) -> Result<Option<N>> {
        if key != ESCAPE_KEY {
            return Ok(None);
        }
        self.close_top(dom)
    }

    /// Open the overlay named by the URL fragment once the page has loaded.
    ///
    /// # Errors
    ///
    /// Propagates document failures.
    pub fn on_load<D: Dom<Node = N>>(&mut self, dom: &D) -> Result<bool> {
        let hash = dom.location_hash()?;
        let id = hash.trim_start_matches('#');
        if id.is_empty() {
            return Ok(false);
        }
        self.open(dom, id)
    }

    // --- Queries ---

    #[must_use]
    pub fn is_open(&self, id: &str) -> bool {
        self.stack.iter().any(|entry| entry.id == id)
    }

    /// The most recently opened overlay.
    #[must_use]
    pub fn top(&self) -> Option<&OpenOverlay<N>> {
        self.stack.last()
    }

    /// Open overlays, oldest first.
    #[must_use]
    pub fn open_overlays(&self) -> &[OpenOverlay<N>] {
        &self.stack
    }

    /// Remove the entry at `index` and return its id plus the element to
    /// refocus. A non-top entry passes its saved focus up the stack instead.
    fn remove_entry(&mut self, index: usize) -> (String, Option<N>) {
        let entry = self.stack.remove(index);
        match self.stack.get_mut(index) {
            Some(next) => {
                next.return_focus = entry.return_focus;
                (entry.id, None)
            }
            None => (entry.id, entry.return_focus),
        }
    }

    fn sync_hash_after_close<D: Dom<Node = N>>(&self, dom: &D, closed_id: &str) -> Result<()> {
        if dom.location_hash()? != format!("#{closed_id}") {
            return Ok(());
        }
        match self.stack.last() {
            Some(entry) if self.hash_sync => dom.replace_hash(Some(&entry.id)),
            _ => dom.replace_hash(None),
        }
    }
}
