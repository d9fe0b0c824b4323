//! Browser binding.
//!
//! [`WebDom`] implements [`Dom`] over `web-sys`, and [`start`] is the
//! exported entry point: it installs the panic hook and logging, resolves the
//! page configuration, builds a [`Page`] once the markup is parsed, and wires
//! the DOM events the controllers react to. Listeners live for the rest of
//! the page.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use js_sys::Array;
use tracing::level_filters::LevelFilter;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, Window,
};

use crate::config::PageConfig;
use crate::consts::{CONFIG_SCRIPT_ID, REDUCED_MOTION_QUERY};
use crate::dom::{Dom, ScrollMetrics};
use crate::error::{EnhanceError, Result};
use crate::page::Page;
use crate::reveal::{Activation, ObserverOptions};
use crate::scroll::scroll_offset;

type SharedPage = Rc<RefCell<Page<WebDom>>>;

fn js_error(value: JsValue) -> EnhanceError {
    EnhanceError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// The live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Bind to the global `window` and its document.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Environment`] outside a browser window.
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window().ok_or(EnhanceError::Environment("window"))?;
        let document = window.document().ok_or(EnhanceError::Environment("document"))?;
        Ok(Self { window, document })
    }

    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Result<Vec<Element>> {
        let list = self.document.query_selector_all(selector).map_err(js_error)?;
        let mut nodes = Vec::new();
        for index in 0..list.length() {
            if let Some(element) = list.item(index).as_ref().and_then(|node| node.dyn_ref::<Element>()) {
                nodes.push(element.clone());
            }
        }
        Ok(nodes)
    }

    fn query_within(&self, root: &Element, selector: &str) -> Result<Option<Element>> {
        root.query_selector(selector).map_err(js_error)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn closest(&self, node: &Element, selector: &str) -> Result<Option<Element>> {
        node.closest(selector).map_err(js_error)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn document_element(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list().add_1(class).map_err(js_error)
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<()> {
        node.class_list().remove_1(class).map_err(js_error)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<()> {
        node.set_attribute(name, value).map_err(js_error)
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<()> {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return Err(EnhanceError::Dom(format!("cannot style <{}>", node.tag_name())));
        };
        element.style().set_property(property, value).map_err(js_error)
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&self, node: &Element) -> Result<bool> {
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return Ok(false);
        };
        if !element.is_connected() {
            return Ok(false);
        }
        element.focus().map_err(js_error)?;
        Ok(true)
    }

    fn location_hash(&self) -> Result<String> {
        self.window.location().hash().map_err(js_error)
    }

    fn location_search(&self) -> Result<String> {
        self.window.location().search().map_err(js_error)
    }

    fn replace_hash(&self, fragment: Option<&str>) -> Result<()> {
        let url = match fragment {
            Some(id) => format!("#{id}"),
            None => {
                let location = self.window.location();
                let path = location.pathname().map_err(js_error)?;
                let search = location.search().map_err(js_error)?;
                format!("{path}{search}")
            }
        };
        let history = self.window.history().map_err(js_error)?;
        history
            .replace_state_with_url(&JsValue::NULL, "", Some(&url))
            .map_err(js_error)
    }

    fn prefers_reduced_motion(&self) -> bool {
        match self.window.match_media(REDUCED_MOTION_QUERY) {
            Ok(Some(query)) => query.matches(),
            _ => false,
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let Some(root) = self.document.document_element() else {
            return ScrollMetrics::default();
        };
        let window_y = match self.window.scroll_y() {
            Ok(y) => Some(y),
            Err(e) => {
                tracing::debug!(error = ?e, "scrollY unavailable");
                None
            }
        };
        let body_top = self.document.body().map_or(0, |body| body.scroll_top());
        ScrollMetrics {
            scroll_top: scroll_offset(window_y, f64::from(root.scroll_top()), f64::from(body_top)),
            scroll_height: f64::from(root.scroll_height()),
            client_height: f64::from(root.client_height()),
        }
    }
}

// --- Entry point ---

/// Enhance the current page.
///
/// `config_json` overrides the page's embedded configuration. Without it the
/// text of `<script id="sitekit-config">` is used, and without that the
/// defaults.
///
/// # Errors
///
/// Fails only when there is no browser window or document.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let dom = WebDom::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;

    let (config, rejected) = match resolve_config(&dom, config_json.as_deref()) {
        Ok(config) => (config, None),
        Err(e) => (PageConfig::default(), Some(e)),
    };
    init_tracing(config.log_filter());
    if let Some(e) = rejected {
        tracing::warn!(error = %e, "page config rejected; using defaults");
    }

    let document = dom.document.clone();
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", move |_| boot(dom, config)).forget();
    } else {
        boot(dom, config);
    }
    Ok(())
}

fn resolve_config(dom: &WebDom, explicit: Option<&str>) -> Result<PageConfig> {
    if let Some(raw) = explicit {
        return PageConfig::from_json(raw);
    }
    let embedded = dom
        .element_by_id(CONFIG_SCRIPT_ID)
        .and_then(|script| script.text_content())
        .filter(|text| !text.trim().is_empty());
    match embedded {
        Some(raw) => PageConfig::from_json(&raw),
        None => Ok(PageConfig::default()),
    }
}

fn init_tracing(level: LevelFilter) {
    use tracing_subscriber::prelude::*;
    use tracing_web::MakeWebConsoleWriter;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(level);
    if let Err(e) = tracing_subscriber::registry().with(fmt_layer).try_init() {
        tracing::debug!(error = %e, "tracing already initialized");
    }
}

fn boot(dom: WebDom, config: PageConfig) {
    let window = dom.window.clone();
    let document = dom.document.clone();
    let page: SharedPage = Rc::new(RefCell::new(Page::new(dom, config)));

    let startup = page.borrow_mut().init();
    if let Activation::Observe { targets, options } = startup.reveal {
        if let Err(e) = observe_reveals(&page, &targets, options) {
            tracing::warn!(error = %e, "reveal observer unavailable");
        }
    }
    install_modal_listeners(&page, &window, &document);
    if startup.scroll_bar {
        install_scroll_listeners(&page, &window);
    }
}

fn install_modal_listeners(page: &SharedPage, window: &Window, document: &Document) {
    let on_click = Rc::clone(page);
    EventListener::new_with_options(
        document,
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(target) = event.target() else {
                return;
            };
            let Some(target) = target.dyn_ref::<Element>() else {
                return;
            };
            let Ok(mut page) = on_click.try_borrow_mut() else {
                return;
            };
            if page.click(target).prevents_default() {
                event.prevent_default();
            }
        },
    )
    .forget();

    let on_key = Rc::clone(page);
    EventListener::new(document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if let Ok(mut page) = on_key.try_borrow_mut() {
            page.key_down(&event.key());
        }
    })
    .forget();

    if document.ready_state() == "complete" {
        page.borrow_mut().loaded();
    } else {
        let on_load = Rc::clone(page);
        EventListener::once(window, "load", move |_| {
            if let Ok(mut page) = on_load.try_borrow_mut() {
                page.loaded();
            }
        })
        .forget();
    }
}

fn install_scroll_listeners(page: &SharedPage, window: &Window) {
    for event_type in ["scroll", "resize"] {
        let page = Rc::clone(page);
        EventListener::new(window, event_type, move |_| {
            if let Ok(page) = page.try_borrow() {
                page.scrolled();
            }
        })
        .forget();
    }
}

fn observe_reveals(page: &SharedPage, targets: &[Element], options: ObserverOptions) -> Result<()> {
    let page = Rc::clone(page);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let Ok(mut page) = page.try_borrow_mut() else {
                return;
            };
            for entry in entries.iter() {
                let Some(entry) = entry.dyn_ref::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                if page.visible(&target, entry.is_intersecting()) {
                    observer.unobserve(&target);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(options.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).map_err(js_error)?;
    for target in targets {
        observer.observe(target);
    }
    callback.forget();
    tracing::debug!(count = targets.len(), "reveal observer started");
    Ok(())
}
