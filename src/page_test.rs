use super::*;
use crate::dom::ScrollMetrics;
use crate::memory::{MemoryDom, NodeId};

// =============================================================
// Helpers
// =============================================================

struct Ids {
    card: NodeId,
    nav_home: NodeId,
    trigger: NodeId,
    overlay: NodeId,
    overlay_input: NodeId,
    bar: NodeId,
    note: NodeId,
}

/// A contact page with one card, a nav, a modal, a progress bar and the
/// contact widgets.
fn site() -> (MemoryDom, Ids) {
    let dom = MemoryDom::new();
    dom.put_attribute(dom.root(), "lang", "pt");
    let body = dom.body_id();
    dom.put_attribute(body, "data-page", "home");

    let bar = dom.append(body, "div", &[("id", "scrollbar")]);
    let nav = dom.append(body, "nav", &[("class", "nav")]);
    let nav_home = dom.append(nav, "a", &[("data-nav", "home")]);
    dom.append(nav, "a", &[("data-nav", "contact")]);
    let card = dom.append(body, "div", &[("class", "card")]);
    let trigger = dom.append(card, "button", &[("data-modal-open", "contact")]);
    let overlay = dom.append(body, "div", &[("id", "contact"), ("class", "modal-overlay"), ("aria-hidden", "true")]);
    let panel = dom.append(overlay, "div", &[("class", "modal-panel")]);
    let overlay_input = dom.append(panel, "input", &[]);
    dom.append(panel, "button", &[("data-modal-close", "")]);
    let note = dom.append(body, "p", &[("id", "contact-service-note")]);
    dom.append(body, "a", &[("id", "contact-wa")]);

    dom.set_scroll_metrics(ScrollMetrics { scroll_top: 600.0, scroll_height: 2000.0, client_height: 800.0 });
    (dom, Ids { card, nav_home, trigger, overlay, overlay_input, bar, note })
}

// =============================================================
// init
// =============================================================

#[test]
fn init_runs_every_enhancement() {
    let (dom, ids) = site();
    dom.set_search("?service=seo");
    let mut page = Page::new(dom, PageConfig::default());
    let startup = page.init();

    assert_eq!(startup.tagged, 1);
    assert_eq!(startup.reveal, Activation::Observe {
        targets: vec![ids.card],
        options: crate::reveal::ObserverOptions::REVEAL,
    });
    assert_eq!(startup.nav_marked, 1);
    assert!(startup.scroll_bar);
    assert_eq!(startup.prefill.label.as_deref(), Some("SEO"));

    let dom = page.dom();
    assert!(dom.has_class(&ids.card, "reveal"));
    assert!(dom.has_class(&ids.nav_home, "active"));
    assert_eq!(dom.style(ids.bar, "width").as_deref(), Some("50.00%"));
    assert_eq!(dom.text(ids.note), "Serviço selecionado: SEO");
}

#[test]
fn reduced_motion_skips_observer_and_bar() {
    let (dom, ids) = site();
    dom.set_reduced_motion(true);
    let mut page = Page::new(dom, PageConfig::default());
    let startup = page.init();

    assert!(page.reduced_motion());
    assert_eq!(startup.reveal, Activation::Immediate(1));
    assert!(!startup.scroll_bar);
    assert!(page.dom().has_class(&ids.card, "active"));
    assert_eq!(page.dom().style(ids.bar, "width"), None);
    assert_eq!(page.scrolled(), None);
}

#[test]
fn reduced_motion_is_read_once() {
    let (dom, ids) = site();
    let mut page = Page::new(dom, PageConfig::default());
    page.dom().set_reduced_motion(true);
    let startup = page.init();
    assert!(!page.reduced_motion());
    assert!(matches!(startup.reveal, Activation::Observe { .. }));
    assert!(!page.dom().has_class(&ids.card, "active"));
}

#[test]
fn disabled_features_stay_off() {
    let (dom, ids) = site();
    dom.set_search("?service=seo");
    let config = PageConfig { enable_scroll_bar: false, enable_contact_prefill: false, ..PageConfig::default() };
    let mut page = Page::new(dom, config);
    let startup = page.init();

    assert!(!startup.scroll_bar);
    assert_eq!(startup.prefill, PrefillReport::default());
    assert_eq!(page.dom().text(ids.note), "");
    assert_eq!(page.dom().style(ids.bar, "width"), None);
}

#[test]
fn failing_step_does_not_stop_the_rest() {
    let (dom, ids) = site();
    let config = PageConfig { reveal_selectors: vec!["[unclosed".into()], ..PageConfig::default() };
    let mut page = Page::new(dom, config);
    let startup = page.init();

    assert_eq!(startup.tagged, 0);
    assert_eq!(startup.reveal, Activation::Idle);
    assert_eq!(startup.nav_marked, 1);
    assert!(startup.scroll_bar);
    assert!(page.dom().has_class(&ids.nav_home, "active"));
}

#[test]
fn init_twice_does_not_retag() {
    let (dom, _) = site();
    let mut page = Page::new(dom, PageConfig::default());
    page.init();
    assert_eq!(page.init().tagged, 0);
}

// =============================================================
// Events
// =============================================================

#[test]
fn click_and_escape_round_trip() {
    let (dom, ids) = site();
    dom.set_focus(Some(ids.trigger));
    let mut page = Page::new(dom, PageConfig::default());
    page.init();

    let outcome = page.click(&ids.trigger);
    assert!(outcome.prevents_default());
    assert!(page.modals().is_open("contact"));
    assert_eq!(page.dom().active_element(), Some(ids.overlay_input));

    assert!(page.key_down("Escape"));
    assert!(!page.dom().has_class(&ids.overlay, "open"));
    assert_eq!(page.dom().active_element(), Some(ids.trigger));
    assert!(!page.key_down("Escape"));
}

#[test]
fn backdrop_click_closes() {
    let (dom, ids) = site();
    let mut page = Page::new(dom, PageConfig::default());
    page.init();
    page.click(&ids.trigger);
    assert_eq!(page.click(&ids.overlay), ClickOutcome::Backdrop);
    assert!(page.modals().open_overlays().is_empty());
}

#[test]
fn loaded_opens_deep_link() {
    let (dom, ids) = site();
    dom.set_hash("#contact");
    let mut page = Page::new(dom, PageConfig::default());
    page.init();
    assert!(page.loaded());
    assert!(page.dom().has_class(&ids.overlay, "open"));
}

#[test]
fn hash_sync_follows_config() {
    let (dom, ids) = site();
    let config = PageConfig { enable_hash_sync: true, ..PageConfig::default() };
    let mut page = Page::new(dom, config);
    page.init();
    page.click(&ids.trigger);
    assert_eq!(page.dom().hash(), "#contact");
    page.key_down("Escape");
    assert_eq!(page.dom().hash(), "");
}

#[test]
fn scroll_and_resize_update_bar() {
    let (dom, ids) = site();
    let mut page = Page::new(dom, PageConfig::default());
    page.init();

    page.dom().set_scroll_metrics(ScrollMetrics { scroll_top: 1200.0, scroll_height: 2000.0, client_height: 800.0 });
    assert_eq!(page.scrolled(), Some(100.0));
    assert_eq!(page.dom().style(ids.bar, "width").as_deref(), Some("100.00%"));

    page.dom().set_scroll_metrics(ScrollMetrics { scroll_top: 1200.0, scroll_height: 2000.0, client_height: 2000.0 });
    assert_eq!(page.resized(), Some(0.0));
    assert_eq!(page.dom().style(ids.bar, "width").as_deref(), Some("0.00%"));
}

#[test]
fn visible_reports_activate_once() {
    let (dom, ids) = site();
    let mut page = Page::new(dom, PageConfig::default());
    page.init();
    assert!(!page.visible(&ids.card, false));
    assert!(page.visible(&ids.card, true));
    assert!(!page.visible(&ids.card, true));
    assert!(page.dom().has_class(&ids.card, "active"));
}
