use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_reveal_selectors_cover_page_sections() {
    let cfg = PageConfig::default();
    assert_eq!(cfg.reveal_selectors.len(), 6);
    assert_eq!(cfg.reveal_selectors[0], ".hero .container");
    assert_eq!(cfg.reveal_selectors[5], ".footer .container");
}

#[test]
fn default_feature_flags() {
    let cfg = PageConfig::default();
    assert!(!cfg.enable_hash_sync);
    assert!(cfg.enable_scroll_bar);
    assert!(cfg.enable_contact_prefill);
    assert_eq!(cfg.scroll_bar_id, "scrollbar");
    assert_eq!(cfg.nav_link_selector, ".nav a");
}

#[test]
fn default_contact_targets() {
    let contact = ContactConfig::default();
    assert_eq!(contact.whatsapp_number, "258857577744");
    assert_eq!(contact.email, "skylayer.tech@outlook.com");
    assert_eq!(contact.brand, "SkyLayer");
    assert_eq!(contact.whatsapp_button_id, "contact-wa");
    assert_eq!(contact.email_button_id, "contact-email");
    assert_eq!(contact.note_id, "contact-service-note");
}

// =============================================================
// from_json
// =============================================================

#[test]
fn empty_object_yields_defaults() {
    assert_eq!(PageConfig::from_json("{}").unwrap(), PageConfig::default());
}

#[test]
fn camel_case_overrides_are_applied() {
    let cfg = PageConfig::from_json(
        r#"{
            "revealSelectors": [".card"],
            "enableHashSync": true,
            "enableScrollBar": false,
            "enableContactPrefill": false,
            "logLevel": "debug",
            "contact": { "brand": "Acme" }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.reveal_selectors, vec![".card".to_string()]);
    assert!(cfg.enable_hash_sync);
    assert!(!cfg.enable_scroll_bar);
    assert!(!cfg.enable_contact_prefill);
    assert_eq!(cfg.log_filter(), LevelFilter::DEBUG);
    assert_eq!(cfg.contact.brand, "Acme");
    assert_eq!(cfg.contact.email, DEFAULT_CONTACT_EMAIL);
}

#[test]
fn malformed_json_errors() {
    let err = PageConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, EnhanceError::ConfigParse(_)));
}

#[test]
fn unknown_log_level_errors() {
    let err = PageConfig::from_json(r#"{"logLevel": "loud"}"#).unwrap_err().to_string();
    assert!(err.contains("unknown log level"));
}

#[test]
fn blank_selector_errors() {
    let err = PageConfig::from_json(r#"{"revealSelectors": [".card", "  "]}"#).unwrap_err();
    assert!(matches!(err, EnhanceError::ConfigParse(_)));
}

#[test]
fn log_filter_falls_back_to_info() {
    let cfg = PageConfig { log_level: "loud".into(), ..PageConfig::default() };
    assert_eq!(cfg.log_filter(), LevelFilter::INFO);
}

#[test]
fn log_level_is_case_insensitive() {
    let cfg = PageConfig::from_json(r#"{"logLevel": "WARN"}"#).unwrap();
    assert_eq!(cfg.log_filter(), LevelFilter::WARN);
}
