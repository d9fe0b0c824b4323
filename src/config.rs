//! Per-page configuration.
//!
//! One configurable controller set replaces per-page copies of the script.
//! Pages pick their options with a JSON object (camelCase keys); anything left
//! out falls back to the defaults below.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{EnhanceError, Result};

pub const DEFAULT_REVEAL_SELECTORS: &[&str] = &[
    ".hero .container",
    ".section .container",
    ".card",
    ".note-box",
    ".steps li",
    ".footer .container",
];
pub const DEFAULT_NAV_LINK_SELECTOR: &str = ".nav a";
pub const DEFAULT_SCROLL_BAR_ID: &str = "scrollbar";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_WHATSAPP_NUMBER: &str = "258857577744";
pub const DEFAULT_CONTACT_EMAIL: &str = "skylayer.tech@outlook.com";
pub const DEFAULT_BRAND: &str = "SkyLayer";
pub const DEFAULT_WHATSAPP_BUTTON_ID: &str = "contact-wa";
pub const DEFAULT_EMAIL_BUTTON_ID: &str = "contact-email";
pub const DEFAULT_NOTE_ID: &str = "contact-service-note";

/// Which enhancements a page enables and the markup they bind to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    /// Selectors whose matches are tagged for reveal-on-scroll.
    pub reveal_selectors: Vec<String>,
    /// Mirror the open overlay in the URL fragment.
    pub enable_hash_sync: bool,
    pub enable_scroll_bar: bool,
    pub enable_contact_prefill: bool,
    pub nav_link_selector: String,
    pub scroll_bar_id: String,
    /// `tracing` level filter: `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
    pub contact: ContactConfig,
}

/// Contact targets and the ids of the widgets that link to them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactConfig {
    /// International number without `+`, as `wa.me` expects.
    pub whatsapp_number: String,
    pub email: String,
    /// Brand name prefixed to the email subject.
    pub brand: String,
    pub whatsapp_button_id: String,
    pub email_button_id: String,
    pub note_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            reveal_selectors: DEFAULT_REVEAL_SELECTORS.iter().map(ToString::to_string).collect(),
            enable_hash_sync: false,
            enable_scroll_bar: true,
            enable_contact_prefill: true,
            nav_link_selector: DEFAULT_NAV_LINK_SELECTOR.to_string(),
            scroll_bar_id: DEFAULT_SCROLL_BAR_ID.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            contact: ContactConfig::default(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
            brand: DEFAULT_BRAND.to_string(),
            whatsapp_button_id: DEFAULT_WHATSAPP_BUTTON_ID.to_string(),
            email_button_id: DEFAULT_EMAIL_BUTTON_ID.to_string(),
            note_id: DEFAULT_NOTE_ID.to_string(),
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON page configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::ConfigParse`] for malformed JSON, an unknown
    /// log level, or a blank reveal/nav selector.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw).map_err(|e| EnhanceError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// See [`PageConfig::from_json`].
    pub fn validate(&self) -> Result<()> {
        parse_log_level(&self.log_level)?;
        for selector in self.reveal_selectors.iter().chain(std::iter::once(&self.nav_link_selector)) {
            if selector.trim().is_empty() {
                return Err(EnhanceError::ConfigParse("selectors must not be blank".into()));
            }
        }
        Ok(())
    }

    /// The configured level filter, or `INFO` if it does not parse.
    #[must_use]
    pub fn log_filter(&self) -> LevelFilter {
        parse_log_level(&self.log_level).unwrap_or(LevelFilter::INFO)
    }
}

fn parse_log_level(raw: &str) -> Result<LevelFilter> {
    raw.trim()
        .parse::<LevelFilter>()
        .map_err(|_| EnhanceError::ConfigParse(format!("unknown log level: {raw}")))
}
