//! Contact prefill.
//!
//! Service pages link to the contact page with `?service=<key>`. The contact
//! page turns that key into a human label in the page language, shows it in
//! a note, and points the WhatsApp and email buttons at prefilled messages.
//!
//! The text builders are plain functions; [`ContactPrefill`] only wires them
//! to the document.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::ContactConfig;
use crate::consts::SERVICE_PARAM;
use crate::dom::Dom;
use crate::error::Result;

/// Characters `encodeURIComponent` leaves alone besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const PT_SERVICES: &[(&str, &str)] = &[
    ("criacao-site", "Criação de site"),
    ("dominios", "Domínios"),
    ("hospedagem", "Hospedagem"),
    ("manutencao", "Manutenção e suporte"),
    ("migracao", "Migração"),
    ("seo", "SEO"),
];

const EN_SERVICES: &[(&str, &str)] = &[
    ("website-build", "Website build"),
    ("domains", "Domains"),
    ("hosting", "Hosting"),
    ("maintenance", "Maintenance & support"),
    ("migration", "Migration"),
    ("seo", "SEO"),
];

const PT_DETAILS: &[&str] = &["Detalhes:", "- Nome/Empresa:", "- Domínio (se existir):", "- Prazo:", "- Observações:"];
const EN_DETAILS: &[&str] = &["Details:", "- Name/Company:", "- Domain (if any):", "- Timeline:", "- Notes:"];

/// Language the prefilled texts are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Portuguese,
    English,
}

impl Locale {
    /// Pick the locale from the document's `lang` attribute.
    ///
    /// Any tag starting with `pt` is Portuguese; everything else, including a
    /// missing attribute, is English.
    #[must_use]
    pub fn from_lang(lang: Option<&str>) -> Self {
        let lang = lang.unwrap_or("en").to_lowercase();
        if lang.starts_with("pt") { Self::Portuguese } else { Self::English }
    }

    fn services(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Portuguese => PT_SERVICES,
            Self::English => EN_SERVICES,
        }
    }
}

/// The `service` value from a query string, with or without its leading `?`.
///
/// Uses form-urlencoded decoding, so `+` is a space. An empty value counts as
/// absent.
#[must_use]
pub fn service_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == SERVICE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Display label for a service key; unknown keys become the key with dashes
/// turned into spaces.
#[must_use]
pub fn service_label(locale: Locale, key: &str) -> String {
    locale
        .services()
        .iter()
        .find(|(known, _)| *known == key)
        .map_or_else(|| key.replace('-', " "), |(_, label)| (*label).to_string())
}

/// Text shown in the selected-service note.
#[must_use]
pub fn note_text(locale: Locale, label: &str) -> String {
    match locale {
        Locale::Portuguese => format!("Serviço selecionado: {label}"),
        Locale::English => format!("Selected service: {label}"),
    }
}

/// Prefilled message body.
#[must_use]
pub fn message(locale: Locale, label: &str) -> String {
    let (intro, details) = match locale {
        Locale::Portuguese => (format!("Olá, quero contratar o serviço: {label}."), PT_DETAILS),
        Locale::English => (format!("Hello, I would like to hire: {label}."), EN_DETAILS),
    };
    format!("{intro}\n\n{}", details.join("\n"))
}

/// Email subject line.
#[must_use]
pub fn subject(locale: Locale, brand: &str, label: &str) -> String {
    match locale {
        Locale::Portuguese => format!("{brand} — Pedido: {label}"),
        Locale::English => format!("{brand} — Request: {label}"),
    }
}

/// Percent-encode like `encodeURIComponent`.
#[must_use]
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

#[must_use]
pub fn whatsapp_url(number: &str, message: &str) -> String {
    format!("https://wa.me/{number}?text={}", encode_uri_component(message))
}

#[must_use]
pub fn mailto_url(email: &str, subject: &str, message: &str) -> String {
    format!(
        "mailto:{email}?subject={}&body={}",
        encode_uri_component(subject),
        encode_uri_component(message)
    )
}

/// What a prefill pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefillReport {
    /// Resolved label, when a service was requested and a widget exists.
    pub label: Option<String>,
    pub note: bool,
    pub whatsapp: bool,
    pub email: bool,
}

/// Fills the contact widgets from the `service` query parameter.
#[derive(Debug, Clone)]
pub struct ContactPrefill {
    config: ContactConfig,
}

impl ContactPrefill {
    #[must_use]
    pub fn new(config: ContactConfig) -> Self {
        Self { config }
    }

    /// Populate whichever contact widgets exist.
    ///
    /// A failure on one widget is logged and does not stop the others.
    ///
    /// # Errors
    ///
    /// Returns an error only when the query string cannot be read.
    pub fn apply<D: Dom>(&self, dom: &D) -> Result<PrefillReport> {
        let Some(key) = service_from_query(&dom.location_search()?) else {
            return Ok(PrefillReport::default());
        };

        let note = dom.element_by_id(&self.config.note_id);
        let whatsapp = dom.element_by_id(&self.config.whatsapp_button_id);
        let email = dom.element_by_id(&self.config.email_button_id);
        if note.is_none() && whatsapp.is_none() && email.is_none() {
            tracing::debug!(service = %key, "contact prefill skipped: no widgets on page");
            return Ok(PrefillReport::default());
        }

        let lang = dom.document_element().and_then(|root| dom.attribute(&root, "lang"));
        let locale = Locale::from_lang(lang.as_deref());
        let label = service_label(locale, &key);
        let body = message(locale, &label);
        let mut report = PrefillReport { label: Some(label.clone()), ..PrefillReport::default() };

        if let Some(node) = &note {
            dom.set_text(node, &note_text(locale, &label));
            report.note = true;
        }
        if let Some(node) = &whatsapp {
            let href = whatsapp_url(&self.config.whatsapp_number, &body);
            match dom.set_attribute(node, "href", &href) {
                Ok(()) => report.whatsapp = true,
                Err(e) => tracing::warn!(error = %e, "whatsapp link prefill failed"),
            }
        }
        if let Some(node) = &email {
            let href = mailto_url(&self.config.email, &subject(locale, &self.config.brand, &label), &body);
            match dom.set_attribute(node, "href", &href) {
                Ok(()) => report.email = true,
                Err(e) => tracing::warn!(error = %e, "email link prefill failed"),
            }
        }
        tracing::debug!(service = %key, ?locale, "contact prefill applied");
        Ok(report)
    }
}
