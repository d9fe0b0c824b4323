//! Crate error type.
//!
//! Errors never reach the page: [`crate::page::Page`] logs them and carries
//! on, so a broken enhancement degrades to a missing one.

/// Errors produced while enhancing the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnhanceError {
    /// A platform DOM call was rejected.
    #[error("DOM operation failed: {0}")]
    Dom(String),

    /// A selector could not be parsed.
    #[error("invalid selector: {0}")]
    Selector(String),

    /// Page configuration could not be parsed or failed validation.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The browser globals (`window`, `document`) are not available.
    #[error("browser environment unavailable: {0}")]
    Environment(&'static str),
}

/// Result alias used across the crate.
pub type Result<T, E = EnhanceError> = std::result::Result<T, E>;
