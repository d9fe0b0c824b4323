//! Progressive UI enhancements for a static marketing page.
//!
//! This crate is compiled to WebAssembly and runs in the browser after the
//! page's markup has been parsed. It layers a handful of independent behaviors
//! on top of server-rendered HTML: scroll-triggered reveals, active navigation
//! links, accessible modal overlays, a scroll-progress bar, and a contact
//! widget prefilled from the `service` query parameter. Every feature is
//! best-effort: missing markup turns the feature into a no-op instead of an
//! error visible to the page.
//!
//! All controllers are written against the [`dom::Dom`] trait so they can be
//! exercised natively against `memory::MemoryDom`. The browser binding in
//! `web` implements the same trait over `web-sys` and wires DOM events to a
//! [`page::Page`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | Composes the controllers and runs the startup sequence |
//! | [`reveal`] | One-shot reveal-on-scroll tagging and activation |
//! | [`modal`] | Overlay stack, focus memory, and dismissal rules |
//! | [`scroll`] | Scroll-progress computation and bar rendering |
//! | [`nav`] | Active navigation link marker |
//! | [`contact`] | Localized contact-widget prefill |
//! | [`config`] | Per-page configuration parsed from JSON |
//! | [`dom`] | Document abstraction shared by the controllers |
//! | `memory` | In-memory document used off the browser (native targets) |
//! | [`error`] | Crate error type |
//! | [`consts`] | Markup contract names and observer tuning |

pub mod config;
pub mod consts;
pub mod contact;
pub mod dom;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod memory;
pub mod modal;
pub mod nav;
pub mod page;
pub mod reveal;
pub mod scroll;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ContactConfig, PageConfig};
pub use error::{EnhanceError, Result};
pub use page::Page;
