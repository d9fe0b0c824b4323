//! Markup contract names and observer tuning shared across the crate.

// ── Reveal ──────────────────────────────────────────────────────

/// Class marking an element as reveal-eligible.
pub const REVEAL_CLASS: &str = "reveal";

/// Class applied once an element has been revealed (also used for nav links).
pub const ACTIVE_CLASS: &str = "active";

/// Fraction of the target that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.12;

/// Shrinks the bottom of the viewport so elements reveal slightly later.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -10% 0px";

// ── Modal ───────────────────────────────────────────────────────

/// Class identifying an overlay container.
pub const MODAL_OVERLAY_CLASS: &str = "modal-overlay";

/// Class applied to an open overlay.
pub const MODAL_OPEN_CLASS: &str = "open";

/// Attribute on controls that open the overlay named by its value.
pub const MODAL_OPEN_ATTR: &str = "data-modal-open";

/// Attribute on controls that close their enclosing overlay.
pub const MODAL_CLOSE_ATTR: &str = "data-modal-close";

/// Candidates for initial focus inside an overlay, in document order.
pub const FOCUSABLE_SELECTOR: &str =
    "button, a, input, textarea, select, [tabindex]:not([tabindex=\"-1\"])";

/// Key that dismisses the most recently opened overlay.
pub const ESCAPE_KEY: &str = "Escape";

// ── Navigation ──────────────────────────────────────────────────

/// Attribute on `<body>` naming the current page.
pub const PAGE_ATTR: &str = "data-page";

/// Attribute on nav links naming the page they point to.
pub const NAV_ATTR: &str = "data-nav";

// ── Platform ────────────────────────────────────────────────────

/// Media query for the reduced-motion accessibility preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Query parameter selecting the contact service.
pub const SERVICE_PARAM: &str = "service";

/// Id of the optional `<script type="application/json">` carrying page config.
pub const CONFIG_SCRIPT_ID: &str = "sitekit-config";
