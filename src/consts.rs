//! Markup contract and fixed class names shared across the behaviour modules.
//!
//! Tunable numbers (thresholds, delays) live in [`crate::config::Settings`];
//! the strings here name elements the page markup is expected to provide.

// ── Selectors ───────────────────────────────────────────────────

pub const NAVBAR_ID: &str = "navbar";
pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const THEME_ICON_SELECTOR: &str = "i";
pub const MOBILE_MENU_ID: &str = "mobileMenu";
pub const NAV_LINKS_SELECTOR: &str = ".nav-links";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const SECTION_SELECTOR: &str = "section";
pub const SECTION_WITH_ID_SELECTOR: &str = "section[id]";
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const CONTACT_FORM_ID: &str = "contactForm";
pub const SKILL_BAR_SELECTOR: &str = ".skill-progress";
pub const PROJECT_CARD_SELECTOR: &str = ".project-card";
pub const SCROLL_PROGRESS_ID: &str = "scroll-progress";
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";

// ── Classes ─────────────────────────────────────────────────────

pub const DARK_MODE_CLASS: &str = "dark-mode";
pub const LIGHT_MODE_CLASS: &str = "light-mode";
pub const MOON_ICON_CLASS: &str = "fa-moon";
pub const SUN_ICON_CLASS: &str = "fa-sun";
pub const NAVBAR_SCROLLED_CLASS: &str = "scrolled";
pub const ACTIVE_LINK_CLASS: &str = "active";
pub const NOTIFICATION_CLASS: &str = "notification";

/// Stylesheet injected at boot so the highlighted link is visible.
pub const ACTIVE_LINK_CSS: &str = "
    .nav-link.active {
        color: var(--primary) !important;
    }
    .nav-link.active::after {
        width: 100% !important;
    }
";

// ── Transforms ──────────────────────────────────────────────────

/// Notification parked off-screen to the right.
pub const OFFSCREEN_TRANSFORM: &str = "translateX(100%)";
pub const ONSCREEN_TRANSFORM: &str = "translateX(0)";
pub const CARD_LIFT_TRANSFORM: &str = "translateY(-10px)";
pub const CARD_REST_TRANSFORM: &str = "translateY(0)";
