//! Page behaviour settings.
//!
//! Every field has a default, so a page without a config block (or with a
//! partial one) behaves the same as the stock portfolio. Overrides come from
//! the JSON body of `<script type="application/json" id="portfolio-config">`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::host::{Host, VisibilityOptions};
use crate::theme::Theme;

pub const DEFAULT_STORAGE_KEY: &str = "theme";
pub const DEFAULT_NAVBAR_SCROLL_THRESHOLD: f64 = 50.0;
pub const DEFAULT_HEADER_OFFSET: f64 = 80.0;
pub const DEFAULT_ACTIVE_LINK_LOOKAHEAD: f64 = 200.0;
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
pub const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const DEFAULT_SKILL_FILL_DELAY_MS: u32 = 300;
pub const DEFAULT_PAGE_FADE_DELAY_MS: u32 = 100;
pub const DEFAULT_CONTACT_SUCCESS_MESSAGE: &str = "Thank you for your message! I will get back to you soon.";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid settings json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Notification lifecycle timings, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotificationTimings {
    /// Delay between insertion and the slide-in.
    pub enter_delay_ms: u32,
    /// Time from insertion until the slide-out starts.
    pub display_ms: u32,
    /// Slide-out duration before the element is removed.
    pub exit_ms: u32,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self { enter_delay_ms: 100, display_ms: 3000, exit_ms: 300 }
    }
}

impl NotificationTimings {
    /// Total time a notification stays in the document.
    #[must_use]
    pub fn lifetime_ms(&self) -> u32 {
        self.display_ms.max(self.enter_delay_ms) + self.exit_ms
    }
}

/// A console line and the CSS it is rendered with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GreetingLine {
    pub text: String,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage key holding the theme preference.
    pub storage_key: String,
    pub default_theme: Theme,
    /// Scroll offset past which the navbar gets its `scrolled` class.
    pub navbar_scroll_threshold: f64,
    /// Fixed header height subtracted from anchor scroll targets.
    pub header_offset: f64,
    /// How far below the scroll offset a section top may sit and still count as current.
    pub active_link_lookahead: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    /// Class added to a section the first time it becomes visible.
    pub reveal_class: String,
    /// Section id whose first reveal fills the skill bars.
    pub skills_section_id: String,
    pub skill_fill_delay_ms: u32,
    pub page_fade_delay_ms: u32,
    pub notifications: NotificationTimings,
    pub contact_success_message: String,
    pub greeting: Vec<GreetingLine>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            default_theme: Theme::Dark,
            navbar_scroll_threshold: DEFAULT_NAVBAR_SCROLL_THRESHOLD,
            header_offset: DEFAULT_HEADER_OFFSET,
            active_link_lookahead: DEFAULT_ACTIVE_LINK_LOOKAHEAD,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_owned(),
            reveal_class: "fade-in".to_owned(),
            skills_section_id: "skills".to_owned(),
            skill_fill_delay_ms: DEFAULT_SKILL_FILL_DELAY_MS,
            page_fade_delay_ms: DEFAULT_PAGE_FADE_DELAY_MS,
            notifications: NotificationTimings::default(),
            contact_success_message: DEFAULT_CONTACT_SUCCESS_MESSAGE.to_owned(),
            greeting: default_greeting(),
        }
    }
}

fn default_greeting() -> Vec<GreetingLine> {
    vec![
        GreetingLine {
            text: "👋 Welcome to my Portfolio!".to_owned(),
            css: "font-size: 18px; color: #6366f1; font-weight: bold;".to_owned(),
        },
        GreetingLine {
            text: "Built with passion using HTML, CSS, and Rust".to_owned(),
            css: "font-size: 14px; color: #10b981;".to_owned(),
        },
    ]
}

impl Settings {
    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Read settings from the page's config block, falling back to defaults.
    pub fn from_page<H: Host>(host: &H) -> Self {
        let Some(el) = host.element_by_id(crate::consts::CONFIG_ELEMENT_ID) else {
            return Self::default();
        };
        match Self::from_json(&host.text_content(&el)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring page settings: {e}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn visibility_options(&self) -> VisibilityOptions {
        VisibilityOptions {
            threshold: self.reveal_threshold.clamp(0.0, 1.0),
            root_margin: self.reveal_root_margin.clone(),
        }
    }
}
