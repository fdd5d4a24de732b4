//! Light/dark theme preference and toggle.
//!
//! The preference is stored under a single key as `"dark-mode"` or
//! `"light-mode"`, which doubles as the class applied to `<body>`. The
//! toggle's `<i>` child carries the matching Font Awesome glyph.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort. If storage cannot be read the controller uses
//! the default theme and stops writing; if a write fails it logs once and
//! stops writing. The visible theme always follows the toggle.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;

use crate::config::Settings;
use crate::consts::{DARK_MODE_CLASS, LIGHT_MODE_CLASS, MOON_ICON_CLASS, SUN_ICON_CLASS, THEME_ICON_SELECTOR, THEME_TOGGLE_ID};
use crate::error::{HostError, SetupError};
use crate::host::{DefaultAction, EventKind, Host, Target};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    #[serde(alias = "dark-mode")]
    Dark,
    #[serde(alias = "light-mode")]
    Light,
}

impl Theme {
    /// Parse a stored preference value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            DARK_MODE_CLASS => Some(Self::Dark),
            LIGHT_MODE_CLASS => Some(Self::Light),
            _ => None,
        }
    }

    /// Stored value and body class.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => DARK_MODE_CLASS,
            Self::Light => LIGHT_MODE_CLASS,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Icon class shown on the toggle while this theme is active.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => MOON_ICON_CLASS,
            Self::Light => SUN_ICON_CLASS,
        }
    }
}

/// Owns the current theme and where it is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeController {
    theme: Theme,
    storage_key: String,
    persist: bool,
}

impl ThemeController {
    /// Read the stored preference, falling back to `settings.default_theme`.
    pub fn load<H: Host>(host: &H, settings: &Settings) -> Self {
        let (theme, persist) = match host.read_preference(&settings.storage_key) {
            Ok(Some(raw)) => match Theme::parse(&raw) {
                Some(theme) => (theme, true),
                None => {
                    log::debug!("unknown stored theme {raw:?}, using default");
                    (settings.default_theme, true)
                }
            },
            Ok(None) => (settings.default_theme, true),
            Err(e) => {
                log::warn!("theme preference unavailable, not persisting: {e}");
                (settings.default_theme, false)
            }
        };
        Self { theme, storage_key: settings.storage_key.clone(), persist }
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether toggles are still written to storage.
    #[cfg(test)]
    #[must_use]
    pub fn persists(&self) -> bool {
        self.persist
    }

    /// Reflect the current theme on `body` and, when present, the toggle icon.
    pub fn apply<H: Host>(&self, host: &H, body: &H::Element, icon: Option<&H::Element>) {
        host.remove_class(body, self.theme.toggled().as_str());
        host.add_class(body, self.theme.as_str());
        if let Some(icon) = icon {
            host.remove_class(icon, self.theme.toggled().icon());
            host.add_class(icon, self.theme.icon());
        }
    }

    /// Flip the theme, apply it, and persist it when storage is usable.
    pub fn toggle<H: Host>(&mut self, host: &H, body: &H::Element, icon: Option<&H::Element>) -> Theme {
        self.theme = self.theme.toggled();
        self.apply(host, body, icon);
        if self.persist {
            if let Err(e) = host.write_preference(&self.storage_key, self.theme.as_str()) {
                log::warn!("theme preference not saved, disabling persistence: {e}");
                self.persist = false;
            }
        }
        self.theme
    }
}

/// Apply the stored theme and wire the toggle button.
///
/// The theme is applied even when the toggle is missing from the markup;
/// only the click wiring is skipped in that case.
pub fn install<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Result<(), SetupError> {
    let body = host.body().ok_or(HostError::Missing("body"))?;
    let toggle = host.element_by_id(THEME_TOGGLE_ID);
    let icon = toggle
        .as_ref()
        .and_then(|t| host.query_within(t, THEME_ICON_SELECTOR));

    let controller = ThemeController::load(host.as_ref(), settings);
    controller.apply(host.as_ref(), &body, icon.as_ref());

    let toggle = toggle.ok_or_else(|| SetupError::missing(&format!("#{THEME_TOGGLE_ID}")))?;
    let controller = Rc::new(RefCell::new(controller));
    let host_cb = Rc::clone(host);
    host.on_event(
        Target::Element(&toggle),
        EventKind::Click,
        DefaultAction::Allow,
        Box::new(move || {
            let theme = controller
                .borrow_mut()
                .toggle(host_cb.as_ref(), &body, icon.as_ref());
            log::debug!("theme switched to {}", theme.as_str());
        }),
    )?;
    Ok(())
}
