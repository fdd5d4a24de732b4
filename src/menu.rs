//! Mobile navigation menu toggle.
//!
//! The trigger shows or hides `.nav-links` based on its computed `display`.
//! Showing it layers overlay styles on top of the stylesheet so the menu
//! drops down below the bar. Hiding clears every inline override, `display`
//! included, so the stylesheet decides again: hidden on mobile, and the
//! regular row of links once the viewport widens to desktop.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use std::rc::Rc;

use crate::consts::{MOBILE_MENU_ID, NAV_LINKS_SELECTOR};
use crate::error::SetupError;
use crate::host::{DefaultAction, EventKind, Host, Target};

/// Inline overrides applied when the menu opens.
pub const OVERLAY_STYLES: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "100%"),
    ("left", "0"),
    ("right", "0"),
    ("background", "var(--bg-card)"),
    ("backdrop-filter", "blur(10px)"),
    ("flex-direction", "column"),
    ("padding", "2rem"),
    ("gap", "1.5rem"),
    ("box-shadow", "var(--shadow)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Show,
    Hide,
}

impl MenuAction {
    /// What a click should do given the menu's current `display` value.
    #[must_use]
    pub fn from_display(display: &str) -> Self {
        if display.trim() == "flex" { Self::Hide } else { Self::Show }
    }
}

/// Flip the menu and return what was done.
pub fn toggle<H: Host>(host: &H, menu: &H::Element) -> MenuAction {
    let action = MenuAction::from_display(&host.computed_style(menu, "display"));
    match action {
        MenuAction::Show => {
            host.set_style(menu, "display", "flex");
            for (property, value) in OVERLAY_STYLES {
                host.set_style(menu, property, value);
            }
        }
        MenuAction::Hide => {
            host.remove_style(menu, "display");
            for (property, _) in OVERLAY_STYLES {
                host.remove_style(menu, property);
            }
        }
    }
    action
}

pub fn install<H: Host + 'static>(host: &Rc<H>) -> Result<(), SetupError> {
    let trigger = host
        .element_by_id(MOBILE_MENU_ID)
        .ok_or_else(|| SetupError::missing(&format!("#{MOBILE_MENU_ID}")))?;
    let menu = host
        .query(NAV_LINKS_SELECTOR)
        .ok_or_else(|| SetupError::missing(NAV_LINKS_SELECTOR))?;

    let host_cb = Rc::clone(host);
    host.on_event(
        Target::Element(&trigger),
        EventKind::Click,
        DefaultAction::Allow,
        Box::new(move || {
            let action = toggle(host_cb.as_ref(), &menu);
            log::debug!("mobile menu {action:?}");
        }),
    )?;
    Ok(())
}
