//! Scroll-driven chrome: navbar state, progress bar, smooth anchor links.
//!
//! The navbar and progress bar are re-derived from [`ScrollMetrics`] on every
//! window scroll event; nothing is cached between events except the lazily
//! created progress element itself.

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

use std::rc::Rc;

use crate::config::Settings;
use crate::consts::{ANCHOR_SELECTOR, NAVBAR_ID, NAVBAR_SCROLLED_CLASS, SCROLL_PROGRESS_ID};
use crate::error::{HostError, SetupError};
use crate::host::{DefaultAction, EventKind, Host, ScrollBehavior, ScrollMetrics, Target};

/// Fraction of the scrollable distance already scrolled, in `[0, 1]`.
///
/// A page that fits the viewport has nothing to scroll and reports `0`.
#[must_use]
pub fn scrolled_fraction(metrics: &ScrollMetrics) -> f64 {
    let scrollable = metrics.scrollable();
    if !scrollable.is_finite() || scrollable <= 0.0 || !metrics.offset.is_finite() {
        return 0.0;
    }
    (metrics.offset / scrollable).clamp(0.0, 1.0)
}

/// CSS width for the progress bar.
#[must_use]
pub fn progress_width(fraction: f64) -> String {
    format!("{}%", fraction * 100.0)
}

/// Whether the navbar should show its scrolled state.
#[must_use]
pub fn is_scrolled(offset: f64, threshold: f64) -> bool {
    offset > threshold
}

pub fn update_navbar<H: Host>(host: &H, navbar: &H::Element, threshold: f64) {
    if is_scrolled(host.scroll_metrics().offset, threshold) {
        host.add_class(navbar, NAVBAR_SCROLLED_CLASS);
    } else {
        host.remove_class(navbar, NAVBAR_SCROLLED_CLASS);
    }
}

/// Size the progress bar, creating it on first use.
pub fn update_progress<H: Host>(host: &H) -> Result<(), HostError> {
    let bar = match host.element_by_id(SCROLL_PROGRESS_ID) {
        Some(bar) => bar,
        None => {
            let bar = host.create_element("div")?;
            host.set_attribute(&bar, "id", SCROLL_PROGRESS_ID)?;
            host.append_to_body(&bar)?;
            bar
        }
    };
    let fraction = scrolled_fraction(&host.scroll_metrics());
    host.set_style(&bar, "width", &progress_width(fraction));
    Ok(())
}

/// Wire the navbar state and progress bar to window scroll.
///
/// The progress bar is sized once immediately. A page without `#navbar`
/// still gets the progress bar; the missing navbar is reported afterwards.
/// A progress bar that cannot be created or attached is given up on after
/// the first failure, so scrolling never piles up detached elements, and
/// the navbar keeps working regardless.
pub fn install<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Result<(), SetupError> {
    let mut progress_enabled = match update_progress(host.as_ref()) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("scroll progress bar disabled: {e}");
            false
        }
    };

    let navbar = host.element_by_id(NAVBAR_ID);
    let threshold = settings.navbar_scroll_threshold;
    let host_cb = Rc::clone(host);
    let navbar_cb = navbar.clone();
    host.on_event(
        Target::Window,
        EventKind::Scroll,
        DefaultAction::Allow,
        Box::new(move || {
            if let Some(navbar) = &navbar_cb {
                update_navbar(host_cb.as_ref(), navbar, threshold);
            }
            if progress_enabled {
                if let Err(e) = update_progress(host_cb.as_ref()) {
                    log::warn!("scroll progress bar disabled: {e}");
                    progress_enabled = false;
                }
            }
        }),
    )?;

    if navbar.is_none() {
        return Err(SetupError::missing(&format!("#{NAVBAR_ID}")));
    }
    Ok(())
}

// =============================================================
// Anchor links
// =============================================================

/// Element id an in-page `href` points at. `None` for a bare `#`.
#[must_use]
pub fn anchor_target_id(href: &str) -> Option<&str> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() { None } else { Some(id) }
}

/// Scroll position that puts a target just below the fixed header.
#[must_use]
pub fn anchor_scroll_top(target_top: f64, header_offset: f64) -> f64 {
    (target_top - header_offset).max(0.0)
}

/// Smooth-scroll to the element an in-page link names. Missing targets are ignored.
pub fn scroll_to_anchor<H: Host>(host: &H, href: &str, header_offset: f64) -> bool {
    let Some(target) = anchor_target_id(href).and_then(|id| host.element_by_id(id)) else {
        return false;
    };
    let top = anchor_scroll_top(host.offset_top(&target), header_offset);
    host.scroll_to(top, ScrollBehavior::Smooth);
    true
}

/// Intercept every `a[href^="#"]` and replace the jump with a smooth scroll.
pub fn install_anchors<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Result<(), SetupError> {
    let header_offset = settings.header_offset;
    for anchor in host.query_all(ANCHOR_SELECTOR) {
        let host_cb = Rc::clone(host);
        let anchor_cb = anchor.clone();
        host.on_event(
            Target::Element(&anchor),
            EventKind::Click,
            DefaultAction::Prevent,
            Box::new(move || {
                let href = host_cb.attribute(&anchor_cb, "href").unwrap_or_default();
                if !scroll_to_anchor(host_cb.as_ref(), &href, header_offset) {
                    log::debug!("anchor target {href:?} not found");
                }
            }),
        )?;
    }
    Ok(())
}
