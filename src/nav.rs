//! Active navigation link highlighting.
//!
//! "Current" is a scroll-offset rule, not true visibility: the last section
//! in document order whose top sits at or above `scroll + lookahead`. Later
//! sections win ties, so the furthest section already reached is current.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::rc::Rc;

use crate::config::Settings;
use crate::consts::{ACTIVE_LINK_CLASS, ACTIVE_LINK_CSS, NAV_LINK_SELECTOR, SECTION_WITH_ID_SELECTOR};
use crate::error::SetupError;
use crate::host::{DefaultAction, EventKind, Host, Target};

/// Pick the current section from `(id, top)` pairs in document order.
pub fn active_section<'a, I>(sections: I, scroll_offset: f64, lookahead: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let reach = scroll_offset + lookahead;
    sections
        .into_iter()
        .filter(|(_, top)| *top <= reach)
        .last()
        .map(|(id, _)| id)
}

/// Move the active marker to the link for the current section.
///
/// Returns the id that was highlighted. When no section qualifies, or no
/// link points at the current section, every link is left as it was.
pub fn highlight<H: Host>(host: &H, sections: &[H::Element], links: &[H::Element], lookahead: f64) -> Option<String> {
    let boxes: Vec<(String, f64)> = sections
        .iter()
        .filter_map(|s| {
            let id = host.attribute(s, "id").filter(|id| !id.is_empty())?;
            Some((id, host.offset_top(s)))
        })
        .collect();
    let offset = host.scroll_metrics().offset;
    let current = active_section(boxes.iter().map(|(id, top)| (id.as_str(), *top)), offset, lookahead)?;

    let href = format!("#{current}");
    let target = links
        .iter()
        .find(|link| host.attribute(link, "href").as_deref() == Some(href.as_str()))?;
    for link in links {
        if link != target {
            host.remove_class(link, ACTIVE_LINK_CLASS);
        }
    }
    host.add_class(target, ACTIVE_LINK_CLASS);
    Some(current.to_owned())
}

/// Inject the active-link stylesheet and re-highlight on every scroll.
pub fn install<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Result<(), SetupError> {
    let links = host.query_all(NAV_LINK_SELECTOR);
    if links.is_empty() {
        return Err(SetupError::missing(NAV_LINK_SELECTOR));
    }
    host.inject_stylesheet(ACTIVE_LINK_CSS)?;

    let sections = host.query_all(SECTION_WITH_ID_SELECTOR);
    let lookahead = settings.active_link_lookahead;
    let host_cb = Rc::clone(host);
    host.on_event(
        Target::Window,
        EventKind::Scroll,
        DefaultAction::Allow,
        Box::new(move || {
            highlight(host_cb.as_ref(), &sections, &links, lookahead);
        }),
    )?;
    Ok(())
}
