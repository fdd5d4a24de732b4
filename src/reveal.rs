//! Entrance animations for page sections.
//!
//! Every `<section>` is watched for viewport intersection. The first time a
//! section becomes visible it receives the reveal class; when that section
//! is the skills section, the skill bars replay their fill animation.
//! Later intersections of an already revealed section are ignored.

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

use std::rc::Rc;

use crate::config::Settings;
use crate::consts::{SECTION_SELECTOR, SKILL_BAR_SELECTOR};
use crate::error::{HostError, SetupError};
use crate::host::Host;

/// Sections revealed so far.
#[derive(Debug, Clone)]
pub struct RevealState<E> {
    revealed: Vec<E>,
}

impl<E> Default for RevealState<E> {
    fn default() -> Self {
        Self { revealed: Vec::new() }
    }
}

impl<E: Clone + PartialEq> RevealState<E> {
    /// Record `section` as revealed. Returns `false` if it already was.
    pub fn mark(&mut self, section: &E) -> bool {
        if self.revealed.contains(section) {
            return false;
        }
        self.revealed.push(section.clone());
        true
    }

    #[cfg(test)]
    #[must_use]
    pub fn count(&self) -> usize {
        self.revealed.len()
    }
}

/// Collapse every skill bar to zero and restore its width after `delay_ms`.
///
/// Returns how many bars were animated.
pub fn animate_skill_bars<H: Host + 'static>(host: &Rc<H>, delay_ms: u32) -> Result<usize, HostError> {
    let bars = host.query_all(SKILL_BAR_SELECTOR);
    for bar in &bars {
        let width = host.inline_style(bar, "width");
        host.set_style(bar, "width", "0");
        let host_cb = Rc::clone(host);
        let bar_cb = bar.clone();
        host.schedule(delay_ms, Box::new(move || host_cb.set_style(&bar_cb, "width", &width)))?;
    }
    Ok(bars.len())
}

pub fn install<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Result<(), SetupError> {
    let sections = host.query_all(SECTION_SELECTOR);
    if sections.is_empty() {
        return Err(SetupError::missing(SECTION_SELECTOR));
    }

    let host_cb = Rc::clone(host);
    let reveal_class = settings.reveal_class.clone();
    let skills_id = settings.skills_section_id.clone();
    let fill_delay = settings.skill_fill_delay_ms;
    let mut state = RevealState::default();
    host.observe_visibility(
        &sections,
        &settings.visibility_options(),
        Box::new(move |section: H::Element| {
            if !state.mark(&section) {
                return;
            }
            host_cb.add_class(&section, &reveal_class);
            if host_cb.attribute(&section, "id").as_deref() == Some(skills_id.as_str()) {
                match animate_skill_bars(&host_cb, fill_delay) {
                    Ok(count) => log::debug!("animating {count} skill bars"),
                    Err(e) => log::warn!("skill bars not animated: {e}"),
                }
            }
        }),
    )?;
    Ok(())
}
