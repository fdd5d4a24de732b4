//! Page-load fade-in that masks late layout shifts.
//!
//! The WASM module may be instantiated after `load` has already fired, in
//! which case waiting for the event would never fade the page in.

#[cfg(test)]
#[path = "fade_test.rs"]
mod fade_test;

use std::rc::Rc;

use crate::error::{HostError, SetupError};
use crate::host::{DefaultAction, EventKind, Host, Target};

/// Hide `body`, arm the opacity transition, and fade back in after `delay_ms`.
pub fn fade_in<H: Host + 'static>(host: &Rc<H>, body: &H::Element, delay_ms: u32) -> Result<(), HostError> {
    host.set_style(body, "opacity", "0");
    host.set_style(body, "transition", "opacity 0.3s ease");
    let host_cb = Rc::clone(host);
    let body_cb = body.clone();
    host.schedule(delay_ms, Box::new(move || host_cb.set_style(&body_cb, "opacity", "1")))?;
    Ok(())
}

/// Fade the page in on window `load`, or right away when the document
/// finished loading before this script started.
pub fn install<H: Host + 'static>(host: &Rc<H>, delay_ms: u32) -> Result<(), SetupError> {
    let body = host.body().ok_or(HostError::Missing("body"))?;
    if host.document_ready() {
        log::debug!("document already loaded, fading in now");
        run(host, &body, delay_ms);
        return Ok(());
    }

    let host_cb = Rc::clone(host);
    host.on_event(
        Target::Window,
        EventKind::Load,
        DefaultAction::Allow,
        Box::new(move || run(&host_cb, &body, delay_ms)),
    )?;
    Ok(())
}

fn run<H: Host + 'static>(host: &Rc<H>, body: &H::Element, delay_ms: u32) {
    if let Err(e) = fade_in(host, body, delay_ms) {
        log::warn!("page fade-in skipped: {e}");
        host.set_style(body, "opacity", "1");
    }
}
