//! Self-dismissing toast notifications.
//!
//! Each notification is an independent element with its own lifecycle:
//!
//! ```text
//! Pending --enter_delay--> Visible --(display - enter)--> Dismissing --exit--> Removed
//! ```
//!
//! A notification owns the handle of the timer that will move it to its next
//! phase, so [`Notifier::dismiss_all`] can cut a lifecycle short. Concurrent
//! notifications never wait on each other; there is no queue and no dedup.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::NotificationTimings;
use crate::consts::{NOTIFICATION_CLASS, OFFSCREEN_TRANSFORM, ONSCREEN_TRANSFORM};
use crate::error::HostError;
use crate::host::{Host, TimerId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// Parse a kind name. Anything other than `success` or `error` is `Info`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    /// Background colour.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#10b981",
            Self::Error => "#ef4444",
            Self::Info => "#3b82f6",
        }
    }

    /// Font Awesome icon name, without the `fa-` prefix.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Info => "info-circle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Inserted off-screen, waiting to slide in.
    Pending,
    Visible,
    /// Sliding out, removal scheduled.
    Dismissing,
    Removed,
}

#[derive(Debug)]
struct Notification<E> {
    element: E,
    phase: Phase,
    timer: Option<TimerId>,
}

type Note<E> = Rc<RefCell<Notification<E>>>;
type Step<H> = fn(&Rc<H>, &Note<<H as Host>::Element>, NotificationTimings);

/// Creates notifications and tracks the ones still on the page.
pub struct Notifier<H: Host> {
    host: Rc<H>,
    timings: NotificationTimings,
    live: RefCell<Vec<Note<H::Element>>>,
}

impl<H: Host + 'static> Notifier<H> {
    #[must_use]
    pub fn new(host: Rc<H>, timings: NotificationTimings) -> Self {
        Self { host, timings, live: RefCell::new(Vec::new()) }
    }

    /// Insert a notification and start its lifecycle. Returns the element.
    pub fn show(&self, message: &str, kind: NotificationKind) -> Result<H::Element, HostError> {
        let host = self.host.as_ref();
        let el = host.create_element("div")?;
        host.add_class(&el, NOTIFICATION_CLASS);
        host.add_class(&el, kind.class());
        let transition = format!("transform {}ms ease", self.timings.exit_ms);
        for (property, value) in [
            ("position", "fixed"),
            ("top", "100px"),
            ("right", "20px"),
            ("padding", "1rem 1.5rem"),
            ("background", kind.color()),
            ("color", "white"),
            ("border-radius", "8px"),
            ("box-shadow", "var(--shadow)"),
            ("z-index", "10000"),
            ("transform", OFFSCREEN_TRANSFORM),
            ("transition", transition.as_str()),
        ] {
            host.set_style(&el, property, value);
        }
        host.set_inner_html(&el, &render_body(message, kind));
        host.append_to_body(&el)?;

        let note = Rc::new(RefCell::new(Notification { element: el.clone(), phase: Phase::Pending, timer: None }));
        {
            let mut live = self.live.borrow_mut();
            live.retain(|n| n.borrow().phase != Phase::Removed);
            live.push(Rc::clone(&note));
        }
        arm(&self.host, &note, self.timings.enter_delay_ms, self.timings, enter::<H>);
        Ok(el)
    }

    /// Start the exit transition of every notification still on the page.
    pub fn dismiss_all(&self) -> usize {
        let live: Vec<Note<H::Element>> = self
            .live
            .borrow()
            .iter()
            .filter(|n| matches!(n.borrow().phase, Phase::Pending | Phase::Visible))
            .cloned()
            .collect();
        for note in &live {
            dismiss(&self.host, note, self.timings);
        }
        live.len()
    }

    /// Notifications not yet removed from the page.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
            .borrow()
            .iter()
            .filter(|n| n.borrow().phase != Phase::Removed)
            .count()
    }

    /// Current phase of the notification rendered as `element`.
    #[cfg(test)]
    #[must_use]
    pub fn phase_of(&self, element: &H::Element) -> Option<Phase> {
        let live = self.live.borrow();
        let phase = live
            .iter()
            .find(|n| n.borrow().element == *element)
            .map(|n| n.borrow().phase);
        phase
    }
}

fn render_body(message: &str, kind: NotificationKind) -> String {
    format!(
        "<div class=\"flex items-center space-x-3\"><i class=\"fas fa-{}\"></i><span>{}</span></div>",
        kind.icon(),
        escape_html(message)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Schedule `step` for `note`, recording the timer it now owns.
fn arm<H: Host + 'static>(host: &Rc<H>, note: &Note<H::Element>, delay_ms: u32, timings: NotificationTimings, step: Step<H>) {
    let host_cb = Rc::clone(host);
    let note_cb = Rc::clone(note);
    match host.schedule(delay_ms, Box::new(move || step(&host_cb, &note_cb, timings))) {
        Ok(timer) => note.borrow_mut().timer = Some(timer),
        Err(e) => {
            log::warn!("notification timer failed, removing early: {e}");
            let mut n = note.borrow_mut();
            host.remove(&n.element);
            n.phase = Phase::Removed;
            n.timer = None;
        }
    }
}

fn enter<H: Host + 'static>(host: &Rc<H>, note: &Note<H::Element>, timings: NotificationTimings) {
    {
        let mut n = note.borrow_mut();
        if n.phase != Phase::Pending {
            return;
        }
        host.set_style(&n.element, "transform", ONSCREEN_TRANSFORM);
        n.phase = Phase::Visible;
        n.timer = None;
    }
    let remaining = timings.display_ms.saturating_sub(timings.enter_delay_ms);
    arm(host, note, remaining, timings, dismiss::<H>);
}

fn dismiss<H: Host + 'static>(host: &Rc<H>, note: &Note<H::Element>, timings: NotificationTimings) {
    {
        let mut n = note.borrow_mut();
        if !matches!(n.phase, Phase::Pending | Phase::Visible) {
            return;
        }
        if let Some(timer) = n.timer.take() {
            host.cancel(timer);
        }
        host.set_style(&n.element, "transform", OFFSCREEN_TRANSFORM);
        n.phase = Phase::Dismissing;
    }
    arm(host, note, timings.exit_ms, timings, remove::<H>);
}

fn remove<H: Host + 'static>(host: &Rc<H>, note: &Note<H::Element>, _timings: NotificationTimings) {
    let mut n = note.borrow_mut();
    if n.phase != Phase::Dismissing {
        return;
    }
    host.remove(&n.element);
    n.phase = Phase::Removed;
    n.timer = None;
}
