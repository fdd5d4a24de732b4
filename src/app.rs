//! Boot sequence: install every page behaviour independently.
//!
//! ARCHITECTURE
//! ============
//! Behaviours share nothing but the host and the notifier. Each installer
//! runs even if an earlier one failed, so a page missing (say) the mobile
//! menu button still gets its theme, scroll effects and contact form.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::rc::Rc;

use crate::config::Settings;
use crate::error::SetupError;
use crate::host::Host;
use crate::notify::Notifier;
use crate::{cards, contact, fade, menu, nav, reveal, scroll, theme};

/// Which behaviours were installed and which were skipped.
#[derive(Debug, Default)]
pub struct BootReport {
    pub installed: Vec<&'static str>,
    pub skipped: Vec<(&'static str, SetupError)>,
}

impl BootReport {
    fn record<T>(&mut self, name: &'static str, result: Result<T, SetupError>) {
        match result {
            Ok(_) => self.installed.push(name),
            Err(e) => {
                log::warn!("{name} disabled: {e}");
                self.skipped.push((name, e));
            }
        }
    }

    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.iter().any(|n| *n == name)
    }
}

/// A booted page.
pub struct Page<H: Host> {
    pub notifier: Rc<Notifier<H>>,
    pub report: BootReport,
}

pub fn boot<H: Host + 'static>(host: &Rc<H>, settings: &Settings) -> Page<H> {
    let notifier = Rc::new(Notifier::new(Rc::clone(host), settings.notifications));
    let mut report = BootReport::default();

    report.record("theme", theme::install(host, settings));
    report.record("navbar", scroll::install(host, settings));
    report.record("anchors", scroll::install_anchors(host, settings));
    report.record("mobile-menu", menu::install(host));
    report.record("contact-form", contact::install(host, &notifier, &settings.contact_success_message));
    report.record("reveal", reveal::install(host, settings));
    report.record("project-cards", cards::install(host));
    report.record("page-fade", fade::install(host, settings.page_fade_delay_ms));
    report.record("active-link", nav::install(host, settings));

    greet(host.as_ref(), settings);
    log::info!(
        "portfolio ready: {} behaviours installed, {} skipped",
        report.installed.len(),
        report.skipped.len()
    );
    Page { notifier, report }
}

fn greet<H: Host>(host: &H, settings: &Settings) {
    for line in &settings.greeting {
        host.console_styled(&line.text, &line.css);
    }
}
