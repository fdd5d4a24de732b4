//! Contact form interception.
//!
//! Submissions never leave the page: the fields are collected, acknowledged
//! with a success notification, echoed to the log, and the form is cleared.

#[cfg(test)]
#[path = "contact_test.rs"]
mod contact_test;

use std::rc::Rc;

use serde::{Serialize, Serializer};

use crate::consts::CONTACT_FORM_ID;
use crate::error::{HostError, SetupError};
use crate::host::{DefaultAction, EventKind, Host, Target};
use crate::notify::{NotificationKind, Notifier};

/// Named fields of one submission, in form order.
///
/// A repeated name keeps the position of its first occurrence and the value
/// of its last, matching `Object.fromEntries` over `FormData`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    fields: Vec<(String, String)>,
}

impl Serialize for ContactSubmission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(name, value)| (name, value)))
    }
}

impl ContactSubmission {
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut collected: Vec<(String, String)> = Vec::new();
        for (name, value) in fields {
            let name = name.into();
            if name.is_empty() {
                continue;
            }
            let value = value.into();
            match collected.iter_mut().find(|(existing, _)| *existing == name) {
                Some(slot) => slot.1 = value,
                None => collected.push((name, value)),
            }
        }
        Self { fields: collected }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Handle one submission of `form`.
pub fn submit<H: Host + 'static>(
    host: &H,
    notifier: &Notifier<H>,
    form: &H::Element,
    success_message: &str,
) -> Result<ContactSubmission, HostError> {
    let submission = ContactSubmission::from_fields(host.form_fields(form)?);
    if let Err(e) = notifier.show(success_message, NotificationKind::Success) {
        log::warn!("contact acknowledgement not shown: {e}");
    }
    host.reset_form(form);
    match submission.to_json() {
        Ok(json) => log::info!("Form submitted: {json}"),
        Err(e) => log::warn!("Form submitted, fields not serializable: {e}"),
    }
    Ok(submission)
}

pub fn install<H: Host + 'static>(
    host: &Rc<H>,
    notifier: &Rc<Notifier<H>>,
    success_message: &str,
) -> Result<(), SetupError> {
    let form = host
        .element_by_id(CONTACT_FORM_ID)
        .ok_or_else(|| SetupError::missing(&format!("#{CONTACT_FORM_ID}")))?;

    let host_cb = Rc::clone(host);
    let notifier = Rc::clone(notifier);
    let form_cb = form.clone();
    let message = success_message.to_owned();
    host.on_event(
        Target::Element(&form),
        EventKind::Submit,
        DefaultAction::Prevent,
        Box::new(move || {
            if let Err(e) = submit(host_cb.as_ref(), &notifier, &form_cb, &message) {
                log::warn!("contact form not processed: {e}");
            }
        }),
    )?;
    Ok(())
}
