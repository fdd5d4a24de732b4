//! Hover lift for project cards.

#[cfg(test)]
#[path = "cards_test.rs"]
mod cards_test;

use std::rc::Rc;

use crate::consts::{CARD_LIFT_TRANSFORM, CARD_REST_TRANSFORM, PROJECT_CARD_SELECTOR};
use crate::error::SetupError;
use crate::host::{DefaultAction, EventKind, Host, Target};

/// Returns the number of cards wired. A page without cards is not an error.
pub fn install<H: Host + 'static>(host: &Rc<H>) -> Result<usize, SetupError> {
    let cards = host.query_all(PROJECT_CARD_SELECTOR);
    for card in &cards {
        for (kind, transform) in [
            (EventKind::MouseEnter, CARD_LIFT_TRANSFORM),
            (EventKind::MouseLeave, CARD_REST_TRANSFORM),
        ] {
            let host_cb = Rc::clone(host);
            let card_cb = card.clone();
            host.on_event(
                Target::Element(card),
                kind,
                DefaultAction::Allow,
                Box::new(move || host_cb.set_style(&card_cb, "transform", transform)),
            )?;
        }
    }
    Ok(cards.len())
}
