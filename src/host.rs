//! Capability interface between the behaviour modules and the page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every behaviour talks to the browser exclusively through [`Host`]:
//! persistent preferences, element queries and mutation, viewport metrics,
//! timers, event listeners and visibility observation. The `browser` feature
//! provides the web-sys implementation; unit tests drive an in-memory fake.
//!
//! Class and style mutation is infallible from the caller's point of view.
//! Implementations log failures there instead of surfacing them, since no
//! behaviour could do anything useful with the error.

use crate::error::HostError;

/// Handle for a scheduled callback, usable with [`Host::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// DOM events the behaviours listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    Load,
    MouseEnter,
    MouseLeave,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::Load => "load",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
        }
    }
}

/// Whether a listener suppresses the browser's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Allow,
    Prevent,
}

/// Where a listener is attached.
#[derive(Debug)]
pub enum Target<'a, E> {
    Window,
    Element(&'a E),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Vertical scroll measurements of the document.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current vertical offset (`window.scrollY`).
    pub offset: f64,
    /// Full document height (`documentElement.scrollHeight`).
    pub scroll_height: f64,
    /// Viewport height (`documentElement.clientHeight`).
    pub client_height: f64,
}

impl ScrollMetrics {
    /// Distance the document can scroll. Zero or negative when the page fits.
    #[must_use]
    pub fn scrollable(&self) -> f64 {
        self.scroll_height - self.client_height
    }
}

/// Intersection options for [`Host::observe_visibility`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityOptions {
    /// Fraction of the target that must be visible, in `[0, 1]`.
    pub threshold: f64,
    /// CSS margin applied to the viewport, e.g. `"0px 0px -50px 0px"`.
    pub root_margin: String,
}

pub type Callback = Box<dyn FnOnce()>;
pub type Handler = Box<dyn FnMut()>;
pub type VisibilityHandler<E> = Box<dyn FnMut(E)>;

/// Everything the behaviours need from the page and its event loop.
pub trait Host {
    /// Opaque element handle. Equality is element identity.
    type Element: Clone + PartialEq + 'static;

    // --- Persistent preferences ---

    fn read_preference(&self, key: &str) -> Result<Option<String>, HostError>;
    fn write_preference(&self, key: &str, value: &str) -> Result<(), HostError>;

    // --- Queries ---

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn query(&self, selector: &str) -> Option<Self::Element>;
    /// All matches in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn query_within(&self, parent: &Self::Element, selector: &str) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;

    // --- Element state ---

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&self, el: &Self::Element, name: &str, value: &str) -> Result<(), HostError>;
    fn add_class(&self, el: &Self::Element, class: &str);
    fn remove_class(&self, el: &Self::Element, class: &str);
    /// Inline style value, empty when unset.
    fn inline_style(&self, el: &Self::Element, property: &str) -> String;
    /// Resolved style value after the stylesheet cascade.
    fn computed_style(&self, el: &Self::Element, property: &str) -> String;
    fn set_style(&self, el: &Self::Element, property: &str, value: &str);
    fn remove_style(&self, el: &Self::Element, property: &str);
    fn text_content(&self, el: &Self::Element) -> String;
    /// Distance from the top of the document in CSS pixels.
    fn offset_top(&self, el: &Self::Element) -> f64;

    // --- Tree ---

    fn create_element(&self, tag: &str) -> Result<Self::Element, HostError>;
    fn set_inner_html(&self, el: &Self::Element, html: &str);
    fn append_to_body(&self, el: &Self::Element) -> Result<(), HostError>;
    /// Append a `<style>` element with `css` to the document head.
    fn inject_stylesheet(&self, css: &str) -> Result<(), HostError>;
    fn remove(&self, el: &Self::Element);

    // --- Forms ---

    /// Named `(field, value)` pairs in form order, duplicates included.
    fn form_fields(&self, form: &Self::Element) -> Result<Vec<(String, String)>, HostError>;
    fn reset_form(&self, form: &Self::Element);

    // --- Document ---

    /// Whether the window `load` event has already fired.
    fn document_ready(&self) -> bool;

    // --- Viewport ---

    fn scroll_metrics(&self) -> ScrollMetrics;
    fn scroll_to(&self, top: f64, behavior: ScrollBehavior);

    // --- Event loop ---

    /// Run `callback` once after `delay_ms`. Fire-and-forget unless cancelled.
    fn schedule(&self, delay_ms: u32, callback: Callback) -> Result<TimerId, HostError>;
    fn cancel(&self, timer: TimerId);
    fn on_event(
        &self,
        target: Target<'_, Self::Element>,
        kind: EventKind,
        default: DefaultAction,
        handler: Handler,
    ) -> Result<(), HostError>;
    /// Call `handler` with each target that starts intersecting the viewport.
    fn observe_visibility(
        &self,
        targets: &[Self::Element],
        options: &VisibilityOptions,
        handler: VisibilityHandler<Self::Element>,
    ) -> Result<(), HostError>;

    // --- Diagnostics ---

    /// Console line rendered with `css` (`%c` formatting).
    fn console_styled(&self, text: &str, css: &str);
}
