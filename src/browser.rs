//! web-sys implementation of [`Host`] and the WASM entry points.
//!
//! Listener and observer closures are leaked with `Closure::forget`: they
//! live as long as the page, which is exactly the lifetime of the script.
//! Timers are handed to the browser with `Timeout::forget` and tracked by
//! their numeric handle so they can still be cancelled.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, EventTarget, FormData, HtmlElement, HtmlFormElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, ScrollToOptions, Storage, Window,
};

use crate::app;
use crate::config::Settings;
use crate::error::HostError;
use crate::host::{
    Callback, DefaultAction, EventKind, Handler, Host, ScrollBehavior, ScrollMetrics, Target, TimerId,
    VisibilityHandler, VisibilityOptions,
};
use crate::notify::{NotificationKind, Notifier};

fn js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn dom(value: JsValue) -> HostError {
    HostError::Dom(js_error(&value))
}

fn report<T>(result: Result<T, JsValue>, what: &str) {
    if let Err(e) = result {
        log::debug!("{what} failed: {}", js_error(&e));
    }
}

fn as_html<T: JsCast>(value: T) -> Option<HtmlElement> {
    match value.dyn_into::<HtmlElement>() {
        Ok(el) => Some(el),
        Err(_) => None,
    }
}

pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::Missing("window"))?;
        let document = window.document().ok_or(HostError::Missing("document"))?;
        Ok(Self { window, document })
    }

    fn storage(&self) -> Result<Storage, HostError> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(HostError::Storage("localStorage not provided".into())),
            Err(e) => Err(HostError::Storage(js_error(&e))),
        }
    }

    fn first_match(&self, found: Result<Option<Element>, JsValue>, selector: &str) -> Option<HtmlElement> {
        match found {
            Ok(Some(el)) => as_html(el),
            Ok(None) => None,
            Err(e) => {
                log::debug!("bad selector {selector:?}: {}", js_error(&e));
                None
            }
        }
    }
}

impl Host for BrowserHost {
    type Element = HtmlElement;

    fn read_preference(&self, key: &str) -> Result<Option<String>, HostError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| HostError::Storage(js_error(&e)))
    }

    fn write_preference(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| HostError::Storage(js_error(&e)))
    }

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document.get_element_by_id(id).and_then(as_html)
    }

    fn query(&self, selector: &str) -> Option<HtmlElement> {
        self.first_match(self.document.query_selector(selector), selector)
    }

    fn query_all(&self, selector: &str) -> Vec<HtmlElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::debug!("bad selector {selector:?}: {}", js_error(&e));
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(as_html)
            .collect()
    }

    fn query_within(&self, parent: &HtmlElement, selector: &str) -> Option<HtmlElement> {
        self.first_match(parent.query_selector(selector), selector)
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    fn attribute(&self, el: &HtmlElement, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&self, el: &HtmlElement, name: &str, value: &str) -> Result<(), HostError> {
        el.set_attribute(name, value).map_err(dom)
    }

    fn add_class(&self, el: &HtmlElement, class: &str) {
        report(el.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&self, el: &HtmlElement, class: &str) {
        report(el.class_list().remove_1(class), "classList.remove");
    }

    fn inline_style(&self, el: &HtmlElement, property: &str) -> String {
        el.style().get_property_value(property).unwrap_or_default()
    }

    fn computed_style(&self, el: &HtmlElement, property: &str) -> String {
        match self.window.get_computed_style(el) {
            Ok(Some(decl)) => decl.get_property_value(property).unwrap_or_default(),
            Ok(None) => String::new(),
            Err(e) => {
                log::debug!("getComputedStyle failed: {}", js_error(&e));
                String::new()
            }
        }
    }

    fn set_style(&self, el: &HtmlElement, property: &str, value: &str) {
        report(el.style().set_property(property, value), "style.setProperty");
    }

    fn remove_style(&self, el: &HtmlElement, property: &str) {
        report(el.style().remove_property(property), "style.removeProperty");
    }

    fn text_content(&self, el: &HtmlElement) -> String {
        el.text_content().unwrap_or_default()
    }

    fn offset_top(&self, el: &HtmlElement) -> f64 {
        f64::from(el.offset_top())
    }

    fn create_element(&self, tag: &str) -> Result<HtmlElement, HostError> {
        let el = self.document.create_element(tag).map_err(dom)?;
        as_html(el).ok_or_else(|| HostError::Dom(format!("<{tag}> is not an html element")))
    }

    fn set_inner_html(&self, el: &HtmlElement, html: &str) {
        el.set_inner_html(html);
    }

    fn append_to_body(&self, el: &HtmlElement) -> Result<(), HostError> {
        let body = self.document.body().ok_or(HostError::Missing("body"))?;
        body.append_child(el).map_err(dom)?;
        Ok(())
    }

    fn inject_stylesheet(&self, css: &str) -> Result<(), HostError> {
        let head = self.document.head().ok_or(HostError::Missing("head"))?;
        let style = self.document.create_element("style").map_err(dom)?;
        style.set_text_content(Some(css));
        head.append_child(&style).map_err(dom)?;
        Ok(())
    }

    fn remove(&self, el: &HtmlElement) {
        el.remove();
    }

    fn form_fields(&self, form: &HtmlElement) -> Result<Vec<(String, String)>, HostError> {
        let form = form
            .dyn_ref::<HtmlFormElement>()
            .ok_or_else(|| HostError::Dom("element is not a form".into()))?;
        let data = FormData::new_with_form(form).map_err(dom)?;
        let entries = js_sys::try_iter(&data)
            .map_err(dom)?
            .ok_or_else(|| HostError::Dom("FormData is not iterable".into()))?;

        let mut fields = Vec::new();
        for entry in entries {
            let pair = js_sys::Array::from(&entry.map_err(dom)?);
            // File inputs yield File values; only text entries are collected.
            if let (Some(name), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                fields.push((name, value));
            }
        }
        Ok(fields)
    }

    fn reset_form(&self, form: &HtmlElement) {
        if let Some(form) = form.dyn_ref::<HtmlFormElement>() {
            form.reset();
        }
    }

    fn document_ready(&self) -> bool {
        self.document.ready_state() == "complete"
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let offset = self.window.scroll_y().unwrap_or(0.0);
        match self.document.document_element() {
            Some(root) => ScrollMetrics {
                offset,
                scroll_height: f64::from(root.scroll_height()),
                client_height: f64::from(root.client_height()),
            },
            None => ScrollMetrics { offset, ..ScrollMetrics::default() },
        }
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn schedule(&self, delay_ms: u32, callback: Callback) -> Result<TimerId, HostError> {
        let handle = Timeout::new(delay_ms, callback).forget();
        handle
            .as_f64()
            .map(|id| TimerId(id as i32))
            .ok_or_else(|| HostError::Dom("setTimeout returned a non-numeric handle".into()))
    }

    fn cancel(&self, timer: TimerId) {
        self.window.clear_timeout_with_handle(timer.0);
    }

    fn on_event(
        &self,
        target: Target<'_, HtmlElement>,
        kind: EventKind,
        default: DefaultAction,
        handler: Handler,
    ) -> Result<(), HostError> {
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            if default == DefaultAction::Prevent {
                event.prevent_default();
            }
            handler();
        });
        let target: &EventTarget = match target {
            Target::Window => self.window.as_ref(),
            Target::Element(el) => el.as_ref(),
        };
        target
            .add_event_listener_with_callback(kind.name(), closure.as_ref().unchecked_ref())
            .map_err(dom)?;
        closure.forget();
        Ok(())
    }

    fn observe_visibility(
        &self,
        targets: &[HtmlElement],
        options: &VisibilityOptions,
        handler: VisibilityHandler<HtmlElement>,
    ) -> Result<(), HostError> {
        let mut handler = handler;
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Some(target) = as_html(entry.target()) {
                        handler(target);
                    }
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).map_err(dom)?;
        for target in targets {
            observer.observe(target);
        }
        callback.forget();
        Ok(())
    }

    fn console_styled(&self, text: &str, css: &str) {
        web_sys::console::log_2(&JsValue::from_str(&format!("%c{text}")), &JsValue::from_str(css));
    }
}

// =============================================================
// Entry points
// =============================================================

thread_local! {
    static NOTIFIER: RefCell<Option<Rc<Notifier<BrowserHost>>>> = const { RefCell::new(None) };
}

/// Module start: install every behaviour on the current document.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger not installed: {e}")));
    }

    let host = match BrowserHost::new() {
        Ok(host) => Rc::new(host),
        Err(e) => {
            log::error!("portfolio script not started: {e}");
            return;
        }
    };
    let settings = Settings::from_page(host.as_ref());
    let page = app::boot(&host, &settings);
    NOTIFIER.with(|slot| *slot.borrow_mut() = Some(page.notifier));
}

/// `showNotification(message, kind = "success")` for inline page scripts.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let kind = kind.as_deref().map_or_else(NotificationKind::default, NotificationKind::parse);
    NOTIFIER.with(|slot| {
        if let Some(notifier) = slot.borrow().as_ref() {
            if let Err(e) = notifier.show(message, kind) {
                log::warn!("notification not shown: {e}");
            }
        }
    });
}

/// Slide out every notification still on screen. Returns how many.
#[wasm_bindgen(js_name = dismissNotifications)]
pub fn dismiss_notifications() -> u32 {
    NOTIFIER.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(0, |notifier| u32::try_from(notifier.dismiss_all()).unwrap_or(u32::MAX))
    })
}
