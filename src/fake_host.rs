//! In-memory [`Host`] for unit tests.
//!
//! Models just enough of a page for the behaviour modules: a flat node
//! arena with parent links, simple selectors (`#id`, `.class`, `tag`,
//! `tag[attr]`, `tag[attr^="prefix"]`), a storage map that can be made to
//! fail, a virtual clock driven by [`FakeHost::advance`], and manual event
//! and intersection dispatch.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::HostError;
use crate::host::{
    Callback, DefaultAction, EventKind, Handler, Host, ScrollBehavior, ScrollMetrics, Target, TimerId,
    VisibilityHandler, VisibilityOptions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    sheet: BTreeMap<String, String>,
    text: String,
    inner_html: String,
    offset_top: f64,
    fields: Vec<(String, String)>,
    parent: Option<NodeId>,
    attached: bool,
}

struct PendingTimer {
    id: i32,
    due: u64,
    callback: Callback,
}

struct Listener {
    target: Option<NodeId>,
    kind: EventKind,
    default: DefaultAction,
    handler: Rc<RefCell<Handler>>,
}

struct Observer {
    targets: Vec<NodeId>,
    options: VisibilityOptions,
    handler: Rc<RefCell<VisibilityHandler<NodeId>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageMode {
    Available,
    ReadOnly,
    Unavailable,
}

pub struct FakeHost {
    nodes: RefCell<Vec<Node>>,
    body: NodeId,
    head: NodeId,
    storage: RefCell<HashMap<String, String>>,
    storage_mode: Cell<StorageMode>,
    appends_fail: Cell<bool>,
    loaded: Cell<bool>,
    metrics: Cell<ScrollMetrics>,
    scrolls: RefCell<Vec<(f64, ScrollBehavior)>>,
    now: Cell<u64>,
    next_timer: Cell<i32>,
    timers: RefCell<Vec<PendingTimer>>,
    listeners: RefCell<Vec<Listener>>,
    observers: RefCell<Vec<Observer>>,
    console: RefCell<Vec<(String, String)>>,
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        let body = Node { tag: "body".into(), attached: true, ..Node::default() };
        let head = Node { tag: "head".into(), attached: true, ..Node::default() };
        Rc::new(Self {
            nodes: RefCell::new(vec![body, head]),
            body: NodeId(0),
            head: NodeId(1),
            storage: RefCell::new(HashMap::new()),
            storage_mode: Cell::new(StorageMode::Available),
            appends_fail: Cell::new(false),
            loaded: Cell::new(false),
            metrics: Cell::new(ScrollMetrics { offset: 0.0, scroll_height: 2000.0, client_height: 1000.0 }),
            scrolls: RefCell::new(Vec::new()),
            now: Cell::new(0),
            next_timer: Cell::new(1),
            timers: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            console: RefCell::new(Vec::new()),
        })
    }

    // =============================================================
    // Page construction
    // =============================================================

    /// Append a new element to `<body>`. A `class` attribute is split into classes.
    pub fn add(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.add_child(self.body, tag, attrs)
    }

    pub fn add_child(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut node = Node { tag: tag.to_owned(), parent: Some(parent), attached: true, ..Node::default() };
        for (name, value) in attrs {
            if *name == "class" {
                node.classes = value.split_whitespace().map(str::to_owned).collect();
            } else {
                node.attrs.insert((*name).to_owned(), (*value).to_owned());
            }
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        NodeId(nodes.len() - 1)
    }

    pub fn set_offset_top(&self, node: NodeId, top: f64) {
        self.nodes.borrow_mut()[node.0].offset_top = top;
    }

    /// Style the node receives from the stylesheet (visible via `computed_style`).
    pub fn set_sheet_style(&self, node: NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .sheet
            .insert(property.to_owned(), value.to_owned());
    }

    pub fn set_inline_style(&self, node: NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .style
            .insert(property.to_owned(), value.to_owned());
    }

    pub fn set_fields(&self, form: NodeId, fields: &[(&str, &str)]) {
        self.nodes.borrow_mut()[form.0].fields =
            fields.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    }

    pub fn set_text(&self, node: NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_owned();
    }

    pub fn set_metrics(&self, metrics: ScrollMetrics) {
        self.metrics.set(metrics);
    }

    pub fn store(&self, key: &str, value: &str) {
        self.storage.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    pub fn make_storage_unavailable(&self) {
        self.storage_mode.set(StorageMode::Unavailable);
    }

    pub fn make_storage_read_only(&self) {
        self.storage_mode.set(StorageMode::ReadOnly);
    }

    /// Every later `append_to_body` throws, as it would for a detached body.
    pub fn make_appends_fail(&self) {
        self.appends_fail.set(true);
    }

    /// Pretend the window `load` event already fired before any script ran.
    pub fn mark_loaded(&self) {
        self.loaded.set(true);
    }

    // =============================================================
    // Driving the page
    // =============================================================

    /// Dispatch `kind` at `target`. Returns whether a listener prevented the default.
    pub fn dispatch(&self, target: Option<NodeId>, kind: EventKind) -> bool {
        if target.is_none() && kind == EventKind::Load {
            self.loaded.set(true);
        }
        let matching: Vec<(DefaultAction, Rc<RefCell<Handler>>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| (l.default, Rc::clone(&l.handler)))
            .collect();
        let mut prevented = false;
        for (default, handler) in matching {
            if default == DefaultAction::Prevent {
                prevented = true;
            }
            (*handler.borrow_mut())();
        }
        prevented
    }

    pub fn click(&self, node: NodeId) -> bool {
        self.dispatch(Some(node), EventKind::Click)
    }

    pub fn submit(&self, form: NodeId) -> bool {
        self.dispatch(Some(form), EventKind::Submit)
    }

    /// Move the viewport and fire a window scroll event.
    pub fn scroll_window(&self, offset: f64) {
        let mut metrics = self.metrics.get();
        metrics.offset = offset;
        self.metrics.set(metrics);
        self.dispatch(None, EventKind::Scroll);
    }

    /// Report `node` as intersecting to every observer watching it.
    pub fn intersect(&self, node: NodeId) {
        let matching: Vec<Rc<RefCell<VisibilityHandler<NodeId>>>> = self
            .observers
            .borrow()
            .iter()
            .filter(|o| o.targets.contains(&node))
            .map(|o| Rc::clone(&o.handler))
            .collect();
        for handler in matching {
            (*handler.borrow_mut())(node);
        }
    }

    /// Advance the virtual clock, firing due timers in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let idx = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                idx.map(|i| timers.remove(i))
            };
            let Some(timer) = next else {
                break;
            };
            self.now.set(timer.due);
            (timer.callback)();
        }
        self.now.set(target);
    }

    // =============================================================
    // Inspection
    // =============================================================

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    pub fn has(&self, node: NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    pub fn style(&self, node: NodeId, property: &str) -> String {
        self.nodes.borrow()[node.0]
            .style
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].inner_html.clone()
    }

    pub fn fields(&self, form: NodeId) -> Vec<(String, String)> {
        self.nodes.borrow()[form.0].fields.clone()
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if !nodes[id.0].attached {
                return false;
            }
            cursor = nodes[id.0].parent;
        }
        true
    }

    /// Attached elements carrying `class`, in document order.
    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(&format!(".{class}"))
    }

    /// Elements ever created with `tag`, attached or not.
    pub fn created(&self, tag: &str) -> usize {
        self.nodes.borrow().iter().filter(|n| n.tag == tag).count()
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.borrow().get(key).cloned()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().iter().filter(|l| l.kind == kind).count()
    }

    pub fn scrolls(&self) -> Vec<(f64, ScrollBehavior)> {
        self.scrolls.borrow().clone()
    }

    pub fn console_lines(&self) -> Vec<(String, String)> {
        self.console.borrow().clone()
    }

    pub fn observed_options(&self) -> Vec<VisibilityOptions> {
        self.observers.borrow().iter().map(|o| o.options.clone()).collect()
    }

    pub fn observed_targets(&self) -> Vec<NodeId> {
        self.observers
            .borrow()
            .iter()
            .flat_map(|o| o.targets.iter().copied())
            .collect()
    }

    /// Text of every `<style>` injected into the head.
    pub fn stylesheets(&self) -> Vec<String> {
        self.nodes
            .borrow()
            .iter()
            .filter(|n| n.tag == "style" && n.parent == Some(self.head))
            .map(|n| n.text.clone())
            .collect()
    }

    // =============================================================
    // Selector matching
    // =============================================================

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut cursor = nodes[node.0].parent;
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = nodes[id.0].parent;
        }
        false
    }

    fn matching(&self, selector: &str) -> Vec<NodeId> {
        let parsed = Selector::parse(selector);
        let candidates: Vec<NodeId> = {
            let nodes = self.nodes.borrow();
            (0..nodes.len())
                .filter(|i| parsed.matches(&nodes[*i]))
                .map(NodeId)
                .collect()
        };
        candidates.into_iter().filter(|id| self.is_attached(*id)).collect()
    }
}

enum Selector {
    Id(String),
    Class(String),
    Tag { tag: String, attr: Option<(String, Option<String>)> },
}

impl Selector {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(id) = raw.strip_prefix('#') {
            return Self::Id(id.to_owned());
        }
        if let Some(class) = raw.strip_prefix('.') {
            return Self::Class(class.to_owned());
        }
        match raw.split_once('[') {
            Some((tag, rest)) => {
                let inner = rest.trim_end_matches(']');
                let attr = match inner.split_once("^=") {
                    Some((name, prefix)) => (name.to_owned(), Some(prefix.trim_matches('"').to_owned())),
                    None => (inner.to_owned(), None),
                };
                Self::Tag { tag: tag.to_owned(), attr: Some(attr) }
            }
            None => Self::Tag { tag: raw.to_owned(), attr: None },
        }
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Id(id) => node.attrs.get("id") == Some(id),
            Self::Class(class) => node.classes.iter().any(|c| c == class),
            Self::Tag { tag, attr } => {
                if node.tag != *tag {
                    return false;
                }
                match attr {
                    None => true,
                    Some((name, None)) => node.attrs.contains_key(name),
                    Some((name, Some(prefix))) => node.attrs.get(name).is_some_and(|v| v.starts_with(prefix.as_str())),
                }
            }
        }
    }
}

impl Host for FakeHost {
    type Element = NodeId;

    fn read_preference(&self, key: &str) -> Result<Option<String>, HostError> {
        if self.storage_mode.get() == StorageMode::Unavailable {
            return Err(HostError::Storage("localStorage disabled".into()));
        }
        Ok(self.storage.borrow().get(key).cloned())
    }

    fn write_preference(&self, key: &str, value: &str) -> Result<(), HostError> {
        if self.storage_mode.get() != StorageMode::Available {
            return Err(HostError::Storage("quota exceeded".into()));
        }
        self.storage.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.matching(&format!("#{id}")).into_iter().next()
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        self.matching(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.matching(selector)
    }

    fn query_within(&self, parent: &NodeId, selector: &str) -> Option<NodeId> {
        self.matching(selector)
            .into_iter()
            .find(|id| self.is_descendant(*id, *parent))
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn attribute(&self, el: &NodeId, name: &str) -> Option<String> {
        let nodes = self.nodes.borrow();
        let node = &nodes[el.0];
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn set_attribute(&self, el: &NodeId, name: &str, value: &str) -> Result<(), HostError> {
        self.nodes.borrow_mut()[el.0]
            .attrs
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn add_class(&self, el: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[el.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, el: &NodeId, class: &str) {
        self.nodes.borrow_mut()[el.0].classes.retain(|c| c != class);
    }

    fn inline_style(&self, el: &NodeId, property: &str) -> String {
        self.style(*el, property)
    }

    fn computed_style(&self, el: &NodeId, property: &str) -> String {
        let nodes = self.nodes.borrow();
        let node = &nodes[el.0];
        node.style
            .get(property)
            .filter(|v| !v.is_empty())
            .or_else(|| node.sheet.get(property))
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, el: &NodeId, property: &str, value: &str) {
        self.set_inline_style(*el, property, value);
    }

    fn remove_style(&self, el: &NodeId, property: &str) {
        self.nodes.borrow_mut()[el.0].style.remove(property);
    }

    fn text_content(&self, el: &NodeId) -> String {
        self.nodes.borrow()[el.0].text.clone()
    }

    fn offset_top(&self, el: &NodeId) -> f64 {
        self.nodes.borrow()[el.0].offset_top
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, HostError> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node { tag: tag.to_owned(), ..Node::default() });
        Ok(NodeId(nodes.len() - 1))
    }

    fn set_inner_html(&self, el: &NodeId, html: &str) {
        self.nodes.borrow_mut()[el.0].inner_html = html.to_owned();
    }

    fn append_to_body(&self, el: &NodeId) -> Result<(), HostError> {
        if self.appends_fail.get() {
            return Err(HostError::Dom("HierarchyRequestError".into()));
        }
        let mut nodes = self.nodes.borrow_mut();
        let node = &mut nodes[el.0];
        node.parent = Some(self.body);
        node.attached = true;
        Ok(())
    }

    fn inject_stylesheet(&self, css: &str) -> Result<(), HostError> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: "style".into(),
            text: css.to_owned(),
            parent: Some(self.head),
            attached: true,
            ..Node::default()
        });
        Ok(())
    }

    fn remove(&self, el: &NodeId) {
        self.nodes.borrow_mut()[el.0].attached = false;
    }

    fn form_fields(&self, form: &NodeId) -> Result<Vec<(String, String)>, HostError> {
        Ok(self.fields(*form))
    }

    fn reset_form(&self, form: &NodeId) {
        for (_, value) in &mut self.nodes.borrow_mut()[form.0].fields {
            value.clear();
        }
    }

    fn document_ready(&self) -> bool {
        self.loaded.get()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics.get()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.borrow_mut().push((top, behavior));
        let mut metrics = self.metrics.get();
        metrics.offset = top;
        self.metrics.set(metrics);
    }

    fn schedule(&self, delay_ms: u32, callback: Callback) -> Result<TimerId, HostError> {
        let id = self.next_timer.get();
        self.next_timer.set(id + 1);
        self.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.now.get() + u64::from(delay_ms),
            callback,
        });
        Ok(TimerId(id))
    }

    fn cancel(&self, timer: TimerId) {
        self.timers.borrow_mut().retain(|t| t.id != timer.0);
    }

    fn on_event(
        &self,
        target: Target<'_, NodeId>,
        kind: EventKind,
        default: DefaultAction,
        handler: Handler,
    ) -> Result<(), HostError> {
        let target = match target {
            Target::Window => None,
            Target::Element(el) => Some(*el),
        };
        self.listeners.borrow_mut().push(Listener {
            target,
            kind,
            default,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }

    fn observe_visibility(
        &self,
        targets: &[NodeId],
        options: &VisibilityOptions,
        handler: VisibilityHandler<NodeId>,
    ) -> Result<(), HostError> {
        self.observers.borrow_mut().push(Observer {
            targets: targets.to_vec(),
            options: options.clone(),
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }

    fn console_styled(&self, text: &str, css: &str) {
        self.console.borrow_mut().push((text.to_owned(), css.to_owned()));
    }
}
