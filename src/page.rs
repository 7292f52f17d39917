use std::collections::HashMap;
use std::rc::Rc;

use crate::dom::{Dom, NodeId, truncate_chars};
use crate::events::{EventPhase, EventState, ListenerId, ListenerStore};
use crate::html::parse_html;
use crate::observer::{IntersectionEntry, LayoutBox, ObserverId, ObserverRegistry, Viewport};
use crate::platform::{FormSubmission, PlatformMockState, PlatformOptions, TraceState};
use crate::{Error, Result};

const DISPATCH_RED_ZONE: usize = 128 * 1024;
const DISPATCH_STACK_SIZE: usize = 4 * 1024 * 1024;
const INTERSECTION_PASS_LIMIT: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Complete,
}

/// A parsed document plus the browser surface the page behaviors bind to.
#[derive(Debug)]
pub struct Page {
    pub(crate) dom: Dom,
    listeners: ListenerStore,
    observers: ObserverRegistry,
    layout: HashMap<NodeId, LayoutBox>,
    viewport: Viewport,
    options: PlatformOptions,
    ready_state: ReadyState,
    flushing_intersections: bool,
    intersections_dirty: bool,
    platform_mocks: PlatformMockState,
    trace_state: TraceState,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::with_options(html, PlatformOptions::default())
    }

    pub fn with_options(html: &str, options: PlatformOptions) -> Result<Self> {
        if options.viewport_height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport height must be positive: {}",
                options.viewport_height
            )));
        }
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            observers: ObserverRegistry::default(),
            layout: HashMap::new(),
            viewport: Viewport {
                scroll_top: 0,
                height: options.viewport_height,
            },
            options,
            ready_state: ReadyState::Loading,
            flushing_intersections: false,
            intersections_dirty: false,
            platform_mocks: PlatformMockState::default(),
            trace_state: TraceState::default(),
        })
    }

    pub fn document(&self) -> NodeId {
        self.dom.root
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Finishes parsing: fires `DOMContentLoaded` once, then delivers pending
    /// intersection notifications.
    pub fn complete_loading(&mut self) -> Result<()> {
        if self.ready_state == ReadyState::Complete {
            return Ok(());
        }
        self.ready_state = ReadyState::Complete;
        self.dispatch_event(self.dom.root, "DOMContentLoaded")?;
        self.flush_intersections()
    }

    // ---- DOM access -------------------------------------------------------

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all_from(root, selector)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.dom
            .by_id(id)
            .filter(|node| self.dom.is_connected(*node))
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        self.dom.matches_selector(node, selector)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.closest(node, selector)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.tag_name(node)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.attr(node, name)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> Result<bool> {
        self.dom.has_attr(node, name)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.dom.set_attr(node, name, value)
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.dom.remove_attr(node, name)
    }

    /// `element.dataset[key]` with camelCase keys (`targetId` reads `data-target-id`).
    pub fn dataset(&self, node: NodeId, key: &str) -> Result<Option<String>> {
        self.dom.dataset_get(node, key)
    }

    pub fn class_list(&self, node: NodeId) -> Result<Vec<String>> {
        self.dom.class_list(node)
    }

    pub fn has_class(&self, node: NodeId, class_name: &str) -> Result<bool> {
        self.dom.class_contains(node, class_name)
    }

    pub fn add_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_add(node, class_name)
    }

    pub fn remove_class(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_remove(node, class_name)
    }

    /// Returns whether the class is present afterwards.
    pub fn toggle_class(&mut self, node: NodeId, class_name: &str) -> Result<bool> {
        self.dom.class_toggle(node, class_name)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.dom.text_content(node)
    }

    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.dom.set_text_content(node, text)
    }

    pub fn value(&self, node: NodeId) -> Result<String> {
        self.dom.value(node)
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.dom.set_value(node, value)
    }

    // ---- events -----------------------------------------------------------

    pub fn add_event_listener<F>(
        &mut self,
        node: NodeId,
        event_type: &str,
        capture: bool,
        handler: F,
    ) -> Result<ListenerId>
    where
        F: Fn(&mut Page, &mut EventState) -> Result<()> + 'static,
    {
        if !self.dom.is_valid_node(node) {
            return Err(Error::Dom(format!(
                "addEventListener target node-{} does not exist",
                node.0
            )));
        }
        Ok(self
            .listeners
            .add(node, event_type, capture, Rc::new(handler)))
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.count(node, event_type)
    }

    /// Dispatches a bubbling event through capture, target and bubble phases.
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        if !self.dom.is_valid_node(target) {
            return Err(Error::Dom(format!(
                "dispatchEvent target node-{} does not exist",
                target.0
            )));
        }
        stacker::maybe_grow(DISPATCH_RED_ZONE, DISPATCH_STACK_SIZE, || {
            self.dispatch_event_inner(target, event_type)
        })
    }

    fn dispatch_event_inner(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();

        event.phase = EventPhase::Capturing;
        for node in &path {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        event.phase = EventPhase::AtTarget;
        event.current_target = target;
        self.invoke_listeners(target, &mut event, true)?;
        if !event.propagation_stopped {
            self.invoke_listeners(target, &mut event, false)?;
        }
        if event.propagation_stopped {
            self.trace_event_done(&event, "propagation_stopped");
            return Ok(event);
        }

        event.phase = EventPhase::Bubbling;
        for node in path.iter().rev() {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, false)?;
            if event.propagation_stopped {
                self.trace_event_done(&event, "propagation_stopped");
                return Ok(event);
            }
        }

        self.trace_event_done(&event, "completed");
        Ok(event)
    }

    fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        // Snapshot: listeners added by a handler only see later dispatches.
        let listeners = self.listeners.get(node_id, &event.event_type, capture);
        for listener in listeners {
            if self.trace_state.wants(self.trace_state.events) {
                let phase = if capture { "capture" } else { "bubble" };
                let line = format!(
                    "[event] {} target={} current={} phase={} default_prevented={}",
                    event.event_type,
                    self.trace_node_label(event.target),
                    self.trace_node_label(event.current_target),
                    phase,
                    event.default_prevented
                );
                self.trace_event_line(line);
            }
            (listener.handler)(self, event)?;
            if event.immediate_propagation_stopped {
                break;
            }
        }
        Ok(())
    }

    // ---- user actions -----------------------------------------------------

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        if self.is_input_of_type(target, "checkbox") {
            let current = self.dom.checked(target)?;
            self.dom.set_checked(target, !current)?;
            self.dispatch_event(target, "input")?;
            self.dispatch_event(target, "change")?;
        }

        if self.is_submit_control(target) {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.submit_form(form)?;
            }
        }

        Ok(())
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    /// Submits the form matched by `selector`, or the form owning the match.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self.dom.is_tag(target, "form") {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "form")
        };
        match form {
            Some(form) => self.submit_form(form),
            None => Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form descendant".into(),
                actual: self.dom.tag_name(target).unwrap_or_default().to_string(),
            }),
        }
    }

    fn submit_form(&mut self, form: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(form, "submit")?;
        if outcome.default_prevented {
            return Ok(());
        }
        let submission = FormSubmission {
            form_id: self.dom.attr(form, "id"),
            entries: self.form_entries(form)?,
        };
        if self.trace_state.wants(self.trace_state.events) {
            let line = format!(
                "[event] form submitted {} entries={}",
                self.trace_node_label(form),
                submission.entries.len()
            );
            self.trace_event_line(line);
        }
        self.platform_mocks.form_submissions.push(submission);
        Ok(())
    }

    fn form_entries(&self, form: NodeId) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for control in self.dom.query_selector_all_from(form, "input,select,textarea")? {
            if self.dom.disabled(control) {
                continue;
            }
            let name = self.dom.attr(control, "name").unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            let kind = self
                .dom
                .attr(control, "type")
                .unwrap_or_default()
                .to_ascii_lowercase();
            if self.dom.is_tag(control, "input") {
                if matches!(
                    kind.as_str(),
                    "button" | "submit" | "reset" | "file" | "image"
                ) {
                    continue;
                }
                if (kind == "checkbox" || kind == "radio") && !self.dom.checked(control)? {
                    continue;
                }
            }
            out.push((name, self.dom.value(control)?));
        }
        Ok(out)
    }

    fn is_input_of_type(&self, node: NodeId, kind: &str) -> bool {
        self.dom.is_tag(node, "input")
            && self
                .dom
                .attr(node, "type")
                .is_some_and(|value| value.eq_ignore_ascii_case(kind))
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        if self.dom.is_tag(node, "button") {
            // Missing, empty and unknown types all default to submit.
            return self.dom.attr(node, "type").is_none_or(|kind| {
                !kind.eq_ignore_ascii_case("button") && !kind.eq_ignore_ascii_case("reset")
            });
        }
        self.is_input_of_type(node, "submit")
    }

    // ---- intersection observers -------------------------------------------

    pub fn supports_intersection_observer(&self) -> bool {
        self.options.intersection_observer
    }

    /// Returns `None` when the environment has no `IntersectionObserver`.
    pub fn create_intersection_observer<F>(&mut self, callback: F) -> Option<ObserverId>
    where
        F: Fn(&mut Page, &[IntersectionEntry], ObserverId) -> Result<()> + 'static,
    {
        if !self.options.intersection_observer {
            return None;
        }
        Some(self.observers.create(Rc::new(callback)))
    }

    /// Starts observing `target`; its first report arrives on the next flush.
    pub fn observe(&mut self, observer: ObserverId, target: NodeId) -> Result<()> {
        if self.dom.element(target).is_none() {
            return Err(Error::Dom("observe target is not an element".into()));
        }
        if self.observers.observe(observer, target)? {
            self.intersections_dirty = true;
        }
        Ok(())
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) -> Result<bool> {
        let removed = self.observers.unobserve(observer, target)?;
        if removed && self.trace_state.wants(self.trace_state.observers) {
            let line = format!(
                "[observer] unobserve observer={observer:?} target={}",
                self.trace_node_label(target)
            );
            self.trace_observer_line(line);
        }
        Ok(removed)
    }

    pub fn disconnect(&mut self, observer: ObserverId) -> Result<()> {
        self.observers.disconnect(observer)
    }

    pub fn observed_targets(&self, observer: ObserverId) -> Vec<NodeId> {
        self.observers.observed_targets(observer)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_to(&mut self, scroll_top: i64) -> Result<()> {
        self.viewport.scroll_top = scroll_top.max(0);
        self.flush_intersections()
    }

    pub fn set_viewport_height(&mut self, height: i64) -> Result<()> {
        if height <= 0 {
            return Err(Error::InvalidConfig(format!(
                "viewport height must be positive: {height}"
            )));
        }
        self.viewport.height = height;
        self.flush_intersections()
    }

    pub fn set_layout_box(&mut self, selector: &str, layout: LayoutBox) -> Result<()> {
        let target = self.select_one(selector)?;
        self.set_node_layout_box(target, layout)
    }

    pub fn set_node_layout_box(&mut self, node: NodeId, layout: LayoutBox) -> Result<()> {
        if self.dom.element(node).is_none() {
            return Err(Error::Dom("layout target is not an element".into()));
        }
        self.layout.insert(node, layout);
        self.flush_intersections()
    }

    /// Elements without a layout box are not rendered and never intersect.
    pub fn is_intersecting(&self, node: NodeId) -> bool {
        node_intersects(&self.dom, &self.layout, self.viewport, node)
    }

    /// Delivers one batch per observer for targets whose intersection state
    /// changed since it was last reported.
    pub fn flush_intersections(&mut self) -> Result<()> {
        if self.flushing_intersections {
            self.intersections_dirty = true;
            return Ok(());
        }
        self.flushing_intersections = true;
        let result = self.run_intersection_passes();
        self.flushing_intersections = false;
        result
    }

    fn run_intersection_passes(&mut self) -> Result<()> {
        for _ in 0..INTERSECTION_PASS_LIMIT {
            self.intersections_dirty = false;
            let mut index = 0;
            while index < self.observers.len() {
                let dom = &self.dom;
                let layout = &self.layout;
                let viewport = self.viewport;
                let changes = self
                    .observers
                    .take_changes(index, |node| node_intersects(dom, layout, viewport, node));
                if let Some((observer, callback, entries)) = changes {
                    if self.trace_state.wants(self.trace_state.observers) {
                        let targets = entries
                            .iter()
                            .map(|entry| {
                                format!(
                                    "{}:{}",
                                    self.trace_node_label(entry.target),
                                    entry.is_intersecting
                                )
                            })
                            .collect::<Vec<_>>()
                            .join(",");
                        let line = format!(
                            "[observer] deliver observer={observer:?} entries=[{targets}]"
                        );
                        self.trace_observer_line(line);
                    }
                    callback(self, &entries, observer)?;
                }
                index += 1;
            }
            if !self.intersections_dirty {
                return Ok(());
            }
        }
        Err(Error::Handler(format!(
            "intersection notifications did not settle after {INTERSECTION_PASS_LIMIT} passes"
        )))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.flush_intersections()
    }

    // ---- platform mocks ---------------------------------------------------

    /// Records a blocking `alert()`; the simulated user dismisses it at once.
    pub fn alert(&mut self, message: &str) {
        if self.trace_state.wants(true) {
            self.trace_state
                .record(format!("[alert] {message}"), true);
        }
        self.platform_mocks.alert_messages.push(message.to_string());
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.platform_mocks.alert_messages)
    }

    pub fn take_form_submissions(&mut self) -> Vec<FormSubmission> {
        std::mem::take(&mut self.platform_mocks.form_submissions)
    }

    // ---- tracing ----------------------------------------------------------

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_observers(&mut self, enabled: bool) {
        self.trace_state.observers = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > max_entries {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace_state.logs.drain(..).collect()
    }

    fn trace_event_done(&mut self, event: &EventState, outcome: &str) {
        if !self.trace_state.wants(self.trace_state.events) {
            return;
        }
        let line = format!(
            "[event] done {} target={} outcome={} default_prevented={}",
            event.event_type,
            self.trace_node_label(event.target),
            outcome,
            event.default_prevented
        );
        self.trace_event_line(line);
    }

    fn trace_event_line(&mut self, line: String) {
        let events = self.trace_state.events;
        self.trace_state.record(line, events);
    }

    fn trace_observer_line(&mut self, line: String) {
        let observers = self.trace_state.observers;
        self.trace_state.record(line, observers);
    }

    pub(crate) fn trace_behavior_line(&mut self, line: String) {
        self.trace_state.record(line, true);
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        if node == self.dom.root {
            return "#document".into();
        }
        if let Some(id) = self.dom.attr(node, "id").filter(|id| !id.is_empty()) {
            return format!("#{id}");
        }
        self.dom
            .tag_name(node)
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("node-{}", node.0))
    }

    // ---- assertions -------------------------------------------------------

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected, actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check(selector, target, expected, actual)
    }

    /// `None` asserts the attribute is absent.
    pub fn assert_attribute(
        &self,
        selector: &str,
        name: &str,
        expected: Option<&str>,
    ) -> Result<()> {
        let target = self.select_one(selector)?;
        let describe = |value: Option<&str>| match value {
            Some(value) => format!("{name}={value:?}"),
            None => format!("no {name}"),
        };
        let actual = self.dom.attr(target, name);
        self.check(
            selector,
            target,
            &describe(expected),
            describe(actual.as_deref()),
        )
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        self.check(
            selector,
            target,
            &format!("{class_name}={expected}"),
            format!("{class_name}={actual}"),
        )
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector).map(|_| ())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: String) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: truncate_chars(&self.dom.dump_node(target), 200),
            });
        }
        Ok(())
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }
}

fn node_intersects(
    dom: &Dom,
    layout: &HashMap<NodeId, LayoutBox>,
    viewport: Viewport,
    node: NodeId,
) -> bool {
    dom.is_connected(node)
        && layout
            .get(&node)
            .is_some_and(|layout| viewport.intersects(layout))
}
