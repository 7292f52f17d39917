use std::collections::VecDeque;

use crate::observer::DEFAULT_VIEWPORT_HEIGHT;

/// Capabilities and screen settings of the simulated browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformOptions {
    /// Whether `IntersectionObserver` exists in the environment.
    pub intersection_observer: bool,
    pub viewport_height: i64,
}

impl Default for PlatformOptions {
    fn default() -> Self {
        Self {
            intersection_observer: true,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl PlatformOptions {
    pub fn without_intersection_observer(mut self) -> Self {
        self.intersection_observer = false;
        self
    }

    pub fn with_viewport_height(mut self, height: i64) -> Self {
        self.viewport_height = height;
        self
    }
}

/// A form submission that was allowed to proceed natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub form_id: Option<String>,
    pub entries: Vec<(String, String)>,
}

#[derive(Debug, Default)]
pub(crate) struct PlatformMockState {
    pub(crate) alert_messages: Vec<String>,
    pub(crate) form_submissions: Vec<FormSubmission>,
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) observers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            observers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

impl TraceState {
    /// Forwards `line` to `tracing` and, when tracing of its category is on,
    /// keeps it in the in-memory log.
    pub(crate) fn record(&mut self, line: String, category_enabled: bool) {
        tracing::debug!(target: "page_behaviors::trace", "{line}");
        if !(self.enabled && category_enabled) {
            return;
        }
        if self.to_stderr {
            eprintln!("{line}");
        }
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn wants(&self, category_enabled: bool) -> bool {
        (self.enabled && category_enabled)
            || tracing::enabled!(target: "page_behaviors::trace", tracing::Level::DEBUG)
    }
}
