//! Page behaviors for a server-rendered site, bound against a deterministic
//! in-process page runtime.
//!
//! The runtime parses markup into a DOM, dispatches events, and simulates the
//! viewport and intersection observers. [`behaviors::install`] wires the four
//! page behaviors (menu toggle, password visibility toggle, required-field
//! validation, lazy images) onto a [`Page`].
//!
//! ```
//! use page_behaviors::{behaviors, BehaviorConfig, Page};
//!
//! let mut page = Page::from_html(
//!     "<form id='f'><input id='name' required></form>",
//! )?;
//! behaviors::install(&mut page, &BehaviorConfig::default())?;
//! page.complete_loading()?;
//!
//! page.submit("#f")?;
//! assert_eq!(page.take_alert_messages(), vec!["Please fill out all required fields."]);
//! page.assert_class("#name", "is-invalid", true)?;
//! # Ok::<(), page_behaviors::Error>(())
//! ```

use std::error::Error as StdError;
use std::fmt;

pub mod behaviors;
mod config;
mod dom;
mod events;
mod html;
mod observer;
mod page;
mod platform;
mod selector;

pub use config::BehaviorConfig;
pub use dom::NodeId;
pub use events::{EventPhase, EventState, ListenerId};
pub use observer::{IntersectionEntry, LayoutBox, ObserverId, Viewport};
pub use page::{Page, ReadyState};
pub use platform::{FormSubmission, PlatformOptions};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    Dom(String),
    Handler(String),
    InvalidConfig(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::Dom(msg) => write!(f, "dom error: {msg}"),
            Self::Handler(msg) => write!(f, "handler error: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

#[cfg(test)]
mod tests;
