//! The four page behaviors and the bootstrapper that wires them up.
//!
//! Behaviors keep no state of their own: everything they track lives on the
//! DOM as marker classes, attributes and text.

use crate::{BehaviorConfig, Page, ReadyState, Result};

pub mod lazy_images;
pub mod menu;
pub mod password;
pub mod validation;

pub use lazy_images::{LazyImageBinding, LazyLoadMode};
pub use validation::FormValidation;

/// What [`bind_all`] attached to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingReport {
    pub menu_bound: bool,
    pub password_toggles: usize,
    pub forms: usize,
    pub lazy_images: LazyImageBinding,
}

/// Installs the page behaviors once the document is ready.
///
/// On a page that is still loading this registers a `DOMContentLoaded`
/// listener; on a completed page it binds immediately.
pub fn install(page: &mut Page, config: &BehaviorConfig) -> Result<()> {
    config.validate()?;
    if page.ready_state() == ReadyState::Complete {
        bind_all(page, config)?;
        return Ok(());
    }

    let config = config.clone();
    let document = page.document();
    page.add_event_listener(document, "DOMContentLoaded", false, move |page, _event| {
        bind_all(page, &config).map(|_| ())
    })?;
    page.trace_behavior_line("[behavior] install deferred until DOMContentLoaded".into());
    Ok(())
}

/// Binds every behavior against the elements present right now.
pub fn bind_all(page: &mut Page, config: &BehaviorConfig) -> Result<BindingReport> {
    config.validate()?;
    let report = BindingReport {
        menu_bound: menu::bind(page, config)?,
        password_toggles: password::bind(page, config)?,
        forms: validation::bind(page, config)?,
        lazy_images: lazy_images::bind(page, config)?,
    };

    tracing::info!(
        menu = report.menu_bound,
        password_toggles = report.password_toggles,
        forms = report.forms,
        lazy_images = report.lazy_images.images,
        observed = matches!(report.lazy_images.mode, LazyLoadMode::Observed(_)),
        "page behaviors bound"
    );
    page.trace_behavior_line(format!(
        "[behavior] bound menu={} password_toggles={} forms={} lazy_images={} mode={:?}",
        report.menu_bound,
        report.password_toggles,
        report.forms,
        report.lazy_images.images,
        report.lazy_images.mode
    ));
    Ok(report)
}
