use crate::behaviors::{BindingReport, LazyImageBinding, LazyLoadMode};

use super::*;

const FULL_PAGE: &str = r#"
<header>
  <button class="menu-toggle">Menu</button>
  <nav><ul><li>Home</li></ul></nav>
</header>
<form id="login">
  <input id="pw" type="password" required>
  <button type="button" class="password-toggle" data-target="pw">Show</button>
</form>
<form id="search"><input name="q"></form>
<img class="lazy" data-src="a.jpg"><img class="lazy" data-src="b.jpg">
"#;

#[test]
fn install_waits_for_dom_content_loaded() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    assert_eq!(page.ready_state(), ReadyState::Loading);
    behaviors::install(&mut page, &BehaviorConfig::default())?;

    page.click(".menu-toggle")?;
    page.assert_class("header nav ul", "open", false)?;
    page.submit("#login")?;
    assert!(page.take_alert_messages().is_empty());

    page.complete_loading()?;
    assert_eq!(page.ready_state(), ReadyState::Complete);
    page.click(".menu-toggle")?;
    page.assert_class("header nav ul", "open", true)?;
    page.submit("#login")?;
    assert_eq!(page.take_alert_messages().len(), 1);
    Ok(())
}

#[test]
fn install_on_a_loaded_page_binds_immediately() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    page.complete_loading()?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;

    page.click(".menu-toggle")?;
    page.assert_class("header nav ul", "open", true)?;
    Ok(())
}

#[test]
fn install_from_a_dom_content_loaded_handler_binds_at_once() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    let document = page.document();
    page.add_event_listener(document, "DOMContentLoaded", false, |page, _event| {
        behaviors::install(page, &BehaviorConfig::default())
    })?;
    page.complete_loading()?;

    page.click(".menu-toggle")?;
    page.assert_class("header nav ul", "open", true)?;
    Ok(())
}

#[test]
fn bind_all_reports_what_was_attached() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    let report = behaviors::bind_all(&mut page, &BehaviorConfig::default())?;
    let LazyLoadMode::Observed(observer) = report.lazy_images.mode else {
        panic!("observer capability is on by default");
    };
    assert_eq!(
        report,
        BindingReport {
            menu_bound: true,
            password_toggles: 1,
            forms: 2,
            lazy_images: LazyImageBinding {
                mode: LazyLoadMode::Observed(observer),
                images: 2,
            },
        }
    );
    assert_eq!(page.observed_targets(observer).len(), 2);
    Ok(())
}

#[test]
fn bind_all_on_a_bare_page_attaches_nothing() -> Result<()> {
    let mut page = Page::with_options(
        "<p>Nothing interactive here</p>",
        PlatformOptions::default().without_intersection_observer(),
    )?;
    let report = behaviors::bind_all(&mut page, &BehaviorConfig::default())?;
    assert_eq!(
        report,
        BindingReport {
            menu_bound: false,
            password_toggles: 0,
            forms: 0,
            lazy_images: LazyImageBinding {
                mode: LazyLoadMode::Eager,
                images: 0,
            },
        }
    );
    Ok(())
}

#[test]
fn default_config_is_valid() -> Result<()> {
    let config = BehaviorConfig::default();
    config.validate()?;
    assert_eq!(config.menu_toggle_selector, ".menu-toggle");
    assert_eq!(config.nav_menu_selector, "header nav ul");
    assert_eq!(config.validation_message, "Please fill out all required fields.");
    assert_eq!(config.deferred_source_key, "src");
    Ok(())
}

#[test]
fn invalid_config_is_rejected_before_binding() -> Result<()> {
    let cases = [
        BehaviorConfig::default().with_form_selector(" "),
        BehaviorConfig::default().with_open_class(""),
        BehaviorConfig::default().with_open_class("is open"),
        BehaviorConfig::default().with_validity_classes("same", "same"),
        BehaviorConfig::default().with_password_labels("", "Hide"),
        BehaviorConfig {
            deferred_source_key: String::new(),
            ..BehaviorConfig::default()
        },
    ];

    for config in cases {
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        let mut page = Page::from_html(FULL_PAGE)?;
        let document = page.document();
        assert!(matches!(
            behaviors::install(&mut page, &config),
            Err(Error::InvalidConfig(_))
        ));
        assert_eq!(page.listener_count(document, "DOMContentLoaded"), 0);
    }
    Ok(())
}

#[test]
fn unsupported_selector_in_config_surfaces_on_bind() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    page.complete_loading()?;
    let config = BehaviorConfig::default().with_form_selector("form:hover");
    assert!(matches!(
        behaviors::install(&mut page, &config),
        Err(Error::UnsupportedSelector(_))
    ));
    Ok(())
}

#[test]
fn trace_log_records_behavior_and_event_lines() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    page.submit("#login")?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.contains("install deferred")));
    assert!(logs
        .iter()
        .any(|line| line.starts_with("[behavior] bound menu=true password_toggles=1 forms=2")));
    assert!(logs.iter().any(|line| line == "[alert] Please fill out all required fields."));
    assert!(logs
        .iter()
        .any(|line| line.starts_with("[event] done submit target=#login")));
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn trace_categories_and_limit_are_honored() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);
    page.set_trace_events(false);
    page.set_trace_observers(false);
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    page.click(".menu-toggle")?;

    let logs = page.take_trace_logs();
    assert!(!logs.is_empty());
    assert!(logs.iter().all(|line| line.starts_with("[behavior]")));

    assert!(matches!(
        page.set_trace_log_limit(0),
        Err(Error::InvalidConfig(_))
    ));
    page.set_trace_log_limit(2)?;
    for _ in 0..5 {
        page.click(".menu-toggle")?;
    }
    assert_eq!(
        page.take_trace_logs(),
        vec!["[behavior] menu open=true", "[behavior] menu open=false"]
    );
    Ok(())
}

#[test]
fn trace_is_off_by_default() -> Result<()> {
    let mut page = Page::from_html(FULL_PAGE)?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    page.click(".menu-toggle")?;
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}
