use std::rc::Rc;

use crate::{BehaviorConfig, NodeId, Page, Result};

/// Binds every password visibility toggle whose target input exists.
/// Returns how many toggles were bound.
pub fn bind(page: &mut Page, config: &BehaviorConfig) -> Result<usize> {
    let toggles = page.query_selector_all(&config.password_toggle_selector)?;
    let config = Rc::new(config.clone());
    let mut bound = 0;

    for toggle in toggles {
        let target_id = page
            .dataset(toggle, &config.password_target_key)?
            .unwrap_or_default();
        if page.get_element_by_id(&target_id).is_none() {
            page.trace_behavior_line(format!(
                "[behavior] password toggle {} skipped: no target #{target_id}",
                page.trace_node_label(toggle)
            ));
            continue;
        }

        let config = Rc::clone(&config);
        page.add_event_listener(toggle, "click", false, move |page, _event| {
            // Resolved per click, so a target removed later is skipped.
            let Some(target) = page.get_element_by_id(&target_id) else {
                return Ok(());
            };
            toggle_visibility(page, toggle, target, &config)?;
            Ok(())
        })?;
        bound += 1;
    }

    Ok(bound)
}

/// Flips `target` between masked and plain text and relabels `toggle`.
/// Returns whether the input is masked afterwards.
pub fn toggle_visibility(
    page: &mut Page,
    toggle: NodeId,
    target: NodeId,
    config: &BehaviorConfig,
) -> Result<bool> {
    let masked = page
        .attribute(target, "type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("password"));

    let (next_type, label) = if masked {
        ("text", &config.hide_label)
    } else {
        ("password", &config.show_label)
    };
    page.set_attribute(target, "type", next_type)?;
    page.set_text_content(toggle, label)?;
    Ok(!masked)
}
