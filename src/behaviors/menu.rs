use crate::{BehaviorConfig, Page, Result};

/// Binds the navigation menu toggle. Returns `false`, binding nothing, when
/// either the toggle control or the menu is missing.
pub fn bind(page: &mut Page, config: &BehaviorConfig) -> Result<bool> {
    let toggle = page.query_selector(&config.menu_toggle_selector)?;
    let menu = page.query_selector(&config.nav_menu_selector)?;
    let (Some(toggle), Some(menu)) = (toggle, menu) else {
        page.trace_behavior_line(format!(
            "[behavior] menu skipped toggle_found={} menu_found={}",
            toggle.is_some(),
            menu.is_some()
        ));
        return Ok(false);
    };

    let open_class = config.open_class.clone();
    page.add_event_listener(toggle, "click", false, move |page, _event| {
        let open = page.toggle_class(menu, &open_class)?;
        page.trace_behavior_line(format!("[behavior] menu open={open}"));
        Ok(())
    })?;
    Ok(true)
}
