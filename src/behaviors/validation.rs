use std::rc::Rc;

use crate::{BehaviorConfig, NodeId, Page, Result};

/// Result of one presence check over a form's required fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    pub checked: usize,
    pub invalid: Vec<NodeId>,
}

impl FormValidation {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Binds the required-field check to the submit event of every form.
/// Returns how many forms were bound.
pub fn bind(page: &mut Page, config: &BehaviorConfig) -> Result<usize> {
    let forms = page.query_selector_all(&config.form_selector)?;
    let config = Rc::new(config.clone());

    for form in &forms {
        let config = Rc::clone(&config);
        page.add_event_listener(*form, "submit", false, move |page, event| {
            let outcome = validate_required_fields(page, event.current_target(), &config)?;
            if !outcome.is_valid() {
                event.prevent_default();
                page.alert(&config.validation_message);
            }
            Ok(())
        })?;
    }

    Ok(forms.len())
}

/// Marks every required descendant of `form` valid or invalid by whether its
/// trimmed value is empty. Markers are recomputed from scratch on each call.
pub fn validate_required_fields(
    page: &mut Page,
    form: NodeId,
    config: &BehaviorConfig,
) -> Result<FormValidation> {
    let fields = page.query_selector_all_from(form, &config.required_selector)?;
    let mut outcome = FormValidation {
        checked: fields.len(),
        invalid: Vec::new(),
    };

    for field in fields {
        let value = page.value(field)?;
        if is_blank(&value) {
            page.add_class(field, &config.invalid_class)?;
            page.remove_class(field, &config.valid_class)?;
            outcome.invalid.push(field);
        } else {
            page.add_class(field, &config.valid_class)?;
            page.remove_class(field, &config.invalid_class)?;
        }
    }

    page.trace_behavior_line(format!(
        "[behavior] validate {} checked={} invalid={}",
        page.trace_node_label(form),
        outcome.checked,
        outcome.invalid.len()
    ));
    Ok(outcome)
}

/// Whitespace-only counts as empty, using the same trim set as
/// `String.prototype.trim`.
pub fn is_blank(value: &str) -> bool {
    value.trim_matches(is_trimmable).is_empty()
}

fn is_trimmable(ch: char) -> bool {
    matches!(
        ch,
        '\u{0009}'
            | '\u{000A}'
            | '\u{000B}'
            | '\u{000C}'
            | '\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
