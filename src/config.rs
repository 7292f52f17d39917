use crate::{Error, Result};

/// Markup contract of the page behaviors: which elements they bind to, the
/// marker classes they flip, and the strings they show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorConfig {
    pub menu_toggle_selector: String,
    pub nav_menu_selector: String,
    pub open_class: String,

    pub password_toggle_selector: String,
    /// Dataset key on the toggle naming the target input's id.
    pub password_target_key: String,
    pub show_label: String,
    pub hide_label: String,

    pub form_selector: String,
    pub required_selector: String,
    pub valid_class: String,
    pub invalid_class: String,
    pub validation_message: String,

    pub lazy_image_selector: String,
    pub lazy_class: String,
    /// Dataset key holding the deferred image source.
    pub deferred_source_key: String,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            menu_toggle_selector: ".menu-toggle".into(),
            nav_menu_selector: "header nav ul".into(),
            open_class: "open".into(),
            password_toggle_selector: ".password-toggle".into(),
            password_target_key: "target".into(),
            show_label: "Show".into(),
            hide_label: "Hide".into(),
            form_selector: "form".into(),
            required_selector: "[required]".into(),
            valid_class: "is-valid".into(),
            invalid_class: "is-invalid".into(),
            validation_message: "Please fill out all required fields.".into(),
            lazy_image_selector: "img.lazy".into(),
            lazy_class: "lazy".into(),
            deferred_source_key: "src".into(),
        }
    }
}

impl BehaviorConfig {
    pub fn with_menu(mut self, toggle_selector: &str, menu_selector: &str) -> Self {
        self.menu_toggle_selector = toggle_selector.into();
        self.nav_menu_selector = menu_selector.into();
        self
    }

    pub fn with_open_class(mut self, class_name: &str) -> Self {
        self.open_class = class_name.into();
        self
    }

    pub fn with_password_toggle_selector(mut self, selector: &str) -> Self {
        self.password_toggle_selector = selector.into();
        self
    }

    pub fn with_password_labels(mut self, show: &str, hide: &str) -> Self {
        self.show_label = show.into();
        self.hide_label = hide.into();
        self
    }

    pub fn with_form_selector(mut self, selector: &str) -> Self {
        self.form_selector = selector.into();
        self
    }

    pub fn with_required_selector(mut self, selector: &str) -> Self {
        self.required_selector = selector.into();
        self
    }

    pub fn with_validity_classes(mut self, valid: &str, invalid: &str) -> Self {
        self.valid_class = valid.into();
        self.invalid_class = invalid.into();
        self
    }

    pub fn with_validation_message(mut self, message: &str) -> Self {
        self.validation_message = message.into();
        self
    }

    pub fn with_lazy_images(mut self, selector: &str, marker_class: &str) -> Self {
        self.lazy_image_selector = selector.into();
        self.lazy_class = marker_class.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let selectors = [
            ("menu_toggle_selector", &self.menu_toggle_selector),
            ("nav_menu_selector", &self.nav_menu_selector),
            ("password_toggle_selector", &self.password_toggle_selector),
            ("form_selector", &self.form_selector),
            ("required_selector", &self.required_selector),
            ("lazy_image_selector", &self.lazy_image_selector),
        ];
        for (field, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{field} must not be empty")));
            }
        }

        let classes = [
            ("open_class", &self.open_class),
            ("valid_class", &self.valid_class),
            ("invalid_class", &self.invalid_class),
            ("lazy_class", &self.lazy_class),
        ];
        for (field, class_name) in classes {
            if class_name.is_empty() || class_name.chars().any(char::is_whitespace) {
                return Err(Error::InvalidConfig(format!(
                    "{field} must be a single class token, got {class_name:?}"
                )));
            }
        }
        if self.valid_class == self.invalid_class {
            return Err(Error::InvalidConfig(
                "valid_class and invalid_class must differ".into(),
            ));
        }

        let texts = [
            ("show_label", &self.show_label),
            ("hide_label", &self.hide_label),
            ("password_target_key", &self.password_target_key),
            ("deferred_source_key", &self.deferred_source_key),
        ];
        for (field, text) in texts {
            if text.is_empty() {
                return Err(Error::InvalidConfig(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}
