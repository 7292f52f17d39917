use super::*;

const SIGNUP_FORM: &str = r#"
<form id="signup" action="/signup">
  <input id="name" name="name" required>
  <input id="nickname" name="nickname">
  <button id="send">Send</button>
</form>
"#;

const MESSAGE: &str = "Please fill out all required fields.";

fn bound_page(html: &str) -> Result<Page> {
    let mut page = Page::from_html(html)?;
    behaviors::install(&mut page, &BehaviorConfig::default())?;
    page.complete_loading()?;
    Ok(page)
}

#[test]
fn empty_required_field_blocks_submission_with_one_alert() -> Result<()> {
    let mut page = bound_page(SIGNUP_FORM)?;

    page.submit("#signup")?;
    page.assert_class("#name", "is-invalid", true)?;
    page.assert_class("#name", "is-valid", false)?;
    assert_eq!(page.take_alert_messages(), vec![MESSAGE]);
    assert!(page.take_form_submissions().is_empty());
    Ok(())
}

#[test]
fn filled_required_field_lets_submission_through() -> Result<()> {
    let mut page = bound_page(SIGNUP_FORM)?;

    page.type_text("#name", "abc")?;
    page.click("#send")?;
    page.assert_class("#name", "is-valid", true)?;
    page.assert_class("#name", "is-invalid", false)?;
    assert!(page.take_alert_messages().is_empty());

    let submissions = page.take_form_submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].form_id.as_deref(), Some("signup"));
    assert_eq!(
        submissions[0].entries,
        vec![
            ("name".to_string(), "abc".to_string()),
            ("nickname".to_string(), String::new()),
        ]
    );
    Ok(())
}

#[test]
fn optional_fields_are_never_marked() -> Result<()> {
    let mut page = bound_page(SIGNUP_FORM)?;
    page.submit("#signup")?;
    let nickname = page.get_element_by_id("nickname").expect("field exists");
    assert!(page.class_list(nickname)?.is_empty());
    Ok(())
}

#[test]
fn whitespace_only_values_count_as_empty() -> Result<()> {
    let mut page = bound_page(SIGNUP_FORM)?;
    page.type_text("#name", " \t\n ")?;
    page.submit("#signup")?;
    page.assert_class("#name", "is-invalid", true)?;
    assert_eq!(page.take_alert_messages().len(), 1);

    assert!(behaviors::validation::is_blank("\u{FEFF} \u{3000}"));
    assert!(!behaviors::validation::is_blank(" a "));
    Ok(())
}

#[test]
fn markers_are_recomputed_on_every_submit() -> Result<()> {
    let mut page = bound_page(SIGNUP_FORM)?;

    page.submit("#signup")?;
    page.assert_class("#name", "is-invalid", true)?;

    page.type_text("#name", "Ada")?;
    page.submit("#signup")?;
    page.assert_class("#name", "is-valid", true)?;
    page.assert_class("#name", "is-invalid", false)?;

    page.type_text("#name", "")?;
    page.submit("#signup")?;
    page.assert_class("#name", "is-invalid", true)?;
    page.assert_class("#name", "is-valid", false)?;

    assert_eq!(page.take_alert_messages(), vec![MESSAGE, MESSAGE]);
    assert_eq!(page.take_form_submissions().len(), 1);
    Ok(())
}

#[test]
fn one_alert_per_submit_regardless_of_invalid_count() -> Result<()> {
    let mut page = bound_page(
        r#"
        <form id="f">
          <input id="a" required>
          <textarea id="b" required>  </textarea>
          <select id="c" required><option value="">Pick</option></select>
          <input id="d" required value="ok">
        </form>
        "#,
    )?;
    page.submit("#f")?;
    assert_eq!(page.take_alert_messages(), vec![MESSAGE]);
    page.assert_class("#a", "is-invalid", true)?;
    page.assert_class("#b", "is-invalid", true)?;
    page.assert_class("#d", "is-valid", true)?;
    Ok(())
}

#[test]
fn validate_required_fields_is_idempotent() -> Result<()> {
    let mut page = Page::from_html(
        r#"<form id="f"><input id="a" required class="wide"><input id="b" required value="x"></form>"#,
    )?;
    let form = page.get_element_by_id("f").expect("form exists");
    let config = BehaviorConfig::default();

    let first = behaviors::validation::validate_required_fields(&mut page, form, &config)?;
    let snapshot = page.dump_dom("#f")?;
    let second = behaviors::validation::validate_required_fields(&mut page, form, &config)?;

    assert_eq!(first, second);
    assert_eq!(first.checked, 2);
    assert!(!first.is_valid());
    assert_eq!(first.invalid, vec![page.get_element_by_id("a").expect("a exists")]);
    assert_eq!(page.dump_dom("#f")?, snapshot);
    let a = page.get_element_by_id("a").expect("a exists");
    assert_eq!(page.class_list(a)?, vec!["wide", "is-invalid"]);
    Ok(())
}

#[test]
fn each_form_validates_only_its_own_fields() -> Result<()> {
    let mut page = bound_page(
        r#"
        <form id="first"><input id="one" required></form>
        <form id="second"><input id="two" required value="filled"></form>
        "#,
    )?;

    page.submit("#second")?;
    page.assert_class("#two", "is-valid", true)?;
    page.assert_class("#one", "is-invalid", false)?;
    assert!(page.take_alert_messages().is_empty());
    assert_eq!(page.take_form_submissions().len(), 1);

    page.submit("#first")?;
    page.assert_class("#one", "is-invalid", true)?;
    assert_eq!(page.take_alert_messages(), vec![MESSAGE]);
    Ok(())
}

#[test]
fn form_without_required_fields_always_submits() -> Result<()> {
    let mut page = bound_page(r#"<form id="f"><input name="q"></form>"#)?;
    page.submit("#f")?;
    assert!(page.take_alert_messages().is_empty());
    assert_eq!(page.take_form_submissions().len(), 1);
    Ok(())
}

#[test]
fn custom_classes_and_message_are_used() -> Result<()> {
    let config = BehaviorConfig::default()
        .with_validity_classes("ok", "bad")
        .with_validation_message("Fill everything in.");
    let mut page = Page::from_html(r#"<form id="f"><input id="a" required></form>"#)?;
    behaviors::install(&mut page, &config)?;
    page.complete_loading()?;

    page.submit("#f")?;
    page.assert_class("#a", "bad", true)?;
    page.assert_class("#a", "is-invalid", false)?;
    assert_eq!(page.take_alert_messages(), vec!["Fill everything in."]);
    Ok(())
}

#[test]
fn required_select_reads_its_selected_option() -> Result<()> {
    let mut page = bound_page(
        r#"
        <form id="f">
          <select id="country" name="country" required>
            <option value="">Choose</option>
            <option value="us" selected>United States</option>
          </select>
          <select id="size" name="size" required>
            <option>Small</option>
            <option>Large</option>
          </select>
        </form>
        "#,
    )?;

    page.submit("#f")?;
    assert!(page.take_alert_messages().is_empty());
    page.assert_class("#country", "is-valid", true)?;
    page.assert_class("#size", "is-valid", true)?;
    let submissions = page.take_form_submissions();
    assert_eq!(
        submissions[0].entries,
        vec![
            ("country".to_string(), "us".to_string()),
            ("size".to_string(), "Small".to_string()),
        ]
    );
    Ok(())
}

#[test]
fn required_select_on_placeholder_option_is_invalid() -> Result<()> {
    let mut page = bound_page(
        r#"
        <form id="f">
          <select id="country" required>
            <option value="">Choose</option>
            <option value="us">United States</option>
          </select>
        </form>
        "#,
    )?;
    page.submit("#f")?;
    page.assert_class("#country", "is-invalid", true)?;
    assert_eq!(page.take_alert_messages(), vec![MESSAGE]);

    let country = page.get_element_by_id("country").expect("select exists");
    page.set_value(country, "us")?;
    page.submit("#f")?;
    page.assert_class("#country", "is-valid", true)?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn required_checkbox_without_value_attribute_reads_on() -> Result<()> {
    let mut page = bound_page(
        r#"<form id="f"><input id="terms" name="terms" type="checkbox" required></form>"#,
    )?;
    page.click("#terms")?;
    page.assert_value("#terms", "on")?;

    page.submit("#f")?;
    assert!(page.take_alert_messages().is_empty());
    page.assert_class("#terms", "is-valid", true)?;
    assert_eq!(
        page.take_form_submissions()[0].entries,
        vec![("terms".to_string(), "on".to_string())]
    );
    Ok(())
}

#[test]
fn next_line_character_is_not_trimmed() -> Result<()> {
    assert!(!behaviors::validation::is_blank("\u{85}"));
    assert!(behaviors::validation::is_blank("\u{2028}\u{00A0}\u{205F}\u{FEFF}"));

    let mut page = bound_page(SIGNUP_FORM)?;
    page.type_text("#name", "\u{85}")?;
    page.submit("#signup")?;
    page.assert_class("#name", "is-valid", true)?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}
