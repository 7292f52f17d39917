use super::*;
use crate::html::parse_html;

#[test]
fn bare_attributes_parse_as_empty_strings() -> Result<()> {
    let dom = parse_html("<input id='a' required disabled>")?;
    let input = dom.by_id("a").expect("input exists");
    assert_eq!(dom.attr(input, "required").as_deref(), Some(""));
    assert!(dom.disabled(input));
    Ok(())
}

#[test]
fn attribute_values_accept_all_quote_styles() -> Result<()> {
    let dom = parse_html(r#"<img id=pic data-src="a.jpg" alt='x y' class=lazy>"#)?;
    let img = dom.by_id("pic").expect("img exists");
    assert_eq!(dom.attr(img, "data-src").as_deref(), Some("a.jpg"));
    assert_eq!(dom.attr(img, "alt").as_deref(), Some("x y"));
    assert_eq!(dom.attr(img, "class").as_deref(), Some("lazy"));
    Ok(())
}

#[test]
fn void_elements_never_take_children() -> Result<()> {
    let dom = parse_html("<div id='d'><img id='i'><span id='s'>t</span></div>")?;
    let span = dom.by_id("s").expect("span exists");
    let div = dom.by_id("d").expect("div exists");
    assert_eq!(dom.parent(span), Some(div));
    Ok(())
}

#[test]
fn unmatched_end_tags_are_ignored() -> Result<()> {
    let dom = parse_html("<div id='d'></span><p id='p'>x</p></div>")?;
    let p = dom.by_id("p").expect("p exists");
    assert_eq!(dom.parent(p), dom.by_id("d"));
    Ok(())
}

#[test]
fn comments_and_doctype_are_skipped() -> Result<()> {
    let dom = parse_html("<!DOCTYPE html><!-- note --><p id='p'>hi</p>")?;
    let p = dom.by_id("p").expect("p exists");
    assert_eq!(dom.text_content(dom.root), "hi");
    assert_eq!(dom.text_content(p), "hi");
    Ok(())
}

#[test]
fn character_references_are_decoded() -> Result<()> {
    let dom = parse_html("<p id='p' title='a&amp;b'>&lt;x&gt; &#65;&#x42; &bogus; &</p>")?;
    let p = dom.by_id("p").expect("p exists");
    assert_eq!(dom.attr(p, "title").as_deref(), Some("a&b"));
    assert_eq!(dom.text_content(p), "<x> AB &bogus; &");
    Ok(())
}

#[test]
fn script_bodies_are_kept_as_inert_text() -> Result<()> {
    let dom = parse_html("<script id='s'>if (a < b) { x(); }</script><p id='p'>after</p>")?;
    let script = dom.by_id("s").expect("script exists");
    assert_eq!(dom.text_content(script), "if (a < b) { x(); }");
    assert!(dom.by_id("p").is_some());
    Ok(())
}

#[test]
fn textarea_value_comes_from_its_text() -> Result<()> {
    let dom = parse_html("<textarea id='t'>  hello &amp; bye</textarea>")?;
    let textarea = dom.by_id("t").expect("textarea exists");
    assert_eq!(dom.value(textarea)?, "  hello & bye");
    Ok(())
}

#[test]
fn lone_less_than_sign_is_text() -> Result<()> {
    let dom = parse_html("<p id='p'>1 < 2</p>")?;
    let p = dom.by_id("p").expect("p exists");
    assert_eq!(dom.text_content(p), "1 < 2");
    Ok(())
}

#[test]
fn malformed_markup_reports_html_parse_errors() {
    let cases = [
        "<!-- never closed",
        "<div id='a'",
        "<input value='open>",
        "<script>let a = 1;",
    ];
    for html in cases {
        match parse_html(html) {
            Err(Error::HtmlParse(_)) => {}
            other => panic!("expected HtmlParse for {html:?}, got {other:?}"),
        }
    }
}

#[test]
fn deeply_nested_markup_does_not_overflow_the_stack() -> Result<()> {
    let depth = 20_000;
    let mut html = String::new();
    for _ in 0..depth {
        html.push_str("<div>");
    }
    html.push_str("<span id='leaf'>deep</span>");
    for _ in 0..depth {
        html.push_str("</div>");
    }

    let page = Page::from_html(&html)?;
    page.assert_text("#leaf", "deep")?;
    assert_eq!(page.query_selector_all("div span")?.len(), 1);
    assert!(page.dump_dom("#leaf")?.contains("deep"));
    Ok(())
}
