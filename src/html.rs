use crate::dom::{Attributes, Dom, NodeId};
use crate::{Error, Result};

pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut stack = vec![dom.root];
    let bytes = html.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        if starts_with_at(bytes, i, b"<!--") {
            let end = find_subslice(bytes, i + 4, b"-->")
                .ok_or_else(|| Error::HtmlParse("unclosed HTML comment".into()))?;
            i = end + 3;
            continue;
        }

        if starts_with_at(bytes, i, b"<!") {
            // Doctype and other declarations carry nothing for the DOM.
            let end = find_subslice(bytes, i, b">")
                .ok_or_else(|| Error::HtmlParse("unclosed declaration".into()))?;
            i = end + 1;
            continue;
        }

        if bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'/') {
            if starts_with_at(bytes, i, b"</") {
                let (tag, next) = parse_end_tag(html, i)?;
                i = next;
                close_element(&dom, &mut stack, &tag);
                continue;
            }

            let (tag, attrs, self_closing, next) = parse_start_tag(html, i)?;
            i = next;

            let parent = current_parent(&stack)?;
            let node = dom.create_element(parent, tag.clone(), attrs);

            if is_raw_text_tag(&tag) {
                let close = find_case_insensitive_end_tag(bytes, i, tag.as_bytes())
                    .ok_or_else(|| Error::HtmlParse(format!("unclosed <{tag}>")))?;
                if let Some(body) = html.get(i..close).filter(|body| !body.is_empty()) {
                    let text = if matches!(tag.as_str(), "textarea" | "title") {
                        decode_html_character_references(body)
                    } else {
                        body.to_string()
                    };
                    dom.create_text(node, text);
                }
                let (_, after_end) = parse_end_tag(html, close)?;
                i = after_end;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        let text_start = i;
        i += 1;
        while i < bytes.len() && bytes[i] != b'<' {
            i += 1;
        }

        if let Some(text) = html.get(text_start..i).filter(|text| !text.is_empty()) {
            let parent = current_parent(&stack)?;
            dom.create_text(parent, decode_html_character_references(text));
        }
    }

    dom.initialize_form_control_values()?;
    Ok(dom)
}

fn current_parent(stack: &[NodeId]) -> Result<NodeId> {
    stack
        .last()
        .copied()
        .ok_or_else(|| Error::HtmlParse("missing parent element".into()))
}

/// Pops open elements up to and including the nearest `tag`. An end tag with
/// no open counterpart is ignored.
fn close_element(dom: &Dom, stack: &mut Vec<NodeId>, tag: &str) {
    let Some(pos) = stack
        .iter()
        .skip(1)
        .rposition(|node| dom.is_tag(*node, tag))
    else {
        return;
    };
    stack.truncate(pos + 1);
}

fn parse_start_tag(html: &str, at: usize) -> Result<(String, Attributes, bool, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;
    if bytes.get(i) != Some(&b'<') {
        return Err(Error::HtmlParse("expected '<'".into()));
    }
    i += 1;

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid tag name".into()))?
        .to_ascii_lowercase();
    if tag.is_empty() {
        return Err(Error::HtmlParse("empty tag name".into()));
    }

    let mut attrs = Attributes::default();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(Error::HtmlParse(format!("unclosed start tag <{tag}>")));
        }

        if bytes[i] == b'>' {
            i += 1;
            break;
        }

        if bytes[i] == b'/' {
            if bytes.get(i + 1) == Some(&b'>') {
                self_closing = true;
                i += 2;
                break;
            }
            i += 1;
            continue;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        let name = html
            .get(name_start..i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute name".into()))?
            .to_ascii_lowercase();
        if name.is_empty() {
            return Err(Error::HtmlParse(format!("invalid attribute name in <{tag}>")));
        }

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            decode_html_character_references(&parse_attr_value(html, bytes, &mut i)?)
        } else {
            String::new()
        };

        // Duplicate attributes: the first occurrence wins.
        if !attrs.contains_key(&name) {
            attrs.insert(name, value);
        }
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(html: &str, at: usize) -> Result<(String, usize)> {
    let bytes = html.as_bytes();
    let mut i = at;

    if !starts_with_at(bytes, i, b"</") {
        return Err(Error::HtmlParse("expected end tag".into()));
    }
    i += 2;
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = html
        .get(tag_start..i)
        .ok_or_else(|| Error::HtmlParse("invalid end tag".into()))?
        .to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(Error::HtmlParse("unclosed end tag".into()));
    }

    Ok((tag, i + 1))
}

fn parse_attr_value(html: &str, bytes: &[u8], i: &mut usize) -> Result<String> {
    if *i >= bytes.len() {
        return Err(Error::HtmlParse("missing attribute value".into()));
    }

    if bytes[*i] == b'\'' || bytes[*i] == b'"' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(Error::HtmlParse("unclosed quoted attribute value".into()));
        }
        let value = html
            .get(start..*i)
            .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
            .to_string();
        *i += 1;
        return Ok(value);
    }

    let start = *i;
    while *i < bytes.len()
        && !bytes[*i].is_ascii_whitespace()
        && bytes[*i] != b'>'
        && !(bytes[*i] == b'/' && bytes.get(*i + 1) == Some(&b'>'))
    {
        *i += 1;
    }

    Ok(html
        .get(start..*i)
        .ok_or_else(|| Error::HtmlParse("invalid attribute value".into()))?
        .to_string())
}

pub(crate) fn decode_html_character_references(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }

    fn decode_numeric(value: &str) -> Option<char> {
        let codepoint = if let Some(hex) = value.strip_prefix(['x', 'X']) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            value.parse::<u32>().ok()?
        };
        char::from_u32(codepoint)
    }

    fn decode_named(value: &str) -> Option<char> {
        match value {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{00A0}'),
            "copy" => Some('©'),
            "hellip" => Some('…'),
            "middot" => Some('·'),
            "laquo" => Some('«'),
            "raquo" => Some('»'),
            _ => None,
        }
    }

    let mut out = String::with_capacity(src.len());
    let mut rest = src;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        let decoded = tail.find(';').and_then(|semi| {
            let raw = &tail[..semi];
            if raw.is_empty() || raw.contains('&') {
                return None;
            }
            let ch = match raw.strip_prefix('#') {
                Some(numeric) => decode_numeric(numeric),
                None => decode_named(raw),
            }?;
            Some((ch, semi + 1))
        });

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}

fn is_raw_text_tag(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn starts_with_at(bytes: &[u8], at: usize, needle: &[u8]) -> bool {
    bytes
        .get(at..at + needle.len())
        .is_some_and(|window| window == needle)
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn find_case_insensitive_end_tag(bytes: &[u8], from: usize, tag: &[u8]) -> Option<usize> {
    let mut needle = b"</".to_vec();
    needle.extend(tag.iter().map(u8::to_ascii_lowercase));

    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(&needle))
        .map(|pos| pos + from)
}
