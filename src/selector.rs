use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

impl SelectorAttrCondition {
    pub(crate) fn matches(&self, attr_value: Option<&str>) -> bool {
        match self {
            Self::Exists { .. } => attr_value.is_some(),
            Self::Eq { value, .. } => attr_value == Some(value.as_str()),
            Self::StartsWith { value, .. } => {
                !value.is_empty() && attr_value.is_some_and(|v| v.starts_with(value.as_str()))
            }
            Self::EndsWith { value, .. } => {
                !value.is_empty() && attr_value.is_some_and(|v| v.ends_with(value.as_str()))
            }
            Self::Contains { value, .. } => {
                !value.is_empty() && attr_value.is_some_and(|v| v.contains(value.as_str()))
            }
            Self::Includes { value, .. } => attr_value
                .is_some_and(|v| v.split_whitespace().any(|token| token == value)),
            Self::DashMatch { value, .. } => attr_value.is_some_and(|v| {
                v == value
                    || v.strip_prefix(value.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }),
        }
    }

    pub(crate) fn key(&self) -> &str {
        match self {
            Self::Exists { key }
            | Self::Eq { key, .. }
            | Self::StartsWith { key, .. }
            | Self::EndsWith { key, .. }
            | Self::Contains { key, .. }
            | Self::Includes { key, .. }
            | Self::DashMatch { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Not(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

pub(crate) fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let tokens = tokenize_selector(selector)?;
    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokens {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

/// Splits on commas outside of brackets, parentheses and quotes.
fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if depth.track(ch, selector)? {
            current.push(ch);
            continue;
        }
        if ch == ',' {
            let trimmed = current.trim();
            if trimmed.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            groups.push(trimmed.to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    depth.finish(selector)?;
    let trimmed = current.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = NestingDepth::default();

    for ch in selector.chars() {
        if depth.track(ch, selector)? {
            current.push(ch);
            continue;
        }
        match ch {
            '>' | '+' | '~' => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
                tokens.push(ch.to_string());
            }
            ch if ch.is_ascii_whitespace() => {
                if !current.trim().is_empty() {
                    tokens.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    depth.finish(selector)?;
    if !current.trim().is_empty() {
        tokens.push(current.trim().to_string());
    }
    Ok(tokens)
}

#[derive(Default)]
struct NestingDepth {
    bracket: usize,
    paren: usize,
    quote: Option<char>,
}

impl NestingDepth {
    /// Returns true when `ch` is part of a nested construct and must be kept
    /// verbatim by the caller.
    fn track(&mut self, ch: char, selector: &str) -> Result<bool> {
        if let Some(q) = self.quote {
            if ch == q {
                self.quote = None;
            }
            return Ok(true);
        }
        match ch {
            '\'' | '"' if self.bracket > 0 || self.paren > 0 => {
                self.quote = Some(ch);
                Ok(true)
            }
            '[' => {
                self.bracket += 1;
                Ok(true)
            }
            ']' => {
                if self.bracket == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                self.bracket -= 1;
                Ok(true)
            }
            '(' => {
                self.paren += 1;
                Ok(true)
            }
            ')' => {
                if self.paren == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                self.paren -= 1;
                Ok(true)
            }
            _ => Ok(self.bracket > 0 || self.paren > 0),
        }
    }

    fn finish(&self, selector: &str) -> Result<()> {
        if self.bracket != 0 || self.paren != 0 || self.quote.is_some() {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        Ok(())
    }
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    if part.is_empty() {
        return Err(Error::UnsupportedSelector(part.into()));
    }

    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let Some((id, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                i = next;
            }
            b'.' => {
                let Some((class_name, next)) = parse_selector_ident(part, i + 1) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(Error::UnsupportedSelector(part.into()));
                }
                let Some((tag, next)) = parse_selector_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(part.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    Ok(step)
}

fn parse_selector_pseudo(part: &str, start: usize) -> Result<(SelectorPseudoClass, usize)> {
    let Some((name, next)) = parse_selector_ident(part, start + 1) else {
        return Err(Error::UnsupportedSelector(part.into()));
    };

    let simple = match name.as_str() {
        "first-child" => Some(SelectorPseudoClass::FirstChild),
        "last-child" => Some(SelectorPseudoClass::LastChild),
        "checked" => Some(SelectorPseudoClass::Checked),
        "disabled" => Some(SelectorPseudoClass::Disabled),
        "enabled" => Some(SelectorPseudoClass::Enabled),
        "required" => Some(SelectorPseudoClass::Required),
        "optional" => Some(SelectorPseudoClass::Optional),
        _ => None,
    };
    if let Some(pseudo) = simple {
        return Ok((pseudo, next));
    }

    if name == "not" && part.as_bytes().get(next) == Some(&b'(') {
        let close = find_matching_paren(part, next)
            .ok_or_else(|| Error::UnsupportedSelector(part.into()))?;
        let inner = &part[next + 1..close];
        let groups = parse_selector_groups(inner)?;
        return Ok((SelectorPseudoClass::Not(groups), close + 1));
    }

    Err(Error::UnsupportedSelector(part.into()))
}

fn find_matching_paren(src: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (idx, b) in src.bytes().enumerate().skip(open) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        if b == b'\'' || b == b'"' {
            quote = Some(b);
            i += 1;
            continue;
        }
        if b == b']' {
            let body = src
                .get(open_bracket + 1..i)
                .map(str::trim)
                .filter(|body| !body.is_empty())
                .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
            let cond = parse_attr_body(body).ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
            return Ok((cond, i + 1));
        }
        i += 1;
    }

    Err(Error::UnsupportedSelector(src.into()))
}

fn parse_attr_body(body: &str) -> Option<SelectorAttrCondition> {
    let Some(eq) = body.find('=') else {
        let key = body.to_ascii_lowercase();
        if !key.bytes().all(is_selector_ident_char) {
            return None;
        }
        return Some(SelectorAttrCondition::Exists { key });
    };

    let (raw_key, op) = match body[..eq].chars().last() {
        Some(op @ ('^' | '$' | '*' | '~' | '|')) => (&body[..eq - 1], Some(op)),
        _ => (&body[..eq], None),
    };
    let key = raw_key.trim().to_ascii_lowercase();
    if key.is_empty() || !key.bytes().all(is_selector_ident_char) {
        return None;
    }

    let value = body[eq + 1..].trim();
    let value = if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    };

    Some(match op {
        None => SelectorAttrCondition::Eq { key, value },
        Some('^') => SelectorAttrCondition::StartsWith { key, value },
        Some('$') => SelectorAttrCondition::EndsWith { key, value },
        Some('*') => SelectorAttrCondition::Contains { key, value },
        Some('~') => SelectorAttrCondition::Includes { key, value },
        Some(_) => SelectorAttrCondition::DashMatch { key, value },
    })
}
