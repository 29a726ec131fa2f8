//! Checks that a model-authored SVG can be shown as a self-contained image,
//! and embeds it as a `data:` URL.

use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SvgError {
    #[error("document does not start with an <svg> root element")]
    MissingRoot,
    #[error("root element does not declare the SVG namespace")]
    MissingNamespace,
    #[error("root element has no viewBox")]
    MissingViewBox,
    #[error("document references external or active content ({0})")]
    ExternalContent(&'static str),
    #[error("document is not well-formed: {0}")]
    Malformed(String),
}

/// Elements and at-rules that pull in resources from elsewhere or run code.
const FORBIDDEN: &[&str] = &[
    "<link",
    "<style",
    "<script",
    "<foreignobject",
    "<?xml-stylesheet",
    "@import",
    "@font-face",
];

/// Validates `svg` and returns the document with any XML declaration removed.
pub fn validate(svg: &str) -> Result<&str, SvgError> {
    let mut doc = svg.trim();
    if doc.starts_with("<?xml ") {
        let end = doc
            .find("?>")
            .ok_or_else(|| SvgError::Malformed("unterminated XML declaration".to_string()))?;
        doc = doc[end + 2..].trim_start();
    }

    let after_name = doc.strip_prefix("<svg").ok_or(SvgError::MissingRoot)?;
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '>') {
        return Err(SvgError::MissingRoot);
    }

    let root_tag = &doc[..tag_end(doc).ok_or_else(|| {
        SvgError::Malformed("unterminated root tag".to_string())
    })?];
    let declares_namespace = root_tag.contains(&format!("xmlns=\"{}\"", SVG_NAMESPACE))
        || root_tag.contains(&format!("xmlns='{}'", SVG_NAMESPACE));
    if !declares_namespace {
        return Err(SvgError::MissingNamespace);
    }
    if !root_tag.contains("viewBox=") {
        return Err(SvgError::MissingViewBox);
    }

    let lowered = doc.to_ascii_lowercase();
    if let Some(hit) = FORBIDDEN.iter().copied().find(|needle| lowered.contains(needle)) {
        return Err(SvgError::ExternalContent(hit));
    }

    check_balanced(doc)?;
    Ok(doc)
}

/// Wraps an already validated document as `data:image/svg+xml;base64,...`.
pub fn to_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg.as_bytes()))
}

/// Index just past the `>` closing the tag that starts at `s[0]`, honouring
/// quoted attribute values.
fn tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}

/// Every opened element is closed in order, and nothing follows the root.
fn check_balanced(doc: &str) -> Result<(), SvgError> {
    let mut stack: Vec<&str> = Vec::new();
    let mut rest = doc;
    let mut closed_root = false;

    while let Some(start) = rest.find('<') {
        if closed_root && !rest[..start].trim().is_empty() {
            return Err(SvgError::Malformed("content after </svg>".to_string()));
        }
        let tail = &rest[start..];

        if let Some(body) = tail.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| SvgError::Malformed("unterminated comment".to_string()))?;
            rest = &body[end + 3..];
            continue;
        }
        if let Some(body) = tail.strip_prefix("<![CDATA[") {
            let end = body
                .find("]]>")
                .ok_or_else(|| SvgError::Malformed("unterminated CDATA section".to_string()))?;
            rest = &body[end + 3..];
            continue;
        }

        let end = tag_end(tail)
            .ok_or_else(|| SvgError::Malformed("unterminated tag".to_string()))?;
        let tag = &tail[1..end - 1];

        if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim();
            match stack.pop() {
                Some(open) if open == name => {}
                Some(open) => {
                    return Err(SvgError::Malformed(format!(
                        "</{}> closes <{}>",
                        name, open
                    )));
                }
                None => return Err(SvgError::Malformed(format!("stray </{}>", name))),
            }
            if stack.is_empty() {
                closed_root = true;
            }
        } else if tag.starts_with('?') || tag.starts_with('!') {
            // processing instruction or doctype; nothing to track
        } else {
            if closed_root {
                return Err(SvgError::Malformed("second root element".to_string()));
            }
            let name = tag
                .split(|c: char| c.is_whitespace() || c == '/')
                .next()
                .unwrap_or_default();
            if name.is_empty() {
                return Err(SvgError::Malformed("element without a name".to_string()));
            }
            check_references(tag)?;
            if !tag.trim_end().ends_with('/') {
                stack.push(name);
            } else if stack.is_empty() {
                closed_root = true;
            }
        }
        rest = &tail[end..];
    }

    if let Some(open) = stack.pop() {
        return Err(SvgError::Malformed(format!("<{}> is never closed", open)));
    }
    if !closed_root {
        return Err(SvgError::MissingRoot);
    }
    if !rest.trim().is_empty() {
        return Err(SvgError::Malformed("content after </svg>".to_string()));
    }
    Ok(())
}

/// Attribute values that point outside the document. Only fragment
/// (`#id`) and `data:` references are allowed.
fn check_references(tag: &str) -> Result<(), SvgError> {
    for (name, value) in attributes(tag) {
        let name = name.to_ascii_lowercase();
        let is_link = name == "href" || name == "src" || name.ends_with(":href");
        if is_link && !is_local(value) {
            return Err(SvgError::ExternalContent("href"));
        }

        let lowered = value.to_ascii_lowercase();
        let mut rest = lowered.as_str();
        while let Some(start) = rest.find("url(") {
            let arg = &rest[start + 4..];
            let end = arg.find(')').unwrap_or(arg.len());
            let target = arg[..end].trim().trim_matches(|c: char| c == '"' || c == '\'');
            if !is_local(target) {
                return Err(SvgError::ExternalContent("url()"));
            }
            rest = &arg[end..];
        }
    }
    Ok(())
}

fn is_local(reference: &str) -> bool {
    let reference = reference.trim();
    reference.is_empty()
        || reference.starts_with('#')
        || reference.to_ascii_lowercase().starts_with("data:")
}

/// `(name, value)` pairs of an opening tag's body (the text between `<` and
/// `>`). Whitespace around `=` is allowed; attributes without a value are
/// skipped.
fn attributes(tag: &str) -> Vec<(&str, &str)> {
    let mut found = Vec::new();
    let mut rest = tag.trim_start_matches(|c: char| !c.is_whitespace() && c != '/');

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }
        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(after_eq) = rest.strip_prefix('=') else {
            continue;
        };
        let after_eq = after_eq.trim_start();
        let (value, tail) = match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                match body.find(quote) {
                    Some(i) => (&body[..i], &body[i + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let i = after_eq
                    .find(|c: char| c.is_whitespace())
                    .unwrap_or(after_eq.len());
                (&after_eq[..i], &after_eq[i..])
            }
        };
        found.push((name, value));
        rest = tail;
    }
    found
}
