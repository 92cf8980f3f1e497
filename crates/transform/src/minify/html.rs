//! Markup minification.
//!
//! Collapses ASCII whitespace runs to a single space and strips comments. The
//! bodies of raw-text elements and quoted attribute values are copied
//! untouched, and conditional comments (`<!--[if ...]>`) are kept.

use crate::{AssetKind, MarkupError, TransformError};

const RAW_TEXT_ELEMENTS: [&str; 4] = ["pre", "textarea", "script", "style"];

/// Minify an HTML document.
///
/// # Errors
///
/// Returns `TransformError::Failed` carrying a [`MarkupError`] for an
/// unterminated comment, raw-text element, or quoted attribute value.
pub fn minify_html(source: &str) -> Result<String, TransformError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut pending_space = false;
    let mut in_tag = false;

    while let Some(c) = rest.chars().next() {
        if c.is_ascii_whitespace() {
            pending_space = true;
            rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
            continue;
        }

        if pending_space && !out.is_empty() && !out.ends_with(' ') {
            out.push(' ');
        }
        pending_space = false;

        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body
                .find("-->")
                .ok_or_else(|| TransformError::failed(AssetKind::Markup, MarkupError::UnterminatedComment))?
                + "<!--".len()
                + "-->".len();
            if body.starts_with("[if") {
                out.push_str(&rest[..end]);
            }
            rest = &rest[end..];
            continue;
        }

        if let Some(tag) = raw_text_element(rest) {
            let end = raw_text_end(rest, tag)
                .ok_or_else(|| TransformError::failed(AssetKind::Markup, MarkupError::UnterminatedElement(tag)))?;
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        if in_tag && matches!(c, '"' | '\'') && (out.ends_with('=') || out.ends_with("= ")) {
            let end = rest[1..]
                .find(c)
                .ok_or_else(|| TransformError::failed(AssetKind::Markup, MarkupError::UnterminatedAttribute))?
                + 2;
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        match c {
            '<' if rest[1..].starts_with(|next: char| next.is_ascii_alphabetic() || matches!(next, '/' | '!')) => {
                in_tag = true;
            }
            '>' => in_tag = false,
            _ => {}
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Ok(out)
}

/// Name of the raw-text element opened at the start of `input`, if any.
fn raw_text_element(input: &str) -> Option<&'static str> {
    let after = input.strip_prefix('<')?;
    RAW_TEXT_ELEMENTS.into_iter().find(|tag| {
        after.len() > tag.len()
            && after.as_bytes()[..tag.len()].eq_ignore_ascii_case(tag.as_bytes())
            && matches!(after.as_bytes()[tag.len()], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
    })
}

/// Byte offset just past the closing tag of the raw-text element `tag` opened at the start of `input`.
fn raw_text_end(input: &str, tag: &str) -> Option<usize> {
    let close = format!("</{tag}");
    let start = find_ignore_ascii_case(&input[1..], &close)? + 1;
    let gt = input[start..].find('>')?;
    Some(start + gt + 1)
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
