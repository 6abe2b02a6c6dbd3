//! Locating the content container in a raw page.
//!
//! A byte-level scan finds the span of the first `<main>` (or whichever
//! tag is configured) element's content, so that only that span is ever
//! parsed and re-serialized. Everything outside the span survives a
//! rewrite byte for byte. The scan understands comments, declarations,
//! raw-text elements and quoted attribute values; a page it cannot
//! delimit is left alone.

use std::ops::Range;

use crate::utils::html::is_raw_text_element;

/// Byte range of the first `<tag>` element's content.
///
/// Nested elements of the same tag stay inside the range. Returns
/// `None` when the page has no such element or its markup cannot be
/// delimited.
pub fn find_container(html: &str, tag: &str) -> Option<Range<usize>> {
    let bytes = html.as_bytes();
    let mut pos = 0;
    let mut content_start = 0;
    let mut depth = 0usize;

    while let Some(lt) = find_byte(bytes, pos, b'<') {
        if html[lt..].starts_with("<!--") {
            pos = find_seq(bytes, lt + 4, b"-->")? + 3;
            continue;
        }
        if html[lt..].starts_with("<!") {
            // Doctype or other declaration
            pos = find_byte(bytes, lt + 2, b'>')? + 1;
            continue;
        }
        if html[lt..].starts_with("</") {
            let (name, name_end) = read_tag_name(html, lt + 2);
            if depth > 0 && name.eq_ignore_ascii_case(tag) {
                depth -= 1;
                if depth == 0 {
                    return Some(content_start..lt);
                }
            }
            pos = find_byte(bytes, name_end, b'>')? + 1;
            continue;
        }

        let (name, name_end) = read_tag_name(html, lt + 1);
        if name.is_empty() {
            // Stray `<` in text
            pos = lt + 1;
            continue;
        }
        let (after, self_closing) = read_tag_end(bytes, name_end)?;

        if !self_closing && is_raw_text_element(&name.to_ascii_lowercase()) {
            pos = skip_raw_text(html, after, name)?;
            continue;
        }

        if !self_closing && name.eq_ignore_ascii_case(tag) {
            if depth == 0 {
                content_start = after;
            }
            depth += 1;
        }
        pos = after;
    }
    None
}

/// Read a tag name starting at `from`. Empty when `from` does not start
/// a name.
fn read_tag_name(html: &str, from: usize) -> (&str, usize) {
    let bytes = html.as_bytes();
    let mut end = from;
    if end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
        while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'-') {
            end += 1;
        }
    }
    (&html[from..end], end)
}

/// Find the end of an open tag, honoring quoted attribute values.
///
/// Returns the offset past `>` and whether the tag self-closed.
fn read_tag_end(bytes: &[u8], from: usize) -> Option<(usize, bool)> {
    let mut pos = from;
    while pos < bytes.len() {
        match bytes[pos] {
            b'>' => {
                let self_closing = pos > from && bytes[pos - 1] == b'/';
                return Some((pos + 1, self_closing));
            }
            quote @ (b'"' | b'\'') => {
                pos = find_byte(bytes, pos + 1, quote)? + 1;
            }
            _ => pos += 1,
        }
    }
    None
}

/// Skip past a raw-text element's content and closing tag.
fn skip_raw_text(html: &str, from: usize, name: &str) -> Option<usize> {
    let bytes = html.as_bytes();
    let mut pos = from;
    loop {
        let lt = find_byte(bytes, pos, b'<')?;
        if html[lt..].starts_with("</") {
            let (close_name, name_end) = read_tag_name(html, lt + 2);
            if close_name.eq_ignore_ascii_case(name) {
                return Some(find_byte(bytes, name_end, b'>')? + 1);
            }
        }
        pos = lt + 1;
    }
}

#[inline]
fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes.get(from..)?.iter().position(|&b| b == needle).map(|i| from + i)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes.get(from..)?.windows(needle.len()).position(|w| w == needle).map(|i| from + i)
}

// =============================================================================
// Tests
// =============================================================================
