//! Shared utility helpers.

pub mod html;
pub mod path;

/// Returns "s" if count != 1, for pluralizing log messages
#[inline]
pub fn plural_s(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Formats a count with a pluralized noun, e.g. "1 page" or "3 pages"
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

// ============================================================================
// Tests
// ============================================================================
