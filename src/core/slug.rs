//! Slug normalization.

use std::fmt;

/// A normalized page slug, as used for index lookups.
///
/// Normalization trims the input, lowercases it, and replaces every run
/// of spaces and underscores with a single hyphen, so `"Foo Bar"`,
/// `"foo_bar"` and `"FOO  BAR"` all produce `foo-bar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Normalize a raw link target into a slug.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        let mut slug = String::with_capacity(trimmed.len());
        let mut in_separator = false;

        for c in trimmed.to_lowercase().chars() {
            if c == ' ' || c == '_' {
                if !in_separator {
                    slug.push('-');
                    in_separator = true;
                }
            } else {
                slug.push(c);
                in_separator = false;
            }
        }

        Slug(slug)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_hyphenate() {
        assert_eq!(Slug::new("Foo Bar"), "foo-bar");
        assert_eq!(Slug::new("Foo_Bar"), "foo-bar");
        assert_eq!(Slug::new("FOO BAR"), "foo-bar");
    }

    #[test]
    fn test_separator_runs_collapse() {
        assert_eq!(Slug::new("foo  bar"), "foo-bar");
        assert_eq!(Slug::new("foo _ bar"), "foo-bar");
        assert_eq!(Slug::new("foo__bar_baz"), "foo-bar-baz");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(Slug::new("  Foo Bar  "), "foo-bar");
        assert_eq!(Slug::new("\tnotes/rust \n"), "notes/rust");
    }

    #[test]
    fn test_underscores_at_edges_become_hyphens() {
        // Trimming only removes whitespace, separator runs elsewhere
        // always map to a hyphen
        assert_eq!(Slug::new("_private_"), "-private-");
    }

    #[test]
    fn test_only_space_and_underscore_are_separators() {
        // Interior tabs survive; trimming already handled the edges
        assert_eq!(Slug::new("foo\tbar"), "foo\tbar");
    }

    #[test]
    fn test_existing_hyphens_untouched() {
        assert_eq!(Slug::new("already-hyphenated"), "already-hyphenated");
        assert_eq!(Slug::new("mixed-and spaced"), "mixed-and-spaced");
    }

    #[test]
    fn test_path_slugs_keep_slashes() {
        assert_eq!(Slug::new("notes/Setup Guide"), "notes/setup-guide");
    }

    #[test]
    fn test_empty_input() {
        assert!(Slug::new("").is_empty());
        assert!(Slug::new("   ").is_empty());
    }
}
