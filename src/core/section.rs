//! Content sections of the site.
//!
//! Pages live under one of three top-level sections. Link resolution
//! tries section-qualified slugs in a fixed order, and image resolution
//! prefers the asset directory of the page's own section.

use std::fmt;

/// A top-level content section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Notes,
    Lab,
    Blog,
}

impl Section {
    /// All sections, in the order link resolution tries them.
    pub const ALL: [Section; 3] = [Section::Notes, Section::Lab, Section::Blog];

    /// Derive the section from a page's URL path.
    ///
    /// Only a genuine sub-path counts: `/notes/rust/` is in `Notes`,
    /// while `/notes` and `/notesbook/` are not.
    pub fn from_url_path(url_path: &str) -> Option<Self> {
        if url_path.starts_with("/notes/") {
            Some(Section::Notes)
        } else if url_path.starts_with("/lab/") {
            Some(Section::Lab)
        } else if url_path.starts_with("/blog/") {
            Some(Section::Blog)
        } else {
            None
        }
    }

    /// The section's URL segment, without slashes.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Notes => "notes",
            Section::Lab => "lab",
            Section::Blog => "blog",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
