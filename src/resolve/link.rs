//! Link target resolution.

use crate::core::{Section, Slug};
use crate::index::PageIndex;

/// Outcome of resolving one `[[target]]` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Trimmed target text, kept for broken-link tooltips.
    pub target: String,

    /// Anchor text.
    pub label: String,

    /// Resolved URL, or `None` when nothing matched.
    pub url: Option<String>,
}

impl ResolvedLink {
    #[inline]
    pub fn is_broken(&self) -> bool {
        self.url.is_none()
    }
}

/// Resolve a link token.
///
/// The label falls back to the trimmed target when the token carried
/// none. Resolution never consults the current page's section: an
/// unqualified slug means the same page everywhere it is written.
pub fn resolve_link(index: &PageIndex, target: &str, label: Option<&str>) -> ResolvedLink {
    let target = target.trim();
    let label = label.map_or(target, str::trim);
    let slug = Slug::new(target);

    ResolvedLink {
        target: target.to_string(),
        label: label.to_string(),
        url: lookup(index, &slug).map(str::to_string),
    }
}

/// Three-tier lookup: exact key, section-qualified key, then the first
/// key whose tail matches.
fn lookup<'a>(index: &'a PageIndex, slug: &Slug) -> Option<&'a str> {
    if slug.is_empty() {
        return None;
    }

    if let Some(url) = index.get(slug.as_str()) {
        return Some(url);
    }

    // An unqualified slug may name a page in any section
    for section in Section::ALL {
        if let Some(url) = index.get(&format!("{section}/{slug}")) {
            return Some(url);
        }
    }

    // Partial match walks the index in insertion order
    let suffix_slash = format!("/{slug}");
    let suffix_dash = format!("-{slug}");
    index
        .iter()
        .find(|(key, _)| key.ends_with(&suffix_slash) || key.ends_with(&suffix_dash))
        .map(|(_, url)| url)
}

// =============================================================================
// Tests
// =============================================================================
