//! Image embed resolution.

use crate::core::Section;

/// Paths for one `![[image]]` embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// URL the `src` attribute points at.
    pub primary_path: String,

    /// Section-root URL retried once if the primary fails to load.
    pub fallback_path: Option<String>,

    /// Width constraint, when the token carried a size.
    pub size_hint: Option<String>,

    /// Alt text: the raw name segment, unprocessed.
    pub alt_text: String,
}

/// Resolve an image token against the page's section.
///
/// Sectioned pages serve images from `/<section>/assets/<name>` with a
/// one-shot fallback to `/<section>/<name>`; pages outside any section
/// load straight from the site root and get no fallback.
pub fn resolve_image(section: Option<Section>, name: &str, size: Option<&str>) -> ResolvedImage {
    let clean = clean_name(name);

    let (primary_path, fallback_path) = match section {
        Some(section) => {
            (format!("/{section}/assets/{clean}"), Some(format!("/{section}/{clean}")))
        }
        None => (format!("/{clean}"), None),
    };

    ResolvedImage {
        primary_path,
        fallback_path,
        size_hint: size.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
        alt_text: name.to_string(),
    }
}

/// Trim the name and drop at most one leading slash.
fn clean_name(name: &str) -> &str {
    let trimmed = name.trim();
    trimmed.strip_prefix('/').unwrap_or(trimmed)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sectioned_image() {
        let resolved = resolve_image(Some(Section::Notes), "diagram.png", None);
        assert_eq!(resolved.primary_path, "/notes/assets/diagram.png");
        assert_eq!(resolved.fallback_path.as_deref(), Some("/notes/diagram.png"));
        assert_eq!(resolved.alt_text, "diagram.png");
        assert_eq!(resolved.size_hint, None);
    }

    #[test]
    fn test_sectionless_image() {
        let resolved = resolve_image(None, "pic.png", None);
        assert_eq!(resolved.primary_path, "/pic.png");
        assert_eq!(resolved.fallback_path, None);
    }

    #[test]
    fn test_leading_slash_stripped() {
        let resolved = resolve_image(Some(Section::Lab), "/shots/pic.png", None);
        assert_eq!(resolved.primary_path, "/lab/assets/shots/pic.png");
        assert_eq!(resolved.fallback_path.as_deref(), Some("/lab/shots/pic.png"));
    }

    #[test]
    fn test_name_trimmed_for_paths_only() {
        let resolved = resolve_image(None, " pic.png ", None);
        assert_eq!(resolved.primary_path, "/pic.png");
        // Alt text keeps the raw segment
        assert_eq!(resolved.alt_text, " pic.png ");
    }

    #[test]
    fn test_size_hint_trimmed() {
        let resolved = resolve_image(None, "pic.png", Some(" 300px "));
        assert_eq!(resolved.size_hint.as_deref(), Some("300px"));
    }

    #[test]
    fn test_blank_size_hint_dropped() {
        assert_eq!(resolve_image(None, "pic.png", Some("")).size_hint, None);
        assert_eq!(resolve_image(None, "pic.png", Some("   ")).size_hint, None);
    }
}
