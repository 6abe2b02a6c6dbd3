//! Page rewriting: locating the content container, scanning its text
//! for wikilink markup, and splicing the converted fragment back into
//! the raw document.

mod container;
mod render;

pub use container::find_container;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use smallvec::SmallVec;
use thiserror::Error;

use crate::core::{Section, Slug};
use crate::dom::{Element, Node, parse_fragment, serialize_nodes};
use crate::index::PageIndex;
use crate::resolve::{ResolvedImage, resolve_image, resolve_link};
use crate::scan::{self, Token};

/// Per-page processing failure. One page failing never aborts a run.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, io::Error),

    #[error("failed to write {0}: {1}")]
    Write(PathBuf, io::Error),

    #[error("could not parse the <{0}> container")]
    Parse(String),
}

/// Counts of what a rewrite changed in one page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    /// Links converted, broken ones included.
    pub links: usize,

    /// Links whose target did not resolve.
    pub broken: usize,

    /// Images embedded.
    pub images: usize,
}

impl RewriteStats {
    /// Total replacements performed.
    pub fn total(&self) -> usize {
        self.links + self.images
    }
}

/// An unresolved reference found by a check pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckIssue {
    /// A link whose target is not in the index.
    BrokenLink { target: String, slug: String },

    /// An image missing from every candidate path.
    MissingImage { name: String, tried: Vec<String> },
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckIssue::BrokenLink { target, slug } => {
                write!(f, "[[{target}]] does not resolve (slug: {slug})")
            }
            CheckIssue::MissingImage { name, tried } => {
                write!(f, "![[{name}]] not found (tried: {})", tried.join(", "))
            }
        }
    }
}

/// Rewrite one page's HTML.
///
/// Returns the new document and stats when at least one token was
/// converted; `None` means the page comes back byte-identical. Bytes
/// outside the container are never touched.
pub fn rewrite_page(
    html: &str,
    index: &PageIndex,
    section: Option<Section>,
    container_tag: &str,
) -> Result<Option<(String, RewriteStats)>, PageError> {
    let Some(range) = find_container(html, container_tag) else {
        return Ok(None);
    };

    let fragment = &html[range.clone()];
    if !scan::has_markup(fragment) {
        return Ok(None);
    }

    let nodes =
        parse_fragment(fragment).ok_or_else(|| PageError::Parse(container_tag.to_string()))?;

    // A synthetic root keeps the walk uniform
    let mut root = Element::new(container_tag);
    root.children = SmallVec::from_vec(nodes);

    let mut stats = RewriteStats::default();
    rewrite_children(&mut root, index, section, &mut stats);

    if stats.total() == 0 {
        return Ok(None);
    }

    let rewritten = serialize_nodes(&root.children);
    let mut output = String::with_capacity(html.len() + rewritten.len());
    output.push_str(&html[..range.start]);
    output.push_str(&rewritten);
    output.push_str(&html[range.end..]);
    Ok(Some((output, stats)))
}

/// Tags whose subtrees are never rewritten.
fn is_excluded_tag(tag: &str) -> bool {
    matches!(tag, "code" | "pre" | "script" | "style" | "a")
}

/// Walk an element's children, replacing text runs that scan into
/// tokens. The child list is rebuilt in one pass, so freshly inserted
/// nodes are never rescanned.
fn rewrite_children(
    element: &mut Element,
    index: &PageIndex,
    section: Option<Section>,
    stats: &mut RewriteStats,
) {
    let children = std::mem::take(&mut element.children);
    let mut rebuilt: SmallVec<[Node; 4]> = SmallVec::with_capacity(children.len());

    for child in children {
        match child {
            Node::Element(mut child_element) => {
                if !is_excluded_tag(&child_element.name) {
                    rewrite_children(&mut child_element, index, section, stats);
                }
                rebuilt.push(Node::Element(child_element));
            }
            Node::Text(text) => {
                if scan::has_markup(&text) {
                    replace_text(text, index, section, stats, &mut rebuilt);
                } else {
                    rebuilt.push(Node::Text(text));
                }
            }
            comment @ Node::Comment(_) => rebuilt.push(comment),
        }
    }

    element.children = rebuilt;
}

/// Scan one text run and push its replacement nodes. The original node
/// is kept whole when nothing converts.
fn replace_text(
    text: String,
    index: &PageIndex,
    section: Option<Section>,
    stats: &mut RewriteStats,
    out: &mut SmallVec<[Node; 4]>,
) {
    let mut converted = false;
    let mut nodes: SmallVec<[Node; 4]> = SmallVec::new();

    for token in scan::scan(&text) {
        match token {
            Token::Literal(literal) => nodes.push(Node::Text(literal.to_string())),
            Token::Link { target, label, .. } => {
                let resolved = resolve_link(index, target, label);
                stats.links += 1;
                if resolved.is_broken() {
                    stats.broken += 1;
                }
                nodes.push(render::anchor(&resolved));
                converted = true;
            }
            Token::Image { name, size, .. } => {
                let resolved = resolve_image(section, name, size);
                stats.images += 1;
                nodes.push(render::image(&resolved));
                converted = true;
            }
        }
    }

    if converted {
        out.extend(nodes);
    } else {
        out.push(Node::Text(text));
    }
}

/// Scan a page for unresolved references without modifying anything.
///
/// `asset_root` enables image existence checks; pass `None` to skip
/// them.
pub fn collect_issues(
    html: &str,
    index: &PageIndex,
    section: Option<Section>,
    asset_root: Option<&Path>,
    container_tag: &str,
) -> Result<Vec<CheckIssue>, PageError> {
    let Some(range) = find_container(html, container_tag) else {
        return Ok(Vec::new());
    };

    let fragment = &html[range];
    if !scan::has_markup(fragment) {
        return Ok(Vec::new());
    }

    let nodes =
        parse_fragment(fragment).ok_or_else(|| PageError::Parse(container_tag.to_string()))?;

    let mut issues = Vec::new();
    scan_nodes(&nodes, index, section, asset_root, &mut issues);
    Ok(issues)
}

fn scan_nodes(
    nodes: &[Node],
    index: &PageIndex,
    section: Option<Section>,
    asset_root: Option<&Path>,
    issues: &mut Vec<CheckIssue>,
) {
    for node in nodes {
        match node {
            Node::Element(element) => {
                if !is_excluded_tag(&element.name) {
                    scan_nodes(&element.children, index, section, asset_root, issues);
                }
            }
            Node::Text(text) => {
                if !scan::has_markup(text) {
                    continue;
                }
                for token in scan::scan(text) {
                    match token {
                        Token::Literal(_) => {}
                        Token::Link { target, label, .. } => {
                            let resolved = resolve_link(index, target, label);
                            if resolved.is_broken() {
                                issues.push(CheckIssue::BrokenLink {
                                    slug: Slug::new(target).to_string(),
                                    target: resolved.target,
                                });
                            }
                        }
                        Token::Image { name, size, .. } => {
                            if let Some(root) = asset_root {
                                let resolved = resolve_image(section, name, size);
                                if let Some(issue) = missing_image(root, &resolved) {
                                    issues.push(issue);
                                }
                            }
                        }
                    }
                }
            }
            Node::Comment(_) => {}
        }
    }
}

/// Check an image's candidate paths on disk.
fn missing_image(root: &Path, image: &ResolvedImage) -> Option<CheckIssue> {
    let mut tried = Vec::new();
    for url in std::iter::once(&image.primary_path).chain(image.fallback_path.as_ref()) {
        if root.join(url.trim_start_matches('/')).is_file() {
            return None;
        }
        tried.push(url.clone());
    }
    Some(CheckIssue::MissingImage { name: image.alt_text.trim().to_string(), tried })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_JSON: &str = r#"{"pages":[
        {"s":"notes/foo-bar","b":"foo-bar","u":"/notes/foo-bar/"},
        {"s":"lab/widget","b":"widget","u":"/lab/widget/"}
    ]}"#;

    fn test_index() -> PageIndex {
        PageIndex::from_json(INDEX_JSON).unwrap()
    }

    fn page(body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html><head><title>T &amp; Co</title></head>\
             <body><nav>[[left alone]]</nav><main>{body}</main>\
             <footer>&copy; 2026</footer></body></html>"
        )
    }

    fn rewrite(body: &str, section: Option<Section>) -> Option<(String, RewriteStats)> {
        rewrite_page(&page(body), &test_index(), section, "main").unwrap()
    }

    #[test]
    fn test_converts_link_and_keeps_surroundings() {
        let (output, stats) = rewrite("<p>see [[Foo Bar]] now</p>", None).unwrap();
        assert_eq!(
            output,
            page(r#"<p>see <a class="wikilink" href="/notes/foo-bar/">Foo Bar</a> now</p>"#)
        );
        assert_eq!(stats.links, 1);
        assert_eq!(stats.broken, 0);
        assert_eq!(stats.images, 0);
    }

    #[test]
    fn test_broken_link_rendering() {
        let (output, stats) = rewrite("<p>[[Nope Target]]</p>", None).unwrap();
        assert_eq!(
            output,
            page(
                r##"<p><a class="wikilink broken" href="#" title="Page not found: Nope Target">Nope Target</a></p>"##
            )
        );
        assert_eq!(stats.broken, 1);
    }

    #[test]
    fn test_custom_label() {
        let (output, _) = rewrite("<p>[[Foo_Bar|Custom Label]]</p>", None).unwrap();
        assert!(output.contains(r#"<a class="wikilink" href="/notes/foo-bar/">Custom Label</a>"#));
    }

    #[test]
    fn test_image_with_section() {
        let (output, stats) =
            rewrite("<p>![[diagram.png|300px]]</p>", Some(Section::Notes)).unwrap();
        assert!(output.contains(r#"src="/notes/assets/diagram.png""#));
        assert!(output.contains("max-width:300px;"));
        assert!(output.contains("this.src='/notes/diagram.png'"));
        assert_eq!(stats.images, 1);
    }

    #[test]
    fn test_image_without_section() {
        let (output, _) = rewrite("<p>![[pic.png]]</p>", None).unwrap();
        assert!(output.contains(r#"src="/pic.png""#));
        assert!(!output.contains("onerror"));
    }

    #[test]
    fn test_excluded_subtrees_untouched() {
        let (output, stats) = rewrite(
            "<pre>[[widget]]</pre><p>[[widget]]</p><a href=\"/z\">[[widget]]</a>",
            None,
        )
        .unwrap();
        assert!(output.contains("<pre>[[widget]]</pre>"));
        assert!(output.contains("<a href=\"/z\">[[widget]]</a>"));
        assert!(output.contains(r#"<p><a class="wikilink" href="/lab/widget/">widget</a></p>"#));
        assert_eq!(stats.links, 1);
    }

    #[test]
    fn test_excluded_tag_nested_in_paragraph() {
        let (output, stats) =
            rewrite("<p>use [[widget]], not <code>[[widget]]</code></p>", None).unwrap();
        assert!(output.contains("<code>[[widget]]</code>"));
        assert_eq!(stats.links, 1);
    }

    #[test]
    fn test_markup_outside_container_ignored() {
        // The nav carries markup, the main does not
        assert!(rewrite("<p>plain</p>", None).is_none());
    }

    #[test]
    fn test_page_without_container() {
        let html = "<html><body><p>[[widget]]</p></body></html>";
        assert!(rewrite_page(html, &test_index(), None, "main").unwrap().is_none());
    }

    #[test]
    fn test_unconvertible_markup_leaves_page_alone() {
        assert!(rewrite("<p>[[]] and [[unclosed</p>", None).is_none());
    }

    #[test]
    fn test_idempotent_after_one_pass() {
        let (output, _) = rewrite("<p>[[widget]] and ![[pic.png]]</p>", None).unwrap();
        // A second pass finds nothing left to convert
        assert!(rewrite_page(&output, &test_index(), None, "main").unwrap().is_none());
    }

    #[test]
    fn test_entities_near_markup_preserved() {
        let (output, _) = rewrite("<p>a &amp; [[widget]]</p>", None).unwrap();
        assert!(output.contains("a &amp; <a"));
    }

    #[test]
    fn test_comments_in_container_preserved() {
        let (output, _) = rewrite("<!-- keep -->[[widget]]", None).unwrap();
        assert!(output.contains("<!-- keep -->"));
    }

    #[test]
    fn test_multiple_tokens_in_one_text_run() {
        let (output, stats) = rewrite("<p>[[widget]] and [[Foo Bar]]</p>", None).unwrap();
        assert!(output.contains("/lab/widget/"));
        assert!(output.contains("/notes/foo-bar/"));
        assert_eq!(stats.links, 2);
        assert_eq!(stats.total(), 2);
    }

    #[test]
    fn test_collect_issues_reports_broken_links() {
        let html = page("<p>[[widget]] then [[Nope Target]]</p>");
        let issues = collect_issues(&html, &test_index(), None, None, "main").unwrap();
        assert_eq!(
            issues,
            [CheckIssue::BrokenLink {
                target: "Nope Target".to_string(),
                slug: "nope-target".to_string(),
            }]
        );
    }

    #[test]
    fn test_collect_issues_skips_excluded_tags() {
        let html = page("<code>[[missing]]</code>");
        let issues = collect_issues(&html, &test_index(), None, None, "main").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_collect_issues_without_asset_root_skips_images() {
        let html = page("<p>![[ghost.png]]</p>");
        let issues = collect_issues(&html, &test_index(), None, None, "main").unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_missing_image_lists_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let html = page("<p>![[ghost.png]]</p>");
        let issues =
            collect_issues(&html, &test_index(), Some(Section::Lab), Some(dir.path()), "main")
                .unwrap();
        assert_eq!(
            issues,
            [CheckIssue::MissingImage {
                name: "ghost.png".to_string(),
                tried: vec![
                    "/lab/assets/ghost.png".to_string(),
                    "/lab/ghost.png".to_string()
                ],
            }]
        );
    }

    #[test]
    fn test_present_image_passes_check() {
        let dir = tempfile::tempdir().unwrap();
        let assets = dir.path().join("lab/assets");
        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("real.png"), b"png").unwrap();

        let html = page("<p>![[real.png]]</p>");
        let issues =
            collect_issues(&html, &test_index(), Some(Section::Lab), Some(dir.path()), "main")
                .unwrap();
        assert!(issues.is_empty());
    }
}
