//! Building replacement nodes for scanned tokens.
//!
//! Text pulled out of the page (labels, targets, image names) is still
//! in source form and is carried into the new nodes verbatim. Only
//! index URLs, which arrive as decoded JSON strings, are escaped here.

use crate::dom::{Element, Node};
use crate::resolve::{ResolvedImage, ResolvedLink};

/// Class for every generated anchor.
const LINK_CLASS: &str = "wikilink";

/// Classes marking an anchor whose target did not resolve.
const BROKEN_CLASS: &str = "wikilink broken";

/// Layout applied to every embedded image.
const IMAGE_STYLE: &str = "height:auto;display:block;margin:1.5em 0";

/// Build the anchor for a resolved link.
pub fn anchor(link: &ResolvedLink) -> Node {
    let mut a = Element::new("a");

    match &link.url {
        Some(url) => {
            a.set_attr("class", LINK_CLASS);
            a.set_attr("href", url);
        }
        None => {
            a.set_attr("class", BROKEN_CLASS);
            a.set_attr("href", "#");
            a.set_source_attr("title", format!("Page not found: {}", link.target));
        }
    }

    a.children.push(Node::Text(link.label.clone()));
    a.into()
}

/// Build the img element for a resolved image.
pub fn image(image: &ResolvedImage) -> Node {
    let mut img = Element::new("img");
    img.set_source_attr("src", image.primary_path.clone());
    img.set_source_attr("alt", image.alt_text.clone());
    img.set_attr("loading", "lazy");

    let style = match &image.size_hint {
        Some(size) => format!("max-width:{size};{IMAGE_STYLE}"),
        None => IMAGE_STYLE.to_string(),
    };
    img.set_source_attr("style", style);

    if let Some(fallback) = &image.fallback_path {
        img.set_source_attr("onerror", one_shot_fallback(fallback));
    }
    img.into()
}

/// Inline handler retrying a failed image once from the fallback path.
///
/// Disarming `onerror` first keeps a missing fallback from looping, and
/// the src comparison skips the retry when the fallback is already
/// loaded.
fn one_shot_fallback(fallback: &str) -> String {
    let path = fallback.replace('\\', "\\\\").replace('\'', "\\'");
    format!("this.onerror=null;if(this.getAttribute('src')!=='{path}'){{this.src='{path}'}}")
}

// =============================================================================
// Tests
// =============================================================================
