//! Fragment parsing backed by `tl`.

use super::{Element, Node};

/// Parse an HTML fragment into owned nodes.
///
/// Returns `None` when the parser rejects the fragment.
pub fn parse_fragment(html: &str) -> Option<Vec<Node>> {
    let dom = tl::parse(html, tl::ParserOptions::default()).ok()?;
    let parser = dom.parser();

    let mut nodes = Vec::new();
    for handle in dom.children() {
        if let Some(node) = convert_node(*handle, parser) {
            nodes.push(node);
        }
    }
    Some(nodes)
}

/// Convert one tl node into an owned node.
fn convert_node(handle: tl::NodeHandle, parser: &tl::Parser) -> Option<Node> {
    let node = handle.get(parser)?;

    match node {
        tl::Node::Tag(tag) => {
            let mut element = Element::new(&tag.name().as_utf8_str().to_lowercase());

            for (key, value) in tag.attributes().iter() {
                let key: &str = key.as_ref();
                // Values stay in source form, entities included
                element.attrs.push((key.to_string(), value.map(|v| v.to_string())));
            }

            for child_handle in tag.children().top().iter() {
                if let Some(child) = convert_node(*child_handle, parser) {
                    element.children.push(child);
                }
            }

            Some(Node::Element(Box::new(element)))
        }
        tl::Node::Raw(bytes) => Some(Node::Text(bytes.as_utf8_str().into_owned())),
        tl::Node::Comment(bytes) => Some(Node::Comment(bytes.as_utf8_str().into_owned())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fragment() {
        let nodes = parse_fragment("<p>hello <b>world</b></p>").unwrap();
        assert_eq!(nodes.len(), 1);

        let Node::Element(p) = &nodes[0] else { panic!("expected element") };
        assert_eq!(p.name, "p");
        assert_eq!(p.children.len(), 2);
        assert_eq!(p.children[0], Node::Text("hello ".to_string()));
    }

    #[test]
    fn test_whitespace_text_kept() {
        let nodes = parse_fragment("<ul>\n  <li>one</li>\n</ul>").unwrap();
        let Node::Element(ul) = &nodes[0] else { panic!("expected element") };
        assert_eq!(ul.children[0], Node::Text("\n  ".to_string()));
    }

    #[test]
    fn test_entities_not_decoded() {
        let nodes = parse_fragment("<p>a &amp; b</p>").unwrap();
        let Node::Element(p) = &nodes[0] else { panic!("expected element") };
        assert_eq!(p.children[0], Node::Text("a &amp; b".to_string()));
    }

    #[test]
    fn test_attributes_in_order() {
        let nodes = parse_fragment(r#"<a class="x" href="/y" data-z>t</a>"#).unwrap();
        let Node::Element(a) = &nodes[0] else { panic!("expected element") };
        assert_eq!(
            a.attrs,
            [
                ("class".to_string(), Some("x".to_string())),
                ("href".to_string(), Some("/y".to_string())),
                ("data-z".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_tag_names_lowercased() {
        let nodes = parse_fragment("<P>x</P>").unwrap();
        let Node::Element(p) = &nodes[0] else { panic!("expected element") };
        assert_eq!(p.name, "p");
    }
}
