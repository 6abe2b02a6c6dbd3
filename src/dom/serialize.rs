//! Fragment serialization.

use super::{Element, Node};
use crate::utils::html::is_void_element;

/// Serialize nodes back to HTML.
pub fn serialize_nodes(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(element) => write_element(out, element),
        // Text and comments are stored in source form
        Node::Text(text) => out.push_str(text),
        Node::Comment(comment) => out.push_str(comment),
    }
}

fn write_element(out: &mut String, element: &Element) {
    out.push('<');
    out.push_str(&element.name);

    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            if value.contains('"') {
                // Raw quotes appear when the source attribute was
                // single-quoted
                out.push_str(&value.replace('"', "&quot;"));
            } else {
                out.push_str(value);
            }
            out.push('"');
        }
    }

    if is_void_element(&element.name) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

// =============================================================================
// Tests
// =============================================================================
