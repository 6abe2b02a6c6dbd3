//! A small owned DOM for container fragments.
//!
//! Parsed text runs and attribute values are stored exactly as they
//! appear in the source, entities included, and the serializer writes
//! them back verbatim. Only values supplied when building synthetic
//! nodes are escaped, at construction time via [`Element::set_attr`].
//! A rewrite therefore never re-encodes content it did not touch.

mod parse;
mod serialize;

pub use parse::parse_fragment;
pub use serialize::serialize_nodes;

use smallvec::SmallVec;

use crate::utils::html::escape_attr;

/// One node of a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),

    /// Text run, in source form.
    Text(String),

    /// Comment, delimiters included.
    Comment(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercased.
    pub name: String,

    /// Attributes in document order. `None` marks a bare attribute.
    pub attrs: Vec<(String, Option<String>)>,

    pub children: SmallVec<[Node; 4]>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), attrs: Vec::new(), children: SmallVec::new() }
    }

    /// Append an attribute, escaping the value for serialization.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), Some(escape_attr(value).into_owned())));
    }

    /// Append an attribute whose value is already in source form.
    ///
    /// The serializer writes it verbatim apart from re-quoting `"`.
    pub fn set_source_attr(&mut self, name: &str, value: String) {
        self.attrs.push((name.to_string(), Some(value)));
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(Box::new(element))
    }
}
