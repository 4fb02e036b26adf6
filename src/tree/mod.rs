//! Uniform element tree built from the diary XML.
//!
//! Every element becomes a [`Node`] carrying its tag, attributes in document
//! order, leading text, trailing tail text and children. Text and tail are
//! plain `String`s: an element without text simply has an empty one.

mod parser;
mod serialize;

pub use parser::{parse_document, parse_str};
pub use serialize::content_string;

/// An element of the normalized tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<(String, String)>,
    /// Text between the start tag and the first child (or the end tag).
    pub text: String,
    /// Text between this element's end tag and the next sibling.
    pub tail: String,
    pub children: Vec<Node>,
}

impl Node {
    /// Create an element with no attributes, text or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Append text at the current end of this element's content.
    ///
    /// Before any child exists the text belongs to `self.text`; afterwards it
    /// is the tail of the last child.
    pub(crate) fn push_content(&mut self, s: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(s),
            None => self.text.push_str(s),
        }
    }
}

/// First direct child of `node` tagged `tag`, or `default` when there is none.
///
/// Missing optional sub-elements are not an error anywhere in the pipeline;
/// callers pass an empty node and read its empty fields.
pub fn find_child<'a>(node: &'a Node, tag: &str, default: &'a Node) -> &'a Node {
    node.child(tag).unwrap_or(default)
}
