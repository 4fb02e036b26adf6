//! Reconstruct inline markup from a tree.
//!
//! Used for rich-text diary bodies only. Attribute values and text are
//! emitted verbatim, without escaping: the output reproduces the markup of
//! a trusted export, it does not sanitize it.

use super::Node;

/// Serialize `node` back into an inline markup string.
///
/// As root, only the inner content is produced: the node's text followed by
/// each child's markup. The root's own tag, attributes and tail are dropped.
///
/// Non-root nodes become `<tag k='v'>text children</tag>tail`.
pub fn content_string(node: &Node, is_root: bool) -> String {
    let mut out = String::new();
    if is_root {
        out.push_str(&node.text);
        for child in &node.children {
            write_element(&mut out, child);
        }
    } else {
        write_element(&mut out, node);
    }
    out
}

fn write_element(out: &mut String, node: &Node) {
    out.push('<');
    out.push_str(&node.tag);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("='");
        out.push_str(value);
        out.push('\'');
    }
    out.push('>');
    out.push_str(&node.text);
    for child in &node.children {
        write_element(out, child);
    }
    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
    out.push_str(&node.tail);
}
