//! XML form of a property tree.
//!
//! Element tag = node type, attributes = properties, nested elements = children.
//! Attribute text carries no type information, so reading takes a decoder that
//! turns `(property id, text)` back into a [`Var`].

use std::fmt::Write as _;

use super::FormatError;
use super::node::Node;
use super::var::Var;

/// Render `root` and its subtree as an indented XML document.
pub fn to_xml_string(root: &Node) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    write_element(&mut out, root, 0);
    out
}

fn write_element(out: &mut String, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    let tag = node.node_type();
    let _ = write!(out, "{indent}<{tag}");
    for (id, value) in node.properties() {
        let _ = write!(out, " {id}=\"{}\"", escape_attribute(&value.to_attribute()));
    }
    let children = node.children();
    if children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &children {
        write_element(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</{tag}>");
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attribute(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Parse an XML document into a detached tree.
///
/// # Errors
/// Returns [`FormatError::Xml`] if the text is not well-formed XML.
pub fn from_xml_str(text: &str, decode: &dyn Fn(&str, &str) -> Var) -> Result<Node, FormatError> {
    let document = roxmltree::Document::parse(text)?;
    Ok(read_element(document.root_element(), decode))
}

fn read_element(element: roxmltree::Node<'_, '_>, decode: &dyn Fn(&str, &str) -> Var) -> Node {
    let node = Node::new(element.tag_name().name());
    for attribute in element.attributes() {
        node.set_property(attribute.name(), decode(attribute.name(), attribute.value()));
    }
    for child in element.children().filter(roxmltree::Node::is_element) {
        node.append_child(&read_element(child, decode));
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(_id: &str, text: &str) -> Var {
        Var::from(text)
    }

    #[test]
    fn nested_elements_and_attributes() {
        let root = Node::new("gameMap");
        root.set_property("name", Var::from("Crypt"));
        let world = Node::new("world");
        world.append_child(&Node::new("player"));
        root.append_child(&world);

        let xml = to_xml_string(&root);
        assert!(xml.contains("<gameMap name=\"Crypt\">"));
        assert!(xml.contains("    <player/>"));

        let back = from_xml_str(&xml, &as_text).expect("parse");
        assert!(back.is_equivalent_to(&root));
    }

    #[test]
    fn attribute_text_is_escaped() {
        let root = Node::new("worldObject");
        let tricky = "a \"quoted\" <tag> & 'apostrophe'\nsecond line\ttab";
        root.set_property("description", Var::from(tricky));
        let xml = to_xml_string(&root);
        assert!(!xml.contains("<tag>"));
        let back = from_xml_str(&xml, &as_text).expect("parse");
        assert_eq!(back.property("description"), Some(Var::from(tricky)));
    }

    #[test]
    fn malformed_documents_fail() {
        assert!(from_xml_str("<gameMap><world></gameMap>", &as_text).is_err());
        assert!(from_xml_str("", &as_text).is_err());
    }
}
