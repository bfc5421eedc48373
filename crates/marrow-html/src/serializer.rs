//! Turning a parsed tree back into text.
//!
//! [`serialize`] implements
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments).
//! [`dump_tree`] produces the indented one-node-per-line format used by the
//! html5lib tree-construction tests, and [`print_tree`] writes it to stdout.

use std::fmt::Write as _;

use marrow_dom::{DomTree, ElementData, Namespace, NodeId, NodeType};

use crate::parser::TagId;
use crate::parser::foreign_content::foreign_attribute;

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
///
/// Serialize the children of `node`, treating `noscript` content as raw text
/// (the parser's default scripting flag).
#[must_use]
pub fn serialize(tree: &DomTree, node: NodeId) -> String {
    serialize_with_scripting(tree, node, true)
}

/// Serialize the children of `node` for a document parsed with the given
/// scripting flag.
#[must_use]
pub fn serialize_with_scripting(tree: &DomTree, node: NodeId, scripting_enabled: bool) -> String {
    let mut serializer = Serializer {
        tree,
        scripting_enabled,
        output: String::new(),
    };
    serializer.children(node);
    serializer.output
}

struct Serializer<'a> {
    tree: &'a DomTree,
    scripting_enabled: bool,
    output: String,
}

impl Serializer<'_> {
    /// "For each child node of the node, in tree order, run the following steps:"
    fn children(&mut self, parent: NodeId) {
        for &child in self.tree.children(parent) {
            self.node(parent, child);
        }
    }

    fn node(&mut self, parent: NodeId, id: NodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        match &node.node_type {
            // "If current node is an Element"
            NodeType::Element(element) => self.element(id, element),

            // "If current node is a Text node"
            // "If the parent of current node is a style, script, xmp, iframe,
            // noembed, noframes, or plaintext element, or if the parent of
            // current node is a noscript element and scripting is enabled for
            // the node, then append the value of current node's data IDL
            // attribute literally."
            // "Otherwise, append the value of current node's data IDL
            // attribute, escaped as described below."
            NodeType::Text(data) => {
                if self.is_raw_text_parent(parent) {
                    self.output.push_str(data);
                } else {
                    escape_into(&mut self.output, data, false);
                }
            }

            // "If current node is a Comment"
            // "Append the literal string "<!--", followed by the value of
            // current node's data IDL attribute, followed by the literal string
            // "-->"."
            NodeType::Comment(data) => {
                let _ = write!(self.output, "<!--{data}-->");
            }

            // "If current node is a DocumentType"
            // "Append the literal string "<!DOCTYPE" (U+003C LESS-THAN SIGN,
            // U+0021 EXCLAMATION MARK, U+0044 LATIN CAPITAL LETTER D, ...),
            // followed by a space (U+0020 SPACE), followed by the value of
            // current node's name IDL attribute, followed by the literal string
            // ">" (U+003E GREATER-THAN SIGN)."
            NodeType::DocumentType { name, .. } => {
                let _ = write!(self.output, "<!DOCTYPE {name}>");
            }

            NodeType::Document | NodeType::DocumentFragment => self.children(id),
        }
    }

    fn element(&mut self, id: NodeId, element: &ElementData) {
        // "If current node is an element in the HTML namespace, the MathML
        // namespace, or the SVG namespace, then let tagname be current node's
        // local name."
        let tag_name = &element.tag_name;

        // "Append a U+003C LESS-THAN SIGN character (<), followed by tagname."
        let _ = write!(self.output, "<{tag_name}");

        // "For each attribute that the element has, append a U+0020 SPACE
        // character, the attribute's serialized name as described below, a
        // U+003D EQUALS SIGN character (=), a U+0022 QUOTATION MARK character
        // ("), the attribute's value, escaped as described below in attribute
        // mode, and a second U+0022 QUOTATION MARK character (")."
        for (name, value) in element.attrs.iter() {
            let _ = write!(self.output, " {name}=\"");
            escape_into(&mut self.output, value, true);
            self.output.push('"');
        }

        // "Append a U+003E GREATER-THAN SIGN character (>)."
        self.output.push('>');

        // "If current node serializes as void, then continue on to the next
        // child node at this point."
        let tag = TagId::from_name(tag_name);
        if element.namespace == Namespace::Html && tag.is_void() {
            return;
        }

        // A newline right after `<pre>`, `<textarea>` or `<listing>` is
        // dropped by the parser, so a leading one in the content needs a
        // second in front of it to survive reparsing.
        if element.namespace == Namespace::Html
            && matches!(tag, TagId::Pre | TagId::Textarea | TagId::Listing)
            && self
                .tree
                .first_child(id)
                .and_then(|child| self.tree.as_text(child))
                .is_some_and(|text| text.starts_with('\n'))
        {
            self.output.push('\n');
        }

        // "Append the value of running the HTML fragment serialization
        // algorithm on the current node element (thus recursing into this
        // algorithm for that element), followed by a U+003C LESS-THAN SIGN
        // character (<), a U+002F SOLIDUS character (/), tagname again, and
        // finally a U+003E GREATER-THAN SIGN character (>)."
        self.children(id);
        let _ = write!(self.output, "</{tag_name}>");
    }

    fn is_raw_text_parent(&self, parent: NodeId) -> bool {
        let Some(element) = self.tree.as_element(parent) else {
            return false;
        };
        if element.namespace != Namespace::Html {
            return false;
        }
        match TagId::from_name(&element.tag_name) {
            TagId::Style
            | TagId::Script
            | TagId::Xmp
            | TagId::Iframe
            | TagId::Noembed
            | TagId::Noframes
            | TagId::Plaintext => true,
            TagId::Noscript => self.scripting_enabled,
            _ => false,
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "1. Replace any occurrence of the "&" character by the string "&amp;"."
/// "2. Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
/// string "&nbsp;"."
/// "3. If the algorithm was invoked in the attribute mode, then replace any
/// occurrences of the """ character by the string "&quot;"."
/// "4. If the algorithm was not invoked in the attribute mode, then replace
/// any occurrences of the "<" character by the string "&lt;", and any
/// occurrences of the ">" character by the string "&gt;"."
fn escape_into(output: &mut String, text: &str, attribute_mode: bool) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{00A0}' => output.push_str("&nbsp;"),
            '"' if attribute_mode => output.push_str("&quot;"),
            '<' if !attribute_mode => output.push_str("&lt;"),
            '>' if !attribute_mode => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

// =============================================================================
// Tree dumps
// =============================================================================

/// Render the subtree under `node` (not `node` itself) in the html5lib test
/// format:
///
/// ```text
/// | <html>
/// |   <head>
/// |   <body>
/// |     <svg svg>
/// |       xlink href="#a"
/// |     "text"
/// ```
///
/// Attributes are listed one per line in name order; foreign elements carry
/// their namespace prefix and `template` contents sit under a `content` line.
#[must_use]
pub fn dump_tree(tree: &DomTree, node: NodeId) -> String {
    let mut output = String::new();
    for &child in tree.children(node) {
        dump_node(tree, child, 0, &mut output);
    }
    output
}

/// Print [`dump_tree`] of `node` to stdout.
pub fn print_tree(tree: &DomTree, node: NodeId) {
    print!("{}", dump_tree(tree, node));
}

fn dump_node(tree: &DomTree, id: NodeId, depth: usize, output: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    let mut child_depth = depth + 1;

    match &node.node_type {
        NodeType::DocumentType {
            name,
            public_id,
            system_id,
        } => {
            if public_id.is_empty() && system_id.is_empty() {
                let _ = writeln!(output, "| {indent}<!DOCTYPE {name}>");
            } else {
                let _ = writeln!(
                    output,
                    "| {indent}<!DOCTYPE {name} \"{public_id}\" \"{system_id}\">"
                );
            }
        }
        NodeType::Element(element) => {
            match element.namespace.prefix() {
                Some(prefix) => {
                    let _ = writeln!(output, "| {indent}<{prefix} {}>", element.tag_name);
                }
                None => {
                    let _ = writeln!(output, "| {indent}<{}>", element.tag_name);
                }
            }

            let mut attributes: Vec<(String, &String)> = element
                .attrs
                .iter()
                .map(|(name, value)| (display_attribute_name(element, name), value))
                .collect();
            attributes.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, value) in attributes {
                let _ = writeln!(output, "| {indent}  {name}=\"{value}\"");
            }

            if element.is_html("template") {
                let _ = writeln!(output, "| {indent}  content");
                child_depth += 1;
            }
        }
        NodeType::Text(data) => {
            let _ = writeln!(output, "| {indent}\"{data}\"");
        }
        NodeType::Comment(data) => {
            let _ = writeln!(output, "| {indent}<!-- {data} -->");
        }
        NodeType::Document | NodeType::DocumentFragment => {}
    }

    for &child in tree.children(id) {
        dump_node(tree, child, child_depth, output);
    }
}

/// Foreign elements show namespaced attributes as `prefix local`.
fn display_attribute_name(element: &ElementData, name: &str) -> String {
    if element.namespace != Namespace::Html
        && let Some(attribute) = foreign_attribute(name)
    {
        return match attribute.prefix {
            Some(prefix) => format!("{prefix} {}", attribute.local_name),
            None => attribute.local_name.to_string(),
        };
    }
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_attribute_values() {
        let mut text = String::new();
        escape_into(&mut text, "a<b>&\u{A0}\"", false);
        assert_eq!(text, "a&lt;b&gt;&amp;&nbsp;\"");

        let mut attribute = String::new();
        escape_into(&mut attribute, "a<b>&\"", true);
        assert_eq!(attribute, "a<b>&amp;&quot;");
    }
}
