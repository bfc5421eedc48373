//! Foreign content parsing support for SVG and MathML.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use marrow_dom::Namespace;

use super::core::HTMLParser;
use super::open_elements::OpenElement;
use super::tag::TagId;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

/// A namespaced attribute produced by "adjust foreign attributes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignAttribute {
    /// Namespace prefix, or `None` for `xmlns` itself.
    pub prefix: Option<&'static str>,
    /// Local name.
    pub local_name: &'static str,
    /// Namespace URL.
    pub namespace: &'static str,
}

const XLINK: &str = "http://www.w3.org/1999/xlink";
const XML: &str = "http://www.w3.org/XML/1998/namespace";
const XMLNS: &str = "http://www.w3.org/2000/xmlns/";

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "When the steps below require the user agent to adjust foreign attributes
/// for a token, then, if any of the attributes on the token match the strings
/// given in the first column of the following table, let the attribute be a
/// namespaced attribute, with the prefix being the string given in the cell in
/// the second column, the local name being the string given in the cell in
/// the third column, and the namespace being the namespace given in the cell
/// in the fourth column."
///
/// Elements keep such attributes under their qualified name (`xlink:href`),
/// which is also how they serialize; this recovers the namespace split for
/// foreign elements.
#[must_use]
pub fn foreign_attribute(name: &str) -> Option<ForeignAttribute> {
    let (prefix, local_name, namespace) = match name {
        "xlink:actuate" => (Some("xlink"), "actuate", XLINK),
        "xlink:arcrole" => (Some("xlink"), "arcrole", XLINK),
        "xlink:href" => (Some("xlink"), "href", XLINK),
        "xlink:role" => (Some("xlink"), "role", XLINK),
        "xlink:show" => (Some("xlink"), "show", XLINK),
        "xlink:title" => (Some("xlink"), "title", XLINK),
        "xlink:type" => (Some("xlink"), "type", XLINK),
        "xml:lang" => (Some("xml"), "lang", XML),
        "xml:space" => (Some("xml"), "space", XML),
        "xmlns" => (None, "xmlns", XMLNS),
        "xmlns:xlink" => (Some("xmlns"), "xlink", XMLNS),
        _ => return None,
    };
    Some(ForeignAttribute {
        prefix,
        local_name,
        namespace,
    })
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// "A start tag whose tag name is one of: "b", "big", "blockquote", "body",
/// "br", "center", "code", "dd", "div", "dl", "dt", "em", "embed", "h1", "h2",
/// "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing", "menu",
/// "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong",
/// "strike", "sub", "sup", "table", "tt", "u", "ul", "var""
const fn breaks_out_of_foreign_content(tag: TagId) -> bool {
    matches!(
        tag,
        TagId::B
            | TagId::Big
            | TagId::Blockquote
            | TagId::Body
            | TagId::Br
            | TagId::Center
            | TagId::Code
            | TagId::Dd
            | TagId::Div
            | TagId::Dl
            | TagId::Dt
            | TagId::Em
            | TagId::Embed
            | TagId::H1
            | TagId::H2
            | TagId::H3
            | TagId::H4
            | TagId::H5
            | TagId::H6
            | TagId::Head
            | TagId::Hr
            | TagId::I
            | TagId::Img
            | TagId::Li
            | TagId::Listing
            | TagId::Menu
            | TagId::Meta
            | TagId::Nobr
            | TagId::Ol
            | TagId::P
            | TagId::Pre
            | TagId::Ruby
            | TagId::S
            | TagId::Small
            | TagId::Span
            | TagId::Strong
            | TagId::Strike
            | TagId::Sub
            | TagId::Sup
            | TagId::Table
            | TagId::Tt
            | TagId::U
            | TagId::Ul
            | TagId::Var
    )
}

impl HTMLParser {
    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
    ///
    /// "A node is an HTML integration point if it is one of the following
    /// elements: A MathML annotation-xml element whose start tag token had an
    /// attribute with the name "encoding" whose value was an ASCII
    /// case-insensitive match for the string "text/html"; A MathML
    /// annotation-xml element whose start tag token had an attribute with the
    /// name "encoding" whose value was an ASCII case-insensitive match for the
    /// string "application/xhtml+xml"; An SVG foreignObject element; An SVG
    /// desc element; An SVG title element"
    pub(crate) fn is_html_integration_point(&self, entry: &OpenElement) -> bool {
        match entry.namespace {
            Namespace::Svg => matches!(
                entry.tag,
                TagId::ForeignObject | TagId::Desc | TagId::Title
            ),
            Namespace::MathMl if entry.tag == TagId::AnnotationXml => self
                .tree
                .as_element(entry.node)
                .and_then(|element| element.attrs.get("encoding"))
                .is_some_and(|encoding| {
                    encoding.eq_ignore_ascii_case("text/html")
                        || encoding.eq_ignore_ascii_case("application/xhtml+xml")
                }),
            _ => false,
        }
    }

    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn process_token_in_foreign_content(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::NullCharacter => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.insert_characters("\u{FFFD}");
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            Token::Whitespace { data } => self.insert_characters(data),

            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_characters(data);
                self.frameset_ok = false;
            }

            Token::Comment { data } => self.insert_comment(data, None),

            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MisplacedDoctype),

            Token::StartTag {
                name, attributes, ..
            } if breaks_out_of_foreign_content(TagId::from_name(name))
                || (TagId::from_name(name) == TagId::Font
                    && attributes
                        .iter()
                        .any(|attr| matches!(attr.name.as_str(), "color" | "face" | "size"))) =>
            {
                self.break_out_of_foreign_content(token);
            }

            Token::EndTag { name, .. } if matches!(TagId::from_name(name), TagId::Br | TagId::P) => {
                self.break_out_of_foreign_content(token);
            }

            // "Any other start tag"
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let Some(adjusted) = self.adjusted_current_node() else {
                    return;
                };
                let namespace = adjusted.namespace;
                let mut attributes = attributes.clone();
                let mut local_name = name.as_str();
                match namespace {
                    // "If the adjusted current node is an element in the
                    // MathML namespace, adjust MathML attributes for the token."
                    Namespace::MathMl => adjust_mathml_attributes(&mut attributes),
                    // "If the adjusted current node is an element in the SVG
                    // namespace, and the token's tag name is one of the ones in
                    // the first column of the following table, change the tag
                    // name to the name given in the corresponding cell in the
                    // second column."
                    // "If the adjusted current node is an element in the SVG
                    // namespace, adjust SVG attributes for the token."
                    Namespace::Svg => {
                        if let Some(adjusted_name) = adjust_svg_tag_name(name) {
                            local_name = adjusted_name;
                        }
                        adjust_svg_attributes(&mut attributes);
                    }
                    Namespace::Html => {}
                }

                // "Insert a foreign element for the token, with adjusted
                // current node's namespace and false."
                let node = self.insert_foreign_element(local_name, &attributes, namespace, false);

                // "If the token has its self-closing flag set, then run the
                // appropriate steps from the following list:"
                if *self_closing {
                    self.self_closing_acknowledged = true;
                    let _ = self.stack_of_open_elements.pop();
                    // "If the token's tag name is "script", and the new current
                    // node is in the SVG namespace"
                    if namespace == Namespace::Svg && name == "script" && self.scripting_enabled {
                        self.pending_script = Some(node);
                    }
                }
            }

            // "An end tag whose tag name is "script", if the current node is
            // an SVG script element"
            Token::EndTag { name, .. }
                if name == "script"
                    && self.current_node().is_some_and(|current| {
                        current.namespace == Namespace::Svg && current.tag == TagId::Script
                    }) =>
            {
                if let Some(script) = self.stack_of_open_elements.pop()
                    && self.scripting_enabled
                {
                    self.pending_script = Some(script.node);
                }
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.foreign_content_other_end_tag(token, name),

            Token::EndOfFile => self.process_token_in_mode(self.insertion_mode, token),
        }
    }

    /// A breakout start tag (or `</br>`/`</p>`) in foreign content.
    fn break_out_of_foreign_content(&mut self, token: &Token) {
        // "Parse error."
        self.parse_error(ParseErrorCode::UnexpectedHtmlElementInForeignContent);

        // "While the current node is not a MathML text integration point, an
        // HTML integration point, or an element in the HTML namespace, pop
        // elements from the stack of open elements."
        while let Some(current) = self.current_node() {
            if current.is_mathml_text_integration_point()
                || self.is_html_integration_point(&current)
                || current.namespace == Namespace::Html
            {
                break;
            }
            let _ = self.stack_of_open_elements.pop();
        }

        // "Reprocess the token according to the rules given in the section
        // corresponding to the current insertion mode in HTML content."
        self.process_token_in_mode(self.insertion_mode, token);
    }

    fn foreign_content_other_end_tag(&mut self, token: &Token, name: &str) {
        let stack_len = self.stack_of_open_elements.len();
        if stack_len == 0 {
            return;
        }

        // "1. Initialize node to be the current node (the bottommost node of the stack)."
        let mut index = stack_len - 1;

        // "2. If node's tag name, converted to ASCII lowercase, is not the same
        // as the tag name of the token, then this is a parse error."
        if !self.open_element_has_name(index, name) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
        }

        loop {
            // "3. Loop: If node is the topmost element in the stack of open
            // elements, then return. (fragment case)"
            if index == 0 {
                return;
            }

            // "4. If node's tag name, converted to ASCII lowercase, is the same
            // as the tag name of the token, pop elements from the stack of open
            // elements until node has been popped from the stack, and then
            // return."
            if self.open_element_has_name(index, name) {
                if let Some(entry) = self.stack_of_open_elements.get(index).copied() {
                    self.stack_of_open_elements.pop_until_node(entry.node);
                }
                return;
            }

            // "5. Set node to the previous entry in the stack of open elements."
            index -= 1;

            // "6. If node is not an element in the HTML namespace, return to
            // the step labeled loop."
            let is_html = self
                .stack_of_open_elements
                .get(index)
                .is_some_and(|entry| entry.namespace == Namespace::Html);
            if is_html {
                // "7. Otherwise, process the token according to the rules given
                // in the section corresponding to the current insertion mode in
                // HTML content."
                self.process_token_in_mode(self.insertion_mode, token);
                return;
            }
        }
    }

    fn open_element_has_name(&self, index: usize, name: &str) -> bool {
        self.stack_of_open_elements
            .get(index)
            .and_then(|entry| self.tree.as_element(entry.node))
            .is_some_and(|element| element.tag_name.to_ascii_lowercase() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_foreign_attribute_names() {
        let href = foreign_attribute("xlink:href");
        assert_eq!(
            href,
            Some(ForeignAttribute {
                prefix: Some("xlink"),
                local_name: "href",
                namespace: XLINK,
            })
        );
        assert_eq!(foreign_attribute("xmlns").and_then(|a| a.prefix), None);
        assert!(foreign_attribute("href").is_none());
    }
}
