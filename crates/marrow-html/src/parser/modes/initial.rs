//! The document prologue: "initial", "before html" and "before head".

use marrow_dom::{DocumentMode, Namespace, NodeType};

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::quirks::{self, DoctypeFields};
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Whitespace { .. } => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let document = self.tree.root();
                self.insert_comment(data, Some((document, None)));
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                let fields = DoctypeFields {
                    name: name.as_deref(),
                    public_identifier: public_identifier.as_deref(),
                    system_identifier: system_identifier.as_deref(),
                    force_quirks: *force_quirks,
                };

                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                if !quirks::is_conforming(&fields) {
                    self.parse_error(ParseErrorCode::NonConformingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing; its public ID set to the
                // public identifier given in the DOCTYPE token, or the empty
                // string if the public identifier was missing; and its system
                // ID set to the system identifier given in the DOCTYPE token, or
                // the empty string if the system identifier was missing."
                let doctype = self.tree.alloc(NodeType::DocumentType {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                });
                self.record_span(doctype);
                let document = self.tree.root();
                self.tree.append_child(document, doctype);

                let mode = quirks::document_mode(&fields);
                self.tree.set_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_to(InsertionMode::BeforeHtml);
            }

            // "Anything else"
            _ => {
                // "If the document is not an iframe srcdoc document, then this
                // is a parse error; if the parser cannot change the mode flag is
                // false, set the Document to quirks mode."
                self.parse_error(ParseErrorCode::MissingDoctype);
                self.tree.set_mode(DocumentMode::Quirks);

                // "In any case, switch the insertion mode to "before html",
                // then reprocess the token."
                self.switch_to(InsertionMode::BeforeHtml);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn handle_before_html_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            (Token::Comment { data }, _) => {
                let document = self.tree.root();
                self.insert_comment(data, Some((document, None)));
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            (Token::Whitespace { .. }, _) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            (Token::StartTag { attributes, .. }, TagId::Html) => {
                let html = self.create_element("html", attributes, Namespace::Html);
                let document = self.tree.root();
                self.tree.append_child(document, html);
                self.push_open_element(html);
                self.switch_to(InsertionMode::BeforeHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            (Token::EndTag { .. }, TagId::Head | TagId::Body | TagId::Html | TagId::Br) => {
                self.implied_html_element(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in the
            // stack of open elements."
            // "Switch the insertion mode to "before head", then reprocess the token."
            _ => self.implied_html_element(token),
        }
    }

    fn implied_html_element(&mut self, token: &Token) {
        let html = self.create_element("html", &[], Namespace::Html);
        let document = self.tree.root();
        self.tree.append_child(document, html);
        self.push_open_element(html);
        self.switch_to(InsertionMode::BeforeHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn handle_before_head_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            (Token::Whitespace { .. }, _) => {}

            // "A comment token"
            // "Insert a comment."
            (Token::Comment { data }, _) => self.insert_comment(data, None),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::StartTag { .. }, TagId::Html) => {
                self.process_token_in_mode(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            (Token::StartTag { attributes, .. }, TagId::Head) => {
                let head = self.insert_html_element("head", attributes);
                self.head_element_pointer = Some(head);
                self.switch_to(InsertionMode::InHead);
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            (Token::EndTag { .. }, TagId::Head | TagId::Body | TagId::Html | TagId::Br) => {
                self.implied_head_element(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no attributes."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            // "Reprocess the current token."
            _ => self.implied_head_element(token),
        }
    }

    fn implied_head_element(&mut self, token: &Token) {
        let head = self.insert_implied_html_element("head");
        self.head_element_pointer = Some(head);
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }
}
