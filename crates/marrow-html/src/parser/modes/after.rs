//! The end of the document: "after body", "in frameset", "after frameset",
//! "after after body" and "after after frameset".

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn handle_after_body_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::Whitespace { .. }, _) | (Token::StartTag { .. }, TagId::Html) => {
                self.process_token_in_mode(InsertionMode::InBody, token);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            (Token::Comment { data }, _) => {
                let html = self
                    .stack_of_open_elements
                    .get(0)
                    .map_or(self.tree.root(), |entry| entry.node);
                self.insert_comment(data, Some((html, None)));
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            (Token::EndTag { .. }, TagId::Html) => {
                if self.context_element.is_some() {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                } else {
                    self.switch_to(InsertionMode::AfterAfterBody);
                }
            }

            // "An end-of-file token"
            // "Stop parsing."
            (Token::EndOfFile, _) => {}

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error(ParseErrorCode::UnexpectedContentAfterBody);
                self.switch_to(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn handle_in_frameset_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            (Token::Whitespace { data }, _) => self.insert_characters(data),

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

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            (Token::StartTag { attributes, .. }, TagId::Frameset) => {
                let _ = self.insert_html_element("frameset", attributes);
            }

            // "An end tag whose tag name is "frameset""
            (Token::EndTag { .. }, TagId::Frameset) => {
                // "If the current node is the root html element, then this is a
                // parse error; ignore the token. (fragment case)"
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "Otherwise, pop the current node from the stack of open elements."
                let _ = self.stack_of_open_elements.pop();
                // "If the parser was not created as part of the HTML fragment
                // parsing algorithm (fragment case), and the current node is no
                // longer a frameset element, then switch the insertion mode to
                // "after frameset"."
                if self.context_element.is_none() && !self.current_node_is(TagId::Frameset) {
                    self.switch_to(InsertionMode::AfterFrameset);
                }
            }

            // "A start tag whose tag name is "frame""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            (Token::StartTag { attributes, .. }, TagId::Frame) => {
                let _ = self.insert_html_element("frame", attributes);
                let _ = self.stack_of_open_elements.pop();
                self.self_closing_acknowledged = true;
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. }, TagId::Noframes) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            // parse error."
            // "Note: The current node can only be the root html element in the
            // fragment case."
            // "Stop parsing."
            (Token::EndOfFile, _) => {
                if self.stack_of_open_elements.len() > 1 {
                    self.parse_error(ParseErrorCode::OpenElementsLeftAfterEof);
                }
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.unexpected_token_in_frameset(token),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn handle_after_frameset_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            (Token::Whitespace { data }, _) => self.insert_characters(data),

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

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            (Token::EndTag { .. }, TagId::Html) => {
                self.switch_to(InsertionMode::AfterAfterFrameset);
            }

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. }, TagId::Noframes) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            (Token::EndOfFile, _) => {}

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.unexpected_token_in_frameset(token),
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn handle_after_after_body_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            (Token::Comment { data }, _) => {
                let document = self.tree.root();
                self.insert_comment(data, Some((document, None)));
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::Doctype { .. } | Token::Whitespace { .. }, _)
            | (Token::StartTag { .. }, TagId::Html) => {
                self.process_token_in_mode(InsertionMode::InBody, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            (Token::EndOfFile, _) => {}

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess
            // the token."
            _ => {
                self.parse_error(ParseErrorCode::UnexpectedContentAfterBody);
                self.switch_to(InsertionMode::InBody);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn handle_after_after_frameset_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            (Token::Comment { data }, _) => {
                let document = self.tree.root();
                self.insert_comment(data, Some((document, None)));
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::Doctype { .. } | Token::Whitespace { .. }, _)
            | (Token::StartTag { .. }, TagId::Html) => {
                self.process_token_in_mode(InsertionMode::InBody, token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            (Token::EndOfFile, _) => {}

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. }, TagId::Noframes) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.unexpected_token_in_frameset(token),
        }
    }

    /// Ignore a token a frameset document has no place for. Text is reported
    /// once per character.
    fn unexpected_token_in_frameset(&mut self, token: &Token) {
        match token {
            Token::Character { data } => {
                for _ in data.chars() {
                    self.parse_error(ParseErrorCode::UnexpectedTokenInFrameset);
                }
            }
            _ => self.parse_error(ParseErrorCode::UnexpectedTokenInFrameset),
        }
    }
}
