//! `<select>`: "in select" and "in select in table".

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn handle_in_select_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            (Token::NullCharacter, _) => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),

            // "Any other character token"
            // "Insert the token's character."
            (Token::Character { data } | Token::Whitespace { data }, _) => {
                self.insert_characters(data);
            }

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

            // "A start tag whose tag name is "option""
            // "If the current node is an option element, pop that node from the
            // stack of open elements."
            // "Insert an HTML element for the token."
            (Token::StartTag { attributes, .. }, TagId::Option) => {
                if self.current_node_is(TagId::Option) {
                    let _ = self.stack_of_open_elements.pop();
                }
                let _ = self.insert_html_element("option", attributes);
            }

            // "A start tag whose tag name is "optgroup""
            // "If the current node is an option element, pop that node from the
            // stack of open elements."
            // "If the current node is an optgroup element, pop that node from
            // the stack of open elements."
            // "Insert an HTML element for the token."
            (Token::StartTag { attributes, .. }, TagId::Optgroup) => {
                self.close_open_options();
                let _ = self.insert_html_element("optgroup", attributes);
            }

            // "A start tag whose tag name is "hr""
            // "If the current node is an option element, pop that node from the
            // stack of open elements."
            // "If the current node is an optgroup element, pop that node from
            // the stack of open elements."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            (Token::StartTag { attributes, .. }, TagId::Hr) => {
                self.close_open_options();
                let _ = self.insert_html_element("hr", attributes);
                let _ = self.stack_of_open_elements.pop();
                self.self_closing_acknowledged = true;
            }

            // "An end tag whose tag name is "optgroup""
            (Token::EndTag { .. }, TagId::Optgroup) => {
                // "First, if the current node is an option element, and the node
                // immediately before it in the stack of open elements is an
                // optgroup element, then pop the current node from the stack of
                // open elements."
                let len = self.stack_of_open_elements.len();
                if self.current_node_is(TagId::Option)
                    && len >= 2
                    && self
                        .stack_of_open_elements
                        .get(len - 2)
                        .is_some_and(|entry| entry.is_html(TagId::Optgroup))
                {
                    let _ = self.stack_of_open_elements.pop();
                }
                // "If the current node is an optgroup element, then pop that node
                // from the stack of open elements. Otherwise, this is a parse
                // error; ignore the token."
                if self.current_node_is(TagId::Optgroup) {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                }
            }

            // "An end tag whose tag name is "option""
            // "If the current node is an option element, then pop that node from
            // the stack of open elements. Otherwise, this is a parse error;
            // ignore the token."
            (Token::EndTag { .. }, TagId::Option) => {
                if self.current_node_is(TagId::Option) {
                    let _ = self.stack_of_open_elements.pop();
                } else {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                }
            }

            // "An end tag whose tag name is "select""
            // "If the stack of open elements does not have a select element in
            // select scope, this is a parse error; ignore the token. (fragment
            // case)"
            (Token::EndTag { .. }, TagId::Select) => {
                if !self.close_select_element() {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                }
            }

            // "A start tag whose tag name is "select""
            // "Parse error."
            // "If the stack of open elements does not have a select element in
            // select scope, ignore the token. (fragment case)"
            // "Otherwise: Pop elements from the stack of open elements until a
            // select element has been popped from the stack. Reset the insertion
            // mode appropriately."
            (Token::StartTag { .. }, TagId::Select) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                let _ = self.close_select_element();
            }

            // "A start tag whose tag name is one of: "input", "keygen", "textarea""
            // "Parse error."
            // "If the stack of open elements does not have a select element in
            // select scope, ignore the token. (fragment case)"
            // "Otherwise: ... Reprocess the token."
            (Token::StartTag { .. }, TagId::Input | TagId::Keygen | TagId::Textarea) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                if self.close_select_element() {
                    self.reprocess_token(token);
                }
            }

            // "A start tag whose tag name is one of: "script", "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. }, TagId::Script | TagId::Template)
            | (Token::EndTag { .. }, TagId::Template) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::EndOfFile, _) => self.process_token_in_mode(InsertionMode::InBody, token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => self.unexpected_token(token),
        }
    }

    /// Pop a trailing `option`, then a trailing `optgroup`.
    fn close_open_options(&mut self) {
        if self.current_node_is(TagId::Option) {
            let _ = self.stack_of_open_elements.pop();
        }
        if self.current_node_is(TagId::Optgroup) {
            let _ = self.stack_of_open_elements.pop();
        }
    }

    /// Pop up to and including the select in select scope and reset the
    /// insertion mode. Returns `false` when there is no such select.
    fn close_select_element(&mut self) -> bool {
        if !self.stack_of_open_elements.has_in_select_scope(TagId::Select) {
            return false;
        }
        self.stack_of_open_elements.pop_until_tag(TagId::Select);
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn handle_in_select_in_table_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            // element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Table
                | TagId::Tbody
                | TagId::Tfoot
                | TagId::Thead
                | TagId::Tr
                | TagId::Td
                | TagId::Th,
            ) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                self.stack_of_open_elements.pop_until_tag(TagId::Select);
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "caption", "table", "tbody",
            // "tfoot", "thead", "tr", "td", "th""
            (
                Token::EndTag { .. },
                tag @ (TagId::Caption
                | TagId::Table
                | TagId::Tbody
                | TagId::Tfoot
                | TagId::Thead
                | TagId::Tr
                | TagId::Td
                | TagId::Th),
            ) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::UnexpectedEndTag);
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(tag) {
                    return;
                }
                // "Otherwise: Pop elements from the stack of open elements until
                // a select element has been popped from the stack."
                // "Reset the insertion mode appropriately."
                // "Reprocess the token."
                self.stack_of_open_elements.pop_until_tag(TagId::Select);
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.process_token_in_mode(InsertionMode::InSelect, token),
        }
    }
}
