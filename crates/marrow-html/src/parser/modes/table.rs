//! Tables: "in table", "in table text", "in caption", "in column group",
//! "in table body", "in row" and "in cell".

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::modes::body::is_hidden_input;
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn handle_in_table_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            (Token::Character { .. } | Token::Whitespace { .. } | Token::NullCharacter, _)
                if self.current_node().is_some_and(|current| {
                    current.is_html_one_of(&[
                        TagId::Table,
                        TagId::Tbody,
                        TagId::Template,
                        TagId::Tfoot,
                        TagId::Thead,
                        TagId::Tr,
                    ])
                }) =>
            {
                // "Let the pending table character tokens be an empty list of tokens."
                // "Let the original insertion mode be the current insertion mode."
                // "Switch the insertion mode to "in table text" and reprocess the token."
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.switch_to(InsertionMode::InTableText);
                self.reprocess_token(token);
            }

            // "A comment token"
            // "Insert a comment."
            (Token::Comment { data }, _) => self.insert_comment(data, None),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "A start tag whose tag name is "caption""
            // "Clear the stack back to a table context."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in caption"."
            (Token::StartTag { attributes, .. }, TagId::Caption) => {
                self.stack_of_open_elements.clear_to_table_context();
                self.active_formatting_elements.insert_marker();
                let _ = self.insert_html_element("caption", attributes);
                self.switch_to(InsertionMode::InCaption);
            }

            // "A start tag whose tag name is "colgroup""
            // "Clear the stack back to a table context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in column group"."
            (Token::StartTag { attributes, .. }, TagId::Colgroup) => {
                self.stack_of_open_elements.clear_to_table_context();
                let _ = self.insert_html_element("colgroup", attributes);
                self.switch_to(InsertionMode::InColumnGroup);
            }

            // "A start tag whose tag name is "col""
            // "Clear the stack back to a table context."
            // "Insert an HTML element for a "colgroup" start tag token with no
            // attributes, then switch the insertion mode to "in column group"."
            // "Reprocess the current token."
            (Token::StartTag { .. }, TagId::Col) => {
                self.stack_of_open_elements.clear_to_table_context();
                let _ = self.insert_implied_html_element("colgroup");
                self.switch_to(InsertionMode::InColumnGroup);
                self.reprocess_token(token);
            }

            // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
            // "Clear the stack back to a table context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in table body"."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Tbody | TagId::Tfoot | TagId::Thead,
            ) => {
                self.stack_of_open_elements.clear_to_table_context();
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InTableBody);
            }

            // "A start tag whose tag name is one of: "td", "th", "tr""
            // "Clear the stack back to a table context."
            // "Insert an HTML element for a "tbody" start tag token with no
            // attributes, then switch the insertion mode to "in table body"."
            // "Reprocess the current token."
            (Token::StartTag { .. }, TagId::Td | TagId::Th | TagId::Tr) => {
                self.stack_of_open_elements.clear_to_table_context();
                let _ = self.insert_implied_html_element("tbody");
                self.switch_to(InsertionMode::InTableBody);
                self.reprocess_token(token);
            }

            // "A start tag whose tag name is "table""
            (Token::StartTag { .. }, TagId::Table) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                // "If the stack of open elements does not have a table element
                // in table scope, ignore the token."
                // "Otherwise: Pop elements from this stack until a table element
                // has been popped from the stack."
                // "Reset the insertion mode appropriately."
                // "Reprocess the token."
                if self.close_table_element() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is "table""
            (Token::EndTag { .. }, TagId::Table) => {
                // "If the stack of open elements does not have a table element
                // in table scope, this is a parse error; ignore the token."
                if !self.close_table_element() {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            (
                Token::EndTag { .. },
                TagId::Body
                | TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Html
                | TagId::Tbody
                | TagId::Td
                | TagId::Tfoot
                | TagId::Th
                | TagId::Thead
                | TagId::Tr,
            ) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "A start tag whose tag name is one of: "style", "script", "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. }, TagId::Style | TagId::Script | TagId::Template)
            | (Token::EndTag { .. }, TagId::Template) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "input""
            // "If the token does not have an attribute with the name "type", or
            // if it does, but that attribute's value is not an ASCII
            // case-insensitive match for the string "hidden", then: act as
            // described in the "anything else" entry below."
            // "Otherwise: Parse error. Insert an HTML element for the token. Pop
            // that input element off the stack of open elements. Acknowledge
            // the token's self-closing flag, if it is set."
            (Token::StartTag { attributes, .. }, TagId::Input) if is_hidden_input(token) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                let _ = self.insert_html_element("input", attributes);
                let _ = self.stack_of_open_elements.pop();
                self.self_closing_acknowledged = true;
            }

            // "A start tag whose tag name is "form""
            // "Parse error."
            // "If there is a template element on the stack of open elements, or
            // if the form element pointer is not null, ignore the token."
            // "Otherwise: Insert an HTML element for the token, and set the form
            // element pointer to point to the element created. Pop that form
            // element off the stack of open elements."
            (Token::StartTag { attributes, .. }, TagId::Form) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                if self.stack_of_open_elements.has_template() || self.form_element_pointer.is_some() {
                    return;
                }
                let form = self.insert_html_element("form", attributes);
                self.form_element_pointer = Some(form);
                let _ = self.stack_of_open_elements.pop();
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::EndOfFile, _) => self.process_token_in_mode(InsertionMode::InBody, token),

            // "Anything else"
            _ => {
                self.parse_error(ParseErrorCode::FosterParentedElement);
                self.process_with_foster_parenting(token);
            }
        }
    }

    /// Pop up to and including the table in table scope and reset the
    /// insertion mode. Returns `false` when there is no such table.
    fn close_table_element(&mut self) -> bool {
        if !self.stack_of_open_elements.has_in_table_scope(TagId::Table) {
            return false;
        }
        self.stack_of_open_elements.pop_until_tag(TagId::Table);
        self.reset_insertion_mode_appropriately();
        true
    }

    /// "Enable foster parenting, process the token using the rules for the "in
    /// body" insertion mode, and then disable foster parenting."
    fn process_with_foster_parenting(&mut self, token: &Token) {
        self.foster_parenting = true;
        self.process_token_in_mode(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::NullCharacter => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),

            // "Any other character token"
            // "Append the character token to the pending table character tokens list."
            Token::Character { .. } | Token::Whitespace { .. } => {
                self.pending_table_character_tokens.push(token.clone());
            }

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);

                // "If any of the tokens in the pending table character tokens
                // list are character tokens that are not ASCII whitespace, then
                // this is a parse error: reprocess the character tokens in the
                // pending table character tokens list using the rules given in
                // the "anything else" entry in the "in table" insertion mode."
                // "Otherwise, insert the characters given by the pending table
                // character tokens list."
                if pending
                    .iter()
                    .any(|pending| matches!(pending, Token::Character { .. }))
                {
                    // Reported once per pending run.
                    self.parse_error(ParseErrorCode::UnexpectedCharacterInTable);
                    for pending in &pending {
                        self.process_with_foster_parenting(pending);
                    }
                } else {
                    for pending in &pending {
                        if let Token::Whitespace { data } = pending {
                            self.insert_characters(data);
                        }
                    }
                }

                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                let mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                self.switch_to(mode);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn handle_in_caption_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "An end tag whose tag name is "caption""
            (Token::EndTag { .. }, TagId::Caption) => {
                let _ = self.close_caption_element();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element in
            // table scope, this is a parse error; ignore the token. (fragment
            // case)"
            // "Otherwise: ... Reprocess the token."
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Tbody
                | TagId::Td
                | TagId::Tfoot
                | TagId::Th
                | TagId::Thead
                | TagId::Tr,
            )
            | (Token::EndTag { .. }, TagId::Table) => {
                if self.close_caption_element() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            (
                Token::EndTag { .. },
                TagId::Body
                | TagId::Col
                | TagId::Colgroup
                | TagId::Html
                | TagId::Tbody
                | TagId::Td
                | TagId::Tfoot
                | TagId::Th
                | TagId::Thead
                | TagId::Tr,
            ) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_token_in_mode(InsertionMode::InBody, token),
        }
    }

    /// Close the caption in table scope and return to "in table". Returns
    /// `false`, after reporting a parse error, when there is none.
    fn close_caption_element(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in
        // table scope, this is a parse error; ignore the token. (fragment case)"
        if !self.stack_of_open_elements.has_in_table_scope(TagId::Caption) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return false;
        }
        // "1. Generate implied end tags."
        self.stack_of_open_elements.generate_implied_end_tags();
        // "2. Now, if the current node is not a caption element, then this is a
        // parse error."
        if !self.current_node_is(TagId::Caption) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        // "3. Pop elements from this stack until a caption element has been
        // popped from the stack."
        self.stack_of_open_elements.pop_until_tag(TagId::Caption);
        // "4. Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();
        // "5. Switch the insertion mode to "in table"."
        self.switch_to(InsertionMode::InTable);
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn handle_in_column_group_mode(&mut self, token: &Token) {
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

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            (Token::StartTag { attributes, .. }, TagId::Col) => {
                let _ = self.insert_html_element("col", attributes);
                let _ = self.stack_of_open_elements.pop();
                self.self_closing_acknowledged = true;
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table"."
            (Token::EndTag { .. }, TagId::Colgroup) => {
                if self.current_node_is(TagId::Colgroup) {
                    let _ = self.stack_of_open_elements.pop();
                    self.switch_to(InsertionMode::InTable);
                } else {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                }
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            (Token::EndTag { .. }, TagId::Col) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::StartTag { .. } | Token::EndTag { .. }, TagId::Template) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::EndOfFile, _) => self.process_token_in_mode(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements."
            // "Switch the insertion mode to "in table"."
            // "Reprocess the token."
            _ => {
                if !self.current_node_is(TagId::Colgroup) {
                    self.unexpected_token(token);
                    return;
                }
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn handle_in_table_body_mode(&mut self, token: &Token) {
        const SECTIONS: &[TagId] = &[TagId::Tbody, TagId::Thead, TagId::Tfoot];

        match (token, TagId::of(token)) {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in row"."
            (Token::StartTag { attributes, .. }, TagId::Tr) => {
                self.stack_of_open_elements.clear_to_table_body_context();
                let _ = self.insert_html_element("tr", attributes);
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row"."
            // "Reprocess the current token."
            (Token::StartTag { .. }, TagId::Th | TagId::Td) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                self.stack_of_open_elements.clear_to_table_body_context();
                let _ = self.insert_implied_html_element("tr");
                self.switch_to(InsertionMode::InRow);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            (Token::EndTag { .. }, tag @ (TagId::Tbody | TagId::Tfoot | TagId::Thead)) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "Otherwise: Clear the stack back to a table body context."
                // "Pop the current node from the stack of open elements. Switch
                // the insertion mode to "in table"."
                self.stack_of_open_elements.clear_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Tbody
                | TagId::Tfoot
                | TagId::Thead,
            )
            | (Token::EndTag { .. }, TagId::Table) => {
                // "If the stack of open elements does not have a tbody, thead,
                // or tfoot element in table scope, this is a parse error;
                // ignore the token."
                if !self.stack_of_open_elements.has_any_in_table_scope(SECTIONS) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "Otherwise: Clear the stack back to a table body context."
                // "Pop the current node from the stack of open elements. Switch
                // the insertion mode to "in table"."
                // "Reprocess the token."
                self.stack_of_open_elements.clear_to_table_body_context();
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InTable);
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            (
                Token::EndTag { .. },
                TagId::Body
                | TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Html
                | TagId::Td
                | TagId::Th
                | TagId::Tr,
            ) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_token_in_mode(InsertionMode::InTable, token),
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn handle_in_row_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context."
            // "Insert an HTML element for the token, then switch the insertion
            // mode to "in cell"."
            // "Insert a marker at the end of the list of active formatting elements."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Th | TagId::Td,
            ) => {
                self.stack_of_open_elements.clear_to_table_row_context();
                let _ = self.insert_html_element(name, attributes);
                self.switch_to(InsertionMode::InCell);
                self.active_formatting_elements.insert_marker();
            }

            // "An end tag whose tag name is "tr""
            (Token::EndTag { .. }, TagId::Tr) => {
                let _ = self.close_row_element();
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Tbody
                | TagId::Tfoot
                | TagId::Thead
                | TagId::Tr,
            )
            | (Token::EndTag { .. }, TagId::Table) => {
                if self.close_row_element() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            (Token::EndTag { .. }, tag @ (TagId::Tbody | TagId::Tfoot | TagId::Thead)) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // the token, this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(TagId::Tr) {
                    return;
                }
                // "Otherwise: ... Reprocess the token."
                if self.close_row_element() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            (
                Token::EndTag { .. },
                TagId::Body
                | TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Html
                | TagId::Td
                | TagId::Th,
            ) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_token_in_mode(InsertionMode::InTable, token),
        }
    }

    /// Close the row in table scope and return to "in table body". Returns
    /// `false`, after reporting a parse error, when there is none.
    fn close_row_element(&mut self) -> bool {
        // "If the stack of open elements does not have a tr element in table
        // scope, this is a parse error; ignore the token."
        if !self.stack_of_open_elements.has_in_table_scope(TagId::Tr) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return false;
        }
        // "1. Clear the stack back to a table row context."
        self.stack_of_open_elements.clear_to_table_row_context();
        // "2. Pop the current node (which will be a tr element) from the stack
        // of open elements. Switch the insertion mode to "in table body"."
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn handle_in_cell_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "An end tag whose tag name is one of: "td", "th""
            (Token::EndTag { .. }, tag @ (TagId::Td | TagId::Th)) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "1. Generate implied end tags."
                self.stack_of_open_elements.generate_implied_end_tags();
                // "2. Now, if the current node is not an HTML element with the
                // same tag name as the token, then this is a parse error."
                if !self.current_node_is(tag) {
                    self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
                }
                // "3. Pop elements from the stack of open elements stack until an
                // HTML element with the same tag name as the token has been
                // popped from the stack."
                self.stack_of_open_elements.pop_until_tag(tag);
                // "4. Clear the list of active formatting elements up to the last marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "5. Switch the insertion mode to "in row"."
                self.switch_to(InsertionMode::InRow);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Tbody
                | TagId::Td
                | TagId::Tfoot
                | TagId::Th
                | TagId::Thead
                | TagId::Tr,
            ) => {
                // "Assert: The stack of open elements has a td or th element in
                // table scope."
                // Only a fragment parsed for a cell context gets here without
                // one; the token is then ignored.
                if !self
                    .stack_of_open_elements
                    .has_any_in_table_scope(&[TagId::Td, TagId::Th])
                {
                    self.parse_error(ParseErrorCode::MisplacedStartTag);
                    return;
                }
                // "Close the cell (see below) and reprocess the token."
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            (
                Token::EndTag { .. },
                TagId::Body | TagId::Caption | TagId::Col | TagId::Colgroup | TagId::Html,
            ) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            (
                Token::EndTag { .. },
                tag @ (TagId::Table | TagId::Tbody | TagId::Tfoot | TagId::Thead | TagId::Tr),
            ) => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name as
                // that of the token, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_table_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "Otherwise, close the cell (see below) and reprocess the token."
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_token_in_mode(InsertionMode::InBody, token),
        }
    }

    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm:"
    fn close_the_cell(&mut self) {
        // "1. Generate implied end tags."
        self.stack_of_open_elements.generate_implied_end_tags();
        // "2. If the current node is not now a td element or a th element, then
        // this is a parse error."
        if !self.current_node_is(TagId::Td) && !self.current_node_is(TagId::Th) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        // "3. Pop elements from the stack of open elements stack until a td
        // element or a th element has been popped from the stack."
        self.stack_of_open_elements
            .pop_until_one_of(&[TagId::Td, TagId::Th]);
        // "4. Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();
        // "5. Switch the insertion mode to "in row"."
        self.switch_to(InsertionMode::InRow);
    }
}
