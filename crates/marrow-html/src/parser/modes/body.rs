//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use marrow_dom::{DocumentMode, Namespace};

use crate::error::ParseErrorCode;
use crate::parser::adoption::AdoptionOutcome;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::foreign_content::{adjust_mathml_attributes, adjust_svg_attributes};
use crate::parser::tag::TagId;
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// Elements that may stay open when the body ends without a parse error.
const CLOSABLE_AT_END_OF_BODY: &[TagId] = &[
    TagId::Dd,
    TagId::Dt,
    TagId::Li,
    TagId::Optgroup,
    TagId::Option,
    TagId::P,
    TagId::Rb,
    TagId::Rp,
    TagId::Rt,
    TagId::Rtc,
    TagId::Tbody,
    TagId::Td,
    TagId::Tfoot,
    TagId::Th,
    TagId::Thead,
    TagId::Tr,
    TagId::Body,
    TagId::Html,
];

impl HTMLParser {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn handle_in_body_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            (Token::NullCharacter, _) => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            (Token::Whitespace { data }, _) => {
                self.reconstruct_active_formatting_elements();
                self.insert_characters(data);
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            (Token::Character { data }, _) => {
                self.reconstruct_active_formatting_elements();
                self.insert_characters(data);
                self.frameset_ok = false;
            }

            // "A comment token"
            // "Insert a comment."
            (Token::Comment { data }, _) => self.insert_comment(data, None),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "A start tag whose tag name is "html""
            (Token::StartTag { attributes, .. }, TagId::Html) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                // "If there is a template element on the stack of open
                // elements, then ignore the token."
                // "Otherwise, for each attribute on the token, check to see if
                // the attribute is already present on the top element of the
                // stack of open elements. If it is not, add the attribute and
                // its corresponding value to that element."
                if !self.stack_of_open_elements.has_template()
                    && let Some(html) = self.stack_of_open_elements.get(0).copied()
                {
                    self.merge_attributes(html.node, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            (
                Token::StartTag { .. },
                TagId::Base
                | TagId::Basefont
                | TagId::Bgsound
                | TagId::Link
                | TagId::Meta
                | TagId::Noframes
                | TagId::Script
                | TagId::Style
                | TagId::Template
                | TagId::Title,
            )
            | (Token::EndTag { .. }, TagId::Template) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "A start tag whose tag name is "body""
            (Token::StartTag { attributes, .. }, TagId::Body) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a body
                // element, or if there is a template element on the stack of
                // open elements, then ignore the token. (fragment case or there
                // is a template element on the stack)"
                // "Otherwise, set the frameset-ok flag to "not ok"; then, for
                // each attribute on the token, check to see if the attribute is
                // already present on the body element (the second element) on
                // the stack of open elements, and if it is not, add the
                // attribute and its corresponding value to that element."
                if let Some(body) = self.stack_of_open_elements.get(1).copied()
                    && body.is_html(TagId::Body)
                    && !self.stack_of_open_elements.has_template()
                {
                    self.frameset_ok = false;
                    self.merge_attributes(body.node, attributes);
                }
            }

            // "A start tag whose tag name is "frameset""
            (Token::StartTag { attributes, .. }, TagId::Frameset) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                // "If the stack of open elements has only one node on it, or if
                // the second element on the stack of open elements is not a body
                // element, then ignore the token. (fragment case or there is a
                // template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let Some(body) = self.stack_of_open_elements.get(1).copied() else {
                    return;
                };
                if !body.is_html(TagId::Body) || !self.frameset_ok {
                    return;
                }
                // "1. Remove the second element on the stack of open elements
                // from its parent node, if it has one."
                self.tree.detach(body.node);
                // "2. Pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to, but not including, the
                // root html element."
                while self.stack_of_open_elements.len() > 1 {
                    let _ = self.stack_of_open_elements.pop();
                }
                // "3. Insert an HTML element for the token."
                let _ = self.insert_html_element("frameset", attributes);
                // "4. Switch the insertion mode to "in frameset"."
                self.switch_to(InsertionMode::InFrameset);
            }

            // "An end-of-file token"
            (Token::EndOfFile, _) => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_insertion_modes.is_empty() {
                    self.process_token_in_mode(InsertionMode::InTemplate, token);
                    return;
                }
                // "Otherwise, follow these steps:"
                // "1. If there is a node in the stack of open elements that is
                // not either a dd element, a dt element, an li element, an
                // optgroup element, an option element, a p element, an rb
                // element, an rp element, an rt element, an rtc element, a tbody
                // element, a td element, a tfoot element, a th element, a thead
                // element, a tr element, the body element, or the html element,
                // then this is a parse error."
                // "2. Stop parsing."
                if self.has_element_open_past_end_of_body() {
                    self.parse_error(ParseErrorCode::OpenElementsLeftAfterEof);
                }
            }

            // "An end tag whose tag name is "body""
            (Token::EndTag { .. }, TagId::Body) => {
                if self.close_body_element() {
                    // "Switch the insertion mode to "after body"."
                    self.switch_to(InsertionMode::AfterBody);
                }
            }

            // "An end tag whose tag name is "html""
            (Token::EndTag { .. }, TagId::Html) => {
                if self.close_body_element() {
                    // "Switch the insertion mode to "after body"."
                    // "Reprocess the token."
                    self.switch_to(InsertionMode::AfterBody);
                    self.reprocess_token(token);
                }
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Address
                | TagId::Article
                | TagId::Aside
                | TagId::Blockquote
                | TagId::Center
                | TagId::Details
                | TagId::Dialog
                | TagId::Dir
                | TagId::Div
                | TagId::Dl
                | TagId::Fieldset
                | TagId::Figcaption
                | TagId::Figure
                | TagId::Footer
                | TagId::Header
                | TagId::Hgroup
                | TagId::Main
                | TagId::Menu
                | TagId::Nav
                | TagId::Ol
                | TagId::P
                | TagId::Search
                | TagId::Section
                | TagId::Summary
                | TagId::Ul,
            ) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            (Token::StartTag { name, attributes, .. }, tag) if tag.is_heading() => {
                // "If the stack of open elements has a p element in button
                // scope, then close a p element."
                self.close_p_element_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                // of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.current_node().is_some_and(|current| {
                    current.namespace == Namespace::Html && current.tag.is_heading()
                }) {
                    self.parse_error(ParseErrorCode::MisplacedStartTag);
                    let _ = self.stack_of_open_elements.pop();
                }
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one."
            // "Set the frameset-ok flag to "not ok"."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Pre | TagId::Listing,
            ) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            (Token::StartTag { attributes, .. }, TagId::Form) => {
                let has_template = self.stack_of_open_elements.has_template();
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is a
                // parse error; ignore the token."
                if self.form_element_pointer.is_some() && !has_template {
                    self.parse_error(ParseErrorCode::NestedForm);
                    return;
                }
                // "Otherwise: If the stack of open elements has a p element in
                // button scope, then close a p element."
                self.close_p_element_in_button_scope();
                // "Insert an HTML element for the token, and, if there is no
                // template element on the stack of open elements, set the form
                // element pointer to point to the element created."
                let form = self.insert_html_element("form", attributes);
                if !has_template {
                    self.form_element_pointer = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            (Token::StartTag { attributes, .. }, TagId::Li) => {
                self.start_list_item("li", attributes, &[TagId::Li]);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Dd | TagId::Dt,
            ) => {
                self.start_list_item(name, attributes, &[TagId::Dd, TagId::Dt]);
            }

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token."
            // "Switch the tokenizer to the PLAINTEXT state."
            (Token::StartTag { attributes, .. }, TagId::Plaintext) => {
                self.close_p_element_in_button_scope();
                let _ = self.insert_html_element("plaintext", attributes);
                self.tokenizer.set_state(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            (Token::StartTag { attributes, .. }, TagId::Button) => {
                // "1. If the stack of open elements has a button element in
                // scope, then run these substeps:"
                if self.stack_of_open_elements.has_in_scope(TagId::Button) {
                    // "1. Parse error."
                    self.parse_error(ParseErrorCode::MisplacedStartTag);
                    // "2. Generate implied end tags."
                    self.stack_of_open_elements.generate_implied_end_tags();
                    // "3. Pop elements from the stack of open elements until a
                    // button element has been popped from the stack."
                    self.stack_of_open_elements.pop_until_tag(TagId::Button);
                }
                // "2. Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "3. Insert an HTML element for the token."
                let _ = self.insert_html_element("button", attributes);
                // "4. Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "button", "center", "details", "dialog",
            // "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "listing", "main", "menu", "nav", "ol", "pre",
            // "search", "section", "summary", "ul""
            (
                Token::EndTag { .. },
                tag @ (TagId::Address
                | TagId::Article
                | TagId::Aside
                | TagId::Blockquote
                | TagId::Button
                | TagId::Center
                | TagId::Details
                | TagId::Dialog
                | TagId::Dir
                | TagId::Div
                | TagId::Dl
                | TagId::Fieldset
                | TagId::Figcaption
                | TagId::Figure
                | TagId::Footer
                | TagId::Header
                | TagId::Hgroup
                | TagId::Listing
                | TagId::Main
                | TagId::Menu
                | TagId::Nav
                | TagId::Ol
                | TagId::Pre
                | TagId::Search
                | TagId::Section
                | TagId::Summary
                | TagId::Ul),
            ) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "1. Generate implied end tags."
                self.stack_of_open_elements.generate_implied_end_tags();
                // "2. If the current node is not an HTML element with the same
                // tag name as that of the token, then this is a parse error."
                if !self.current_node_is(tag) {
                    self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
                }
                // "3. Pop elements from the stack of open elements until an HTML
                // element with the same tag name as the token has been popped
                // from the stack."
                self.stack_of_open_elements.pop_until_tag(tag);
            }

            // "An end tag whose tag name is "form""
            (Token::EndTag { .. }, TagId::Form) => self.close_form_element(),

            // "An end tag whose tag name is "p""
            (Token::EndTag { .. }, TagId::P) => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML
                // element for a "p" start tag token with no attributes."
                if !self.stack_of_open_elements.has_in_button_scope(TagId::P) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    let _ = self.insert_implied_html_element("p");
                }
                // "Close a p element."
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            (Token::EndTag { .. }, TagId::Li) => {
                // "If the stack of open elements does not have an li element in
                // list item scope, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_list_item_scope(TagId::Li) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                self.close_element_with_implied_end_tags(TagId::Li);
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            (Token::EndTag { .. }, tag @ (TagId::Dd | TagId::Dt)) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                self.close_element_with_implied_end_tags(tag);
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            (Token::EndTag { .. }, tag) if tag.is_heading() => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !self.stack_of_open_elements.has_numbered_header_in_scope() {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "1. Generate implied end tags."
                self.stack_of_open_elements.generate_implied_end_tags();
                // "2. If the current node is not an HTML element with the same
                // tag name as that of the token, then this is a parse error."
                if !self.current_node_is(tag) {
                    self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
                }
                // "3. Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4", "h5",
                // or "h6" has been popped from the stack."
                self.stack_of_open_elements.pop_until_numbered_header();
            }

            // "A start tag whose tag name is "a""
            (Token::StartTag { attributes, .. }, TagId::A) => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on the
                // list (or the start of the list if there is no marker on the
                // list), then this is a parse error; run the adoption agency
                // algorithm for the token, then remove that element from the
                // list of active formatting elements and the stack of open
                // elements if the adoption agency algorithm didn't already
                // remove it (it might not have if the element is not in table
                // scope)."
                if let Some(existing) = self.active_formatting_elements.element_in_scope_with_tag_name("a") {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement);
                    let _ = self.run_adoption_agency("a");
                    let _ = self.active_formatting_elements.remove(existing);
                    let _ = self.stack_of_open_elements.remove(existing);
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element("a", attributes, token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Push onto the list of
            // active formatting elements that element."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::B
                | TagId::Big
                | TagId::Code
                | TagId::Em
                | TagId::Font
                | TagId::I
                | TagId::S
                | TagId::Small
                | TagId::Strike
                | TagId::Strong
                | TagId::Tt
                | TagId::U,
            ) => {
                self.reconstruct_active_formatting_elements();
                self.insert_formatting_element(name, attributes, token);
            }

            // "A start tag whose tag name is "nobr""
            (Token::StartTag { attributes, .. }, TagId::Nobr) => {
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                // then this is a parse error; run the adoption agency algorithm
                // for the token, then once again reconstruct the active
                // formatting elements, if any."
                if self.stack_of_open_elements.has_in_scope(TagId::Nobr) {
                    self.parse_error(ParseErrorCode::MisnestedFormattingElement);
                    let _ = self.run_adoption_agency("nobr");
                    self.reconstruct_active_formatting_elements();
                }
                // "Insert an HTML element for the token. Push onto the list of
                // active formatting elements that element."
                self.insert_formatting_element("nobr", attributes, token);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            (Token::EndTag { name, .. }, tag) if tag.is_formatting() => {
                if self.run_adoption_agency(name) == AdoptionOutcome::AnyOtherEndTag {
                    self.any_other_end_tag_in_body(name);
                }
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Applet | TagId::Marquee | TagId::Object,
            ) => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.active_formatting_elements.insert_marker();
                self.frameset_ok = false;
            }

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            (Token::EndTag { .. }, tag @ (TagId::Applet | TagId::Marquee | TagId::Object)) => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token."
                if !self.stack_of_open_elements.has_in_scope(tag) {
                    self.parse_error(ParseErrorCode::UnexpectedEndTag);
                    return;
                }
                // "1. Generate implied end tags."
                self.stack_of_open_elements.generate_implied_end_tags();
                // "2. If the current node is not an HTML element with the same
                // tag name as that of the token, then this is a parse error."
                if !self.current_node_is(tag) {
                    self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
                }
                // "3. Pop elements from the stack of open elements until an HTML
                // element with the same tag name as the token has been popped
                // from the stack."
                self.stack_of_open_elements.pop_until_tag(tag);
                // "4. Clear the list of active formatting elements up to the last marker."
                self.active_formatting_elements.clear_to_last_marker();
            }

            // "A start tag whose tag name is "table""
            (Token::StartTag { attributes, .. }, TagId::Table) => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a p
                // element."
                if self.tree.mode() != DocumentMode::Quirks {
                    self.close_p_element_in_button_scope();
                }
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in table"."
                let _ = self.insert_html_element("table", attributes);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InTable);
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br" start
            // tag token with no attributes, rather than the end tag token that
            // it actually is."
            (Token::EndTag { .. }, TagId::Br) => {
                self.parse_error(ParseErrorCode::UnexpectedEndTag);
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_implied_html_element("br");
                let _ = self.stack_of_open_elements.pop();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Area | TagId::Br | TagId::Embed | TagId::Img | TagId::Keygen | TagId::Wbr,
            ) => {
                self.reconstruct_active_formatting_elements();
                self.insert_void_element(name, attributes);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            (Token::StartTag { attributes, .. }, TagId::Input) => {
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                self.reconstruct_active_formatting_elements();
                self.insert_void_element("input", attributes);
                // "If the token does not have an attribute with the name "type",
                // or if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: set the
                // frameset-ok flag to "not ok"."
                if !is_hidden_input(token) {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Param | TagId::Source | TagId::Track,
            ) => self.insert_void_element(name, attributes),

            // "A start tag whose tag name is "hr""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            (Token::StartTag { attributes, .. }, TagId::Hr) => {
                self.close_p_element_in_button_scope();
                self.insert_void_element("hr", attributes);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            (
                Token::StartTag {
                    attributes,
                    self_closing,
                    ..
                },
                TagId::Image,
            ) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing: *self_closing,
                    attributes: attributes.clone(),
                };
                self.reprocess_token(&img);
            }

            // "A start tag whose tag name is "textarea""
            // "1. Insert an HTML element for the token."
            // "2. If the next token is a U+000A LINE FEED (LF) character token,
            // then ignore that token and move on to the next one."
            // "3. Switch the tokenizer to the RCDATA state."
            // "4. Set the original insertion mode to the current insertion mode."
            // "5. Set the frameset-ok flag to "not ok"."
            // "6. Switch the insertion mode to "text"."
            (Token::StartTag { attributes, .. }, TagId::Textarea) => {
                self.parse_text_only_element("textarea", attributes, TokenizerState::RCDATA);
                self.skip_next_newline = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "xmp""
            // "If the stack of open elements has a p element in button scope,
            // then close a p element."
            // "Reconstruct the active formatting elements, if any."
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            (Token::StartTag { attributes, .. }, TagId::Xmp) => {
                self.close_p_element_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                self.parse_text_only_element("xmp", attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            (Token::StartTag { attributes, .. }, TagId::Iframe) => {
                self.frameset_ok = false;
                self.parse_text_only_element("iframe", attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "Follow the generic raw text element parsing algorithm."
            (Token::StartTag { name, attributes, .. }, TagId::Noembed) => {
                self.parse_text_only_element(name, attributes, TokenizerState::RAWTEXT);
            }
            (Token::StartTag { name, attributes, .. }, TagId::Noscript)
                if self.scripting_enabled =>
            {
                self.parse_text_only_element(name, attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "select""
            (Token::StartTag { attributes, .. }, TagId::Select) => {
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element("select", attributes);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption", "in
                // table body", "in row", or "in cell", then switch the insertion
                // mode to "in select in table". Otherwise, switch the insertion
                // mode to "in select"."
                let in_table = matches!(
                    self.insertion_mode,
                    InsertionMode::InTable
                        | InsertionMode::InCaption
                        | InsertionMode::InTableBody
                        | InsertionMode::InRow
                        | InsertionMode::InCell
                );
                self.switch_to(if in_table {
                    InsertionMode::InSelectInTable
                } else {
                    InsertionMode::InSelect
                });
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            // node off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Optgroup | TagId::Option,
            ) => {
                if self.current_node_is(TagId::Option) {
                    let _ = self.stack_of_open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags. If the current node is not now a ruby
            // element, this is a parse error."
            // "Insert an HTML element for the token."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Rb | TagId::Rtc,
            ) => {
                if self.stack_of_open_elements.has_in_scope(TagId::Ruby) {
                    self.stack_of_open_elements.generate_implied_end_tags();
                    if !self.current_node_is(TagId::Ruby) {
                        self.parse_error(ParseErrorCode::MisplacedStartTag);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            // generate implied end tags, except for rtc elements. If the current
            // node is not now a rtc element or a ruby element, this is a parse
            // error."
            // "Insert an HTML element for the token."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Rp | TagId::Rt,
            ) => {
                if self.stack_of_open_elements.has_in_scope(TagId::Ruby) {
                    self.stack_of_open_elements
                        .generate_implied_end_tags_excluding(TagId::Rtc);
                    if !self.current_node_is(TagId::Rtc) && !self.current_node_is(TagId::Ruby) {
                        self.parse_error(ParseErrorCode::MisplacedStartTag);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is "math""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust MathML attributes for the token."
            // "Adjust foreign attributes for the token."
            // "Insert a foreign element for the token, with MathML namespace and false."
            // "If the token has its self-closing flag set, pop the current node
            // off the stack of open elements and acknowledge the token's
            // self-closing flag."
            (
                Token::StartTag {
                    attributes,
                    self_closing,
                    ..
                },
                TagId::Math,
            ) => {
                self.reconstruct_active_formatting_elements();
                let mut attributes = attributes.clone();
                adjust_mathml_attributes(&mut attributes);
                self.insert_foreign_root("math", &attributes, Namespace::MathMl, *self_closing);
            }

            // "A start tag whose tag name is "svg""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust SVG attributes for the token."
            // "Adjust foreign attributes for the token."
            // "Insert a foreign element for the token, with SVG namespace and false."
            // "If the token has its self-closing flag set, pop the current node
            // off the stack of open elements and acknowledge the token's
            // self-closing flag."
            (
                Token::StartTag {
                    attributes,
                    self_closing,
                    ..
                },
                TagId::Svg,
            ) => {
                self.reconstruct_active_formatting_elements();
                let mut attributes = attributes.clone();
                adjust_svg_attributes(&mut attributes);
                self.insert_foreign_root("svg", &attributes, Namespace::Svg, *self_closing);
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            (
                Token::StartTag { .. },
                TagId::Caption
                | TagId::Col
                | TagId::Colgroup
                | TagId::Frame
                | TagId::Head
                | TagId::Tbody
                | TagId::Td
                | TagId::Tfoot
                | TagId::Th
                | TagId::Thead
                | TagId::Tr,
            ) => self.parse_error(ParseErrorCode::MisplacedStartTag),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            (
                Token::StartTag {
                    name, attributes, ..
                },
                _,
            ) => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }

            // "Any other end tag"
            (Token::EndTag { name, .. }, _) => self.any_other_end_tag_in_body(name),
        }
    }

    /// Whether an element other than those an end of body implies closed is
    /// still open.
    fn has_element_open_past_end_of_body(&self) -> bool {
        self.stack_of_open_elements
            .as_slice()
            .iter()
            .any(|entry| !entry.is_html_one_of(CLOSABLE_AT_END_OF_BODY))
    }

    /// Shared steps of `</body>` and `</html>`. Returns `false` when the token
    /// is ignored.
    fn close_body_element(&mut self) -> bool {
        // "If the stack of open elements does not have a body element in scope,
        // this is a parse error; ignore the token."
        if !self.stack_of_open_elements.has_in_scope(TagId::Body) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return false;
        }
        // "Otherwise, if there is a node in the stack of open elements that is
        // not either a dd element, ..., the body element, or the html element,
        // then this is a parse error."
        if self.has_element_open_past_end_of_body() {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        true
    }

    /// The `li`, `dd` and `dt` start tag steps. `closes` lists the elements
    /// the new item implicitly ends.
    fn start_list_item(&mut self, name: &str, attributes: &[Attribute], closes: &[TagId]) {
        // "1. Set the frameset-ok flag to "not ok"."
        self.frameset_ok = false;

        // "2. Initialize node to be the current node (the bottommost node of
        // the stack)."
        // "3. Loop: If node is an li element, then run these substeps:"
        // "4. If node is in the special category, but is not an address, div,
        // or p element, then jump to the step labeled done below."
        // "5. Otherwise, set node to the previous entry in the stack of open
        // elements and return to the step labeled loop."
        let closing = self
            .stack_of_open_elements
            .as_slice()
            .iter()
            .rev()
            .find_map(|entry| {
                if entry.is_html_one_of(closes) {
                    return Some(Some(entry.tag));
                }
                if entry.is_special() && !entry.is_html_one_of(&[TagId::Address, TagId::Div, TagId::P]) {
                    return Some(None);
                }
                None
            })
            .flatten();

        if let Some(tag) = closing {
            // "1. Generate implied end tags, except for li elements."
            self.stack_of_open_elements
                .generate_implied_end_tags_excluding(tag);
            // "2. If the current node is not an li element, then this is a
            // parse error."
            if !self.current_node_is(tag) {
                self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
            }
            // "3. Pop elements from the stack of open elements until an li
            // element has been popped from the stack."
            self.stack_of_open_elements.pop_until_tag(tag);
        }

        // "6. Done: If the stack of open elements has a p element in button
        // scope, then close a p element."
        self.close_p_element_in_button_scope();

        // "7. Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(name, attributes);
    }

    /// `</li>`, `</dd>` and `</dt>` once the element is known to be in scope.
    fn close_element_with_implied_end_tags(&mut self, tag: TagId) {
        // "1. Generate implied end tags, except for HTML elements with the same
        // tag name as the token."
        self.stack_of_open_elements
            .generate_implied_end_tags_excluding(tag);
        // "2. If the current node is not an HTML element with the same tag name
        // as that of the token, then this is a parse error."
        if !self.current_node_is(tag) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        // "3. Pop elements from the stack of open elements until an HTML element
        // with the same tag name as the token has been popped from the stack."
        self.stack_of_open_elements.pop_until_tag(tag);
    }

    /// The "in body" rules for an end tag whose tag name is "form".
    fn close_form_element(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.stack_of_open_elements.has_template() {
            // "1. Let node be the element that the form element pointer is set
            // to, or null if it is not set to an element."
            // "2. Set the form element pointer to null."
            let node = self.form_element_pointer.take();
            // "3. If node is null or if the stack of open elements does not have
            // node in scope, then this is a parse error; return and ignore the
            // token."
            let Some(node) = node.filter(|&node| self.stack_of_open_elements.has_node_in_scope(node))
            else {
                self.parse_error(ParseErrorCode::UnexpectedEndTag);
                return;
            };
            // "4. Generate implied end tags."
            self.stack_of_open_elements.generate_implied_end_tags();
            // "5. If the current node is not node, then this is a parse error."
            if self.current_node().is_none_or(|current| current.node != node) {
                self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
            }
            // "6. Remove node from the stack of open elements."
            let _ = self.stack_of_open_elements.remove(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        // run these substeps instead:"
        // "1. If the stack of open elements does not have a form element in
        // scope, then this is a parse error; return and ignore the token."
        if !self.stack_of_open_elements.has_in_scope(TagId::Form) {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return;
        }
        // "2. Generate implied end tags."
        self.stack_of_open_elements.generate_implied_end_tags();
        // "3. If the current node is not a form element, then this is a parse error."
        if !self.current_node_is(TagId::Form) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        // "4. Pop elements from the stack of open elements until a form element
        // has been popped from the stack."
        self.stack_of_open_elements.pop_until_tag(TagId::Form);
    }

    /// Insert an HTML element, push it onto the list of active formatting
    /// elements and remember the token it was created from.
    fn insert_formatting_element(&mut self, name: &str, attributes: &[Attribute], token: &Token) {
        let node = self.insert_html_element(name, attributes);
        self.active_formatting_elements
            .push_element(node, token.clone());
    }

    /// Insert a void element, pop it straight away and acknowledge a
    /// self-closing flag.
    fn insert_void_element(&mut self, name: &str, attributes: &[Attribute]) {
        let _ = self.insert_html_element(name, attributes);
        let _ = self.stack_of_open_elements.pop();
        self.self_closing_acknowledged = true;
    }

    /// Insert an `svg` or `math` root element.
    fn insert_foreign_root(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
        self_closing: bool,
    ) {
        let _ = self.insert_foreign_element(name, attributes, namespace, false);
        if self_closing {
            let _ = self.stack_of_open_elements.pop();
            self.self_closing_acknowledged = true;
        }
    }

    /// The "in body" rules for "any other end tag".
    pub(crate) fn any_other_end_tag_in_body(&mut self, name: &str) {
        let tag = TagId::from_name(name);
        let stack = self.stack_of_open_elements.as_slice();

        // "1. Initialize node to be the current node (the bottommost node of
        // the stack)."
        // "2. Loop: If node is an HTML element with the same tag name as the
        // token, then:"
        // "3. Otherwise, if node is in the special category, then this is a
        // parse error; ignore the token, and return."
        // "4. Set node to the previous entry in the stack of open elements."
        // "5. Return to the step labeled loop."
        let mut target = None;
        for entry in stack.iter().rev() {
            if entry.namespace == Namespace::Html && self.element_has_tag_name(entry.node, name) {
                target = Some(entry.node);
                break;
            }
            if entry.is_special() {
                break;
            }
        }
        let Some(node) = target else {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return;
        };

        // "1. Generate implied end tags, except for HTML elements with the same
        // tag name as the token."
        self.stack_of_open_elements
            .generate_implied_end_tags_excluding(tag);
        // "2. If node is not the current node, then this is a parse error."
        if self.current_node().is_none_or(|current| current.node != node) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        // "3. Pop all the nodes from the current node up to node, including
        // node, then stop these steps."
        self.stack_of_open_elements.pop_until_node(node);
    }
}

/// Whether a start tag is an `<input type=hidden>`.
pub(crate) fn is_hidden_input(token: &Token) -> bool {
    token
        .attribute("type")
        .is_some_and(|value| value.eq_ignore_ascii_case("hidden"))
}
