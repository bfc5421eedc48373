//! The `<head>` section: "in head", "in head noscript" and "after head".

use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::tag::TagId;
use crate::tokenizer::{Token, TokenizerState};

impl HTMLParser {
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn handle_in_head_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
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

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta""
            // Same steps; the character encoding is fixed before parsing, so
            // `charset` and `http-equiv` have no further effect.
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Base | TagId::Basefont | TagId::Bgsound | TagId::Link | TagId::Meta,
            ) => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack_of_open_elements.pop();
                self.self_closing_acknowledged = true;
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            (Token::StartTag { attributes, .. }, TagId::Title) => {
                self.parse_text_only_element("title", attributes, TokenizerState::RCDATA);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is enabled"
            // "A start tag whose tag name is one of: "noframes", "style""
            // "Follow the generic raw text element parsing algorithm."
            (Token::StartTag { name, attributes, .. }, TagId::Noscript)
                if self.scripting_enabled =>
            {
                self.parse_text_only_element(name, attributes, TokenizerState::RAWTEXT);
            }
            (
                Token::StartTag {
                    name, attributes, ..
                },
                TagId::Noframes | TagId::Style,
            ) => {
                self.parse_text_only_element(name, attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            (Token::StartTag { attributes, .. }, TagId::Noscript) => {
                let _ = self.insert_html_element("noscript", attributes);
                self.switch_to(InsertionMode::InHeadNoscript);
            }

            // "A start tag whose tag name is "script""
            // "1. Let the adjusted insertion location be the appropriate place
            // for inserting a node."
            // "2. Let the intended parent be the element in which the adjusted
            // insertion location finds itself."
            // "3. Create an element for the token in the HTML namespace, with
            // the intended parent being the intended parent."
            // "8. Insert the newly created element at the adjusted insertion
            // location."
            // "9. Push the element onto the stack of open elements so that it is
            // the new current node."
            // "10. Switch the tokenizer to the script data state."
            // "11. Set the original insertion mode to the current insertion mode."
            // "12. Switch the insertion mode to "text"."
            (Token::StartTag { attributes, .. }, TagId::Script) => {
                self.parse_text_only_element("script", attributes, TokenizerState::ScriptData);
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the
            // stack of open elements."
            // "Switch the insertion mode to "after head"."
            (Token::EndTag { .. }, TagId::Head) => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::AfterHead);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            (Token::EndTag { .. }, TagId::Body | TagId::Html | TagId::Br) => {
                self.leave_head(token);
            }

            // "A start tag whose tag name is "template""
            (Token::StartTag { attributes, .. }, TagId::Template) => {
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element("template", attributes);
                // "Insert a marker at the end of the list of active formatting elements."
                self.active_formatting_elements.insert_marker();
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
                // "Switch the insertion mode to "in template"."
                self.switch_to(InsertionMode::InTemplate);
                // "Push "in template" onto the stack of template insertion modes
                // so that it is the new current template insertion mode."
                self.template_insertion_modes.push(InsertionMode::InTemplate);
            }

            // "An end tag whose tag name is "template""
            (Token::EndTag { .. }, TagId::Template) => self.close_template_element(),

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::StartTag { .. }, TagId::Head) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
            }
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            _ => self.leave_head(token),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack of
    /// open elements."
    /// "Switch the insertion mode to "after head"."
    /// "Reprocess the token."
    fn leave_head(&mut self, token: &Token) {
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::AfterHead);
        self.reprocess_token(token);
    }

    /// The "in head" rules for an end tag whose tag name is "template".
    pub(crate) fn close_template_element(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.stack_of_open_elements.has_template() {
            self.parse_error(ParseErrorCode::UnexpectedEndTag);
            return;
        }

        // "1. Generate all implied end tags thoroughly."
        self.stack_of_open_elements
            .generate_implied_end_tags_thoroughly();

        // "2. If the current node is not a template element, then this is a
        // parse error."
        if !self.current_node_is(TagId::Template) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }

        // "3. Pop elements from the stack of open elements until a template
        // element has been popped from the stack."
        self.stack_of_open_elements.pop_until_tag(TagId::Template);

        // "4. Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();

        // "5. Pop the current template insertion mode off the stack of template
        // insertion modes."
        let _ = self.template_insertion_modes.pop();

        // "6. Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            (Token::Doctype { .. }, _) => self.parse_error(ParseErrorCode::MisplacedDoctype),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            (Token::StartTag { .. }, TagId::Html) => {
                self.process_token_in_mode(InsertionMode::InBody, token);
            }

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the
            // stack of open elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            (Token::EndTag { .. }, TagId::Noscript) => {
                let _ = self.stack_of_open_elements.pop();
                self.switch_to(InsertionMode::InHead);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            // "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::Whitespace { .. } | Token::Comment { .. }, _)
            | (
                Token::StartTag { .. },
                TagId::Basefont
                | TagId::Bgsound
                | TagId::Link
                | TagId::Meta
                | TagId::Noframes
                | TagId::Style,
            ) => self.process_token_in_mode(InsertionMode::InHead, token),

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            (Token::EndTag { .. }, TagId::Br) => self.leave_noscript(token),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::StartTag { .. }, TagId::Noscript) => {
                self.parse_error(ParseErrorCode::NestedNoscriptInHead);
            }
            (Token::StartTag { .. }, TagId::Head) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
            }
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            _ => self.leave_noscript(token),
        }
    }

    /// "Parse error."
    /// "Pop the current node (which will be a noscript element) from the stack
    /// of open elements; the new current node will be a head element."
    /// "Switch the insertion mode to "in head"."
    /// "Reprocess the token."
    fn leave_noscript(&mut self, token: &Token) {
        self.parse_error(ParseErrorCode::DisallowedContentInNoscriptInHead);
        let _ = self.stack_of_open_elements.pop();
        self.switch_to(InsertionMode::InHead);
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn handle_after_head_mode(&mut self, token: &Token) {
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

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            (Token::StartTag { attributes, .. }, TagId::Body) => {
                let _ = self.insert_html_element("body", attributes);
                self.frameset_ok = false;
                self.switch_to(InsertionMode::InBody);
            }

            // "A start tag whose tag name is "frameset""
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in frameset"."
            (Token::StartTag { attributes, .. }, TagId::Frameset) => {
                let _ = self.insert_html_element("frameset", attributes);
                self.switch_to(InsertionMode::InFrameset);
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
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
            ) => {
                // "Parse error."
                self.parse_error(ParseErrorCode::AbandonedHeadElementChild);
                // "Push the node pointed to by the head element pointer onto the
                // stack of open elements."
                // "Process the token using the rules for the "in head" insertion mode."
                // "Remove the node pointed to by the head element pointer from
                // the stack of open elements. (It might not be the current node
                // at this point.)"
                if let Some(head) = self.head_element_pointer {
                    self.push_open_element(head);
                    self.process_token_in_mode(InsertionMode::InHead, token);
                    let _ = self.stack_of_open_elements.remove(head);
                } else {
                    self.process_token_in_mode(InsertionMode::InHead, token);
                }
            }

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            (Token::EndTag { .. }, TagId::Template) => {
                self.process_token_in_mode(InsertionMode::InHead, token);
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            (Token::EndTag { .. }, TagId::Body | TagId::Html | TagId::Br) => {
                self.implied_body_element(token);
            }

            // "A start tag whose tag name is "head""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::StartTag { .. }, TagId::Head) => {
                self.parse_error(ParseErrorCode::MisplacedStartTag);
            }
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "Anything else"
            _ => self.implied_body_element(token),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no attributes."
    /// "Switch the insertion mode to "in body"."
    /// "Reprocess the current token."
    fn implied_body_element(&mut self, token: &Token) {
        let _ = self.insert_implied_html_element("body");
        self.switch_to(InsertionMode::InBody);
        self.reprocess_token(token);
    }
}
