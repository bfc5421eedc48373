use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(crate) fn handle_in_template_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            (
                Token::Character { .. }
                | Token::Whitespace { .. }
                | Token::NullCharacter
                | Token::Comment { .. }
                | Token::Doctype { .. },
                _,
            ) => self.process_token_in_mode(InsertionMode::InBody, token),

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

            // "A start tag whose tag name is one of: "caption", "colgroup",
            // "tbody", "tfoot", "thead""
            (
                Token::StartTag { .. },
                TagId::Caption | TagId::Colgroup | TagId::Tbody | TagId::Tfoot | TagId::Thead,
            ) => self.switch_template_mode(InsertionMode::InTable, token),

            // "A start tag whose tag name is "col""
            (Token::StartTag { .. }, TagId::Col) => {
                self.switch_template_mode(InsertionMode::InColumnGroup, token);
            }

            // "A start tag whose tag name is "tr""
            (Token::StartTag { .. }, TagId::Tr) => {
                self.switch_template_mode(InsertionMode::InTableBody, token);
            }

            // "A start tag whose tag name is one of: "td", "th""
            (Token::StartTag { .. }, TagId::Td | TagId::Th) => {
                self.switch_template_mode(InsertionMode::InRow, token);
            }

            // "Any other start tag"
            (Token::StartTag { .. }, _) => {
                self.switch_template_mode(InsertionMode::InBody, token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            (Token::EndTag { .. }, _) => self.parse_error(ParseErrorCode::UnexpectedEndTag),

            // "An end-of-file token"
            (Token::EndOfFile, _) => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.stack_of_open_elements.has_template() {
                    return;
                }
                // "Otherwise, this is a parse error."
                self.parse_error(ParseErrorCode::EofInTemplate);
                // "Pop elements from the stack of open elements until a template
                // element has been popped from the stack."
                self.stack_of_open_elements.pop_until_tag(TagId::Template);
                // "Clear the list of active formatting elements up to the last marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                // template insertion modes."
                let _ = self.template_insertion_modes.pop();
                // "Reset the insertion mode appropriately."
                // "Reprocess the token."
                self.reset_insertion_mode_appropriately();
                self.reprocess_token(token);
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes."
    /// "Push `mode` onto the stack of template insertion modes so that it is
    /// the new current template insertion mode."
    /// "Switch the insertion mode to `mode`, and reprocess the token."
    fn switch_template_mode(&mut self, mode: InsertionMode, token: &Token) {
        let _ = self.template_insertion_modes.pop();
        self.template_insertion_modes.push(mode);
        self.switch_to(mode);
        self.reprocess_token(token);
    }
}
