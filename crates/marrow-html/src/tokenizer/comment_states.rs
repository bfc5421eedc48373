use super::core::{HTMLTokenizer, TokenizerState};
use super::helpers::Lookahead;
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF"
            // "Emit the comment. Emit an end-of-file token."
            None => self.emit_current_token_and_eof(),
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\0');
            }
            // "Anything else"
            // "Append the current input character to the comment token's data."
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-)"
        // "Consume those two characters, create a comment token whose data is
        // the empty string, and switch to the comment start state."
        match self.next_few_characters_are("--", false) {
            Lookahead::Pending => return self.suspend(),
            Lookahead::Match => {
                self.consume_lookahead(1);
                self.current_token = Some(Token::new_comment(String::new()));
                self.switch_to(TokenizerState::CommentStart);
                return;
            }
            Lookahead::Mismatch => {}
        }

        // "ASCII case-insensitive match for the word "DOCTYPE""
        // "Consume those characters and switch to the DOCTYPE state."
        match self.next_few_characters_are("DOCTYPE", true) {
            Lookahead::Pending => return self.suspend(),
            Lookahead::Match => {
                self.consume_lookahead(6);
                self.switch_to(TokenizerState::DOCTYPE);
                return;
            }
            Lookahead::Mismatch => {}
        }

        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a
        // U+005B LEFT SQUARE BRACKET character before and after)"
        match self.next_few_characters_are("[CDATA[", false) {
            Lookahead::Pending => return self.suspend(),
            Lookahead::Match => {
                self.consume_lookahead(6);
                // "If there is an adjusted current node and it is not an element
                // in the HTML namespace, then switch to the CDATA section state."
                if self.allow_cdata {
                    self.switch_to(TokenizerState::CDATASection);
                } else {
                    // "Otherwise, this is a cdata-in-html-content parse error.
                    // Create a comment token whose data is the "[CDATA[" string.
                    // Switch to the bogus comment state."
                    self.parse_error_at(ParseErrorCode::CdataInHtmlContent, self.markup_start);
                    self.current_token = Some(Token::new_comment("[CDATA[".to_string()));
                    self.switch_to(TokenizerState::BogusComment);
                }
                return;
            }
            Lookahead::Mismatch => {}
        }

        // "Anything else"
        // "This is an incorrectly-opened-comment parse error. Create a comment
        // token whose data is the empty string. Switch to the bogus comment
        // state (don't consume anything in the current state)."
        self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
        self.current_token = Some(Token::new_comment(String::new()));
        self.reconsume_in(TokenizerState::BogusComment);
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment start dash state."
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to
            // the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "Anything else"
            // "Reconsume in the comment state."
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment end state."
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to
            // the data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF"
            // "This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "Append a U+002D HYPHEN-MINUS character (-) to the comment token's
            // data. Reconsume in the comment state."
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<)"
            // "Append the current input character to the comment token's data.
            // Switch to the comment less-than sign state."
            Some('<') => {
                self.append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment end dash state."
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\0');
            }
            // "EOF"
            // "This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "Append the current input character to the comment token's data."
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!)"
            // "Append the current input character to the comment token's data.
            // Switch to the comment less-than sign bang state."
            Some('!') => {
                self.append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Append the current input character to the comment token's data."
            Some('<') => self.append_to_comment('<'),
            // "Anything else"
            // "Reconsume in the comment state."
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment less-than sign bang dash state."
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDash),
            // "Anything else"
            // "Reconsume in the comment state."
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment less-than sign bang dash dash state."
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDashDash),
            // "Anything else"
            // "Reconsume in the comment end dash state."
            _ => self.reconsume_in(TokenizerState::CommentEndDash),
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>)"
            // "EOF"
            // "Reconsume in the comment end state."
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "Anything else"
            // "This is a nested-comment parse error. Reconsume in the comment end state."
            Some(_) => {
                self.parse_error(ParseErrorCode::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the comment end state."
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            // "EOF"
            // "This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "Append a U+002D HYPHEN-MINUS character (-) to the comment token's
            // data. Reconsume in the comment state."
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current comment token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0021 EXCLAMATION MARK (!)"
            // "Switch to the comment end bang state."
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            // "U+002D HYPHEN-MINUS (-)"
            // "Append a U+002D HYPHEN-MINUS character (-) to the comment token's data."
            Some('-') => self.append_to_comment('-'),
            // "EOF"
            // "This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "Append two U+002D HYPHEN-MINUS characters (-) to the comment
            // token's data. Reconsume in the comment state."
            Some(_) => {
                self.append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Append two U+002D HYPHEN-MINUS characters (-) and a U+0021
            // EXCLAMATION MARK character (!) to the comment token's data. Switch
            // to the comment end dash state."
            Some('-') => {
                self.append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an incorrectly-closed-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF"
            // "This is an eof-in-comment parse error. Emit the current comment
            // token. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInComment);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "Append two U+002D HYPHEN-MINUS characters (-) and a U+0021
            // EXCLAMATION MARK character (!) to the comment token's data.
            // Reconsume in the comment state."
            Some(_) => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn append_to_comment(&mut self, c: char) {
        if let Some(token) = &mut self.current_token {
            token.append_to_comment(c);
        }
    }

    fn append_str_to_comment(&mut self, s: &str) {
        if let Some(token) = &mut self.current_token {
            token.append_str_to_comment(s);
        }
    }
}
