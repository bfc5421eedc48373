use super::core::{HTMLTokenizer, TokenizerState};
use super::helpers::Lookahead;
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)"
            // "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)"
            // "U+0020 SPACE"
            // "Switch to the before DOCTYPE name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Reconsume in the before DOCTYPE name state."
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "EOF"
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Emit the current token. Emit an
            // end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInDoctype);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.emit_current_token_and_eof();
            }
            // "Anything else"
            // "This is a missing-whitespace-before-doctype-name parse error.
            // Reconsume in the before DOCTYPE name state."
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Create a new
            // DOCTYPE token. Set the token's name to the character."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                let mut token = Token::new_doctype();
                token.append_to_doctype_name('\0');
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Switch to the data state.
            // Emit the current token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "EOF"
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token.
            // Set its force-quirks flag to on. Emit the current token. Emit an
            // end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInDoctype);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.emit_current_token_and_eof();
            }
            // "ASCII upper alpha"
            // "Create a new DOCTYPE token. Set the token's name to the lowercase
            // version of the current input character."
            // "Anything else"
            // "Create a new DOCTYPE token. Set the token's name to the current
            // input character. Switch to the DOCTYPE name state."
            Some(c) => {
                let mut token = Token::new_doctype();
                token.append_to_doctype_name(c.to_ascii_lowercase());
                self.current_token = Some(token);
                self.switch_to(TokenizerState::DOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE name state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDOCTYPEName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|token| token.append_to_doctype_name('\0'));
            }
            None => self.eof_in_doctype(),
            // "ASCII upper alpha"
            // "Append the lowercase version of the current input character to the
            // current DOCTYPE token's name."
            // "Anything else"
            // "Append the current input character to the current DOCTYPE token's name."
            Some(c) => self.with_doctype(|token| token.append_to_doctype_name(c.to_ascii_lowercase())),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                // "If the six characters starting from the current input character
                // are an ASCII case-insensitive match for the word "PUBLIC", then
                // consume those characters and switch to the after DOCTYPE public
                // keyword state."
                match self.next_few_characters_are("PUBLIC", true) {
                    Lookahead::Pending => return self.suspend(),
                    Lookahead::Match => {
                        self.consume_lookahead(5);
                        self.switch_to(TokenizerState::AfterDOCTYPEPublicKeyword);
                        return;
                    }
                    Lookahead::Mismatch => {}
                }
                // "Otherwise, if the six characters starting from the current input
                // character are an ASCII case-insensitive match for the word
                // "SYSTEM", then consume those characters and switch to the after
                // DOCTYPE system keyword state."
                match self.next_few_characters_are("SYSTEM", true) {
                    Lookahead::Pending => return self.suspend(),
                    Lookahead::Match => {
                        self.consume_lookahead(5);
                        self.switch_to(TokenizerState::AfterDOCTYPESystemKeyword);
                        return;
                    }
                    Lookahead::Mismatch => {}
                }
                // "Otherwise, this is an invalid-character-sequence-after-doctype-name
                // parse error. Set the current DOCTYPE token's force-quirks flag to
                // on. Reconsume in the bogus DOCTYPE state."
                self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                self.with_doctype(Token::set_force_quirks);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    pub(super) fn handle_after_doctype_public_keyword_state(&mut self) {
        self.handle_after_doctype_keyword(
            true,
            ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword,
            ParseErrorCode::MissingDoctypePublicIdentifier,
            ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier,
        );
    }

    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_system_keyword_state(&mut self) {
        self.handle_after_doctype_keyword(
            false,
            ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword,
            ParseErrorCode::MissingDoctypeSystemIdentifier,
            ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier,
        );
    }

    fn handle_after_doctype_keyword(
        &mut self,
        public: bool,
        missing_whitespace: ParseErrorCode,
        missing_identifier: ParseErrorCode,
        missing_quote: ParseErrorCode,
    ) {
        match self.current_input_character {
            // "Switch to the before DOCTYPE public/system identifier state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(if public {
                    TokenizerState::BeforeDOCTYPEPublicIdentifier
                } else {
                    TokenizerState::BeforeDOCTYPESystemIdentifier
                });
            }
            // "U+0022 QUOTATION MARK (")"
            // "This is a missing-whitespace-after-doctype-public-keyword parse
            // error. Set the current DOCTYPE token's public identifier to the
            // empty string (not missing), then switch to the DOCTYPE public
            // identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(missing_whitespace);
                self.open_doctype_identifier(public, quote);
            }
            Some('>') => self.missing_doctype_identifier(missing_identifier),
            None => self.eof_in_doctype(),
            Some(_) => self.bogus_doctype_identifier(missing_quote),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    pub(super) fn handle_before_doctype_public_identifier_state(&mut self) {
        self.handle_before_doctype_identifier(
            true,
            ParseErrorCode::MissingDoctypePublicIdentifier,
            ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier,
        );
    }

    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_system_identifier_state(&mut self) {
        self.handle_before_doctype_identifier(
            false,
            ParseErrorCode::MissingDoctypeSystemIdentifier,
            ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier,
        );
    }

    fn handle_before_doctype_identifier(
        &mut self,
        public: bool,
        missing_identifier: ParseErrorCode,
        missing_quote: ParseErrorCode,
    ) {
        match self.current_input_character {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(public, quote),
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-doctype-public-identifier parse error. Set the
            // current DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => self.missing_doctype_identifier(missing_identifier),
            None => self.eof_in_doctype(),
            // "Anything else"
            // "This is a missing-quote-before-doctype-public-identifier parse
            // error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(_) => self.bogus_doctype_identifier(missing_quote),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_public_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            // "Switch to the after DOCTYPE public identifier state."
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDOCTYPEPublicIdentifier),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|token| token.append_to_public_identifier('\0'));
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-doctype-public-identifier parse error. Set the
            // current DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => self.missing_doctype_identifier(ParseErrorCode::AbruptDoctypePublicIdentifier),
            None => self.eof_in_doctype(),
            // "Append the current input character to the current DOCTYPE token's
            // public identifier."
            Some(c) => self.with_doctype(|token| token.append_to_public_identifier(c)),
        }
    }

    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    pub(super) fn handle_doctype_system_identifier_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterDOCTYPESystemIdentifier),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|token| token.append_to_system_identifier('\0'));
            }
            Some('>') => self.missing_doctype_identifier(ParseErrorCode::AbruptDoctypeSystemIdentifier),
            None => self.eof_in_doctype(),
            Some(c) => self.with_doctype(|token| token.append_to_system_identifier(c)),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            // "Switch to the between DOCTYPE public and system identifiers state."
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the data state. Emit the current DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "This is a missing-whitespace-between-doctype-public-and-system-identifiers
            // parse error."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                self.open_doctype_identifier(false, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.bogus_doctype_identifier(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            Some(quote @ ('"' | '\'')) => self.open_doctype_identifier(false, quote),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.bogus_doctype_identifier(ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            None => self.eof_in_doctype(),
            // "Anything else"
            // "This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does not
            // set the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            // "Switch to the data state. Emit the DOCTYPE token."
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Ignore the character."
            Some('\0') => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
            // "EOF"
            // "Emit the DOCTYPE token. Emit an end-of-file token."
            None => self.emit_current_token_and_eof(),
            // "Ignore the character."
            Some(_) => {}
        }
    }

    // =========================================================================
    // Shared DOCTYPE transitions
    // =========================================================================

    fn with_doctype(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = &mut self.current_token {
            f(token);
        }
    }

    /// "Set the current DOCTYPE token's X identifier to the empty string (not
    /// missing), then switch to the DOCTYPE X identifier (quoted) state."
    fn open_doctype_identifier(&mut self, public: bool, quote: char) {
        let state = match (public, quote) {
            (true, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (true, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (false, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (false, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        };
        if public {
            self.with_doctype(Token::set_public_identifier_empty);
        } else {
            self.with_doctype(Token::set_system_identifier_empty);
        }
        self.switch_to(state);
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on. Switch to the
    /// data state. Emit the current DOCTYPE token."
    fn missing_doctype_identifier(&mut self, code: ParseErrorCode) {
        self.parse_error(code);
        self.with_doctype(Token::set_force_quirks);
        self.switch_to(TokenizerState::Data);
        self.emit_current_token();
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on. Reconsume in
    /// the bogus DOCTYPE state."
    fn bogus_doctype_identifier(&mut self, code: ParseErrorCode) {
        self.parse_error(code);
        self.with_doctype(Token::set_force_quirks);
        self.reconsume_in(TokenizerState::BogusDOCTYPE);
    }

    /// "EOF - This is an eof-in-doctype parse error. Set the current DOCTYPE
    /// token's force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(ParseErrorCode::EofInDoctype);
        self.with_doctype(Token::set_force_quirks);
        self.emit_current_token_and_eof();
    }
}
