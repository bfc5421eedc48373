//! Text-content states: data, RCDATA, RAWTEXT, script data (with its escaped
//! and double-escaped sub-states), PLAINTEXT and CDATA sections.

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    pub(super) fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::Data);
                self.reference_start = self.current_char_start;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::TagOpen);
            }
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_null_character_token();
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    pub(super) fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&)"
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = Some(TokenizerState::RCDATA);
                self.reference_start = self.current_char_start;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the RCDATA less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::RCDATALessThanSign);
            }
            _ => self.handle_raw_text_character(),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    pub(super) fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the RAWTEXT less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::RAWTEXTLessThanSign);
            }
            _ => self.handle_raw_text_character(),
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::ScriptDataLessThanSign);
            }
            _ => self.handle_raw_text_character(),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    pub(super) fn handle_plaintext_state(&mut self) {
        self.handle_raw_text_character();
    }

    /// The NUL / EOF / anything-else arms shared by the RCDATA, RAWTEXT,
    /// script data and PLAINTEXT states.
    fn handle_raw_text_character(&mut self) {
        match self.current_input_character {
            // "U+0000 NULL"
            // "This is an unexpected-null-character parse error. Emit a U+FFFD
            // REPLACEMENT CHARACTER character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            // "EOF"
            // "Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else"
            // "Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    pub(super) fn handle_rcdata_less_than_sign_state(&mut self) {
        self.handle_text_less_than_sign(
            TokenizerState::RCDATA,
            TokenizerState::RCDATAEndTagOpen,
        );
    }

    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    pub(super) fn handle_rawtext_less_than_sign_state(&mut self) {
        self.handle_text_less_than_sign(
            TokenizerState::RAWTEXT,
            TokenizerState::RAWTEXTEndTagOpen,
        );
    }

    fn handle_text_less_than_sign(
        &mut self,
        text_state: TokenizerState,
        end_tag_open_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the X end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open_state);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the X state."
            _ => {
                self.emit_buffered_characters("<");
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    pub(super) fn handle_rcdata_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::RCDATA,
            TokenizerState::RCDATAEndTagName,
        );
    }

    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    pub(super) fn handle_rawtext_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::RAWTEXT,
            TokenizerState::RAWTEXTEndTagName,
        );
    }

    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    pub(super) fn handle_script_data_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::ScriptData,
            TokenizerState::ScriptDataEndTagName,
        );
    }

    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    pub(super) fn handle_script_data_escaped_end_tag_open_state(&mut self) {
        self.handle_text_end_tag_open(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataEscapedEndTagName,
        );
    }

    fn handle_text_end_tag_open(
        &mut self,
        text_state: TokenizerState,
        end_tag_name_state: TokenizerState,
    ) {
        match self.current_input_character {
            // "ASCII alpha"
            // "Create a new end tag token, set its tag name to the empty string.
            // Reconsume in the X end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(end_tag_name_state);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS
            // character token. Reconsume in the X state."
            _ => {
                self.emit_buffered_characters("</");
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    pub(super) fn handle_rcdata_end_tag_name_state(&mut self) {
        self.handle_text_end_tag_name(TokenizerState::RCDATA);
    }

    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    pub(super) fn handle_rawtext_end_tag_name_state(&mut self) {
        self.handle_text_end_tag_name(TokenizerState::RAWTEXT);
    }

    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    pub(super) fn handle_script_data_end_tag_name_state(&mut self) {
        self.handle_text_end_tag_name(TokenizerState::ScriptData);
    }

    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    pub(super) fn handle_script_data_escaped_end_tag_name_state(&mut self) {
        self.handle_text_end_tag_name(TokenizerState::ScriptDataEscaped);
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the
            // script data end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "U+0021 EXCLAMATION MARK (!)"
            // "Switch to the script data escape start state. Emit a U+003C
            // LESS-THAN SIGN character token and a U+0021 EXCLAMATION MARK
            // character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_buffered_characters("<");
                self.emit_character_token('!');
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // script data state."
            _ => {
                self.emit_buffered_characters("<");
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data escape start dash state. Emit a U+002D
            // HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
                self.emit_character_token('-');
            }
            // "Anything else"
            // "Reconsume in the script data state."
            _ => self.reconsume_in(TokenizerState::ScriptData),
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data escaped dash dash state. Emit a U+002D
            // HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            // "Anything else"
            // "Reconsume in the script data state."
            _ => self.reconsume_in(TokenizerState::ScriptData),
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data escaped dash state. Emit a U+002D
            // HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data escaped less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data escaped dash dash state. Emit a U+002D
            // HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data escaped less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => self.emit_character_token('-'),
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data escaped less-than sign state."
            Some('<') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the script data state. Emit a U+003E GREATER-THAN SIGN
            // character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataEscaped),
        }
    }

    /// The NUL / EOF / anything-else arms of the escaped and double-escaped
    /// script states.
    ///
    /// "U+0000 NULL - This is an unexpected-null-character parse error. Switch
    /// to the X state. Emit a U+FFFD REPLACEMENT CHARACTER character token."
    /// "EOF - This is an eof-in-script-html-comment-like-text parse error.
    /// Emit an end-of-file token."
    /// "Anything else - Switch to the X state. Emit the current input
    /// character as a character token."
    fn handle_escaped_script_character(&mut self, state: TokenizerState) {
        match self.current_input_character {
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.switch_to(state);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ParseErrorCode::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(state);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the
            // script data escaped end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "ASCII alpha"
            // "Set the temporary buffer to the empty string. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the script data
            // double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_buffered_characters("<");
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // script data escaped state."
            _ => {
                self.emit_buffered_characters("<");
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    pub(super) fn handle_script_data_double_escape_start_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataDoubleEscaped,
            TokenizerState::ScriptDataEscaped,
        );
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    pub(super) fn handle_script_data_double_escape_end_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataDoubleEscaped,
        );
    }

    /// Shared body of the double escape start and end states.
    ///
    /// "U+0009 CHARACTER TABULATION (tab), U+000A LINE FEED (LF), U+000C FORM
    /// FEED (FF), U+0020 SPACE, U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN (>)
    /// - If the temporary buffer is the string "script", then switch to the
    /// `on_script` state. Otherwise, switch to the `otherwise` state. Emit the
    /// current input character as a character token."
    fn handle_double_escape_boundary(
        &mut self,
        on_script: TokenizerState,
        otherwise: TokenizerState,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(on_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_character_token(c);
            }
            // "ASCII upper alpha - Append the lowercase version of the current
            // input character to the temporary buffer. Emit the current input
            // character as a character token."
            // "ASCII lower alpha - Append the current input character to the
            // temporary buffer. Emit the current input character as a character token."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            // "Anything else - Reconsume in the `otherwise` state."
            _ => self.reconsume_in(otherwise),
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data double escaped dash state. Emit a
            // U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data double escaped less-than sign state.
            // Emit a U+003C LESS-THAN SIGN character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the script data double escaped dash dash state. Emit a
            // U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data double escaped less-than sign state.
            // Emit a U+003C LESS-THAN SIGN character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            // "U+002D HYPHEN-MINUS (-)"
            // "Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => self.emit_character_token('-'),
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the script data double escaped less-than sign state.
            // Emit a U+003C LESS-THAN SIGN character token."
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the script data state. Emit a U+003E GREATER-THAN SIGN
            // character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            _ => self.handle_escaped_script_character(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the
            // script data double escape end state. Emit a U+002F SOLIDUS
            // character token."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
                self.emit_character_token('/');
            }
            // "Anything else"
            // "Reconsume in the script data double escaped state."
            _ => self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (])"
            // "Switch to the CDATA section bracket state."
            Some(']') => {
                self.markup_start = self.current_char_start;
                self.switch_to(TokenizerState::CDATASectionBracket);
            }
            // "EOF"
            // "This is an eof-in-cdata parse error. Emit an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofInCdata);
                self.emit_eof_token();
            }
            // "U+0000 NULL characters are handled in the tree construction
            // stage, as part of the in foreign content insertion mode."
            Some('\0') => self.emit_null_character_token(),
            // "Anything else"
            // "Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (])"
            // "Switch to the CDATA section end state."
            Some(']') => self.switch_to(TokenizerState::CDATASectionEnd),
            // "Anything else"
            // "Emit a U+005D RIGHT SQUARE BRACKET character token. Reconsume in
            // the CDATA section state."
            _ => {
                self.emit_buffered_characters("]");
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            // "U+005D RIGHT SQUARE BRACKET (])"
            // "Emit a U+005D RIGHT SQUARE BRACKET character token."
            Some(']') => {
                self.emit_buffered_characters("]");
                self.markup_start.offset += 1;
                self.markup_start.column += 1;
            }
            // "U+003E GREATER-THAN SIGN character"
            // "Switch to the data state."
            Some('>') => self.switch_to(TokenizerState::Data),
            // "Anything else"
            // "Emit two U+005D RIGHT SQUARE BRACKET character tokens. Reconsume
            // in the CDATA section state."
            _ => {
                self.emit_buffered_characters("]]");
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}
