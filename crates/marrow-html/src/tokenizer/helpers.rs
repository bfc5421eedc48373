//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Lookahead ("If the next few characters are")
//! - Token emission ("Emit the current token"), including character runs
//! - RCDATA/RAWTEXT/script end tag helpers
//! - Attribute helpers for duplicate detection
//! - Parse error reporting

use log::debug;
use marrow_dom::SourcePosition;

use super::core::{HTMLTokenizer, TextKind, TokenizerState};
use super::token::{Attribute, Span, SpannedToken, Token};
use crate::error::{ParseError, ParseErrorCode};
use crate::input::Next;

/// Outcome of a multi-character lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Lookahead {
    Match,
    Mismatch,
    /// The buffer ended before the comparison could be decided.
    Pending,
}

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Switch to the X state"
    ///
    /// Transitions to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Reconsume in the X state"
    ///
    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// Switch to the return state set by the character reference states.
    pub(super) fn switch_to_return_state(&mut self) {
        let state = self.return_state.take().unwrap_or(TokenizerState::Data);
        self.switch_to(state);
    }

    /// Reconsume in the return state set by the character reference states.
    pub(super) fn reconsume_in_return_state(&mut self) {
        let state = self.return_state.take().unwrap_or(TokenizerState::Data);
        self.reconsume_in(state);
    }

    /// Keep the current input character and stop until more input arrives.
    /// The current state's handler runs again with the same character.
    pub(super) const fn suspend(&mut self) {
        self.reconsume = true;
        self.suspended = true;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If the next few characters are..."
    ///
    /// Compares `target` against the current input character followed by the
    /// characters after it, without consuming anything.
    pub(super) fn next_few_characters_are(
        &self,
        target: &str,
        ascii_case_insensitive: bool,
    ) -> Lookahead {
        let matches = |actual: char, expected: char| {
            if ascii_case_insensitive {
                actual.eq_ignore_ascii_case(&expected)
            } else {
                actual == expected
            }
        };

        let mut expected = target.chars();
        let Some(first) = expected.next() else {
            return Lookahead::Match;
        };
        match self.current_input_character {
            Some(c) if matches(c, first) => {}
            _ => return Lookahead::Mismatch,
        }
        for (offset, want) in expected.enumerate() {
            match self.input.peek(offset) {
                Next::Char(c) if matches(c, want) => {}
                Next::Char(_) | Next::Eof => return Lookahead::Mismatch,
                Next::NeedMoreInput => return Lookahead::Pending,
            }
        }
        Lookahead::Match
    }

    /// Consume `count` characters that a lookahead already inspected.
    pub(super) fn consume_lookahead(&mut self, count: usize) {
        for _ in 0..count {
            self.current_char_start = self.input.position();
            if let Next::Char(c) = self.input.advance() {
                self.current_input_character = Some(c);
            }
        }
        self.errors.extend(self.input.take_errors());
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    ///
    /// NOTE: HTML tokenizer uses a subset excluding CR (which is normalized earlier).
    pub(crate) const fn is_whitespace_char(input_char: char) -> bool {
        // "U+0009 CHARACTER TABULATION (tab)"
        // "U+000A LINE FEED (LF)"
        // "U+000C FORM FEED (FF)"
        // "U+0020 SPACE"
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token" - flushes pending text, then queues the tag,
    /// comment or DOCTYPE token.
    pub(super) fn emit_current_token(&mut self) {
        self.flush_text();
        self.commit_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };

        match &token {
            // [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
            // "When an end tag token is emitted with attributes, that is an
            // end-tag-with-attributes parse error."
            // "When an end tag token is emitted with its self-closing flag set,
            // that is an end-tag-with-trailing-solidus parse error."
            Token::EndTag {
                attributes,
                self_closing,
                ..
            } => {
                if !attributes.is_empty() {
                    self.parse_error(ParseErrorCode::EndTagWithAttributes);
                }
                if *self_closing {
                    self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                }
            }
            Token::StartTag { name, .. } => {
                // Track the last start tag name for RCDATA/RAWTEXT end tag detection
                self.last_start_tag_name = Some(name.clone());
                if self.options.standalone {
                    self.switch_for_raw_text_element(name.as_str());
                }
            }
            _ => {}
        }

        let span = Span {
            start: self.markup_start,
            end: self.input.position(),
        };
        self.output.push_back(SpannedToken { token, span });
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Without a tree builder, the tokenizer itself makes the switch the tree
    /// builder would make for raw text elements.
    fn switch_for_raw_text_element(&mut self, name: &str) {
        match name {
            // "Follow the generic RCDATA element parsing algorithm."
            "title" | "textarea" => self.switch_to(TokenizerState::RCDATA),
            // "Follow the generic raw text element parsing algorithm."
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                self.switch_to(TokenizerState::RAWTEXT);
            }
            // "Switch the tokenizer to the script data state."
            "script" => self.switch_to(TokenizerState::ScriptData),
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => self.switch_to(TokenizerState::PLAINTEXT),
            _ => {}
        }
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        let start = self.current_char_start;
        let end = self.input.position();
        self.push_text(c, start, end);
    }

    /// Emit characters that were consumed before the current input
    /// character, such as the `<` of a tag open that turned out to be text.
    pub(super) fn emit_buffered_characters(&mut self, chars: &str) {
        let start = self.markup_start;
        let end = self.current_char_start;
        for c in chars.chars() {
            self.push_text(c, start, end);
        }
    }

    /// Emit characters with an explicit source range.
    pub(super) fn emit_characters_at(&mut self, chars: &str, start: SourcePosition, end: SourcePosition) {
        for c in chars.chars() {
            self.push_text(c, start, end);
        }
    }

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    ///
    /// "Emit the current input character as a character token" for U+0000,
    /// which travels as its own token.
    pub(super) fn emit_null_character_token(&mut self) {
        self.flush_text();
        let span = Span {
            start: self.current_char_start,
            end: self.input.position(),
        };
        self.output.push_back(SpannedToken {
            token: Token::NullCharacter,
            span,
        });
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.flush_text();
        let position = self.input.position();
        self.output.push_back(SpannedToken {
            token: Token::EndOfFile,
            span: Span {
                start: position,
                end: position,
            },
        });
        self.at_eof = true;
    }

    /// Emit the current token (a comment or DOCTYPE cut short by EOF), then EOF.
    pub(super) fn emit_current_token_and_eof(&mut self) {
        self.emit_current_token();
        self.emit_eof_token();
    }

    fn push_text(&mut self, c: char, start: SourcePosition, end: SourcePosition) {
        let kind = if Self::is_whitespace_char(c) {
            TextKind::Whitespace
        } else {
            TextKind::Character
        };
        if !self.text.is_empty() && self.text_kind != kind {
            self.flush_text();
        }
        if self.text.is_empty() {
            self.text_kind = kind;
            self.text_span.start = start;
        }
        self.text.push(c);
        self.text_span.end = end;
    }

    /// Queue the pending character run as one token.
    pub(super) fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.text);
        let token = match self.text_kind {
            TextKind::Whitespace => Token::Whitespace { data },
            TextKind::Character => Token::Character { data },
        };
        self.output.push_back(SpannedToken {
            token,
            span: self.text_span,
        });
    }
}

// =============================================================================
// RCDATA/RAWTEXT Helpers
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ///
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    ///
    /// Used to determine if `</title>` should close the current `<title>` element.
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        if let (Some(last_start_tag), Some(Token::EndTag { name, .. })) =
            (&self.last_start_tag_name, &self.current_token)
        {
            return name == last_start_tag;
        }
        false
    }

    /// Shared body of the RCDATA, RAWTEXT, script data and script data escaped
    /// end tag name states; `text_state` is the state they fall back to.
    ///
    /// "Anything else":
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the
    /// X state."
    pub(super) fn handle_text_end_tag_name(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "U+0009 CHARACTER TABULATION (tab)"
            // "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)"
            // "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token,
            // then switch to the before attribute name state."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            // "If the current end tag token is an appropriate end tag token,
            // then switch to the self-closing start tag state."
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "If the current end tag token is an appropriate end tag token,
            // then switch to the data state and emit the current tag token."
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_token();
            }
            // "ASCII upper alpha"
            // "Append the lowercase version of the current input character to
            // the current tag token's tag name. Append the current input
            // character to the temporary buffer."
            // "ASCII lower alpha"
            // "Append the current input character to the current tag token's
            // tag name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                if let Some(token) = &mut self.current_token {
                    token.append_to_tag_name(c.to_ascii_lowercase());
                }
                self.temporary_buffer.push(c);
            }
            _ => {
                let mut chars = String::from("</");
                chars.push_str(&self.temporary_buffer);
                self.emit_buffered_characters(&chars);
                self.current_token = None;
                self.reconsume_in(text_state);
            }
        }
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Start a new attribute in the current tag token. Set that attribute's
    /// name and value to the empty string."
    pub(super) fn start_new_attribute(&mut self) {
        self.commit_attribute();
        self.current_attribute = Some(Attribute::new(String::new(), String::new()));
    }

    /// Attach the finished attribute to the tag, unless it was a duplicate.
    pub(super) fn commit_attribute(&mut self) {
        let duplicate = std::mem::take(&mut self.current_attribute_duplicate);
        if let Some(attribute) = self.current_attribute.take()
            && !duplicate
            && let Some(token) = &mut self.current_token
        {
            token.push_attribute(attribute);
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(attribute) = &mut self.current_attribute {
            attribute.name.push(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(attribute) = &mut self.current_attribute {
            attribute.value.push(c);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    pub(super) fn check_duplicate_attribute(&mut self) {
        let is_duplicate = match (&self.current_attribute, &self.current_token) {
            (Some(attribute), Some(token)) => token.has_attribute(&attribute.name),
            _ => false,
        };
        if is_duplicate {
            self.parse_error(ParseErrorCode::DuplicateAttribute);
            self.current_attribute_duplicate = true;
        }
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Records a parse error at the current input character. Parse errors in
    /// HTML are not fatal - the tokenizer recovers and continues.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        let position = if self.current_input_character.is_some() {
            self.current_char_start
        } else {
            self.input.position()
        };
        self.parse_error_at(code, position);
    }

    pub(super) fn parse_error_at(&mut self, code: ParseErrorCode, position: SourcePosition) {
        debug!(target: "marrow::tokenizer", "parse error {code} at {position} in {}", self.state);
        self.errors.push_back(ParseError::at(code, position));
    }
}
