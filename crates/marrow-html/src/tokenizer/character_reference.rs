//! Character reference states of the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)

use marrow_dom::SourcePosition;

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{self, Lookup};
use crate::error::ParseErrorCode;
use crate::input::{self, Next};

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column of that row."
const C1_REPLACEMENTS: [(u32, u32); 27] = [
    (0x80, 0x20AC), // EURO SIGN
    (0x82, 0x201A), // SINGLE LOW-9 QUOTATION MARK
    (0x83, 0x0192), // LATIN SMALL LETTER F WITH HOOK
    (0x84, 0x201E), // DOUBLE LOW-9 QUOTATION MARK
    (0x85, 0x2026), // HORIZONTAL ELLIPSIS
    (0x86, 0x2020), // DAGGER
    (0x87, 0x2021), // DOUBLE DAGGER
    (0x88, 0x02C6), // MODIFIER LETTER CIRCUMFLEX ACCENT
    (0x89, 0x2030), // PER MILLE SIGN
    (0x8A, 0x0160), // LATIN CAPITAL LETTER S WITH CARON
    (0x8B, 0x2039), // SINGLE LEFT-POINTING ANGLE QUOTATION MARK
    (0x8C, 0x0152), // LATIN CAPITAL LIGATURE OE
    (0x8E, 0x017D), // LATIN CAPITAL LETTER Z WITH CARON
    (0x91, 0x2018), // LEFT SINGLE QUOTATION MARK
    (0x92, 0x2019), // RIGHT SINGLE QUOTATION MARK
    (0x93, 0x201C), // LEFT DOUBLE QUOTATION MARK
    (0x94, 0x201D), // RIGHT DOUBLE QUOTATION MARK
    (0x95, 0x2022), // BULLET
    (0x96, 0x2013), // EN DASH
    (0x97, 0x2014), // EM DASH
    (0x98, 0x02DC), // SMALL TILDE
    (0x99, 0x2122), // TRADE MARK SIGN
    (0x9A, 0x0161), // LATIN SMALL LETTER S WITH CARON
    (0x9B, 0x203A), // SINGLE RIGHT-POINTING ANGLE QUOTATION MARK
    (0x9C, 0x0153), // LATIN SMALL LIGATURE OE
    (0x9E, 0x017E), // LATIN SMALL LETTER Z WITH CARON
    (0x9F, 0x0178), // LATIN CAPITAL LETTER Y WITH DIAERESIS
];

/// Resolve a numeric character reference code to the character it stands
/// for, along with the parse error it raises, if any.
pub(crate) fn resolve_numeric_reference(code: u32) -> (char, Option<ParseErrorCode>) {
    // "If the number is 0x00, then this is a null-character-reference parse
    // error. Set the character reference code to 0xFFFD."
    if code == 0 {
        return ('\u{FFFD}', Some(ParseErrorCode::NullCharacterReference));
    }
    // "If the number is greater than 0x10FFFF, then this is a
    // character-reference-outside-unicode-range parse error."
    if code > 0x10_FFFF {
        return (
            '\u{FFFD}',
            Some(ParseErrorCode::CharacterReferenceOutsideUnicodeRange),
        );
    }
    // "If the number is a surrogate, then this is a surrogate-character-reference
    // parse error."
    let Some(c) = char::from_u32(code) else {
        return ('\u{FFFD}', Some(ParseErrorCode::SurrogateCharacterReference));
    };
    // "If the number is a noncharacter, then this is a
    // noncharacter-character-reference parse error."
    if input::is_noncharacter(c) {
        return (c, Some(ParseErrorCode::NoncharacterCharacterReference));
    }
    // "If the number is 0x0D, or a control that's not ASCII whitespace, then
    // this is a control-character-reference parse error."
    if code == 0x0D || (input::is_control(code) && !HTMLTokenizer::is_whitespace_char(c)) {
        let replaced = C1_REPLACEMENTS
            .iter()
            .find(|&&(from, _)| from == code)
            .and_then(|&(_, to)| char::from_u32(to))
            .unwrap_or(c);
        return (replaced, Some(ParseErrorCode::ControlCharacterReference));
    }
    (c, None)
}

impl HTMLTokenizer {
    /// "consumed as part of an attribute": the return state is one of the
    /// attribute value states.
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                TokenizerState::AttributeValueDoubleQuoted
                    | TokenizerState::AttributeValueSingleQuoted
                    | TokenizerState::AttributeValueUnquoted
            )
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    fn flush_code_points_consumed_as_character_reference(&mut self, end: SourcePosition) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        if self.is_consumed_as_part_of_attribute() {
            for c in buffer.chars() {
                self.append_to_attribute_value(c);
            }
        } else {
            self.emit_characters_at(&buffer, self.reference_start, end);
        }
    }

    /// The `i`th character of a name starting at the current input character.
    fn lookahead_char(&self, i: usize) -> Next {
        match (i, self.current_input_character) {
            (0, Some(c)) => Next::Char(c),
            (0, None) => Next::Eof,
            (n, _) => self.input.peek(n - 1),
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        match self.current_input_character {
            // "ASCII alphanumeric"
            // "Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#)"
            // "Append the current input character to the temporary buffer.
            // Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else"
            // "Flush code points consumed as a character reference. Reconsume
            // in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference(self.current_char_start);
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    pub(super) fn handle_named_character_reference_state(&mut self) {
        // "Consume the maximum number of characters possible, where the
        // consumed characters are one of the identifiers in the first column of
        // the named character references table. Append each character to the
        // temporary buffer when it's consumed."
        let (len, characters) =
            match named_character_references::longest_match(|i| self.lookahead_char(i)) {
                Lookup::NeedMoreInput => return self.suspend(),
                // "Otherwise: Flush code points consumed as a character
                // reference. Switch to the ambiguous ampersand state."
                Lookup::NotFound => {
                    self.flush_code_points_consumed_as_character_reference(
                        self.current_char_start,
                    );
                    self.reconsume_in(TokenizerState::AmbiguousAmpersand);
                    return;
                }
                Lookup::Found { len, characters } => (len, characters),
            };

        let name: String = (0..len)
            .filter_map(|i| match self.lookahead_char(i) {
                Next::Char(c) => Some(c),
                Next::Eof | Next::NeedMoreInput => None,
            })
            .collect();
        let ends_with_semicolon = name.ends_with(';');

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return state."
        if self.is_consumed_as_part_of_attribute() && !ends_with_semicolon {
            let historical = match self.lookahead_char(len) {
                Next::NeedMoreInput => return self.suspend(),
                Next::Char(c) => c == '=' || c.is_ascii_alphanumeric(),
                Next::Eof => false,
            };
            if historical {
                self.consume_lookahead(len - 1);
                self.temporary_buffer.push_str(&name);
                self.flush_code_points_consumed_as_character_reference(self.input.position());
                self.switch_to_return_state();
                return;
            }
        }

        self.consume_lookahead(len - 1);
        // "If the last character matched is not a U+003B SEMICOLON character
        // (;), then this is a missing-semicolon-after-character-reference parse
        // error."
        if !ends_with_semicolon {
            self.parse_error_at(
                ParseErrorCode::MissingSemicolonAfterCharacterReference,
                self.input.position(),
            );
        }
        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name (as given
        // by the second column of the named character references table) to the
        // temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push_str(characters);
        self.flush_code_points_consumed_as_character_reference(self.input.position());
        self.switch_to_return_state();
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            // "ASCII alphanumeric"
            // "If the character reference was consumed as part of an attribute,
            // then append the current input character to the current attribute's
            // value. Otherwise, emit the current input character as a character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.append_to_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;)"
            // "This is an unknown-named-character-reference parse error.
            // Reconsume in the return state."
            Some(';') => {
                self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                self.reconsume_in_return_state();
            }
            // "Anything else"
            // "Reconsume in the return state."
            _ => self.reconsume_in_return_state(),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            // "U+0078 LATIN SMALL LETTER X"
            // "U+0058 LATIN CAPITAL LETTER X"
            // "Append the current input character to the temporary buffer.
            // Switch to the hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else"
            // "Reconsume in the decimal character reference start state."
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            // "ASCII hex digit"
            // "Reconsume in the hexadecimal character reference state."
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            // "ASCII digit"
            // "Reconsume in the decimal character reference state."
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// "Anything else"
    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference(self.current_char_start);
        self.reconsume_in_return_state();
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.handle_numeric_digits(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.handle_numeric_digits(10);
    }

    fn handle_numeric_digits(&mut self, radix: u32) {
        match self.current_input_character {
            // "ASCII digit / ASCII hex digit"
            // "Multiply the character reference code by 16 (or 10). Add a
            // numeric version of the current input character to the character
            // reference code."
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit);
            }
            // "U+003B SEMICOLON"
            // "Switch to the numeric character reference end state."
            Some(';') => self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd),
            // "Anything else"
            // "This is a missing-semicolon-after-character-reference parse
            // error. Reconsume in the numeric character reference end state."
            _ => {
                self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Entered with the character after the digits still current: a `;`
    /// belongs to the reference, anything else is reconsumed in the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let (c, error) = resolve_numeric_reference(self.character_reference_code);
        if let Some(code) = error {
            self.parse_error_at(code, self.reference_start);
        }
        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer. Flush
        // code points consumed as a character reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer.push(c);
        if self.current_input_character == Some(';') {
            self.flush_code_points_consumed_as_character_reference(self.input.position());
            self.switch_to_return_state();
        } else {
            self.flush_code_points_consumed_as_character_reference(self.current_char_start);
            self.reconsume_in_return_state();
        }
    }
}
