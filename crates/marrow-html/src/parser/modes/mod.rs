//! [§ 13.2.6.4 The rules for parsing tokens in HTML content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhtml)
//!
//! One `handle_*_mode` method per insertion mode, grouped by the part of the
//! document they build.

mod after;
pub(crate) mod body;
mod head;
mod initial;
mod select;
mod table;
mod template;
mod text;

use crate::error::ParseErrorCode;
use crate::parser::core::HTMLParser;
use crate::tokenizer::Token;

impl HTMLParser {
    /// "Parse error. Ignore the token." with a code matching the kind of token.
    pub(crate) fn unexpected_token(&mut self, token: &Token) {
        let code = match token {
            Token::Doctype { .. } => ParseErrorCode::MisplacedDoctype,
            Token::StartTag { .. } => ParseErrorCode::MisplacedStartTag,
            Token::EndTag { .. } => ParseErrorCode::UnexpectedEndTag,
            Token::NullCharacter => ParseErrorCode::UnexpectedNullCharacter,
            Token::Character { .. }
            | Token::Whitespace { .. }
            | Token::Comment { .. }
            | Token::EndOfFile => ParseErrorCode::UnexpectedCharacter,
        };
        self.parse_error(code);
    }
}
