//! Parse errors and API misuse errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! Markup errors never stop the parser; they are collected and forwarded to
//! an optional [`ErrorSink`]. Only misuse of the driving API ([`ParserError`])
//! is a hard error.

use std::fmt;

use marrow_dom::SourcePosition;
use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// The error codes the tokenizer, preprocessor and tree builder report.
///
/// The `Display` form is the kebab-case code, e.g. `eof-in-tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ParseErrorCode {
    // ===== Preprocessor =====
    /// Lone surrogate in UTF-16 input.
    SurrogateInInputStream,
    /// Noncharacter code point in the input.
    NoncharacterInInputStream,
    /// Control character other than ASCII whitespace or NUL.
    ControlCharacterInInputStream,

    // ===== Tokenizer =====
    /// `<!-->` or `<!--->`.
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` with no digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` in HTML content.
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a control character.
    ControlCharacterReference,
    /// Attribute name repeated on one tag.
    DuplicateAttribute,
    /// End tag carrying attributes.
    EndTagWithAttributes,
    /// End tag with a trailing `/`.
    EndTagWithTrailingSolidus,
    /// EOF right after `<` or `</`.
    EofBeforeTagName,
    /// EOF inside a CDATA section.
    EofInCdata,
    /// EOF inside a comment.
    EofInComment,
    /// EOF inside a DOCTYPE.
    EofInDoctype,
    /// EOF inside `<!--` in script data.
    EofInScriptHtmlCommentLikeText,
    /// EOF inside a tag.
    EofInTag,
    /// Comment closed by `--!>`.
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// Junk after a DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by something that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `name=` followed by `>`.
    MissingAttributeValue,
    /// `<!DOCTYPE>`.
    MissingDoctypeName,
    /// `PUBLIC` with no identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier.
    MissingDoctypeSystemIdentifier,
    /// `</>`.
    MissingEndTagName,
    /// Unquoted DOCTYPE public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Unquoted DOCTYPE system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// Named reference without a trailing `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"` with no whitespace.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"` with no whitespace.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`.
    MissingWhitespaceBeforeDoctypeName,
    /// `a="1"b="2"`.
    MissingWhitespaceBetweenAttributes,
    /// Public and system identifiers run together.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment.
    NestedComment,
    /// Numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// `<div/>` on a non-void HTML element.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// `&#0;`.
    NullCharacterReference,
    /// Numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// Junk after a DOCTYPE system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `=` where an attribute name should start.
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 in the input.
    UnexpectedNullCharacter,
    /// `<?`.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` in a tag not followed by `>`.
    UnexpectedSolidusInTag,
    /// `&name;` that matches no named reference.
    UnknownNamedCharacterReference,

    // ===== Tree construction =====
    /// No DOCTYPE before the first element.
    MissingDoctype,
    /// DOCTYPE that is not `<!DOCTYPE html>` or an allowed legacy form.
    NonConformingDoctype,
    /// DOCTYPE after the initial insertion mode.
    MisplacedDoctype,
    /// Start tag that is not allowed where it appears.
    MisplacedStartTag,
    /// End tag with no matching open element, or in a place it cannot be.
    UnexpectedEndTag,
    /// End tag that closes elements that were still open inside it.
    EndTagWithOpenChildElements,
    /// Character data where only whitespace is allowed.
    UnexpectedCharacter,
    /// Non-whitespace text directly inside a table.
    UnexpectedCharacterInTable,
    /// Element moved out of a table by foster parenting.
    FosterParentedElement,
    /// Formatting end tag the adoption agency had to repair.
    MisnestedFormattingElement,
    /// Nested `<form>`.
    NestedForm,
    /// `<noscript>` inside `<noscript>` in head.
    NestedNoscriptInHead,
    /// Content in `<noscript>` in head that is not allowed there.
    DisallowedContentInNoscriptInHead,
    /// Head-only element after `</head>`.
    AbandonedHeadElementChild,
    /// HTML content in foreign content that forced an exit.
    UnexpectedHtmlElementInForeignContent,
    /// EOF while in a raw text, RCDATA or script element.
    EofInElementThatCanContainOnlyText,
    /// Elements other than the optional-end-tag ones open at EOF.
    OpenElementsLeftAfterEof,
    /// EOF with an open `<template>`.
    EofInTemplate,
    /// Non-whitespace or tags in frameset content.
    UnexpectedTokenInFrameset,
    /// Content after `</body>` or `</html>`.
    UnexpectedContentAfterBody,
}

impl ParseErrorCode {
    /// The kebab-case code string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A non-fatal markup error and where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
pub struct ParseError {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    /// Code-point offset from the start of the input.
    pub offset: usize,
}

impl ParseError {
    /// Build an error at a source position.
    #[must_use]
    pub const fn at(code: ParseErrorCode, position: SourcePosition) -> Self {
        Self {
            code,
            line: position.line,
            column: position.column,
            offset: position.offset,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.code)
    }
}

/// Observer receiving every parse error as it is reported.
///
/// Reporting is fire-and-forget: the sink cannot influence parsing.
pub trait ErrorSink {
    /// Called once per parse error, in source order.
    fn report(&mut self, error: &ParseError);
}

impl<F> ErrorSink for F
where
    F: FnMut(&ParseError),
{
    fn report(&mut self, error: &ParseError) {
        self(error);
    }
}

/// Misuse of the parser's driving API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParserError {
    /// Input was written after [`end`](crate::HTMLParser::end) was called.
    #[error("cannot write to a parser after the final chunk has been signalled")]
    WriteAfterEnd,
    /// [`resume`](crate::HTMLParser::resume) was called on a parser that is not paused.
    #[error("parser is not paused")]
    NotPaused,
    /// The parser was stopped and cannot resume.
    #[error("parser has been stopped")]
    Stopped,
}
