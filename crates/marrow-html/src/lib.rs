//! Streaming HTML tokenizer and tree builder.
//!
//! # Scope
//!
//! This crate implements:
//! - **Input stream preprocessing** ([WHATWG § 13.2.3.5](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream))
//!   - Newline normalization across chunk boundaries
//!   - Surrogate, noncharacter and control character errors
//!
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Every tokenizer state, including script data escapes and CDATA sections
//!   - Named and numeric character references
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes, foster parenting and foreign content
//!   - The adoption agency algorithm
//!   - Fragment parsing, chunked input, pausing at `</script>`
//!
//! - **Serialization** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Example
//!
//! ```
//! use marrow_html::{ParserOptions, parse_document, serialize};
//!
//! let output = parse_document("<p>Hello<p>world", ParserOptions::default());
//! let body = output.tree.body().unwrap();
//! assert_eq!(serialize(&output.tree, body), "<p>Hello</p><p>world</p>");
//! ```

/// Parse errors and API misuse errors.
pub mod error;
/// The preprocessed input stream.
pub mod input;
/// HTML parser and tree construction.
pub mod parser;
/// HTML serialization and tree dumps.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{ErrorSink, ParseError, ParseErrorCode, ParserError};
pub use parser::{
    FragmentContext, HTMLParser, InsertionMode, ParseOutput, ParseStatus, ParserOptions, TagId,
};
pub use serializer::{dump_tree, print_tree, serialize, serialize_with_scripting};
pub use tokenizer::{Attribute, HTMLTokenizer, Span, SpannedToken, Token};

/// Parse a complete document.
///
/// Script pauses are run straight through; use [`HTMLParser`] directly to
/// stop at each `</script>`.
#[must_use]
pub fn parse_document(input: &str, options: ParserOptions) -> ParseOutput {
    let mut parser = HTMLParser::new(options);
    parser.parse_to_end(input);
    parser.into_output()
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// Parse `input` as the contents of `context`. The returned tree's root is a
/// `DocumentFragment` holding the parsed nodes.
#[must_use]
pub fn parse_fragment(input: &str, context: FragmentContext, options: ParserOptions) -> ParseOutput {
    let mut parser = HTMLParser::for_fragment(context, options);
    parser.parse_to_end(input);
    parser.into_output()
}

/// Tokenize a complete input without building a tree.
///
/// The tokenizer switches into the raw text states after `script`, `style`,
/// `textarea` and friends on its own, as no tree builder is there to do it.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    tokenizer.run();
    tokenizer.into_tokens()
}
