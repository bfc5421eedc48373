//! HTML parser module for tree construction.
//!
//! [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)

mod adoption;
/// Parser session, options and the tree construction dispatcher.
pub mod core;
/// The list of active formatting elements.
pub mod formatting;
/// SVG and MathML handling.
pub mod foreign_content;
mod insertion;
mod modes;
/// The stack of open elements.
pub mod open_elements;
mod quirks;
/// Interned tag names.
pub mod tag;

pub use core::{
    FragmentContext, HTMLParser, InsertionMode, ParseOutput, ParseStatus, ParserOptions,
};
pub use formatting::{ActiveFormattingElement, ActiveFormattingElements};
pub use open_elements::{OpenElement, OpenElements, Scope};
pub use tag::TagId;
