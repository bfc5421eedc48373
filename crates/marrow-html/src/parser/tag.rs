//! Interned tag names for the elements the tree builder treats specially.
//!
//! Tree construction dispatches on a few hundred tag names. Matching on an
//! enum keeps the insertion mode handlers readable and avoids repeated string
//! comparisons; every name the algorithm never singles out maps to
//! [`TagId::Unknown`].

use std::str::FromStr;

use strum_macros::EnumString;

use crate::tokenizer::Token;

/// Tag names with a role in tree construction.
///
/// Parsing is case-sensitive and expects the lowercase token form. SVG's
/// `foreignObject` is matched in both its token form and its adjusted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum TagId {
    A,
    Address,
    #[strum(serialize = "annotation-xml")]
    AnnotationXml,
    Applet,
    Area,
    Article,
    Aside,
    B,
    Base,
    Basefont,
    Bgsound,
    Big,
    Blockquote,
    Body,
    Br,
    Button,
    Caption,
    Center,
    Code,
    Col,
    Colgroup,
    Dd,
    Desc,
    Details,
    Dialog,
    Dir,
    Div,
    Dl,
    Dt,
    Em,
    Embed,
    Fieldset,
    Figcaption,
    Figure,
    Font,
    Footer,
    #[strum(serialize = "foreignObject", serialize = "foreignobject")]
    ForeignObject,
    Form,
    Frame,
    Frameset,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Head,
    Header,
    Hgroup,
    Hr,
    Html,
    I,
    Iframe,
    Image,
    Img,
    Input,
    Keygen,
    Li,
    Link,
    Listing,
    Main,
    Malignmark,
    Marquee,
    Math,
    Menu,
    Meta,
    Mglyph,
    Mi,
    Mn,
    Mo,
    Ms,
    Mtext,
    Nav,
    Nobr,
    Noembed,
    Noframes,
    Noscript,
    Object,
    Ol,
    Optgroup,
    Option,
    P,
    Param,
    Plaintext,
    Pre,
    Rb,
    Rp,
    Rt,
    Rtc,
    Ruby,
    S,
    Script,
    Search,
    Section,
    Select,
    Small,
    Source,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Summary,
    Sup,
    Svg,
    Table,
    Tbody,
    Td,
    Template,
    Textarea,
    Tfoot,
    Th,
    Thead,
    Title,
    Tr,
    Track,
    Tt,
    U,
    Ul,
    Var,
    Wbr,
    Xmp,
    /// Any name the tree builder has no special rule for.
    #[strum(disabled)]
    Unknown,
}

impl TagId {
    /// Intern a tag name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self::from_str(name).unwrap_or(Self::Unknown)
    }

    /// The interned name of a start or end tag token; [`TagId::Unknown`] for
    /// every other token.
    #[must_use]
    pub fn of(token: &Token) -> Self {
        token.tag_name().map_or(Self::Unknown, Self::from_name)
    }

    /// `h1` through `h6`.
    #[must_use]
    pub const fn is_heading(self) -> bool {
        matches!(
            self,
            Self::H1 | Self::H2 | Self::H3 | Self::H4 | Self::H5 | Self::H6
        )
    }

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#formatting)
    ///
    /// "The following elements are in the formatting category: a, b, big,
    /// code, em, font, i, nobr, s, small, strike, strong, tt, and u."
    #[must_use]
    pub const fn is_formatting(self) -> bool {
        matches!(
            self,
            Self::A
                | Self::B
                | Self::Big
                | Self::Code
                | Self::Em
                | Self::Font
                | Self::I
                | Self::Nobr
                | Self::S
                | Self::Small
                | Self::Strike
                | Self::Strong
                | Self::Tt
                | Self::U
        )
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// The HTML members of the special category. The MathML and SVG members
    /// are checked together with their namespace in
    /// [`OpenElements`](super::open_elements::OpenElements).
    #[must_use]
    pub const fn is_special_html(self) -> bool {
        matches!(
            self,
            Self::Address
                | Self::Applet
                | Self::Area
                | Self::Article
                | Self::Aside
                | Self::Base
                | Self::Basefont
                | Self::Bgsound
                | Self::Blockquote
                | Self::Body
                | Self::Br
                | Self::Button
                | Self::Caption
                | Self::Center
                | Self::Col
                | Self::Colgroup
                | Self::Dd
                | Self::Details
                | Self::Dir
                | Self::Div
                | Self::Dl
                | Self::Dt
                | Self::Embed
                | Self::Fieldset
                | Self::Figcaption
                | Self::Figure
                | Self::Footer
                | Self::Form
                | Self::Frame
                | Self::Frameset
                | Self::H1
                | Self::H2
                | Self::H3
                | Self::H4
                | Self::H5
                | Self::H6
                | Self::Head
                | Self::Header
                | Self::Hgroup
                | Self::Hr
                | Self::Html
                | Self::Iframe
                | Self::Img
                | Self::Input
                | Self::Keygen
                | Self::Li
                | Self::Link
                | Self::Listing
                | Self::Main
                | Self::Marquee
                | Self::Menu
                | Self::Meta
                | Self::Nav
                | Self::Noembed
                | Self::Noframes
                | Self::Noscript
                | Self::Object
                | Self::Ol
                | Self::P
                | Self::Param
                | Self::Plaintext
                | Self::Pre
                | Self::Script
                | Self::Search
                | Self::Section
                | Self::Select
                | Self::Source
                | Self::Style
                | Self::Summary
                | Self::Table
                | Self::Tbody
                | Self::Td
                | Self::Template
                | Self::Textarea
                | Self::Tfoot
                | Self::Th
                | Self::Thead
                | Self::Title
                | Self::Tr
                | Self::Track
                | Self::Ul
                | Self::Wbr
                | Self::Xmp
        )
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Void elements are inserted, then immediately popped.
    #[must_use]
    pub const fn is_void(self) -> bool {
        matches!(
            self,
            Self::Area
                | Self::Base
                | Self::Basefont
                | Self::Bgsound
                | Self::Br
                | Self::Col
                | Self::Embed
                | Self::Frame
                | Self::Hr
                | Self::Img
                | Self::Input
                | Self::Keygen
                | Self::Link
                | Self::Meta
                | Self::Param
                | Self::Source
                | Self::Track
                | Self::Wbr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_known_and_unknown_names() {
        assert_eq!(TagId::from_name("div"), TagId::Div);
        assert_eq!(TagId::from_name("annotation-xml"), TagId::AnnotationXml);
        assert_eq!(TagId::from_name("foreignObject"), TagId::ForeignObject);
        assert_eq!(TagId::from_name("foreignobject"), TagId::ForeignObject);
        assert_eq!(TagId::from_name("custom-element"), TagId::Unknown);
        assert_eq!(TagId::from_name("unknown"), TagId::Unknown);
        assert_eq!(TagId::from_name("DIV"), TagId::Unknown);
    }

    #[test]
    fn categories() {
        assert!(TagId::Nobr.is_formatting());
        assert!(!TagId::Span.is_formatting());
        assert!(TagId::Listing.is_special_html());
        assert!(!TagId::A.is_special_html());
        assert!(TagId::H4.is_heading());
        assert!(TagId::Wbr.is_void());
    }
}
