use core::fmt;

use marrow_dom::SourcePosition;

/// An attribute on a start or end tag token.
///
/// Per [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
/// "a list of attributes, each of which has a name and a value"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// "each of which has a name"
    pub name: String,
    /// "and a value"
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub const fn new(name: String, value: String) -> Self {
        Self { name, value }
    }
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
///
/// Character tokens are coalesced into runs and split three ways so the tree
/// builder can handle a whole run at once: U+0000 on its own, runs of ASCII
/// whitespace, and runs of everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string), and the force-quirks
    /// flag must be set to off (its other state is on)."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value. When a start
    /// or end tag token is created, its self-closing flag must be unset (its
    /// other state is that it be set), and its attributes list must be empty."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes and the self-closing flag are parse errors on
    /// an end tag but are still tokenized.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// A run of character tokens, none of them ASCII whitespace or U+0000.
    Character {
        /// The run's characters.
        data: String,
    },

    /// A run of ASCII whitespace character tokens.
    Whitespace {
        /// The run's characters.
        data: String,
    },

    /// A single U+0000 NULL character token from the data or CDATA section state.
    NullCharacter,

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing (which is a distinct state from the
    /// empty string), and the force-quirks flag must be set to off."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new end tag token with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new comment token with the given data.
    #[must_use]
    pub const fn new_comment(data: String) -> Self {
        Self::Comment { data }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name of a start or end tag.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Value of the attribute `name` on a tag token.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => attributes
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }

    // Mutation helpers used by the tokenizer states. Calls on the wrong
    // variant are ignored.

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's name."
    pub(crate) fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype { name, .. } = self {
            name.get_or_insert_with(String::new).push(c);
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    pub(crate) fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    pub(crate) fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } | Self::EndTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// Whether the tag already carries an attribute called `name`.
    pub(crate) fn has_attribute(&self, attr_name: &str) -> bool {
        self.attribute(attr_name).is_some()
    }

    /// Attach a finished attribute to a tag token.
    pub(crate) fn push_attribute(&mut self, attribute: Attribute) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            attributes.push(attribute);
        }
    }

    /// Append to the data of a comment token.
    pub(crate) fn append_to_comment(&mut self, c: char) {
        if let Self::Comment { data } = self {
            data.push(c);
        }
    }

    /// Append a string to the data of a comment token.
    pub(crate) fn append_str_to_comment(&mut self, s: &str) {
        if let Self::Comment { data } = self {
            data.push_str(s);
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub(crate) fn set_force_quirks(&mut self) {
        if let Self::Doctype { force_quirks, .. } = self {
            *force_quirks = true;
        }
    }

    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)."
    pub(crate) fn set_public_identifier_empty(&mut self) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            *public_identifier = Some(String::new());
        }
    }

    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)."
    pub(crate) fn set_system_identifier_empty(&mut self) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            *system_identifier = Some(String::new());
        }
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// public identifier."
    pub(crate) fn append_to_public_identifier(&mut self, c: char) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            public_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Append the current input character to the current DOCTYPE token's
    /// system identifier."
    pub(crate) fn append_to_system_identifier(&mut self, c: char) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            system_identifier.get_or_insert_with(String::new).push(c);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE {}", name.as_deref().unwrap_or("<missing>"))?;
                if let Some(public) = public_identifier {
                    write!(f, " PUBLIC \"{public}\"")?;
                }
                if let Some(system) = system_identifier {
                    write!(f, " SYSTEM \"{system}\"")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "StartTag <{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "EndTag </{name}>"),
            Self::Comment { data } => write!(f, "Comment <!--{data}-->"),
            Self::Character { data } => write!(f, "Character {data:?}"),
            Self::Whitespace { data } => write!(f, "Whitespace {data:?}"),
            Self::NullCharacter => write!(f, "NullCharacter"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

/// Source range a token was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Position of the token's first character.
    pub start: SourcePosition,
    /// Position just past the token's last character.
    pub end: SourcePosition,
}

/// A token together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Its source range.
    pub span: Span,
}
