use std::collections::HashSet;
use std::fmt;

use log::{debug, trace};
use marrow_dom::{DomTree, Namespace, NodeId};
use strum_macros::Display;

use super::formatting::ActiveFormattingElements;
use super::open_elements::{OpenElement, OpenElements};
use super::tag::TagId;
use crate::error::{ErrorSink, ParseError, ParseErrorCode, ParserError};
use crate::tokenizer::{
    Attribute, HTMLTokenizer, Span, SpannedToken, Token, TokenizerOptions, TokenizerState,
};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// Parser configuration.
pub struct ParserOptions {
    /// [§ 13.2.1](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    /// "The scripting flag is set to 'enabled' if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and 'disabled' otherwise."
    ///
    /// Makes `<noscript>` raw text and pauses the parser after each `</script>`.
    pub scripting_enabled: bool,
    /// Record a [`SourceLocation`](marrow_dom::SourceLocation) on every node.
    pub source_location_tracking: bool,
    /// Receives each parse error as it is reported.
    pub error_sink: Option<Box<dyn ErrorSink + Send>>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            source_location_tracking: false,
            error_sink: None,
        }
    }
}

impl ParserOptions {
    /// Set the scripting flag.
    #[must_use]
    pub const fn scripting(mut self, enabled: bool) -> Self {
        self.scripting_enabled = enabled;
        self
    }

    /// Turn source location tracking on or off.
    #[must_use]
    pub const fn source_locations(mut self, enabled: bool) -> Self {
        self.source_location_tracking = enabled;
        self
    }

    /// Forward parse errors to `sink`.
    #[must_use]
    pub fn error_sink(mut self, sink: impl ErrorSink + Send + 'static) -> Self {
        self.error_sink = Some(Box::new(sink));
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("scripting_enabled", &self.scripting_enabled)
            .field("source_location_tracking", &self.source_location_tracking)
            .field("error_sink", &self.error_sink.is_some())
            .finish()
    }
}

/// Where a parse session stands after a call into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// Every buffered character was consumed; write more or call `end`.
    NeedMoreInput,
    /// Parsing is suspended until [`HTMLParser::resume`]. `script` is the
    /// script element whose end tag caused the pause, if any.
    Paused {
        /// The script element that was just closed.
        script: Option<NodeId>,
    },
    /// The end-of-file token has been processed.
    Finished,
    /// [`HTMLParser::stop`] was called.
    Stopped,
}

/// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// The context element a fragment is parsed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    /// Local name of the context element.
    pub tag_name: String,
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Attributes of the context element. Only `encoding` on MathML
    /// `annotation-xml` affects parsing.
    pub attributes: Vec<Attribute>,
}

impl FragmentContext {
    /// An HTML context element.
    #[must_use]
    pub fn html(tag_name: impl Into<String>) -> Self {
        Self::new(tag_name, Namespace::Html)
    }

    /// A context element in any namespace.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.into(),
            namespace,
            attributes: Vec::new(),
        }
    }

    /// Add an attribute to the context element.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .push(Attribute::new(name.into(), value.into()));
        self
    }
}

/// The tree and every parse error from a completed parse.
#[derive(Debug)]
pub struct ParseOutput {
    /// The document, or for fragments a tree rooted at a document fragment.
    pub tree: DomTree,
    /// Parse errors in the order they were reported.
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Running,
    Paused(Option<NodeId>),
    Finished,
    Stopped,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// "The input to the tree construction stage is a sequence of tokens from the
/// tokenization stage. The tree construction stage is associated with a DOM
/// Document object when a parser is created."
///
/// The parser owns its tokenizer and pulls tokens from it, so input can be
/// fed in chunks with [`write`](Self::write) and finished with
/// [`end`](Self::end).
pub struct HTMLParser {
    pub(crate) tokenizer: HTMLTokenizer,

    /// The DOM being built.
    pub(crate) tree: DomTree,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(crate) insertion_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    /// "the original insertion mode", used by "text" and "in table text".
    pub(crate) original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(crate) template_insertion_modes: Vec<InsertionMode>,

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    pub(crate) stack_of_open_elements: OpenElements,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    pub(crate) active_formatting_elements: ActiveFormattingElements,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(crate) head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.4](https://html.spec.whatwg.org/multipage/parsing.html#form-element-pointer)
    pub(crate) form_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    /// "The frameset-ok flag is set to 'ok' when the parser is created."
    pub(crate) frameset_ok: bool,

    pub(crate) scripting_enabled: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(crate) foster_parenting: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    /// "the pending table character tokens list"
    pub(crate) pending_table_character_tokens: Vec<Token>,

    /// A newline directly after `<pre>`, `<listing>` or `<textarea>` is dropped.
    pub(crate) skip_next_newline: bool,

    /// Set when a start tag's self-closing flag was acknowledged.
    pub(crate) self_closing_acknowledged: bool,

    /// The fragment parsing context element (never attached to the tree).
    pub(crate) context_element: Option<OpenElement>,

    /// The script element whose end tag should pause the parser.
    pub(crate) pending_script: Option<NodeId>,

    /// Span of the token being processed.
    pub(crate) current_span: Span,

    /// The element most recently created for the token being processed.
    pub(crate) last_created_element: Option<NodeId>,

    /// Elements whose end position is already recorded.
    closed_elements: HashSet<NodeId>,

    track_locations: bool,
    errors: Vec<ParseError>,
    error_sink: Option<Box<dyn ErrorSink + Send>>,
    input_ended: bool,
    state: SessionState,
}

impl HTMLParser {
    /// Create a parser for a full document.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self::with_tree(options, DomTree::new())
    }

    fn with_tree(options: ParserOptions, tree: DomTree) -> Self {
        Self {
            tokenizer: HTMLTokenizer::with_options(TokenizerOptions::default()),
            tree,
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            template_insertion_modes: Vec::new(),
            stack_of_open_elements: OpenElements::new(),
            active_formatting_elements: ActiveFormattingElements::new(),
            head_element_pointer: None,
            form_element_pointer: None,
            frameset_ok: true,
            scripting_enabled: options.scripting_enabled,
            foster_parenting: false,
            pending_table_character_tokens: Vec::new(),
            skip_next_newline: false,
            self_closing_acknowledged: false,
            context_element: None,
            pending_script: None,
            current_span: Span::default(),
            last_created_element: None,
            closed_elements: HashSet::new(),
            track_locations: options.source_location_tracking,
            errors: Vec::new(),
            error_sink: options.error_sink,
            input_ended: false,
            state: SessionState::Running,
        }
    }

    /// [§ 13.4 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Create a parser for the contents of `context`. The finished tree is
    /// rooted at a document fragment.
    #[must_use]
    pub fn for_fragment(context: FragmentContext, options: ParserOptions) -> Self {
        let mut parser = Self::with_tree(options, DomTree::new_fragment());

        let context_node = parser.create_element(
            &context.tag_name,
            &context.attributes,
            context.namespace,
        );
        let context_tag = TagId::from_name(&context.tag_name);

        // "4. Set the state of the HTML parser's tokenization stage as follows,
        // switching on the context element:"
        if context.namespace == Namespace::Html {
            let state = match context_tag {
                TagId::Title | TagId::Textarea => Some(TokenizerState::RCDATA),
                TagId::Style | TagId::Xmp | TagId::Iframe | TagId::Noembed | TagId::Noframes => {
                    Some(TokenizerState::RAWTEXT)
                }
                TagId::Script => Some(TokenizerState::ScriptData),
                TagId::Noscript if parser.scripting_enabled => Some(TokenizerState::RAWTEXT),
                TagId::Plaintext => Some(TokenizerState::PLAINTEXT),
                _ => None,
            };
            if let Some(state) = state {
                parser.tokenizer.set_state(state);
            }
        }

        // "5. Let root be the result of creating an element given document,
        // "html", the HTML namespace."
        // "6. Append root to document."
        // "7. Set up the parser's stack of open elements so that it contains
        // just the single element root."
        let root = parser.create_element("html", &[], Namespace::Html);
        let document = parser.tree.root();
        parser.tree.append_child(document, root);
        parser.push_open_element(root);

        // "8. If context is a template element, then push "in template" onto
        // the stack of template insertion modes so that it is the new current
        // template insertion mode."
        if context.namespace == Namespace::Html && context_tag == TagId::Template {
            parser
                .template_insertion_modes
                .push(InsertionMode::InTemplate);
        }

        parser.context_element = Some(OpenElement {
            node: context_node,
            tag: context_tag,
            namespace: context.namespace,
        });

        // "10. Reset the parser's insertion mode appropriately."
        parser.reset_insertion_mode_appropriately();

        // "11. Set the parser's form element pointer to the nearest node to
        // context that is a form element (going straight up the ancestor
        // chain, and including the element itself, if it is a form element),
        // if any."
        if context.namespace == Namespace::Html && context_tag == TagId::Form {
            parser.form_element_pointer = Some(context_node);
        }

        parser
    }

    // =========================================================================
    // Driving
    // =========================================================================

    /// Feed a chunk of input and parse as far as it allows.
    ///
    /// # Errors
    ///
    /// [`ParserError::WriteAfterEnd`] after [`end`](Self::end), and
    /// [`ParserError::Stopped`] after [`stop`](Self::stop).
    pub fn write(&mut self, chunk: &str) -> Result<ParseStatus, ParserError> {
        self.check_writable()?;
        self.tokenizer.push_str(chunk);
        Ok(self.run())
    }

    /// Feed a chunk of UTF-16 code units. A surrogate pair split across two
    /// chunks is joined.
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn write_utf16(&mut self, chunk: &[u16]) -> Result<ParseStatus, ParserError> {
        self.check_writable()?;
        self.tokenizer.push_utf16(chunk);
        Ok(self.run())
    }

    /// Signal that the last chunk has been written and finish parsing (unless
    /// the parser is paused, in which case parsing finishes on resume).
    ///
    /// # Errors
    ///
    /// As for [`write`](Self::write).
    pub fn end(&mut self) -> Result<ParseStatus, ParserError> {
        self.check_writable()?;
        self.input_ended = true;
        self.tokenizer.end();
        Ok(self.run())
    }

    /// Suspend parsing. Written input is buffered until [`resume`](Self::resume).
    ///
    /// # Errors
    ///
    /// [`ParserError::Stopped`] if the parser was stopped.
    pub const fn pause(&mut self) -> Result<ParseStatus, ParserError> {
        match self.state {
            SessionState::Stopped => Err(ParserError::Stopped),
            SessionState::Finished => Ok(ParseStatus::Finished),
            SessionState::Paused(script) => Ok(ParseStatus::Paused { script }),
            SessionState::Running => {
                self.state = SessionState::Paused(None);
                Ok(ParseStatus::Paused { script: None })
            }
        }
    }

    /// Continue after a pause.
    ///
    /// # Errors
    ///
    /// [`ParserError::NotPaused`] if the parser is not paused, and
    /// [`ParserError::Stopped`] if it was stopped.
    pub fn resume(&mut self) -> Result<ParseStatus, ParserError> {
        match self.state {
            SessionState::Paused(_) => {
                self.state = SessionState::Running;
                Ok(self.run())
            }
            SessionState::Stopped => Err(ParserError::Stopped),
            SessionState::Running | SessionState::Finished => Err(ParserError::NotPaused),
        }
    }

    /// Insert text at the current input position, as `document.write` from a
    /// script that just ran would. It is tokenized before any remaining input.
    pub fn insert_at_cursor(&mut self, text: &str) {
        if matches!(self.state, SessionState::Running | SessionState::Paused(_)) {
            self.tokenizer.insert_at_cursor(text);
        }
    }

    /// [§ 13.2.7.1 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    ///
    /// Abort the parse: no further input is read and the tree is left as it is.
    pub fn stop(&mut self) {
        if matches!(self.state, SessionState::Finished | SessionState::Stopped) {
            return;
        }
        debug!(target: "marrow::parser", "parser stopped in {}", self.insertion_mode);
        // Text already consumed is kept.
        if matches!(self.state, SessionState::Running)
            && let Some(text) = self.tokenizer.take_pending_text()
        {
            self.process_spanned_token(text);
        }
        // "pop all the nodes off the stack of open elements"
        self.stack_of_open_elements.clear();
        self.close_removed_elements(&Token::EndOfFile);
        self.state = SessionState::Stopped;
    }

    /// Parse errors reported so far, in order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The tree built so far.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// The current insertion mode.
    #[must_use]
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.insertion_mode
    }

    /// Finish with the parser and take the tree.
    ///
    /// For a fragment parser the children of the internal `html` root are
    /// moved under the document fragment root.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.into_output().tree
    }

    /// Finish with the parser and take the tree and the errors.
    #[must_use]
    pub fn into_output(mut self) -> ParseOutput {
        if self.context_element.is_some() {
            let root = self.tree.root();
            if let Some(html) = self.tree.first_child(root) {
                self.tree.move_children(html, root);
                self.tree.detach(html);
            }
        }
        ParseOutput {
            tree: self.tree,
            errors: self.errors,
        }
    }

    /// Parse `input` as the whole remaining document, running straight
    /// through script pauses.
    pub(crate) fn parse_to_end(&mut self, input: &str) {
        if self.check_writable().is_err() {
            return;
        }
        self.tokenizer.push_str(input);
        self.input_ended = true;
        self.tokenizer.end();
        while let ParseStatus::Paused { .. } = self.run() {
            self.state = SessionState::Running;
        }
    }

    const fn check_writable(&self) -> Result<(), ParserError> {
        if matches!(self.state, SessionState::Stopped) {
            return Err(ParserError::Stopped);
        }
        if self.input_ended {
            return Err(ParserError::WriteAfterEnd);
        }
        Ok(())
    }

    fn run(&mut self) -> ParseStatus {
        loop {
            match self.state {
                SessionState::Stopped => return ParseStatus::Stopped,
                SessionState::Finished => return ParseStatus::Finished,
                SessionState::Paused(script) => return ParseStatus::Paused { script },
                SessionState::Running => {}
            }

            // [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
            // "If there is an adjusted current node and it is not an element
            // in the HTML namespace, then switch to the CDATA section state."
            let foreign = self
                .adjusted_current_node()
                .is_some_and(|node| node.namespace != Namespace::Html);
            self.tokenizer.set_allow_cdata(foreign);

            let Some(spanned) = self.tokenizer.next_token() else {
                return ParseStatus::NeedMoreInput;
            };
            let at_eof = spanned.token.is_eof();
            self.process_spanned_token(spanned);

            if at_eof {
                self.finish();
            } else if let Some(script) = self.pending_script.take() {
                trace!(target: "marrow::parser", "pausing after script {script:?}");
                self.state = SessionState::Paused(Some(script));
            }
        }
    }

    fn process_spanned_token(&mut self, spanned: SpannedToken) {
        let SpannedToken { mut token, span } = spanned;

        let limit = if token.is_eof() {
            usize::MAX
        } else {
            span.end.offset
        };
        for error in self.tokenizer.take_errors_before(limit) {
            self.report(error);
        }
        self.current_span = span;

        // [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
        // "If the next token is a U+000A LINE FEED (LF) character token, then
        // ignore that token and move on to the next one. (Newlines at the
        // start of pre blocks are ignored as an authoring convenience.)"
        if std::mem::take(&mut self.skip_next_newline)
            && let Token::Whitespace { data } = &mut token
            && data.starts_with('\n')
        {
            let _ = data.remove(0);
            if data.is_empty() {
                return;
            }
            self.current_span.start.offset += 1;
            self.current_span.start.line += 1;
            self.current_span.start.column = 1;
        }

        trace!(target: "marrow::parser", "{} <- {token}", self.insertion_mode);
        self.self_closing_acknowledged = false;
        self.last_created_element = None;
        self.process_token(&token);

        // [§ 13.2.5.8](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
        // "When a start tag token is emitted with its self-closing flag set,
        // if the flag is not acknowledged when the token is processed by the
        // tree construction stage, that is a
        // non-void-html-element-start-tag-with-trailing-solidus parse error."
        if let Token::StartTag {
            self_closing: true, ..
        } = token
            && !self.self_closing_acknowledged
        {
            self.parse_error(ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }

        self.close_removed_elements(&token);
    }

    /// [§ 13.2.7.1 Stop parsing](https://html.spec.whatwg.org/multipage/parsing.html#stop-parsing)
    fn finish(&mut self) {
        // "3. Pop all the nodes off the stack of open elements."
        self.stack_of_open_elements.clear();
        self.close_removed_elements(&Token::EndOfFile);
        for error in self.tokenizer.take_errors() {
            self.report(error);
        }
        self.state = SessionState::Finished;
        debug!(
            target: "marrow::parser",
            "finished with {} nodes and {} parse errors",
            self.tree.len(),
            self.errors.len()
        );
    }

    /// Record the end position of every element that left the stack while
    /// `token` was processed.
    fn close_removed_elements(&mut self, token: &Token) {
        let removed = self.stack_of_open_elements.take_removed();
        if !self.track_locations {
            return;
        }
        let span = self.current_span;
        for node in removed {
            // An element only closes once; `head` is pushed back temporarily
            // after it was closed.
            if !self.closed_elements.insert(node) {
                continue;
            }
            // Elements implied on the way to the token's own element end
            // where the token starts.
            let closed_by_token = match token {
                Token::EndTag { name, .. } => self
                    .tree
                    .as_element(node)
                    .is_some_and(|element| element.tag_name.eq_ignore_ascii_case(name)),
                Token::StartTag { .. } => self.last_created_element == Some(node),
                _ => false,
            };
            let end = if closed_by_token { span.end } else { span.start };
            self.tree.set_end(node, end);
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "As each token is emitted from the tokenizer, the user agent must
    /// follow the appropriate steps from the following list, known as the
    /// tree construction dispatcher"
    pub(crate) fn process_token(&mut self, token: &Token) {
        if self.uses_html_content_rules(token) {
            self.process_token_in_mode(self.insertion_mode, token);
        } else {
            self.process_token_in_foreign_content(token);
        }
    }

    /// Process `token` again after the insertion mode changed.
    pub(crate) fn reprocess_token(&mut self, token: &Token) {
        self.process_token(token);
    }

    /// The dispatcher's list of conditions under which a token is processed
    /// according to the current insertion mode rather than as foreign content.
    fn uses_html_content_rules(&self, token: &Token) -> bool {
        // "If the stack of open elements is empty"
        let Some(adjusted) = self.adjusted_current_node() else {
            return true;
        };
        // "If the adjusted current node is an element in the HTML namespace"
        if adjusted.namespace == Namespace::Html {
            return true;
        }
        let is_character = matches!(
            token,
            Token::Character { .. } | Token::Whitespace { .. } | Token::NullCharacter
        );
        let start_tag_name = match token {
            Token::StartTag { name, .. } => Some(name.as_str()),
            _ => None,
        };

        // "If the adjusted current node is a MathML text integration point and
        // the token is a start tag whose tag name is neither "mglyph" nor
        // "malignmark""
        // "If the adjusted current node is a MathML text integration point and
        // the token is a character token"
        if adjusted.is_mathml_text_integration_point()
            && (is_character
                || start_tag_name.is_some_and(|name| name != "mglyph" && name != "malignmark"))
        {
            return true;
        }

        // "If the adjusted current node is a MathML annotation-xml element and
        // the token is a start tag whose tag name is "svg""
        if adjusted.namespace == Namespace::MathMl
            && adjusted.tag == TagId::AnnotationXml
            && start_tag_name == Some("svg")
        {
            return true;
        }

        // "If the adjusted current node is an HTML integration point and the
        // token is a start tag"
        // "If the adjusted current node is an HTML integration point and the
        // token is a character token"
        if self.is_html_integration_point(&adjusted) && (is_character || start_tag_name.is_some())
        {
            return true;
        }

        // "If the token is an end-of-file token"
        token.is_eof()
    }

    /// Apply the rules of `mode` to `token` without switching to it.
    pub(crate) fn process_token_in_mode(&mut self, mode: InsertionMode, token: &Token) {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    /// Switch insertion mode.
    pub(crate) fn switch_to(&mut self, mode: InsertionMode) {
        trace!(target: "marrow::parser", "mode {} -> {mode}", self.insertion_mode);
        self.insertion_mode = mode;
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Report a tree construction error at the start of the current token.
    pub(crate) fn parse_error(&mut self, code: ParseErrorCode) {
        debug!(
            target: "marrow::parser",
            "parse error {code} at {} in {}",
            self.current_span.start,
            self.insertion_mode
        );
        self.report(ParseError::at(code, self.current_span.start));
    }

    fn report(&mut self, error: ParseError) {
        if let Some(sink) = self.error_sink.as_mut() {
            sink.report(&error);
        }
        self.errors.push(error);
    }

    /// Whether nodes get source locations.
    pub(crate) const fn tracks_locations(&self) -> bool {
        self.track_locations
    }
}

impl fmt::Debug for HTMLParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HTMLParser")
            .field("insertion_mode", &self.insertion_mode)
            .field("open_elements", &self.stack_of_open_elements.len())
            .field("state", &self.state)
            .field("errors", &self.errors.len())
            .finish_non_exhaustive()
    }
}
