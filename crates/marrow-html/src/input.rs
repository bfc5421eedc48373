//! The input stream.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! "The input stream consists of the characters pushed into it as the input
//! byte stream is decoded or from the various APIs that directly manipulate
//! the input stream."
//!
//! Chunks are normalized as they are pushed: "To normalize newlines in a
//! string, replace every U+000D CR U+000A LF code point pair with a single
//! U+000A LF code point, and then replace every remaining U+000D CR code point
//! with a U+000A LF code point." A CR at the end of one chunk and an LF at the
//! start of the next still collapse to one LF.

use std::collections::VecDeque;

use marrow_dom::SourcePosition;

use crate::error::{ParseError, ParseErrorCode};

/// Number of consumed characters kept behind the cursor for [`InputStream::retreat`].
const KEEP_BEHIND: usize = 64;

/// Consumed prefix length above which the buffer is compacted.
const EVICT_THRESHOLD: usize = 4096;

/// Result of pulling a character from the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// A code point.
    Char(char),
    /// The final chunk has been fully consumed.
    Eof,
    /// The buffer is exhausted but more input may still arrive.
    NeedMoreInput,
}

/// A pull-based code point cursor over incrementally supplied text.
#[derive(Debug)]
pub struct InputStream {
    /// Buffered characters. `buffer[0]` sits at `base`.
    buffer: Vec<char>,
    /// Index of the next character to consume.
    pos: usize,
    /// Position of `buffer[0]`.
    base: SourcePosition,
    /// Position of `buffer[pos]`.
    cursor: SourcePosition,
    /// Set once the caller signals that no more input follows.
    last_chunk: bool,
    /// The previous chunk ended in a CR that was already turned into an LF.
    pending_cr: bool,
    /// A high surrogate that ended the previous UTF-16 chunk.
    pending_high: Option<u16>,
    /// Absolute offsets of U+FFFD characters that replaced lone surrogates.
    surrogates: VecDeque<usize>,
    /// Preprocessor errors waiting to be collected.
    errors: Vec<ParseError>,
}

impl Default for InputStream {
    fn default() -> Self {
        Self::new()
    }
}

impl InputStream {
    /// Create an empty stream that expects more input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            pos: 0,
            base: SourcePosition::START,
            cursor: SourcePosition::START,
            last_chunk: false,
            pending_cr: false,
            pending_high: None,
            surrogates: VecDeque::new(),
            errors: Vec::new(),
        }
    }

    /// Create a stream holding the whole input, already marked as the last chunk.
    #[must_use]
    pub fn from_str_complete(input: &str) -> Self {
        let mut stream = Self::new();
        stream.push_str(input);
        stream.mark_last_chunk();
        stream
    }

    /// Append a chunk of text.
    pub fn push_str(&mut self, chunk: &str) {
        self.compact();
        let mut normalized = Vec::with_capacity(chunk.len());
        normalize_newlines(chunk.chars(), &mut self.pending_cr, &mut normalized);
        self.buffer.extend(normalized);
    }

    /// Append a chunk of UTF-16 code units.
    ///
    /// Lone surrogates become U+FFFD; each one is reported as a
    /// `surrogate-in-input-stream` error when the tokenizer reaches it. A high
    /// surrogate at the end of the chunk is held back until the next chunk
    /// shows whether a low surrogate completes it.
    pub fn push_utf16(&mut self, units: &[u16]) {
        self.compact();
        let mut units: Vec<u16> = self
            .pending_high
            .take()
            .into_iter()
            .chain(units.iter().copied())
            .collect();
        if matches!(units.last(), Some(0xD800..=0xDBFF)) {
            self.pending_high = units.pop();
        }
        for unit in char::decode_utf16(units) {
            match unit {
                Ok(c) => {
                    normalize_newlines(std::iter::once(c), &mut self.pending_cr, &mut self.buffer);
                }
                Err(_) => self.push_lone_surrogate(),
            }
        }
    }

    /// Signal that no more input follows. Pending characters stay readable;
    /// once they are consumed [`advance`](Self::advance) returns [`Next::Eof`].
    pub fn mark_last_chunk(&mut self) {
        if self.pending_high.take().is_some() {
            self.push_lone_surrogate();
        }
        self.last_chunk = true;
    }

    fn push_lone_surrogate(&mut self) {
        self.pending_cr = false;
        self.surrogates.push_back(self.end_offset());
        self.buffer.push('\u{FFFD}');
    }

    /// Whether [`mark_last_chunk`](Self::mark_last_chunk) was called.
    #[must_use]
    pub const fn is_last_chunk(&self) -> bool {
        self.last_chunk
    }

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    ///
    /// "Consume the next input character"
    pub fn advance(&mut self) -> Next {
        let Some(&c) = self.buffer.get(self.pos) else {
            return self.exhausted();
        };
        let at = self.cursor;
        self.pos += 1;
        self.cursor.offset += 1;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        self.check_code_point(c, at);
        Next::Char(c)
    }

    /// Look at the character `n` places after the cursor without consuming
    /// anything. `peek(0)` is the character [`advance`](Self::advance) would
    /// return next.
    #[must_use]
    pub fn peek(&self, n: usize) -> Next {
        match self.buffer.get(self.pos + n) {
            Some(&c) => Next::Char(c),
            None => self.exhausted(),
        }
    }

    /// Step the cursor back over `n` consumed characters.
    ///
    /// Only the most recent [`KEEP_BEHIND`] characters are guaranteed to be
    /// retained; the step is clamped to what is still buffered. Stepping back
    /// never re-reports preprocessor errors.
    pub fn retreat(&mut self, n: usize) {
        let n = n.min(self.pos);
        if n == 0 {
            return;
        }
        let newlines = self.buffer[self.pos - n..self.pos]
            .iter()
            .filter(|&&c| c == '\n')
            .count();
        self.pos -= n;
        self.cursor.offset -= n;
        self.cursor.line -= newlines;
        self.cursor.column = self.column_at(self.pos);
    }

    /// Insert `text` immediately before the cursor's next character, so it is
    /// the next thing consumed. Used for script-inserted markup.
    pub fn insert_at_cursor(&mut self, text: &str) {
        let mut pending_cr = false;
        let mut normalized = Vec::with_capacity(text.len());
        normalize_newlines(text.chars(), &mut pending_cr, &mut normalized);
        if normalized.is_empty() {
            return;
        }
        let inserted = normalized.len();
        let at = self.cursor.offset;
        for offset in &mut self.surrogates {
            if *offset >= at {
                *offset += inserted;
            }
        }
        let _ = self.buffer.splice(self.pos..self.pos, normalized);
    }

    /// Position of the next character to be consumed.
    #[must_use]
    pub const fn position(&self) -> SourcePosition {
        self.cursor
    }

    /// Collect the preprocessor errors reported so far.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Number of characters buffered but not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    const fn exhausted(&self) -> Next {
        if self.last_chunk {
            Next::Eof
        } else {
            Next::NeedMoreInput
        }
    }

    fn end_offset(&self) -> usize {
        self.base.offset + self.buffer.len()
    }

    /// Column of `buffer[index]`, scanning back to the previous newline.
    fn column_at(&self, index: usize) -> usize {
        match self.buffer[..index].iter().rposition(|&c| c == '\n') {
            Some(newline) => index - newline,
            None => self.base.column + index,
        }
    }

    /// Drop the consumed prefix once it grows past the threshold.
    fn compact(&mut self) {
        if self.pos < EVICT_THRESHOLD {
            return;
        }
        let evict = self.pos - KEEP_BEHIND;
        for &c in &self.buffer[..evict] {
            self.base.offset += 1;
            if c == '\n' {
                self.base.line += 1;
                self.base.column = 1;
            } else {
                self.base.column += 1;
            }
        }
        let _ = self.buffer.drain(..evict);
        self.pos -= evict;
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of surrogates are surrogate-in-input-stream parse
    /// errors. Any occurrences of noncharacters are
    /// noncharacter-in-input-stream parse errors and any occurrences of
    /// controls other than ASCII whitespace and U+0000 NULL characters are
    /// control-character-in-input-stream parse errors."
    fn check_code_point(&mut self, c: char, at: SourcePosition) {
        if c == '\u{FFFD}' && self.surrogates.front() == Some(&at.offset) {
            let _ = self.surrogates.pop_front();
            self.errors
                .push(ParseError::at(ParseErrorCode::SurrogateInInputStream, at));
        } else if is_noncharacter(c) {
            self.errors
                .push(ParseError::at(ParseErrorCode::NoncharacterInInputStream, at));
        } else if is_reportable_control(c) {
            self.errors.push(ParseError::at(
                ParseErrorCode::ControlCharacterInInputStream,
                at,
            ));
        }
    }
}

fn normalize_newlines(
    chars: impl Iterator<Item = char>,
    pending_cr: &mut bool,
    out: &mut Vec<char>,
) {
    for c in chars {
        match c {
            '\r' => {
                out.push('\n');
                *pending_cr = true;
            }
            '\n' if *pending_cr => {
                *pending_cr = false;
            }
            _ => {
                *pending_cr = false;
                out.push(c);
            }
        }
    }
}

/// [§ 4.5 Code points](https://infra.spec.whatwg.org/#noncharacter)
///
/// "A noncharacter is a code point that is in the range U+FDD0 to U+FDEF,
/// inclusive, or U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
#[must_use]
pub const fn is_noncharacter(c: char) -> bool {
    let cp = c as u32;
    matches!(cp, 0xFDD0..=0xFDEF) || (cp & 0xFFFE) == 0xFFFE
}

/// [§ 4.5 Code points](https://infra.spec.whatwg.org/#control)
///
/// "A control is a C0 control or a code point in the range U+007F DELETE to
/// U+009F APPLICATION PROGRAM COMMAND, inclusive."
#[must_use]
pub const fn is_control(cp: u32) -> bool {
    matches!(cp, 0x00..=0x1F | 0x7F..=0x9F)
}

const fn is_reportable_control(c: char) -> bool {
    is_control(c as u32) && !matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ' | '\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(stream: &mut InputStream) -> String {
        let mut out = String::new();
        while let Next::Char(c) = stream.advance() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_crlf_collapses_across_chunks() {
        let mut stream = InputStream::new();
        stream.push_str("a\r");
        stream.push_str("\nb\rc");
        stream.mark_last_chunk();
        assert_eq!(drain(&mut stream), "a\nb\nc");
    }

    #[test]
    fn test_need_more_input_until_last_chunk() {
        let mut stream = InputStream::new();
        stream.push_str("x");
        assert_eq!(stream.advance(), Next::Char('x'));
        assert_eq!(stream.advance(), Next::NeedMoreInput);
        assert_eq!(stream.peek(0), Next::NeedMoreInput);
        stream.mark_last_chunk();
        assert_eq!(stream.advance(), Next::Eof);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let mut stream = InputStream::from_str_complete("ab\ncd");
        for _ in 0..4 {
            let _ = stream.advance();
        }
        let position = stream.position();
        assert_eq!(position.offset, 4);
        assert_eq!(position.line, 2);
        assert_eq!(position.column, 2);
    }

    #[test]
    fn test_retreat_restores_position() {
        let mut stream = InputStream::from_str_complete("ab\ncd");
        for _ in 0..4 {
            let _ = stream.advance();
        }
        stream.retreat(3);
        assert_eq!(stream.position(), SourcePosition {
            offset: 1,
            line: 1,
            column: 2,
        });
        assert_eq!(stream.advance(), Next::Char('b'));
    }

    #[test]
    fn test_insert_at_cursor_is_consumed_next() {
        let mut stream = InputStream::from_str_complete("ad");
        assert_eq!(stream.advance(), Next::Char('a'));
        stream.insert_at_cursor("bc");
        assert_eq!(drain(&mut stream), "bcd");
    }

    #[test]
    fn test_lone_surrogate_reported_once() {
        let mut stream = InputStream::new();
        stream.push_utf16(&[0x61, 0xD800, 0x62]);
        stream.mark_last_chunk();
        assert_eq!(drain(&mut stream), "a\u{FFFD}b");
        let errors = stream.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ParseErrorCode::SurrogateInInputStream);
        assert_eq!(errors[0].offset, 1);
    }

    #[test]
    fn test_surrogate_pair_split_across_chunks() {
        let mut stream = InputStream::new();
        stream.push_utf16(&[0x61, 0xD83D]);
        assert_eq!(stream.advance(), Next::Char('a'));
        assert_eq!(stream.advance(), Next::NeedMoreInput);
        stream.push_utf16(&[0xDE00, 0x62]);
        stream.mark_last_chunk();
        assert_eq!(drain(&mut stream), "\u{1F600}b");
        assert!(stream.take_errors().is_empty());
    }

    #[test]
    fn test_trailing_high_surrogate_flushed_at_end() {
        let mut stream = InputStream::new();
        stream.push_utf16(&[0x0D, 0x0A, 0x61, 0xD800]);
        stream.mark_last_chunk();
        assert_eq!(drain(&mut stream), "\na\u{FFFD}");
        let errors = stream.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ParseErrorCode::SurrogateInInputStream);
        assert_eq!(errors[0].offset, 2);
    }

    #[test]
    fn test_noncharacter_and_control_reported() {
        let mut stream = InputStream::from_str_complete("\u{FDD0}\u{1}\t");
        let _ = drain(&mut stream);
        let codes: Vec<ParseErrorCode> = stream.take_errors().iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![
            ParseErrorCode::NoncharacterInInputStream,
            ParseErrorCode::ControlCharacterInInputStream,
        ]);
    }

    #[test]
    fn test_compaction_keeps_positions() {
        let mut stream = InputStream::new();
        let long = "x".repeat(EVICT_THRESHOLD + 10);
        stream.push_str(&long);
        let _ = drain(&mut stream);
        stream.push_str("\ny");
        stream.mark_last_chunk();
        assert!(stream.buffer.len() < EVICT_THRESHOLD);
        assert_eq!(stream.advance(), Next::Char('\n'));
        assert_eq!(stream.position().line, 2);
        assert_eq!(stream.position().offset, EVICT_THRESHOLD + 11);
        stream.retreat(1);
        assert_eq!(stream.position().column, EVICT_THRESHOLD + 11);
    }
}
