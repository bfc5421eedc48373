use crate::error::ParseErrorCode;
use crate::parser::core::{HTMLParser, InsertionMode};
use crate::parser::tag::TagId;
use crate::tokenizer::Token;

impl HTMLParser {
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn handle_text_mode(&mut self, token: &Token) {
        match (token, TagId::of(token)) {
            // "A character token"
            // "Insert the token's character."
            (Token::Character { data } | Token::Whitespace { data }, _) => {
                self.insert_characters(data);
            }
            (Token::NullCharacter, _) => self.insert_characters("\0"),

            // "An end-of-file token"
            // "Parse error."
            // "If the current node is a script element, then set its already
            // started to true."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            // reprocess the token."
            (Token::EndOfFile, _) => {
                self.parse_error(ParseErrorCode::EofInElementThatCanContainOnlyText);
                let _ = self.stack_of_open_elements.pop();
                self.return_to_original_insertion_mode();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is "script""
            (Token::EndTag { .. }, TagId::Script) => {
                // "Let script be the current node (which will be a script element)."
                // "Pop the current node off the stack of open elements."
                // "Switch the insertion mode to the original insertion mode."
                let script = self.stack_of_open_elements.pop();
                self.return_to_original_insertion_mode();
                // Running the script is up to the embedder; the parser pauses
                // so it can.
                if self.scripting_enabled {
                    self.pending_script = script.map(|entry| entry.node);
                }
            }

            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            (Token::EndTag { .. }, _) => {
                let _ = self.stack_of_open_elements.pop();
                self.return_to_original_insertion_mode();
            }

            // The tokenizer only produces text in the RCDATA, RAWTEXT and
            // script data states.
            (Token::Doctype { .. } | Token::StartTag { .. } | Token::Comment { .. }, _) => {}
        }
    }

    fn return_to_original_insertion_mode(&mut self) {
        let mode = self
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_to(mode);
    }
}
