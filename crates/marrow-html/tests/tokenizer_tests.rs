//! Integration tests for the HTML tokenizer.

use marrow_html::tokenizer::{TokenizerOptions, TokenizerState};
use marrow_html::{HTMLTokenizer, ParseError, ParseErrorCode, Token, tokenize};

/// Helper to tokenize a string and return the tokens with the parse errors
fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<ParseError>) {
    let mut tokenizer = HTMLTokenizer::new(input.to_string());
    tokenizer.run();
    let errors = tokenizer.take_errors();
    (tokenizer.into_tokens(), errors)
}

/// Helper to get just the error codes
fn error_codes(input: &str) -> Vec<ParseErrorCode> {
    tokenize_with_errors(input)
        .1
        .into_iter()
        .map(|error| error.code)
        .collect()
}

/// Helper to concatenate every character token
fn text_of(tokens: &[Token]) -> String {
    let mut text = String::new();
    for token in tokens {
        match token {
            Token::Character { data } | Token::Whitespace { data } => text.push_str(data),
            Token::NullCharacter => text.push('\0'),
            _ => {}
        }
    }
    text
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 2); // one run + EOF
    assert!(matches!(&tokens[0], Token::Character { data } if data == "Hello"));
    assert!(matches!(tokens[1], Token::EndOfFile));
}

#[test]
fn test_whitespace_runs_are_split_out() {
    let tokens = tokenize("Hello \n world");
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::Character { data } if data == "Hello"));
    assert!(matches!(&tokens[1], Token::Whitespace { data } if data == " \n "));
    assert!(matches!(&tokens[2], Token::Character { data } if data == "world"));
    assert!(tokens[3].is_eof());
}

#[test]
fn test_empty_input() {
    let tokens = tokenize("");
    assert_eq!(tokens, vec![Token::EndOfFile]);
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert!(name.is_none());
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
    assert_eq!(errors[0].code, ParseErrorCode::MissingDoctypeName);
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DiV></DIV>");
    assert_eq!(tokens[0].tag_name(), Some("div"));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_attributes() {
    let tokens = tokenize(r#"<a href="/x" class='big' hidden data-n=1>"#);
    let token = &tokens[0];
    assert_eq!(token.attribute("href"), Some("/x"));
    assert_eq!(token.attribute("class"), Some("big"));
    assert_eq!(token.attribute("hidden"), Some(""));
    assert_eq!(token.attribute("data-n"), Some("1"));
    assert_eq!(token.attribute("missing"), None);
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, errors) = tokenize_with_errors(r#"<p id="a" id="b">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "a");
        }
        _ => panic!("Expected StartTag token"),
    }
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ParseErrorCode::DuplicateAttribute);
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    assert_eq!(
        error_codes(r#"</p class="x">"#),
        vec![ParseErrorCode::EndTagWithAttributes]
    );
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " hello "));
}

#[test]
fn test_unterminated_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-- unterminated");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == " unterminated"));
    assert!(tokens[1].is_eof());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, ParseErrorCode::EofInComment);
}

#[test]
fn test_abrupt_empty_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-->");
    assert!(matches!(&tokens[0], Token::Comment { data } if data.is_empty()));
    assert_eq!(errors[0].code, ParseErrorCode::AbruptClosingOfEmptyComment);
}

#[test]
fn test_bogus_comment() {
    let (tokens, errors) = tokenize_with_errors("<?xml version?>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "?xml version?"));
    assert_eq!(
        errors[0].code,
        ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName
    );
}

#[test]
fn test_lone_less_than_is_text() {
    let (tokens, errors) = tokenize_with_errors("a < b");
    assert_eq!(text_of(&tokens), "a < b");
    assert_eq!(errors[0].code, ParseErrorCode::InvalidFirstCharacterOfTagName);
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let (tokens, errors) = tokenize_with_errors("text<div class=");
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::Character { data } if data == "text"));
    assert_eq!(errors[0].code, ParseErrorCode::EofInTag);
}

#[test]
fn test_null_in_data_is_its_own_token() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    assert_eq!(tokens.len(), 4);
    assert!(matches!(tokens[1], Token::NullCharacter));
    assert_eq!(errors[0].code, ParseErrorCode::UnexpectedNullCharacter);
}

// =============================================================================
// Character references
// =============================================================================

#[test]
fn test_character_references_in_text() {
    let (tokens, errors) = tokenize_with_errors("&amp; &#38; &#x26; &amp");
    assert_eq!(text_of(&tokens), "& & & &");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].code,
        ParseErrorCode::MissingSemicolonAfterCharacterReference
    );
}

#[test]
fn test_longest_prefix_match_without_semicolon() {
    let (tokens, errors) = tokenize_with_errors("&notit;");
    assert_eq!(text_of(&tokens), "\u{AC}it;");
    assert_eq!(
        errors[0].code,
        ParseErrorCode::MissingSemicolonAfterCharacterReference
    );
}

#[test]
fn test_unknown_named_reference_is_left_alone() {
    let (tokens, errors) = tokenize_with_errors("&bogus;");
    assert_eq!(text_of(&tokens), "&bogus;");
    assert_eq!(errors[0].code, ParseErrorCode::UnknownNamedCharacterReference);
}

#[test]
fn test_bare_ampersand_is_text() {
    let (tokens, errors) = tokenize_with_errors("fish & chips");
    assert_eq!(text_of(&tokens), "fish & chips");
    assert!(errors.is_empty());
}

#[test]
fn test_numeric_reference_replacements() {
    // C1 controls map through the windows-1252 table.
    let (tokens, errors) = tokenize_with_errors("&#x80;");
    assert_eq!(text_of(&tokens), "\u{20AC}");
    assert_eq!(errors[0].code, ParseErrorCode::ControlCharacterReference);

    let (tokens, errors) = tokenize_with_errors("&#0;");
    assert_eq!(text_of(&tokens), "\u{FFFD}");
    assert_eq!(errors[0].code, ParseErrorCode::NullCharacterReference);

    let (tokens, errors) = tokenize_with_errors("&#x110000;");
    assert_eq!(text_of(&tokens), "\u{FFFD}");
    assert_eq!(
        errors[0].code,
        ParseErrorCode::CharacterReferenceOutsideUnicodeRange
    );

    let (tokens, errors) = tokenize_with_errors("&#xD800;");
    assert_eq!(text_of(&tokens), "\u{FFFD}");
    assert_eq!(errors[0].code, ParseErrorCode::SurrogateCharacterReference);
}

#[test]
fn test_numeric_reference_without_digits() {
    let (tokens, errors) = tokenize_with_errors("&#;");
    assert_eq!(text_of(&tokens), "&#;");
    assert_eq!(
        errors[0].code,
        ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference
    );
}

#[test]
fn test_legacy_reference_in_attribute_is_not_decoded() {
    let (tokens, errors) = tokenize_with_errors(r#"<a href="?x=1&copy=2&amp;y">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?x=1&copy=2&y"));
    assert!(errors.is_empty());
}

// =============================================================================
// Text states
// =============================================================================

#[test]
fn test_script_content_is_raw() {
    let tokens = tokenize("<script>if (a < b && c) {}</script>");
    assert_eq!(tokens[0].tag_name(), Some("script"));
    assert_eq!(text_of(&tokens), "if (a < b && c) {}");
    assert!(matches!(&tokens[tokens.len() - 2], Token::EndTag { name, .. } if name == "script"));
}

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let tokens = tokenize("<title>a &amp; <b></title>");
    assert_eq!(text_of(&tokens), "a & <b>");
}

#[test]
fn test_rawtext_ends_only_at_matching_end_tag() {
    let tokens = tokenize("<style>p { } </p></style>");
    assert_eq!(text_of(&tokens), "p { } </p>");
}

#[test]
fn test_plaintext_never_ends() {
    let tokens = tokenize("<plaintext></plaintext>&amp;");
    assert_eq!(text_of(&tokens), "</plaintext>&amp;");
}

#[test]
fn test_cdata_is_bogus_comment_in_html() {
    let (tokens, errors) = tokenize_with_errors("<![CDATA[x]]>");
    assert!(matches!(&tokens[0], Token::Comment { data } if data == "[CDATA[x]]"));
    assert_eq!(errors[0].code, ParseErrorCode::CdataInHtmlContent);
}

#[test]
fn test_state_can_be_set_by_the_caller() {
    let mut tokenizer = HTMLTokenizer::with_options(TokenizerOptions::default());
    tokenizer.set_state(TokenizerState::RCDATA);
    tokenizer.set_last_start_tag(Some("textarea".to_string()));
    tokenizer.push_str("<b></textarea>");
    tokenizer.end();
    tokenizer.run();
    let tokens = tokenizer.into_tokens();
    assert_eq!(text_of(&tokens), "<b>");
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "textarea"));
}

// =============================================================================
// Incremental input and positions
// =============================================================================

#[test]
fn test_incremental_input_matches_whole_input() {
    let input = "<p class=\"x\">a &amp; b<!-- c --></p>";
    let whole = tokenize(input);

    let mut tokenizer = HTMLTokenizer::with_options(TokenizerOptions::standalone());
    let mut tokens = Vec::new();
    for c in input.chars() {
        tokenizer.push_str(&c.to_string());
        while let Some(token) = tokenizer.next_token() {
            tokens.push(token.token);
        }
    }
    tokenizer.end();
    while let Some(token) = tokenizer.next_token() {
        tokens.push(token.token);
    }

    assert_eq!(text_of(&tokens), text_of(&whole));
    // Runs are not cut at chunk boundaries
    assert_eq!(tokens, whole);
    let tags = |tokens: &[Token]| -> Vec<Token> {
        tokens
            .iter()
            .filter(|t| !matches!(t, Token::Character { .. } | Token::Whitespace { .. }))
            .cloned()
            .collect()
    };
    assert_eq!(tags(&tokens), tags(&whole));
}

#[test]
fn test_crlf_is_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_spans_track_lines_and_columns() {
    let mut tokenizer = HTMLTokenizer::new("<p>\n  <b>x</b>".to_string());
    tokenizer.run();
    let tokens = tokenizer.into_spanned_tokens();
    let b = tokens
        .iter()
        .find(|t| t.token.tag_name() == Some("b"))
        .expect("b start tag");
    assert_eq!(b.span.start.line, 2);
    assert_eq!(b.span.start.column, 3);
    assert_eq!(b.span.start.offset, 6);
    assert_eq!(b.span.end.offset, 9);
}

#[test]
fn test_error_positions() {
    let (_, errors) = tokenize_with_errors("ab\n&#0;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 2);
    assert!(errors[0].to_string().ends_with("null-character-reference"));
}

#[test]
fn test_control_character_in_input() {
    assert_eq!(
        error_codes("a\u{1}b"),
        vec![ParseErrorCode::ControlCharacterInInputStream]
    );
}

#[test]
fn test_finished_only_after_end_of_file_is_drained() {
    let mut tokenizer = HTMLTokenizer::with_options(TokenizerOptions::standalone());
    tokenizer.push_str("ab");
    assert!(tokenizer.next_token().is_none());
    assert!(!tokenizer.is_finished());

    tokenizer.end();
    assert!(!tokenizer.is_finished());
    assert!(matches!(
        tokenizer.next_token().map(|t| t.token),
        Some(Token::Character { data }) if data == "ab"
    ));
    assert_eq!(tokenizer.next_token().map(|t| t.token), Some(Token::EndOfFile));
    assert!(tokenizer.is_finished());
    assert!(tokenizer.next_token().is_none());
}
