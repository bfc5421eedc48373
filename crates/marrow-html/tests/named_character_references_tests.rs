//! Integration tests for named character reference lookup.

use marrow_html::input::Next;
use marrow_html::tokenizer::named_character_references::{Lookup, longest_match, lookup};

/// Helper to run the longest-match walk over a complete string
fn longest(input: &str) -> Lookup {
    let chars: Vec<char> = input.chars().collect();
    longest_match(|i| chars.get(i).map_or(Next::Eof, |&c| Next::Char(c)))
}

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup("amp;"), Some("&"));
    assert_eq!(lookup("lt;"), Some("<"));
    assert_eq!(lookup("gt;"), Some(">"));
    assert_eq!(lookup("quot;"), Some("\""));
    assert_eq!(lookup("nbsp;"), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup("amp"), Some("&"));
    assert_eq!(lookup("lt"), Some("<"));
    assert_eq!(lookup("copy"), Some("\u{A9}"));
    // Only the legacy ones match bare
    assert_eq!(lookup("hellip"), None);
    assert_eq!(lookup("hellip;"), Some("\u{2026}"));
}

#[test]
fn test_lookup_two_code_point_entity() {
    assert_eq!(lookup("NotEqualTilde;"), Some("\u{2242}\u{338}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup("notarealentity;"), None);
    assert_eq!(lookup(""), None);
}

#[test]
fn test_longest_match_prefers_longer_name() {
    assert_eq!(
        longest("notin; rest"),
        Lookup::Found {
            len: 6,
            characters: "\u{2209}"
        }
    );
    assert_eq!(
        longest("notit;"),
        Lookup::Found {
            len: 3,
            characters: "\u{AC}"
        }
    );
}

#[test]
fn test_longest_match_not_found() {
    assert_eq!(longest("xyz;"), Lookup::NotFound);
    assert_eq!(longest(""), Lookup::NotFound);
}

#[test]
fn test_longest_match_asks_for_more_input() {
    let chars: Vec<char> = "am".chars().collect();
    let result = longest_match(|i| chars.get(i).map_or(Next::NeedMoreInput, |&c| Next::Char(c)));
    assert_eq!(result, Lookup::NeedMoreInput);
}

#[test]
fn test_longest_match_at_end_of_input() {
    assert_eq!(
        longest("amp"),
        Lookup::Found {
            len: 3,
            characters: "&"
        }
    );
}
