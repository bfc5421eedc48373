//! Integration tests for parser options and the public entry points.

use std::sync::{Arc, Mutex};

use marrow_dom::{DomTree, NodeId};
use marrow_html::{
    HTMLParser, InsertionMode, ParseError, ParseErrorCode, ParserOptions, Token, parse_document,
    tokenize,
};

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    tree.descendants(from)
        .find(|&id| tree.as_element(id).is_some_and(|data| data.tag_name == tag))
}

#[test]
fn test_error_sink_sees_every_error_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        move |error: &ParseError| seen.lock().unwrap().push(*error)
    };
    let output = parse_document(
        "<p id=a id=b></span><!-- x",
        ParserOptions::default().error_sink(sink),
    );

    let seen = seen.lock().unwrap();
    assert_eq!(*seen, output.errors);
    let codes: Vec<_> = seen.iter().map(|error| error.code).collect();
    assert!(codes.contains(&ParseErrorCode::MissingDoctype));
    assert!(codes.contains(&ParseErrorCode::DuplicateAttribute));
    assert!(codes.contains(&ParseErrorCode::UnexpectedEndTag));
    assert!(codes.contains(&ParseErrorCode::EofInComment));
}

#[test]
fn test_error_sink_during_incremental_parse() {
    let count = Arc::new(Mutex::new(0_usize));
    let sink = {
        let count = Arc::clone(&count);
        move |_: &ParseError| *count.lock().unwrap() += 1
    };
    let mut parser = HTMLParser::new(ParserOptions::default().error_sink(sink));
    let _ = parser.write("<!DOCTYPE html></x>").unwrap();
    assert_eq!(*count.lock().unwrap(), 1);
    let _ = parser.write("</y>").unwrap();
    let _ = parser.end().unwrap();
    assert_eq!(*count.lock().unwrap(), 2);
    assert_eq!(parser.errors().len(), 2);
}

#[test]
fn test_parse_error_display() {
    let output = parse_document("<!DOCTYPE html>\n  </x>", ParserOptions::default());
    assert_eq!(output.errors[0].to_string(), "2:3: unexpected-end-tag");
    assert_eq!(ParseErrorCode::EofInTag.as_str(), "eof-in-tag");
}

#[test]
fn test_source_locations_off_by_default() {
    let output = parse_document("<p>x</p>", ParserOptions::default());
    let p = find_element(&output.tree, NodeId::ROOT, "p").unwrap();
    assert!(output.tree.location(p).is_none());
}

#[test]
fn test_source_locations_for_elements_and_text() {
    let output = parse_document(
        "<p>ab</p>\n<div>x",
        ParserOptions::default().source_locations(true),
    );
    let tree = &output.tree;

    let p = find_element(tree, NodeId::ROOT, "p").unwrap();
    let location = tree.location(p).unwrap();
    assert_eq!(location.start.offset, 0);
    assert_eq!(location.end.offset, 9);

    let text = tree.first_child(p).unwrap();
    let location = tree.location(text).unwrap();
    assert_eq!((location.start.offset, location.end.offset), (3, 5));

    // Closed by end of input
    let div = find_element(tree, NodeId::ROOT, "div").unwrap();
    let location = tree.location(div).unwrap();
    assert_eq!(location.start.line, 2);
    assert_eq!(location.start.column, 1);
    assert_eq!(location.end.offset, 16);
}

#[test]
fn test_implicitly_closed_element_ends_at_next_tag() {
    let output = parse_document("<p>a<p>b", ParserOptions::default().source_locations(true));
    let body = output.tree.body().unwrap();
    let first = output.tree.children(body)[0];
    let location = output.tree.location(first).unwrap();
    assert_eq!((location.start.offset, location.end.offset), (0, 4));
}

#[test]
fn test_implied_head_ends_where_its_closing_tag_starts() {
    let output = parse_document(
        "<p>ab</p><div>c",
        ParserOptions::default().source_locations(true),
    );
    let tree = &output.tree;
    let head = tree.head().unwrap();
    let location = tree.location(head).unwrap();
    assert_eq!((location.start.offset, location.end.offset), (0, 0));

    let p = find_element(tree, NodeId::ROOT, "p").unwrap();
    let location = tree.location(p).unwrap();
    assert_eq!((location.start.offset, location.end.offset), (0, 9));
}

#[test]
fn test_void_element_location_covers_its_tag() {
    let output = parse_document("a<br class=x>b", ParserOptions::default().source_locations(true));
    let br = find_element(&output.tree, NodeId::ROOT, "br").unwrap();
    let location = output.tree.location(br).unwrap();
    assert_eq!((location.start.offset, location.end.offset), (1, 13));
}

#[test]
fn test_insertion_mode_is_observable() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    assert_eq!(parser.insertion_mode(), InsertionMode::Initial);
    let _ = parser.write("<!DOCTYPE html><table><tr>").unwrap();
    assert_eq!(parser.insertion_mode(), InsertionMode::InRow);
    let _ = parser.write("<td>").unwrap();
    assert_eq!(parser.insertion_mode(), InsertionMode::InCell);
}

#[test]
fn test_tokenize_entry_point() {
    let tokens = tokenize("<b>x</b>");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[0].tag_name(), Some("b"));
    assert!(matches!(&tokens[1], Token::Character { data } if data == "x"));
    assert!(tokens[3].is_eof());
}

#[test]
fn test_parser_options_debug() {
    let options = ParserOptions::default().scripting(false).error_sink(|_: &ParseError| {});
    let debug = format!("{options:?}");
    assert!(debug.contains("scripting_enabled: false"));
    assert!(debug.contains("error_sink: true"));
}
