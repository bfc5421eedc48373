//! Integration tests for incremental input, pausing and stopping.

use marrow_dom::NodeId;
use marrow_html::{
    HTMLParser, ParseErrorCode, ParseStatus, ParserError, ParserOptions, dump_tree, parse_document,
};

const DOCUMENTS: &[&str] = &[
    "<!DOCTYPE html><title>T &amp; U</title><p class=a>One<b>two<i>three</b>four</i>",
    "<table>x<tr><td>a &notin; b</td></tr> y</table>",
    "<svg viewBox='0 0 1 1'><![CDATA[a]]><foreignObject><p>z</svg>",
    "<!-- c --><pre>\r\nline\r\n</pre><textarea>\n&lt;</textarea>",
    "<script>var a = '<!--<script>'</script>tail",
    "&#x41;&#65&amp&ampx &unknown; \0",
    "<frameset>ab<frame/></frameset>cd",
    "<ul><li>1<li>2</ul><select><option>3<hr></select><template><tr>",
];

/// Helper to drive a parser through every pause
fn drive(parser: &mut HTMLParser, status: Result<ParseStatus, ParserError>) {
    let mut status = status.expect("parser accepts input");
    while let ParseStatus::Paused { .. } = status {
        status = parser.resume().expect("paused parser resumes");
    }
}

/// Helper to parse a document fed in the given chunks
fn parse_chunks(chunks: &[&str]) -> (String, Vec<ParseErrorCode>) {
    let mut parser = HTMLParser::new(ParserOptions::default());
    for chunk in chunks {
        let status = parser.write(chunk);
        drive(&mut parser, status);
    }
    let status = parser.end();
    drive(&mut parser, status);
    let output = parser.into_output();
    let codes = output.errors.iter().map(|error| error.code).collect();
    (dump_tree(&output.tree, NodeId::ROOT), codes)
}

/// Helper to parse a whole document in one go
fn parse_whole(input: &str) -> (String, Vec<ParseErrorCode>) {
    let output = parse_document(input, ParserOptions::default());
    let codes = output.errors.iter().map(|error| error.code).collect();
    (dump_tree(&output.tree, NodeId::ROOT), codes)
}

#[test]
fn test_single_chunk_matches_parse_document() {
    for input in DOCUMENTS {
        assert_eq!(parse_chunks(&[input]), parse_whole(input), "input: {input:?}");
    }
}

#[test]
fn test_every_split_point_gives_the_same_result() {
    for input in DOCUMENTS {
        let expected = parse_whole(input);
        for (index, _) in input.char_indices().skip(1) {
            let (head, tail) = input.split_at(index);
            assert_eq!(
                parse_chunks(&[head, tail]),
                expected,
                "input: {input:?} split at {index}"
            );
        }
    }
}

#[test]
fn test_one_character_chunks_give_the_same_result() {
    for input in DOCUMENTS {
        let chunks: Vec<String> = input.chars().map(String::from).collect();
        let chunks: Vec<&str> = chunks.iter().map(String::as_str).collect();
        assert_eq!(parse_chunks(&chunks), parse_whole(input), "input: {input:?}");
    }
}

#[test]
fn test_error_order_ignores_cuts_inside_a_text_run() {
    let input = "&#x41;&#65&amp&ampx";
    let expected = vec![
        ParseErrorCode::MissingSemicolonAfterCharacterReference,
        ParseErrorCode::MissingSemicolonAfterCharacterReference,
        ParseErrorCode::MissingSemicolonAfterCharacterReference,
        ParseErrorCode::MissingDoctype,
    ];
    assert_eq!(parse_whole(input).1, expected);
    for split in [6, 10, 14] {
        let (head, tail) = input.split_at(split);
        let (dump, codes) = parse_chunks(&[head, tail]);
        assert_eq!(codes, expected, "split at {split}");
        assert!(dump.ends_with("|     \"AA&&x\"\n"), "split at {split}: {dump}");
    }
}

#[test]
fn test_crlf_split_across_chunks_is_one_newline() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<body>a\r").unwrap();
    let _ = parser.write("\nb").unwrap();
    let _ = parser.end().unwrap();
    let tree = parser.into_tree();
    assert_eq!(tree.text_content(tree.body().unwrap()), "a\nb");
}

#[test]
fn test_utf16_surrogate_pair_split_across_chunks() {
    let units: Vec<u16> = "<p>\u{1F600}</p>".encode_utf16().collect();
    let split = units.iter().position(|&unit| (0xD800..0xDC00).contains(&unit)).unwrap() + 1;

    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write_utf16(&units[..split]).unwrap();
    let _ = parser.write_utf16(&units[split..]).unwrap();
    let _ = parser.end().unwrap();
    let output = parser.into_output();
    assert_eq!(output.tree.text_content(output.tree.body().unwrap()), "\u{1F600}");
    assert!(
        !output
            .errors
            .iter()
            .any(|error| error.code == ParseErrorCode::SurrogateInInputStream)
    );
}

#[test]
fn test_lone_surrogate_is_replaced() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write_utf16(&[0x61, 0xD800, 0x62]).unwrap();
    let _ = parser.end().unwrap();
    let output = parser.into_output();
    assert_eq!(
        output.tree.text_content(output.tree.body().unwrap()),
        "a\u{FFFD}b"
    );
    assert!(
        output
            .errors
            .iter()
            .any(|error| error.code == ParseErrorCode::SurrogateInInputStream)
    );
}

#[test]
fn test_status_reports_need_more_input_then_finished() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    assert_eq!(parser.write("<p>a").unwrap(), ParseStatus::NeedMoreInput);
    assert_eq!(parser.end().unwrap(), ParseStatus::Finished);
}

#[test]
fn test_write_after_end_is_rejected() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<p>a").unwrap();
    let _ = parser.end().unwrap();
    assert_eq!(parser.write("b"), Err(ParserError::WriteAfterEnd));
    assert_eq!(parser.end(), Err(ParserError::WriteAfterEnd));
}

// =============================================================================
// Scripts and pausing
// =============================================================================

#[test]
fn test_script_end_tag_pauses_the_parser() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let status = parser.write("<script>go()</script><p>rest").unwrap();
    let ParseStatus::Paused {
        script: Some(script),
    } = status
    else {
        panic!("Expected a pause at the script end tag, got {status:?}");
    };
    assert_eq!(parser.tree().text_content(script), "go()");

    // What the script writes is parsed before the rest of the input.
    parser.insert_at_cursor("<b>written</b>");
    assert_eq!(parser.resume().unwrap(), ParseStatus::NeedMoreInput);
    let _ = parser.end().unwrap();

    let tree = parser.into_tree();
    let body = tree.body().unwrap();
    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert!(tree.as_element(children[0]).unwrap().is_html("b"));
    assert!(tree.as_element(children[1]).unwrap().is_html("p"));
    assert_eq!(tree.text_content(body), "writtenrest");
}

#[test]
fn test_no_pause_without_scripting() {
    let mut parser = HTMLParser::new(ParserOptions::default().scripting(false));
    let status = parser.write("<script>go()</script><p>rest").unwrap();
    assert_eq!(status, ParseStatus::NeedMoreInput);
}

#[test]
fn test_end_while_paused_finishes_on_resume() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<script></script>").unwrap();
    assert!(matches!(parser.end().unwrap(), ParseStatus::Paused { .. }));
    assert_eq!(parser.resume().unwrap(), ParseStatus::Finished);
}

#[test]
fn test_manual_pause_buffers_input() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<p>a").unwrap();
    assert_eq!(
        parser.pause().unwrap(),
        ParseStatus::Paused { script: None }
    );
    assert_eq!(
        parser.write("<p>b").unwrap(),
        ParseStatus::Paused { script: None }
    );
    assert_eq!(parser.tree().body().map(|body| parser.tree().children(body).len()), Some(1));

    assert_eq!(parser.resume().unwrap(), ParseStatus::NeedMoreInput);
    let body = parser.tree().body().unwrap();
    assert_eq!(parser.tree().children(body).len(), 2);
}

#[test]
fn test_resume_when_not_paused() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<p>").unwrap();
    assert_eq!(parser.resume(), Err(ParserError::NotPaused));
}

#[test]
fn test_stop_keeps_partial_tree() {
    let mut parser = HTMLParser::new(ParserOptions::default());
    let _ = parser.write("<p>partial").unwrap();
    parser.stop();
    assert_eq!(parser.write("<p>more"), Err(ParserError::Stopped));
    assert_eq!(parser.resume(), Err(ParserError::Stopped));
    assert_eq!(parser.pause(), Err(ParserError::Stopped));

    let tree = parser.into_tree();
    assert_eq!(tree.text_content(tree.body().unwrap()), "partial");
}
