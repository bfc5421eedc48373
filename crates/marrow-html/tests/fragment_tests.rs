//! Integration tests for fragment parsing.

use marrow_dom::{Namespace, NodeId, NodeType};
use marrow_html::{
    FragmentContext, ParseErrorCode, ParseOutput, ParserOptions, dump_tree, parse_fragment,
    serialize,
};

/// Helper to parse a fragment for an HTML context element
fn parse_in(context: &str, html: &str) -> ParseOutput {
    parse_fragment(html, FragmentContext::html(context), ParserOptions::default())
}

/// Helper to dump a fragment's children
fn dump_in(context: &str, html: &str) -> String {
    let output = parse_in(context, html);
    dump_tree(&output.tree, NodeId::ROOT)
}

#[test]
fn test_fragment_root_is_document_fragment() {
    let output = parse_in("div", "<p>a<p>b");
    let root = output.tree.get(NodeId::ROOT).unwrap();
    assert!(matches!(root.node_type, NodeType::DocumentFragment));
    assert_eq!(
        dump_tree(&output.tree, NodeId::ROOT),
        "| <p>\n|   \"a\"\n| <p>\n|   \"b\"\n"
    );
    // No doctype error in the fragment case
    assert!(output.errors.is_empty());
}

#[test]
fn test_textarea_context_is_rcdata() {
    let output = parse_in("textarea", "<b>x &amp; y</b>");
    let children = output.tree.children(NodeId::ROOT);
    assert_eq!(children.len(), 1);
    assert_eq!(output.tree.as_text(children[0]), Some("<b>x & y</b>"));
}

#[test]
fn test_script_context_is_script_data() {
    let output = parse_in("script", "a < b && <!-- c");
    assert_eq!(output.tree.text_content(NodeId::ROOT), "a < b && <!-- c");
}

#[test]
fn test_plaintext_context() {
    let output = parse_in("plaintext", "</plaintext><b>");
    assert_eq!(output.tree.text_content(NodeId::ROOT), "</plaintext><b>");
}

#[test]
fn test_body_content_never_creates_html_head_body() {
    let output = parse_in("body", "<head><title>t</title><body><html>x");
    let dump = dump_tree(&output.tree, NodeId::ROOT);
    assert_eq!(dump, "| <title>\n|   \"t\"\n| \"x\"\n");
}

#[test]
fn test_table_row_context() {
    assert_eq!(
        dump_in("tr", "<td>a<td>b"),
        "| <td>\n|   \"a\"\n| <td>\n|   \"b\"\n"
    );
}

#[test]
fn test_table_context_implies_tbody() {
    assert_eq!(
        dump_in("table", "<tr><td>a"),
        "| <tbody>\n|   <tr>\n|     <td>\n|       \"a\"\n"
    );
}

#[test]
fn test_cell_context_ignores_its_own_end_tag() {
    let output = parse_in("td", "x</td>y");
    assert_eq!(output.tree.text_content(NodeId::ROOT), "xy");
    let codes: Vec<_> = output.errors.iter().map(|error| error.code).collect();
    assert_eq!(codes, vec![ParseErrorCode::UnexpectedEndTag]);
}

#[test]
fn test_select_context() {
    assert_eq!(
        dump_in("select", "<option>a<option>b<p>c"),
        "| <option>\n|   \"a\"\n| <option>\n|   \"bc\"\n"
    );
}

#[test]
fn test_template_context() {
    assert_eq!(dump_in("template", "<td>x"), "| <td>\n|   \"x\"\n");
}

#[test]
fn test_svg_context() {
    let output = parse_fragment(
        "<foreignobject/><circle r=1></circle>",
        FragmentContext::new("svg", Namespace::Svg),
        ParserOptions::default(),
    );
    assert_eq!(
        dump_tree(&output.tree, NodeId::ROOT),
        "| <svg foreignObject>\n| <svg circle>\n|   r=\"1\"\n"
    );
}

#[test]
fn test_annotation_xml_context_with_html_encoding() {
    let output = parse_fragment(
        "<p>x</p>",
        FragmentContext::new("annotation-xml", Namespace::MathMl)
            .with_attribute("encoding", "text/html"),
        ParserOptions::default(),
    );
    let p = output.tree.children(NodeId::ROOT)[0];
    let element = output.tree.as_element(p).unwrap();
    assert_eq!(element.namespace, Namespace::Html);
    assert_eq!(element.tag_name, "p");
}

#[test]
fn test_noscript_context_follows_scripting_flag() {
    let scripted = parse_fragment(
        "<p>x</p>",
        FragmentContext::html("noscript"),
        ParserOptions::default(),
    );
    assert_eq!(scripted.tree.children(NodeId::ROOT).len(), 1);
    assert!(
        scripted
            .tree
            .as_text(scripted.tree.children(NodeId::ROOT)[0])
            .is_some()
    );

    let unscripted = parse_fragment(
        "<p>x</p>",
        FragmentContext::html("noscript"),
        ParserOptions::default().scripting(false),
    );
    let p = unscripted.tree.children(NodeId::ROOT)[0];
    assert!(unscripted.tree.as_element(p).is_some_and(|e| e.is_html("p")));
}

#[test]
fn test_fragment_serializes_back() {
    let output = parse_in("div", "<span class=\"a\">x</span><br>y");
    assert_eq!(
        serialize(&output.tree, NodeId::ROOT),
        "<span class=\"a\">x</span><br>y"
    );
}
