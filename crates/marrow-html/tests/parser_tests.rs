//! Integration tests for the HTML parser.

use marrow_dom::{DocumentMode, DomTree, Namespace, Node, NodeId, NodeType};
use marrow_html::{ParseErrorCode, ParseOutput, ParserOptions, dump_tree, parse_document};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html, ParserOptions::default()).tree
}

/// Helper to parse with the scripting flag off
fn parse_without_scripting(html: &str) -> DomTree {
    parse_document(html, ParserOptions::default().scripting(false)).tree
}

/// Helper to get the error codes of a parse
fn error_codes(html: &str) -> Vec<ParseErrorCode> {
    let ParseOutput { errors, .. } = parse_document(html, ParserOptions::default());
    errors.into_iter().map(|error| error.code).collect()
}

/// Helper to dump the whole document in html5lib format
fn dump(html: &str) -> String {
    let tree = parse(html);
    dump_tree(&tree, NodeId::ROOT)
}

/// Helper to build the expected dump from its lines
fn lines(expected: &[&str]) -> String {
    expected.iter().map(|line| format!("{line}\n")).collect()
}

/// Helper to get element by tag name (first match, depth-first)
fn find_element(tree: &DomTree, from: NodeId, tag: &str) -> Option<NodeId> {
    if let Some(data) = tree.as_element(from)
        && data.tag_name == tag
    {
        return Some(from);
    }
    for &child_id in tree.children(from) {
        if let Some(found) = find_element(tree, child_id, tag) {
            return Some(found);
        }
    }
    None
}

/// Helper to get a node reference
fn get_node(tree: &DomTree, id: NodeId) -> &Node {
    tree.get(id).expect("Node not found")
}

// =============================================================================
// Document structure
// =============================================================================

#[test]
fn test_document_structure() {
    let tree = parse("<!DOCTYPE html><html><head></head><body></body></html>");

    // Root should be Document
    let root = get_node(&tree, NodeId::ROOT);
    assert!(matches!(root.node_type, NodeType::Document));

    // Document should have doctype then html
    let children = tree.children(NodeId::ROOT);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        &get_node(&tree, children[0]).node_type,
        NodeType::DocumentType { name, .. } if name == "html"
    ));

    let html_id = tree.document_element().unwrap();
    assert_eq!(tree.children(html_id).len(), 2);
    assert!(tree.head().is_some());
    assert!(tree.body().is_some());
}

#[test]
fn test_implied_html_head_body() {
    let tree = parse("Hello World");
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "Hello World");
    assert!(tree.children(tree.head().unwrap()).is_empty());
}

#[test]
fn test_empty_document() {
    assert_eq!(dump(""), lines(&["| <html>", "|   <head>", "|   <body>"]));
    assert_eq!(error_codes(""), vec![ParseErrorCode::MissingDoctype]);
}

#[test]
fn test_comment_before_html() {
    assert_eq!(
        dump("<!--a--><!DOCTYPE html><p>"),
        lines(&[
            "| <!-- a -->",
            "| <!DOCTYPE html>",
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
        ])
    );
}

#[test]
fn test_attributes_on_html_merge() {
    let tree = parse(r#"<html lang="en"><body><html lang="fr" dir="ltr">"#);
    let html = tree.as_element(tree.document_element().unwrap()).unwrap();
    assert_eq!(html.attrs.get("lang").map(String::as_str), Some("en"));
    assert_eq!(html.attrs.get("dir").map(String::as_str), Some("ltr"));
}

#[test]
fn test_head_content() {
    let tree = parse("<title>A &amp; B</title><meta charset=utf-8><style>p{}</style>x");
    let head = tree.head().unwrap();
    let title = find_element(&tree, head, "title").unwrap();
    assert_eq!(tree.text_content(title), "A & B");
    assert!(find_element(&tree, head, "meta").is_some());
    let style = find_element(&tree, head, "style").unwrap();
    assert_eq!(tree.text_content(style), "p{}");
    assert_eq!(tree.text_content(tree.body().unwrap()), "x");
}

#[test]
fn test_text_after_body_goes_into_body() {
    let tree = parse("<html><body></body></html>x");
    assert_eq!(tree.text_content(tree.body().unwrap()), "x");
    assert_eq!(
        error_codes("<!DOCTYPE html><body></body></html>x"),
        vec![ParseErrorCode::UnexpectedContentAfterBody]
    );
}

#[test]
fn test_comment_after_html_is_child_of_document() {
    let tree = parse("<!DOCTYPE html><html></html><!--end-->");
    let last = *tree.children(NodeId::ROOT).last().unwrap();
    assert!(matches!(&get_node(&tree, last).node_type, NodeType::Comment(data) if data == "end"));
}

// =============================================================================
// Implied end tags and scopes
// =============================================================================

#[test]
fn test_paragraph_auto_close() {
    assert_eq!(
        dump("<p>a<p>b</p>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       \"a\"",
            "|     <p>",
            "|       \"b\"",
        ])
    );
}

#[test]
fn test_stray_end_p_creates_empty_paragraph() {
    let tree = parse("<!DOCTYPE html><body></p>");
    let body = tree.body().unwrap();
    assert!(find_element(&tree, body, "p").is_some());
    assert_eq!(
        error_codes("<!DOCTYPE html><body></p>"),
        vec![ParseErrorCode::UnexpectedEndTag]
    );
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        dump("<ul><li>a<li>b</ul>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <ul>",
            "|       <li>",
            "|         \"a\"",
            "|       <li>",
            "|         \"b\"",
        ])
    );
}

#[test]
fn test_definition_list_items() {
    let tree = parse("<dl><dt>a<dd>b<dt>c</dl>");
    let dl = find_element(&tree, NodeId::ROOT, "dl").unwrap();
    assert_eq!(tree.children(dl).len(), 3);
}

#[test]
fn test_heading_closes_heading() {
    let tree = parse("<h1>a<h2>b");
    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).len(), 2);
}

#[test]
fn test_pre_drops_leading_newline() {
    let tree = parse("<pre>\nx\n</pre>");
    let pre = find_element(&tree, NodeId::ROOT, "pre").unwrap();
    assert_eq!(tree.text_content(pre), "x\n");
}

#[test]
fn test_void_elements_have_no_children() {
    let tree = parse("<p>a<br>b<img src=x>c<input>d");
    let br = find_element(&tree, NodeId::ROOT, "br").unwrap();
    let img = find_element(&tree, NodeId::ROOT, "img").unwrap();
    assert!(tree.children(br).is_empty());
    assert!(tree.children(img).is_empty());
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(tree.text_content(p), "abcd");
}

#[test]
fn test_end_br_becomes_start_br() {
    let tree = parse("a</br>b");
    assert!(find_element(&tree, NodeId::ROOT, "br").is_some());
}

#[test]
fn test_image_becomes_img() {
    let tree = parse("<image src=x>");
    let img = find_element(&tree, NodeId::ROOT, "img").unwrap();
    let data = tree.as_element(img).unwrap();
    assert_eq!(data.attrs.get("src").map(String::as_str), Some("x"));
}

#[test]
fn test_nested_form_is_ignored() {
    let tree = parse("<form><form><input></form>");
    let form = find_element(&tree, NodeId::ROOT, "form").unwrap();
    assert!(find_element(&tree, tree.children(form)[0], "form").is_none());
    assert!(error_codes("<!DOCTYPE html><form><form>").contains(&ParseErrorCode::NestedForm));
}

#[test]
fn test_self_closing_non_void_is_an_error() {
    let codes = error_codes("<!DOCTYPE html><div/>x</div>");
    assert_eq!(
        codes,
        vec![ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus]
    );
    let tree = parse("<div/>x");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(tree.text_content(div), "x");
}

#[test]
fn test_unclosed_elements_at_eof() {
    let codes = error_codes("<!DOCTYPE html><div><span>");
    assert_eq!(codes, vec![ParseErrorCode::OpenElementsLeftAfterEof]);
}

// =============================================================================
// Formatting elements
// =============================================================================

#[test]
fn test_misnested_formatting_adoption() {
    assert_eq!(
        dump("<b>1<p>2</b>3</p>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"1\"",
            "|     <p>",
            "|       <b>",
            "|         \"2\"",
            "|       \"3\"",
        ])
    );
}

#[test]
fn test_adoption_keeps_text_order() {
    let tree = parse("<b>1<i>2<p>3</b></i>4</p>");
    let body = tree.body().unwrap();
    assert_eq!(tree.text_content(body), "1234");
    let codes = error_codes("<!DOCTYPE html><b>1<i>2<p>3</b></i>4</p>");
    assert!(codes.contains(&ParseErrorCode::MisnestedFormattingElement));
}

#[test]
fn test_anchor_in_anchor() {
    assert_eq!(
        dump("<a>1<a>2</a>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <a>",
            "|       \"1\"",
            "|     <a>",
            "|       \"2\"",
        ])
    );
}

#[test]
fn test_formatting_reconstructed_in_new_paragraph() {
    assert_eq!(
        dump("<p><b>x<p>y"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <p>",
            "|       <b>",
            "|         \"x\"",
            "|     <p>",
            "|       <b>",
            "|         \"y\"",
        ])
    );
}

#[test]
fn test_adoption_drops_formatting_after_three_inner_steps() {
    // The fourth formatting element walked by the inner loop (<b>) leaves the
    // list and is not cloned.
    assert_eq!(
        dump("<a><b><big><em><strong><div>X</a>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <a>",
            "|       <b>",
            "|         <big>",
            "|           <em>",
            "|             <strong>",
            "|     <big>",
            "|       <em>",
            "|         <strong>",
            "|           <div>",
            "|             <a>",
            "|               \"X\"",
        ])
    );
}

#[test]
fn test_adoption_outer_loop_stops_after_eight_rounds() {
    let html = format!("<a>{}X</a>", "<div>".repeat(10));
    assert_eq!(
        dump(&html),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <a>",
            "|     <div>",
            "|       <a>",
            "|       <div>",
            "|         <a>",
            "|         <div>",
            "|           <a>",
            "|           <div>",
            "|             <a>",
            "|             <div>",
            "|               <a>",
            "|               <div>",
            "|                 <a>",
            "|                 <div>",
            "|                   <a>",
            "|                   <div>",
            "|                     <a>",
            "|                       <div>",
            "|                         <div>",
            "|                           \"X\"",
        ])
    );
}

#[test]
fn test_noahs_ark_limits_reconstruction() {
    let tree = parse("<p><b><b><b><b><p>x");
    let body = tree.body().unwrap();
    let second_p = tree.children(body)[1];
    let mut depth = 0;
    let mut node = second_p;
    while let Some(&child) = tree.children(node).first() {
        if tree.as_element(child).is_some_and(|e| e.is_html("b")) {
            depth += 1;
        }
        node = child;
    }
    assert_eq!(depth, 3);
}

#[test]
fn test_unmatched_end_tag_is_ignored() {
    let tree = parse("<div>a</span>b</div>");
    let div = find_element(&tree, NodeId::ROOT, "div").unwrap();
    assert_eq!(tree.children(div).len(), 1);
    assert_eq!(tree.text_content(div), "ab");
}

// =============================================================================
// Character references through the tree builder
// =============================================================================

#[test]
fn test_entities_in_text() {
    let output = parse_document("&amp; &#38; &#x26; &amp", ParserOptions::default());
    let body = output.tree.body().unwrap();
    assert_eq!(output.tree.text_content(body), "& & & &");
    let codes: Vec<_> = output.errors.iter().map(|error| error.code).collect();
    assert!(codes.contains(&ParseErrorCode::MissingSemicolonAfterCharacterReference));
}

#[test]
fn test_entities_in_attribute() {
    let tree = parse(r#"<a title="&lt;&quot;&gt;" href="?a=1&amp=2">"#);
    let a = find_element(&tree, NodeId::ROOT, "a").unwrap();
    let data = tree.as_element(a).unwrap();
    assert_eq!(data.attrs.get("title").map(String::as_str), Some("<\">"));
    assert_eq!(data.attrs.get("href").map(String::as_str), Some("?a=1&amp=2"));
}

#[test]
fn test_null_character_in_body_is_dropped() {
    let tree = parse("a\0b");
    assert_eq!(tree.text_content(tree.body().unwrap()), "ab");
}

// =============================================================================
// Tables
// =============================================================================

#[test]
fn test_table_foster_parenting() {
    assert_eq!(
        dump("<table>X<tr><td>Y</td></tr></table>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     \"X\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"Y\"",
        ])
    );
    let codes = error_codes("<!DOCTYPE html><table>X<tr><td>Y</td></tr></table>");
    assert_eq!(codes, vec![ParseErrorCode::UnexpectedCharacterInTable]);
}

#[test]
fn test_foster_parented_element() {
    assert_eq!(
        dump("<table><b>x</b><tr><td>y"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <b>",
            "|       \"x\"",
            "|     <table>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"y\"",
        ])
    );
}

#[test]
fn test_whitespace_in_table_stays() {
    let tree = parse("<table> <tr> <td>x</td> </tr> </table>");
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    assert!(matches!(
        &get_node(&tree, tree.children(table)[0]).node_type,
        NodeType::Text(data) if data == " "
    ));
}

#[test]
fn test_implied_table_structure() {
    let tree = parse("<table><td>a<td>b<tr><td>c</table>");
    let tbody = find_element(&tree, NodeId::ROOT, "tbody").unwrap();
    let rows = tree.children(tbody);
    assert_eq!(rows.len(), 2);
    assert_eq!(tree.children(rows[0]).len(), 2);
    assert_eq!(tree.children(rows[1]).len(), 1);
}

#[test]
fn test_caption_and_colgroup() {
    assert_eq!(
        dump("<table><caption>c<col><tr><td>x"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <table>",
            "|       <caption>",
            "|         \"c\"",
            "|       <colgroup>",
            "|         <col>",
            "|       <tbody>",
            "|         <tr>",
            "|           <td>",
            "|             \"x\"",
        ])
    );
}

#[test]
fn test_hidden_input_in_table() {
    let tree = parse(r#"<table><input type="hidden"><input type="text"></table>"#);
    let table = find_element(&tree, NodeId::ROOT, "table").unwrap();
    assert_eq!(tree.children(table).len(), 1);
    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).len(), 2);
}

#[test]
fn test_table_inside_paragraph_depends_on_quirks() {
    // In no-quirks mode a table closes the open p.
    let tree = parse("<!DOCTYPE html><p><table></table>");
    let body = tree.body().unwrap();
    assert_eq!(tree.children(body).len(), 2);

    // In quirks mode it nests.
    let tree = parse("<p><table></table>");
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert!(find_element(&tree, p, "table").is_some());
}

#[test]
fn test_select_options() {
    assert_eq!(
        dump("<select><option>a<option>b<optgroup><option>c</select>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <select>",
            "|       <option>",
            "|         \"a\"",
            "|       <option>",
            "|         \"b\"",
            "|       <optgroup>",
            "|         <option>",
            "|           \"c\"",
        ])
    );
}

#[test]
fn test_select_ignores_other_markup() {
    let tree = parse("<select><b>x</b><option>y</select>");
    assert!(find_element(&tree, NodeId::ROOT, "b").is_none());
    let select = find_element(&tree, NodeId::ROOT, "select").unwrap();
    assert_eq!(tree.text_content(select), "xy");
}

#[test]
fn test_select_in_table_cell_closed_by_table_tag() {
    let tree = parse("<table><tr><td><select><option>a</td><td>b</table>");
    let tr = find_element(&tree, NodeId::ROOT, "tr").unwrap();
    assert_eq!(tree.children(tr).len(), 2);
}

// =============================================================================
// Document mode
// =============================================================================

#[test]
fn test_quirks_mode_without_doctype() {
    assert_eq!(parse("<p>").mode(), DocumentMode::Quirks);
    assert_eq!(parse("<!DOCTYPE html>").mode(), DocumentMode::NoQuirks);
}

#[test]
fn test_quirks_mode_from_legacy_doctypes() {
    let transitional = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN">"#;
    assert_eq!(parse(transitional).mode(), DocumentMode::Quirks);

    let with_system = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01 Transitional//EN" "http://www.w3.org/TR/html4/loose.dtd">"#;
    assert_eq!(parse(with_system).mode(), DocumentMode::LimitedQuirks);

    let xhtml = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">"#;
    assert_eq!(parse(xhtml).mode(), DocumentMode::LimitedQuirks);
}

#[test]
fn test_non_conforming_doctype_error() {
    let codes = error_codes("<!DOCTYPE foo>");
    assert_eq!(codes, vec![ParseErrorCode::NonConformingDoctype]);
}

#[test]
fn test_doctype_in_body_is_ignored() {
    let tree = parse("<!DOCTYPE html><p><!DOCTYPE html>");
    assert_eq!(tree.children(NodeId::ROOT).len(), 2);
    assert_eq!(
        error_codes("<!DOCTYPE html><p><!DOCTYPE html>"),
        vec![ParseErrorCode::MisplacedDoctype]
    );
}

// =============================================================================
// Foreign content
// =============================================================================

#[test]
fn test_svg_case_adjustment() {
    assert_eq!(
        dump(r#"<svg viewbox="0 0 1 1"><foreignobject><p>x</p></foreignobject><lineargradient/></svg>"#),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       viewBox=\"0 0 1 1\"",
            "|       <svg foreignObject>",
            "|         <p>",
            "|           \"x\"",
            "|       <svg linearGradient>",
        ])
    );
}

#[test]
fn test_mathml_elements() {
    let tree = parse("<math><mi>x</mi><annotation-xml encoding=\"text/html\"><p>y</p></annotation-xml></math>");
    let mi = find_element(&tree, NodeId::ROOT, "mi").unwrap();
    assert_eq!(tree.as_element(mi).unwrap().namespace, Namespace::MathMl);
    let p = find_element(&tree, NodeId::ROOT, "p").unwrap();
    assert_eq!(tree.as_element(p).unwrap().namespace, Namespace::Html);
    let annotation = find_element(&tree, NodeId::ROOT, "annotation-xml").unwrap();
    assert_eq!(tree.parent(p), Some(annotation));
}

#[test]
fn test_foreign_attributes() {
    assert_eq!(
        dump(r##"<svg xlink:href="#a" xml:lang="en"></svg>"##),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       xlink href=\"#a\"",
            "|       xml lang=\"en\"",
        ])
    );
}

#[test]
fn test_html_breaks_out_of_svg() {
    assert_eq!(
        dump("<svg><g><p>x"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <body>",
            "|     <svg svg>",
            "|       <svg g>",
            "|     <p>",
            "|       \"x\"",
        ])
    );
    let codes = error_codes("<!DOCTYPE html><svg><g><p>x");
    assert!(codes.contains(&ParseErrorCode::UnexpectedHtmlElementInForeignContent));
}

#[test]
fn test_self_closing_in_svg() {
    let tree = parse("<svg><circle/><rect/></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    assert_eq!(tree.children(svg).len(), 2);
}

#[test]
fn test_cdata_in_svg() {
    let tree = parse("<svg><![CDATA[a<b]]></svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    assert_eq!(tree.text_content(svg), "a<b");
}

#[test]
fn test_null_in_foreign_content_is_replaced() {
    let tree = parse("<svg>a\0b</svg>");
    let svg = find_element(&tree, NodeId::ROOT, "svg").unwrap();
    assert_eq!(tree.text_content(svg), "a\u{FFFD}b");
}

// =============================================================================
// Templates
// =============================================================================

#[test]
fn test_template_contents() {
    assert_eq!(
        dump("<template><td>x</td></template>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|     <template>",
            "|       content",
            "|         <td>",
            "|           \"x\"",
            "|   <body>",
        ])
    );
}

#[test]
fn test_template_in_body_and_nested() {
    let tree = parse("<body><template><template><tr></template>y</template>");
    let outer = find_element(&tree, tree.body().unwrap(), "template").unwrap();
    let inner = find_element(&tree, tree.children(outer)[0], "template").unwrap();
    assert!(find_element(&tree, inner, "tr").is_some());
    assert_eq!(tree.text_content(outer), "y");
}

#[test]
fn test_unclosed_template_at_eof() {
    let codes = error_codes("<!DOCTYPE html><template><div>");
    assert_eq!(codes, vec![ParseErrorCode::EofInTemplate]);
}

#[test]
fn test_stray_template_end_tag() {
    let codes = error_codes("<!DOCTYPE html></template>");
    assert_eq!(codes, vec![ParseErrorCode::UnexpectedEndTag]);
}

// =============================================================================
// Scripting flag
// =============================================================================

#[test]
fn test_noscript_with_scripting_enabled() {
    let tree = parse("<body><noscript><p>x</p></noscript>");
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").unwrap();
    assert!(find_element(&tree, noscript, "p").is_none());
    assert_eq!(tree.text_content(noscript), "<p>x</p>");
}

#[test]
fn test_noscript_with_scripting_disabled() {
    let tree = parse_without_scripting("<body><noscript><p>x</p></noscript>");
    let noscript = find_element(&tree, NodeId::ROOT, "noscript").unwrap();
    let p = find_element(&tree, noscript, "p").unwrap();
    assert_eq!(tree.text_content(p), "x");
}

#[test]
fn test_noscript_in_head_without_scripting() {
    let tree = parse_without_scripting("<head><noscript><link rel=a><p>x");
    let head = tree.head().unwrap();
    let noscript = find_element(&tree, head, "noscript").unwrap();
    assert!(find_element(&tree, noscript, "link").is_some());
    let body = tree.body().unwrap();
    assert!(find_element(&tree, body, "p").is_some());
}

#[test]
fn test_script_content() {
    let tree = parse("<script>if (a < b) { x = '</p>' }</script>");
    let script = find_element(&tree, NodeId::ROOT, "script").unwrap();
    assert_eq!(tree.text_content(script), "if (a < b) { x = '</p>' }");
}

#[test]
fn test_unterminated_script_at_eof() {
    let codes = error_codes("<!DOCTYPE html><script>x");
    assert!(codes.contains(&ParseErrorCode::EofInElementThatCanContainOnlyText));
}

// =============================================================================
// Framesets
// =============================================================================

#[test]
fn test_frameset_document() {
    assert_eq!(
        dump("<frameset><frame></frameset>"),
        lines(&[
            "| <html>",
            "|   <head>",
            "|   <frameset>",
            "|     <frame>",
        ])
    );
}

#[test]
fn test_text_in_frameset_is_an_error_per_character() {
    let codes = error_codes("<!DOCTYPE html><frameset>ab</frameset>");
    assert_eq!(
        codes,
        vec![
            ParseErrorCode::UnexpectedTokenInFrameset,
            ParseErrorCode::UnexpectedTokenInFrameset,
        ]
    );
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_unterminated_comment_error() {
    let output = parse_document("<!DOCTYPE html><!-- unterminated", ParserOptions::default());
    let codes: Vec<_> = output.errors.iter().map(|error| error.code).collect();
    assert_eq!(codes, vec![ParseErrorCode::EofInComment]);
    let comment = output
        .tree
        .descendants(NodeId::ROOT)
        .find(|&id| matches!(get_node(&output.tree, id).node_type, NodeType::Comment(_)));
    assert!(comment.is_some());
}

#[test]
fn test_errors_are_in_source_order() {
    let output = parse_document(
        "<!DOCTYPE html><p id=a id=b>&#0;</div>",
        ParserOptions::default(),
    );
    let codes: Vec<_> = output.errors.iter().map(|error| error.code).collect();
    assert_eq!(
        codes,
        vec![
            ParseErrorCode::DuplicateAttribute,
            ParseErrorCode::NullCharacterReference,
            ParseErrorCode::UnexpectedEndTag,
        ]
    );
    let offsets: Vec<_> = output.errors.iter().map(|error| error.offset).collect();
    let mut sorted = offsets.clone();
    sorted.sort_unstable();
    assert_eq!(offsets, sorted);
}

#[test]
fn test_errors_serialize_as_json() {
    let output = parse_document("<!DOCTYPE html></x>", ParserOptions::default());
    let json = serde_json::to_value(&output.errors).unwrap();
    assert_eq!(json[0]["code"], "unexpected-end-tag");
    assert_eq!(json[0]["line"], 1);
    assert_eq!(json[0]["column"], 16);
}
