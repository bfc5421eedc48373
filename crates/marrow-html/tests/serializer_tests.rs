//! Integration tests for HTML serialization and tree dumps.

use marrow_dom::{DomTree, NodeId};
use marrow_html::{ParserOptions, dump_tree, parse_document, serialize, serialize_with_scripting};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    parse_document(html, ParserOptions::default()).tree
}

/// Helper to serialize the body of a document
fn body_html(html: &str) -> String {
    let tree = parse(html);
    serialize(&tree, tree.body().unwrap())
}

#[test]
fn test_serialize_implied_end_tags() {
    assert_eq!(body_html("<p>Hello<p>world"), "<p>Hello</p><p>world</p>");
}

#[test]
fn test_serialize_escapes_text() {
    assert_eq!(
        body_html("<p>x &lt; y &amp; z &gt; w&nbsp;</p>"),
        "<p>x &lt; y &amp; z &gt; w&nbsp;</p>"
    );
}

#[test]
fn test_serialize_escapes_attributes() {
    assert_eq!(
        body_html(r#"<a title='say "hi" & <go>'>x</a>"#),
        r#"<a title="say &quot;hi&quot; &amp; <go>">x</a>"#
    );
}

#[test]
fn test_serialize_keeps_attribute_order() {
    assert_eq!(
        body_html(r#"<div id=b class=a data-x="1"></div>"#),
        r#"<div id="b" class="a" data-x="1"></div>"#
    );
}

#[test]
fn test_serialize_void_elements() {
    assert_eq!(
        body_html("a<br>b<img src=x><hr/><input type=text>"),
        r#"a<br>b<img src="x"><hr><input type="text">"#
    );
}

#[test]
fn test_serialize_raw_text_elements() {
    let tree = parse("<style>a > b { }</style><script>if (a < b) {}</script>");
    let head = tree.head().unwrap();
    assert_eq!(
        serialize(&tree, head),
        "<style>a > b { }</style><script>if (a < b) {}</script>"
    );
}

#[test]
fn test_serialize_whole_document() {
    let tree = parse("<!DOCTYPE html><!--c--><title>t</title>");
    assert_eq!(
        serialize(&tree, NodeId::ROOT),
        "<!DOCTYPE html><!--c--><html><head><title>t</title></head><body></body></html>"
    );
}

#[test]
fn test_serialize_pre_leading_newline() {
    let tree = parse("<pre>\n\nx</pre>");
    let body = tree.body().unwrap();
    assert_eq!(serialize(&tree, body), "<pre>\n\nx</pre>");
}

#[test]
fn test_serialize_template_contents() {
    assert_eq!(
        body_html("<body><template><p>x</p></template>"),
        "<template><p>x</p></template>"
    );
}

#[test]
fn test_serialize_foreign_elements() {
    assert_eq!(
        body_html(r##"<svg viewbox="0 0 1 1"><path d=x /><use xlink:href="#a"/></svg>"##),
        r##"<svg viewBox="0 0 1 1"><path d="x"></path><use xlink:href="#a"></use></svg>"##
    );
}

#[test]
fn test_serialize_noscript_depends_on_scripting() {
    let tree = parse("<body><noscript>a<b</noscript>");
    let body = tree.body().unwrap();
    assert_eq!(serialize(&tree, body), "<noscript>a<b</noscript>");
    assert_eq!(
        serialize_with_scripting(&tree, body, false),
        "<noscript>a&lt;b</noscript>"
    );
}

#[test]
fn test_round_trip_is_stable() {
    let inputs = [
        "<!DOCTYPE html><p>a<b>b<i>c</b>d</i>e",
        "<table>x<tr><td>a &amp; b</table>",
        "<b>1<p>2</b>3</p>",
        "<ul><li>one<li>two</ul><pre>\n\ncode</pre>",
        "<svg><foreignObject><p>x</p></foreignObject><circle r=1/></svg><math><mi>y</mi></math>",
        "<select><option selected>a<option>b</select><textarea>\n&lt;t&gt;</textarea>",
        "<template><tr><td>cell</template><noscript>raw <b></noscript>",
        "<p title='&quot;&amp;'>&nbsp;</p><!--comment-->",
    ];
    for input in inputs {
        let first = parse(input);
        let html = serialize(&first, NodeId::ROOT);
        let second = parse(&html);
        assert_eq!(
            dump_tree(&first, NodeId::ROOT),
            dump_tree(&second, NodeId::ROOT),
            "input: {input:?}\nserialized: {html:?}"
        );
        assert_eq!(serialize(&second, NodeId::ROOT), html);
    }
}

#[test]
fn test_dump_tree_format() {
    let tree = parse(r#"<!DOCTYPE html><p b="2" a="1">x<!-- y --></p><svg xlink:href="z"></svg>"#);
    assert_eq!(
        dump_tree(&tree, NodeId::ROOT),
        "| <!DOCTYPE html>\n\
         | <html>\n\
         |   <head>\n\
         |   <body>\n\
         |     <p>\n\
         |       a=\"1\"\n\
         |       b=\"2\"\n\
         |       \"x\"\n\
         |       <!--  y  -->\n\
         |     <svg svg>\n\
         |       xlink href=\"z\"\n"
    );
}

#[test]
fn test_dump_doctype_identifiers() {
    let tree = parse(r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "">"#);
    let dump = dump_tree(&tree, NodeId::ROOT);
    assert!(dump.starts_with("| <!DOCTYPE html \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"\">\n"));
}
