//! Tests for the tree mutations the parser relies on: removal, insertion
//! before a reference node, and moving children between elements.

use marrow_dom::{
    AttributesMap, DomTree, ElementData, Namespace, NodeId, NodeType, SourcePosition,
};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::html(tag)))
}

// ========== append_child ==========

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(first, child);
    tree.append_child(second, child);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

// ========== remove_child ==========

/// Helper to append a run of HTML elements under `parent`.
fn append_all(tree: &mut DomTree, parent: NodeId, tags: &[&str]) -> Vec<NodeId> {
    tags.iter()
        .map(|tag| {
            let id = alloc_element(tree, tag);
            tree.append_child(parent, id);
            id
        })
        .collect()
}

#[test]
fn test_remove_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let [head, body, frameset] = append_all(&mut tree, html, &["head", "body", "frameset"])[..]
    else {
        panic!("three children");
    };

    // <frameset> after an unwanted <body> drops the body
    tree.remove_child(html, body);
    assert_eq!(tree.children(html), &[head, frameset]);
    assert_eq!(tree.next_sibling(head), Some(frameset));
    assert_eq!(tree.prev_sibling(frameset), Some(head));
    assert_eq!(tree.parent(body), None);
    assert_eq!((tree.prev_sibling(body), tree.next_sibling(body)), (None, None));

    tree.remove_child(html, head);
    assert_eq!(tree.first_child(html), Some(frameset));
    assert_eq!(tree.prev_sibling(frameset), None);
}

#[test]
fn test_remove_child_not_a_child_is_noop() {
    let mut tree = DomTree::new();
    let [div, span] = append_all(&mut tree, NodeId::ROOT, &["div", "span"])[..] else {
        panic!("two children");
    };

    tree.remove_child(div, span);

    assert_eq!(tree.parent(span), Some(NodeId::ROOT));
    assert_eq!(tree.children(NodeId::ROOT), &[div, span]);
}

#[test]
fn test_detach_unattached_node_is_noop() {
    let mut tree = DomTree::new();
    let orphan = alloc_element(&mut tree, "b");
    tree.detach(orphan);
    assert_eq!(tree.parent(orphan), None);
    assert!(tree.children(NodeId::ROOT).is_empty());
}

// ========== insert_before ==========

#[test]
fn test_insert_before_fosters_text_ahead_of_table() {
    let mut tree = DomTree::new();
    let body = alloc_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, body);
    let [p, table] = append_all(&mut tree, body, &["p", "table"])[..] else {
        panic!("two children");
    };

    let text = tree.alloc(NodeType::Text("x".to_string()));
    tree.insert_before(body, text, table);

    assert_eq!(tree.children(body), &[p, text, table]);
    assert_eq!(tree.next_sibling(p), Some(text));
    assert_eq!(tree.prev_sibling(text), Some(p));
    assert_eq!(tree.next_sibling(text), Some(table));
    assert_eq!(tree.prev_sibling(table), Some(text));
}

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let table = alloc_element(&mut tree, "table");
    tree.append_child(NodeId::ROOT, table);
    let comment = tree.alloc(NodeType::Comment("c".to_string()));

    tree.insert_before(NodeId::ROOT, comment, table);

    assert_eq!(tree.first_child(NodeId::ROOT), Some(comment));
    assert_eq!(tree.prev_sibling(comment), None);
    assert_eq!(tree.prev_sibling(table), Some(comment));
}

#[test]
fn test_insert_before_moves_attached_node() {
    let mut tree = DomTree::new();
    let [div, table] = append_all(&mut tree, NodeId::ROOT, &["div", "table"])[..] else {
        panic!("two children");
    };
    let b = alloc_element(&mut tree, "b");
    tree.append_child(div, b);

    tree.insert_before(NodeId::ROOT, b, table);

    assert!(tree.children(div).is_empty());
    assert_eq!(tree.children(NodeId::ROOT), &[div, b, table]);
    assert_eq!(tree.parent(b), Some(NodeId::ROOT));
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "table");
    tree.append_child(NodeId::ROOT, div);

    let a = alloc_element(&mut tree, "a");
    tree.insert_before(div, a, stranger);

    assert_eq!(tree.children(div), &[a]);
}

// ========== move_children ==========

#[test]
fn test_move_children_into_formatting_clone() {
    // The adoption agency moves the furthest block's children into a clone
    // of the formatting element, then appends the clone to the block.
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let text = tree.alloc(NodeType::Text("2".to_string()));
    let i = alloc_element(&mut tree, "i");
    tree.append_child(p, text);
    tree.append_child(p, i);

    let clone = alloc_element(&mut tree, "b");
    tree.move_children(p, clone);
    tree.append_child(p, clone);

    assert_eq!(tree.children(p), &[clone]);
    assert_eq!(tree.children(clone), &[text, i]);
    assert_eq!(tree.parent(text), Some(clone));
    assert_eq!(tree.next_sibling(text), Some(i));
    assert_eq!(tree.prev_sibling(i), Some(text));
    assert_eq!(tree.prev_sibling(clone), None);
}

#[test]
fn test_move_children_appends_after_existing() {
    let mut tree = DomTree::new();
    let [from, to] = append_all(&mut tree, NodeId::ROOT, &["div", "span"])[..] else {
        panic!("two children");
    };
    let [existing] = append_all(&mut tree, to, &["x"])[..] else {
        panic!("one child");
    };
    let [moved] = append_all(&mut tree, from, &["y"])[..] else {
        panic!("one child");
    };

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));

    // Nothing left to move
    tree.move_children(from, to);
    assert_eq!(tree.children(to).len(), 2);
}

// ========== queries ==========

#[test]
fn test_document_head_and_body() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_svg_title_is_not_html() {
    let svg_title = ElementData::new("title", Namespace::Svg, AttributesMap::new());
    assert!(!svg_title.is_html("title"));
    assert!(ElementData::html("title").is_html("title"));
}

#[test]
fn test_descendants_and_text_content() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let one = tree.alloc(NodeType::Text("one ".to_string()));
    let b = alloc_element(&mut tree, "b");
    let two = tree.alloc(NodeType::Text("two".to_string()));
    tree.append_child(p, one);
    tree.append_child(p, b);
    tree.append_child(b, two);

    let order: Vec<NodeId> = tree.descendants(p).collect();
    assert_eq!(order, vec![p, one, b, two]);
    assert_eq!(tree.text_content(p), "one two");
}

#[test]
fn test_attributes_keep_source_order() {
    let attrs: AttributesMap = [
        ("z".to_string(), "1".to_string()),
        ("a".to_string(), "2".to_string()),
    ]
    .into_iter()
    .collect();
    let names: Vec<&String> = attrs.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["z", "a"]);
}

#[test]
fn test_location_end_requires_start() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.set_end(p, SourcePosition::START);
    assert_eq!(tree.location(p), None);

    let start = SourcePosition {
        offset: 3,
        line: 1,
        column: 4,
    };
    let end = SourcePosition {
        offset: 10,
        line: 2,
        column: 1,
    };
    tree.set_start(p, start);
    tree.set_end(p, end);
    let location = tree.location(p).expect("location recorded");
    assert_eq!(location.start, start);
    assert_eq!(location.end, end);
}
