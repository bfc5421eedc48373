//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."
//!
//! "The list contains elements in the formatting category, and markers. The
//! markers are inserted when entering applet, object, marquee, template, td,
//! th, and caption elements, and are used to prevent formatting from
//! 'leaking' into applet, object, marquee, template, td, th, and caption
//! elements."

use marrow_dom::NodeId;

use crate::tokenizer::{Attribute, Token};

/// An entry in the list of active formatting elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveFormattingElement {
    /// A formatting element and the start tag that created it.
    Element {
        /// The element in the tree.
        node_id: NodeId,
        /// "the token for which the element was created", kept so the element
        /// can be recreated by reconstruction or the adoption agency.
        token: Token,
    },
    /// A scope marker.
    Marker,
}

impl ActiveFormattingElement {
    /// The element's node, or `None` for a marker.
    #[must_use]
    pub const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }

    /// The creating token, or `None` for a marker.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Element { token, .. } => Some(token),
            Self::Marker => None,
        }
    }
}

/// "The Noah's Ark clause": at most three identical entries after the last marker.
const NOAHS_ARK_LIMIT: usize = 3;

/// The list of active formatting elements. Index 0 is the earliest entry.
#[derive(Debug, Default)]
pub struct ActiveFormattingElements {
    entries: Vec<ActiveFormattingElement>,
}

impl ActiveFormattingElements {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActiveFormattingElement> {
        self.entries.get(index)
    }

    /// The last entry.
    #[must_use]
    pub fn last(&self) -> Option<&ActiveFormattingElement> {
        self.entries.last()
    }

    /// Index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.node_id() == Some(node))
    }

    /// Whether `node` has an entry.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Insert a marker at the end of the list.
    pub fn insert_marker(&mut self) {
        self.entries.push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    pub fn push_element(&mut self, node_id: NodeId, token: Token) {
        // "1. If there are already three elements in the list of active
        // formatting elements after the last marker, if any, or anywhere in the
        // list if there are no markers, that have the same tag name, namespace,
        // and attributes as element, then remove the earliest such element
        // from the list of active formatting elements. For these purposes, the
        // attributes must be compared as they were when the elements were
        // created by the parser; two elements have the same attributes if all
        // their parsed attributes can be paired such that the two attributes
        // in each pair have identical names, namespaces, and values (the order
        // of the attributes does not matter)."
        let mut matching = Vec::new();
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                ActiveFormattingElement::Marker => break,
                ActiveFormattingElement::Element { token: existing, .. } => {
                    if same_element(existing, &token) {
                        matching.push(index);
                    }
                }
            }
        }
        if matching.len() >= NOAHS_ARK_LIMIT
            && let Some(&earliest) = matching.last()
        {
            let _ = self.entries.remove(earliest);
        }

        // "2. Add element to the list of active formatting elements."
        self.entries
            .push(ActiveFormattingElement::Element { node_id, token });
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub fn clear_to_last_marker(&mut self) {
        // "1. Let entry be the last (most recently added) entry in the list of
        // active formatting elements.
        // 2. Remove entry from the list of active formatting elements.
        // 3. If entry was a marker, then stop the algorithm at this point.
        // 4. Go to step 1."
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// "the last element in the list of active formatting elements that is
    /// between the end of the list and the last marker in the list, if any, or
    /// the start of the list otherwise, and has the tag name `tag_name`"
    #[must_use]
    pub fn element_in_scope_with_tag_name(&self, tag_name: &str) -> Option<NodeId> {
        for entry in self.entries.iter().rev() {
            match entry {
                ActiveFormattingElement::Marker => return None,
                ActiveFormattingElement::Element { node_id, token } => {
                    if token.tag_name() == Some(tag_name) {
                        return Some(*node_id);
                    }
                }
            }
        }
        None
    }

    /// Remove the entry for `node`.
    pub fn remove(&mut self, node: NodeId) -> Option<ActiveFormattingElement> {
        let index = self.position(node)?;
        Some(self.entries.remove(index))
    }

    /// Replace the entry for `node` with an entry for `replacement`, keeping the token.
    pub fn replace(&mut self, node: NodeId, replacement: NodeId) {
        if let Some(index) = self.position(node)
            && let ActiveFormattingElement::Element { node_id, .. } = &mut self.entries[index]
        {
            *node_id = replacement;
        }
    }

    /// Insert an entry at `index`, clamped to the end of the list.
    pub fn insert_at(&mut self, index: usize, entry: ActiveFormattingElement) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }
}

fn same_element(a: &Token, b: &Token) -> bool {
    let (
        Token::StartTag {
            name: a_name,
            attributes: a_attrs,
            ..
        },
        Token::StartTag {
            name: b_name,
            attributes: b_attrs,
            ..
        },
    ) = (a, b)
    else {
        return false;
    };
    a_name == b_name && same_attributes(a_attrs, b_attrs)
}

fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len() && a.iter().all(|attr| b.contains(attr))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_tag(name: &str, attrs: &[(&str, &str)]) -> Token {
        Token::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes: attrs
                .iter()
                .map(|(n, v)| Attribute::new((*n).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    #[test]
    fn noahs_ark_keeps_three_identical_entries() {
        let mut list = ActiveFormattingElements::new();
        for i in 1..=4 {
            list.push_element(NodeId(i), start_tag("b", &[]));
        }
        assert_eq!(list.len(), 3);
        assert!(!list.contains(NodeId(1)));
        assert!(list.contains(NodeId(4)));
    }

    #[test]
    fn noahs_ark_compares_attributes_unordered() {
        let mut list = ActiveFormattingElements::new();
        list.push_element(NodeId(1), start_tag("font", &[("color", "red"), ("size", "2")]));
        list.push_element(NodeId(2), start_tag("font", &[("size", "2"), ("color", "red")]));
        list.push_element(NodeId(3), start_tag("font", &[("color", "red"), ("size", "2")]));
        list.push_element(NodeId(4), start_tag("font", &[("color", "blue")]));
        list.push_element(NodeId(5), start_tag("font", &[("color", "red"), ("size", "2")]));
        assert!(!list.contains(NodeId(1)));
        assert!(list.contains(NodeId(4)));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn noahs_ark_only_counts_after_last_marker() {
        let mut list = ActiveFormattingElements::new();
        for i in 1..=3 {
            list.push_element(NodeId(i), start_tag("i", &[]));
        }
        list.insert_marker();
        list.push_element(NodeId(4), start_tag("i", &[]));
        assert_eq!(list.len(), 5);
        list.clear_to_last_marker();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn finds_last_element_before_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push_element(NodeId(1), start_tag("a", &[]));
        list.insert_marker();
        list.push_element(NodeId(2), start_tag("b", &[]));
        assert_eq!(list.element_in_scope_with_tag_name("b"), Some(NodeId(2)));
        assert_eq!(list.element_in_scope_with_tag_name("a"), None);
    }
}
