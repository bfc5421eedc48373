//! [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! Index 0 is the topmost node (normally `html`); the last entry is the
//! current node. Every node removed from the stack is recorded so the tree
//! builder can close its source location.

use marrow_dom::{Namespace, NodeId};

use super::tag::TagId;

/// One entry on the stack: the node plus what the scope checks need to know
/// about it without touching the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenElement {
    /// The element in the tree.
    pub node: NodeId,
    /// Interned local name, or [`TagId::Unknown`].
    pub tag: TagId,
    /// The element's namespace.
    pub namespace: Namespace,
}

impl OpenElement {
    /// Whether this is the HTML element `tag`.
    #[must_use]
    pub fn is_html(&self, tag: TagId) -> bool {
        self.namespace == Namespace::Html && self.tag == tag
    }

    /// Whether this is an HTML element whose name is one of `tags`.
    #[must_use]
    pub fn is_html_one_of(&self, tags: &[TagId]) -> bool {
        self.namespace == Namespace::Html && tags.contains(&self.tag)
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules"
    #[must_use]
    pub const fn is_special(&self) -> bool {
        match self.namespace {
            Namespace::Html => self.tag.is_special_html(),
            Namespace::MathMl => matches!(
                self.tag,
                TagId::Mi | TagId::Mo | TagId::Mn | TagId::Ms | TagId::Mtext | TagId::AnnotationXml
            ),
            Namespace::Svg => matches!(self.tag, TagId::ForeignObject | TagId::Desc | TagId::Title),
        }
    }

    /// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
    ///
    /// "A node is a MathML text integration point if it is one of the
    /// following elements: A MathML mi element, A MathML mo element, A MathML
    /// mn element, A MathML ms element, A MathML mtext element"
    #[must_use]
    pub const fn is_mathml_text_integration_point(&self) -> bool {
        matches!(self.namespace, Namespace::MathMl)
            && matches!(
                self.tag,
                TagId::Mi | TagId::Mo | TagId::Mn | TagId::Ms | TagId::Mtext
            )
    }

    /// The boundaries shared by every scope flavour except table and select scope.
    const fn is_default_scope_boundary(&self) -> bool {
        match self.namespace {
            Namespace::Html => matches!(
                self.tag,
                TagId::Applet
                    | TagId::Caption
                    | TagId::Html
                    | TagId::Table
                    | TagId::Td
                    | TagId::Th
                    | TagId::Marquee
                    | TagId::Object
                    | TagId::Template
            ),
            Namespace::MathMl => matches!(
                self.tag,
                TagId::Mi | TagId::Mo | TagId::Mn | TagId::Ms | TagId::Mtext | TagId::AnnotationXml
            ),
            Namespace::Svg => matches!(self.tag, TagId::ForeignObject | TagId::Desc | TagId::Title),
        }
    }
}

/// The flavours of "has an element in scope".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// [has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    Default,
    /// [has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    ListItem,
    /// [has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    Button,
    /// [has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    Table,
    /// [has an element in select scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope)
    Select,
}

impl Scope {
    fn is_boundary(self, entry: &OpenElement) -> bool {
        match self {
            Self::Default => entry.is_default_scope_boundary(),
            Self::ListItem => {
                entry.is_default_scope_boundary() || entry.is_html_one_of(&[TagId::Ol, TagId::Ul])
            }
            Self::Button => entry.is_default_scope_boundary() || entry.is_html(TagId::Button),
            Self::Table => entry.is_html_one_of(&[TagId::Html, TagId::Table, TagId::Template]),
            // "all element types except the following: optgroup in the HTML
            // namespace, option in the HTML namespace"
            Self::Select => !entry.is_html_one_of(&[TagId::Optgroup, TagId::Option]),
        }
    }
}

/// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
///
/// "dd element, a dt element, an li element, an optgroup element, an option
/// element, a p element, an rb element, an rp element, an rt element, or an
/// rtc element"
const IMPLIED_END_TAGS: &[TagId] = &[
    TagId::Dd,
    TagId::Dt,
    TagId::Li,
    TagId::Optgroup,
    TagId::Option,
    TagId::P,
    TagId::Rb,
    TagId::Rp,
    TagId::Rt,
    TagId::Rtc,
];

/// "generate all implied end tags thoroughly" adds the table section elements.
const THOROUGHLY_IMPLIED_END_TAGS: &[TagId] = &[
    TagId::Caption,
    TagId::Colgroup,
    TagId::Dd,
    TagId::Dt,
    TagId::Li,
    TagId::Optgroup,
    TagId::Option,
    TagId::P,
    TagId::Rb,
    TagId::Rp,
    TagId::Rt,
    TagId::Rtc,
    TagId::Tbody,
    TagId::Td,
    TagId::Tfoot,
    TagId::Th,
    TagId::Thead,
    TagId::Tr,
];

/// The stack of open elements.
#[derive(Debug, Default)]
pub struct OpenElements {
    elements: Vec<OpenElement>,
    /// Number of HTML `template` elements on the stack.
    template_count: usize,
    /// Nodes removed since the last [`take_removed`](Self::take_removed).
    removed: Vec<NodeId>,
}

impl OpenElements {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Entries from the topmost node (index 0) to the current node.
    #[must_use]
    pub fn as_slice(&self) -> &[OpenElement] {
        &self.elements
    }

    /// Entry at `index`, counting from the topmost node.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OpenElement> {
        self.elements.get(index)
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<&OpenElement> {
        self.elements.last()
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Index of `node`, counting from the topmost node.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.elements.iter().rposition(|entry| entry.node == node)
    }

    /// Whether an HTML `template` is on the stack.
    #[must_use]
    pub const fn has_template(&self) -> bool {
        self.template_count > 0
    }

    /// Whether an HTML element called `tag` is anywhere on the stack.
    #[must_use]
    pub fn contains_html(&self, tag: TagId) -> bool {
        self.elements.iter().any(|entry| entry.is_html(tag))
    }

    /// Push onto the stack; the entry becomes the current node.
    pub fn push(&mut self, entry: OpenElement) {
        if entry.is_html(TagId::Template) {
            self.template_count += 1;
        }
        self.elements.push(entry);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<OpenElement> {
        let entry = self.elements.pop()?;
        self.note_removed(&entry);
        Some(entry)
    }

    /// Insert `entry` immediately below `node` (nearer the current node).
    pub fn insert_after(&mut self, node: NodeId, entry: OpenElement) -> bool {
        let Some(index) = self.position(node) else {
            return false;
        };
        if entry.is_html(TagId::Template) {
            self.template_count += 1;
        }
        self.elements.insert(index + 1, entry);
        true
    }

    /// Remove `node` from wherever it is on the stack.
    pub fn remove(&mut self, node: NodeId) -> bool {
        let Some(index) = self.position(node) else {
            return false;
        };
        let entry = self.elements.remove(index);
        self.note_removed(&entry);
        true
    }

    /// Put `entry` where `node` was.
    pub fn replace(&mut self, node: NodeId, entry: OpenElement) -> bool {
        let Some(index) = self.position(node) else {
            return false;
        };
        let old = std::mem::replace(&mut self.elements[index], entry);
        self.note_removed(&old);
        if entry.is_html(TagId::Template) {
            self.template_count += 1;
        }
        true
    }

    /// Pop everything.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Nodes that left the stack since the last call, in removal order.
    pub fn take_removed(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.removed)
    }

    fn note_removed(&mut self, entry: &OpenElement) {
        if entry.is_html(TagId::Template) {
            self.template_count = self.template_count.saturating_sub(1);
        }
        self.removed.push(entry.node);
    }

    // =========================================================================
    // Scope
    // =========================================================================

    /// "The stack of open elements is said to have a particular element in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state"
    fn has_in_specific_scope(&self, scope: Scope, target: impl Fn(&OpenElement) -> bool) -> bool {
        // "1. Initialize node to be the current node (the bottommost node of the stack)."
        for entry in self.elements.iter().rev() {
            // "2. If node is the target node, terminate in a match state."
            if target(entry) {
                return true;
            }
            // "3. Otherwise, if node is one of the element types in list,
            // terminate in a failure state."
            if scope.is_boundary(entry) {
                return false;
            }
            // "4. Otherwise, set node to the previous entry in the stack of
            // open elements and return to step 2."
        }
        false
    }

    /// Whether an HTML element called `tag` is in `scope`.
    #[must_use]
    pub fn has_in_scope_of(&self, scope: Scope, tag: TagId) -> bool {
        self.has_in_specific_scope(scope, |entry| entry.is_html(tag))
    }

    /// [has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    #[must_use]
    pub fn has_in_scope(&self, tag: TagId) -> bool {
        self.has_in_scope_of(Scope::Default, tag)
    }

    /// [has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    #[must_use]
    pub fn has_in_list_item_scope(&self, tag: TagId) -> bool {
        self.has_in_scope_of(Scope::ListItem, tag)
    }

    /// [has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    #[must_use]
    pub fn has_in_button_scope(&self, tag: TagId) -> bool {
        self.has_in_scope_of(Scope::Button, tag)
    }

    /// [has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    #[must_use]
    pub fn has_in_table_scope(&self, tag: TagId) -> bool {
        self.has_in_scope_of(Scope::Table, tag)
    }

    /// [has an element in select scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-select-scope)
    #[must_use]
    pub fn has_in_select_scope(&self, tag: TagId) -> bool {
        self.has_in_scope_of(Scope::Select, tag)
    }

    /// Whether any HTML element in `tags` is in table scope.
    #[must_use]
    pub fn has_any_in_table_scope(&self, tags: &[TagId]) -> bool {
        self.has_in_specific_scope(Scope::Table, |entry| entry.is_html_one_of(tags))
    }

    /// Whether the specific node `node` is in scope.
    #[must_use]
    pub fn has_node_in_scope(&self, node: NodeId) -> bool {
        self.has_in_specific_scope(Scope::Default, |entry| entry.node == node)
    }

    /// "an h1, h2, h3, h4, h5, or h6 element" in scope.
    #[must_use]
    pub fn has_numbered_header_in_scope(&self) -> bool {
        self.has_in_specific_scope(Scope::Default, |entry| {
            entry.namespace == Namespace::Html && entry.tag.is_heading()
        })
    }

    // =========================================================================
    // Popping
    // =========================================================================

    /// Pop until an HTML element called `tag` has been popped.
    pub fn pop_until_tag(&mut self, tag: TagId) {
        while let Some(entry) = self.pop() {
            if entry.is_html(tag) {
                break;
            }
        }
    }

    /// Pop until an HTML element whose name is in `tags` has been popped.
    pub fn pop_until_one_of(&mut self, tags: &[TagId]) {
        while let Some(entry) = self.pop() {
            if entry.is_html_one_of(tags) {
                break;
            }
        }
    }

    /// Pop until `node` has been popped.
    pub fn pop_until_node(&mut self, node: NodeId) {
        while let Some(entry) = self.pop() {
            if entry.node == node {
                break;
            }
        }
    }

    /// Pop until an HTML heading has been popped.
    pub fn pop_until_numbered_header(&mut self) {
        while let Some(entry) = self.pop() {
            if entry.namespace == Namespace::Html && entry.tag.is_heading() {
                break;
            }
        }
    }

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "while the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements."
    ///
    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub fn generate_implied_end_tags_excluding(&mut self, except: TagId) {
        self.pop_implied(Some(except));
    }

    /// Generate implied end tags with nothing excluded.
    pub fn generate_implied_end_tags(&mut self) {
        self.pop_implied(None);
    }

    fn pop_implied(&mut self, except: Option<TagId>) {
        while let Some(current) = self.current() {
            let implied = current.is_html_one_of(IMPLIED_END_TAGS);
            let excluded = except.is_some_and(|tag| current.is_html(tag));
            if !implied || excluded {
                break;
            }
            let _ = self.pop();
        }
    }

    /// "When the steps below require the UA to generate all implied end tags
    /// thoroughly, then, while the current node is a caption element, a
    /// colgroup element, a dd element, a dt element, an li element, an
    /// optgroup element, an option element, a p element, an rb element, an rp
    /// element, an rt element, an rtc element, a tbody element, a td element,
    /// a tfoot element, a th element, a thead element, or a tr element, the UA
    /// must pop the current node off the stack of open elements."
    pub fn generate_implied_end_tags_thoroughly(&mut self) {
        while self
            .current()
            .is_some_and(|current| current.is_html_one_of(THOROUGHLY_IMPLIED_END_TAGS))
        {
            let _ = self.pop();
        }
    }

    fn pop_while_not(&mut self, stop_at: &[TagId]) {
        while self
            .current()
            .is_some_and(|current| !current.is_html_one_of(stop_at))
        {
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "while the current node is not a table, template, or html element, pop
    /// elements from the stack of open elements."
    pub fn clear_to_table_context(&mut self) {
        self.pop_while_not(&[TagId::Table, TagId::Template, TagId::Html]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "while the current node is not a tbody, tfoot, thead, template, or html
    /// element, pop elements from the stack of open elements."
    pub fn clear_to_table_body_context(&mut self) {
        self.pop_while_not(&[
            TagId::Tbody,
            TagId::Tfoot,
            TagId::Thead,
            TagId::Template,
            TagId::Html,
        ]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "while the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    pub fn clear_to_table_row_context(&mut self) {
        self.pop_while_not(&[TagId::Tr, TagId::Template, TagId::Html]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(node: usize, tag: TagId) -> OpenElement {
        OpenElement {
            node: NodeId(node),
            tag,
            namespace: Namespace::Html,
        }
    }

    fn stack(entries: &[OpenElement]) -> OpenElements {
        let mut stack = OpenElements::new();
        for entry in entries {
            stack.push(*entry);
        }
        let _ = stack.take_removed();
        stack
    }

    #[test]
    fn table_is_a_scope_boundary() {
        let stack = stack(&[
            html(1, TagId::Html),
            html(2, TagId::Body),
            html(3, TagId::P),
            html(4, TagId::Table),
        ]);
        assert!(!stack.has_in_scope(TagId::P));
        assert!(stack.has_in_table_scope(TagId::Table));
    }

    #[test]
    fn button_scope_stops_at_button() {
        let stack = stack(&[
            html(1, TagId::Html),
            html(2, TagId::P),
            html(3, TagId::Button),
        ]);
        assert!(stack.has_in_scope(TagId::P));
        assert!(!stack.has_in_button_scope(TagId::P));
    }

    #[test]
    fn foreign_boundaries_use_namespace() {
        let mut stack = stack(&[html(1, TagId::Html), html(2, TagId::P)]);
        stack.push(OpenElement {
            node: NodeId(3),
            tag: TagId::Title,
            namespace: Namespace::Svg,
        });
        assert!(!stack.has_in_scope(TagId::P));

        let stack = stack_with_mathml_title();
        assert!(stack.has_in_scope(TagId::P));
    }

    fn stack_with_mathml_title() -> OpenElements {
        let mut stack = stack(&[html(1, TagId::Html), html(2, TagId::P)]);
        stack.push(OpenElement {
            node: NodeId(3),
            tag: TagId::Title,
            namespace: Namespace::MathMl,
        });
        stack
    }

    #[test]
    fn implied_end_tags_respect_exclusion() {
        let mut stack = stack(&[
            html(1, TagId::Html),
            html(2, TagId::Ul),
            html(3, TagId::Li),
            html(4, TagId::P),
        ]);
        stack.generate_implied_end_tags_excluding(TagId::Li);
        assert_eq!(stack.current().map(|entry| entry.tag), Some(TagId::Li));
        assert_eq!(stack.take_removed(), vec![NodeId(4)]);
    }

    #[test]
    fn template_count_tracks_pushes_and_removals() {
        let mut stack = stack(&[html(1, TagId::Html), html(2, TagId::Template)]);
        assert!(stack.has_template());
        assert!(stack.remove(NodeId(2)));
        assert!(!stack.has_template());
    }

    #[test]
    fn clear_to_table_context_stops_at_table() {
        let mut stack = stack(&[
            html(1, TagId::Html),
            html(2, TagId::Table),
            html(3, TagId::Tbody),
            html(4, TagId::Tr),
        ]);
        stack.clear_to_table_context();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.take_removed(), vec![NodeId(4), NodeId(3)]);
    }
}
