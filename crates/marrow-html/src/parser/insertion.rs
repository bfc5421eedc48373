//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//!
//! Node creation, the appropriate place for inserting a node (including
//! foster parenting), and the shared algorithms the insertion modes lean on.

use marrow_dom::{AttributesMap, ElementData, Namespace, NodeId, NodeType};

use super::core::{HTMLParser, InsertionMode};
use super::open_elements::OpenElement;
use super::tag::TagId;
use crate::error::ParseErrorCode;
use crate::tokenizer::{Attribute, TokenizerState};

/// Where a node goes: a parent, and the child to insert before (or `None` to append).
pub(crate) type InsertionLocation = (NodeId, Option<NodeId>);

impl HTMLParser {
    // =========================================================================
    // Current node
    // =========================================================================

    /// "The current node is the bottommost node in this stack of open elements."
    pub(crate) fn current_node(&self) -> Option<OpenElement> {
        self.stack_of_open_elements.current().copied()
    }

    /// Whether the current node is the HTML element `tag`.
    pub(crate) fn current_node_is(&self, tag: TagId) -> bool {
        self.current_node().is_some_and(|node| node.is_html(tag))
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(crate) fn adjusted_current_node(&self) -> Option<OpenElement> {
        if let Some(context) = self.context_element
            && self.stack_of_open_elements.len() == 1
        {
            return Some(context);
        }
        self.current_node()
    }

    /// Push `node` onto the stack of open elements.
    pub(crate) fn push_open_element(&mut self, node: NodeId) {
        let entry = self.open_element_for(node);
        self.stack_of_open_elements.push(entry);
    }

    /// Stack entry describing `node`.
    pub(crate) fn open_element_for(&self, node: NodeId) -> OpenElement {
        let (tag, namespace) = self
            .tree
            .as_element(node)
            .map_or((TagId::Unknown, Namespace::Html), |element| {
                (TagId::from_name(&element.tag_name), element.namespace)
            });
        OpenElement {
            node,
            tag,
            namespace,
        }
    }

    // =========================================================================
    // Insertion location
    // =========================================================================

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    pub(crate) fn appropriate_insertion_location(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // "1. If there was an override target specified, then let target be
        // the override target. Otherwise, let target be the current node."
        let target = override_target
            .map(|node| self.open_element_for(node))
            .or_else(|| self.current_node());
        let Some(target) = target else {
            return (self.tree.root(), None);
        };

        // "2. Determine the adjusted insertion location using the first
        // matching steps from the following list:"
        // "If foster parenting is enabled and target is a table, tbody, tfoot,
        // thead, or tr element"
        if self.foster_parenting
            && target.is_html_one_of(&[
                TagId::Table,
                TagId::Tbody,
                TagId::Tfoot,
                TagId::Thead,
                TagId::Tr,
            ])
        {
            return self.foster_parent_location();
        }

        // "Otherwise: Let adjusted insertion location be inside target, after
        // its last child (if any)."
        //
        // "3. If the adjusted insertion location is inside a template element,
        // let it instead be inside the template element's template contents"
        // Template contents are kept as the template element's children.
        (target.node, None)
    }

    /// The foster parenting branch of the appropriate place for inserting a node.
    fn foster_parent_location(&self) -> InsertionLocation {
        let stack = self.stack_of_open_elements.as_slice();

        // "1. Let last template be the last template element in the stack of
        // open elements, if any."
        let last_template = stack
            .iter()
            .rposition(|entry| entry.is_html(TagId::Template));
        // "2. Let last table be the last table element in the stack of open
        // elements, if any."
        let last_table = stack.iter().rposition(|entry| entry.is_html(TagId::Table));

        // "3. If there is a last template and either there is no last table,
        // or there is one, but last template is lower (more recently added)
        // than last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents,
        // after its last child (if any), and abort these steps."
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
        {
            return (stack[template_index].node, None);
        }

        // "4. If there is no last table, then let adjusted insertion location
        // be inside the first element in the stack of open elements (the html
        // element), after its last child (if any), and abort these steps.
        // (fragment case)"
        let Some(table_index) = last_table else {
            return (
                stack.first().map_or(self.tree.root(), |entry| entry.node),
                None,
            );
        };
        let table = stack[table_index].node;

        // "5. If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table, and abort these steps."
        if let Some(parent) = self.tree.parent(table) {
            return (parent, Some(table));
        }

        // "6. Let previous element be the element immediately above last table
        // in the stack of open elements."
        // "7. Let adjusted insertion location be inside previous element,
        // after its last child (if any)."
        let previous = table_index
            .checked_sub(1)
            .map_or(self.tree.root(), |index| stack[index].node);
        (previous, None)
    }

    /// Insert `node` at `location`.
    pub(crate) fn insert_node_at(&mut self, location: InsertionLocation, node: NodeId) {
        match location {
            (parent, Some(reference)) => self.tree.insert_before(parent, node, reference),
            (parent, None) => self.tree.append_child(parent, node),
        }
    }

    // =========================================================================
    // Creating elements
    // =========================================================================

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// The element is created detached; its source location starts at the
    /// current token.
    pub(crate) fn create_element(
        &mut self,
        local_name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
    ) -> NodeId {
        let mut attrs = AttributesMap::new();
        for attribute in attributes {
            let _ = attrs.insert_if_absent(&attribute.name, &attribute.value);
        }
        let node = self.tree.alloc(NodeType::Element(ElementData::new(
            local_name, namespace, attrs,
        )));
        if self.tracks_locations() {
            self.tree.set_start(node, self.current_span.start);
        }
        self.last_created_element = Some(node);
        node
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    pub(crate) fn insert_foreign_element(
        &mut self,
        local_name: &str,
        attributes: &[Attribute],
        namespace: Namespace,
        only_add_to_element_stack: bool,
    ) -> NodeId {
        // "1. Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let location = self.appropriate_insertion_location(None);

        // "2. Let element be the result of creating an element for the token
        // in the given namespace, with the intended parent being the element in
        // which the adjusted insertion location finds itself."
        let element = self.create_element(local_name, attributes, namespace);

        // "3. If onlyAddToElementStack is false, then run insert an element at
        // the adjusted insertion location with element."
        if !only_add_to_element_stack {
            self.insert_node_at(location, element);
        }

        // "4. Push element onto the stack of open elements so that it is the
        // new current node."
        self.push_open_element(element);

        // "5. Return element."
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the
    /// token, with the HTML namespace and false."
    pub(crate) fn insert_html_element(&mut self, name: &str, attributes: &[Attribute]) -> NodeId {
        self.insert_foreign_element(name, attributes, Namespace::Html, false)
    }

    /// Insert an HTML element for a start tag the parser implies (`html`,
    /// `head`, `body`, `tbody`, `tr`, `colgroup`, `p`, ...).
    pub(crate) fn insert_implied_html_element(&mut self, name: &str) -> NodeId {
        self.insert_html_element(name, &[])
    }

    /// Add every attribute in `attributes` that `node` does not already have.
    pub(crate) fn merge_attributes(&mut self, node: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(node) {
            for attribute in attributes {
                let _ = element
                    .attrs
                    .insert_if_absent(&attribute.name, &attribute.value);
            }
        }
    }

    // =========================================================================
    // Character and comment insertion
    // =========================================================================

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(crate) fn insert_characters(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }

        // "2. Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let (parent, before) = self.appropriate_insertion_location(None);

        // "3. If the adjusted insertion location is inside a Document node,
        // then ignore the token."
        if matches!(
            self.tree.get(parent).map(|node| &node.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        // "4. If there is a Text node immediately before the adjusted insertion
        // location, then append data to that Text node's data."
        let previous = match before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(parent),
        };
        if let Some(previous) = previous
            && let Some(node) = self.tree.get_mut(previous)
            && let NodeType::Text(text) = &mut node.node_type
        {
            text.push_str(data);
            if self.tracks_locations() {
                self.tree.set_end(previous, self.current_span.end);
            }
            return;
        }

        // "5. Otherwise, create a new Text node whose data is data and whose
        // node document is the same as that of the element in which the
        // adjusted insertion location finds itself, and insert the newly
        // created node at the adjusted insertion location."
        let text = self.tree.alloc(NodeType::Text(data.to_string()));
        self.record_span(text);
        self.insert_node_at((parent, before), text);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    pub(crate) fn insert_comment(&mut self, data: &str, position: Option<InsertionLocation>) {
        // "2. If position was specified, then let the adjusted insertion
        // location be position. Otherwise, let adjusted insertion location be
        // the appropriate place for inserting a node."
        let location = position.unwrap_or_else(|| self.appropriate_insertion_location(None));

        // "3. Create a Comment node whose data attribute is set to data"
        let comment = self.tree.alloc(NodeType::Comment(data.to_string()));
        self.record_span(comment);

        // "4. Insert the newly created node at the adjusted insertion location."
        self.insert_node_at(location, comment);
    }

    /// Give a leaf node the current token's span.
    pub(crate) fn record_span(&mut self, node: NodeId) {
        if self.tracks_locations() {
            self.tree.set_start(node, self.current_span.start);
            self.tree.set_end(node, self.current_span.end);
        }
    }

    // =========================================================================
    // Shared algorithms
    // =========================================================================

    /// [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "The generic raw text element parsing algorithm and the generic RCDATA
    /// element parsing algorithm consist of the following steps."
    pub(crate) fn parse_text_only_element(
        &mut self,
        name: &str,
        attributes: &[Attribute],
        state: TokenizerState,
    ) {
        // "1. Insert an HTML element for the token."
        let _ = self.insert_html_element(name, attributes);

        // "2. If the algorithm that was invoked is the generic raw text element
        // parsing algorithm, switch the tokenizer to the RAWTEXT state;
        // otherwise the algorithm invoked was the generic RCDATA element
        // parsing algorithm, switch the tokenizer to the RCDATA state."
        self.tokenizer.set_state(state);
        self.tokenizer.set_last_start_tag(Some(name.to_string()));

        // "3. Set the original insertion mode to the current insertion mode."
        self.original_insertion_mode = Some(self.insertion_mode);

        // "4. Then, switch the insertion mode to "text"."
        self.switch_to(InsertionMode::Text);
    }

    /// [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "When the steps above say the user agent is to close a p element, it
    /// means that the user agent must generate implied end tags, except for p
    /// elements. If the current node is not a p element, then this is a parse
    /// error. Pop elements from the stack of open elements until a p element
    /// has been popped from the stack."
    pub(crate) fn close_p_element(&mut self) {
        self.stack_of_open_elements
            .generate_implied_end_tags_excluding(TagId::P);
        if !self.current_node_is(TagId::P) {
            self.parse_error(ParseErrorCode::EndTagWithOpenChildElements);
        }
        self.stack_of_open_elements.pop_until_tag(TagId::P);
    }

    /// Close a `p` element if one is in button scope.
    pub(crate) fn close_p_element_in_button_scope(&mut self) {
        if self.stack_of_open_elements.has_in_button_scope(TagId::P) {
            self.close_p_element();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        let stack = self.stack_of_open_elements.as_slice();
        if stack.is_empty() {
            self.switch_to(InsertionMode::InBody);
            return;
        }

        // "1. Let last be false."
        let mut last = false;
        // "2. Let node be the last node in the stack of open elements."
        let mut index = stack.len() - 1;

        let mode = 'reset: loop {
            // "3. Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created
            // as part of the HTML fragment parsing algorithm (fragment case),
            // set node to the context element passed to that algorithm."
            let mut node = stack[index];
            if index == 0 {
                last = true;
                if let Some(context) = self.context_element {
                    node = context;
                }
            }

            if node.namespace == Namespace::Html {
                match node.tag {
                    // "4. If node is a select element, run these substeps:"
                    TagId::Select => {
                        // "1. If last is true, jump to the step below labeled done."
                        if !last {
                            // "2. Let ancestor be node."
                            // "3. Loop: If ancestor is the first node in the
                            // stack of open elements, jump to the step below
                            // labeled done."
                            // "4. Let ancestor be the node before ancestor in
                            // the stack of open elements."
                            // "5. If ancestor is a template node, jump to the
                            // step below labeled done."
                            // "6. If ancestor is a table node, switch the
                            // insertion mode to "in select in table" and return."
                            for ancestor in stack[..index].iter().rev() {
                                if ancestor.is_html(TagId::Template) {
                                    break;
                                }
                                if ancestor.is_html(TagId::Table) {
                                    break 'reset InsertionMode::InSelectInTable;
                                }
                            }
                        }
                        // "8. Done: Switch the insertion mode to "in select" and return."
                        break InsertionMode::InSelect;
                    }
                    // "5. If node is a td or th element and last is false, then
                    // switch the insertion mode to "in cell" and return."
                    TagId::Td | TagId::Th if !last => break InsertionMode::InCell,
                    // "6. If node is a tr element, then switch the insertion
                    // mode to "in row" and return."
                    TagId::Tr => break InsertionMode::InRow,
                    // "7. If node is a tbody, thead, or tfoot element, then
                    // switch the insertion mode to "in table body" and return."
                    TagId::Tbody | TagId::Thead | TagId::Tfoot => {
                        break InsertionMode::InTableBody;
                    }
                    // "8. If node is a caption element, then switch the
                    // insertion mode to "in caption" and return."
                    TagId::Caption => break InsertionMode::InCaption,
                    // "9. If node is a colgroup element, then switch the
                    // insertion mode to "in column group" and return."
                    TagId::Colgroup => break InsertionMode::InColumnGroup,
                    // "10. If node is a table element, then switch the
                    // insertion mode to "in table" and return."
                    TagId::Table => break InsertionMode::InTable,
                    // "11. If node is a template element, then switch the
                    // insertion mode to the current template insertion mode and
                    // return."
                    TagId::Template => {
                        break self
                            .template_insertion_modes
                            .last()
                            .copied()
                            .unwrap_or(InsertionMode::InTemplate);
                    }
                    // "12. If node is a head element and last is false, then
                    // switch the insertion mode to "in head" and return."
                    TagId::Head if !last => break InsertionMode::InHead,
                    // "13. If node is a body element, then switch the insertion
                    // mode to "in body" and return."
                    TagId::Body => break InsertionMode::InBody,
                    // "14. If node is a frameset element, then switch the
                    // insertion mode to "in frameset" and return. (fragment case)"
                    TagId::Frameset => break InsertionMode::InFrameset,
                    // "15. If node is an html element, run these substeps:"
                    TagId::Html => {
                        // "1. If the head element pointer is null, switch the
                        // insertion mode to "before head" and return.
                        // (fragment case)"
                        // "2. Otherwise, the head element pointer is not null,
                        // switch the insertion mode to "after head" and return."
                        break if self.head_element_pointer.is_none() {
                            InsertionMode::BeforeHead
                        } else {
                            InsertionMode::AfterHead
                        };
                    }
                    _ => {}
                }
            }

            // "16. If last is true, then switch the insertion mode to "in body"
            // and return. (fragment case)"
            if last {
                break InsertionMode::InBody;
            }

            // "17. Let node now be the node before node in the stack of open elements."
            // "18. Return to the step labeled loop."
            index -= 1;
        };
        self.switch_to(mode);
    }
}
