//! Reconstructing formatting elements and the adoption agency algorithm.
//!
//! [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
//! [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)

use marrow_common::warning::warn_once;
use marrow_dom::{Namespace, NodeId};

use super::core::HTMLParser;
use super::formatting::ActiveFormattingElement;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

/// "4. Outer loop: If outerLoopCounter is greater than or equal to 8, then return."
const ADOPTION_OUTER_LOOP_LIMIT: usize = 8;

/// "If innerLoopCounter is greater than 3 and node is in the list of active
/// formatting elements, then remove node from the list of active formatting
/// elements."
const ADOPTION_INNER_LOOP_LIMIT: usize = 3;

/// Outcome of the adoption agency algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdoptionOutcome {
    /// The end tag was dealt with.
    Handled,
    /// "act as described in the "any other end tag" entry below"
    AnyOtherEndTag,
}

impl HTMLParser {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // "1. If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        // "2. If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in
        // the stack of open elements, then there is nothing to reconstruct;
        // stop this algorithm."
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        match last.node_id() {
            None => return,
            Some(node) if self.stack_of_open_elements.contains(node) => return,
            Some(_) => {}
        }

        // "3. Let entry be the last (most recently added) element in the list
        // of active formatting elements."
        let mut index = self.active_formatting_elements.len() - 1;

        // "4. Rewind: If there are no entries before entry in the list of
        // active formatting elements, then jump to the step labeled create."
        // "5. Let entry be the entry one earlier than entry in the list of
        // active formatting elements."
        // "6. If entry is neither a marker nor an element that is also in the
        // stack of open elements, go to the step labeled rewind."
        // "7. Advance: Let entry be the element one later than entry in the
        // list of active formatting elements."
        while index > 0 {
            let earlier = self.active_formatting_elements.get(index - 1);
            let stop = earlier.is_none_or(|entry| match entry.node_id() {
                None => true,
                Some(node) => self.stack_of_open_elements.contains(node),
            });
            if stop {
                break;
            }
            index -= 1;
        }

        // "8. Create: Insert an HTML element for the token for which the
        // element entry was created, to obtain new element."
        // "9. Replace the entry for entry in the list with an entry for new element."
        // "10. If the entry for new element in the list of active formatting
        // elements is not the last entry in the list, return to the step
        // labeled advance."
        for position in index..self.active_formatting_elements.len() {
            let Some(ActiveFormattingElement::Element { node_id, token }) =
                self.active_formatting_elements.get(position).cloned()
            else {
                continue;
            };
            let Token::StartTag {
                name, attributes, ..
            } = &token
            else {
                continue;
            };
            let new_element = self.insert_html_element(name, attributes);
            self.active_formatting_elements.replace(node_id, new_element);
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Run for an end tag whose tag name is `subject`.
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) -> AdoptionOutcome {
        // "2. If the current node is an HTML element whose tag name is subject,
        // and the current node is not in the list of active formatting
        // elements, then pop the current node off the stack of open elements
        // and return."
        if let Some(current) = self.current_node()
            && current.namespace == Namespace::Html
            && self.element_has_tag_name(current.node, subject)
            && !self.active_formatting_elements.contains(current.node)
        {
            let _ = self.stack_of_open_elements.pop();
            return AdoptionOutcome::Handled;
        }

        // "3. Let outerLoopCounter be 0."
        let mut outer_loop_counter = 0;

        loop {
            // "4. While true:"
            // "1. If outerLoopCounter is greater than or equal to 8, then return."
            if outer_loop_counter >= ADOPTION_OUTER_LOOP_LIMIT {
                let _ = warn_once(
                    "HTML Parser",
                    "adoption agency stopped after 8 iterations on misnested formatting",
                );
                return AdoptionOutcome::Handled;
            }

            // "2. Increment outerLoopCounter by 1."
            outer_loop_counter += 1;

            // "3. Let formattingElement be the last element in the list of
            // active formatting elements that: is between the end of the list
            // and the last marker in the list, if any, or the start of the list
            // otherwise, and has the tag name subject. If there is no such
            // element, then return and instead act as described in the "any
            // other end tag" entry above."
            let Some(formatting_element) = self
                .active_formatting_elements
                .element_in_scope_with_tag_name(subject)
            else {
                return AdoptionOutcome::AnyOtherEndTag;
            };

            // "4. If formattingElement is not in the stack of open elements,
            // then this is a parse error; remove the element from the list, and
            // return."
            let Some(formatting_index) = self.stack_of_open_elements.position(formatting_element)
            else {
                self.parse_error(ParseErrorCode::MisnestedFormattingElement);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return AdoptionOutcome::Handled;
            };

            // "5. If formattingElement is in the stack of open elements, but the
            // element is not in scope, then this is a parse error; return."
            if !self
                .stack_of_open_elements
                .has_node_in_scope(formatting_element)
            {
                self.parse_error(ParseErrorCode::UnexpectedEndTag);
                return AdoptionOutcome::Handled;
            }

            // "6. If formattingElement is not the current node, this is a parse
            // error. (But do not return.)"
            if self.current_node().map(|node| node.node) != Some(formatting_element) {
                self.parse_error(ParseErrorCode::MisnestedFormattingElement);
            }

            // "7. Let furthestBlock be the topmost node in the stack of open
            // elements that is lower in the stack than formattingElement, and is
            // an element in the special category. There might not be one."
            let furthest_block = self.stack_of_open_elements.as_slice()[formatting_index + 1..]
                .iter()
                .find(|entry| entry.is_special())
                .map(|entry| entry.node);

            // "8. If there is no furthestBlock, then the UA must first pop all
            // the nodes from the bottom of the stack of open elements, from the
            // current node up to and including formattingElement, then remove
            // formattingElement from the list of active formatting elements,
            // and finally return."
            let Some(furthest_block) = furthest_block else {
                self.stack_of_open_elements
                    .pop_until_node(formatting_element);
                let _ = self.active_formatting_elements.remove(formatting_element);
                return AdoptionOutcome::Handled;
            };

            // "9. Let commonAncestor be the element immediately above
            // formattingElement in the stack of open elements."
            let Some(common_ancestor) = formatting_index
                .checked_sub(1)
                .and_then(|index| self.stack_of_open_elements.get(index))
                .map(|entry| entry.node)
            else {
                return AdoptionOutcome::Handled;
            };

            // "10. Let a bookmark note the position of formattingElement in the
            // list of active formatting elements relative to the elements on
            // either side of it in the list."
            let Some(mut bookmark) = self.active_formatting_elements.position(formatting_element)
            else {
                return AdoptionOutcome::Handled;
            };

            // "11. Let node and lastNode be furthestBlock."
            let Some(mut node_index) = self.stack_of_open_elements.position(furthest_block) else {
                return AdoptionOutcome::Handled;
            };
            let mut last_node = furthest_block;

            // "12. Let innerLoopCounter be 0."
            let mut inner_loop_counter = 0;

            // "13. While true:"
            loop {
                // "1. Increment innerLoopCounter by 1."
                inner_loop_counter += 1;

                // "2. Let node be the element immediately above node in the
                // stack of open elements, or if node is no longer in the stack
                // of open elements (e.g. because it got removed by this
                // algorithm), the element that was immediately above node in
                // the stack of open elements before node was removed."
                let Some(above) = node_index.checked_sub(1) else {
                    break;
                };
                node_index = above;
                let Some(mut node) = self
                    .stack_of_open_elements
                    .get(node_index)
                    .map(|entry| entry.node)
                else {
                    break;
                };

                // "3. If node is formattingElement, then break."
                if node == formatting_element {
                    break;
                }

                // "4. If innerLoopCounter is greater than 3 and node is in the
                // list of active formatting elements, then remove node from the
                // list of active formatting elements."
                if inner_loop_counter > ADOPTION_INNER_LOOP_LIMIT
                    && let Some(position) = self.active_formatting_elements.position(node)
                {
                    let _ = self.active_formatting_elements.remove(node);
                    if position < bookmark {
                        bookmark -= 1;
                    }
                }

                // "5. If node is not in the list of active formatting elements,
                // then remove node from the stack of open elements and continue."
                let Some(position) = self.active_formatting_elements.position(node) else {
                    let _ = self.stack_of_open_elements.remove(node);
                    continue;
                };

                // "6. Create an element for the token for which the element
                // node was created, in the HTML namespace, with commonAncestor
                // as the intended parent; replace the entry for node in the
                // list of active formatting elements with an entry for the new
                // element, replace the entry for node in the stack of open
                // elements with an entry for the new element, and let node be
                // the new element."
                let Some(new_element) = self.clone_formatting_element(position) else {
                    break;
                };
                self.active_formatting_elements.replace(node, new_element);
                let entry = self.open_element_for(new_element);
                let _ = self.stack_of_open_elements.replace(node, entry);
                node = new_element;

                // "7. If lastNode is furthestBlock, then move the aforementioned
                // bookmark to be immediately after the new node in the list of
                // active formatting elements."
                if last_node == furthest_block {
                    bookmark = position + 1;
                }

                // "8. Append lastNode to node."
                self.tree.append_child(node, last_node);

                // "9. Set lastNode to node."
                last_node = node;
            }

            // "14. Insert whatever lastNode ended up being in the previous step
            // at the appropriate place for inserting a node, but using
            // commonAncestor as the override target."
            let location = self.appropriate_insertion_location(Some(common_ancestor));
            self.insert_node_at(location, last_node);

            // "15. Create an element for the token for which formattingElement
            // was created, in the HTML namespace, with furthestBlock as the
            // intended parent."
            let Some(formatting_position) =
                self.active_formatting_elements.position(formatting_element)
            else {
                return AdoptionOutcome::Handled;
            };
            let Some(new_element) = self.clone_formatting_element(formatting_position) else {
                return AdoptionOutcome::Handled;
            };

            // "16. Take all of the child nodes of furthestBlock and append them
            // to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // "17. Append that new element to furthestBlock."
            self.tree.append_child(furthest_block, new_element);

            // "18. Remove formattingElement from the list of active formatting
            // elements, and insert the new element into the list of active
            // formatting elements at the position of the aforementioned bookmark."
            if let Some(entry) = self.active_formatting_elements.remove(formatting_element) {
                if formatting_position < bookmark {
                    bookmark -= 1;
                }
                if let ActiveFormattingElement::Element { token, .. } = entry {
                    self.active_formatting_elements.insert_at(
                        bookmark,
                        ActiveFormattingElement::Element {
                            node_id: new_element,
                            token,
                        },
                    );
                }
            }

            // "19. Remove formattingElement from the stack of open elements, and
            // insert the new element into the stack of open elements
            // immediately below the position of furthestBlock in that stack."
            let _ = self.stack_of_open_elements.remove(formatting_element);
            let entry = self.open_element_for(new_element);
            let _ = self
                .stack_of_open_elements
                .insert_after(furthest_block, entry);
        }
    }

    /// Create a fresh element from the token of the formatting list entry at
    /// `position`, starting where the original started.
    fn clone_formatting_element(&mut self, position: usize) -> Option<NodeId> {
        let ActiveFormattingElement::Element { node_id, token } =
            self.active_formatting_elements.get(position)?.clone()
        else {
            return None;
        };
        let Token::StartTag {
            name, attributes, ..
        } = &token
        else {
            return None;
        };
        let element = self.create_element(name, attributes, Namespace::Html);
        if let Some(location) = self.tree.location(node_id) {
            self.tree.set_start(element, location.start);
        }
        Some(element)
    }

    /// Whether `node` is an element called `name`.
    pub(crate) fn element_has_tag_name(&self, node: NodeId, name: &str) -> bool {
        self.tree
            .as_element(node)
            .is_some_and(|element| element.tag_name == name)
    }
}
