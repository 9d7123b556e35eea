//! # Tree Mutations
//!
//! Structural edit operations on a page tree.
//!
//! ## Design Principles
//!
//! 1. **Pure**: `apply` never touches its input tree; it returns a new root
//!    that shares every untouched subtree with the old one
//! 2. **Validated**: every mutation is fully validated before anything is
//!    built, so a failed mutation has no effect at all
//! 3. **Input-agnostic**: moves are `(source, index) -> (dest, index)` pairs
//!    that a pointer drag, a keyboard shortcut or a script can all produce
//!
//! ## Mutation Semantics
//!
//! ### InsertElement
//! - Appends to the end of a container's child list
//! - Two-column containers only accept inserts into one of their columns
//!
//! ### UpdateElement
//! - Replaces `name`, `styles` and `content` of the element with the same id
//! - Never changes id, type or position
//!
//! ### DeleteElement
//! - Removes the node and all descendants
//! - The body and column slots cannot be deleted
//!
//! ### MoveElement
//! - Destination index is clamped to the destination length after removal
//! - Fails if the destination is the moved node or one of its descendants

use funnel_document::{
    collect_ids, validate_subtree, validate_tree, Element, ElementId, ElementKind, BODY_ID,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Structural operations (each one is a single undoable step)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Mutation {
    /// Append an element to a container
    #[serde(rename_all = "camelCase")]
    InsertElement {
        container_id: ElementId,
        element: Element,
    },

    /// Replace name/styles/content of the element with the same id
    UpdateElement { element: Element },

    /// Remove an element and its subtree
    #[serde(rename_all = "camelCase")]
    DeleteElement { element_id: ElementId },

    /// Move a child between (or within) containers
    #[serde(rename_all = "camelCase")]
    MoveElement {
        source_container: ElementId,
        source_index: usize,
        dest_container: ElementId,
        dest_index: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(ElementId),

    #[error("Container not found: {0}")]
    ParentNotFound(ElementId),

    #[error("Index {index} out of bounds for container {container} with {len} children")]
    IndexOutOfBounds {
        container: ElementId,
        index: usize,
        len: usize,
    },

    #[error("Element {0} cannot have children")]
    NotAContainer(ElementId),

    #[error("Moving {node} into {dest} would create a cycle")]
    CycleDetected { node: ElementId, dest: ElementId },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Element id already in use: {0}")]
    DuplicateId(ElementId),

    #[error("Element {0} cannot be removed or moved")]
    ImmutableNode(ElementId),
}

impl Mutation {
    /// Debug name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::InsertElement { .. } => "InsertElement",
            Mutation::UpdateElement { .. } => "UpdateElement",
            Mutation::DeleteElement { .. } => "DeleteElement",
            Mutation::MoveElement { .. } => "MoveElement",
        }
    }

    /// The element this mutation is addressed to.
    ///
    /// For moves that is the source container, since the moved node is only
    /// known by index until the mutation is resolved against a tree.
    pub fn target_id(&self) -> &ElementId {
        match self {
            Mutation::InsertElement { element, .. } => &element.id,
            Mutation::UpdateElement { element } => &element.id,
            Mutation::DeleteElement { element_id } => element_id,
            Mutation::MoveElement {
                source_container, ..
            } => source_container,
        }
    }

    /// Update that flips an element's layers-panel visibility
    pub fn toggle_hidden(element: &Element) -> Self {
        let display = if element.is_hidden() { "block" } else { "none" };
        let toggled = element
            .clone()
            .with_style("display", Value::String(display.to_string()));

        Mutation::UpdateElement { element: toggled }
    }

    /// Apply mutation to a tree, returning the new tree
    pub fn apply(&self, tree: &Arc<Element>) -> Result<Arc<Element>, MutationError> {
        // Validate first
        self.validate(tree)?;

        let mut next = Arc::clone(tree);
        let root = Arc::make_mut(&mut next);

        match self {
            Mutation::InsertElement {
                container_id,
                element,
            } => Self::apply_insert(root, container_id, element)?,

            Mutation::UpdateElement { element } => Self::apply_update(root, element)?,

            Mutation::DeleteElement { element_id } => {
                Self::remove_from_parent(root, element_id)?;
            }

            Mutation::MoveElement {
                source_container,
                source_index,
                dest_container,
                dest_index,
            } => Self::apply_move(
                root,
                source_container,
                *source_index,
                dest_container,
                *dest_index,
            )?,
        }

        Ok(next)
    }

    fn apply_insert(
        root: &mut Element,
        container_id: &ElementId,
        element: &Element,
    ) -> Result<(), MutationError> {
        let container = root
            .find_mut(container_id.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(container_id.clone()))?;

        let children = container
            .children_mut()
            .ok_or_else(|| MutationError::NotAContainer(container_id.clone()))?;

        children.push(Arc::new(element.clone()));
        Ok(())
    }

    fn apply_update(root: &mut Element, element: &Element) -> Result<(), MutationError> {
        let node = root
            .find_mut(element.id.as_str())
            .ok_or_else(|| MutationError::NodeNotFound(element.id.clone()))?;

        node.name = element.name.clone();
        node.styles = element.styles.clone();
        node.content = element.content.clone();
        Ok(())
    }

    fn apply_move(
        root: &mut Element,
        source_container: &ElementId,
        source_index: usize,
        dest_container: &ElementId,
        dest_index: usize,
    ) -> Result<(), MutationError> {
        let source = root
            .find_mut(source_container.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(source_container.clone()))?;

        let children = source
            .children_mut()
            .ok_or_else(|| MutationError::NotAContainer(source_container.clone()))?;

        if source_index >= children.len() {
            return Err(MutationError::IndexOutOfBounds {
                container: source_container.clone(),
                index: source_index,
                len: children.len(),
            });
        }
        let node = children.remove(source_index);

        // Paths may have shifted after the removal, so look the destination up again
        let dest = root
            .find_mut(dest_container.as_str())
            .ok_or_else(|| MutationError::ParentNotFound(dest_container.clone()))?;

        let children = dest
            .children_mut()
            .ok_or_else(|| MutationError::NotAContainer(dest_container.clone()))?;

        let insert_index = dest_index.min(children.len());
        children.insert(insert_index, node);
        Ok(())
    }

    /// Remove an element from its parent and return it
    fn remove_from_parent(
        root: &mut Element,
        node_id: &ElementId,
    ) -> Result<Arc<Element>, MutationError> {
        let mut path = root
            .path_to(node_id.as_str())
            .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;

        let index = path
            .pop()
            .ok_or_else(|| MutationError::ImmutableNode(node_id.clone()))?;

        let children = root
            .get_path_mut(&path)
            .and_then(Element::children_mut)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))?;

        Ok(children.remove(index))
    }

    /// Validate without applying
    pub fn validate(&self, tree: &Element) -> Result<(), MutationError> {
        match self {
            Mutation::InsertElement {
                container_id,
                element,
            } => {
                // Check container exists and accepts children
                let container = tree
                    .find(container_id.as_str())
                    .ok_or_else(|| MutationError::ParentNotFound(container_id.clone()))?;

                if !container.is_container() {
                    return Err(MutationError::NotAContainer(container_id.clone()));
                }

                if container.kind.column_slots().is_some() {
                    return Err(MutationError::InvalidStructure(format!(
                        "columns of {} are fixed, insert into one of its columns instead",
                        container_id
                    )));
                }

                validate_subtree(element)
                    .map_err(|e| MutationError::InvalidStructure(e.to_string()))?;

                // Check the new subtree does not reuse ids
                let incoming = collect_ids(element);
                if let Some(duplicate) = incoming.duplicate {
                    return Err(MutationError::DuplicateId(duplicate));
                }

                let existing = collect_ids(tree).ids;
                if let Some(taken) = incoming.ids.iter().find(|id| existing.contains(*id)) {
                    return Err(MutationError::DuplicateId(taken.clone()));
                }

                Ok(())
            }

            Mutation::UpdateElement { element } => {
                let current = tree
                    .find(element.id.as_str())
                    .ok_or_else(|| MutationError::NodeNotFound(element.id.clone()))?;

                if current.kind != element.kind {
                    return Err(MutationError::InvalidStructure(format!(
                        "cannot change type of {} from {} to {}",
                        element.id, current.kind, element.kind
                    )));
                }

                let shape = if element.kind == ElementKind::Body {
                    validate_tree(element)
                } else {
                    validate_subtree(element)
                };
                shape.map_err(|e| MutationError::InvalidStructure(e.to_string()))?;

                // Ids inside the replacement may only collide with ids it replaces
                let incoming = collect_ids(element);
                if let Some(duplicate) = incoming.duplicate {
                    return Err(MutationError::DuplicateId(duplicate));
                }

                let replaced = collect_ids(current).ids;
                let clash = collect_ids(tree)
                    .ids
                    .into_iter()
                    .filter(|id| !replaced.contains(id))
                    .find(|id| incoming.ids.contains(id));

                match clash {
                    Some(id) => Err(MutationError::DuplicateId(id)),
                    None => Ok(()),
                }
            }

            Mutation::DeleteElement { element_id } => {
                if element_id.as_str() == BODY_ID {
                    return Err(MutationError::ImmutableNode(element_id.clone()));
                }

                let (parent, _) = tree
                    .find_parent(element_id.as_str())
                    .ok_or_else(|| MutationError::NodeNotFound(element_id.clone()))?;

                // Column slots are part of their two-column container
                if parent.kind.column_slots().is_some() {
                    return Err(MutationError::ImmutableNode(element_id.clone()));
                }

                Ok(())
            }

            Mutation::MoveElement {
                source_container,
                source_index,
                dest_container,
                ..
            } => {
                // Check source exists and has the child
                let source = tree
                    .find(source_container.as_str())
                    .ok_or_else(|| MutationError::ParentNotFound(source_container.clone()))?;

                let children = source
                    .children()
                    .ok_or_else(|| MutationError::NotAContainer(source_container.clone()))?;

                let node = children.get(*source_index).ok_or_else(|| {
                    MutationError::IndexOutOfBounds {
                        container: source_container.clone(),
                        index: *source_index,
                        len: children.len(),
                    }
                })?;

                // Check destination exists and accepts children
                let dest = tree
                    .find(dest_container.as_str())
                    .ok_or_else(|| MutationError::ParentNotFound(dest_container.clone()))?;

                if !dest.is_container() {
                    return Err(MutationError::NotAContainer(dest_container.clone()));
                }

                // Check wouldn't create cycle
                if node.id == *dest_container || node.has_descendant(dest_container.as_str()) {
                    return Err(MutationError::CycleDetected {
                        node: node.id.clone(),
                        dest: dest_container.clone(),
                    });
                }

                // Columns can be swapped within their container but never leave it
                let touches_columns =
                    source.kind.column_slots().is_some() || dest.kind.column_slots().is_some();
                if touches_columns && source_container != dest_container {
                    return Err(MutationError::InvalidStructure(format!(
                        "cannot move {} across two-column boundary {} -> {}",
                        node.id, source_container, dest_container
                    )));
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use funnel_document::LeafContent;
    use pretty_assertions::assert_eq;

    fn tree() -> Arc<Element> {
        Arc::new(
            Element::body()
                .with_child(
                    Element::new("hero", ElementKind::Text)
                        .with_leaf(LeafContent::text("Hello")),
                )
                .with_child(
                    Element::new("box", ElementKind::Container)
                        .with_child(Element::new("inner", ElementKind::Container)),
                ),
        )
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveElement {
            source_container: "box".into(),
            source_index: 0,
            dest_container: BODY_ID.into(),
            dest_index: 1,
        };

        let json = serde_json::to_string(&mutation).unwrap();
        assert!(json.contains("sourceContainer"));
        let deserialized: Mutation = serde_json::from_str(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let before = tree();
        let mutation = Mutation::DeleteElement {
            element_id: "hero".into(),
        };

        let after = mutation.apply(&before).unwrap();

        assert!(before.find("hero").is_some());
        assert!(after.find("hero").is_none());
        // The untouched container is shared, not copied
        assert!(Arc::ptr_eq(
            &before.children().unwrap()[1],
            &after.children().unwrap()[0]
        ));
    }

    #[test]
    fn test_validation_rejects_empty_ids() {
        let mutation = Mutation::DeleteElement {
            element_id: "".into(),
        };
        assert!(mutation.validate(&tree()).is_err());
    }

    #[test]
    fn test_insert_into_leaf_rejected() {
        let mutation = Mutation::InsertElement {
            container_id: "hero".into(),
            element: Element::new("new", ElementKind::Text),
        };
        assert_eq!(
            mutation.apply(&tree()).unwrap_err(),
            MutationError::NotAContainer("hero".into())
        );
    }

    #[test]
    fn test_insert_rejects_reused_id() {
        let mutation = Mutation::InsertElement {
            container_id: BODY_ID.into(),
            element: Element::new("inner", ElementKind::Image),
        };
        assert_eq!(
            mutation.apply(&tree()).unwrap_err(),
            MutationError::DuplicateId("inner".into())
        );
    }

    #[test]
    fn test_move_into_own_descendant_rejected() {
        let mutation = Mutation::MoveElement {
            source_container: BODY_ID.into(),
            source_index: 1,
            dest_container: "inner".into(),
            dest_index: 0,
        };
        assert_eq!(
            mutation.apply(&tree()).unwrap_err(),
            MutationError::CycleDetected {
                node: "box".into(),
                dest: "inner".into()
            }
        );
    }

    #[test]
    fn test_move_into_itself_rejected() {
        let mutation = Mutation::MoveElement {
            source_container: BODY_ID.into(),
            source_index: 1,
            dest_container: "box".into(),
            dest_index: 0,
        };
        assert!(matches!(
            mutation.validate(&tree()),
            Err(MutationError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_move_clamps_destination_index() {
        let mutation = Mutation::MoveElement {
            source_container: BODY_ID.into(),
            source_index: 0,
            dest_container: BODY_ID.into(),
            dest_index: 99,
        };

        let after = mutation.apply(&tree()).unwrap();
        let ids: Vec<_> = after
            .children()
            .unwrap()
            .iter()
            .map(|c| c.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["box", "hero"]);
    }

    #[test]
    fn test_update_cannot_change_type() {
        let mutation = Mutation::UpdateElement {
            element: Element::new("hero", ElementKind::Image),
        };
        assert!(matches!(
            mutation.validate(&tree()),
            Err(MutationError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_update_keeps_position() {
        let updated = tree().find("hero").unwrap().clone().with_style("color", "red");
        let after = Mutation::UpdateElement { element: updated }
            .apply(&tree())
            .unwrap();

        let first = &after.children().unwrap()[0];
        assert_eq!(first.id.as_str(), "hero");
        assert_eq!(first.styles["color"], "red");
    }

    #[test]
    fn test_body_cannot_be_deleted() {
        let mutation = Mutation::DeleteElement {
            element_id: BODY_ID.into(),
        };
        assert_eq!(
            mutation.validate(&tree()).unwrap_err(),
            MutationError::ImmutableNode(BODY_ID.into())
        );
    }

    #[test]
    fn test_toggle_hidden_round_trips() {
        let hero = tree().find("hero").unwrap().clone();

        let Mutation::UpdateElement { element: hidden } = Mutation::toggle_hidden(&hero) else {
            panic!("expected update");
        };
        assert!(hidden.is_hidden());

        let Mutation::UpdateElement { element: shown } = Mutation::toggle_hidden(&hidden) else {
            panic!("expected update");
        };
        assert!(!shown.is_hidden());
    }

    #[test]
    fn test_target_id_names_addressed_element() {
        let moved = Mutation::MoveElement {
            source_container: "box".into(),
            source_index: 0,
            dest_container: BODY_ID.into(),
            dest_index: 0,
        };
        let deleted = Mutation::DeleteElement {
            element_id: "hero".into(),
        };

        assert_eq!(moved.target_id().as_str(), "box");
        assert_eq!(deleted.target_id().as_str(), "hero");
    }
}
