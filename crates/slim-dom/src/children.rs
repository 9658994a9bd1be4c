//! Child-list access
//!
//! Elements, documents and fragments own an ordered child list. Documents
//! and fragments always have one; an element grows its list the first time
//! a caller asks for it mutably. Every other shape has no child list and
//! the accessors return `None`.

use crate::{NodeData, NodeId};

/// Read the child list without creating it
///
/// An element that never had children reads as an empty slice.
pub fn child_list(data: &NodeData) -> Option<&[NodeId]> {
    match data {
        NodeData::Document { children, .. } | NodeData::DocumentFragment { children } => {
            Some(children.as_slice())
        }
        NodeData::Element { children, .. } => Some(children.as_deref().unwrap_or(&[])),
        _ => None,
    }
}

/// Mutable child list, created empty on first use for elements
pub fn child_list_mut(data: &mut NodeData) -> Option<&mut Vec<NodeId>> {
    match data {
        NodeData::Document { children, .. } | NodeData::DocumentFragment { children } => {
            Some(children)
        }
        NodeData::Element { children, .. } => Some(children.get_or_insert_with(Vec::new)),
        _ => None,
    }
}

/// Replace the child list; `false` if the shape has none
pub fn set_child_list(data: &mut NodeData, new_children: Vec<NodeId>) -> bool {
    match child_list_mut(data) {
        Some(children) => {
            *children = new_children;
            true
        }
        None => false,
    }
}

/// Whether an element has materialised its child slot
pub fn has_child_slot(data: &NodeData) -> bool {
    match data {
        NodeData::Element { children, .. } => children.is_some(),
        other => other.shape().has_child_list(),
    }
}
