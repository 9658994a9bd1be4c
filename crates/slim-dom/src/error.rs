//! Tree errors

use std::fmt;

use crate::{NodeId, Shape};

/// A structural capability that only some shapes carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ChildList,
    AttributeMap,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::ChildList => f.write_str("child list"),
            Capability::AttributeMap => f.write_str("attribute map"),
        }
    }
}

/// Errors raised by tree operations
///
/// Every variant is fatal to the operation that raised it. Operations
/// validate before mutating, so the tree is unchanged on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {node} is {found}, expected {expected}")]
    ShapeMismatch {
        node: NodeId,
        expected: Shape,
        found: Shape,
    },

    #[error("Node {node} is {shape}, which has no {capability}")]
    StructuralViolation {
        node: NodeId,
        shape: Shape,
        capability: Capability,
    },

    #[error("Reference node {reference} is not a child of {parent}")]
    ReferenceNotFound { parent: NodeId, reference: NodeId },

    #[error("Node {node} is already detached")]
    AlreadyDetached { node: NodeId },

    #[error("Node {node} is already a child of {parent}")]
    AlreadyAttached { node: NodeId, parent: NodeId },

    #[error("Node {node} cannot be placed under {parent}, which is itself or inside it")]
    HierarchyViolation { node: NodeId, parent: NodeId },

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
}
