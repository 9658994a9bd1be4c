//! DOM Node - Tagged representation
//!
//! Each node carries its shape as an enum discriminant, so classifying a
//! node is a single match. Element slots that are created on demand
//! (attributes, children) are kept as `Option` so a node only grows the
//! slots it has actually been asked for.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AttrMap, NodeId};

/// The kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Element,
    Text,
    Comment,
    ProcessingInstruction,
    Document,
    DocumentType,
    DocumentFragment,
}

impl Shape {
    /// Whether nodes of this shape own a child list
    #[inline]
    pub fn has_child_list(self) -> bool {
        matches!(self, Shape::Element | Shape::Document | Shape::DocumentFragment)
    }

    /// Lower-case DOM name of the shape
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Element => "element",
            Shape::Text => "text",
            Shape::Comment => "comment",
            Shape::ProcessingInstruction => "processing instruction",
            Shape::Document => "document",
            Shape::DocumentType => "document type",
            Shape::DocumentFragment => "document fragment",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (None while unattached)
    pub parent: Option<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create an unattached node
    pub fn new(data: NodeData) -> Self {
        Self { parent: None, data }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.data.shape()
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        self.shape() == Shape::Element
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        self.shape() == Shape::Text
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root; the child list always exists
    Document {
        mode: String,
        children: Vec<NodeId>,
    },
    /// Parentless container of children
    DocumentFragment { children: Vec<NodeId> },
    /// DOCTYPE
    DocumentType {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element with lazily created attribute and child slots
    Element {
        name: String,
        attrs: Option<AttrMap>,
        children: Option<Vec<NodeId>>,
    },
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Processing instruction
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    /// Classify this node
    pub fn shape(&self) -> Shape {
        match self {
            NodeData::Document { .. } => Shape::Document,
            NodeData::DocumentFragment { .. } => Shape::DocumentFragment,
            NodeData::DocumentType { .. } => Shape::DocumentType,
            NodeData::Element { .. } => Shape::Element,
            NodeData::Text(_) => Shape::Text,
            NodeData::Comment(_) => Shape::Comment,
            NodeData::ProcessingInstruction { .. } => Shape::ProcessingInstruction,
        }
    }

    /// Element with no attribute or child slot yet
    pub fn element(name: impl Into<String>) -> Self {
        NodeData::Element {
            name: name.into(),
            attrs: None,
            children: None,
        }
    }

    pub fn document() -> Self {
        NodeData::Document {
            mode: String::new(),
            children: Vec::new(),
        }
    }

    pub fn fragment() -> Self {
        NodeData::DocumentFragment {
            children: Vec::new(),
        }
    }
}
