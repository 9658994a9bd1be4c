//! Tree Adapter
//!
//! The operation set an HTML tree builder drives while it consumes tokens:
//! node creation, linking, text coalescing, doctype handling, attribute
//! adoption and read accessors. The adapter owns the whole arena; node ids
//! handed out by one adapter mean nothing to another.
//!
//! Every mutating operation validates its inputs before touching the tree,
//! so a failed call leaves the tree as it was.

use serde_json::Value;

use crate::attrs::{self, Attr, AttrMap};
use crate::children;
use crate::compact::{self, CompactError};
use crate::{Capability, DomError, DomTree, NodeData, NodeId, Shape};

/// The one namespace reported for every element
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Tree-construction adapter over an arena of compact nodes
#[derive(Debug, Clone, Default)]
pub struct TreeAdapter {
    tree: DomTree,
}

fn mismatch(node: NodeId, expected: Shape, found: &NodeData) -> DomError {
    DomError::ShapeMismatch {
        node,
        expected,
        found: found.shape(),
    }
}

impl TreeAdapter {
    /// Create an adapter with an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an adapter from the compact encoding, returning the root id
    pub fn from_compact(value: &Value) -> Result<(Self, NodeId), CompactError> {
        let (tree, root) = compact::from_compact(value)?;
        Ok((Self { tree }, root))
    }

    /// Encode the subtree under `root` in the compact encoding
    pub fn to_compact(&self, root: NodeId) -> Result<Value, DomError> {
        compact::to_compact(&self.tree, root)
    }

    /// The underlying arena
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    pub fn shape(&self, node: NodeId) -> Result<Shape, DomError> {
        self.tree.shape(node)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a document with an empty mode and an empty child list
    pub fn create_document(&mut self) -> NodeId {
        let id = self.tree.insert(NodeData::document());
        tracing::trace!("create_document -> {}", id);
        id
    }

    pub fn create_document_fragment(&mut self) -> NodeId {
        self.tree.insert(NodeData::fragment())
    }

    /// Create an element
    ///
    /// The tag name is lower-cased. The namespace is accepted for protocol
    /// compatibility but not stored: every element reports
    /// [`HTML_NAMESPACE`]. A non-empty attribute list becomes the initial
    /// attribute map.
    pub fn create_element<I>(&mut self, tag_name: &str, _namespace_uri: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = Attr>,
    {
        let attrs = AttrMap::from_pairs(attrs);
        let id = self.tree.insert(NodeData::Element {
            name: tag_name.to_lowercase(),
            attrs: (!attrs.is_empty()).then_some(attrs),
            children: None,
        });
        tracing::trace!("create_element <{}> -> {}", tag_name, id);
        id
    }

    pub fn create_comment_node(&mut self, data: &str) -> NodeId {
        self.tree.insert(NodeData::Comment(data.to_owned()))
    }

    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        self.tree.insert(NodeData::ProcessingInstruction {
            target: target.to_owned(),
            data: data.to_owned(),
        })
    }

    // ------------------------------------------------------------------
    // Linking
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.children_of(parent)?;
        self.ensure_unattached(child)?;
        self.ensure_not_ancestor(child, parent)?;

        self.children_of_mut(parent)?.push(child);
        self.set_parent(child, Some(parent))?;
        tracing::trace!("append_child {} -> {}", child, parent);
        Ok(())
    }

    /// Insert `new_node` immediately before `reference` in `parent`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_node: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        let index = self.position_of(parent, reference)?;
        self.ensure_unattached(new_node)?;
        self.ensure_not_ancestor(new_node, parent)?;

        self.children_of_mut(parent)?.insert(index, new_node);
        self.set_parent(new_node, Some(parent))?;
        tracing::trace!("insert_before {} -> {} (before {})", new_node, parent, reference);
        Ok(())
    }

    /// Remove `node` from its parent and return it for reuse
    pub fn detach_node(&mut self, node: NodeId) -> Result<NodeId, DomError> {
        let parent = self
            .tree
            .node(node)?
            .parent
            .ok_or(DomError::AlreadyDetached { node })?;

        self.children_of_mut(parent)?.retain(|&child| child != node);
        self.set_parent(node, None)?;
        tracing::trace!("detach_node {} from {}", node, parent);
        Ok(node)
    }

    /// Move every child of `node`, in order, to the end of `new_parent`
    ///
    /// `new_parent` must lie outside `node`'s subtree.
    pub fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) -> Result<(), DomError> {
        let moving = self.children_of(node)?.to_vec();
        self.children_of(new_parent)?;
        self.ensure_not_ancestor(node, new_parent)?;

        for child in moving {
            self.detach_node(child)?;
            self.append_child(new_parent, child)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Install a fragment's children as a template's content
    ///
    /// Template content is the element's own child list. The fragment is
    /// left empty; any previous template children become unattached.
    pub fn set_template_content(&mut self, template: NodeId, fragment: NodeId) -> Result<(), DomError> {
        let template_data = &self.tree.node(template)?.data;
        if template_data.shape() != Shape::Element {
            return Err(mismatch(template, Shape::Element, template_data));
        }
        let fragment_data = &self.tree.node(fragment)?.data;
        if fragment_data.shape() != Shape::DocumentFragment {
            return Err(mismatch(fragment, Shape::DocumentFragment, fragment_data));
        }
        self.ensure_not_ancestor(fragment, template)?;

        let content = std::mem::take(self.children_of_mut(fragment)?);
        let previous = std::mem::replace(self.children_of_mut(template)?, content.clone());
        for child in previous {
            self.set_parent(child, None)?;
        }
        for child in content {
            self.set_parent(child, Some(template))?;
        }
        Ok(())
    }

    pub fn get_template_content(&self, template: NodeId) -> Result<&[NodeId], DomError> {
        let data = &self.tree.node(template)?.data;
        if data.shape() != Shape::Element {
            return Err(mismatch(template, Shape::Element, data));
        }
        self.children_of(template)
    }

    // ------------------------------------------------------------------
    // Document type and mode
    // ------------------------------------------------------------------

    /// Create or update the document's DOCTYPE node
    ///
    /// An existing DocumentType child is reused; otherwise a new one is
    /// prepended to the document. Missing ids default to the empty string.
    pub fn set_document_type(
        &mut self,
        document: NodeId,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<NodeId, DomError> {
        let data = &self.tree.node(document)?.data;
        if data.shape() != Shape::Document {
            return Err(mismatch(document, Shape::Document, data));
        }

        let existing = self
            .children_of(document)?
            .iter()
            .copied()
            .find(|&child| self.tree.shape(child) == Ok(Shape::DocumentType));

        let doctype = match existing {
            Some(doctype) => doctype,
            None => {
                let doctype = self.tree.insert(NodeData::DocumentType {
                    name: String::new(),
                    public_id: String::new(),
                    system_id: String::new(),
                });
                self.children_of_mut(document)?.insert(0, doctype);
                self.set_parent(doctype, Some(document))?;
                doctype
            }
        };

        match &mut self.tree.node_mut(doctype)?.data {
            NodeData::DocumentType {
                name: doctype_name,
                public_id: doctype_public,
                system_id: doctype_system,
            } => {
                *doctype_name = name.to_owned();
                *doctype_public = public_id.unwrap_or_default().to_owned();
                *doctype_system = system_id.unwrap_or_default().to_owned();
            }
            other => return Err(mismatch(doctype, Shape::DocumentType, other)),
        }
        tracing::trace!("set_document_type {} on {}", name, document);
        Ok(doctype)
    }

    /// Quirks mode is not tracked
    pub fn set_quirks_mode(&mut self, _document: NodeId) {}

    pub fn is_quirks_mode(&self, _document: NodeId) -> bool {
        false
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Append text to `parent`, merging with a trailing text child
    ///
    /// Comments absorb the text into their data. A trailing text child is
    /// extended in place, so adjacent text never ends up split across nodes
    /// and merging allocates nothing in the arena. Returns the node now
    /// holding the text.
    pub fn insert_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        if let NodeData::Comment(data) = &mut self.tree.node_mut(parent)?.data {
            data.push_str(text);
            return Ok(parent);
        }

        let last = self.children_of(parent)?.last().copied();
        if let Some(last) = last {
            if let NodeData::Text(existing) = &mut self.tree.node_mut(last)?.data {
                existing.push_str(text);
                return Ok(last);
            }
        }

        let node = self.tree.insert(NodeData::Text(text.to_owned()));
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Insert text at `reference`'s position, merging with it when it is text
    ///
    /// A text reference keeps its place and gets `text` prepended to its
    /// content. Returns the node now holding the text.
    pub fn insert_text_before(
        &mut self,
        parent: NodeId,
        text: &str,
        reference: NodeId,
    ) -> Result<NodeId, DomError> {
        let index = self.position_of(parent, reference)?;
        if let NodeData::Text(existing) = &mut self.tree.node_mut(reference)?.data {
            existing.insert_str(0, text);
            return Ok(reference);
        }

        let node = self.tree.insert(NodeData::Text(text.to_owned()));
        self.children_of_mut(parent)?.insert(index, node);
        self.set_parent(node, Some(parent))?;
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Add every attribute whose name the element does not have yet
    ///
    /// Existing attributes are never overwritten.
    pub fn adopt_attributes<I>(&mut self, element: NodeId, attrs: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = Attr>,
    {
        let map = self.attr_map_mut(element)?;
        let mut adopted = 0usize;
        for attr in attrs {
            if map.insert_if_absent(attr.name, attr.value) {
                adopted += 1;
            }
        }
        tracing::trace!("adopt_attributes {} (+{})", element, adopted);
        Ok(())
    }

    pub fn get_attr_list(&self, element: NodeId) -> Result<Vec<Attr>, DomError> {
        let data = &self.tree.node(element)?.data;
        match attrs::attr_map(data) {
            Some(map) => Ok(map.map(AttrMap::to_pairs).unwrap_or_default()),
            None => Err(mismatch(element, Shape::Element, data)),
        }
    }

    /// Single attribute lookup
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Result<Option<&str>, DomError> {
        let data = &self.tree.node(element)?.data;
        match attrs::attr_map(data) {
            Some(map) => Ok(map.and_then(|map| map.get(name))),
            None => Err(mismatch(element, Shape::Element, data)),
        }
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn get_first_child(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.children_of(node)?.first().copied())
    }

    pub fn get_child_nodes(&self, node: NodeId) -> Result<&[NodeId], DomError> {
        self.children_of(node)
    }

    pub fn get_parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    pub fn get_tag_name(&self, element: NodeId) -> Result<&str, DomError> {
        match &self.tree.node(element)?.data {
            NodeData::Element { name, .. } => Ok(name.as_str()),
            other => Err(mismatch(element, Shape::Element, other)),
        }
    }

    pub fn get_namespace_uri(&self, element: NodeId) -> Result<&'static str, DomError> {
        match &self.tree.node(element)?.data {
            NodeData::Element { .. } => Ok(HTML_NAMESPACE),
            other => Err(mismatch(element, Shape::Element, other)),
        }
    }

    pub fn get_text_node_content(&self, text: NodeId) -> Result<&str, DomError> {
        match &self.tree.node(text)?.data {
            NodeData::Text(content) => Ok(content.as_str()),
            other => Err(mismatch(text, Shape::Text, other)),
        }
    }

    pub fn get_comment_node_content(&self, comment: NodeId) -> Result<&str, DomError> {
        match &self.tree.node(comment)?.data {
            NodeData::Comment(data) => Ok(data.as_str()),
            other => Err(mismatch(comment, Shape::Comment, other)),
        }
    }

    pub fn get_document_type_node_name(&self, doctype: NodeId) -> Result<&str, DomError> {
        self.doctype_fields(doctype).map(|(name, _, _)| name)
    }

    pub fn get_document_type_node_public_id(&self, doctype: NodeId) -> Result<&str, DomError> {
        self.doctype_fields(doctype).map(|(_, public_id, _)| public_id)
    }

    pub fn get_document_type_node_system_id(&self, doctype: NodeId) -> Result<&str, DomError> {
        self.doctype_fields(doctype).map(|(_, _, system_id)| system_id)
    }

    pub fn is_text_node(&self, node: NodeId) -> bool {
        self.tree.shape(node) == Ok(Shape::Text)
    }

    pub fn is_comment_node(&self, node: NodeId) -> bool {
        self.tree.shape(node) == Ok(Shape::Comment)
    }

    pub fn is_document_type_node(&self, node: NodeId) -> bool {
        self.tree.shape(node) == Ok(Shape::DocumentType)
    }

    pub fn is_element_node(&self, node: NodeId) -> bool {
        self.tree.shape(node) == Ok(Shape::Element)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn doctype_fields(&self, doctype: NodeId) -> Result<(&str, &str, &str), DomError> {
        match &self.tree.node(doctype)?.data {
            NodeData::DocumentType {
                name,
                public_id,
                system_id,
            } => Ok((name.as_str(), public_id.as_str(), system_id.as_str())),
            other => Err(mismatch(doctype, Shape::DocumentType, other)),
        }
    }

    fn children_of(&self, parent: NodeId) -> Result<&[NodeId], DomError> {
        let data = &self.tree.node(parent)?.data;
        children::child_list(data).ok_or(DomError::StructuralViolation {
            node: parent,
            shape: data.shape(),
            capability: Capability::ChildList,
        })
    }

    fn children_of_mut(&mut self, parent: NodeId) -> Result<&mut Vec<NodeId>, DomError> {
        let data = &mut self.tree.node_mut(parent)?.data;
        let shape = data.shape();
        children::child_list_mut(data).ok_or(DomError::StructuralViolation {
            node: parent,
            shape,
            capability: Capability::ChildList,
        })
    }

    fn attr_map_mut(&mut self, element: NodeId) -> Result<&mut AttrMap, DomError> {
        let data = &mut self.tree.node_mut(element)?.data;
        let found = data.shape();
        attrs::attr_map_mut(data).ok_or(DomError::ShapeMismatch {
            node: element,
            expected: Shape::Element,
            found,
        })
    }

    fn position_of(&self, parent: NodeId, reference: NodeId) -> Result<usize, DomError> {
        self.children_of(parent)?
            .iter()
            .position(|&child| child == reference)
            .ok_or(DomError::ReferenceNotFound { parent, reference })
    }

    fn ensure_unattached(&self, node: NodeId) -> Result<(), DomError> {
        match self.tree.node(node)?.parent {
            Some(parent) => Err(DomError::AlreadyAttached { node, parent }),
            None => Ok(()),
        }
    }

    /// Reject linking `node` under `parent` when `parent` is `node` or one
    /// of its descendants
    fn ensure_not_ancestor(&self, node: NodeId, parent: NodeId) -> Result<(), DomError> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == node {
                return Err(DomError::HierarchyViolation { node, parent });
            }
            current = self.tree.parent(id);
        }
        Ok(())
    }

    fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) -> Result<(), DomError> {
        self.tree.node_mut(node)?.parent = parent;
        Ok(())
    }
}
