//! html5ever TreeSink backed by the tree adapter
//!
//! Every tree-builder callback maps onto one adapter operation. The tree
//! builder cannot observe failures, so the first adapter error is kept and
//! returned from `finish`; later callbacks still run against the tree.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use slim_dom::{Attr, DomError, HTML_NAMESPACE, NodeId, TreeAdapter};

use crate::{HtmlError, ParsedDocument};

/// Element name handed back to the tree builder
///
/// Always in the HTML namespace, since that is the only one the adapter
/// reports.
#[derive(Debug, Clone)]
pub struct TagName(QualName);

impl ElemName for TagName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

fn to_attr(attr: Attribute) -> Attr {
    let name = match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    };
    Attr::new(name, &*attr.value)
}

/// TreeSink that builds a compact tree through a [`TreeAdapter`]
pub struct AdapterSink {
    adapter: RefCell<TreeAdapter>,
    document: NodeId,
    errors: RefCell<Vec<String>>,
    max_errors: usize,
    failure: RefCell<Option<DomError>>,
}

impl AdapterSink {
    /// Create a sink with a fresh adapter and document
    pub fn new(max_errors: usize) -> Self {
        let mut adapter = TreeAdapter::new();
        let document = adapter.create_document();
        Self {
            adapter: RefCell::new(adapter),
            document,
            errors: RefCell::new(Vec::new()),
            max_errors,
            failure: RefCell::new(None),
        }
    }

    fn record(&self, op: &'static str, err: DomError) {
        tracing::error!("{} failed: {}", op, err);
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(err);
        }
    }

    fn apply<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut TreeAdapter) -> Result<T, DomError>,
    ) -> Option<T> {
        let result = f(&mut *self.adapter.borrow_mut());
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(op, err);
                None
            }
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.adapter.borrow().get_parent_node(node)
    }
}

impl Default for AdapterSink {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl TreeSink for AdapterSink {
    type Handle = NodeId;
    type Output = Result<ParsedDocument, HtmlError>;
    type ElemName<'a>
        = TagName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        if let Some(err) = self.failure.into_inner() {
            return Err(err.into());
        }
        Ok(ParsedDocument::new(
            self.adapter.into_inner(),
            self.document,
            self.errors.into_inner(),
        ))
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        tracing::debug!("Parse error: {}", msg);
        let mut errors = self.errors.borrow_mut();
        if errors.len() < self.max_errors {
            errors.push(msg.into_owned());
        }
    }

    fn get_document(&self) -> NodeId {
        self.document
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> TagName {
        let local = self
            .adapter
            .borrow()
            .get_tag_name(*target)
            .map(LocalName::from);
        let local = local.unwrap_or_else(|err| {
            self.record("elem_name", err);
            LocalName::from("")
        });
        TagName(QualName::new(None, Namespace::from(HTML_NAMESPACE), local))
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, flags: ElementFlags) -> NodeId {
        let (element, fragment) = {
            let mut adapter = self.adapter.borrow_mut();
            let element = adapter.create_element(&name.local, &name.ns, attrs.into_iter().map(to_attr));
            let fragment = flags.template.then(|| adapter.create_document_fragment());
            (element, fragment)
        };

        if let Some(fragment) = fragment {
            self.apply("set_template_content", |adapter| {
                adapter.set_template_content(element, fragment)
            });
        }
        element
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.adapter.borrow_mut().create_comment_node(&text)
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> NodeId {
        self.adapter
            .borrow_mut()
            .create_processing_instruction(&target, &data)
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        match child {
            NodeOrText::AppendNode(node) => {
                self.apply("append_child", |adapter| adapter.append_child(*parent, node));
            }
            NodeOrText::AppendText(text) => {
                self.apply("insert_text", |adapter| adapter.insert_text(*parent, &text));
            }
        }
    }

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let Some(parent) = self.parent_of(*sibling) else {
            self.record("append_before_sibling", DomError::AlreadyDetached { node: *sibling });
            return;
        };

        match new_node {
            NodeOrText::AppendNode(node) => {
                self.apply("insert_before", |adapter| {
                    adapter.insert_before(parent, node, *sibling)
                });
            }
            NodeOrText::AppendText(text) => {
                self.apply("insert_text_before", |adapter| {
                    adapter.insert_text_before(parent, &text, *sibling)
                });
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        if self.parent_of(*element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let document = self.document;
        self.apply("set_document_type", |adapter| {
            adapter.set_document_type(document, &name, Some(&*public_id), Some(&*system_id))
        });
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        // Template content lives in the element's own child list.
        *target
    }

    fn same_node(&self, x: &NodeId, y: &NodeId) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        tracing::trace!("Quirks mode {:?} is not tracked", mode);
        self.adapter.borrow_mut().set_quirks_mode(self.document);
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Attribute>) {
        self.apply("adopt_attributes", |adapter| {
            adapter.adopt_attributes(*target, attrs.into_iter().map(to_attr))
        });
    }

    fn remove_from_parent(&self, target: &NodeId) {
        if self.parent_of(*target).is_some() {
            self.apply("detach_node", |adapter| adapter.detach_node(*target));
        }
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        self.apply("reparent_children", |adapter| {
            adapter.reparent_children(*node, *new_parent)
        });
    }
}
