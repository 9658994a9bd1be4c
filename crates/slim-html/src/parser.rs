//! HTML5 Parser implementation
//!
//! html5ever's tree builder drives an [`AdapterSink`], so the parsed
//! document is built directly in the compact arena.

use std::io::Read;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use serde_json::Value;
use slim_dom::{DomError, NodeId, TreeAdapter};

use crate::{AdapterSink, HtmlError, ParseConfig};

/// A parsed document and the adapter that owns its nodes
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    adapter: TreeAdapter,
    document: NodeId,
    errors: Vec<String>,
}

impl ParsedDocument {
    pub(crate) fn new(adapter: TreeAdapter, document: NodeId, errors: Vec<String>) -> Self {
        Self {
            adapter,
            document,
            errors,
        }
    }

    pub fn adapter(&self) -> &TreeAdapter {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut TreeAdapter {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> TreeAdapter {
        self.adapter
    }

    /// The Document node
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Recoverable parse errors reported by the tree builder
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// First element child of the document (normally `<html>`)
    pub fn document_element(&self) -> Option<NodeId> {
        self.adapter
            .get_child_nodes(self.document)
            .ok()?
            .iter()
            .copied()
            .find(|&child| self.adapter.is_element_node(child))
    }

    /// Whole document in the compact encoding
    pub fn to_compact(&self) -> Result<Value, DomError> {
        self.adapter.to_compact(self.document)
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    config: ParseConfig,
}

impl HtmlParser {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse an HTML string into a document
    pub fn parse(&self, html: &str) -> Result<ParsedDocument, HtmlError> {
        tracing::debug!("Parsing HTML document ({} bytes)", html.len());

        let parsed = parse_document(self.sink(), self.config.parse_opts()).one(html)?;

        tracing::debug!(
            "Parsed {} nodes, {} parse errors",
            parsed.adapter().tree().len(),
            parsed.errors().len()
        );
        Ok(parsed)
    }

    /// Parse UTF-8 HTML from a reader (invalid sequences are replaced)
    pub fn parse_reader<R: Read>(&self, reader: &mut R) -> Result<ParsedDocument, HtmlError> {
        tracing::debug!("Parsing HTML document from reader");

        let parsed = parse_document(self.sink(), self.config.parse_opts())
            .from_utf8()
            .read_from(reader)??;

        tracing::debug!("Parsed {} nodes", parsed.adapter().tree().len());
        Ok(parsed)
    }

    fn sink(&self) -> AdapterSink {
        AdapterSink::new(self.config.max_recorded_errors)
    }
}
