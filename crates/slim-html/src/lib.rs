//! slim-html - HTML5 parsing into compact trees
//!
//! Drives html5ever's tree builder through a [`slim_dom::TreeAdapter`],
//! so parsed documents land directly in the compact arena.

mod config;
mod parser;
mod sink;

pub use config::ParseConfig;
pub use parser::{HtmlParser, ParsedDocument};
pub use sink::AdapterSink;

use slim_dom::DomError;

/// Parse an HTML string with the default configuration
pub fn parse(html: &str) -> Result<ParsedDocument, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Errors surfaced by a parse
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Tree construction failed: {0}")]
    Dom(#[from] DomError),

    #[error("Failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}
