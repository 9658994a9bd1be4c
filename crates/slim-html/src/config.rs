//! Parser Configuration

use html5ever::ParseOpts;
use serde::{Deserialize, Serialize};

/// Parser configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Parse `<noscript>` content as if scripting were enabled
    pub scripting_enabled: bool,

    /// Report detailed (slower) parse error messages
    pub exact_errors: bool,

    /// Skip the DOCTYPE token instead of adding a DocumentType node
    pub drop_doctype: bool,

    /// Upper bound on parse errors kept in the result
    pub max_recorded_errors: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            exact_errors: false,
            drop_doctype: false,
            max_recorded_errors: 256,
        }
    }
}

impl ParseConfig {
    /// html5ever options for this configuration
    pub fn parse_opts(&self) -> ParseOpts {
        let mut opts = ParseOpts::default();
        opts.tokenizer.exact_errors = self.exact_errors;
        opts.tree_builder.exact_errors = self.exact_errors;
        opts.tree_builder.scripting_enabled = self.scripting_enabled;
        opts.tree_builder.drop_doctype = self.drop_doctype;
        opts
    }
}
