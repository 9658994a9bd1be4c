//! slim-dom - Compact document trees
//!
//! Memory-light document tree built for HTML tree construction.
//! Nodes live in an arena and are addressed by [`NodeId`]; the
//! [`TreeAdapter`] exposes the operation set a tree builder drives,
//! and [`compact`] converts trees to and from the positional
//! sequence encoding.

mod adapter;
mod error;
mod node;
mod tree;

pub mod attrs;
pub mod children;
pub mod compact;

use std::fmt;

pub use adapter::{HTML_NAMESPACE, TreeAdapter};
pub use attrs::{Attr, AttrMap};
pub use compact::CompactError;
pub use error::{Capability, DomError};
pub use node::{Node, NodeData, Shape};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
