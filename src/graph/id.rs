//! Node/block identity: `fI-J`, where `I` is the function index and `J` is
//! the instruction or block index within that function.

use std::fmt;

/// Identity for a fine-grain node or a basic block: `fI-J`.
///
/// The same shape is used for both CFG representations: a node's `J` is an
/// instruction index, a block's `J` is a block index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    /// Index of the function this id belongs to.
    pub func_index: usize,
    /// Index of the node/block within that function.
    pub local_index: usize,
}

impl NodeId {
    /// Construct an id from its two components.
    pub fn new(func_index: usize, local_index: usize) -> Self {
        NodeId {
            func_index,
            local_index,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}-{}", self.func_index, self.local_index)
    }
}
