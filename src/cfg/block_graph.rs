//! The basic-block CFG representation: one node per maximal straight-line
//! run of instructions.

use std::collections::BTreeMap;

use crate::graph::{FlowGraph, NodeId, PhiNode};
use crate::ir::{Arg, Instruction, Type};

/// A maximal straight-line run of instructions with a single entry and a
/// single (possibly implicit) exit.
#[derive(Debug, Clone)]
pub struct Block {
    /// This block's stable identity (`fI-J`).
    pub id: NodeId,
    /// The block's label: the leading label marker's name, or the block's
    /// own id (stringified) when it has no leading label. Every block has
    /// one, so every block is addressable.
    pub label: String,
    /// The block's instructions, including its leading label marker if it
    /// has one. Kept intact so blocks can be flattened back into a
    /// function's instruction list without losing anything.
    pub instrs: Vec<Instruction>,
    /// φ-nodes for this block, keyed by the variable's pre-rename name.
    /// Populated once the function has been converted to SSA form.
    pub phi: BTreeMap<String, PhiNode>,
}

impl Block {
    /// Construct a block with no instructions and no φ-nodes yet.
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Block {
            id,
            label: label.into(),
            instrs: Vec::new(),
            phi: BTreeMap::new(),
        }
    }

    /// The block's terminator, if its last instruction is one.
    pub fn terminator(&self) -> Option<&Instruction> {
        self.instrs.last().filter(|i| i.is_terminator())
    }
}

/// The basic-block CFG for one function.
#[derive(Debug, Clone)]
pub struct BlockGraph {
    /// The function's name.
    pub function_name: String,
    /// The function's parameters.
    pub params: Vec<Arg>,
    /// The function's return type, if any.
    pub ret_type: Option<Type>,
    entry: Option<NodeId>,
    blocks: BTreeMap<NodeId, Block>,
    preds: BTreeMap<NodeId, Vec<NodeId>>,
    succs: BTreeMap<NodeId, Vec<NodeId>>,
}

impl BlockGraph {
    /// Construct an empty basic-block graph for a function.
    pub fn new(function_name: impl Into<String>, params: Vec<Arg>, ret_type: Option<Type>) -> Self {
        BlockGraph {
            function_name: function_name.into(),
            params,
            ret_type,
            entry: None,
            blocks: BTreeMap::new(),
            preds: BTreeMap::new(),
            succs: BTreeMap::new(),
        }
    }

    /// Add a block to the graph. The first block added becomes the entry.
    pub fn add_block(&mut self, block: Block) {
        if self.entry.is_none() {
            self.entry = Some(block.id);
        }
        self.blocks.insert(block.id, block);
    }

    /// Add a directed edge between two blocks already present in the graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.succs.entry(from).or_default().push(to);
        self.preds.entry(to).or_default().push(from);
    }

    /// Redirect the edge `from -> old_to` to `from -> new_to`. Used when
    /// splitting a critical edge during SSA destruction.
    pub fn replace_edge(&mut self, from: NodeId, old_to: NodeId, new_to: NodeId) {
        if let Some(succs) = self.succs.get_mut(&from) {
            for s in succs.iter_mut() {
                if *s == old_to {
                    *s = new_to;
                }
            }
        }
        if let Some(preds) = self.preds.get_mut(&old_to) {
            preds.retain(|&p| p != from);
        }
        self.preds.entry(new_to).or_default().push(from);
    }

    /// Look up a block by id.
    pub fn block(&self, id: NodeId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Look up a block by id, mutably.
    pub fn block_mut(&mut self, id: NodeId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    /// Iterate all blocks in id order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// The label a block is addressed by.
    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        self.blocks.get(&id).map(|b| b.label.as_str())
    }

    /// Find a block by its label.
    pub fn block_by_label(&self, label: &str) -> Option<&Block> {
        self.blocks.values().find(|b| b.label == label)
    }

    /// The number of blocks in the graph.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if the graph has no blocks (the function had no instructions).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Flatten every block's instructions back into one ordered list, in
    /// block-id order. Used to serialize a transformed function back out.
    pub fn flatten(&self) -> Vec<Instruction> {
        self.blocks.values().flat_map(|b| b.instrs.clone()).collect()
    }
}

impl FlowGraph for BlockGraph {
    fn entry(&self) -> Option<NodeId> {
        self.entry
    }

    fn ids(&self) -> Vec<NodeId> {
        self.blocks.keys().copied().collect()
    }

    fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.preds.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn successors(&self, id: NodeId) -> &[NodeId] {
        self.succs.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
