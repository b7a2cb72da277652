//! The fine-grain CFG representation: one node per instruction.

use std::collections::BTreeMap;

use crate::graph::{FlowGraph, NodeId, PhiNode};
use crate::ir::{Arg, Instruction, Type};

/// A single instruction, its identity, and its φ-node table (if this node is
/// a join point once the function is in SSA form).
#[derive(Debug, Clone)]
pub struct Node {
    /// This node's stable identity (`fI-J`).
    pub id: NodeId,
    /// The instruction this node wraps.
    pub instr: Instruction,
    /// φ-nodes keyed by the variable's pre-rename name, present once the
    /// function has been converted to SSA form.
    pub phi: Option<BTreeMap<String, PhiNode>>,
}

impl Node {
    /// Construct a node with no φ-node table.
    pub fn new(id: NodeId, instr: Instruction) -> Self {
        Node {
            id,
            instr,
            phi: None,
        }
    }
}

/// The fine-grain CFG for one function: one [`Node`] per instruction.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    /// The function's name.
    pub function_name: String,
    /// The function's parameters.
    pub params: Vec<Arg>,
    /// The function's return type, if any.
    pub ret_type: Option<Type>,
    entry: Option<NodeId>,
    nodes: BTreeMap<NodeId, Node>,
    preds: BTreeMap<NodeId, Vec<NodeId>>,
    succs: BTreeMap<NodeId, Vec<NodeId>>,
}

impl NodeGraph {
    /// Construct an empty fine-grain graph for a function.
    pub fn new(function_name: impl Into<String>, params: Vec<Arg>, ret_type: Option<Type>) -> Self {
        NodeGraph {
            function_name: function_name.into(),
            params,
            ret_type,
            entry: None,
            nodes: BTreeMap::new(),
            preds: BTreeMap::new(),
            succs: BTreeMap::new(),
        }
    }

    /// Add a node to the graph. The first node added becomes the entry.
    pub fn add_node(&mut self, node: Node) {
        if self.entry.is_none() {
            self.entry = Some(node.id);
        }
        self.nodes.insert(node.id, node);
    }

    /// Add a directed edge between two nodes already present in the graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.succs.entry(from).or_default().push(to);
        self.preds.entry(to).or_default().push(from);
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a node by id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Iterate all nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// The number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes (the function had no instructions).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FlowGraph for NodeGraph {
    fn entry(&self) -> Option<NodeId> {
        self.entry
    }

    fn ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn predecessors(&self, id: NodeId) -> &[NodeId] {
        self.preds.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn successors(&self, id: NodeId) -> &[NodeId] {
        self.succs.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
