//! The shared graph substrate: node identity and a `FlowGraph` trait
//! implemented by both CFG representations so the dominator engine and
//! data-flow framework are written once.

pub mod id;
pub mod phi;

pub use id::NodeId;
pub use phi::{PhiNode, PHI_PLACEHOLDER};

use std::collections::BTreeSet;
use std::collections::VecDeque;

/// A graph of [`NodeId`]s with adjacency, shared by the fine-grain node graph
/// and the basic-block graph. Nodes are referenced by stable ids, never by
/// pointer, so the graph can hold cycles without any unsafe aliasing.
pub trait FlowGraph {
    /// The entry node/block of the function, if the function has any
    /// instructions at all.
    fn entry(&self) -> Option<NodeId>;

    /// All node/block ids belonging to this graph, in ascending id order.
    fn ids(&self) -> Vec<NodeId>;

    /// Predecessors of `id`. Empty if `id` is unknown or has none.
    fn predecessors(&self, id: NodeId) -> &[NodeId];

    /// Successors of `id`. Empty if `id` is unknown or has none.
    fn successors(&self, id: NodeId) -> &[NodeId];
}

/// Breadth-first traversal of every node reachable from `start`, in BFS
/// discovery order. Used to find unreachable nodes before running the
/// dominator engine, and to seed worklist order for the data-flow framework.
pub fn bfs_reachable<G: FlowGraph + ?Sized>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut visited = BTreeSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited.insert(start);

    while let Some(id) = queue.pop_front() {
        order.push(id);
        for &succ in graph.successors(id) {
            if visited.insert(succ) {
                queue.push_back(succ);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct TestGraph {
        entry: NodeId,
        succs: BTreeMap<NodeId, Vec<NodeId>>,
        preds: BTreeMap<NodeId, Vec<NodeId>>,
    }

    impl FlowGraph for TestGraph {
        fn entry(&self) -> Option<NodeId> {
            Some(self.entry)
        }
        fn ids(&self) -> Vec<NodeId> {
            self.succs.keys().copied().collect()
        }
        fn predecessors(&self, id: NodeId) -> &[NodeId] {
            self.preds.get(&id).map(Vec::as_slice).unwrap_or(&[])
        }
        fn successors(&self, id: NodeId) -> &[NodeId] {
            self.succs.get(&id).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    #[test]
    fn bfs_visits_cycle_exactly_once() {
        let a = NodeId::new(0, 0);
        let b = NodeId::new(0, 1);
        let mut succs = BTreeMap::new();
        succs.insert(a, vec![b]);
        succs.insert(b, vec![a]);
        let graph = TestGraph {
            entry: a,
            succs,
            preds: BTreeMap::new(),
        };
        let order = bfs_reachable(&graph, a);
        assert_eq!(order, vec![a, b]);
    }
}
