//! Iterative fixed-point dominator computation, immediate-dominator tree,
//! and per-node dominance frontier, generic over any [`FlowGraph`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::graph::{bfs_reachable, FlowGraph, NodeId};

/// Dominator information for one function's CFG, computed from a single
/// entry node.
#[derive(Debug, Clone)]
pub struct DominatorInfo {
    entry: NodeId,
    dom: BTreeMap<NodeId, BTreeSet<NodeId>>,
    idom: BTreeMap<NodeId, NodeId>,
    children: BTreeMap<NodeId, Vec<NodeId>>,
    frontier: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl DominatorInfo {
    /// The entry node dominator information was computed from.
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// The full dominator set of `n`: every node that dominates `n`,
    /// including `n` itself. Empty if `n` is unreachable from the entry.
    pub fn dom_set(&self, n: NodeId) -> &BTreeSet<NodeId> {
        static EMPTY: BTreeSet<NodeId> = BTreeSet::new();
        self.dom.get(&n).unwrap_or(&EMPTY)
    }

    /// True if `a` dominates `b` (`a == b` counts as dominating).
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.dom.get(&b).is_some_and(|doms| doms.contains(&a))
    }

    /// The immediate dominator of `n`, or `None` if `n` is the entry or
    /// unreachable.
    pub fn idom(&self, n: NodeId) -> Option<NodeId> {
        self.idom.get(&n).copied()
    }

    /// Children of `n` in the immediate-dominator tree, in ascending id
    /// order.
    pub fn tree_children(&self, n: NodeId) -> &[NodeId] {
        self.children.get(&n).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The dominance frontier of `n`: nodes dominated by a predecessor of
    /// `n` but not strictly dominated by `n` itself.
    pub fn frontier(&self, n: NodeId) -> &BTreeSet<NodeId> {
        static EMPTY: BTreeSet<NodeId> = BTreeSet::new();
        self.frontier.get(&n).unwrap_or(&EMPTY)
    }

    /// All nodes this computation covers (those reachable from the entry),
    /// in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.dom.keys().copied()
    }
}

/// Compute dominator sets, the immediate-dominator tree, and dominance
/// frontiers for every node reachable from `entry`.
///
/// `entry` must have no predecessors other than itself: a self-loop back to
/// the entry (e.g. a one-block function ending in `jmp` to its own label) is
/// the one allowed exception, since it does not make the node reachable from
/// anywhere outside the function.
pub fn compute<G: FlowGraph + ?Sized>(graph: &G, entry: NodeId) -> Result<DominatorInfo> {
    if graph.predecessors(entry).iter().any(|&p| p != entry) {
        return Err(Error::InvalidEntry(entry.to_string()));
    }

    let order = bfs_reachable(graph, entry);
    let universe: BTreeSet<NodeId> = order.iter().copied().collect();

    let mut dom: BTreeMap<NodeId, BTreeSet<NodeId>> =
        order.iter().map(|&n| (n, universe.clone())).collect();
    dom.insert(entry, BTreeSet::from([entry]));

    let mut changed = true;
    while changed {
        changed = false;
        for &n in &order {
            if n == entry {
                continue;
            }
            let mut new_dom: Option<BTreeSet<NodeId>> = None;
            for &p in graph.predecessors(n) {
                if !universe.contains(&p) {
                    continue;
                }
                new_dom = Some(match new_dom {
                    None => dom[&p].clone(),
                    Some(acc) => acc.intersection(&dom[&p]).copied().collect(),
                });
            }
            let mut new_dom = new_dom.unwrap_or_default();
            new_dom.insert(n);
            if new_dom != dom[&n] {
                dom.insert(n, new_dom);
                changed = true;
            }
        }
    }

    let idom = compute_idom(&order, entry, &dom);
    let mut children: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for (&n, &d) in &idom {
        children.entry(d).or_default().push(n);
    }
    for kids in children.values_mut() {
        kids.sort();
    }

    let frontier = compute_frontier(graph, &order, &universe, &idom);

    Ok(DominatorInfo {
        entry,
        dom,
        idom,
        children,
        frontier,
    })
}

fn compute_idom(
    order: &[NodeId],
    entry: NodeId,
    dom: &BTreeMap<NodeId, BTreeSet<NodeId>>,
) -> BTreeMap<NodeId, NodeId> {
    let mut idom = BTreeMap::new();
    for &n in order {
        if n == entry {
            continue;
        }
        let strict: Vec<NodeId> = dom[&n].iter().copied().filter(|&d| d != n).collect();
        let candidate = strict.iter().copied().find(|&d| {
            !strict
                .iter()
                .any(|&other| other != d && dom[&other].contains(&d))
        });
        if let Some(d) = candidate {
            idom.insert(n, d);
        }
    }
    idom
}

fn compute_frontier<G: FlowGraph + ?Sized>(
    graph: &G,
    order: &[NodeId],
    universe: &BTreeSet<NodeId>,
    idom: &BTreeMap<NodeId, NodeId>,
) -> BTreeMap<NodeId, BTreeSet<NodeId>> {
    let mut frontier: BTreeMap<NodeId, BTreeSet<NodeId>> =
        order.iter().map(|&n| (n, BTreeSet::new())).collect();

    for &n in order {
        let preds: Vec<NodeId> = graph
            .predecessors(n)
            .iter()
            .copied()
            .filter(|p| universe.contains(p))
            .collect();
        if preds.len() < 2 {
            continue;
        }
        let Some(&stop) = idom.get(&n) else {
            continue;
        };
        for p in preds {
            let mut runner = p;
            while runner != stop {
                frontier.entry(runner).or_default().insert(n);
                match idom.get(&runner) {
                    Some(&next) => runner = next,
                    None => break,
                }
            }
        }
    }

    frontier
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    struct TestGraph {
        succs: Map<NodeId, Vec<NodeId>>,
        preds: Map<NodeId, Vec<NodeId>>,
    }

    impl FlowGraph for TestGraph {
        fn entry(&self) -> Option<NodeId> {
            None
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

    fn diamond() -> (TestGraph, NodeId, NodeId, NodeId, NodeId) {
        let a = NodeId::new(0, 0);
        let b = NodeId::new(0, 1);
        let c = NodeId::new(0, 2);
        let d = NodeId::new(0, 3);
        let mut succs = Map::new();
        let mut preds = Map::new();
        succs.insert(a, vec![b, c]);
        succs.insert(b, vec![d]);
        succs.insert(c, vec![d]);
        succs.insert(d, vec![]);
        preds.insert(b, vec![a]);
        preds.insert(c, vec![a]);
        preds.insert(d, vec![b, c]);
        (TestGraph { succs, preds }, a, b, c, d)
    }

    #[test]
    fn entry_dominates_everything() {
        let (g, a, b, c, d) = diamond();
        let info = compute(&g, a).unwrap();
        assert!(info.dominates(a, b));
        assert!(info.dominates(a, c));
        assert!(info.dominates(a, d));
        assert!(info.dom_set(a).contains(&a));
        assert_eq!(info.dom_set(a).len(), 1);
    }

    #[test]
    fn join_point_idom_is_the_branch() {
        let (g, a, _b, _c, d) = diamond();
        let info = compute(&g, a).unwrap();
        assert_eq!(info.idom(d), Some(a));
    }

    #[test]
    fn diamond_join_is_in_both_branches_frontier() {
        let (g, a, b, c, d) = diamond();
        let info = compute(&g, a).unwrap();
        assert!(info.frontier(b).contains(&d));
        assert!(info.frontier(c).contains(&d));
        assert!(info.frontier(a).is_empty());
    }

    #[test]
    fn self_loop_entry_dominates_only_itself() {
        let a = NodeId::new(0, 0);
        let mut succs = Map::new();
        succs.insert(a, vec![a]);
        let mut preds = Map::new();
        preds.insert(a, vec![a]);
        let g = TestGraph { succs, preds };
        let info = compute(&g, a).unwrap();
        assert_eq!(info.dom_set(a), &BTreeSet::from([a]));
        assert_eq!(info.idom(a), None);
        assert!(info.frontier(a).is_empty());
    }

    #[test]
    fn entry_with_predecessors_is_rejected() {
        let a = NodeId::new(0, 0);
        let b = NodeId::new(0, 1);
        let mut succs = Map::new();
        succs.insert(a, vec![b]);
        succs.insert(b, vec![a]);
        let mut preds = Map::new();
        preds.insert(a, vec![b]);
        preds.insert(b, vec![a]);
        let g = TestGraph { succs, preds };
        let err = compute(&g, a).unwrap_err();
        assert!(matches!(err, Error::InvalidEntry(_)));
    }
}
