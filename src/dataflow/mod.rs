//! Generic forward data-flow worklist engine, parameterized by a lattice
//! value type and a transfer function. Instantiated by [`reaching_defs`] and
//! [`const_prop`].

pub mod const_prop;
pub mod reaching_defs;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::cfg::NodeGraph;
use crate::graph::{bfs_reachable, FlowGraph, NodeId};
use crate::ir::Instruction;
use crate::viz::filmstrip::{annotate_frame, FilmStrip};

/// A join-semilattice value: has an identity element for `merge`, and a
/// commutative, associative, idempotent `merge` operation.
pub trait Lattice: Clone + PartialEq {
    /// The identity element: `x.merge(&Self::identity()) == x` for all `x`.
    /// Used to seed the fold over a node's predecessor states, including
    /// the empty fold at the entry node.
    fn identity() -> Self;

    /// Combine this value with another reaching the same program point
    /// along a different path.
    fn merge(&self, other: &Self) -> Self;
}

/// An analysis: a lattice domain and a transfer function over single
/// instructions.
pub trait Analysis {
    /// The lattice value type this analysis computes.
    type Domain: Lattice;

    /// Compute the out-state for an instruction given its in-state.
    fn transfer(&self, instr: &Instruction, in_state: &Self::Domain) -> Self::Domain;
}

/// The `in`/`out` state computed for every reachable node.
#[derive(Debug, Clone)]
pub struct DataFlowResult<D> {
    /// State flowing into each node, before its transfer function runs.
    pub in_states: BTreeMap<NodeId, D>,
    /// State flowing out of each node, after its transfer function runs.
    pub out_states: BTreeMap<NodeId, D>,
}

impl<D> DataFlowResult<D> {
    /// Look up the in-state of a node, if it was reachable from the entry.
    pub fn in_state(&self, id: NodeId) -> Option<&D> {
        self.in_states.get(&id)
    }

    /// Look up the out-state of a node, if it was reachable from the entry.
    pub fn out_state(&self, id: NodeId) -> Option<&D> {
        self.out_states.get(&id)
    }
}

/// Run a forward data-flow analysis on a function's fine-grain CFG to a
/// fixed point.
///
/// The worklist is seeded in BFS order from the entry to bias toward early
/// convergence. The transfer function is applied to the freshly merged
/// `new_in`, not the stale stored `in[n]`, the classical formulation.
pub fn run<A: Analysis>(graph: &NodeGraph, analysis: &A) -> DataFlowResult<A::Domain> {
    let Some(entry) = graph.entry() else {
        return DataFlowResult {
            in_states: BTreeMap::new(),
            out_states: BTreeMap::new(),
        };
    };

    let order = bfs_reachable(graph, entry);
    let mut in_states: BTreeMap<NodeId, A::Domain> =
        order.iter().map(|&n| (n, A::Domain::identity())).collect();
    let mut out_states: BTreeMap<NodeId, A::Domain> =
        order.iter().map(|&n| (n, A::Domain::identity())).collect();
    let mut worklist: VecDeque<NodeId> = order.into_iter().collect();

    while let Some(node) = worklist.pop_front() {
        let new_in = merge_predecessors::<A::Domain>(graph.predecessors(node), &out_states);
        let Some(instr) = graph.node(node).map(|n| &n.instr) else {
            continue;
        };
        let new_out = analysis.transfer(instr, &new_in);

        let in_changed = in_states.get(&node) != Some(&new_in);
        let out_changed = out_states.get(&node) != Some(&new_out);
        if in_changed || out_changed {
            in_states.insert(node, new_in);
            out_states.insert(node, new_out);
            worklist.extend(graph.successors(node));
        }
    }

    DataFlowResult {
        in_states,
        out_states,
    }
}

fn merge_predecessors<L: Lattice>(preds: &[NodeId], out_states: &BTreeMap<NodeId, L>) -> L {
    preds
        .iter()
        .filter_map(|p| out_states.get(p))
        .fold(L::identity(), |acc, v| acc.merge(v))
}

/// Like [`run`], but records a DOT snapshot of the whole graph's annotated
/// state after every node update that changes something, for later
/// film-strip export.
pub fn run_with_filmstrip<A: Analysis>(
    graph: &NodeGraph,
    analysis: &A,
) -> (DataFlowResult<A::Domain>, FilmStrip)
where
    A::Domain: fmt::Display,
{
    let mut strip = FilmStrip::new();

    let Some(entry) = graph.entry() else {
        return (
            DataFlowResult {
                in_states: BTreeMap::new(),
                out_states: BTreeMap::new(),
            },
            strip,
        );
    };

    let order = bfs_reachable(graph, entry);
    let mut in_states: BTreeMap<NodeId, A::Domain> =
        order.iter().map(|&n| (n, A::Domain::identity())).collect();
    let mut out_states: BTreeMap<NodeId, A::Domain> =
        order.iter().map(|&n| (n, A::Domain::identity())).collect();
    let mut worklist: VecDeque<NodeId> = order.into_iter().collect();

    while let Some(node) = worklist.pop_front() {
        let new_in = merge_predecessors::<A::Domain>(graph.predecessors(node), &out_states);
        let Some(instr) = graph.node(node).map(|n| &n.instr) else {
            continue;
        };
        let new_out = analysis.transfer(instr, &new_in);

        let in_changed = in_states.get(&node) != Some(&new_in);
        let out_changed = out_states.get(&node) != Some(&new_out);
        if in_changed || out_changed {
            in_states.insert(node, new_in);
            out_states.insert(node, new_out);
            worklist.extend(graph.successors(node));
            strip.push(annotate_frame(graph, &in_states, &out_states));
        }
    }

    (
        DataFlowResult {
            in_states,
            out_states,
        },
        strip,
    )
}
