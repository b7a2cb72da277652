//! SSA construction: φ-node insertion via the iterated dominance-frontier
//! algorithm, followed by dominator-tree-driven renaming.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::cfg::BlockGraph;
use crate::dominator::{self, DominatorInfo};
use crate::error::{Error, Result};
use crate::graph::{FlowGraph, NodeId, PhiNode, PHI_PLACEHOLDER};
use crate::ir::{Instruction, Type};

/// Convert a function's basic-block graph into SSA form in place.
///
/// Empty functions (no blocks) are a no-op.
pub fn to_ssa(graph: &mut BlockGraph) -> Result<()> {
    let Some(entry) = graph.entry() else {
        return Ok(());
    };
    let dom = dominator::compute(graph, entry)?;

    let (mut defs, pre_rename_type, globals) = collect_defs(graph);
    let mut phi_table = insert_phis(graph, &dom, &mut defs, &globals);
    rename(graph, &dom, &mut phi_table)?;
    materialize(graph, phi_table, &pre_rename_type);

    Ok(())
}

/// Per-variable definition sites, pre-rename types, and the set of "global"
/// names: variables used in some block other than the one that last defined
/// them. Only globals can have a live value flow into a join from more than
/// one predecessor, so phi insertion is restricted to them — a variable
/// that is only ever read back in the same block it was written in (the
/// common case for a loop body's scratch temporaries) never needs one, even
/// when that block is its own dominance-frontier member via a back edge.
fn collect_defs(
    graph: &BlockGraph,
) -> (BTreeMap<String, BTreeSet<NodeId>>, BTreeMap<String, Type>, BTreeSet<String>) {
    let mut defs: BTreeMap<String, BTreeSet<NodeId>> = BTreeMap::new();
    let mut types: BTreeMap<String, Type> = BTreeMap::new();
    let mut globals: BTreeSet<String> = BTreeSet::new();

    for arg in &graph.params {
        types.entry(arg.name.clone()).or_insert_with(|| arg.ty.clone());
    }

    for block in graph.blocks() {
        let mut killed: BTreeSet<&str> = BTreeSet::new();
        for instr in &block.instrs {
            for used in &instr.args {
                if !killed.contains(used.as_str()) {
                    globals.insert(used.clone());
                }
            }
            if let Some(dest) = &instr.dest {
                defs.entry(dest.clone()).or_default().insert(block.id);
                if let Some(ty) = &instr.ty {
                    types.entry(dest.clone()).or_insert_with(|| ty.clone());
                }
                killed.insert(dest.as_str());
            }
        }
    }

    (defs, types, globals)
}

fn insert_phis(
    graph: &BlockGraph,
    dom: &DominatorInfo,
    defs: &mut BTreeMap<String, BTreeSet<NodeId>>,
    globals: &BTreeSet<String>,
) -> BTreeMap<NodeId, BTreeMap<String, PhiNode>> {
    let mut phi_table: BTreeMap<NodeId, BTreeMap<String, PhiNode>> = BTreeMap::new();
    let vars: Vec<String> = defs.keys().filter(|v| globals.contains(*v)).cloned().collect();

    for var in vars {
        let mut worklist: VecDeque<NodeId> = defs[&var].iter().copied().collect();
        while let Some(b) = worklist.pop_front() {
            let frontier: Vec<NodeId> = dom.frontier(b).iter().copied().collect();
            for d in frontier {
                let needs_new = !phi_table.get(&d).is_some_and(|m| m.contains_key(&var));
                if needs_new {
                    phi_table
                        .entry(d)
                        .or_default()
                        .insert(var.clone(), PhiNode::new(var.clone()));
                }

                let preds: Vec<NodeId> = graph.predecessors(d).to_vec();
                let phi = phi_table.get_mut(&d).unwrap().get_mut(&var).unwrap();
                for p in preds {
                    if p != b {
                        if let Some(label) = graph.label_of(p) {
                            phi.ensure_entry(label);
                        }
                    }
                }

                if defs.get_mut(&var).unwrap().insert(d) {
                    worklist.push_back(d);
                }
            }
        }
    }

    phi_table
}

enum Action {
    Enter(NodeId),
    Exit(BTreeMap<String, Vec<String>>),
}

fn rename(
    graph: &mut BlockGraph,
    dom: &DominatorInfo,
    phi_table: &mut BTreeMap<NodeId, BTreeMap<String, PhiNode>>,
) -> Result<()> {
    let mut counters: BTreeMap<String, usize> = BTreeMap::new();
    let mut stacks: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for arg in graph.params.clone() {
        let versioned = format!("{}_0", arg.name);
        stacks.entry(arg.name.clone()).or_default().push(versioned);
        counters.insert(arg.name, 1);
    }

    let mut work = vec![Action::Enter(dom.entry())];
    while let Some(action) = work.pop() {
        match action {
            Action::Enter(b) => {
                work.push(Action::Exit(stacks.clone()));

                if let Some(phis) = phi_table.get_mut(&b) {
                    for phi in phis.values_mut() {
                        let fresh = fresh_name(&phi.dest, &mut counters);
                        stacks.entry(phi.dest.clone()).or_default().push(fresh.clone());
                        phi.dest = fresh;
                    }
                }

                let params = graph.params.clone();
                if let Some(block) = graph.block_mut(b) {
                    for instr in block.instrs.iter_mut() {
                        if instr.is_label() {
                            continue;
                        }
                        for arg in instr.args.iter_mut() {
                            *arg = resolve_use(arg, &stacks, &params)?;
                        }
                        if let Some(dest) = instr.dest.clone() {
                            let fresh = fresh_name(&dest, &mut counters);
                            stacks.entry(dest).or_default().push(fresh.clone());
                            instr.dest = Some(fresh);
                        }
                    }
                }

                if let Some(label) = graph.label_of(b).map(str::to_string) {
                    for succ in graph.successors(b).to_vec() {
                        if let Some(phis) = phi_table.get_mut(&succ) {
                            for (var, phi) in phis.iter_mut() {
                                let value = stacks
                                    .get(var)
                                    .and_then(|s| s.last())
                                    .cloned()
                                    .unwrap_or_else(|| PHI_PLACEHOLDER.to_string());
                                phi.set(&label, value);
                            }
                        }
                    }
                }

                for &child in dom.tree_children(b).iter().rev() {
                    work.push(Action::Enter(child));
                }
            }
            Action::Exit(saved) => {
                stacks = saved;
            }
        }
    }

    Ok(())
}

fn fresh_name(var: &str, counters: &mut BTreeMap<String, usize>) -> String {
    let count = counters.entry(var.to_string()).or_insert(0);
    let name = format!("{var}_{count}");
    *count += 1;
    name
}

fn resolve_use(
    name: &str,
    stacks: &BTreeMap<String, Vec<String>>,
    params: &[crate::ir::Arg],
) -> Result<String> {
    if let Some(top) = stacks.get(name).and_then(|s| s.last()) {
        return Ok(top.clone());
    }
    if params.iter().any(|p| p.name == name) {
        return Ok(name.to_string());
    }
    Err(Error::SsaViolation(format!(
        "use of {name:?} has no reaching definition and no matching parameter"
    )))
}

fn materialize(
    graph: &mut BlockGraph,
    phi_table: BTreeMap<NodeId, BTreeMap<String, PhiNode>>,
    pre_rename_type: &BTreeMap<String, Type>,
) {
    for (block_id, phis) in phi_table {
        if phis.is_empty() {
            continue;
        }
        let Some(block) = graph.block_mut(block_id) else {
            continue;
        };

        let mut instrs: Vec<Instruction> = phis
            .iter()
            .map(|(pre_rename_var, phi)| Instruction {
                op: Some("phi".to_string()),
                dest: Some(phi.dest.clone()),
                ty: pre_rename_type.get(pre_rename_var).cloned(),
                args: phi.args.values().cloned().collect(),
                labels: phi.args.keys().cloned().collect(),
                ..Default::default()
            })
            .collect();
        instrs.sort_by(|a, b| a.dest.cmp(&b.dest));

        block.phi = phis;

        let insert_at = if block.instrs.first().is_some_and(Instruction::is_label) {
            1
        } else {
            0
        };
        for (offset, instr) in instrs.into_iter().enumerate() {
            block.instrs.insert(insert_at + offset, instr);
        }
    }
}
