//! Trivial dead-code elimination: delete assignments that are shadowed
//! before any use, or never used anywhere in the function, iterated to a
//! fixed point.

use std::collections::{BTreeMap, BTreeSet};

use crate::cfg::BlockGraph;

/// Run TDCE to a fixed point. Returns the total number of instructions
/// deleted across all sweeps.
pub fn run(graph: &mut BlockGraph) -> usize {
    let mut total = 0;
    loop {
        let eliminated = one_sweep(graph);
        total += eliminated;
        if eliminated == 0 {
            break;
        }
    }
    total
}

fn one_sweep(graph: &mut BlockGraph) -> usize {
    let globally_used = collect_globally_used(graph);

    let ids: Vec<_> = graph.blocks().map(|b| b.id).collect();
    let mut eliminated = 0;
    for id in ids {
        let Some(block) = graph.block_mut(id) else {
            continue;
        };

        let mut to_delete: BTreeSet<usize> = BTreeSet::new();
        let mut last_def: BTreeMap<String, usize> = BTreeMap::new();

        for (i, instr) in block.instrs.iter().enumerate() {
            for arg in &instr.args {
                last_def.remove(arg);
            }
            if let Some(dest) = &instr.dest {
                if let Some(&prev) = last_def.get(dest) {
                    to_delete.insert(prev);
                }
                last_def.insert(dest.clone(), i);
            }
        }

        for (var, idx) in &last_def {
            if !globally_used.contains(var) {
                to_delete.insert(*idx);
            }
        }

        if to_delete.is_empty() {
            continue;
        }
        eliminated += to_delete.len();
        let mut i = 0;
        block.instrs.retain(|_| {
            let keep = !to_delete.contains(&i);
            i += 1;
            keep
        });
    }

    eliminated
}

fn collect_globally_used(graph: &BlockGraph) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    for block in graph.blocks() {
        for instr in &block.instrs {
            for arg in &instr.args {
                used.insert(arg.clone());
            }
        }
    }
    used
}
