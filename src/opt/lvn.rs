//! Local value numbering: within one basic block, redundant computations
//! are rewritten to `id`-copies of the variable already holding that value.

use std::collections::{HashMap, HashSet};

use crate::cfg::BlockGraph;
use crate::ir::{Instruction, Literal};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ValueTuple {
    Const(Literal),
    /// A value whose origin is outside this block (a parameter, or a
    /// definition in some other block); keyed by the name it was first
    /// seen under so repeated uses share a value number.
    Input(String),
    Op(String, Vec<usize>),
}

/// Run LVN over every block in `graph`, rewriting instructions in place.
pub fn run(graph: &mut BlockGraph) {
    let ids: Vec<_> = graph.blocks().map(|b| b.id).collect();
    for id in ids {
        if let Some(block) = graph.block_mut(id) {
            run_block(&mut block.instrs);
        }
    }
}

fn run_block(instrs: &mut [Instruction]) {
    let shadowed = find_shadowed(instrs);

    let mut table: Vec<ValueTuple> = Vec::new();
    let mut var_to_vn: HashMap<String, usize> = HashMap::new();
    let mut vn_to_canonical: HashMap<usize, String> = HashMap::new();
    let mut tuple_to_vn: HashMap<ValueTuple, usize> = HashMap::new();

    for (i, instr) in instrs.iter_mut().enumerate() {
        if instr.is_label() {
            continue;
        }

        let arg_vns: Vec<usize> = instr
            .args
            .iter()
            .map(|a| resolve_vn(a, &mut table, &mut var_to_vn, &mut vn_to_canonical))
            .collect();
        for (arg, &vn) in instr.args.iter_mut().zip(arg_vns.iter()) {
            *arg = vn_to_canonical[&vn].clone();
        }

        let Some(dest) = instr.dest.clone() else {
            continue;
        };

        let tuple = if instr.op.as_deref() == Some("const") {
            instr.value.map(ValueTuple::Const)
        } else {
            instr.op.clone().map(|op| {
                let mut vns = arg_vns.clone();
                if instr.is_commutative() && vns.len() == 2 {
                    vns.sort_unstable();
                }
                ValueTuple::Op(op, vns)
            })
        };

        let Some(tuple) = tuple else { continue };

        if let Some(&existing_vn) = tuple_to_vn.get(&tuple) {
            let canonical = vn_to_canonical[&existing_vn].clone();
            let new_dest = if shadowed.contains(&i) {
                format!("{dest}_v{existing_vn}")
            } else {
                dest.clone()
            };
            *instr = Instruction {
                op: Some("id".to_string()),
                dest: Some(new_dest),
                ty: instr.ty.clone(),
                args: vec![canonical],
                ..Default::default()
            };
            var_to_vn.insert(dest, existing_vn);
        } else {
            let vn = table.len();
            table.push(tuple.clone());
            tuple_to_vn.insert(tuple, vn);
            let canonical_dest = if shadowed.contains(&i) {
                format!("{dest}_v{vn}")
            } else {
                dest.clone()
            };
            vn_to_canonical.insert(vn, canonical_dest.clone());
            var_to_vn.insert(dest, vn);
            instr.dest = Some(canonical_dest);
        }
    }
}

fn resolve_vn(
    name: &str,
    table: &mut Vec<ValueTuple>,
    var_to_vn: &mut HashMap<String, usize>,
    vn_to_canonical: &mut HashMap<usize, String>,
) -> usize {
    if let Some(&vn) = var_to_vn.get(name) {
        return vn;
    }
    let vn = table.len();
    table.push(ValueTuple::Input(name.to_string()));
    vn_to_canonical.insert(vn, name.to_string());
    var_to_vn.insert(name.to_string(), vn);
    vn
}

/// Indices of instructions whose destination is reassigned later in the
/// same block, and so must be renamed to keep their value reachable.
fn find_shadowed(instrs: &[Instruction]) -> HashSet<usize> {
    let mut last_occurrence: HashMap<&str, usize> = HashMap::new();
    for (i, instr) in instrs.iter().enumerate() {
        if let Some(dest) = &instr.dest {
            last_occurrence.insert(dest.as_str(), i);
        }
    }
    instrs
        .iter()
        .enumerate()
        .filter_map(|(i, instr)| {
            let dest = instr.dest.as_deref()?;
            (last_occurrence[dest] != i).then_some(i)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn const_instr(dest: &str, v: i64) -> Instruction {
        Instruction {
            op: Some("const".to_string()),
            dest: Some(dest.to_string()),
            value: Some(Literal::Int(v)),
            ..Default::default()
        }
    }

    fn op(dest: &str, op: &str, args: &[&str]) -> Instruction {
        Instruction {
            op: Some(op.to_string()),
            dest: Some(dest.to_string()),
            args: args.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn redundant_add_becomes_a_copy() {
        let mut instrs = vec![
            const_instr("a", 1),
            const_instr("b", 2),
            op("sum1", "add", &["a", "b"]),
            op("sum2", "add", &["a", "b"]),
        ];
        run_block(&mut instrs);
        assert_eq!(instrs[3].op.as_deref(), Some("id"));
        assert_eq!(instrs[3].args, vec!["sum1".to_string()]);
    }

    #[test]
    fn commutative_operand_order_is_canonicalized() {
        let mut instrs = vec![
            const_instr("a", 1),
            const_instr("b", 2),
            op("sum1", "add", &["a", "b"]),
            op("sum2", "add", &["b", "a"]),
        ];
        run_block(&mut instrs);
        assert_eq!(instrs[3].op.as_deref(), Some("id"));
    }

    #[test]
    fn non_commutative_operand_order_is_not_canonicalized() {
        let mut instrs = vec![
            const_instr("a", 1),
            const_instr("b", 2),
            op("d1", "sub", &["a", "b"]),
            op("d2", "sub", &["b", "a"]),
        ];
        run_block(&mut instrs);
        assert_eq!(instrs[3].op.as_deref(), Some("sub"));
    }

    #[test]
    fn shadowed_destination_is_renamed() {
        let mut instrs = vec![const_instr("x", 1), const_instr("x", 2), op("y", "id", &["x"])];
        run_block(&mut instrs);
        assert_eq!(instrs[0].dest.as_deref(), Some("x_v0"));
        assert_eq!(instrs[1].dest.as_deref(), Some("x"));
        assert_eq!(instrs[2].args, vec!["x".to_string()]);
    }
}
