//! Trace stitching: splice a recorded linear execution trace into a
//! function as a speculatively-executed fast path.

use tracing::warn;

use crate::cfg::BlockGraph;
use crate::ir::Instruction;

/// Splice `trace` into `graph`'s entry block, guarded by `speculate` and
/// `commit`, with a `failed:` label marking the fallback continuation.
///
/// `trace` must already have branches filtered out. Does nothing (other
/// than logging a warning) if no block carries a leading `entry:` label.
pub fn stitch(graph: &mut BlockGraph, trace: &[Instruction]) {
    let Some(entry_id) = find_entry_block(graph) else {
        warn!(function = %graph.function_name, "no entry: label marker; trace not stitched");
        return;
    };

    let block = graph.block_mut(entry_id).expect("found by find_entry_block");
    let rest = block.instrs.split_off(1);

    block.instrs.push(Instruction::op("speculate", vec![]));
    block.instrs.extend(trace.iter().cloned());
    block.instrs.push(Instruction::op("commit", vec![]));
    block.instrs.push(Instruction::op("ret", vec![]));
    block.instrs.push(Instruction::label_marker("failed"));
    block.instrs.extend(rest);
}

fn find_entry_block(graph: &BlockGraph) -> Option<crate::graph::NodeId> {
    graph
        .blocks()
        .find(|b| b.instrs.first().and_then(|i| i.label.as_deref()) == Some("entry"))
        .map(|b| b.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg;
    use crate::ir::{Function, Literal, Type};

    fn func(instrs: Vec<Instruction>) -> Function {
        Function {
            name: "main".to_string(),
            args: vec![],
            ret_type: None,
            instrs,
        }
    }

    #[test]
    fn trace_is_spliced_after_the_entry_label() {
        let f = func(vec![
            Instruction::label_marker("entry"),
            Instruction {
                op: Some("const".to_string()),
                dest: Some("sum".to_string()),
                ty: Some(Type::base("int")),
                value: Some(Literal::Int(0)),
                ..Default::default()
            },
            Instruction::op("print", vec!["sum".to_string()]),
            Instruction::op("ret", vec![]),
        ]);
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();

        let trace = vec![
            Instruction {
                op: Some("const".to_string()),
                dest: Some("one".to_string()),
                ty: Some(Type::base("int")),
                value: Some(Literal::Int(1)),
                ..Default::default()
            },
            Instruction {
                op: Some("add".to_string()),
                dest: Some("sum".to_string()),
                ty: Some(Type::base("int")),
                args: vec!["sum".to_string(), "one".to_string()],
                ..Default::default()
            },
        ];
        stitch(&mut blocks, &trace);

        let flat = blocks.flatten();
        let ops: Vec<Option<&str>> = flat.iter().map(|i| i.op.as_deref()).collect();
        assert_eq!(
            ops,
            vec![
                None, // entry:
                Some("speculate"),
                Some("const"),
                Some("add"),
                Some("commit"),
                Some("ret"),
                None, // failed:
                Some("const"),
                Some("print"),
                Some("ret"),
            ]
        );
        assert_eq!(flat[6].label.as_deref(), Some("failed"));
    }

    #[test]
    fn function_without_entry_label_is_left_untouched() {
        let f = func(vec![
            Instruction::op("print", vec![]),
            Instruction::op("ret", vec![]),
        ]);
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        let before = blocks.flatten();
        stitch(&mut blocks, &[]);
        assert_eq!(blocks.flatten(), before);
    }
}
