//! Property tests generating random well-formed instruction streams,
//! covering the invariants that hold for every CFG/dominator/SSA
//! computation rather than one concrete example.
//!
//! Each generated function is a chain of diamonds: a branch on a fresh
//! condition, two arms that each assign a shared variable `x`, and a join
//! that either starts the next diamond or exits. This guarantees a
//! well-formed, fully reachable, single-entry CFG with real merge points
//! for every chain length, without needing a full arbitrary-CFG shrinker.

use std::collections::BTreeSet;

use proptest::prelude::*;

use tac_opt::cfg;
use tac_opt::dominator;
use tac_opt::graph::{bfs_reachable, FlowGraph};
use tac_opt::ir::{Function, Instruction, Literal, Type};
use tac_opt::opt::tdce;
use tac_opt::ssa;

fn diamond_chain(branches: &[(i64, i64)]) -> Function {
    let n = branches.len();
    let mut instrs = Vec::new();

    for (k, &(a, b)) in branches.iter().enumerate() {
        let entry = format!("d{k}_entry");
        let then_l = format!("d{k}_then");
        let else_l = format!("d{k}_else");
        let join = if k + 1 < n {
            format!("d{}_entry", k + 1)
        } else {
            "exit".to_string()
        };

        instrs.push(Instruction::label_marker(entry));
        instrs.push(Instruction {
            op: Some("const".to_string()),
            dest: Some(format!("cond{k}")),
            ty: Some(Type::base("bool")),
            value: Some(Literal::Bool(k % 2 == 0)),
            ..Default::default()
        });
        instrs.push(Instruction {
            op: Some("br".to_string()),
            args: vec![format!("cond{k}")],
            labels: vec![then_l.clone(), else_l.clone()],
            ..Default::default()
        });

        instrs.push(Instruction::label_marker(then_l));
        instrs.push(Instruction {
            op: Some("const".to_string()),
            dest: Some("x".to_string()),
            ty: Some(Type::base("int")),
            value: Some(Literal::Int(a)),
            ..Default::default()
        });
        instrs.push(Instruction {
            op: Some("jmp".to_string()),
            labels: vec![join.clone()],
            ..Default::default()
        });

        instrs.push(Instruction::label_marker(else_l));
        instrs.push(Instruction {
            op: Some("const".to_string()),
            dest: Some("x".to_string()),
            ty: Some(Type::base("int")),
            value: Some(Literal::Int(b)),
            ..Default::default()
        });
        instrs.push(Instruction {
            op: Some("jmp".to_string()),
            labels: vec![join],
            ..Default::default()
        });
    }

    instrs.push(Instruction::label_marker("exit"));
    instrs.push(Instruction::op("print", vec!["x".to_string()]));
    instrs.push(Instruction::op("ret", vec![]));

    Function {
        name: "main".to_string(),
        args: vec![],
        ret_type: None,
        instrs,
    }
}

fn branches_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    proptest::collection::vec((-5i64..5, -5i64..5), 1..=4)
}

proptest! {
    #[test]
    fn cfg_edges_are_symmetric_with_full_reachability(branches in branches_strategy()) {
        let f = diamond_chain(&branches);
        let (_, blocks) = cfg::build(&f, 0).unwrap();
        let entry = blocks.entry().unwrap();

        for id in blocks.ids() {
            for &succ in blocks.successors(id) {
                prop_assert!(blocks.predecessors(succ).contains(&id));
            }
            for &pred in blocks.predecessors(id) {
                prop_assert!(blocks.successors(pred).contains(&id));
            }
        }

        let reachable: BTreeSet<_> = bfs_reachable(&blocks, entry).into_iter().collect();
        let all: BTreeSet<_> = blocks.ids().into_iter().collect();
        prop_assert_eq!(reachable, all);
    }

    #[test]
    fn dominator_invariants_hold(branches in branches_strategy()) {
        let f = diamond_chain(&branches);
        let (_, blocks) = cfg::build(&f, 0).unwrap();
        let entry = blocks.entry().unwrap();
        let info = dominator::compute(&blocks, entry).unwrap();
        let nodes: Vec<_> = info.nodes().collect();

        for &n in &nodes {
            prop_assert!(info.dominates(entry, n));
            prop_assert!(info.dominates(n, n));
            prop_assert_eq!(n == entry, info.idom(n).is_none());
        }

        for &a in &nodes {
            for &b in &nodes {
                if !info.dominates(a, b) {
                    continue;
                }
                for &c in &nodes {
                    if info.dominates(b, c) {
                        prop_assert!(info.dominates(a, c));
                    }
                }
            }
        }
    }

    #[test]
    fn ssa_single_definition_and_phi_keys_match_predecessors(branches in branches_strategy()) {
        let f = diamond_chain(&branches);
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        ssa::to_ssa(&mut blocks).unwrap();

        let mut seen = BTreeSet::new();
        for instr in blocks.flatten() {
            if let Some(dest) = instr.dest {
                prop_assert!(seen.insert(dest), "duplicate SSA definition");
            }
        }

        for block in blocks.blocks() {
            let cfg_preds: BTreeSet<String> = blocks
                .predecessors(block.id)
                .iter()
                .filter_map(|&p| blocks.label_of(p).map(str::to_string))
                .collect();
            for phi in block.phi.values() {
                let phi_preds: BTreeSet<String> = phi.args.keys().cloned().collect();
                prop_assert_eq!(phi_preds, cfg_preds.clone());
            }
        }

        prop_assert!(ssa::validate(&blocks).is_ok());
    }

    #[test]
    fn tdce_is_idempotent(branches in branches_strategy()) {
        let f = diamond_chain(&branches);
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        tdce::run(&mut blocks);
        let once = blocks.flatten();

        let eliminated_again = tdce::run(&mut blocks);
        prop_assert_eq!(eliminated_again, 0);
        prop_assert_eq!(blocks.flatten(), once);
    }

    #[test]
    fn ssa_round_trip_preserves_block_labels(branches in branches_strategy()) {
        let f = diamond_chain(&branches);
        let (_, mut blocks) = cfg::build(&f, 0).unwrap();
        let labels_before: BTreeSet<String> = blocks.blocks().map(|b| b.label.clone()).collect();

        ssa::to_ssa(&mut blocks).unwrap();
        ssa::from_ssa(&mut blocks).unwrap();

        let labels_after: BTreeSet<String> = blocks.blocks().map(|b| b.label.clone()).collect();
        prop_assert_eq!(labels_after, labels_before);
        prop_assert!(blocks.blocks().all(|b| b.phi.is_empty()));
        prop_assert!(blocks.flatten().iter().all(|i| i.op.as_deref() != Some("phi")));

        let rebuilt = Function {
            name: blocks.function_name.clone(),
            args: blocks.params.clone(),
            ret_type: blocks.ret_type.clone(),
            instrs: blocks.flatten(),
        };
        prop_assert!(cfg::build(&rebuilt, 0).is_ok());
    }
}
