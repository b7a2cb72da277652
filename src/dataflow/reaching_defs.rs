//! Reaching definitions: which variable definitions may reach each node's
//! entry.

use std::collections::BTreeSet;
use std::fmt;

use super::{Analysis, Lattice};
use crate::ir::Instruction;

/// A set of variable names: the reaching-definitions lattice value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarSet(pub BTreeSet<String>);

impl fmt::Display for VarSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().cloned().collect::<Vec<_>>().join(", "))
    }
}

impl Lattice for VarSet {
    fn identity() -> Self {
        VarSet(BTreeSet::new())
    }

    fn merge(&self, other: &Self) -> Self {
        VarSet(self.0.union(&other.0).cloned().collect())
    }
}

/// Reaching-definitions analysis: `transfer(n, in) = in ∪ {n.dest}` when `n`
/// defines a variable, else `in` unchanged.
#[derive(Debug, Default)]
pub struct ReachingDefs;

impl Analysis for ReachingDefs {
    type Domain = VarSet;

    fn transfer(&self, instr: &Instruction, in_state: &VarSet) -> VarSet {
        match instr.defines() {
            Some(dest) => {
                let mut out = in_state.0.clone();
                out.insert(dest.to_string());
                VarSet(out)
            }
            None => in_state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg;
    use crate::graph::FlowGraph;
    use crate::ir::Function;

    fn func(instrs: Vec<Instruction>) -> Function {
        Function {
            name: "main".to_string(),
            args: vec![],
            ret_type: None,
            instrs,
        }
    }

    #[test]
    fn definitions_accumulate_along_a_straight_line() {
        let f = func(vec![
            Instruction {
                op: Some("const".to_string()),
                dest: Some("x".to_string()),
                value: Some(crate::ir::Literal::Int(1)),
                ..Default::default()
            },
            Instruction {
                op: Some("const".to_string()),
                dest: Some("y".to_string()),
                value: Some(crate::ir::Literal::Int(2)),
                ..Default::default()
            },
            Instruction::op("ret", vec![]),
        ]);
        let (nodes, _) = cfg::build(&f, 0).unwrap();
        let result = super::super::run(&nodes, &ReachingDefs);

        let ret_node = nodes.ids()[2];
        let in_set = &result.in_state(ret_node).unwrap().0;
        assert!(in_set.contains("x"));
        assert!(in_set.contains("y"));
    }

    #[test]
    fn join_merges_definitions_from_both_branches() {
        let f = func(vec![
            Instruction {
                op: Some("br".to_string()),
                args: vec!["cond".to_string()],
                labels: vec!["then".to_string(), "els".to_string()],
                ..Default::default()
            },
            Instruction::label_marker("then"),
            Instruction {
                op: Some("const".to_string()),
                dest: Some("x".to_string()),
                value: Some(crate::ir::Literal::Int(1)),
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
                dest: Some("y".to_string()),
                value: Some(crate::ir::Literal::Int(2)),
                ..Default::default()
            },
            Instruction::label_marker("join"),
            Instruction::op("ret", vec![]),
        ]);
        let (nodes, _) = cfg::build(&f, 0).unwrap();
        let result = super::super::run(&nodes, &ReachingDefs);

        let join_label_node = nodes.ids()[6];
        let in_set = &result.in_state(join_label_node).unwrap().0;
        assert!(in_set.contains("x"));
        assert!(in_set.contains("y"));
    }
}
