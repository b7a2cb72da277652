//! Constant propagation: for each variable, either it has never been
//! assigned, it holds one known literal value on every path, or it has
//! conflicting or non-constant values and must be treated as unknown.

use std::collections::BTreeMap;
use std::fmt;

use super::{Analysis, Lattice};
use crate::ir::{Instruction, Literal};

const BINARY_ARITH: [&str; 6] = ["add", "sub", "mul", "div", "lt", "gt"];
const BINARY_CMP: [&str; 2] = ["le", "ge"];
const BINARY_BOOL: [&str; 2] = ["and", "or"];

/// One variable's constant-propagation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstState {
    /// No definition of this variable has reached this point yet (bottom
    /// of the merge, top of the lattice: the most optimistic state).
    Uninitialized,
    /// Every definition reaching this point agrees on this literal value.
    Const(Literal),
    /// Conflicting or non-constant definitions reach this point.
    Unknown,
}

impl ConstState {
    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (ConstState::Uninitialized, x) => x.clone(),
            (x, ConstState::Uninitialized) => x.clone(),
            (ConstState::Unknown, _) | (_, ConstState::Unknown) => ConstState::Unknown,
            (ConstState::Const(a), ConstState::Const(b)) => {
                if a == b {
                    ConstState::Const(a.clone())
                } else {
                    ConstState::Unknown
                }
            }
        }
    }
}

/// Mapping from variable name to its [`ConstState`]. A variable absent from
/// the map is implicitly `Uninitialized`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstMap(pub BTreeMap<String, ConstState>);

impl ConstMap {
    /// The state of `var`, defaulting to `Uninitialized` if untracked.
    pub fn get(&self, var: &str) -> ConstState {
        self.0.get(var).cloned().unwrap_or(ConstState::Uninitialized)
    }
}

impl fmt::Display for ConstState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstState::Uninitialized => write!(f, "⊥"),
            ConstState::Const(v) => write!(f, "{v}"),
            ConstState::Unknown => write!(f, "⊤"),
        }
    }
}

impl fmt::Display for ConstMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", entries.join(", "))
    }
}

impl Lattice for ConstMap {
    fn identity() -> Self {
        ConstMap(BTreeMap::new())
    }

    fn merge(&self, other: &Self) -> Self {
        let mut out = self.0.clone();
        for (var, state) in &other.0 {
            out.entry(var.clone())
                .and_modify(|existing| *existing = existing.join(state))
                .or_insert_with(|| state.clone());
        }
        ConstMap(out)
    }
}

/// Constant-propagation analysis.
#[derive(Debug, Default)]
pub struct ConstProp;

impl Analysis for ConstProp {
    type Domain = ConstMap;

    fn transfer(&self, instr: &Instruction, in_state: &ConstMap) -> ConstMap {
        let mut out = in_state.clone();
        let Some(dest) = instr.defines() else {
            return out;
        };
        let Some(op) = instr.op.as_deref() else {
            return out;
        };

        let state = match op {
            "const" => instr
                .value
                .clone()
                .map(ConstState::Const)
                .unwrap_or(ConstState::Unknown),
            "not" => unary_not(&arg_state(instr, 0, &out)),
            "id" => arg_state(instr, 0, &out),
            _ if is_binary(op) => {
                let a = arg_state(instr, 0, &out);
                let b = arg_state(instr, 1, &out);
                binary_eval(op, &a, &b)
            }
            _ => ConstState::Unknown,
        };

        out.0.insert(dest.to_string(), state);
        out
    }
}

fn is_binary(op: &str) -> bool {
    op == "eq" || BINARY_ARITH.contains(&op) || BINARY_CMP.contains(&op) || BINARY_BOOL.contains(&op)
}

fn arg_state(instr: &Instruction, idx: usize, state: &ConstMap) -> ConstState {
    instr
        .args
        .get(idx)
        .map(|name| state.get(name))
        .unwrap_or(ConstState::Unknown)
}

fn unary_not(a: &ConstState) -> ConstState {
    match a {
        ConstState::Const(Literal::Bool(b)) => ConstState::Const(Literal::Bool(!b)),
        ConstState::Const(_) => ConstState::Unknown,
        ConstState::Unknown => ConstState::Unknown,
        ConstState::Uninitialized => ConstState::Unknown,
    }
}

fn binary_eval(op: &str, a: &ConstState, b: &ConstState) -> ConstState {
    match (a, b) {
        (ConstState::Const(x), ConstState::Const(y)) => eval_literals(op, x, y)
            .map(ConstState::Const)
            .unwrap_or(ConstState::Unknown),
        (ConstState::Unknown, _) | (_, ConstState::Unknown) => ConstState::Unknown,
        _ => ConstState::Unknown,
    }
}

fn eval_literals(op: &str, a: &Literal, b: &Literal) -> Option<Literal> {
    if op == "eq" {
        return Some(Literal::Bool(a == b));
    }
    if BINARY_BOOL.contains(&op) {
        let (Literal::Bool(x), Literal::Bool(y)) = (a, b) else {
            return None;
        };
        return Some(Literal::Bool(match op {
            "and" => *x && *y,
            "or" => *x || *y,
            _ => unreachable!(),
        }));
    }
    let (Literal::Int(x), Literal::Int(y)) = (a, b) else {
        return None;
    };
    match op {
        "add" => Some(Literal::Int(x + y)),
        "sub" => Some(Literal::Int(x - y)),
        "mul" => Some(Literal::Int(x * y)),
        "div" => {
            if *y == 0 {
                None
            } else {
                Some(Literal::Int(floor_div(*x, *y)))
            }
        }
        "lt" => Some(Literal::Bool(x < y)),
        "gt" => Some(Literal::Bool(x > y)),
        "le" => Some(Literal::Bool(x <= y)),
        "ge" => Some(Literal::Bool(x >= y)),
        _ => None,
    }
}

/// Integer division that rounds toward negative infinity, matching the
/// source language's `//` operator rather than Rust's truncating `/`.
fn floor_div(x: i64, y: i64) -> i64 {
    let q = x / y;
    let r = x % y;
    if r != 0 && (r < 0) != (y < 0) {
        q - 1
    } else {
        q
    }
}
