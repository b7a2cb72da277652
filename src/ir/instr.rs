//! The tagged instruction record and the predicates the rest of the
//! crate uses to answer "is this a terminator / label / commutative op".

use serde::{Deserialize, Serialize};

use super::types::{Literal, Type};

/// Ops that end a basic block.
pub const TERMINATOR_OPS: [&str; 3] = ["jmp", "br", "ret"];

/// Binary ops whose operand order LVN may canonicalize.
pub const COMMUTATIVE_OPS: [&str; 5] = ["add", "mul", "eq", "and", "or"];

/// A single IR instruction: either a real operation (`op` is `Some`) or a
/// label marker (`op` is `None`, `label` is `Some`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Instruction {
    /// The operation name. Absent for label markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,

    /// The destination variable this instruction defines, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest: Option<String>,

    /// The type of `dest`, if any.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<Type>,

    /// Ordered argument variable names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Function names referenced by a `call`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funcs: Vec<String>,

    /// The label this marker declares. Present only on label markers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Branch target labels: one for `jmp`, two (true, false) for `br`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// The literal value of a `const` instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
}

impl Instruction {
    /// Build a label marker `{"label": name}`.
    pub fn label_marker(name: impl Into<String>) -> Self {
        Instruction {
            label: Some(name.into()),
            ..Default::default()
        }
    }

    /// Build a real operation with the given op and args.
    pub fn op(op: impl Into<String>, args: Vec<String>) -> Self {
        Instruction {
            op: Some(op.into()),
            args,
            ..Default::default()
        }
    }

    /// True if this instruction is a label marker rather than a real operation.
    pub fn is_label(&self) -> bool {
        self.op.is_none()
    }

    /// True if this instruction ends a basic block.
    pub fn is_terminator(&self) -> bool {
        self.op
            .as_deref()
            .is_some_and(|op| TERMINATOR_OPS.contains(&op))
    }

    /// True if this is an unconditional jump.
    pub fn is_jump(&self) -> bool {
        self.op.as_deref() == Some("jmp")
    }

    /// True if this is a conditional branch.
    pub fn is_branch(&self) -> bool {
        self.op.as_deref() == Some("br")
    }

    /// True if this op's two argument order can be canonicalized.
    pub fn is_commutative(&self) -> bool {
        self.op
            .as_deref()
            .is_some_and(|op| COMMUTATIVE_OPS.contains(&op))
    }

    /// The variable this instruction defines, if any.
    pub fn defines(&self) -> Option<&str> {
        self.dest.as_deref()
    }
}
