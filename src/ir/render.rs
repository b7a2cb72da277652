//! A narrow single-instruction renderer, used only to label DOT nodes.
//!
//! This is intentionally not a full bril-text pretty-printer:
//! it renders enough of an instruction to make a graph node legible.

use super::instr::Instruction;

/// Render one instruction as a short line of text.
pub fn render_instr(instr: &Instruction) -> String {
    if let Some(label) = &instr.label {
        return format!(".{label}:");
    }
    let Some(op) = &instr.op else {
        return String::new();
    };

    let mut out = String::new();
    if let Some(dest) = &instr.dest {
        out.push_str(dest);
        if let Some(ty) = &instr.ty {
            out.push_str(&format!(": {ty}"));
        }
        out.push_str(" = ");
    }
    out.push_str(op);
    for arg in &instr.args {
        out.push(' ');
        out.push_str(arg);
    }
    for func in &instr.funcs {
        out.push('@');
        out.push_str(func);
    }
    for label in &instr.labels {
        out.push_str(" .");
        out.push_str(label);
    }
    if let Some(value) = &instr.value {
        out.push(' ');
        out.push_str(&value.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::types::{Literal, Type};

    #[test]
    fn renders_label_marker() {
        let instr = Instruction::label_marker("entry");
        assert_eq!(render_instr(&instr), ".entry:");
    }

    #[test]
    fn renders_const() {
        let mut instr = Instruction::op("const", vec![]);
        instr.dest = Some("v".into());
        instr.ty = Some(Type::base("int"));
        instr.value = Some(Literal::Int(1));
        assert_eq!(render_instr(&instr), "v: int = const 1");
    }

    #[test]
    fn renders_branch() {
        let mut instr = Instruction::op("br", vec!["cond".into()]);
        instr.labels = vec!["then".into(), "else".into()];
        assert_eq!(render_instr(&instr), "br cond .then .else");
    }
}
