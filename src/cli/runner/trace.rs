use std::fs;
use std::path::Path;

use crate::cfg;
use crate::error::Result;
use crate::ir::{Function, Instruction, Program};
use crate::trace;

use super::write_program;

/// One recorded trace per function, in program order. Branch instructions
/// are filtered out before stitching.
#[derive(Debug, serde::Deserialize)]
struct Traces(Vec<Vec<Instruction>>);

pub(super) fn run(mut program: Program, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)?;
    let traces: Traces = serde_json::from_str(&raw)?;

    for (i, func) in program.functions.iter_mut().enumerate() {
        if func.name != "main" {
            continue;
        }
        let Some(recorded) = traces.0.get(i) else {
            continue;
        };
        let filtered: Vec<Instruction> = recorded.iter().filter(|i| !i.is_branch()).cloned().collect();

        let (_, mut blocks) = cfg::build(func, i)?;
        trace::stitch(&mut blocks, &filtered);

        *func = Function {
            name: blocks.function_name.clone(),
            args: blocks.params.clone(),
            ret_type: blocks.ret_type.clone(),
            instrs: blocks.flatten(),
        };
    }

    write_program(&program)
}
