use crate::cfg;
use crate::cli::args::OptPass;
use crate::error::Result;
use crate::ir::{Function, Program};
use crate::opt::{lvn, tdce};

use super::write_program;

pub(super) fn run(mut program: Program, pass: OptPass) -> Result<()> {
    for (i, func) in program.functions.iter_mut().enumerate() {
        let (_, mut blocks) = cfg::build(func, i)?;

        match pass {
            OptPass::Lvn => lvn::run(&mut blocks),
            OptPass::Tdce => {
                tdce::run(&mut blocks);
            }
        }

        *func = Function {
            name: blocks.function_name.clone(),
            args: blocks.params.clone(),
            ret_type: blocks.ret_type.clone(),
            instrs: blocks.flatten(),
        };
    }
    write_program(&program)
}
