//! One dispatch function per subcommand, all sharing the same stdin-in,
//! stdout-out stream-transformer shape.

mod cfg;
mod df;
mod dom;
mod opt;
mod ssa;
mod trace;

use std::io::{self, Read};

use crate::cli::args::Command;
use crate::error::{Error, Result};
use crate::ir::Program;

pub(super) fn dispatch(command: &Command) -> Result<()> {
    match command {
        Command::Cfg { fine_grain } => cfg::run(read_program()?, *fine_grain),
        Command::Dom {
            tree,
            frontier,
            visualize,
        } => dom::run(read_program()?, *tree, *frontier, *visualize),
        Command::Ssa {
            to,
            from,
            check,
            visualize,
        } => ssa::run(read_program()?, *to, *from, *check, *visualize),
        Command::Trace { trace: path } => trace::run(read_program()?, path),
        Command::Df { analysis, visualize } => df::run(read_program()?, *analysis, *visualize),
        Command::Opt { pass } => opt::run(read_program()?, *pass),
    }
}

fn read_program() -> Result<Program> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Program::from_reader(buf.as_bytes())
}

fn write_program(program: &Program) -> Result<()> {
    program.to_writer(io::stdout())?;
    println!();
    Ok(())
}

fn usage(msg: impl Into<String>) -> Error {
    Error::UsageError(msg.into())
}
