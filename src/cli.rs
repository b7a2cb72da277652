//! Command line interface: one subcommand per pass, each reading a
//! [`Program`](crate::ir::Program) from stdin and writing its result to
//! stdout.

mod args;
mod runner;

pub use args::Cli;

impl Cli {
    /// Dispatch to the subcommand's runner.
    pub fn run(&self) -> crate::Result<()> {
        runner::dispatch(&self.command)
    }

    /// Number of times `--verbose` was passed, for the caller to pick a log
    /// level.
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}
