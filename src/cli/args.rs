use clap::Parser;

mod commands;

pub(super) use commands::{Command, DfAnalysis, OptPass};

/// Command line interface for the IR optimizer passes.
#[derive(Debug, Parser)]
#[command(author, version, about = "Control-flow and data-flow analysis passes for a JSON three-address IR", long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Repeatable.
    #[arg(long = "verbose", short = 'V', global = true, action = clap::ArgAction::Count)]
    pub(super) verbose: u8,

    #[command(subcommand)]
    pub(super) command: Command,
}
