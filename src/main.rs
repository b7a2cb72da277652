//! Command-line entry point for the IR optimizer passes.

use std::error::Error as _;
use std::process;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::{fmt, EnvFilter};

use tac_opt::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbosity() {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("tac_opt={log_level}").parse().unwrap());

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .init();

    if let Err(e) = cli.run() {
        error!("{e}");

        let mut cause = e.source();
        while let Some(err) = cause {
            error!("  caused by: {err}");
            cause = err.source();
        }

        process::exit(1);
    }
}
