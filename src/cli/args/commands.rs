use std::path::PathBuf;

use clap::Subcommand;

/// The data-flow analyses exposed by the `df` command.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum DfAnalysis {
    /// Reaching-definitions: which definitions may reach each instruction.
    ReachingDefs,
    /// Constant propagation: which variables hold a known literal value.
    ConstProp,
}

/// The local optimization passes exposed by the `opt` command.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum OptPass {
    /// Local value numbering: fold redundant and constant computations.
    Lvn,
    /// Trivial dead-code elimination.
    Tdce,
}

#[derive(Debug, Subcommand)]
pub(in crate::cli) enum Command {
    /// Render a function's control-flow graph as DOT text.
    Cfg {
        /// Emit the fine-grain graph (one node per instruction) instead of
        /// the basic-block graph.
        #[arg(short = 'f', long = "fine-grain")]
        fine_grain: bool,
    },

    /// Compute dominator sets, the dominator tree, and dominance frontiers.
    Dom {
        /// Print the immediate-dominator tree.
        #[arg(short = 't', long = "tree")]
        tree: bool,
        /// Print each node's dominance frontier.
        #[arg(short = 'f', long = "frontier")]
        frontier: bool,
        /// Also emit a DOT filmstrip of the annotated graph.
        #[arg(short = 'v', long = "visualize")]
        visualize: bool,
    },

    /// Convert a function to or from SSA form, or validate SSA invariants.
    Ssa {
        /// Convert to SSA form.
        #[arg(long = "to")]
        to: bool,
        /// Convert out of SSA form.
        #[arg(long = "from")]
        from: bool,
        /// Validate SSA invariants without transforming anything.
        #[arg(long = "check")]
        check: bool,
        /// Also emit a DOT visualization of the result.
        #[arg(short = 'v', long = "visualize")]
        visualize: bool,
    },

    /// Splice a recorded linear execution trace into `main` as a
    /// speculatively-executed fast path.
    Trace {
        /// Path to the trace file: a JSON list of instruction lists, one
        /// per function. Only `main`'s trace is stitched in.
        #[arg(short = 't', long = "trace")]
        trace: PathBuf,
    },

    /// Run a data-flow analysis and report per-node in/out states.
    Df {
        #[command(subcommand)]
        analysis: DfAnalysis,
        /// Also emit a DOT filmstrip of the worklist's intermediate states.
        #[arg(short = 'v', long = "visualize")]
        visualize: bool,
    },

    /// Run a local optimization pass over every function.
    Opt {
        #[command(subcommand)]
        pass: OptPass,
    },
}
