//! # tac-opt
//!
//! A middle-end for a JSON-encoded three-address IR: CFG construction (both
//! a fine-grain per-instruction graph and a basic-block graph), dominator
//! and dominance-frontier computation, a generic data-flow framework
//! instantiated for reaching definitions and constant propagation, local
//! value numbering, trivial dead-code elimination, SSA construction,
//! destruction and validation, and a trace-stitching pass for speculative
//! execution traces.
//!
//! ## Pipeline
//!
//! ```text
//! JSON program → ir::Program → cfg::build → dominator::compute
//!                                  ↓              ↓
//!                            opt::{lvn,tdce}  dataflow::run
//!                                  ↓
//!                            ssa::{to_ssa,from_ssa,validate}
//! ```

pub mod cfg;
pub mod cli;
pub mod dataflow;
pub mod dominator;
pub mod error;
pub mod graph;
pub mod ir;
pub mod opt;
pub mod ssa;
pub mod trace;
pub mod viz;

pub use error::{Error, Result};
pub use ir::{Function, Program};
