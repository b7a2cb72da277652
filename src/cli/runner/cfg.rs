use crate::cfg;
use crate::error::Result;
use crate::ir::Program;
use crate::viz::dot::{block_graph_to_dot, node_graph_to_dot};

pub(super) fn run(program: Program, fine_grain: bool) -> Result<()> {
    for (i, func) in program.functions.iter().enumerate() {
        let (nodes, blocks) = cfg::build(func, i)?;
        let dot = if fine_grain {
            node_graph_to_dot(&nodes)
        } else {
            block_graph_to_dot(&blocks)
        };
        print!("{dot}");
    }
    Ok(())
}
