use crate::cfg::NodeGraph;
use crate::cli::args::DfAnalysis;
use crate::dataflow::{self, const_prop::ConstProp, reaching_defs::ReachingDefs};
use crate::error::Result;
use crate::graph::FlowGraph;
use crate::ir::Program;

pub(super) fn run(program: Program, analysis: DfAnalysis, visualize: bool) -> Result<()> {
    for (i, func) in program.functions.iter().enumerate() {
        let (nodes, _) = crate::cfg::build(func, i)?;
        println!("function {}", func.name);

        match analysis {
            DfAnalysis::ReachingDefs => report(&nodes, &ReachingDefs, visualize),
            DfAnalysis::ConstProp => report(&nodes, &ConstProp, visualize),
        }
    }
    Ok(())
}

fn report<A>(nodes: &NodeGraph, analysis: &A, visualize: bool)
where
    A: dataflow::Analysis,
    A::Domain: std::fmt::Display,
{
    if visualize {
        let (result, strip) = dataflow::run_with_filmstrip(nodes, analysis);
        print_states(nodes, &result);
        print!("{}", strip.render());
    } else {
        let result = dataflow::run(nodes, analysis);
        print_states(nodes, &result);
    }
}

fn print_states<D: std::fmt::Display>(nodes: &NodeGraph, result: &dataflow::DataFlowResult<D>) {
    for id in nodes.ids() {
        let in_s = result.in_state(id).map(|s| s.to_string()).unwrap_or_default();
        let out_s = result.out_state(id).map(|s| s.to_string()).unwrap_or_default();
        println!("  {id}: in={in_s} out={out_s}");
    }
}
