use crate::cfg;
use crate::dominator;
use crate::error::Result;
use crate::graph::FlowGraph;
use crate::ir::Program;
use crate::viz::filmstrip::FilmStrip;

use super::usage;

pub(super) fn run(program: Program, tree: bool, frontier: bool, visualize: bool) -> Result<()> {
    if !tree && !frontier {
        return Err(usage("dom: specify at least one of -t/-f"));
    }

    for (i, func) in program.functions.iter().enumerate() {
        let (_, blocks) = cfg::build(func, i)?;
        let Some(entry) = blocks.entry() else {
            continue;
        };
        let info = dominator::compute(&blocks, entry)?;

        println!("function {}", func.name);
        if tree {
            println!("  dominator tree:");
            print_tree(&info, entry, 2);
        }
        if frontier {
            println!("  dominance frontiers:");
            for id in info.nodes() {
                let names: Vec<String> = info.frontier(id).iter().map(|n| n.to_string()).collect();
                println!("    {id}: {{{}}}", names.join(", "));
            }
        }
        if visualize {
            let mut strip = FilmStrip::new();
            strip.push(crate::viz::block_graph_to_dot(&blocks));
            print!("{}", strip.render());
        }
    }
    Ok(())
}

fn print_tree(info: &dominator::DominatorInfo, node: crate::graph::NodeId, indent: usize) {
    println!("{:indent$}{node}", "", indent = indent);
    for &child in info.tree_children(node) {
        print_tree(info, child, indent + 2);
    }
}
