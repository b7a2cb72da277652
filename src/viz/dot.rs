//! Render a [`NodeGraph`] or [`BlockGraph`] as Graphviz DOT text.

use crate::cfg::{BlockGraph, NodeGraph};
use crate::graph::{FlowGraph, PhiNode};
use crate::ir::render_instr;

/// Render the fine-grain graph as a DOT digraph, one node per instruction.
pub fn node_graph_to_dot(graph: &NodeGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", escape(&graph.function_name)));
    out.push_str("  node [shape=box, fontname=\"monospace\"];\n");

    for node in graph.nodes() {
        let mut body = render_instr(&node.instr);
        if body.is_empty() {
            body = node.id.to_string();
        }
        let mut lines: Vec<String> = node.phi.as_ref().map(phi_lines).unwrap_or_default();
        lines.push(escape(&body));
        out.push_str(&format!("  \"{}\" [label=\"{}\"];\n", node.id, lines.join("\\l")));
    }
    for node in graph.nodes() {
        for &succ in graph.successors(node.id) {
            out.push_str(&format!("  \"{}\" -> \"{}\";\n", node.id, succ));
        }
    }

    out.push_str("}\n");
    out
}

/// Render the basic-block graph as a DOT digraph, one node per block.
pub fn block_graph_to_dot(graph: &BlockGraph) -> String {
    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", escape(&graph.function_name)));
    out.push_str("  node [shape=box, fontname=\"monospace\"];\n");

    for block in graph.blocks() {
        let mut lines: Vec<String> = vec![escape(&format!("{}:", block.label))];
        lines.extend(phi_lines(&block.phi));
        for instr in &block.instrs {
            lines.push(escape(&render_instr(instr)));
        }
        out.push_str(&format!("  \"{}\" [label=\"{}\"];\n", block.id, lines.join("\\l")));
    }
    for block in graph.blocks() {
        for &succ in graph.successors(block.id) {
            out.push_str(&format!("  \"{}\" -> \"{}\";\n", block.id, succ));
        }
    }

    out.push_str("}\n");
    out
}

/// One already-escaped DOT label line per phi node, in dest-name order.
fn phi_lines(phi: &std::collections::BTreeMap<String, PhiNode>) -> Vec<String> {
    phi.values()
        .map(|p| {
            let args: Vec<String> = p
                .args
                .iter()
                .map(|(label, var)| format!("{label}:{var}"))
                .collect();
            escape(&format!("phi {} <- {}", p.dest, args.join(", ")))
        })
        .collect()
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg;
    use crate::ir::{Function, Instruction};

    #[test]
    fn renders_a_digraph_with_one_edge_per_successor() {
        let f = Function {
            name: "main".to_string(),
            args: vec![],
            ret_type: None,
            instrs: vec![
                Instruction::op("nop", vec![]),
                Instruction::op("ret", vec![]),
            ],
        };
        let (nodes, blocks) = cfg::build(&f, 0).unwrap();
        let dot = node_graph_to_dot(&nodes);
        assert!(dot.starts_with("digraph \"main\" {"));
        assert!(dot.contains("->"));

        let block_dot = block_graph_to_dot(&blocks);
        assert!(block_dot.contains("digraph \"main\""));
    }
}
