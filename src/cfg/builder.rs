//! Converts a function's flat instruction list into both CFG
//! representations, resolving labels and branch/jump targets.

use std::collections::HashMap;

use crate::cfg::block_graph::{Block, BlockGraph};
use crate::cfg::node_graph::{Node, NodeGraph};
use crate::error::{Error, Result};
use crate::graph::NodeId;
use crate::ir::{Function, Instruction};

/// Build the fine-grain and basic-block CFGs for one function.
///
/// `func_index` is this function's position in the enclosing [`crate::ir::Program`],
/// used as the `I` in every `fI-J` id minted for this function.
pub fn build(func: &Function, func_index: usize) -> Result<(NodeGraph, BlockGraph)> {
    let nodes = build_node_graph(func, func_index)?;
    let blocks = build_block_graph(func, func_index)?;
    Ok((nodes, blocks))
}

fn build_node_graph(func: &Function, func_index: usize) -> Result<NodeGraph> {
    let mut graph = NodeGraph::new(func.name.clone(), func.args.clone(), func.ret_type.clone());
    if func.instrs.is_empty() {
        return Ok(graph);
    }

    let mut label_to_node: HashMap<&str, NodeId> = HashMap::new();
    for (i, instr) in func.instrs.iter().enumerate() {
        let id = NodeId::new(func_index, i);
        if let Some(label) = &instr.label {
            if label_to_node.insert(label.as_str(), id).is_some() {
                return Err(Error::DuplicateLabel {
                    function: func.name.clone(),
                    label: label.clone(),
                });
            }
        }
        graph.add_node(Node::new(id, instr.clone()));
    }

    for (i, instr) in func.instrs.iter().enumerate() {
        let id = NodeId::new(func_index, i);
        if instr.is_jump() || instr.is_branch() {
            for target in &instr.labels {
                let target_id = *label_to_node.get(target.as_str()).ok_or_else(|| Error::UnresolvedLabel {
                    function: func.name.clone(),
                    label: target.clone(),
                })?;
                graph.add_edge(id, target_id);
            }
        } else if i + 1 < func.instrs.len() {
            graph.add_edge(id, NodeId::new(func_index, i + 1));
        }
    }

    Ok(graph)
}

fn build_block_graph(func: &Function, func_index: usize) -> Result<BlockGraph> {
    let mut graph = BlockGraph::new(func.name.clone(), func.args.clone(), func.ret_type.clone());
    if func.instrs.is_empty() {
        return Ok(graph);
    }

    let mut raw_blocks: Vec<Vec<Instruction>> = Vec::new();
    let mut current: Vec<Instruction> = Vec::new();
    for instr in &func.instrs {
        if instr.is_label() && !current.is_empty() {
            raw_blocks.push(std::mem::take(&mut current));
        }
        current.push(instr.clone());
        if instr.is_terminator() {
            raw_blocks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        raw_blocks.push(current);
    }

    let mut label_to_block: HashMap<String, NodeId> = HashMap::new();
    let mut blocks = Vec::with_capacity(raw_blocks.len());
    for (k, instrs) in raw_blocks.into_iter().enumerate() {
        let id = NodeId::new(func_index, k);
        let leading_label = instrs.first().and_then(|i| i.label.clone());
        let label = leading_label.clone().unwrap_or_else(|| id.to_string());

        if let Some(explicit) = leading_label {
            if label_to_block.insert(explicit.clone(), id).is_some() {
                return Err(Error::DuplicateLabel {
                    function: func.name.clone(),
                    label: explicit,
                });
            }
        } else {
            label_to_block.insert(label.clone(), id);
        }

        blocks.push(Block {
            id,
            label,
            instrs,
            phi: Default::default(),
        });
    }

    for block in &blocks {
        graph.add_block(block.clone());
    }

    for (i, block) in blocks.iter().enumerate() {
        let terminator = block.instrs.last().filter(|instr| instr.is_terminator());
        match terminator {
            Some(instr) if instr.is_jump() => {
                let target = &instr.labels[0];
                let target_id = *label_to_block.get(target).ok_or_else(|| Error::UnresolvedLabel {
                    function: func.name.clone(),
                    label: target.clone(),
                })?;
                graph.add_edge(block.id, target_id);
            }
            Some(instr) if instr.is_branch() => {
                for target in &instr.labels {
                    let target_id = *label_to_block.get(target).ok_or_else(|| Error::UnresolvedLabel {
                        function: func.name.clone(),
                        label: target.clone(),
                    })?;
                    graph.add_edge(block.id, target_id);
                }
            }
            Some(_) => {
                // `ret`: no successor, fallthrough or otherwise.
            }
            None => {
                if let Some(next) = blocks.get(i + 1) {
                    graph.add_edge(block.id, next.id);
                }
            }
        }
    }

    Ok(graph)
}
