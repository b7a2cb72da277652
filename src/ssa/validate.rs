//! SSA validation: every variable has exactly one definition, every use is
//! dominated by its definition, and every φ-node's predecessor-label set
//! matches the block's actual CFG predecessors.

use std::collections::{BTreeMap, BTreeSet};

use crate::cfg::BlockGraph;
use crate::dominator;
use crate::error::{Error, Result};
use crate::graph::{FlowGraph, NodeId, PHI_PLACEHOLDER};

/// Check that `graph` is in valid SSA form.
pub fn validate(graph: &BlockGraph) -> Result<()> {
    let Some(entry) = graph.entry() else {
        return Ok(());
    };
    let dom = dominator::compute(graph, entry)?;

    let def_site = collect_def_sites(graph)?;

    for block in graph.blocks() {
        for instr in &block.instrs {
            if instr.op.as_deref() == Some("phi") {
                continue;
            }
            for arg in &instr.args {
                check_dominated(&dom, &def_site, arg, block.id, block.id)?;
            }
        }

        for phi in block.phi.values() {
            let phi_preds: BTreeSet<&str> = phi.args.keys().map(String::as_str).collect();
            let cfg_preds: BTreeSet<&str> = graph
                .predecessors(block.id)
                .iter()
                .filter_map(|&p| graph.label_of(p))
                .collect();
            if phi_preds != cfg_preds {
                return Err(Error::SsaViolation(format!(
                    "phi for {:?} in block {} lists predecessors {:?}, but the CFG has {:?}",
                    phi.dest, block.id, phi_preds, cfg_preds
                )));
            }

            for (pred_label, var) in &phi.args {
                if var == PHI_PLACEHOLDER {
                    return Err(Error::SsaViolation(format!(
                        "phi for {:?} in block {} has an unresolved argument from {pred_label:?}",
                        phi.dest, block.id
                    )));
                }
                if let Some(pred_id) = graph.block_by_label(pred_label).map(|b| b.id) {
                    check_dominated(&dom, &def_site, var, pred_id, block.id)?;
                }
            }
        }
    }

    Ok(())
}

fn collect_def_sites(graph: &BlockGraph) -> Result<BTreeMap<String, NodeId>> {
    let mut def_site: BTreeMap<String, NodeId> = BTreeMap::new();
    for block in graph.blocks() {
        for phi in block.phi.values() {
            insert_unique(&mut def_site, &phi.dest, block.id)?;
        }
        for instr in &block.instrs {
            if instr.op.as_deref() == Some("phi") {
                continue;
            }
            if let Some(dest) = &instr.dest {
                insert_unique(&mut def_site, dest, block.id)?;
            }
        }
    }
    Ok(def_site)
}

fn insert_unique(def_site: &mut BTreeMap<String, NodeId>, var: &str, block: NodeId) -> Result<()> {
    if let Some(&existing) = def_site.get(var) {
        return Err(Error::SsaViolation(format!(
            "{var:?} is defined more than once (in {existing} and {block})"
        )));
    }
    def_site.insert(var.to_string(), block);
    Ok(())
}

/// A use of `var` occurring "at" `use_block` (for φ-args, the predecessor
/// block the value flows from) must be dominated by `var`'s definition.
/// Uses of a function parameter (absent from `def_site`) are always valid.
fn check_dominated(
    dom: &dominator::DominatorInfo,
    def_site: &BTreeMap<String, NodeId>,
    var: &str,
    use_block: NodeId,
    reporting_block: NodeId,
) -> Result<()> {
    let Some(&def_block) = def_site.get(var) else {
        return Ok(());
    };
    if !dom.dominates(def_block, use_block) {
        return Err(Error::SsaViolation(format!(
            "use of {var:?} in block {reporting_block} is not dominated by its definition in {def_block}"
        )));
    }
    Ok(())
}
