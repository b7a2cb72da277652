//! [`PhiNode`]: a destination and a predecessor-label → source-variable map.
//! Used by both the basic-block graph and the SSA pass.

use indexmap::IndexMap;

/// Placeholder source-variable token used when a φ-node predecessor edge has
/// no contribution yet.
pub const PHI_PLACEHOLDER: &str = "__undefined__";

/// A φ-node: selects one of several reaching definitions of `dest` based on
/// which predecessor block control arrived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhiNode {
    /// The (possibly SSA-renamed) destination variable.
    pub dest: String,
    /// Predecessor block label → source variable name contributed from it.
    ///
    /// An [`IndexMap`] is used instead of a `BTreeMap` so that insertion
    /// order (the order predecessors were first discovered) is preserved,
    /// which keeps rendered `phi` instructions stable across runs on the
    /// same input without imposing an alphabetic order on predecessor labels.
    pub args: IndexMap<String, String>,
}

impl PhiNode {
    /// Create an empty φ-node for `dest` with no predecessor contributions yet.
    pub fn new(dest: impl Into<String>) -> Self {
        PhiNode {
            dest: dest.into(),
            args: IndexMap::new(),
        }
    }

    /// Ensure an entry exists for `pred_label`, defaulting to the placeholder
    /// token if none was set yet.
    pub fn ensure_entry(&mut self, pred_label: &str) {
        self.args
            .entry(pred_label.to_string())
            .or_insert_with(|| PHI_PLACEHOLDER.to_string());
    }

    /// Set the source variable contributed by `pred_label`.
    pub fn set(&mut self, pred_label: &str, source_var: impl Into<String>) {
        self.args.insert(pred_label.to_string(), source_var.into());
    }
}
