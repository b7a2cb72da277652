//! A frame buffer of DOT snapshots, accumulated while a pass runs so the
//! sequence of intermediate states can be exported and played back frame by
//! frame instead of just inspecting the final fixed point.

use std::collections::BTreeMap;
use std::fmt;

use crate::cfg::NodeGraph;
use crate::graph::NodeId;
use crate::ir::render_instr;

/// An ordered sequence of DOT-text frames, one per observed update.
#[derive(Debug, Clone, Default)]
pub struct FilmStrip {
    frames: Vec<String>,
}

impl FilmStrip {
    /// An empty film strip.
    pub fn new() -> Self {
        FilmStrip::default()
    }

    /// Append a frame.
    pub fn push(&mut self, frame: String) {
        self.frames.push(frame);
    }

    /// The frames in capture order.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The number of frames captured.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if no frame was ever captured.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Render every frame as a sequence of DOT digraphs, each preceded by a
    /// `// frame N` comment, concatenated for a single stdout write.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, frame) in self.frames.iter().enumerate() {
            out.push_str(&format!("// frame {i}\n"));
            out.push_str(frame);
            if !frame.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

/// Render one frame: the fine-grain graph with each node's current in/out
/// state annotated below its instruction text.
pub fn annotate_frame<D: fmt::Display>(
    graph: &NodeGraph,
    in_states: &BTreeMap<NodeId, D>,
    out_states: &BTreeMap<NodeId, D>,
) -> String {
    use crate::graph::FlowGraph;

    let mut out = String::new();
    out.push_str(&format!("digraph \"{}\" {{\n", escape(&graph.function_name)));
    out.push_str("  node [shape=box, fontname=\"monospace\"];\n");

    for node in graph.nodes() {
        let mut body = render_instr(&node.instr);
        if body.is_empty() {
            body = node.id.to_string();
        }
        let mut lines = vec![escape(&body)];
        if let Some(in_state) = in_states.get(&node.id) {
            lines.push(escape(&format!("in: {in_state}")));
        }
        if let Some(out_state) = out_states.get(&node.id) {
            lines.push(escape(&format!("out: {out_state}")));
        }
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

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_numbers_frames_in_capture_order() {
        let mut strip = FilmStrip::new();
        strip.push("digraph a {}\n".to_string());
        strip.push("digraph b {}\n".to_string());
        let rendered = strip.render();
        assert!(rendered.contains("// frame 0"));
        assert!(rendered.contains("// frame 1"));
        assert!(rendered.find("frame 0").unwrap() < rendered.find("frame 1").unwrap());
    }

    #[test]
    fn empty_strip_renders_to_empty_text() {
        let strip = FilmStrip::new();
        assert!(strip.is_empty());
        assert_eq!(strip.render(), "");
    }
}
