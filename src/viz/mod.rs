//! DOT (Graphviz) rendering of both CFG representations, and a film-strip
//! frame buffer for the data-flow engine's visualization mode.

pub mod dot;
pub mod filmstrip;

pub use dot::{node_graph_to_dot, block_graph_to_dot};
pub use filmstrip::FilmStrip;
