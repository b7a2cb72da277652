//! The CFG builder and the two graph representations it produces.

pub mod block_graph;
pub mod builder;
pub mod node_graph;

pub use block_graph::{Block, BlockGraph};
pub use builder::build;
pub use node_graph::{Node, NodeGraph};
