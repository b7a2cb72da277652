//! The shared IR model: types, instructions, and the program container, plus
//! a narrow single-instruction renderer used by `viz::dot`.

pub mod instr;
pub mod program;
pub mod render;
pub mod types;

pub use instr::Instruction;
pub use program::{Arg, Function, Program};
pub use render::render_instr;
pub use types::{Literal, Type};
