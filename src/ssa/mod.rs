//! Conversion to and from SSA form, and a validator for SSA invariants.

pub mod construct;
pub mod destruct;
pub mod validate;

pub use construct::to_ssa;
pub use destruct::from_ssa;
pub use validate::validate;
