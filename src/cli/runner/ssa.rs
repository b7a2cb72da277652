use crate::cfg;
use crate::error::Result;
use crate::ir::{Function, Program};
use crate::ssa;
use crate::viz::block_graph_to_dot;

use super::{usage, write_program};

pub(super) fn run(
    mut program: Program,
    to: bool,
    from: bool,
    check: bool,
    visualize: bool,
) -> Result<()> {
    match (to, from, check) {
        (true, false, false) | (false, true, false) | (false, false, true) => {}
        _ => return Err(usage("ssa: specify exactly one of --to/--from/--check")),
    }

    let mut dots = Vec::new();
    for (i, func) in program.functions.iter_mut().enumerate() {
        let (_, mut blocks) = cfg::build(func, i)?;

        if to {
            ssa::to_ssa(&mut blocks)?;
        } else if from {
            ssa::from_ssa(&mut blocks)?;
        } else {
            ssa::validate(&blocks)?;
        }

        if visualize {
            dots.push(block_graph_to_dot(&blocks));
        }
        if to || from {
            *func = Function {
                name: blocks.function_name.clone(),
                args: blocks.params.clone(),
                ret_type: blocks.ret_type.clone(),
                instrs: blocks.flatten(),
            };
        }
    }

    if check {
        println!("ok");
    } else {
        write_program(&program)?;
    }
    for dot in dots {
        print!("{dot}");
    }
    Ok(())
}
