use std::path::Path;

use super::{compile_path, print_json, Ctx};
use crate::core::render::render_tree;

pub fn main(input: &Path, json: bool, ctx: &Ctx) -> anyhow::Result<u8> {
    let run = compile_path(input);
    match (&run.result, json) {
        (Ok(c), true) => print_json(&serde_json::to_value(&c.program)?)?,
        (Ok(c), false) => print!("{}", render_tree(&c.program, ctx.indent)),
        (Err(_), true) => print_json(&run.to_json())?,
        (Err(_), false) => {}
    }
    run.report(ctx);
    Ok(run.exit_code())
}
