use anyhow::Context;
use std::path::Path;

use super::{excerpt_source, print_json, Ctx, EXIT_FAILED, EXIT_OK};
use crate::core::diagnostics::report_lexical;
use crate::core::lexer::tokenize_file;
use crate::core::render::render_tokens;

pub fn main(input: &Path, json: bool, ctx: &Ctx) -> anyhow::Result<u8> {
    let lexed = tokenize_file(input).with_context(|| format!("could not read '{}'", input.display()))?;
    let code = if lexed.is_clean() { EXIT_OK } else { EXIT_FAILED };
    if json {
        print_json(&serde_json::to_value(&lexed)?)?;
        return Ok(code);
    }

    print!("{}", render_tokens(&lexed.tokens));
    let source = excerpt_source(input, ctx.pretty && !lexed.is_clean());
    let filename = input.display().to_string();
    for e in &lexed.errors {
        report_lexical(&filename, &source, e, ctx.pretty);
    }
    Ok(code)
}
