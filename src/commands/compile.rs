use colored::Colorize;

use super::{compile_path, print_json, Ctx, Run};
use crate::cli::CompileArgs;
use crate::core::render::{render_symbols, render_tokens, render_tree};

/// Full front end on one file; dumps whatever `args` asks for.
pub fn main_with_opts(args: &CompileArgs, ctx: &Ctx) -> anyhow::Result<u8> {
    let run = compile_path(&args.input);
    if args.json {
        print_json(&run.to_json())?;
        return Ok(run.exit_code());
    }

    if args.tokens {
        println!("=== Tokens ===");
        print!("{}", render_tokens(run.tokens()));
        println!();
    }
    if let Ok(c) = &run.result {
        if args.tree {
            println!("=== Tree ===");
            print!("{}", render_tree(&c.program, ctx.indent));
            println!();
        }
        if args.symbols {
            println!("=== Symbols ===");
            print!("{}", render_symbols(&c.symbols));
            println!();
        }
    }

    run.report(ctx);
    print_summary(&run);
    Ok(run.exit_code())
}

fn print_summary(run: &Run) {
    match &run.result {
        Ok(c) if c.is_clean() => println!(
            "{} compiled '{}' ({} symbol(s), no errors)",
            "ok:".green().bold(),
            run.filename,
            c.symbols.len()
        ),
        Ok(c) => println!(
            "{} compiled '{}' with {} semantic error(s)",
            "warn:".yellow().bold(),
            run.filename,
            c.semantic_errors.len()
        ),
        Err(e) => eprintln!("{} {}", "error:".bright_red().bold(), e),
    }
}
