/// minicc main: subcommands + back-compat `minicc FILE`.
use anyhow::Context;
use clap::Parser; // trait import enables MiniccCli::parse()
use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, SystemTime};

use minicc::cli::{Command, CompileArgs, MiniccCli};
use minicc::commands::{self, Ctx};
use minicc::config::Config;
use minicc::logging;

const WATCH_POLL: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    let args = MiniccCli::parse();

    let cfg = Config::load(&args.config).context("loading configuration")?;
    logging::init(args.verbose, cfg.log.level);
    if args.no_color || !cfg.diagnostics.color {
        colored::control::set_override(false);
    }
    let ctx = Ctx {
        pretty: args.pretty_errors || cfg.diagnostics.pretty,
        indent: cfg.render.indent,
    };

    let code = match args.cmd {
        Some(Command::Compile(opts)) if opts.watch => watch(&opts.input, || commands::compile::main_with_opts(&opts, &ctx)),
        Some(Command::Compile(opts)) => commands::compile::main_with_opts(&opts, &ctx)?,
        Some(Command::Tokens { input, json }) => commands::tokens::main(&input, json, &ctx)?,
        Some(Command::Tree { input, json }) => commands::tree::main(&input, json, &ctx)?,
        Some(Command::Symbols { input, json }) => commands::symbols::main(&input, json, &ctx)?,
        // Backward compatibility: `minicc <file>` behaves like compile.
        None => match args.input_pos {
            Some(input) => commands::compile::main_with_opts(&CompileArgs::plain(input), &ctx)?,
            None => anyhow::bail!("no input file given (try `minicc compile FILE` or `minicc --help`)"),
        },
    };
    std::process::exit(i32::from(code));
}

fn modified(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Re-runs `once` every time the file's mtime moves forward. Never returns.
fn watch(input: &Path, mut once: impl FnMut() -> anyhow::Result<u8>) -> ! {
    let mut last_mtime = modified(input);
    loop {
        if let Err(e) = once() {
            eprintln!("[watch] {e:#}");
        }
        loop {
            sleep(WATCH_POLL);
            let m = modified(input);
            if m > last_mtime {
                last_mtime = m;
                println!("[watch] detected change, recompiling...");
                break;
            }
        }
    }
}
