use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "minicc",
    about = "minicc: lex, parse and check programs in the mini teaching language",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct MiniccCli {
    /// Global: pretty diagnostics with source excerpts
    #[arg(long = "pretty-errors", action = ArgAction::SetTrue, global = true)]
    pub pretty_errors: bool,

    /// Global: disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue, global = true)]
    pub no_color: bool,

    /// Global: raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Global: path to config (TOML); default: ~/.minicc/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    // Back-compat positional: `minicc FILE` behaves like `minicc compile FILE`
    #[arg(value_name = "input_pos")]
    pub input_pos: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full front end and report every error
    ///
    /// Examples:
    ///   minicc compile demo.mc --tree --symbols
    ///   minicc compile demo.mc --json
    Compile(CompileArgs),

    /// Print the token stream and lexical errors
    Tokens {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Print the annotated syntax tree
    Tree {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Print the symbol table
    Symbols {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct CompileArgs {
    /// Input source file
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Dump tokens
    #[arg(long = "tokens", action = ArgAction::SetTrue)]
    pub tokens: bool,

    /// Dump the annotated tree
    #[arg(long = "tree", action = ArgAction::SetTrue)]
    pub tree: bool,

    /// Dump the symbol table
    #[arg(long = "symbols", action = ArgAction::SetTrue)]
    pub symbols: bool,

    /// Emit one JSON document instead of text
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Watch input for changes and re-run the compile when modified
    #[arg(long = "watch", action = ArgAction::SetTrue)]
    pub watch: bool,
}

impl CompileArgs {
    pub fn plain(input: PathBuf) -> Self {
        Self {
            input,
            tokens: false,
            tree: false,
            symbols: false,
            json: false,
            watch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = MiniccCli::try_parse_from(["minicc", "compile", "a.mc", "--tree", "--no-color", "-vv"]).unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Some(Command::Compile(args)) => {
                assert!(args.tree);
                assert!(!args.watch);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bare_file_is_accepted() {
        let cli = MiniccCli::try_parse_from(["minicc", "prog.mc"]).unwrap();
        assert_eq!(cli.input_pos, Some(PathBuf::from("prog.mc")));
        assert!(cli.cmd.is_none());
    }
}
