//! Subcommand implementations. Each returns the process exit code so
//! `--watch` can keep looping after a failed compile.

pub mod compile;
pub mod symbols;
pub mod tokens;
pub mod tree;

use std::path::{Path, PathBuf};

use colored::Colorize;
use serde_json::json;

use crate::core::compiler::{compile_file, Compilation};
use crate::core::diagnostics::{report_lexical, report_semantic, report_syntax};
use crate::core::error::CompileError;
use crate::core::token::Token;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_SEMANTIC: u8 = 2;

/// Output settings shared by every command, after config and flags merge.
#[derive(Debug, Clone, Copy)]
pub struct Ctx {
    pub pretty: bool,
    pub indent: usize,
}

/// One compiled file and the outcome of compiling it.
pub struct Run {
    pub filename: String,
    pub path: PathBuf,
    pub result: Result<Compilation, CompileError>,
}

impl Run {
    pub fn exit_code(&self) -> u8 {
        match &self.result {
            Ok(c) if c.is_clean() => EXIT_OK,
            Ok(_) => EXIT_SEMANTIC,
            Err(_) => EXIT_FAILED,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        match &self.result {
            Ok(c) => &c.tokens,
            Err(e) => e.tokens(),
        }
    }

    /// Diagnostics for everything that went wrong, on stderr.
    pub fn report(&self, ctx: &Ctx) {
        let source = excerpt_source(&self.path, ctx.pretty && self.exit_code() != EXIT_OK);
        let (file, src) = (self.filename.as_str(), source.as_str());
        match &self.result {
            Ok(c) => {
                for e in &c.semantic_errors {
                    report_semantic(file, src, e, ctx.pretty);
                }
            }
            Err(CompileError::Lexical { errors, .. }) => {
                for e in errors {
                    report_lexical(file, src, e, ctx.pretty);
                }
            }
            Err(CompileError::Syntax { error, .. }) => report_syntax(file, src, error, ctx.pretty),
            Err(e @ CompileError::Io { .. }) => eprintln!("{} {}", "error:".bright_red().bold(), e),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut doc = json!({ "file": self.filename, "tokens": self.tokens() });
        match &self.result {
            Ok(c) => {
                doc["status"] = json!(if c.is_clean() { "ok" } else { "semantic_errors" });
                doc["program"] = json!(c.program);
                doc["symbols"] = json!(c.symbols);
                doc["semantic_errors"] = json!(c.semantic_errors);
            }
            Err(CompileError::Lexical { errors, .. }) => {
                doc["status"] = json!("lexical_errors");
                doc["lexical_errors"] = json!(errors);
            }
            Err(CompileError::Syntax { error, .. }) => {
                doc["status"] = json!("syntax_error");
                doc["syntax_error"] = json!({
                    "message": error.to_string(),
                    "found": error.found,
                    "line": error.line,
                    "column": error.column,
                });
            }
            Err(e @ CompileError::Io { .. }) => {
                doc["status"] = json!("io_error");
                doc["message"] = json!(e.to_string());
            }
        }
        doc
    }
}

pub fn compile_path(path: &Path) -> Run {
    Run {
        filename: path.display().to_string(),
        path: path.to_path_buf(),
        result: compile_file(path),
    }
}

/// Source text for pretty excerpts. Plain one-line diagnostics never need it,
/// and an unreadable file just yields excerpts without source lines.
pub(crate) fn excerpt_source(path: &Path, wanted: bool) -> String {
    if !wanted {
        return String::new();
    }
    std::fs::read_to_string(path).unwrap_or_default()
}

pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_file_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let run = compile_path(&dir.path().join("absent.mc"));
        assert!(matches!(run.result, Err(CompileError::Io { .. })));
        assert_eq!(run.exit_code(), EXIT_FAILED);
        assert!(run.tokens().is_empty());
    }

    #[test]
    fn source_is_loaded_only_for_excerpts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.mc");
        std::fs::write(&path, "main { }").unwrap();
        assert_eq!(excerpt_source(&path, false), "");
        assert_eq!(excerpt_source(&path, true), "main { }");
        assert_eq!(compile_path(&path).exit_code(), EXIT_OK);
    }
}
