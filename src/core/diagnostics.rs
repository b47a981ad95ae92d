// src/core/diagnostics.rs
//! Pretty, colored, file+line diagnostics.

use colored::Colorize;

use crate::core::lexer::LexerError;
use crate::core::parser::ParseError;
use crate::core::semantic_analyzer::SemanticError;

pub struct Span {
    pub line: usize,
    pub col: usize,
    pub len: usize, // underline length (use 1 if unknown)
}

impl Span {
    pub fn single(line: usize, col: usize) -> Self {
        Self { line, col, len: 1 }
    }
}

/// Headline, location and underlined source line.
pub fn format_error(filename: &str, source: &str, title: &str, span: &Span) -> String {
    let (ln, col) = (span.line, span.col);
    let line_text = nth_line(source, ln).unwrap_or_default();

    // line number gutter
    let ln_str = format!("{:>4}", ln);
    let underline = " ".repeat(col.saturating_sub(1)) + &"^".repeat(span.len.max(1));
    format!(
        "{} {}\n{} {}\n {} {}\n{} {} {}\n {} {} {}\n",
        "error:".bright_red().bold(),
        title.bright_white(),
        "-->".bright_blue(),
        format!("{}:{}:{}", filename, ln, col).bright_white(),
        ln_str.dimmed(),
        "|".dimmed(),
        ln_str.dimmed(),
        "|".dimmed(),
        line_text,
        " ".repeat(ln_str.len()).dimmed(),
        "|".dimmed(),
        underline.bright_red(),
    )
}

pub fn print_error(filename: &str, source: &str, title: &str, span: Span) {
    eprintln!("{}", format_error(filename, source, title, &span));
}

/// One-line form used when pretty output is off: `file:line:col: title`.
pub fn format_plain(filename: &str, title: &str, span: &Span) -> String {
    format!("{}:{}:{}: {}", filename, span.line, span.col, title)
}

fn emit(filename: &str, source: &str, title: &str, span: Span, pretty: bool) {
    if pretty {
        print_error(filename, source, title, span);
    } else {
        eprintln!("{}", format_plain(filename, title, &span));
    }
}

pub fn report_lexical(filename: &str, source: &str, err: &LexerError, pretty: bool) {
    let span = Span { line: err.line(), col: err.column(), len: err.len() };
    emit(filename, source, &format!("lexical error: {err}"), span, pretty);
}

pub fn report_syntax(filename: &str, source: &str, err: &ParseError, pretty: bool) {
    let span = Span {
        line: err.line,
        col: err.column,
        len: err.lexeme.chars().count(),
    };
    emit(filename, source, &err.to_string(), span, pretty);
}

pub fn report_semantic(filename: &str, source: &str, err: &SemanticError, pretty: bool) {
    let title = format!("{}: {}", err.kind, err.message);
    emit(filename, source, &title, Span::single(err.line, err.column), pretty);
}

fn nth_line(src: &str, n: usize) -> Option<String> {
    src.lines().nth(n.saturating_sub(1)).map(|s| s.to_string())
}
