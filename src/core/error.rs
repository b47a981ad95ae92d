use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::core::lexer::LexerError;
use crate::core::parser::ParseError;
use crate::core::token::Token;

/// Recoverable semantic fault. Doubles as the error marker carried by an
/// evaluation outcome, so it propagates through enclosing expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Non-integral value headed for an `int` variable.
    TypeError,
    /// Undeclared or unassigned identifier.
    NameError,
    DivisionByZero,
    /// Numeric literal that does not fit the value range.
    InvalidLiteral,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::NameError => "NameError",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::InvalidLiteral => "InvalidLiteral",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a compile produces no tree at all.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lexical analysis failed with {} error(s)", errors.len())]
    Lexical { tokens: Vec<Token>, errors: Vec<LexerError> },
    #[error("syntax error: {error}")]
    Syntax { tokens: Vec<Token>, error: ParseError },
}

impl CompileError {
    /// Tokens produced before the failure, if lexing got that far.
    pub fn tokens(&self) -> &[Token] {
        match self {
            CompileError::Io { .. } => &[],
            CompileError::Lexical { tokens, .. } | CompileError::Syntax { tokens, .. } => tokens,
        }
    }
}
