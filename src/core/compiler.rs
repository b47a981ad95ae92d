// src/core/compiler.rs
//! Front-end pipeline: lexing, parsing and the semantic pass, chained on one
//! `CompileSession` that owns every accumulator of a single compile.

use std::path::Path;

use serde::Serialize;

use crate::core::{
    ast::Program,
    error::CompileError,
    lexer::{Lexed, Lexer},
    parser::Parser,
    semantic_analyzer::{SemanticAnalyzer, SemanticError},
    symbols::SymbolTable,
    token::Token,
};

/// Everything a successful parse produced. Semantic errors do not stop the
/// compile; they are reported alongside the annotated tree.
#[derive(Debug, Serialize)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub symbols: SymbolTable,
    pub semantic_errors: Vec<SemanticError>,
}

impl Compilation {
    pub fn is_clean(&self) -> bool {
        self.semantic_errors.is_empty()
    }
}

/// State of one compile. Created fresh for every run and consumed by it.
#[derive(Default)]
pub struct CompileSession {
    symbols: SymbolTable,
    semantic_errors: Vec<SemanticError>,
}

impl CompileSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, source: &str) -> Result<Compilation, CompileError> {
        let Lexed { tokens, errors } = Lexer::new(source).tokenize();
        if !errors.is_empty() {
            tracing::debug!(errors = errors.len(), "lexing failed; skipping parse");
            return Err(CompileError::Lexical { tokens, errors });
        }

        let mut program = match Parser::new(tokens.clone()).parse() {
            Ok(program) => program,
            Err(error) => return Err(CompileError::Syntax { tokens, error }),
        };

        self.semantic_errors = SemanticAnalyzer::analyze(&mut program, &mut self.symbols);
        tracing::debug!(
            tokens = tokens.len(),
            symbols = self.symbols.len(),
            semantic_errors = self.semantic_errors.len(),
            "compile finished"
        );
        Ok(Compilation {
            tokens,
            program,
            symbols: self.symbols,
            semantic_errors: self.semantic_errors,
        })
    }
}

pub fn compile_source(source: &str) -> Result<Compilation, CompileError> {
    CompileSession::new().run(source)
}

pub fn compile_file(path: &Path) -> Result<Compilation, CompileError> {
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_source(&source)
}
