//! Core module tree for the minicc front end.

pub mod ast;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod render;
pub mod semantic_analyzer;
pub mod symbols;
pub mod token;
pub mod value;
