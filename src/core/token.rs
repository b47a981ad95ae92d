// src/core/token.rs
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Main,
    Int,
    Float,
    Double,
    If,
    Else,
    While,
    Do,
    Cin,
    Cout,

    // Identifiers and literals
    Identifier,
    IntegerNumber,
    RealNumber,
    NegativeIntegerNumber,
    NegativeRealNumber,

    // Operators
    Assign,    // =
    Plus,      // +
    Minus,     // -
    Times,     // *
    Divide,    // /
    Mod,       // %
    Pow,       // ^
    Increment, // ++
    Decrement, // --
    Lt,        // <
    Le,        // <=
    Gt,        // >
    Ge,        // >=
    Eq,        // ==
    Ne,        // !=
    And,       // &&
    Or,        // ||

    // Delimiters
    LBrace,    // {
    RBrace,    // }
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Semicolon, // ;

    // Parser sentinel, never produced by the lexer
    Eof,
}

impl TokenKind {
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "main" => TokenKind::Main,
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "double" => TokenKind::Double,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "cin" => TokenKind::Cin,
            "cout" => TokenKind::Cout,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_number(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerNumber
                | TokenKind::RealNumber
                | TokenKind::NegativeIntegerNumber
                | TokenKind::NegativeRealNumber
        )
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Float | TokenKind::Double)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Main => "MAIN",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Double => "DOUBLE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Do => "DO",
            TokenKind::Cin => "CIN",
            TokenKind::Cout => "COUT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntegerNumber => "INTEGER_NUMBER",
            TokenKind::RealNumber => "REAL_NUMBER",
            TokenKind::NegativeIntegerNumber => "NEGATIVE_INTEGER_NUMBER",
            TokenKind::NegativeRealNumber => "NEGATIVE_REAL_NUMBER",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Mod => "MOD",
            TokenKind::Pow => "POW",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::Lt => "LT",
            TokenKind::Le => "LE",
            TokenKind::Gt => "GT",
            TokenKind::Ge => "GE",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Eof => "EOF",
        }
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "IDENTIFIER('{}') @{}:{}", self.value, self.line, self.column),
            kind if kind.is_number() => write!(f, "{}({}) @{}:{}", kind, self.value, self.line, self.column),
            other => write!(f, "{} '{}' @{}:{}", other, self.value, self.line, self.column),
        }
    }
}
