// src/core/ast.rs
//! Syntax tree for the teaching language. Each node variant carries only the
//! fields its role needs; `result`/`state`/`errors` stay empty until the
//! semantic pass annotates the tree.

use serde::Serialize;
use std::fmt;

use crate::core::error::ErrorKind;
use crate::core::token::TokenKind;
use crate::core::value::Value;

/// Declared variable type. Ordering is redeclaration priority: `int < float < double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    Int,
    Float,
    Double,
}

impl VarType {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Int => Some(VarType::Int),
            TokenKind::Float => Some(VarType::Float),
            TokenKind::Double => Some(VarType::Double),
            _ => None,
        }
    }

    pub fn is_integral(self) -> bool {
        self == VarType::Int
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Int => "int",
            VarType::Float => "float",
            VarType::Double => "double",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What evaluating a node produced: a number, the marker of the fault that
/// stopped it, or `Unknown` when it depends on a value read by `cin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Value(Value),
    Error(ErrorKind),
    Unknown,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Value(v) => write!(f, "{v}"),
            Outcome::Error(kind) => write!(f, "{kind}"),
            Outcome::Unknown => f.write_str("Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicalOp {
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Plus),
            TokenKind::Minus => Some(BinaryOp::Minus),
            TokenKind::Times => Some(BinaryOp::Times),
            TokenKind::Divide => Some(BinaryOp::Divide),
            TokenKind::Mod => Some(BinaryOp::Mod),
            TokenKind::Pow => Some(BinaryOp::Pow),
            _ => None,
        }
    }

    /// `/` and `%`, the operators that fault on a zero right operand.
    pub fn divides(self) -> bool {
        matches!(self, BinaryOp::Divide | BinaryOp::Mod)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
        }
    }
}

impl CompareOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Lt => Some(CompareOp::Lt),
            TokenKind::Le => Some(CompareOp::Le),
            TokenKind::Gt => Some(CompareOp::Gt),
            TokenKind::Ge => Some(CompareOp::Ge),
            TokenKind::Eq => Some(CompareOp::Eq),
            TokenKind::Ne => Some(CompareOp::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    pub fn apply(self, lhs: Value, rhs: Value) -> bool {
        let (a, b) = match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => return self.apply_ord(a.cmp(&b)),
            (a, b) => (a.as_f64(), b.as_f64()),
        };
        match self {
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
        }
    }

    fn apply_ord(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            CompareOp::Lt => ord == Less,
            CompareOp::Le => ord != Greater,
            CompareOp::Gt => ord == Greater,
            CompareOp::Ge => ord != Less,
            CompareOp::Eq => ord == Equal,
            CompareOp::Ne => ord != Equal,
        }
    }
}

impl LogicalOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOp::And),
            TokenKind::Or => Some(LogicalOp::Or),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// Root of every parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub items: Vec<Stmt>,
    pub line: usize,
}

/// A fault materialized in the tree so renderers can show it in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: usize,
    pub errors: Vec<ErrorNode>,
}

/// Variable named by a declaration, assignment, `cin`, `++` or `--`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    pub name: String,
    pub line: usize,
    pub column: usize,
    pub ty: Option<VarType>,
    pub result: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum StmtKind {
    Declaration { ty: VarType, target: Target },
    Assignment { target: Target, value: Expr },
    Increment { target: Target },
    Decrement { target: Target },
    If { condition: Expr, then_branch: Vec<Stmt>, else_branch: Option<Vec<Stmt>> },
    While { condition: Expr, body: Vec<Stmt> },
    DoWhile { body: Vec<Stmt>, condition: Expr },
    Input { target: Target },
    Output { expr: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: usize,
    pub column: usize,
    pub result: Option<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum ExprKind {
    Number {
        text: String,
    },
    Identifier {
        name: String,
        ty: Option<VarType>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
        state: Option<bool>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Target {
    pub fn new(name: &str, line: usize, column: usize) -> Self {
        Target {
            name: name.to_string(),
            line,
            column,
            ty: None,
            result: None,
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, line: usize) -> Self {
        Stmt {
            kind,
            line,
            errors: Vec::new(),
        }
    }
}

impl Expr {
    // Utility constructors
    pub fn new_number(text: &str, line: usize, column: usize) -> Self {
        Self::at(ExprKind::Number { text: text.to_string() }, line, column)
    }
    pub fn new_identifier(name: &str, line: usize, column: usize) -> Self {
        Self::at(ExprKind::Identifier { name: name.to_string(), ty: None }, line, column)
    }
    pub fn new_binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let (line, column) = (left.line, left.column);
        Self::at(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, line, column)
    }
    pub fn new_comparison(op: CompareOp, left: Expr, right: Expr) -> Self {
        let (line, column) = (left.line, left.column);
        Self::at(
            ExprKind::Comparison { op, left: Box::new(left), right: Box::new(right), state: None },
            line,
            column,
        )
    }
    pub fn new_logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        let (line, column) = (left.line, left.column);
        Self::at(ExprKind::Logical { op, left: Box::new(left), right: Box::new(right) }, line, column)
    }

    fn at(kind: ExprKind, line: usize, column: usize) -> Self {
        Expr {
            kind,
            line,
            column,
            result: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_priority_order() {
        assert!(VarType::Int < VarType::Float);
        assert!(VarType::Float < VarType::Double);
        assert_eq!(VarType::from_token(TokenKind::Double), Some(VarType::Double));
        assert_eq!(VarType::from_token(TokenKind::Cin), None);
    }

    #[test]
    fn binary_node_takes_left_position() {
        let node = Expr::new_binary(
            BinaryOp::Plus,
            Expr::new_identifier("a", 2, 5),
            Expr::new_number("1", 2, 9),
        );
        assert_eq!((node.line, node.column), (2, 5));
        if let ExprKind::Binary { op, left, right } = node.kind {
            assert_eq!(op, BinaryOp::Plus);
            assert_eq!(left.kind, ExprKind::Identifier { name: "a".into(), ty: None });
            assert_eq!(right.kind, ExprKind::Number { text: "1".into() });
        } else {
            panic!("Expected Binary node");
        }
    }

    #[test]
    fn mixed_comparisons_widen() {
        assert!(CompareOp::Lt.apply(Value::Int(1), Value::Float(1.5)));
        assert!(CompareOp::Eq.apply(Value::Int(2), Value::Float(2.0)));
        assert!(CompareOp::Ge.apply(Value::Int(i64::MAX), Value::Int(i64::MAX - 1)));
        assert!(!CompareOp::Ne.apply(Value::Int(3), Value::Int(3)));
    }
}
