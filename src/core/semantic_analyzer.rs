// src/core/semantic_analyzer.rs
//! Evaluation/annotation pass:
//! - Registers declarations and usages in the symbol table
//! - Evaluates every assignment right-hand side once, in source order
//! - Writes outcomes back onto the tree and the table
//! - Collects TypeError / NameError / DivisionByZero / InvalidLiteral
//!
//! Loops and branches are never executed; each statement is visited once.
//! Values read by `cin` are `Unknown` and stay so through every expression
//! that depends on them.

use serde::Serialize;

use crate::core::ast::{BinaryOp, ErrorNode, Expr, ExprKind, LogicalOp, Outcome, Program, Stmt, StmtKind, Target};
use crate::core::error::ErrorKind;
use crate::core::symbols::SymbolTable;
use crate::core::value::Value;

#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{kind} at {line}:{column}: {message}")]
pub struct SemanticError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

pub struct SemanticAnalyzer<'t> {
    table: &'t mut SymbolTable,
    errors: Vec<SemanticError>,
}

impl<'t> SemanticAnalyzer<'t> {
    pub fn new(table: &'t mut SymbolTable) -> Self {
        Self { table, errors: Vec::new() }
    }

    /// Annotates `program` in place and fills `table`. Returns every semantic
    /// error in the order it was found.
    pub fn analyze(program: &mut Program, table: &mut SymbolTable) -> Vec<SemanticError> {
        let mut analyzer = SemanticAnalyzer::new(table);
        analyzer.visit_block(&mut program.items);
        tracing::debug!(
            symbols = analyzer.table.len(),
            errors = analyzer.errors.len(),
            "semantic pass finished"
        );
        analyzer.errors
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }

    pub fn visit_block(&mut self, stmts: &mut [Stmt]) {
        for stmt in stmts {
            self.visit(stmt);
        }
    }

    fn visit(&mut self, stmt: &mut Stmt) {
        let line = stmt.line;
        let nodes = match &mut stmt.kind {
            StmtKind::Declaration { ty, target } => {
                self.table.add_symbol(&target.name, *ty, None, target.line);
                target.ty = self.table.get_symbol(&target.name).map(|e| e.ty);
                Vec::new()
            }
            StmtKind::Assignment { target, value } => {
                let mark = self.errors.len();
                let outcome = self.evaluate(value);
                self.assign(target, outcome);
                self.nodes_for_assignment(mark, target, line)
            }
            StmtKind::Increment { target } => {
                let mark = self.errors.len();
                self.step(target, Value::add);
                self.nodes_for_assignment(mark, target, line)
            }
            StmtKind::Decrement { target } => {
                let mark = self.errors.len();
                self.step(target, Value::sub);
                self.nodes_for_assignment(mark, target, line)
            }
            StmtKind::If { condition, then_branch, else_branch } => {
                let mark = self.errors.len();
                self.evaluate(condition);
                let nodes = self.nodes_since(mark);
                self.visit_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.visit_block(else_branch);
                }
                nodes
            }
            StmtKind::While { condition, body } => {
                let mark = self.errors.len();
                self.evaluate(condition);
                let nodes = self.nodes_since(mark);
                self.visit_block(body);
                nodes
            }
            StmtKind::DoWhile { body, condition } => {
                self.visit_block(body);
                let mark = self.errors.len();
                self.evaluate(condition);
                self.nodes_since(mark)
            }
            StmtKind::Input { target } => {
                let mark = self.errors.len();
                self.table.add_usage(&target.name, target.line);
                target.ty = self.table.get_symbol(&target.name).map(|e| e.ty);
                if target.ty.is_none() {
                    let msg = format!("input into undeclared variable '{}'", target.name);
                    self.record(ErrorKind::NameError, msg, target.line, target.column);
                    target.result = Some(Outcome::Error(ErrorKind::NameError));
                } else {
                    self.table.mark_unknown(&target.name);
                    target.result = Some(Outcome::Unknown);
                }
                self.nodes_since(mark)
            }
            StmtKind::Output { expr } => {
                let mark = self.errors.len();
                self.evaluate(expr);
                self.nodes_since(mark)
            }
        };
        stmt.errors.extend(nodes);
    }

    /// Stores `outcome` into `target` under the int/float policy.
    fn assign(&mut self, target: &mut Target, outcome: Outcome) {
        self.table.add_usage(&target.name, target.line);
        let Some(ty) = self.table.get_symbol(&target.name).map(|e| e.ty) else {
            let msg = format!("assignment to undeclared variable '{}'", target.name);
            self.record(ErrorKind::NameError, msg, target.line, target.column);
            target.result = Some(Outcome::Error(ErrorKind::NameError));
            return;
        };
        target.ty = Some(ty);

        let result = match outcome {
            Outcome::Value(value) => match self.table.update_value(&target.name, value) {
                Ok(()) => self
                    .table
                    .get_symbol(&target.name)
                    .and_then(|e| e.value)
                    .map_or(Outcome::Value(value), Outcome::Value),
                Err(kind) => {
                    let msg = format!("cannot store {value} in {ty} variable '{}'", target.name);
                    self.record(kind, msg, target.line, target.column);
                    Outcome::Error(kind)
                }
            },
            Outcome::Error(kind) => {
                self.table.mark_error(&target.name, kind);
                Outcome::Error(kind)
            }
            Outcome::Unknown => {
                self.table.mark_unknown(&target.name);
                Outcome::Unknown
            }
        };
        target.result = Some(result);
    }

    /// `x++` / `x--` as `x = x ± 1`.
    fn step(&mut self, target: &mut Target, op: fn(Value, Value) -> Value) {
        if !self.table.is_declared(&target.name) {
            let msg = format!("name '{}' is not defined", target.name);
            self.record(ErrorKind::NameError, msg, target.line, target.column);
            target.result = Some(Outcome::Error(ErrorKind::NameError));
            return;
        }
        let current = self.read(&target.name, target.line, target.column);
        let next = match current {
            Outcome::Value(v) => Outcome::Value(op(v, Value::Int(1))),
            err => err,
        };
        self.assign(target, next);
    }

    /// Evaluates `expr` bottom-up, annotating every node on the way.
    pub fn evaluate(&mut self, expr: &mut Expr) -> Outcome {
        let (line, column) = (expr.line, expr.column);
        let outcome = match &mut expr.kind {
            ExprKind::Number { text } => self.literal(text, line, column),
            ExprKind::Identifier { name, ty } => {
                *ty = self.table.get_symbol(name).map(|e| e.ty);
                self.read(name, line, column)
            }
            ExprKind::Binary { op, left, right } => {
                let l = self.evaluate(left);
                let r = self.evaluate(right);
                match (l, r) {
                    (Outcome::Error(kind), _) | (_, Outcome::Error(kind)) => Outcome::Error(kind),
                    (Outcome::Value(a), Outcome::Value(b)) => self.arithmetic(*op, a, b, line, column),
                    (Outcome::Unknown, Outcome::Value(b)) if op.divides() && b.is_zero() => {
                        self.zero_divisor(*op, line, column)
                    }
                    _ => Outcome::Unknown,
                }
            }
            ExprKind::Comparison { op, left, right, state } => {
                let l = self.evaluate(left);
                let r = self.evaluate(right);
                match (l, r) {
                    (Outcome::Error(kind), _) | (_, Outcome::Error(kind)) => Outcome::Error(kind),
                    (Outcome::Value(a), Outcome::Value(b)) => {
                        let holds = op.apply(a, b);
                        *state = Some(holds);
                        Outcome::Value(Value::from_bool(holds))
                    }
                    _ => Outcome::Unknown,
                }
            }
            ExprKind::Logical { op, left, right } => {
                let l = self.evaluate(left);
                let r = self.evaluate(right);
                match (l, r) {
                    (Outcome::Error(kind), _) | (_, Outcome::Error(kind)) => Outcome::Error(kind),
                    (Outcome::Value(a), Outcome::Value(b)) => {
                        let holds = match op {
                            LogicalOp::And => a.is_truthy() && b.is_truthy(),
                            LogicalOp::Or => a.is_truthy() || b.is_truthy(),
                        };
                        Outcome::Value(Value::from_bool(holds))
                    }
                    // a known operand can still decide the result
                    (Outcome::Value(v), Outcome::Unknown) | (Outcome::Unknown, Outcome::Value(v)) => {
                        match (op, v.is_truthy()) {
                            (LogicalOp::And, false) => Outcome::Value(Value::from_bool(false)),
                            (LogicalOp::Or, true) => Outcome::Value(Value::from_bool(true)),
                            _ => Outcome::Unknown,
                        }
                    }
                    (Outcome::Unknown, Outcome::Unknown) => Outcome::Unknown,
                }
            }
        };
        expr.result = Some(outcome);
        outcome
    }

    fn literal(&mut self, text: &str, line: usize, column: usize) -> Outcome {
        let parsed = if text.contains('.') {
            text.parse::<f64>().ok().map(Value::Float)
        } else {
            text.parse::<i64>().ok().map(Value::Int)
        };
        match parsed {
            Some(v) => Outcome::Value(v),
            None => {
                let msg = format!("numeric literal '{text}' is out of range");
                self.record(ErrorKind::InvalidLiteral, msg, line, column);
                Outcome::Error(ErrorKind::InvalidLiteral)
            }
        }
    }

    fn read(&mut self, name: &str, line: usize, column: usize) -> Outcome {
        self.table.add_usage(name, line);
        let Some(entry) = self.table.get_symbol(name) else {
            let msg = format!("name '{name}' is not defined");
            self.record(ErrorKind::NameError, msg, line, column);
            return Outcome::Error(ErrorKind::NameError);
        };
        // already reported where the entry was poisoned
        if let Some(kind) = entry.error {
            return Outcome::Error(kind);
        }
        if entry.unknown {
            return Outcome::Unknown;
        }
        let value = entry.value;
        match value {
            Some(v) => Outcome::Value(v),
            None => {
                let msg = format!("variable '{name}' is used before being assigned");
                self.record(ErrorKind::NameError, msg, line, column);
                Outcome::Error(ErrorKind::NameError)
            }
        }
    }

    fn arithmetic(&mut self, op: BinaryOp, a: Value, b: Value, line: usize, column: usize) -> Outcome {
        let value = match op {
            BinaryOp::Plus => a.add(b),
            BinaryOp::Minus => a.sub(b),
            BinaryOp::Times => a.mul(b),
            BinaryOp::Divide | BinaryOp::Mod if b.is_zero() => return self.zero_divisor(op, line, column),
            BinaryOp::Divide => a.div(b),
            BinaryOp::Mod => a.rem(b),
            BinaryOp::Pow => a.pow(b),
        };
        Outcome::Value(value)
    }

    fn zero_divisor(&mut self, op: BinaryOp, line: usize, column: usize) -> Outcome {
        let what = if op == BinaryOp::Divide { "division" } else { "modulo" };
        self.record(ErrorKind::DivisionByZero, format!("{what} by zero"), line, column);
        Outcome::Error(ErrorKind::DivisionByZero)
    }

    fn record(&mut self, kind: ErrorKind, message: String, line: usize, column: usize) {
        tracing::debug!(%kind, line, column, "{message}");
        self.errors.push(SemanticError { kind, message, line, column });
    }

    fn nodes_since(&self, mark: usize) -> Vec<ErrorNode> {
        self.errors[mark..]
            .iter()
            .map(|e| ErrorNode { kind: e.kind, message: e.message.clone(), line: e.line })
            .collect()
    }

    /// Like `nodes_since`, but a target poisoned by an earlier statement still
    /// gets a node here even though no new error was recorded.
    fn nodes_for_assignment(&self, mark: usize, target: &Target, line: usize) -> Vec<ErrorNode> {
        let mut nodes = self.nodes_since(mark);
        if let (true, Some(Outcome::Error(kind))) = (nodes.is_empty(), target.result) {
            nodes.push(ErrorNode {
                kind,
                message: format!("'{}' depends on an earlier {kind}", target.name),
                line,
            });
        }
        nodes
    }
}
