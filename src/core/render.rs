//! Text views of a compile: token listing, annotated tree and symbol table.
//! All output is deterministic for a given input.

use crate::core::ast::{ErrorNode, Expr, ExprKind, Program, Stmt, StmtKind, Target};
use crate::core::symbols::SymbolTable;
use crate::core::token::Token;

/// One display line before indentation, e.g. `Number (Value: 5, Result: 5, Line: 1)`.
#[derive(Default)]
struct Label {
    name: &'static str,
    ty: Option<String>,
    value: Option<String>,
    result: Option<String>,
    state: Option<bool>,
    line: usize,
}

impl Label {
    fn new(name: &'static str, line: usize) -> Self {
        Label { name, line, ..Default::default() }
    }

    fn ty(mut self, ty: impl ToString) -> Self {
        self.ty = Some(ty.to_string());
        self
    }

    fn value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    fn render(&self) -> String {
        let mut fields = Vec::with_capacity(5);
        if let Some(ty) = &self.ty {
            fields.push(format!("Type: {ty}"));
        }
        if let Some(value) = &self.value {
            fields.push(format!("Value: {value}"));
        }
        if let Some(result) = &self.result {
            fields.push(format!("Result: {result}"));
        }
        if let Some(state) = self.state {
            fields.push(format!("State: {}", if state { "True" } else { "False" }));
        }
        fields.push(format!("Line: {}", self.line));
        format!("{} ({})", self.name, fields.join(", "))
    }
}

struct TreeWriter {
    indent: usize,
    out: String,
}

impl TreeWriter {
    fn emit(&mut self, depth: usize, label: Label) {
        self.out.push_str(&" ".repeat(depth * self.indent));
        self.out.push_str(&label.render());
        self.out.push('\n');
    }

    fn stmts(&mut self, depth: usize, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(depth, stmt);
        }
    }

    fn stmt(&mut self, depth: usize, stmt: &Stmt) {
        let line = stmt.line;
        match &stmt.kind {
            StmtKind::Declaration { ty, target } => {
                self.emit(depth, Label::new("Declaration", line).ty(ty));
                self.target(depth + 1, target);
            }
            StmtKind::Assignment { target, value } => {
                self.emit(depth, Label::new("Assignment", line).value("="));
                self.target(depth + 1, target);
                self.expr(depth + 1, value);
            }
            StmtKind::Increment { target } => {
                self.emit(depth, Label::new("Increment", line).value("++"));
                self.target(depth + 1, target);
            }
            StmtKind::Decrement { target } => {
                self.emit(depth, Label::new("Decrement", line).value("--"));
                self.target(depth + 1, target);
            }
            StmtKind::If { condition, then_branch, else_branch } => {
                self.emit(depth, Label::new("If", line));
                self.expr(depth + 1, condition);
                self.emit(depth + 1, Label::new("TrueBranch", line));
                self.stmts(depth + 2, then_branch);
                if let Some(else_branch) = else_branch {
                    let else_line = else_branch.first().map_or(line, |s| s.line);
                    self.emit(depth + 1, Label::new("FalseBranch", else_line));
                    self.stmts(depth + 2, else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.emit(depth, Label::new("While", line).ty("Loop"));
                self.expr(depth + 1, condition);
                self.stmts(depth + 1, body);
            }
            StmtKind::DoWhile { body, condition } => {
                self.emit(depth, Label::new("DoWhile", line).ty("Loop"));
                self.stmts(depth + 1, body);
                self.expr(depth + 1, condition);
            }
            StmtKind::Input { target } => {
                self.emit(depth, Label::new("Input", line));
                self.target(depth + 1, target);
            }
            StmtKind::Output { expr } => {
                self.emit(depth, Label::new("Output", line));
                self.expr(depth + 1, expr);
            }
        }
        for error in &stmt.errors {
            self.error(depth + 1, error);
        }
    }

    fn target(&mut self, depth: usize, target: &Target) {
        let mut label = Label::new("Identifier", target.line).value(&target.name);
        label.ty = target.ty.map(|t| t.to_string());
        label.result = target.result.map(|r| r.to_string());
        self.emit(depth, label);
    }

    fn expr(&mut self, depth: usize, expr: &Expr) {
        let mut label = match &expr.kind {
            ExprKind::Number { text } => Label::new("Number", expr.line).value(text),
            ExprKind::Identifier { name, ty } => {
                let mut label = Label::new("Identifier", expr.line).value(name);
                label.ty = ty.map(|t| t.to_string());
                label
            }
            ExprKind::Binary { op, .. } => Label::new("BinaryOp", expr.line).value(op.symbol()),
            ExprKind::Comparison { op, state, .. } => {
                let mut label = Label::new("Comparison", expr.line).value(op.symbol());
                label.state = *state;
                label
            }
            ExprKind::Logical { op, .. } => Label::new("LogicalOp", expr.line).value(op.symbol()),
        };
        label.result = expr.result.map(|r| r.to_string());
        self.emit(depth, label);

        match &expr.kind {
            ExprKind::Binary { left, right, .. }
            | ExprKind::Comparison { left, right, .. }
            | ExprKind::Logical { left, right, .. } => {
                self.expr(depth + 1, left);
                self.expr(depth + 1, right);
            }
            ExprKind::Number { .. } | ExprKind::Identifier { .. } => {}
        }
    }

    fn error(&mut self, depth: usize, error: &ErrorNode) {
        self.emit(depth, Label::new("Error", error.line).ty(error.kind).value(&error.message));
    }
}

/// Indented tree, one node per line, `indent` spaces per level.
pub fn render_tree(program: &Program, indent: usize) -> String {
    let mut w = TreeWriter { indent, out: String::new() };
    w.emit(0, Label::new("Program", program.line));
    w.stmts(1, &program.items);
    w.out
}

pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    for t in tokens {
        let pos = format!("{}:{}", t.line, t.column);
        out.push_str(&format!("{pos:<8} {:<24} {}\n", t.kind.name(), t.value));
    }
    out
}

/// Aligned table in declaration order, followed by the redeclaration history.
pub fn render_symbols(table: &SymbolTable) -> String {
    const HEADER: [&str; 6] = ["Variable", "Type", "Value", "LOC", "Lines", "Error"];

    let rows: Vec<[String; 6]> = table
        .get_symbols()
        .iter()
        .map(|(name, e)| {
            [
                name.clone(),
                e.ty.to_string(),
                match (e.value, e.unknown) {
                    (Some(v), _) => v.to_string(),
                    (None, true) => "unknown".to_string(),
                    (None, false) => "-".to_string(),
                },
                e.declared_at.to_string(),
                e.usage_lines.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(", "),
                e.error.map_or_else(|| "-".to_string(), |k| k.to_string()),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells.iter().zip(widths).map(|(c, w)| format!("{c:<w$}")).collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    };
    push_row(&HEADER);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&rule.iter().map(String::as_str).collect::<Vec<_>>());
    for row in &rows {
        push_row(&row.iter().map(String::as_str).collect::<Vec<_>>());
    }

    if !table.redeclarations().is_empty() {
        out.push_str("\nRedeclarations:\n");
        for r in table.redeclarations() {
            let outcome = if r.upgraded {
                format!("{} -> {} (upgraded)", r.previous, r.requested)
            } else {
                format!("kept {}, requested {}", r.previous, r.requested)
            };
            out.push_str(&format!("  {}: {} at line {}\n", r.name, outcome, r.line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::compile_source;

    #[test]
    fn tree_shows_results_and_errors() {
        let out = compile_source("main {\n  int x;\n  x = 5.5;\n}").unwrap();
        let tree = render_tree(&out.program, 2);
        let expected = "\
Program (Line: 1)
  Declaration (Type: int, Line: 2)
    Identifier (Type: int, Value: x, Line: 2)
  Assignment (Value: =, Line: 3)
    Identifier (Type: int, Value: x, Result: TypeError, Line: 3)
    Number (Value: 5.5, Result: 5.5, Line: 3)
    Error (Type: TypeError, Value: cannot store 5.5 in int variable 'x', Line: 3)
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn comparison_renders_state() {
        let out = compile_source("main { int a; a = 2; while (a >= 3) { a--; } }").unwrap();
        let tree = render_tree(&out.program, 1);
        assert!(tree.contains(" Comparison (Value: >=, Result: 0, State: False, Line: 1)"), "{tree}");
        assert_eq!(tree, render_tree(&out.program, 1));
    }

    #[test]
    fn symbol_table_columns() {
        let out = compile_source("main {\nint x;\nfloat x;\nx = 2;\n}").unwrap();
        let text = render_symbols(&out.symbols);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Variable | Type  | Value | LOC | Lines   | Error"));
        lines.next();
        assert_eq!(lines.next(), Some("x        | float | 2.0   | 1   | 2, 3, 4 | -"));
        assert!(text.ends_with("Redeclarations:\n  x: int -> float (upgraded) at line 3\n"));
    }

    #[test]
    fn input_renders_as_unknown() {
        let out = compile_source("main {\nint x, y;\ncin x;\ny = x + 1;\n}").unwrap();
        assert!(out.semantic_errors.is_empty(), "{:?}", out.semantic_errors);
        let tree = render_tree(&out.program, 1);
        assert!(tree.contains("  Identifier (Type: int, Value: x, Result: Unknown, Line: 3)"), "{tree}");
        assert!(tree.contains("  BinaryOp (Value: +, Result: Unknown, Line: 4)"), "{tree}");
        let table = render_symbols(&out.symbols);
        assert!(table.contains("x        | int  | unknown | 1   | 2, 3, 4 | -"), "{table}");
    }

    #[test]
    fn token_listing() {
        let out = compile_source("main { }").unwrap();
        assert_eq!(
            render_tokens(&out.tokens),
            "1:1      MAIN                     main\n1:6      LBRACE                   {\n1:8      RBRACE                   }\n"
        );
    }
}
