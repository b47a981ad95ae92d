//! Recursive-descent parser with one token of lookahead. Pure: it only
//! builds the tree; evaluation happens in the semantic pass.

use std::fmt;

use crate::core::ast::{BinaryOp, CompareOp, Expr, LogicalOp, Program, Stmt, StmtKind, Target, VarType};
use crate::core::token::{Token, TokenKind};

/// Deepest `(` or `{` nesting accepted. Parsing, evaluation and rendering
/// each recurse once per level.
pub const MAX_NESTING: usize = 256;

/// Most operators in one expression; bounds the height of its tree.
pub const MAX_OPERATORS: usize = 512;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Token(TokenKind),
    Statement,
    Expression,
    ShallowerNesting,
    FewerOperators,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Statement => f.write_str("a statement"),
            Expected::Expression => f.write_str("an expression"),
            Expected::ShallowerNesting => write!(f, "at most {MAX_NESTING} levels of nesting"),
            Expected::FewerOperators => write!(f, "at most {MAX_OPERATORS} operators per expression"),
        }
    }
}

/// First syntax violation; fatal for the whole compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unexpected token {found} at {line}:{column}, expected {expected}")]
pub struct ParseError {
    pub found: TokenKind,
    pub lexeme: String,
    pub expected: Expected,
    pub line: usize,
    pub column: usize,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    operators: usize,
}

impl Parser {
    /// Create new parser instance; a trailing EOF sentinel is appended
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let (line, column) = tokens
            .last()
            .map(|t| (t.line, t.column + t.value.chars().count()))
            .unwrap_or((1, 1));
        tokens.push(Token::new(TokenKind::Eof, "", line, column));
        Parser { tokens, pos: 0, depth: 0, operators: 0 }
    }

    /// Program := MAIN LBRACE Declaration* Statement* RBRACE
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let main = self.eat(TokenKind::Main)?;
        self.eat(TokenKind::LBrace)?;

        let mut items = Vec::new();
        while self.peek().kind.is_type_keyword() {
            items.extend(self.parse_declaration()?);
        }
        items.extend(self.parse_statement_list()?);

        self.eat(TokenKind::RBrace)?;
        if !self.is_at_end() {
            return Err(self.unexpected(Expected::Token(TokenKind::Eof)));
        }

        tracing::debug!(items = items.len(), "parsed program");
        Ok(Program { items, line: main.line })
    }

    /// One node per declared name, so every symbol gets its own node.
    fn parse_declaration(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let type_tok = self.advance();
        let ty = match VarType::from_token(type_tok.kind) {
            Some(ty) => ty,
            None => return Err(self.unexpected_at(&type_tok, Expected::Token(TokenKind::Int))),
        };

        let mut decls = Vec::new();
        loop {
            let name = self.eat(TokenKind::Identifier)?;
            let target = Target::new(&name.value, name.line, name.column);
            decls.push(Stmt::new(StmtKind::Declaration { ty, target }, type_tok.line));
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::Semicolon)?;
        Ok(decls)
    }

    fn parse_statement_list(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Cin => self.parse_cin(),
            TokenKind::Cout => self.parse_cout(),
            TokenKind::Identifier => self.parse_assignment_or_step(),
            _ => Err(self.unexpected(Expected::Statement)),
        }
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.enter()?;
        self.eat(TokenKind::LBrace)?;
        let stmts = self.parse_statement_list()?;
        self.eat(TokenKind::RBrace)?;
        self.depth -= 1;
        Ok(stmts)
    }

    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.eat(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.eat(TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.eat(TokenKind::If)?;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_block()?;
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Stmt::new(StmtKind::If { condition, then_branch, else_branch }, kw.line))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.eat(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Stmt::new(StmtKind::While { condition, body }, kw.line))
    }

    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.eat(TokenKind::Do)?;
        let body = self.parse_block()?;
        self.eat(TokenKind::While)?;
        let condition = self.parse_condition()?;
        let _ = self.match_token(TokenKind::Semicolon); // optional semicolon
        Ok(Stmt::new(StmtKind::DoWhile { body, condition }, kw.line))
    }

    fn parse_cin(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.eat(TokenKind::Cin)?;
        let name = self.eat(TokenKind::Identifier)?;
        self.eat(TokenKind::Semicolon)?;
        let target = Target::new(&name.value, name.line, name.column);
        Ok(Stmt::new(StmtKind::Input { target }, kw.line))
    }

    fn parse_cout(&mut self) -> Result<Stmt, ParseError> {
        let kw = self.eat(TokenKind::Cout)?;
        let expr = self.parse_expression()?;
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::new(StmtKind::Output { expr }, kw.line))
    }

    // Identifier ( "=" Expression ";" | "++" ";" | "--" ";" )
    fn parse_assignment_or_step(&mut self) -> Result<Stmt, ParseError> {
        let name = self.eat(TokenKind::Identifier)?;
        let target = Target::new(&name.value, name.line, name.column);
        let kind = match self.peek().kind {
            TokenKind::Assign => {
                self.advance();
                let value = self.parse_expression()?;
                StmtKind::Assignment { target, value }
            }
            TokenKind::Increment => {
                self.advance();
                StmtKind::Increment { target }
            }
            TokenKind::Decrement => {
                self.advance();
                StmtKind::Decrement { target }
            }
            _ => return Err(self.unexpected(Expected::Token(TokenKind::Assign))),
        };
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::new(kind, name.line))
    }

    /* ── Precedence ───────────────────────────────────────── */
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.operators = 0;
        self.expression()
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_logical()?;
        if let Some(op) = CompareOp::from_token(self.peek().kind) {
            self.count_operator()?;
            self.advance();
            let right = self.parse_logical()?;
            return Ok(Expr::new_comparison(op, left, right));
        }
        Ok(left)
    }

    fn parse_logical(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_simple()?;
        while let Some(op) = LogicalOp::from_token(self.peek().kind) {
            self.count_operator()?;
            self.advance();
            let right = self.parse_simple()?;
            expr = Expr::new_logical(op, expr, right);
        }
        Ok(expr)
    }

    fn parse_simple(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::parse_term)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Times, TokenKind::Divide, TokenKind::Mod], Self::parse_factor)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Pow], Self::parse_component)
    }

    fn parse_binary_level(
        &mut self,
        ops: &[TokenKind],
        next: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut expr = next(self)?;
        while ops.contains(&self.peek().kind) {
            self.count_operator()?;
            let op_tok = self.advance();
            let right = next(self)?;
            match BinaryOp::from_token(op_tok.kind) {
                Some(op) => expr = Expr::new_binary(op, expr, right),
                None => return Err(self.unexpected_at(&op_tok, Expected::Expression)),
            }
        }
        Ok(expr)
    }

    fn parse_component(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::LParen => {
                self.enter()?;
                self.advance();
                let expr = self.expression()?;
                self.eat(TokenKind::RParen)?;
                self.depth -= 1;
                Ok(expr)
            }
            kind if kind.is_number() => {
                self.advance();
                Ok(Expr::new_number(&tok.value, tok.line, tok.column))
            }
            TokenKind::Identifier => {
                self.advance();
                Ok(Expr::new_identifier(&tok.value, tok.line, tok.column))
            }
            _ => Err(self.unexpected(Expected::Expression)),
        }
    }

    /* ── Limits ──────────────────────────────────────────── */
    /// Opens one `(` or `{` level, failing on the token that goes past the limit.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth == MAX_NESTING {
            return Err(self.unexpected(Expected::ShallowerNesting));
        }
        self.depth += 1;
        Ok(())
    }

    fn count_operator(&mut self) -> Result<(), ParseError> {
        if self.operators == MAX_OPERATORS {
            return Err(self.unexpected(Expected::FewerOperators));
        }
        self.operators += 1;
        Ok(())
    }

    /* ── Token utils ─────────────────────────────────────── */
    /// Consume the current token if it has the expected kind; any mismatch is fatal.
    pub fn eat(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Expected::Token(kind)))
        }
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn peek(&self) -> &Token {
        // The EOF sentinel guarantees a last element
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            return true;
        }
        false
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        self.unexpected_at(self.peek(), expected)
    }

    fn unexpected_at(&self, tok: &Token, expected: Expected) -> ParseError {
        ParseError {
            found: tok.kind,
            lexeme: tok.value.clone(),
            expected,
            line: tok.line,
            column: tok.column,
        }
    }
}
