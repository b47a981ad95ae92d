// lexer.rs

use std::path::Path;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use unicode_ident::{is_xid_continue, is_xid_start};
use unicode_normalization::UnicodeNormalization;

use crate::core::token::{Token, TokenKind};

/// Lexer error types with detailed location. None of them stop the scan.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}:{2}")]
    UnexpectedCharacter(char, usize, usize),
    #[error("Invalid number literal '{0}' at {1}:{2}")]
    InvalidNumber(String, usize, usize),
    #[error("Unterminated comment starting at {0}:{1}")]
    UnterminatedComment(usize, usize),
}

impl LexerError {
    pub fn line(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter(_, line, _)
            | LexerError::InvalidNumber(_, line, _)
            | LexerError::UnterminatedComment(line, _) => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            LexerError::UnexpectedCharacter(_, _, col)
            | LexerError::InvalidNumber(_, _, col)
            | LexerError::UnterminatedComment(_, col) => *col,
        }
    }

    /// Underline width for diagnostics.
    pub fn len(&self) -> usize {
        match self {
            LexerError::InvalidNumber(text, _, _) => text.chars().count().max(1),
            LexerError::UnterminatedComment(..) => 2,
            LexerError::UnexpectedCharacter(..) => 1,
        }
    }
}

impl Serialize for LexerError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("LexerError", 3)?;
        st.serialize_field("message", &self.to_string())?;
        st.serialize_field("line", &self.line())?;
        st.serialize_field("column", &self.column())?;
        st.end()
    }
}

/// Result of one scan: every token that could be classified plus every error, in source order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexerError>,
}

impl Lexed {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads `path` fully, then scans it. The file handle is released before lexing starts.
pub fn tokenize_file(path: &Path) -> std::io::Result<Lexed> {
    let source = std::fs::read_to_string(path)?;
    Ok(Lexer::new(&source).tokenize())
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<LexerError>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.nfc().collect(),
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenizes the entire input, collecting lexical errors instead of stopping at them.
    pub fn tokenize(mut self) -> Lexed {
        while let Some(ch) = self.current() {
            if is_safe_whitespace(ch) {
                self.advance_char();
                continue;
            }

            if ch == '/' {
                match self.peek_char() {
                    Some('/') => {
                        self.lex_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.lex_block_comment();
                        continue;
                    }
                    _ => {}
                }
            }

            if ch.is_ascii_digit() {
                self.lex_number(false);
            } else if ch == '-' && self.peek_char().is_some_and(|c| c.is_ascii_digit()) && self.in_unary_context() {
                self.lex_number(true);
            } else if is_identifier_start(ch) {
                self.lex_identifier();
            } else if let Some((kind, text)) = self.match_multi_char_operator(ch) {
                let (line, col) = self.pos();
                self.advance_char();
                self.advance_char();
                self.tokens.push(Token::new(kind, text, line, col));
            } else if let Some(kind) = match_single_char_token(ch) {
                let (line, col) = self.pos();
                self.advance_char();
                self.tokens.push(Token::new(kind, ch.to_string(), line, col));
            } else {
                let (line, col) = self.pos();
                self.errors.push(LexerError::UnexpectedCharacter(ch, line, col));
                self.advance_char();
            }
        }

        tracing::debug!(tokens = self.tokens.len(), errors = self.errors.len(), "lexed source");
        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    #[inline]
    fn pos(&self) -> (usize, usize) {
        (self.line, self.col)
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[inline]
    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    #[inline]
    fn advance_char(&mut self) {
        if let Some(ch) = self.current() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    /// A '-' starts a negative literal unless it follows an operand.
    fn in_unary_context(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(prev) => !(prev.kind == TokenKind::Identifier || prev.kind == TokenKind::RParen || prev.kind.is_number()),
        }
    }

    fn lex_line_comment(&mut self) {
        while let Some(ch) = self.current() {
            self.advance_char();
            if ch == '\n' {
                break;
            }
        }
    }

    fn lex_block_comment(&mut self) {
        let (start_line, start_col) = self.pos();
        // consume "/*"
        self.advance_char();
        self.advance_char();
        while let Some(ch) = self.current() {
            if ch == '*' && self.peek_char() == Some('/') {
                self.advance_char();
                self.advance_char();
                return;
            }
            self.advance_char();
        }
        self.errors.push(LexerError::UnterminatedComment(start_line, start_col));
    }

    fn lex_number(&mut self, negative: bool) {
        let (line, col) = self.pos();
        let mut text = String::new();
        if negative {
            text.push('-');
            self.advance_char();
        }
        self.take_digits(&mut text);

        let mut is_real = false;
        if self.current() == Some('.') && self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            text.push('.');
            self.advance_char();
            self.take_digits(&mut text);
        }

        // "12abc" is one malformed literal, not a number followed by a name
        if self.current().is_some_and(is_identifier_part) {
            while let Some(ch) = self.current() {
                if !is_identifier_part(ch) {
                    break;
                }
                text.push(ch);
                self.advance_char();
            }
            self.errors.push(LexerError::InvalidNumber(text, line, col));
            return;
        }

        let kind = match (negative, is_real) {
            (false, false) => TokenKind::IntegerNumber,
            (false, true) => TokenKind::RealNumber,
            (true, false) => TokenKind::NegativeIntegerNumber,
            (true, true) => TokenKind::NegativeRealNumber,
        };
        self.tokens.push(Token::new(kind, text, line, col));
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.current() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance_char();
        }
    }

    fn lex_identifier(&mut self) {
        let (line, col) = self.pos();
        let mut ident = String::new();
        while let Some(ch) = self.current() {
            if !is_identifier_part(ch) {
                break;
            }
            ident.push(ch);
            self.advance_char();
        }
        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, ident, line, col));
    }

    fn match_multi_char_operator(&self, ch: char) -> Option<(TokenKind, &'static str)> {
        match (ch, self.peek_char()) {
            ('+', Some('+')) => Some((TokenKind::Increment, "++")),
            ('-', Some('-')) => Some((TokenKind::Decrement, "--")),
            ('<', Some('=')) => Some((TokenKind::Le, "<=")),
            ('>', Some('=')) => Some((TokenKind::Ge, ">=")),
            ('=', Some('=')) => Some((TokenKind::Eq, "==")),
            ('!', Some('=')) => Some((TokenKind::Ne, "!=")),
            ('&', Some('&')) => Some((TokenKind::And, "&&")),
            ('|', Some('|')) => Some((TokenKind::Or, "||")),
            _ => None,
        }
    }
}

fn match_single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Assign),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Times),
        '/' => Some(TokenKind::Divide),
        '%' => Some(TokenKind::Mod),
        '^' => Some(TokenKind::Pow),
        '<' => Some(TokenKind::Lt),
        '>' => Some(TokenKind::Gt),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        _ => None,
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch == '_' || is_xid_start(ch)
}
fn is_identifier_part(ch: char) -> bool {
    ch == '_' || is_xid_continue(ch)
}
fn is_safe_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | '\u{FEFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn negative_literal_only_in_unary_context() {
        assert_eq!(
            kinds("x = -3 - 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::NegativeIntegerNumber,
                TokenKind::Minus,
                TokenKind::IntegerNumber
            ]
        );
        assert_eq!(kinds("x-1"), vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::IntegerNumber]);
        assert_eq!(kinds("(-2.5)"), vec![TokenKind::LParen, TokenKind::NegativeRealNumber, TokenKind::RParen]);
    }

    #[test]
    fn doubled_operators() {
        assert_eq!(
            kinds("i++ j-- a && b || c != d"),
            vec![
                TokenKind::Identifier,
                TokenKind::Increment,
                TokenKind::Identifier,
                TokenKind::Decrement,
                TokenKind::Identifier,
                TokenKind::And,
                TokenKind::Identifier,
                TokenKind::Or,
                TokenKind::Identifier,
                TokenKind::Ne,
                TokenKind::Identifier
            ]
        );
    }

    #[test]
    fn real_needs_digit_after_point() {
        let lexed = Lexer::new("3.14 7.").tokenize();
        let values: Vec<_> = lexed.tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
        assert_eq!(values, vec![(TokenKind::RealNumber, "3.14"), (TokenKind::IntegerNumber, "7")]);
        assert_eq!(lexed.errors, vec![LexerError::UnexpectedCharacter('.', 1, 7)]);
    }

    #[test]
    fn errors_are_collected_and_lexing_continues() {
        let lexed = Lexer::new("int $x;\n@ y & 12ab").tokenize();
        assert_eq!(
            lexed.errors,
            vec![
                LexerError::UnexpectedCharacter('$', 1, 5),
                LexerError::UnexpectedCharacter('@', 2, 1),
                LexerError::UnexpectedCharacter('&', 2, 5),
                LexerError::InvalidNumber("12ab".into(), 2, 7),
            ]
        );
        let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Int, TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Identifier]);
    }

    #[test]
    fn comments_are_skipped_and_lines_tracked() {
        let lexed = Lexer::new("// header\nint a; /* multi\nline */ float b;").tokenize();
        assert!(lexed.is_clean());
        let lines: Vec<_> = lexed.tokens.iter().map(|t| (t.value.as_str(), t.line)).collect();
        assert_eq!(
            lines,
            vec![("int", 2), ("a", 2), (";", 2), ("float", 3), ("b", 3), (";", 3)]
        );
    }

    #[test]
    fn unterminated_comment_reported() {
        let lexed = Lexer::new("int a; /* never closed").tokenize();
        assert_eq!(lexed.errors, vec![LexerError::UnterminatedComment(1, 8)]);
        assert_eq!(lexed.tokens.len(), 3);
    }
}
