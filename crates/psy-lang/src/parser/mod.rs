//! Recursive-descent parser with a Pratt loop for binary operators.

mod decl;
mod expr;
mod stmt;
mod string;

use psy_core::ast::{Expr, Stmt};
use psy_core::span::Span;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{lex, lex_from_line, Keyword, Token, TokenKind};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Parse a complete snippet. A leading `<?php` tag is optional.
pub fn parse(source: &str) -> Result<Vec<Stmt>, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser::new(&tokens, 1);
    let stmts = parser.parse_program()?;
    tracing::trace!("parsed {} top-level statements", stmts.len());
    Ok(stmts)
}

/// Parse a single expression with nothing trailing it.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    parse_expression_at(source, 1)
}

pub(crate) fn parse_expression_at(source: &str, first_line: u32) -> Result<Expr, ParseError> {
    let tokens = lex_from_line(source, first_line)?;
    let mut parser = Parser::new(&tokens, first_line);
    let expr = parser.parse_expr()?;
    if !parser.at_eof() {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    eof_line: u32,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token], first_line: u32) -> Self {
        let eof_line = tokens
            .last()
            .map(|token| token.end_line)
            .unwrap_or(first_line);
        Self {
            tokens,
            pos: 0,
            eof_line,
        }
    }

    pub(crate) fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + n)
    }

    pub(crate) fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn at_symbol(&self, symbol: &str) -> bool {
        self.nth_is_symbol(0, symbol)
    }

    pub(crate) fn nth_is_symbol(&self, n: usize, symbol: &str) -> bool {
        self.peek_nth(n).is_some_and(|token| token.is_symbol(symbol))
    }

    pub(crate) fn match_symbol(&mut self, symbol: &str) -> bool {
        if self.at_symbol(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_symbol(&mut self, symbol: &str) -> PResult<&'t Token> {
        match self.peek() {
            Some(token) if token.is_symbol(symbol) => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected_expecting(&format!("'{}'", symbol))),
        }
    }

    pub(crate) fn at_keyword(&self, keyword: Keyword) -> bool {
        self.nth_is_keyword(0, keyword)
    }

    pub(crate) fn nth_is_keyword(&self, n: usize, keyword: Keyword) -> bool {
        self.peek_nth(n).is_some_and(|token| token.is_keyword(keyword))
    }

    pub(crate) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword, text: &str) -> PResult<&'t Token> {
        match self.peek() {
            Some(token) if token.is_keyword(keyword) => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected_expecting(&format!("'{}'", text))),
        }
    }

    /// Identifier that may also be a reserved word: method, constant and label names.
    pub(crate) fn expect_word(&mut self) -> PResult<&'t Token> {
        match self.peek() {
            Some(token) if token.is_word() => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected_expecting("identifier")),
        }
    }

    pub(crate) fn expect_ident(&mut self) -> PResult<&'t Token> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Ident => {
                self.pos += 1;
                Ok(token)
            }
            _ => Err(self.unexpected_expecting("identifier")),
        }
    }

    /// `$name`, returned without the sigil.
    pub(crate) fn expect_variable(&mut self) -> PResult<String> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Variable => {
                self.pos += 1;
                Ok(token.lexeme[1..].to_string())
            }
            _ => Err(self.unexpected_expecting("variable")),
        }
    }

    pub(crate) fn expect_semicolon(&mut self) -> PResult<()> {
        self.expect_symbol(";").map(|_| ())
    }

    pub(crate) fn unexpected(&self) -> ParseError {
        match self.peek() {
            None => ParseError::new(
                ParseErrorKind::UnexpectedEof,
                "Syntax error, unexpected EOF",
                self.eof_line,
            ),
            Some(token) => ParseError::syntax(
                format!("Syntax error, unexpected {}", describe(token)),
                token.line,
            ),
        }
    }

    pub(crate) fn unexpected_expecting(&self, expected: &str) -> ParseError {
        let mut err = self.unexpected();
        err.message = format!("{}, expecting {}", err.message, expected);
        err
    }

    /// Span from the token at `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: usize) -> Span {
        let Some(first) = self.tokens.get(start).or_else(|| self.tokens.last()) else {
            return Span::new(0, 0, self.eof_line, self.eof_line);
        };
        let last = if self.pos > start {
            &self.tokens[self.pos - 1]
        } else {
            first
        };
        Span::new(
            first.span.start as u32,
            last.span.end as u32,
            first.line,
            last.end_line,
        )
    }

    pub(crate) fn token_span(token: &Token) -> Span {
        Span::new(
            token.span.start as u32,
            token.span.end as u32,
            token.line,
            token.end_line,
        )
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Variable => format!("T_VARIABLE \"{}\"", token.lexeme),
        TokenKind::String => "T_CONSTANT_ENCAPSED_STRING".to_string(),
        TokenKind::Int => format!("T_LNUMBER \"{}\"", token.lexeme),
        TokenKind::Float => format!("T_DNUMBER \"{}\"", token.lexeme),
        _ => format!("'{}'", token.lexeme),
    }
}
