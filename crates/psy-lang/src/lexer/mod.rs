//! Lexer utilities and tokenization for PHP input.

pub mod tokenizer;
pub mod winnow;

pub use tokenizer::{lex, lex_from_line, Keyword, LexerError, Span, Token, TokenKind};
