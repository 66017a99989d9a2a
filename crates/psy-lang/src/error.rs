use thiserror::Error;

use crate::lexer::LexerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Input ended where more tokens were required.
    UnexpectedEof,
    UnterminatedString,
    UnterminatedComment,
    UnterminatedHeredoc,
    Syntax,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} on line {line}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub line: u32,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn syntax(message: impl Into<String>, line: u32) -> Self {
        Self::new(ParseErrorKind::Syntax, message, line)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == ParseErrorKind::UnexpectedEof
    }

    /// Errors that more input lines could still fix.
    pub fn is_unterminated(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::UnterminatedString
                | ParseErrorKind::UnterminatedComment
                | ParseErrorKind::UnterminatedHeredoc
        )
    }
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        let message = err.to_string();
        match err {
            LexerError::UnterminatedString { line } => {
                ParseError::new(ParseErrorKind::UnterminatedString, message, line)
            }
            LexerError::UnterminatedComment { line } => {
                ParseError::new(ParseErrorKind::UnterminatedComment, message, line)
            }
            LexerError::UnterminatedHeredoc { line } => {
                ParseError::new(ParseErrorKind::UnterminatedHeredoc, message, line)
            }
            LexerError::UnexpectedChar { line, .. } => ParseError::syntax(message, line),
        }
    }
}

impl From<ParseError> for psy_core::Error {
    fn from(err: ParseError) -> Self {
        psy_core::Error::parse(err.message, err.line)
    }
}
