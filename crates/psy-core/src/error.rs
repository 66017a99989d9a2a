use std::fmt;
use std::result;
use thiserror::Error;

/// Severity tag of a [`ValidationError`], mirroring how PHP itself would have reported
/// the same problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed syntax, or a construct PHP rejects at parse time.
    Parse,
    /// Would be an uncatchable fatal error at runtime.
    Fatal,
    /// Would be a PHP warning; raised as an error so the snippet is not evaluated.
    Warning,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "PHP Parse error",
            ErrorKind::Fatal => "PHP Fatal error",
            ErrorKind::Warning => "PHP Warning",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A structured failure raised by a pass. The first one raised aborts the snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: u32,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{}:  {} on line {}", self.kind, self.message, self.line)
        } else {
            write!(f, "{}:  {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn parse(message: impl Into<String>, line: u32) -> Self {
        Error::Validation(ValidationError::new(ErrorKind::Parse, message, line))
    }

    pub fn fatal(message: impl Into<String>, line: u32) -> Self {
        Error::Validation(ValidationError::new(ErrorKind::Fatal, message, line))
    }

    pub fn warning(message: impl Into<String>, line: u32) -> Self {
        Error::Validation(ValidationError::new(ErrorKind::Warning, message, line))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.as_validation().map(|err| err.kind)
    }

    /// Message without the severity prefix and line suffix.
    pub fn message(&self) -> &str {
        match self {
            Error::Validation(err) => &err.message,
            Error::Internal(msg) | Error::Generic(msg) => msg,
        }
    }

    pub fn line(&self) -> Option<u32> {
        self.as_validation().map(|err| err.line)
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Internal(_))
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

// Convert from std::io::Error to our Error type
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display_matches_php() {
        let err = Error::fatal("Cannot re-assign $this", 3);
        assert_eq!(
            err.to_string(),
            "PHP Fatal error:  Cannot re-assign $this on line 3"
        );
        assert_eq!(err.kind(), Some(ErrorKind::Fatal));
        assert_eq!(err.message(), "Cannot re-assign $this");
    }

    #[test]
    fn internal_errors_have_no_kind() {
        let err = Error::internal("bad slot");
        assert!(err.is_internal());
        assert_eq!(err.kind(), None);
        assert_eq!(err.line(), None);
    }
}
