//! Lexer and parser for the PHP subset handled by the code cleaner.
//!
//! ```
//! let stmts = psy_lang::parse("<?php echo 'hi';").unwrap();
//! assert_eq!(stmts.len(), 1);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::{parse, parse_expression};
