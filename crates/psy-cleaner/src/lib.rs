//! Code cleaner for an interactive PHP shell.
//!
//! Each snippet typed at the prompt is parsed, run through an ordered set of
//! validation and rewrite passes, and printed back as code that is safe to
//! evaluate inside a long-lived process. State that has to survive between
//! snippets (namespace, `use` aliases, strict types, declared symbols) lives in
//! [`SessionState`].
//!
//! ```
//! use psy_cleaner::CodeCleaner;
//!
//! let mut cleaner = CodeCleaner::new().unwrap();
//! let cleaned = cleaner.clean(&["4"]).unwrap();
//! assert_eq!(cleaned.as_deref(), Some("return 4;"));
//! ```

pub mod cleaner;
pub mod config;
pub mod oracle;
pub mod pass;
pub mod passes;
pub mod require;
pub mod scope;
pub mod session;

pub use cleaner::{CodeCleaner, CodeCleanerBuilder};
pub use config::{CleanerConfig, PhpVersion};
pub use oracle::{ClassInfo, FunctionInfo, SymbolOracle, SymbolTable};
pub use pass::{Pass, PassContext, PassSet};
pub use require::RequireResolver;
pub use scope::NameScope;
pub use session::SessionState;

pub use psy_core::error::{ErrorKind, ValidationError};
pub use psy_core::{Error, Result};
