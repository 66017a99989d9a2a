//! Command-line front end for the PHP shell code cleaner.
//!
//! The `psy` binary cleans snippet files or a line-buffered stdin session the
//! way the interactive shell would, and prints the code that would be
//! evaluated, or the error that would be shown instead.

pub mod cli;
pub mod commands;
pub mod diagnostics;

// CLI-specific error handling
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CliError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration error: {0}")]
        Config(String),

        #[error(transparent)]
        Clean(#[from] psy_core::Error),

        #[error("Invalid input: {0}")]
        InvalidInput(String),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        /// Snippets were rejected; each one has already been reported.
        #[error("{0} snippet(s) rejected")]
        Rejected(usize),

        #[error("{0:#}")]
        Other(#[from] eyre::Report),
    }

    pub type Result<T> = std::result::Result<T, CliError>;
}

pub use error::{CliError, Result};
