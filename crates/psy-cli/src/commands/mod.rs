//! Command implementations for the psy CLI

pub mod clean;
pub mod common;
pub mod config;
pub mod parse;
pub mod repl;
pub mod symbols;

// Re-export command functions
pub use clean::clean_command;
pub use config::config_command;
pub use parse::parse_command;
pub use repl::repl_command;
pub use symbols::symbols_command;
