#[macro_use]
pub mod macros;

pub mod ast;
pub mod error;
pub mod pretty;
pub mod printer;
pub mod span;
pub mod utils;
pub mod visit;

// Alias for error types
pub type Error = crate::error::Error;
pub type Result<T> = crate::error::Result<T>;
