//! Syntax tree of the PHP subset the cleaner reasons about.
//!
//! The tree is single-owner: statements own their children through `Vec` and `Box`,
//! so passes can rewrite any slot in place.

mod decl;
mod expr;
mod name;
mod node;
mod stmt;

pub use decl::*;
pub use expr::*;
pub use name::*;
pub use node::*;
pub use stmt::*;
