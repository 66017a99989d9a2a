//! Depth-first traversal of a statement list.
//!
//! Every node is visited exactly once: `enter` runs before its children and `leave`
//! after them. Callbacks answer with an [`Action`]; a replacement takes effect
//! immediately and the walker descends into the new node's children without calling
//! `enter` on the replacement itself.

mod traverse;

pub use traverse::*;

use crate::ast::{Node, NodeMut, Stmt};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Action {
    #[default]
    Continue,
    /// Keep the node but do not descend into it. `leave` is still called.
    SkipChildren,
    Replace(Node),
    /// Only valid for nodes inside a sequence; elsewhere an internal error.
    Remove,
    /// Abort the remaining walk. `after_traverse` still runs.
    Stop,
}

impl Action {
    pub fn replace(node: impl Into<Node>) -> Self {
        Action::Replace(node.into())
    }
}

#[allow(unused_variables)]
pub trait Visitor {
    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>) -> Result<Action> {
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>) -> Result<Action> {
        Ok(Action::Continue)
    }

    fn after_traverse(&mut self, stmts: &mut Vec<Stmt>) -> Result<()> {
        Ok(())
    }
}

/// Adapts a closure over entered nodes into a [`Visitor`]. Handy for read-mostly scans.
pub struct FnVisitor<F> {
    f: F,
}

impl<F> FnVisitor<F>
where
    F: FnMut(NodeMut<'_>) -> Result<Action>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Visitor for FnVisitor<F>
where
    F: FnMut(NodeMut<'_>) -> Result<Action>,
{
    fn enter(&mut self, node: NodeMut<'_>) -> Result<Action> {
        (self.f)(node)
    }
}
