use psy_core::ast::{ExprKind, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// Rejects `$this = ...` and `$this =& ...`.
pub struct AssignThisVariablePass;

impl Pass for AssignThisVariablePass {
    fn name(&self) -> &'static str {
        "assign_this_variable"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if let NodeMut::Expr(expr) = node {
            if let ExprKind::Assign(assign) = &expr.kind {
                if assign.var.as_named_variable() == Some("this") {
                    bail_fatal!(expr.line(), "Cannot re-assign $this");
                }
            }
        }
        Ok(Action::Continue)
    }
}
