use psy_core::ast::{ExprKind, NodeMut, Variable};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// The shell keeps its own state in `$__psysh__`; user code may not touch it.
pub struct LeavePsyshAlonePass;

impl Pass for LeavePsyshAlonePass {
    fn name(&self) -> &'static str {
        "leave_psysh_alone"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if let NodeMut::Expr(expr) = node {
            if let ExprKind::Variable(Variable::Named(name)) = &expr.kind {
                if name == "__psysh__" {
                    bail_fatal!(expr.line(), "Don't mess with $__psysh__; bad things will happen");
                }
            }
        }
        Ok(Action::Continue)
    }
}
