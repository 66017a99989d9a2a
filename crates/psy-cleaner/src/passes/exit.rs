use psy_core::ast::{Expr, ExprKind, Name, NodeMut};
use psy_core::visit::Action;
use psy_core::Result;

use crate::pass::{Pass, PassContext};
use crate::passes::VALIDATORS;

/// `exit` would kill the shell; throw the break signal instead.
pub struct ExitPass;

impl Pass for ExitPass {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn after(&self) -> &'static [&'static str] {
        VALIDATORS
    }

    fn reset(&mut self) {}

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if let NodeMut::Expr(expr) = node {
            if let ExprKind::Exit(_) = expr.kind {
                let class = Name::fully_qualified(["Psy", "Exception", "BreakException"], expr.span);
                return Ok(Action::replace(Expr::static_call(
                    class,
                    "exitShell",
                    vec![],
                    expr.span,
                )));
            }
        }
        Ok(Action::Continue)
    }
}
