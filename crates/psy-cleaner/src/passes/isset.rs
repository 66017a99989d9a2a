use psy_core::ast::{Expr, ExprKind, NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, bail_parse, Result};

use crate::pass::{Pass, PassContext};

/// `isset()` and `unset()` only accept variables and member or element fetches.
pub struct IssetPass;

impl Pass for IssetPass {
    fn name(&self) -> &'static str {
        "isset"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        match node {
            NodeMut::Expr(expr) => {
                if let ExprKind::Isset(vars) = &expr.kind {
                    if !vars.iter().all(Expr::is_writable) {
                        bail_fatal!(
                            expr.line(),
                            "Cannot use isset() on the result of an expression (you can use \"null !== expression\" instead)"
                        );
                    }
                }
            }
            NodeMut::Stmt(stmt) => {
                if let StmtKind::Unset(vars) = &stmt.kind {
                    if let Some(var) = vars.iter().find(|var| !var.is_writable() && !var.is_call()) {
                        bail_parse!(var.line(), "Cannot use unset() on the result of an expression");
                    }
                }
            }
            NodeMut::Member(_) => {}
        }
        Ok(Action::Continue)
    }
}
