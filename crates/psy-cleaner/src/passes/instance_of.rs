use psy_core::ast::{ExprKind, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// Before PHP 7.3, a constant left-hand side of `instanceof` was a compile error.
pub struct InstanceOfPass;

impl Pass for InstanceOfPass {
    fn name(&self) -> &'static str {
        "instance_of"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        if ctx.config.php_version.at_least(7, 3) {
            return Ok(Action::SkipChildren);
        }
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        if let ExprKind::Instanceof(instanceof) = &expr.kind {
            let constant = matches!(
                instanceof.expr.kind,
                ExprKind::Literal(_)
                    | ExprKind::MagicConst(_)
                    | ExprKind::BinOp(_)
                    | ExprKind::Array(_)
                    | ExprKind::ConstFetch(_)
            );
            if constant {
                bail_fatal!(
                    expr.line(),
                    "instanceof expects an object instance, constant given"
                );
            }
        }
        Ok(Action::Continue)
    }
}
