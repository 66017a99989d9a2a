use psy_core::ast::{ExprKind, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// `foo(&$bar)` has been a fatal error since PHP 5.4.
pub struct CallTimePassByReferencePass;

impl Pass for CallTimePassByReferencePass {
    fn name(&self) -> &'static str {
        "call_time_pass_by_reference"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let args = match &expr.kind {
            ExprKind::FuncCall(call) => &call.args,
            ExprKind::MethodCall(call) => &call.args,
            ExprKind::StaticCall(call) => &call.args,
            _ => return Ok(Action::Continue),
        };
        if args.iter().any(|arg| arg.by_ref) {
            bail_fatal!(expr.line(), "Call-time pass-by-reference has been removed");
        }
        Ok(Action::Continue)
    }
}
