use psy_core::ast::{Arg, Expr, ExprKind, IncludeKind, Name, NodeMut};
use psy_core::visit::Action;
use psy_core::Result;

use crate::pass::{Pass, PassContext};

/// Routes `require` targets through the shell's resolver so a missing file is
/// reported instead of killing the process.
pub struct RequirePass;

impl Pass for RequirePass {
    fn name(&self) -> &'static str {
        "require"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let span = expr.span;
        let ExprKind::Include(include) = &mut expr.kind else {
            return Ok(Action::Continue);
        };
        if !matches!(include.kind, IncludeKind::Require | IncludeKind::RequireOnce) {
            return Ok(Action::Continue);
        }
        let target = std::mem::replace(
            include.expr.as_mut(),
            Expr::new(ExprKind::NoReturnValue, span),
        );
        let resolver = Name::fully_qualified(["Psy", "CodeCleaner", "RequirePass"], span);
        let args = vec![
            Arg::new(target),
            Arg::new(Expr::int(i64::from(span.start_line), span)),
        ];
        *include.expr = Expr::static_call(resolver, "resolve", args, span);
        Ok(Action::Continue)
    }
}
