use psy_core::ast::{Expr, ExprKind, MagicConst, Name, NodeMut};
use psy_core::visit::Action;
use psy_core::Result;

use crate::pass::{Pass, PassContext};

/// `__DIR__` and `__FILE__` mean nothing for code typed at a prompt.
pub struct MagicConstantsPass;

impl Pass for MagicConstantsPass {
    fn name(&self) -> &'static str {
        "magic_constants"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let span = expr.span;
        Ok(match expr.kind {
            ExprKind::MagicConst(MagicConst::Dir) => Action::replace(Expr::func_call(
                Name::unqualified("getcwd", span),
                vec![],
                span,
            )),
            ExprKind::MagicConst(MagicConst::File) => Action::replace(Expr::string("", span)),
            _ => Action::Continue,
        })
    }
}
