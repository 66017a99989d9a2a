use psy_core::ast::{ExprKind, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// `yield` is only valid inside a function body.
#[derive(Default)]
pub struct FunctionContextPass {
    function_depth: usize,
}

impl Pass for FunctionContextPass {
    fn name(&self) -> &'static str {
        "function_context"
    }

    fn reset(&mut self) {
        self.function_depth = 0;
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.function_depth += 1;
            return Ok(Action::Continue);
        }
        if self.function_depth > 0 {
            return Ok(Action::Continue);
        }
        if let NodeMut::Expr(expr) = node {
            if matches!(expr.kind, ExprKind::Yield(_) | ExprKind::YieldFrom(_)) {
                bail_fatal!(
                    expr.line(),
                    "The \"yield\" expression can only be used inside a function"
                );
            }
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.function_depth = self.function_depth.saturating_sub(1);
        }
        Ok(Action::Continue)
    }
}
