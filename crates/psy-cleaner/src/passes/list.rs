use psy_core::ast::{ExprArray, ExprKind, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_parse, Result};

use crate::pass::{Pass, PassContext};

/// Destructuring targets must be non-empty and writable.
pub struct ListPass;

fn check_items(array: &ExprArray, line: u32, at_least_71: bool) -> Result<()> {
    if array.items.iter().all(Option::is_none) {
        bail_parse!(line, "Cannot use empty list");
    }
    for item in array.items.iter().flatten() {
        if !at_least_71 {
            if let Some(key) = &item.key {
                bail_parse!(
                    key.line(),
                    "Syntax error, unexpected T_CONSTANT_ENCAPSED_STRING, expecting ',' or ')'"
                );
            }
        }
        match &item.value.kind {
            ExprKind::Array(nested) | ExprKind::List(nested) => {
                check_items(nested, item.value.line(), at_least_71)?
            }
            _ if item.value.is_writable() => {}
            _ => bail_parse!(item.span.start_line, "Assignments can only happen to writable values"),
        }
    }
    Ok(())
}

impl Pass for ListPass {
    fn name(&self) -> &'static str {
        "list"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let ExprKind::Assign(assign) = &expr.kind else {
            return Ok(Action::Continue);
        };
        let at_least_71 = ctx.config.php_version.at_least(7, 1);
        match &assign.var.kind {
            ExprKind::Array(_) if !at_least_71 => {
                bail_parse!(assign.value.line(), "syntax error, unexpected '='")
            }
            ExprKind::Array(array) | ExprKind::List(array) => {
                check_items(array, assign.var.line(), at_least_71)?
            }
            _ => {}
        }
        Ok(Action::Continue)
    }
}
