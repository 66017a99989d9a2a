use psy_core::ast::{ExprKind, NameOrExpr, NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_warning, Result};

use crate::pass::{Pass, PassContext};

/// `get_class()` and `get_called_class()` need an object or an enclosing class.
#[derive(Default)]
pub struct CalledClassPass {
    class_depth: usize,
}

fn opens_class(node: &NodeMut<'_>) -> bool {
    match node {
        NodeMut::Stmt(stmt) => matches!(stmt.kind, StmtKind::Class(_) | StmtKind::Trait(_)),
        NodeMut::Expr(_) => node.is_class_like(),
        NodeMut::Member(_) => false,
    }
}

impl Pass for CalledClassPass {
    fn name(&self) -> &'static str {
        "called_class"
    }

    fn reset(&mut self) {
        self.class_depth = 0;
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if opens_class(&node) {
            self.class_depth += 1;
            return Ok(Action::Continue);
        }
        if self.class_depth > 0 {
            return Ok(Action::Continue);
        }
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let ExprKind::FuncCall(call) = &expr.kind else {
            return Ok(Action::Continue);
        };
        // Any argument other than a literal null gets the benefit of the doubt.
        if let Some(arg) = call.args.first() {
            if arg.unpack || !arg.value.is_null_literal() {
                return Ok(Action::Continue);
            }
        }
        let NameOrExpr::Name(name) = &call.name else {
            return Ok(Action::Continue);
        };
        let name = name.lowercase();
        if name == "get_class" || name == "get_called_class" {
            bail_warning!(
                expr.line(),
                "{}() called without object from outside a class",
                name
            );
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if opens_class(&node) {
            self.class_depth = self.class_depth.saturating_sub(1);
        }
        Ok(Action::Continue)
    }
}
