use std::collections::HashSet;

use psy_core::ast::{Expr, ExprArray, ExprKind, NodeMut, StmtKind};
use psy_core::span::Span;
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// `$a[]` is a write-only slot: allowed as an assignment target, a `foreach`
/// value, or inside a destructuring pattern, never read.
#[derive(Default)]
pub struct EmptyArrayDimFetchPass {
    /// Spans of dim fetches seen in a write position.
    writable: HashSet<Span>,
}

impl EmptyArrayDimFetchPass {
    fn allow(&mut self, target: &Expr) {
        match &target.kind {
            ExprKind::ArrayDimFetch(_) => {
                self.writable.insert(target.span);
            }
            ExprKind::Array(array) | ExprKind::List(array) => self.allow_pattern(array),
            _ => {}
        }
    }

    fn allow_pattern(&mut self, array: &ExprArray) {
        for item in array.items.iter().flatten() {
            self.allow(&item.value);
        }
    }
}

impl Pass for EmptyArrayDimFetchPass {
    fn name(&self) -> &'static str {
        "empty_array_dim_fetch"
    }

    fn reset(&mut self) {
        self.writable.clear();
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        match node {
            NodeMut::Stmt(stmt) => {
                if let StmtKind::Foreach(foreach) = &stmt.kind {
                    self.allow(&foreach.value);
                }
            }
            NodeMut::Expr(expr) => match &expr.kind {
                ExprKind::Assign(assign) => {
                    self.allow(&assign.var);
                    if assign.by_ref {
                        self.allow(&assign.value);
                    }
                }
                ExprKind::AssignOp(assign) => self.allow(&assign.var),
                ExprKind::ArrayDimFetch(fetch) => {
                    let writable = self.writable.contains(&expr.span);
                    if fetch.dim.is_none() && !writable {
                        bail_fatal!(expr.line(), "Cannot use [] for reading");
                    }
                    // `$a[]['b'] = 1` writes through the inner fetch too.
                    if writable && matches!(fetch.var.kind, ExprKind::ArrayDimFetch(_)) {
                        self.writable.insert(fetch.var.span);
                    }
                }
                _ => {}
            },
            NodeMut::Member(_) => {}
        }
        Ok(Action::Continue)
    }
}
