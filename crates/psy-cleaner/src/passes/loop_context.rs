use psy_core::ast::{Expr, ExprKind, Literal, NodeMut, StmtKind, UnOpKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// `break` and `continue` need an enclosing loop or switch deep enough for their level.
#[derive(Default)]
pub struct LoopContextPass {
    depth: usize,
    /// Loop depth of each enclosing function, restored on leaving it.
    saved: Vec<usize>,
}

fn is_loop(node: &NodeMut<'_>) -> bool {
    matches!(
        node,
        NodeMut::Stmt(stmt) if matches!(
            stmt.kind,
            StmtKind::DoWhile(_)
                | StmtKind::For(_)
                | StmtKind::Foreach(_)
                | StmtKind::Switch(_)
                | StmtKind::While(_)
        )
    )
}

enum Level {
    Int(i64),
    Float,
    Dynamic,
}

fn level_of(expr: &Expr) -> Level {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(value)) => Level::Int(*value),
        ExprKind::Literal(Literal::Float(_)) => Level::Float,
        ExprKind::UnOp(unop) if unop.op == UnOpKind::Neg => match level_of(&unop.expr) {
            Level::Int(value) => Level::Int(-value),
            other => other,
        },
        _ => Level::Dynamic,
    }
}

impl LoopContextPass {
    fn check(&self, operator: &str, level: Option<&Expr>, line: u32) -> Result<()> {
        if self.depth == 0 {
            bail_fatal!(line, "'{}' not in the 'loop' or 'switch' context", operator);
        }
        let Some(level) = level else {
            return Ok(());
        };
        match level_of(level) {
            Level::Int(levels) if levels < 1 => {
                bail_fatal!(line, "'{}' operator accepts only positive integers", operator)
            }
            Level::Int(levels) if levels as usize > self.depth => {
                bail_fatal!(line, "Cannot '{}' {} levels", operator, levels)
            }
            Level::Int(_) => Ok(()),
            Level::Float => {
                bail_fatal!(line, "'{}' operator accepts only positive integers", operator)
            }
            Level::Dynamic => bail_fatal!(
                line,
                "'{}' operator with non-integer operand is no longer supported",
                operator
            ),
        }
    }
}

impl Pass for LoopContextPass {
    fn name(&self) -> &'static str {
        "loop_context"
    }

    fn reset(&mut self) {
        self.depth = 0;
        self.saved.clear();
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.saved.push(self.depth);
            self.depth = 0;
            return Ok(Action::Continue);
        }
        if is_loop(&node) {
            self.depth += 1;
            return Ok(Action::Continue);
        }
        if let NodeMut::Stmt(stmt) = node {
            match &stmt.kind {
                StmtKind::Break(level) => self.check("break", level.as_ref(), stmt.line())?,
                StmtKind::Continue(level) => self.check("continue", level.as_ref(), stmt.line())?,
                _ => {}
            }
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if node.is_function_like() {
            self.depth = self.saved.pop().unwrap_or_default();
        } else if is_loop(&node) {
            self.depth = self.depth.saturating_sub(1);
        }
        Ok(Action::Continue)
    }
}
