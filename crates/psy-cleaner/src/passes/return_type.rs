use psy_core::ast::{ExprKind, MemberKind, NodeMut, StmtKind, TypeHint};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

const MESSAGE: &str = "A function with return type must return a value";
const NULLABLE_MESSAGE: &str =
    "A function with return type must return a value (did you mean \"return null;\" instead of \"return;\"?)";
const VOID_MESSAGE: &str = "A void function must not return a value";
const VOID_NULL_MESSAGE: &str =
    "A void function must not return a value (did you mean \"return;\" instead of \"return null;\"?)";
const NULLABLE_VOID_MESSAGE: &str = "Void type cannot be nullable";

struct Frame {
    return_type: Option<TypeHint>,
    yields: bool,
    violation: Option<(&'static str, u32)>,
}

/// `return` statements must agree with the declared return type.
///
/// Generators may `return;` whatever their declared type, so a violation is only
/// reported once the whole body has been seen without a `yield`.
#[derive(Default)]
pub struct ReturnTypePass {
    frames: Vec<Frame>,
}

fn declared_return_type(node: &NodeMut<'_>) -> Option<Option<TypeHint>> {
    match node {
        NodeMut::Stmt(stmt) => match &stmt.kind {
            StmtKind::Function(func) => Some(func.return_type.clone()),
            _ => None,
        },
        NodeMut::Expr(expr) => match &expr.kind {
            ExprKind::Closure(closure) => Some(closure.return_type.clone()),
            _ => None,
        },
        NodeMut::Member(member) => match &member.kind {
            MemberKind::Method(method) => Some(method.return_type.clone()),
            _ => None,
        },
    }
}

fn is_nullable_void(ty: &TypeHint) -> bool {
    matches!(ty, TypeHint::Nullable(inner) if inner.is_void())
}

impl Pass for ReturnTypePass {
    fn name(&self) -> &'static str {
        "return_type"
    }

    fn reset(&mut self) {
        self.frames.clear();
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if let Some(return_type) = declared_return_type(&node) {
            if return_type.as_ref().is_some_and(is_nullable_void) {
                bail_fatal!(node.line(), "{}", NULLABLE_VOID_MESSAGE);
            }
            self.frames.push(Frame {
                return_type,
                yields: false,
                violation: None,
            });
            return Ok(Action::Continue);
        }
        let Some(frame) = self.frames.last_mut() else {
            return Ok(Action::Continue);
        };
        match node {
            NodeMut::Expr(expr) => {
                if matches!(expr.kind, ExprKind::Yield(_) | ExprKind::YieldFrom(_)) {
                    frame.yields = true;
                }
            }
            NodeMut::Stmt(stmt) => {
                let StmtKind::Return(value) = &stmt.kind else {
                    return Ok(Action::Continue);
                };
                let Some(expected) = &frame.return_type else {
                    return Ok(Action::Continue);
                };
                let message = if expected.is_void() {
                    match value {
                        Some(value) if value.is_null_literal() => Some(VOID_NULL_MESSAGE),
                        Some(_) => Some(VOID_MESSAGE),
                        None => None,
                    }
                } else if value.is_none() {
                    Some(if expected.is_nullable() {
                        NULLABLE_MESSAGE
                    } else {
                        MESSAGE
                    })
                } else {
                    None
                };
                if let Some(message) = message {
                    frame.violation.get_or_insert((message, stmt.line()));
                }
            }
            NodeMut::Member(_) => {}
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if declared_return_type(&node).is_none() {
            return Ok(Action::Continue);
        }
        if let Some(frame) = self.frames.pop() {
            if let (Some((message, line)), false) = (frame.violation, frame.yields) {
                bail_fatal!(line, "{}", message);
            }
        }
        Ok(Action::Continue)
    }
}
