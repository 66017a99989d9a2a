use psy_core::ast::{Expr, ExprKind, Literal, NodeMut};
use psy_core::visit::Action;
use psy_core::{bail_parse, Result};

use crate::pass::{Pass, PassContext};

/// Before PHP 5.5, `empty()` only took variables.
pub struct LegacyEmptyPass;

/// How PHP's parser would name the token it choked on.
fn unexpected_thing(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(Literal::String { value, .. }) => {
            serde_json::to_string(value).unwrap_or_else(|_| format!("'{}'", value))
        }
        ExprKind::Literal(Literal::Int(value)) => value.to_string(),
        ExprKind::Literal(Literal::Float(value)) => value.to_string(),
        ExprKind::ConstFetch(name) => name.to_string(),
        ExprKind::FuncCall(_) => "Expr_FuncCall".into(),
        ExprKind::MethodCall(_) => "Expr_MethodCall".into(),
        ExprKind::StaticCall(_) => "Expr_StaticCall".into(),
        ExprKind::ClassConstFetch(_) => "Expr_ClassConstFetch".into(),
        ExprKind::BinOp(_) => "Expr_BinaryOp".into(),
        ExprKind::Array(_) => "Expr_Array".into(),
        _ => "expression".into(),
    }
}

impl Pass for LegacyEmptyPass {
    fn name(&self) -> &'static str {
        "legacy_empty"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        if ctx.config.php_version.at_least(5, 5) {
            return Ok(Action::SkipChildren);
        }
        if let NodeMut::Expr(expr) = node {
            if let ExprKind::Empty(inner) = &expr.kind {
                if !inner.is_writable() {
                    bail_parse!(inner.line(), "syntax error, unexpected {}", unexpected_thing(inner));
                }
            }
        }
        Ok(Action::Continue)
    }
}
