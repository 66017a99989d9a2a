use psy_core::ast::{ExprKind, Literal, NameOrExpr, NameRole, NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::oracle::SymbolOracle;
use crate::pass::{Pass, PassContext};
use crate::scope::NameScope;

/// Namespaced constants and class constants must be defined.
///
/// Unqualified constants fall back to the global namespace at runtime, so only
/// fetches with more than one segment are checked. Fetches are checked at
/// every depth, function bodies included.
#[derive(Default)]
pub struct ValidConstantPass {
    scope: NameScope,
}

impl ValidConstantPass {
    /// `const X = ...;` and `define('X', ...)` declare constants for later code.
    fn record_definition(&self, node: &NodeMut<'_>, ctx: &mut PassContext<'_>) {
        match node {
            NodeMut::Stmt(stmt) => {
                if let StmtKind::Const(items) = &stmt.kind {
                    for item in items {
                        ctx.pending.add_constant(self.scope.qualify_name(&item.name));
                    }
                }
            }
            NodeMut::Expr(expr) => {
                let ExprKind::FuncCall(call) = &expr.kind else {
                    return;
                };
                let NameOrExpr::Name(name) = &call.name else {
                    return;
                };
                if !name.is("define") {
                    return;
                }
                if let Some(ExprKind::Literal(Literal::String { value, .. })) =
                    call.args.first().map(|arg| &arg.value.kind)
                {
                    ctx.pending.add_constant(value.trim_start_matches('\\'));
                }
            }
            NodeMut::Member(_) => {}
        }
    }
}

impl Pass for ValidConstantPass {
    fn name(&self) -> &'static str {
        "valid_constant"
    }

    fn after(&self) -> &'static [&'static str] {
        &["use_statement", "namespace"]
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        self.scope.observe(&node, ctx.session);
        self.record_definition(&node, ctx);
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let line = expr.line();
        let symbols = ctx.symbols();
        match &expr.kind {
            ExprKind::ConstFetch(name) if name.parts.len() > 1 => {
                let resolved = self.scope.resolve(NameRole::Constant, name);
                if !symbols.constant_defined(&resolved) {
                    bail_fatal!(line, "Undefined constant {}", resolved);
                }
            }
            ExprKind::ClassConstFetch(fetch) if fetch.name != "class" => {
                let Some(class) = fetch.class.as_name().filter(|name| !name.is_special_class())
                else {
                    return Ok(Action::Continue);
                };
                let class = self.scope.resolve_class(class);
                let kind = if symbols.class_exists(&class) {
                    "Class"
                } else if symbols.interface_exists(&class) {
                    "Interface"
                } else {
                    return Ok(Action::Continue);
                };
                if symbols.class_constant_exists(&class, &fetch.name) == Some(false) {
                    bail_fatal!(line, "{} constant '{}::{}' not found", kind, class, fetch.name);
                }
            }
            _ => {}
        }
        Ok(Action::Continue)
    }
}
