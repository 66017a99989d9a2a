use psy_core::ast::{Expr, ExprKind, NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

const ISSET_MESSAGE: &str =
    "Cannot use isset() on the result of a function call (you can use \"null !== func()\" instead)";
const WRITE_CONTEXT_MESSAGE: &str = "Can't use function return value in write context";

/// Call results are values, never slots: no `&foo()`, `isset(foo())` or `foo() = 1`.
pub struct FunctionReturnInWriteContextPass;

impl Pass for FunctionReturnInWriteContextPass {
    fn name(&self) -> &'static str {
        "function_return_in_write_context"
    }

    fn reset(&mut self) {}

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        let at_least_55 = ctx.config.php_version.at_least(5, 5);
        match node {
            NodeMut::Stmt(stmt) => {
                if let StmtKind::Unset(vars) = &stmt.kind {
                    if vars.iter().any(Expr::is_call) {
                        bail_fatal!(stmt.line(), "{}", WRITE_CONTEXT_MESSAGE);
                    }
                }
            }
            NodeMut::Expr(expr) => {
                let line = expr.line();
                match &expr.kind {
                    ExprKind::Array(array) => {
                        let by_ref_call = array
                            .items
                            .iter()
                            .flatten()
                            .any(|item| item.by_ref && item.value.is_call());
                        if by_ref_call {
                            bail_fatal!(line, "{}", WRITE_CONTEXT_MESSAGE);
                        }
                    }
                    ExprKind::FuncCall(_) | ExprKind::MethodCall(_) | ExprKind::StaticCall(_) => {
                        let args = match &expr.kind {
                            ExprKind::FuncCall(call) => &call.args,
                            ExprKind::MethodCall(call) => &call.args,
                            ExprKind::StaticCall(call) => &call.args,
                            _ => return Ok(Action::Continue),
                        };
                        if args.iter().any(|arg| arg.by_ref && arg.value.is_call()) {
                            bail_fatal!(line, "{}", WRITE_CONTEXT_MESSAGE);
                        }
                    }
                    ExprKind::Isset(vars) => {
                        if vars.iter().any(Expr::is_call) {
                            let message = if at_least_55 {
                                ISSET_MESSAGE
                            } else {
                                WRITE_CONTEXT_MESSAGE
                            };
                            bail_fatal!(line, "{}", message);
                        }
                    }
                    ExprKind::Empty(inner) if !at_least_55 && inner.is_call() => {
                        bail_fatal!(line, "{}", WRITE_CONTEXT_MESSAGE);
                    }
                    ExprKind::Assign(assign) if assign.var.is_call() => {
                        bail_fatal!(line, "{}", WRITE_CONTEXT_MESSAGE);
                    }
                    _ => {}
                }
            }
            NodeMut::Member(_) => {}
        }
        Ok(Action::Continue)
    }
}
