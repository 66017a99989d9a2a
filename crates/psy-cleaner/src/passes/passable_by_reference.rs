use psy_core::ast::{Arg, Expr, ExprKind, Name, NameOrExpr, NameRole, NodeMut, Stmt};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::oracle::SymbolOracle;
use crate::pass::{Pass, PassContext};
use crate::scope::NameScope;

const MESSAGE: &str = "Only variables can be passed by reference";

/// Known by-reference parameters must receive something that can be referenced.
#[derive(Default)]
pub struct PassableByReferencePass {
    scope: NameScope,
}

fn is_passable(arg: &Arg) -> bool {
    match &arg.value.kind {
        ExprKind::Array(_) => arg.unpack,
        ExprKind::ClassConstFetch(_) => true,
        _ => arg.value.is_writable() || arg.value.is_call(),
    }
}

/// `array_multisort` takes its arrays by reference but interleaves up to two
/// sort flags after each of them.
fn validate_array_multisort(args: &[Arg], line: u32) -> Result<()> {
    let mut non_passable = 2;
    for arg in args {
        if is_passable(arg) {
            non_passable = 0;
        } else {
            non_passable += 1;
            if non_passable > 2 {
                bail_fatal!(line, "{}", MESSAGE);
            }
        }
    }
    Ok(())
}

impl PassableByReferencePass {
    /// By-ref positions of the function `name` would call: the namespaced
    /// function first, then the global fallback for unqualified names.
    fn by_ref_params(&self, name: &Name, oracle: &dyn SymbolOracle) -> Option<(String, Vec<usize>)> {
        let resolved = self.scope.resolve(NameRole::Function, name);
        if let Some(params) = oracle.function_by_ref_params(&resolved) {
            return Some((resolved, params));
        }
        if name.is_unqualified() && self.scope.expand_alias(NameRole::Function, name).is_none() {
            let global = name.plain();
            return oracle
                .function_by_ref_params(&global)
                .map(|params| (global, params));
        }
        None
    }
}

impl Pass for PassableByReferencePass {
    fn name(&self) -> &'static str {
        "passable_by_reference"
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
    }

    fn before_traverse(
        &mut self,
        _stmts: &mut Vec<Stmt>,
        ctx: &mut PassContext<'_>,
    ) -> Result<()> {
        self.scope = NameScope::for_session(ctx.session);
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        self.scope.observe(&node, ctx.session);
        let NodeMut::Expr(expr) = node else {
            return Ok(Action::Continue);
        };
        let Expr {
            kind: ExprKind::FuncCall(call),
            ..
        } = &*expr
        else {
            return Ok(Action::Continue);
        };
        let NameOrExpr::Name(name) = &call.name else {
            return Ok(Action::Continue);
        };
        let symbols = ctx.symbols();
        let Some((resolved, by_ref)) = self.by_ref_params(name, &symbols) else {
            return Ok(Action::Continue);
        };
        if resolved.eq_ignore_ascii_case("array_multisort") {
            validate_array_multisort(&call.args, expr.line())?;
            return Ok(Action::Continue);
        }
        for (position, arg) in call.args.iter().enumerate() {
            if arg.name.is_some() {
                continue;
            }
            if by_ref.contains(&position) && !is_passable(arg) {
                bail_fatal!(expr.line(), "{}", MESSAGE);
            }
        }
        Ok(Action::Continue)
    }
}
