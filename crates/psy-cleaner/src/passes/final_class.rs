use std::collections::HashSet;

use psy_core::ast::{ClassDecl, ExprKind, NewClass, NodeMut, Stmt, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::oracle::{class_key, SymbolOracle};
use crate::pass::{Pass, PassContext};
use crate::scope::NameScope;

/// A class may not extend a final class, whether declared in this snippet or
/// already known.
#[derive(Default)]
pub struct FinalClassPass {
    scope: NameScope,
    finals: HashSet<String>,
}

impl FinalClassPass {
    fn check(&mut self, class: &ClassDecl, line: u32, symbols: &dyn SymbolOracle) -> Result<()> {
        if let Some(extends) = &class.extends {
            let parent = self.scope.resolve_class(extends);
            if self.finals.contains(&class_key(&parent)) || symbols.is_final_class(&parent) {
                bail_fatal!(
                    line,
                    "Class {} may not inherit from final class ({})",
                    class.name.as_deref().unwrap_or("class@anonymous"),
                    extends.plain()
                );
            }
        }
        if class.modifiers.is_final {
            if let Some(name) = &class.name {
                self.finals.insert(class_key(&self.scope.qualify_name(name)));
            }
        }
        Ok(())
    }
}

impl Pass for FinalClassPass {
    fn name(&self) -> &'static str {
        "final_class"
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
        self.finals.clear();
    }

    fn before_traverse(&mut self, _stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        self.scope = NameScope::for_session(ctx.session);
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        self.scope.observe(&node, ctx.session);
        let line = node.line();
        let class = match &node {
            NodeMut::Stmt(stmt) => match &stmt.kind {
                StmtKind::Class(class) => class,
                _ => return Ok(Action::Continue),
            },
            NodeMut::Expr(expr) => match &expr.kind {
                ExprKind::New(new) => match &new.class {
                    NewClass::Anonymous(class) => class.as_ref(),
                    _ => return Ok(Action::Continue),
                },
                _ => return Ok(Action::Continue),
            },
            NodeMut::Member(_) => return Ok(Action::Continue),
        };
        let symbols = ctx.symbols();
        self.check(class, line, &symbols)?;
        Ok(Action::Continue)
    }
}
