use psy_core::ast::{Name, NodeMut, Stmt, StmtKind};
use psy_core::visit::Action;
use psy_core::Result;
use tracing::debug;

use crate::pass::{Pass, PassContext};
use crate::scope::NameScope;

/// Removes `use` statements and rewrites every aliased name to its fully
/// qualified form, carrying the alias table over to later snippets.
#[derive(Default)]
pub struct UseStatementPass {
    scope: NameScope,
    saw_namespace: bool,
}

impl Pass for UseStatementPass {
    fn name(&self) -> &'static str {
        "use_statement"
    }

    fn after(&self) -> &'static [&'static str] {
        &["implicit_use"]
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
        self.saw_namespace = false;
    }

    fn before_traverse(&mut self, _stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        self.scope = NameScope::for_session(ctx.session);
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        if let NodeMut::Stmt(stmt) = node {
            if let StmtKind::Namespace(ns) = &stmt.kind {
                self.saw_namespace = true;
                self.scope.enter_namespace(ns, ctx.session);
            }
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, mut node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        if let NodeMut::Stmt(stmt) = &node {
            match &stmt.kind {
                StmtKind::Use(stmt_use) => {
                    self.scope.add_use(stmt_use);
                    return Ok(Action::Remove);
                }
                StmtKind::Namespace(ns) => {
                    if ns.synthetic || !ns.braced {
                        ctx.session
                            .set_aliases(self.scope.namespace(), self.scope.aliases().clone());
                    }
                    self.scope = NameScope::default();
                    return Ok(Action::Continue);
                }
                _ => {}
            }
        }
        for (role, name) in node.names_mut() {
            if let Some(parts) = self.scope.expand_alias(role, name) {
                debug!(from = %name, to = parts.join("\\"), "expanding alias");
                *name = Name::fully_qualified(parts, name.span);
            }
        }
        Ok(Action::Continue)
    }

    fn after_traverse(&mut self, _stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        if !self.saw_namespace {
            ctx.session
                .set_aliases(self.scope.namespace(), self.scope.aliases().clone());
        }
        Ok(())
    }
}
