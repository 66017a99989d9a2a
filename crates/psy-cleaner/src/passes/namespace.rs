use psy_core::ast::{Name, NameKind, Stmt, StmtKind, StmtNamespace};
use psy_core::Result;

use crate::pass::{Pass, PassContext};

/// Carries the session namespace across snippets.
///
/// A snippet ending in an open `namespace Foo;` switches the session into
/// `Foo`; one ending in a braced namespace leaves the session global. Any other
/// snippet is wrapped in a synthetic namespace matching the session.
pub struct NamespacePass;

impl Pass for NamespacePass {
    fn name(&self) -> &'static str {
        "namespace"
    }

    fn after(&self) -> &'static [&'static str] {
        &["implicit_return", "use_statement"]
    }

    fn reset(&mut self) {}

    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        let Some(last) = stmts.last() else {
            return Ok(());
        };
        if let StmtKind::Namespace(ns) = &last.kind {
            let namespace = match (&ns.name, ns.braced) {
                (Some(name), false) => Some(name.parts.clone()),
                _ => None,
            };
            ctx.session.set_namespace(namespace);
            return Ok(());
        }
        let Some(namespace) = ctx.session.namespace().map(<[String]>::to_vec) else {
            return Ok(());
        };
        let span = stmts
            .iter()
            .map(|stmt| stmt.span)
            .reduce(|a, b| a.union(b))
            .unwrap_or_default();
        let kind = if namespace.len() > 1 {
            NameKind::Qualified
        } else {
            NameKind::Unqualified
        };
        let body = std::mem::take(stmts);
        stmts.push(Stmt::new(
            StmtKind::Namespace(StmtNamespace {
                name: Some(Name::new(namespace, kind, span)),
                body,
                braced: false,
                synthetic: true,
            }),
            span,
        ));
        Ok(())
    }
}
