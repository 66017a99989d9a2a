use psy_core::ast::{DeclareDirective, Expr, ExprKind, Literal, Stmt, StmtDeclare, StmtKind};
use psy_core::span::Span;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

const STRICT_TYPES: &str = "strict_types";

/// Validates `declare(strict_types=...)` and re-declares strict types on later
/// snippets once a session has turned them on.
#[derive(Default)]
pub struct StrictTypesPass;

fn declares_strict_types(stmt: &Stmt) -> bool {
    matches!(
        &stmt.kind,
        StmtKind::Declare(declare) if declare.directives.iter().any(|d| d.key.eq_ignore_ascii_case(STRICT_TYPES))
    )
}

/// A `declare` has to be the first statement of the file, so lift it out of
/// the synthetic namespace wrapper.
fn hoist_declare(stmts: &mut Vec<Stmt>) {
    let Some(first) = stmts.first_mut() else {
        return;
    };
    let StmtKind::Namespace(ns) = &mut first.kind else {
        return;
    };
    if !ns.synthetic || !ns.body.first().is_some_and(declares_strict_types) {
        return;
    }
    let declare = ns.body.remove(0);
    stmts.insert(0, declare);
}

impl Pass for StrictTypesPass {
    fn name(&self) -> &'static str {
        "strict_types"
    }

    fn after(&self) -> &'static [&'static str] {
        &["namespace"]
    }

    fn reset(&mut self) {}

    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>, ctx: &mut PassContext<'_>) -> Result<()> {
        let prepend = ctx.session.strict_types();
        hoist_declare(stmts);

        for stmt in stmts.iter() {
            let StmtKind::Declare(declare) = &stmt.kind else {
                continue;
            };
            for directive in &declare.directives {
                if !directive.key.eq_ignore_ascii_case(STRICT_TYPES) {
                    continue;
                }
                match directive.value.kind {
                    ExprKind::Literal(Literal::Int(value @ (0 | 1))) => {
                        ctx.session.set_strict_types(value == 1)
                    }
                    _ => bail_fatal!(
                        stmt.line(),
                        "strict_types declaration must have 0 or 1 as its value"
                    ),
                }
            }
        }

        let starts_with_declare = stmts
            .first()
            .is_some_and(|stmt| matches!(stmt.kind, StmtKind::Declare(_)));
        if prepend && !starts_with_declare {
            let span = stmts.first().map(|stmt| stmt.span).unwrap_or_else(Span::null);
            let declare = StmtDeclare {
                directives: vec![DeclareDirective {
                    key: STRICT_TYPES.into(),
                    value: Expr::int(1, span),
                }],
                body: None,
            };
            stmts.insert(0, Stmt::new(StmtKind::Declare(declare), span));
        }
        Ok(())
    }
}
