use psy_core::ast::{Expr, ExprKind, Stmt, StmtKind};
use psy_core::span::Span;
use psy_core::Result;

use crate::pass::{Pass, PassContext};
use crate::passes::VALIDATORS;

/// Makes the snippet's value explicit: the last expression is returned, and
/// statements without a value return the `NoReturnValue` sentinel.
pub struct ImplicitReturnPass;

fn no_return_value(span: Span) -> Stmt {
    Stmt::ret(Some(Expr::new(ExprKind::NoReturnValue, span)), span)
}

fn add_implicit_return(stmts: &mut Vec<Stmt>) {
    let Some(last) = stmts.last_mut() else {
        stmts.push(no_return_value(Span::null()));
        return;
    };
    let span = last.span;
    match &mut last.kind {
        StmtKind::If(stmt_if) => {
            add_implicit_return(&mut stmt_if.then);
            for elseif in &mut stmt_if.elseifs {
                add_implicit_return(&mut elseif.body);
            }
            if let Some(otherwise) = &mut stmt_if.otherwise {
                add_implicit_return(otherwise);
            }
        }
        StmtKind::Switch(stmt_switch) => {
            for case in &mut stmt_switch.cases {
                // Only cases ending in `break` get a value.
                if !matches!(case.body.last(), Some(Stmt { kind: StmtKind::Break(_), .. })) {
                    continue;
                }
                if let Some(brk) = case.body.pop() {
                    add_implicit_return(&mut case.body);
                    case.body.push(brk);
                }
            }
        }
        StmtKind::Expr(expr) if !matches!(expr.kind, ExprKind::Exit(_)) => {
            let expr = std::mem::replace(expr, Expr::new(ExprKind::NoReturnValue, span));
            *last = Stmt::ret(Some(expr), span);
        }
        StmtKind::Namespace(ns) => add_implicit_return(&mut ns.body),
        _ => {}
    }

    let has_value = matches!(
        last.kind,
        StmtKind::Expr(_) | StmtKind::Return(_) | StmtKind::Namespace(_)
    );
    if !has_value {
        stmts.push(no_return_value(span));
    }
}

impl Pass for ImplicitReturnPass {
    fn name(&self) -> &'static str {
        "implicit_return"
    }

    fn after(&self) -> &'static [&'static str] {
        VALIDATORS
    }

    fn reset(&mut self) {}

    fn before_traverse(&mut self, stmts: &mut Vec<Stmt>, _ctx: &mut PassContext<'_>) -> Result<()> {
        add_implicit_return(stmts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psy_core::printer::print;
    use pretty_assertions::assert_eq;

    fn apply(code: &str) -> String {
        let mut stmts = psy_lang::parse(code).unwrap();
        add_implicit_return(&mut stmts);
        print(&stmts)
    }

    #[test]
    fn is_idempotent() {
        let mut stmts = psy_lang::parse("if ($a) { 1; } else { echo 2; }").unwrap();
        add_implicit_return(&mut stmts);
        let once = print(&stmts);
        add_implicit_return(&mut stmts);
        assert_eq!(print(&stmts), once);
    }

    #[test]
    fn empty_snippet_has_no_value() {
        assert_eq!(apply(""), "return new \\Psy\\CodeCleaner\\NoReturnValue();");
    }
}
