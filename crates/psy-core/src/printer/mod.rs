//! PHP source printer.
//!
//! Produces code for the evaluator, not a faithful reproduction of the input:
//! comments and original formatting are dropped, parentheses are re-derived from
//! operator precedence.

mod expr;
mod stmt;

pub use expr::ExprPrinter;

use crate::ast::{Expr, Stmt};
use crate::pretty::{pretty, PrettyOptions};

/// Print a statement sequence with default options.
pub fn print(stmts: &[Stmt]) -> String {
    print_with(stmts, &PrettyOptions::default())
}

pub fn print_with(stmts: &[Stmt], options: &PrettyOptions) -> String {
    let rendered = pretty(stmts, options.clone()).to_string();
    rendered.trim_end_matches('\n').to_string()
}

pub fn print_expr(expr: &Expr) -> String {
    let options = PrettyOptions::default();
    ExprPrinter::new(&options, 0).expr(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::span::Span;
    use pretty_assertions::assert_eq;

    fn sp() -> Span {
        Span::new(0, 0, 1, 1)
    }

    #[test]
    fn prints_return_and_echo() {
        let stmts = vec![
            Stmt::new(
                StmtKind::Echo(vec![Expr::new(
                    ExprKind::Literal(Literal::String {
                        value: "foo".into(),
                        double_quoted: true,
                    }),
                    sp(),
                )]),
                sp(),
            ),
            Stmt::ret(
                Some(Expr::const_fetch(Name::unqualified("true", sp()), sp())),
                sp(),
            ),
        ];
        assert_eq!(print(&stmts), "echo \"foo\";\nreturn true;");
    }

    #[test]
    fn parenthesizes_by_precedence() {
        let add = Expr::new(
            ExprKind::BinOp(ExprBinOp {
                op: BinOpKind::Add,
                lhs: Box::new(Expr::int(1, sp())),
                rhs: Box::new(Expr::int(2, sp())),
            }),
            sp(),
        );
        let mul = Expr::new(
            ExprKind::BinOp(ExprBinOp {
                op: BinOpKind::Mul,
                lhs: Box::new(add),
                rhs: Box::new(Expr::int(3, sp())),
            }),
            sp(),
        );
        assert_eq!(print_expr(&mul), "(1 + 2) * 3");
    }

    #[test]
    fn prints_no_return_value_sentinel() {
        let stmt = Stmt::ret(Some(Expr::new(ExprKind::NoReturnValue, sp())), sp());
        assert_eq!(
            print(&[stmt]),
            "return new \\Psy\\CodeCleaner\\NoReturnValue();"
        );
    }

    #[test]
    fn prints_nested_blocks_with_indent() {
        let stmt = Stmt::new(
            StmtKind::If(StmtIf {
                cond: Expr::variable("a", sp()),
                then: vec![Stmt::new(StmtKind::Break(None), sp())],
                elseifs: vec![],
                otherwise: Some(vec![Stmt::new(StmtKind::Continue(Some(Expr::int(2, sp()))), sp())]),
            }),
            sp(),
        );
        assert_eq!(
            print(&[stmt]),
            "if ($a) {\n    break;\n} else {\n    continue 2;\n}"
        );
    }
}
