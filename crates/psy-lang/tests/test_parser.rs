use pretty_assertions::assert_eq;
use psy_core::ast::{
    BinOpKind, ExprKind, Literal, MemberKind, NameKind, StmtKind, StringPart, UseKind, Variable,
};
use psy_core::printer::print;
use psy_lang::{parse, parse_expression, ParseError, ParseErrorKind};

type Result<T> = std::result::Result<T, ParseError>;

fn reprint(source: &str) -> Result<String> {
    Ok(print(&parse(source)?))
}

#[test]
fn test_parse_echo_and_open_tag() -> Result<()> {
    let stmts = parse("<?php echo 'foo', \"bar\";")?;
    assert_eq!(stmts.len(), 1);
    let StmtKind::Echo(exprs) = &stmts[0].kind else {
        panic!("expected echo, got {:?}", stmts[0].kind);
    };
    assert_eq!(exprs.len(), 2);
    assert_eq!(stmts[0].line(), 1);
    Ok(())
}

#[test]
fn test_precedence() -> Result<()> {
    let expr = parse_expression("1 + 2 * 3")?;
    let ExprKind::BinOp(add) = &expr.kind else {
        panic!("expected binop");
    };
    assert_eq!(add.op, BinOpKind::Add);
    assert!(matches!(add.rhs.kind, ExprKind::BinOp(ref mul) if mul.op == BinOpKind::Mul));

    let expr = parse_expression("!$a instanceof Foo")?;
    assert!(matches!(expr.kind, ExprKind::UnOp(_)));
    Ok(())
}

#[test]
fn test_assignment_is_right_associative() -> Result<()> {
    let expr = parse_expression("$a = $b = 3")?;
    let ExprKind::Assign(outer) = &expr.kind else {
        panic!("expected assignment");
    };
    assert_eq!(outer.var.as_named_variable(), Some("a"));
    assert!(matches!(outer.value.kind, ExprKind::Assign(_)));
    Ok(())
}

#[test]
fn test_assignment_to_non_writable_is_syntax_error() {
    let err = parse("1 = 2;").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
}

#[test]
fn test_unbraced_namespace_owns_following_statements() -> Result<()> {
    let stmts = parse("namespace Foo;\nclass Bar {}\nfunction baz() {}")?;
    assert_eq!(stmts.len(), 1);
    let StmtKind::Namespace(ns) = &stmts[0].kind else {
        panic!("expected namespace");
    };
    assert_eq!(ns.name.as_ref().map(|name| name.plain()), Some("Foo".to_string()));
    assert_eq!(ns.body.len(), 2);
    assert!(!ns.braced);
    Ok(())
}

#[test]
fn test_group_use() -> Result<()> {
    let stmts = parse("use Foo\\{Bar, function baz, Qux as Q};")?;
    let StmtKind::Use(use_stmt) = &stmts[0].kind else {
        panic!("expected use");
    };
    let items = use_stmt.resolved_items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1].0, UseKind::Function);
    assert_eq!(items[1].1, vec!["Foo".to_string(), "baz".to_string()]);
    assert_eq!(items[2].2.alias_name(), "Q");
    Ok(())
}

#[test]
fn test_leading_backslash_in_use_is_dropped() -> Result<()> {
    let stmts = parse("use \\Foo\\Bar;")?;
    let StmtKind::Use(use_stmt) = &stmts[0].kind else {
        panic!("expected use");
    };
    assert_eq!(use_stmt.uses[0].name.kind, NameKind::Qualified);
    Ok(())
}

#[test]
fn test_class_members() -> Result<()> {
    let stmts = parse(
        "abstract class A extends B implements C {
            const X = 1;
            public static $y = 2;
            abstract protected function foo();
            public function __construct(private int $z) {}
        }",
    )?;
    let StmtKind::Class(class) = &stmts[0].kind else {
        panic!("expected class");
    };
    assert!(class.modifiers.is_abstract);
    assert_eq!(class.members.len(), 4);
    let MemberKind::Method(foo) = &class.members[2].kind else {
        panic!("expected method");
    };
    assert!(foo.body.is_none());
    assert!(foo.modifiers.is_abstract);
    assert_eq!(class.members[2].line(), 4);
    Ok(())
}

#[test]
fn test_interpolation() -> Result<()> {
    let expr = parse_expression("\"a $b {$c->d()} $e[0] \\$f\"")?;
    let ExprKind::Interpolated(parts) = &expr.kind else {
        panic!("expected interpolated string");
    };
    assert_eq!(parts[0], StringPart::Literal("a ".to_string()));
    assert!(matches!(
        &parts[1],
        StringPart::Expr(e) if e.as_named_variable() == Some("b")
    ));
    assert!(matches!(&parts[3], StringPart::Expr(e) if matches!(e.kind, ExprKind::MethodCall(_))));
    assert_eq!(parts.last(), Some(&StringPart::Literal(" $f".to_string())));
    Ok(())
}

#[test]
fn test_heredoc_strips_closing_indent() -> Result<()> {
    let stmts = parse("$a = <<<EOT\n    foo\n      bar\n    EOT;\n")?;
    let StmtKind::Expr(expr) = &stmts[0].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Assign(assign) = &expr.kind else {
        panic!("expected assignment");
    };
    assert_eq!(
        assign.value.kind,
        ExprKind::Literal(Literal::String {
            value: "foo\n  bar".to_string(),
            double_quoted: true,
        })
    );
    Ok(())
}

#[test]
fn test_variable_variables() -> Result<()> {
    let expr = parse_expression("$$name")?;
    let ExprKind::Variable(Variable::Dynamic(inner)) = &expr.kind else {
        panic!("expected variable variable");
    };
    assert_eq!(inner.as_named_variable(), Some("name"));
    Ok(())
}

#[test]
fn test_incomplete_input_is_eof() {
    for source in ["if (true) {", "foo(", "$a = ", "true"] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof, "{source}");
    }
    assert_eq!(
        parse("echo 'unterminated").unwrap_err().kind,
        ParseErrorKind::UnterminatedString
    );
    assert_eq!(
        parse("/* open comment").unwrap_err().kind,
        ParseErrorKind::UnterminatedComment
    );
}

#[test]
fn test_unexpected_token_reports_line() {
    let err = parse("$a = 1;\necho }").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.line, 2);
    assert_eq!(err.message, "Syntax error, unexpected '}'");
}

#[test]
fn test_try_requires_catch_or_finally() {
    let err = parse("try { foo(); }").unwrap_err();
    assert_eq!(err.message, "Cannot use try without catch or finally");
}

#[test]
fn test_reprint_control_flow() -> Result<()> {
    assert_eq!(
        reprint("foreach ($a as $k => &$v) { if ($v) break; else continue 2; }")?,
        "foreach ($a as $k => &$v) {\n    if ($v) {\n        break;\n    } else {\n        continue 2;\n    }\n}"
    );
    assert_eq!(reprint("$x = (1 + 2) * 3;")?, "$x = (1 + 2) * 3;");
    assert_eq!(
        reprint("$f = function ($a) use (&$b) { return $a; };")?,
        "$f = function ($a) use (&$b) {\n    return $a;\n};"
    );
    Ok(())
}

#[test]
fn test_static_access() -> Result<()> {
    let expr = parse_expression("static::$cache[Foo::class]")?;
    let ExprKind::ArrayDimFetch(fetch) = &expr.kind else {
        panic!("expected dim fetch");
    };
    assert!(matches!(fetch.var.kind, ExprKind::StaticPropertyFetch(_)));
    Ok(())
}

#[test]
fn test_numeric_separators_sit_between_digits() -> Result<()> {
    let expr = parse_expression("1_000")?;
    assert!(matches!(expr.kind, ExprKind::Literal(Literal::Int(1000))));
    let expr = parse_expression("0x7F_FF")?;
    assert!(matches!(expr.kind, ExprKind::Literal(Literal::Int(0x7FFF))));

    for source in ["1_;", "1__0;", "1_000_;", "0x_1F;"] {
        let err = parse(source).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax, "{}", source);
    }
    Ok(())
}

#[test]
fn test_inline_html_is_echoed() -> Result<()> {
    let stmts = parse("1; ?> hi <?php 2;")?;
    let kinds: Vec<_> = stmts
        .iter()
        .filter(|stmt| !matches!(stmt.kind, StmtKind::Nop))
        .collect();
    assert_eq!(kinds.len(), 3);
    let StmtKind::Echo(values) = &kinds[1].kind else {
        panic!("expected echo, got {:?}", kinds[1].kind);
    };
    assert!(matches!(
        &values[0].kind,
        ExprKind::Literal(Literal::String { value, .. }) if value == " hi "
    ));

    // the newline after `?>` is part of the tag
    let stmts = parse("$a;\n?>\n<p>it's \\</p>\n")?;
    let echoed = stmts.iter().find_map(|stmt| match &stmt.kind {
        StmtKind::Echo(values) => Some(&values[0].kind),
        _ => None,
    });
    assert!(matches!(
        echoed,
        Some(ExprKind::Literal(Literal::String { value, .. })) if value == "<p>it's \\</p>\n"
    ));

    let stmts = parse("$a; ?>\n")?;
    assert!(!stmts.iter().any(|stmt| matches!(stmt.kind, StmtKind::Echo(_))));
    Ok(())
}
