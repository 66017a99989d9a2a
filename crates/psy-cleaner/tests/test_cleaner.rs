use pretty_assertions::assert_eq;
use psy_cleaner::config::ImplicitUseConfig;
use psy_cleaner::{CleanerConfig, CodeCleaner, ErrorKind};

mod support;

use support::{assert_rejects_with, clean_with};

fn cleaner() -> CodeCleaner {
    CodeCleaner::new().unwrap()
}

#[test]
fn snippets_return_their_value() {
    let mut cleaner = cleaner();
    assert_eq!(clean_with(&mut cleaner, "4").unwrap(), "return 4;");
    assert_eq!(clean_with(&mut cleaner, "__DIR__;").unwrap(), "return getcwd();");
    assert_eq!(
        clean_with(&mut cleaner, "exit;").unwrap(),
        "return \\Psy\\Exception\\BreakException::exitShell();"
    );
    assert_eq!(
        clean_with(&mut cleaner, "").unwrap(),
        "return new \\Psy\\CodeCleaner\\NoReturnValue();"
    );
}

#[test]
fn incomplete_input_asks_for_more() {
    let mut cleaner = cleaner();
    assert_eq!(cleaner.clean(&["if ($a) {"]).unwrap(), None);
    assert_eq!(cleaner.clean(&["function f() {", "return 1;"]).unwrap(), None);
    assert_eq!(cleaner.clean(&["$a = 'foo"]).unwrap(), None);
    assert_eq!(cleaner.clean(&["$a = [1,"]).unwrap(), None);
    assert_eq!(
        cleaner.clean(&["function f() {", "return 1;", "}"]).unwrap().as_deref(),
        Some("function f()\n{\n    return 1;\n}\nreturn new \\Psy\\CodeCleaner\\NoReturnValue();")
    );
}

#[test]
fn syntax_errors_are_reported() {
    let mut cleaner = cleaner();
    let err = cleaner.clean(&["$a = ;"]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Parse));
}

#[test]
fn inline_html_is_output() {
    let mut cleaner = cleaner();
    assert_eq!(
        clean_with(&mut cleaner, "1; ?> hi <?php 2;").unwrap(),
        "1;\necho ' hi ';\nreturn 2;"
    );
}

#[test]
fn malformed_numbers_are_parse_errors() {
    let mut cleaner = cleaner();
    let err = cleaner.clean(&["1_;"]).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Parse));
    assert_eq!(clean_with(&mut cleaner, "1_000").unwrap(), "return 1000;");
}

#[test]
fn semicolons_can_be_required() {
    let config = CleanerConfig {
        require_semicolons: true,
        ..CleanerConfig::default()
    };
    let mut cleaner = CodeCleaner::with_config(config).unwrap();
    assert_eq!(cleaner.clean(&["4"]).unwrap(), None);
    assert_eq!(cleaner.clean(&["4;"]).unwrap().as_deref(), Some("return 4;"));
}

#[test]
fn namespace_and_aliases_carry_over() {
    let mut cleaner = cleaner();
    assert_eq!(
        clean_with(&mut cleaner, "namespace Foo;\nuse ArrayObject as Store;").unwrap(),
        "namespace Foo;\n\nreturn new \\Psy\\CodeCleaner\\NoReturnValue();"
    );
    assert_eq!(cleaner.namespace().as_deref(), Some("Foo"));
    assert_eq!(
        clean_with(&mut cleaner, "new Store();").unwrap(),
        "namespace Foo;\n\nreturn new \\ArrayObject();"
    );
    assert_eq!(cleaner.resolve_class_name("Store"), "\\ArrayObject");
    assert_eq!(cleaner.resolve_class_name("Bar"), "\\Foo\\Bar");
    assert_eq!(cleaner.resolve_class_name("\\Baz"), "\\Baz");
    assert_eq!(cleaner.resolve_class_name("$store"), "$store");

    clean_with(&mut cleaner, "namespace Other;").unwrap();
    assert_rejects_with(
        &mut cleaner,
        "new Store();",
        ErrorKind::Fatal,
        "Class 'Other\\Store' not found",
    );
}

#[test]
fn global_names_resolve_unchanged() {
    let cleaner = cleaner();
    assert_eq!(cleaner.resolve_class_name("Bar"), "Bar");
    assert_eq!(cleaner.resolve_class_name("Foo\\Bar"), "Foo\\Bar");
    assert_eq!(cleaner.resolve_class_name("has-dash"), "has-dash");
    assert_eq!(cleaner.resolve_class_name("123Invalid"), "123Invalid");
}

#[test]
fn qualified_names_resolve_through_aliases() {
    let mut cleaner = cleaner();
    clean_with(&mut cleaner, "use Psy\\Exception;").unwrap();
    assert_eq!(
        cleaner.resolve_class_name("Exception\\BreakException"),
        "\\Psy\\Exception\\BreakException"
    );
}

#[test]
fn implicit_uses_are_remembered() {
    let config = CleanerConfig {
        implicit_use: ImplicitUseConfig {
            include_namespaces: vec!["Psy\\".into()],
            exclude_namespaces: vec![],
        },
        ..CleanerConfig::default()
    };
    let mut cleaner = CodeCleaner::with_config(config).unwrap();
    assert_eq!(
        clean_with(&mut cleaner, "$c = new BreakException();").unwrap(),
        "return $c = new \\Psy\\Exception\\BreakException();"
    );
    assert_eq!(
        cleaner.resolve_class_name("BreakException"),
        "\\Psy\\Exception\\BreakException"
    );
}

#[test]
fn strict_types_are_redeclared() {
    let mut cleaner = cleaner();
    clean_with(&mut cleaner, "declare(strict_types=1);").unwrap();
    assert_eq!(
        clean_with(&mut cleaner, "1").unwrap(),
        "declare (strict_types=1);\nreturn 1;"
    );
}

#[test]
fn declarations_are_committed_only_on_success() {
    let mut cleaner = cleaner();
    clean_with(&mut cleaner, "function fill(&$out) {}").unwrap();
    assert_rejects_with(
        &mut cleaner,
        "fill(1);",
        ErrorKind::Fatal,
        "Only variables can be passed by reference",
    );
    clean_with(&mut cleaner, "fill($x);").unwrap();

    assert!(clean_with(&mut cleaner, "class Temp {}\nnew Missing();").is_err());
    clean_with(&mut cleaner, "class Temp {}").unwrap();
    assert_eq!(clean_with(&mut cleaner, "new Temp();").unwrap(), "return new Temp();");
}

#[test]
fn actions_are_told_apart_from_inspection() {
    let cleaner = cleaner();
    assert!(cleaner.code_looks_like_action(&["$a = 1;"]));
    assert!(cleaner.code_looks_like_action(&["$user->save()"]));
    assert!(cleaner.code_looks_like_action(&["echo 1;"]));
    assert!(cleaner.code_looks_like_action(&["$i++"]));

    assert!(!cleaner.code_looks_like_action(&["$a"]));
    assert!(!cleaner.code_looks_like_action(&["$user->getName()"]));
    assert!(!cleaner.code_looks_like_action(&["1 + 2"]));
    assert!(!cleaner.code_looks_like_action(&["if ("]));
}
