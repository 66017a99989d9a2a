use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use psy_cleaner::config::ImplicitUseConfig;
use psy_cleaner::passes::*;
use psy_cleaner::{ClassInfo, CleanerConfig, CodeCleaner, PassSet, SymbolTable};

mod support;

use support::{assert_fatal, assert_processes_as, clean_with, cleaner_with};

#[test]
fn exit_becomes_break_exception() {
    assert_processes_as(
        ExitPass,
        "exit;",
        "\\Psy\\Exception\\BreakException::exitShell();",
    );
    assert_processes_as(
        ExitPass,
        "if ($a) { die('bye'); }",
        "if ($a) {\n    \\Psy\\Exception\\BreakException::exitShell();\n}",
    );
}

#[test]
fn last_expression_is_returned() {
    assert_processes_as(ImplicitReturnPass, "4", "return 4;");
    assert_processes_as(ImplicitReturnPass, "$a = 1; $b = 2;", "$a = 1;\nreturn $b = 2;");
    assert_processes_as(
        ImplicitReturnPass,
        "echo 1;",
        "echo 1;\nreturn new \\Psy\\CodeCleaner\\NoReturnValue();",
    );
    assert_processes_as(ImplicitReturnPass, "exit;", "exit;");
}

#[test]
fn branches_return_their_last_expression() {
    assert_processes_as(
        ImplicitReturnPass,
        "if ($a) { 1; } elseif ($b) { 2; } else { 3; }",
        "if ($a) {\n    return 1;\n} elseif ($b) {\n    return 2;\n} else {\n    return 3;\n}\nreturn new \\Psy\\CodeCleaner\\NoReturnValue();",
    );
    assert_processes_as(
        ImplicitReturnPass,
        "switch ($a) { case 1: 'one'; break; default: 'other'; }",
        "switch ($a) {\n    case 1:\n        return 'one';\n        break;\n    default:\n        'other';\n}\nreturn new \\Psy\\CodeCleaner\\NoReturnValue();",
    );
    assert_processes_as(ImplicitReturnPass, "namespace Foo; 1;", "namespace Foo;\n\nreturn 1;");
}

#[test]
fn magic_constants_describe_the_shell() {
    assert_processes_as(MagicConstantsPass, "__DIR__;", "getcwd();");
    assert_processes_as(MagicConstantsPass, "__FILE__;", "'';");
    assert_processes_as(MagicConstantsPass, "__LINE__;", "__LINE__;");
}

#[test]
fn require_goes_through_the_resolver() {
    assert_processes_as(
        RequirePass,
        "require 'foo.php';",
        "require \\Psy\\CodeCleaner\\RequirePass::resolve('foo.php', 1);",
    );
    assert_processes_as(
        RequirePass,
        "\n\nrequire_once $path;",
        "require_once \\Psy\\CodeCleaner\\RequirePass::resolve($path, 3);",
    );
    assert_processes_as(RequirePass, "include 'foo.php';", "include 'foo.php';");
}

#[test]
fn strict_types_persist() {
    let mut cleaner = cleaner_with(StrictTypesPass);
    assert_eq!(clean_with(&mut cleaner, "1;").unwrap(), "1;");
    assert_eq!(
        clean_with(&mut cleaner, "declare(strict_types=1);").unwrap(),
        "declare (strict_types=1);"
    );
    assert!(cleaner.session().strict_types());
    assert_eq!(
        clean_with(&mut cleaner, "1;").unwrap(),
        "declare (strict_types=1);\n1;"
    );
    assert_eq!(
        clean_with(&mut cleaner, "declare(strict_types=0);").unwrap(),
        "declare (strict_types=0);"
    );
    assert_eq!(clean_with(&mut cleaner, "1;").unwrap(), "1;");
}

#[test]
fn strict_types_must_be_boolean() {
    assert_fatal(
        StrictTypesPass,
        "declare(strict_types=2);",
        "strict_types declaration must have 0 or 1 as its value",
    );
}

#[test]
fn namespace_carries_over() {
    let mut cleaner = cleaner_with(NamespacePass);
    assert_eq!(clean_with(&mut cleaner, "namespace Foo;").unwrap(), "namespace Foo;");
    assert_eq!(cleaner.namespace().as_deref(), Some("Foo"));
    assert_eq!(clean_with(&mut cleaner, "1;").unwrap(), "namespace Foo;\n\n1;");

    assert_eq!(
        clean_with(&mut cleaner, "namespace Foo\\Bar;").unwrap(),
        "namespace Foo\\Bar;"
    );
    assert_eq!(clean_with(&mut cleaner, "2;").unwrap(), "namespace Foo\\Bar;\n\n2;");

    assert_eq!(
        clean_with(&mut cleaner, "namespace Baz { 1; }").unwrap(),
        "namespace Baz {\n    1;\n}"
    );
    assert_eq!(cleaner.namespace(), None);
    assert_eq!(clean_with(&mut cleaner, "3;").unwrap(), "3;");
}

#[test]
fn use_statements_are_expanded_and_remembered() {
    assert_processes_as(UseStatementPass::default(), "use Foo\\Bar; new Bar();", "new \\Foo\\Bar();");
    assert_processes_as(
        UseStatementPass::default(),
        "use Foo\\Bar as Baz; Baz\\Qux::x();",
        "\\Foo\\Bar\\Qux::x();",
    );
    assert_processes_as(
        UseStatementPass::default(),
        "use function Foo\\helper; helper();",
        "\\Foo\\helper();",
    );
    assert_processes_as(UseStatementPass::default(), "new Bar();", "new Bar();");

    let mut cleaner = cleaner_with(UseStatementPass::default());
    assert_eq!(clean_with(&mut cleaner, "use Foo\\Bar;").unwrap(), "");
    assert_eq!(clean_with(&mut cleaner, "new bar();").unwrap(), "new \\Foo\\Bar();");
}

fn implicit_use_cleaner(classes: &[&str], log: Arc<Mutex<Vec<String>>>) -> CodeCleaner {
    let mut symbols = SymbolTable::new();
    for class in classes {
        symbols.add_class(ClassInfo::named(*class));
    }
    let config = CleanerConfig {
        implicit_use: ImplicitUseConfig {
            include_namespaces: vec!["App".into()],
            exclude_namespaces: vec!["App\\Internal".into()],
        },
        ..CleanerConfig::default()
    };
    CodeCleaner::builder()
        .config(config)
        .oracle(Arc::new(symbols))
        .passes(PassSet::single(ImplicitUsePass::default()))
        .logger(move |message| log.lock().unwrap().push(message.to_string()))
        .build()
        .unwrap()
}

#[test]
fn implicit_use_adds_unambiguous_imports() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cleaner = implicit_use_cleaner(
        &["App\\Models\\User", "App\\Http\\Request", "App\\Internal\\Secret"],
        log.clone(),
    );
    assert_eq!(
        clean_with(&mut cleaner, "new User(); Request::capture(); new Secret();").unwrap(),
        "use App\\Http\\Request;\nuse App\\Models\\User;\nnew User();\nRequest::capture();\nnew Secret();"
    );
    assert_eq!(
        *log.lock().unwrap(),
        vec!["use App\\Http\\Request;\nuse App\\Models\\User;".to_string()]
    );
}

#[test]
fn implicit_use_skips_ambiguous_and_aliased_names() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut cleaner = implicit_use_cleaner(
        &["App\\Models\\User", "App\\Legacy\\User", "App\\Models\\Post"],
        log.clone(),
    );
    assert_eq!(clean_with(&mut cleaner, "new User();").unwrap(), "new User();");
    assert_eq!(
        clean_with(&mut cleaner, "use Blog\\Post; new Post();").unwrap(),
        "use Blog\\Post;\nnew Post();"
    );
    assert!(log.lock().unwrap().is_empty());
}
