use pretty_assertions::assert_eq;
use psy_cleaner::passes::*;
use psy_cleaner::ErrorKind;

mod support;

use support::{assert_accepts, assert_fatal, assert_rejects_with, clean_with, cleaner_with};

#[test]
fn class_names_must_be_unique() {
    let err = assert_fatal(ValidClassNamePass::default(), "class stdClass {}", "already exists");
    assert_eq!(err.message(), "Class named stdClass already exists");

    assert_fatal(
        ValidClassNamePass::default(),
        "class A {} class A {}",
        "Class named A already exists",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "interface Countable {}",
        "Interface named Countable already exists",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "trait T {} class T {}",
        "Trait named T already exists",
    );

    assert_accepts(ValidClassNamePass::default(), "if ($a) { class stdClass {} }");
    assert_accepts(ValidClassNamePass::default(), "namespace Foo; class stdClass {}");
}

#[test]
fn parents_and_interfaces_must_exist() {
    assert_fatal(
        ValidClassNamePass::default(),
        "class A extends Missing {}",
        "Class 'Missing' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "class A implements Missing {}",
        "Interface 'Missing' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "interface I extends Missing {}",
        "Interface 'Missing' not found",
    );
    assert_accepts(
        ValidClassNamePass::default(),
        "interface Shape {} class Base {} class Circle extends Base implements Shape, Countable { function count(): int { return 0; } }",
    );
}

#[test]
fn referenced_classes_must_exist() {
    assert_fatal(ValidClassNamePass::default(), "new Missing();", "Class 'Missing' not found");
    assert_fatal(ValidClassNamePass::default(), "Missing::FOO;", "Class 'Missing' not found");
    assert_fatal(ValidClassNamePass::default(), "Missing::make();", "Class 'Missing' not found");
    assert_fatal(
        ValidClassNamePass::default(),
        "namespace Foo; new Bar();",
        "Class 'Foo\\Bar' not found",
    );

    assert_accepts(ValidClassNamePass::default(), "Missing::class;");
    assert_accepts(ValidClassNamePass::default(), "new \\Exception();");
    assert_accepts(ValidClassNamePass::default(), "namespace Foo; class Bar {} new Bar();");
    assert_accepts(ValidClassNamePass::default(), "new static();");
    assert_accepts(ValidClassNamePass::default(), "if ($a) { class Maybe {} } new Maybe();");
}

#[test]
fn references_are_checked_at_every_depth() {
    assert_fatal(
        ValidClassNamePass::default(),
        "if ($a) { new NoSuch; }",
        "Class 'NoSuch' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "while (1) { NoSuch::go(); }",
        "Class 'NoSuch' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "$a ? NoSuch::FOO : 1;",
        "Class 'NoSuch' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "function f() { return new Later(); }",
        "Class 'Later' not found",
    );
    assert_fatal(
        ValidClassNamePass::default(),
        "switch ($a) { case 1: Exception::nope(); }",
        "Call to undefined method Exception::nope()",
    );
    assert_accepts(
        ValidClassNamePass::default(),
        "class Box { static function make() { return new Box(); } }",
    );
    assert_accepts(
        ValidClassNamePass::default(),
        "class Box { function copy() { return new static(); } }",
    );
}

#[test]
fn static_calls_must_name_a_method() {
    assert_fatal(
        ValidClassNamePass::default(),
        "Exception::nope();",
        "Call to undefined method Exception::nope()",
    );
    assert_accepts(ValidClassNamePass::default(), "Closure::fromCallable('strlen');");
    assert_accepts(ValidClassNamePass::default(), "class A {} A::anything();");
}

#[test]
fn declared_classes_outlive_the_snippet() {
    let mut cleaner = cleaner_with(ValidClassNamePass::default());
    clean_with(&mut cleaner, "class Greeter {}").unwrap();
    clean_with(&mut cleaner, "new Greeter();").unwrap();
    assert_rejects_with(
        &mut cleaner,
        "class Greeter {}",
        ErrorKind::Fatal,
        "Class named Greeter already exists",
    );

    assert!(clean_with(&mut cleaner, "class Temp {} new Missing();").is_err());
    clean_with(&mut cleaner, "class Temp {}").unwrap();
}

#[test]
fn namespaced_constants_must_be_defined() {
    let err = assert_fatal(ValidConstantPass::default(), "Foo\\BAR;", "Undefined constant");
    assert_eq!(err.message(), "Undefined constant Foo\\BAR");

    assert_accepts(ValidConstantPass::default(), "BAR;");
    assert_accepts(ValidConstantPass::default(), "\\PHP_EOL;");
    assert_accepts(ValidConstantPass::default(), "define('Foo\\BAR', 1); Foo\\BAR;");
    assert_accepts(ValidConstantPass::default(), "namespace Foo; const BAR = 1; \\Foo\\BAR;");
}

#[test]
fn constant_fetches_are_checked_in_nested_code() {
    assert_fatal(
        ValidConstantPass::default(),
        "function f() { return Foo\\BAR; }",
        "Undefined constant Foo\\BAR",
    );
    assert_fatal(
        ValidConstantPass::default(),
        "if ($a) { ArrayObject::NOPE; }",
        "Class constant 'ArrayObject::NOPE' not found",
    );
    assert_accepts(
        ValidConstantPass::default(),
        "function f() { return ArrayObject::STD_PROP_LIST; }",
    );
}

#[test]
fn class_constants_must_be_defined() {
    assert_fatal(
        ValidConstantPass::default(),
        "Exception::NOPE;",
        "Class constant 'Exception::NOPE' not found",
    );
    assert_fatal(
        ValidConstantPass::default(),
        "Countable::NOPE;",
        "Interface constant 'Countable::NOPE' not found",
    );
    assert_accepts(ValidConstantPass::default(), "ArrayObject::ARRAY_AS_PROPS;");
    assert_accepts(ValidConstantPass::default(), "Exception::class;");
    assert_accepts(ValidConstantPass::default(), "Missing::FOO;");
}

#[test]
fn defined_constants_outlive_the_snippet() {
    let mut cleaner = cleaner_with(ValidConstantPass::default());
    assert!(clean_with(&mut cleaner, "App\\NAME;").is_err());
    clean_with(&mut cleaner, "define('App\\NAME', 'psysh');").unwrap();
    clean_with(&mut cleaner, "App\\NAME;").unwrap();
}

#[test]
fn functions_cannot_be_redeclared() {
    assert_fatal(
        ValidFunctionNamePass::default(),
        "function strlen() {}",
        "Cannot redeclare strlen()",
    );
    assert_fatal(
        ValidFunctionNamePass::default(),
        "function f() {} function F() {}",
        "Cannot redeclare F()",
    );

    assert_accepts(ValidFunctionNamePass::default(), "if ($a) { function strlen() {} }");
    assert_accepts(
        ValidFunctionNamePass::default(),
        "function outer() { function inner() {} }",
    );
    assert_accepts(ValidFunctionNamePass::default(), "namespace Foo; function strlen() {}");
}

#[test]
fn declared_functions_outlive_the_snippet() {
    let mut cleaner = cleaner_with(ValidFunctionNamePass::default());
    clean_with(&mut cleaner, "function greet() {}").unwrap();
    assert_rejects_with(
        &mut cleaner,
        "function greet() {}",
        ErrorKind::Fatal,
        "Cannot redeclare greet()",
    );
}
