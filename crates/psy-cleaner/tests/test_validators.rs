use pretty_assertions::assert_eq;
use psy_cleaner::passes::*;
use psy_cleaner::ErrorKind;

mod support;

use support::{
    assert_accepts, assert_fatal, assert_parse_error, assert_rejects_with, cleaner_for_version,
};

#[test]
fn abstract_methods() {
    let err = assert_fatal(
        AbstractClassPass::default(),
        "abstract class B { abstract function b() { echo 1; } }",
        "cannot contain body",
    );
    assert_eq!(err.message(), "Abstract function B::b() cannot contain body");

    let err = assert_fatal(
        AbstractClassPass::default(),
        "class A { abstract function a(); abstract function b(); }",
        "must therefore be declared abstract",
    );
    assert!(err.message().contains("2 abstract methods"), "{}", err);
    assert!(err.message().ends_with("(A::a, A::b)"), "{}", err);

    assert_accepts(AbstractClassPass::default(), "abstract class A { abstract function a(); }");
    assert_accepts(AbstractClassPass::default(), "interface I { function a(); }");
}

#[test]
fn this_cannot_be_reassigned() {
    let err = assert_fatal(AssignThisVariablePass, "$this = 3;", "$this");
    assert_eq!(err.line(), Some(1));
    assert_accepts(AssignThisVariablePass, "$that = 3;");
}

#[test]
fn call_time_references() {
    assert_fatal(CallTimePassByReferencePass, "foo(&$a);", "Call-time pass-by-reference");
    assert_fatal(CallTimePassByReferencePass, "$x->foo(&$a);", "Call-time pass-by-reference");
    assert_accepts(CallTimePassByReferencePass, "foo($a);");
    assert_accepts(CallTimePassByReferencePass, "function foo(&$a) {}");
}

#[test]
fn called_class_outside_class() {
    let mut cleaner = support::cleaner_with(CalledClassPass::default());
    assert_rejects_with(
        &mut cleaner,
        "get_class();",
        ErrorKind::Warning,
        "get_class() called without object from outside a class",
    );
    assert_rejects_with(
        &mut cleaner,
        "get_called_class();",
        ErrorKind::Warning,
        "called without object",
    );
    assert_accepts(CalledClassPass::default(), "get_class($foo);");
    assert_accepts(
        CalledClassPass::default(),
        "class A { function a() { return get_class(); } }",
    );
    assert_accepts(
        CalledClassPass::default(),
        "trait T { function a() { return get_called_class(); } }",
    );
}

#[test]
fn final_classes() {
    let err = assert_fatal(
        FinalClassPass::default(),
        "final class A {} class B extends A {}",
        "may not inherit from final class",
    );
    assert_eq!(err.message(), "Class B may not inherit from final class (A)");

    assert_fatal(
        FinalClassPass::default(),
        "class C extends \\Closure {}",
        "final class (Closure)",
    );
    assert_accepts(FinalClassPass::default(), "class A {} class B extends A {}");
}

#[test]
fn yield_outside_function() {
    assert_fatal(FunctionContextPass::default(), "yield 1;", "can only be used inside a function");
    assert_accepts(FunctionContextPass::default(), "function gen() { yield 1; }");
    assert_accepts(FunctionContextPass::default(), "$f = function () { yield 1; };");
}

#[test]
fn function_returns_are_not_writable() {
    let pass = || FunctionReturnInWriteContextPass;
    assert_fatal(pass(), "unset(foo());", "write context");
    assert_fatal(pass(), "$a = [&foo()];", "write context");
    assert_fatal(pass(), "bar(&foo());", "write context");
    assert_fatal(pass(), "isset(foo());", "Cannot use isset() on the result of a function call");
    assert_accepts(pass(), "isset($foo);");
    assert_accepts(pass(), "unset($foo);");
}

#[test]
fn instanceof_is_version_gated() {
    let mut old = cleaner_for_version(InstanceOfPass, 7, 2);
    assert_rejects_with(
        &mut old,
        "'a' instanceof stdClass;",
        ErrorKind::Fatal,
        "instanceof expects an object instance, constant given",
    );
    assert_accepts(InstanceOfPass, "'a' instanceof stdClass;");
    assert_accepts(InstanceOfPass, "$a instanceof stdClass;");
}

#[test]
fn isset_and_unset_need_variables() {
    assert_fatal(IssetPass, "isset(1 + 2);", "Cannot use isset() on the result of an expression");
    assert_parse_error(IssetPass, "unset(1 + 2);", "Cannot use unset() on the result of an expression");
    assert_accepts(IssetPass, "isset($a, $b['c'], $d->e, Foo::$bar);");
}

#[test]
fn goto_needs_a_label() {
    let err = assert_fatal(LabelContextPass::default(), "goto nowhere;", "undefined label");
    assert_eq!(err.message(), "'goto' to undefined label 'nowhere'");
    assert_accepts(LabelContextPass::default(), "goto done; echo 1; done: echo 2;");
    assert_accepts(
        LabelContextPass::default(),
        "function f() { goto inner; inner: return 1; }",
    );
}

#[test]
fn psysh_variable_is_reserved() {
    assert_fatal(LeavePsyshAlonePass, "$__psysh__ = 1;", "Don't mess with $__psysh__");
    assert_accepts(LeavePsyshAlonePass, "$psysh = 1;");
}

#[test]
fn legacy_empty() {
    let mut old = cleaner_for_version(LegacyEmptyPass, 5, 4);
    assert_rejects_with(&mut old, "empty(1);", ErrorKind::Parse, "syntax error, unexpected");
    assert_accepts(LegacyEmptyPass, "empty(1);");
    let mut old = cleaner_for_version(LegacyEmptyPass, 5, 4);
    assert!(support::clean_with(&mut old, "empty($a);").is_ok());
}

#[test]
fn list_targets() {
    assert_parse_error(ListPass, "list() = $a;", "Cannot use empty list");
    assert_parse_error(ListPass, "[$a, 1] = $b;", "Assignments can only happen to writable values");
    assert_accepts(ListPass, "[$a, [$b, $c]] = $d;");
    assert_accepts(ListPass, "list('x' => $a) = $d;");

    let mut old = cleaner_for_version(ListPass, 7, 0);
    assert_rejects_with(&mut old, "[$a, $b] = $c;", ErrorKind::Parse, "syntax error, unexpected '='");
}

#[test]
fn loop_levels() {
    let pass = LoopContextPass::default;
    assert_fatal(pass(), "break;", "'break' not in the 'loop' or 'switch' context");
    assert_fatal(pass(), "continue;", "'continue' not in the 'loop' or 'switch' context");
    assert_fatal(pass(), "while (true) { break 2; }", "Cannot 'break' 2 levels");
    assert_fatal(pass(), "while (true) { break 0; }", "accepts only positive integers");
    assert_fatal(pass(), "while (true) { break -1; }", "accepts only positive integers");
    assert_fatal(pass(), "while (true) { break $a; }", "non-integer operand");
    assert_accepts(pass(), "while (true) { foreach ($a as $b) { break 2; } }");
    assert_accepts(pass(), "switch ($a) { case 1: break; }");
    assert_fatal(pass(), "while (true) { function f() { break; } }", "not in the 'loop'");
}

#[test]
fn by_reference_arguments() {
    let pass = PassableByReferencePass::default;
    assert_fatal(pass(), "sort([3, 1]);", "Only variables can be passed by reference");
    assert_fatal(pass(), "array_pop(1);", "Only variables can be passed by reference");
    assert_accepts(pass(), "sort($a);");
    assert_accepts(pass(), "sort($a['b']);");
    assert_accepts(pass(), "array_multisort($a, SORT_DESC, SORT_STRING, $b);");
    assert_fatal(pass(), "array_multisort($a, 1, 2, 3);", "Only variables");
    assert_accepts(pass(), "unknown_function(1);");
}

#[test]
fn return_types() {
    let pass = ReturnTypePass::default;
    assert_fatal(pass(), "function f(): int { return; }", "A function with return type must return a value");
    let err = assert_fatal(pass(), "function f(): ?int { return; }", "did you mean");
    assert!(err.message().contains("\"return null;\""), "{}", err);
    assert_fatal(pass(), "function f(): void { return 1; }", "A void function must not return a value");
    assert_fatal(pass(), "function f(): void { return null; }", "instead of \"return null;\"");
    assert_fatal(pass(), "function f(): ?void {}", "Void type cannot be nullable");
    assert_accepts(pass(), "function f(): void { return; }");
    assert_accepts(pass(), "function f(): int { return 1; }");
    assert_accepts(pass(), "function f(): Generator { yield 1; return; }");
    assert_accepts(pass(), "function f() { return; }");
}

#[test]
fn empty_dim_fetch_reads() {
    let pass = EmptyArrayDimFetchPass::default;
    assert_fatal(pass(), "$a = $b[];", "Cannot use [] for reading");
    assert_fatal(pass(), "echo $b[];", "Cannot use [] for reading");
    assert_accepts(pass(), "$a[] = 1;");
    assert_accepts(pass(), "$a[][] = 1;");
    assert_accepts(pass(), "$a['x'][] = 1;");
    assert_accepts(pass(), "[$a[], $b] = [1, 2];");
    assert_accepts(pass(), "foreach ($items as $out[]) {}");
}

#[test]
fn constructors() {
    let pass = ValidConstructorPass::default;
    let err = assert_fatal(pass(), "class A { static function __construct() {} }", "cannot be static");
    assert_eq!(err.message(), "Constructor A::__construct() cannot be static");
    assert_fatal(
        pass(),
        "class A { function __construct(): int {} }",
        "Constructor A::__construct() cannot declare a return type",
    );
    assert_fatal(pass(), "class A { static function a() {} }", "Constructor A::a() cannot be static");
    assert_accepts(pass(), "namespace Foo; class A { static function a() {} }");
    assert_accepts(pass(), "class A { function __construct(): void {} static function a() {} }");
}
