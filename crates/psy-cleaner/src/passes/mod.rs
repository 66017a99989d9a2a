//! The cleaner's validation and rewrite passes, and their default order.

mod abstract_class;
mod assign_this_variable;
mod call_time_pass_by_reference;
mod called_class;
mod empty_array_dim_fetch;
mod exit;
mod final_class;
mod function_context;
mod function_return_in_write_context;
mod implicit_return;
mod implicit_use;
mod instance_of;
mod isset;
mod label_context;
mod leave_psysh_alone;
mod legacy_empty;
mod list;
mod loop_context;
mod magic_constants;
mod namespace;
mod passable_by_reference;
mod require;
mod return_type;
mod strict_types;
mod use_statement;
mod valid_class_name;
mod valid_constant;
mod valid_constructor;
mod valid_function_name;

pub use abstract_class::AbstractClassPass;
pub use assign_this_variable::AssignThisVariablePass;
pub use call_time_pass_by_reference::CallTimePassByReferencePass;
pub use called_class::CalledClassPass;
pub use empty_array_dim_fetch::EmptyArrayDimFetchPass;
pub use exit::ExitPass;
pub use final_class::FinalClassPass;
pub use function_context::FunctionContextPass;
pub use function_return_in_write_context::FunctionReturnInWriteContextPass;
pub use implicit_return::ImplicitReturnPass;
pub use implicit_use::ImplicitUsePass;
pub use instance_of::InstanceOfPass;
pub use isset::IssetPass;
pub use label_context::LabelContextPass;
pub use leave_psysh_alone::LeavePsyshAlonePass;
pub use legacy_empty::LegacyEmptyPass;
pub use list::ListPass;
pub use loop_context::LoopContextPass;
pub use magic_constants::MagicConstantsPass;
pub use namespace::NamespacePass;
pub use passable_by_reference::PassableByReferencePass;
pub use require::RequirePass;
pub use return_type::ReturnTypePass;
pub use strict_types::StrictTypesPass;
pub use use_statement::UseStatementPass;
pub use valid_class_name::ValidClassNamePass;
pub use valid_constant::ValidConstantPass;
pub use valid_constructor::ValidConstructorPass;
pub use valid_function_name::ValidFunctionNamePass;

use psy_core::ast::{ExprKind, NodeMut, StmtKind};

use crate::pass::Pass;

/// Pure validators that must see the snippet before it is rewritten.
pub const VALIDATORS: &[&str] = &[
    "abstract_class",
    "assign_this_variable",
    "called_class",
    "call_time_pass_by_reference",
    "final_class",
    "function_context",
    "function_return_in_write_context",
    "instance_of",
    "isset",
    "label_context",
    "leave_psysh_alone",
    "legacy_empty",
    "list",
    "loop_context",
    "passable_by_reference",
    "return_type",
    "empty_array_dim_fetch",
    "valid_constructor",
];

/// Nodes whose body may not run, so declarations inside them are not checked
/// for redefinition.
pub(crate) fn is_conditional(node: &NodeMut<'_>) -> bool {
    match node {
        NodeMut::Stmt(stmt) => matches!(
            stmt.kind,
            StmtKind::If(_) | StmtKind::While(_) | StmtKind::DoWhile(_) | StmtKind::Switch(_)
        ),
        NodeMut::Expr(expr) => matches!(expr.kind, ExprKind::Ternary(_)),
        NodeMut::Member(_) => false,
    }
}

/// The full pass list in execution order.
pub fn default_passes() -> Vec<Box<dyn Pass>> {
    vec![
        Box::new(AbstractClassPass::default()),
        Box::new(AssignThisVariablePass),
        Box::new(CalledClassPass::default()),
        Box::new(CallTimePassByReferencePass),
        Box::new(FinalClassPass::default()),
        Box::new(FunctionContextPass::default()),
        Box::new(FunctionReturnInWriteContextPass),
        Box::new(InstanceOfPass),
        Box::new(IssetPass),
        Box::new(LabelContextPass::default()),
        Box::new(LeavePsyshAlonePass),
        Box::new(LegacyEmptyPass),
        Box::new(ListPass),
        Box::new(LoopContextPass::default()),
        Box::new(PassableByReferencePass::default()),
        Box::new(ReturnTypePass::default()),
        Box::new(EmptyArrayDimFetchPass::default()),
        Box::new(ValidConstructorPass::default()),
        Box::new(ImplicitUsePass::default()),
        Box::new(UseStatementPass::default()),
        Box::new(ExitPass),
        Box::new(ImplicitReturnPass),
        Box::new(MagicConstantsPass),
        Box::new(NamespacePass),
        Box::new(RequirePass),
        Box::new(StrictTypesPass::default()),
        Box::new(ValidClassNamePass::default()),
        Box::new(ValidConstantPass::default()),
        Box::new(ValidFunctionNamePass::default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::PassSet;

    #[test]
    fn default_order_satisfies_constraints() {
        let set = PassSet::new(default_passes()).unwrap();
        assert_eq!(set.len(), 29);
        let names = set.names();
        for validator in VALIDATORS {
            assert!(names.contains(validator), "{} missing", validator);
        }
    }
}
