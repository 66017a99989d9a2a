use std::collections::HashSet;

use psy_core::ast::{NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::oracle::{class_key, FunctionInfo, SymbolOracle};
use crate::pass::{Pass, PassContext};
use crate::passes::is_conditional;
use crate::scope::NameScope;

/// A function may not be declared twice, unless the declaration might not run.
#[derive(Default)]
pub struct ValidFunctionNamePass {
    scope: NameScope,
    seen: HashSet<String>,
    conditional: usize,
}

impl Pass for ValidFunctionNamePass {
    fn name(&self) -> &'static str {
        "valid_function_name"
    }

    fn after(&self) -> &'static [&'static str] {
        &["use_statement", "namespace"]
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
        self.seen.clear();
        self.conditional = 0;
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        self.scope.observe(&node, ctx.session);
        if let NodeMut::Stmt(stmt) = &node {
            if let StmtKind::Function(func) = &stmt.kind {
                let name = self.scope.qualify_name(&func.name);
                let key = class_key(&name);
                if self.conditional == 0
                    && (self.seen.contains(&key) || ctx.symbols().function_exists(&name))
                {
                    bail_fatal!(stmt.line(), "Cannot redeclare {}()", name);
                }
                self.seen.insert(key);
                ctx.pending.add_function(FunctionInfo {
                    by_ref: func
                        .params
                        .iter()
                        .enumerate()
                        .filter(|(_, param)| param.by_ref)
                        .map(|(position, _)| position)
                        .collect(),
                    ..FunctionInfo::named(name)
                });
            }
        }
        if is_conditional(&node) || node.is_function_like() {
            self.conditional += 1;
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if is_conditional(&node) || node.is_function_like() {
            self.conditional = self.conditional.saturating_sub(1);
        }
        Ok(Action::Continue)
    }
}
