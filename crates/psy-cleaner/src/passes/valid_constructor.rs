use psy_core::ast::{ClassMethod, MemberKind, NodeMut, Stmt, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

/// Constructors may be neither static nor declare a (non-void) return type.
#[derive(Default)]
pub struct ValidConstructorPass {
    namespace: Vec<String>,
}

impl ValidConstructorPass {
    fn validate(&self, class: &str, constructor: &ClassMethod, line: u32) -> Result<()> {
        let qualified = || {
            self.namespace
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(class))
                .collect::<Vec<_>>()
                .join("\\")
        };
        if constructor.modifiers.is_static {
            bail_fatal!(
                line,
                "Constructor {}::{}() cannot be static",
                qualified(),
                constructor.name
            );
        }
        if constructor.return_type.as_ref().is_some_and(|ty| !ty.is_void()) {
            bail_fatal!(
                line,
                "Constructor {}::{}() cannot declare a return type",
                qualified(),
                constructor.name
            );
        }
        Ok(())
    }
}

impl Pass for ValidConstructorPass {
    fn name(&self) -> &'static str {
        "valid_constructor"
    }

    fn reset(&mut self) {
        self.namespace.clear();
    }

    fn before_traverse(
        &mut self,
        _stmts: &mut Vec<Stmt>,
        ctx: &mut PassContext<'_>,
    ) -> Result<()> {
        self.namespace = ctx.session.namespace_parts().to_vec();
        Ok(())
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        let NodeMut::Stmt(stmt) = node else {
            return Ok(Action::Continue);
        };
        match &stmt.kind {
            StmtKind::Namespace(ns) => {
                self.namespace = ns
                    .name
                    .as_ref()
                    .map(|name| name.parts.clone())
                    .unwrap_or_default();
            }
            StmtKind::Class(class) => {
                let Some(name) = &class.name else {
                    return Ok(Action::Continue);
                };
                let methods = || {
                    class.members.iter().filter_map(|member| match &member.kind {
                        MemberKind::Method(method) => Some(method),
                        _ => None,
                    })
                };
                // `__construct` wins over a legacy same-name constructor.
                let constructor = methods()
                    .find(|method| method.name.eq_ignore_ascii_case("__construct"))
                    .or_else(|| {
                        if self.namespace.is_empty() {
                            methods().find(|method| method.name.eq_ignore_ascii_case(name))
                        } else {
                            None
                        }
                    });
                if let Some(constructor) = constructor {
                    self.validate(name, constructor, stmt.line())?;
                }
            }
            _ => {}
        }
        Ok(Action::Continue)
    }
}
