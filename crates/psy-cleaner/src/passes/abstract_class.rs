use psy_core::ast::{ExprKind, MemberKind, NewClass, NodeMut, StmtKind};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::pass::{Pass, PassContext};

struct ClassFrame {
    name: String,
    is_abstract: bool,
    /// Only classes must implement their abstract methods.
    is_class: bool,
    line: u32,
    abstract_methods: Vec<String>,
}

/// Abstract methods must be bodiless and may only live in abstract classes.
#[derive(Default)]
pub struct AbstractClassPass {
    classes: Vec<ClassFrame>,
}

impl Pass for AbstractClassPass {
    fn name(&self) -> &'static str {
        "abstract_class"
    }

    fn reset(&mut self) {
        self.classes.clear();
    }

    fn enter(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        let line = node.line();
        match node {
            NodeMut::Stmt(stmt) => {
                let frame = match &stmt.kind {
                    StmtKind::Class(class) => Some((
                        class.name.clone().unwrap_or_else(|| "class@anonymous".into()),
                        class.modifiers.is_abstract,
                        true,
                    )),
                    StmtKind::Interface(iface) => Some((iface.name.clone(), true, false)),
                    StmtKind::Trait(tr) => Some((tr.name.clone(), true, false)),
                    _ => None,
                };
                if let Some((name, is_abstract, is_class)) = frame {
                    self.classes.push(ClassFrame {
                        name,
                        is_abstract,
                        is_class,
                        line,
                        abstract_methods: Vec::new(),
                    });
                }
            }
            NodeMut::Expr(expr) => {
                if let ExprKind::New(new) = &expr.kind {
                    if let NewClass::Anonymous(_) = &new.class {
                        self.classes.push(ClassFrame {
                            name: "class@anonymous".into(),
                            is_abstract: false,
                            is_class: true,
                            line,
                            abstract_methods: Vec::new(),
                        });
                    }
                }
            }
            NodeMut::Member(member) => {
                let MemberKind::Method(method) = &member.kind else {
                    return Ok(Action::Continue);
                };
                if !method.modifiers.is_abstract {
                    return Ok(Action::Continue);
                }
                let Some(class) = self.classes.last_mut() else {
                    return Ok(Action::Continue);
                };
                let name = format!("{}::{}", class.name, method.name);
                if method.body.is_some() {
                    bail_fatal!(line, "Abstract function {}() cannot contain body", name);
                }
                class.abstract_methods.push(name);
            }
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, _ctx: &mut PassContext<'_>) -> Result<Action> {
        if !node.is_class_like() {
            return Ok(Action::Continue);
        }
        let Some(class) = self.classes.pop() else {
            return Ok(Action::Continue);
        };
        let count = class.abstract_methods.len();
        if class.is_class && !class.is_abstract && count > 0 {
            bail_fatal!(
                class.line,
                "Class {} contains {} abstract method{} and must therefore be declared abstract or implement the remaining methods ({})",
                class.name,
                count,
                if count == 1 { "" } else { "s" },
                class.abstract_methods.join(", ")
            );
        }
        Ok(Action::Continue)
    }
}
