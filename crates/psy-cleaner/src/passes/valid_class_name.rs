use std::collections::HashMap;

use psy_core::ast::{
    ClassDecl, ClassMember, ExprKind, MemberKind, MemberName, Name, NameOrExpr, NewClass, NodeMut,
    Stmt, StmtKind,
};
use psy_core::visit::Action;
use psy_core::{bail_fatal, Result};

use crate::oracle::{class_key, ClassInfo, SymbolOracle};
use crate::pass::{Pass, PassContext};
use crate::passes::is_conditional;
use crate::scope::NameScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassLike {
    Class,
    Interface,
    Trait,
}

impl ClassLike {
    fn label(self) -> &'static str {
        match self {
            ClassLike::Class => "Class",
            ClassLike::Interface => "Interface",
            ClassLike::Trait => "Trait",
        }
    }
}

/// Class-like declarations must not collide with known ones, and referenced
/// classes must exist.
///
/// Declarations inside conditional code or function bodies may never run, so
/// they skip the definition checks. References to classes are checked at every
/// depth.
#[derive(Default)]
pub struct ValidClassNamePass {
    scope: NameScope,
    /// Class-likes declared earlier in this snippet, by lower-cased name.
    declared: HashMap<String, ClassLike>,
    /// Depth of conditional code and function bodies around the current node.
    deferred: usize,
}

fn member_names(members: &[ClassMember]) -> (Vec<String>, Vec<String>, Vec<&Name>) {
    let mut constants = Vec::new();
    let mut methods = Vec::new();
    let mut traits = Vec::new();
    for member in members {
        match &member.kind {
            MemberKind::Const(decl) => constants.extend(decl.consts.iter().map(|c| c.name.clone())),
            MemberKind::Method(method) => methods.push(method.name.clone()),
            MemberKind::TraitUse(names) => traits.extend(names.iter()),
            MemberKind::Property(_) => {}
        }
    }
    (constants, methods, traits)
}

impl ValidClassNamePass {
    fn find(&self, name: &str) -> Option<ClassLike> {
        self.declared.get(&class_key(name)).copied()
    }

    fn class_exists(&self, symbols: &dyn SymbolOracle, name: &str) -> bool {
        symbols.class_exists(name) || self.find(name) == Some(ClassLike::Class)
    }

    fn interface_exists(&self, symbols: &dyn SymbolOracle, name: &str) -> bool {
        symbols.interface_exists(name) || self.find(name) == Some(ClassLike::Interface)
    }

    fn trait_exists(&self, symbols: &dyn SymbolOracle, name: &str) -> bool {
        symbols.trait_exists(name) || self.find(name) == Some(ClassLike::Trait)
    }

    fn ensure_can_define(
        &mut self,
        kind: ClassLike,
        name: &str,
        line: u32,
        symbols: &dyn SymbolOracle,
    ) -> Result<()> {
        let existing = if self.class_exists(symbols, name) {
            Some(ClassLike::Class)
        } else if self.interface_exists(symbols, name) {
            Some(ClassLike::Interface)
        } else if self.trait_exists(symbols, name) {
            Some(ClassLike::Trait)
        } else {
            None
        };
        if let Some(existing) = existing {
            bail_fatal!(line, "{} named {} already exists", existing.label(), name);
        }
        self.declared.insert(class_key(name), kind);
        Ok(())
    }

    fn ensure_interfaces_exist(
        &self,
        interfaces: &[Name],
        line: u32,
        symbols: &dyn SymbolOracle,
    ) -> Result<()> {
        for interface in interfaces {
            let name = self.scope.resolve_class(interface);
            if !self.interface_exists(symbols, &name) {
                bail_fatal!(line, "Interface '{}' not found", name);
            }
        }
        Ok(())
    }

    fn ensure_class_exists(&self, class: &Name, line: u32, symbols: &dyn SymbolOracle) -> Result<()> {
        let name = self.scope.resolve_class(class);
        if !self.class_exists(symbols, &name) {
            bail_fatal!(line, "Class '{}' not found", name);
        }
        Ok(())
    }

    fn validate_class(
        &mut self,
        class: &ClassDecl,
        line: u32,
        ctx: &mut PassContext<'_>,
    ) -> Result<()> {
        let check = self.deferred == 0;
        let fqn = class.name.as_ref().map(|name| self.scope.qualify_name(name));
        {
            let symbols = ctx.symbols();
            if check {
                if let Some(fqn) = &fqn {
                    self.ensure_can_define(ClassLike::Class, fqn, line, &symbols)?;
                }
                if let Some(extends) = &class.extends {
                    self.ensure_class_exists(extends, line, &symbols)?;
                }
                self.ensure_interfaces_exist(&class.implements, line, &symbols)?;
            }
        }
        let Some(fqn) = fqn else {
            return Ok(());
        };
        self.declared.insert(class_key(&fqn), ClassLike::Class);
        let (constants, methods, traits) = member_names(&class.members);
        ctx.pending.add_class(ClassInfo {
            name: fqn,
            is_final: class.modifiers.is_final,
            is_abstract: class.modifiers.is_abstract,
            parent: class.extends.as_ref().map(|name| self.scope.resolve_class(name)),
            interfaces: class
                .implements
                .iter()
                .map(|name| self.scope.resolve_class(name))
                .collect(),
            traits: traits.into_iter().map(|name| self.scope.resolve_class(name)).collect(),
            constants: Some(constants),
            methods: Some(methods),
        });
        Ok(())
    }

    fn validate_definition(&mut self, stmt: &Stmt, ctx: &mut PassContext<'_>) -> Result<()> {
        let line = stmt.line();
        match &stmt.kind {
            StmtKind::Class(class) => self.validate_class(class, line, ctx)?,
            StmtKind::Interface(iface) => {
                let fqn = self.scope.qualify_name(&iface.name);
                if self.deferred == 0 {
                    let symbols = ctx.symbols();
                    self.ensure_can_define(ClassLike::Interface, &fqn, line, &symbols)?;
                    self.ensure_interfaces_exist(&iface.extends, line, &symbols)?;
                }
                self.declared.insert(class_key(&fqn), ClassLike::Interface);
                let (constants, methods, _) = member_names(&iface.members);
                ctx.pending.add_interface(ClassInfo {
                    interfaces: iface
                        .extends
                        .iter()
                        .map(|name| self.scope.resolve_class(name))
                        .collect(),
                    constants: Some(constants),
                    methods: Some(methods),
                    ..ClassInfo::named(fqn)
                });
            }
            StmtKind::Trait(tr) => {
                let fqn = self.scope.qualify_name(&tr.name);
                if self.deferred == 0 {
                    let symbols = ctx.symbols();
                    self.ensure_can_define(ClassLike::Trait, &fqn, line, &symbols)?;
                }
                self.declared.insert(class_key(&fqn), ClassLike::Trait);
                let (constants, methods, traits) = member_names(&tr.members);
                ctx.pending.add_trait(ClassInfo {
                    traits: traits.into_iter().map(|name| self.scope.resolve_class(name)).collect(),
                    constants: Some(constants),
                    methods: Some(methods),
                    ..ClassInfo::named(fqn)
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn validate_reference(&self, node: &NodeMut<'_>, symbols: &dyn SymbolOracle) -> Result<()> {
        let NodeMut::Expr(expr) = node else {
            return Ok(());
        };
        let line = expr.line();
        match &expr.kind {
            ExprKind::New(new) => {
                if let NewClass::Name(class) = &new.class {
                    if !class.is_special_class() {
                        self.ensure_class_exists(class, line, symbols)?;
                    }
                }
            }
            ExprKind::ClassConstFetch(fetch) => {
                if fetch.name.eq_ignore_ascii_case("class") {
                    return Ok(());
                }
                let Some(class) = fetch.class.as_name().filter(|name| !name.is_special_class())
                else {
                    return Ok(());
                };
                let name = self.scope.resolve_class(class);
                if !self.class_exists(symbols, &name) && !self.interface_exists(symbols, &name) {
                    bail_fatal!(line, "Class '{}' not found", name);
                }
            }
            ExprKind::StaticCall(call) => {
                let Some(class) = call.class.as_name().filter(|name| !name.is_special_class())
                else {
                    return Ok(());
                };
                let name = self.scope.resolve_class(class);
                if !self.class_exists(symbols, &name) && !self.trait_exists(symbols, &name) {
                    bail_fatal!(line, "Class '{}' not found", name);
                }
                // Classes declared in this snippet are taken at their word.
                if self.find(&name) == Some(ClassLike::Class) {
                    return Ok(());
                }
                if let MemberName::Ident(method) = &call.name {
                    if symbols.method_exists(&name, method) == Some(false) {
                        bail_fatal!(line, "Call to undefined method {}::{}()", name, method);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl Pass for ValidClassNamePass {
    fn name(&self) -> &'static str {
        "valid_class_name"
    }

    fn after(&self) -> &'static [&'static str] {
        &["use_statement", "namespace"]
    }

    fn reset(&mut self) {
        self.scope = NameScope::default();
        self.declared.clear();
        self.deferred = 0;
    }

    fn enter(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        self.scope.observe(&node, ctx.session);
        if let NodeMut::Stmt(stmt) = &node {
            self.validate_definition(stmt, ctx)?;
        }
        if is_conditional(&node) || node.is_function_like() {
            self.deferred += 1;
        }
        Ok(Action::Continue)
    }

    fn leave(&mut self, node: NodeMut<'_>, ctx: &mut PassContext<'_>) -> Result<Action> {
        if is_conditional(&node) || node.is_function_like() {
            self.deferred = self.deferred.saturating_sub(1);
            return Ok(Action::Continue);
        }
        let symbols = ctx.symbols();
        self.validate_reference(&node, &symbols)?;
        Ok(Action::Continue)
    }
}
